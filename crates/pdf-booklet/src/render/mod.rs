//! PDF-specific operations behind the `lopdf` codec
//!
//! This module handles:
//! - Creating Form XObjects from source pages and Image XObjects from PNGs
//! - Deep copying objects between documents
//! - Page tree edits (blank pages, insertion, flattening)
//! - Appending placement operators to page content

mod page;
mod xobject;

pub use page::*;
pub(crate) use xobject::{INHERITABLE_KEYS, copy_dictionary, inherited_attribute};
pub use xobject::{create_image_xobject, create_page_xobject, get_page_dimensions};
