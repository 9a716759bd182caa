mod api;
pub mod booklet;
pub mod codec;
pub mod compose;
pub mod constants;
mod io;
mod options;
pub mod pad;
mod render;
mod stats;
pub mod tile;
mod types;

pub use api::{PdfOutput, image_to_paginated_document, impose, pad, split_image};
pub use codec::{DocumentCodec, ImageCodec, LopdfCodec, RasterCodec};
pub use io::{load_pdf, save_pdf};
pub use options::*;
pub use stats::calculate_statistics;
pub use types::*;
