//! Capability interfaces the padding, imposition and tiling algorithms run against
//!
//! The algorithms never touch a PDF or image library directly. They drive a
//! [`DocumentCodec`] and a [`RasterCodec`], which lets tests substitute
//! in-memory fakes for the `lopdf` and `image` backed implementations.

mod pdf;
mod raster;

pub use pdf::{LopdfCodec, PdfXObject};
pub use raster::ImageCodec;

use crate::types::{DrawOptions, PageSize, Result};
use std::path::{Path, PathBuf};

/// Something that can be drawn onto a page and knows its native size
pub trait Placeable {
    fn size(&self) -> PageSize;
}

/// Page-addressable document operations
pub trait DocumentCodec {
    type Document;
    /// A page copied into a document but not yet placed in its page order
    type Page;
    /// An embedded page or image that can be drawn onto pages
    type XObject: Placeable;

    /// Create an empty document
    fn create(&self) -> Self::Document;

    /// Parse a serialized document
    fn load(&self, bytes: &[u8]) -> Result<Self::Document>;

    fn page_count(&self, doc: &Self::Document) -> usize;

    fn page_size(&self, doc: &Self::Document, index: usize) -> Result<PageSize>;

    /// Append a blank page and return its index
    fn add_page(&self, doc: &mut Self::Document, size: PageSize) -> Result<usize>;

    /// Embed page `index` of `source` into `doc` as a drawable object
    fn embed_page(
        &self,
        doc: &mut Self::Document,
        source: &Self::Document,
        index: usize,
    ) -> Result<Self::XObject>;

    /// Embed an encoded PNG image into `doc` as a drawable object
    fn embed_png(&self, doc: &mut Self::Document, bytes: &[u8]) -> Result<Self::XObject>;

    fn draw(
        &self,
        doc: &mut Self::Document,
        page: usize,
        xobject: &Self::XObject,
        options: DrawOptions,
    ) -> Result<()>;

    /// Draw a zero-width, fully transparent line at the origin
    fn draw_invisible_line(&self, doc: &mut Self::Document, page: usize) -> Result<()>;

    /// Copy the pages at `indices` from one document into another.
    /// The copies are not part of `to`'s page order until inserted.
    fn copy_pages(
        &self,
        from: &Self::Document,
        to: &mut Self::Document,
        indices: &[usize],
    ) -> Result<Vec<Self::Page>>;

    /// Place a copied page at `index` in the page order; `index <= page_count`
    fn insert_page(&self, doc: &mut Self::Document, index: usize, page: Self::Page) -> Result<()>;

    /// Serialize the document
    fn save(&self, doc: &mut Self::Document) -> Result<Vec<u8>>;
}

/// Rectangle of a raster image, in pixels from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Extracted region data handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileContent {
    /// Region was written to this file
    File(PathBuf),
    /// PNG-encoded region
    Bytes(Vec<u8>),
}

impl TileContent {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TileContent::Bytes(bytes) => Some(bytes),
            TileContent::File(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TileContent::File(path) => Some(path),
            TileContent::Bytes(_) => None,
        }
    }
}

/// Raster image operations
pub trait RasterCodec {
    /// Native `(width, height)` in pixels
    fn probe_dimensions(&self, path: &Path) -> Result<(u32, u32)>;

    /// Crop `region` out of the image at `path`. With `output` the region is
    /// written there as PNG, otherwise the PNG bytes are returned.
    fn extract_region(
        &self,
        path: &Path,
        region: Region,
        output: Option<&Path>,
    ) -> Result<TileContent>;
}
