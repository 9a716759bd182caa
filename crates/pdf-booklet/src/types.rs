use crate::constants::mm_to_pt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Codec error: {0}")]
    Codec(String),
    #[error("Page index {index} out of range for document with {count} pages")]
    PageOutOfRange { index: usize, count: usize },
    #[error("{}", extraction_message(.image, .band, .message))]
    Extraction {
        image: usize,
        band: Option<usize>,
        message: String,
    },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

fn extraction_message(image: &usize, band: &Option<usize>, message: &str) -> String {
    match band {
        Some(band) => format!("failed to extract band {band} of image {image}: {message}"),
        None => format!("failed to read image {image}: {message}"),
    }
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Page size in points with orientation applied
    pub fn page_size(self, orientation: Orientation) -> PageSize {
        let (w, h) = self.dimensions_with_orientation(orientation);
        PageSize::new(mm_to_pt(w), mm_to_pt(h))
    }
}

/// Width and height of a page or embedded object, in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Swap width and height
    pub fn rotated(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Largest size with this aspect ratio that fits inside `bounds`
    pub fn scale_to_fit(self, bounds: PageSize) -> PageSize {
        let scale = (bounds.width / self.width).min(bounds.height / self.height);
        PageSize::new(self.width * scale, self.height * scale)
    }
}

/// Where and how large to draw an embedded object on a page.
/// Origin is the bottom-left corner, PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DrawOptions {
    /// Draw at native size with the given origin
    pub fn at(x: f32, y: f32, size: PageSize) -> Self {
        Self {
            x,
            y,
            width: size.width,
            height: size.height,
        }
    }
}

/// Which operation statistics are calculated for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Pad to a multiple of `times`
    Pad { times: usize },
    /// Pad to even and impose two pages per sheet
    Booklet,
}

/// Statistics about a padding or booklet run
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Number of blank or filler pages added
    pub blank_pages_added: usize,
    /// Page count of the padded document
    pub padded_pages: usize,
    /// Number of output sheets (booklets only)
    pub output_sheets: Option<usize>,
}
