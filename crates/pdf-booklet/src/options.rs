use crate::booklet::BookletSpec;
use crate::pad::PaddingSpec;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for padding a document to a page-count multiple
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PadOptions {
    /// Also write the result here
    pub output_path: Option<PathBuf>,
    /// PDF whose first page is repeated on every added page
    pub fill_page_path: Option<PathBuf>,
    /// Insert position; negative counts from the end, `None` appends
    pub insert_index: Option<i64>,
    /// Target page-count multiple
    pub times: usize,
    /// Paper size of added pages (portrait)
    pub page_size: PaperSize,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            fill_page_path: None,
            insert_index: None,
            times: 1,
            page_size: PaperSize::A4,
        }
    }
}

impl PadOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.times == 0 {
            return Err(BookletError::Config(
                "Target page multiple must be at least 1".to_string(),
            ));
        }
        validate_paper(self.page_size)
    }

    pub fn padding_spec(&self) -> PaddingSpec {
        PaddingSpec {
            times: self.times,
            insert_index: self.insert_index,
            page_size: self.page_size.page_size(Orientation::Portrait),
        }
    }
}

/// Options for booklet imposition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookOptions {
    /// Also write the result here
    pub output_path: Option<PathBuf>,
    /// PDF whose first page fills the padding page, if one is needed
    pub fill_page_path: Option<PathBuf>,
    /// Insert position of the padding page
    pub insert_index: Option<i64>,
    /// Output sheet paper; always used in landscape
    pub sheet_size: PaperSize,
    /// Paper size of the padding page (portrait)
    pub page_size: PaperSize,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            fill_page_path: None,
            insert_index: None,
            sheet_size: PaperSize::A3,
            page_size: PaperSize::A4,
        }
    }
}

impl BookOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        validate_paper(self.sheet_size)?;
        validate_paper(self.page_size)
    }

    pub fn booklet_spec(&self) -> BookletSpec {
        BookletSpec {
            sheet_size: self.sheet_size.page_size(Orientation::Landscape),
            insert_index: self.insert_index,
            blank_page_size: self.page_size.page_size(Orientation::Portrait),
        }
    }
}

/// Options for splitting images into bands
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplitOptions {
    /// Directory for band files; bands are returned as PNG bytes when unset
    pub output_path: Option<PathBuf>,
    /// Target aspect ratio width
    pub split_width: u32,
    /// Target aspect ratio height
    pub split_height: u32,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::for_paper(PaperSize::A4)
    }
}

impl SplitOptions {
    /// Split with the aspect ratio of a portrait paper size, in whole points
    pub fn for_paper(paper: PaperSize) -> Self {
        let size = paper.page_size(Orientation::Portrait);
        Self {
            output_path: None,
            split_width: size.width as u32,
            split_height: size.height as u32,
        }
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.split_width == 0 || self.split_height == 0 {
            return Err(BookletError::Config(
                "Split width and height must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for turning images into a paginated document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImageDocumentOptions {
    /// Output page paper (portrait)
    pub page_size: PaperSize,
}

impl Default for ImageDocumentOptions {
    fn default() -> Self {
        Self {
            page_size: PaperSize::A4,
        }
    }
}

impl ImageDocumentOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        validate_paper(self.page_size)
    }
}

fn validate_paper(paper: PaperSize) -> Result<()> {
    let (w, h) = paper.dimensions_mm();
    if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
        return Err(BookletError::Config(format!(
            "Paper size must be positive, got {} x {} mm",
            w, h
        )));
    }
    Ok(())
}

#[cfg(feature = "serde")]
mod persist {
    use super::*;
    use serde::de::DeserializeOwned;
    use std::path::Path;

    pub(super) async fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let bytes = tokio::fs::read(path).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| BookletError::Config(format!("Failed to parse config: {}", e)))
    }

    pub(super) async fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| BookletError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

macro_rules! json_persistence {
    ($($ty:ty),*) => {
        $(
            #[cfg(feature = "serde")]
            impl $ty {
                /// Load options from JSON file
                pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
                    persist::load(path.as_ref()).await
                }

                /// Save options to JSON file
                pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
                    persist::save(self, path.as_ref()).await
                }
            }
        )*
    };
}

json_persistence!(PadOptions, BookOptions, SplitOptions, ImageDocumentOptions);
