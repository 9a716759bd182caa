//! Image tiling - slicing tall images into page-shaped bands
//!
//! The band height follows the target aspect ratio `split_width:split_height`
//! applied to the image's own width, so `split_height` alone does not fix the
//! band height.

use crate::codec::{RasterCodec, Region, TileContent};
use crate::types::{BookletError, Result};
use std::path::{Path, PathBuf};

/// One horizontal slice of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub index: usize,
    /// Pixel offset from the top of the image
    pub top: u32,
    pub height: u32,
}

/// How one image is cut into bands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandPlan {
    pub width: u32,
    /// Height of every band except possibly the last
    pub band_height: u32,
    pub bands: Vec<Band>,
}

/// An extracted band together with its position in the source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRegion {
    pub source_index: usize,
    pub band_index: usize,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub content: TileContent,
}

/// Compute the bands for an image of `width` x `height` pixels.
///
/// `band_height = ceil(width / split_width * split_height)`; the image is
/// walked top to bottom in chunks of that height and the last chunk takes
/// whatever remains.
pub fn plan_bands(width: u32, height: u32, split_width: u32, split_height: u32) -> Result<BandPlan> {
    if split_width == 0 || split_height == 0 {
        return Err(BookletError::Config(
            "Split width and height must be at least 1".to_string(),
        ));
    }

    let band_height = (f64::from(width) / f64::from(split_width) * f64::from(split_height)).ceil();
    let band_height = band_height.min(f64::from(u32::MAX)) as u32;

    let mut bands = Vec::new();
    if band_height > 0 {
        let mut top = 0u32;
        while top < height {
            let chunk = band_height.min(height - top);
            bands.push(Band {
                index: bands.len(),
                top,
                height: chunk,
            });
            top += chunk;
        }
    }

    Ok(BandPlan {
        width,
        band_height,
        bands,
    })
}

/// Where band `band_index` of image `image_index` is written under `dir`
pub fn tile_path(dir: &Path, image_index: usize, band_index: usize) -> PathBuf {
    dir.join(format!("{}-{}.png", image_index, band_index))
}

/// Split every image into bands, in input order then top to bottom.
///
/// A failure only affects its own entry: an unreadable image yields a single
/// error for that image, a failed extraction an error for that band, and the
/// remaining images and bands are still processed.
pub fn split_images<R: RasterCodec>(
    raster: &R,
    paths: &[PathBuf],
    split_width: u32,
    split_height: u32,
    output_dir: Option<&Path>,
) -> Result<Vec<Result<TileRegion>>> {
    if split_width == 0 || split_height == 0 {
        return Err(BookletError::Config(
            "Split width and height must be at least 1".to_string(),
        ));
    }

    let mut regions = Vec::new();

    for (image_index, path) in paths.iter().enumerate() {
        let (width, height) = match raster.probe_dimensions(path) {
            Ok(dims) => dims,
            Err(err) => {
                log::error!("failed to read image {}: {}", path.display(), err);
                regions.push(Err(BookletError::Extraction {
                    image: image_index,
                    band: None,
                    message: err.to_string(),
                }));
                continue;
            }
        };

        let plan = plan_bands(width, height, split_width, split_height)?;
        log::debug!(
            "{}: {}x{} px -> {} bands of {} px",
            path.display(),
            width,
            height,
            plan.bands.len(),
            plan.band_height
        );

        for band in &plan.bands {
            let region = Region {
                left: 0,
                top: band.top,
                width,
                height: band.height,
            };
            let target = output_dir.map(|dir| tile_path(dir, image_index, band.index));

            let result = raster
                .extract_region(path, region, target.as_deref())
                .map(|content| TileRegion {
                    source_index: image_index,
                    band_index: band.index,
                    top: band.top,
                    width,
                    height: band.height,
                    content,
                })
                .map_err(|err| {
                    log::error!(
                        "failed to extract band {} of {}: {}",
                        band.index,
                        path.display(),
                        err
                    );
                    BookletError::Extraction {
                        image: image_index,
                        band: Some(band.index),
                        message: err.to_string(),
                    }
                });
            regions.push(result);
        }
    }

    Ok(regions)
}
