//! [`RasterCodec`] over the `image` crate

use super::{RasterCodec, Region, TileContent};
use crate::types::{BookletError, Result};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Raster codec backed by the `image` crate.
///
/// The most recently decoded image is kept so that extracting consecutive
/// bands of one image decodes it only once.
#[derive(Debug, Default)]
pub struct ImageCodec {
    last: Mutex<Option<(PathBuf, Arc<DynamicImage>)>>,
}

impl ImageCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn open(&self, path: &Path) -> Result<Arc<DynamicImage>> {
        let mut last = self
            .last
            .lock()
            .map_err(|_| BookletError::Codec("image cache lock poisoned".to_string()))?;

        if let Some((cached_path, image)) = last.as_ref() {
            if cached_path == path {
                return Ok(Arc::clone(image));
            }
        }

        let image = Arc::new(image::open(path)?);
        *last = Some((path.to_owned(), Arc::clone(&image)));
        Ok(image)
    }
}

impl RasterCodec for ImageCodec {
    fn probe_dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        Ok(self.open(path)?.dimensions())
    }

    fn extract_region(
        &self,
        path: &Path,
        region: Region,
        output: Option<&Path>,
    ) -> Result<TileContent> {
        let image = self.open(path)?;
        let (width, height) = image.dimensions();

        let fits = region.left.checked_add(region.width).is_some_and(|r| r <= width)
            && region.top.checked_add(region.height).is_some_and(|b| b <= height);
        if !fits || region.width == 0 || region.height == 0 {
            return Err(BookletError::Codec(format!(
                "region {}x{}+{}+{} is outside the {}x{} image",
                region.width, region.height, region.left, region.top, width, height
            )));
        }

        let band = image.crop_imm(region.left, region.top, region.width, region.height);

        match output {
            Some(out) => {
                band.save_with_format(out, ImageFormat::Png)?;
                Ok(TileContent::File(out.to_owned()))
            }
            None => {
                let mut bytes = Cursor::new(Vec::new());
                band.write_to(&mut bytes, ImageFormat::Png)?;
                Ok(TileContent::Bytes(bytes.into_inner()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_test_png(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("source.png");
        let image = RgbImage::from_fn(width, height, |_, y| Rgb([(y % 256) as u8, 0, 0]));
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn test_probe_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), 40, 90);
        assert_eq!(ImageCodec::new().probe_dimensions(&path).unwrap(), (40, 90));
    }

    #[test]
    fn test_extract_region_to_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), 40, 90);
        let region = Region {
            left: 0,
            top: 30,
            width: 40,
            height: 20,
        };

        let content = ImageCodec::new().extract_region(&path, region, None).unwrap();
        let band = image::load_from_memory(content.as_bytes().unwrap()).unwrap();
        assert_eq!(band.dimensions(), (40, 20));
        // First row of the band is row 30 of the source
        assert_eq!(band.to_rgb8().get_pixel(0, 0), &Rgb([30, 0, 0]));
    }

    #[test]
    fn test_extract_region_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), 40, 90);
        let out = dir.path().join("0-0.png");
        let region = Region {
            left: 0,
            top: 0,
            width: 40,
            height: 90,
        };

        let content = ImageCodec::new()
            .extract_region(&path, region, Some(&out))
            .unwrap();
        assert_eq!(content, TileContent::File(out.clone()));
        assert_eq!(image::open(&out).unwrap().dimensions(), (40, 90));
    }

    #[test]
    fn test_extract_region_out_of_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), 40, 90);
        let region = Region {
            left: 0,
            top: 80,
            width: 40,
            height: 20,
        };
        assert!(ImageCodec::new().extract_region(&path, region, None).is_err());
    }
}
