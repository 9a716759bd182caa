//! File-level operations: read inputs, run the codec work off the async
//! runtime, write outputs.

use crate::booklet::impose_document;
use crate::codec::{DocumentCodec, ImageCodec, LopdfCodec};
use crate::compose::compose_tiles;
use crate::io::{read_filler, read_input, write_output};
use crate::options::{BookOptions, ImageDocumentOptions, PadOptions, SplitOptions};
use crate::pad::pad_document;
use crate::tile::{TileRegion, split_images};
use crate::types::*;
use std::path::{Path, PathBuf};

/// Result of [`pad`] and [`impose`].
///
/// Exactly one of `data` and `err` is set; `err` is empty on success and
/// prefixed with the operation name on failure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfOutput {
    pub data: Option<Vec<u8>>,
    pub err: String,
}

impl PdfOutput {
    fn from_result(operation: &str, result: Result<Vec<u8>>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                err: String::new(),
            },
            Err(e) => {
                log::debug!("{} failed: {}", operation, e);
                Self {
                    data: None,
                    err: format!("{}: {}", operation, e),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.err.is_empty()
    }

    pub fn into_result(self) -> std::result::Result<Vec<u8>, String> {
        match self.data {
            Some(data) if self.err.is_empty() => Ok(data),
            _ => Err(self.err),
        }
    }
}

/// Pad the PDF at `source_path` to a multiple of `options.times` pages.
///
/// Never fails: errors are reported in [`PdfOutput::err`].
pub async fn pad(source_path: impl AsRef<Path>, options: &PadOptions) -> PdfOutput {
    PdfOutput::from_result("pad()", pad_file(source_path.as_ref(), options).await)
}

async fn pad_file(source_path: &Path, options: &PadOptions) -> Result<Vec<u8>> {
    let source = read_input(source_path).await?;
    options.validate()?;
    let filler = read_filler(options.fill_page_path.as_deref()).await?;
    let spec = options.padding_spec();

    let bytes = tokio::task::spawn_blocking(move || {
        let codec = LopdfCodec;
        let mut doc = codec.load(&source)?;
        let filler = filler.map(|bytes| codec.load(&bytes)).transpose()?;
        pad_document(&codec, &mut doc, filler.as_ref(), &spec)?;
        codec.save(&mut doc)
    })
    .await??;

    write_output(options.output_path.as_deref(), &bytes).await?;
    Ok(bytes)
}

/// Impose the PDF at `source_path` as a two-up booklet.
///
/// Never fails: errors are reported in [`PdfOutput::err`].
pub async fn impose(source_path: impl AsRef<Path>, options: &BookOptions) -> PdfOutput {
    PdfOutput::from_result("impose()", impose_file(source_path.as_ref(), options).await)
}

async fn impose_file(source_path: &Path, options: &BookOptions) -> Result<Vec<u8>> {
    let source = read_input(source_path).await?;
    options.validate()?;
    let filler = read_filler(options.fill_page_path.as_deref()).await?;
    let spec = options.booklet_spec();

    let bytes = tokio::task::spawn_blocking(move || {
        let codec = LopdfCodec;
        let mut doc = codec.load(&source)?;
        let filler = filler.map(|bytes| codec.load(&bytes)).transpose()?;
        let mut booklet = impose_document(&codec, &mut doc, filler.as_ref(), &spec)?;
        codec.save(&mut booklet)
    })
    .await??;

    write_output(options.output_path.as_deref(), &bytes).await?;
    Ok(bytes)
}

/// Split each image into page-shaped bands.
///
/// The outer error covers invalid options; each band carries its own result
/// so one failed extraction does not hide the others.
pub async fn split_image(
    paths: &[PathBuf],
    options: &SplitOptions,
) -> Result<Vec<Result<TileRegion>>> {
    options.validate()?;

    if let Some(dir) = &options.output_path {
        tokio::fs::create_dir_all(dir).await?;
    }

    let paths = paths.to_vec();
    let options = options.clone();
    tokio::task::spawn_blocking(move || {
        let raster = ImageCodec::new();
        split_images(
            &raster,
            &paths,
            options.split_width,
            options.split_height,
            options.output_path.as_deref(),
        )
    })
    .await?
}

/// Slice images into bands shaped like the output page and place each band
/// on its own page, then write the document to `output_path`.
pub async fn image_to_paginated_document(
    paths: &[PathBuf],
    output_path: impl AsRef<Path>,
    options: &ImageDocumentOptions,
) -> Result<Vec<u8>> {
    options.validate()?;

    let split = SplitOptions::for_paper(options.page_size);
    let tiles = split_image(paths, &split)
        .await?
        .into_iter()
        .map(|region| {
            let region = region?;
            match region.content.as_bytes() {
                Some(bytes) => Ok(bytes.to_vec()),
                None => Err(BookletError::Codec(format!(
                    "band {} of image {} was not returned in memory",
                    region.band_index, region.source_index
                ))),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let page_size = options.page_size.page_size(Orientation::Portrait);
    let bytes = tokio::task::spawn_blocking(move || {
        let codec = LopdfCodec;
        let mut doc = compose_tiles(&codec, &tiles, page_size)?;
        codec.save(&mut doc)
    })
    .await??;

    write_output(Some(output_path.as_ref()), &bytes).await?;
    Ok(bytes)
}
