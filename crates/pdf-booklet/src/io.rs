//! Document I/O operations

use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let bytes = read_input(path.as_ref()).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save a document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, BookletError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Read an input file, reporting a missing file before any other work
pub(crate) async fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !tokio::fs::try_exists(path).await? {
        return Err(BookletError::InputNotFound(path.to_owned()));
    }
    Ok(tokio::fs::read(path).await?)
}

/// Read the optional filler document. A filler path that does not exist is
/// skipped with a warning and blank pages are used instead.
pub(crate) async fn read_filler(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !tokio::fs::try_exists(path).await? {
        log::warn!(
            "filler page {} does not exist, padding with blank pages",
            path.display()
        );
        return Ok(None);
    }
    Ok(Some(tokio::fs::read(path).await?))
}

/// Write `bytes` to `path` when one is given
pub(crate) async fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    if let Some(path) = path {
        tokio::fs::write(path, bytes).await?;
        log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    }
    Ok(())
}
