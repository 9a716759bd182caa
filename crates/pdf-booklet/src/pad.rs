//! Page-count padding
//!
//! Brings a document's page count up to a multiple of `times` by inserting
//! blank (or filler) pages at a chosen position.

use crate::codec::{DocumentCodec, Placeable};
use crate::types::{BookletError, DrawOptions, PageSize, Result};

/// Parameters of one padding run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddingSpec {
    /// Target multiple, at least 1
    pub times: usize,
    /// Where to insert; negative counts from the end, `None` appends
    pub insert_index: Option<i64>,
    /// Size of the pages that are added
    pub page_size: PageSize,
}

/// What a padding run will do to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingPlan {
    pub source_pages: usize,
    pub pages_needed: usize,
    /// Resolved insertion index, within `0..=source_pages`
    pub insert_at: usize,
}

impl PaddingPlan {
    pub fn padded_pages(&self) -> usize {
        self.source_pages + self.pages_needed
    }
}

/// Number of pages missing to reach the next multiple of `times`
pub fn pages_needed(page_count: usize, times: usize) -> usize {
    match page_count % times {
        0 => 0,
        rem => times - rem,
    }
}

/// Compute the padding arithmetic without touching a document.
///
/// A negative `insert_index` counts from the end (`-1` is before the last
/// page). The resolved index is clamped to `0..=page_count`.
pub fn plan_padding(page_count: usize, times: usize, insert_index: Option<i64>) -> Result<PaddingPlan> {
    if times == 0 {
        return Err(BookletError::Config(
            "Target page multiple must be at least 1".to_string(),
        ));
    }

    let count = page_count as i64;
    let resolved = match insert_index {
        None => count,
        Some(index) if index < 0 => count + index,
        Some(index) => index,
    };
    let insert_at = resolved.clamp(0, count);
    if insert_at != resolved {
        log::warn!(
            "insert index {} resolves to {} outside 0..={}, clamping to {}",
            insert_index.unwrap_or_default(),
            resolved,
            page_count,
            insert_at
        );
    }

    Ok(PaddingPlan {
        source_pages: page_count,
        pages_needed: pages_needed(page_count, times),
        insert_at: insert_at as usize,
    })
}

/// Pad `doc` in place to a multiple of `spec.times`.
///
/// With a `filler` document each added page carries the filler's first page
/// drawn at the origin; without one the pages only hold an invisible line.
///
/// Every added page is inserted at the same resolved index, so the pages end
/// up in reverse creation order at that position.
pub fn pad_document<C: DocumentCodec>(
    codec: &C,
    doc: &mut C::Document,
    filler: Option<&C::Document>,
    spec: &PaddingSpec,
) -> Result<PaddingPlan> {
    let plan = plan_padding(codec.page_count(doc), spec.times, spec.insert_index)?;
    log::debug!(
        "padding {} pages to a multiple of {}: adding {} at index {}",
        plan.source_pages,
        spec.times,
        plan.pages_needed,
        plan.insert_at
    );

    if plan.pages_needed == 0 {
        return Ok(plan);
    }

    if let Some(filler) = filler {
        if codec.page_count(filler) == 0 {
            return Err(BookletError::Codec("filler document has no pages".to_string()));
        }
    }

    let mut scratch = codec.create();
    // One embedded copy of the filler is shared by every added page
    let filler = filler
        .map(|filler| codec.embed_page(&mut scratch, filler, 0))
        .transpose()?;
    for _ in 0..plan.pages_needed {
        let page = codec.add_page(&mut scratch, spec.page_size)?;
        match &filler {
            Some(xobject) => {
                let size = xobject.size();
                codec.draw(&mut scratch, page, xobject, DrawOptions::at(0.0, 0.0, size))?;
            }
            None => codec.draw_invisible_line(&mut scratch, page)?,
        }
    }

    let indices: Vec<usize> = (0..plan.pages_needed).collect();
    let copied = codec.copy_pages(&scratch, doc, &indices)?;
    for page in copied {
        codec.insert_page(doc, plan.insert_at, page)?;
    }

    Ok(plan)
}
