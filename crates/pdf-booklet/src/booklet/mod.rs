//! Booklet imposition - two source pages per landscape sheet
//!
//! 1. Pad the source to an even page count
//! 2. Pair pages outer-to-inner in signature order
//! 3. Draw each pair side by side on a new sheet

mod order;

pub use order::{SheetPair, booklet_order};

use crate::codec::{DocumentCodec, Placeable};
use crate::constants::PAGES_PER_SHEET;
use crate::pad::{PaddingSpec, pad_document};
use crate::types::{DrawOptions, PageSize, Result};

/// Parameters of one booklet run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookletSpec {
    /// Output sheet size, already in landscape
    pub sheet_size: PageSize,
    /// Passed through to the padding step
    pub insert_index: Option<i64>,
    /// Size of pages added by the padding step
    pub blank_page_size: PageSize,
}

/// Pad `source` to even in place, then impose it into a new document.
///
/// Pages are drawn at native size: the left page at the sheet origin, the
/// right page flush with the sheet's right edge.
pub fn impose_document<C: DocumentCodec>(
    codec: &C,
    source: &mut C::Document,
    filler: Option<&C::Document>,
    spec: &BookletSpec,
) -> Result<C::Document> {
    let padding = PaddingSpec {
        times: PAGES_PER_SHEET,
        insert_index: spec.insert_index,
        page_size: spec.blank_page_size,
    };
    let plan = pad_document(codec, source, filler, &padding)?;

    let mut output = codec.create();
    for pair in booklet_order(plan.padded_pages()) {
        log::debug!(
            "sheet {}: pages {} | {}",
            pair.sheet,
            pair.left + 1,
            pair.right + 1
        );

        let page = codec.add_page(&mut output, spec.sheet_size)?;
        let left = codec.embed_page(&mut output, source, pair.left)?;
        let right = codec.embed_page(&mut output, source, pair.right)?;

        codec.draw(&mut output, page, &left, DrawOptions::at(0.0, 0.0, left.size()))?;

        let right_size = right.size();
        let right_x = spec.sheet_size.width - right_size.width;
        codec.draw(&mut output, page, &right, DrawOptions::at(right_x, 0.0, right_size))?;
    }

    Ok(output)
}
