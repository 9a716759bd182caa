//! Printer's-signature page order for two-up booklets

/// One output sheet of a booklet: the source pages drawn on its left and right halves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetPair {
    /// 1-based sheet number
    pub sheet: usize,
    /// 0-based source page index drawn on the left
    pub left: usize,
    /// 0-based source page index drawn on the right
    pub right: usize,
}

/// Pair pages outer-to-inner for a document of `page_count` pages.
///
/// Sheet `n` holds pages `n - 1` and `page_count - n`. Odd sheets put the back
/// page on the left, even sheets put it on the right, so eight pages come out
/// as `(8,1) (2,7) (6,3) (4,5)` in 1-based numbering. A trailing unpaired page
/// of an odd count is ignored; callers pad to even first.
pub fn booklet_order(page_count: usize) -> Vec<SheetPair> {
    (1..=page_count / 2)
        .map(|sheet| {
            let start = sheet - 1;
            let end = page_count - sheet;
            let (left, right) = if sheet % 2 == 1 {
                (end, start)
            } else {
                (start, end)
            };
            SheetPair { sheet, left, right }
        })
        .collect()
}
