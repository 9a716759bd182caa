//! Shared constants for padding, imposition and tiling

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Fallback page width in points when a page has no MediaBox (A4)
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 595.28;

/// Fallback page height in points (A4)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 841.89;

/// Fallback page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Output
// =============================================================================

/// PDF version written for newly created documents
pub const PDF_VERSION: &str = "1.7";

/// Pages drawn side by side on each booklet sheet
pub const PAGES_PER_SHEET: usize = 2;

/// Resource name of the transparent graphics state used by blank marker pages
pub const BLANK_GSTATE_NAME: &str = "GSBlank";
