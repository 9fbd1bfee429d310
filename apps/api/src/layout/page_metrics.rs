//! Fixed A4 page geometry in CSS pixels.
//!
//! All values are compile-time constants. The preview renders at 96 px per
//! inch; a page is 210mm × 297mm. `CONTENT_HEIGHT` is what remains after the
//! top and bottom margins and is the unit used to count pages.

use serde::Serialize;

/// CSS reference pixel density.
pub const PX_PER_INCH: u32 = 96;

/// A4 sheet, in tenths of a millimetre.
const A4_WIDTH_TENTHS_MM: u32 = 2100;
const A4_HEIGHT_TENTHS_MM: u32 = 2970;

/// Converts tenths of a millimetre to whole pixels, rounding to nearest.
pub const fn tenths_mm_to_px(tenths_mm: u32) -> u32 {
    (tenths_mm * PX_PER_INCH + 127) / 254
}

pub const PAGE_WIDTH: u32 = tenths_mm_to_px(A4_WIDTH_TENTHS_MM);
pub const PAGE_HEIGHT: u32 = tenths_mm_to_px(A4_HEIGHT_TENTHS_MM);

/// Top and bottom margin (half an inch).
pub const PAGE_MARGIN: u32 = PX_PER_INCH / 2;

pub const CONTENT_HEIGHT: u32 = PAGE_HEIGHT - 2 * PAGE_MARGIN;

/// Vertical gap between page sheets in the interactive preview.
pub const PAGE_GAP: u32 = 32;

/// Upper bound on the page count. Taller content is clamped to this many pages.
pub const MAX_PAGES: u32 = 500;

/// Tallest content height that still fits in `MAX_PAGES` pages.
pub const MAX_CONTENT_HEIGHT: u32 = MAX_PAGES * CONTENT_HEIGHT;

const _: () = assert!(0 < CONTENT_HEIGHT && CONTENT_HEIGHT < PAGE_HEIGHT);
// Every sheet offset and break position for MAX_PAGES pages fits in a u32.
const _: () = assert!(
    (MAX_PAGES as u64) * ((PAGE_HEIGHT + PAGE_GAP) as u64) <= u32::MAX as u64
);

/// Snapshot of the page constants, for clients that lay out their own preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub page_width: u32,
    pub page_height: u32,
    pub content_height: u32,
    pub margin: u32,
    pub page_gap: u32,
}

pub const A4: PageMetrics = PageMetrics {
    page_width: PAGE_WIDTH,
    page_height: PAGE_HEIGHT,
    content_height: CONTENT_HEIGHT,
    margin: PAGE_MARGIN,
    page_gap: PAGE_GAP,
};

/// Pixel offset of the `index`-th page break (0-based): `(index + 1) × PAGE_HEIGHT`.
/// Saturates at `u32::MAX`.
pub const fn page_break_position(index: u32) -> u32 {
    index.saturating_add(1).saturating_mul(PAGE_HEIGHT)
}

/// Number of pages needed to hold `height` pixels of content. Never less than one.
///
/// An exact multiple of `CONTENT_HEIGHT` does not spill onto an extra page.
/// Non-finite or negative heights count as empty content; the result never
/// exceeds `MAX_PAGES`.
pub fn pages_for_height(height: f64) -> u32 {
    if !height.is_finite() || height <= 0.0 {
        return 1;
    }
    let pages = (height / CONTENT_HEIGHT as f64).ceil();
    (pages.min(MAX_PAGES as f64) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_dimensions_at_96_dpi() {
        assert_eq!(PAGE_WIDTH, 794);
        assert_eq!(PAGE_HEIGHT, 1123);
        assert_eq!(CONTENT_HEIGHT, 1123 - 96);
    }

    #[test]
    fn test_first_break_is_one_page_down() {
        assert_eq!(page_break_position(0), PAGE_HEIGHT);
    }

    #[test]
    fn test_breaks_evenly_spaced_and_increasing() {
        for i in 0..50 {
            assert!(page_break_position(i) < page_break_position(i + 1));
            assert_eq!(
                page_break_position(i + 1) - page_break_position(i),
                PAGE_HEIGHT
            );
        }
    }

    #[test]
    fn test_pages_for_zero_height_is_one() {
        assert_eq!(pages_for_height(0.0), 1);
    }

    #[test]
    fn test_pages_for_fractional_heights() {
        let content = CONTENT_HEIGHT as f64;
        assert_eq!(pages_for_height(2.5 * content), 3);
        assert_eq!(pages_for_height(3.0 * content), 3);
        assert_eq!(pages_for_height(1.1 * content), 2);
    }

    #[test]
    fn test_exact_multiple_plus_epsilon_adds_page() {
        let content = CONTENT_HEIGHT as f64;
        for n in 1..6u32 {
            assert_eq!(pages_for_height(n as f64 * content), n);
            assert_eq!(pages_for_height(n as f64 * content + 0.5), n + 1);
        }
    }

    #[test]
    fn test_degenerate_heights_are_one_page() {
        assert_eq!(pages_for_height(-10.0), 1);
        assert_eq!(pages_for_height(f64::NAN), 1);
        assert_eq!(pages_for_height(f64::INFINITY), 1);
    }

    #[test]
    fn test_page_count_capped() {
        assert_eq!(pages_for_height(MAX_CONTENT_HEIGHT as f64), MAX_PAGES);
        assert_eq!(pages_for_height(MAX_CONTENT_HEIGHT as f64 + 1.0), MAX_PAGES);
        assert_eq!(pages_for_height(4.0e9), MAX_PAGES);
        assert_eq!(pages_for_height(1.0e300), MAX_PAGES);
    }

    #[test]
    fn test_break_position_saturates() {
        assert_eq!(page_break_position(u32::MAX), u32::MAX);
        assert_eq!(page_break_position(10_000_000), u32::MAX);
    }
}
