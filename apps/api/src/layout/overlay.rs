//! Page-break decorations for the interactive preview. Derived entirely from
//! the page count; nothing here holds state.

use serde::{Deserialize, Serialize};

use crate::layout::page_metrics::{
    page_break_position, MAX_PAGES, PAGE_GAP, PAGE_HEIGHT, PAGE_WIDTH,
};

/// Where the resume is being drawn. Export output never carries decorations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    #[default]
    Preview,
    Export,
}

/// Dashed marker between two pages, positioned in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreakMarker {
    /// Zero-based break index; break `i` separates page `i + 1` from page `i + 2`.
    pub index: u32,
    pub top_px: u32,
}

/// Background sheet for one page, offset by the gaps above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSheet {
    /// One-based page number.
    pub page: u32,
    pub top_px: u32,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOverlay {
    pub total_pages: u32,
    /// Height of the whole preview column, sheets plus the gaps between them.
    /// Zero when there is nothing to draw.
    pub preview_height_px: u32,
    pub breaks: Vec<PageBreakMarker>,
    pub sheets: Vec<PageSheet>,
}

impl PaginationOverlay {
    /// Builds the decorations for `total_pages` pages, clamped to `1..=MAX_PAGES`.
    pub fn derive(total_pages: u32, mode: RenderMode) -> Self {
        let total_pages = total_pages.clamp(1, MAX_PAGES);
        if mode == RenderMode::Export {
            return Self {
                total_pages,
                preview_height_px: 0,
                breaks: Vec::new(),
                sheets: Vec::new(),
            };
        }

        let breaks = (0..total_pages - 1)
            .map(|index| PageBreakMarker {
                index,
                top_px: page_break_position(index),
            })
            .collect();

        let sheets = (0..total_pages)
            .map(|i| PageSheet {
                page: i + 1,
                top_px: i.saturating_mul(PAGE_HEIGHT + PAGE_GAP),
                width_px: PAGE_WIDTH,
                height_px: PAGE_HEIGHT,
            })
            .collect();

        Self {
            total_pages,
            preview_height_px: preview_height(total_pages),
            breaks,
            sheets,
        }
    }
}

fn preview_height(total_pages: u32) -> u32 {
    total_pages
        .saturating_mul(PAGE_HEIGHT)
        .saturating_add((total_pages - 1).saturating_mul(PAGE_GAP))
}
