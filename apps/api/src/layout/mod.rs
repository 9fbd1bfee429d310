// Pagination: fixed A4 page metrics, content-height measurement, and the
// page-break overlay derived from the resulting page count.

pub mod handlers;
pub mod measurer;
pub mod overlay;
pub mod page_metrics;

pub use measurer::{ContentMeasurer, ReportedRegion};
pub use overlay::{PaginationOverlay, RenderMode};
