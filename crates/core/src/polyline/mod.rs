//! Polyline reconstruction.
//!
//! Vector drawings on cross-section sheets arrive as a soup of disconnected
//! line and curve pieces. This module gathers the pieces overlapping a
//! region, joins pieces whose endpoints coincide within a tolerance into
//! maximal polylines, and ranks the survivors by length.

mod index;
mod merge;
mod segments;
mod types;

pub use index::{EndpointIndex, EndpointKey, endpoint_key, quantize};
pub use merge::{merge_chains, merge_segments};
pub use segments::{collect_segments, item_segment};
pub use types::{Polyline, PolylineSettings, Segment, polyline_length};

use crate::geometry::Rect;
use crate::source::{Drawing, DrawingSource};

/// Reconstruct ranked polylines from already fetched drawings.
pub fn polylines_in_rect(
    drawings: &[Drawing],
    region: &Rect,
    settings: &PolylineSettings,
) -> Vec<Polyline> {
    let segments = collect_segments(drawings, region);
    merge_segments(&segments, settings)
}

/// Reconstruct ranked polylines for `region` from a drawing source.
///
/// The list is sorted longest first and holds only polylines of at least
/// `settings.min_length`; it is empty when the region has no segments.
pub fn extract_polylines<D: DrawingSource + ?Sized>(
    source: &D,
    region: &Rect,
    settings: &PolylineSettings,
) -> Result<Vec<Polyline>, D::Error> {
    let drawings = source.drawings()?;
    Ok(polylines_in_rect(&drawings, region, settings))
}
