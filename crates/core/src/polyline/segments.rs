//! Segment collection from drawing path items.

use tracing::debug;

use crate::geometry::{Point, Rect};
use crate::source::{Drawing, Operand, PathItem, PathOp};

use super::types::Segment;

/// Decode `n` points from a path item's operands.
///
/// Accepts either `2 * n` scalars or `n` point pairs; anything else
/// (wrong count, mixed encodings) yields `None`.
fn decode_points(operands: &[Operand], n: usize) -> Option<Vec<Point>> {
    if operands.len() == 2 * n {
        operands
            .chunks_exact(2)
            .map(|pair| match pair {
                [Operand::Scalar(x), Operand::Scalar(y)] => Some((*x, *y)),
                _ => None,
            })
            .collect()
    } else if operands.len() == n {
        operands
            .iter()
            .map(|op| match op {
                Operand::Point(p) => Some(*p),
                Operand::Scalar(_) => None,
            })
            .collect()
    } else {
        None
    }
}

/// The segment contributed by a single path item, if any.
///
/// Lines give their two endpoints. Curves give the chord from the first to
/// the fourth control point; the inner control points are dropped.
pub fn item_segment(item: &PathItem) -> Option<Segment> {
    match item.op {
        PathOp::Line => {
            let pts = decode_points(&item.operands, 2)?;
            Some(Segment::new(pts[0], pts[1]))
        }
        PathOp::Curve => {
            let pts = decode_points(&item.operands, 4)?;
            Some(Segment::new(pts[0], pts[3]))
        }
        PathOp::Other(_) => None,
    }
}

/// Collect the raw segments of every drawing whose rect intersects `region`.
///
/// Drawings without a rect and undecodable items are skipped silently.
/// The rect test is closed, so a lone horizontal or vertical stroke (an empty
/// bbox) still counts when it touches `region`.
/// Segments come out in drawing order, then item order.
pub fn collect_segments(drawings: &[Drawing], region: &Rect) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut skipped_items = 0usize;
    let mut skipped_drawings = 0usize;

    for drawing in drawings {
        let Some(rect) = drawing.rect else {
            skipped_drawings += 1;
            continue;
        };
        if !rect.intersects(region) {
            continue;
        }
        for item in &drawing.items {
            match item_segment(item) {
                Some(seg) => segments.push(seg),
                None if matches!(item.op, PathOp::Other(_)) => {}
                None => skipped_items += 1,
            }
        }
    }

    debug!(
        segments = segments.len(),
        skipped_items, skipped_drawings, "segments collected"
    );
    segments
}
