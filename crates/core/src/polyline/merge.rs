//! Chain merging of segments into polylines.
//!
//! Segments are owned by a flat slice and referenced by index; a sorted set
//! of unused indices tracks what is still available. Each chain starts from
//! the lowest unused index and grows forward from its `b` end, then backward
//! from its `a` end. At every step the first unused candidate in the endpoint
//! bucket is taken, in index order, even if a later candidate lies closer.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::geometry::{Point, distance};

use super::index::EndpointIndex;
use super::types::{Polyline, PolylineSettings, Segment};

struct ChainBuilder<'a> {
    segments: &'a [Segment],
    index: EndpointIndex,
    unused: BTreeSet<usize>,
    tol: f64,
}

impl<'a> ChainBuilder<'a> {
    fn new(segments: &'a [Segment], tol: f64) -> Self {
        Self {
            segments,
            index: EndpointIndex::build(segments, tol),
            unused: (0..segments.len()).collect(),
            tol,
        }
    }

    /// Take the first unused segment registered at `p`'s bucket.
    fn take_connected(&mut self, p: Point) -> Option<usize> {
        let idx = self
            .index
            .candidates(p)
            .iter()
            .copied()
            .find(|idx| self.unused.contains(idx))?;
        self.unused.remove(&idx);
        Some(idx)
    }

    /// Walk from `end`, pushing the far endpoint of each joined segment.
    ///
    /// A candidate whose endpoints are both farther than the tolerance is
    /// still consumed and stops the walk.
    fn extend(&mut self, mut end: Point, out: &mut Vec<Point>) {
        while let Some(idx) = self.take_connected(end) {
            let seg = self.segments[idx];
            let next = if distance(end, seg.a) <= self.tol {
                seg.b
            } else if distance(end, seg.b) <= self.tol {
                seg.a
            } else {
                break;
            };
            out.push(next);
            end = next;
        }
    }

    fn next_chain(&mut self) -> Option<Vec<Point>> {
        let seed = self.unused.pop_first()?;
        let Segment { a, b } = self.segments[seed];

        let mut chain = vec![a, b];
        self.extend(b, &mut chain);

        let mut prepend = Vec::new();
        self.extend(a, &mut prepend);

        if prepend.is_empty() {
            return Some(chain);
        }
        prepend.reverse();
        prepend.extend(chain);
        Some(prepend)
    }
}

/// Merge chains of endpoint-adjacent segments into polylines.
///
/// Returns every chain, unfiltered, in construction order.
pub fn merge_chains(segments: &[Segment], tol: f64) -> Vec<Polyline> {
    let mut builder = ChainBuilder::new(segments, tol);
    let mut chains = Vec::new();
    while let Some(points) = builder.next_chain() {
        trace!(points = points.len(), "chain merged");
        chains.push(Polyline::new(points));
    }
    chains
}

/// Merge segments, drop polylines shorter than `min_length`, longest first.
///
/// Equal lengths keep construction order.
pub fn merge_segments(segments: &[Segment], settings: &PolylineSettings) -> Vec<Polyline> {
    if segments.is_empty() {
        return Vec::new();
    }
    let chains = merge_chains(segments, settings.endpoint_tol);
    let total = chains.len();
    let mut kept: Vec<Polyline> = chains
        .into_iter()
        .filter(|p| p.length() >= settings.min_length)
        .collect();
    kept.sort_by_key(|p| Reverse(OrderedFloat(p.length())));
    debug!(
        segments = segments.len(),
        chains = total,
        kept = kept.len(),
        "polylines merged"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_walk_is_prepended_in_order() {
        // seed is segment 0 in the middle; 1 and 2 hang off its a end
        let segments = vec![
            Segment::new((10.0, 0.0), (20.0, 0.0)),
            Segment::new((5.0, 0.0), (10.0, 0.0)),
            Segment::new((0.0, 0.0), (5.0, 0.0)),
        ];
        let chains = merge_chains(&segments, 1.0);
        assert_eq!(chains.len(), 1);
        assert_eq!(
            chains[0].points(),
            &[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (20.0, 0.0)]
        );
    }

    #[test]
    fn reversed_segment_joins_through_b_end() {
        let segments = vec![
            Segment::new((0.0, 0.0), (10.0, 0.0)),
            Segment::new((10.0, 10.0), (10.0, 0.0)),
        ];
        let chains = merge_chains(&segments, 1.0);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].points(), &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    }

    #[test]
    fn first_candidate_in_index_order_wins() {
        // two branches leave (10, 0); the lower index is followed
        let segments = vec![
            Segment::new((0.0, 0.0), (10.0, 0.0)),
            Segment::new((10.0, 0.0), (10.0, 50.0)),
            Segment::new((10.0, 0.0), (60.0, 0.0)),
        ];
        let chains = merge_chains(&segments, 1.0);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].points(), &[(0.0, 0.0), (10.0, 0.0), (10.0, 50.0)]);
        assert_eq!(chains[1].points(), &[(10.0, 0.0), (60.0, 0.0)]);
    }

    #[test]
    fn short_candidate_appends_its_b_end() {
        // both ends of segment 1 are within tolerance of (10, 0); a is matched
        let segments = vec![
            Segment::new((0.0, 0.0), (10.0, 0.0)),
            Segment::new((10.5, 0.0), (11.0, 0.0)),
        ];
        let chains = merge_chains(&segments, 2.0);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].points(), &[(0.0, 0.0), (10.0, 0.0), (11.0, 0.0)]);
    }

    #[test]
    fn bucket_mate_beyond_tolerance_is_consumed() {
        // (1.1, 1.1) and (2.9, 2.9) share bucket (1, 1) but lie 2.55 apart
        let segments = vec![
            Segment::new((-100.0, 1.1), (1.1, 1.1)),
            Segment::new((2.9, 2.9), (200.0, 2.9)),
        ];
        let chains = merge_chains(&segments, 2.0);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].points(), &[(-100.0, 1.1), (1.1, 1.1)]);

        let out = merge_segments(&segments, &PolylineSettings::new(2.0, 0.0));
        let lengths: Vec<f64> = out.iter().map(Polyline::length).collect();
        assert_eq!(lengths.len(), 1);
        assert!((lengths[0] - 101.1).abs() < 1e-9);
    }

    #[test]
    fn closed_loop_does_not_repeat_segments() {
        let segments = vec![
            Segment::new((0.0, 0.0), (10.0, 0.0)),
            Segment::new((10.0, 0.0), (10.0, 10.0)),
            Segment::new((10.0, 10.0), (0.0, 0.0)),
        ];
        let chains = merge_chains(&segments, 1.0);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 4);
        assert_eq!(chains[0].first(), chains[0].last());
    }

    #[test]
    fn ranking_is_stable_for_equal_lengths() {
        let segments = vec![
            Segment::new((0.0, 0.0), (10.0, 0.0)),
            Segment::new((0.0, 100.0), (10.0, 100.0)),
            Segment::new((0.0, 200.0), (30.0, 200.0)),
        ];
        let out = merge_segments(&segments, &PolylineSettings::new(1.0, 0.0));
        let starts: Vec<Point> = out.iter().filter_map(Polyline::first).collect();
        assert_eq!(starts, vec![(0.0, 200.0), (0.0, 0.0), (0.0, 100.0)]);
    }
}
