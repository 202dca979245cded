//! Endpoint index keyed by tolerance-quantized coordinates.

use rustc_hash::FxHashMap;

use crate::geometry::Point;

use super::types::Segment;

/// A point snapped to the tolerance grid, as integer multiples of the step.
///
/// Integer keys keep hashing and equality exact; two points share a key
/// exactly when their coordinates round to the same multiple of the step.
pub type EndpointKey = (i64, i64);

/// Round one coordinate to the nearest multiple of `tol`, ties to even.
#[inline]
pub fn quantize(value: f64, tol: f64) -> i64 {
    (value / tol).round_ties_even() as i64
}

/// Quantized key of a point.
#[inline]
pub fn endpoint_key(p: Point, tol: f64) -> EndpointKey {
    (quantize(p.0, tol), quantize(p.1, tol))
}

/// Multi-map from quantized endpoint to the segments touching it.
///
/// Every segment is registered under both of its endpoints, `a` first, in
/// segment order, so each bucket lists indices in insertion order.
#[derive(Debug, Default)]
pub struct EndpointIndex {
    tol: f64,
    buckets: FxHashMap<EndpointKey, Vec<usize>>,
}

impl EndpointIndex {
    pub fn build(segments: &[Segment], tol: f64) -> Self {
        let mut buckets: FxHashMap<EndpointKey, Vec<usize>> = FxHashMap::default();
        for (idx, seg) in segments.iter().enumerate() {
            buckets.entry(endpoint_key(seg.a, tol)).or_default().push(idx);
            buckets.entry(endpoint_key(seg.b, tol)).or_default().push(idx);
        }
        Self { tol, buckets }
    }

    /// Segment indices registered under the bucket containing `p`.
    pub fn candidates(&self, p: Point) -> &[usize] {
        self.buckets
            .get(&endpoint_key(p, self.tol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
