//! Segment, polyline and settings types for polyline reconstruction.

use itertools::Itertools;

use crate::error::{Result, TakeoffError};
use crate::geometry::{Point, distance};

pub(crate) const DEFAULT_ENDPOINT_TOLERANCE: f64 = 2.0;
pub(crate) const DEFAULT_MIN_LENGTH: f64 = 80.0;

/// A raw straight piece between two endpoints.
///
/// Curves contribute the chord between their first and last control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }
}

/// A connected chain of points built from merged segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    length: f64,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        let length = polyline_length(&points);
        Self { points, length }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Sum of the distances between consecutive points.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Total length of a point chain.
pub fn polyline_length(points: &[Point]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| distance(*a, *b))
        .sum()
}

/// Parameters for polyline reconstruction.
#[derive(Clone, Debug, PartialEq)]
pub struct PolylineSettings {
    /// Endpoints closer than this are treated as the same point; also the
    /// quantization step of the endpoint index.
    pub endpoint_tol: f64,
    /// Polylines shorter than this are dropped.
    pub min_length: f64,
}

impl Default for PolylineSettings {
    fn default() -> Self {
        Self {
            endpoint_tol: DEFAULT_ENDPOINT_TOLERANCE,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PolylineSettings {
    pub fn new(endpoint_tol: f64, min_length: f64) -> Self {
        Self {
            endpoint_tol,
            min_length,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint_tol.is_finite() && self.endpoint_tol > 0.0) {
            return Err(TakeoffError::InvalidSettings {
                name: "endpoint_tol",
                value: self.endpoint_tol,
            });
        }
        if !(self.min_length.is_finite() && self.min_length >= 0.0) {
            return Err(TakeoffError::InvalidSettings {
                name: "min_length",
                value: self.min_length,
            });
        }
        Ok(())
    }
}
