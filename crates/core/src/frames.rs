//! Section framing.
//!
//! Sheets stack several cross-sections vertically, each with a station label
//! near its trailing edge. The typical vertical pitch between labels gives a
//! section height; every label then gets a full-width band of that height
//! centred on it, and near-duplicate bands are folded together.

use itertools::Itertools;
use tracing::debug;

use crate::error::{Result, TakeoffError};
use crate::geometry::Rect;
use crate::station::{StationHit, find_stations};
use crate::source::WordSource;

pub(crate) const DEFAULT_MARGIN_LEFT: f64 = 0.03;
pub(crate) const DEFAULT_MARGIN_RIGHT: f64 = 0.02;
pub(crate) const DEFAULT_MIN_SECTION_HEIGHT: f64 = 200.0;
pub(crate) const DEFAULT_SPACING_SCALE: f64 = 0.9;
pub(crate) const DEFAULT_FALLBACK_DIVISOR: f64 = 3.0;
pub(crate) const DEFAULT_MERGE_OVERLAP_RATIO: f64 = 0.4;

/// Parameters for turning station hits into section frames.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSettings {
    /// Left margin as a fraction of the page width.
    pub margin_left: f64,
    /// Right margin as a fraction of the page width.
    pub margin_right: f64,
    /// Lower bound for the derived section height, in page units.
    pub min_section_height: f64,
    /// Factor applied to the median label spacing.
    pub spacing_scale: f64,
    /// With fewer than two labels the height is `page_height / fallback_divisor`.
    pub fallback_divisor: f64,
    /// Frames merge when their overlap exceeds this fraction of the smaller one.
    pub merge_overlap_ratio: f64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            margin_left: DEFAULT_MARGIN_LEFT,
            margin_right: DEFAULT_MARGIN_RIGHT,
            min_section_height: DEFAULT_MIN_SECTION_HEIGHT,
            spacing_scale: DEFAULT_SPACING_SCALE,
            fallback_divisor: DEFAULT_FALLBACK_DIVISOR,
            merge_overlap_ratio: DEFAULT_MERGE_OVERLAP_RATIO,
        }
    }
}

impl FrameSettings {
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &'static str, value: f64| {
            if (0.0..1.0).contains(&value) {
                Ok(())
            } else {
                Err(TakeoffError::InvalidSettings { name, value })
            }
        };
        unit("margin_left", self.margin_left)?;
        unit("margin_right", self.margin_right)?;
        if self.margin_left + self.margin_right >= 1.0 {
            return Err(TakeoffError::InvalidSettings {
                name: "margin_left + margin_right",
                value: self.margin_left + self.margin_right,
            });
        }
        if !(self.min_section_height.is_finite() && self.min_section_height >= 0.0) {
            return Err(TakeoffError::InvalidSettings {
                name: "min_section_height",
                value: self.min_section_height,
            });
        }
        if !(self.spacing_scale.is_finite() && self.spacing_scale > 0.0) {
            return Err(TakeoffError::InvalidSettings {
                name: "spacing_scale",
                value: self.spacing_scale,
            });
        }
        if !(self.fallback_divisor.is_finite() && self.fallback_divisor > 0.0) {
            return Err(TakeoffError::InvalidSettings {
                name: "fallback_divisor",
                value: self.fallback_divisor,
            });
        }
        if !(0.0..=1.0).contains(&self.merge_overlap_ratio) {
            return Err(TakeoffError::InvalidSettings {
                name: "merge_overlap_ratio",
                value: self.merge_overlap_ratio,
            });
        }
        Ok(())
    }
}

/// Height of one section band.
///
/// `tops` are the label top coordinates sorted ascending. The spacing proxy
/// is the element at index `len / 2` of the sorted consecutive deltas; without
/// any delta the page is assumed to hold `fallback_divisor` sections.
pub fn section_height(tops: &[f64], page_height: f64, settings: &FrameSettings) -> f64 {
    let mut deltas: Vec<f64> = tops.iter().tuple_windows().map(|(a, b)| b - a).collect();
    if deltas.is_empty() {
        return page_height / settings.fallback_divisor;
    }
    deltas.sort_by(|a, b| a.total_cmp(b));
    let median = deltas[deltas.len() / 2];
    settings
        .min_section_height
        .max(median * settings.spacing_scale)
}

/// One frame per hit, sorted top to bottom, before deduplication.
pub fn build_frames(
    hits: &[StationHit],
    page_width: f64,
    page_height: f64,
    settings: &FrameSettings,
) -> Vec<Rect> {
    if hits.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&StationHit> = hits.iter().collect();
    sorted.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    let tops: Vec<f64> = sorted.iter().map(|h| h.bbox.y0).collect();
    let height = section_height(&tops, page_height, settings);
    debug!(
        stations = sorted.len(),
        section_height = height,
        "section height inferred"
    );

    let x0 = page_width * settings.margin_left;
    let x1 = page_width - page_width * settings.margin_right;

    let mut frames: Vec<Rect> = sorted
        .iter()
        .map(|hit| {
            let yc = hit.bbox.y_center();
            let y0 = (yc - height / 2.0).max(0.0);
            let y1 = (yc + height / 2.0).min(page_height);
            Rect { x0, y0, x1, y1 }
        })
        .collect();
    frames.sort_by(|a, b| a.y0.total_cmp(&b.y0));
    frames
}

/// Fold each frame into its predecessor when they overlap heavily.
///
/// Frames are walked top to bottom; a frame whose intersection with the last
/// kept frame exceeds `ratio` times the smaller area replaces it with their
/// union, otherwise it is kept as a new frame.
pub fn merge_frames(mut frames: Vec<Rect>, ratio: f64) -> Vec<Rect> {
    frames.sort_by(|a, b| a.y0.total_cmp(&b.y0));
    let mut merged: Vec<Rect> = Vec::with_capacity(frames.len());
    for frame in frames {
        if let Some(prev) = merged.last_mut()
            && let Some(overlap) = prev.intersection(&frame)
            && overlap.area() > ratio * prev.area().min(frame.area())
        {
            *prev = prev.union(&frame);
            continue;
        }
        merged.push(frame);
    }
    merged
}

/// Detect the section frames of a page, top to bottom.
///
/// An empty result means no station label was found on the page.
pub fn detect_section_frames<W: WordSource + ?Sized>(
    source: &W,
    page_width: f64,
    page_height: f64,
    settings: &FrameSettings,
) -> std::result::Result<Vec<Rect>, W::Error> {
    let hits = find_stations(source, None)?;
    let frames = build_frames(&hits, page_width, page_height, settings);
    let candidates = frames.len();
    let merged = merge_frames(frames, settings.merge_overlap_ratio);
    debug!(candidates, frames = merged.len(), "section frames built");
    Ok(merged)
}
