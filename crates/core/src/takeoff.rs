//! Page-level takeoff: section frames, their station labels and the ranked
//! polylines inside each one.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::frames::{FrameSettings, detect_section_frames};
use crate::geometry::Rect;
use crate::polyline::{Polyline, PolylineSettings, polylines_in_rect};
use crate::source::{DrawingSource, WordSource};
use crate::station::frame_label;

pub(crate) const DEFAULT_SECTION_MIN_LENGTH: f64 = 120.0;
pub(crate) const DEFAULT_MAX_POLYLINES: usize = 12;

/// Placeholder shown for a frame without a station label.
pub const NO_STATION: &str = "NO STATION FOUND";

#[derive(Clone, Debug, PartialEq)]
pub struct TakeoffSettings {
    pub frames: FrameSettings,
    pub polylines: PolylineSettings,
    /// Keep at most this many polylines per section; `None` keeps all.
    pub max_polylines: Option<usize>,
}

impl Default for TakeoffSettings {
    fn default() -> Self {
        Self {
            frames: FrameSettings::default(),
            polylines: PolylineSettings {
                min_length: DEFAULT_SECTION_MIN_LENGTH,
                ..Default::default()
            },
            max_polylines: Some(DEFAULT_MAX_POLYLINES),
        }
    }
}

impl TakeoffSettings {
    pub fn validate(&self) -> Result<()> {
        self.frames.validate()?;
        self.polylines.validate()
    }
}

/// One detected cross-section.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// 1-based position, top to bottom.
    pub number: usize,
    pub frame: Rect,
    pub station: Option<String>,
    /// Longest first.
    pub polylines: Vec<Polyline>,
}

impl Section {
    pub fn title(&self) -> String {
        format!(
            "Section {}: {}",
            self.number,
            self.station.as_deref().unwrap_or(NO_STATION)
        )
    }

    /// Label of the polyline at `rank` (0-based), e.g. `S2-P1 L=340`.
    pub fn polyline_label(&self, rank: usize) -> Option<String> {
        let poly = self.polylines.get(rank)?;
        Some(format!(
            "S{}-P{} L={:.0}",
            self.number,
            rank + 1,
            poly.length()
        ))
    }
}

/// Run the full takeoff on one page.
///
/// Frames come from the page's station labels; an empty result means no
/// station was found. Drawings are fetched once and each frame is
/// reconstructed independently on the rayon pool, order preserved.
pub fn extract_sections<P>(
    page: &P,
    page_width: f64,
    page_height: f64,
    settings: &TakeoffSettings,
) -> std::result::Result<Vec<Section>, <P as WordSource>::Error>
where
    P: WordSource + DrawingSource<Error = <P as WordSource>::Error> + ?Sized,
{
    let frames = detect_section_frames(page, page_width, page_height, &settings.frames)?;
    if frames.is_empty() {
        debug!("no station labels; no sections");
        return Ok(Vec::new());
    }

    let labels = frames
        .iter()
        .map(|frame| frame_label(page, frame))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let drawings = page.drawings()?;

    let polylines: Vec<Vec<Polyline>> = frames
        .par_iter()
        .map(|frame| {
            let mut polys = polylines_in_rect(&drawings, frame, &settings.polylines);
            if let Some(max) = settings.max_polylines {
                polys.truncate(max);
            }
            polys
        })
        .collect();

    Ok(frames
        .into_iter()
        .zip(labels)
        .zip(polylines)
        .enumerate()
        .map(|(i, ((frame, station), polylines))| Section {
            number: i + 1,
            frame,
            station,
            polylines,
        })
        .collect())
}

/// Plain-text report of detected sections and their polyline labels.
pub fn format_summary(sections: &[Section]) -> String {
    let mut out = format!("Detected {} frame(s)\n", sections.len());
    for section in sections {
        let f = section.frame;
        out.push_str(&format!(
            "{} [{:.0}, {:.0}, {:.0}, {:.0}]\n",
            section.title(),
            f.x0,
            f.y0,
            f.x1,
            f.y1
        ));
        for label in (0..section.polylines.len()).filter_map(|rank| section.polyline_label(rank)) {
            out.push_str(&format!("  {}\n", label));
        }
    }
    out
}
