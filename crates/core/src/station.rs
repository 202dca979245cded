//! Station label detection.
//!
//! Cross-section sheets tag each stacked section with its station, written
//! as three digits, a plus sign and two digits (`445+00`). Only that exact
//! shape is recognized, matched at the start of a word.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::geometry::Rect;
use crate::source::WordSource;

/// Station label pattern, anchored at the start of the token only.
pub const STATION_PATTERN: &str = r"^\d{3}\+\d{2}";

static STATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STATION_PATTERN).expect("station pattern compiles"));

/// A word recognized as a station label.
#[derive(Clone, Debug, PartialEq)]
pub struct StationHit {
    pub text: String,
    pub bbox: Rect,
}

/// True if `text` starts with a station number.
pub fn is_station_label(text: &str) -> bool {
    STATION_RE.is_match(text)
}

/// Every station label in the page (or in `clip`), in word scan order.
pub fn find_stations<W: WordSource + ?Sized>(
    source: &W,
    clip: Option<&Rect>,
) -> Result<Vec<StationHit>, W::Error> {
    let hits: Vec<StationHit> = source
        .words(clip)?
        .into_iter()
        .filter(|w| is_station_label(&w.text))
        .map(|w| StationHit {
            text: w.text,
            bbox: w.bbox,
        })
        .collect();
    debug!(count = hits.len(), clipped = clip.is_some(), "station labels found");
    Ok(hits)
}

/// The station naming a frame: the right-most label inside it.
///
/// Labels sit at the trailing edge of each section, so the hit with the
/// greatest `x1` wins; ties keep scan order.
pub fn frame_label<W: WordSource + ?Sized>(
    source: &W,
    frame: &Rect,
) -> Result<Option<String>, W::Error> {
    let hits = find_stations(source, Some(frame))?;
    let mut best: Option<StationHit> = None;
    for hit in hits {
        match &best {
            Some(b) if b.bbox.x1 >= hit.bbox.x1 => {}
            _ => best = Some(hit),
        }
    }
    Ok(best.map(|h| h.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_label_shapes() {
        assert!(is_station_label("445+00"));
        assert!(is_station_label("445+005"));
        assert!(is_station_label("445+00extra"));
        assert!(!is_station_label("45+00"));
        assert!(!is_station_label("1445+00"));
        assert!(!is_station_label("STA 445+00"));
        assert!(!is_station_label("445+0"));
        assert!(!is_station_label(""));
    }
}
