//! xstakeoff - section framing and polyline reconstruction for roadway
//! cross-section sheets.
//!
//! A sheet stacks several cross-section drawings, each labelled with a
//! station such as `445+00`. [`frames`] turns the labels into one band per
//! section; [`polyline`] rebuilds connected polylines from the loose vector
//! segments inside a band. Text and vector paths come from the caller through
//! the traits in [`source`].

pub mod error;
pub mod frames;
pub mod geometry;
pub mod polyline;
pub mod source;
pub mod station;
pub mod takeoff;

pub use error::{Result, TakeoffError};
pub use frames::{FrameSettings, detect_section_frames};
pub use geometry::{Point, Rect};
pub use polyline::{Polyline, PolylineSettings, Segment, extract_polylines};
pub use source::{Drawing, DrawingSource, MemoryPage, Operand, PathItem, PathOp, Word, WordSource};
pub use station::{StationHit, find_stations};
pub use takeoff::{Section, TakeoffSettings, extract_sections};
