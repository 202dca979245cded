//! Word and drawing sources.
//!
//! The core never parses PDF content itself. Text tokens and vector paths are
//! pulled from a page through the two traits below; whatever error the
//! implementation reports is returned to the caller untouched.

use std::convert::Infallible;

use crate::geometry::{Point, Rect};

/// A text token with its bounding box, in reading order.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: Rect,
}

impl Word {
    pub fn new(text: impl Into<String>, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// Path operator of a drawing item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOp {
    /// `"l"`: straight line.
    Line,
    /// `"c"`: cubic Bézier.
    Curve,
    /// Any other operator (`"re"`, `"qu"`, ...); never turned into segments.
    Other(String),
}

impl PathOp {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "l" => PathOp::Line,
            "c" => PathOp::Curve,
            other => PathOp::Other(other.to_string()),
        }
    }
}

/// One operand of a path item: either a bare coordinate or an (x, y) pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Scalar(f64),
    Point(Point),
}

/// A single path item of a drawing.
///
/// Sources emit two encodings for the same geometry: flat scalars
/// (`"l", x1, y1, x2, y2`) or point pairs (`"l", (x1, y1), (x2, y2)`).
/// Both are kept as-is here and decoded during segment collection.
#[derive(Clone, Debug, PartialEq)]
pub struct PathItem {
    pub op: PathOp,
    pub operands: Vec<Operand>,
}

impl PathItem {
    pub fn new(op: PathOp, operands: Vec<Operand>) -> Self {
        Self { op, operands }
    }

    /// Line item in the flat scalar encoding.
    pub fn line(a: Point, b: Point) -> Self {
        Self::new(
            PathOp::Line,
            vec![
                Operand::Scalar(a.0),
                Operand::Scalar(a.1),
                Operand::Scalar(b.0),
                Operand::Scalar(b.1),
            ],
        )
    }

    /// Curve item in the point-pair encoding.
    pub fn curve(p1: Point, p2: Point, p3: Point, p4: Point) -> Self {
        Self::new(
            PathOp::Curve,
            vec![
                Operand::Point(p1),
                Operand::Point(p2),
                Operand::Point(p3),
                Operand::Point(p4),
            ],
        )
    }

    /// Number of fields including the operator tag.
    pub fn field_count(&self) -> usize {
        self.operands.len() + 1
    }
}

/// A vector drawing: an optional bounding box and its ordered path items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drawing {
    pub rect: Option<Rect>,
    pub items: Vec<PathItem>,
}

impl Drawing {
    pub fn new(rect: Option<Rect>, items: Vec<PathItem>) -> Self {
        Self { rect, items }
    }
}

/// Supplies the text tokens of a page, optionally restricted to a clip region.
pub trait WordSource {
    type Error;

    fn words(&self, clip: Option<&Rect>) -> Result<Vec<Word>, Self::Error>;
}

/// Supplies the vector drawings of a page.
pub trait DrawingSource {
    type Error;

    fn drawings(&self) -> Result<Vec<Drawing>, Self::Error>;
}

/// A fully materialized page held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryPage {
    pub width: f64,
    pub height: f64,
    pub words: Vec<Word>,
    pub drawings: Vec<Drawing>,
}

impl MemoryPage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    pub fn with_drawings(mut self, drawings: Vec<Drawing>) -> Self {
        self.drawings = drawings;
        self
    }
}

impl WordSource for MemoryPage {
    type Error = Infallible;

    /// Words whose bbox intersects `clip`, in stored order.
    fn words(&self, clip: Option<&Rect>) -> Result<Vec<Word>, Infallible> {
        Ok(match clip {
            None => self.words.clone(),
            Some(clip) => self
                .words
                .iter()
                .filter(|w| w.bbox.intersects(clip))
                .cloned()
                .collect(),
        })
    }
}

impl DrawingSource for MemoryPage {
    type Error = Infallible;

    fn drawings(&self) -> Result<Vec<Drawing>, Infallible> {
        Ok(self.drawings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_keeps_intersecting_words_in_order() {
        let page = MemoryPage::new(100.0, 100.0).with_words(vec![
            Word::new("a", Rect::new(0.0, 0.0, 5.0, 5.0)),
            Word::new("b", Rect::new(50.0, 50.0, 60.0, 55.0)),
            Word::new("c", Rect::new(8.0, 2.0, 12.0, 6.0)),
        ]);
        let clip = Rect::new(4.0, 0.0, 10.0, 10.0);
        let texts: Vec<String> = page
            .words(Some(&clip))
            .unwrap()
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(page.words(None).unwrap().len(), 3);
    }

    #[test]
    fn path_op_tags() {
        assert_eq!(PathOp::from_tag("l"), PathOp::Line);
        assert_eq!(PathOp::from_tag("c"), PathOp::Curve);
        assert_eq!(PathOp::from_tag("re"), PathOp::Other("re".to_string()));
    }

    #[test]
    fn field_count_includes_tag() {
        assert_eq!(PathItem::line((0.0, 0.0), (1.0, 1.0)).field_count(), 5);
        let c = PathItem::curve((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0));
        assert_eq!(c.field_count(), 5);
    }
}
