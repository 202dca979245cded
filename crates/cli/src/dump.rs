//! JSON page dumps.
//!
//! A dump carries what a PDF toolkit reports for each page: its size, the
//! word list (`[x0, y0, x1, y1, text, ...]`, extra trailing fields ignored)
//! and the vector drawings (`{"rect": [x0, y0, x1, y1] | null, "items": [...]}`),
//! where each item is `["l", x1, y1, x2, y2]`, `["l", [x1, y1], [x2, y2]]`,
//! `["c", ...]` and so on. Either `{"pages": [...]}` or a single page object
//! is accepted.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use xstakeoff_core::{Drawing, MemoryPage, Operand, PathItem, PathOp, Rect, TakeoffError, Word};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Dump {
    Document { pages: Vec<PageDump> },
    Page(PageDump),
}

#[derive(Debug, Deserialize)]
pub struct PageDump {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub words: Vec<Vec<Value>>,
    #[serde(default)]
    pub drawings: Vec<DrawingDump>,
}

#[derive(Debug, Deserialize)]
pub struct DrawingDump {
    #[serde(default)]
    pub rect: Option<Vec<f64>>,
    #[serde(default)]
    pub items: Vec<Vec<Value>>,
}

impl Dump {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(TakeoffError::Io)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn into_pages(self) -> Vec<PageDump> {
        match self {
            Dump::Document { pages } => pages,
            Dump::Page(page) => vec![page],
        }
    }

    /// Select one page (0-based) and materialize it.
    pub fn into_page(self, index: usize) -> Result<MemoryPage> {
        let mut pages = self.into_pages();
        let count = pages.len();
        if index >= count {
            return Err(TakeoffError::PageOutOfRange { index, count }.into());
        }
        pages.swap_remove(index).into_memory_page()
    }
}

impl PageDump {
    pub fn into_memory_page(self) -> Result<MemoryPage> {
        let words = self
            .words
            .into_iter()
            .enumerate()
            .map(|(i, fields)| parse_word(&fields).with_context(|| format!("word {}", i)))
            .collect::<Result<Vec<_>>>()?;

        let mut dropped = 0usize;
        let drawings: Vec<Drawing> = self
            .drawings
            .into_iter()
            .map(|d| {
                let rect = d.rect.as_deref().and_then(parse_rect);
                let items: Vec<PathItem> = d
                    .items
                    .iter()
                    .filter_map(|fields| {
                        let item = parse_item(fields);
                        if item.is_none() {
                            dropped += 1;
                        }
                        item
                    })
                    .collect();
                Drawing::new(rect, items)
            })
            .collect();
        debug!(
            words = words.len(),
            drawings = drawings.len(),
            dropped_items = dropped,
            "page dump loaded"
        );

        Ok(MemoryPage::new(self.width, self.height)
            .with_words(words)
            .with_drawings(drawings))
    }
}

fn parse_rect(v: &[f64]) -> Option<Rect> {
    match v {
        [x0, y0, x1, y1] => Some(Rect::new(*x0, *y0, *x1, *y1)),
        _ => None,
    }
}

fn parse_word(fields: &[Value]) -> Result<Word> {
    if fields.len() < 5 {
        bail!("expected at least 5 fields, got {}", fields.len());
    }
    let mut coords = [0.0f64; 4];
    for (slot, field) in coords.iter_mut().zip(fields) {
        *slot = field
            .as_f64()
            .ok_or_else(|| TakeoffError::InvalidInput(format!("non-numeric coordinate {}", field)))?;
    }
    let text = fields[4]
        .as_str()
        .ok_or_else(|| TakeoffError::InvalidInput(format!("non-string text {}", fields[4])))?;
    let [x0, y0, x1, y1] = coords;
    Ok(Word::new(text, Rect::new(x0, y0, x1, y1)))
}

fn parse_operand(v: &Value) -> Option<Operand> {
    if let Some(x) = v.as_f64() {
        return Some(Operand::Scalar(x));
    }
    match v.as_array()?.as_slice() {
        [x, y] => Some(Operand::Point((x.as_f64()?, y.as_f64()?))),
        _ => None,
    }
}

/// Decode one path item; `None` when the tag or an operand is unreadable.
fn parse_item(fields: &[Value]) -> Option<PathItem> {
    let (tag, rest) = fields.split_first()?;
    let op = PathOp::from_tag(tag.as_str()?);
    let operands = rest.iter().map(parse_operand).collect::<Option<Vec<_>>>()?;
    Some(PathItem::new(op, operands))
}
