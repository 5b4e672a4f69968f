//! Text-geometry records: spans, lines and paragraphs.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Round to one decimal place.
///
/// Applied to font sizes and vertical positions coming from the rendering
/// backend so that floating-point jitter does not split a line in two.
/// Rounding is correct for the exact binary value with ties to even, so
/// `140.25` becomes `140.2` and `0.45` (stored slightly above) becomes `0.5`.
pub(crate) fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scaled = value * 10.0;
    // Exact error of the multiplication above.
    let residual = value.mul_add(10.0, -scaled);
    let floor = scaled.floor();
    let tenths = match (scaled - floor).partial_cmp(&0.5) {
        Some(Ordering::Less) => floor,
        Some(Ordering::Greater) => floor + 1.0,
        _ if residual > 0.0 => floor + 1.0,
        _ if residual < 0.0 => floor,
        _ if floor % 2.0 == 0.0 => floor,
        _ => floor + 1.0,
    };
    tenths / 10.0
}

/// A single styled text run, normalized from backend geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Raw run text, unfiltered (may be empty)
    pub text: String,
    /// Font size in points, rounded to 0.1
    pub size: f64,
    /// Page number (1-indexed)
    pub page: u32,
    /// Top of the run's bounding box, rounded to 0.1
    pub y: f64,
    /// Whether the run is set in a bold weight
    pub bold: bool,
}

impl Span {
    /// Create a span, rounding size and position.
    pub fn new(text: impl Into<String>, size: f64, page: u32, y: f64, bold: bool) -> Self {
        Self {
            text: text.into(),
            size: round1(size),
            page,
            y: round1(y),
            bold,
        }
    }

    /// Grouping key: page plus the vertical position in tenths of a point.
    pub(crate) fn line_key(&self) -> (u32, i64) {
        (self.page, (self.y * 10.0).round() as i64)
    }
}

/// All spans sharing one exact `(page, y)` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Concatenated, whitespace-normalized text
    pub text: String,
    /// Largest span size in the line
    pub size: f64,
    /// True if any span is bold
    pub bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Vertical position shared by all spans
    pub y: f64,
}

/// One or more consecutive lines merged by continuation heuristics.
///
/// `size`, `bold`, `page` and `y` always describe the first line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub size: f64,
    pub bold: bool,
    pub page: u32,
    pub y: f64,
}

impl Paragraph {
    /// Append a continuation line, leaving the typographic fields untouched.
    pub fn append(&mut self, line: &Line) {
        self.text.push(' ');
        self.text.push_str(&line.text);
    }
}

impl From<Line> for Paragraph {
    fn from(line: Line) -> Self {
        Self {
            text: line.text,
            size: line.size,
            bold: line.bold,
            page: line.page,
            y: line.y,
        }
    }
}
