//! Rendering backend abstraction layer.
//!
//! The outline pipeline only sees [`RawPage`] geometry through the
//! [`PageSource`] trait, so any renderer able to report text runs with a
//! font size, a bounding box and style flags can feed it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Style-flag bit marking a bold run.
pub const FLAG_BOLD: u32 = 1 << 4;

/// A text run as reported by the renderer.
///
/// Missing fields are tolerated: the collector treats them as size 0,
/// y 0 and not bold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub size: Option<f64>,
    /// `[x0, y0, x1, y1]` with y growing downward from the top of the page
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub flags: Option<u32>,
}

impl RawSpan {
    /// Top edge of the bounding box.
    pub fn top(&self) -> Option<f64> {
        self.bbox.map(|b| b[1])
    }

    /// Check the bold bit of the style flags.
    pub fn is_bold(&self) -> bool {
        self.flags.unwrap_or(0) & FLAG_BOLD != 0
    }
}

/// A renderer-level line of runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

/// A renderer-level block of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

/// All text blocks of one page, in renderer order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

impl RawPage {
    /// Iterate over every run on the page in block → line → span order.
    pub fn spans(&self) -> impl Iterator<Item = &RawSpan> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
    }
}

/// Abstract interface for page geometry access.
///
/// Implementations must be usable from several threads at once when shared
/// by reference; the pipeline never mutates a source.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Geometry of one page (1-indexed).
    fn page(&self, page_num: u32) -> Result<RawPage>;
}

/// Replayable page geometry, e.g. captured from another renderer.
///
/// Expected shape: `{"pages": [{"blocks": [{"lines": [{"spans": [...]}]}]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonPageSource {
    #[serde(default)]
    pub pages: Vec<RawPage>,
}

impl JsonPageSource {
    /// Build a source from pages already in memory.
    pub fn new(pages: Vec<RawPage>) -> Self {
        Self { pages }
    }

    /// Load a geometry dump from a file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::unreadable(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::unreadable(path, e))
    }

    /// Load a geometry dump from a reader.
    pub fn load_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a geometry dump from a string.
    pub fn load_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

impl PageSource for JsonPageSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, page_num: u32) -> Result<RawPage> {
        if page_num == 0 {
            return Err(Error::PageOutOfRange(page_num, self.page_count()));
        }
        self.pages
            .get((page_num - 1) as usize)
            .cloned()
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))
    }
}

/// Simple text decoding fallback when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
