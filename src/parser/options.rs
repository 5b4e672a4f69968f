//! Extraction options and classification tables.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::model::HeadingLevel;

/// Boilerplate substrings that disqualify a paragraph from being a heading.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "please ",
    "thank you",
    "copyright",
    "all rights",
    "phone:",
    "email:",
    "address:",
];

/// Upper bound of assumed body-text size, in points.
pub const DEFAULT_BODY_TEXT_MAX: f64 = 12.0;

/// A font-size band mapped to a heading level (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBand {
    pub level: u8,
    pub min: f64,
    pub max: f64,
}

impl SizeBand {
    pub const fn new(level: u8, min: f64, max: f64) -> Self {
        Self { level, min, max }
    }

    /// Check if a font size falls inside this band.
    pub fn contains(&self, size: f64) -> bool {
        self.min <= size && size <= self.max
    }
}

/// Point-size bands, checked in ascending level order. Overlaps are resolved
/// in favor of the lower level number.
pub const DEFAULT_SIZE_BANDS: &[SizeBand] = &[
    SizeBand::new(1, 18.0, 36.0),
    SizeBand::new(2, 14.0, 18.0),
    SizeBand::new(3, 11.0, 16.0),
];

/// Options for outline extraction.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Size bands for level assignment
    pub heading_bands: Vec<SizeBand>,

    /// Bold paragraphs larger than this become H4 when no band matches
    pub body_text_max: f64,

    /// Lowercase substrings rejected by the semantic filter
    pub denylist: Vec<String>,

    /// Largest size difference that still lets two lines merge
    pub merge_size_tolerance: f64,

    /// Also reject sentence-like text (trailing `.`, `?`, `!`, long runs of digits)
    pub reject_sentences: bool,

    /// Deepest level kept in the outline (1-4)
    pub max_level: u8,

    /// Pages to read (1-indexed)
    pub pages: PageSelection,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the size-band table.
    pub fn with_bands(mut self, bands: Vec<SizeBand>) -> Self {
        self.heading_bands = bands;
        self
    }

    /// Set the body-text size ceiling used by the bold H4 fallback.
    pub fn with_body_text_max(mut self, size: f64) -> Self {
        self.body_text_max = size;
        self
    }

    /// Add a boilerplate substring to the denylist.
    pub fn deny(mut self, phrase: impl Into<String>) -> Self {
        self.denylist.push(phrase.into().to_lowercase());
        self
    }

    /// Set the size tolerance for paragraph merging.
    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.merge_size_tolerance = tolerance;
        self
    }

    /// Enable the stricter sentence filter.
    pub fn strict(mut self) -> Self {
        self.reject_sentences = true;
        self
    }

    /// Set the deepest outline level (clamped to 1-4).
    pub fn with_max_level(mut self, level: u8) -> Self {
        self.max_level = level.clamp(1, HeadingLevel::MAX);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Check the options for contradictions.
    pub fn validate(&self) -> Result<()> {
        for band in &self.heading_bands {
            if !(1..=HeadingLevel::MAX).contains(&band.level) {
                return Err(Error::InvalidOptions(format!(
                    "band level {} outside 1..={}",
                    band.level,
                    HeadingLevel::MAX
                )));
            }
            if band.min > band.max {
                return Err(Error::InvalidOptions(format!(
                    "band for level {} is inverted ({} > {})",
                    band.level, band.min, band.max
                )));
            }
        }
        if self.merge_size_tolerance < 0.0 {
            return Err(Error::InvalidOptions(
                "merge tolerance must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            heading_bands: DEFAULT_SIZE_BANDS.to_vec(),
            body_text_max: DEFAULT_BODY_TEXT_MAX,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            merge_size_tolerance: 1.0,
            reject_sentences: false,
            max_level: HeadingLevel::MAX,
            pages: PageSelection::All,
        }
    }
}

/// Options for processing many documents at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Number of documents processed concurrently
    pub jobs: usize,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count (at least 1).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5-7").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidOptions(format!("invalid page selection: {:?}", s));

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| invalid())?;
                let end: u32 = end.trim().parse().map_err(|_| invalid())?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',').map(str::trim) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start: u32 = start.trim().parse().map_err(|_| invalid())?;
                    let end: u32 = end.trim().parse().map_err(|_| invalid())?;
                    pages.extend(start..=end);
                }
                None => pages.push(part.parse().map_err(|_| invalid())?),
            }
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = OutlineOptions::default();
        assert_eq!(options.heading_bands.len(), 3);
        assert_eq!(options.heading_bands[0], SizeBand::new(1, 18.0, 36.0));
        assert_eq!(options.body_text_max, 12.0);
        assert_eq!(options.denylist.len(), 7);
        assert!(!options.reject_sentences);
        assert_eq!(options.max_level, 4);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_builder() {
        let options = OutlineOptions::new()
            .strict()
            .with_max_level(9)
            .deny("Confidential")
            .with_pages(PageSelection::Range(1..=3));

        assert!(options.reject_sentences);
        assert_eq!(options.max_level, 4);
        assert!(options.denylist.contains(&"confidential".to_string()));
        assert!(!options.pages.includes(4));
    }

    #[test]
    fn test_validate_rejects_bad_bands() {
        let inverted = OutlineOptions::new().with_bands(vec![SizeBand::new(1, 30.0, 20.0)]);
        assert!(matches!(
            inverted.validate(),
            Err(Error::InvalidOptions(_))
        ));

        let too_deep = OutlineOptions::new().with_bands(vec![SizeBand::new(5, 8.0, 9.0)]);
        assert!(too_deep.validate().is_err());

        let negative = OutlineOptions::new().with_merge_tolerance(-1.0);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_band_contains_is_inclusive() {
        let band = SizeBand::new(2, 14.0, 18.0);
        assert!(band.contains(14.0));
        assert!(band.contains(18.0));
        assert!(!band.contains(18.1));
    }

    #[test]
    fn test_batch_options() {
        assert_eq!(BatchOptions::default().jobs, 4);
        assert_eq!(BatchOptions::new().with_jobs(0).jobs, 1);
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("2-4").unwrap(),
            PageSelection::Range(2..=4)
        );
        assert_eq!(
            PageSelection::parse("1,3,5-7,3").unwrap(),
            PageSelection::Pages(vec![1, 3, 5, 6, 7])
        );
        assert!(PageSelection::parse("one").is_err());
    }
}
