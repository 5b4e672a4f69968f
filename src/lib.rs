//! # pdf-outline
//!
//! Heading outline extraction from PDF documents.
//!
//! The library reads text runs with their typography from each page, folds
//! them into lines and paragraphs, classifies paragraphs as headings by
//! font size and a set of semantic filters, and builds a nested outline.
//! The result is a title plus a flat, document-ordered list of headings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{outline_from_file, render, JsonFormat};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let doc = outline_from_file("document.pdf")?;
//!     println!("Title: {}", doc.title);
//!
//!     let json = render::to_json(&doc, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Backend boundary**: any renderer can feed the pipeline through [`PageSource`]
//! - **Tunable classification**: size bands and denylist are plain data in [`OutlineOptions`]
//! - **Batch processing**: bounded Rayon worker pool for directories of PDFs
//! - **Stable output**: `{"title", "outline": [{"level", "text", "page"}]}` JSON

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{find_pdfs, process_batch, process_batch_with_progress, BatchOutcome};
pub use detect::{is_pdf, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    FlatEntry, HeadingCandidate, HeadingLevel, Line, OutlineDocument, OutlineNode, Paragraph,
    Section, Span,
};
pub use outline::{extract_outline, extract_outline_tree};
pub use parser::{
    BatchOptions, JsonPageSource, LopdfBackend, OutlineOptions, PageSelection, PageSource,
    SizeBand,
};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
///
/// # Example
///
/// ```no_run
/// use pdf_outline::outline_from_file;
///
/// let doc = outline_from_file("document.pdf").unwrap();
/// for entry in &doc.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_from_file<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    outline_from_file_with_options(path, &OutlineOptions::default())
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{outline_from_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().strict().with_max_level(2);
/// let doc = outline_from_file_with_options("document.pdf", &options).unwrap();
/// ```
pub fn outline_from_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<OutlineDocument> {
    let backend = LopdfBackend::open(path)?;
    extract_outline(&backend, options)
}

/// Extract the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::outline_from_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let doc = outline_from_bytes(&data).unwrap();
/// ```
pub fn outline_from_bytes(data: &[u8]) -> Result<OutlineDocument> {
    let backend = LopdfBackend::from_bytes(data)?;
    extract_outline(&backend, &OutlineOptions::default())
}

/// Builder for extracting outlines.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{HeadingLevel, OutlineExtractor};
///
/// let result = OutlineExtractor::new()
///     .strict()
///     .with_max_level(3)
///     .deny("confidential")
///     .extract("document.pdf")?;
///
/// println!("{}", result.to_json(pdf_outline::JsonFormat::Compact)?);
/// let top = result.sections(HeadingLevel::H1, HeadingLevel::H2);
/// # Ok::<(), pdf_outline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: OutlineOptions,
}

impl OutlineExtractor {
    /// Create a new extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject sentence-like paragraphs as well.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Keep only levels up to `level`.
    pub fn with_max_level(mut self, level: u8) -> Self {
        self.options = self.options.with_max_level(level);
        self
    }

    /// Replace the size-band table.
    pub fn with_bands(mut self, bands: Vec<SizeBand>) -> Self {
        self.options = self.options.with_bands(bands);
        self
    }

    /// Add a boilerplate phrase to the denylist.
    pub fn deny(mut self, phrase: impl Into<String>) -> Self {
        self.options = self.options.deny(phrase);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Current options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract from a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<OutlineResult> {
        let backend = LopdfBackend::open(path)?;
        self.extract_source(&backend)
    }

    /// Extract from a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<OutlineResult> {
        let backend = LopdfBackend::from_bytes(data)?;
        self.extract_source(&backend)
    }

    /// Extract from any page source.
    pub fn extract_source<S: PageSource + ?Sized>(&self, source: &S) -> Result<OutlineResult> {
        let tree = extract_outline_tree(source, &self.options)?;
        let title = outline::resolve_title(&tree);
        let flat = outline::flatten_outline(&tree, &title);
        Ok(OutlineResult {
            page_count: source.page_count(),
            tree,
            document: OutlineDocument {
                title,
                outline: flat,
            },
        })
    }
}

/// Result of an extraction, keeping both the tree and its flattened form.
#[derive(Debug, Clone)]
pub struct OutlineResult {
    /// Pages in the source document
    pub page_count: u32,
    /// Nested outline forest
    pub tree: Vec<OutlineNode>,
    /// Title and flat outline
    pub document: OutlineDocument,
}

impl OutlineResult {
    /// Resolved title (empty when none was found).
    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Headings between `min` and `max` inclusive, in document order.
    pub fn sections(&self, min: HeadingLevel, max: HeadingLevel) -> Vec<Section> {
        outline::sections(&self.tree, min, max)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Take the emitted document.
    pub fn into_document(self) -> OutlineDocument {
        self.document
    }
}
