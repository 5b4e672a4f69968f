//! Data model for the outline pipeline.
//!
//! Spans, lines and paragraphs are transient values produced and consumed
//! inside a single extraction call. Outline nodes and flat entries are the
//! results handed back to callers.

mod outline;
mod text;

pub use outline::{FlatEntry, HeadingCandidate, HeadingLevel, OutlineDocument, OutlineNode, Section};
pub use text::{Line, Paragraph, Span};
