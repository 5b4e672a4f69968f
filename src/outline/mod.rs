//! Outline extraction pipeline.
//!
//! Stages run strictly in order, each consuming the previous stage's
//! output:
//!
//! 1. [`collect_spans`]: backend geometry → spans
//! 2. [`aggregate_lines`]: spans sharing a `(page, y)` key → lines
//! 3. [`merge_paragraphs`]: continuation lines → paragraphs
//! 4. [`classify_headings`]: paragraphs → leveled heading candidates
//! 5. [`build_tree`]: candidates → nested outline forest
//! 6. [`resolve_title`] and [`flatten_outline`]: forest → emitted document

mod classify;
mod collect;
mod flatten;
mod lines;
mod paragraphs;
mod tree;

pub use classify::{
    assign_level, classify_headings, is_likely_heading, is_semantic_heading, is_valid_title,
};
pub use collect::{collect_spans, span_from_raw};
pub use flatten::{flatten_outline, resolve_title, sections};
pub use lines::{aggregate_lines, clean_text};
pub use paragraphs::{merge_paragraphs, starts_new_paragraph};
pub use tree::build_tree;

use crate::error::Result;
use crate::model::{OutlineDocument, OutlineNode};
use crate::parser::{OutlineOptions, PageSource};

/// Run the pipeline up to the outline forest.
pub fn extract_outline_tree<S>(source: &S, options: &OutlineOptions) -> Result<Vec<OutlineNode>>
where
    S: PageSource + ?Sized,
{
    options.validate()?;

    let spans = collect_spans(source, options);
    let lines = aggregate_lines(&spans);
    let paragraphs = merge_paragraphs(lines, options.merge_size_tolerance);
    let candidates = classify_headings(paragraphs, options);
    let tree = build_tree(&candidates);

    log::debug!("Built outline with {} root headings", tree.len());
    Ok(tree)
}

/// Run the whole pipeline and produce the emitted `{title, outline}` document.
pub fn extract_outline<S>(source: &S, options: &OutlineOptions) -> Result<OutlineDocument>
where
    S: PageSource + ?Sized,
{
    let tree = extract_outline_tree(source, options)?;
    let title = resolve_title(&tree);
    let outline = flatten_outline(&tree, &title);
    Ok(OutlineDocument { title, outline })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::HeadingLevel;
    use crate::parser::{JsonPageSource, RawBlock, RawLine, RawPage, RawSpan, SizeBand};

    fn span(text: &str, size: f64, y: f64) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            size: Some(size),
            bbox: Some([72.0, y, 300.0, y + size]),
            flags: Some(0),
        }
    }

    fn page(spans: Vec<RawSpan>) -> RawPage {
        RawPage {
            blocks: vec![RawBlock {
                lines: spans.into_iter().map(|s| RawLine { spans: vec![s] }).collect(),
            }],
        }
    }

    fn introduction() -> JsonPageSource {
        JsonPageSource::new(vec![page(vec![
            span("1. Introduction", 20.0, 100.0),
            span("This is body text.", 11.0, 120.0),
            span("1.1 Background", 16.0, 140.0),
        ])])
    }

    #[test]
    fn test_introduction_strict() {
        let tree = extract_outline_tree(&introduction(), &OutlineOptions::new().strict()).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].text, "1. Introduction");
        assert_eq!(tree[0].level, HeadingLevel::H1);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].text, "1.1 Background");
        assert_eq!(tree[0].children[0].level, HeadingLevel::H2);
    }

    #[test]
    fn test_introduction_default_keeps_banded_sentence() {
        let tree = extract_outline_tree(&introduction(), &OutlineOptions::default()).unwrap();

        let children: Vec<_> = tree[0]
            .children
            .iter()
            .map(|c| (c.level, c.text.as_str()))
            .collect();
        assert_eq!(
            children,
            vec![
                (HeadingLevel::H3, "This is body text."),
                (HeadingLevel::H2, "1.1 Background"),
            ]
        );
    }

    #[test]
    fn test_extract_outline_document() {
        let doc = extract_outline(&introduction(), &OutlineOptions::new().strict()).unwrap();
        assert_eq!(doc.title, "1. Introduction");
        assert_eq!(doc.outline.len(), 1);
        assert_eq!(doc.outline[0].text, "1.1 Background");
        assert_eq!(doc.outline[0].page, 1);
    }

    #[test]
    fn test_empty_document() {
        let doc = extract_outline(&JsonPageSource::default(), &OutlineOptions::default()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_invalid_options_fail_fast() {
        let options = OutlineOptions::new().with_bands(vec![SizeBand::new(0, 1.0, 2.0)]);
        let err = extract_outline(&introduction(), &options).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
    }

    #[test]
    fn test_split_runs_join_into_one_heading() {
        let source = JsonPageSource::new(vec![RawPage {
            blocks: vec![RawBlock {
                lines: vec![RawLine {
                    spans: vec![span("Quarterly ", 22.0, 80.0), span("Results Review", 22.0, 80.0)],
                }],
            }],
        }]);
        let doc = extract_outline(&source, &OutlineOptions::default()).unwrap();
        assert_eq!(doc.title, "Quarterly Results Review");
        assert!(doc.outline.is_empty());
    }
}
