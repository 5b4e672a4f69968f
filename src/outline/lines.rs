//! Line aggregation: spans sharing an exact `(page, y)` key become one line.

use std::collections::BTreeMap;

use crate::model::{Line, Span};

/// Collapse every whitespace run into a single space and trim both ends.
///
/// Case is left untouched. Applying it twice gives the same result as once.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct LineAccumulator {
    text: String,
    size: f64,
    bold: bool,
    y: f64,
}

/// Group spans into lines, ordered by `(page, y)`.
///
/// Span texts are concatenated in collection order without separators; the
/// line takes the largest span size and is bold if any span is. Lines whose
/// cleaned text is empty are dropped.
pub fn aggregate_lines(spans: &[Span]) -> Vec<Line> {
    let mut groups: BTreeMap<(u32, i64), LineAccumulator> = BTreeMap::new();
    for span in spans {
        let acc = groups.entry(span.line_key()).or_default();
        acc.text.push_str(&span.text);
        if span.size > acc.size {
            acc.size = span.size;
        }
        acc.bold |= span.bold;
        acc.y = span.y;
    }

    let lines: Vec<Line> = groups
        .into_iter()
        .filter_map(|((page, _), acc)| {
            let text = clean_text(&acc.text);
            (!text.is_empty()).then_some(Line {
                text,
                size: acc.size,
                bold: acc.bold,
                page,
                y: acc.y,
            })
        })
        .collect();

    log::debug!("Aggregated {} spans into {} lines", spans.len(), lines.len());
    lines
}
