//! Span collection: backend geometry → [`Span`] records.

use crate::model::Span;
use crate::parser::{OutlineOptions, PageSource, RawSpan};

/// Normalize one backend run.
///
/// Missing size or bounding box default to 0, missing flags to not bold.
pub fn span_from_raw(raw: &RawSpan, page: u32) -> Span {
    Span::new(
        raw.text.clone(),
        raw.size.unwrap_or(0.0),
        page,
        raw.top().unwrap_or(0.0),
        raw.is_bold(),
    )
}

/// Emit a span for every run on every selected page, in renderer order.
///
/// Nothing is filtered here, empty runs included. A page that cannot be
/// decoded is skipped with a warning; the document itself was already
/// opened successfully.
pub fn collect_spans<S>(source: &S, options: &OutlineOptions) -> Vec<Span>
where
    S: PageSource + ?Sized,
{
    let mut spans = Vec::new();
    for page_num in 1..=source.page_count() {
        if !options.pages.includes(page_num) {
            continue;
        }
        match source.page(page_num) {
            Ok(page) => spans.extend(page.spans().map(|raw| span_from_raw(raw, page_num))),
            Err(e) => log::warn!("Skipping page {}: {}", page_num, e),
        }
    }
    log::debug!("Collected {} spans", spans.len());
    spans
}
