//! Heading classification.
//!
//! A paragraph becomes a heading candidate when it passes the semantic
//! filter and its typography maps to a level. The semantic filter is the
//! precision control; size bands only rank accepted candidates.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{HeadingCandidate, HeadingLevel, Paragraph};
use crate::parser::OutlineOptions;

/// Bullet markers that disqualify a heading.
const BULLET_PREFIXES: &[char] = &['•', '-', '*'];

/// Check whether text reads like a real heading rather than a label,
/// fragment or boilerplate line.
///
/// `denylist` entries are matched case-insensitively as substrings and are
/// expected in lowercase.
pub fn is_semantic_heading<S: AsRef<str>>(text: &str, denylist: &[S]) -> bool {
    let t = text.trim();
    let len = t.chars().count();

    if t.split_whitespace().count() < 2 {
        return false;
    }
    if t.chars().filter(|c| c.is_alphabetic()).count() < 8 {
        return false;
    }
    if !(8..=80).contains(&len) {
        return false;
    }
    match t.chars().next() {
        Some(c) if c.is_uppercase() || c.is_numeric() => {}
        _ => return false,
    }
    if t.ends_with(&[',', ';'][..]) || t.starts_with(BULLET_PREFIXES) {
        return false;
    }

    let alnum = t.chars().filter(|c| c.is_alphanumeric()).count();
    if (alnum as f64) / (len as f64) < 0.5 {
        return false;
    }

    let lower = t.to_lowercase();
    !denylist.iter().any(|phrase| lower.contains(phrase.as_ref()))
}

/// Stricter filter that also rejects sentences and numeric labels.
///
/// Applied only when [`OutlineOptions::reject_sentences`] is enabled.
pub fn is_likely_heading(text: &str) -> bool {
    static TRAILING_NUMBER: OnceLock<Regex> = OnceLock::new();
    static LONG_DIGITS: OnceLock<Regex> = OnceLock::new();
    let trailing_number = TRAILING_NUMBER.get_or_init(|| Regex::new(r"^\d+[^\w]*$").unwrap());
    let long_digits = LONG_DIGITS.get_or_init(|| Regex::new(r"\d{4,}").unwrap());

    let t = text.trim();
    if !t.chars().any(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if t.chars().count() > 150 || t.split_whitespace().count() > 15 {
        return false;
    }
    if t.ends_with(&['.', '?', '!'][..]) {
        return false;
    }
    if t.chars().count() >= 3 && t.chars().all(char::is_numeric) {
        return false;
    }
    !(long_digits.is_match(t) || trailing_number.is_match(t))
}

/// Check whether text is presentable as a document title.
///
/// Rejects contact lines, URLs, decorative separators and overlong text.
pub fn is_valid_title(text: &str) -> bool {
    static CONTACT_PREFIX: OnceLock<Regex> = OnceLock::new();
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    let contact_prefix = CONTACT_PREFIX
        .get_or_init(|| Regex::new(r"^(www\.|http|address:|phone:|email:|rsvp:)").unwrap());
    let separator = SEPARATOR.get_or_init(|| Regex::new(r"^[-=*_+#]{3,}$").unwrap());

    let t = text.trim();
    let len = t.chars().count();
    if len == 0 {
        return false;
    }

    let alnum = t.chars().filter(|c| c.is_alphanumeric()).count();
    if (alnum as f64) / (len as f64) < 0.7 {
        return false;
    }
    if contact_prefix.is_match(&t.to_lowercase()) || separator.is_match(t) {
        return false;
    }
    len <= 100 && t.split_whitespace().count() <= 12
}

/// Map a paragraph's typography to a heading level.
///
/// Bands are tried in order and the first match wins; a bold paragraph
/// above body-text size that matches no band becomes the deepest level.
pub fn assign_level(paragraph: &Paragraph, options: &OutlineOptions) -> Option<HeadingLevel> {
    let level = options
        .heading_bands
        .iter()
        .find(|band| band.contains(paragraph.size))
        .map(|band| band.level)
        .or_else(|| {
            (paragraph.bold && paragraph.size > options.body_text_max).then_some(HeadingLevel::MAX)
        })?;

    if level > options.max_level {
        return None;
    }
    HeadingLevel::try_from(level).ok()
}

/// Filter paragraphs down to heading candidates, ordered by `(page, y)`.
pub fn classify_headings(
    paragraphs: Vec<Paragraph>,
    options: &OutlineOptions,
) -> Vec<HeadingCandidate> {
    let paragraph_count = paragraphs.len();
    let mut candidates: Vec<HeadingCandidate> = paragraphs
        .into_iter()
        .filter(|p| is_semantic_heading(&p.text, &options.denylist))
        .filter(|p| !options.reject_sentences || is_likely_heading(&p.text))
        .filter_map(|paragraph| {
            assign_level(&paragraph, options).map(|level| HeadingCandidate { paragraph, level })
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.paragraph.page.cmp(&b.paragraph.page).then(
            a.paragraph
                .y
                .partial_cmp(&b.paragraph.y)
                .unwrap_or(Ordering::Equal),
        )
    });

    log::debug!(
        "Classified {} of {} paragraphs as headings",
        candidates.len(),
        paragraph_count
    );
    candidates
}
