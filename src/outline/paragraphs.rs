//! Paragraph merging: fold consecutive lines into paragraphs.

use crate::model::{Line, Paragraph};

/// Characters that close a paragraph when they end the accumulated text.
const TERMINATORS: &[char] = &['.', ':', '•', '-', '?', '!'];

/// Bullet markers that open a new paragraph.
const BULLETS: &[char] = &['•', '-'];

/// Size in whole tenths of a point, matching the rounding applied to spans.
fn tenths(size: f64) -> i64 {
    (size * 10.0).round() as i64
}

/// Check whether `next` must start a new paragraph after `current`.
///
/// A line opens a new paragraph when it starts with an uppercase letter, a
/// bullet, or any Unicode digit (`char::is_numeric`).
pub fn starts_new_paragraph(current: &Paragraph, next: &Line, size_tolerance: f64) -> bool {
    if current.text.ends_with(TERMINATORS) {
        return true;
    }

    if let Some(first) = next.text.chars().next() {
        if first.is_uppercase() || first.is_numeric() || BULLETS.contains(&first) {
            return true;
        }
    }

    next.page != current.page
        || (tenths(next.size) - tenths(current.size)).abs() > tenths(size_tolerance)
        || next.bold != current.bold
}

/// Merge lines (already ordered by `(page, y)`) into paragraphs.
///
/// A merged-in line only contributes its text; size, weight and position
/// stay those of the paragraph's first line.
pub fn merge_paragraphs(lines: Vec<Line>, size_tolerance: f64) -> Vec<Paragraph> {
    let line_count = lines.len();
    let mut paragraphs = Vec::new();
    let mut current: Option<Paragraph> = None;

    for line in lines {
        match current.as_mut() {
            Some(acc) if !starts_new_paragraph(acc, &line, size_tolerance) => acc.append(&line),
            _ => {
                if let Some(done) = current.replace(Paragraph::from(line)) {
                    paragraphs.push(done);
                }
            }
        }
    }
    paragraphs.extend(current);

    log::debug!(
        "Merged {} lines into {} paragraphs",
        line_count,
        paragraphs.len()
    );
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, size: f64, bold: bool, page: u32, y: f64) -> Line {
        Line {
            text: text.to_string(),
            size,
            bold,
            page,
            y,
        }
    }

    fn texts(paragraphs: &[Paragraph]) -> Vec<&str> {
        paragraphs.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_lowercase_continuation_merges() {
        let paragraphs = merge_paragraphs(
            vec![
                line("The results of the survey", 11.0, false, 1, 100.0),
                line("were published in spring", 11.0, false, 1, 114.0),
            ],
            1.0,
        );
        assert_eq!(
            texts(&paragraphs),
            vec!["The results of the survey were published in spring"]
        );
    }

    #[test]
    fn test_terminators_break() {
        for end in [".", ":", "•", "-", "?", "!"] {
            let paragraphs = merge_paragraphs(
                vec![
                    line(&format!("first part{}", end), 11.0, false, 1, 10.0),
                    line("second part", 11.0, false, 1, 20.0),
                ],
                1.0,
            );
            assert_eq!(paragraphs.len(), 2, "terminator {:?}", end);
        }
    }

    #[test]
    fn test_uppercase_digit_and_bullet_break() {
        for start in ["Next", "2 items", "• item", "- item"] {
            let paragraphs = merge_paragraphs(
                vec![
                    line("running text", 11.0, false, 1, 10.0),
                    line(start, 11.0, false, 1, 20.0),
                ],
                1.0,
            );
            assert_eq!(paragraphs.len(), 2, "start {:?}", start);
        }
    }

    #[test]
    fn test_page_size_and_weight_break() {
        let base = line("running text", 11.0, false, 1, 700.0);
        let cases = [
            line("continues here", 11.0, false, 2, 40.0),
            line("continues here", 12.1, false, 1, 714.0),
            line("continues here", 11.0, true, 1, 714.0),
        ];
        for next in cases {
            let paragraphs = merge_paragraphs(vec![base.clone(), next], 1.0);
            assert_eq!(paragraphs.len(), 2);
        }

        // Exactly one point apart is still the same paragraph.
        let paragraphs = merge_paragraphs(
            vec![base, line("continues here", 12.0, false, 1, 714.0)],
            1.0,
        );
        assert_eq!(paragraphs.len(), 1);
    }

    #[test]
    fn test_one_point_gap_merges_at_any_size() {
        for (first, second) in [(11.0, 12.0), (15.2, 16.2), (7.1, 8.1), (31.4, 32.4), (16.2, 15.2)] {
            let paragraphs = merge_paragraphs(
                vec![
                    line("running text", first, false, 1, 10.0),
                    line("continues here", second, false, 1, 24.0),
                ],
                1.0,
            );
            assert_eq!(paragraphs.len(), 1, "{} -> {}", first, second);
        }

        let paragraphs = merge_paragraphs(
            vec![
                line("running text", 15.2, false, 1, 10.0),
                line("continues here", 16.3, false, 1, 24.0),
            ],
            1.0,
        );
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_unicode_digit_breaks() {
        let paragraphs = merge_paragraphs(
            vec![
                line("running text", 11.0, false, 1, 10.0),
                line("٣ items listed", 11.0, false, 1, 20.0),
            ],
            1.0,
        );
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_first_line_style_is_kept() {
        let paragraphs = merge_paragraphs(
            vec![
                line("annual report of", 14.0, false, 1, 50.0),
                line("the committee", 14.9, false, 1, 70.0),
            ],
            1.0,
        );
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].size, 14.0);
        assert_eq!(paragraphs[0].y, 50.0);
    }

    #[test]
    fn test_size_compared_against_first_line() {
        // 11 → 11.8 merges, then 12.6 is 1.6 away from the first line.
        let paragraphs = merge_paragraphs(
            vec![
                line("alpha", 11.0, false, 1, 10.0),
                line("beta", 11.8, false, 1, 20.0),
                line("gamma", 12.6, false, 1, 30.0),
            ],
            1.0,
        );
        assert_eq!(texts(&paragraphs), vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_paragraphs(Vec::new(), 1.0).is_empty());
    }
}
