//! Title resolution and outline flattening.

use crate::model::{FlatEntry, HeadingLevel, OutlineNode, Section};

/// Pick the document title from the outline forest.
///
/// The first H1 root wins; without one, the first H2 root. Returns an
/// empty string when neither exists.
pub fn resolve_title(tree: &[OutlineNode]) -> String {
    // An H1 is always a root, and without any H1 every H2 is one too.
    [HeadingLevel::H1, HeadingLevel::H2]
        .iter()
        .find_map(|level| tree.iter().find(|node| node.level == *level))
        .map(|node| node.text.clone())
        .unwrap_or_default()
}

/// Flatten the forest in pre-order.
///
/// An H1 whose text equals a non-empty `title` is left out; its
/// descendants are still emitted.
pub fn flatten_outline(tree: &[OutlineNode], title: &str) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    for node in tree {
        flatten_into(node, title, &mut entries);
    }
    entries
}

fn flatten_into(node: &OutlineNode, title: &str, entries: &mut Vec<FlatEntry>) {
    let is_title = !title.is_empty() && node.level == HeadingLevel::H1 && node.text == title;
    if !is_title {
        entries.push(FlatEntry {
            level: node.level,
            text: node.text.clone(),
            page: node.page,
        });
    }
    for child in &node.children {
        flatten_into(child, title, entries);
    }
}

/// Collect headings between `min` and `max` (inclusive) in pre-order.
pub fn sections(tree: &[OutlineNode], min: HeadingLevel, max: HeadingLevel) -> Vec<Section> {
    let mut out = Vec::new();
    let mut pending: Vec<&OutlineNode> = tree.iter().rev().collect();
    while let Some(node) = pending.pop() {
        if (min..=max).contains(&node.level) {
            out.push(Section {
                text: node.text.clone(),
                page: node.page,
            });
        }
        pending.extend(node.children.iter().rev());
    }
    out
}
