//! Outline tree construction with a stack of open ancestors.

use crate::model::{HeadingCandidate, HeadingLevel, OutlineNode};

/// Build the outline forest from candidates ordered by `(page, y)`.
///
/// Each candidate closes every open ancestor of equal or coarser level and
/// attaches under the nearest remaining one, or becomes a new root. Level
/// gaps are allowed: an H3 directly after an H1 nests under that H1.
pub fn build_tree(candidates: &[HeadingCandidate]) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    // Open ancestors as (level, index among the parent's children).
    let mut stack: Vec<(HeadingLevel, usize)> = Vec::new();

    for candidate in candidates {
        let level = candidate.level;
        while stack.last().is_some_and(|(open, _)| *open >= level) {
            stack.pop();
        }

        let node = OutlineNode::new(level, candidate.paragraph.text.clone(), candidate.paragraph.page);
        let siblings = match stack.split_first() {
            None => &mut roots,
            Some((&(_, root), rest)) => {
                let mut parent = &mut roots[root];
                for &(_, index) in rest {
                    parent = &mut parent.children[index];
                }
                &mut parent.children
            }
        };
        siblings.push(node);
        stack.push((level, siblings.len() - 1));
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    fn candidate(level: HeadingLevel, text: &str, page: u32) -> HeadingCandidate {
        HeadingCandidate {
            paragraph: Paragraph {
                text: text.to_string(),
                size: 0.0,
                bold: false,
                page,
                y: 0.0,
            },
            level,
        }
    }

    fn assert_nesting(nodes: &[OutlineNode], ancestors: &[HeadingLevel]) {
        for node in nodes {
            assert!(ancestors.iter().all(|a| *a < node.level), "{}", node.text);
            let mut chain = ancestors.to_vec();
            chain.push(node.level);
            assert_nesting(&node.children, &chain);
        }
    }

    #[test]
    fn test_nested_sections() {
        use HeadingLevel as L;
        let tree = build_tree(&[
            candidate(L::H1, "Intro", 1),
            candidate(L::H2, "Scope", 1),
            candidate(L::H3, "Details", 2),
            candidate(L::H2, "Terms", 2),
            candidate(L::H1, "Body", 3),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].text, "Intro");
        let kids: Vec<_> = tree[0].children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(kids, vec!["Scope", "Terms"]);
        assert_eq!(tree[0].children[0].children[0].text, "Details");
        assert_eq!(tree[0].children[0].children[0].page, 2);
        assert!(tree[1].children.is_empty());
        assert_nesting(&tree, &[]);
    }

    #[test]
    fn test_level_gap_nests() {
        let tree = build_tree(&[
            candidate(HeadingLevel::H1, "Top", 1),
            candidate(HeadingLevel::H4, "Deep", 1),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].text, "Deep");
    }

    #[test]
    fn test_leading_deep_headings_become_roots() {
        let tree = build_tree(&[
            candidate(HeadingLevel::H3, "Preface note", 1),
            candidate(HeadingLevel::H2, "Part", 1),
            candidate(HeadingLevel::H3, "Chapter", 1),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].children[0].text, "Chapter");
    }

    #[test]
    fn test_equal_levels_are_siblings() {
        let tree = build_tree(&[
            candidate(HeadingLevel::H2, "A", 1),
            candidate(HeadingLevel::H2, "B", 1),
            candidate(HeadingLevel::H2, "C", 2),
        ]);
        assert_eq!(tree.len(), 3);
        assert!(tree.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_deep_path_attachment() {
        use HeadingLevel as L;
        let tree = build_tree(&[
            candidate(L::H1, "1", 1),
            candidate(L::H2, "1.1", 1),
            candidate(L::H2, "1.2", 1),
            candidate(L::H3, "1.2.1", 1),
            candidate(L::H4, "1.2.1.1", 1),
            candidate(L::H4, "1.2.1.2", 1),
            candidate(L::H3, "1.2.2", 1),
        ]);
        let second = &tree[0].children[1];
        assert_eq!(second.text, "1.2");
        assert_eq!(second.children.len(), 2);
        assert_eq!(second.children[0].children.len(), 2);
        assert_eq!(second.children[0].children[1].text, "1.2.1.2");
        assert_eq!(tree[0].total_nodes(), 7);
        assert_nesting(&tree, &[]);
    }

    #[test]
    fn test_empty() {
        assert!(build_tree(&[]).is_empty());
    }
}
