//! Outline types: heading levels, tree nodes and the emitted flat shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Paragraph;

/// Outline heading level, H1 through H4.
///
/// Serializes as the string `"H1"`..`"H4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const H1: Self = HeadingLevel(1);
    pub const H2: Self = HeadingLevel(2);
    pub const H3: Self = HeadingLevel(3);
    pub const H4: Self = HeadingLevel(4);

    /// Deepest level an outline may contain.
    pub const MAX: u8 = 4;

    /// Numeric level (1 = coarsest).
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=Self::MAX).contains(&value) {
            Ok(HeadingLevel(value))
        } else {
            Err(format!("heading level {} outside 1..={}", value, Self::MAX))
        }
    }
}

impl TryFrom<String> for HeadingLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value
            .strip_prefix('H')
            .or_else(|| value.strip_prefix('h'))
            .ok_or_else(|| format!("invalid heading level: {:?}", value))?;
        let level: u8 = digits
            .parse()
            .map_err(|_| format!("invalid heading level: {:?}", value))?;
        HeadingLevel::try_from(level)
    }
}

impl From<HeadingLevel> for String {
    fn from(level: HeadingLevel) -> Self {
        level.to_string()
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

/// A paragraph accepted as a heading, with its assigned level.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub paragraph: Paragraph,
    pub level: HeadingLevel,
}

/// A node in the outline forest.
///
/// Every child has a strictly greater level than its parent. `page` is
/// the page of this heading's own text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a leaf node.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn total_nodes(&self) -> usize {
        1 + self.children.iter().map(|c| c.total_nodes()).sum::<usize>()
    }
}

/// Externally emitted outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// A heading reduced to text and page, used as input for summarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub text: String,
    pub page: u32,
}

/// Final result for one document: `{"title": ..., "outline": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Resolved title, empty when no H1/H2 heading exists
    pub title: String,
    /// Pre-order flattened outline, without the title's own H1 entry
    pub outline: Vec<FlatEntry>,
}

impl OutlineDocument {
    /// Check whether any heading was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }

    /// Number of outline entries at a given level.
    pub fn count_at(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_bounds() {
        assert!(HeadingLevel::try_from(0u8).is_err());
        assert_eq!(HeadingLevel::try_from(4u8).unwrap(), HeadingLevel::H4);
        assert!(HeadingLevel::try_from(5u8).is_err());
    }

    #[test]
    fn test_heading_level_serde() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");

        let level: HeadingLevel = serde_json::from_str("\"H3\"").unwrap();
        assert_eq!(level, HeadingLevel::H3);

        assert!(serde_json::from_str::<HeadingLevel>("\"H7\"").is_err());
        assert!(serde_json::from_str::<HeadingLevel>("\"X1\"").is_err());
    }

    #[test]
    fn test_flat_entry_shape() {
        let entry = FlatEntry {
            level: HeadingLevel::H1,
            text: "Overview".to_string(),
            page: 2,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"level": "H1", "text": "Overview", "page": 2})
        );
    }

    #[test]
    fn test_total_nodes() {
        let mut root = OutlineNode::new(HeadingLevel::H1, "Root", 1);
        let mut child = OutlineNode::new(HeadingLevel::H2, "Child", 1);
        child
            .children
            .push(OutlineNode::new(HeadingLevel::H3, "Leaf", 2));
        root.children.push(child);

        assert_eq!(root.total_nodes(), 3);
    }
}
