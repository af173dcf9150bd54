use regex::Regex;
use serde::{Deserialize, Serialize};

/// Classification of a single line of reference text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    Blank,
    Comment,
    /// `key: <24 hex chars>` with an optional trailing comment
    LeafReference {
        indent: usize,
        name: String,
        identifier: String,
    },
    /// `key:` with nothing but an optional comment after it
    PathNode { indent: usize, name: String },
    /// Anything else. Ignored by the parser.
    Unrecognized,
}

/// A classified line with its 1-based position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub line_number: usize,
    pub kind: LineKind,
}

pub struct LineClassifier {
    /// `key: 0123456789abcdef01234567  # note`
    leaf_pattern: Regex,
    /// `key:  # note`
    path_node_pattern: Regex,
}

impl LineClassifier {
    pub fn new() -> Self {
        // Hex group is case-insensitive and must be exactly 24 chars; the
        // trailing `\s*(#.*)?$` rejects longer runs.
        let leaf_pattern =
            Regex::new(r"^(\s*)([A-Za-z_][A-Za-z0-9_]*):\s*((?i:[a-f0-9]{24}))\s*(#.*)?$").unwrap();
        let path_node_pattern = Regex::new(r"^(\s*)([A-Za-z_][A-Za-z0-9_]*):\s*(#.*)?$").unwrap();

        Self {
            leaf_pattern,
            path_node_pattern,
        }
    }

    /// Classify one line (without its trailing newline)
    pub fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if trimmed.starts_with('#') {
            return LineKind::Comment;
        }

        // Tolerate trailing whitespace, including '\r' from CRLF input
        let line = line.trim_end();

        if let Some(caps) = self.leaf_pattern.captures(line) {
            return LineKind::LeafReference {
                indent: indent_width(caps.get(1).map_or("", |m| m.as_str())),
                name: caps[2].to_string(),
                identifier: caps[3].to_string(),
            };
        }

        if let Some(caps) = self.path_node_pattern.captures(line) {
            return LineKind::PathNode {
                indent: indent_width(caps.get(1).map_or("", |m| m.as_str())),
                name: caps[2].to_string(),
            };
        }

        LineKind::Unrecognized
    }

    /// Classify every line of `text`, numbering from 1
    pub fn classify_text(&self, text: &str) -> Vec<ClassifiedLine> {
        text.lines()
            .enumerate()
            .map(|(idx, line)| ClassifiedLine {
                line_number: idx + 1,
                kind: self.classify(line),
            })
            .collect()
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading whitespace measured in characters; a tab counts as one.
fn indent_width(leading: &str) -> usize {
    leading.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "67d2804ef38a8bfdf0172bce";

    fn classify(line: &str) -> LineKind {
        LineClassifier::new().classify(line)
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   \t"), LineKind::Blank);
        assert_eq!(classify("  # hsptlzInfo: 67d2804ef38a8bfdf0172bce"), LineKind::Comment);
    }

    #[test]
    fn test_leaf_reference_with_comment() {
        assert_eq!(
            classify(&format!("  hsplzInfoInquiry: {} # note", ID)),
            LineKind::LeafReference {
                indent: 2,
                name: "hsplzInfoInquiry".to_string(),
                identifier: ID.to_string(),
            }
        );
    }

    #[test]
    fn test_leaf_reference_accepts_uppercase_hex() {
        let upper = ID.to_uppercase();
        match classify(&format!("key: {}", upper)) {
            LineKind::LeafReference { identifier, .. } => assert_eq!(identifier, upper),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_path_node_with_and_without_comment() {
        assert_eq!(
            classify("hsptlzInfo: # comment"),
            LineKind::PathNode { indent: 0, name: "hsptlzInfo".to_string() }
        );
        assert_eq!(
            classify("    nested_key:"),
            LineKind::PathNode { indent: 4, name: "nested_key".to_string() }
        );
    }

    #[test]
    fn test_short_identifier_is_unrecognized() {
        assert_eq!(classify("foo: 123"), LineKind::Unrecognized);
    }

    #[test]
    fn test_wrong_length_or_non_hex_is_unrecognized() {
        assert_eq!(classify(&format!("foo: {}0", ID)), LineKind::Unrecognized);
        assert_eq!(classify("foo: 67d2804ef38a8bfdf0172bc"), LineKind::Unrecognized);
        assert_eq!(classify("foo: 67d2804ef38a8bfdf0172bcg"), LineKind::Unrecognized);
        assert_eq!(classify(&format!("foo: {} trailing", ID)), LineKind::Unrecognized);
    }

    #[test]
    fn test_invalid_key_is_unrecognized() {
        assert_eq!(classify("1key:"), LineKind::Unrecognized);
        assert_eq!(classify("- item"), LineKind::Unrecognized);
        assert_eq!(classify("some-key:"), LineKind::Unrecognized);
    }

    #[test]
    fn test_tabs_count_as_one_character() {
        assert_eq!(
            classify("\t\tkey:"),
            LineKind::PathNode { indent: 2, name: "key".to_string() }
        );
    }

    #[test]
    fn test_crlf_line_is_tolerated() {
        assert!(matches!(
            classify(&format!("key: {}\r", ID)),
            LineKind::LeafReference { .. }
        ));
    }

    #[test]
    fn test_classify_text_numbers_from_one() {
        let lines = LineClassifier::new().classify_text("a:\n\n  b: 67d2804ef38a8bfdf0172bce");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[2].line_number, 3);
    }
}
