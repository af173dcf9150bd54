//! Extracts block references from indentation-structured text.
//!
//! Input looks like a restricted YAML mapping:
//!
//! ```text
//! hsptlzInfo: # admission
//!   hsplzInfoInquiry: 67d2804ef38a8bfdf0172bce # inquiry
//! ```
//!
//! Keys without a value open a path segment; keys carrying a 24-char hex
//! identifier are references and produce one [`ParsedReference`] each, with
//! the dot-joined chain of currently open keys as their path.

use serde::{Deserialize, Serialize};

use crate::line_classifier::{LineClassifier, LineKind};

/// A block reference found in the input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReference {
    pub identifier: String,
    /// Open ancestor keys followed by the reference's own key, joined by `.`
    pub path: String,
    /// 1-based line number in the input
    pub source_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PathStackEntry {
    name: String,
    indent: usize,
}

/// Open path segments, strictly increasing in indent from bottom to top.
#[derive(Debug, Default)]
struct PathStack {
    entries: Vec<PathStackEntry>,
}

impl PathStack {
    /// Close every segment that is not strictly shallower than `indent`.
    fn close_to(&mut self, indent: usize) {
        while self.entries.last().is_some_and(|top| top.indent >= indent) {
            self.entries.pop();
        }
    }

    fn open(&mut self, name: &str, indent: usize) {
        self.close_to(indent);
        self.entries.push(PathStackEntry {
            name: name.to_string(),
            indent,
        });
    }

    /// Path of a leaf at `indent`. Closes deeper-or-equal segments first.
    fn leaf_path(&mut self, name: &str, indent: usize) -> String {
        self.close_to(indent);
        self.entries
            .iter()
            .map(|e| e.name.as_str())
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join(".")
    }
}

pub struct ReferenceParser {
    classifier: LineClassifier,
}

impl ReferenceParser {
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::new(),
        }
    }

    /// Parse `text` into references, in input order.
    ///
    /// Blank, comment and unrecognised lines are skipped without touching the
    /// path stack. A reference line is never pushed: leaves have no children.
    pub fn parse(&self, text: &str) -> Vec<ParsedReference> {
        let mut stack = PathStack::default();
        let mut references = Vec::new();

        for line in self.classifier.classify_text(text) {
            match line.kind {
                LineKind::PathNode { indent, name } => stack.open(&name, indent),
                LineKind::LeafReference {
                    indent,
                    name,
                    identifier,
                } => {
                    let path = stack.leaf_path(&name, indent);
                    references.push(ParsedReference {
                        identifier,
                        path,
                        source_line: line.line_number,
                    });
                }
                LineKind::Blank | LineKind::Comment | LineKind::Unrecognized => {}
            }
        }

        tracing::debug!(references = references.len(), "parsed reference text");
        references
    }
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self::new()
    }
}
