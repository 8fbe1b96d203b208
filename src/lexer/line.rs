//! Logical line definitions

use serde::Serialize;

/// Whether a logical line carries code or a kept comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    Code,
    Comment,
}

/// One non-blank source line with its indentation resolved to a depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalLine {
    /// Nesting level (number of indentation units)
    pub depth: usize,
    /// Line text without indentation, trailing whitespace or trailing comment.
    /// For comment lines this is the comment text without the marker.
    pub content: String,
    /// Line number in the source document (1-indexed)
    pub line: usize,
    pub kind: LineKind,
}

impl LogicalLine {
    pub fn code(depth: usize, content: impl Into<String>, line: usize) -> Self {
        Self {
            depth,
            content: content.into(),
            line,
            kind: LineKind::Code,
        }
    }

    pub fn comment(depth: usize, content: impl Into<String>, line: usize) -> Self {
        Self {
            depth,
            content: content.into(),
            line,
            kind: LineKind::Comment,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == LineKind::Comment
    }
}
