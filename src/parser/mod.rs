//! Parser module - block tree building
//!
//! Turns logical lines into an ordered forest of nodes. Depth decides
//! nesting: a line one level deeper than the previous one becomes its child,
//! a shallower line closes every block down to its own level.

mod ast;
pub mod header;
pub mod utils;

pub use ast::*;

use crate::error::{PymlError, Result};
use crate::lexer::LogicalLine;
use tracing::{debug, info_span};

/// Build the block forest from scanned lines
pub fn build(lines: &[LogicalLine]) -> Result<Forest> {
    let span = info_span!("pipeline.build");
    let _enter = span.enter();

    let mut roots = Vec::new();
    // Open ancestor chain; the node at index `d` sits at depth `d`.
    let mut stack: Vec<Node> = Vec::new();
    // Kept comments take the nesting of the next code line.
    let mut pending_comments: Vec<Node> = Vec::new();

    for line in lines {
        if line.is_comment() {
            pending_comments.push(Node::from_line(line));
            continue;
        }

        close_blocks(&mut stack, &mut roots, line.depth);

        if line.depth > stack.len() {
            let message = match stack.last() {
                Some(parent) => format!(
                    "indentation jumps {} levels below the line {} block",
                    line.depth + 1 - stack.len(),
                    parent.line
                ),
                None => "unexpected indentation at top level".to_string(),
            };
            return Err(PymlError::structural(line.line, message));
        }

        let siblings = match stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut roots,
        };
        siblings.append(&mut pending_comments);
        stack.push(Node::from_line(line));
    }
    close_blocks(&mut stack, &mut roots, 0);
    roots.append(&mut pending_comments);

    debug!(roots = roots.len(), "built block forest");
    Ok(Forest::new(roots))
}

/// Pop every open node at `depth` or deeper, attaching each to its parent
fn close_blocks(stack: &mut Vec<Node>, roots: &mut Vec<Node>, depth: usize) {
    while stack.len() > depth {
        let Some(node) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

#[cfg(test)]
mod tests;
