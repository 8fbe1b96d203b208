//! Lexer module - line scanning
//!
//! Splits a document into logical lines, resolving leading whitespace into a
//! nesting depth measured in indentation units. Blank lines are dropped, and
//! so are whole-line comments unless the configuration asks to keep them.

mod line;

pub use line::*;

use crate::config::{is_valid_unit, Config};
use crate::error::{PymlError, Result};
use tracing::{debug, info_span};

const COMMENT_MARKER: char = '#';

/// Scan a PyML document into logical lines
pub fn scan(source: &str, config: &Config) -> Result<Vec<LogicalLine>> {
    let span = info_span!("pipeline.scan");
    let _enter = span.enter();

    config.validate()?;

    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let unit = match &config.source_indentation_unit {
        Some(unit) => Some(unit.clone()),
        None => detect_unit(source)?,
    };

    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let leading = leading_whitespace(raw);

        if let Some(comment) = trimmed.strip_prefix(COMMENT_MARKER) {
            if config.keep_comments {
                // Comments never open blocks, so a ragged comment indent is
                // rounded down instead of rejected.
                let depth = match &unit {
                    Some(u) => leading.chars().count() / u.chars().count(),
                    None => 0,
                };
                lines.push(LogicalLine::comment(depth, comment.trim(), line_no));
            }
            continue;
        }

        let depth = measure_depth(leading, unit.as_deref(), line_no)?;
        let content = strip_trailing_comment(trimmed);
        lines.push(LogicalLine::code(depth, content.trim_end(), line_no));
    }

    debug!(
        lines = lines.len(),
        unit = ?unit,
        "scanned source into logical lines"
    );
    Ok(lines)
}

fn leading_whitespace(raw: &str) -> &str {
    &raw[..raw.len() - raw.trim_start().len()]
}

/// Take the smallest indentation of any code line as the unit.
fn detect_unit(source: &str) -> Result<Option<String>> {
    let mut unit: Option<&str> = None;
    for (idx, raw) in source.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }
        let leading = leading_whitespace(raw);
        if leading.is_empty() {
            continue;
        }
        let mixed = unit.is_some_and(|u| !leading.starts_with(&u[..1]));
        if !is_valid_unit(leading) || mixed {
            return Err(PymlError::structural(
                idx + 1,
                "indentation mixes tabs and spaces",
            ));
        }
        if unit.map_or(true, |u| leading.len() < u.len()) {
            unit = Some(leading);
        }
    }
    Ok(unit.map(str::to_string))
}

fn measure_depth(leading: &str, unit: Option<&str>, line: usize) -> Result<usize> {
    if leading.is_empty() {
        return Ok(0);
    }
    let unit = match unit {
        Some(unit) => unit,
        None => {
            return Err(PymlError::structural(line, "unexpected indentation"));
        }
    };
    let unit_char = unit.chars().next().unwrap_or(' ');
    if leading.chars().any(|c| c != unit_char) {
        return Err(PymlError::structural(
            line,
            "indentation mixes tabs and spaces",
        ));
    }
    let width = leading.chars().count();
    let unit_width = unit.chars().count();
    if width % unit_width != 0 {
        return Err(PymlError::structural(
            line,
            format!(
                "indentation of {width} is not a multiple of the {unit_width}-character indentation unit"
            ),
        ));
    }
    Ok(width / unit_width)
}

/// Drop a trailing `# comment`, leaving markers inside string literals alone.
pub fn strip_trailing_comment(line: &str) -> String {
    let mut out = String::new();
    let mut in_string = false;
    let mut string_char = ' ';
    let mut escape = false;
    for c in line.chars() {
        if in_string {
            out.push(c);
            if escape {
                escape = false;
                continue;
            }
            if c == '\\' {
                escape = true;
            } else if c == string_char {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = true;
                string_char = c;
                out.push(c);
            }
            COMMENT_MARKER => break,
            _ => out.push(c),
        }
    }
    out
}
