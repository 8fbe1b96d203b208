//! String interpolation templates
//!
//! A string body such as `Hola {name}, total {price * qty:.2f}` is split into
//! literal text and placeholders. `{{` and `}}` stay literal braces.

use crate::error::{PymlError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder {
        /// Expression text, untranslated
        expr: String,
        /// Conversion and format spec including the leading `!` or `:`
        spec: String,
    },
}

/// Split a string body into literal and placeholder segments.
///
/// A lone `}` is kept as an escaped literal brace. An empty `{}` is only
/// accepted in a body with no placeholders, where the body stays a plain
/// string (`"{}".format(x)`).
pub fn split_template(body: &str, line: usize) -> Result<Vec<Segment>> {
    let chars: Vec<char> = body.chars().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut empty_braces = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' if chars.get(i + 1) == Some(&'{') => {
                literal.push_str("{{");
                i += 2;
            }
            '}' if chars.get(i + 1) == Some(&'}') => {
                literal.push_str("}}");
                i += 2;
            }
            '{' => {
                let close = find_placeholder_end(&chars, i).ok_or_else(|| {
                    PymlError::translation(line, "unterminated interpolation placeholder")
                })?;
                let inner: String = chars[i + 1..close].iter().collect();
                let (expr, spec) = split_spec(&inner);
                i = close + 1;
                if expr.trim().is_empty() {
                    empty_braces = true;
                    literal.push('{');
                    literal.push_str(&inner);
                    literal.push('}');
                    continue;
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder {
                    expr: expr.trim().to_string(),
                    spec,
                });
            }
            '}' => {
                literal.push_str("}}");
                i += 1;
            }
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    if empty_braces && has_placeholders(&segments) {
        return Err(PymlError::translation(
            line,
            "empty interpolation placeholder '{}' next to other placeholders",
        ));
    }
    Ok(segments)
}

pub fn has_placeholders(segments: &[Segment]) -> bool {
    segments
        .iter()
        .any(|s| matches!(s, Segment::Placeholder { .. }))
}

/// Index of the `}` closing the placeholder opened at `open`
fn find_placeholder_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, &c) in chars.iter().enumerate().skip(open + 1) {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Separate `expr!r:>10` into `expr` and `!r:>10`
fn split_spec(inner: &str) -> (String, String) {
    let chars: Vec<(usize, char)> = inner.char_indices().collect();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (k, &(i, c)) in chars.iter().enumerate() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        let next = chars.get(k + 1).map(|&(_, n)| n);
        let prev = k.checked_sub(1).and_then(|p| chars.get(p)).map(|&(_, p)| p);
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '!' if depth == 0 && next != Some('=') => {
                return (inner[..i].to_string(), inner[i..].to_string());
            }
            ':' if depth == 0 && next != Some('=') && prev != Some('=') => {
                return (inner[..i].to_string(), inner[i..].to_string());
            }
            _ => {}
        }
    }
    (inner.to_string(), String::new())
}
