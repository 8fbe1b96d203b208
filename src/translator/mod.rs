//! Expression translator
//!
//! Values in the surface syntax reuse Python expression syntax, so most text
//! passes through unchanged. The translator validates bracket and quote
//! balance and rewrites the few surface-only forms:
//! - `true` / `false` / `null` literals
//! - quoted strings with `{expr}` placeholders (become f-strings)
//! - range sugar `range.A.B[.C]` (becomes `range(A, B[, C])`)
//!
//! It also records the free identifiers an expression refers to.

pub mod interpolation;

use crate::error::{PymlError, Result};
use crate::parser::header::parse_range;
use crate::parser::utils::{is_ident_char, is_ident_start};
use interpolation::{has_placeholders, split_template, Segment};
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

/// Words that are never free identifiers
static PYTHON_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "or", "not", "in", "is", "if", "else", "lambda", "for", "None", "True", "False",
        "await", "yield",
    ]
    .into_iter()
    .collect()
});

/// A translated expression
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expression {
    /// Python expression text
    pub text: String,
    /// Free identifiers referenced (attributes excluded)
    pub references: BTreeSet<String>,
    /// Identifiers used as the root of a member access (`math` in `math.pi`)
    pub member_roots: BTreeSet<String>,
}

impl Expression {
    fn absorb(&mut self, other: Expression) {
        self.references.extend(other.references);
        self.member_roots.extend(other.member_roots);
    }
}

/// Translate a raw value string into a Python expression
pub fn translate(raw: &str, line: usize) -> Result<Expression> {
    Translator::new(raw, line).run()
}

/// Quote free text so it can be translated as an interpolated string
pub fn quote_template(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn is_string_prefix(word: &str) -> bool {
    word.len() <= 2
        && word
            .chars()
            .all(|c| matches!(c.to_ascii_lowercase(), 'r' | 'b' | 'f' | 'u'))
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

struct Translator {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    /// Open brackets, innermost last
    brackets: Vec<char>,
    expr: Expression,
}

impl Translator {
    fn new(raw: &str, line: usize) -> Self {
        Self {
            chars: raw.trim().chars().collect(),
            pos: 0,
            line,
            brackets: Vec::new(),
            expr: Expression::default(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn run(mut self) -> Result<Expression> {
        while let Some(c) = self.peek(0) {
            if is_quote(c) {
                self.string("")?;
            } else if is_ident_start(c) {
                self.word()?;
            } else if c.is_ascii_digit() {
                self.number();
            } else if matches!(c, '(' | '[' | '{') {
                self.brackets.push(c);
                self.expr.text.push(c);
                self.pos += 1;
            } else if matches!(c, ')' | ']' | '}') {
                match self.brackets.pop() {
                    Some(open) if closing_for(open) == c => {}
                    Some(open) => {
                        return Err(PymlError::translation(
                            self.line,
                            format!("mismatched '{c}' (expected '{}')", closing_for(open)),
                        ));
                    }
                    None => {
                        return Err(PymlError::translation(
                            self.line,
                            format!("unbalanced '{c}' has no matching opening bracket"),
                        ));
                    }
                }
                self.expr.text.push(c);
                self.pos += 1;
            } else {
                self.expr.text.push(c);
                self.pos += 1;
            }
        }
        if let Some(open) = self.brackets.last() {
            return Err(PymlError::translation(
                self.line,
                format!("unclosed '{open}'"),
            ));
        }
        Ok(self.expr)
    }

    fn follows_dot(&self) -> bool {
        self.expr.text.trim_end().ends_with('.')
    }

    fn word(&mut self) -> Result<()> {
        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_char) {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        if self.peek(0).is_some_and(is_quote) && is_string_prefix(&word) {
            return self.string(&word);
        }
        if self.follows_dot() {
            self.expr.text.push_str(&word);
            return Ok(());
        }
        if word == "range" && self.peek(0) == Some('.') {
            return self.range_sugar(start);
        }

        let spelled = match word.as_str() {
            "true" => "True",
            "false" => "False",
            "null" => "None",
            other => other,
        };
        if !PYTHON_KEYWORDS.contains(spelled) {
            self.expr.references.insert(word.clone());
            if self.peek(0) == Some('.') && self.peek(1).is_some_and(is_ident_start) {
                self.expr.member_roots.insert(word.clone());
            }
        }
        self.expr.text.push_str(spelled);
        Ok(())
    }

    fn number(&mut self) {
        while let Some(c) = self.peek(0) {
            let fraction = c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit());
            if is_ident_char(c) || fraction {
                self.expr.text.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// `range.A.B[.C]`, starting at the `range` word
    fn range_sugar(&mut self, start: usize) -> Result<()> {
        while let Some(c) = self.peek(0) {
            let signed = c == '-' && self.chars.get(self.pos.wrapping_sub(1)) == Some(&'.');
            if is_ident_char(c) || c == '.' || signed {
                self.pos += 1;
            } else {
                break;
            }
        }
        let sugar: String = self.chars[start..self.pos].iter().collect();
        let bounds = parse_range(&sugar, self.line)?;
        for bound in &bounds {
            if bound.chars().next().is_some_and(is_ident_start) {
                self.expr.references.insert(bound.clone());
            }
        }
        self.expr
            .text
            .push_str(&format!("range({})", bounds.join(", ")));
        Ok(())
    }

    /// String literal at the current position, with an optional prefix
    fn string(&mut self, prefix: &str) -> Result<()> {
        let quote = self.chars[self.pos];
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        let delimiter: String = std::iter::repeat(quote).take(if triple { 3 } else { 1 }).collect();
        self.pos += delimiter.len();

        let body_start = self.pos;
        let body_end = loop {
            match self.peek(0) {
                None => {
                    return Err(PymlError::translation(
                        self.line,
                        "unterminated string literal",
                    ));
                }
                Some('\\') => self.pos += 2,
                Some(c) if c == quote => {
                    if !triple {
                        break self.pos;
                    }
                    if self.peek(1) == Some(quote) && self.peek(2) == Some(quote) {
                        break self.pos;
                    }
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        };
        self.pos = body_end + delimiter.len();
        let body: String = self.chars[body_start..body_end].iter().collect();

        let lower = prefix.to_ascii_lowercase();
        let interpolates = lower.contains('f') || !(lower.contains('r') || lower.contains('b'));
        if !interpolates {
            self.expr
                .text
                .push_str(&format!("{prefix}{delimiter}{body}{delimiter}"));
            return Ok(());
        }

        let segments = split_template(&body, self.line)?;
        if !has_placeholders(&segments) {
            self.expr
                .text
                .push_str(&format!("{prefix}{delimiter}{body}{delimiter}"));
            return Ok(());
        }

        let mut rebuilt = String::new();
        for segment in segments {
            match segment {
                Segment::Literal(text) => rebuilt.push_str(&text),
                Segment::Placeholder { expr, spec } => {
                    let inner = translate(&expr, self.line)?;
                    if inner.text.contains(quote) {
                        return Err(PymlError::translation(
                            self.line,
                            format!(
                                "placeholder `{expr}` uses the same quote character as its string"
                            ),
                        ));
                    }
                    rebuilt.push('{');
                    rebuilt.push_str(&inner.text);
                    rebuilt.push_str(&spec);
                    rebuilt.push('}');
                    self.expr.absorb(inner);
                }
            }
        }
        let prefix = if lower.contains('f') {
            prefix.to_string()
        } else {
            format!("f{prefix}")
        };
        self.expr
            .text
            .push_str(&format!("{prefix}{delimiter}{rebuilt}{delimiter}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
