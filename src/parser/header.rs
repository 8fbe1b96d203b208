//! Control header parsing (pest)
//!
//! Headers are the key part of block-opening lines: `if x > 5`, `else`,
//! `for k, v in data`, `function greet define name`. Range sugar
//! (`range.1.10.2`) shares the grammar so its components are validated the
//! same way wherever it appears.

use crate::error::{PymlError, Result};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::trace;

use super::utils::is_ident_char;

#[derive(Parser)]
#[grammar = "parser/header.pest"]
pub struct HeaderParser;

/// Keywords that introduce a control header
pub const HEADER_KEYWORDS: [&str; 6] = ["if", "elif", "else", "while", "for", "function"];

/// A parsed control header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    If(String),
    Elif(String),
    Else,
    While(String),
    For {
        targets: Vec<String>,
        iterable: String,
    },
    Function {
        name: String,
        param: String,
    },
}

/// The header keyword a key starts with, if any
pub fn header_keyword(key: &str) -> Option<&'static str> {
    let end = key
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(key.len(), |(i, _)| i);
    let word = &key[..end];
    HEADER_KEYWORDS.iter().copied().find(|kw| *kw == word)
}

/// Parse a control header
pub fn parse_header(text: &str, line: usize) -> Result<Header> {
    let keyword = header_keyword(text).unwrap_or("control");
    let malformed = || PymlError::classification(line, format!("malformed '{keyword}' header `{text}`"));

    let mut pairs = HeaderParser::parse(Rule::header, text).map_err(|e| {
        trace!(error = %e, "header grammar rejected input");
        malformed()
    })?;
    let header = pairs.next().ok_or_else(malformed)?;
    let inner = header.into_inner().next().ok_or_else(malformed)?;

    match inner.as_rule() {
        Rule::if_header => Ok(Header::If(rest_of(inner))),
        Rule::elif_header => Ok(Header::Elif(rest_of(inner))),
        Rule::while_header => Ok(Header::While(rest_of(inner))),
        Rule::else_header => Ok(Header::Else),
        Rule::for_header => {
            let mut targets = Vec::new();
            let mut iterable = String::new();
            for part in inner.into_inner() {
                match part.as_rule() {
                    Rule::targets => {
                        targets = part
                            .into_inner()
                            .map(|t| t.as_str().to_string())
                            .collect();
                    }
                    Rule::rest => iterable = part.as_str().trim().to_string(),
                    _ => {}
                }
            }
            Ok(Header::For { targets, iterable })
        }
        Rule::function_header => {
            let mut idents = inner
                .into_inner()
                .filter(|p| p.as_rule() == Rule::ident)
                .map(|p| p.as_str().to_string());
            let name = idents.next().ok_or_else(malformed)?;
            let param = idents.next().ok_or_else(malformed)?;
            Ok(Header::Function { name, param })
        }
        _ => Err(malformed()),
    }
}

fn rest_of(pair: Pair<'_, Rule>) -> String {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::rest)
        .map(|p| p.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Split `range.A.B[.C]` into its bounds. Exactly two or three are accepted.
pub fn parse_range(text: &str, line: usize) -> Result<Vec<String>> {
    let malformed = || PymlError::translation(line, format!("malformed range sugar `{text}`"));
    let mut pairs = HeaderParser::parse(Rule::range_only, text).map_err(|e| {
        trace!(error = %e, "range grammar rejected input");
        malformed()
    })?;
    let range_only = pairs.next().ok_or_else(malformed)?;
    let sugar = range_only
        .into_inner()
        .find(|p| p.as_rule() == Rule::range_sugar)
        .ok_or_else(malformed)?;
    let bounds: Vec<String> = sugar
        .into_inner()
        .map(|p| p.as_str().to_string())
        .collect();

    if !(2..=3).contains(&bounds.len()) {
        return Err(PymlError::translation(
            line,
            format!(
                "range sugar `{text}` has {} component(s); expected start.stop or start.stop.step",
                bounds.len()
            ),
        ));
    }
    Ok(bounds)
}
