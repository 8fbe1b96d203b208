//! Block dialects
//!
//! The only part of generation that differs per target style: how a header
//! line opens its body and whether anything closes it.

use crate::config::BlockStyle;

pub trait BlockDialect {
    /// Header line that opens a nested body
    fn open(&self, header: &str) -> String;
    /// Line emitted after the body, at the header's depth
    fn close(&self) -> Option<&'static str>;
}

/// `header:` followed by an indented body
#[derive(Debug, Default)]
pub struct ColonIndent;

impl BlockDialect for ColonIndent {
    fn open(&self, header: &str) -> String {
        format!("{header}:")
    }

    fn close(&self) -> Option<&'static str> {
        None
    }
}

/// `header {` ... `}`
#[derive(Debug, Default)]
pub struct Brace;

impl BlockDialect for Brace {
    fn open(&self, header: &str) -> String {
        format!("{header} {{")
    }

    fn close(&self) -> Option<&'static str> {
        Some("}")
    }
}

pub fn dialect_for(style: BlockStyle) -> Box<dyn BlockDialect> {
    match style {
        BlockStyle::ColonIndent => Box::new(ColonIndent),
        BlockStyle::Brace => Box::new(Brace),
    }
}
