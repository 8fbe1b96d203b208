//! Transpilation configuration
//!
//! Configuration only governs how the emitted code is laid out (and how the
//! source indentation is measured). It never changes what a document means.

use crate::error::{PymlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How the emitted code opens and closes blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockStyle {
    /// `header:` followed by an indented body (plain Python).
    #[default]
    ColonIndent,
    /// `header {` ... `}`
    Brace,
}

impl FromStr for BlockStyle {
    type Err = PymlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "colon-indent" => Ok(Self::ColonIndent),
            "brace" => Ok(Self::Brace),
            other => Err(PymlError::configuration(format!(
                "unrecognized block style '{other}' (expected 'colon-indent' or 'brace')"
            ))),
        }
    }
}

impl fmt::Display for BlockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColonIndent => write!(f, "colon-indent"),
            Self::Brace => write!(f, "brace"),
        }
    }
}

/// Per-run configuration. JSON keys are camelCase; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub target_dialect_block_style: BlockStyle,
    /// Indentation written for each nesting level of emitted code.
    pub indentation_unit: String,
    /// Indentation unit of the input document. Detected from the first
    /// indented line when absent.
    pub source_indentation_unit: Option<String>,
    /// Keep whole-line comments and emit them as target comments.
    pub keep_comments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_dialect_block_style: BlockStyle::ColonIndent,
            indentation_unit: "  ".to_string(),
            source_indentation_unit: None,
            keep_comments: false,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| PymlError::configuration(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_block_style(mut self, style: BlockStyle) -> Self {
        self.target_dialect_block_style = style;
        self
    }

    pub fn with_indentation_unit(mut self, unit: impl Into<String>) -> Self {
        self.indentation_unit = unit.into();
        self
    }

    pub fn with_source_indentation_unit(mut self, unit: impl Into<String>) -> Self {
        self.source_indentation_unit = Some(unit.into());
        self
    }

    pub fn with_keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Reject option values the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        validate_unit("indentationUnit", &self.indentation_unit)?;
        if let Some(unit) = &self.source_indentation_unit {
            validate_unit("sourceIndentationUnit", unit)?;
        }
        Ok(())
    }
}

/// An indentation unit is a non-empty run of spaces or a non-empty run of tabs.
pub fn is_valid_unit(unit: &str) -> bool {
    !unit.is_empty() && (unit.chars().all(|c| c == ' ') || unit.chars().all(|c| c == '\t'))
}

fn validate_unit(option: &str, unit: &str) -> Result<()> {
    if is_valid_unit(unit) {
        Ok(())
    } else {
        Err(PymlError::configuration(format!(
            "{option} must be a non-empty run of spaces or of tabs, got {unit:?}"
        )))
    }
}
