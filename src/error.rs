//! Error types for the PyML transpiler

use thiserror::Error;

/// Broad category of a failure, used by diagnostics and callers that only
/// care about which pipeline stage rejected the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Classification,
    Translation,
    Configuration,
    Io,
}

/// Main error type for PyML
#[derive(Debug, Error)]
pub enum PymlError {
    #[error("Structural error at line {line}: {message}")]
    Structural { line: usize, message: String },

    #[error("Classification error at line {line}: {message}")]
    Classification { line: usize, message: String },

    #[error("Translation error at line {line}: {message}")]
    Translation { line: usize, message: String },

    #[error("Undefined callable '{name}' at line {line}: functions must be defined before they are called")]
    UndefinedCallable { name: String, line: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PymlError {
    pub fn structural(line: usize, message: impl Into<String>) -> Self {
        Self::Structural {
            line,
            message: message.into(),
        }
    }

    pub fn classification(line: usize, message: impl Into<String>) -> Self {
        Self::Classification {
            line,
            message: message.into(),
        }
    }

    pub fn translation(line: usize, message: impl Into<String>) -> Self {
        Self::Translation {
            line,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Structural { .. } => ErrorKind::Structural,
            Self::Classification { .. } => ErrorKind::Classification,
            Self::Translation { .. } | Self::UndefinedCallable { .. } => ErrorKind::Translation,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Source line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Structural { line, .. }
            | Self::Classification { line, .. }
            | Self::Translation { line, .. }
            | Self::UndefinedCallable { line, .. } => Some(*line),
            Self::Configuration { .. } | Self::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PymlError>;
