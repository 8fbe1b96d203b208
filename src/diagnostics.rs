//! Diagnostics - structured error and warning reports

use crate::error::PymlError;
use crate::parser::utils::is_ident_char;
use crate::semantic::SymbolTable;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub span: DiagnosticSpan,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let file = diag.span.file.as_deref().unwrap_or("<input>");
            out.push_str(&format!(
                "[{}] {}:{}:{} {}\n",
                diag.code, file, diag.span.line, diag.span.column, diag.message
            ));
        }
        out
    }
}

pub fn span_for_line(file: Option<&Path>, line: usize, column: usize, len: usize) -> DiagnosticSpan {
    let end_col = if len == 0 {
        column
    } else {
        column + len.saturating_sub(1)
    };
    DiagnosticSpan {
        file: file.map(|p| p.display().to_string()),
        line,
        column,
        end_line: line,
        end_column: end_col,
    }
}

pub fn error_diag(code: &str, message: String, span: DiagnosticSpan, phase: &str) -> Diagnostic {
    Diagnostic {
        code: code.to_string(),
        message,
        severity: DiagnosticSeverity::Error,
        span,
        phase: phase.to_string(),
        meta: None,
    }
}

pub fn warning_diag(code: &str, message: String, span: DiagnosticSpan, phase: &str) -> Diagnostic {
    Diagnostic {
        severity: DiagnosticSeverity::Warning,
        ..error_diag(code, message, span, phase)
    }
}

/// Convert a pipeline error into a single error diagnostic
pub fn from_error(err: &PymlError, file: Option<&Path>) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let (code, message, line, phase) = match err {
        PymlError::Structural { line, message } => {
            ("PYML-STRUCTURAL-ERROR", message.clone(), *line, "structure")
        }
        PymlError::Classification { line, message } => {
            ("PYML-CLASSIFICATION-ERROR", message.clone(), *line, "classify")
        }
        PymlError::Translation { line, message } => {
            ("PYML-TRANSLATION-ERROR", message.clone(), *line, "translate")
        }
        PymlError::UndefinedCallable { name, line } => (
            "PYML-UNDEFINED-CALLABLE",
            format!("'{name}' is called before it is defined or imported"),
            *line,
            "classify",
        ),
        PymlError::Configuration { message } => {
            ("PYML-CONFIGURATION-ERROR", message.clone(), 1, "config")
        }
        PymlError::Io(_) => ("PYML-IO-ERROR", format!("{err}"), 1, "io"),
    };
    let span = span_for_line(file, line, 1, 1);
    diags.add(error_diag(code, message, span, phase));
    diags
}

/// Warn about member-access roots (`math` in `math.pi`) that nothing binds
pub fn unresolved_modules(
    source: &str,
    file: Option<&Path>,
    member_roots: &[(usize, String)],
    symbols: &SymbolTable,
) -> Diagnostics {
    let lines: Vec<&str> = source.lines().collect();
    let mut seen = BTreeSet::new();
    let mut diags = Diagnostics::new();

    for (line, root) in member_roots {
        if symbols.is_known(root) || !seen.insert(root.as_str()) {
            continue;
        }
        let column = lines
            .get(line.saturating_sub(1))
            .and_then(|text| find_member_root(text, root))
            .map_or(1, |byte| byte + 1);
        let span = span_for_line(file, *line, column, root.len());
        let mut diag = warning_diag(
            "PYML-UNRESOLVED-MODULE",
            format!("'{root}' is used as a module but is never imported (add it under 'packages:')"),
            span,
            "translate",
        );
        diag.meta = Some(serde_json::json!({ "name": root }));
        diags.add(diag);
    }
    diags
}

/// Byte offset of `name.` as a whole word in a source line
fn find_member_root(line: &str, name: &str) -> Option<usize> {
    let pattern = format!("{name}.");
    let mut from = 0;
    while let Some(offset) = line[from..].find(&pattern) {
        let i = from + offset;
        let left_ok = line[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c) && c != '.');
        if left_ok {
            return Some(i);
        }
        from = i + pattern.len();
    }
    None
}
