//! PyML - YAML-style surface syntax to Python transpiler
//!
//! # Overview
//! Indentation-structured `key: value` documents are turned into Python
//! source. The pipeline is strictly forward:
//! scan → build block forest → classify → emit (translating values).

pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod translator;

pub use config::{BlockStyle, Config};
pub use error::{ErrorKind, PymlError, Result};

use diagnostics::Diagnostics;
use parser::Forest;
use semantic::SymbolTable;
use std::path::Path;
use tracing::{debug, info_span};

/// Classified block forest and the names it declares
#[derive(Debug, Clone)]
pub struct Analysis {
    pub forest: Forest,
    pub symbols: SymbolTable,
}

/// Generated Python plus non-fatal findings
#[derive(Debug, Clone)]
pub struct Transpiled {
    pub code: String,
    pub warnings: Diagnostics,
}

/// Scan, build and classify a document
pub fn analyze(source: &str, config: &Config) -> Result<Analysis> {
    config.validate()?;

    let lines = lexer::scan(source, config)?;
    let mut forest = parser::build(&lines)?;
    let symbols = semantic::classify(&mut forest)?;

    Ok(Analysis { forest, symbols })
}

/// Transpile a document with the default configuration
pub fn transpile(source: &str) -> Result<String> {
    transpile_with_config(source, &Config::default())
}

/// Transpile a document to Python source text
pub fn transpile_with_config(source: &str, config: &Config) -> Result<String> {
    let span = info_span!("pipeline.transpile", block_style = %config.target_dialect_block_style);
    let _enter = span.enter();

    let analysis = analyze(source, config)?;
    let emission = emitter::emit(&analysis.forest, config)?;
    Ok(emission.code)
}

/// Transpile and report failures (and warnings) as diagnostics
pub fn transpile_with_diagnostics(
    source: &str,
    config: &Config,
    file: Option<&Path>,
) -> std::result::Result<Transpiled, Diagnostics> {
    let span = info_span!("pipeline.transpile", block_style = %config.target_dialect_block_style);
    let _enter = span.enter();

    let analysis = analyze(source, config).map_err(|err| diagnostics::from_error(&err, file))?;
    let emission = emitter::emit(&analysis.forest, config)
        .map_err(|err| diagnostics::from_error(&err, file))?;

    let warnings = diagnostics::unresolved_modules(
        source,
        file,
        &emission.member_roots,
        &analysis.symbols,
    );
    debug!(warnings = warnings.diagnostics.len(), "transpiled document");
    Ok(Transpiled {
        code: emission.code,
        warnings,
    })
}

/// Transpile a PyML file to a Python file
pub fn transpile_file(input: &Path, output: &Path, config: &Config) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(input)?;
    let code = transpile_with_config(&source, config)?;
    std::fs::write(output, code)?;
    Ok(())
}
