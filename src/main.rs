//! PyML CLI - YAML-style syntax to Python transpiler

use anyhow::{Context, Result};
use clap::Parser;
use pyml::{analyze, transpile_with_diagnostics, BlockStyle, Config};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// PyML - YAML-style syntax to Python transpiler
#[derive(Parser, Debug)]
#[command(name = "pyml")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transpile PyML documents to Python", long_about = None)]
struct Cli {
    /// Input PyML file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output Python file (default: <INPUT stem>.py in the current directory)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Print the generated Python to stdout instead of writing a file
    #[arg(long)]
    tr: bool,

    /// Check only (don't generate output)
    #[arg(short, long)]
    check: bool,

    /// Dump the classified block tree and exit
    #[arg(long)]
    dump_tree: bool,

    /// Emit JSON diagnostics to stderr
    #[arg(long)]
    diag_json: bool,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Block style of the emitted code: colon-indent or brace
    #[arg(long, value_name = "STYLE")]
    block_style: Option<BlockStyle>,

    /// Spaces per emitted indentation level
    #[arg(long, value_name = "N")]
    indent_unit: Option<usize>,

    /// Keep whole-line comments in the output
    #[arg(long)]
    keep_comments: bool,

    /// Show debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(style) = cli.block_style {
        config = config.with_block_style(style);
    }
    if let Some(width) = cli.indent_unit {
        config = config.with_indentation_unit(" ".repeat(width));
    }
    if cli.keep_comments {
        config = config.with_keep_comments(true);
    }
    config.validate()?;
    Ok(config)
}

fn default_output(input: &Path) -> PathBuf {
    let mut p = input.to_path_buf();
    p.set_extension("py");
    // Written next to the caller, not next to the input
    match p.file_name() {
        Some(filename) => PathBuf::from(filename),
        None => p,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = load_config(&cli)?;
    debug!(input = %cli.input.display(), ?config, "starting transpilation");

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    if cli.dump_tree {
        match analyze(&source, &config) {
            Ok(analysis) => {
                println!("=== Classified block tree ===");
                print!("{}", analysis.forest.dump());
                return Ok(());
            }
            Err(err) => {
                let diags = pyml::diagnostics::from_error(&err, Some(&cli.input));
                print!("{}", diags.to_text());
                if cli.diag_json {
                    eprintln!("{}", diags.to_json());
                }
                std::process::exit(1);
            }
        }
    }

    let transpiled = match transpile_with_diagnostics(&source, &config, Some(&cli.input)) {
        Ok(transpiled) => transpiled,
        Err(diags) => {
            print!("{}", diags.to_text());
            if cli.diag_json {
                eprintln!("{}", diags.to_json());
            }
            std::process::exit(1);
        }
    };

    if !transpiled.warnings.is_empty() {
        eprint!("{}", transpiled.warnings.to_text());
        if cli.diag_json {
            eprintln!("{}", transpiled.warnings.to_json());
        }
    }

    if cli.check {
        println!("✅ Transpilation successful!");
        return Ok(());
    }

    if cli.tr {
        print!("{}", transpiled.code);
        return Ok(());
    }

    let output_path = cli.output.unwrap_or_else(|| default_output(&cli.input));
    std::fs::write(&output_path, &transpiled.code)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    println!("✅ Transpiled to: {output_path:?}");

    Ok(())
}
