use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;

use vela_lang::ast::File;
use vela_lang::{analyze, Analysis};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Parsed AST dump (JSON) to analyze
    #[arg(short, long)]
    file: PathBuf,

    /// Emit machine-readable JSON diagnostics instead of annotated text
    #[arg(long)]
    json: bool,

    /// Suppress warnings, report errors only
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    SimpleLogger::new().with_level(level).init()?;

    let source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let file: File = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a valid AST dump", cli.file.display()))?;

    debug!(
        "analyzing {} declaration(s), {} top-level statement(s)",
        file.declarations.len(),
        file.statements.len()
    );
    let analysis = analyze(&file);

    if cli.json {
        print_json(&analysis, cli.quiet)?;
    } else {
        print_annotated(&analysis, cli.quiet);
    }

    if !analysis.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_json(analysis: &Analysis, quiet: bool) -> Result<()> {
    let to_entries = |diagnostics: &[vela_lang::typechecker::Diagnostic]| {
        diagnostics
            .iter()
            .map(|d| {
                serde_json::json!({
                    "code": d.code.as_str(),
                    "message": d.message,
                    "line": d.position.start.0 + 1,
                    "column": d.position.start.1 + 1,
                })
            })
            .collect::<Vec<_>>()
    };

    let mut report = serde_json::json!({ "errors": to_entries(&analysis.errors) });
    if !quiet {
        report["warnings"] = serde_json::Value::Array(to_entries(&analysis.warnings));
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_annotated(analysis: &Analysis, quiet: bool) {
    for error in &analysis.errors {
        eprintln!("{}: {}\n", "error".red().bold(), error.render());
    }
    if !quiet {
        for warning in &analysis.warnings {
            eprintln!("{}: {}\n", "warning".yellow().bold(), warning.render());
        }
    }

    let summary = format!(
        "{} error(s), {} warning(s)",
        analysis.errors.len(),
        analysis.warnings.len()
    );
    if analysis.is_clean() {
        eprintln!("{}", summary.green());
    } else {
        eprintln!("{}", summary.red());
    }
}
