//! Cflat Compiler Driver
//!
//! Command-line entry point for the semantic-analysis phase.

use anyhow::{Context, Result};
use cbc_driver::{check_source, Format, Target};
use cbc_frontend::Frontend;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "cbc", version, about = "Cflat Compiler - semantic analysis")]
struct Args {
    /// Scope-resolved AST in JSON form
    input: PathBuf,

    /// Target data model deciding integer and pointer widths
    #[arg(long, value_enum, default_value_t = Target::Lp64)]
    target: Target,

    /// Write the checked AST here as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Diagnostics format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::init();
    }

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let report = check_source(&input, args.target)
        .with_context(|| format!("failed to check {}", args.input.display()))?;

    match args.format {
        Format::Text => eprint!("{}", report.render(Format::Text)?),
        Format::Json => println!("{}", report.render(Format::Json)?),
    }

    let Some(ast) = &report.ast else {
        if args.format == Format::Text {
            eprintln!(
                "semantic analysis failed: {} error(s), {} warning(s)",
                report.errors, report.warnings
            );
        }
        return Ok(ExitCode::FAILURE);
    };

    if let Some(output_path) = args.output {
        fs::write(&output_path, Frontend::to_json(ast)?)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
    }

    Ok(ExitCode::SUCCESS)
}
