//! Cflat Compiler Driver
//!
//! Loads a scope-resolved AST serialized as JSON, runs semantic analysis
//! over it and reports the recorded diagnostics.

use anyhow::{Context, Result};
use cbc_common::{CompilerError, Diagnostic, ErrorReporter};
use cbc_frontend::{Ast, DataModel, Frontend};
use clap::ValueEnum;
use log::info;
use serde::Serialize;

/// Target data model selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Target {
    /// 32-bit int, long and pointers
    Ilp32,
    /// 32-bit int, 64-bit long and pointers
    #[default]
    Lp64,
}

impl From<Target> for DataModel {
    fn from(target: Target) -> Self {
        match target {
            Target::Ilp32 => DataModel::Ilp32,
            Target::Lp64 => DataModel::Lp64,
        }
    }
}

/// How diagnostics are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// One `severity: message` line per diagnostic
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Result of checking one input
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub passed: bool,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// The checked tree; only present when the pass succeeded
    #[serde(skip)]
    pub ast: Option<Ast>,
}

impl CheckReport {
    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Text => {
                let mut out = String::new();
                for diagnostic in &self.diagnostics {
                    out.push_str(&diagnostic.to_string());
                    out.push('\n');
                }
                Ok(out)
            }
            Format::Json => {
                serde_json::to_string_pretty(self).context("failed to serialize diagnostics")
            }
        }
    }
}

/// Check a JSON AST. Malformed input is an error; a failed semantic pass
/// is reported through the returned `CheckReport`.
pub fn check_source(json: &str, target: Target) -> Result<CheckReport> {
    let mut reporter = ErrorReporter::new();
    let outcome = Frontend::analyze_json(json, target.into(), &mut reporter);
    let (errors, warnings) = (reporter.error_count(), reporter.warning_count());
    info!("{}", reporter.summary());

    let ast = match outcome {
        Ok(ast) => Some(ast),
        Err(CompilerError::SemanticFailed { .. }) => None,
        Err(err) => return Err(err.into()),
    };
    Ok(CheckReport {
        passed: ast.is_some(),
        errors,
        warnings,
        diagnostics: reporter.into_diagnostics(),
        ast,
    })
}
