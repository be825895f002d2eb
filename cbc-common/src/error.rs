//! Error handling for the Cflat compiler
//!
//! Two layers live here. `ErrorReporter` is the diagnostics sink a pass
//! records into while it keeps walking the tree; `CompilerError` is the
//! coarse outcome a pass returns once it is done.

use crate::source_loc::SourceSpan;
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Outcome of a compiler phase that could not hand its result downstream
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("semantic analysis failed: {errors} error(s), {warnings} warning(s)")]
    SemanticFailed { errors: usize, warnings: usize },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CompilerError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CompilerError::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A recorded diagnostic message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<SourceSpan>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span: None,
        }
    }

    pub fn at(mut self, span: &SourceSpan) -> Self {
        if !span.is_unknown() {
            self.span = Some(span.clone());
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "{}: ", span)?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Append-only diagnostics sink.
///
/// Diagnostics are kept in the order they were recorded, which is the
/// traversal order of the pass that recorded them.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Diagnostic::error(message));
    }

    /// Record a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Diagnostic::warning(message));
    }

    pub fn error_at(&mut self, span: &SourceSpan, message: impl Into<String>) {
        self.record(Diagnostic::error(message).at(span));
    }

    pub fn warn_at(&mut self, span: &SourceSpan, message: impl Into<String>) {
        self.record(Diagnostic::warning(message).at(span));
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        trace!("recorded {}", diagnostic);
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    /// True once at least one error (not warning) has been recorded
    pub fn error_occurred(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Messages of recorded errors, in recording order
    pub fn error_messages(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.message.as_str())
            .collect()
    }

    /// Messages of recorded warnings, in recording order
    pub fn warning_messages(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| !d.is_error())
            .map(|d| d.message.as_str())
            .collect()
    }

    /// Append another sink's diagnostics after ours, preserving both orders
    pub fn merge(&mut self, other: ErrorReporter) {
        for diagnostic in other.diagnostics {
            self.record(diagnostic);
        }
    }

    pub fn summary(&self) -> String {
        summarize(self.error_count, self.warning_count)
    }
}

fn summarize(errors: usize, warnings: usize) -> String {
    let plural = |n: usize| if n == 1 { "" } else { "s" };
    match (errors, warnings) {
        (0, 0) => "No errors or warnings".to_string(),
        (0, w) => format!("{} warning{}", w, plural(w)),
        (e, 0) => format!("{} error{}", e, plural(e)),
        (e, w) => format!("{} error{} and {} warning{}", e, plural(e), w, plural(w)),
    }
}
