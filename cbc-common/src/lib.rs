//! Cflat Compiler - Common Types and Utilities
//!
//! Diagnostics, error types and source locations shared by every
//! phase of the Cflat compiler.

pub mod error;
pub mod source_loc;

pub use error::{CompilerError, Diagnostic, ErrorReporter, Severity};
pub use source_loc::{HasSpan, SourceLocation, SourceSpan};
