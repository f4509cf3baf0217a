//! Diagnostics for schema compilation.
//!
//! Every phase reports problems as [`Diagnostic`]s instead of printing
//! directly:
//! - an [`ErrorCode`] for searchability
//! - a message naming the offending node, attribute, method or include
//! - labelled spans pointing into the schema source
//! - notes and suggestions
//!
//! Phases accumulate diagnostics and hand them back; the driver renders
//! them through a [`emitter::DiagnosticEmitter`] and turns the presence of
//! errors into a proceed/abort decision.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{count_errors, count_warnings, has_errors, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
