//! Whole-schema checks that run after the front end.
//!
//! - [`resolve_inheritance`] links every node to its parent by name
//! - [`validate`] runs the semantic checks and applies the documented
//!   model repairs (default attribute visibility, `EXTERNAL` coercion)
//!
//! Both accumulate [`Diagnostic`](astcc_diagnostic::Diagnostic)s instead of
//! stopping at the first problem.

mod resolve;
mod validate;

pub use resolve::resolve_inheritance;
pub use validate::{validate, ValidateOptions, Validation};
