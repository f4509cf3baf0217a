//! Front end for the astcc schema notation.
//!
//! Turns schema text into the [`Schema`] model in three steps:
//! - [`lex`]: logos tokenizer, code blocks and the `%%` section kept raw
//! - [`Parser`]: recursive descent into a per-file syntax tree
//! - [`lower`]: symbol registration across all files, then node building
//!
//! [`parse_sources`] runs all three over a [`SourceMap`].

mod cursor;
mod error;
mod grammar;
mod lexer;
mod lower;
pub mod syntax;
mod token;

pub use error::ParseError;
pub use grammar::Parser;
pub use lexer::{lex, LexOutput};
pub use lower::{lower, LowerOutput};
pub use token::{FlagKeyword, Token, TokenKind};

use astcc_diagnostic::{has_errors, Diagnostic};
use astcc_ir::{Schema, SourceId, SourceMap};
use tracing::debug;

use crate::syntax::SchemaFile;

/// Result of parsing one file.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub file: SchemaFile,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex and parse one file.
///
/// A file with lexical errors is not parsed; its token stream would only
/// produce follow-on syntax errors.
pub fn parse(text: &str, source: SourceId) -> ParseOutput {
    let lexed = lex(text, source);
    if !lexed.errors.is_empty() {
        return ParseOutput {
            file: SchemaFile::default(),
            errors: lexed.errors,
        };
    }

    let (file, errors) = Parser::new(&lexed.tokens).parse_file();
    ParseOutput { file, errors }
}

/// Result of running the front end over every input.
#[derive(Clone, Debug)]
pub struct FrontEnd {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

impl FrontEnd {
    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }
}

/// Parse every source in order and lower them into one schema.
///
/// Lowering only runs when every file parsed cleanly; otherwise the returned
/// schema holds just the built-in declarations.
#[tracing::instrument(level = "debug", skip_all, fields(sources = sources.len()))]
pub fn parse_sources(sources: &SourceMap) -> FrontEnd {
    let mut files = Vec::with_capacity(sources.len());
    let mut diagnostics = Vec::new();

    for (id, source) in sources.iter() {
        let output = parse(&source.text, id);
        debug!(
            file = %source.name(),
            items = output.file.items.len(),
            errors = output.errors.len(),
            "parsed"
        );
        diagnostics.extend(output.errors.iter().map(ParseError::to_diagnostic));
        files.push(output.file);
    }

    if !diagnostics.is_empty() {
        return FrontEnd {
            schema: Schema::new(),
            diagnostics,
        };
    }

    let lowered = lower(&files);
    FrontEnd {
        schema: lowered.schema,
        diagnostics: lowered.diagnostics,
    }
}
