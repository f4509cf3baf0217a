//! Lexer for the schema notation, built on logos.
//!
//! Raw tokens are cooked into [`Token`]s carrying their text. Code blocks
//! and the trailing `%%` section are consumed whole by logos callbacks, so
//! their contents never reach the token rules.

use astcc_diagnostic::ErrorCode;
use astcc_ir::{SourceId, Span};
use logos::{Lexer, Logos};

use crate::token::{FlagKeyword, Token, TokenKind};
use crate::ParseError;

/// Consume everything up to and including the closing `%}`.
///
/// Returns `false` when the block never closes; the whole remainder is
/// consumed so lexing stops there.
fn lex_code_block(lex: &mut Lexer<'_, RawToken>) -> bool {
    if let Some(end) = lex.remainder().find("%}") {
        lex.bump(end + 2);
        true
    } else {
        lex.bump(lex.remainder().len());
        false
    }
}

/// Consume the rest of the file after `%%`.
fn lex_trailing(lex: &mut Lexer<'_, RawToken>) -> bool {
    lex.bump(lex.remainder().len());
    true
}

/// Raw token from logos (before cooking).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("%include")]
    Include,
    #[token("%type")]
    Type,
    #[token("%node")]
    Node,
    #[token("%attr")]
    Attr,
    #[token("%method")]
    Method,
    #[token("%factory")]
    Factory,

    #[token("%abstract")]
    Abstract,
    #[token("%public")]
    Public,
    #[token("%protected")]
    Protected,
    #[token("%private")]
    Private,
    #[token("%static")]
    Static,
    #[token("%no_inlines")]
    NoInlines,
    #[token("%no_init")]
    NoInit,
    #[token("%external")]
    External,

    // Any other `%word` is a misspelt directive
    #[regex(r"%[a-zA-Z_][a-zA-Z0-9_]*")]
    UnknownDirective,

    #[token("%{", lex_code_block)]
    CodeBlock,

    #[token("%%", lex_trailing)]
    Trailing,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // String literal (no unescaped newlines allowed)
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,

    #[regex(r"<[^<>\n]*>")]
    AnglePath,

    // Identifier, optionally `::`-qualified
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(::[a-zA-Z_][a-zA-Z0-9_]*)*")]
    Ident,
}

/// Result of lexing one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexOutput {
    /// Always ends with [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    pub errors: Vec<ParseError>,
}

/// Lex one schema file.
#[tracing::instrument(level = "trace", skip(text))]
pub fn lex(text: &str, source: SourceId) -> LexOutput {
    let mut output = LexOutput::default();
    let mut logos = RawToken::lexer(text);

    while let Some(token_result) = logos.next() {
        let span = match Span::try_from_range(source, logos.span()) {
            Ok(span) => span,
            Err(e) => {
                output.errors.push(ParseError::new(
                    ErrorCode::E0001,
                    format!("source file is too large: {e}"),
                    Span::new(source, 0, 0),
                ));
                break;
            }
        };
        let slice = logos.slice();

        match token_result {
            Ok(RawToken::LineComment) => {}
            Ok(RawToken::UnknownDirective) => {
                output.errors.push(
                    ParseError::new(
                        ErrorCode::E0001,
                        format!("unknown directive `{slice}`"),
                        span,
                    )
                    .with_context("not a directive or flag"),
                );
            }
            Ok(raw) => output.tokens.push(Token::new(cook(raw, slice), span)),
            Err(()) => output.errors.push(lex_error(slice, span)),
        }
    }

    let eof = u32::try_from(text.len()).unwrap_or(u32::MAX);
    output
        .tokens
        .push(Token::new(TokenKind::Eof, Span::new(source, eof, eof)));
    output
}

#[cold]
fn lex_error(slice: &str, span: Span) -> ParseError {
    if slice.starts_with("%{") {
        ParseError::new(ErrorCode::E0002, "unterminated code block", span)
            .with_context("this `%{` is never closed")
            .with_help("add `%}` at the end of the code")
    } else if slice.starts_with('"') {
        ParseError::new(ErrorCode::E0003, "unterminated string literal", span)
            .with_context("string starts here")
            .with_help("close the string with `\"` on the same line")
    } else {
        ParseError::new(
            ErrorCode::E0001,
            format!("unexpected character `{}`", slice.escape_debug()),
            span,
        )
        .with_context("not valid in a schema")
    }
}

fn cook(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Include => TokenKind::Include,
        RawToken::Type => TokenKind::Type,
        RawToken::Node => TokenKind::Node,
        RawToken::Attr => TokenKind::Attr,
        RawToken::Method => TokenKind::Method,
        RawToken::Factory => TokenKind::Factory,

        RawToken::Abstract => TokenKind::Flag(FlagKeyword::Abstract),
        RawToken::Public => TokenKind::Flag(FlagKeyword::Public),
        RawToken::Protected => TokenKind::Flag(FlagKeyword::Protected),
        RawToken::Private => TokenKind::Flag(FlagKeyword::Private),
        RawToken::Static => TokenKind::Flag(FlagKeyword::Static),
        RawToken::NoInlines => TokenKind::Flag(FlagKeyword::NoInlines),
        RawToken::NoInit => TokenKind::Flag(FlagKeyword::NoInit),
        RawToken::External => TokenKind::Flag(FlagKeyword::External),

        RawToken::CodeBlock => {
            let inner = slice
                .strip_prefix("%{")
                .and_then(|s| s.strip_suffix("%}"))
                .unwrap_or("");
            TokenKind::Code(inner.trim().to_string())
        }
        RawToken::Trailing => TokenKind::Trailing(trailing_text(slice)),

        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,

        RawToken::String => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::Str(content.replace("\\\"", "\"").replace("\\\\", "\\"))
        }
        RawToken::AnglePath => TokenKind::AnglePath(slice.to_string()),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),

        RawToken::LineComment | RawToken::UnknownDirective => {
            unreachable!("comments and unknown directives are filtered before cooking")
        }
    }
}

/// Text after the `%%` marker, with the remainder of the marker's own line
/// dropped.
fn trailing_text(slice: &str) -> String {
    slice
        .split_once('\n')
        .map_or_else(String::new, |(_, rest)| rest.to_string())
}
