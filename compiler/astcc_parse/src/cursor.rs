//! Token cursor for navigating the token stream.

use astcc_diagnostic::ErrorCode;
use astcc_ir::Span;

use crate::syntax::Ident;
use crate::token::{Token, TokenKind};
use crate::ParseError;

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

/// Cursor over a lexed token list.
///
/// The lexer always terminates the list with [`TokenKind::Eof`]; the cursor
/// never advances past it.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check the current token against a payload-free kind.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token and return it.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or fail with `E1001`.
    pub fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.make_expect_error(&kind.display_name()))
        }
    }

    /// Consume a plain identifier.
    pub fn expect_ident(&mut self, what: &str) -> Result<Ident, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            Ok(Ident {
                name: name.clone(),
                span,
            })
        } else {
            Err(ParseError::new(
                ErrorCode::E1002,
                format!(
                    "expected {what}, found {}",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            )
            .with_context(format!("expected {what}")))
        }
    }

    /// Consume a type name: an identifier or a quoted string.
    pub fn expect_type_name(&mut self, what: &str) -> Result<Ident, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) | TokenKind::Str(name) => {
                let span = self.advance().span;
                Ok(Ident {
                    name: name.clone(),
                    span,
                })
            }
            other => Err(ParseError::new(
                ErrorCode::E1003,
                format!("expected {what}, found {}", other.display_name()),
                self.current_span(),
            )
            .with_context(format!("expected {what}"))
            .with_help("type names with spaces or punctuation must be quoted")),
        }
    }

    /// Build the error for a failed `expect()` call.
    #[cold]
    #[inline(never)]
    pub fn make_expect_error(&self, expected: &str) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {expected}, found {}",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {expected}"))
    }
}
