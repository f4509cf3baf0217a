//! Cooked tokens handed from the lexer to the parser.

use std::fmt;

use astcc_ir::Span;

/// Flag keywords that follow a declaration header.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FlagKeyword {
    Abstract,
    Public,
    Protected,
    Private,
    Static,
    NoInlines,
    NoInit,
    External,
}

impl FlagKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKeyword::Abstract => "%abstract",
            FlagKeyword::Public => "%public",
            FlagKeyword::Protected => "%protected",
            FlagKeyword::Private => "%private",
            FlagKeyword::Static => "%static",
            FlagKeyword::NoInlines => "%no_inlines",
            FlagKeyword::NoInit => "%no_init",
            FlagKeyword::External => "%external",
        }
    }
}

impl fmt::Display for FlagKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Directives
    Include,
    Type,
    Node,
    Attr,
    Method,
    Factory,
    Flag(FlagKeyword),

    /// Identifier, possibly qualified (`std::string`).
    Ident(String),
    /// Contents of a `"..."` literal, quotes removed.
    Str(String),
    /// An `<...>` include path, delimiters kept.
    AnglePath(String),
    /// Trimmed contents of a `%{ ... %}` block.
    Code(String),
    /// Text after the `%%` line, up to end of file.
    Trailing(String),

    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,

    Eof,
}

impl TokenKind {
    /// Human-readable name for error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Include => "`%include`".to_string(),
            TokenKind::Type => "`%type`".to_string(),
            TokenKind::Node => "`%node`".to_string(),
            TokenKind::Attr => "`%attr`".to_string(),
            TokenKind::Method => "`%method`".to_string(),
            TokenKind::Factory => "`%factory`".to_string(),
            TokenKind::Flag(flag) => format!("`{flag}`"),
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Str(text) => format!("string \"{text}\""),
            TokenKind::AnglePath(path) => format!("include path `{path}`"),
            TokenKind::Code(_) => "code block".to_string(),
            TokenKind::Trailing(_) => "`%%`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }

    /// Whether this token starts a top-level item. Used to resynchronise
    /// after a syntax error.
    pub fn starts_item(&self) -> bool {
        matches!(
            self,
            TokenKind::Include
                | TokenKind::Type
                | TokenKind::Node
                | TokenKind::Trailing(_)
                | TokenKind::Eof
        )
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}
