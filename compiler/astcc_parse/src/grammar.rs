//! Recursive-descent parser for the schema notation.
//!
//! Each top-level item is parsed independently. A syntax error inside an
//! item is recorded and the parser skips ahead to the next item keyword,
//! so one run reports every broken declaration in a file.

use astcc_diagnostic::ErrorCode;

use crate::cursor::Cursor;
use crate::syntax::{AttrDecl, Feature, Flag, Item, MethodDecl, NodeDecl, ParamDecl, SchemaFile};
use crate::token::{FlagKeyword, Token, TokenKind};
use crate::ParseError;

const NODE_FLAGS: &[FlagKeyword] = &[FlagKeyword::Abstract];

const ATTR_FLAGS: &[FlagKeyword] = &[
    FlagKeyword::Public,
    FlagKeyword::Protected,
    FlagKeyword::Private,
    FlagKeyword::Static,
    FlagKeyword::NoInlines,
    FlagKeyword::NoInit,
];

const METHOD_FLAGS: &[FlagKeyword] = &[
    FlagKeyword::Public,
    FlagKeyword::Protected,
    FlagKeyword::Private,
    FlagKeyword::Static,
    FlagKeyword::Abstract,
    FlagKeyword::External,
];

/// Flags and code block that may follow an attribute or method header.
struct Suffix {
    flags: Vec<Flag>,
    code: Option<String>,
}

pub struct Parser<'a> {
    cursor: Cursor<'a>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            errors: Vec::new(),
        }
    }

    /// Parse the whole token list.
    pub fn parse_file(mut self) -> (SchemaFile, Vec<ParseError>) {
        let mut file = SchemaFile::default();

        loop {
            match self.cursor.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Trailing(text) => {
                    file.trailing = Some(text.clone());
                    self.cursor.advance();
                }
                _ => match self.parse_item() {
                    Ok(item) => file.items.push(item),
                    Err(error) => {
                        self.errors.push(error);
                        self.synchronize();
                    }
                },
            }
        }

        (file, self.errors)
    }

    /// Skip to the next token that can start an item.
    ///
    /// Every failing item has consumed its directive keyword, except a stray
    /// token at item position, which is not an item start and so is skipped.
    fn synchronize(&mut self) {
        while !self.cursor.current_kind().starts_item() {
            self.cursor.advance();
        }
    }

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Include => self.parse_include(),
            TokenKind::Type => {
                self.cursor.advance();
                Ok(Item::Type(self.cursor.expect_type_name("a type name")?))
            }
            TokenKind::Node => self.parse_node().map(Item::Node),
            _ => Err(self
                .cursor
                .make_expect_error("`%include`, `%type`, `%node` or `%%`")),
        }
    }

    fn parse_include(&mut self) -> Result<Item, ParseError> {
        self.cursor.advance();
        let token = self.cursor.current();
        let text = match &token.kind {
            TokenKind::AnglePath(path) => path.clone(),
            TokenKind::Str(path) => format!("\"{path}\""),
            _ => {
                return Err(self
                    .cursor
                    .make_expect_error("an include path like `<file>` or `\"file\"`"))
            }
        };
        self.cursor.advance();
        Ok(Item::Include {
            text,
            span: token.span,
        })
    }

    fn parse_node(&mut self) -> Result<NodeDecl, ParseError> {
        let start = self.cursor.advance().span;
        let name = self.cursor.expect_ident("a node name")?;

        let parent = if self.cursor.eat(&TokenKind::Colon) {
            Some(self.cursor.expect_ident("a parent node name")?)
        } else {
            None
        };

        let suffix = self.parse_suffix(NODE_FLAGS, "a node", false)?;

        let open = self.cursor.expect(&TokenKind::LBrace)?;
        let mut features = Vec::new();
        loop {
            match self.cursor.current_kind() {
                TokenKind::RBrace => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Attr => features.push(Feature::Attr(self.parse_attr()?)),
                TokenKind::Method => features.push(Feature::Method(self.parse_method()?)),
                TokenKind::Factory => {
                    self.cursor.advance();
                    features.push(Feature::Factory(
                        self.cursor.expect_type_name("a factory type name")?,
                    ));
                }
                kind if kind.starts_item() => {
                    return Err(ParseError::new(
                        ErrorCode::E1004,
                        format!("unclosed body of node `{}`", name.name),
                        self.cursor.current_span(),
                    )
                    .with_context(format!("expected `}}`, found {}", kind.display_name()))
                    .with_related(open, "body opened here"));
                }
                _ => {
                    return Err(self
                        .cursor
                        .make_expect_error("`%attr`, `%method`, `%factory` or `}`"));
                }
            }
        }

        Ok(NodeDecl {
            name,
            parent,
            flags: suffix.flags,
            features,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    fn parse_attr(&mut self) -> Result<AttrDecl, ParseError> {
        let start = self.cursor.advance().span;
        let ty = self.cursor.expect_type_name("an attribute type")?;
        let name = self.cursor.expect_ident("an attribute name")?;
        let suffix = self.parse_suffix(ATTR_FLAGS, "an attribute", true)?;

        Ok(AttrDecl {
            ty,
            name,
            flags: suffix.flags,
            default_code: suffix.code,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    fn parse_method(&mut self) -> Result<MethodDecl, ParseError> {
        let start = self.cursor.advance().span;
        let return_type = self.cursor.expect_type_name("a return type")?;
        let name = self.cursor.expect_ident("a method name")?;
        let params = self.parse_params()?;
        let suffix = self.parse_suffix(METHOD_FLAGS, "a method", true)?;

        Ok(MethodDecl {
            return_type,
            name,
            params,
            flags: suffix.flags,
            code: suffix.code,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `( [Type name {, Type name}] )`
    fn parse_params(&mut self) -> Result<Vec<ParamDecl>, ParseError> {
        let open = self.cursor.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();

        if self.cursor.eat(&TokenKind::RParen) {
            return Ok(params);
        }

        loop {
            let ty = self.cursor.expect_type_name("a parameter type")?;
            let name = self.cursor.expect_ident("a parameter name")?;
            params.push(ParamDecl { ty, name });

            if self.cursor.eat(&TokenKind::Comma) {
                continue;
            }
            if self.cursor.eat(&TokenKind::RParen) {
                return Ok(params);
            }
            return Err(self
                .cursor
                .make_expect_error("`,` or `)`")
                .with_related(open, "parameter list opened here"));
        }
    }

    /// Flags and an optional code block, in any order.
    ///
    /// Flags outside `allowed` are reported without aborting the item.
    fn parse_suffix(
        &mut self,
        allowed: &[FlagKeyword],
        what: &str,
        accepts_code: bool,
    ) -> Result<Suffix, ParseError> {
        let mut suffix = Suffix {
            flags: Vec::new(),
            code: None,
        };

        loop {
            let token = self.cursor.current();
            match &token.kind {
                TokenKind::Flag(keyword) => {
                    self.cursor.advance();
                    if allowed.contains(keyword) {
                        suffix.flags.push(Flag {
                            keyword: *keyword,
                            span: token.span,
                        });
                    } else {
                        self.errors.push(
                            ParseError::new(
                                ErrorCode::E1001,
                                format!("`{keyword}` cannot be applied to {what}"),
                                token.span,
                            )
                            .with_context("flag not allowed here"),
                        );
                    }
                }
                TokenKind::Code(code) if accepts_code => {
                    if suffix.code.is_some() {
                        return Err(ParseError::new(
                            ErrorCode::E1001,
                            format!("{what} takes at most one code block"),
                            token.span,
                        )
                        .with_context("second code block"));
                    }
                    self.cursor.advance();
                    suffix.code = Some(code.clone());
                }
                _ => return Ok(suffix),
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
