//! Syntax tree of one schema file, before names are resolved.

use astcc_ir::Span;

use crate::token::FlagKeyword;

/// A name as written, with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A flag keyword occurrence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Flag {
    pub keyword: FlagKeyword,
    pub span: Span,
}

/// One parsed schema file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaFile {
    pub items: Vec<Item>,
    /// Verbatim text after `%%`, if the file has a trailing section.
    pub trailing: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// `%include <path>` or `%include "path"`; text keeps its delimiters.
    Include { text: String, span: Span },
    /// `%type name`
    Type(Ident),
    Node(NodeDecl),
}

/// `%node Name [: Parent] [flags] { features }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDecl {
    pub name: Ident,
    pub parent: Option<Ident>,
    pub flags: Vec<Flag>,
    pub features: Vec<Feature>,
    pub span: Span,
}

/// A member of a node body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feature {
    Attr(AttrDecl),
    Method(MethodDecl),
    /// `%factory Type`: the type the node's `Factory` advertises.
    Factory(Ident),
}

/// `%attr Type name [flags] [%{ default %}]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrDecl {
    pub ty: Ident,
    pub name: Ident,
    pub flags: Vec<Flag>,
    pub default_code: Option<String>,
    pub span: Span,
}

/// `%method Type name(Type a, Type b) [flags] [%{ body %}]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub return_type: Ident,
    pub name: Ident,
    pub params: Vec<ParamDecl>,
    pub flags: Vec<Flag>,
    pub code: Option<String>,
    pub span: Span,
}

/// `Type name` inside a method parameter list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub ty: Ident,
    pub name: Ident,
}
