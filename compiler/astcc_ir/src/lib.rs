//! Core data structures for astcc.
//!
//! This crate holds everything the later phases share:
//!
//! - [`Span`] and [`SourceMap`]: where a declaration came from
//! - [`SymbolTable`]: the flat, globally unique namespace of type and node names
//! - [`Schema`]: the node arena (declaration order) with its attributes,
//!   methods, includes and trailing code
//!
//! # Ownership
//!
//! The `Schema` owns every `Node`; a node owns its attributes and methods.
//! Parent links are `NodeId` indices into the arena and never imply ownership,
//! so the inheritance forest can be walked without aliasing pointers.

mod flags;
mod schema;
mod source;
mod span;
mod symbol;

pub use flags::{AttrFlags, MethodFlags, NodeFlags, Visibility};
pub use schema::{Attribute, Include, Method, Node, NodeId, Parameter, Schema, COMMON_NODE, VOID_TYPE};
pub use source::{SourceFile, SourceId, SourceMap};
pub use span::{Span, SpanError};
pub use symbol::{AlreadyDeclared, Symbol, SymbolId, SymbolKind, SymbolTable};
