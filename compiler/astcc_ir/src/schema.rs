//! The schema model: nodes with their attributes and methods.
//!
//! Nodes live in a single arena in declaration order. A node's parent is a
//! [`NodeId`] set by the inheritance resolver after every declaration is
//! known; until then only the declared parent *name* is recorded.
//!
//! # Precondition
//!
//! Queries that walk the ancestor chain assume the parent links form a
//! forest. The resolver establishes this (it breaks and reports cycles);
//! the walks here are additionally bounded by the arena size.

use std::fmt;

use crate::{AttrFlags, MethodFlags, NodeFlags, Span, SymbolId, SymbolTable};

/// Name of the implicit abstract root node.
pub const COMMON_NODE: &str = "Common";

/// Name of the built-in type symbol.
pub const VOID_TYPE: &str = "void";

/// Index into the node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A method parameter. Never entered into the symbol table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: SymbolId,
    pub span: Span,
}

/// A typed field of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub ty: SymbolId,
    pub flags: AttrFlags,
    /// Initialiser text used when `NO_INIT` is set.
    pub default_code: Option<String>,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: impl Into<String>, ty: SymbolId) -> Self {
        Attribute {
            name: name.into(),
            ty,
            flags: AttrFlags::empty(),
            default_code: None,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: AttrFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_default(mut self, code: impl Into<String>) -> Self {
        self.default_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Whether this attribute takes a constructor parameter.
    #[inline]
    pub fn needs_init_param(&self) -> bool {
        !self.flags.contains(AttrFlags::NO_INIT)
    }
}

/// A member function of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub return_type: SymbolId,
    pub flags: MethodFlags,
    pub params: Vec<Parameter>,
    /// Inline body, copied verbatim into the output.
    pub code: Option<String>,
    pub span: Span,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: SymbolId) -> Self {
        Method {
            name: name.into(),
            return_type,
            flags: MethodFlags::empty(),
            params: Vec::new(),
            code: None,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, ty: SymbolId) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            ty,
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Whether a non-blank inline body was supplied.
    pub fn has_code(&self) -> bool {
        self.code.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MethodFlags::ABSTRACT)
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.flags.contains(MethodFlags::EXTERNAL)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    /// Two methods collide when name and parameter types match pairwise.
    /// Parameter names and return types are not part of the signature.
    pub fn same_signature(&self, other: &Method) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty == b.ty)
    }
}

/// A generated class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub name: SymbolId,
    /// Parent as written in the schema; `None` for a declared root.
    pub parent_name: Option<String>,
    /// Parent as resolved; `None` until resolution, and for roots.
    pub parent: Option<NodeId>,
    /// Type advertised by the `Factory` function instead of the node itself.
    pub factory_type: Option<SymbolId>,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub flags: NodeFlags,
    pub span: Span,
}

impl Node {
    pub fn new(name: SymbolId) -> Self {
        Node {
            name,
            parent_name: None,
            parent: None,
            factory_type: None,
            attributes: Vec::new(),
            methods: Vec::new(),
            flags: NodeFlags::empty(),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_factory_type(mut self, ty: SymbolId) -> Self {
        self.factory_type = Some(ty);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(NodeFlags::ABSTRACT)
    }

    /// Own attributes that take a constructor parameter, in declaration order.
    pub fn init_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.needs_init_param())
    }
}

/// One `#include` directive, copied verbatim (delimiters included).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Include {
    pub text: String,
    pub span: Span,
}

/// The whole compilation: symbol table, node arena, includes and trailing code.
///
/// This is the single context object threaded through resolution,
/// validation and emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub symbols: SymbolTable,
    nodes: Vec<Node>,
    pub includes: Vec<Include>,
    /// Verbatim code appended after the last class.
    pub trailing_code: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Create a schema holding the implicit abstract `Common` root and the
    /// built-in `void` type, declared in that order.
    pub fn new() -> Self {
        let mut symbols = SymbolTable::new();
        let mut nodes = Vec::new();
        if let Ok(common) = symbols.add_node(COMMON_NODE) {
            nodes.push(Node::new(common).with_flags(NodeFlags::ABSTRACT));
        }
        let _ = symbols.add_type(VOID_TYPE);
        Schema {
            symbols,
            nodes,
            includes: Vec::new(),
            trailing_code: String::new(),
        }
    }

    /// The implicit root node.
    pub fn common(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a node to the arena.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes, `Common` included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(u32::try_from(i).unwrap_or(u32::MAX)), n))
    }

    /// All node ids in declaration order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(|i| NodeId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// Name of a node.
    #[inline]
    pub fn node_name(&self, id: NodeId) -> &str {
        self.symbols.name(self.node(id).name)
    }

    /// Name of a type or node symbol.
    #[inline]
    pub fn type_name(&self, ty: SymbolId) -> &str {
        self.symbols.name(ty)
    }

    /// Find a node by name (linear search, declaration order).
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, n)| self.symbols.name(n.name) == name)
            .map(|(id, _)| id)
    }

    /// Resolved parent of a node.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The ancestor chain ending at `id`, root first.
    pub fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if chain.len() > self.nodes.len() {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    pub fn is_self_or_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.lineage(id).contains(&ancestor)
    }

    /// Number of constructor parameters of a node: every attribute without
    /// `NO_INIT` along the ancestor chain.
    pub fn init_param_count(&self, id: NodeId) -> usize {
        self.lineage(id)
            .into_iter()
            .map(|n| self.node(n).init_attributes().count())
            .sum()
    }

    /// Number of entries in a node's constructor initialiser list apart from
    /// the base-class call: the parent's parameters plus every own attribute.
    /// Zero means the constructor has no initialiser list at all.
    pub fn initializer_count(&self, id: NodeId) -> usize {
        let inherited = self.parent(id).map_or(0, |p| self.init_param_count(p));
        inherited + self.node(id).attributes.len()
    }

    /// The type a node's `Factory` function is declared to return.
    pub fn factory_return_type(&self, id: NodeId) -> SymbolId {
        let node = self.node(id);
        node.factory_type.unwrap_or(node.name)
    }
}
