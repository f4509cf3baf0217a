//! The global symbol table.
//!
//! There is a single scope, so the table is a plain vector searched linearly.
//! Schemas are small and this runs once per build, so nothing cleverer is
//! warranted. A name is declared exactly once, either as a type or as a node;
//! symbols are never removed.

use std::fmt;

/// What a declared name stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A plain target-language type usable for attributes, parameters and returns.
    Type,
    /// A node (generated class) of the hierarchy.
    Node,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Type => write!(f, "type"),
            SymbolKind::Node => write!(f, "node"),
        }
    }
}

/// Index into the [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// A declared name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    #[inline]
    pub fn is_node(&self) -> bool {
        self.kind == SymbolKind::Node
    }
}

/// Returned when a name is declared a second time.
///
/// This is not fatal by itself; the caller decides how to report it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{name}` is already declared as a {existing}")]
pub struct AlreadyDeclared {
    pub name: String,
    /// Kind of the symbol that holds the name.
    pub existing: SymbolKind,
    /// Id of the symbol that holds the name.
    pub id: SymbolId,
}

/// Flat table of every declared type and node name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type name.
    pub fn add_type(&mut self, name: &str) -> Result<SymbolId, AlreadyDeclared> {
        self.add(name, SymbolKind::Type)
    }

    /// Declare a node name.
    pub fn add_node(&mut self, name: &str) -> Result<SymbolId, AlreadyDeclared> {
        self.add(name, SymbolKind::Node)
    }

    fn add(&mut self, name: &str, kind: SymbolKind) -> Result<SymbolId, AlreadyDeclared> {
        if self.lookup(name) {
            return Err(self.already_declared(name));
        }
        let id = SymbolId(u32::try_from(self.symbols.len()).unwrap_or(u32::MAX));
        self.symbols.push(Symbol {
            name: name.to_owned(),
            kind,
        });
        Ok(id)
    }

    fn already_declared(&self, name: &str) -> AlreadyDeclared {
        let (id, existing) = self
            .iter()
            .find(|(_, s)| s.name == name)
            .map_or((SymbolId(u32::MAX), SymbolKind::Type), |(id, s)| (id, s.kind));
        AlreadyDeclared {
            name: name.to_owned(),
            existing,
            id,
        }
    }

    /// Whether `name` is declared, regardless of kind.
    pub fn lookup(&self, name: &str) -> bool {
        self.symbols.iter().any(|s| s.name == name)
    }

    /// The symbol declared as `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// The id of the symbol declared as `name`, if any.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.iter().find(|(_, s)| s.name == name).map(|(id, _)| id)
    }

    /// Resolve an id handed out by this table.
    ///
    /// # Panics
    /// Panics if `id` came from a different table.
    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Name of the symbol behind `id`.
    #[inline]
    pub fn name(&self, id: SymbolId) -> &str {
        &self.symbol(id).name
    }

    /// Whether `id` names a node.
    #[inline]
    pub fn is_node(&self, id: SymbolId) -> bool {
        self.symbol(id).is_node()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(u32::try_from(i).unwrap_or(u32::MAX)), s))
    }

    /// Node symbols in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.iter().filter(|(_, s)| s.is_node())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
