//! Constructor signatures.
//!
//! A node's constructor takes one parameter per initialised attribute along
//! its ancestor chain, root first, each node's slice in declaration order.
//! The constructor's formal list, the `Factory` argument list and a child's
//! base-class initialiser are all rendered from [`constructor_params`], so
//! the three can never drift apart.

use astcc_ir::{NodeId, Schema, SymbolId};

/// Prefix of every generated constructor parameter name.
pub const INIT_PREFIX: &str = "__init__";

/// One constructor parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InitParam<'s> {
    /// The node that declares the attribute.
    pub owner: NodeId,
    /// The attribute name.
    pub attribute: &'s str,
    pub ty: SymbolId,
}

impl InitParam<'_> {
    /// The parameter name, `__init__<attribute>`.
    pub fn param_name(&self) -> String {
        format!("{INIT_PREFIX}{}", self.attribute)
    }
}

/// The full constructor parameter list of `node`, ancestors first.
pub fn constructor_params(schema: &Schema, node: NodeId) -> Vec<InitParam<'_>> {
    let mut params = Vec::with_capacity(schema.init_param_count(node));
    push_params(schema, Some(node), 0, &mut params);
    params
}

fn push_params<'s>(
    schema: &'s Schema,
    node: Option<NodeId>,
    depth: usize,
    out: &mut Vec<InitParam<'s>>,
) {
    let Some(id) = node else {
        return;
    };
    // A resolved schema is a forest; the bound only stops a malformed one.
    if depth >= schema.node_count() {
        return;
    }

    push_params(schema, schema.parent(id), depth + 1, out);
    out.extend(schema.node(id).init_attributes().map(|attr| InitParam {
        owner: id,
        attribute: &attr.name,
        ty: attr.ty,
    }));
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
