//! Inheritance resolution.
//!
//! Runs once every node is known, so a node may name a parent declared after
//! it. Unknown parents leave the node a root. Cycles are broken so that
//! later phases always walk a forest.

use astcc_diagnostic::{Diagnostic, ErrorCode};
use astcc_ir::{NodeId, Schema, SymbolKind};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Link each node to its declared parent.
///
/// Returns warnings for parents that are not nodes and errors for
/// inheritance cycles. Resolution can be repeated; links are always
/// recomputed from the declared parent names.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = schema.node_count()))]
pub fn resolve_inheritance(schema: &mut Schema) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let links = link_parents(schema, &mut diagnostics);

    for (id, parent) in schema.node_ids().collect::<Vec<_>>().into_iter().zip(links) {
        schema.node_mut(id).parent = parent;
    }

    for cycle in find_cycles(schema) {
        diagnostics.push(cycle_diagnostic(schema, &cycle));
        // Members are listed from the lowest id
        schema.node_mut(cycle[0]).parent = None;
    }

    debug!(diagnostics = diagnostics.len(), "resolved inheritance");
    diagnostics
}

/// Look up every declared parent name, in declaration order.
fn link_parents(schema: &Schema, diagnostics: &mut Vec<Diagnostic>) -> Vec<Option<NodeId>> {
    let by_name: FxHashMap<&str, NodeId> = schema
        .nodes()
        .map(|(id, node)| (schema.symbols.name(node.name), id))
        .collect();

    schema
        .nodes()
        .map(|(id, node)| {
            let parent_name = node.parent_name.as_deref()?;
            if let Some(&parent) = by_name.get(parent_name) {
                trace!(node = schema.node_name(id), parent = parent_name, "linked");
                return Some(parent);
            }

            let reason = match schema.symbols.get(parent_name).map(|s| s.kind) {
                Some(SymbolKind::Type) => "is a type, not a node",
                Some(SymbolKind::Node) | None => "is not declared",
            };
            diagnostics.push(
                Diagnostic::warning(ErrorCode::E3001)
                    .with_message(format!(
                        "Parent {parent_name} of class {} {reason}",
                        schema.node_name(id)
                    ))
                    .with_label(node.span, "declared here")
                    .with_note("the class is generated without a base class"),
            );
            None
        })
        .collect()
}

/// Every parent cycle, each listed once starting from its lowest id and
/// following parent links.
fn find_cycles(schema: &Schema) -> Vec<Vec<NodeId>> {
    #[derive(Copy, Clone, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; schema.node_count()];
    let mut cycles = Vec::new();

    for start in schema.node_ids() {
        let mut path = Vec::new();
        let mut current = Some(start);

        while let Some(id) = current {
            match marks[id.index()] {
                Mark::Done => break,
                Mark::OnPath => {
                    if let Some(pos) = path.iter().position(|&n| n == id) {
                        let mut cycle: Vec<NodeId> = path[pos..].to_vec();
                        let lowest = cycle
                            .iter()
                            .enumerate()
                            .min_by_key(|(_, n)| n.index())
                            .map_or(0, |(i, _)| i);
                        cycle.rotate_left(lowest);
                        cycles.push(cycle);
                    }
                    break;
                }
                Mark::Unvisited => {
                    marks[id.index()] = Mark::OnPath;
                    path.push(id);
                    current = schema.parent(id);
                }
            }
        }

        for id in path {
            marks[id.index()] = Mark::Done;
        }
    }

    cycles.sort_by_key(|cycle| cycle[0].index());
    cycles
}

fn cycle_diagnostic(schema: &Schema, cycle: &[NodeId]) -> Diagnostic {
    let first = cycle[0];
    let chain: Vec<&str> = cycle
        .iter()
        .chain(std::iter::once(&first))
        .map(|&id| schema.node_name(id))
        .collect();

    let mut diag = Diagnostic::error(ErrorCode::E3002)
        .with_message(format!("Inheritance cycle: {}", chain.join(" -> ")))
        .with_label(schema.node(first).span, "cycle starts here");
    for &id in &cycle[1..] {
        diag = diag.with_secondary_label(schema.node(id).span, "part of the cycle");
    }
    diag.with_note(format!(
        "the parent link of {} is dropped to continue",
        schema.node_name(first)
    ))
}
