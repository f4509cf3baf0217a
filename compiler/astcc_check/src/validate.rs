//! Semantic validation.
//!
//! Every check runs over the whole schema and reports every violation it
//! finds. Two documented repairs mutate the model while validating:
//! - an attribute with no visibility bit becomes `PROTECTED`
//! - a method without code becomes `EXTERNAL`, even when that is reported
//!   as an error (disabled by [`ValidateOptions::repair_external`])

use astcc_diagnostic::{has_errors, Diagnostic, ErrorCode};
use astcc_ir::{AttrFlags, Method, MethodFlags, Node, NodeId, Schema, Span};
use tracing::{debug, trace};

/// Knobs for [`validate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Set `EXTERNAL` on every method without code. When `false`, the
    /// missing-`EXTERNAL` error is reported and the method is left as is.
    pub repair_external: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            repair_external: true,
        }
    }
}

/// Outcome of [`validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub diagnostics: Vec<Diagnostic>,
    /// `false` iff any diagnostic is an error.
    pub passed: bool,
}

/// Model changes decided while checking one node, applied afterwards.
#[derive(Default)]
struct Repairs {
    default_visibility: Vec<usize>,
    set_external: Vec<usize>,
}

/// Run every semantic check over a resolved schema.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = schema.node_count()))]
pub fn validate(schema: &mut Schema, options: &ValidateOptions) -> Validation {
    let mut diagnostics = Vec::new();

    check_includes(schema, &mut diagnostics);

    let ids: Vec<NodeId> = schema.node_ids().collect();
    for id in ids {
        let repairs = check_node(schema, id, options, &mut diagnostics);
        let node = schema.node_mut(id);
        for index in repairs.default_visibility {
            node.attributes[index].flags |= AttrFlags::PROTECTED;
        }
        for index in repairs.set_external {
            node.methods[index].flags |= MethodFlags::EXTERNAL;
        }
    }

    let passed = !has_errors(&diagnostics);
    debug!(passed, diagnostics = diagnostics.len(), "validated");
    Validation {
        diagnostics,
        passed,
    }
}

/// Includes compare as literal text: `<a.h>` and `"a.h"` differ.
fn check_includes(schema: &Schema, diagnostics: &mut Vec<Diagnostic>) {
    for (i, include) in schema.includes.iter().enumerate() {
        for other in &schema.includes[i + 1..] {
            if include.text == other.text {
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E4001)
                        .with_message(format!(
                            "Include file {} specified more than once",
                            include.text
                        ))
                        .with_label(other.span, "included again here")
                        .with_secondary_label(include.span, "first included here"),
                );
            }
        }
    }
}

fn check_node(
    schema: &Schema,
    id: NodeId,
    options: &ValidateOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Repairs {
    let node = schema.node(id);
    let class = schema.node_name(id);
    trace!(class, "checking node");

    let mut repairs = Repairs::default();
    check_attributes(schema, id, &mut repairs, diagnostics);

    for (index, method) in node.methods.iter().enumerate() {
        for other in &node.methods[index + 1..] {
            if method.same_signature(other) {
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E4005)
                        .with_message(format!(
                            "Signature of method {} is duplicated in class {class}",
                            method.name
                        ))
                        .with_label(other.span, "same name and parameter types")
                        .with_secondary_label(method.span, "first declared here")
                        .with_note("return types and parameter names are not part of a signature"),
                );
            }
        }

        for (a, b) in method.flags.visibility_conflicts() {
            diagnostics.push(
                Diagnostic::error(ErrorCode::E4008)
                    .with_message(format!(
                        "Cannot specify both {} and {} on method {} in class {class}",
                        a.label(),
                        b.label(),
                        method.name
                    ))
                    .with_label(method.span, "conflicting visibility"),
            );
        }

        check_abstract_method(node, class, method, diagnostics);

        if check_external(class, method, options, diagnostics) {
            repairs.set_external.push(index);
        }
    }

    if let Some(factory) = node.factory_type {
        let advertised = schema
            .find_node(schema.symbols.name(factory))
            .filter(|&target| schema.is_self_or_ancestor(target, id));
        if advertised.is_none() {
            diagnostics.push(
                Diagnostic::error(ErrorCode::E4012)
                    .with_message(format!(
                        "Factory type {} of class {class} is not the class or one of its ancestors",
                        schema.symbols.name(factory)
                    ))
                    .with_label(node.span, "in this class")
                    .with_note("the generated Factory would return an unrelated type"),
            );
        }
    }

    repairs
}

fn check_attributes(
    schema: &Schema,
    id: NodeId,
    repairs: &mut Repairs,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let node = schema.node(id);
    let class = schema.node_name(id);

    // Constructor parameter names already taken by ancestors
    let inherited: Vec<(&str, NodeId, Span)> = schema
        .parent(id)
        .map(|parent| schema.lineage(parent))
        .unwrap_or_default()
        .into_iter()
        .flat_map(|ancestor| {
            schema
                .node(ancestor)
                .init_attributes()
                .map(move |a| (a.name.as_str(), ancestor, a.span))
        })
        .collect();

    for (index, attr) in node.attributes.iter().enumerate() {
        for other in &node.attributes[index + 1..] {
            if attr.name == other.name {
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E4002)
                        .with_message(format!(
                            "Attribute name {} in class {class} is duplicated",
                            attr.name
                        ))
                        .with_label(other.span, "declared again here")
                        .with_secondary_label(attr.span, "first declared here"),
                );
            }
        }

        for method in node.methods.iter().filter(|m| m.name == attr.name) {
            diagnostics.push(
                Diagnostic::error(ErrorCode::E4003)
                    .with_message(format!(
                        "Attribute name {} in class {class} is duplicated by method {}",
                        attr.name, method.name
                    ))
                    .with_label(method.span, "method with the same name")
                    .with_secondary_label(attr.span, "attribute declared here"),
            );
        }

        if !attr.flags.intersects(AttrFlags::VISIBILITY) {
            repairs.default_visibility.push(index);
        }
        for (a, b) in attr.flags.visibility_conflicts() {
            diagnostics.push(
                Diagnostic::error(ErrorCode::E4004)
                    .with_message(format!(
                        "Cannot specify both {} and {} on attribute {} in class {class}",
                        a.label(),
                        b.label(),
                        attr.name
                    ))
                    .with_label(attr.span, "conflicting visibility"),
            );
        }

        let has_default = attr
            .default_code
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty());
        if !attr.needs_init_param() && !has_default {
            diagnostics.push(
                Diagnostic::error(ErrorCode::E4009)
                    .with_message(format!(
                        "NO_INIT attribute {} in class {class} has no default code",
                        attr.name
                    ))
                    .with_label(attr.span, "needs a default value")
                    .with_suggestion("add the initial value as a `%{ ... %}` block"),
            );
        } else if attr.needs_init_param() && has_default {
            diagnostics.push(
                Diagnostic::warning(ErrorCode::E4014)
                    .with_message(format!(
                        "Default code for attribute {} in class {class} is ignored without NO_INIT",
                        attr.name
                    ))
                    .with_label(attr.span, "initialised from a constructor parameter")
                    .with_suggestion("add `%no_init` to use the default code"),
            );
        }

        if attr.needs_init_param() {
            if let Some(&(_, owner, span)) = inherited.iter().find(|(name, _, _)| *name == attr.name)
            {
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E4013)
                        .with_message(format!(
                            "Attribute name {} in class {class} duplicates an attribute inherited from class {}",
                            attr.name,
                            schema.node_name(owner)
                        ))
                        .with_label(attr.span, "declared here")
                        .with_secondary_label(span, "inherited attribute")
                        .with_note("both would become constructor parameters with the same name"),
                );
            }
        }
    }
}

fn check_abstract_method(
    node: &Node,
    class: &str,
    method: &Method,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if !method.is_abstract() {
        return;
    }

    if method.has_code() {
        diagnostics.push(
            Diagnostic::error(ErrorCode::E4011)
                .with_message(format!(
                    "ABSTRACT method {} in class {class} cannot provide code",
                    method.name
                ))
                .with_label(method.span, "pure virtual methods have no body"),
        );
    }
    if method.is_static() {
        diagnostics.push(
            Diagnostic::error(ErrorCode::E4011)
                .with_message(format!(
                    "ABSTRACT method {} in class {class} cannot be STATIC",
                    method.name
                ))
                .with_label(method.span, "static methods cannot be virtual"),
        );
    }
    if !node.is_abstract() {
        diagnostics.push(
            Diagnostic::error(ErrorCode::E4010)
                .with_message(format!(
                    "ABSTRACT method {} declared in non-abstract class {class}",
                    method.name
                ))
                .with_label(method.span, "pure virtual method")
                .with_secondary_label(node.span, "class is not %abstract")
                .with_suggestion("mark the class `%abstract` or give the method a body"),
        );
    }
}

/// Check code against the `EXTERNAL` flag. Returns whether the method must
/// be marked `EXTERNAL`.
fn check_external(
    class: &str,
    method: &Method,
    options: &ValidateOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let has_code = method.has_code();

    if has_code && method.is_external() {
        diagnostics.push(
            Diagnostic::error(ErrorCode::E4006)
                .with_message(format!(
                    "EXTERNAL method specified when code is also provided in {class}::{}",
                    method.name
                ))
                .with_label(method.span, "marked %external"),
        );
    } else if !has_code && !method.is_external() && !method.is_abstract() {
        let mut diag = Diagnostic::error(ErrorCode::E4007)
            .with_message(format!(
                "EXTERNAL method not specified when no code is provided in {class}::{}",
                method.name
            ))
            .with_label(method.span, "no code and not %external");
        if options.repair_external {
            diag = diag.with_note("the method is treated as EXTERNAL");
        }
        diagnostics.push(diag);
    }

    options.repair_external && !has_code && !method.is_external()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
