//! C++ header rendering.
//!
//! The output layout is fixed, and hand-written code downstream relies on it:
//!
//! 1. banner comment
//! 2. `class X;` for every node symbol, in symbol-table order
//! 3. `typedef enum { NODE_TYPE_X, ... } ASTNodeType;` for concrete nodes
//! 4. the schema's `#include` lines, verbatim
//! 5. one class per node, in declaration order
//! 6. the trailing code block, verbatim
//!
//! An optional include guard wraps everything after the banner.

use astcc_ir::{AttrFlags, Method, NodeId, Schema, Visibility};
use tracing::{debug, trace};

use crate::context::EmitContext;
use crate::signature::{constructor_params, InitParam, INIT_PREFIX};

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT_NAME: &str = "ast-nodes.hh";

/// Separator between entries of a constructor parameter, argument or
/// initialiser list.
const LIST_SEPARATOR: &str = ",\n\t\t";

/// What the banner says about the run, and whether to add a guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Name of the generated file, as shown in the banner.
    pub output_name: String,
    /// Schema files the output was generated from.
    pub source_names: Vec<String>,
    /// Macro for an `#ifndef`/`#define`/`#endif` guard, if wanted.
    pub include_guard: Option<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            source_names: Vec::new(),
            include_guard: None,
        }
    }
}

/// Render a resolved, validated schema as a C++ header.
///
/// The schema is not re-checked; emitting an unvalidated schema produces
/// output that may not compile.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = schema.node_count()))]
pub fn emit_cpp(schema: &Schema, options: &EmitOptions) -> String {
    let mut ctx = EmitContext::new(schema);

    emit_header(&mut ctx, options);
    if let Some(guard) = &options.include_guard {
        ctx.writeln(&format!("#ifndef {guard}"));
        ctx.writeln(&format!("#define {guard}"));
        ctx.newline();
    }

    emit_forwards(&mut ctx);
    emit_node_types(&mut ctx);
    emit_includes(&mut ctx);
    emit_nodes(&mut ctx);

    ctx.write(&schema.trailing_code);

    if options.include_guard.is_some() {
        if !schema.trailing_code.is_empty() && !schema.trailing_code.ends_with('\n') {
            ctx.newline();
        }
        ctx.newline();
        ctx.writeln("#endif");
    }

    ctx.take_output()
}

fn emit_header(ctx: &mut EmitContext<'_>, options: &EmitOptions) {
    let sources = match options.source_names.as_slice() {
        [] => "source file <input>".to_string(),
        [one] => format!("source file {one}"),
        many => format!("source files {}", many.join(", ")),
    };

    ctx.banner_rule();
    ctx.writeln("//");
    ctx.writeln(&format!(
        "// {} -- The defined nodes for the Abstract Syntax Tree",
        options.output_name
    ));
    ctx.writeln("//");
    ctx.writeln(&format!(
        "// This file is automatically generated using `astcc` against the {sources}."
    ));
    ctx.writeln("//");
    ctx.writeln("// Do not modify this file directly as your changes will likely be lost.");
    ctx.writeln("//");
    ctx.banner_rule();
    ctx.newline();
    ctx.newline();
}

fn section_heading(ctx: &mut EmitContext<'_>, text: &str) {
    ctx.section_rule();
    ctx.writeln(&format!("// {text}"));
    ctx.section_rule();
}

fn emit_forwards(ctx: &mut EmitContext<'_>) {
    section_heading(
        ctx,
        "The following are forward declarations for the nodes that are defined in the source file",
    );
    let schema = ctx.schema;
    for (_, symbol) in schema.symbols.nodes() {
        ctx.writeln(&format!("class {};", symbol.name));
    }
    ctx.newline();
    ctx.newline();
}

fn emit_node_types(ctx: &mut EmitContext<'_>) {
    section_heading(ctx, "This enumeration is used to identify the types of nodes");
    ctx.writeln("typedef enum {");
    ctx.indent();
    let schema = ctx.schema;
    for (id, node) in schema.nodes() {
        if node.is_abstract() {
            continue;
        }
        ctx.writeln(&format!("NODE_TYPE_{},", schema.node_name(id)));
    }
    ctx.dedent();
    ctx.writeln("} ASTNodeType;");
    ctx.newline();
}

fn emit_includes(ctx: &mut EmitContext<'_>) {
    section_heading(ctx, "These include files are specified in the source file");
    let schema = ctx.schema;
    for include in &schema.includes {
        ctx.writeln(&format!("#include {}", include.text));
    }
    ctx.newline();
    ctx.newline();
}

fn emit_nodes(ctx: &mut EmitContext<'_>) {
    section_heading(ctx, "now to emit each of the nodes in turn");
    ctx.newline();
    ctx.newline();

    let schema = ctx.schema;
    for id in schema.node_ids() {
        let name = schema.node_name(id);
        debug!(node = name, "emitting class");

        section_heading(ctx, &format!("The {name} node"));
        match schema.parent(id) {
            Some(parent) => {
                ctx.writeln(&format!("class {name} : public {} {{", schema.node_name(parent)));
            }
            None => ctx.writeln(&format!("class {name} {{")),
        }

        ctx.indent();
        emit_node_contents(ctx, id);
        ctx.dedent();

        ctx.writeln("};");
        ctx.newline();
        ctx.newline();
    }
}

/// Class members, always in this order: constructor, destructor,
/// attributes, methods, `Empty`, `Factory`, `_GetType`, `_GetTypeString`.
fn emit_node_contents(ctx: &mut EmitContext<'_>, id: NodeId) {
    emit_constructor(ctx, id);
    emit_destructor(ctx, id);
    emit_attributes(ctx, id);
    emit_methods(ctx, id);
    emit_empty(ctx, id);
    emit_factory(ctx, id);
    emit_get_type(ctx, id);
    emit_get_type_string(ctx, id);
}

/// `Type *__init__a,\n\t\tType __init__b`, or `void` when empty.
fn formal_list(ctx: &EmitContext<'_>, params: &[InitParam<'_>]) -> String {
    if params.is_empty() {
        return "void".to_string();
    }
    params
        .iter()
        .map(|p| ctx.declarator(p.ty, &p.param_name()))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// `__init__a,\n\t\t__init__b`, empty when there are no parameters.
fn argument_list(params: &[InitParam<'_>]) -> String {
    params
        .iter()
        .map(InitParam::param_name)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn emit_constructor(ctx: &mut EmitContext<'_>, id: NodeId) {
    let schema = ctx.schema;
    let name = schema.node_name(id);
    let params = constructor_params(schema, id);
    trace!(node = name, params = params.len(), "constructor");

    ctx.member_comment(&format!("The {name} constructor"));
    ctx.access(Visibility::Protected);
    let formals = formal_list(ctx, &params);
    ctx.write_indent();
    ctx.write(&format!("explicit {name}({formals})"));

    if schema.initializer_count(id) > 0 {
        let mut initializers = Vec::new();
        if let Some(parent) = schema.parent(id) {
            let base = constructor_params(schema, parent);
            initializers.push(format!(
                "{}({})",
                schema.node_name(parent),
                argument_list(&base)
            ));
        }
        for attr in &schema.node(id).attributes {
            let value = if attr.needs_init_param() {
                format!("{INIT_PREFIX}{}", attr.name)
            } else {
                attr.default_code.clone().unwrap_or_default()
            };
            initializers.push(format!("{}({value})", attr.name));
        }
        ctx.write(" :\n\t\t");
        ctx.write(&initializers.join(LIST_SEPARATOR));
    }

    ctx.write(" { }\n");
    ctx.newline();
}

fn emit_destructor(ctx: &mut EmitContext<'_>, id: NodeId) {
    let name = ctx.schema.node_name(id);
    ctx.member_comment(&format!("The {name} destructor"));
    ctx.access(Visibility::Public);
    ctx.writeln(&format!("virtual ~{name}(void) {{ }}"));
    ctx.newline();
}

fn emit_attributes(ctx: &mut EmitContext<'_>, id: NodeId) {
    let schema = ctx.schema;
    for attr in &schema.node(id).attributes {
        ctx.member_comment(&format!("The {} attribute", attr.name));
        ctx.access(attr.flags.visibility());
        let storage = if attr.flags.contains(AttrFlags::STATIC) {
            "static "
        } else {
            ""
        };
        let member = ctx.declarator(attr.ty, &attr.name);
        ctx.writeln(&format!("{storage}{member};"));
        ctx.newline();

        if attr.flags.contains(AttrFlags::NO_INLINES) {
            continue;
        }

        ctx.access(Visibility::Public);
        let getter = ctx.declarator(attr.ty, &format!("Get_{}(void)", attr.name));
        ctx.writeln(&format!("{getter} {{ return {}; }}", attr.name));
        let setter_param = ctx.declarator(attr.ty, "val");
        ctx.writeln(&format!(
            "void Set_{}({setter_param}) {{ {} = val; }}",
            attr.name, attr.name
        ));
        ctx.newline();
    }
}

/// Everything after the signature: ` = 0;`, `;` or ` <code>`.
fn method_body(method: &Method) -> String {
    if method.is_abstract() {
        " = 0;".to_string()
    } else if method.is_external() || !method.has_code() {
        ";".to_string()
    } else {
        format!(" {}", method.code.as_deref().unwrap_or_default())
    }
}

fn emit_methods(ctx: &mut EmitContext<'_>, id: NodeId) {
    let schema = ctx.schema;
    for method in &schema.node(id).methods {
        ctx.member_comment(&format!("The {} method", method.name));
        ctx.access(method.flags.visibility());

        let params = if method.params.is_empty() {
            "void".to_string()
        } else {
            method
                .params
                .iter()
                .map(|p| ctx.declarator(p.ty, &p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let storage = if method.is_static() { "static" } else { "virtual" };
        let signature = ctx.declarator(method.return_type, &format!("{}({params})", method.name));
        ctx.writeln(&format!("{storage} {signature}{}", method_body(method)));
        ctx.newline();
    }
}

fn emit_empty(ctx: &mut EmitContext<'_>, id: NodeId) {
    let name = ctx.schema.node_name(id);
    ctx.member_comment(&format!("The {name} static empty value function"));
    ctx.access(Visibility::Public);
    ctx.writeln(&format!("static {name} *Empty(void) {{ return NULL; }}"));
    ctx.newline();
}

fn emit_factory(ctx: &mut EmitContext<'_>, id: NodeId) {
    let schema = ctx.schema;
    if schema.node(id).is_abstract() {
        return;
    }

    let name = schema.node_name(id);
    let params = constructor_params(schema, id);
    let returns = ctx.type_name(schema.factory_return_type(id));

    let formals = formal_list(ctx, &params);
    let arguments = argument_list(&params);

    ctx.member_comment(&format!("The {name} Factory function"));
    ctx.access(Visibility::Public);
    ctx.writeln(&format!(
        "static {returns} *Factory({formals}) {{ return new {name}({arguments}); }}"
    ));
    ctx.newline();
}

fn emit_get_type(ctx: &mut EmitContext<'_>, id: NodeId) {
    let schema = ctx.schema;
    let name = schema.node_name(id);
    ctx.member_comment(&format!("The {name} get node type function"));
    ctx.access(Visibility::Public);
    if schema.node(id).is_abstract() {
        ctx.writeln("virtual ASTNodeType _GetType(void) const = 0;");
    } else {
        ctx.writeln(&format!(
            "virtual ASTNodeType _GetType(void) const {{ return NODE_TYPE_{name}; }}"
        ));
    }
    ctx.newline();
}

fn emit_get_type_string(ctx: &mut EmitContext<'_>, id: NodeId) {
    let schema = ctx.schema;
    let name = schema.node_name(id);
    ctx.member_comment(&format!("The {name} get node type as string function"));
    ctx.access(Visibility::Public);
    if schema.node(id).is_abstract() {
        ctx.writeln("virtual const char *_GetTypeString(void) const = 0;");
    } else {
        ctx.writeln(&format!(
            "virtual const char *_GetTypeString(void) const {{ return \"{name}\"; }}"
        ));
    }
    ctx.newline();
}
