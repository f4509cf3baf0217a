use astcc_diagnostic::has_errors;
use astcc_ir::{SourceId, Visibility, COMMON_NODE, VOID_TYPE};
use pretty_assertions::assert_eq;

use super::*;
use crate::parse;

fn lower_texts(texts: &[&str]) -> LowerOutput {
    let files: Vec<SchemaFile> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let output = parse(text, SourceId::new(u32::try_from(i).unwrap()));
            assert!(!output.has_errors(), "parse errors: {:?}", output.errors);
            output.file
        })
        .collect();
    lower(&files)
}

fn codes(output: &LowerOutput) -> Vec<ErrorCode> {
    output.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_symbols_in_declaration_order_after_builtins() {
    let output = lower_texts(&["%type int\n%node Expr : Common %abstract { }\n%node Id : Expr { }"]);
    assert!(output.diagnostics.is_empty());
    let names: Vec<&str> = output
        .schema
        .symbols
        .iter()
        .map(|(_, s)| s.name.as_str())
        .collect();
    assert_eq!(names, vec![COMMON_NODE, VOID_TYPE, "int", "Expr", "Id"]);

    let nodes: Vec<&str> = output
        .schema
        .node_ids()
        .map(|id| output.schema.node_name(id))
        .collect();
    assert_eq!(nodes, vec![COMMON_NODE, "Expr", "Id"]);
}

#[test]
fn test_node_contents() {
    let output = lower_texts(&[
        "%type int
         %type \"const char *\"
         %node Leaf : Common {
             %attr int count %public %static
             %attr \"const char *\" label %no_init %no_inlines %{ \"leaf\" %}
             %method int total(int scale, Leaf other) %protected %{ { return count * scale; } %}
             %method void dump() %external
         }",
    ]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let schema = &output.schema;
    let leaf = schema.node(schema.find_node("Leaf").unwrap());
    assert_eq!(leaf.parent_name.as_deref(), Some("Common"));
    assert_eq!(leaf.parent, None);
    assert!(!leaf.is_abstract());

    let count = &leaf.attributes[0];
    assert_eq!(count.name, "count");
    assert_eq!(schema.type_name(count.ty), "int");
    assert_eq!(count.flags, AttrFlags::PUBLIC | AttrFlags::STATIC);

    let label = &leaf.attributes[1];
    assert_eq!(schema.type_name(label.ty), "const char *");
    assert_eq!(label.flags, AttrFlags::NO_INIT | AttrFlags::NO_INLINES);
    assert_eq!(label.default_code.as_deref(), Some("\"leaf\""));

    let total = &leaf.methods[0];
    assert_eq!(total.flags.visibility(), Visibility::Protected);
    let params: Vec<(&str, &str)> = total
        .params
        .iter()
        .map(|p| (p.name.as_str(), schema.type_name(p.ty)))
        .collect();
    assert_eq!(params, vec![("scale", "int"), ("other", "Leaf")]);
    assert_eq!(total.code.as_deref(), Some("{ return count * scale; }"));

    let dump = &leaf.methods[1];
    assert_eq!(dump.flags, MethodFlags::EXTERNAL);
    assert_eq!(dump.code, None);
}

#[test]
fn test_forward_references_across_files() {
    let output = lower_texts(&[
        "%node Holder { %attr Later item }",
        "%node Later { %factory Holder }\n%type unused",
    ]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let schema = &output.schema;
    let holder = schema.node(schema.find_node("Holder").unwrap());
    assert_eq!(schema.type_name(holder.attributes[0].ty), "Later");
    let later = schema.node(schema.find_node("Later").unwrap());
    assert_eq!(later.factory_type, schema.symbols.find("Holder"));
}

#[test]
fn test_includes_and_trailing_code_concatenate_in_input_order() {
    let output = lower_texts(&[
        "%include <string>\n%%\nfirst();\n",
        "%include \"b.h\"\n%%\nsecond();\n",
    ]);
    let includes: Vec<&str> = output
        .schema
        .includes
        .iter()
        .map(|i| i.text.as_str())
        .collect();
    assert_eq!(includes, vec!["<string>", "\"b.h\""]);
    assert_eq!(output.schema.trailing_code, "first();\nsecond();\n");
}

#[test]
fn test_duplicate_declaration() {
    let output = lower_texts(&["%type int\n%node int { }"]);
    assert_eq!(codes(&output), vec![ErrorCode::E2001]);
    let diag = &output.diagnostics[0];
    assert_eq!(diag.message, "`int` is already declared as a type");
    assert_eq!(diag.labels.len(), 2);
    // The rejected node is not built
    assert_eq!(output.schema.node_count(), 1);
}

#[test]
fn test_redeclaring_builtin() {
    let output = lower_texts(&["%type void\n%node Common { }"]);
    assert_eq!(codes(&output), vec![ErrorCode::E2001, ErrorCode::E2001]);
    assert!(output.diagnostics.iter().all(|d| d.labels.len() == 1));
    assert!(output.diagnostics[0].notes[0].contains("built in"));
}

#[test]
fn test_undeclared_types() {
    let output = lower_texts(&[
        "%node N { %attr Missing a %method Gone f() %{ { } %} %method void g(Nope x) %external }",
    ]);
    assert_eq!(
        codes(&output),
        vec![ErrorCode::E2002, ErrorCode::E2002, ErrorCode::E2002]
    );
    assert!(output.diagnostics[0].message.contains("Missing"));
    let node = output.schema.node(output.schema.find_node("N").unwrap());
    assert!(node.attributes.is_empty());
    assert!(node.methods.is_empty());
}

#[test]
fn test_factory_rules() {
    let output = lower_texts(&["%type int\n%node A { %factory int }\n%node B { %factory A %factory B }"]);
    assert_eq!(codes(&output), vec![ErrorCode::E2004, ErrorCode::E2003]);
    let schema = &output.schema;
    assert_eq!(schema.node(schema.find_node("A").unwrap()).factory_type, None);
    assert_eq!(
        schema.node(schema.find_node("B").unwrap()).factory_type,
        schema.symbols.find("A")
    );
}

#[test]
fn test_duplicate_parameter_name() {
    let output = lower_texts(&["%type int\n%node N { %method void f(int a, int a) %external }"]);
    assert_eq!(codes(&output), vec![ErrorCode::E2005]);
    assert!(has_errors(&output.diagnostics));
}

#[test]
fn test_unknown_parent_is_left_for_resolution() {
    let output = lower_texts(&["%node Orphan : Nowhere { }"]);
    assert!(output.diagnostics.is_empty());
    let node = output.schema.node(output.schema.find_node("Orphan").unwrap());
    assert_eq!(node.parent_name.as_deref(), Some("Nowhere"));
}

#[test]
fn test_abstract_node_flag() {
    let output = lower_texts(&["%node Base %abstract { }"]);
    let node = output.schema.node(output.schema.find_node("Base").unwrap());
    assert!(node.is_abstract());
}
