use astcc_ir::SourceId;
use pretty_assertions::assert_eq;

use super::*;
use crate::lex;
use crate::syntax::Ident;

fn parse(text: &str) -> (SchemaFile, Vec<ParseError>) {
    let lexed = lex(text, SourceId::new(0));
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    Parser::new(&lexed.tokens).parse_file()
}

fn parse_ok(text: &str) -> SchemaFile {
    let (file, errors) = parse(text);
    assert!(errors.is_empty(), "parse errors: {errors:?}");
    file
}

fn names(idents: &[&Ident]) -> Vec<String> {
    idents.iter().map(|i| i.name.clone()).collect()
}

fn only_node(file: &SchemaFile) -> &NodeDecl {
    match file.items.as_slice() {
        [Item::Node(node)] => node,
        other => panic!("expected a single node, got {other:?}"),
    }
}

#[test]
fn test_includes_and_types() {
    let file = parse_ok("%include <string>\n%include \"symbols.h\"\n%type int\n%type \"const char *\"");
    let summary: Vec<String> = file
        .items
        .iter()
        .map(|item| match item {
            Item::Include { text, .. } => format!("include {text}"),
            Item::Type(name) => format!("type {}", name.name),
            Item::Node(node) => format!("node {}", node.name.name),
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            "include <string>",
            "include \"symbols.h\"",
            "type int",
            "type const char *",
        ]
    );
    assert_eq!(file.trailing, None);
}

#[test]
fn test_node_header() {
    let file = parse_ok("%node Expression : Common %abstract { }");
    let node = only_node(&file);
    assert_eq!(node.name.name, "Expression");
    assert_eq!(node.parent.as_ref().map(|p| p.name.as_str()), Some("Common"));
    assert_eq!(node.flags.len(), 1);
    assert_eq!(node.flags[0].keyword, FlagKeyword::Abstract);
    assert!(node.features.is_empty());
}

#[test]
fn test_node_without_parent() {
    let file = parse_ok("%node Root { }");
    assert_eq!(only_node(&file).parent, None);
}

#[test]
fn test_features_in_order() {
    let file = parse_ok(
        "%node Id : Expression {
            %factory Expression
            %attr int line_no %public
            %attr int kind %no_init %{ 0 %}
            %method void print(std::ostream s, int depth) %{ { s << depth; } %}
            %method void semant() %external
        }",
    );
    let node = only_node(&file);
    assert_eq!(node.features.len(), 5);

    match &node.features[0] {
        Feature::Factory(ty) => assert_eq!(ty.name, "Expression"),
        other => panic!("expected factory, got {other:?}"),
    }

    match &node.features[1] {
        Feature::Attr(attr) => {
            assert_eq!(names(&[&attr.ty, &attr.name]), vec!["int", "line_no"]);
            assert_eq!(attr.flags[0].keyword, FlagKeyword::Public);
            assert_eq!(attr.default_code, None);
        }
        other => panic!("expected attribute, got {other:?}"),
    }

    match &node.features[2] {
        Feature::Attr(attr) => {
            assert_eq!(attr.name.name, "kind");
            assert_eq!(attr.flags[0].keyword, FlagKeyword::NoInit);
            assert_eq!(attr.default_code.as_deref(), Some("0"));
        }
        other => panic!("expected attribute, got {other:?}"),
    }

    match &node.features[3] {
        Feature::Method(method) => {
            assert_eq!(method.name.name, "print");
            assert_eq!(method.return_type.name, "void");
            let params: Vec<(String, String)> = method
                .params
                .iter()
                .map(|p| (p.ty.name.clone(), p.name.name.clone()))
                .collect();
            assert_eq!(
                params,
                vec![
                    ("std::ostream".to_string(), "s".to_string()),
                    ("int".to_string(), "depth".to_string()),
                ]
            );
            assert_eq!(method.code.as_deref(), Some("{ s << depth; }"));
            assert!(method.flags.is_empty());
        }
        other => panic!("expected method, got {other:?}"),
    }

    match &node.features[4] {
        Feature::Method(method) => {
            assert!(method.params.is_empty());
            assert_eq!(method.flags[0].keyword, FlagKeyword::External);
            assert_eq!(method.code, None);
        }
        other => panic!("expected method, got {other:?}"),
    }
}

#[test]
fn test_code_before_flags_is_accepted() {
    let file = parse_ok("%node N { %attr int x %{ 1 %} %no_init %private }");
    match &only_node(&file).features[0] {
        Feature::Attr(attr) => {
            assert_eq!(attr.default_code.as_deref(), Some("1"));
            let flags: Vec<_> = attr.flags.iter().map(|f| f.keyword).collect();
            assert_eq!(flags, vec![FlagKeyword::NoInit, FlagKeyword::Private]);
        }
        other => panic!("expected attribute, got {other:?}"),
    }
}

#[test]
fn test_trailing_section() {
    let file = parse_ok("%type int\n%%\nint helper() { return 1; }\n");
    assert_eq!(file.items.len(), 1);
    assert_eq!(file.trailing.as_deref(), Some("int helper() { return 1; }\n"));
}

#[test]
fn test_decl_spans_cover_whole_declaration() {
    let text = "%node N { %attr int x %no_init %{ 1 %} }";
    let file = parse_ok(text);
    let node = only_node(&file);
    assert_eq!(node.span.to_range(), 0..text.len());
    match &node.features[0] {
        Feature::Attr(attr) => assert_eq!(&text[attr.span.to_range()], "%attr int x %no_init %{ 1 %}"),
        other => panic!("expected attribute, got {other:?}"),
    }
}

#[test]
fn test_flag_not_allowed_is_reported_and_parsing_continues() {
    let (file, errors) = parse("%node N { %attr int x %external %public }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E1001);
    assert!(errors[0].message.contains("%external"));
    match &only_node(&file).features[0] {
        Feature::Attr(attr) => assert_eq!(attr.flags.len(), 1),
        other => panic!("expected attribute, got {other:?}"),
    }
}

#[test]
fn test_missing_name() {
    let (_, errors) = parse("%node { }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E1002);
}

#[test]
fn test_missing_type() {
    let (_, errors) = parse("%node N { %attr ( x }");
    assert_eq!(errors[0].code, ErrorCode::E1003);
}

#[test]
fn test_unclosed_body_reports_and_recovers() {
    let (file, errors) = parse("%node A { %attr int x\n%node B { }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E1004);
    assert!(errors[0].related.is_some());
    // B is still parsed
    assert_eq!(file.items.len(), 1);
    match &file.items[0] {
        Item::Node(node) => assert_eq!(node.name.name, "B"),
        other => panic!("expected node, got {other:?}"),
    }
}

#[test]
fn test_stray_tokens_reported_once_per_item() {
    let (file, errors) = parse("foo bar %type int { %type long");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.code == ErrorCode::E1001));
    assert_eq!(file.items.len(), 2);
}

#[test]
fn test_two_code_blocks() {
    let (_, errors) = parse("%node N { %method void f() %{ a %} %{ b %} }");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("at most one code block"));
}

#[test]
fn test_bad_parameter_list() {
    let (_, errors) = parse("%node N { %method void f(int a int b) }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E1001);
    assert!(errors[0].message.contains("`,` or `)`"));
}

#[test]
fn test_include_requires_path() {
    let (file, errors) = parse("%include string\n%type int");
    assert_eq!(errors.len(), 1);
    assert_eq!(file.items.len(), 1);
    let first = file.items.first().unwrap();
    assert!(matches!(first, Item::Type(_)));
}
