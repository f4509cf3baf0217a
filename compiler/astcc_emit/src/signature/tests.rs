use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::checked_schema;

fn names(schema: &Schema, node: &str) -> Vec<String> {
    let id = schema.find_node(node).unwrap();
    constructor_params(schema, id)
        .iter()
        .map(InitParam::param_name)
        .collect()
}

#[test]
fn test_root_without_attributes_has_no_params() {
    let schema = checked_schema("%type Integer\n%node Leaf : Common { }");
    assert!(names(&schema, "Common").is_empty());
    assert!(names(&schema, "Leaf").is_empty());
}

#[test]
fn test_single_attribute_leaf() {
    let schema = checked_schema("%type Integer\n%node Leaf : Common { %attr Integer count }");
    assert_eq!(names(&schema, "Leaf"), vec!["__init__count"]);
}

#[test]
fn test_ancestor_slices_come_first() {
    let schema = checked_schema(
        "%type Integer
         %type String
         %node Expr : Common %abstract { %attr Integer line %attr Integer col }
         %node Binary : Expr %abstract { %attr Expr left %attr Expr right }
         %node Plus : Binary { %attr String op }",
    );
    assert_eq!(
        names(&schema, "Plus"),
        vec![
            "__init__line",
            "__init__col",
            "__init__left",
            "__init__right",
            "__init__op",
        ]
    );
    assert_eq!(
        names(&schema, "Binary"),
        vec!["__init__line", "__init__col", "__init__left", "__init__right"]
    );
}

#[test]
fn test_no_init_attributes_are_skipped_at_every_level() {
    let schema = checked_schema(
        "%type Integer
         %type String
         %node A : Common { %attr Integer x %attr Integer hidden %no_init %{ 0 %} }
         %node B : A { %attr String y %no_init %{ \"foo\" %} }",
    );
    assert_eq!(names(&schema, "A"), vec!["__init__x"]);
    assert_eq!(names(&schema, "B"), vec!["__init__x"]);
}

#[test]
fn test_params_record_owner_and_type() {
    let schema = checked_schema(
        "%type Integer
         %node A : Common { %attr Integer x }
         %node B : A { %attr A link }",
    );
    let a = schema.find_node("A").unwrap();
    let b = schema.find_node("B").unwrap();
    let params = constructor_params(&schema, b);
    assert_eq!(params.len(), schema.init_param_count(b));
    assert_eq!(params[0].owner, a);
    assert_eq!(schema.type_name(params[0].ty), "Integer");
    assert_eq!(params[1].owner, b);
    assert_eq!(params[1].attribute, "link");
    assert!(schema.symbols.is_node(params[1].ty));
}

#[test]
fn test_declaration_order_does_not_matter() {
    let schema = checked_schema(
        "%type Integer
         %node Child : Parent { %attr Integer c }
         %node Parent : Common { %attr Integer p }",
    );
    assert_eq!(names(&schema, "Child"), vec!["__init__p", "__init__c"]);
}
