use astcc_diagnostic::Severity;
use astcc_ir::Visibility;
use pretty_assertions::assert_eq;

use super::*;
use crate::resolve_inheritance;
use crate::test_helpers::schema_from;

fn run(text: &str, options: ValidateOptions) -> (Schema, Validation) {
    let mut schema = schema_from(text);
    let resolved = resolve_inheritance(&mut schema);
    assert!(resolved.is_empty(), "resolver diagnostics: {resolved:?}");
    let validation = validate(&mut schema, &options);
    (schema, validation)
}

fn check(text: &str) -> (Schema, Validation) {
    run(text, ValidateOptions::default())
}

fn messages(validation: &Validation) -> Vec<&str> {
    validation
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect()
}

fn codes(validation: &Validation) -> Vec<ErrorCode> {
    validation.diagnostics.iter().map(|d| d.code).collect()
}

fn method<'s>(schema: &'s Schema, node: &str, name: &str) -> &'s Method {
    let id = schema.find_node(node).unwrap();
    schema
        .node(id)
        .methods
        .iter()
        .find(|m| m.name == name)
        .unwrap()
}

const TYPES: &str = "%type Integer\n%type String\n";

#[test]
fn test_clean_schema_passes() {
    let (_, validation) = check(&format!(
        "{TYPES}
         %include <string>
         %node Expr : Common %abstract {{
             %attr Integer line %public
             %method void semant() %abstract
         }}
         %node Leaf : Expr {{
             %attr Integer count
             %method void semant() %{{ {{ }} %}}
         }}"
    ));
    assert!(validation.passed, "{:?}", validation.diagnostics);
    assert!(validation.diagnostics.is_empty());
}

#[test]
fn test_duplicate_includes_compare_literally() {
    let (_, validation) = check("%include <a.h>\n%include \"a.h\"\n%include <a.h>");
    assert!(!validation.passed);
    assert_eq!(messages(&validation), vec!["Include file <a.h> specified more than once"]);
    assert_eq!(validation.diagnostics[0].labels.len(), 2);
}

#[test]
fn test_duplicate_attribute() {
    let (_, validation) = check(&format!("{TYPES}%node N {{ %attr Integer x %attr String x }}"));
    assert!(!validation.passed);
    assert_eq!(codes(&validation), vec![ErrorCode::E4002]);
    assert_eq!(messages(&validation), vec!["Attribute name x in class N is duplicated"]);
}

#[test]
fn test_attribute_duplicated_by_method() {
    let (_, validation) = check(&format!(
        "{TYPES}%node N {{ %attr Integer x %method Integer x() %{{ {{ return 0; }} %}} }}"
    ));
    assert!(!validation.passed);
    assert_eq!(
        messages(&validation),
        vec!["Attribute name x in class N is duplicated by method x"]
    );
}

#[test]
fn test_attribute_visibility_defaults_to_protected() {
    let (schema, validation) = check(&format!("{TYPES}%node N {{ %attr Integer x }}"));
    assert!(validation.passed);
    let node = schema.node(schema.find_node("N").unwrap());
    assert!(node.attributes[0].flags.contains(AttrFlags::PROTECTED));
    assert_eq!(node.attributes[0].flags.visibility(), Visibility::Protected);
}

#[test]
fn test_attribute_visibility_conflicts_reported_per_pair() {
    let (_, validation) = check(&format!(
        "{TYPES}%node N {{ %attr Integer x %public %protected %private }}"
    ));
    assert_eq!(
        messages(&validation),
        vec![
            "Cannot specify both PUBLIC and PROTECTED on attribute x in class N",
            "Cannot specify both PUBLIC and PRIVATE on attribute x in class N",
            "Cannot specify both PROTECTED and PRIVATE on attribute x in class N",
        ]
    );
}

#[test]
fn test_method_visibility_conflict() {
    let (_, validation) = check(&format!(
        "{TYPES}%node N {{ %method void f() %private %public %external }}"
    ));
    assert_eq!(codes(&validation), vec![ErrorCode::E4008]);
}

#[test]
fn test_duplicate_signature_same_parameter_types() {
    let (_, validation) = check(&format!(
        "{TYPES}%node N {{
            %method void compute(Integer a) %external
            %method Integer compute(Integer b) %external
        }}"
    ));
    assert!(!validation.passed);
    assert_eq!(
        messages(&validation),
        vec!["Signature of method compute is duplicated in class N"]
    );
}

#[test]
fn test_overloads_with_different_parameter_types_pass() {
    let (_, validation) = check(&format!(
        "{TYPES}%node N {{
            %method void compute(Integer a) %external
            %method void compute(String a) %external
            %method void compute(Integer a, Integer b) %external
        }}"
    ));
    assert!(validation.passed, "{:?}", validation.diagnostics);
}

#[test]
fn test_external_with_code() {
    let (_, validation) = check("%node N { %method void f() %external %{ { } %} }");
    assert_eq!(
        messages(&validation),
        vec!["EXTERNAL method specified when code is also provided in N::f"]
    );
}

#[test]
fn test_missing_external_is_reported_and_repaired() {
    let (schema, validation) = check("%node N { %method void f() }");
    assert!(!validation.passed);
    assert_eq!(
        messages(&validation),
        vec!["EXTERNAL method not specified when no code is provided in N::f"]
    );
    assert!(method(&schema, "N", "f").is_external());
}

#[test]
fn test_blank_code_counts_as_no_code() {
    let (schema, validation) = check("%node N { %method void f() %{ %} }");
    assert_eq!(codes(&validation), vec![ErrorCode::E4007]);
    assert!(method(&schema, "N", "f").is_external());
}

#[test]
fn test_strict_external_reports_without_mutation() {
    let (schema, validation) = run(
        "%node N { %method void f() }",
        ValidateOptions {
            repair_external: false,
        },
    );
    assert!(!validation.passed);
    assert_eq!(codes(&validation), vec![ErrorCode::E4007]);
    assert!(validation.diagnostics[0].notes.is_empty());
    assert!(!method(&schema, "N", "f").is_external());
}

#[test]
fn test_abstract_method_is_exempt_but_coerced() {
    let (schema, validation) = check("%node Base %abstract { %method void f() %abstract }");
    assert!(validation.passed, "{:?}", validation.diagnostics);
    let f = method(&schema, "Base", "f");
    assert!(f.is_abstract());
    assert!(f.is_external());
}

#[test]
fn test_abstract_method_rules() {
    let (_, validation) = check(
        "%node Concrete {
            %method void a() %abstract
            %method void b() %abstract %{ { } %}
            %method void c() %abstract %static
        }",
    );
    assert_eq!(
        codes(&validation),
        vec![
            ErrorCode::E4010,
            ErrorCode::E4011,
            ErrorCode::E4010,
            ErrorCode::E4011,
            ErrorCode::E4010,
        ]
    );
    assert_eq!(
        validation.diagnostics[0].message,
        "ABSTRACT method a declared in non-abstract class Concrete"
    );
}

#[test]
fn test_no_init_requires_default() {
    let (_, validation) = check(&format!(
        "{TYPES}%node N {{ %attr Integer x %no_init %attr Integer y %no_init %{{ 0 %}} }}"
    ));
    assert_eq!(
        messages(&validation),
        vec!["NO_INIT attribute x in class N has no default code"]
    );
}

#[test]
fn test_default_without_no_init_warns() {
    let (_, validation) = check(&format!("{TYPES}%node N {{ %attr Integer x %{{ 0 %}} }}"));
    assert!(validation.passed);
    assert_eq!(validation.diagnostics.len(), 1);
    assert_eq!(validation.diagnostics[0].severity, Severity::Warning);
    assert_eq!(validation.diagnostics[0].code, ErrorCode::E4014);
}

#[test]
fn test_inherited_parameter_name_clash() {
    let (_, validation) = check(&format!(
        "{TYPES}
         %node A {{ %attr Integer x }}
         %node B : A {{ %attr Integer y %no_init %{{ 1 %}} }}
         %node C : B {{ %attr String x %attr Integer y }}"
    ));
    assert_eq!(
        messages(&validation),
        vec!["Attribute name x in class C duplicates an attribute inherited from class A"]
    );
}

#[test]
fn test_factory_override_must_be_self_or_ancestor() {
    let (_, validation) = check(
        "%node Expr %abstract { }
         %node Id : Expr { %factory Expr }
         %node Num : Expr { %factory Num }
         %node Other { }
         %node Bad : Expr { %factory Other }",
    );
    assert_eq!(codes(&validation), vec![ErrorCode::E4012]);
    assert_eq!(
        validation.diagnostics[0].message,
        "Factory type Other of class Bad is not the class or one of its ancestors"
    );
}

#[test]
fn test_all_errors_are_accumulated() {
    let (_, validation) = check(&format!(
        "{TYPES}
         %include <a>
         %include <a>
         %node A {{ %attr Integer x %attr Integer x }}
         %node B {{ %method void f() }}"
    ));
    assert_eq!(
        codes(&validation),
        vec![ErrorCode::E4001, ErrorCode::E4002, ErrorCode::E4007]
    );
}
