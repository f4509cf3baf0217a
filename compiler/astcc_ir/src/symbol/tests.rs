use pretty_assertions::assert_eq;

use super::*;

#[test]
fn add_and_get() {
    let mut table = SymbolTable::new();
    let int = table.add_type("int").unwrap();
    let expr = table.add_node("Expr").unwrap();

    assert!(table.lookup("int"));
    assert!(table.lookup("Expr"));
    assert!(!table.lookup("Stmt"));
    assert_eq!(table.find("Expr"), Some(expr));
    assert_eq!(table.name(int), "int");
    assert!(table.is_node(expr));
    assert!(!table.is_node(int));
    assert_eq!(
        table.get("int"),
        Some(&Symbol {
            name: "int".into(),
            kind: SymbolKind::Type
        })
    );
    assert_eq!(table.get("Stmt"), None);
}

#[test]
fn duplicate_is_rejected_regardless_of_kind() {
    let mut table = SymbolTable::new();
    let first = table.add_type("Expr").unwrap();

    let err = table.add_node("Expr").unwrap_err();
    assert_eq!(err.name, "Expr");
    assert_eq!(err.existing, SymbolKind::Type);
    assert_eq!(err.id, first);

    let err = table.add_type("Expr").unwrap_err();
    assert_eq!(err.existing, SymbolKind::Type);

    // The failed additions left no trace.
    assert_eq!(table.len(), 1);
    assert_eq!(table.symbol(first).kind, SymbolKind::Type);
}

#[test]
fn already_declared_message() {
    let mut table = SymbolTable::new();
    table.add_node("Leaf").unwrap();
    let err = table.add_type("Leaf").unwrap_err();
    assert_eq!(err.to_string(), "`Leaf` is already declared as a node");
}

#[test]
fn iteration_keeps_declaration_order() {
    let mut table = SymbolTable::new();
    table.add_node("B").unwrap();
    table.add_type("int").unwrap();
    table.add_node("A").unwrap();

    let all: Vec<_> = table.iter().map(|(_, s)| s.name.as_str()).collect();
    assert_eq!(all, vec!["B", "int", "A"]);

    let nodes: Vec<_> = table.nodes().map(|(_, s)| s.name.as_str()).collect();
    assert_eq!(nodes, vec!["B", "A"]);
}

#[test]
fn names_are_unique_after_many_insertions() {
    let mut table = SymbolTable::new();
    for i in 0..20 {
        let name = format!("n{}", i % 7);
        let _ = if i % 2 == 0 {
            table.add_node(&name)
        } else {
            table.add_type(&name)
        };
    }
    let mut names: Vec<_> = table.iter().map(|(_, s)| s.name.clone()).collect();
    let before = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), before);
    assert_eq!(before, 7);
}
