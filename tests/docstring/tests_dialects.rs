//! The three dialects yield the same structured documentation.

use crate::helpers::registry_helpers::*;
use crate::helpers::source_fixtures::*;
use pyscope::hir::{DiagnosticKind, Entity};
use pyscope::{Dialect, ParsedDoc};
use rstest::rstest;

fn add_doc(source: &str) -> ParsedDoc {
    let (registry, diagnostics) = analyze(&[("calc.py", source)]);
    assert!(
        of_kind(&diagnostics, DiagnosticKind::DocstringFormat).is_empty(),
        "{:?}",
        diagnostics
    );
    match registry.get("calc.add") {
        Some(Entity::Function(add)) => add.info.parsed_doc.clone().expect("docstring parsed"),
        other => panic!("calc.add should be a function, got {:?}", other.map(Entity::kind)),
    }
}

#[rstest]
#[case(GOOGLE_ADD, Dialect::Google)]
#[case(NUMPY_ADD, Dialect::Numpy)]
#[case(SPHINX_ADD, Dialect::Sphinx)]
fn test_dialects_agree(#[case] source: &str, #[case] dialect: Dialect) {
    let doc = add_doc(source);
    assert_eq!(doc.dialect, Some(dialect));
    assert_eq!(doc.summary, "Add two numbers.");

    let a = doc.param("a").expect("a documented");
    assert_eq!(a.type_expr.as_deref(), Some("int"));
    assert_eq!(a.description, "first operand");
    let b = doc.param("b").expect("b documented");
    assert_eq!(b.description, "second operand");

    assert_eq!(doc.returns.len(), 1);
    assert_eq!(doc.returns[0].type_expr.as_deref(), Some("int"));
    assert_eq!(doc.returns[0].description, "the sum");
}

#[test]
fn test_plain_docstring_has_no_dialect() {
    let source = "def f():\n    \"\"\"Just a sentence.\"\"\"\n";
    let (registry, _) = analyze(&[("plain.py", source)]);
    let Some(Entity::Function(f)) = registry.get("plain.f") else {
        panic!("plain.f should be a function");
    };
    let doc = f.info.parsed_doc.as_ref().expect("docstring parsed");
    assert_eq!(doc.dialect, None);
    assert_eq!(doc.summary, "Just a sentence.");
    assert!(doc.params.is_empty());
}
