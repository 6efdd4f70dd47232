//! Inheritance edges end to end.

use crate::helpers::edge_assertions::*;
use crate::helpers::registry_helpers::*;
use crate::helpers::source_fixtures::*;
use pyscope::{
    Direction, EdgeKind, ResolutionStatus, build_relationships,
    build_relationships_with_diagnostics,
};

#[test]
fn test_subclass_found_from_base() {
    let registry = registry_of(&[("geo/shapes.py", SHAPES), ("geo/circle.py", CIRCLE)]);
    let index = build_relationships(&registry);

    assert_edge(
        &index,
        "geo.circle.Circle",
        EdgeKind::InheritsFrom,
        "geo.shapes.Shape",
        ResolutionStatus::Resolved,
    );
    assert_eq!(
        index.related("geo.shapes.Shape", EdgeKind::InheritsFrom, Direction::Incoming),
        vec!["geo.circle.Circle"]
    );
    assert_eq!(
        index.related("geo.shapes.Shape", EdgeKind::InheritsFrom, Direction::Outgoing),
        vec!["abc.ABC"]
    );
}

#[test]
fn test_external_base_is_not_an_error() {
    let source = "import requests\n\nclass Client(requests.Session):\n    pass\n";
    let (registry, diagnostics) = analyze(&[("client.py", source)]);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    let (index, unresolved) = build_relationships_with_diagnostics(&registry);
    assert!(unresolved.is_empty());
    assert_eq!(
        targets_of(&index, "client.Client", EdgeKind::InheritsFrom),
        vec![("requests.Session".to_string(), ResolutionStatus::External)]
    );
}

#[test]
fn test_generic_base_resolves_on_head() {
    let source = r#"
from typing import Generic, TypeVar

T = TypeVar("T")


class Box(Generic[T]):
    pass


class IntBox(Box[int]):
    pass
"#;
    let registry = registry_of(&[("boxes.py", source)]);
    let index = build_relationships(&registry);
    assert_eq!(
        edge_triples(&index, EdgeKind::InheritsFrom),
        vec![
            (
                "boxes.Box".to_string(),
                "typing.Generic".to_string(),
                ResolutionStatus::External
            ),
            (
                "boxes.IntBox".to_string(),
                "boxes.Box".to_string(),
                ResolutionStatus::Resolved
            ),
        ]
    );
}

#[test]
fn test_unknown_base_is_unresolved_with_diagnostic() {
    let source = "class Widget(make_base()):\n    pass\n";
    let registry = registry_of(&[("ui.py", source)]);
    let (index, unresolved) = build_relationships_with_diagnostics(&registry);
    assert_eq!(
        targets_of(&index, "ui.Widget", EdgeKind::InheritsFrom),
        vec![("make_base()".to_string(), ResolutionStatus::Unresolved)]
    );
    assert_eq!(unresolved.len(), 1);
    assert!(unresolved[0].message.contains("make_base()"));
}

#[test]
fn test_multiple_inheritance_keeps_every_base() {
    let source = r#"
class A:
    pass


class B:
    pass


class C(A, B, object):
    pass
"#;
    let registry = registry_of(&[("multi.py", source)]);
    let index = build_relationships(&registry);
    assert_eq!(
        index.related("multi.C", EdgeKind::InheritsFrom, Direction::Outgoing),
        vec!["builtins.object", "multi.A", "multi.B"]
    );
    assert_eq!(
        index.related("multi.A", EdgeKind::InheritsFrom, Direction::Incoming),
        vec!["multi.C"]
    );
}
