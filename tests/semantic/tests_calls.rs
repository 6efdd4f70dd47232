//! Call resolution: scopes, imports, receivers and `super()`.

use crate::helpers::edge_assertions::*;
use crate::helpers::registry_helpers::*;
use crate::helpers::source_fixtures::*;
use pyscope::hir::DiagnosticKind;
use pyscope::{
    Direction, EdgeKind, ResolutionStatus, build_relationships,
    build_relationships_with_diagnostics,
};

#[test]
fn test_service_calls() {
    let registry = registry_of(&[("app/service.py", SERVICE)]);
    let index = build_relationships(&registry);

    assert_eq!(
        targets_of(&index, "app.service.Service.run", EdgeKind::Calls),
        vec![
            (
                "app.service.Service.encode".to_string(),
                ResolutionStatus::Resolved
            ),
            ("logger.info".to_string(), ResolutionStatus::Unresolved),
        ]
    );
    assert_eq!(
        targets_of(&index, "app.service.Service.encode", EdgeKind::Calls),
        vec![("json.dumps".to_string(), ResolutionStatus::External)]
    );
    assert_eq!(
        targets_of(&index, "app.service.Service.__init__", EdgeKind::Calls),
        vec![("collections.OrderedDict".to_string(), ResolutionStatus::External)]
    );
}

#[test]
fn test_self_and_super_through_bases() {
    let registry = registry_of(&[("geo/shapes.py", SHAPES), ("geo/circle.py", CIRCLE)]);
    let index = build_relationships(&registry);

    assert_edge(
        &index,
        "geo.circle.Circle.describe",
        EdgeKind::Calls,
        "geo.shapes.Shape.describe",
        ResolutionStatus::Resolved,
    );
    assert_edge(
        &index,
        "geo.shapes.Shape.describe",
        EdgeKind::Calls,
        "geo.shapes.Shape.area",
        ResolutionStatus::Resolved,
    );
    assert_edge(
        &index,
        "geo.shapes.Shape.describe",
        EdgeKind::Calls,
        "builtins.str",
        ResolutionStatus::External,
    );
    assert_edge(
        &index,
        "geo.circle.Circle.describe",
        EdgeKind::Calls,
        "text.upper",
        ResolutionStatus::Unresolved,
    );
    assert_eq!(
        index.related("geo.shapes.Shape.describe", EdgeKind::Calls, Direction::Incoming),
        vec!["geo.circle.Circle.describe"]
    );
}

#[test]
fn test_self_call_prefers_subclass_override() {
    let source = r#"
class Base:
    def step(self):
        pass

    def run(self):
        self.step()


class Child(Base):
    def step(self):
        pass

    def go(self):
        self.step()
        self.run()
"#;
    let registry = registry_of(&[("m.py", source)]);
    let index = build_relationships(&registry);
    assert_eq!(
        index.related("m.Child.go", EdgeKind::Calls, Direction::Outgoing),
        vec!["m.Base.run", "m.Child.step"]
    );
    assert_eq!(
        index.related("m.Base.run", EdgeKind::Calls, Direction::Outgoing),
        vec!["m.Base.step"]
    );
}

#[test]
fn test_class_instantiation_is_a_call() {
    let source = r#"
class Config:
    pass


def load():
    return Config()
"#;
    let registry = registry_of(&[("cfg.py", source)]);
    let index = build_relationships(&registry);
    assert_edge(&index, "cfg.load", EdgeKind::Calls, "cfg.Config", ResolutionStatus::Resolved);
}

#[test]
fn test_calls_on_values_are_unresolved() {
    let source = "def f(items):\n    items.append(1)\n    get()()\n";
    let registry = registry_of(&[("vals.py", source)]);
    let (index, diagnostics) = build_relationships_with_diagnostics(&registry);
    let calls = targets_of(&index, "vals.f", EdgeKind::Calls);
    assert!(calls.contains(&("items.append".to_string(), ResolutionStatus::Unresolved)));
    assert!(calls.contains(&("get".to_string(), ResolutionStatus::Unresolved)));
    assert!(
        diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::UnresolvedReference)
    );
    assert_eq!(
        diagnostics.len(),
        calls
            .iter()
            .filter(|(_, status)| *status == ResolutionStatus::Unresolved)
            .count()
    );
}

#[test]
fn test_calls_into_namespace_package_resolve_locally() {
    let registry = registry_of(&[
        ("pkg/a.py", "def f():\n    pass\n\nclass Base:\n    pass\n"),
        (
            "main.py",
            "import pkg.a\nfrom pkg import a as alias\n\nclass Child(pkg.a.Base):\n    pass\n\ndef g():\n    pkg.a.f()\n    alias.f()\n",
        ),
    ]);
    let (index, unresolved) = build_relationships_with_diagnostics(&registry);

    assert_eq!(
        targets_of(&index, "main.g", EdgeKind::Calls),
        vec![("pkg.a.f".to_string(), ResolutionStatus::Resolved)]
    );
    assert_edge(
        &index,
        "main.Child",
        EdgeKind::InheritsFrom,
        "pkg.a.Base",
        ResolutionStatus::Resolved,
    );
    assert_edge(&index, "main", EdgeKind::Imports, "pkg.a", ResolutionStatus::Resolved);
    assert!(unresolved.is_empty(), "{:?}", unresolved);
}
