//! Registry construction: ordering, lookup and collisions.

use crate::helpers::registry_helpers::*;
use pyscope::hir::{DiagnosticKind, Entity, EntityKind, ImportResolution, Severity};

#[test]
fn test_registry_order_is_sorted_modules_then_preorder() {
    let registry = registry_of(&[
        ("b.py", "def g():\n    pass\n"),
        ("a.py", "X = 1\n\nclass A:\n    def m(self):\n        pass\n"),
    ]);
    assert_eq!(
        qualified_names(&registry),
        vec!["a", "a.X", "a.A", "a.A.m", "b", "b.g"]
    );
    let modules: Vec<&str> = registry
        .modules()
        .iter()
        .map(|m| &*m.info.qualified_name)
        .collect();
    assert_eq!(modules, vec!["a", "b"]);
}

#[test]
fn test_get_missing_is_none() {
    let registry = registry_of(&[("a.py", "x = 1\n")]);
    assert!(registry.get("a.y").is_none());
    assert!(registry.get("").is_none());
    assert_eq!(registry.get("a.x").map(Entity::kind), Some(EntityKind::Variable));
}

#[test]
fn test_name_collision_first_wins() {
    // `pkg/mod.py` and `pkg/mod/__init__.py` both claim `pkg.mod`
    let (registry, diagnostics) = analyze(&[
        ("pkg/mod.py", "def first():\n    pass\n"),
        ("pkg/mod/__init__.py", "def second():\n    pass\n"),
    ]);
    let collisions = of_kind(&diagnostics, DiagnosticKind::NameCollision);
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].severity, Severity::Error);
    assert!(collisions[0].message.contains("pkg.mod"));
    assert!(registry.contains("pkg.mod.first"));
    assert!(!registry.contains("pkg.mod.second"));
}

#[test]
fn test_import_resolution_written_at_seal() {
    let registry = registry_of(&[
        ("pkg/__init__.py", ""),
        ("pkg/core.py", "import os\nfrom . import util\nfrom .util import helper\nfrom ... import nowhere\n"),
        ("pkg/util.py", "def helper():\n    pass\n"),
    ]);
    let resolutions: Vec<(String, ImportResolution)> = registry
        .iter()
        .filter_map(|(_, entity)| entity.as_import())
        .map(|import| (import.module.clone(), import.resolution.clone()))
        .collect();
    assert_eq!(
        resolutions,
        vec![
            ("os".to_string(), ImportResolution::External),
            (".".to_string(), ImportResolution::Resolved("pkg.util".into())),
            (".util".to_string(), ImportResolution::Resolved("pkg.util".into())),
            ("...".to_string(), ImportResolution::Unresolved),
        ]
    );
}
