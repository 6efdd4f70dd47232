//! Import edges, including relative imports.

use crate::helpers::edge_assertions::*;
use crate::helpers::registry_helpers::*;
use pyscope::{Direction, EdgeKind, ResolutionStatus, build_relationships_with_diagnostics};

#[test]
fn test_relative_imports_resolve_against_package() {
    let registry = registry_of(&[
        ("app/__init__.py", "from .models import User\n"),
        ("app/models.py", "class User:\n    pass\n"),
        ("app/api/__init__.py", ""),
        (
            "app/api/views.py",
            "from ..models import User\nfrom . import helpers\nfrom ...outside import thing\n",
        ),
        ("app/api/helpers.py", "import os\n"),
    ]);
    let (index, unresolved) = build_relationships_with_diagnostics(&registry);

    assert_eq!(
        targets_of(&index, "app.api.views", EdgeKind::Imports),
        vec![
            ("...outside".to_string(), ResolutionStatus::Unresolved),
            ("app.api.helpers".to_string(), ResolutionStatus::Resolved),
            ("app.models".to_string(), ResolutionStatus::Resolved),
        ]
    );
    assert_edge(&index, "app", EdgeKind::Imports, "app.models", ResolutionStatus::Resolved);
    assert_edge(
        &index,
        "app.api.helpers",
        EdgeKind::Imports,
        "os",
        ResolutionStatus::External,
    );
    assert_eq!(unresolved.len(), 1);

    assert_eq!(
        index.related("app.models", EdgeKind::Imports, Direction::Incoming),
        vec!["app", "app.api.views"]
    );
}

#[test]
fn test_plain_import_targets_full_module() {
    let registry = registry_of(&[
        ("pkg/__init__.py", ""),
        ("pkg/sub.py", ""),
        ("main.py", "import pkg.sub\nimport xml.etree.ElementTree as ET\n"),
    ]);
    let (index, _) = build_relationships_with_diagnostics(&registry);
    assert_eq!(
        targets_of(&index, "main", EdgeKind::Imports),
        vec![
            ("pkg.sub".to_string(), ResolutionStatus::Resolved),
            ("xml.etree.ElementTree".to_string(), ResolutionStatus::External),
        ]
    );
}

#[test]
fn test_function_level_import_attributed_to_module() {
    let source = "def load():\n    import json\n    return json.loads('{}')\n";
    let registry = registry_of(&[("lazy.py", source)]);
    let (index, _) = build_relationships_with_diagnostics(&registry);
    assert_edge(&index, "lazy", EdgeKind::Imports, "json", ResolutionStatus::External);
    assert_edge(
        &index,
        "lazy.load",
        EdgeKind::Calls,
        "json.loads",
        ResolutionStatus::External,
    );
}

#[test]
fn test_from_import_of_single_submodule_targets_it() {
    let registry = registry_of(&[
        ("app/__init__.py", "VERSION = 1\n"),
        ("app/helpers.py", ""),
        ("app/models.py", ""),
        (
            "main.py",
            "from app import helpers\nfrom app import VERSION\nfrom app import helpers, models\n",
        ),
    ]);
    let (index, _) = build_relationships_with_diagnostics(&registry);
    assert_eq!(
        targets_of(&index, "main", EdgeKind::Imports),
        vec![
            ("app".to_string(), ResolutionStatus::Resolved),
            ("app".to_string(), ResolutionStatus::Resolved),
            ("app.helpers".to_string(), ResolutionStatus::Resolved),
        ]
    );
}

#[test]
fn test_repeated_imports_of_one_module_keep_an_edge_each() {
    let registry = registry_of(&[
        ("a.py", "x = 1\ny = 2\n"),
        ("b.py", "import a\nfrom a import x\nfrom a import y\n"),
    ]);
    let (index, _) = build_relationships_with_diagnostics(&registry);
    assert_eq!(
        index.related("a", EdgeKind::Imports, Direction::Incoming),
        vec!["b", "b", "b"]
    );
    assert_eq!(index.edges_of_kind(EdgeKind::Imports).count(), 3);
}
