//! Diagnostics: failure isolation and graceful degradation.

use crate::helpers::registry_helpers::*;
use crate::helpers::source_fixtures::*;
use pyscope::hir::{DiagnosticKind, EntityKind, Severity, sort_diagnostics};

#[test]
fn test_syntax_error_isolated_to_its_file() {
    let (registry, diagnostics) = analyze(&[("good.py", SERVICE), ("bad.py", BROKEN)]);

    let errors = of_kind(&diagnostics, DiagnosticKind::ParseError);
    assert_eq!(errors.len(), 1, "Expected one parse error, got {:?}", diagnostics);
    assert!(errors[0].file.ends_with("bad.py"));
    assert_eq!(errors[0].severity, Severity::Error);

    assert!(registry.module("bad").is_none());
    assert!(!registry.contains("bad.broken"));
    for qname in [
        "good",
        "good.logger",
        "good.Service",
        "good.Service.retries",
        "good.Service.__init__",
        "good.Service.name",
        "good.Service._cache",
        "good.Service.label",
        "good.Service.encode",
        "good.Service.run",
    ] {
        assert!(registry.contains(qname), "missing {}", qname);
    }
}

#[test]
fn test_type_alias_degrades() {
    let source = "type X = int\n\ndef f():\n    pass\n\ndef g():\n    pass\n";
    let (registry, diagnostics) = analyze(&[("alias.py", source)]);

    assert!(of_kind(&diagnostics, DiagnosticKind::ParseError).is_empty());
    let unsupported = of_kind(&diagnostics, DiagnosticKind::UnsupportedConstruct);
    assert_eq!(unsupported.len(), 1);
    assert_eq!(unsupported[0].severity, Severity::Warning);

    let non_modules = registry
        .iter()
        .filter(|(_, entity)| entity.kind() != EntityKind::Module)
        .count();
    assert_eq!(non_modules, 3);
    assert_eq!(
        registry.get("alias.X").map(|e| e.kind()),
        Some(EntityKind::Variable)
    );
}

#[test]
fn test_duplicate_definition_keeps_first() {
    let source = "def f():\n    return 1\n\ndef f():\n    return 2\n";
    let (registry, diagnostics) = analyze(&[("dup.py", source)]);
    let duplicates = of_kind(&diagnostics, DiagnosticKind::DuplicateDefinition);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].span.start.line, 4);
    assert_eq!(registry.get("dup.f").map(|e| e.location().line()), Some(1));
}

#[test]
fn test_diagnostics_sort_by_file_then_position() {
    let (_, mut diagnostics) = analyze(&[
        ("z.py", BROKEN),
        ("a.py", "type A = int\ntype B = str\n"),
    ]);
    sort_diagnostics(&mut diagnostics);
    let order: Vec<(String, u32)> = diagnostics
        .iter()
        .map(|d| {
            let file = d.file.file_name().map(|n| n.to_string_lossy().into_owned());
            (file.unwrap_or_default(), d.span.start.line)
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("a.py".to_string(), 1),
            ("a.py".to_string(), 2),
            ("z.py".to_string(), 1),
        ]
    );
}
