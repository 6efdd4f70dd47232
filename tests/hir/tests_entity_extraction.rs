//! Entity extraction through the full parse pipeline.

use crate::helpers::registry_helpers::*;
use crate::helpers::source_fixtures::*;
use pyscope::hir::{
    ClassKind, Entity, EntityKind, Mutability, ParamKind, VariableScope, Visibility,
};

// =============================================================================
// MODULES AND CLASSES
// =============================================================================

#[test]
fn test_module_docstring_and_children() {
    let registry = registry_of(&[("geo/shapes.py", SHAPES)]);
    let module = registry.module("geo.shapes").expect("module registered");
    assert_eq!(module.info.docstring.as_deref(), Some("Geometric shapes."));
    assert!(!module.is_package);

    let children: Vec<(String, EntityKind)> = Entity::Module(module.clone())
        .children()
        .iter()
        .filter(|child| child.kind() != EntityKind::Import)
        .map(|child| (child.name().to_string(), child.kind()))
        .collect();
    assert_eq!(
        children,
        vec![
            ("PI".to_string(), EntityKind::Variable),
            ("Shape".to_string(), EntityKind::Class),
        ]
    );
}

#[test]
fn test_abstract_class() {
    let registry = registry_of(&[("geo/shapes.py", SHAPES)]);
    let Some(Entity::Class(shape)) = registry.get("geo.shapes.Shape") else {
        panic!("Shape should be a class");
    };
    assert!(shape.is_abstract);
    assert_eq!(shape.bases, vec!["ABC".to_string()]);
    assert_eq!(shape.info.docstring.as_deref(), Some("A closed figure."));

    let Some(Entity::Function(area)) = registry.get("geo.shapes.Shape.area") else {
        panic!("area should be a method");
    };
    assert!(area.flags.is_abstract);
    assert_eq!(area.returns.as_deref(), Some("float"));
    assert_eq!(area.owner.as_deref(), Some("geo.shapes.Shape"));
}

#[test]
fn test_constant_mutability() {
    let registry = registry_of(&[("geo/shapes.py", SHAPES)]);
    let Some(Entity::Variable(pi)) = registry.get("geo.shapes.PI") else {
        panic!("PI should be a variable");
    };
    assert_eq!(pi.mutability, Mutability::Constant);
    assert_eq!(pi.scope, VariableScope::Module);
    assert_eq!(pi.value.as_deref(), Some("3.14159"));
}

#[test]
fn test_service_members() {
    let registry = registry_of(&[("app/service.py", SERVICE)]);

    let Some(Entity::Function(label)) = registry.get("app.service.Service.label") else {
        panic!("label should be a method");
    };
    assert!(label.flags.is_property);

    let Some(Entity::Function(encode)) = registry.get("app.service.Service.encode") else {
        panic!("encode should be a method");
    };
    assert!(encode.flags.is_static);
    assert_eq!(encode.params[0].name.as_str(), "payload");
    assert_eq!(encode.params[0].kind, ParamKind::PositionalOrKeyword);

    let Some(Entity::Function(init)) = registry.get("app.service.Service.__init__") else {
        panic!("__init__ should be a method");
    };
    assert!(init.flags.is_constructor);

    let Some(Entity::Variable(cache)) = registry.get("app.service.Service._cache") else {
        panic!("_cache should be an instance attribute");
    };
    assert_eq!(cache.scope, VariableScope::Instance);
    assert_eq!(cache.info.visibility, Visibility::Private);

    let Some(Entity::Variable(retries)) = registry.get("app.service.Service.retries") else {
        panic!("retries should be a class variable");
    };
    assert_eq!(retries.scope, VariableScope::Class);
    assert_eq!(retries.annotation.as_deref(), Some("int"));
}

#[test]
fn test_class_kinds() {
    let source = r#"
from dataclasses import dataclass
from enum import Enum
from typing import Protocol


@dataclass
class Point:
    x: int
    y: int


class Color(Enum):
    RED = 1


class Greeter(Protocol):
    def greet(self) -> str:
        ...


class Plain:
    pass
"#;
    let registry = registry_of(&[("kinds.py", source)]);
    let kind = |qname: &str| match registry.get(qname) {
        Some(Entity::Class(class)) => class.kind,
        other => panic!("{} is not a class: {:?}", qname, other.map(Entity::kind)),
    };
    assert_eq!(kind("kinds.Point"), ClassKind::Dataclass);
    assert_eq!(kind("kinds.Color"), ClassKind::Enum);
    assert_eq!(kind("kinds.Greeter"), ClassKind::Protocol);
    assert_eq!(kind("kinds.Plain"), ClassKind::Regular);
}

// =============================================================================
// DOCSTRINGS
// =============================================================================

#[test]
fn test_function_docstring_parsed() {
    let registry = registry_of(&[("calc.py", GOOGLE_ADD)]);
    let Some(Entity::Function(add)) = registry.get("calc.add") else {
        panic!("add should be a function");
    };
    let doc = add.info.parsed_doc.as_ref().expect("docstring parsed");
    assert_eq!(doc.summary, "Add two numbers.");
    assert_eq!(doc.params.len(), 2);
    assert_eq!(add.params.len(), 2);
    assert_eq!(add.params[1].annotation.as_deref(), Some("int"));
}

#[test]
fn test_package_module_naming() {
    let registry = registry_of(&[
        ("geo/__init__.py", "from .shapes import Shape\n"),
        ("geo/shapes.py", SHAPES),
    ]);
    let package = registry.module("geo").expect("package registered");
    assert!(package.is_package);
    assert!(registry.contains("geo.shapes.Shape.describe"));
}
