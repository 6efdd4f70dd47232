//! The global entity registry.
//!
//! Maps every qualified name produced in a run to its [`Entity`]. Built once
//! by a [`RegistryBuilder`] after all files are parsed, read-only afterwards.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::entities::{Class, Entity, Function, Import, ImportResolution, Module};
use crate::base::Location;

/// Errors raised while sealing a registry; reported as diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("qualified name `{name}` is already defined at {first}")]
    DuplicateQualifiedName {
        name: Arc<str>,
        first: Location,
        second: Location,
    },
}

impl RegistryError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RegistryError::DuplicateQualifiedName { second, .. } => {
                Diagnostic::at(DiagnosticKind::NameCollision, second, self.to_string())
            }
        }
    }
}

/// Qualified name -> entity, in deterministic order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: IndexMap<Arc<str>, Entity>,
    modules: Vec<Arc<Module>>,
}

impl Registry {
    pub fn get(&self, qualified_name: &str) -> Option<&Entity> {
        self.entities.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entities.contains_key(qualified_name)
    }

    /// All modules, sorted by qualified name
    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    pub fn module(&self, qualified_name: &str) -> Option<&Arc<Module>> {
        self.get(qualified_name).and_then(Entity::as_module)
    }

    /// Entities in registry order: modules by name, each tree in pre-order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Entity)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Accumulates module trees, then seals them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    modules: Vec<Module>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Resolve imports, index every entity and report name collisions.
    pub fn finish(mut self) -> (Registry, Vec<Diagnostic>) {
        self.modules
            .sort_by(|a, b| a.info.qualified_name.cmp(&b.info.qualified_name));

        let known: FxHashSet<Arc<str>> = self
            .modules
            .iter()
            .map(|m| m.info.qualified_name.clone())
            .collect();
        for module in &mut self.modules {
            resolve_module_imports(module, &known);
        }

        let mut registry = Registry::default();
        let mut diagnostics = Vec::new();
        for module in self.modules {
            let module = Arc::new(module);
            let mut stack = vec![Entity::Module(module.clone())];
            let mut indexed_module = false;
            while let Some(entity) = stack.pop() {
                let name = entity.qualified_name().clone();
                if let Some(first) = registry.entities.get(&name) {
                    let error = RegistryError::DuplicateQualifiedName {
                        name,
                        first: first.location().clone(),
                        second: entity.location().clone(),
                    };
                    diagnostics.push(error.to_diagnostic());
                    continue;
                }
                if matches!(entity, Entity::Module(_)) {
                    indexed_module = true;
                }
                let mut children = entity.children();
                children.reverse();
                stack.extend(children);
                registry.entities.insert(name, entity);
            }
            if indexed_module {
                registry.modules.push(module);
            }
        }

        debug!(
            "sealed registry: {} modules, {} entities, {} collisions",
            registry.modules.len(),
            registry.entities.len(),
            diagnostics.len()
        );
        (registry, diagnostics)
    }
}

/// Absolute dotted module an import refers to.
///
/// Relative imports resolve against the importer's package; `None` when
/// they climb above the root.
pub fn import_target(importer: &str, importer_is_package: bool, import: &Import) -> Option<String> {
    let path = import.module_path();
    if import.level == 0 {
        return Some(path.to_string());
    }
    let mut parts: Vec<&str> = importer.split('.').collect();
    if !importer_is_package {
        parts.pop();
    }
    for _ in 1..import.level {
        parts.pop();
    }
    if parts.is_empty() {
        return None;
    }
    if !path.is_empty() {
        parts.push(path);
    }
    Some(parts.join("."))
}

/// How an import resolves against the set of parsed modules
pub fn resolve_import(
    importer: &str,
    importer_is_package: bool,
    import: &Import,
    known: &FxHashSet<Arc<str>>,
) -> ImportResolution {
    match import_target(importer, importer_is_package, import) {
        Some(target) => match imported_submodule(&target, import, known)
            .or_else(|| known.get(target.as_str()))
        {
            Some(qname) => ImportResolution::Resolved(qname.clone()),
            None => ImportResolution::External,
        },
        None => ImportResolution::Unresolved,
    }
}

/// `from pkg import mod` naming a single parsed submodule imports that module
fn imported_submodule<'a>(
    target: &str,
    import: &Import,
    known: &'a FxHashSet<Arc<str>>,
) -> Option<&'a Arc<str>> {
    if !import.is_from || import.is_wildcard {
        return None;
    }
    let [imported] = import.names.as_slice() else {
        return None;
    };
    known.get(format!("{target}.{}", imported.name).as_str())
}

fn resolve_module_imports(module: &mut Module, known: &FxHashSet<Arc<str>>) {
    let importer = module.info.qualified_name.clone();
    let is_package = module.is_package;
    let resolve = |imports: &mut Vec<Arc<Import>>| {
        for import in imports {
            let resolution = resolve_import(&importer, is_package, &**import, known);
            Arc::make_mut(import).resolution = resolution;
        }
    };

    resolve(&mut module.imports);
    // Nesting is bounded by the parser's depth limit
    for class in &mut module.classes {
        resolve_in_class(Arc::make_mut(class), &resolve);
    }
    for function in &mut module.functions {
        resolve_in_function(Arc::make_mut(function), &resolve);
    }
}

fn resolve_in_class(class: &mut Class, resolve: &dyn Fn(&mut Vec<Arc<Import>>)) {
    resolve(&mut class.imports);
    for nested in &mut class.classes {
        resolve_in_class(Arc::make_mut(nested), resolve);
    }
    for method in &mut class.methods {
        resolve_in_function(Arc::make_mut(method), resolve);
    }
}

fn resolve_in_function(function: &mut Function, resolve: &dyn Fn(&mut Vec<Arc<Import>>)) {
    resolve(&mut function.imports);
    for nested in &mut function.classes {
        resolve_in_class(Arc::make_mut(nested), resolve);
    }
    for nested in &mut function.functions {
        resolve_in_function(Arc::make_mut(nested), resolve);
    }
}
