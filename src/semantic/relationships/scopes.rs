//! Per-scope visibility maps built from a sealed registry.
//!
//! For a scope like `pkg.mod.Service.run`:
//! - `direct` holds the functions, classes and variables defined in it
//! - `imports` holds every name an import statement in it binds
//! - `wildcards` holds the absolute modules of its `from m import *`

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::hir::{Entity, Import, Registry, import_target};

/// What an import binding points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ImportBinding {
    /// `import a.b` binds `a` to module `a`; `import a.b as c` binds `c` to `a.b`
    Module(String),
    /// `from m import x` binds `x` to member `x` of module `m`
    Member { module: String, name: SmolStr },
    /// A relative import that climbs above the root
    Unresolvable,
}

#[derive(Debug, Clone)]
pub(super) struct ScopeVisibility {
    /// Enclosing scope, `None` for modules
    pub parent: Option<Arc<str>>,
    /// Module this scope lives in
    pub module: Arc<str>,
    pub is_class: bool,
    pub direct: FxHashMap<SmolStr, Arc<str>>,
    pub imports: FxHashMap<SmolStr, ImportBinding>,
    pub wildcards: Vec<String>,
}

/// Visibility of every module, class and function scope
#[derive(Debug, Default)]
pub(super) struct ScopeTable {
    scopes: FxHashMap<Arc<str>, ScopeVisibility>,
}

impl ScopeTable {
    pub fn build(registry: &Registry) -> Self {
        let mut scopes = FxHashMap::default();

        for module in registry.modules() {
            let module_name = module.info.qualified_name.clone();
            let is_package = module.is_package;
            let mut stack = vec![Entity::Module(module.clone())];

            while let Some(entity) = stack.pop() {
                let is_class = matches!(entity, Entity::Class(_));
                let mut visibility = ScopeVisibility {
                    parent: entity.info().parent.clone(),
                    module: module_name.clone(),
                    is_class,
                    direct: FxHashMap::default(),
                    imports: FxHashMap::default(),
                    wildcards: Vec::new(),
                };

                for child in entity.children() {
                    if !is_registered(registry, &child) {
                        // Dropped by a name collision
                        continue;
                    }
                    match &child {
                        Entity::Import(import) => {
                            bind_import(&mut visibility, &module_name, is_package, import);
                        }
                        Entity::Class(_) | Entity::Function(_) => {
                            visibility
                                .direct
                                .insert(SmolStr::new(child.name()), child.qualified_name().clone());
                            stack.push(child.clone());
                        }
                        Entity::Variable(_) => {
                            visibility
                                .direct
                                .entry(SmolStr::new(child.name()))
                                .or_insert_with(|| child.qualified_name().clone());
                        }
                        Entity::Module(_) => {}
                    }
                }
                scopes.insert(entity.qualified_name().clone(), visibility);
            }
        }

        Self { scopes }
    }

    pub fn get(&self, scope: &str) -> Option<&ScopeVisibility> {
        self.scopes.get(scope)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }
}

/// The registry holds this very entity, not a colliding one
fn is_registered(registry: &Registry, entity: &Entity) -> bool {
    registry.get(entity.qualified_name()).is_some_and(|indexed| {
        indexed.kind() == entity.kind() && indexed.location() == entity.location()
    })
}

fn bind_import(visibility: &mut ScopeVisibility, module: &str, is_package: bool, import: &Import) {
    let target = import_target(module, is_package, import);
    if import.is_wildcard {
        visibility.wildcards.extend(target);
        return;
    }
    for (bound, imported) in import.bindings() {
        let binding = match (&target, import.is_from) {
            (None, _) => ImportBinding::Unresolvable,
            (Some(target), true) => ImportBinding::Member {
                module: target.clone(),
                name: imported.name.clone(),
            },
            (Some(_), false) if imported.alias.is_some() => {
                ImportBinding::Module(imported.name.to_string())
            }
            (Some(_), false) => ImportBinding::Module(bound.to_string()),
        };
        // Definitions win over imports of the same name
        if !visibility.direct.contains_key(bound) {
            visibility.imports.insert(SmolStr::new(bound), binding);
        }
    }
}
