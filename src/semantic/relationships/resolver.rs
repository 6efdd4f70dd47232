//! Name resolution over the scope table.
//!
//! A name is looked up in this order:
//! 1. Definitions in the starting scope, its enclosing functions, then its module
//! 2. Import bindings along the same chain
//! 3. Members of wildcard-imported modules
//! 4. Builtins, which resolve externally to `builtins.<name>`
//!
//! Class bodies are part of the chain only when resolution starts in them.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use super::builtins::is_builtin;
use super::scopes::{ImportBinding, ScopeTable, ScopeVisibility};
use crate::core::is_identifier;
use crate::hir::{Entity, Function, ParamKind, Registry, expr_head};

/// Outcome of resolving a dotted name
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Resolution {
    /// An entity in the registry
    Entity(Arc<str>),
    /// Something outside the run, by dotted path
    External(String),
    Unresolved,
}

pub(super) struct NameResolver<'a> {
    registry: &'a Registry,
    scopes: &'a ScopeTable,
    max_hops: usize,
}

impl<'a> NameResolver<'a> {
    pub fn new(registry: &'a Registry, scopes: &'a ScopeTable, max_hops: usize) -> Self {
        Self {
            registry,
            scopes,
            max_hops,
        }
    }

    /// Resolve `dotted` as written in `scope`
    pub fn resolve(&self, scope: &str, dotted: &str) -> Resolution {
        self.resolve_in(scope, dotted, true)
    }

    /// Resolve a base-class expression as written in `scope`.
    ///
    /// Attribute access on classes only sees direct members here, so base
    /// resolution never recurses into another class's bases.
    pub fn resolve_base(&self, scope: &str, base: &str) -> Resolution {
        let head = expr_head(base);
        if !is_dotted_name(head) {
            return Resolution::Unresolved;
        }
        self.resolve_in(scope, head, false)
    }

    /// Resolve the callee of a call made inside `function`
    pub fn resolve_call(&self, function: &Function, callee: &str) -> Resolution {
        if let Some(rest) = callee.strip_prefix("super().") {
            return match &function.owner {
                Some(owner) if is_dotted_name(rest) => {
                    let (first, tail) = split_head(rest);
                    let found = self
                        .mro(owner)
                        .iter()
                        .skip(1)
                        .find_map(|class| self.direct_member(class, first));
                    match found {
                        Some(qname) => self.walk(Resolution::Entity(qname), tail, true),
                        None => Resolution::Unresolved,
                    }
                }
                _ => Resolution::Unresolved,
            };
        }
        if !is_dotted_name(callee) {
            return Resolution::Unresolved;
        }

        let (head, tail) = split_head(callee);
        if let (Some(owner), Some(receiver)) = (&function.owner, receiver(function)) {
            if head == receiver && !tail.is_empty() {
                let (first, rest) = split_head(tail);
                return match self.class_member(owner, first) {
                    Some(qname) => self.walk(Resolution::Entity(qname), rest, true),
                    None => Resolution::Unresolved,
                };
            }
        }
        self.resolve(&function.info.qualified_name, callee)
    }

    /// Method resolution order of `class`: depth-first, left to right,
    /// each class once.
    pub fn mro(&self, class: &Arc<str>) -> Vec<Arc<str>> {
        let mut order = Vec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![class.clone()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let bases = self.class_bases(&current);
            order.push(current);
            stack.extend(bases.into_iter().rev());
        }
        order
    }

    fn resolve_in(&self, scope: &str, dotted: &str, inherit: bool) -> Resolution {
        let (head, tail) = split_head(dotted);
        let start = self.lookup(scope, head);
        self.walk(start, tail, inherit)
    }

    /// Follow the remaining attribute segments from `start`
    fn walk(&self, start: Resolution, tail: &str, inherit: bool) -> Resolution {
        let mut current = start;
        for segment in tail.split('.').filter(|s| !s.is_empty()) {
            current = match current {
                Resolution::Entity(qname) => match self.registry.get(&qname) {
                    Some(Entity::Module(_)) => self.module_member(&qname, segment, 0),
                    Some(Entity::Class(_)) => {
                        let member = if inherit {
                            self.class_member(&qname, segment)
                        } else {
                            self.direct_member(&qname, segment)
                        };
                        member.map_or(Resolution::Unresolved, Resolution::Entity)
                    }
                    // Attributes of functions and variable values are not modeled
                    _ => Resolution::Unresolved,
                },
                Resolution::External(path) => self.outside_run(format!("{path}.{segment}")),
                Resolution::Unresolved => return Resolution::Unresolved,
            };
        }
        current
    }

    fn lookup(&self, scope: &str, name: &str) -> Resolution {
        let chain = self.chain(scope);

        for visibility in &chain {
            if let Some(qname) = visibility.direct.get(name) {
                return Resolution::Entity(qname.clone());
            }
        }
        for visibility in &chain {
            if let Some(binding) = visibility.imports.get(name) {
                return self.follow(binding, 0);
            }
        }
        for visibility in &chain {
            for module in &visibility.wildcards {
                if let Resolution::Entity(qname) = self.module_member(module, name, 1) {
                    return Resolution::Entity(qname);
                }
            }
        }
        if is_builtin(name) {
            return Resolution::External(format!("builtins.{name}"));
        }
        trace!("[RESOLVE] `{}` not visible from {}", name, scope);
        Resolution::Unresolved
    }

    /// Scopes consulted from `scope`, innermost first
    fn chain(&self, scope: &str) -> Vec<&'a ScopeVisibility> {
        let mut chain = Vec::new();
        let mut current = self.scopes.get(scope);
        let mut first = true;
        while let Some(visibility) = current {
            if first || !visibility.is_class {
                chain.push(visibility);
            }
            first = false;
            current = visibility
                .parent
                .as_deref()
                .and_then(|parent| self.scopes.get(parent));
        }
        chain
    }

    fn follow(&self, binding: &ImportBinding, hops: usize) -> Resolution {
        match binding {
            ImportBinding::Module(path) => match self.registry.module(path) {
                Some(module) => Resolution::Entity(module.info.qualified_name.clone()),
                None => self.outside_run(path.clone()),
            },
            ImportBinding::Member { module, name } => self.module_member(module, name, hops),
            ImportBinding::Unresolvable => Resolution::Unresolved,
        }
    }

    /// `name` as seen from outside `module`, following re-exports
    fn module_member(&self, module: &str, name: &str, hops: usize) -> Resolution {
        if hops > self.max_hops {
            warn!(
                "re-export chain for `{}.{}` exceeds {} hops",
                module, name, self.max_hops
            );
            return Resolution::Unresolved;
        }
        if self.registry.module(module).is_none() {
            return self.outside_run(format!("{module}.{name}"));
        }
        if let Some(entity) = self.registry.get(&format!("{module}.{name}")) {
            if !matches!(entity, Entity::Import(_)) {
                return Resolution::Entity(entity.qualified_name().clone());
            }
        }

        let Some(visibility) = self.scopes.get(module) else {
            return Resolution::Unresolved;
        };
        if let Some(binding) = visibility.imports.get(name) {
            return self.follow(binding, hops + 1);
        }
        for wildcard in &visibility.wildcards {
            if let Resolution::Entity(qname) = self.module_member(wildcard, name, hops + 1) {
                return Resolution::Entity(qname);
            }
        }
        Resolution::Unresolved
    }

    /// A dotted path whose prefix was not parsed.
    ///
    /// Namespace packages have no `__init__` module of their own, so the path
    /// may still name a parsed module or one of its members.
    fn outside_run(&self, path: String) -> Resolution {
        match self.registry.get(&path) {
            Some(entity) if !matches!(entity, Entity::Import(_)) => {
                Resolution::Entity(entity.qualified_name().clone())
            }
            _ => Resolution::External(path),
        }
    }

    /// Attribute `name` of `class` or the first base defining it
    fn class_member(&self, class: &Arc<str>, name: &str) -> Option<Arc<str>> {
        self.mro(class)
            .iter()
            .find_map(|candidate| self.direct_member(candidate, name))
    }

    fn direct_member(&self, class: &str, name: &str) -> Option<Arc<str>> {
        self.registry
            .get(&format!("{class}.{name}"))
            .filter(|entity| !matches!(entity, Entity::Import(_)))
            .map(|entity| entity.qualified_name().clone())
    }

    /// Bases of `class` that resolve to classes in the registry
    fn class_bases(&self, class: &str) -> Vec<Arc<str>> {
        let Some(Entity::Class(entity)) = self.registry.get(class) else {
            return Vec::new();
        };
        let Some(scope) = entity.info.parent.as_deref() else {
            return Vec::new();
        };
        entity
            .bases
            .iter()
            .filter_map(|base| match self.resolve_base(scope, base) {
                Resolution::Entity(qname) => Some(qname),
                _ => None,
            })
            .filter(|qname| matches!(self.registry.get(qname), Some(Entity::Class(_))))
            .collect()
    }
}

/// The name a method's instance or class is bound to
fn receiver(function: &Function) -> Option<&str> {
    if function.owner.is_none() || function.flags.is_static {
        return None;
    }
    function
        .params
        .first()
        .filter(|param| {
            matches!(
                param.kind,
                ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
            )
        })
        .map(|param| param.name.as_str())
}

fn split_head(dotted: &str) -> (&str, &str) {
    dotted.split_once('.').unwrap_or((dotted, ""))
}

pub(super) fn is_dotted_name(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}
