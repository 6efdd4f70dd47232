//! Relationship mapping: inheritance, import and call edges between entities.
//!
//! Runs once over a sealed [`Registry`]. Every edge's source is a registered
//! entity; a `Resolved` edge's target is one too. Anything that points
//! outside the run is `External`, anything that cannot be bound is
//! `Unresolved` and reported as an info diagnostic.
//!
//! Call resolution is approximate: it follows names, imports, `self`/`cls`
//! receivers and `super()`, never values.

mod builtins;
mod resolver;
mod scopes;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::base::{Location, Span};
use crate::hir::{
    Class, Diagnostic, DiagnosticKind, Entity, Function, Import, ImportResolution, Module,
    Registry, RegistryBuilder, import_target,
};
use crate::project::AnalysisConfig;
use resolver::{NameResolver, Resolution, is_dotted_name};
use scopes::ScopeTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    InheritsFrom,
    Imports,
    Calls,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] = [EdgeKind::InheritsFrom, EdgeKind::Imports, EdgeKind::Calls];

    pub fn display(&self) -> &'static str {
        match self {
            EdgeKind::InheritsFrom => "inherits-from",
            EdgeKind::Imports => "imports",
            EdgeKind::Calls => "calls",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionStatus {
    /// Target is a registered entity
    Resolved,
    /// Target lies outside the run; best-known dotted name
    External,
    /// Target could not be bound; raw text as written
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RelationshipEdge {
    pub source: Arc<str>,
    pub target: Arc<str>,
    pub kind: EdgeKind,
    pub status: ResolutionStatus,
    /// Where the relationship is written
    pub location: Location,
}

impl RelationshipEdge {
    pub fn is_resolved(&self) -> bool {
        self.status == ResolutionStatus::Resolved
    }

    /// Edge order; the span only separates edges that are otherwise equal
    pub(crate) fn sort_key(&self) -> (&str, EdgeKind, &str, ResolutionStatus, Span) {
        (&self.source, self.kind, &self.target, self.status, self.location.span)
    }
}

impl fmt::Display for RelationshipEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {} ({:?})",
            self.source, self.kind, self.target, self.status
        )
    }
}

/// Edges plus the diagnostics raised while resolving them
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    pub edges: Vec<RelationshipEdge>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Seal `modules` into a registry and map their relationships.
///
/// Modules are sorted by qualified name first, so the result does not
/// depend on the order they are passed in.
pub fn build(modules: impl IntoIterator<Item = Module>) -> Vec<RelationshipEdge> {
    let mut builder = RegistryBuilder::new();
    for module in modules {
        builder.add_module(module);
    }
    let (registry, _) = builder.finish();
    map_relationships(&registry).edges
}

pub fn map_relationships(registry: &Registry) -> RelationshipGraph {
    map_relationships_with(registry, &AnalysisConfig::default())
}

pub fn map_relationships_with(registry: &Registry, config: &AnalysisConfig) -> RelationshipGraph {
    let scopes = ScopeTable::build(registry);
    let resolver = NameResolver::new(registry, &scopes, config.follow_reexports);
    let mut mapper = Mapper {
        registry,
        scopes: &scopes,
        resolver,
        edges: Vec::new(),
    };

    for (_, entity) in registry.iter() {
        match entity {
            Entity::Class(class) => mapper.inheritance(class),
            Entity::Function(function) => mapper.calls(function),
            Entity::Import(import) => mapper.import(import),
            Entity::Module(_) | Entity::Variable(_) => {}
        }
    }

    let mut edges = mapper.edges;
    edges.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    // Import edges stay one per import statement
    edges.dedup_by(|later, earlier| {
        later.kind != EdgeKind::Imports
            && later.source == earlier.source
            && later.kind == earlier.kind
            && later.target == earlier.target
    });

    let diagnostics: Vec<Diagnostic> = edges
        .iter()
        .filter(|edge| edge.status == ResolutionStatus::Unresolved)
        .map(|edge| {
            Diagnostic::at(
                DiagnosticKind::UnresolvedReference,
                &edge.location,
                format!("unresolved {} target `{}` in `{}`", edge.kind, edge.target, edge.source),
            )
        })
        .collect();

    debug!(
        "mapped {} edges over {} scopes, {} unresolved",
        edges.len(),
        scopes.len(),
        diagnostics.len()
    );
    RelationshipGraph { edges, diagnostics }
}

struct Mapper<'a> {
    registry: &'a Registry,
    scopes: &'a ScopeTable,
    resolver: NameResolver<'a>,
    edges: Vec<RelationshipEdge>,
}

impl Mapper<'_> {
    fn push(
        &mut self,
        source: &Arc<str>,
        kind: EdgeKind,
        status: ResolutionStatus,
        target: Arc<str>,
        location: &Location,
    ) {
        self.edges.push(RelationshipEdge {
            source: source.clone(),
            target,
            kind,
            status,
            location: location.clone(),
        });
    }

    fn inheritance(&mut self, class: &Class) {
        let Some(scope) = class.info.parent.as_deref() else {
            return;
        };
        for base in &class.bases {
            let (status, target) = match self.resolver.resolve_base(scope, base) {
                Resolution::Entity(qname) => (ResolutionStatus::Resolved, qname),
                Resolution::External(path) => (ResolutionStatus::External, Arc::from(path)),
                Resolution::Unresolved => (ResolutionStatus::Unresolved, Arc::from(base.as_str())),
            };
            self.push(
                &class.info.qualified_name,
                EdgeKind::InheritsFrom,
                status,
                target,
                &class.info.location,
            );
        }
    }

    fn import(&mut self, import: &Import) {
        let Some(module) = import
            .info
            .parent
            .as_deref()
            .and_then(|parent| self.scopes.get(parent))
            .map(|scope| scope.module.clone())
        else {
            return;
        };
        let is_package = self
            .registry
            .module(&module)
            .is_some_and(|m| m.is_package);

        let (status, target) = match (&import.resolution, import_target(&module, is_package, import)) {
            (ImportResolution::Resolved(qname), _) => (ResolutionStatus::Resolved, qname.clone()),
            (ImportResolution::External, Some(path)) => (ResolutionStatus::External, Arc::from(path)),
            _ => (
                ResolutionStatus::Unresolved,
                Arc::from(import.module.as_str()),
            ),
        };
        self.push(&module, EdgeKind::Imports, status, target, &import.info.location);
    }

    fn calls(&mut self, function: &Function) {
        for call in &function.calls {
            let (status, target) = match self.resolver.resolve_call(function, &call.callee) {
                Resolution::Entity(qname) if self.is_callable(&qname) => {
                    (ResolutionStatus::Resolved, qname)
                }
                Resolution::External(path) if is_dotted_name(&path) => {
                    (ResolutionStatus::External, Arc::from(path))
                }
                _ => (
                    ResolutionStatus::Unresolved,
                    Arc::from(call.callee.as_str()),
                ),
            };
            self.push(
                &function.info.qualified_name,
                EdgeKind::Calls,
                status,
                target,
                &call.location,
            );
        }
    }

    fn is_callable(&self, qname: &str) -> bool {
        matches!(
            self.registry.get(qname),
            Some(Entity::Function(_) | Entity::Class(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{MemoryLoader, parse_all_with};
    use crate::syntax::ParserRegistry;

    fn registry_of(files: &[(&str, &str)]) -> Registry {
        let mut loader = MemoryLoader::new();
        for (path, text) in files {
            loader.insert(format!("proj/{path}"), *text);
        }
        let config = AnalysisConfig::default().with_root("proj");
        let (registry, _) = parse_all_with(
            &loader.paths(),
            &config,
            &loader,
            &ParserRegistry::with_defaults(),
        );
        registry
    }

    fn edges_of(graph: &RelationshipGraph, kind: EdgeKind) -> Vec<(String, String, ResolutionStatus)> {
        graph
            .edges
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.source.to_string(), e.target.to_string(), e.status))
            .collect()
    }

    fn edge(source: &str, target: &str, status: ResolutionStatus) -> (String, String, ResolutionStatus) {
        (source.to_string(), target.to_string(), status)
    }

    // ========================================================================
    // Inheritance
    // ========================================================================

    #[test]
    fn test_inheritance_across_modules() {
        let registry = registry_of(&[
            ("a.py", "class A:\n    pass\n"),
            ("b.py", "from a import A\n\nclass B(A):\n    pass\n"),
        ]);
        let graph = map_relationships(&registry);
        assert_eq!(
            edges_of(&graph, EdgeKind::InheritsFrom),
            vec![edge("b.B", "a.A", ResolutionStatus::Resolved)]
        );
        assert!(graph.diagnostics.is_empty());
    }

    #[test]
    fn test_inheritance_external_and_builtin() {
        let registry = registry_of(&[(
            "m.py",
            "import requests\nfrom typing import Generic, TypeVar\n\n\
             class S(requests.Session):\n    pass\n\n\
             class G(Generic[T]):\n    pass\n\n\
             class E(ValueError):\n    pass\n",
        )]);
        let graph = map_relationships(&registry);
        assert_eq!(
            edges_of(&graph, EdgeKind::InheritsFrom),
            vec![
                edge("m.E", "builtins.ValueError", ResolutionStatus::External),
                edge("m.G", "typing.Generic", ResolutionStatus::External),
                edge("m.S", "requests.Session", ResolutionStatus::External),
            ]
        );
    }

    #[test]
    fn test_inheritance_unresolved_base() {
        let registry = registry_of(&[("m.py", "class C(mystery.Base):\n    pass\n")]);
        let graph = map_relationships(&registry);
        assert_eq!(
            edges_of(&graph, EdgeKind::InheritsFrom),
            vec![edge("m.C", "mystery.Base", ResolutionStatus::Unresolved)]
        );
        assert_eq!(graph.diagnostics.len(), 1);
        assert_eq!(graph.diagnostics[0].kind, DiagnosticKind::UnresolvedReference);
    }

    #[test]
    fn test_nested_class_base_in_enclosing_body() {
        let registry = registry_of(&[(
            "m.py",
            "class Outer:\n    class Base:\n        pass\n\n    class Inner(Base):\n        pass\n",
        )]);
        let graph = map_relationships(&registry);
        assert_eq!(
            edges_of(&graph, EdgeKind::InheritsFrom),
            vec![edge("m.Outer.Inner", "m.Outer.Base", ResolutionStatus::Resolved)]
        );
    }

    // ========================================================================
    // Imports
    // ========================================================================

    #[test]
    fn test_import_edges() {
        let registry = registry_of(&[
            ("pkg/__init__.py", "from . import util\n"),
            ("pkg/util.py", "import os.path\nfrom .. import nothing\n"),
            ("pkg/sub/mod.py", "from ..util import helper\nimport json as j\n"),
        ]);
        let graph = map_relationships(&registry);
        assert_eq!(
            edges_of(&graph, EdgeKind::Imports),
            vec![
                edge("pkg", "pkg.util", ResolutionStatus::Resolved),
                edge("pkg.sub.mod", "json", ResolutionStatus::External),
                edge("pkg.sub.mod", "pkg.util", ResolutionStatus::Resolved),
                edge("pkg.util", "..", ResolutionStatus::Unresolved),
                edge("pkg.util", "os.path", ResolutionStatus::External),
            ]
        );
        assert_eq!(graph.diagnostics.len(), 1);
    }

    // ========================================================================
    // Calls
    // ========================================================================

    #[test]
    fn test_calls_resolution() {
        let registry = registry_of(&[
            ("util.py", "def helper():\n    pass\n"),
            (
                "app.py",
                "import util\nfrom util import helper as h\nimport numpy as np\n\n\
                 def local():\n    pass\n\n\
                 def run(x):\n    local()\n    util.helper()\n    h()\n    len(x)\n    np.array(x)\n    x.strip()\n",
            ),
        ]);
        let graph = map_relationships(&registry);
        let calls: Vec<_> = edges_of(&graph, EdgeKind::Calls)
            .into_iter()
            .filter(|(source, ..)| source == "app.run")
            .collect();
        assert_eq!(
            calls,
            vec![
                edge("app.run", "app.local", ResolutionStatus::Resolved),
                edge("app.run", "builtins.len", ResolutionStatus::External),
                edge("app.run", "numpy.array", ResolutionStatus::External),
                edge("app.run", "util.helper", ResolutionStatus::Resolved),
                edge("app.run", "x.strip", ResolutionStatus::Unresolved),
            ]
        );
    }

    #[test]
    fn test_self_and_super_calls() {
        let registry = registry_of(&[(
            "m.py",
            "class Base:\n    def save(self):\n        pass\n\n    def run(self):\n        pass\n\n\
             class Child(Base):\n    def run(self):\n        self.save()\n        super().run()\n        self.missing()\n\n\
             \x20   @classmethod\n    def make(cls):\n        cls.save()\n",
        )]);
        let graph = map_relationships(&registry);
        let calls = edges_of(&graph, EdgeKind::Calls);
        assert!(calls.contains(&edge("m.Child.run", "m.Base.save", ResolutionStatus::Resolved)));
        assert!(calls.contains(&edge("m.Child.run", "m.Base.run", ResolutionStatus::Resolved)));
        assert!(calls.contains(&edge("m.Child.run", "self.missing", ResolutionStatus::Unresolved)));
        assert!(calls.contains(&edge("m.Child.make", "m.Base.save", ResolutionStatus::Resolved)));
    }

    #[test]
    fn test_calls_see_enclosing_functions_not_class_body() {
        let registry = registry_of(&[(
            "m.py",
            "def outer():\n    def inner():\n        pass\n\n    def caller():\n        inner()\n\n\
             class K:\n    def helper(self):\n        pass\n\n    def use(self):\n        helper()\n",
        )]);
        let graph = map_relationships(&registry);
        let calls = edges_of(&graph, EdgeKind::Calls);
        assert!(calls.contains(&edge("m.outer.caller", "m.outer.inner", ResolutionStatus::Resolved)));
        assert!(calls.contains(&edge("m.K.use", "helper", ResolutionStatus::Unresolved)));
    }

    #[test]
    fn test_reexport_followed() {
        let registry = registry_of(&[
            ("pkg/__init__.py", "from .impl import Engine\n"),
            ("pkg/impl.py", "class Engine:\n    pass\n"),
            ("main.py", "from pkg import Engine\n\nclass Car(Engine):\n    pass\n"),
        ]);
        let graph = map_relationships(&registry);
        assert_eq!(
            edges_of(&graph, EdgeKind::InheritsFrom),
            vec![edge("main.Car", "pkg.impl.Engine", ResolutionStatus::Resolved)]
        );
    }

    #[test]
    fn test_reexport_hop_limit() {
        let registry = registry_of(&[
            ("a.py", "from b import X\n"),
            ("b.py", "from a import X\n"),
            ("c.py", "from a import X\n\nclass C(X):\n    pass\n"),
        ]);
        let config = AnalysisConfig::default().with_follow_reexports(2);
        let graph = map_relationships_with(&registry, &config);
        assert_eq!(
            edges_of(&graph, EdgeKind::InheritsFrom),
            vec![edge("c.C", "X", ResolutionStatus::Unresolved)]
        );
    }

    #[test]
    fn test_wildcard_import() {
        let registry = registry_of(&[
            ("shapes.py", "class Shape:\n    pass\n"),
            ("m.py", "from shapes import *\n\nclass Circle(Shape):\n    pass\n"),
        ]);
        let graph = map_relationships(&registry);
        assert_eq!(
            edges_of(&graph, EdgeKind::InheritsFrom),
            vec![edge("m.Circle", "shapes.Shape", ResolutionStatus::Resolved)]
        );
    }

    // ========================================================================
    // Output shape
    // ========================================================================

    #[test]
    fn test_edges_sorted_and_deduplicated() {
        let registry = registry_of(&[(
            "m.py",
            "def f():\n    pass\n\ndef g():\n    f()\n    f()\n    print()\n",
        )]);
        let graph = map_relationships(&registry);
        let calls = edges_of(&graph, EdgeKind::Calls);
        assert_eq!(
            calls,
            vec![
                edge("m.g", "builtins.print", ResolutionStatus::External),
                edge("m.g", "m.f", ResolutionStatus::Resolved),
            ]
        );
        let mut sorted = graph.edges.clone();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        assert_eq!(sorted, graph.edges);
    }

    #[test]
    fn test_one_import_edge_per_statement() {
        let registry = registry_of(&[
            ("a.py", "x = 1\ny = 2\n"),
            ("b.py", "import a\nfrom a import x\nfrom a import y\n\ndef f():\n    import a\n"),
        ]);
        let graph = map_relationships(&registry);
        let imports = edges_of(&graph, EdgeKind::Imports);
        assert_eq!(imports, vec![edge("b", "a", ResolutionStatus::Resolved); 4]);
        let lines: Vec<u32> = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Imports)
            .map(|e| e.location.span.start.line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3, 6]);
    }

    #[test]
    fn test_build_ignores_module_order() {
        let files = [
            ("a.py", "class A:\n    pass\n"),
            ("b.py", "from a import A\n\nclass B(A):\n    def f(self):\n        A()\n"),
        ];
        let registry = registry_of(&files);
        let modules: Vec<Module> = registry.modules().iter().map(|m| (**m).clone()).collect();
        let mut reversed = modules.clone();
        reversed.reverse();
        assert_eq!(build(modules), build(reversed));
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let registry = registry_of(&[("m.py", "class A(object):\n    def f(self):\n        g()\n")]);
        let first = map_relationships(&registry);
        let second = map_relationships(&registry);
        assert_eq!(first.edges, second.edges);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
