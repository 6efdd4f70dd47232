//! Bidirectional index over relationship edges.
//!
//! Stores every edge once and indexes it both ways. Enables:
//! - "Find Subclasses" / "Find Callers": given a target, find the sources pointing at it
//! - "Find Bases" / "Find Callees": given a source, find the targets it points at

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::Position;
use crate::hir::{Diagnostic, Registry};
use crate::semantic::relationships::{EdgeKind, RelationshipEdge, map_relationships};

/// Which end of an edge a query starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the source to its targets
    Outgoing,
    /// From the target back to its sources
    Incoming,
}

/// Edge indices per kind, in `EdgeKind` order
type KindSlots = [Vec<usize>; 3];

fn slot(kind: EdgeKind) -> usize {
    match kind {
        EdgeKind::InheritsFrom => 0,
        EdgeKind::Imports => 1,
        EdgeKind::Calls => 2,
    }
}

/// Read-only bidirectional index of relationship edges.
///
/// Query results follow the sorted edge order: source, kind, target, status.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    edges: Vec<RelationshipEdge>,

    /// Forward index: source qname → edges leaving it
    forward: FxHashMap<Arc<str>, KindSlots>,

    /// Reverse index: target name → edges arriving at it
    reverse: FxHashMap<Arc<str>, KindSlots>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `edges` in one pass. The edges are sorted first so lookups are
    /// deterministic whatever order they arrive in.
    pub fn build(edges: impl IntoIterator<Item = RelationshipEdge>) -> Self {
        let mut edges: Vec<RelationshipEdge> = edges.into_iter().collect();
        edges.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut forward: FxHashMap<Arc<str>, KindSlots> = FxHashMap::default();
        let mut reverse: FxHashMap<Arc<str>, KindSlots> = FxHashMap::default();
        for (idx, edge) in edges.iter().enumerate() {
            let kind = slot(edge.kind);
            forward.entry(edge.source.clone()).or_default()[kind].push(idx);
            reverse.entry(edge.target.clone()).or_default()[kind].push(idx);
        }

        trace!(
            "[REF_INDEX] build: {} edges, {} sources, {} targets",
            edges.len(),
            forward.len(),
            reverse.len()
        );
        Self {
            edges,
            forward,
            reverse,
        }
    }

    /// Names related to `qname` by `kind` edges in `direction`.
    ///
    /// Outgoing yields targets, incoming yields sources. Unknown names yield
    /// nothing.
    pub fn related(&self, qname: &str, kind: EdgeKind, direction: Direction) -> Vec<&str> {
        let result: Vec<&str> = match direction {
            Direction::Outgoing => self
                .indices(&self.forward, qname, kind)
                .map(|edge| &*edge.target)
                .collect(),
            Direction::Incoming => self
                .indices(&self.reverse, qname, kind)
                .map(|edge| &*edge.source)
                .collect(),
        };
        trace!(
            "[REF_INDEX] related: qname='{}' kind={} direction={:?} -> {:?}",
            qname, kind, direction, result
        );
        result
    }

    /// All edges, sorted
    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    /// Every edge leaving `qname`, all kinds
    pub fn outgoing(&self, qname: &str) -> Vec<&RelationshipEdge> {
        self.all_kinds(&self.forward, qname)
    }

    /// Every edge arriving at `qname`, all kinds
    pub fn incoming(&self, qname: &str) -> Vec<&RelationshipEdge> {
        self.all_kinds(&self.reverse, qname)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &RelationshipEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    pub fn contains_edge(&self, source: &str, kind: EdgeKind, target: &str) -> bool {
        self.indices(&self.forward, source, kind)
            .any(|edge| &*edge.target == target)
    }

    /// Edges written in `file`
    pub fn edges_in_file(&self, file: &Path) -> Vec<&RelationshipEdge> {
        self.edges
            .iter()
            .filter(|edge| &*edge.location.file == file)
            .collect()
    }

    /// The edge whose location covers `position` in `file`.
    ///
    /// Prefers the narrowest span: a call inside a method wins over the
    /// class's inheritance edge.
    pub fn edge_at_position(&self, file: &Path, position: Position) -> Option<&RelationshipEdge> {
        let found = self
            .edges
            .iter()
            .filter(|edge| &*edge.location.file == file && edge.location.span.contains(position))
            .min_by_key(|edge| {
                let span = edge.location.span;
                (span.end.line - span.start.line, span.end.column.saturating_sub(span.start.column))
            });
        trace!(
            "[REF_INDEX] edge_at_position: {}:{:?} -> {:?}",
            file.display(),
            position,
            found.map(|edge| &*edge.target)
        );
        found
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn indices<'a>(
        &'a self,
        map: &'a FxHashMap<Arc<str>, KindSlots>,
        qname: &str,
        kind: EdgeKind,
    ) -> impl Iterator<Item = &'a RelationshipEdge> + 'a {
        map.get(qname)
            .into_iter()
            .flat_map(move |slots| slots[slot(kind)].iter())
            .map(|&idx| &self.edges[idx])
    }

    fn all_kinds(&self, map: &FxHashMap<Arc<str>, KindSlots>, qname: &str) -> Vec<&RelationshipEdge> {
        let mut indices: Vec<usize> = map
            .get(qname)
            .map(|slots| slots.iter().flatten().copied().collect())
            .unwrap_or_default();
        indices.sort_unstable();
        indices.into_iter().map(|idx| &self.edges[idx]).collect()
    }
}

/// Map the registry's relationships and index them.
pub fn build_relationships(registry: &Registry) -> ReferenceIndex {
    build_relationships_with_diagnostics(registry).0
}

/// As [`build_relationships`], also returning the unresolved-reference
/// diagnostics.
pub fn build_relationships_with_diagnostics(registry: &Registry) -> (ReferenceIndex, Vec<Diagnostic>) {
    let graph = map_relationships(registry);
    (ReferenceIndex::build(graph.edges), graph.diagnostics)
}
