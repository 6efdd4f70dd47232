//! Edge lookups and assertions over a reference index.

use pyscope::{EdgeKind, ReferenceIndex, ResolutionStatus};

/// `(source, target, status)` of every `kind` edge, in index order
pub fn edge_triples(index: &ReferenceIndex, kind: EdgeKind) -> Vec<(String, String, ResolutionStatus)> {
    index
        .edges_of_kind(kind)
        .map(|e| (e.source.to_string(), e.target.to_string(), e.status))
        .collect()
}

/// Edges leaving `source` of `kind`, as `(target, status)`
pub fn targets_of(
    index: &ReferenceIndex,
    source: &str,
    kind: EdgeKind,
) -> Vec<(String, ResolutionStatus)> {
    index
        .outgoing(source)
        .into_iter()
        .filter(|e| e.kind == kind)
        .map(|e| (e.target.to_string(), e.status))
        .collect()
}

pub fn assert_edge(
    index: &ReferenceIndex,
    source: &str,
    kind: EdgeKind,
    target: &str,
    status: ResolutionStatus,
) {
    let found = index
        .outgoing(source)
        .into_iter()
        .find(|e| e.kind == kind && &*e.target == target);
    match found {
        Some(edge) => assert_eq!(
            edge.status, status,
            "Edge {} -[{}]-> {} has the wrong status",
            source, kind, target
        ),
        None => panic!(
            "Missing edge {} -[{}]-> {}. Outgoing: {:?}",
            source,
            kind,
            target,
            index
                .outgoing(source)
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
        ),
    }
}
