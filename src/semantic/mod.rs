//! # Semantic Analysis
//!
//! Turns a sealed [`Registry`](crate::hir::Registry) into relationship edges
//! (inheritance, imports, calls) and indexes them for bidirectional queries.

pub mod graphs;
pub mod relationships;

pub use graphs::{
    Direction, ReferenceIndex, build_relationships, build_relationships_with_diagnostics,
};
pub use relationships::{
    EdgeKind, RelationshipEdge, RelationshipGraph, ResolutionStatus, build, map_relationships,
    map_relationships_with,
};
