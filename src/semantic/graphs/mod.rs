//! Indexes over relationship edges.

pub mod reference_index;

pub use reference_index::{
    Direction, ReferenceIndex, build_relationships, build_relationships_with_diagnostics,
};
