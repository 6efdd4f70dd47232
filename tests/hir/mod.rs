//! HIR layer tests
//!
//! Tests for the entity model:
//! - Entity extraction across modules
//! - Registry construction and collisions
//! - Diagnostics and graceful degradation

pub mod tests_diagnostics;
pub mod tests_entity_extraction;
pub mod tests_registry;
