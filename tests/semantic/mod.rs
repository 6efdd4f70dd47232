//! Semantic layer tests
//!
//! Tests for relationship mapping and the reference index:
//! - Inheritance across modules, external and unresolved bases
//! - Import edges, including relative imports
//! - Call resolution through scopes, `self` and `super()`

pub mod tests_calls;
pub mod tests_imports;
pub mod tests_inheritance;
