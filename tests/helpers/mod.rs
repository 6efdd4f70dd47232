//! Shared test helpers

#![allow(dead_code)]

pub mod edge_assertions;
pub mod registry_helpers;
pub mod source_fixtures;
