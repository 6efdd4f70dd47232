//! Shared text helpers used by the parser and the extraction pass.

pub mod text_utils;

pub use text_utils::{is_dunder, is_identifier, is_private_name, is_upper_case_name};
