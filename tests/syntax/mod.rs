//! Format detection tests

pub mod tests_format_detection;
