//! Docstring dialect tests through the parse pipeline

pub mod tests_dialects;
