//! Project loading tests against real directories

pub mod tests_parse_directory;
