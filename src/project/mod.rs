//! Run-level plumbing: configuration, source loading and whole-run parsing.

pub mod config;
pub mod file_loader;
pub mod workspace_loader;

pub use config::AnalysisConfig;
pub use file_loader::{FsLoader, LoadError, MemoryLoader, SourceLoader, collect_source_files};
pub use workspace_loader::{parse_all, parse_all_with, parse_directory};
