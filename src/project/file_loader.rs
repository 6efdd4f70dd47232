//! Source loading and discovery.
//!
//! [`SourceLoader`] abstracts where file text comes from: the filesystem
//! ([`FsLoader`]) or memory ([`MemoryLoader`], for tests and editors with
//! unsaved buffers).

use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::base::constants::SKIPPED_DIRS;
use crate::syntax::ParserRegistry;

const BOM: char = '\u{feff}';

/// Error type for source loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Decode { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Decode { path } => path,
        }
    }
}

/// Supplies the text of source files
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<String, LoadError>;
}

/// Reads UTF-8 files from disk, dropping a leading byte order mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<String, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| LoadError::Decode {
            path: path.to_path_buf(),
        })?;
        Ok(match text.strip_prefix(BOM) {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }
}

/// In-memory file table
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    /// Stored paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<String, LoadError> {
        self.files.get(path).cloned().ok_or_else(|| LoadError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not in memory loader"),
        })
    }
}

/// Every file under `dir` some registered parser accepts, sorted.
///
/// Hidden directories and [`SKIPPED_DIRS`] (caches, virtualenvs) are not
/// entered. Extensionless files are kept when their first line sniffs as a
/// registered format.
pub fn collect_source_files(dir: &Path, parsers: &ParserRegistry) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|path| is_source_file(path, parsers))
        .collect();
    files.sort();
    debug!("collected {} source files under {}", files.len(), dir.display());
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name) || is_virtualenv(entry.path())
}

/// `pyvenv.cfg` marks a virtualenv whatever its directory is called
fn is_virtualenv(dir: &Path) -> bool {
    dir.join("pyvenv.cfg").is_file()
}

fn is_source_file(path: &Path, parsers: &ParserRegistry) -> bool {
    if path.extension().is_some() {
        return parsers.select(path).is_some();
    }
    if !parsers.sniffs() {
        return false;
    }
    let first_line = read_first_line(path).unwrap_or_default();
    parsers.select_with_content(path, &first_line).is_some()
}

fn read_first_line(path: &Path) -> Option<String> {
    use std::io::{BufRead, BufReader};

    let file = std::fs::File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    Some(line.trim_end().to_string())
}

#[cfg(test)]
#[path = "file_loader/tests/tests_file_loader.rs"]
mod tests;
