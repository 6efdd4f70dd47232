//! Parser registry and format detection.
//!
//! An explicit table of registrations. Adding a format means calling
//! [`ParserRegistry::register`]; nothing else changes.
//!
//! Selection never reads files. [`ParserRegistry::select`] looks at the
//! extension only; files without one are sniffed through
//! [`ParserRegistry::select_with_content`] once their first line is known.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::trace;

use super::parser::{ParseOutcome, PythonParser, SourceParser, is_python_shebang};
use crate::base::constants::PYTHON_EXTENSIONS;
use crate::project::AnalysisConfig;

/// How a format is recognized
#[derive(Debug, Clone)]
pub struct Registration {
    pub key: SmolStr,
    /// Lowercase extensions without the dot
    pub extensions: Vec<SmolStr>,
    /// Content check for files without an extension, given the first line
    pub sniff: Option<fn(&str) -> bool>,
}

impl Registration {
    pub fn new(key: impl Into<SmolStr>, extensions: &[&str]) -> Self {
        Self {
            key: key.into(),
            extensions: extensions
                .iter()
                .map(|e| SmolStr::new(e.to_ascii_lowercase()))
                .collect(),
            sniff: None,
        }
    }

    pub fn with_sniff(mut self, sniff: fn(&str) -> bool) -> Self {
        self.sniff = Some(sniff);
        self
    }

    fn matches_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// A selected parser
#[derive(Clone)]
pub struct ParserHandle {
    key: SmolStr,
    parser: Arc<dyn SourceParser>,
}

impl ParserHandle {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parse(&self, path: &Path, text: &str, config: &AnalysisConfig) -> ParseOutcome {
        self.parser.parse(path, text, config)
    }
}

impl fmt::Debug for ParserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserHandle")
            .field("key", &self.key)
            .field("parser", &self.parser.name())
            .finish()
    }
}

/// Registration table: extension / content -> parser
#[derive(Clone, Default)]
pub struct ParserRegistry {
    entries: Vec<(Registration, Arc<dyn SourceParser>)>,
}

impl ParserRegistry {
    /// An empty registry; every file is skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// The Python parser for `.py`, `.pyi`, `.pyw` and python shebangs
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            Registration::new("python", PYTHON_EXTENSIONS).with_sniff(is_python_shebang),
            Arc::new(PythonParser),
        );
        registry
    }

    /// Add a format. Earlier registrations win on overlapping extensions.
    pub fn register(&mut self, registration: Registration, parser: Arc<dyn SourceParser>) {
        self.entries.push((registration, parser));
    }

    /// Select by extension, case-insensitive.
    ///
    /// Extensionless files always yield `None` here. Callers holding the
    /// file's first line use [`select_with_content`](Self::select_with_content),
    /// as `parse_all_with` and `collect_source_files` do.
    pub fn select(&self, path: &Path) -> Option<ParserHandle> {
        let extension = path.extension()?.to_str()?;
        let selected = self
            .entries
            .iter()
            .find(|(registration, _)| registration.matches_extension(extension))
            .map(|(registration, parser)| self.handle(registration, parser));
        trace!(
            "select {}: {:?}",
            path.display(),
            selected.as_ref().map(ParserHandle::key)
        );
        selected
    }

    /// Select by extension, falling back to sniffing `first_line` for
    /// files without one.
    pub fn select_with_content(&self, path: &Path, first_line: &str) -> Option<ParserHandle> {
        if path.extension().is_some() {
            return self.select(path);
        }
        self.entries
            .iter()
            .find(|(registration, _)| registration.sniff.is_some_and(|sniff| sniff(first_line)))
            .map(|(registration, parser)| self.handle(registration, parser))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(r, _)| r.key.as_str())
    }

    /// Whether any registration has a content sniffer
    pub fn sniffs(&self) -> bool {
        self.entries.iter().any(|(r, _)| r.sniff.is_some())
    }

    fn handle(&self, registration: &Registration, parser: &Arc<dyn SourceParser>) -> ParserHandle {
        ParserHandle {
            key: registration.key.clone(),
            parser: parser.clone(),
        }
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(r, _)| r))
            .finish()
    }
}
