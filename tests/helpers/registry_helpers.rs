//! Registry setup helpers: parse in-memory sources under a fixed root.

use std::path::PathBuf;

use pyscope::hir::{Diagnostic, DiagnosticKind, Registry};
use pyscope::{AnalysisConfig, MemoryLoader, ParserRegistry, parse_all_with};

/// Directory every in-memory fixture lives under
pub const ROOT: &str = "proj";

/// Path of a fixture file under [`ROOT`]
pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(ROOT).join(relative)
}

pub fn loader_of(files: &[(&str, &str)]) -> MemoryLoader {
    let mut loader = MemoryLoader::new();
    for (path, text) in files {
        loader.insert(fixture_path(path), *text);
    }
    loader
}

/// Parse `files` in the order given.
pub fn analyze(files: &[(&str, &str)]) -> (Registry, Vec<Diagnostic>) {
    analyze_with(files, AnalysisConfig::default())
}

pub fn analyze_with(files: &[(&str, &str)], config: AnalysisConfig) -> (Registry, Vec<Diagnostic>) {
    let loader = loader_of(files);
    let paths: Vec<PathBuf> = files.iter().map(|(path, _)| fixture_path(path)).collect();
    let config = config.with_root(ROOT);
    parse_all_with(&paths, &config, &loader, &ParserRegistry::with_defaults())
}

/// Parse `files`, asserting none of them has a syntax error.
pub fn registry_of(files: &[(&str, &str)]) -> Registry {
    let (registry, diagnostics) = analyze(files);
    let errors = of_kind(&diagnostics, DiagnosticKind::ParseError);
    assert!(errors.is_empty(), "Parse errors: {:?}", errors);
    registry
}

pub fn of_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.kind == kind).collect()
}

/// Every qualified name in registry order
pub fn qualified_names(registry: &Registry) -> Vec<String> {
    registry.iter().map(|(qname, _)| qname.to_string()).collect()
}
