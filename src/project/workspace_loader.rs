//! Whole-run parsing: load, parse and register every input file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use super::config::AnalysisConfig;
use super::file_loader::{FsLoader, SourceLoader, collect_source_files};
use crate::hir::{Diagnostic, Registry, RegistryBuilder, is_package_file};
use crate::syntax::{ParseOutcome, ParserRegistry};

/// Parse `paths` with the default configuration from the filesystem.
pub fn parse_all<P: AsRef<Path> + Sync>(paths: &[P]) -> (Registry, Vec<Diagnostic>) {
    parse_all_with(
        paths,
        &AnalysisConfig::default(),
        &FsLoader,
        &ParserRegistry::with_defaults(),
    )
}

/// Parse `paths` and seal the results into a [`Registry`].
///
/// Files are parsed in parallel when `config.parallel` is set; results are
/// merged in input order either way. A file no parser accepts is skipped.
/// A file that cannot be read yields an `Io` diagnostic and the run goes on.
pub fn parse_all_with<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &AnalysisConfig,
    loader: &dyn SourceLoader,
    parsers: &ParserRegistry,
) -> (Registry, Vec<Diagnostic>) {
    let mut config = config.clone();
    if config.root.is_none() {
        config.root = common_root(paths);
    }
    let config = &config;

    let outcomes: Vec<Option<ParseOutcome>> = if config.parallel {
        paths
            .par_iter()
            .map(|path| parse_file(path.as_ref(), config, loader, parsers))
            .collect()
    } else {
        paths
            .iter()
            .map(|path| parse_file(path.as_ref(), config, loader, parsers))
            .collect()
    };

    let mut builder = RegistryBuilder::new();
    let mut diagnostics = Vec::new();
    let mut parsed = 0usize;
    for outcome in outcomes.into_iter().flatten() {
        diagnostics.extend(outcome.diagnostics);
        if let Some(module) = outcome.module {
            builder.add_module(module);
            parsed += 1;
        }
    }
    let (registry, collisions) = builder.finish();
    diagnostics.extend(collisions);

    debug!(
        "parsed {}/{} files, {} entities, {} diagnostics",
        parsed,
        paths.len(),
        registry.len(),
        diagnostics.len()
    );
    (registry, diagnostics)
}

/// Discover every source file under `dir` and parse it with `dir` as root.
pub fn parse_directory(dir: &Path, config: &AnalysisConfig) -> (Registry, Vec<Diagnostic>) {
    let parsers = ParserRegistry::with_defaults();
    let files = collect_source_files(dir, &parsers);
    let mut config = config.clone();
    if config.root.is_none() {
        config.root = Some(dir.to_path_buf());
    }
    parse_all_with(&files, &config, &FsLoader, &parsers)
}

fn parse_file(
    path: &Path,
    config: &AnalysisConfig,
    loader: &dyn SourceLoader,
    parsers: &ParserRegistry,
) -> Option<ParseOutcome> {
    let selected = parsers.select(path);
    if selected.is_none() && (path.extension().is_some() || !parsers.sniffs()) {
        debug!("{}: skipped, no parser", path.display());
        return None;
    }

    let text = match loader.load(path) {
        Ok(text) => text,
        Err(err) => {
            debug!("{}: {}", path.display(), err);
            let diagnostic = Diagnostic::io(Arc::from(path), err.to_string());
            return Some(ParseOutcome::new(None, vec![diagnostic]));
        }
    };

    let first_line = text.lines().next().unwrap_or_default();
    let Some(handle) = selected.or_else(|| parsers.select_with_content(path, first_line)) else {
        debug!("{}: skipped, content not recognized", path.display());
        return None;
    };
    Some(handle.parse(path, &text, config))
}

/// Deepest directory containing every input, above any package it contains.
///
/// Climbing out of packages keeps `pkg/__init__.py` and `pkg/mod.py` named
/// `pkg` and `pkg.mod`.
fn common_root<P: AsRef<Path>>(paths: &[P]) -> Option<PathBuf> {
    let mut parents = paths.iter().filter_map(|p| p.as_ref().parent());
    let mut common = parents.next()?.to_path_buf();
    for dir in parents {
        while !dir.starts_with(&common) {
            if !common.pop() {
                return None;
            }
        }
    }
    while paths
        .iter()
        .any(|p| p.as_ref().parent() == Some(common.as_path()) && is_package_file(p.as_ref()))
    {
        if !common.pop() {
            break;
        }
    }
    Some(common)
}
