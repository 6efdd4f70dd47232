//! Parser registry selection by extension and by content.

use std::path::Path;
use std::sync::Arc;

use pyscope::hir::{Diagnostic, DiagnosticKind};
use pyscope::syntax::{ParseOutcome, Registration};
use pyscope::{AnalysisConfig, MemoryLoader, ParserRegistry, SourceParser, parse_all_with};
use rstest::rstest;

#[rstest]
#[case("pkg/mod.py", Some("python"))]
#[case("pkg/stub.pyi", Some("python"))]
#[case("gui/app.PYW", Some("python"))]
#[case("README.md", None)]
#[case("setup.cfg", None)]
fn test_select_by_extension(#[case] path: &str, #[case] expected: Option<&str>) {
    let registry = ParserRegistry::with_defaults();
    let selected = registry.select(Path::new(path));
    assert_eq!(selected.as_ref().map(|h| h.key()), expected);
}

#[rstest]
#[case("#!/usr/bin/env python3", true)]
#[case("#!/usr/bin/python", true)]
#[case("#!/bin/sh", false)]
#[case("print('hi')", false)]
fn test_select_by_shebang(#[case] first_line: &str, #[case] accepted: bool) {
    let registry = ParserRegistry::with_defaults();
    let selected = registry.select_with_content(Path::new("bin/tool"), first_line);
    assert_eq!(selected.is_some(), accepted);
}

/// Reports every file it sees as unsupported
struct RejectingParser;

impl SourceParser for RejectingParser {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn parse(&self, path: &Path, _text: &str, _config: &AnalysisConfig) -> ParseOutcome {
        let diagnostic = Diagnostic::io(Arc::from(path), "format not supported");
        ParseOutcome::new(None, vec![diagnostic])
    }
}

#[test]
fn test_registered_format_is_used_by_parse_all() {
    let mut parsers = ParserRegistry::with_defaults();
    parsers.register(Registration::new("cython", &["pyx"]), Arc::new(RejectingParser));

    let loader = MemoryLoader::new()
        .with_file("proj/fast.pyx", "cdef int x = 1\n")
        .with_file("proj/slow.py", "x = 1\n");
    let (registry, diagnostics) = parse_all_with(
        &loader.paths(),
        &AnalysisConfig::default(),
        &loader,
        &parsers,
    );

    assert!(registry.contains("slow.x"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Io);
    assert!(diagnostics[0].file.ends_with("fast.pyx"));
}

#[test]
fn test_extensionless_script_is_sniffed_by_parse_all() {
    let parsers = ParserRegistry::with_defaults();
    assert!(parsers.select(Path::new("proj/tool")).is_none());

    let loader = MemoryLoader::new()
        .with_file("proj/tool", "#!/usr/bin/env python3\ndef main():\n    pass\n")
        .with_file("proj/notes", "plain text\n");
    let config = AnalysisConfig::default().with_root("proj");
    let (registry, diagnostics) = parse_all_with(&loader.paths(), &config, &loader, &parsers);

    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert!(registry.contains("tool.main"));
    assert!(registry.module("notes").is_none());
}
