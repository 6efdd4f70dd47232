//! Discovery and parsing of on-disk trees.

use std::fs;
use std::path::{Path, PathBuf};

use pyscope::hir::DiagnosticKind;
use pyscope::{
    AnalysisConfig, Direction, EdgeKind, ParserRegistry, build_relationships,
    collect_source_files, parse_all, parse_directory,
};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::helpers::source_fixtures::*;

fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (relative, text) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, text).expect("write fixture");
    }
    dir
}

fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap_or(p)
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_collect_skips_caches_and_virtualenvs() {
    let dir = write_tree(&[
        ("geo/__init__.py", ""),
        ("geo/shapes.py", SHAPES),
        ("geo/__pycache__/shapes.cpython-312.pyc", "junk"),
        (".venv/lib/site.py", "x = 1\n"),
        ("env/pyvenv.cfg", "home = /usr/bin\n"),
        ("env/lib/os.py", "x = 1\n"),
        ("scripts/run", "#!/usr/bin/env python3\nprint('hi')\n"),
        ("scripts/deploy", "#!/bin/sh\necho hi\n"),
        ("notes.txt", "not python"),
    ]);

    let written = WalkDir::new(dir.path())
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count();
    assert_eq!(written, 9);

    let files = collect_source_files(dir.path(), &ParserRegistry::with_defaults());
    assert_eq!(
        relative(dir.path(), &files),
        vec!["geo/__init__.py", "geo/shapes.py", "scripts/run"]
    );
}

#[test]
fn test_parse_directory_end_to_end() {
    let dir = write_tree(&[
        ("geo/__init__.py", "from .shapes import Shape\n"),
        ("geo/shapes.py", SHAPES),
        ("geo/circle.py", CIRCLE),
    ]);

    let (registry, diagnostics) = parse_directory(dir.path(), &AnalysisConfig::default());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert!(registry.module("geo").is_some_and(|m| m.is_package));
    assert!(registry.contains("geo.circle.Circle.area"));

    let index = build_relationships(&registry);
    assert_eq!(
        index.related("geo.shapes.Shape", EdgeKind::InheritsFrom, Direction::Incoming),
        vec!["geo.circle.Circle"]
    );
}

#[test]
fn test_parse_all_infers_root_above_packages() {
    let dir = write_tree(&[("geo/__init__.py", ""), ("geo/shapes.py", SHAPES)]);
    let paths = [dir.path().join("geo/__init__.py"), dir.path().join("geo/shapes.py")];

    let (registry, diagnostics) = parse_all(&paths);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    let modules: Vec<&str> = registry
        .modules()
        .iter()
        .map(|m| &*m.info.qualified_name)
        .collect();
    assert_eq!(modules, vec!["geo", "geo.shapes"]);
}

#[test]
fn test_unreadable_file_does_not_stop_the_run() {
    let dir = write_tree(&[("ok.py", "x = 1\n")]);
    fs::write(dir.path().join("latin1.py"), [0x78u8, 0x3d, 0xe9, 0x0a]).expect("write bytes");
    let paths = [
        dir.path().join("ok.py"),
        dir.path().join("latin1.py"),
        dir.path().join("gone.py"),
    ];

    let (registry, diagnostics) = parse_all(&paths);
    assert!(registry.contains("ok.x"));
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::Io));
}

#[test]
fn test_bom_is_stripped() {
    let dir = write_tree(&[("bom.py", "\u{feff}\"\"\"Doc.\"\"\"\nx = 1\n")]);
    let (registry, diagnostics) = parse_all(&[dir.path().join("bom.py")]);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(
        registry.module("bom").and_then(|m| m.info.docstring.clone()),
        Some("Doc.".to_string())
    );
}
