#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use std::fs;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// ============================================================================
// FsLoader
// ============================================================================

#[test]
fn test_fs_loader_reads_utf8() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write(temp_dir.path(), "mod.py", "x = 'é'\n");

    let text = FsLoader.load(&temp_dir.path().join("mod.py")).unwrap();
    assert_eq!(text, "x = 'é'\n");
}

#[test]
fn test_fs_loader_strips_bom() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write(temp_dir.path(), "bom.py", "\u{feff}x = 1\n");

    let text = FsLoader.load(&temp_dir.path().join("bom.py")).unwrap();
    assert_eq!(text, "x = 1\n");
}

#[test]
fn test_fs_loader_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("missing.py");

    let err = FsLoader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn test_fs_loader_rejects_invalid_utf8() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("latin1.py");
    fs::write(&path, [b'x', b'=', 0xff, b'\n']).unwrap();

    let err = FsLoader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }));
    assert!(err.to_string().contains("not valid UTF-8"));
}

// ============================================================================
// MemoryLoader
// ============================================================================

#[test]
fn test_memory_loader() {
    let loader = MemoryLoader::new()
        .with_file("b.py", "b = 1\n")
        .with_file("a.py", "a = 1\n");

    assert_eq!(loader.load(Path::new("a.py")).unwrap(), "a = 1\n");
    assert_eq!(loader.paths(), vec![PathBuf::from("a.py"), PathBuf::from("b.py")]);
    assert!(loader.load(Path::new("c.py")).is_err());
}

// ============================================================================
// collect_source_files
// ============================================================================

#[test]
fn test_collect_source_files_sorted_and_filtered() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    write(root, "pkg/__init__.py", "");
    write(root, "pkg/b.py", "");
    write(root, "pkg/a.pyi", "");
    write(root, "README.md", "# readme\n");
    write(root, ".hidden/secret.py", "");
    write(root, "pkg/__pycache__/a.cpython-312.py", "");
    write(root, "env/pyvenv.cfg", "home = /usr\n");
    write(root, "env/lib/site.py", "");
    write(root, "bin/tool", "#!/usr/bin/env python3\nprint('hi')\n");
    write(root, "bin/script", "#!/bin/sh\necho hi\n");

    let files = collect_source_files(root, &ParserRegistry::with_defaults());
    let relative: Vec<String> = files
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(
        relative,
        vec!["bin/tool", "pkg/__init__.py", "pkg/a.pyi", "pkg/b.py"]
    );
}

#[test]
fn test_collect_source_files_empty_registry() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write(temp_dir.path(), "a.py", "");

    let files = collect_source_files(temp_dir.path(), &ParserRegistry::new());
    assert!(files.is_empty());
}
