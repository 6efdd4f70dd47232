//! # pyscope-base
//!
//! Core library for static analysis of Python source: parsing, the entity
//! model, docstring parsing and cross-module relationships.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → Relationship mapper, bidirectional reference index
//!   ↓
//! project   → Run configuration, source loading, parallel parse_all
//!   ↓
//! syntax    → SourceParser trait, parser registry and format detection
//!   ↓
//! hir       → Entity model, extraction, registry, diagnostics
//!   ↓
//! docstring → Google / NumPy / Sphinx docstring parser
//!   ↓
//! parser    → Logos lexer, layout pass, rowan CST, typed AST
//!   ↓
//! core      → Identifier and text helpers
//!   ↓
//! base      → Primitives (Span, Position, Location, LineIndex, constants)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pyscope::{Direction, EdgeKind, build_relationships, parse_all};
//!
//! let (registry, diagnostics) = parse_all(&["src/shapes.py", "src/circle.py"]);
//! for diagnostic in &diagnostics {
//!     eprintln!("{}: {}", diagnostic.code, diagnostic.message);
//! }
//! let index = build_relationships(&registry);
//! let subclasses = index.related("shapes.Shape", EdgeKind::InheritsFrom, Direction::Incoming);
//! ```

// ============================================================================
// MODULES (dependency order: base → core → parser → docstring → hir → syntax → project → semantic)
// ============================================================================

/// Foundation types: Span, Position, Location, LineIndex, TextRange
pub mod base;

/// Identifier and text helpers
pub mod core;

/// Parser: Logos lexer, layout pass, rowan CST, typed AST
pub mod parser;

/// Docstring parsing for the Google, NumPy and Sphinx dialects
pub mod docstring;

/// High-level IR: entity model, extraction, registry
pub mod hir;

/// Source formats: parser trait and registry
pub mod syntax;

/// Run management: configuration, loading, parallel parsing
pub mod project;

/// Relationship mapping and reference index
pub mod semantic;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Location, Position, Span, TextRange, TextSize};

// Re-export the analysis surface
pub use docstring::{Dialect, ParsedDoc};
pub use hir::{
    Class, Diagnostic, DiagnosticKind, Entity, EntityKind, Function, Import, Module, Registry,
    RegistryBuilder, Severity, Variable, parse_source,
};
pub use project::{
    AnalysisConfig, FsLoader, MemoryLoader, SourceLoader, collect_source_files, parse_all,
    parse_all_with, parse_directory,
};
pub use semantic::{
    Direction, EdgeKind, ReferenceIndex, RelationshipEdge, ResolutionStatus, build_relationships,
    build_relationships_with_diagnostics, map_relationships,
};
pub use syntax::{ParserRegistry, PythonParser, SourceParser};
