//! High-level IR (HIR): the entity model and its global registry.
//!
//! ## Key Types
//!
//! - [`Entity`] and its variants: modules, classes, functions, variables, imports
//! - [`Registry`]: qualified name -> entity, sealed once per run
//! - [`Diagnostic`]: everything a run reports instead of failing
//!
//! ## Layers
//!
//! ```text
//! parse_source(path, text)  ← one file: CST -> Module tree
//!     │
//!     ▼
//! RegistryBuilder::finish   ← all files: import resolution + indexing
//!     │
//!     ▼
//! Registry                  ← read-only, consumed by the relationship mapper
//! ```

mod diagnostics;
mod entities;
mod extract;
mod registry;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity, codes, sort_diagnostics};
pub use entities::{
    CallSite, Class, ClassKind, Decorator, Entity, EntityInfo, EntityKind, Function, FunctionFlags,
    Import, ImportResolution, ImportedName, KnownDecorator, Module, Mutability, ParamKind,
    Parameter, Variable, VariableScope, Visibility,
};
pub use extract::{expr_head, is_package_file, module_name, normalize_expr, parse_source};
pub use registry::{
    Registry, RegistryBuilder, RegistryError, import_target, resolve_import,
};
