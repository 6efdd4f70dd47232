//! Domain constants.

/// Python source file extension
pub const PY_EXT: &str = "py";

/// Python stub file extension
pub const PYI_EXT: &str = "pyi";

/// Windows GUI script extension
pub const PYW_EXT: &str = "pyw";

/// All extensions handled by the built-in Python parser
pub const PYTHON_EXTENSIONS: &[&str] = &[PY_EXT, PYI_EXT, PYW_EXT];

/// Module file that names its enclosing package
pub const PACKAGE_INIT: &str = "__init__";

/// Name of the implicit module for builtins, used as the external target prefix
pub const BUILTINS_MODULE: &str = "builtins";

/// Directory names skipped during source discovery
pub const SKIPPED_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    "venv",
    "site-packages",
    "target",
];

/// Maximum length of a variable's captured value text
pub const DEFAULT_MAX_VALUE_LEN: usize = 120;

/// Maximum number of re-export hops followed when resolving a name
pub const DEFAULT_REEXPORT_HOPS: usize = 8;
