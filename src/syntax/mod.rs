//! Source formats: the parser trait and the registry that selects one per file.

pub mod parser;
pub mod registry;

pub use parser::{ParseOutcome, PythonParser, SourceParser, is_python_shebang};
pub use registry::{ParserHandle, ParserRegistry, Registration};
