//! Syntax-level parsing interface.
//!
//! A [`SourceParser`] turns one file's text into a module tree. The
//! [`ParserRegistry`](super::ParserRegistry) picks the parser for a path.

use std::path::Path;

use crate::hir::{Diagnostic, Module, parse_source};
use crate::project::AnalysisConfig;

/// Result of parsing one file
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// `None` when the file was rejected
    pub module: Option<Module>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn new(module: Option<Module>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            module,
            diagnostics,
        }
    }

    /// Check if a module was produced without error diagnostics
    pub fn is_ok(&self) -> bool {
        self.module.is_some() && !self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// A parser for one source format.
///
/// Implementations must be stateless between calls; one instance is shared
/// by every worker thread.
pub trait SourceParser: Send + Sync {
    /// Short identifier, e.g. `python`
    fn name(&self) -> &str;

    fn parse(&self, path: &Path, text: &str, config: &AnalysisConfig) -> ParseOutcome;
}

/// The built-in Python parser
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonParser;

impl SourceParser for PythonParser {
    fn name(&self) -> &str {
        "python"
    }

    fn parse(&self, path: &Path, text: &str, config: &AnalysisConfig) -> ParseOutcome {
        let (module, diagnostics) = parse_source(path, text, config);
        ParseOutcome::new(module, diagnostics)
    }
}

/// `#!/usr/bin/env python3` and friends
pub fn is_python_shebang(first_line: &str) -> bool {
    first_line.starts_with("#!") && first_line.contains("python")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#!/usr/bin/env python3", true)]
    #[case("#!/usr/bin/python", true)]
    #[case("#!/bin/sh", false)]
    #[case("# python", false)]
    fn test_is_python_shebang(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_python_shebang(line), expected);
    }

    #[test]
    fn test_python_parser_outcome() {
        let config = AnalysisConfig::default();
        let outcome = PythonParser.parse(Path::new("m.py"), "def f():\n    pass\n", &config);
        assert!(outcome.is_ok());
        assert_eq!(outcome.module.map(|m| m.functions.len()), Some(1));

        let outcome = PythonParser.parse(Path::new("m.py"), "def (:\n", &config);
        assert!(!outcome.is_ok());
        assert!(outcome.module.is_none());
    }
}
