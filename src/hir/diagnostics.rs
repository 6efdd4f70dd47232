//! Diagnostics: analysis problems reported alongside results.
//!
//! Nothing the analysis encounters in user code is a hard failure. Parse
//! errors, unsupported syntax, odd docstrings and unresolvable references
//! are all collected as [`Diagnostic`]s and the run continues.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::base::{Location, Span};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// What went wrong; fixes severity and code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiagnosticKind {
    /// The file has a syntax error and was skipped
    ParseError,
    /// Valid syntax the model has no place for; a stub was recorded
    UnsupportedConstruct,
    /// A docstring was parsed on a best-effort basis
    DocstringFormat,
    /// A reference could not be bound to anything
    UnresolvedReference,
    /// A later definition with an already-used name was dropped
    DuplicateDefinition,
    /// Two entities claimed the same qualified name
    NameCollision,
    /// The file could not be read or decoded
    Io,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::ParseError | DiagnosticKind::NameCollision | DiagnosticKind::Io => {
                Severity::Error
            }
            DiagnosticKind::UnsupportedConstruct
            | DiagnosticKind::DocstringFormat
            | DiagnosticKind::DuplicateDefinition => Severity::Warning,
            DiagnosticKind::UnresolvedReference => Severity::Info,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::ParseError => codes::PARSE_ERROR,
            DiagnosticKind::NameCollision => codes::NAME_COLLISION,
            DiagnosticKind::Io => codes::IO_ERROR,
            DiagnosticKind::UnsupportedConstruct => codes::UNSUPPORTED_CONSTRUCT,
            DiagnosticKind::DocstringFormat => codes::DOCSTRING_FORMAT,
            DiagnosticKind::DuplicateDefinition => codes::DUPLICATE_DEFINITION,
            DiagnosticKind::UnresolvedReference => codes::UNRESOLVED_REFERENCE,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: Arc<Path>,
    pub span: Span,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Error/warning code (e.g., "E0001").
    pub code: &'static str,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        file: Arc<Path>,
        span: Span,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file,
            span,
            severity: kind.severity(),
            kind,
            code: kind.code(),
            message: message.into(),
        }
    }

    /// Create a diagnostic at an entity or call-site location.
    pub fn at(kind: DiagnosticKind, location: &Location, message: impl Into<Arc<str>>) -> Self {
        Self::new(kind, location.file.clone(), location.span, message)
    }

    pub fn parse_error(file: Arc<Path>, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(DiagnosticKind::ParseError, file, span, message)
    }

    /// A whole-file problem such as an unreadable file.
    pub fn io(file: Arc<Path>, message: impl Into<Arc<str>>) -> Self {
        Self::new(DiagnosticKind::Io, file, Span::default(), message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn location(&self) -> Location {
        Location::new(self.file.clone(), self.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}[{}]: {}",
            self.file.display(),
            self.span.start.line,
            self.span.start.column,
            self.severity.display(),
            self.code,
            self.message
        )
    }
}

/// Sort diagnostics by file, position, then code.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.span.cmp(&b.span))
            .then(a.code.cmp(b.code))
            .then(a.message.cmp(&b.message))
    });
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: Errors (file skipped or entity dropped)
/// - **W0001-W0099**: Warnings (degraded but kept)
/// - **I0001-I0099**: Informational (best-effort analysis gave up)
pub mod codes {
    // ========================================================================
    // ERRORS (E0001-E0099)
    // ========================================================================

    /// Syntax error; the file produced no entities.
    pub const PARSE_ERROR: &str = "E0001";
    /// Two entities with the same qualified name.
    pub const NAME_COLLISION: &str = "E0002";
    /// File could not be read or decoded.
    pub const IO_ERROR: &str = "E0003";

    // ========================================================================
    // WARNINGS (W0001-W0099)
    // ========================================================================

    /// Construct recorded as a stub.
    pub const UNSUPPORTED_CONSTRUCT: &str = "W0001";
    /// Docstring parsed on a best-effort basis.
    pub const DOCSTRING_FORMAT: &str = "W0002";
    /// Later definition of an existing name dropped.
    pub const DUPLICATE_DEFINITION: &str = "W0003";

    // ========================================================================
    // INFO (I0001-I0099)
    // ========================================================================

    /// Reference left unresolved.
    pub const UNRESOLVED_REFERENCE: &str = "I0001";
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file() -> Arc<Path> {
        Arc::from(Path::new("pkg/mod.py"))
    }

    #[rstest]
    #[case(DiagnosticKind::ParseError, Severity::Error, "E0001")]
    #[case(DiagnosticKind::NameCollision, Severity::Error, "E0002")]
    #[case(DiagnosticKind::Io, Severity::Error, "E0003")]
    #[case(DiagnosticKind::UnsupportedConstruct, Severity::Warning, "W0001")]
    #[case(DiagnosticKind::DocstringFormat, Severity::Warning, "W0002")]
    #[case(DiagnosticKind::DuplicateDefinition, Severity::Warning, "W0003")]
    #[case(DiagnosticKind::UnresolvedReference, Severity::Info, "I0001")]
    fn test_kind_fixes_severity_and_code(
        #[case] kind: DiagnosticKind,
        #[case] severity: Severity,
        #[case] code: &str,
    ) {
        let diag = Diagnostic::new(kind, file(), Span::default(), "msg");
        assert_eq!(diag.severity, severity);
        assert_eq!(diag.code, code);
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::parse_error(file(), Span::from_coords(3, 4, 3, 5), "expected ':'");
        assert_eq!(diag.to_string(), "pkg/mod.py:3:4: error[E0001]: expected ':'");
    }

    #[test]
    fn test_sort_orders_by_position() {
        let mut diags = vec![
            Diagnostic::new(DiagnosticKind::DocstringFormat, file(), Span::from_coords(9, 0, 9, 1), "b"),
            Diagnostic::new(DiagnosticKind::DocstringFormat, file(), Span::from_coords(2, 0, 2, 1), "a"),
        ];
        sort_diagnostics(&mut diags);
        assert_eq!(&*diags[0].message, "a");
    }
}
