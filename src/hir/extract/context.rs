//! Extraction context: file, line index and diagnostics for one source file.

use std::path::Path;
use std::sync::Arc;

use rowan::TextRange;
use smol_str::SmolStr;

use crate::base::{LineIndex, Location, Position, Span};
use crate::docstring::{self, ParsedDoc};
use crate::hir::diagnostics::{Diagnostic, DiagnosticKind};
use crate::hir::entities::{Decorator, EntityInfo, Visibility};
use crate::core::text_utils::is_private_name;

/// Extraction state passed through all extraction functions.
pub(super) struct ExtractionContext {
    pub file: Arc<Path>,
    /// Line index for converting byte offsets to line/column
    pub line_index: LineIndex,
    pub diagnostics: Vec<Diagnostic>,
    pub max_value_len: usize,
    /// Counter for generating unique import entity names
    import_counter: u32,
}

impl ExtractionContext {
    pub fn new(file: Arc<Path>, text: &str, max_value_len: usize) -> Self {
        Self {
            file,
            line_index: LineIndex::new(text),
            diagnostics: Vec::new(),
            max_value_len,
            import_counter: 0,
        }
    }

    pub fn location(&self, range: TextRange) -> Location {
        Location::new(self.file.clone(), self.line_index.span(range))
    }

    pub fn position(&self, range: TextRange) -> Position {
        self.line_index.position(range.start())
    }

    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange, message: impl Into<Arc<str>>) {
        let diagnostic = Diagnostic::new(kind, self.file.clone(), self.line_index.span(range), message);
        self.diagnostics.push(diagnostic);
    }

    /// `{scope}.<import#{n}@L{line}>`
    pub fn next_import_name(&mut self, scope: &str, range: TextRange) -> Arc<str> {
        self.import_counter += 1;
        let line = self.position(range).line;
        Arc::from(format!("{}.<import#{}@L{}>", scope, self.import_counter, line))
    }

    pub fn info(
        &self,
        name: &str,
        qualified_name: Arc<str>,
        parent: Option<Arc<str>>,
        range: TextRange,
        decorators: Vec<Decorator>,
    ) -> EntityInfo {
        EntityInfo {
            name: SmolStr::new(name),
            qualified_name,
            parent,
            location: self.location(range),
            docstring: None,
            parsed_doc: None,
            decorators,
            visibility: if is_private_name(name) {
                Visibility::Private
            } else {
                Visibility::Public
            },
        }
    }

    /// Clean and parse a raw docstring, reporting best-effort decisions.
    ///
    /// `range` is the string literal; issue lines are offset from its start.
    pub fn docstring(&mut self, raw: &str, range: TextRange) -> (String, ParsedDoc) {
        let cleaned = docstring::cleandoc(raw);
        let (parsed, issues) = docstring::parse_with_issues(raw);
        let start = self.position(range);
        // cleandoc drops leading blank lines
        let skipped = raw.lines().take_while(|l| l.trim().is_empty()).count() as u32;
        for issue in issues {
            let line = start.line + skipped + issue.line as u32;
            let span = Span::from_coords(line, 0, line, 0);
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DocstringFormat,
                self.file.clone(),
                span,
                format!("docstring: {}", issue.message),
            ));
        }
        (cleaned, parsed)
    }
}
