//! Recursive descent parser for Python
//!
//! Builds a rowan GreenNode tree from layout-aware tokens.
//! Supports error recovery and produces a lossless CST.

mod expressions;
mod statements;

use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Maximum nesting of blocks and expressions before the parser gives up.
pub const MAX_DEPTH: u32 = 100;

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error that starts earliest in the file
    pub fn first_error(&self) -> Option<&SyntaxError> {
        self.errors.iter().min_by_key(|e| e.range.start())
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Python source code into a CST
pub fn parse_python(input: &str) -> Parse {
    let tokens = tokenize(input);
    let mut parser = Parser::new(&tokens);
    parser.report_invalid_tokens();
    parser.parse_source_file();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    depth: u32,
    depth_reported: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            depth: 0,
            depth_reported: false,
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn report_invalid_tokens(&mut self) {
        for token in self.tokens.iter().filter(|t| t.kind == SyntaxKind::ERROR) {
            let message = if token.text.is_empty() {
                "unindent does not match any outer indentation level"
            } else {
                "invalid token"
            };
            self.errors.push(SyntaxError::new(
                message,
                TextRange::at(token.offset, TextSize::of(token.text)),
            ));
        }
    }

    // =========================================================================
    // Token inspection (trivia is always skipped)
    // =========================================================================

    /// Index of the `n`th non-trivia token at or after `pos`
    fn nth_index(&self, n: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, t)| !t.kind.is_trivia())
            .nth(n)
            .map(|(idx, _)| idx)
    }

    fn current(&self) -> Option<&Token<'a>> {
        self.nth_index(0).map(|idx| &self.tokens[idx])
    }

    fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    /// Soft keyword check: an IDENT spelled `word`
    fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.current_text() == word
    }

    fn at_eof(&self) -> bool {
        self.nth_index(0).is_none()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Non-trivia tokens from the current position onward
    fn lookahead(&self) -> impl Iterator<Item = &Token<'a>> + '_ {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}, found {:?}", kind, self.current_kind()));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .or_else(|| {
                self.tokens
                    .last()
                    .map(|t| TextRange::empty(t.offset + TextSize::of(t.text)))
            })
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    /// Enter a nested construct; false once the nesting limit is exceeded.
    fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            if !self.depth_reported {
                self.error("too many nested blocks or expressions");
                self.depth_reported = true;
            }
            return false;
        }
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Open a `kind` node around everything since `checkpoint`, counting the
    /// extra tree level against the nesting limit.
    ///
    /// On success the caller owes one `leave` per wrap once its loop ends. Past
    /// the limit the rest of the line becomes an error node and nothing is
    /// opened.
    fn wrap_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) -> bool {
        if !self.enter() {
            self.leave();
            self.error_recover("expression chain too long", &[SyntaxKind::NEWLINE]);
            return false;
        }
        self.start_node_at(checkpoint, kind);
        true
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    /// Wrap the single next token in a node of `kind`
    fn token_node(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: root
    // =========================================================================

    /// SourceFile = Statement*
    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());

        while !self.at_eof() {
            let pos_before = self.pos;
            self.parse_statement();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
        self.skip_trivia();

        self.finish_node();
    }
}
