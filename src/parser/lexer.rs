//! Logos-based lexer for Python
//!
//! Fast tokenization using the logos crate, followed by a layout pass that
//! turns physical lines into logical lines with INDENT/DEDENT tokens.

use super::syntax_kind::SyntaxKind;
use crate::core::text_utils::is_identifier;
use logos::Logos;
use rowan::TextSize;

/// Width of a tab stop when measuring indentation
const TAB_WIDTH: usize = 8;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
///
/// Yields raw physical tokens; see [`tokenize`] for the layout-aware stream.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a layout-aware token stream.
///
/// The result is lossless: concatenating every token's text reproduces the
/// input. Synthesized NEWLINE/INDENT/DEDENT tokens are zero-width except
/// for NEWLINE tokens that end a physical line.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Layout::new(input).run(Lexer::new(input))
}

// =============================================================================
// Layout pass
// =============================================================================

struct Layout<'a> {
    input: &'a str,
    out: Vec<Token<'a>>,
    indents: Vec<usize>,
    depth: u32,
    at_line_start: bool,
}

impl<'a> Layout<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            out: Vec::new(),
            indents: vec![0],
            depth: 0,
            at_line_start: true,
        }
    }

    fn run(mut self, raw: Lexer<'a>) -> Vec<Token<'a>> {
        for mut token in raw {
            match token.kind {
                SyntaxKind::NEWLINE => {
                    if self.depth > 0 || self.at_line_start {
                        token.kind = SyntaxKind::NL;
                    } else {
                        self.at_line_start = true;
                    }
                    self.out.push(token);
                }
                kind if kind.is_trivia() => self.out.push(token),
                kind => {
                    if self.at_line_start {
                        self.indentation(token.offset);
                        self.at_line_start = false;
                    }
                    match kind {
                        SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                            self.depth += 1
                        }
                        SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                            self.depth = self.depth.saturating_sub(1)
                        }
                        _ => {}
                    }
                    self.out.push(token);
                }
            }
        }

        let end = TextSize::of(self.input);
        if !self.at_line_start {
            self.synthetic(SyntaxKind::NEWLINE, end);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.synthetic(SyntaxKind::DEDENT, end);
        }
        self.out
    }

    /// Emit INDENT/DEDENT tokens for a line whose first token starts at `offset`.
    fn indentation(&mut self, offset: TextSize) {
        let width = indent_width(self.input, offset);
        let top = self.indents.last().copied().unwrap_or(0);
        if width > top {
            self.indents.push(width);
            self.synthetic(SyntaxKind::INDENT, offset);
            return;
        }
        while width < self.indents.last().copied().unwrap_or(0) {
            self.indents.pop();
            self.synthetic(SyntaxKind::DEDENT, offset);
        }
        if width != self.indents.last().copied().unwrap_or(0) {
            // Dedent to a column that matches no outer block
            self.synthetic(SyntaxKind::ERROR, offset);
        }
    }

    fn synthetic(&mut self, kind: SyntaxKind, offset: TextSize) {
        self.out.push(Token {
            kind,
            text: "",
            offset,
        });
    }
}

/// Visual indentation of the line containing `offset`, up to `offset`.
fn indent_width(input: &str, offset: TextSize) -> usize {
    let end = usize::from(offset);
    let line_start = input[..end].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut width = 0;
    for ch in input[line_start..end].chars() {
        match ch {
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            '\x0C' => width = 0,
            _ => width += 1,
        }
    }
    width
}

// =============================================================================
// Raw tokens
// =============================================================================

/// Scan to the end of a triple-quoted string whose opening delimiter was just lexed.
fn triple_quoted(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let slice = lex.slice();
    let delim = if slice.ends_with("\"\"\"") { "\"\"\"" } else { "'''" };
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
            continue;
        }
        if rest[i..].starts_with(delim) {
            lex.bump(i + delim.len());
            return true;
        }
    }
    lex.bump(rest.len());
    false
}

fn valid_identifier(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    is_identifier(lex.slice())
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    #[regex(r"#[^\n]*")]
    Comment,

    #[regex(r"\\\r?\n")]
    LineContinuation,

    #[regex(r"\r?\n")]
    Newline,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*", valid_identifier)]
    Ident,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[jJ]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Number,

    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?"([^"\\\n]|\\(\r\n|.|\n))*""#)]
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?'([^'\\\n]|\\(\r\n|.|\n))*'"#)]
    String,

    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?""""#, triple_quoted)]
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?'''"#, triple_quoted)]
    LongString,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token(":=")]
    ColonEq,
    #[token("**=")]
    StarStarEq,
    #[token("//=")]
    SlashSlashEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("@=")]
    AtEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("**")]
    StarStar,
    #[token("//")]
    SlashSlash,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("False")]
    FalseKw,
    #[token("None")]
    NoneKw,
    #[token("True")]
    TrueKw,
    #[token("and")]
    AndKw,
    #[token("as")]
    AsKw,
    #[token("assert")]
    AssertKw,
    #[token("async")]
    AsyncKw,
    #[token("await")]
    AwaitKw,
    #[token("break")]
    BreakKw,
    #[token("class")]
    ClassKw,
    #[token("continue")]
    ContinueKw,
    #[token("def")]
    DefKw,
    #[token("del")]
    DelKw,
    #[token("elif")]
    ElifKw,
    #[token("else")]
    ElseKw,
    #[token("except")]
    ExceptKw,
    #[token("finally")]
    FinallyKw,
    #[token("for")]
    ForKw,
    #[token("from")]
    FromKw,
    #[token("global")]
    GlobalKw,
    #[token("if")]
    IfKw,
    #[token("import")]
    ImportKw,
    #[token("in")]
    InKw,
    #[token("is")]
    IsKw,
    #[token("lambda")]
    LambdaKw,
    #[token("nonlocal")]
    NonlocalKw,
    #[token("not")]
    NotKw,
    #[token("or")]
    OrKw,
    #[token("pass")]
    PassKw,
    #[token("raise")]
    RaiseKw,
    #[token("return")]
    ReturnKw,
    #[token("try")]
    TryKw,
    #[token("while")]
    WhileKw,
    #[token("with")]
    WithKw,
    #[token("yield")]
    YieldKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken as T;
        match token {
            T::Whitespace => SyntaxKind::WHITESPACE,
            T::Comment => SyntaxKind::COMMENT,
            T::LineContinuation => SyntaxKind::LINE_CONTINUATION,
            T::Newline => SyntaxKind::NEWLINE,
            T::Ident => SyntaxKind::IDENT,
            T::Number => SyntaxKind::NUMBER,
            T::String | T::LongString => SyntaxKind::STRING,
            T::Ellipsis => SyntaxKind::ELLIPSIS,
            T::Arrow => SyntaxKind::ARROW,
            T::ColonEq => SyntaxKind::COLON_EQ,
            T::StarStarEq => SyntaxKind::STAR_STAR_EQ,
            T::SlashSlashEq => SyntaxKind::SLASH_SLASH_EQ,
            T::ShlEq => SyntaxKind::SHL_EQ,
            T::ShrEq => SyntaxKind::SHR_EQ,
            T::PlusEq => SyntaxKind::PLUS_EQ,
            T::MinusEq => SyntaxKind::MINUS_EQ,
            T::StarEq => SyntaxKind::STAR_EQ,
            T::SlashEq => SyntaxKind::SLASH_EQ,
            T::PercentEq => SyntaxKind::PERCENT_EQ,
            T::AtEq => SyntaxKind::AT_EQ,
            T::AmpEq => SyntaxKind::AMP_EQ,
            T::PipeEq => SyntaxKind::PIPE_EQ,
            T::CaretEq => SyntaxKind::CARET_EQ,
            T::StarStar => SyntaxKind::STAR_STAR,
            T::SlashSlash => SyntaxKind::SLASH_SLASH,
            T::Shl => SyntaxKind::SHL,
            T::Shr => SyntaxKind::SHR,
            T::LtEq => SyntaxKind::LT_EQ,
            T::GtEq => SyntaxKind::GT_EQ,
            T::EqEq => SyntaxKind::EQ_EQ,
            T::NotEq => SyntaxKind::NOT_EQ,
            T::LParen => SyntaxKind::L_PAREN,
            T::RParen => SyntaxKind::R_PAREN,
            T::LBracket => SyntaxKind::L_BRACKET,
            T::RBracket => SyntaxKind::R_BRACKET,
            T::LBrace => SyntaxKind::L_BRACE,
            T::RBrace => SyntaxKind::R_BRACE,
            T::Colon => SyntaxKind::COLON,
            T::Comma => SyntaxKind::COMMA,
            T::Semicolon => SyntaxKind::SEMICOLON,
            T::Dot => SyntaxKind::DOT,
            T::At => SyntaxKind::AT,
            T::Eq => SyntaxKind::EQ,
            T::Plus => SyntaxKind::PLUS,
            T::Minus => SyntaxKind::MINUS,
            T::Star => SyntaxKind::STAR,
            T::Slash => SyntaxKind::SLASH,
            T::Percent => SyntaxKind::PERCENT,
            T::Pipe => SyntaxKind::PIPE,
            T::Amp => SyntaxKind::AMP,
            T::Caret => SyntaxKind::CARET,
            T::Tilde => SyntaxKind::TILDE,
            T::Lt => SyntaxKind::LT,
            T::Gt => SyntaxKind::GT,
            T::FalseKw => SyntaxKind::FALSE_KW,
            T::NoneKw => SyntaxKind::NONE_KW,
            T::TrueKw => SyntaxKind::TRUE_KW,
            T::AndKw => SyntaxKind::AND_KW,
            T::AsKw => SyntaxKind::AS_KW,
            T::AssertKw => SyntaxKind::ASSERT_KW,
            T::AsyncKw => SyntaxKind::ASYNC_KW,
            T::AwaitKw => SyntaxKind::AWAIT_KW,
            T::BreakKw => SyntaxKind::BREAK_KW,
            T::ClassKw => SyntaxKind::CLASS_KW,
            T::ContinueKw => SyntaxKind::CONTINUE_KW,
            T::DefKw => SyntaxKind::DEF_KW,
            T::DelKw => SyntaxKind::DEL_KW,
            T::ElifKw => SyntaxKind::ELIF_KW,
            T::ElseKw => SyntaxKind::ELSE_KW,
            T::ExceptKw => SyntaxKind::EXCEPT_KW,
            T::FinallyKw => SyntaxKind::FINALLY_KW,
            T::ForKw => SyntaxKind::FOR_KW,
            T::FromKw => SyntaxKind::FROM_KW,
            T::GlobalKw => SyntaxKind::GLOBAL_KW,
            T::IfKw => SyntaxKind::IF_KW,
            T::ImportKw => SyntaxKind::IMPORT_KW,
            T::InKw => SyntaxKind::IN_KW,
            T::IsKw => SyntaxKind::IS_KW,
            T::LambdaKw => SyntaxKind::LAMBDA_KW,
            T::NonlocalKw => SyntaxKind::NONLOCAL_KW,
            T::NotKw => SyntaxKind::NOT_KW,
            T::OrKw => SyntaxKind::OR_KW,
            T::PassKw => SyntaxKind::PASS_KW,
            T::RaiseKw => SyntaxKind::RAISE_KW,
            T::ReturnKw => SyntaxKind::RETURN_KW,
            T::TryKw => SyntaxKind::TRY_KW,
            T::WhileKw => SyntaxKind::WHILE_KW,
            T::WithKw => SyntaxKind::WITH_KW,
            T::YieldKw => SyntaxKind::YIELD_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_tokenize_is_lossless() {
        let src = "def f(a, b):\n    # comment\n    return a + b  # sum\n\nx = '''doc\nmore'''\n";
        let text: String = tokenize(src).iter().map(|t| t.text).collect();
        assert_eq!(text, src);
    }

    #[test]
    fn test_indent_dedent() {
        use SyntaxKind::*;
        let got = kinds("if x:\n    y\nz\n");
        assert_eq!(
            got,
            vec![IF_KW, IDENT, COLON, NEWLINE, INDENT, IDENT, NEWLINE, DEDENT, IDENT, NEWLINE]
        );
    }

    #[test]
    fn test_brackets_suppress_newlines() {
        use SyntaxKind::*;
        let got = kinds("f(a,\n  b)\n");
        assert_eq!(got, vec![IDENT, L_PAREN, IDENT, COMMA, IDENT, R_PAREN, NEWLINE]);
    }

    #[test]
    fn test_blank_and_comment_lines_are_trivia() {
        use SyntaxKind::*;
        let got = kinds("a\n\n    # indented comment\nb");
        assert_eq!(got, vec![IDENT, NEWLINE, IDENT, NEWLINE]);
    }

    #[test]
    fn test_eof_closes_blocks() {
        use SyntaxKind::*;
        let got = kinds("class A:\n    def f(self):\n        pass");
        assert_eq!(got.iter().filter(|k| **k == DEDENT).count(), 2);
        assert_eq!(got.last(), Some(&DEDENT));
    }

    #[test]
    fn test_inconsistent_dedent_is_error() {
        let got = kinds("if x:\n        a\n    b\n");
        assert!(got.contains(&SyntaxKind::ERROR));
    }

    #[rstest]
    #[case("'single'")]
    #[case("\"double\"")]
    #[case("rb'raw bytes'")]
    #[case("f\"{x!r}\"")]
    #[case("\"\"\"triple \"quoted\" text\"\"\"")]
    #[case("'''multi\nline'''")]
    #[case("'esc\\'aped'")]
    fn test_string_literals(#[case] input: &str) {
        let tokens = tokenize(input);
        assert_eq!(tokens[0].kind, SyntaxKind::STRING);
        assert_eq!(tokens[0].text, input);
    }

    #[rstest]
    #[case("42")]
    #[case("3.14")]
    #[case("1_000")]
    #[case("0xFF")]
    #[case("1e-3")]
    #[case(".5")]
    #[case("2j")]
    fn test_numbers(#[case] input: &str) {
        let tokens = tokenize(input);
        assert_eq!(tokens[0].kind, SyntaxKind::NUMBER);
        assert_eq!(tokens[0].text, input);
    }

    #[test]
    fn test_keywords_and_soft_keywords() {
        use SyntaxKind::*;
        assert_eq!(kinds("def match type"), vec![DEF_KW, IDENT, IDENT, NEWLINE]);
        assert_eq!(kinds("x := 1"), vec![IDENT, COLON_EQ, NUMBER, NEWLINE]);
        assert_eq!(kinds("a **= b"), vec![IDENT, STAR_STAR_EQ, IDENT, NEWLINE]);
    }

    #[test]
    fn test_unicode_identifier() {
        let tokens = tokenize("größe = 1");
        assert_eq!(tokens[0].kind, SyntaxKind::IDENT);
        assert_eq!(tokens[0].text, "größe");
    }

    #[test]
    fn test_unterminated_triple_string_is_error() {
        let tokens = tokenize("x = '''never closed");
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::ERROR));
    }
}
