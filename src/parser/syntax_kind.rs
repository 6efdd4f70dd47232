//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the Python syntax tree.

/// All syntax kinds (tokens and nodes) for Python source
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation, layout).
/// Nodes are composite (definitions, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,            // # ...
    LINE_CONTINUATION,  // backslash-newline
    NL,                 // newline that does not end a logical line

    // =========================================================================
    // LAYOUT (synthesized by the layout pass)
    // =========================================================================
    NEWLINE,
    INDENT,
    DEDENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // identifier
    NUMBER,             // 42, 3.14, 0x1f, 1j
    STRING,             // 'x', b"x", f"{x}", """doc"""

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_BRACE,            // {
    R_BRACE,            // }
    COLON,              // :
    COMMA,              // ,
    SEMICOLON,          // ;
    DOT,                // .
    ELLIPSIS,           // ...
    ARROW,              // ->
    AT,                 // @
    EQ,                 // =
    COLON_EQ,           // :=

    // =========================================================================
    // OPERATORS
    // =========================================================================
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    STAR_STAR,          // **
    SLASH,              // /
    SLASH_SLASH,        // //
    PERCENT,            // %
    PIPE,               // |
    AMP,                // &
    CARET,              // ^
    TILDE,              // ~
    SHL,                // <<
    SHR,                // >>
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    EQ_EQ,              // ==
    NOT_EQ,             // !=

    // =========================================================================
    // AUGMENTED ASSIGNMENT
    // =========================================================================
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    STAR_STAR_EQ,
    SLASH_EQ,
    SLASH_SLASH_EQ,
    PERCENT_EQ,
    AT_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,

    // =========================================================================
    // KEYWORDS (hard keywords only; match/case/type stay IDENT)
    // =========================================================================
    FALSE_KW,
    NONE_KW,
    TRUE_KW,
    AND_KW,
    AS_KW,
    ASSERT_KW,
    ASYNC_KW,
    AWAIT_KW,
    BREAK_KW,
    CLASS_KW,
    CONTINUE_KW,
    DEF_KW,
    DEL_KW,
    ELIF_KW,
    ELSE_KW,
    EXCEPT_KW,
    FINALLY_KW,
    FOR_KW,
    FROM_KW,
    GLOBAL_KW,
    IF_KW,
    IMPORT_KW,
    IN_KW,
    IS_KW,
    LAMBDA_KW,
    NONLOCAL_KW,
    NOT_KW,
    OR_KW,
    PASS_KW,
    RAISE_KW,
    RETURN_KW,
    TRY_KW,
    WHILE_KW,
    WITH_KW,
    YIELD_KW,

    // =========================================================================
    // NODES - Root and blocks
    // =========================================================================
    SOURCE_FILE,
    BLOCK,

    // =========================================================================
    // NODES - Definitions
    // =========================================================================
    FUNCTION_DEF,
    CLASS_DEF,
    DECORATED,
    DECORATOR,
    PARAM_LIST,
    PARAM,
    ANNOTATION,
    DEFAULT,
    RETURN_TYPE,
    TYPE_PARAMS,
    ARG_LIST,
    ARG,

    // =========================================================================
    // NODES - Compound statements
    // =========================================================================
    IF_STMT,
    ELIF_CLAUSE,
    ELSE_CLAUSE,
    WHILE_STMT,
    FOR_STMT,
    TRY_STMT,
    EXCEPT_CLAUSE,
    FINALLY_CLAUSE,
    WITH_STMT,
    WITH_ITEM,
    MATCH_STMT,
    CASE_CLAUSE,
    PATTERN,

    // =========================================================================
    // NODES - Simple statements
    // =========================================================================
    EXPR_STMT,
    ASSIGN_STMT,
    ANN_ASSIGN_STMT,
    AUG_ASSIGN_STMT,
    TYPE_ALIAS_STMT,
    RETURN_STMT,
    PASS_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    RAISE_STMT,
    DEL_STMT,
    ASSERT_STMT,
    GLOBAL_STMT,
    NONLOCAL_STMT,
    IMPORT_STMT,
    FROM_IMPORT_STMT,
    IMPORT_ALIAS,
    DOTTED_NAME,

    // =========================================================================
    // NODES - Expressions
    // =========================================================================
    NAME_REF,
    LITERAL,
    CALL_EXPR,
    ATTRIBUTE_EXPR,
    SUBSCRIPT_EXPR,
    SLICE,
    BIN_EXPR,
    UNARY_EXPR,
    TERNARY_EXPR,
    LAMBDA_EXPR,
    PAREN_EXPR,
    TUPLE_EXPR,
    LIST_EXPR,
    DICT_EXPR,
    SET_EXPR,
    COMPREHENSION,
    STARRED_EXPR,
    AWAIT_EXPR,
    YIELD_EXPR,
    NAMED_EXPR,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,
    EOF,                // lookahead past the last token; never in the tree

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, comment, non-logical newline)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::COMMENT | Self::LINE_CONTINUATION | Self::NL
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::FALSE_KW as u16) && (self as u16) <= (Self::YIELD_KW as u16)
    }

    /// Check if this is a punctuation or operator token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::SHR_EQ as u16)
    }

    /// Check if this is an augmented assignment operator (`+=`, `>>=`, ...)
    pub fn is_aug_assign(self) -> bool {
        (self as u16) >= (Self::PLUS_EQ as u16) && (self as u16) <= (Self::SHR_EQ as u16)
    }

    /// Tokens that print as words and need a separating space
    pub fn is_word(self) -> bool {
        matches!(self, Self::IDENT | Self::NUMBER | Self::STRING) || self.is_keyword()
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NUMBER | Self::STRING | Self::TRUE_KW | Self::FALSE_KW | Self::NONE_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PythonLanguage {}

impl rowan::Language for PythonLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<PythonLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<PythonLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<PythonLanguage>;
