//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for Python syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros and functions
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn tokens(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxToken> + use<> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(move |t| t.kind() == kind)
}

pub fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    token(node, kind).is_some()
}

/// Expression kinds that can appear as operands
pub fn is_expr_kind(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NAME_REF
            | SyntaxKind::LITERAL
            | SyntaxKind::CALL_EXPR
            | SyntaxKind::ATTRIBUTE_EXPR
            | SyntaxKind::SUBSCRIPT_EXPR
            | SyntaxKind::SLICE
            | SyntaxKind::BIN_EXPR
            | SyntaxKind::UNARY_EXPR
            | SyntaxKind::TERNARY_EXPR
            | SyntaxKind::LAMBDA_EXPR
            | SyntaxKind::PAREN_EXPR
            | SyntaxKind::TUPLE_EXPR
            | SyntaxKind::LIST_EXPR
            | SyntaxKind::DICT_EXPR
            | SyntaxKind::SET_EXPR
            | SyntaxKind::COMPREHENSION
            | SyntaxKind::STARRED_EXPR
            | SyntaxKind::AWAIT_EXPR
            | SyntaxKind::YIELD_EXPR
            | SyntaxKind::NAMED_EXPR
    )
}

fn exprs(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + use<> {
    node.children().filter(|n| is_expr_kind(n.kind()))
}

// ============================================================================
// Root and blocks
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + use<> {
        self.0.children().filter_map(Statement::cast)
    }
}

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + use<> {
        self.0.children().filter_map(Statement::cast)
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Any statement that can appear in a module or block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Decorated(Decorated),
    Import(ImportStmt),
    FromImport(FromImportStmt),
    Assign(AssignStmt),
    AnnAssign(AnnAssignStmt),
    AugAssign(AugAssignStmt),
    Expr(ExprStmt),
    TypeAlias(TypeAliasStmt),
    Global(GlobalStmt),
    Nonlocal(NonlocalStmt),
    /// if/while/for/try/with/match: only their nested blocks matter
    Compound(CompoundStmt),
    /// return/pass/raise/...: no declarations
    Other(SyntaxNode),
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::FUNCTION_DEF
                | SyntaxKind::CLASS_DEF
                | SyntaxKind::DECORATED
                | SyntaxKind::IMPORT_STMT
                | SyntaxKind::FROM_IMPORT_STMT
                | SyntaxKind::ASSIGN_STMT
                | SyntaxKind::ANN_ASSIGN_STMT
                | SyntaxKind::AUG_ASSIGN_STMT
                | SyntaxKind::EXPR_STMT
                | SyntaxKind::TYPE_ALIAS_STMT
                | SyntaxKind::GLOBAL_STMT
                | SyntaxKind::NONLOCAL_STMT
                | SyntaxKind::RETURN_STMT
                | SyntaxKind::PASS_STMT
                | SyntaxKind::BREAK_STMT
                | SyntaxKind::CONTINUE_STMT
                | SyntaxKind::RAISE_STMT
                | SyntaxKind::DEL_STMT
                | SyntaxKind::ASSERT_STMT
        ) || CompoundStmt::can_cast(kind)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        let stmt = match node.kind() {
            SyntaxKind::FUNCTION_DEF => Self::FunctionDef(FunctionDef(node)),
            SyntaxKind::CLASS_DEF => Self::ClassDef(ClassDef(node)),
            SyntaxKind::DECORATED => Self::Decorated(Decorated(node)),
            SyntaxKind::IMPORT_STMT => Self::Import(ImportStmt(node)),
            SyntaxKind::FROM_IMPORT_STMT => Self::FromImport(FromImportStmt(node)),
            SyntaxKind::ASSIGN_STMT => Self::Assign(AssignStmt(node)),
            SyntaxKind::ANN_ASSIGN_STMT => Self::AnnAssign(AnnAssignStmt(node)),
            SyntaxKind::AUG_ASSIGN_STMT => Self::AugAssign(AugAssignStmt(node)),
            SyntaxKind::EXPR_STMT => Self::Expr(ExprStmt(node)),
            SyntaxKind::TYPE_ALIAS_STMT => Self::TypeAlias(TypeAliasStmt(node)),
            SyntaxKind::GLOBAL_STMT => Self::Global(GlobalStmt(node)),
            SyntaxKind::NONLOCAL_STMT => Self::Nonlocal(NonlocalStmt(node)),
            kind if CompoundStmt::can_cast(kind) => Self::Compound(CompoundStmt(node)),
            kind if Self::can_cast(kind) => Self::Other(node),
            _ => return None,
        };
        Some(stmt)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::FunctionDef(n) => n.syntax(),
            Self::ClassDef(n) => n.syntax(),
            Self::Decorated(n) => n.syntax(),
            Self::Import(n) => n.syntax(),
            Self::FromImport(n) => n.syntax(),
            Self::Assign(n) => n.syntax(),
            Self::AnnAssign(n) => n.syntax(),
            Self::AugAssign(n) => n.syntax(),
            Self::Expr(n) => n.syntax(),
            Self::TypeAlias(n) => n.syntax(),
            Self::Global(n) => n.syntax(),
            Self::Nonlocal(n) => n.syntax(),
            Self::Compound(n) => n.syntax(),
            Self::Other(n) => n,
        }
    }
}

/// A control-flow statement that owns one or more blocks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundStmt(SyntaxNode);

impl AstNode for CompoundStmt {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::IF_STMT
                | SyntaxKind::WHILE_STMT
                | SyntaxKind::FOR_STMT
                | SyntaxKind::TRY_STMT
                | SyntaxKind::WITH_STMT
                | SyntaxKind::MATCH_STMT
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        Self::can_cast(node.kind()).then(|| Self(node))
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl CompoundStmt {
    /// Every block directly owned by this statement or its clauses, in source order
    pub fn blocks(&self) -> Vec<Block> {
        let mut out = Vec::new();
        for node in self.0.children() {
            match node.kind() {
                SyntaxKind::BLOCK => out.extend(Block::cast(node)),
                SyntaxKind::ELIF_CLAUSE
                | SyntaxKind::ELSE_CLAUSE
                | SyntaxKind::EXCEPT_CLAUSE
                | SyntaxKind::FINALLY_CLAUSE
                | SyntaxKind::CASE_CLAUSE => out.extend(node.children().filter_map(Block::cast)),
                _ => {}
            }
        }
        out
    }
}

// ============================================================================
// Definitions
// ============================================================================

ast_node!(FunctionDef, FUNCTION_DEF);

impl FunctionDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::IDENT)
    }

    pub fn is_async(&self) -> bool {
        has_token(&self.0, SyntaxKind::ASYNC_KW)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn return_type(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::RETURN_TYPE)
            .and_then(|n| exprs(&n).next())
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(ClassDef, CLASS_DEF);

impl ClassDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::IDENT)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(Decorated, DECORATED);

/// The definition a decorator list applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Definition {
    Function(FunctionDef),
    Class(ClassDef),
}

impl Decorated {
    pub fn decorators(&self) -> impl Iterator<Item = Decorator> + use<> {
        self.0.children().filter_map(Decorator::cast)
    }

    pub fn definition(&self) -> Option<Definition> {
        self.0.children().find_map(|n| match n.kind() {
            SyntaxKind::FUNCTION_DEF => Some(Definition::Function(FunctionDef(n))),
            SyntaxKind::CLASS_DEF => Some(Definition::Class(ClassDef(n))),
            _ => None,
        })
    }
}

ast_node!(Decorator, DECORATOR);

impl Decorator {
    pub fn expr(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + use<> {
        self.0.children().filter_map(Param::cast)
    }
}

/// The syntactic marker that precedes a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamMarker {
    /// plain `name`
    None,
    /// `/`
    Slash,
    /// `*` or `*args`
    Star,
    /// `**kwargs`
    DoubleStar,
}

ast_node!(Param, PARAM);

impl Param {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::IDENT)
    }

    pub fn marker(&self) -> ParamMarker {
        let first = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
            .map(|t| t.kind());
        match first {
            Some(SyntaxKind::SLASH) => ParamMarker::Slash,
            Some(SyntaxKind::STAR) => ParamMarker::Star,
            Some(SyntaxKind::STAR_STAR) => ParamMarker::DoubleStar,
            _ => ParamMarker::None,
        }
    }

    pub fn annotation(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ANNOTATION)
            .and_then(|n| exprs(&n).next())
    }

    pub fn default(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::DEFAULT)
            .and_then(|n| exprs(&n).next())
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Arg> + use<> {
        self.0.children().filter_map(Arg::cast)
    }
}

ast_node!(Arg, ARG);

impl Arg {
    /// `name` in `name=value`
    pub fn keyword(&self) -> Option<SyntaxToken> {
        if has_token(&self.0, SyntaxKind::EQ) {
            token(&self.0, SyntaxKind::IDENT)
        } else {
            None
        }
    }

    pub fn is_unpack(&self) -> bool {
        has_token(&self.0, SyntaxKind::STAR) || has_token(&self.0, SyntaxKind::STAR_STAR)
    }

    pub fn expr(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }
}

// ============================================================================
// Imports
// ============================================================================

ast_node!(ImportStmt, IMPORT_STMT);

impl ImportStmt {
    pub fn aliases(&self) -> impl Iterator<Item = ImportAlias> + use<> {
        self.0.children().filter_map(ImportAlias::cast)
    }
}

ast_node!(FromImportStmt, FROM_IMPORT_STMT);

impl FromImportStmt {
    /// Number of leading dots (`...` counts three)
    pub fn level(&self) -> u32 {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .take_while(|t| t.kind() != SyntaxKind::IMPORT_KW)
            .map(|t| match t.kind() {
                SyntaxKind::DOT => 1,
                SyntaxKind::ELLIPSIS => 3,
                _ => 0,
            })
            .sum()
    }

    pub fn module(&self) -> Option<DottedName> {
        child(&self.0)
    }

    pub fn is_wildcard(&self) -> bool {
        has_token(&self.0, SyntaxKind::STAR)
    }

    pub fn aliases(&self) -> impl Iterator<Item = ImportAlias> + use<> {
        self.0.children().filter_map(ImportAlias::cast)
    }
}

ast_node!(ImportAlias, IMPORT_ALIAS);

impl ImportAlias {
    /// Imported name: dotted for `import a.b`, simple for `from m import x`
    pub fn name(&self) -> Option<String> {
        match child::<DottedName>(&self.0) {
            Some(dotted) => Some(dotted.text()),
            None => token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string()),
        }
    }

    pub fn alias(&self) -> Option<SyntaxToken> {
        let mut after_as = false;
        for t in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
            match t.kind() {
                SyntaxKind::AS_KW => after_as = true,
                SyntaxKind::IDENT if after_as => return Some(t),
                _ => {}
            }
        }
        None
    }
}

ast_node!(DottedName, DOTTED_NAME);

impl DottedName {
    pub fn text(&self) -> String {
        tokens(&self.0, SyntaxKind::IDENT)
            .map(|t| t.text().to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

// ============================================================================
// Assignments and expression statements
// ============================================================================

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    /// Every target in a chained assignment: `a = b = value`
    pub fn targets(&self) -> Vec<SyntaxNode> {
        let mut all: Vec<_> = exprs(&self.0).collect();
        all.pop();
        all
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        exprs(&self.0).last()
    }
}

ast_node!(AnnAssignStmt, ANN_ASSIGN_STMT);

impl AnnAssignStmt {
    pub fn target(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }

    pub fn annotation(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ANNOTATION)
            .and_then(|n| exprs(&n).next())
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        exprs(&self.0).nth(1)
    }
}

ast_node!(AugAssignStmt, AUG_ASSIGN_STMT);

impl AugAssignStmt {
    pub fn target(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        exprs(&self.0).nth(1)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }

    /// The string value when this statement is a bare string literal
    pub fn string_value(&self) -> Option<String> {
        self.expr().and_then(|e| Literal::cast(e)?.string_value())
    }
}

ast_node!(TypeAliasStmt, TYPE_ALIAS_STMT);

impl TypeAliasStmt {
    /// Aliased name (the identifier after the `type` soft keyword)
    pub fn name(&self) -> Option<SyntaxToken> {
        tokens(&self.0, SyntaxKind::IDENT).nth(1)
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }
}

ast_node!(GlobalStmt, GLOBAL_STMT);
ast_node!(NonlocalStmt, NONLOCAL_STMT);

impl GlobalStmt {
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        tokens(&self.0, SyntaxKind::IDENT)
    }
}

impl NonlocalStmt {
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        tokens(&self.0, SyntaxKind::IDENT)
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.0)
    }
}

ast_node!(AttributeExpr, ATTRIBUTE_EXPR);

impl AttributeExpr {
    pub fn receiver(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }

    pub fn attr(&self) -> Option<SyntaxToken> {
        tokens(&self.0, SyntaxKind::IDENT).last()
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn text(&self) -> String {
        token(&self.0, SyntaxKind::IDENT)
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }
}

ast_node!(Literal, LITERAL);

impl Literal {
    /// Decoded value of a (possibly implicitly concatenated) string literal.
    ///
    /// Returns `None` for non-strings, byte strings and f-strings.
    pub fn string_value(&self) -> Option<String> {
        let mut out = String::new();
        let mut any = false;
        for t in tokens(&self.0, SyntaxKind::STRING) {
            out.push_str(&decode_string(t.text())?);
            any = true;
        }
        any.then_some(out)
    }
}

ast_node!(SubscriptExpr, SUBSCRIPT_EXPR);

impl SubscriptExpr {
    pub fn base(&self) -> Option<SyntaxNode> {
        exprs(&self.0).next()
    }
}

/// Decode the text of one string token. `None` for bytes and f-strings.
pub fn decode_string(text: &str) -> Option<String> {
    let prefix_len = text
        .find(|c| c == '"' || c == '\'')
        .unwrap_or(text.len());
    let prefix = text[..prefix_len].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }
    let raw = prefix.contains('r');
    let body = &text[prefix_len..];
    let quote_len = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        3
    } else {
        1
    };
    if body.len() < quote_len * 2 {
        return None;
    }
    let inner = &body[quote_len..body.len() - quote_len];
    if raw {
        return Some(inner.to_string());
    }
    Some(unescape(inner))
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            Some('\n') => {}
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
