//! CST -> text helpers shared by the extractors.

use std::path::{Component, Path};

use rowan::{NodeOrToken, WalkEvent};

use crate::base::constants::PACKAGE_INIT;
use crate::parser::{AstNode, CallExpr, Literal, Statement, SyntaxKind, SyntaxNode};

/// Render an expression as normalized text.
///
/// Whitespace-insensitive: `Dict[ str,int ]` and `Dict[str, int]` both give
/// `Dict[str, int]`. Commas are followed by one space, `|` is surrounded by
/// spaces, `=` never is, and brackets hug their contents. Anywhere else a
/// single space survives where the source had any.
pub fn normalize_expr(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut prev: Option<SyntaxKind> = None;
    let mut gap = false;

    for element in node.descendants_with_tokens() {
        let NodeOrToken::Token(token) = element else {
            continue;
        };
        let kind = token.kind();
        if kind.is_trivia() {
            gap = true;
            continue;
        }
        if let Some(prev) = prev {
            if needs_space(prev, kind, gap) {
                out.push(' ');
            }
        }
        out.push_str(token.text());
        prev = Some(kind);
        gap = false;
    }
    out
}

fn is_open(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE)
}

fn is_close(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE)
}

fn needs_space(prev: SyntaxKind, next: SyntaxKind, gap: bool) -> bool {
    if is_close(next) || next == SyntaxKind::COMMA || is_open(prev) {
        return false;
    }
    if prev == SyntaxKind::EQ || next == SyntaxKind::EQ {
        return false;
    }
    if prev == SyntaxKind::COMMA || prev == SyntaxKind::PIPE || next == SyntaxKind::PIPE {
        return true;
    }
    gap
}

/// Every call expression in `body`, skipping nested definitions.
pub fn collect_calls(body: &SyntaxNode) -> Vec<CallExpr> {
    let mut calls = Vec::new();
    let mut preorder = body.preorder();
    while let Some(event) = preorder.next() {
        let WalkEvent::Enter(node) = event else {
            continue;
        };
        match node.kind() {
            SyntaxKind::FUNCTION_DEF | SyntaxKind::CLASS_DEF => preorder.skip_subtree(),
            SyntaxKind::CALL_EXPR => calls.extend(CallExpr::cast(node)),
            _ => {}
        }
    }
    calls
}

/// The docstring statement opening a body, if any
pub fn leading_docstring(statements: &[Statement]) -> Option<(String, SyntaxNode)> {
    match statements.first()? {
        Statement::Expr(expr) => {
            let value = expr.string_value()?;
            Some((value, expr.syntax().clone()))
        }
        _ => None,
    }
}

/// String elements of a list/tuple literal: `["a", "b"]`.
///
/// `None` when the expression is anything else or holds a non-string.
pub fn string_sequence(node: &SyntaxNode) -> Option<Vec<String>> {
    let node = match node.kind() {
        SyntaxKind::PAREN_EXPR => node.children().next()?,
        _ => node.clone(),
    };
    if !matches!(node.kind(), SyntaxKind::LIST_EXPR | SyntaxKind::TUPLE_EXPR) {
        return None;
    }
    node.children()
        .map(|child| Literal::cast(child)?.string_value())
        .collect()
}

/// The name bound by a plain identifier target
pub fn target_name(node: &SyntaxNode) -> Option<String> {
    (node.kind() == SyntaxKind::NAME_REF).then(|| node.text().to_string().trim().to_string())
}

/// Names bound by an unpacking target: `a, (b, *c) = ...`
pub fn unpacked_names(node: &SyntaxNode) -> Vec<String> {
    let mut names = Vec::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        match current.kind() {
            SyntaxKind::NAME_REF => names.extend(target_name(&current)),
            SyntaxKind::TUPLE_EXPR
            | SyntaxKind::LIST_EXPR
            | SyntaxKind::PAREN_EXPR
            | SyntaxKind::STARRED_EXPR => {
                let mut children: Vec<_> = current.children().collect();
                children.reverse();
                stack.extend(children);
            }
            _ => {}
        }
    }
    names
}

/// Head of an annotation or base: `typing.Final[int]` -> `typing.Final`
pub fn expr_head(text: &str) -> &str {
    text.split(['[', '(']).next().unwrap_or(text).trim()
}

/// Dotted module name of `path` relative to `root`.
///
/// `pkg/sub/mod.py` -> `pkg.sub.mod`, `pkg/__init__.py` -> `pkg`. Without a
/// root (or outside it) only the file stem is used.
pub fn module_name(path: &Path, root: Option<&Path>) -> String {
    let relative = root
        .and_then(|root| path.strip_prefix(root).ok())
        .filter(|rel| rel.components().next().is_some())
        .unwrap_or_else(|| path.file_name().map(Path::new).unwrap_or(path));

    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if let Some(last) = parts.last_mut() {
        let stem = Path::new(last.as_str())
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        *last = stem;
    }
    if parts.last().is_some_and(|p| p == PACKAGE_INIT) {
        parts.pop();
        if parts.is_empty() {
            // A root-level __init__: name it after its directory
            let dir = path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned());
            parts.push(dir.unwrap_or_else(|| PACKAGE_INIT.to_string()));
        }
    }
    parts.join(".")
}

pub fn is_package_file(path: &Path) -> bool {
    path.file_stem().is_some_and(|stem| stem == PACKAGE_INIT)
}
