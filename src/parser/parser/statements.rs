//! Statement grammar: compound statements, definitions, simple statements.

use super::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// Tokens that end a simple statement
const STMT_END: &[SyntaxKind] = &[SyntaxKind::NEWLINE, SyntaxKind::SEMICOLON, SyntaxKind::EOF];

impl Parser<'_> {
    /// Statement = CompoundStmt | SimpleStmts
    pub(super) fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::DEF_KW => self.parse_function_def(),
            SyntaxKind::CLASS_KW => self.parse_class_def(),
            SyntaxKind::AT => self.parse_decorated(),
            SyntaxKind::IF_KW => self.parse_if_stmt(),
            SyntaxKind::WHILE_KW => self.parse_while_stmt(),
            SyntaxKind::FOR_KW => self.parse_for_stmt(),
            SyntaxKind::TRY_KW => self.parse_try_stmt(),
            SyntaxKind::WITH_KW => self.parse_with_stmt(),
            SyntaxKind::ASYNC_KW => match self.nth(1) {
                SyntaxKind::DEF_KW => self.parse_function_def(),
                SyntaxKind::FOR_KW => self.parse_for_stmt(),
                SyntaxKind::WITH_KW => self.parse_with_stmt(),
                _ => self.error_recover(
                    "expected 'def', 'for' or 'with' after 'async'",
                    &[SyntaxKind::NEWLINE],
                ),
            },
            SyntaxKind::IDENT if self.at_contextual("match") && self.at_match_stmt() => {
                self.parse_match_stmt()
            }
            SyntaxKind::INDENT => {
                self.error("unexpected indent");
                self.bump();
            }
            SyntaxKind::DEDENT => {
                self.error("unexpected dedent");
                self.bump();
            }
            _ => self.parse_simple_statements(),
        }
    }

    /// Block = NEWLINE INDENT Statement+ DEDENT | SimpleStmts
    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        if !self.enter() {
            self.error_recover("block nested too deeply", &[]);
            self.leave();
            self.finish_node();
            return;
        }

        if self.eat(SyntaxKind::NEWLINE) {
            if self.eat(SyntaxKind::INDENT) {
                while !self.at(SyntaxKind::DEDENT) && !self.at_eof() {
                    let pos_before = self.pos;
                    self.parse_statement();
                    if self.pos == pos_before {
                        self.error(format!("stuck on token: {:?}", self.current_kind()));
                        self.bump();
                    }
                }
                self.expect(SyntaxKind::DEDENT);
            } else {
                self.error("expected an indented block");
            }
        } else {
            self.parse_simple_statements();
        }

        self.leave();
        self.finish_node();
    }

    /// `: Block` with the colon required
    fn parse_suite(&mut self) {
        self.expect(SyntaxKind::COLON);
        self.parse_block();
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Decorated = Decorator+ (FunctionDef | ClassDef)
    fn parse_decorated(&mut self) {
        self.start_node(SyntaxKind::DECORATED);
        while self.at(SyntaxKind::AT) {
            self.start_node(SyntaxKind::DECORATOR);
            self.bump();
            self.parse_named_expr();
            if !self.eat(SyntaxKind::NEWLINE) {
                self.error_recover("expected newline after decorator", &[SyntaxKind::NEWLINE]);
                self.eat(SyntaxKind::NEWLINE);
            }
            self.finish_node();
        }
        match self.current_kind() {
            SyntaxKind::DEF_KW => self.parse_function_def(),
            SyntaxKind::ASYNC_KW if self.nth(1) == SyntaxKind::DEF_KW => self.parse_function_def(),
            SyntaxKind::CLASS_KW => self.parse_class_def(),
            _ => self.error("expected function or class definition after decorator"),
        }
        self.finish_node();
    }

    /// FunctionDef = 'async'? 'def' Name TypeParams? ParamList ('->' Expr)? ':' Block
    fn parse_function_def(&mut self) {
        self.start_node(SyntaxKind::FUNCTION_DEF);
        self.eat(SyntaxKind::ASYNC_KW);
        self.expect(SyntaxKind::DEF_KW);
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::L_BRACKET) {
            self.parse_type_params();
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_param_list(false);
        } else {
            self.error("expected parameter list");
        }
        if self.at(SyntaxKind::ARROW) {
            self.start_node(SyntaxKind::RETURN_TYPE);
            self.bump();
            self.parse_expr();
            self.finish_node();
        }
        self.parse_suite();
        self.finish_node();
    }

    /// ClassDef = 'class' Name TypeParams? ArgList? ':' Block
    fn parse_class_def(&mut self) {
        self.start_node(SyntaxKind::CLASS_DEF);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::L_BRACKET) {
            self.parse_type_params();
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
        }
        self.parse_suite();
        self.finish_node();
    }

    /// TypeParams = '[' TypeParam (',' TypeParam)* ','? ']'
    fn parse_type_params(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAMS);
        self.bump();
        while !self.at(SyntaxKind::R_BRACKET) && !self.at_eof() {
            if !self.eat(SyntaxKind::STAR) {
                self.eat(SyntaxKind::STAR_STAR);
            }
            if !self.expect(SyntaxKind::IDENT) {
                self.error_recover(
                    "expected type parameter",
                    &[SyntaxKind::COMMA, SyntaxKind::R_BRACKET, SyntaxKind::NEWLINE],
                );
            }
            if self.eat(SyntaxKind::COLON) {
                self.parse_expr();
            }
            if self.eat(SyntaxKind::EQ) {
                self.parse_expr();
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    /// ParamList = '(' Param (',' Param)* ','? ')'
    ///
    /// Lambda parameter lists have no parentheses and no annotations.
    pub(super) fn parse_param_list(&mut self, lambda: bool) {
        self.start_node(SyntaxKind::PARAM_LIST);
        let close = if lambda {
            SyntaxKind::COLON
        } else {
            self.bump();
            SyntaxKind::R_PAREN
        };
        while !self.at(close) && !self.at_eof() && !self.at(SyntaxKind::NEWLINE) {
            self.parse_param(lambda);
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        if !lambda {
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    /// Param = '/' | '*' Name? Annotation? | '**' Name Annotation? | Name Annotation? Default?
    fn parse_param(&mut self, lambda: bool) {
        self.start_node(SyntaxKind::PARAM);
        match self.current_kind() {
            SyntaxKind::SLASH => self.bump(),
            SyntaxKind::STAR => {
                self.bump();
                if self.eat(SyntaxKind::IDENT) {
                    self.parse_param_annotation(lambda);
                }
            }
            SyntaxKind::STAR_STAR => {
                self.bump();
                self.expect(SyntaxKind::IDENT);
                self.parse_param_annotation(lambda);
            }
            SyntaxKind::IDENT => {
                self.bump();
                self.parse_param_annotation(lambda);
                if self.at(SyntaxKind::EQ) {
                    self.start_node(SyntaxKind::DEFAULT);
                    self.bump();
                    self.parse_expr();
                    self.finish_node();
                }
            }
            _ => self.error_recover(
                "expected parameter",
                &[
                    SyntaxKind::COMMA,
                    SyntaxKind::R_PAREN,
                    SyntaxKind::COLON,
                    SyntaxKind::NEWLINE,
                ],
            ),
        }
        self.finish_node();
    }

    fn parse_param_annotation(&mut self, lambda: bool) {
        if !lambda && self.at(SyntaxKind::COLON) {
            self.start_node(SyntaxKind::ANNOTATION);
            self.bump();
            self.parse_star_expr();
            self.finish_node();
        }
    }

    // =========================================================================
    // Compound statements
    // =========================================================================

    /// IfStmt = 'if' Expr ':' Block ElifClause* ElseClause?
    fn parse_if_stmt(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.bump();
        self.parse_named_expr();
        self.parse_suite();
        while self.at(SyntaxKind::ELIF_KW) {
            self.start_node(SyntaxKind::ELIF_CLAUSE);
            self.bump();
            self.parse_named_expr();
            self.parse_suite();
            self.finish_node();
        }
        self.parse_else_clause();
        self.finish_node();
    }

    fn parse_else_clause(&mut self) {
        if self.at(SyntaxKind::ELSE_KW) {
            self.start_node(SyntaxKind::ELSE_CLAUSE);
            self.bump();
            self.parse_suite();
            self.finish_node();
        }
    }

    /// WhileStmt = 'while' Expr ':' Block ElseClause?
    fn parse_while_stmt(&mut self) {
        self.start_node(SyntaxKind::WHILE_STMT);
        self.bump();
        self.parse_named_expr();
        self.parse_suite();
        self.parse_else_clause();
        self.finish_node();
    }

    /// ForStmt = 'async'? 'for' Targets 'in' Exprs ':' Block ElseClause?
    fn parse_for_stmt(&mut self) {
        self.start_node(SyntaxKind::FOR_STMT);
        self.eat(SyntaxKind::ASYNC_KW);
        self.expect(SyntaxKind::FOR_KW);
        self.parse_target_list();
        self.expect(SyntaxKind::IN_KW);
        self.parse_star_expressions();
        self.parse_suite();
        self.parse_else_clause();
        self.finish_node();
    }

    /// TryStmt = 'try' ':' Block ExceptClause* ElseClause? FinallyClause?
    fn parse_try_stmt(&mut self) {
        self.start_node(SyntaxKind::TRY_STMT);
        self.bump();
        self.parse_suite();
        let mut handlers = 0;
        while self.at(SyntaxKind::EXCEPT_KW) {
            handlers += 1;
            self.start_node(SyntaxKind::EXCEPT_CLAUSE);
            self.bump();
            self.eat(SyntaxKind::STAR);
            if !self.at(SyntaxKind::COLON) {
                self.parse_expressions();
                if self.eat(SyntaxKind::AS_KW) {
                    self.expect(SyntaxKind::IDENT);
                }
            }
            self.parse_suite();
            self.finish_node();
        }
        self.parse_else_clause();
        if self.at(SyntaxKind::FINALLY_KW) {
            handlers += 1;
            self.start_node(SyntaxKind::FINALLY_CLAUSE);
            self.bump();
            self.parse_suite();
            self.finish_node();
        }
        if handlers == 0 {
            self.error("expected 'except' or 'finally' block");
        }
        self.finish_node();
    }

    /// WithStmt = 'async'? 'with' ('(' WithItems ')' | WithItems) ':' Block
    fn parse_with_stmt(&mut self) {
        self.start_node(SyntaxKind::WITH_STMT);
        self.eat(SyntaxKind::ASYNC_KW);
        self.expect(SyntaxKind::WITH_KW);
        if self.at(SyntaxKind::L_PAREN) && self.at_parenthesized_with_items() {
            self.bump();
            self.parse_with_items(SyntaxKind::R_PAREN);
            self.expect(SyntaxKind::R_PAREN);
        } else {
            self.parse_with_items(SyntaxKind::COLON);
        }
        self.parse_suite();
        self.finish_node();
    }

    fn parse_with_items(&mut self, close: SyntaxKind) {
        loop {
            self.start_node(SyntaxKind::WITH_ITEM);
            self.parse_expr();
            if self.eat(SyntaxKind::AS_KW) {
                self.parse_target();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) || self.at(close) {
                break;
            }
        }
    }

    /// `with (a as b, c):` vs `with (a, b) as c:`: the group holds `as` at
    /// its own depth and is directly followed by the colon.
    fn at_parenthesized_with_items(&self) -> bool {
        let mut depth = 0usize;
        let mut saw_as = false;
        let mut tokens = self.lookahead();
        for token in tokens.by_ref() {
            match token.kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                SyntaxKind::AS_KW if depth == 1 => saw_as = true,
                SyntaxKind::COMMA if depth == 1 => saw_as = true,
                SyntaxKind::NEWLINE | SyntaxKind::EOF => return false,
                _ => {}
            }
        }
        saw_as && tokens.next().map(|t| t.kind) == Some(SyntaxKind::COLON)
    }

    /// `match` is a soft keyword: a statement only when the line ends with `:`.
    fn at_match_stmt(&self) -> bool {
        if matches!(self.nth(1), SyntaxKind::EQ | SyntaxKind::COLON | SyntaxKind::NEWLINE) {
            return false;
        }
        let mut depth = 0usize;
        let mut last = SyntaxKind::EOF;
        for token in self.lookahead() {
            match token.kind {
                SyntaxKind::NEWLINE if depth == 0 => break,
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            last = token.kind;
        }
        last == SyntaxKind::COLON
    }

    /// MatchStmt = 'match' Exprs ':' NEWLINE INDENT CaseClause+ DEDENT
    fn parse_match_stmt(&mut self) {
        self.start_node(SyntaxKind::MATCH_STMT);
        self.bump();
        self.parse_star_expressions();
        self.expect(SyntaxKind::COLON);
        self.expect(SyntaxKind::NEWLINE);
        if self.expect(SyntaxKind::INDENT) {
            while !self.at(SyntaxKind::DEDENT) && !self.at_eof() {
                if self.at_contextual("case") {
                    self.parse_case_clause();
                } else {
                    self.error_recover("expected 'case' block", &[SyntaxKind::NEWLINE]);
                    self.eat(SyntaxKind::NEWLINE);
                }
            }
            self.expect(SyntaxKind::DEDENT);
        }
        self.finish_node();
    }

    /// CaseClause = 'case' Pattern ('if' Expr)? ':' Block
    fn parse_case_clause(&mut self) {
        self.start_node(SyntaxKind::CASE_CLAUSE);
        self.bump();
        self.parse_pattern();
        if self.eat(SyntaxKind::IF_KW) {
            self.parse_named_expr();
        }
        self.parse_suite();
        self.finish_node();
    }

    /// Patterns are kept as balanced token runs up to the guard or colon.
    fn parse_pattern(&mut self) {
        self.start_node(SyntaxKind::PATTERN);
        let mut depth = 0usize;
        let mut empty = true;
        loop {
            match self.current_kind() {
                SyntaxKind::NEWLINE | SyntaxKind::EOF => break,
                SyntaxKind::COLON | SyntaxKind::IF_KW if depth == 0 => break,
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.bump();
            empty = false;
        }
        if empty {
            self.error("expected pattern");
        }
        self.finish_node();
    }

    // =========================================================================
    // Simple statements
    // =========================================================================

    /// SimpleStmts = SimpleStmt (';' SimpleStmt)* ';'? NEWLINE
    pub(super) fn parse_simple_statements(&mut self) {
        loop {
            self.parse_simple_statement();
            if !self.eat(SyntaxKind::SEMICOLON) || self.at_any(STMT_END) {
                break;
            }
        }
        if !self.eat(SyntaxKind::NEWLINE) && !self.at_eof() {
            self.error_recover("expected newline", &[SyntaxKind::NEWLINE]);
            self.eat(SyntaxKind::NEWLINE);
        }
    }

    fn parse_simple_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::PASS_KW => self.token_node(SyntaxKind::PASS_STMT),
            SyntaxKind::BREAK_KW => self.token_node(SyntaxKind::BREAK_STMT),
            SyntaxKind::CONTINUE_KW => self.token_node(SyntaxKind::CONTINUE_STMT),
            SyntaxKind::RETURN_KW => {
                self.start_node(SyntaxKind::RETURN_STMT);
                self.bump();
                if !self.at_any(STMT_END) {
                    self.parse_star_expressions();
                }
                self.finish_node();
            }
            SyntaxKind::RAISE_KW => {
                self.start_node(SyntaxKind::RAISE_STMT);
                self.bump();
                if !self.at_any(STMT_END) {
                    self.parse_expr();
                    if self.eat(SyntaxKind::FROM_KW) {
                        self.parse_expr();
                    }
                }
                self.finish_node();
            }
            SyntaxKind::DEL_KW => {
                self.start_node(SyntaxKind::DEL_STMT);
                self.bump();
                self.parse_target_list();
                self.finish_node();
            }
            SyntaxKind::ASSERT_KW => {
                self.start_node(SyntaxKind::ASSERT_STMT);
                self.bump();
                self.parse_expr();
                if self.eat(SyntaxKind::COMMA) {
                    self.parse_expr();
                }
                self.finish_node();
            }
            SyntaxKind::GLOBAL_KW => self.parse_name_list_stmt(SyntaxKind::GLOBAL_STMT),
            SyntaxKind::NONLOCAL_KW => self.parse_name_list_stmt(SyntaxKind::NONLOCAL_STMT),
            SyntaxKind::IMPORT_KW => self.parse_import_stmt(),
            SyntaxKind::FROM_KW => self.parse_from_import_stmt(),
            SyntaxKind::IDENT
                if self.at_contextual("type")
                    && self.nth(1) == SyntaxKind::IDENT
                    && matches!(self.nth(2), SyntaxKind::EQ | SyntaxKind::L_BRACKET) =>
            {
                self.parse_type_alias()
            }
            _ => self.parse_expr_statement(),
        }
    }

    /// GlobalStmt = 'global' Name (',' Name)*
    fn parse_name_list_stmt(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        while self.eat(SyntaxKind::COMMA) {
            self.expect(SyntaxKind::IDENT);
        }
        self.finish_node();
    }

    /// TypeAlias = 'type' Name TypeParams? '=' Expr
    fn parse_type_alias(&mut self) {
        self.start_node(SyntaxKind::TYPE_ALIAS_STMT);
        self.bump();
        self.bump();
        if self.at(SyntaxKind::L_BRACKET) {
            self.parse_type_params();
        }
        self.expect(SyntaxKind::EQ);
        self.parse_expr();
        self.finish_node();
    }

    /// ImportStmt = 'import' ImportAlias (',' ImportAlias)*
    fn parse_import_stmt(&mut self) {
        self.start_node(SyntaxKind::IMPORT_STMT);
        self.bump();
        loop {
            self.start_node(SyntaxKind::IMPORT_ALIAS);
            self.parse_dotted_name();
            if self.eat(SyntaxKind::AS_KW) {
                self.expect(SyntaxKind::IDENT);
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    /// FromImportStmt = 'from' ('.' | '...')* DottedName? 'import' ('*' | '(' Names ')' | Names)
    fn parse_from_import_stmt(&mut self) {
        self.start_node(SyntaxKind::FROM_IMPORT_STMT);
        self.bump();
        let mut relative = false;
        while self.at_any(&[SyntaxKind::DOT, SyntaxKind::ELLIPSIS]) {
            self.bump();
            relative = true;
        }
        if !self.at(SyntaxKind::IMPORT_KW) || !relative {
            self.parse_dotted_name();
        }
        self.expect(SyntaxKind::IMPORT_KW);
        if !self.eat(SyntaxKind::STAR) {
            let parenthesized = self.eat(SyntaxKind::L_PAREN);
            loop {
                if parenthesized && self.at(SyntaxKind::R_PAREN) {
                    break;
                }
                self.start_node(SyntaxKind::IMPORT_ALIAS);
                self.expect(SyntaxKind::IDENT);
                if self.eat(SyntaxKind::AS_KW) {
                    self.expect(SyntaxKind::IDENT);
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            if parenthesized {
                self.expect(SyntaxKind::R_PAREN);
            }
        }
        self.finish_node();
    }

    /// DottedName = Name ('.' Name)*
    fn parse_dotted_name(&mut self) {
        self.start_node(SyntaxKind::DOTTED_NAME);
        self.expect(SyntaxKind::IDENT);
        while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    /// ExprStmt | AssignStmt | AnnAssignStmt | AugAssignStmt
    fn parse_expr_statement(&mut self) {
        let checkpoint = self.checkpoint();
        if self.at(SyntaxKind::YIELD_KW) {
            self.parse_yield_expr();
        } else {
            self.parse_star_expressions();
        }

        if self.at(SyntaxKind::COLON) {
            self.start_node_at(checkpoint, SyntaxKind::ANN_ASSIGN_STMT);
            self.start_node(SyntaxKind::ANNOTATION);
            self.bump();
            self.parse_expr();
            self.finish_node();
            if self.eat(SyntaxKind::EQ) {
                self.parse_assign_rhs();
            }
            self.finish_node();
        } else if self.current_kind().is_aug_assign() {
            self.start_node_at(checkpoint, SyntaxKind::AUG_ASSIGN_STMT);
            self.bump();
            self.parse_assign_rhs();
            self.finish_node();
        } else if self.at(SyntaxKind::EQ) {
            self.start_node_at(checkpoint, SyntaxKind::ASSIGN_STMT);
            while self.eat(SyntaxKind::EQ) {
                self.parse_assign_rhs();
            }
            self.finish_node();
        } else {
            self.start_node_at(checkpoint, SyntaxKind::EXPR_STMT);
            self.finish_node();
        }
    }

    fn parse_assign_rhs(&mut self) {
        if self.at(SyntaxKind::YIELD_KW) {
            self.parse_yield_expr();
        } else {
            self.parse_star_expressions();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{SyntaxKind, SyntaxNode, parse_python};
    use rstest::rstest;

    fn has_kind(node: &SyntaxNode, kind: SyntaxKind) -> bool {
        node.descendants().any(|n| n.kind() == kind)
    }

    #[rstest]
    #[case("if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n", SyntaxKind::ELIF_CLAUSE)]
    #[case("while x:\n    break\nelse:\n    pass\n", SyntaxKind::WHILE_STMT)]
    #[case("for a, b in items:\n    continue\n", SyntaxKind::FOR_STMT)]
    #[case("async def f():\n    async for x in y:\n        pass\n", SyntaxKind::FOR_STMT)]
    #[case("try:\n    pass\nexcept (A, B) as e:\n    raise\nfinally:\n    pass\n", SyntaxKind::EXCEPT_CLAUSE)]
    #[case("try:\n    pass\nexcept* ValueError:\n    pass\n", SyntaxKind::EXCEPT_CLAUSE)]
    #[case("with open(p) as f, lock:\n    pass\n", SyntaxKind::WITH_ITEM)]
    #[case("with (open(a) as f,\n      open(b) as g):\n    pass\n", SyntaxKind::WITH_ITEM)]
    #[case("match cmd:\n    case [x, *rest] if x:\n        pass\n    case _:\n        pass\n", SyntaxKind::CASE_CLAUSE)]
    #[case("import os.path as p, sys\n", SyntaxKind::IMPORT_ALIAS)]
    #[case("from . import (a as b,\n    c,)\n", SyntaxKind::FROM_IMPORT_STMT)]
    #[case("from ...pkg.mod import *\n", SyntaxKind::DOTTED_NAME)]
    #[case("x: list[int] = []\n", SyntaxKind::ANN_ASSIGN_STMT)]
    #[case("a = b = c\n", SyntaxKind::ASSIGN_STMT)]
    #[case("n += 1\n", SyntaxKind::AUG_ASSIGN_STMT)]
    #[case("global a, b\n", SyntaxKind::GLOBAL_STMT)]
    #[case("del a[0], b\n", SyntaxKind::DEL_STMT)]
    #[case("assert x, 'msg'\n", SyntaxKind::ASSERT_STMT)]
    #[case("raise ValueError('x') from err\n", SyntaxKind::RAISE_STMT)]
    #[case("type Alias[T] = list[T]\n", SyntaxKind::TYPE_ALIAS_STMT)]
    #[case("def f[T](x: T) -> T: return x\n", SyntaxKind::TYPE_PARAMS)]
    #[case("class C[T](Base, metaclass=M):\n    pass\n", SyntaxKind::ARG_LIST)]
    #[case("x = 1; y = 2\n", SyntaxKind::ASSIGN_STMT)]
    fn test_statement_forms(#[case] source: &str, #[case] expected: SyntaxKind) {
        let parse = parse_python(source);
        assert!(parse.ok(), "errors for {:?}: {:?}", source, parse.errors);
        assert!(has_kind(&parse.syntax(), expected), "{:#?}", parse.syntax());
    }

    #[test]
    fn test_match_as_identifier() {
        let parse = parse_python("match = re.match(p, s)\nmatch.group(0)\n");
        assert!(parse.ok(), "{:?}", parse.errors);
        assert!(!has_kind(&parse.syntax(), SyntaxKind::MATCH_STMT));
    }

    #[rstest]
    #[case("def f(\n")]
    #[case("class A\n    pass\n")]
    #[case("if x:\npass\n")]
    #[case("try:\n    pass\n")]
    #[case("x = (1,\n")]
    #[case("return return\n")]
    fn test_syntax_errors(#[case] source: &str) {
        let parse = parse_python(source);
        assert!(!parse.ok(), "expected errors for {:?}", source);
        assert_eq!(parse.syntax().text().to_string(), source);
    }
}
