//! Expression grammar: a Pratt parser over Python's precedence ladder.

use super::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// Binding power of the conditional expression (`a if c else b`)
const TERNARY_BP: u8 = 1;
/// Left operand level of `not x`
const NOT_BP: u8 = 6;
/// Operands of comparisons bind tighter than comparisons themselves
const BITWISE_OR_BP: u8 = 9;
/// Prefix `-x`, `+x`, `~x`
const UNARY_BP: u8 = 21;
/// `await x` binds tighter than `**`
const AWAIT_BP: u8 = 25;

/// Infix binding powers (left, right). Higher binds tighter.
fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    let bp = match kind {
        SyntaxKind::OR_KW => (2, 3),
        SyntaxKind::AND_KW => (4, 5),
        SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ
        | SyntaxKind::EQ_EQ
        | SyntaxKind::NOT_EQ
        | SyntaxKind::IN_KW
        | SyntaxKind::IS_KW
        | SyntaxKind::NOT_KW => (7, 8),
        SyntaxKind::PIPE => (9, 10),
        SyntaxKind::CARET => (11, 12),
        SyntaxKind::AMP => (13, 14),
        SyntaxKind::SHL | SyntaxKind::SHR => (15, 16),
        SyntaxKind::PLUS | SyntaxKind::MINUS => (17, 18),
        SyntaxKind::STAR
        | SyntaxKind::SLASH
        | SyntaxKind::SLASH_SLASH
        | SyntaxKind::PERCENT
        | SyntaxKind::AT => (19, 20),
        // right-associative
        SyntaxKind::STAR_STAR => (23, 22),
        _ => return None,
    };
    Some(bp)
}

impl Parser<'_> {
    /// Could the current token begin an expression?
    pub(super) fn at_expr_start(&self) -> bool {
        matches!(
            self.current_kind(),
            SyntaxKind::IDENT
                | SyntaxKind::NUMBER
                | SyntaxKind::STRING
                | SyntaxKind::TRUE_KW
                | SyntaxKind::FALSE_KW
                | SyntaxKind::NONE_KW
                | SyntaxKind::ELLIPSIS
                | SyntaxKind::L_PAREN
                | SyntaxKind::L_BRACKET
                | SyntaxKind::L_BRACE
                | SyntaxKind::MINUS
                | SyntaxKind::PLUS
                | SyntaxKind::TILDE
                | SyntaxKind::NOT_KW
                | SyntaxKind::LAMBDA_KW
                | SyntaxKind::AWAIT_KW
                | SyntaxKind::STAR
        )
    }

    /// Expr = Lambda | Ternary | BinaryExpr ...
    pub(super) fn parse_expr(&mut self) {
        self.parse_expr_bp(0);
    }

    /// NamedExpr = Name ':=' Expr | Expr
    pub(super) fn parse_named_expr(&mut self) {
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::COLON_EQ {
            self.start_node(SyntaxKind::NAMED_EXPR);
            self.token_node(SyntaxKind::NAME_REF);
            self.bump();
            self.parse_expr();
            self.finish_node();
        } else {
            self.parse_expr();
        }
    }

    /// StarExpr = '*' BitwiseOr | NamedExpr
    pub(super) fn parse_star_expr(&mut self) {
        if self.at(SyntaxKind::STAR) {
            self.start_node(SyntaxKind::STARRED_EXPR);
            self.bump();
            self.parse_expr_bp(BITWISE_OR_BP);
            self.finish_node();
        } else {
            self.parse_named_expr();
        }
    }

    /// StarExpressions = StarExpr (',' StarExpr)* ','?
    ///
    /// A bare comma forms a tuple.
    pub(super) fn parse_star_expressions(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_star_expr();
        if self.at(SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::TUPLE_EXPR);
            while self.eat(SyntaxKind::COMMA) {
                if !self.at_expr_start() {
                    break;
                }
                self.parse_star_expr();
            }
            self.finish_node();
        }
    }

    /// Expressions = Expr (',' Expr)* ','?
    pub(super) fn parse_expressions(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_expr();
        if self.at(SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::TUPLE_EXPR);
            while self.eat(SyntaxKind::COMMA) {
                if !self.at_expr_start() {
                    break;
                }
                self.parse_expr();
            }
            self.finish_node();
        }
    }

    /// Target = '*'? BitwiseOr
    pub(super) fn parse_target(&mut self) {
        if self.at(SyntaxKind::STAR) {
            self.start_node(SyntaxKind::STARRED_EXPR);
            self.bump();
            self.parse_expr_bp(BITWISE_OR_BP);
            self.finish_node();
        } else {
            self.parse_expr_bp(BITWISE_OR_BP);
        }
    }

    /// TargetList = Target (',' Target)* ','?
    ///
    /// Targets stop before `in`, so `for a, b in x` splits correctly.
    pub(super) fn parse_target_list(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_target();
        if self.at(SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::TUPLE_EXPR);
            while self.eat(SyntaxKind::COMMA) {
                if !self.at_expr_start() {
                    break;
                }
                self.parse_target();
            }
            self.finish_node();
        }
    }

    /// YieldExpr = 'yield' ('from' Expr | StarExpressions)?
    pub(super) fn parse_yield_expr(&mut self) {
        self.start_node(SyntaxKind::YIELD_EXPR);
        self.bump();
        if self.eat(SyntaxKind::FROM_KW) {
            self.parse_expr();
        } else if self.at_expr_start() {
            self.parse_star_expressions();
        }
        self.finish_node();
    }

    fn parse_expr_bp(&mut self, min_bp: u8) {
        if !self.enter() {
            self.error_recover("expression nested too deeply", &[SyntaxKind::NEWLINE]);
            self.leave();
            return;
        }

        let checkpoint = self.checkpoint();
        match self.current_kind() {
            SyntaxKind::LAMBDA_KW => {
                self.parse_lambda();
                self.leave();
                return;
            }
            SyntaxKind::NOT_KW => {
                self.start_node(SyntaxKind::UNARY_EXPR);
                self.bump();
                self.parse_expr_bp(NOT_BP);
                self.finish_node();
            }
            SyntaxKind::MINUS | SyntaxKind::PLUS | SyntaxKind::TILDE => {
                self.start_node(SyntaxKind::UNARY_EXPR);
                self.bump();
                self.parse_expr_bp(UNARY_BP);
                self.finish_node();
            }
            SyntaxKind::AWAIT_KW => {
                self.start_node(SyntaxKind::AWAIT_EXPR);
                self.bump();
                self.parse_expr_bp(AWAIT_BP);
                self.finish_node();
            }
            _ => self.parse_postfix_expr(),
        }

        let mut wraps = 0;
        loop {
            let op = self.current_kind();

            if op == SyntaxKind::IF_KW && min_bp <= TERNARY_BP {
                if !self.wrap_at(checkpoint, SyntaxKind::TERNARY_EXPR) {
                    break;
                }
                wraps += 1;
                self.bump();
                self.parse_expr_bp(TERNARY_BP + 1);
                self.expect(SyntaxKind::ELSE_KW);
                self.parse_expr();
                self.finish_node();
                continue;
            }

            // `not` is only infix as part of `not in`
            if op == SyntaxKind::NOT_KW && self.nth(1) != SyntaxKind::IN_KW {
                break;
            }

            let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            if !self.wrap_at(checkpoint, SyntaxKind::BIN_EXPR) {
                break;
            }
            wraps += 1;
            self.bump();
            match op {
                SyntaxKind::NOT_KW => {
                    self.bump();
                }
                SyntaxKind::IS_KW => {
                    self.eat(SyntaxKind::NOT_KW);
                }
                _ => {}
            }
            self.parse_expr_bp(r_bp);
            self.finish_node();
        }

        for _ in 0..wraps {
            self.leave();
        }
        self.leave();
    }

    /// Lambda = 'lambda' ParamList? ':' Expr
    fn parse_lambda(&mut self) {
        self.start_node(SyntaxKind::LAMBDA_EXPR);
        self.bump();
        self.parse_param_list(true);
        self.expect(SyntaxKind::COLON);
        self.parse_expr();
        self.finish_node();
    }

    /// Postfix = Atom ('.' Name | ArgList | '[' Subscript ']')*
    fn parse_postfix_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_atom();
        let mut wraps = 0;
        loop {
            let kind = match self.current_kind() {
                SyntaxKind::DOT => SyntaxKind::ATTRIBUTE_EXPR,
                SyntaxKind::L_PAREN => SyntaxKind::CALL_EXPR,
                SyntaxKind::L_BRACKET => SyntaxKind::SUBSCRIPT_EXPR,
                _ => break,
            };
            if !self.wrap_at(checkpoint, kind) {
                break;
            }
            wraps += 1;
            match kind {
                SyntaxKind::ATTRIBUTE_EXPR => {
                    self.bump();
                    self.expect(SyntaxKind::IDENT);
                }
                SyntaxKind::CALL_EXPR => self.parse_arg_list(),
                _ => {
                    self.bump();
                    self.parse_subscript_items();
                    self.expect(SyntaxKind::R_BRACKET);
                }
            }
            self.finish_node();
        }
        for _ in 0..wraps {
            self.leave();
        }
    }

    fn parse_atom(&mut self) {
        match self.current_kind() {
            SyntaxKind::IDENT => self.token_node(SyntaxKind::NAME_REF),
            SyntaxKind::STRING => {
                // adjacent literals concatenate: "a" "b"
                self.start_node(SyntaxKind::LITERAL);
                while self.at(SyntaxKind::STRING) {
                    self.bump();
                }
                self.finish_node();
            }
            SyntaxKind::NUMBER
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NONE_KW
            | SyntaxKind::ELLIPSIS => self.token_node(SyntaxKind::LITERAL),
            SyntaxKind::L_PAREN => self.parse_paren_expr(),
            SyntaxKind::L_BRACKET => self.parse_list_expr(),
            SyntaxKind::L_BRACE => self.parse_brace_expr(),
            SyntaxKind::NEWLINE
            | SyntaxKind::EOF
            | SyntaxKind::INDENT
            | SyntaxKind::DEDENT
            | SyntaxKind::R_PAREN
            | SyntaxKind::R_BRACKET
            | SyntaxKind::R_BRACE => {
                self.error(format!("expected expression, found {:?}", self.current_kind()));
            }
            kind => {
                self.error(format!("expected expression, found {:?}", kind));
                self.token_node(SyntaxKind::ERROR);
            }
        }
    }

    /// ParenExpr = '(' ')' | '(' YieldExpr ')' | '(' StarExpr Comprehension? ')' | Tuple
    fn parse_paren_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();

        let kind = if self.at(SyntaxKind::R_PAREN) {
            SyntaxKind::TUPLE_EXPR
        } else if self.at(SyntaxKind::YIELD_KW) {
            self.parse_yield_expr();
            SyntaxKind::PAREN_EXPR
        } else {
            let element = self.checkpoint();
            self.parse_star_expr();
            if self.at_comp_for() {
                self.start_node_at(element, SyntaxKind::COMPREHENSION);
                self.parse_comp_clauses();
                self.finish_node();
                SyntaxKind::PAREN_EXPR
            } else if self.at(SyntaxKind::COMMA) {
                while self.eat(SyntaxKind::COMMA) {
                    if self.at(SyntaxKind::R_PAREN) {
                        break;
                    }
                    self.parse_star_expr();
                }
                SyntaxKind::TUPLE_EXPR
            } else {
                SyntaxKind::PAREN_EXPR
            }
        };

        self.start_node_at(checkpoint, kind);
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// ListExpr = '[' (StarExpr Comprehension | StarExpr (',' StarExpr)* ','?)? ']'
    fn parse_list_expr(&mut self) {
        self.start_node(SyntaxKind::LIST_EXPR);
        self.bump();
        if !self.at(SyntaxKind::R_BRACKET) {
            let element = self.checkpoint();
            self.parse_star_expr();
            if self.at_comp_for() {
                self.start_node_at(element, SyntaxKind::COMPREHENSION);
                self.parse_comp_clauses();
                self.finish_node();
            } else {
                while self.eat(SyntaxKind::COMMA) {
                    if self.at(SyntaxKind::R_BRACKET) {
                        break;
                    }
                    self.parse_star_expr();
                }
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    /// DictExpr / SetExpr, including their comprehension forms
    fn parse_brace_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();

        if self.at(SyntaxKind::R_BRACE) {
            self.start_node_at(checkpoint, SyntaxKind::DICT_EXPR);
            self.bump();
            self.finish_node();
            return;
        }

        let element = self.checkpoint();
        let is_dict = if self.eat(SyntaxKind::STAR_STAR) {
            self.parse_expr_bp(BITWISE_OR_BP);
            true
        } else {
            self.parse_star_expr();
            if self.eat(SyntaxKind::COLON) {
                self.parse_expr();
                true
            } else {
                false
            }
        };

        if self.at_comp_for() {
            self.start_node_at(element, SyntaxKind::COMPREHENSION);
            self.parse_comp_clauses();
            self.finish_node();
        } else {
            while self.eat(SyntaxKind::COMMA) {
                if self.at(SyntaxKind::R_BRACE) {
                    break;
                }
                if is_dict {
                    self.parse_dict_item();
                } else {
                    self.parse_star_expr();
                }
            }
        }

        let kind = if is_dict {
            SyntaxKind::DICT_EXPR
        } else {
            SyntaxKind::SET_EXPR
        };
        self.start_node_at(checkpoint, kind);
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_dict_item(&mut self) {
        if self.eat(SyntaxKind::STAR_STAR) {
            self.parse_expr_bp(BITWISE_OR_BP);
        } else {
            self.parse_expr();
            self.expect(SyntaxKind::COLON);
            self.parse_expr();
        }
    }

    fn at_comp_for(&self) -> bool {
        self.at(SyntaxKind::FOR_KW)
            || (self.at(SyntaxKind::ASYNC_KW) && self.nth(1) == SyntaxKind::FOR_KW)
    }

    /// CompClauses = ('async'? 'for' Targets 'in' OrTest ('if' OrTest)*)+
    fn parse_comp_clauses(&mut self) {
        while self.at_comp_for() {
            self.eat(SyntaxKind::ASYNC_KW);
            self.bump();
            self.parse_target_list();
            self.expect(SyntaxKind::IN_KW);
            self.parse_expr_bp(TERNARY_BP + 1);
            while self.eat(SyntaxKind::IF_KW) {
                self.parse_expr_bp(TERNARY_BP + 1);
            }
        }
    }

    /// Subscript = SliceItem (',' SliceItem)* ','?
    fn parse_subscript_items(&mut self) {
        loop {
            self.parse_slice_item();
            if !self.eat(SyntaxKind::COMMA) || self.at(SyntaxKind::R_BRACKET) {
                break;
            }
        }
    }

    /// SliceItem = Expr? ':' Expr? (':' Expr?)? | StarExpr
    fn parse_slice_item(&mut self) {
        let checkpoint = self.checkpoint();
        if !self.at(SyntaxKind::COLON) {
            self.parse_star_expr();
        }
        if self.at(SyntaxKind::COLON) {
            self.start_node_at(checkpoint, SyntaxKind::SLICE);
            self.bump();
            if !self.at_any(&[SyntaxKind::COLON, SyntaxKind::COMMA, SyntaxKind::R_BRACKET]) {
                self.parse_expr();
            }
            if self.eat(SyntaxKind::COLON)
                && !self.at_any(&[SyntaxKind::COMMA, SyntaxKind::R_BRACKET])
            {
                self.parse_expr();
            }
            self.finish_node();
        }
    }

    /// ArgList = '(' Arg (',' Arg)* ','? ')'
    pub(super) fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);
        self.bump();
        while !self.at(SyntaxKind::R_PAREN) && !self.at_eof() && !self.at(SyntaxKind::NEWLINE) {
            self.parse_arg();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// Arg = Name '=' Expr | '*' Expr | '**' Expr | NamedExpr Comprehension?
    fn parse_arg(&mut self) {
        self.start_node(SyntaxKind::ARG);
        match self.current_kind() {
            SyntaxKind::STAR | SyntaxKind::STAR_STAR => {
                self.bump();
                self.parse_expr();
            }
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::EQ => {
                self.bump();
                self.bump();
                self.parse_expr();
            }
            _ => {
                let element = self.checkpoint();
                self.parse_named_expr();
                if self.at_comp_for() {
                    self.start_node_at(element, SyntaxKind::COMPREHENSION);
                    self.parse_comp_clauses();
                    self.finish_node();
                }
            }
        }
        self.finish_node();
    }
}
