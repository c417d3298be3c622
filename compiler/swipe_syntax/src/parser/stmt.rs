//! Statements and blocks.

use swipe_ir::ensure_sufficient_stack;

use super::Parser;
use crate::ast::{ExprId, ExprKind, StmtId, StmtKind};
use crate::token::TokenKind;

#[derive(Copy, Clone, Eq, PartialEq)]
enum Mode {
    Basic,
    LabelOk,
    RangeOk,
}

/// Result of a simple statement in a `for` header may be a range clause.
enum Simple {
    Stmt(StmtId),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
        start: u32,
    },
}

impl Parser<'_> {
    fn alloc_stmt(&mut self, kind: StmtKind, start: u32) -> StmtId {
        let span = self.span_from(start);
        self.file.alloc_stmt(kind, span)
    }

    pub(super) fn parse_block(&mut self) -> StmtId {
        let start = self.expect(TokenKind::LBrace).start;
        let list = self.parse_stmt_list();
        self.expect(TokenKind::RBrace);
        self.alloc_stmt(StmtKind::Block(list), start)
    }

    fn parse_stmt_list(&mut self) -> Vec<StmtId> {
        let mut list = Vec::new();
        while !matches!(
            self.kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            let before = self.pos;
            let stmt = self.parse_stmt();
            if !matches!(self.file.stmt(stmt).kind, StmtKind::Empty) {
                list.push(stmt);
            }
            if self.pos == before {
                self.bump();
            }
        }
        list
    }

    fn parse_stmt(&mut self) -> StmtId {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> StmtId {
        let start = self.tok().span.start;
        match self.kind() {
            kind @ (TokenKind::Const | TokenKind::Type | TokenKind::Var) => {
                let decl = self.parse_gen_decl(kind);
                self.alloc_stmt(StmtKind::Decl(decl), start)
            }
            TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String
            | TokenKind::Func
            | TokenKind::LParen
            | TokenKind::LBrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface
            | TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::And
            | TokenKind::Xor
            | TokenKind::Arrow
            | TokenKind::Not
            | TokenKind::Tilde => {
                let stmt = self.parse_simple_stmt(Mode::LabelOk);
                if !matches!(self.file.stmt(stmt).kind, StmtKind::Labeled { .. }) {
                    self.expect_semi();
                }
                stmt
            }
            kind @ (TokenKind::Go | TokenKind::Defer) => {
                self.bump();
                let call = self.parse_expr();
                let span_end = self.span_from(start);
                self.expect_semi();
                let kind = if kind == TokenKind::Go {
                    StmtKind::Go(call)
                } else {
                    StmtKind::Defer(call)
                };
                self.file.alloc_stmt(kind, span_end)
            }
            TokenKind::Return => {
                self.bump();
                let results = if matches!(self.kind(), TokenKind::Semicolon | TokenKind::RBrace) {
                    Vec::new()
                } else {
                    self.parse_expr_list()
                };
                let stmt = self.alloc_stmt(StmtKind::Return(results), start);
                self.expect_semi();
                stmt
            }
            tok @ (TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Goto
            | TokenKind::Fallthrough) => {
                self.bump();
                let label = if tok != TokenKind::Fallthrough && self.at(TokenKind::Ident) {
                    Some(self.parse_ident())
                } else {
                    None
                };
                let stmt = self.alloc_stmt(StmtKind::Branch { tok, label }, start);
                self.expect_semi();
                stmt
            }
            TokenKind::LBrace => {
                let block = self.parse_block();
                self.expect_semi();
                block
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::Select => self.parse_select_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Semicolon => {
                let span = self.bump().span;
                self.file.alloc_stmt(StmtKind::Empty, span)
            }
            TokenKind::RBrace => self.alloc_stmt(StmtKind::Empty, start),
            _ => {
                self.error_expected("statement");
                self.sync_stmt();
                self.alloc_stmt(StmtKind::Bad, start)
            }
        }
    }

    fn parse_simple_stmt(&mut self, mode: Mode) -> StmtId {
        match self.parse_simple(mode) {
            Simple::Stmt(stmt) => stmt,
            Simple::Range { x, start, .. } => {
                self.error_at(self.span_from(start), "unexpected range clause");
                self.alloc_stmt(StmtKind::Expr(x), start)
            }
        }
    }

    fn parse_simple(&mut self, mode: Mode) -> Simple {
        let start = self.tok().span.start;
        if mode == Mode::RangeOk && self.eat(TokenKind::Range) {
            let x = self.parse_expr();
            return Simple::Range {
                key: None,
                value: None,
                define: false,
                x,
                start,
            };
        }

        let lhs = self.parse_expr_list();
        let op = self.kind();
        if op.is_assign_op() {
            self.bump();
            if mode == Mode::RangeOk
                && self.at(TokenKind::Range)
                && matches!(op, TokenKind::Assign | TokenKind::Define)
            {
                self.bump();
                let x = self.parse_expr();
                if lhs.len() > 2 {
                    self.error_at(self.span_from(start), "range clause permits at most two iteration variables");
                }
                return Simple::Range {
                    key: lhs.first().copied(),
                    value: lhs.get(1).copied(),
                    define: op == TokenKind::Define,
                    x,
                    start,
                };
            }
            let rhs = self.parse_expr_list();
            return Simple::Stmt(self.alloc_stmt(StmtKind::Assign { lhs, op, rhs }, start));
        }

        if lhs.len() > 1 {
            self.error_expected("1 expression");
        }
        let x = lhs[0];
        let stmt = match self.kind() {
            TokenKind::Colon if mode == Mode::LabelOk => {
                if let ExprKind::Ident(label) = &self.file.expr(x).kind {
                    let label = label.clone();
                    self.bump();
                    let stmt = if self.at(TokenKind::RBrace) {
                        let at = self.tok().span.start;
                        self.alloc_stmt(StmtKind::Empty, at)
                    } else {
                        self.parse_stmt()
                    };
                    StmtKind::Labeled { label, stmt }
                } else {
                    StmtKind::Expr(x)
                }
            }
            TokenKind::Arrow => {
                self.bump();
                let value = self.parse_expr();
                StmtKind::Send { chan: x, value }
            }
            kind @ (TokenKind::Inc | TokenKind::Dec) => {
                self.bump();
                StmtKind::IncDec {
                    x,
                    inc: kind == TokenKind::Inc,
                }
            }
            _ => StmtKind::Expr(x),
        };
        Simple::Stmt(self.alloc_stmt(stmt, start))
    }

    /// Expression of an expression statement used as a condition.
    fn stmt_as_expr(&mut self, stmt: Option<StmtId>, what: &str) -> Option<ExprId> {
        let stmt = stmt?;
        if let StmtKind::Expr(x) = self.file.stmt(stmt).kind {
            return Some(x);
        }
        let span = self.file.stmt(stmt).span;
        self.error_at(span, format!("cannot use statement as {what}"));
        Some(self.file.alloc_expr(ExprKind::Bad, span))
    }

    fn parse_if_stmt(&mut self) -> StmtId {
        let start = self.expect(TokenKind::If).start;
        let (init, cond) = self.parse_if_header();
        let then = self.parse_block();
        let els = if self.eat(TokenKind::Else) {
            match self.kind() {
                TokenKind::If => Some(self.parse_if_stmt()),
                TokenKind::LBrace => {
                    let block = self.parse_block();
                    self.expect_semi();
                    Some(block)
                }
                _ => {
                    self.error_expected("if statement or block");
                    None
                }
            }
        } else {
            self.expect_semi();
            None
        };
        self.alloc_stmt(
            StmtKind::If {
                init,
                cond,
                then,
                els,
            },
            start,
        )
    }

    fn parse_if_header(&mut self) -> (Option<StmtId>, ExprId) {
        if self.at(TokenKind::LBrace) {
            let span = self.tok().span;
            self.error_at(span, "missing condition in if statement");
            return (None, self.file.alloc_expr(ExprKind::Bad, span));
        }
        let prev = self.expr_lev;
        self.expr_lev = -1;
        let mut init = None;
        let mut cond = None;
        if !self.at(TokenKind::Semicolon) {
            cond = Some(self.parse_simple_stmt(Mode::Basic));
        }
        if self.eat(TokenKind::Semicolon) {
            init = cond.take();
            if !self.at(TokenKind::LBrace) {
                cond = Some(self.parse_simple_stmt(Mode::Basic));
            }
        }
        self.expr_lev = prev;
        let cond = match self.stmt_as_expr(cond, "if condition") {
            Some(cond) => cond,
            None => {
                let span = self.tok().span;
                self.error_at(span, "missing condition in if statement");
                self.file.alloc_expr(ExprKind::Bad, span)
            }
        };
        (init, cond)
    }

    fn parse_switch_stmt(&mut self) -> StmtId {
        let start = self.expect(TokenKind::Switch).start;
        let prev = self.expr_lev;
        self.expr_lev = -1;
        let mut init = None;
        let mut tag = None;
        if !self.at(TokenKind::LBrace) {
            if !self.at(TokenKind::Semicolon) {
                tag = Some(self.parse_simple_stmt(Mode::Basic));
            }
            if self.eat(TokenKind::Semicolon) {
                init = tag.take();
                if !self.at(TokenKind::LBrace) {
                    tag = Some(self.parse_simple_stmt(Mode::Basic));
                }
            }
        }
        self.expr_lev = prev;

        let type_switch = tag.is_some_and(|s| self.is_type_switch_guard(s));
        self.expect(TokenKind::LBrace);
        let mut body = Vec::new();
        while self.at(TokenKind::Case) || self.at(TokenKind::Default) {
            body.push(self.parse_case_clause(type_switch));
        }
        self.expect(TokenKind::RBrace);
        self.expect_semi();

        let kind = match (type_switch, tag) {
            (true, Some(assign)) => StmtKind::TypeSwitch { init, assign, body },
            (_, tag) => {
                let tag = self.stmt_as_expr(tag, "switch expression");
                StmtKind::Switch { init, tag, body }
            }
        };
        self.alloc_stmt(kind, start)
    }

    /// `x.(type)` or `v := x.(type)`.
    fn is_type_switch_guard(&self, stmt: StmtId) -> bool {
        let is_guard = |x: ExprId| {
            matches!(
                self.file.expr(self.file.unparen(x)).kind,
                ExprKind::TypeAssert { ty: None, .. }
            )
        };
        match &self.file.stmt(stmt).kind {
            StmtKind::Expr(x) => is_guard(*x),
            StmtKind::Assign {
                lhs,
                op: TokenKind::Define,
                rhs,
            } => lhs.len() == 1 && rhs.len() == 1 && is_guard(rhs[0]),
            _ => false,
        }
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> StmtId {
        let start = self.tok().span.start;
        let list = if self.eat(TokenKind::Case) {
            if type_switch {
                let mut types = vec![self.parse_type()];
                while self.eat(TokenKind::Comma) {
                    types.push(self.parse_type());
                }
                Some(types)
            } else {
                Some(self.parse_expr_list())
            }
        } else {
            self.expect(TokenKind::Default);
            None
        };
        self.expect(TokenKind::Colon);
        let body = self.parse_stmt_list();
        self.alloc_stmt(StmtKind::CaseClause { list, body }, start)
    }

    fn parse_select_stmt(&mut self) -> StmtId {
        let start = self.expect(TokenKind::Select).start;
        self.expect(TokenKind::LBrace);
        let mut body = Vec::new();
        while self.at(TokenKind::Case) || self.at(TokenKind::Default) {
            body.push(self.parse_comm_clause());
        }
        self.expect(TokenKind::RBrace);
        self.expect_semi();
        self.alloc_stmt(StmtKind::Select { body }, start)
    }

    fn parse_comm_clause(&mut self) -> StmtId {
        let start = self.tok().span.start;
        let comm = if self.eat(TokenKind::Case) {
            let comm_start = self.tok().span.start;
            let lhs = self.parse_expr_list();
            let kind = match self.kind() {
                TokenKind::Arrow => {
                    self.bump();
                    let value = self.parse_expr();
                    StmtKind::Send {
                        chan: lhs[0],
                        value,
                    }
                }
                op @ (TokenKind::Assign | TokenKind::Define) => {
                    self.bump();
                    let rhs = vec![self.parse_expr()];
                    StmtKind::Assign { lhs, op, rhs }
                }
                _ => StmtKind::Expr(lhs[0]),
            };
            Some(self.alloc_stmt(kind, comm_start))
        } else {
            self.expect(TokenKind::Default);
            None
        };
        self.expect(TokenKind::Colon);
        let body = self.parse_stmt_list();
        self.alloc_stmt(StmtKind::CommClause { comm, body }, start)
    }

    fn parse_for_stmt(&mut self) -> StmtId {
        let start = self.expect(TokenKind::For).start;
        let prev = self.expr_lev;
        self.expr_lev = -1;
        let mut init = None;
        let mut cond = None;
        let mut post = None;
        let mut range = None;
        if !self.at(TokenKind::LBrace) {
            if !self.at(TokenKind::Semicolon) {
                match self.parse_simple(Mode::RangeOk) {
                    Simple::Stmt(stmt) => cond = Some(stmt),
                    r @ Simple::Range { .. } => range = Some(r),
                }
            }
            if range.is_none() && self.eat(TokenKind::Semicolon) {
                init = cond.take();
                if !self.at(TokenKind::Semicolon) {
                    cond = Some(self.parse_simple_stmt(Mode::Basic));
                }
                self.expect(TokenKind::Semicolon);
                if !self.at(TokenKind::LBrace) {
                    post = Some(self.parse_simple_stmt(Mode::Basic));
                }
            }
        }
        self.expr_lev = prev;
        let body = self.parse_block();
        self.expect_semi();

        let kind = match range {
            Some(Simple::Range {
                key,
                value,
                define,
                x,
                ..
            }) => StmtKind::Range {
                key,
                value,
                define,
                x,
                body,
            },
            _ => {
                let cond = self.stmt_as_expr(cond, "for condition");
                StmtKind::For {
                    init,
                    cond,
                    post,
                    body,
                }
            }
        };
        self.alloc_stmt(kind, start)
    }
}
