//! Types and expressions.

use swipe_ir::ensure_sufficient_stack;

use super::Parser;
use crate::ast::{ChanDir, ExprId, ExprKind, Field, FuncSig, Ident, LitKind};
use crate::token::TokenKind;

/// Tokens that can begin a type.
fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::LBrack
            | TokenKind::Mul
            | TokenKind::Func
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Arrow
            | TokenKind::LParen
    )
}

/// One entry of a parameter list before grouping.
struct ParamEntry {
    name: Option<Ident>,
    ty: Option<ExprId>,
    start: u32,
}

impl Parser<'_> {
    fn alloc(&mut self, kind: ExprKind, start: u32) -> ExprId {
        let span = self.span_from(start);
        self.file.alloc_expr(kind, span)
    }

    fn start_of(&self, id: ExprId) -> u32 {
        self.file.expr(id).span.start
    }

    fn ident_expr(&mut self, ident: Ident) -> ExprId {
        let span = ident.span;
        self.file.alloc_expr(ExprKind::Ident(ident), span)
    }

    fn bad_expr(&mut self) -> ExprId {
        let at = self.tok().span.start;
        self.file
            .alloc_expr(ExprKind::Bad, swipe_ir::Span::new(at, at))
    }

    // ─── Types ───

    pub(super) fn parse_type(&mut self) -> ExprId {
        ensure_sufficient_stack(|| self.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> ExprId {
        let start = self.tok().span.start;
        match self.kind() {
            TokenKind::Ident => self.parse_type_name(),
            TokenKind::LBrack => self.parse_array_type(),
            TokenKind::Mul => {
                self.bump();
                let elem = self.parse_type();
                self.alloc(ExprKind::Star(elem), start)
            }
            TokenKind::Func => {
                self.bump();
                let sig = self.parse_signature(start);
                self.alloc(ExprKind::FuncType(sig), start)
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::Map => {
                self.bump();
                self.expect(TokenKind::LBrack);
                let key = self.parse_type();
                self.expect(TokenKind::RBrack);
                let value = self.parse_type();
                self.alloc(ExprKind::MapType { key, value }, start)
            }
            TokenKind::Chan => {
                self.bump();
                let dir = if self.eat(TokenKind::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let value = self.parse_type();
                self.alloc(ExprKind::ChanType { dir, value }, start)
            }
            TokenKind::Arrow => {
                self.bump();
                self.expect(TokenKind::Chan);
                let value = self.parse_type();
                self.alloc(
                    ExprKind::ChanType {
                        dir: ChanDir::Recv,
                        value,
                    },
                    start,
                )
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_type();
                self.expect(TokenKind::RParen);
                self.alloc(ExprKind::Paren(inner), start)
            }
            _ => {
                self.error_expected("type");
                self.bad_expr()
            }
        }
    }

    /// `T`, `pkg.T`, `T[A, B]`.
    fn parse_type_name(&mut self) -> ExprId {
        let ident = self.parse_ident();
        let start = ident.span.start;
        let mut x = self.ident_expr(ident);
        if self.eat(TokenKind::Period) {
            let sel = self.parse_ident();
            x = self.alloc(ExprKind::Selector { x, sel }, start);
        }
        if self.at(TokenKind::LBrack) {
            x = self.parse_type_args(x);
        }
        x
    }

    fn parse_type_args(&mut self, x: ExprId) -> ExprId {
        let start = self.start_of(x);
        self.expect(TokenKind::LBrack);
        self.expr_lev += 1;
        let mut indices = Vec::new();
        while !self.at(TokenKind::RBrack) && !self.at(TokenKind::Eof) {
            indices.push(self.parse_type());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrack);
        self.alloc(ExprKind::Index { x, indices }, start)
    }

    fn parse_array_type(&mut self) -> ExprId {
        let start = self.expect(TokenKind::LBrack).start;
        let len = if self.eat(TokenKind::RBrack) {
            None
        } else if self.at(TokenKind::Ellipsis) && self.peek_kind(1) == TokenKind::RBrack {
            let e_start = self.bump().span.start;
            let len = self.alloc(ExprKind::Ellipsis(None), e_start);
            self.expect(TokenKind::RBrack);
            Some(len)
        } else {
            self.expr_lev += 1;
            let len = self.parse_expr();
            self.expr_lev -= 1;
            self.expect(TokenKind::RBrack);
            Some(len)
        };
        let elem = self.parse_type();
        self.alloc(ExprKind::ArrayType { len, elem }, start)
    }

    /// After a field or parameter name, `[` opens either an array/slice
    /// type (`a [4]int`, `a []int`) or a generic instantiation (`T[int]`).
    fn parse_array_field_or_instance(&mut self, name: Ident) -> (Option<Ident>, ExprId) {
        let start = self.expect(TokenKind::LBrack).start;
        if self.eat(TokenKind::RBrack) {
            let elem = self.parse_type();
            let ty = self.alloc(ExprKind::ArrayType { len: None, elem }, start);
            return (Some(name), ty);
        }
        if self.at(TokenKind::Ellipsis) && self.peek_kind(1) == TokenKind::RBrack {
            let e_start = self.bump().span.start;
            let len = self.alloc(ExprKind::Ellipsis(None), e_start);
            self.expect(TokenKind::RBrack);
            let elem = self.parse_type();
            let ty = self.alloc(
                ExprKind::ArrayType {
                    len: Some(len),
                    elem,
                },
                start,
            );
            return (Some(name), ty);
        }
        self.expr_lev += 1;
        let mut args = Vec::new();
        while !self.at(TokenKind::RBrack) && !self.at(TokenKind::Eof) {
            args.push(self.parse_expr());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrack);
        if args.len() == 1 && starts_type(self.kind()) {
            let elem = self.parse_type();
            let ty = self.alloc(
                ExprKind::ArrayType {
                    len: Some(args[0]),
                    elem,
                },
                start,
            );
            return (Some(name), ty);
        }
        let name_start = name.span.start;
        let x = self.ident_expr(name);
        let ty = self.alloc(ExprKind::Index { x, indices: args }, name_start);
        (None, ty)
    }

    pub(super) fn parse_signature(&mut self, start: u32) -> FuncSig {
        let params = self.parse_params();
        let results = self.parse_results();
        FuncSig {
            type_params: Vec::new(),
            params,
            results,
            span: self.span_from(start),
        }
    }

    pub(super) fn parse_results(&mut self) -> Vec<Field> {
        if self.at(TokenKind::LParen) {
            return self.parse_params();
        }
        if starts_type(self.kind()) {
            let start = self.tok().span.start;
            let ty = self.parse_type();
            return vec![Field {
                doc: None,
                names: Vec::new(),
                ty,
                tag: None,
                comment: None,
                span: self.span_from(start),
            }];
        }
        Vec::new()
    }

    /// `(a, b int, c ...string)` or `(int, error)`.
    pub(super) fn parse_params(&mut self) -> Vec<Field> {
        self.expect(TokenKind::LParen);
        let mut entries = Vec::new();
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            entries.push(self.parse_param_entry());
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RParen);

        let named = entries.iter().any(|e| e.name.is_some() && e.ty.is_some());
        let mut fields = Vec::with_capacity(entries.len());
        if named {
            let mut pending: Vec<Ident> = Vec::new();
            let mut group_start = None;
            for entry in entries {
                group_start.get_or_insert(entry.start);
                match (entry.name, entry.ty) {
                    (Some(name), None) => pending.push(name),
                    (name, Some(ty)) => {
                        if let Some(name) = name {
                            pending.push(name);
                        } else {
                            let span = self.file.expr(ty).span;
                            self.error_at(span, "mixed named and unnamed parameters");
                        }
                        let start = group_start.take().unwrap_or(entry.start);
                        let end = self.file.expr(ty).span.end;
                        fields.push(Field {
                            doc: None,
                            names: std::mem::take(&mut pending),
                            ty,
                            tag: None,
                            comment: None,
                            span: swipe_ir::Span::new(start, end),
                        });
                    }
                    (None, None) => {}
                }
            }
            if let Some(last) = pending.last() {
                let span = last.span;
                self.error_at(span, "mixed named and unnamed parameters");
                let ty = self.file.alloc_expr(ExprKind::Bad, span);
                fields.push(Field {
                    doc: None,
                    names: pending,
                    ty,
                    tag: None,
                    comment: None,
                    span,
                });
            }
        } else {
            for entry in entries {
                let ty = match (entry.name, entry.ty) {
                    (_, Some(ty)) => ty,
                    (Some(name), None) => self.ident_expr(name),
                    (None, None) => continue,
                };
                let span = self.file.expr(ty).span;
                fields.push(Field {
                    doc: None,
                    names: Vec::new(),
                    ty,
                    tag: None,
                    comment: None,
                    span,
                });
            }
        }
        fields
    }

    fn parse_param_entry(&mut self) -> ParamEntry {
        let start = self.tok().span.start;
        match self.kind() {
            TokenKind::Ident => {
                let name = self.parse_ident();
                match self.kind() {
                    TokenKind::Period => {
                        let x = self.ident_expr(name);
                        self.bump();
                        let sel = self.parse_ident();
                        let mut ty = self.alloc(ExprKind::Selector { x, sel }, start);
                        if self.at(TokenKind::LBrack) {
                            ty = self.parse_type_args(ty);
                        }
                        ParamEntry {
                            name: None,
                            ty: Some(ty),
                            start,
                        }
                    }
                    TokenKind::LBrack => {
                        let (name, ty) = self.parse_array_field_or_instance(name);
                        ParamEntry {
                            name,
                            ty: Some(ty),
                            start,
                        }
                    }
                    TokenKind::Ellipsis => {
                        let e_start = self.bump().span.start;
                        let elem = self.parse_type();
                        let ty = self.alloc(ExprKind::Ellipsis(Some(elem)), e_start);
                        ParamEntry {
                            name: Some(name),
                            ty: Some(ty),
                            start,
                        }
                    }
                    kind if starts_type(kind) => {
                        let ty = self.parse_type();
                        ParamEntry {
                            name: Some(name),
                            ty: Some(ty),
                            start,
                        }
                    }
                    _ => ParamEntry {
                        name: Some(name),
                        ty: None,
                        start,
                    },
                }
            }
            TokenKind::Ellipsis => {
                self.bump();
                let elem = self.parse_type();
                let ty = self.alloc(ExprKind::Ellipsis(Some(elem)), start);
                ParamEntry {
                    name: None,
                    ty: Some(ty),
                    start,
                }
            }
            _ => {
                let ty = self.parse_type();
                ParamEntry {
                    name: None,
                    ty: Some(ty),
                    start,
                }
            }
        }
    }

    fn parse_struct_type(&mut self) -> ExprId {
        let start = self.expect(TokenKind::Struct).start;
        self.expect(TokenKind::LBrace);
        let mut fields = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            if let Some(field) = self.parse_field_decl() {
                fields.push(field);
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace);
        self.alloc(ExprKind::StructType { fields }, start)
    }

    fn parse_field_decl(&mut self) -> Option<Field> {
        let doc = self.lead_comment();
        let start = self.tok().span.start;
        let (names, ty) = match self.kind() {
            TokenKind::Ident => {
                let name = self.parse_ident();
                match self.kind() {
                    TokenKind::Period => {
                        let x = self.ident_expr(name);
                        self.bump();
                        let sel = self.parse_ident();
                        let mut ty = self.alloc(ExprKind::Selector { x, sel }, start);
                        if self.at(TokenKind::LBrack) {
                            ty = self.parse_type_args(ty);
                        }
                        (Vec::new(), ty)
                    }
                    TokenKind::LBrack => {
                        let (name, ty) = self.parse_array_field_or_instance(name);
                        (name.into_iter().collect(), ty)
                    }
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::String => {
                        (Vec::new(), self.ident_expr(name))
                    }
                    TokenKind::Comma => {
                        let mut names = vec![name];
                        while self.eat(TokenKind::Comma) {
                            names.push(self.parse_ident());
                        }
                        let ty = self.parse_type();
                        (names, ty)
                    }
                    _ => {
                        let ty = self.parse_type();
                        (vec![name], ty)
                    }
                }
            }
            TokenKind::Mul => {
                self.bump();
                let elem = self.parse_type_name();
                (Vec::new(), self.alloc(ExprKind::Star(elem), start))
            }
            _ => {
                self.error_expected("field name or embedded type");
                self.sync_stmt();
                return None;
            }
        };
        let tag = if self.at(TokenKind::String) {
            let tok = self.bump();
            Some(self.text(tok).to_string())
        } else {
            None
        };
        let span = self.span_from(start);
        let comment = self.line_comment();
        self.expect_semi();
        Some(Field {
            doc,
            names,
            ty,
            tag,
            comment,
            span,
        })
    }

    fn parse_interface_type(&mut self) -> ExprId {
        let start = self.expect(TokenKind::Interface).start;
        self.expect(TokenKind::LBrace);
        let mut elems = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            let doc = self.lead_comment();
            let elem_start = self.tok().span.start;
            let (names, ty) = if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::LParen {
                let name = self.parse_ident();
                let sig_start = self.tok().span.start;
                let sig = self.parse_signature(sig_start);
                let ty = self.alloc(ExprKind::FuncType(sig), sig_start);
                (vec![name], ty)
            } else {
                (Vec::new(), self.parse_type_elem())
            };
            let span = self.span_from(elem_start);
            let comment = self.line_comment();
            self.expect_semi();
            elems.push(Field {
                doc,
                names,
                ty,
                tag: None,
                comment,
                span,
            });
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace);
        self.alloc(ExprKind::InterfaceType { elems }, start)
    }

    /// `~int | ~string | fmt.Stringer`.
    pub(super) fn parse_type_elem(&mut self) -> ExprId {
        let start = self.tok().span.start;
        let mut x = self.parse_type_term();
        while self.eat(TokenKind::Or) {
            let y = self.parse_type_term();
            x = self.alloc(
                ExprKind::Binary {
                    op: TokenKind::Or,
                    x,
                    y,
                },
                start,
            );
        }
        x
    }

    fn parse_type_term(&mut self) -> ExprId {
        let start = self.tok().span.start;
        if self.eat(TokenKind::Tilde) {
            let x = self.parse_type();
            return self.alloc(
                ExprKind::Unary {
                    op: TokenKind::Tilde,
                    x,
                },
                start,
            );
        }
        self.parse_type()
    }

    // ─── Expressions ───

    pub(crate) fn parse_expr(&mut self) -> ExprId {
        ensure_sufficient_stack(|| self.parse_binary(1))
    }

    pub(crate) fn parse_expr_list(&mut self) -> Vec<ExprId> {
        let mut list = vec![self.parse_expr()];
        while self.eat(TokenKind::Comma) {
            list.push(self.parse_expr());
        }
        list
    }

    fn parse_binary(&mut self, min_prec: u8) -> ExprId {
        let mut x = self.parse_unary();
        loop {
            let op = self.kind();
            let prec = op.precedence();
            if prec < min_prec || prec == 0 {
                return x;
            }
            self.bump();
            let y = ensure_sufficient_stack(|| self.parse_binary(prec + 1));
            let start = self.start_of(x);
            x = self.alloc(ExprKind::Binary { op, x, y }, start);
        }
    }

    fn parse_unary(&mut self) -> ExprId {
        let start = self.tok().span.start;
        match self.kind() {
            op @ (TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Not
            | TokenKind::Xor
            | TokenKind::And
            | TokenKind::Tilde) => {
                self.bump();
                let x = ensure_sufficient_stack(|| self.parse_unary());
                self.alloc(ExprKind::Unary { op, x }, start)
            }
            TokenKind::Arrow => {
                self.bump();
                if self.at(TokenKind::Chan) {
                    self.bump();
                    let value = self.parse_type();
                    return self.alloc(
                        ExprKind::ChanType {
                            dir: ChanDir::Recv,
                            value,
                        },
                        start,
                    );
                }
                let x = ensure_sufficient_stack(|| self.parse_unary());
                self.alloc(
                    ExprKind::Unary {
                        op: TokenKind::Arrow,
                        x,
                    },
                    start,
                )
            }
            TokenKind::Mul => {
                self.bump();
                let x = ensure_sufficient_stack(|| self.parse_unary());
                self.alloc(ExprKind::Star(x), start)
            }
            _ => self.parse_primary_expr(),
        }
    }

    fn parse_operand(&mut self) -> ExprId {
        let tok = self.tok();
        let start = tok.span.start;
        match tok.kind {
            TokenKind::Ident => {
                let ident = self.parse_ident();
                self.ident_expr(ident)
            }
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String => {
                self.bump();
                let kind = match tok.kind {
                    TokenKind::Int => LitKind::Int,
                    TokenKind::Float => LitKind::Float,
                    TokenKind::Imag => LitKind::Imag,
                    TokenKind::Char => LitKind::Char,
                    _ => LitKind::String,
                };
                let value = self.text(tok).to_string();
                self.alloc(ExprKind::BasicLit { kind, value }, start)
            }
            TokenKind::LParen => {
                self.bump();
                self.expr_lev += 1;
                let x = self.parse_expr();
                self.expr_lev -= 1;
                self.expect(TokenKind::RParen);
                self.alloc(ExprKind::Paren(x), start)
            }
            TokenKind::Func => {
                self.bump();
                let sig = self.parse_signature(start);
                if self.at(TokenKind::LBrace) {
                    self.expr_lev += 1;
                    let body = self.parse_block();
                    self.expr_lev -= 1;
                    self.alloc(ExprKind::FuncLit { sig, body }, start)
                } else {
                    self.alloc(ExprKind::FuncType(sig), start)
                }
            }
            TokenKind::LBrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface => self.parse_type(),
            _ => {
                self.error_expected("expression");
                if !matches!(
                    tok.kind,
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::RParen | TokenKind::Eof
                ) {
                    self.bump();
                }
                self.bad_expr()
            }
        }
    }

    fn parse_primary_expr(&mut self) -> ExprId {
        let mut x = self.parse_operand();
        loop {
            let start = self.start_of(x);
            match self.kind() {
                TokenKind::Period => {
                    self.bump();
                    match self.kind() {
                        TokenKind::Ident => {
                            let sel = self.parse_ident();
                            x = self.alloc(ExprKind::Selector { x, sel }, start);
                        }
                        TokenKind::LParen => {
                            self.bump();
                            let ty = if self.eat(TokenKind::Type) {
                                None
                            } else {
                                Some(self.parse_type())
                            };
                            self.expect(TokenKind::RParen);
                            x = self.alloc(ExprKind::TypeAssert { x, ty }, start);
                        }
                        _ => {
                            self.error_expected("selector or type assertion");
                            return x;
                        }
                    }
                }
                TokenKind::LBrack => x = self.parse_index_or_slice(x),
                TokenKind::LParen => x = self.parse_call(x),
                TokenKind::LBrace => {
                    if self.is_literal_type(x) {
                        x = self.parse_composite_lit(Some(x));
                    } else {
                        return x;
                    }
                }
                _ => return x,
            }
        }
    }

    /// Whether `{` after `x` starts a composite literal.
    fn is_literal_type(&self, x: ExprId) -> bool {
        match &self.file.expr(self.file.unparen(x)).kind {
            ExprKind::Bad | ExprKind::Ident(_) | ExprKind::Index { .. } => self.expr_lev >= 0,
            ExprKind::Selector { x: base, .. } => {
                self.expr_lev >= 0 && matches!(self.file.expr(*base).kind, ExprKind::Ident(_))
            }
            ExprKind::ArrayType { .. } | ExprKind::StructType { .. } | ExprKind::MapType { .. } => {
                true
            }
            _ => false,
        }
    }

    fn parse_index_or_slice(&mut self, x: ExprId) -> ExprId {
        let start = self.start_of(x);
        self.expect(TokenKind::LBrack);
        self.expr_lev += 1;
        let mut index: [Option<ExprId>; 3] = [None; 3];
        if !self.at(TokenKind::Colon) {
            index[0] = Some(self.parse_expr());
        }
        if self.at(TokenKind::Comma) {
            let mut indices: Vec<ExprId> = index[0].into_iter().collect();
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RBrack) {
                    break;
                }
                indices.push(self.parse_type());
            }
            self.expr_lev -= 1;
            self.expect(TokenKind::RBrack);
            return self.alloc(ExprKind::Index { x, indices }, start);
        }
        let mut colons = 0;
        while self.at(TokenKind::Colon) && colons < 2 {
            self.bump();
            colons += 1;
            if !self.at(TokenKind::Colon) && !self.at(TokenKind::RBrack) {
                index[colons] = Some(self.parse_expr());
            }
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrack);
        if colons > 0 {
            return self.alloc(
                ExprKind::Slice {
                    x,
                    lo: index[0],
                    hi: index[1],
                    max: index[2],
                },
                start,
            );
        }
        let idx = match index[0] {
            Some(idx) => idx,
            None => self.bad_expr(),
        };
        self.alloc(
            ExprKind::Index {
                x,
                indices: vec![idx],
            },
            start,
        )
    }

    fn parse_call(&mut self, fun: ExprId) -> ExprId {
        let start = self.start_of(fun);
        self.expect(TokenKind::LParen);
        self.expr_lev += 1;
        let mut args = Vec::new();
        let mut has_ellipsis = false;
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            args.push(self.parse_expr());
            if self.eat(TokenKind::Ellipsis) {
                has_ellipsis = true;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RParen);
        self.alloc(
            ExprKind::Call {
                fun,
                args,
                has_ellipsis,
            },
            start,
        )
    }

    fn parse_composite_lit(&mut self, ty: Option<ExprId>) -> ExprId {
        let lbrace = self.tok().span.start;
        let start = ty.map_or(lbrace, |t| self.start_of(t));
        self.expect(TokenKind::LBrace);
        self.expr_lev += 1;
        let mut elts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            elts.push(self.parse_element());
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrace);
        self.alloc(ExprKind::CompositeLit { ty, elts }, start)
    }

    fn parse_element(&mut self) -> ExprId {
        let x = self.parse_element_value();
        if self.eat(TokenKind::Colon) {
            let start = self.start_of(x);
            let value = self.parse_element_value();
            return self.alloc(ExprKind::KeyValue { key: x, value }, start);
        }
        x
    }

    fn parse_element_value(&mut self) -> ExprId {
        if self.at(TokenKind::LBrace) {
            return self.parse_composite_lit(None);
        }
        self.parse_expr()
    }
}
