//! Function bodies.
//!
//! Locals are declared into per-block scopes so that identifiers inside a
//! body resolve the way the Go compiler resolves them; the only products
//! are the recorded [`ExprInfo`]s and local objects.

use std::sync::Arc;

use swipe_ir::ensure_sufficient_stack;
use swipe_syntax::ast::{Decl, ExprId, ExprKind, Field, FuncSig, GenDecl, Ident, Spec, StmtId, StmtKind};
use swipe_syntax::TokenKind;

use super::decl::const_source;
use super::{Checker, Ctx};
use crate::object::{DeclRef, ObjId, ObjKind, Object, ResolveState, VarKind};
use crate::program::{ExprInfo, ExprMode, FileId};
use crate::{BasicKind, NamedType, Param, TypeData, TypeId};

impl Checker<'_> {
    /// Check the bodies of all function declarations in `file`.
    pub(super) fn check_bodies(&mut self, file: FileId) {
        let ast = Arc::clone(&self.prog.file(file).ast);
        for (d, decl) in ast.decls.iter().enumerate() {
            let Decl::Func(func) = decl else {
                continue;
            };
            let Some(body) = func.body else {
                continue;
            };
            let Some(obj) = self.prog.object_of_decl(DeclRef::Func { file, decl: d }) else {
                continue;
            };
            self.resolve_object(obj);
            let mut ctx = self.file_ctx(file);
            if let Some(scope) = self.func_scopes.get(&obj) {
                ctx.scope = *scope;
            }
            let sig = self.prog.object(obj).ty;
            let recv = match &func.recv {
                Some(field) => self.receiver_type(obj).map(|ty| (field, ty)),
                None => None,
            };
            self.func_body(ctx, &func.sig, recv, body, sig);
        }
    }

    pub(super) fn func_body(
        &mut self,
        ctx: Ctx,
        sig_ast: &FuncSig,
        recv: Option<(&Field, TypeId)>,
        body: StmtId,
        sig: TypeId,
    ) {
        let scope = self.prog.new_scope(Some(ctx.scope));
        let ctx = Ctx {
            scope,
            iota: None,
            func: Some(sig),
            ..ctx
        };
        if let Some((field, ty)) = recv {
            for name in &field.names {
                self.declare_local(ctx, name, VarKind::Param, ty);
            }
        }
        let signature = self.prog.pool.signature(sig).cloned().unwrap_or_default();
        self.declare_params(ctx, &sig_ast.params, &signature.params, VarKind::Param);
        self.declare_params(ctx, &sig_ast.results, &signature.results, VarKind::Result);

        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        match &ast.stmt(body).kind {
            StmtKind::Block(list) => {
                for s in list {
                    self.stmt(ctx, *s);
                }
            }
            _ => self.stmt(ctx, body),
        }
    }

    fn declare_params(&mut self, ctx: Ctx, fields: &[Field], params: &[Param], kind: VarKind) {
        let mut index = 0;
        for field in fields {
            if field.names.is_empty() {
                index += 1;
                continue;
            }
            for name in &field.names {
                let ty = params.get(index).map_or(TypeId::INVALID, |p| p.ty);
                index += 1;
                self.declare_local(ctx, name, kind, ty);
            }
        }
    }

    fn declare_local(&mut self, ctx: Ctx, name: &Ident, kind: VarKind, ty: TypeId) -> ObjId {
        let obj = self.prog.alloc_object(Object {
            name: name.name.clone(),
            kind: ObjKind::Var(kind),
            ty,
            pkg: Some(ctx.pkg),
            decl: None,
            pos: Some((ctx.file, name.span)),
            state: ResolveState::Resolved,
        });
        self.prog.declare(ctx.scope, &name.name, obj);
        obj
    }

    /// Declare (or reuse, for `:=` redeclaration) the variable an
    /// identifier on the left of a definition names.
    fn define(&mut self, ctx: Ctx, e: ExprId, ty: TypeId) {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        let ExprKind::Ident(ident) = &ast.expr(e).kind else {
            self.expr(ctx, e);
            return;
        };
        if ident.is_blank() {
            return;
        }
        let ty = self.prog.pool.default_type(ty);
        let existing = self.prog.scopes[ctx.scope.index()].names.get(&ident.name).copied();
        let obj = match existing {
            Some(obj) => obj,
            None => self.declare_local(ctx, ident, VarKind::Local, ty),
        };
        let ty = self.prog.object(obj).ty;
        self.prog.info.insert(
            (ctx.file, e),
            ExprInfo {
                mode: ExprMode::Variable,
                ty,
                constant: None,
                object: Some(obj),
            },
        );
    }

    fn block(&mut self, ctx: Ctx, list: &[StmtId]) {
        let scope = self.prog.new_scope(Some(ctx.scope));
        let ctx = Ctx { scope, ..ctx };
        for s in list {
            self.stmt(ctx, *s);
        }
    }

    fn opt_stmt(&mut self, ctx: Ctx, s: Option<StmtId>) {
        if let Some(s) = s {
            self.stmt(ctx, s);
        }
    }

    fn stmt(&mut self, ctx: Ctx, s: StmtId) {
        ensure_sufficient_stack(|| self.stmt_inner(ctx, s));
    }

    fn stmt_inner(&mut self, ctx: Ctx, s: StmtId) {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        match &ast.stmt(s).kind {
            StmtKind::Bad | StmtKind::Empty | StmtKind::Branch { .. } => {}
            StmtKind::Decl(gen) => self.local_decl(ctx, gen),
            StmtKind::Labeled { stmt, .. } => self.stmt(ctx, *stmt),
            StmtKind::Expr(x) | StmtKind::Go(x) | StmtKind::Defer(x) => {
                self.expr(ctx, *x);
            }
            StmtKind::Send { chan, value } => {
                let ci = self.expr(ctx, *chan);
                let elem = match self.prog.pool.underlying_data(ci.ty) {
                    TypeData::Chan { elem, .. } => Some(*elem),
                    _ => None,
                };
                self.expr_with_hint(ctx, *value, elem);
            }
            StmtKind::IncDec { x, .. } => {
                self.expr(ctx, *x);
            }
            StmtKind::Assign { lhs, op, rhs } => self.assign(ctx, lhs, *op, rhs),
            StmtKind::Return(results) => {
                let expected = ctx
                    .func
                    .and_then(|f| self.prog.pool.signature(f))
                    .map(|sig| sig.results.iter().map(|r| r.ty).collect::<Vec<_>>())
                    .unwrap_or_default();
                if expected.len() == results.len() {
                    for (e, ty) in results.iter().zip(expected) {
                        self.expr_with_hint(ctx, *e, Some(ty));
                    }
                } else {
                    for e in results {
                        self.expr(ctx, *e);
                    }
                }
            }
            StmtKind::Block(list) => self.block(ctx, list),
            StmtKind::If {
                init,
                cond,
                then,
                els,
            } => {
                let scope = self.prog.new_scope(Some(ctx.scope));
                let ctx = Ctx { scope, ..ctx };
                self.opt_stmt(ctx, *init);
                self.expr(ctx, *cond);
                self.stmt(ctx, *then);
                self.opt_stmt(ctx, *els);
            }
            StmtKind::CaseClause { list, body } => {
                for e in list.iter().flatten() {
                    self.expr(ctx, *e);
                }
                self.block(ctx, body);
            }
            StmtKind::Switch { init, tag, body } => {
                let scope = self.prog.new_scope(Some(ctx.scope));
                let ctx = Ctx { scope, ..ctx };
                self.opt_stmt(ctx, *init);
                let hint = match tag {
                    Some(tag) => {
                        let ty = self.expr(ctx, *tag).ty;
                        (!self.prog.pool.is_untyped(ty)).then_some(ty)
                    }
                    None => Some(TypeId::basic(BasicKind::Bool)),
                };
                for clause in body {
                    let StmtKind::CaseClause { list, body } = &ast.stmt(*clause).kind else {
                        self.stmt(ctx, *clause);
                        continue;
                    };
                    for e in list.iter().flatten() {
                        self.expr_with_hint(ctx, *e, hint);
                    }
                    self.block(ctx, body);
                }
            }
            StmtKind::TypeSwitch { init, assign, body } => {
                let scope = self.prog.new_scope(Some(ctx.scope));
                let ctx = Ctx { scope, ..ctx };
                self.opt_stmt(ctx, *init);
                self.type_switch(ctx, *assign, body);
            }
            StmtKind::CommClause { comm, body } => {
                let scope = self.prog.new_scope(Some(ctx.scope));
                let ctx = Ctx { scope, ..ctx };
                self.opt_stmt(ctx, *comm);
                for s in body {
                    self.stmt(ctx, *s);
                }
            }
            StmtKind::Select { body } => {
                for clause in body {
                    self.stmt(ctx, *clause);
                }
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                let scope = self.prog.new_scope(Some(ctx.scope));
                let ctx = Ctx { scope, ..ctx };
                self.opt_stmt(ctx, *init);
                if let Some(cond) = cond {
                    self.expr(ctx, *cond);
                }
                self.opt_stmt(ctx, *post);
                self.stmt(ctx, *body);
            }
            StmtKind::Range {
                key,
                value,
                define,
                x,
                body,
            } => {
                let scope = self.prog.new_scope(Some(ctx.scope));
                let ctx = Ctx { scope, ..ctx };
                let xi = self.expr(ctx, *x);
                let (key_ty, value_ty) = self.range_types(xi.ty);
                for (e, ty) in [(key, key_ty), (value, value_ty)] {
                    let Some(e) = e else {
                        continue;
                    };
                    if *define {
                        self.define(ctx, *e, ty);
                    } else {
                        self.expr(ctx, *e);
                    }
                }
                self.stmt(ctx, *body);
            }
        }
    }

    fn assign(&mut self, ctx: Ctx, lhs: &[ExprId], op: TokenKind, rhs: &[ExprId]) {
        match op {
            TokenKind::Define => {
                let types = self.rhs_types(ctx, lhs.len(), rhs);
                for (i, e) in lhs.iter().enumerate() {
                    let ty = types.get(i).copied().unwrap_or(TypeId::INVALID);
                    self.define(ctx, *e, ty);
                }
            }
            TokenKind::Assign if lhs.len() != rhs.len() => {
                for e in lhs {
                    self.expr(ctx, *e);
                }
                self.rhs_types(ctx, lhs.len(), rhs);
            }
            _ => {
                let ast = Arc::clone(&self.prog.file(ctx.file).ast);
                for (l, r) in lhs.iter().zip(rhs) {
                    let blank = matches!(&ast.expr(*l).kind, ExprKind::Ident(i) if i.is_blank());
                    let hint = if blank {
                        None
                    } else {
                        let ty = self.expr(ctx, *l).ty;
                        (!ty.is_invalid()).then_some(ty)
                    };
                    let hint = if matches!(op, TokenKind::ShlAssign | TokenKind::ShrAssign) {
                        None
                    } else {
                        hint
                    };
                    self.expr_with_hint(ctx, *r, hint);
                }
            }
        }
    }

    fn local_decl(&mut self, ctx: Ctx, gen: &GenDecl) {
        for (s, spec) in gen.specs.iter().enumerate() {
            match spec {
                Spec::Import(_) => {}
                Spec::Value(vs) if gen.tok == TokenKind::Const => {
                    let (source, ty_expr) = const_source(&gen.specs, s);
                    let const_ctx = Ctx {
                        iota: Some(i128::from(vs.iota)),
                        ..ctx
                    };
                    let mut values = Vec::with_capacity(vs.names.len());
                    for n in 0..vs.names.len() {
                        values.push(self.const_value(const_ctx, ty_expr, source.get(n).copied()));
                    }
                    for (name, (ty, value)) in vs.names.iter().zip(values) {
                        let obj = self.prog.alloc_object(Object {
                            name: name.name.clone(),
                            kind: ObjKind::Const(value),
                            ty,
                            pkg: Some(ctx.pkg),
                            decl: None,
                            pos: Some((ctx.file, name.span)),
                            state: ResolveState::Resolved,
                        });
                        self.prog.declare(ctx.scope, &name.name, obj);
                    }
                }
                Spec::Value(vs) => {
                    let types = self.var_types(ctx, vs);
                    for (i, name) in vs.names.iter().enumerate() {
                        let ty = types.get(i).copied().unwrap_or(TypeId::INVALID);
                        self.declare_local(ctx, name, VarKind::Local, ty);
                    }
                }
                Spec::Type(ts) => {
                    let obj = self.prog.alloc_object(Object {
                        name: ts.name.name.clone(),
                        kind: ObjKind::TypeName { alias: ts.alias },
                        ty: TypeId::INVALID,
                        pkg: Some(ctx.pkg),
                        decl: None,
                        pos: Some((ctx.file, ts.name.span)),
                        state: ResolveState::Resolved,
                    });
                    if ts.alias {
                        let ty = self.type_expr(ctx, ts.ty);
                        self.prog.object_mut(obj).ty = ty;
                        self.prog.declare(ctx.scope, &ts.name.name, obj);
                    } else {
                        let named = self.prog.pool.fresh(TypeData::Named(NamedType {
                            obj,
                            underlying: TypeId::INVALID,
                            methods: Vec::new(),
                        }));
                        self.prog.object_mut(obj).ty = named;
                        self.prog.declare(ctx.scope, &ts.name.name, obj);
                        let rhs = self.type_expr(ctx, ts.ty);
                        let underlying = self.underlying_of(rhs);
                        if let Some(data) = self.prog.pool.named_mut(named) {
                            data.underlying = underlying;
                        }
                    }
                }
            }
        }
    }

    /// `switch v := x.(type)`: `v` has the case type in single-type
    /// clauses and the type of `x` everywhere else.
    fn type_switch(&mut self, ctx: Ctx, assign: StmtId, body: &[StmtId]) {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        let (symbol, guard) = match &ast.stmt(assign).kind {
            StmtKind::Assign { lhs, rhs, .. } => match (lhs.as_slice(), rhs.as_slice()) {
                ([l], [r]) => match &ast.expr(*l).kind {
                    ExprKind::Ident(ident) => (Some(ident.clone()), *r),
                    _ => (None, *r),
                },
                _ => return,
            },
            StmtKind::Expr(e) => (None, *e),
            _ => return,
        };
        let x = match &ast.expr(guard).kind {
            ExprKind::TypeAssert { x, .. } => *x,
            _ => guard,
        };
        let xi = self.expr(ctx, x);
        self.prog.info.insert((ctx.file, guard), ExprInfo::value(xi.ty));

        for clause in body {
            let StmtKind::CaseClause { list, body } = &ast.stmt(*clause).kind else {
                continue;
            };
            let mut types = Vec::new();
            for e in list.iter().flatten() {
                let info = self.expr(ctx, *e);
                types.push(if info.is_type() {
                    info.ty
                } else {
                    TypeId::INVALID
                });
            }
            let scope = self.prog.new_scope(Some(ctx.scope));
            let clause_ctx = Ctx { scope, ..ctx };
            if let Some(symbol) = symbol.as_ref().filter(|s| !s.is_blank()) {
                let ty = match types.as_slice() {
                    [single] if !single.is_invalid() => *single,
                    _ => xi.ty,
                };
                self.declare_local(clause_ctx, symbol, VarKind::Local, ty);
            }
            for s in body {
                self.stmt(clause_ctx, *s);
            }
        }
    }

    /// Key and value types of a `range` over a value of type `ty`.
    fn range_types(&mut self, ty: TypeId) -> (TypeId, TypeId) {
        let int = TypeId::basic(BasicKind::Int);
        let under = self.underlying_of(ty);
        match self.prog.pool.get(under).clone() {
            TypeData::Basic(kind) if kind.is_string() => (int, TypeId::basic(BasicKind::Rune)),
            TypeData::Basic(kind) if kind.is_integer() => {
                (self.prog.pool.default_type(ty), TypeId::INVALID)
            }
            TypeData::Slice(elem) | TypeData::Array { elem, .. } => (int, elem),
            TypeData::Pointer(p) => match self.prog.pool.underlying_data(p) {
                TypeData::Array { elem, .. } => (int, *elem),
                _ => (TypeId::INVALID, TypeId::INVALID),
            },
            TypeData::Map { key, value } => (key, value),
            TypeData::Chan { elem, .. } => (elem, TypeId::INVALID),
            // Range-over-func: the yield callback's parameters.
            TypeData::Signature(sig) => {
                let yield_params = sig
                    .params
                    .first()
                    .and_then(|p| self.prog.pool.signature(self.prog.pool.underlying(p.ty)))
                    .map(|y| y.params.iter().map(|p| p.ty).collect::<Vec<_>>())
                    .unwrap_or_default();
                (
                    yield_params.first().copied().unwrap_or(TypeId::INVALID),
                    yield_params.get(1).copied().unwrap_or(TypeId::INVALID),
                )
            }
            _ => (TypeId::INVALID, TypeId::INVALID),
        }
    }
}
