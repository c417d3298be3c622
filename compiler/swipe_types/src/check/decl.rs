//! Lazy resolution of package-level objects and type expressions.

use std::sync::Arc;

use swipe_ir::ensure_sufficient_stack;
use swipe_syntax::ast::{Decl, ExprId, ExprKind, Field, FuncSig, Spec, ValueSpec};
use swipe_syntax::literal::unquote;

use super::{Checker, Ctx};
use crate::object::{DeclRef, FuncKind, ObjId, ObjKind, Object, ResolveState, ScopeId};
use crate::program::{ExprInfo, ExprMode, FileId};
use crate::{
    ChanDir, ConstValue, IfaceMethod, InterfaceType, Param, StructField, TypeData, TypeId,
};

impl Checker<'_> {
    pub(super) fn file_ctx(&self, file: FileId) -> Ctx {
        let source = self.prog.file(file);
        Ctx {
            file,
            pkg: source.pkg,
            scope: source.scope,
            iota: None,
            func: None,
        }
    }

    /// Resolve a package-level object on first use. Cycles leave the
    /// object with whatever type it had when the cycle was entered.
    pub(crate) fn resolve_object(&mut self, id: ObjId) {
        let object = self.prog.object(id);
        if object.state != ResolveState::Unresolved {
            return;
        }
        let Some(decl) = object.decl else {
            self.prog.object_mut(id).state = ResolveState::Resolved;
            return;
        };
        self.prog.object_mut(id).state = ResolveState::Resolving;
        ensure_sufficient_stack(|| match decl {
            DeclRef::Func { file, decl } => self.resolve_func(id, file, decl),
            DeclRef::Spec {
                file,
                decl,
                spec,
                name,
            } => self.resolve_spec(id, file, decl, spec, name),
        });
        self.prog.object_mut(id).state = ResolveState::Resolved;
    }

    fn resolve_func(&mut self, id: ObjId, file: FileId, decl: usize) {
        let ast = Arc::clone(&self.prog.file(file).ast);
        let Some(Decl::Func(func)) = ast.decls.get(decl) else {
            return;
        };
        let mut ctx = self.file_ctx(file);
        if let Some(recv) = &func.recv {
            ctx.scope = self.declare_receiver_type_params(ctx, recv);
        }
        if !func.sig.type_params.is_empty() {
            ctx.scope = self.declare_type_params(ctx, &func.sig.type_params);
        }
        let sig = self.signature(ctx, &func.sig);
        self.prog.object_mut(id).ty = sig;
        self.func_scopes.insert(id, ctx.scope);
    }

    fn resolve_spec(&mut self, id: ObjId, file: FileId, decl: usize, spec: usize, name: usize) {
        let ast = Arc::clone(&self.prog.file(file).ast);
        let Some(Decl::Gen(gen)) = ast.decls.get(decl) else {
            return;
        };
        let ctx = self.file_ctx(file);
        match gen.specs.get(spec) {
            Some(Spec::Type(ts)) => {
                let mut ctx = ctx;
                if !ts.type_params.is_empty() {
                    ctx.scope = self.declare_type_params(ctx, &ts.type_params);
                }
                if ts.alias {
                    let ty = self.type_expr(ctx, ts.ty);
                    self.prog.object_mut(id).ty = ty;
                } else {
                    let named = self.prog.object(id).ty;
                    let rhs = self.type_expr(ctx, ts.ty);
                    let underlying = self.underlying_of(rhs);
                    if let Some(data) = self.prog.pool.named_mut(named) {
                        data.underlying = underlying;
                    }
                }
            }
            Some(Spec::Value(vs)) => {
                if matches!(self.prog.object(id).kind, ObjKind::Const(_)) {
                    let (source, ty_expr) = const_source(&gen.specs, spec);
                    let ctx = Ctx {
                        iota: Some(i128::from(vs.iota)),
                        ..ctx
                    };
                    let (ty, value) = self.const_value(ctx, ty_expr, source.get(name).copied());
                    let object = self.prog.object_mut(id);
                    object.ty = ty;
                    object.kind = ObjKind::Const(value);
                } else {
                    let ty = self.var_types(ctx, vs).get(name).copied();
                    self.prog.object_mut(id).ty = ty.unwrap_or(TypeId::INVALID);
                }
            }
            _ => {}
        }
    }

    /// Type and value of constant `value` declared with optional type
    /// `ty_expr`.
    pub(super) fn const_value(
        &mut self,
        ctx: Ctx,
        ty_expr: Option<ExprId>,
        value: Option<ExprId>,
    ) -> (TypeId, Option<ConstValue>) {
        let declared = ty_expr.map(|t| self.type_expr(ctx, t));
        let Some(value) = value else {
            return (declared.unwrap_or(TypeId::INVALID), None);
        };
        let info = self.expr(ctx, value);
        match declared {
            Some(ty) => {
                let constant = match self.prog.pool.basic_kind(self.prog.pool.underlying(ty)) {
                    Some(kind) => info.constant.and_then(|c| c.convert(kind)),
                    None => info.constant,
                };
                (ty, constant)
            }
            None => (info.ty, info.constant),
        }
    }

    /// Types of the variables a `var` spec declares.
    pub(super) fn var_types(&mut self, ctx: Ctx, vs: &ValueSpec) -> Vec<TypeId> {
        if let Some(ty) = vs.ty {
            let ty = self.type_expr(ctx, ty);
            for value in &vs.values {
                self.expr_with_hint(ctx, *value, Some(ty));
            }
            return vec![ty; vs.names.len()];
        }
        self.rhs_types(ctx, vs.names.len(), &vs.values)
            .into_iter()
            .map(|t| self.prog.pool.default_type(t))
            .collect()
    }

    /// Underlying type, resolving the named type's declaration if needed.
    pub(super) fn underlying_of(&mut self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..32 {
            match self.prog.pool.get(current) {
                TypeData::Named(named) => {
                    let obj = named.obj;
                    self.resolve_object(obj);
                    match self.prog.pool.named(current) {
                        Some(named) => current = named.underlying,
                        None => return TypeId::INVALID,
                    }
                }
                TypeData::TypeParam { constraint, .. } => current = *constraint,
                _ => return current,
            }
        }
        TypeId::INVALID
    }

    /// Resolve `ty` (and the named types embedded in it) far enough that
    /// field and method lookup sees everything.
    pub(super) fn complete_for_lookup(&mut self, ty: TypeId) {
        let mut work = vec![ty];
        let mut seen = rustc_hash::FxHashSet::default();
        while let Some(ty) = work.pop() {
            if !seen.insert(ty) || seen.len() > 64 {
                continue;
            }
            let ty = self.prog.pool.deref(ty).unwrap_or(ty);
            let underlying = self.underlying_of(ty);
            if let TypeData::Struct(fields) = self.prog.pool.get(underlying) {
                work.extend(fields.iter().filter(|f| f.embedded).map(|f| f.ty));
            }
        }
    }

    // ─── Type expressions ───────────────────────────────────────────────

    /// Evaluate a type expression and record it.
    pub(crate) fn type_expr(&mut self, ctx: Ctx, e: ExprId) -> TypeId {
        let info = self.expr(ctx, e);
        match info.mode {
            ExprMode::TypeExpr => info.ty,
            _ => TypeId::INVALID,
        }
    }

    /// The type-denoting expression kinds.
    pub(super) fn type_literal(&mut self, ctx: Ctx, e: ExprId) -> ExprInfo {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        let ty = match &ast.expr(e).kind {
            ExprKind::ArrayType { len: None, elem } => {
                let elem = self.type_expr(ctx, *elem);
                self.prog.pool.slice(elem)
            }
            ExprKind::ArrayType {
                len: Some(len),
                elem,
            } => {
                let elem = self.type_expr(ctx, *elem);
                let n = match &ast.expr(*len).kind {
                    ExprKind::Ellipsis(None) => 0,
                    _ => self
                        .expr(ctx, *len)
                        .constant
                        .and_then(|c| c.as_i64())
                        .and_then(|n| u64::try_from(n).ok())
                        .unwrap_or(0),
                };
                self.prog.pool.array(n, elem)
            }
            ExprKind::Ellipsis(Some(elem)) => {
                let elem = self.type_expr(ctx, *elem);
                self.prog.pool.slice(elem)
            }
            ExprKind::MapType { key, value } => {
                let key = self.type_expr(ctx, *key);
                let value = self.type_expr(ctx, *value);
                self.prog.pool.map(key, value)
            }
            ExprKind::ChanType { dir, value } => {
                let elem = self.type_expr(ctx, *value);
                let dir = match dir {
                    swipe_syntax::ast::ChanDir::Both => ChanDir::Both,
                    swipe_syntax::ast::ChanDir::Send => ChanDir::Send,
                    swipe_syntax::ast::ChanDir::Recv => ChanDir::Recv,
                };
                self.prog.pool.chan(dir, elem)
            }
            ExprKind::FuncType(sig) => {
                let mut ctx = ctx;
                if !sig.type_params.is_empty() {
                    ctx.scope = self.declare_type_params(ctx, &sig.type_params);
                }
                self.signature(ctx, sig)
            }
            ExprKind::StructType { fields } => self.struct_type(ctx, &ast, fields),
            ExprKind::InterfaceType { elems } => self.interface_type(ctx, &ast, elems),
            _ => return ExprInfo::invalid(),
        };
        ExprInfo::type_expr(ty)
    }

    /// Signature type of a function declaration or literal.
    pub(crate) fn signature(&mut self, ctx: Ctx, sig: &FuncSig) -> TypeId {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        let mut variadic = false;
        let mut params = Vec::new();
        for field in &sig.params {
            let ty = match ast.expr(field.ty).kind {
                ExprKind::Ellipsis(Some(_)) => {
                    variadic = true;
                    self.type_expr(ctx, field.ty)
                }
                _ => self.type_expr(ctx, field.ty),
            };
            push_params(&mut params, field, ty);
        }
        let mut results = Vec::new();
        for field in &sig.results {
            let ty = self.type_expr(ctx, field.ty);
            push_params(&mut results, field, ty);
        }
        self.prog.pool.func_type(params, results, variadic)
    }

    fn struct_type(&mut self, ctx: Ctx, ast: &swipe_syntax::ast::File, fields: &[Field]) -> TypeId {
        let mut out = Vec::new();
        for field in fields {
            let ty = self.type_expr(ctx, field.ty);
            let tag = field.tag.as_deref().and_then(|raw| unquote(raw).ok());
            if field.names.is_empty() {
                out.push(StructField {
                    name: embedded_name(ast, field.ty),
                    ty,
                    embedded: true,
                    tag,
                });
            } else {
                for name in &field.names {
                    out.push(StructField {
                        name: name.name.clone(),
                        ty,
                        embedded: false,
                        tag: tag.clone(),
                    });
                }
            }
        }
        self.prog.pool.struct_type(out)
    }

    fn interface_type(&mut self, ctx: Ctx, ast: &swipe_syntax::ast::File, elems: &[Field]) -> TypeId {
        let iface = self.prog.pool.fresh(TypeData::Interface(InterfaceType::default()));
        let mut explicit = Vec::new();
        let mut embeddeds = Vec::new();
        let mut constraint = false;
        for elem in elems {
            match (elem.names.as_slice(), &ast.expr(elem.ty).kind) {
                ([name], ExprKind::FuncType(sig)) => {
                    let sig = self.signature(ctx, sig);
                    let obj = self.prog.alloc_object(Object {
                        name: name.name.clone(),
                        kind: ObjKind::Func(FuncKind::Interface { iface }),
                        ty: sig,
                        pkg: Some(ctx.pkg),
                        decl: None,
                        pos: Some((ctx.file, name.span)),
                        state: ResolveState::Resolved,
                    });
                    explicit.push(IfaceMethod {
                        name: name.name.clone(),
                        sig,
                        obj,
                    });
                }
                (_, ExprKind::Binary { .. } | ExprKind::Unary { .. }) => {
                    constraint = true;
                }
                _ => {
                    let ty = self.type_expr(ctx, elem.ty);
                    let underlying = self.underlying_of(ty);
                    if self.prog.pool.is_interface(underlying) {
                        embeddeds.push(ty);
                    } else {
                        constraint = true;
                    }
                }
            }
        }
        let mut all = explicit.clone();
        for embedded in &embeddeds {
            let underlying = self.prog.pool.underlying(*embedded);
            if let Some(inner) = self.prog.pool.interface(underlying) {
                constraint |= inner.constraint;
                for m in &inner.all {
                    if !all.iter().any(|have: &IfaceMethod| have.name == m.name) {
                        all.push(m.clone());
                    }
                }
            }
        }
        all.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(data) = self.prog.pool.interface_mut(iface) {
            *data = InterfaceType {
                explicit,
                embeddeds,
                all,
                constraint,
            };
        }
        iface
    }

    /// Declare type parameters in a new scope below `ctx.scope`.
    pub(super) fn declare_type_params(&mut self, ctx: Ctx, fields: &[Field]) -> ScopeId {
        let scope = self.prog.new_scope(Some(ctx.scope));
        let inner = Ctx { scope, ..ctx };
        for field in fields {
            let constraint = self.type_expr(inner, field.ty);
            for name in &field.names {
                self.declare_type_param(inner, &name.name, name.span, constraint);
            }
        }
        scope
    }

    /// Receiver `(l *List[T])` declares `T` for the method.
    fn declare_receiver_type_params(&mut self, ctx: Ctx, recv: &Field) -> ScopeId {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        let mut id = ast.unparen(recv.ty);
        if let ExprKind::Star(inner) = ast.expr(id).kind {
            id = ast.unparen(inner);
        }
        let ExprKind::Index { indices, .. } = &ast.expr(id).kind else {
            return ctx.scope;
        };
        let scope = self.prog.new_scope(Some(ctx.scope));
        let any = self
            .prog
            .lookup_scope(ScopeId::UNIVERSE, "any")
            .map_or(TypeId::INVALID, |obj| self.prog.object(obj).ty);
        for index in indices {
            if let ExprKind::Ident(ident) = &ast.expr(*index).kind {
                self.declare_type_param(Ctx { scope, ..ctx }, &ident.name, ident.span, any);
            }
        }
        scope
    }

    fn declare_type_param(&mut self, ctx: Ctx, name: &str, span: swipe_ir::Span, constraint: TypeId) {
        let ty = self.prog.pool.fresh(TypeData::TypeParam {
            name: name.to_string(),
            constraint,
        });
        let obj = self.prog.alloc_object(Object {
            name: name.to_string(),
            kind: ObjKind::TypeName { alias: false },
            ty,
            pkg: Some(ctx.pkg),
            decl: None,
            pos: Some((ctx.file, span)),
            state: ResolveState::Resolved,
        });
        self.prog.declare(ctx.scope, name, obj);
    }

    /// Type of the receiver parameter of a method object.
    pub(super) fn receiver_type(&mut self, obj: ObjId) -> Option<TypeId> {
        match self.prog.object(obj).func_kind()? {
            FuncKind::Method { recv, pointer: true } => Some(self.prog.pool.pointer(recv)),
            FuncKind::Method { recv, .. } => Some(recv),
            _ => None,
        }
    }
}

fn push_params(out: &mut Vec<Param>, field: &Field, ty: TypeId) {
    if field.names.is_empty() {
        out.push(Param {
            name: String::new(),
            ty,
        });
    } else {
        out.extend(field.names.iter().map(|n| Param {
            name: n.name.clone(),
            ty,
        }));
    }
}

/// Implicit field name of an embedded field: the type name without
/// package qualifier, pointer or type arguments.
fn embedded_name(ast: &swipe_syntax::ast::File, ty: ExprId) -> String {
    let mut id = ast.unparen(ty);
    loop {
        match &ast.expr(id).kind {
            ExprKind::Star(inner) => id = ast.unparen(*inner),
            ExprKind::Index { x, .. } => id = *x,
            ExprKind::Selector { sel, .. } => return sel.name.clone(),
            ExprKind::Ident(ident) => return ident.name.clone(),
            _ => return String::new(),
        }
    }
}

/// The spec whose expressions a constant spec uses (itself, or the last
/// earlier spec with values) and that spec's type.
pub(super) fn const_source(specs: &[Spec], index: usize) -> (Vec<ExprId>, Option<ExprId>) {
    for spec in specs[..=index.min(specs.len().saturating_sub(1))].iter().rev() {
        if let Spec::Value(vs) = spec {
            if !vs.values.is_empty() {
                return (vs.values.clone(), vs.ty);
            }
        }
    }
    (Vec::new(), None)
}
