//! Expression checking.
//!
//! Every visited expression gets an [`ExprInfo`] recorded under its
//! `(file, expr)` key. Untyped constants keep their untyped type unless the
//! context supplies a target (an assignment, a parameter, a composite
//! literal element), in which case the recorded type becomes the target.

use std::sync::Arc;

use swipe_ir::ensure_sufficient_stack;
use swipe_syntax::ast::{ExprId, ExprKind, LitKind};
use swipe_syntax::TokenKind;

use super::{Checker, Ctx};
use crate::object::{Builtin, ObjId, ObjKind, ScopeId};
use crate::program::{ExprInfo, ExprMode, SelectionKind};
use crate::{BasicKind, ConstValue, Param, TypeData, TypeId};

impl Checker<'_> {
    pub(crate) fn expr(&mut self, ctx: Ctx, e: ExprId) -> ExprInfo {
        self.expr_with_hint(ctx, e, None)
    }

    /// Check `e` where a value of type `hint` is expected.
    pub(crate) fn expr_with_hint(&mut self, ctx: Ctx, e: ExprId, hint: Option<TypeId>) -> ExprInfo {
        let mut info = ensure_sufficient_stack(|| self.expr_inner(ctx, e, hint));
        if let Some(target) = hint {
            if info.is_value() && self.prog.pool.is_untyped(info.ty) && !target.is_invalid() {
                self.convert_untyped(&mut info, target);
            }
        }
        self.prog.info.insert((ctx.file, e), info.clone());
        info
    }

    fn convert_untyped(&mut self, info: &mut ExprInfo, target: TypeId) {
        let underlying = self.underlying_of(target);
        if self.prog.pool.is_interface(underlying) {
            info.ty = self.prog.pool.default_type(info.ty);
            return;
        }
        if let Some(kind) = self.prog.pool.basic_kind(underlying) {
            if let Some(value) = info.constant.take() {
                info.constant = Some(value.convert(kind).unwrap_or(value));
            }
        }
        info.ty = target;
    }

    fn expr_inner(&mut self, ctx: Ctx, e: ExprId, hint: Option<TypeId>) -> ExprInfo {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        match &ast.expr(e).kind {
            ExprKind::Bad => ExprInfo::invalid(),
            ExprKind::Ident(ident) => self.ident(ctx, &ident.name),
            ExprKind::BasicLit { kind, value } => {
                let ty = match kind {
                    LitKind::Int => BasicKind::UntypedInt,
                    LitKind::Float => BasicKind::UntypedFloat,
                    LitKind::Char => BasicKind::UntypedRune,
                    LitKind::String => BasicKind::UntypedString,
                    LitKind::Imag => BasicKind::Complex128,
                };
                match ConstValue::from_literal(*kind, value) {
                    Some(constant) => ExprInfo {
                        mode: ExprMode::Constant,
                        ty: TypeId::basic(ty),
                        constant: Some(constant),
                        object: None,
                    },
                    None => ExprInfo::value(TypeId::basic(ty)),
                }
            }
            ExprKind::CompositeLit { ty, elts } => self.composite_lit(ctx, *ty, elts, hint),
            ExprKind::KeyValue { key, value } => {
                self.expr(ctx, *key);
                self.expr(ctx, *value);
                ExprInfo::invalid()
            }
            ExprKind::FuncLit { sig, body } => {
                let ty = self.signature(ctx, sig);
                if self.prog.package(ctx.pkg).root {
                    self.func_body(ctx, sig, None, *body, ty);
                }
                ExprInfo::value(ty)
            }
            ExprKind::Paren(inner) => self.expr_with_hint(ctx, *inner, hint),
            ExprKind::Selector { x, sel } => self.selector(ctx, e, *x, &sel.name),
            ExprKind::Index { x, indices } => self.index(ctx, *x, indices),
            ExprKind::Slice { x, lo, hi, max } => {
                let xi = self.expr(ctx, *x);
                for bound in [lo, hi, max].into_iter().flatten() {
                    self.expr_with_hint(ctx, *bound, Some(TypeId::basic(BasicKind::Int)));
                }
                let under = self.underlying_of(xi.ty);
                let ty = match self.prog.pool.get(under).clone() {
                    TypeData::Basic(kind) if kind.is_string() => {
                        self.prog.pool.default_type(xi.ty)
                    }
                    TypeData::Slice(_) => xi.ty,
                    TypeData::Array { elem, .. } => self.prog.pool.slice(elem),
                    TypeData::Pointer(p) => match self.prog.pool.underlying_data(p).clone() {
                        TypeData::Array { elem, .. } => self.prog.pool.slice(elem),
                        _ => TypeId::INVALID,
                    },
                    _ => TypeId::INVALID,
                };
                ExprInfo::value(ty)
            }
            ExprKind::TypeAssert { x, ty } => {
                let xi = self.expr(ctx, *x);
                match ty {
                    Some(ty) => ExprInfo::value(self.type_expr(ctx, *ty)),
                    None => ExprInfo::value(xi.ty),
                }
            }
            ExprKind::Call {
                fun,
                args,
                has_ellipsis,
            } => self.call(ctx, *fun, args, *has_ellipsis),
            ExprKind::Star(x) => {
                let xi = self.expr(ctx, *x);
                if xi.is_type() {
                    return ExprInfo::type_expr(self.prog.pool.pointer(xi.ty));
                }
                let under = self.underlying_of(xi.ty);
                match self.prog.pool.deref(under) {
                    Some(elem) => ExprInfo {
                        mode: ExprMode::Variable,
                        ty: elem,
                        constant: None,
                        object: None,
                    },
                    None => ExprInfo::invalid(),
                }
            }
            ExprKind::Unary { op, x } => self.unary(ctx, *op, *x, hint),
            ExprKind::Binary { op, x, y } => self.binary(ctx, *op, *x, *y, hint),
            ExprKind::Ellipsis(None) => ExprInfo::invalid(),
            ExprKind::Ellipsis(Some(_))
            | ExprKind::ArrayType { .. }
            | ExprKind::StructType { .. }
            | ExprKind::FuncType(_)
            | ExprKind::InterfaceType { .. }
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. } => self.type_literal(ctx, e),
        }
    }

    fn ident(&mut self, ctx: Ctx, name: &str) -> ExprInfo {
        if name == "_" {
            return ExprInfo::invalid();
        }
        match self.prog.lookup_scope(ctx.scope, name) {
            Some(obj) => self.object_info(ctx, obj),
            None => ExprInfo::invalid(),
        }
    }

    pub(super) fn object_info(&mut self, ctx: Ctx, obj: ObjId) -> ExprInfo {
        self.resolve_object(obj);
        let object = self.prog.object(obj);
        let (mode, ty, constant) = match &object.kind {
            ObjKind::Const(_) if object.pkg.is_none() && object.name == "iota" => {
                match ctx.iota {
                    Some(iota) => (ExprMode::Constant, object.ty, Some(ConstValue::Int(iota))),
                    None => (ExprMode::Invalid, TypeId::INVALID, None),
                }
            }
            ObjKind::Const(value) => (ExprMode::Constant, object.ty, value.clone()),
            ObjKind::TypeName { .. } => (ExprMode::TypeExpr, object.ty, None),
            ObjKind::Var(_) => (ExprMode::Variable, object.ty, None),
            ObjKind::Func(_) | ObjKind::Nil => (ExprMode::Value, object.ty, None),
            ObjKind::PkgName(_) => (ExprMode::PkgName, TypeId::INVALID, None),
            ObjKind::Builtin(_) => (ExprMode::Builtin, TypeId::INVALID, None),
        };
        ExprInfo {
            mode,
            ty,
            constant,
            object: Some(obj),
        }
    }

    fn composite_lit(
        &mut self,
        ctx: Ctx,
        ty: Option<ExprId>,
        elts: &[ExprId],
        hint: Option<TypeId>,
    ) -> ExprInfo {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        let (lit_ty, result) = match ty {
            Some(t) => {
                let lit = self.type_expr(ctx, t);
                (lit, lit)
            }
            None => match hint {
                Some(h) => match self.prog.pool.deref(h) {
                    Some(elem) => (elem, h),
                    None => (h, h),
                },
                None => (TypeId::INVALID, TypeId::INVALID),
            },
        };
        let under = self.underlying_of(lit_ty);
        let mut count: u64 = 0;
        match self.prog.pool.get(under).clone() {
            TypeData::Struct(fields) => {
                for (i, elt) in elts.iter().enumerate() {
                    match &ast.expr(*elt).kind {
                        ExprKind::KeyValue { key, value } => {
                            let field_ty = match &ast.expr(*key).kind {
                                ExprKind::Ident(name) => fields
                                    .iter()
                                    .find(|f| f.name == name.name)
                                    .map(|f| f.ty),
                                _ => None,
                            };
                            self.expr_with_hint(ctx, *value, field_ty);
                        }
                        _ => {
                            self.expr_with_hint(ctx, *elt, fields.get(i).map(|f| f.ty));
                        }
                    }
                }
            }
            TypeData::Slice(elem) | TypeData::Array { elem, .. } => {
                let mut next: u64 = 0;
                for elt in elts {
                    match &ast.expr(*elt).kind {
                        ExprKind::KeyValue { key, value } => {
                            let ki = self.expr_with_hint(ctx, *key, Some(TypeId::basic(BasicKind::Int)));
                            if let Some(index) = ki.constant.and_then(|c| c.as_i64()) {
                                next = u64::try_from(index).unwrap_or(next);
                            }
                            self.expr_with_hint(ctx, *value, Some(elem));
                        }
                        _ => {
                            self.expr_with_hint(ctx, *elt, Some(elem));
                        }
                    }
                    next += 1;
                    count = count.max(next);
                }
            }
            TypeData::Map { key, value } => {
                for elt in elts {
                    match &ast.expr(*elt).kind {
                        ExprKind::KeyValue { key: k, value: v } => {
                            self.expr_with_hint(ctx, *k, Some(key));
                            self.expr_with_hint(ctx, *v, Some(value));
                        }
                        _ => {
                            self.expr(ctx, *elt);
                        }
                    }
                }
            }
            _ => {
                for elt in elts {
                    self.expr(ctx, *elt);
                }
            }
        }
        // `[...]T{...}` takes its length from the elements.
        if let Some(t) = ty {
            if let ExprKind::ArrayType { len: Some(len), .. } = &ast.expr(t).kind {
                if matches!(ast.expr(*len).kind, ExprKind::Ellipsis(None)) {
                    if let TypeData::Array { elem, .. } = self.prog.pool.get(lit_ty).clone() {
                        let sized = self.prog.pool.array(count, elem);
                        self.prog.info.insert((ctx.file, t), ExprInfo::type_expr(sized));
                        return ExprInfo::value(sized);
                    }
                }
            }
        }
        ExprInfo::value(result)
    }

    fn selector(&mut self, ctx: Ctx, e: ExprId, x: ExprId, name: &str) -> ExprInfo {
        let ast = Arc::clone(&self.prog.file(ctx.file).ast);
        if let ExprKind::Ident(ident) = &ast.expr(x).kind {
            if let Some(obj) = self.prog.lookup_scope(ctx.scope, &ident.name) {
                if let ObjKind::PkgName(pkg) = self.prog.object(obj).kind {
                    self.prog.info.insert(
                        (ctx.file, x),
                        ExprInfo {
                            mode: ExprMode::PkgName,
                            ty: TypeId::INVALID,
                            constant: None,
                            object: Some(obj),
                        },
                    );
                    self.ensure_collected(pkg);
                    return match self.prog.lookup(pkg, name) {
                        Some(target) => self.object_info(ctx, target),
                        None => ExprInfo::invalid(),
                    };
                }
            }
        }
        let xi = self.expr(ctx, x);
        if xi.ty.is_invalid() {
            return ExprInfo::invalid();
        }
        self.complete_for_lookup(xi.ty);
        let Some(selection) = self.prog.lookup_field_or_method(xi.ty, name) else {
            return ExprInfo::invalid();
        };
        let info = if xi.is_type() {
            // Method expression `T.M`: the receiver becomes the first parameter.
            let Some(method) = selection.method() else {
                return ExprInfo::invalid();
            };
            self.resolve_object(method);
            let sig = self
                .prog
                .pool
                .signature(self.prog.object(method).ty)
                .cloned()
                .unwrap_or_default();
            let mut params = vec![Param {
                name: String::new(),
                ty: xi.ty,
            }];
            params.extend(sig.params);
            let ty = self.prog.pool.func_type(params, sig.results, sig.variadic);
            ExprInfo {
                mode: ExprMode::Value,
                ty,
                constant: None,
                object: Some(method),
            }
        } else {
            match &selection.kind {
                SelectionKind::Field { ty, .. } => ExprInfo {
                    mode: ExprMode::Variable,
                    ty: *ty,
                    constant: None,
                    object: None,
                },
                SelectionKind::Method(method) => {
                    let method = *method;
                    self.resolve_object(method);
                    ExprInfo {
                        mode: ExprMode::Value,
                        ty: self.prog.object(method).ty,
                        constant: None,
                        object: Some(method),
                    }
                }
            }
        };
        self.prog.selections.insert((ctx.file, e), selection);
        info
    }

    fn index(&mut self, ctx: Ctx, x: ExprId, indices: &[ExprId]) -> ExprInfo {
        let xi = self.expr(ctx, x);
        if xi.is_type() {
            for index in indices {
                self.expr(ctx, *index);
            }
            return ExprInfo::type_expr(xi.ty);
        }
        let under = self.underlying_of(xi.ty);
        let data = self.prog.pool.get(under).clone();
        let key_hint = match &data {
            TypeData::Map { key, .. } => Some(*key),
            TypeData::Signature(_) => None,
            _ => Some(TypeId::basic(BasicKind::Int)),
        };
        for index in indices {
            self.expr_with_hint(ctx, *index, key_hint);
        }
        let variable = |ty| ExprInfo {
            mode: ExprMode::Variable,
            ty,
            constant: None,
            object: None,
        };
        match data {
            TypeData::Slice(elem) | TypeData::Array { elem, .. } => variable(elem),
            TypeData::Pointer(p) => match self.prog.pool.underlying_data(p) {
                TypeData::Array { elem, .. } => variable(*elem),
                _ => ExprInfo::invalid(),
            },
            TypeData::Basic(kind) if kind.is_string() => {
                ExprInfo::value(TypeId::basic(BasicKind::Byte))
            }
            TypeData::Map { value, .. } => ExprInfo::value(value),
            // Instantiation of a generic function.
            TypeData::Signature(_) => ExprInfo {
                object: xi.object,
                ..ExprInfo::value(xi.ty)
            },
            _ => ExprInfo::invalid(),
        }
    }

    fn call(&mut self, ctx: Ctx, fun: ExprId, args: &[ExprId], has_ellipsis: bool) -> ExprInfo {
        let fi = self.expr(ctx, fun);
        match fi.mode {
            ExprMode::TypeExpr => {
                let arg = args.first().map(|a| self.expr(ctx, *a));
                for rest in args.iter().skip(1) {
                    self.expr(ctx, *rest);
                }
                let under = self.underlying_of(fi.ty);
                let constant = match (arg.and_then(|a| a.constant), self.prog.pool.basic_kind(under)) {
                    (Some(value), Some(kind)) => value.convert(kind),
                    _ => None,
                };
                ExprInfo {
                    mode: if constant.is_some() {
                        ExprMode::Constant
                    } else {
                        ExprMode::Value
                    },
                    ty: fi.ty,
                    constant,
                    object: None,
                }
            }
            ExprMode::Builtin => match fi.object.map(|o| self.prog.object(o).kind.clone()) {
                Some(ObjKind::Builtin(builtin)) => self.builtin(ctx, builtin, args),
                _ => ExprInfo::invalid(),
            },
            _ => {
                let under = self.underlying_of(fi.ty);
                let Some(sig) = self.prog.pool.signature(under).cloned() else {
                    for arg in args {
                        self.expr(ctx, *arg);
                    }
                    return ExprInfo::invalid();
                };
                let last = sig.params.len().saturating_sub(1);
                for (i, arg) in args.iter().enumerate() {
                    let hint = if sig.variadic && i >= last {
                        sig.params.get(last).map(|p| {
                            if has_ellipsis {
                                p.ty
                            } else {
                                match self.prog.pool.get(p.ty) {
                                    TypeData::Slice(elem) => *elem,
                                    _ => p.ty,
                                }
                            }
                        })
                    } else {
                        sig.params.get(i).map(|p| p.ty)
                    };
                    self.expr_with_hint(ctx, *arg, hint);
                }
                match sig.results.as_slice() {
                    [] => ExprInfo {
                        mode: ExprMode::NoValue,
                        ty: self.prog.pool.tuple(Vec::new()),
                        constant: None,
                        object: None,
                    },
                    [single] => ExprInfo::value(single.ty),
                    many => {
                        let types = many.iter().map(|r| r.ty).collect();
                        ExprInfo::value(self.prog.pool.tuple(types))
                    }
                }
            }
        }
    }

    fn builtin(&mut self, ctx: Ctx, builtin: Builtin, args: &[ExprId]) -> ExprInfo {
        let int = TypeId::basic(BasicKind::Int);
        let first = args.first().map(|a| self.expr(ctx, *a));
        let first_ty = first.as_ref().map_or(TypeId::INVALID, |f| f.ty);
        let rest_hint = match builtin {
            Builtin::Make => Some(int),
            Builtin::Append => match self.prog.pool.underlying_data(first_ty) {
                TypeData::Slice(elem) => Some(*elem),
                _ => None,
            },
            Builtin::Max | Builtin::Min => Some(first_ty),
            _ => None,
        };
        for arg in args.iter().skip(1) {
            self.expr_with_hint(ctx, *arg, rest_hint);
        }
        let no_value = || ExprInfo {
            mode: ExprMode::NoValue,
            ty: TypeId::INVALID,
            constant: None,
            object: None,
        };
        match builtin {
            Builtin::Len | Builtin::Cap => {
                let constant = first
                    .and_then(|f| f.constant)
                    .and_then(|c| c.as_str().map(|s| ConstValue::Int(s.len() as i128)));
                ExprInfo {
                    mode: if constant.is_some() {
                        ExprMode::Constant
                    } else {
                        ExprMode::Value
                    },
                    ty: int,
                    constant,
                    object: None,
                }
            }
            Builtin::Append | Builtin::Make | Builtin::Max | Builtin::Min => {
                ExprInfo::value(first_ty)
            }
            Builtin::New => ExprInfo::value(self.prog.pool.pointer(first_ty)),
            Builtin::Copy => ExprInfo::value(int),
            Builtin::Complex => ExprInfo::value(TypeId::basic(BasicKind::Complex128)),
            Builtin::Real | Builtin::Imag => ExprInfo::value(TypeId::basic(BasicKind::Float64)),
            Builtin::Recover => {
                let any = self
                    .prog
                    .lookup_scope(ScopeId::UNIVERSE, "any")
                    .map_or(TypeId::INVALID, |o| self.prog.object(o).ty);
                ExprInfo::value(any)
            }
            Builtin::Clear
            | Builtin::Close
            | Builtin::Delete
            | Builtin::Panic
            | Builtin::Print
            | Builtin::Println => no_value(),
        }
    }

    fn unary(&mut self, ctx: Ctx, op: TokenKind, x: ExprId, hint: Option<TypeId>) -> ExprInfo {
        match op {
            TokenKind::And => {
                let elem_hint = hint.and_then(|h| {
                    let under = self.prog.pool.underlying(h);
                    self.prog.pool.deref(under)
                });
                let xi = self.expr_with_hint(ctx, x, elem_hint);
                ExprInfo::value(self.prog.pool.pointer(xi.ty))
            }
            TokenKind::Arrow => {
                let xi = self.expr(ctx, x);
                match self.prog.pool.underlying_data(xi.ty) {
                    TypeData::Chan { elem, .. } => ExprInfo::value(*elem),
                    _ => ExprInfo::invalid(),
                }
            }
            _ => {
                let xi = self.expr_with_hint(ctx, x, hint);
                let constant = xi.constant.as_ref().and_then(|c| ConstValue::unary(op, c));
                let ty = if op == TokenKind::Not && xi.ty.is_invalid() {
                    TypeId::basic(BasicKind::Bool)
                } else {
                    xi.ty
                };
                ExprInfo {
                    mode: if constant.is_some() {
                        ExprMode::Constant
                    } else {
                        ExprMode::Value
                    },
                    ty,
                    constant,
                    object: None,
                }
            }
        }
    }

    fn binary(&mut self, ctx: Ctx, op: TokenKind, x: ExprId, y: ExprId, hint: Option<TypeId>) -> ExprInfo {
        let constant_or_value = |ty, constant: Option<ConstValue>| ExprInfo {
            mode: if constant.is_some() {
                ExprMode::Constant
            } else {
                ExprMode::Value
            },
            ty,
            constant,
            object: None,
        };
        match op {
            TokenKind::Eql
            | TokenKind::Neq
            | TokenKind::Lss
            | TokenKind::Leq
            | TokenKind::Gtr
            | TokenKind::Geq => {
                let xi = self.expr(ctx, x);
                let y_hint = (!self.prog.pool.is_untyped(xi.ty)).then_some(xi.ty);
                let yi = self.expr_with_hint(ctx, y, y_hint);
                let constant = match (&xi.constant, &yi.constant) {
                    (Some(a), Some(b)) => ConstValue::compare(op, a, b).map(ConstValue::Bool),
                    _ => None,
                };
                constant_or_value(TypeId::basic(BasicKind::UntypedBool), constant)
            }
            TokenKind::Shl | TokenKind::Shr => {
                let xi = self.expr_with_hint(ctx, x, hint);
                let yi = self.expr(ctx, y);
                let constant = match (&xi.constant, &yi.constant) {
                    (Some(a), Some(b)) => ConstValue::binary(op, a, b, true),
                    _ => None,
                };
                constant_or_value(xi.ty, constant)
            }
            _ => {
                let xi = self.expr_with_hint(ctx, x, hint);
                let y_hint = if self.prog.pool.is_untyped(xi.ty) {
                    hint
                } else {
                    Some(xi.ty)
                };
                let yi = self.expr_with_hint(ctx, y, y_hint);
                let ty = self.binary_type(xi.ty, yi.ty);
                let integer = self
                    .prog
                    .pool
                    .basic_kind(self.prog.pool.underlying(ty))
                    .is_some_and(BasicKind::is_integer);
                let constant = match (&xi.constant, &yi.constant) {
                    (Some(a), Some(b)) => ConstValue::binary(op, a, b, integer),
                    _ => None,
                };
                constant_or_value(ty, constant)
            }
        }
    }

    /// Result type of an arithmetic or logical operation.
    fn binary_type(&self, x: TypeId, y: TypeId) -> TypeId {
        let pool = &self.prog.pool;
        match (pool.is_untyped(x), pool.is_untyped(y)) {
            (true, false) => y,
            (false, _) => x,
            (true, true) => {
                let rank = |t: TypeId| match pool.basic_kind(t) {
                    Some(BasicKind::UntypedInt) => 1,
                    Some(BasicKind::UntypedRune) => 2,
                    Some(BasicKind::UntypedFloat) => 3,
                    _ => 0,
                };
                if rank(y) > rank(x) {
                    y
                } else {
                    x
                }
            }
        }
    }

    /// Types produced by the right-hand side of an `n`-variable
    /// declaration or assignment, including `v, ok` forms.
    pub(crate) fn rhs_types(&mut self, ctx: Ctx, n: usize, rhs: &[ExprId]) -> Vec<TypeId> {
        if let [single] = rhs {
            if n > 1 {
                let info = self.expr(ctx, *single);
                if let TypeData::Tuple(types) = self.prog.pool.get(info.ty) {
                    return types.clone();
                }
                return vec![info.ty, TypeId::basic(BasicKind::Bool)];
            }
        }
        rhs.iter().map(|r| self.expr(ctx, *r).ty).collect()
    }
}
