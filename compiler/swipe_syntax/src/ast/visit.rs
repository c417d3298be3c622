//! Pre-order traversal over expressions and statements.

use super::{Decl, ExprId, ExprKind, Field, File, FuncSig, GenDecl, Spec, StmtId, StmtKind};

/// Hooks called before children are visited. Returning `false` skips the
/// children of that node.
pub trait Visitor {
    fn visit_expr(&mut self, _file: &File, _id: ExprId) -> bool {
        true
    }

    fn visit_stmt(&mut self, _file: &File, _id: StmtId) -> bool {
        true
    }
}

/// Visit every declaration body and initializer in `file`.
pub fn walk_file<V: Visitor>(v: &mut V, file: &File) {
    for decl in &file.decls {
        match decl {
            Decl::Gen(g) => walk_gen_decl(v, file, g),
            Decl::Func(f) => {
                if let Some(recv) = &f.recv {
                    walk_field(v, file, recv);
                }
                walk_sig(v, file, &f.sig);
                if let Some(body) = f.body {
                    walk_stmt(v, file, body);
                }
            }
            Decl::Bad(_) => {}
        }
    }
}

fn walk_gen_decl<V: Visitor>(v: &mut V, file: &File, g: &GenDecl) {
    for spec in &g.specs {
        match spec {
            Spec::Import(_) => {}
            Spec::Value(vs) => {
                if let Some(ty) = vs.ty {
                    walk_expr(v, file, ty);
                }
                for &value in &vs.values {
                    walk_expr(v, file, value);
                }
            }
            Spec::Type(ts) => {
                for f in &ts.type_params {
                    walk_field(v, file, f);
                }
                walk_expr(v, file, ts.ty);
            }
        }
    }
}

fn walk_field<V: Visitor>(v: &mut V, file: &File, field: &Field) {
    walk_expr(v, file, field.ty);
}

fn walk_sig<V: Visitor>(v: &mut V, file: &File, sig: &FuncSig) {
    for f in sig.type_params.iter().chain(&sig.params).chain(&sig.results) {
        walk_field(v, file, f);
    }
}

fn walk_opt_expr<V: Visitor>(v: &mut V, file: &File, id: Option<ExprId>) {
    if let Some(id) = id {
        walk_expr(v, file, id);
    }
}

fn walk_opt_stmt<V: Visitor>(v: &mut V, file: &File, id: Option<StmtId>) {
    if let Some(id) = id {
        walk_stmt(v, file, id);
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, file: &File, id: ExprId) {
    if !v.visit_expr(file, id) {
        return;
    }
    match &file.expr(id).kind {
        ExprKind::Bad | ExprKind::Ident(_) | ExprKind::BasicLit { .. } => {}
        ExprKind::CompositeLit { ty, elts } => {
            walk_opt_expr(v, file, *ty);
            for &e in elts {
                walk_expr(v, file, e);
            }
        }
        ExprKind::KeyValue { key, value } => {
            walk_expr(v, file, *key);
            walk_expr(v, file, *value);
        }
        ExprKind::FuncLit { sig, body } => {
            walk_sig(v, file, sig);
            walk_stmt(v, file, *body);
        }
        ExprKind::Paren(x) | ExprKind::Star(x) | ExprKind::Unary { x, .. } => walk_expr(v, file, *x),
        ExprKind::Selector { x, .. } => walk_expr(v, file, *x),
        ExprKind::Index { x, indices } => {
            walk_expr(v, file, *x);
            for &i in indices {
                walk_expr(v, file, i);
            }
        }
        ExprKind::Slice { x, lo, hi, max } => {
            walk_expr(v, file, *x);
            walk_opt_expr(v, file, *lo);
            walk_opt_expr(v, file, *hi);
            walk_opt_expr(v, file, *max);
        }
        ExprKind::TypeAssert { x, ty } => {
            walk_expr(v, file, *x);
            walk_opt_expr(v, file, *ty);
        }
        ExprKind::Call { fun, args, .. } => {
            walk_expr(v, file, *fun);
            for &a in args {
                walk_expr(v, file, a);
            }
        }
        ExprKind::Binary { x, y, .. } => {
            walk_expr(v, file, *x);
            walk_expr(v, file, *y);
        }
        ExprKind::Ellipsis(elt) => walk_opt_expr(v, file, *elt),
        ExprKind::ArrayType { len, elem } => {
            walk_opt_expr(v, file, *len);
            walk_expr(v, file, *elem);
        }
        ExprKind::StructType { fields } | ExprKind::InterfaceType { elems: fields } => {
            for f in fields {
                walk_field(v, file, f);
            }
        }
        ExprKind::FuncType(sig) => walk_sig(v, file, sig),
        ExprKind::MapType { key, value } => {
            walk_expr(v, file, *key);
            walk_expr(v, file, *value);
        }
        ExprKind::ChanType { value, .. } => walk_expr(v, file, *value),
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, file: &File, id: StmtId) {
    if !v.visit_stmt(file, id) {
        return;
    }
    match &file.stmt(id).kind {
        StmtKind::Bad | StmtKind::Empty | StmtKind::Branch { .. } => {}
        StmtKind::Decl(g) => walk_gen_decl(v, file, g),
        StmtKind::Labeled { stmt, .. } => walk_stmt(v, file, *stmt),
        StmtKind::Expr(x) | StmtKind::Go(x) | StmtKind::Defer(x) => walk_expr(v, file, *x),
        StmtKind::Send { chan, value } => {
            walk_expr(v, file, *chan);
            walk_expr(v, file, *value);
        }
        StmtKind::IncDec { x, .. } => walk_expr(v, file, *x),
        StmtKind::Assign { lhs, rhs, .. } => {
            for &e in lhs.iter().chain(rhs) {
                walk_expr(v, file, e);
            }
        }
        StmtKind::Return(results) => {
            for &e in results {
                walk_expr(v, file, e);
            }
        }
        StmtKind::Block(list) | StmtKind::Select { body: list } => {
            for &s in list {
                walk_stmt(v, file, s);
            }
        }
        StmtKind::If {
            init,
            cond,
            then,
            els,
        } => {
            walk_opt_stmt(v, file, *init);
            walk_expr(v, file, *cond);
            walk_stmt(v, file, *then);
            walk_opt_stmt(v, file, *els);
        }
        StmtKind::CaseClause { list, body } => {
            for &e in list.iter().flatten() {
                walk_expr(v, file, e);
            }
            for &s in body {
                walk_stmt(v, file, s);
            }
        }
        StmtKind::Switch { init, tag, body } => {
            walk_opt_stmt(v, file, *init);
            walk_opt_expr(v, file, *tag);
            for &s in body {
                walk_stmt(v, file, s);
            }
        }
        StmtKind::TypeSwitch { init, assign, body } => {
            walk_opt_stmt(v, file, *init);
            walk_stmt(v, file, *assign);
            for &s in body {
                walk_stmt(v, file, s);
            }
        }
        StmtKind::CommClause { comm, body } => {
            walk_opt_stmt(v, file, *comm);
            for &s in body {
                walk_stmt(v, file, s);
            }
        }
        StmtKind::For {
            init,
            cond,
            post,
            body,
        } => {
            walk_opt_stmt(v, file, *init);
            walk_opt_expr(v, file, *cond);
            walk_opt_stmt(v, file, *post);
            walk_stmt(v, file, *body);
        }
        StmtKind::Range {
            key, value, x, body, ..
        } => {
            walk_opt_expr(v, file, *key);
            walk_opt_expr(v, file, *value);
            walk_expr(v, file, *x);
            walk_stmt(v, file, *body);
        }
    }
}
