//! Object identities shared by the comment index, the normalizer and the
//! enum map.
//!
//! An identity is the package path and the name joined by `.`
//! (`example.com/app.User`); methods insert their receiver type name
//! (`example.com/app.Svc.Create`). Universe objects use their bare name, so
//! the predeclared `error` is `error`.

use swipe_syntax::ast::{ExprId, ExprKind, File};
use swipe_types::{FuncKind, ObjId, Program};

/// Identity of a package-level object.
pub fn object_id(prog: &Program, obj: ObjId) -> String {
    let (path, name) = prog.qualified_name(obj);
    join(path, name)
}

/// Identity of a method declared on named type `recv_name`.
pub fn method_id(pkg_path: &str, recv_name: &str, method: &str) -> String {
    format!("{}.{method}", join(pkg_path, recv_name))
}

/// Identity of a function object: methods of named types include the
/// receiver, everything else is a plain object identity.
pub fn func_id(prog: &Program, func: ObjId) -> String {
    let object = prog.object(func);
    match object.func_kind() {
        Some(FuncKind::Method { recv, .. }) => {
            let recv_name = prog.type_name(recv).map_or("", |o| o.name.as_str());
            let (path, _) = prog.qualified_name(func);
            method_id(path, recv_name, &object.name)
        }
        _ => object_id(prog, func),
    }
}

pub(crate) fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

/// Name of the type a receiver or embedded field expression denotes:
/// `T`, `*T`, `T[K]`, `pkg.T`.
pub(crate) fn receiver_name(file: &File, mut expr: ExprId) -> Option<&str> {
    loop {
        match &file.expr(expr).kind {
            ExprKind::Ident(ident) => return Some(ident.name.as_str()),
            ExprKind::Selector { sel, .. } => return Some(sel.name.as_str()),
            ExprKind::Star(inner) | ExprKind::Paren(inner) => expr = *inner,
            ExprKind::Index { x, .. } => expr = *x,
            _ => return None,
        }
    }
}
