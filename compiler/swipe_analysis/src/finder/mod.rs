//! Error discovery over the [`TypeGraph`].
//!
//! An error type is a named type of the user's module with an `ErrorCode()`
//! or `StatusCode()` method that returns a single integer constant. Its
//! optional `Code()` method may return a string code as well.
//!
//! Interface errors are found by walking the return statements of every
//! implementation of an interface method. A returned value counts when it
//! constructs an error type, calls a function whose returns are walked in
//! turn, or names a variable assigned from such an expression.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use rustc_hash::FxHashSet;
use swipe_syntax::ast::{Decl, ExprId, ExprKind, File};
use swipe_types::{DeclRef, FileId, FuncKind, ObjId, ObjKind, Program, SelectionKind, TypeId};

use crate::graph::TypeGraph;
use crate::ids::object_id;
use crate::scan::{callee, constructed_type, BodyScan};

/// Methods whose integer return value is the error code.
const CODE_METHODS: [&str; 2] = ["ErrorCode", "StatusCode"];

/// A type implementing the error code contract.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ErrorType {
    pub ty: TypeId,
    pub obj_id: String,
    pub pkg_path: String,
    pub pkg_name: String,
    pub name: String,
    pub error_code: Option<i64>,
    pub status_code: Option<i64>,
    pub code_str: Option<String>,
    /// `Error()` (or the code method) has a pointer receiver, so values
    /// are built as `&T{}`.
    pub pointer: bool,
}

impl ErrorType {
    /// The numeric code: `ErrorCode()` first, then `StatusCode()`.
    pub fn code(&self) -> Option<i64> {
        self.error_code.or(self.status_code)
    }
}

/// `iface obj_id → method → errors`, errors in discovery order.
pub type IfaceErrors = BTreeMap<String, BTreeMap<String, Vec<ErrorType>>>;

/// Error types declared in packages of module `module_path`.
///
/// Packages whose path below the module contains `swipe` are skipped; they
/// hold the DSL stubs and generated helpers.
#[tracing::instrument(level = "debug", skip(prog, graph))]
pub fn find_errors(prog: &Program, graph: &TypeGraph, module_path: &str) -> Vec<ErrorType> {
    let mut errors = Vec::new();
    graph.for_each(|_, node| {
        let object = prog.object(node.obj);
        if !matches!(object.kind, ObjKind::TypeName { alias: false }) {
            return ControlFlow::Continue(());
        }
        let (path, _) = prog.qualified_name(node.obj);
        let Some(rest) = path.strip_prefix(module_path) else {
            return ControlFlow::Continue(());
        };
        if !rest.is_empty() && !rest.starts_with('/') {
            return ControlFlow::Continue(());
        }
        if rest.contains("swipe") {
            return ControlFlow::Continue(());
        }
        if let Some(error) = error_type(prog, graph, node.obj) {
            tracing::debug!(error = %error.obj_id, code = ?error.code(), "error type");
            errors.push(error);
        }
        ControlFlow::Continue(())
    });
    errors
}

fn error_type(prog: &Program, graph: &TypeGraph, type_name: ObjId) -> Option<ErrorType> {
    let ty = prog.object(type_name).ty;
    if prog.pool().is_interface(ty) {
        return None;
    }
    let node_of = |name: &str| method(prog, ty, name).and_then(|obj| graph.node_by_obj(obj));
    let code_of = |name: &str| -> Option<(ObjId, i64)> {
        let obj = method(prog, ty, name)?;
        let node = graph.node_by_obj(obj)?;
        Some((obj, graph.node(node).int_value()?))
    };
    let error_code = code_of(CODE_METHODS[0]);
    let status_code = code_of(CODE_METHODS[1]);
    let (code_obj, _) = error_code.or(status_code)?;

    let code_str = node_of("Code").and_then(|n| graph.node(n).string_value().map(str::to_string));
    let receiver = method(prog, ty, "Error").unwrap_or(code_obj);
    let pointer = matches!(
        prog.object(receiver).func_kind(),
        Some(FuncKind::Method { pointer: true, .. })
    );

    let object = prog.object(type_name);
    let pkg = object.pkg.map(|p| prog.package(p));
    Some(ErrorType {
        ty,
        obj_id: object_id(prog, type_name),
        pkg_path: pkg.map(|p| p.path.clone()).unwrap_or_default(),
        pkg_name: pkg.map(|p| p.name.clone()).unwrap_or_default(),
        name: object.name.clone(),
        error_code: error_code.map(|(_, c)| c),
        status_code: status_code.map(|(_, c)| c),
        code_str,
        pointer,
    })
}

fn method(prog: &Program, ty: TypeId, name: &str) -> Option<ObjId> {
    match prog.lookup_field_or_method(ty, name)?.kind {
        SelectionKind::Method(obj) => Some(obj),
        SelectionKind::Field { .. } => None,
    }
}

/// Errors each method of each interface in `ifaces` may return.
///
/// Calls reached from a return statement are followed into their bodies;
/// a call through an interface method fans out to every implementation
/// and is followed once per `(package, interface, method)` within one
/// walk. Calls whose results never reach a return are ignored.
#[tracing::instrument(level = "debug", skip_all, fields(ifaces = ifaces.len()))]
pub fn find_iface_errors(
    prog: &Program,
    graph: &TypeGraph,
    ifaces: &[TypeId],
    errors: &[ErrorType],
) -> IfaceErrors {
    let mut found = IfaceErrors::new();
    for &iface in ifaces {
        let (Some(named), Some(data)) = (prog.pool().named(iface), prog.pool().interface(iface))
        else {
            continue;
        };
        let iface_id = object_id(prog, named.obj);
        let methods = found.entry(iface_id).or_default();
        for m in &data.all {
            let mut walk = ReturnWalk {
                prog,
                graph,
                errors,
                seen_methods: FxHashSet::default(),
                seen_funcs: FxHashSet::default(),
                found: Vec::new(),
            };
            walk.iface_method(iface, &m.name);
            tracing::trace!(method = %m.name, errors = walk.found.len(), "method errors");
            methods.insert(m.name.clone(), walk.found);
        }
    }
    found
}

struct ReturnWalk<'a> {
    prog: &'a Program,
    graph: &'a TypeGraph,
    errors: &'a [ErrorType],
    /// `(package path, interface, method)` already fanned out.
    seen_methods: FxHashSet<(String, String, String)>,
    seen_funcs: FxHashSet<ObjId>,
    found: Vec<ErrorType>,
}

impl ReturnWalk<'_> {
    fn iface_method(&mut self, iface: TypeId, method: &str) {
        let Some(named) = self.prog.pool().named(iface) else {
            return;
        };
        let (path, name) = self.prog.qualified_name(named.obj);
        let key = (path.to_string(), name.to_string(), method.to_string());
        if !self.seen_methods.insert(key) {
            return;
        }
        for implementation in self.graph.implementations(self.prog, iface, method) {
            self.func(self.graph.node(implementation).obj);
        }
    }

    fn func(&mut self, obj: ObjId) {
        if !self.seen_funcs.insert(obj) {
            return;
        }
        let prog = self.prog;
        let Some(DeclRef::Func { file, decl }) = prog.object(obj).decl else {
            return;
        };
        let ast = &prog.file(file).ast;
        let Some(Decl::Func(func)) = ast.decls.get(decl) else {
            return;
        };
        let Some(body) = func.body else {
            return;
        };
        let scan = BodyScan::run(ast, body);
        let mut seen_vars = FxHashSet::default();
        for &result in &scan.returns {
            self.value(file, ast, &scan, &mut seen_vars, result);
        }
    }

    fn value(
        &mut self,
        file_id: FileId,
        file: &File,
        scan: &BodyScan,
        seen_vars: &mut FxHashSet<ObjId>,
        expr: ExprId,
    ) {
        if let Some(ty) = constructed_type(self.prog, file_id, file, expr) {
            if let Some(e) = self.errors.iter().find(|e| e.ty == ty) {
                self.found.push(e.clone());
            }
            return;
        }
        let expr = file.unparen(expr);
        match &file.expr(expr).kind {
            ExprKind::Call { fun, .. } => {
                let Some(target) = callee(self.prog, file_id, file, *fun) else {
                    return;
                };
                match self.prog.object(target).func_kind() {
                    Some(FuncKind::Interface { iface }) => {
                        let name = self.prog.object(target).name.clone();
                        self.iface_method(iface, &name);
                    }
                    Some(_) => self.func(target),
                    None => {}
                }
            }
            ExprKind::Ident(_) => {
                let Some(var) = self.prog.object_of(file_id, expr) else {
                    return;
                };
                if !matches!(self.prog.object(var).kind, ObjKind::Var(_)) || !seen_vars.insert(var) {
                    return;
                }
                for (lhs, rhs) in &scan.assigns {
                    let Some(pos) = lhs
                        .iter()
                        .position(|&l| self.prog.object_of(file_id, l) == Some(var))
                    else {
                        continue;
                    };
                    let source = if rhs.len() == lhs.len() {
                        rhs.get(pos)
                    } else {
                        rhs.first()
                    };
                    if let Some(&source) = source {
                        self.value(file_id, file, scan, seen_vars, source);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests;
