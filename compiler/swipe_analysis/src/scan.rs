//! Body scanning helpers shared by the graph builder and the finders.

use swipe_syntax::ast::{walk_stmt, ExprId, ExprKind, File, StmtId, StmtKind, Visitor};
use swipe_syntax::TokenKind;
use swipe_types::{FileId, ObjId, ObjKind, Program, TypeId};

/// Return expressions, assignments and call targets of one function body.
///
/// Calls inside function literals are attributed to the enclosing body;
/// their return and assignment statements are not.
#[derive(Default)]
pub(crate) struct BodyScan {
    pub(crate) returns: Vec<ExprId>,
    /// `lhs = rhs` and `lhs := rhs` statements, in source order.
    pub(crate) assigns: Vec<(Vec<ExprId>, Vec<ExprId>)>,
    /// The `fun` expression of every call, in source order.
    pub(crate) calls: Vec<ExprId>,
}

impl BodyScan {
    pub(crate) fn run(file: &File, body: StmtId) -> Self {
        let mut scan = BodyScan::default();
        walk_stmt(&mut scan, file, body);
        scan
    }
}

impl Visitor for BodyScan {
    fn visit_expr(&mut self, file: &File, id: ExprId) -> bool {
        match &file.expr(id).kind {
            ExprKind::Call { fun, .. } => {
                self.calls.push(*fun);
                true
            }
            ExprKind::FuncLit { body, .. } => {
                let inner = BodyScan::run(file, *body);
                self.calls.extend(inner.calls);
                false
            }
            _ => true,
        }
    }

    fn visit_stmt(&mut self, file: &File, id: StmtId) -> bool {
        match &file.stmt(id).kind {
            StmtKind::Return(results) => self.returns.extend(results.iter().copied()),
            StmtKind::Assign { lhs, rhs, .. } => self.assigns.push((lhs.clone(), rhs.clone())),
            _ => {}
        }
        true
    }
}

/// Function object a call's `fun` expression denotes.
pub(crate) fn callee(prog: &Program, file_id: FileId, file: &File, fun: ExprId) -> Option<ObjId> {
    let fun = file.unparen(fun);
    let obj = match &file.expr(fun).kind {
        ExprKind::Ident(_) => prog.object_of(file_id, fun),
        ExprKind::Selector { .. } => prog
            .selection(file_id, fun)
            .and_then(|s| s.method())
            .or_else(|| prog.object_of(file_id, fun)),
        ExprKind::Index { x, .. } => return callee(prog, file_id, file, *x),
        _ => None,
    }?;
    matches!(prog.object(obj).kind, ObjKind::Func(_)).then_some(obj)
}

/// Named type constructed by `T{...}` or `&T{...}`.
pub(crate) fn constructed_type(
    prog: &Program,
    file_id: FileId,
    file: &File,
    expr: ExprId,
) -> Option<TypeId> {
    let mut expr = file.unparen(expr);
    if let ExprKind::Unary {
        op: TokenKind::And,
        x,
    } = &file.expr(expr).kind
    {
        expr = file.unparen(*x);
    }
    if !matches!(file.expr(expr).kind, ExprKind::CompositeLit { .. }) {
        return None;
    }
    let ty = prog.type_of(file_id, expr);
    let ty = prog.pool().deref(ty).unwrap_or(ty);
    prog.pool().is_named(ty).then_some(ty)
}
