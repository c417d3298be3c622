//! Graph construction: nodes first, then return values and call edges.

use swipe_syntax::ast::{Decl, Spec, StmtId};
use swipe_syntax::TokenKind;
use swipe_types::{DeclRef, FileId, FuncKind, ObjId, Program};

use super::{Node, NodeId, NodeKey, NodeValue, TypeGraph};
use crate::ids::object_id;
use crate::scan::{callee, constructed_type, BodyScan};

pub(super) fn build(prog: &Program) -> TypeGraph {
    let mut graph = TypeGraph::new();
    let mut bodies: Vec<(NodeId, FileId, StmtId)> = Vec::new();

    for pkg in prog.root_packages() {
        for &file in &pkg.files {
            let ast = &prog.file(file).ast;
            for (d, decl) in ast.decls.iter().enumerate() {
                match decl {
                    Decl::Func(func) => {
                        let decl_ref = DeclRef::Func { file, decl: d };
                        let Some(obj) = prog.object_of_decl(decl_ref) else {
                            continue;
                        };
                        let id = graph.add(node_for(prog, obj, Some(decl_ref)));
                        if let Some(body) = func.body {
                            bodies.push((id, file, body));
                        }
                    }
                    Decl::Gen(gen) if matches!(gen.tok, TokenKind::Type | TokenKind::Const) => {
                        for (s, spec) in gen.specs.iter().enumerate() {
                            let names: Vec<_> = match spec {
                                Spec::Type(ts) => vec![&ts.name],
                                Spec::Value(vs) => vs.names.iter().collect(),
                                Spec::Import(_) => Vec::new(),
                            };
                            for (n, name) in names.into_iter().enumerate() {
                                if name.is_blank() {
                                    continue;
                                }
                                let decl_ref = DeclRef::Spec {
                                    file,
                                    decl: d,
                                    spec: s,
                                    name: n,
                                };
                                if let Some(obj) = prog.object_of_decl(decl_ref) {
                                    graph.add(node_for(prog, obj, Some(decl_ref)));
                                }
                            }
                        }
                    }
                    Decl::Gen(_) | Decl::Bad(_) => {}
                }
            }
        }
    }

    for (id, file, body) in bodies {
        let ast = &prog.file(file).ast;
        let scan = BodyScan::run(ast, body);
        let values = scan
            .returns
            .iter()
            .filter_map(|&e| {
                if let Some(c) = prog.expr_info(file, e).and_then(|i| i.constant.clone()) {
                    return Some(NodeValue::Const(c));
                }
                constructed_type(prog, file, ast, e).map(NodeValue::Type)
            })
            .collect();
        graph.node_mut(id).values = values;

        for fun in scan.calls {
            let Some(target) = callee(prog, file, ast, fun) else {
                continue;
            };
            match prog.object(target).func_kind() {
                Some(FuncKind::Interface { iface }) => {
                    let name = &prog.object(target).name;
                    for implementation in graph.implementations(prog, iface, name) {
                        tracing::trace!(
                            from = id.raw(),
                            to = implementation.raw(),
                            %name,
                            "interface edge"
                        );
                        graph.add_edge(id, implementation);
                    }
                }
                Some(_) => {
                    if let Some(to) = graph.node_by_obj(target) {
                        graph.add_edge(id, to);
                    }
                }
                None => {}
            }
        }
    }
    graph
}

fn node_for(prog: &Program, obj: ObjId, decl: Option<DeclRef>) -> Node {
    let object = prog.object(obj);
    let (name, recv_hash) = match object.func_kind() {
        // A receiver hash of zero marks plain declarations.
        Some(FuncKind::Method { recv, .. }) => (object.name.clone(), prog.type_hash(recv).max(1)),
        _ => (object_id(prog, obj), 0),
    };
    Node {
        key: NodeKey {
            name,
            recv_hash,
            type_hash: prog.type_hash(object.ty),
        },
        obj,
        ty: object.ty,
        decl,
        values: Vec::new(),
    }
}
