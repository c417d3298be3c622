//! Declaring package-level objects.

use std::sync::Arc;

use swipe_syntax::ast::{Decl, ExprKind, File, Spec};
use swipe_syntax::TokenKind;

use super::Checker;
use crate::object::{DeclRef, FuncKind, ObjId, ObjKind, Object, ResolveState, VarKind};
use crate::program::{FileId, PackageError, PkgId};
use crate::{NamedType, TypeData, TypeId};

impl Checker<'_> {
    pub(super) fn collect_package(&mut self, pkg: PkgId) {
        let files = self.prog.package(pkg).files.clone();
        let mut methods = Vec::new();
        for file in &files {
            self.collect_file(pkg, *file, &mut methods);
        }
        for (obj, base, pointer) in methods {
            self.attach_method(pkg, obj, &base, pointer);
        }
    }

    fn collect_file(&mut self, pkg: PkgId, file: FileId, methods: &mut Vec<(ObjId, String, bool)>) {
        let ast = Arc::clone(&self.prog.file(file).ast);
        for (d, decl) in ast.decls.iter().enumerate() {
            match decl {
                Decl::Bad(_) => {}
                Decl::Func(func) => {
                    let obj = self.new_package_object(
                        pkg,
                        file,
                        &func.name.name,
                        func.name.span,
                        ObjKind::Func(FuncKind::Plain),
                        DeclRef::Func { file, decl: d },
                    );
                    match &func.recv {
                        Some(recv) => {
                            if let Some((base, pointer)) = receiver_base(&ast, recv.ty) {
                                methods.push((obj, base, pointer));
                            }
                        }
                        None if func.name.name == "init" || func.name.is_blank() => {}
                        None => self.declare_package(pkg, file, obj),
                    }
                }
                Decl::Gen(gen) => {
                    for (s, spec) in gen.specs.iter().enumerate() {
                        match spec {
                            Spec::Import(import) => self.bind_import(pkg, file, import),
                            Spec::Value(value) => {
                                let kind = if gen.tok == TokenKind::Const {
                                    ObjKind::Const(None)
                                } else {
                                    ObjKind::Var(VarKind::Package)
                                };
                                for (n, name) in value.names.iter().enumerate() {
                                    let obj = self.new_package_object(
                                        pkg,
                                        file,
                                        &name.name,
                                        name.span,
                                        kind.clone(),
                                        DeclRef::Spec {
                                            file,
                                            decl: d,
                                            spec: s,
                                            name: n,
                                        },
                                    );
                                    self.declare_package(pkg, file, obj);
                                }
                            }
                            Spec::Type(ty) => {
                                let obj = self.new_package_object(
                                    pkg,
                                    file,
                                    &ty.name.name,
                                    ty.name.span,
                                    ObjKind::TypeName { alias: ty.alias },
                                    DeclRef::Spec {
                                        file,
                                        decl: d,
                                        spec: s,
                                        name: 0,
                                    },
                                );
                                if !ty.alias {
                                    let named = self.prog.pool.fresh(TypeData::Named(NamedType {
                                        obj,
                                        underlying: TypeId::INVALID,
                                        methods: Vec::new(),
                                    }));
                                    self.prog.object_mut(obj).ty = named;
                                }
                                self.declare_package(pkg, file, obj);
                            }
                        }
                    }
                }
            }
        }
    }

    fn new_package_object(
        &mut self,
        pkg: PkgId,
        file: FileId,
        name: &str,
        span: swipe_ir::Span,
        kind: ObjKind,
        decl: DeclRef,
    ) -> ObjId {
        let obj = self.prog.alloc_object(Object {
            name: name.to_string(),
            kind,
            ty: TypeId::INVALID,
            pkg: Some(pkg),
            decl: Some(decl),
            pos: Some((file, span)),
            state: ResolveState::Unresolved,
        });
        self.prog.decls.insert(decl, obj);
        self.prog.files[file.index()].objects.push(obj);
        obj
    }

    fn declare_package(&mut self, pkg: PkgId, file: FileId, obj: ObjId) {
        let scope = self.prog.package(pkg).scope;
        let name = self.prog.object(obj).name.clone();
        if self.prog.declare(scope, &name, obj).is_some() {
            let pos = self.prog.object_position(obj);
            self.prog.packages[pkg.index()].errors.push(PackageError {
                pos,
                message: format!("{name} redeclared in this block"),
            });
            tracing::trace!(file = file.raw(), name = %name, "duplicate declaration");
        }
    }

    fn bind_import(&mut self, pkg: PkgId, file: FileId, import: &swipe_syntax::ast::ImportSpec) {
        if import.path == "C" {
            return;
        }
        let package = self.prog.package(pkg);
        let resolved = package
            .import_map
            .get(&import.path)
            .cloned()
            .unwrap_or_else(|| import.path.clone());
        let Some(target) = self.prog.by_path.get(&resolved).copied() else {
            let pos = Some(self.prog.position(file, import.path_span));
            self.prog.packages[pkg.index()].errors.push(PackageError {
                pos,
                message: format!("could not import {} (package not listed)", import.path),
            });
            return;
        };
        let local = match &import.name {
            Some(name) if name.is_blank() => return,
            Some(name) if name.name == "." => {
                self.dot_import(file, target);
                return;
            }
            Some(name) => name.name.clone(),
            None => self.prog.package(target).name.clone(),
        };
        let local = if local.is_empty() {
            resolved.rsplit('/').next().unwrap_or(&resolved).to_string()
        } else {
            local
        };
        let obj = self.prog.alloc_object(Object {
            name: local.clone(),
            kind: ObjKind::PkgName(target),
            ty: TypeId::INVALID,
            pkg: Some(pkg),
            decl: None,
            pos: Some((file, import.span)),
            state: ResolveState::Resolved,
        });
        let scope = self.prog.file(file).scope;
        self.prog.declare(scope, &local, obj);
    }

    fn dot_import(&mut self, file: FileId, target: PkgId) {
        self.ensure_collected(target);
        let scope = self.prog.file(file).scope;
        for obj in self.prog.package_objects(target) {
            if self.prog.object(obj).exported() {
                let name = self.prog.object(obj).name.clone();
                self.prog.declare(scope, &name, obj);
            }
        }
    }

    fn attach_method(&mut self, pkg: PkgId, obj: ObjId, base: &str, pointer: bool) {
        let scope = self.prog.package(pkg).scope;
        let Some(type_obj) = self.prog.scopes[scope.index()].names.get(base).copied() else {
            return;
        };
        let recv = self.prog.object(type_obj).ty;
        let Some(named) = self.prog.pool.named_mut(recv) else {
            return;
        };
        named.methods.push(obj);
        self.prog.object_mut(obj).kind = ObjKind::Func(FuncKind::Method { recv, pointer });
    }
}

/// Base type name of a receiver type expression and whether it is a
/// pointer: `T`, `*T`, `T[K]`, `*T[K]`, parenthesized or not.
pub(super) fn receiver_base(ast: &File, ty: swipe_syntax::ast::ExprId) -> Option<(String, bool)> {
    let mut id = ast.unparen(ty);
    let mut pointer = false;
    if let ExprKind::Star(inner) = ast.expr(id).kind {
        pointer = true;
        id = ast.unparen(inner);
    }
    if let ExprKind::Index { x, .. } = ast.expr(id).kind {
        id = x;
    }
    match &ast.expr(id).kind {
        ExprKind::Ident(ident) => Some((ident.name.clone(), pointer)),
        _ => None,
    }
}
