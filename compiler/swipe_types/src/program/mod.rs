//! The checked program: packages, files, objects, types and per-expression
//! facts, immutable once [`Program::load`] returns.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use swipe_ir::{CancellationToken, Position, Span};
use swipe_syntax::ast::{ExprId, File};

use crate::driver::{Driver, ListedModule, LoadOptions};
use crate::object::{DeclRef, ObjId, Object, Scope, ScopeId};
use crate::{ConstValue, LoadError, Pool, TypeId};

mod format;
mod lookup;

pub use lookup::{Selection, SelectionKind};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct FileId(pub(crate) u32);

impl FileId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct PkgId(pub(crate) u32);

impl PkgId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A problem confined to one package.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PackageError {
    pub pos: Option<Position>,
    pub message: String,
}

impl std::fmt::Display for PackageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pos {
            Some(pos) => write!(f, "{pos}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Package {
    pub id: PkgId,
    pub path: String,
    pub name: String,
    pub dir: PathBuf,
    pub module: Option<ListedModule>,
    pub files: Vec<FileId>,
    /// Resolved import paths.
    pub imports: Vec<String>,
    pub import_map: BTreeMap<String, String>,
    /// Matched by a load pattern (bodies are checked).
    pub root: bool,
    pub standard: bool,
    pub errors: Vec<PackageError>,
    pub(crate) scope: ScopeId,
    pub(crate) sources: Vec<PathBuf>,
    pub(crate) collected: bool,
}

#[derive(Clone, Debug)]
pub struct SourceFile {
    pub id: FileId,
    pub pkg: PkgId,
    pub path: PathBuf,
    pub ast: Arc<File>,
    /// Package-level objects declared in this file, methods included, in
    /// declaration order.
    pub objects: Vec<ObjId>,
    pub(crate) scope: ScopeId,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprMode {
    Invalid,
    NoValue,
    Constant,
    Variable,
    Value,
    TypeExpr,
    Builtin,
    /// Package name on the left of a qualified identifier.
    PkgName,
}

/// What the checker learned about one expression.
#[derive(Clone, PartialEq, Debug)]
pub struct ExprInfo {
    pub mode: ExprMode,
    pub ty: TypeId,
    pub constant: Option<ConstValue>,
    /// Object an identifier or selector denotes.
    pub object: Option<ObjId>,
}

impl ExprInfo {
    pub(crate) fn invalid() -> Self {
        ExprInfo {
            mode: ExprMode::Invalid,
            ty: TypeId::INVALID,
            constant: None,
            object: None,
        }
    }

    pub(crate) fn value(ty: TypeId) -> Self {
        ExprInfo {
            mode: ExprMode::Value,
            ty,
            constant: None,
            object: None,
        }
    }

    pub(crate) fn type_expr(ty: TypeId) -> Self {
        ExprInfo {
            mode: ExprMode::TypeExpr,
            ty,
            constant: None,
            object: None,
        }
    }

    pub fn is_type(&self) -> bool {
        self.mode == ExprMode::TypeExpr
    }

    pub fn is_value(&self) -> bool {
        matches!(
            self.mode,
            ExprMode::Constant | ExprMode::Variable | ExprMode::Value
        )
    }
}

/// Everything the loader produced.
#[derive(Clone, Debug)]
pub struct Program {
    pub(crate) pool: Pool,
    pub(crate) objects: Vec<Object>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) packages: Vec<Package>,
    pub(crate) files: Vec<SourceFile>,
    pub(crate) by_path: FxHashMap<String, PkgId>,
    pub(crate) decls: FxHashMap<DeclRef, ObjId>,
    pub(crate) info: FxHashMap<(FileId, ExprId), ExprInfo>,
    pub(crate) selections: FxHashMap<(FileId, ExprId), Selection>,
    pub(crate) main_module: ListedModule,
    pub(crate) work_dir: PathBuf,
}

impl Program {
    /// List, parse and type-check `opts.patterns`.
    pub fn load(
        driver: &dyn Driver,
        opts: &LoadOptions,
        cancel: &CancellationToken,
    ) -> Result<Program, LoadError> {
        crate::check::load(driver, opts, cancel)
    }

    pub(crate) fn empty(work_dir: PathBuf) -> Self {
        let mut prog = Program {
            pool: Pool::new(),
            objects: Vec::new(),
            scopes: vec![Scope::default()],
            packages: Vec::new(),
            files: Vec::new(),
            by_path: FxHashMap::default(),
            decls: FxHashMap::default(),
            info: FxHashMap::default(),
            selections: FxHashMap::default(),
            main_module: ListedModule::default(),
            work_dir,
        };
        crate::check::universe::populate(&mut prog);
        prog
    }

    #[inline]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[inline]
    pub fn object(&self, id: ObjId) -> &Object {
        &self.objects[id.index()]
    }

    #[inline]
    pub fn package(&self, id: PkgId) -> &Package {
        &self.packages[id.index()]
    }

    #[inline]
    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.index()]
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Packages matched by the load patterns, in listing order.
    pub fn root_packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter().filter(|p| p.root)
    }

    pub fn package_by_path(&self, path: &str) -> Option<&Package> {
        self.by_path.get(path).map(|id| self.package(*id))
    }

    pub fn main_module(&self) -> &ListedModule {
        &self.main_module
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn expr_info(&self, file: FileId, expr: ExprId) -> Option<&ExprInfo> {
        self.info.get(&(file, expr))
    }

    /// Type of an expression, `INVALID` when unknown.
    pub fn type_of(&self, file: FileId, expr: ExprId) -> TypeId {
        self.expr_info(file, expr).map_or(TypeId::INVALID, |i| i.ty)
    }

    /// Object an identifier or selector expression denotes.
    pub fn object_of(&self, file: FileId, expr: ExprId) -> Option<ObjId> {
        self.expr_info(file, expr).and_then(|i| i.object)
    }

    /// Field or method selected by a selector expression on a value.
    pub fn selection(&self, file: FileId, expr: ExprId) -> Option<&Selection> {
        self.selections.get(&(file, expr))
    }

    /// Object declared by a package-level declaration.
    pub fn object_of_decl(&self, decl: DeclRef) -> Option<ObjId> {
        self.decls.get(&decl).copied()
    }

    /// Named object `name` in package `pkg`'s scope.
    pub fn lookup(&self, pkg: PkgId, name: &str) -> Option<ObjId> {
        let scope = self.package(pkg).scope;
        self.scopes[scope.index()].names.get(name).copied()
    }

    /// Objects of a package scope sorted by name.
    pub fn package_objects(&self, pkg: PkgId) -> Vec<ObjId> {
        let scope = &self.scopes[self.package(pkg).scope.index()];
        let mut objects: Vec<_> = scope.names.values().copied().collect();
        objects.sort_by(|a, b| self.object(*a).name.cmp(&self.object(*b).name));
        objects
    }

    /// Methods declared on a named type.
    pub fn methods(&self, named: TypeId) -> &[ObjId] {
        self.pool.named(named).map_or(&[], |n| n.methods.as_slice())
    }

    /// Type-name object of a named type.
    pub fn type_name(&self, named: TypeId) -> Option<&Object> {
        self.pool.named(named).map(|n| self.object(n.obj))
    }

    pub fn underlying(&self, ty: TypeId) -> TypeId {
        self.pool.underlying(ty)
    }

    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        self.pool.identical(a, b)
    }

    pub fn type_hash(&self, ty: TypeId) -> u64 {
        self.pool.type_hash(ty)
    }

    /// Package path and name of an object, `("", name)` for universe
    /// objects.
    pub fn qualified_name(&self, obj: ObjId) -> (&str, &str) {
        let object = self.object(obj);
        let path = object.pkg.map_or("", |p| self.package(p).path.as_str());
        (path, object.name.as_str())
    }

    /// Resolve a span of `file` to a position.
    pub fn position(&self, file: FileId, span: Span) -> Position {
        let source = self.file(file);
        let (line, column) = source.ast.lines.line_col(span.start);
        Position::new(source.path.clone(), line, column)
    }

    /// Position of an object's declaring identifier.
    pub fn object_position(&self, obj: ObjId) -> Option<Position> {
        self.object(obj).pos.map(|(file, span)| self.position(file, span))
    }

    /// Every package error, packages in listing order.
    pub fn errors(&self) -> impl Iterator<Item = (&Package, &PackageError)> {
        self.packages
            .iter()
            .flat_map(|p| p.errors.iter().map(move |e| (p, e)))
    }

    pub(crate) fn alloc_object(&mut self, object: Object) -> ObjId {
        let id = ObjId::from_raw(u32::try_from(self.objects.len()).unwrap_or(u32::MAX));
        self.objects.push(object);
        id
    }

    pub(crate) fn object_mut(&mut self, id: ObjId) -> &mut Object {
        &mut self.objects[id.index()]
    }

    pub(crate) fn new_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            parent,
            names: FxHashMap::default(),
        });
        id
    }

    /// Declare `name` in `scope`; returns the previous object on conflict.
    pub(crate) fn declare(&mut self, scope: ScopeId, name: &str, obj: ObjId) -> Option<ObjId> {
        if name == "_" {
            return None;
        }
        let names = &mut self.scopes[scope.index()].names;
        match names.get(name) {
            Some(prev) => Some(*prev),
            None => {
                names.insert(name.to_string(), obj);
                None
            }
        }
    }

    /// Find `name` walking outwards from `scope`.
    pub(crate) fn lookup_scope(&self, mut scope: ScopeId, name: &str) -> Option<ObjId> {
        loop {
            let s = &self.scopes[scope.index()];
            if let Some(obj) = s.names.get(name) {
                return Some(*obj);
            }
            scope = s.parent?;
        }
    }
}

#[cfg(test)]
mod tests;
