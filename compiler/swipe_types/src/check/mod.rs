//! Package loading and type checking.
//!
//! # Architecture
//!
//! ```text
//! Pass 0: Listing
//!   - Driver lists patterns plus dependencies
//!   - Main module detected from the work directory
//!
//! Pass 1: Parsing (root packages, in parallel)
//!
//! Pass 2: Collection
//!   - Package-level objects declared, imports bound per file
//!   - Methods attached to their receiver's named type
//!   - Dependency packages are collected only when first referenced
//!
//! Pass 3: Resolution and bodies (root packages)
//!   - Every package-level object resolved (lazily, on first use)
//!   - Function bodies checked statement by statement
//!
//! Pass 4: Completion
//!   - Named types reachable from root declarations get their underlying
//!     type and method signatures resolved
//! ```
//!
//! The checker is not a compiler: constructs it does not understand
//! degrade to `TypeId::INVALID` and checking continues. Only structural
//! problems (unreadable files, syntax errors, unresolvable imports) become
//! package errors.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use swipe_ir::CancellationToken;
use swipe_syntax::ast::File;
use swipe_syntax::{parse_file, ParseError};

use crate::driver::{Driver, ListedPackage, LoadOptions};
use crate::object::{ObjId, ScopeId};
use crate::program::{FileId, Package, PackageError, PkgId, Program, SourceFile};
use crate::{LoadError, TypeData, TypeId};

mod collect;
mod decl;
mod expr;
mod stmt;
pub(crate) mod universe;

#[cfg(test)]
mod tests;

/// Position-independent state threaded through expression checking.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Ctx {
    pub(crate) file: FileId,
    pub(crate) pkg: PkgId,
    pub(crate) scope: ScopeId,
    /// Value of `iota` inside a constant declaration.
    pub(crate) iota: Option<i128>,
    /// Signature of the enclosing function.
    pub(crate) func: Option<TypeId>,
}

pub(crate) struct Checker<'a> {
    pub(crate) prog: Program,
    driver: &'a dyn Driver,
    /// Scope holding a function's type parameters, reused for its body.
    func_scopes: FxHashMap<ObjId, ScopeId>,
}

type Parsed = (PathBuf, Result<(File, Vec<ParseError>), LoadError>);

#[tracing::instrument(level = "debug", skip_all, fields(patterns = ?opts.patterns))]
pub(crate) fn load(
    driver: &dyn Driver,
    opts: &LoadOptions,
    cancel: &CancellationToken,
) -> Result<Program, LoadError> {
    let listed = driver.list(opts)?;
    if cancel.is_cancelled() {
        return Err(LoadError::Cancelled);
    }
    if !listed.iter().any(|p| !p.dep_only) {
        return Err(LoadError::NoPackages {
            patterns: opts.patterns.clone(),
        });
    }

    let work_dir = normalize(&opts.work_dir);
    let main_module = listed
        .iter()
        .filter_map(|p| p.module.as_ref())
        .find(|m| normalize(&m.dir) == work_dir)
        .cloned()
        .ok_or_else(|| LoadError::ModuleMissing {
            dir: opts.work_dir.clone(),
        })?;

    let mut prog = Program::empty(opts.work_dir.clone());
    prog.main_module = main_module;
    let roots = register_packages(&mut prog, &listed);
    tracing::debug!(
        packages = prog.packages.len(),
        roots = roots.len(),
        module = %prog.main_module.path,
        "listed packages"
    );

    let jobs: Vec<(PkgId, PathBuf)> = roots
        .iter()
        .flat_map(|pkg| {
            prog.package(*pkg)
                .sources
                .iter()
                .map(move |path| (*pkg, path.clone()))
        })
        .collect();
    let parsed: Vec<(PkgId, Parsed)> = jobs
        .into_par_iter()
        .map(|(pkg, path)| (pkg, read_and_parse(driver, path)))
        .collect();

    let mut checker = Checker {
        prog,
        driver,
        func_scopes: FxHashMap::default(),
    };
    for (pkg, (path, result)) in parsed {
        checker.install_file(pkg, path, result);
    }
    for pkg in &roots {
        if cancel.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        checker.ensure_collected(*pkg);
    }
    for pkg in &roots {
        if cancel.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        checker.check_package(*pkg);
    }
    checker.complete(&roots);
    Ok(checker.prog)
}

fn register_packages(prog: &mut Program, listed: &[ListedPackage]) -> Vec<PkgId> {
    let mut roots = Vec::new();
    for lp in listed {
        if prog.by_path.contains_key(&lp.import_path) {
            continue;
        }
        let id = PkgId(u32::try_from(prog.packages.len()).unwrap_or(u32::MAX));
        let scope = prog.new_scope(Some(ScopeId::UNIVERSE));
        let mut errors = Vec::new();
        if let Some(err) = &lp.error {
            let message = if err.pos.is_empty() {
                err.err.clone()
            } else {
                format!("{}: {}", err.pos, err.err)
            };
            errors.push(PackageError { pos: None, message });
        }
        prog.packages.push(Package {
            id,
            path: lp.import_path.clone(),
            name: lp.name.clone(),
            dir: lp.dir.clone(),
            module: lp.module.clone(),
            files: Vec::new(),
            imports: lp.imports.clone(),
            import_map: lp.import_map.clone(),
            root: !lp.dep_only,
            standard: lp.standard,
            errors,
            scope,
            sources: lp.source_files().collect(),
            collected: false,
        });
        prog.by_path.insert(lp.import_path.clone(), id);
        if !lp.dep_only {
            roots.push(id);
        }
    }
    roots
}

fn read_and_parse(driver: &dyn Driver, path: PathBuf) -> Parsed {
    let result = match driver.read_file(&path) {
        Ok(src) => Ok(parse_file(&src)),
        Err(source) => Err(LoadError::Read {
            path: path.clone(),
            source,
        }),
    };
    (path, result)
}

/// Lexically clean a path so `/a/./b/` and `/a/b` compare equal.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

impl Checker<'_> {
    /// Add a parsed file to its package, or record why it could not be.
    fn install_file(&mut self, pkg: PkgId, path: PathBuf, result: Result<(File, Vec<ParseError>), LoadError>) {
        let (ast, errors) = match result {
            Ok(parsed) => parsed,
            Err(err) => {
                self.prog.packages[pkg.index()].errors.push(PackageError {
                    pos: None,
                    message: err.to_string(),
                });
                return;
            }
        };
        let id = FileId(u32::try_from(self.prog.files.len()).unwrap_or(u32::MAX));
        let pkg_scope = self.prog.package(pkg).scope;
        let scope = self.prog.new_scope(Some(pkg_scope));
        let package = &mut self.prog.packages[pkg.index()];
        for err in errors {
            package.errors.push(PackageError {
                pos: Some(swipe_ir::Position::new(path.clone(), err.line, err.column)),
                message: err.message,
            });
        }
        package.files.push(id);
        self.prog.files.push(SourceFile {
            id,
            pkg,
            path,
            ast: Arc::new(ast),
            objects: Vec::new(),
            scope,
        });
    }

    /// Parse (if needed) and collect a package the first time it is used.
    pub(crate) fn ensure_collected(&mut self, pkg: PkgId) {
        if self.prog.package(pkg).collected {
            return;
        }
        self.prog.packages[pkg.index()].collected = true;
        let package = self.prog.package(pkg);
        if package.files.is_empty() && !package.root {
            let sources = self.prog.package(pkg).sources.clone();
            for path in sources {
                let (path, result) = read_and_parse(self.driver, path);
                self.install_file(pkg, path, result);
            }
        }
        tracing::trace!(package = %self.prog.package(pkg).path, "collecting");
        self.collect_package(pkg);
    }

    #[tracing::instrument(level = "debug", skip(self), fields(package = %self.prog.package(pkg).path))]
    fn check_package(&mut self, pkg: PkgId) {
        let files = self.prog.package(pkg).files.clone();
        for file in &files {
            let objects = self.prog.file(*file).objects.clone();
            for obj in objects {
                self.resolve_object(obj);
            }
        }
        for file in files {
            self.check_bodies(file);
        }
    }

    /// Resolve the underlying type and methods of every named type
    /// reachable from root declarations and recorded expression types.
    fn complete(&mut self, roots: &[PkgId]) {
        let mut work: Vec<TypeId> = Vec::new();
        for pkg in roots {
            for file in &self.prog.package(*pkg).files {
                for obj in &self.prog.file(*file).objects {
                    work.push(self.prog.object(*obj).ty);
                }
            }
        }
        work.extend(self.prog.info.values().map(|i| i.ty));
        let mut seen = FxHashSet::default();
        while let Some(ty) = work.pop() {
            if ty.is_invalid() || !seen.insert(ty) {
                continue;
            }
            match self.prog.pool.get(ty).clone() {
                TypeData::Basic(_) => {}
                TypeData::Named(named) => {
                    self.resolve_object(named.obj);
                    for method in &named.methods {
                        self.resolve_object(*method);
                        work.push(self.prog.object(*method).ty);
                    }
                    if let Some(named) = self.prog.pool.named(ty) {
                        work.push(named.underlying);
                    }
                }
                TypeData::Pointer(elem) | TypeData::Slice(elem) => work.push(elem),
                TypeData::Array { elem, .. } | TypeData::Chan { elem, .. } => work.push(elem),
                TypeData::Map { key, value } => work.extend([key, value]),
                TypeData::Struct(fields) => work.extend(fields.iter().map(|f| f.ty)),
                TypeData::Signature(sig) => {
                    work.extend(sig.params.iter().chain(&sig.results).map(|p| p.ty));
                }
                TypeData::Interface(iface) => {
                    work.extend(iface.all.iter().map(|m| m.sig));
                    work.extend(iface.embeddeds.iter().copied());
                }
                TypeData::Tuple(types) => work.extend(types),
                TypeData::TypeParam { constraint, .. } => work.push(constraint),
            }
        }
        tracing::debug!(types = seen.len(), "completed reachable types");
    }
}
