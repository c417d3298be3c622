//! Option decoder: DSL calls to option trees.
//!
//! A DSL package is a stub package with a function annotated
//! `@swipe:"<PluginID>"` in its doc comment. That function is the entry
//! point; every call to it in a root package becomes one [`Inject`]. The
//! other functions of the package are options, decoded recursively:
//!
//! | Option function            | Decoded value                         |
//! |----------------------------|---------------------------------------|
//! | no parameters              | `Bool(true)`                          |
//! | one non-option parameter   | the argument itself                   |
//! | anything else              | `Nested(param → value, sub-options)`  |
//!
//! A variadic parameter whose element is an option type of the stub
//! package merges the nested calls it receives; any other variadic
//! collects a `Slice`. Options annotated `@type:"repeat"` accumulate
//! instead of overwriting.
//!
//! An argument that cannot be resolved skips the option call holding it
//! with a warning. A malformed option signature or an entry point for an
//! unregistered plugin is fatal.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use swipe_diagnostic::{Diagnostic, Diagnostics};
use swipe_ir::{DecodeResult, DecodedModule, FuncRef, Inject, OptionMap, OptionValue, Position};
use swipe_syntax::ast::{walk_file, ExprId, ExprKind, File, Visitor};
use swipe_syntax::TokenKind;
use swipe_types::{
    ConstValue, ExprInfo, FileId, FuncKind, ObjId, ObjKind, PkgId, Program, TypeData, TypeId,
};

use crate::comments::CommentIndex;
use crate::ids::object_id;
use crate::normalize::Normalizer;
use crate::scan::callee;

/// Value of annotation `@key:"value"` in doc comment `lines`.
pub fn annotation<'c>(lines: &'c [String], key: &str) -> Option<&'c str> {
    let marker = format!("@{key}:\"");
    lines.iter().find_map(|line| {
        let start = line.find(&marker)? + marker.len();
        let rest = &line[start..];
        rest.find('"').map(|end| &rest[..end])
    })
}

/// Stub functions found in the loaded packages.
#[derive(Default, Debug)]
struct DslTables {
    /// Entry functions and their plugin IDs.
    entries: FxHashMap<ObjId, String>,
    packages: FxHashSet<PkgId>,
    repeat: FxHashSet<ObjId>,
}

impl DslTables {
    fn build(prog: &Program, comments: &CommentIndex) -> Self {
        let mut tables = DslTables::default();
        for pkg in prog.packages() {
            for &file in &pkg.files {
                for &obj in &prog.file(file).objects {
                    if prog.object(obj).func_kind() != Some(FuncKind::Plain) {
                        continue;
                    }
                    let doc = comments.func_comment(&object_id(prog, obj));
                    if let Some(id) = annotation(doc, "swipe") {
                        tracing::debug!(pkg = %pkg.path, plugin = id, "DSL package");
                        tables.entries.insert(obj, id.to_string());
                        tables.packages.insert(pkg.id);
                    }
                    if annotation(doc, "type") == Some("repeat") {
                        tables.repeat.insert(obj);
                    }
                }
            }
        }
        tables
    }

    fn is_dsl(&self, prog: &Program, obj: ObjId) -> bool {
        prog.object(obj)
            .pkg
            .is_some_and(|p| self.packages.contains(&p))
    }
}

enum Failure {
    /// Drop the option call being decoded and keep going.
    Skip(Diagnostic),
    Fatal(Diagnostic),
}

impl From<Diagnostic> for Failure {
    fn from(diagnostic: Diagnostic) -> Self {
        Failure::Fatal(diagnostic)
    }
}

type Decoded<T> = Result<T, Failure>;

/// Decode every entry call of the root packages.
///
/// Warnings for skipped options land in `diagnostics`; the first fatal
/// problem is returned as the error.
#[tracing::instrument(level = "debug", skip_all, fields(plugins = plugin_ids.len()))]
pub fn decode(
    norm: Normalizer<'_>,
    comments: &CommentIndex,
    plugin_ids: &[&str],
    diagnostics: &mut Diagnostics,
) -> Result<DecodeResult, Diagnostic> {
    let prog = norm.program();
    let tables = DslTables::build(prog, comments);
    let mut decoder = Decoder {
        prog,
        norm,
        tables: &tables,
        diagnostics,
    };
    let mut result = DecodeResult::default();

    for pkg in prog.root_packages() {
        if tables.packages.contains(&pkg.id) {
            continue;
        }
        for &file in &pkg.files {
            let ast = &prog.file(file).ast;
            let mut entries = EntryCalls {
                prog,
                file_id: file,
                tables: &tables,
                found: Vec::new(),
            };
            walk_file(&mut entries, ast);
            for (call, entry) in entries.found {
                let pos = prog.position(file, ast.expr(call).span);
                let plugin = &tables.entries[&entry];
                if !plugin_ids.contains(&plugin.as_str()) {
                    return Err(Diagnostic::config(format!("unknown plugin {plugin:?}")).at(pos));
                }
                let value = match decoder.call(file, ast, call, entry) {
                    Ok(value) => value,
                    Err(Failure::Skip(warn)) => {
                        decoder.warn(warn);
                        continue;
                    }
                    Err(Failure::Fatal(err)) => return Err(err),
                };
                decoder.push_inject(&mut result, pkg.id, file, pos, plugin, value);
            }
        }
    }
    tracing::debug!(
        modules = result.modules.len(),
        injects = result.inject_count(),
        "options decoded"
    );
    Ok(result)
}

/// Collects calls of entry functions without descending into them.
struct EntryCalls<'a> {
    prog: &'a Program,
    file_id: FileId,
    tables: &'a DslTables,
    found: Vec<(ExprId, ObjId)>,
}

impl Visitor for EntryCalls<'_> {
    fn visit_expr(&mut self, file: &File, id: ExprId) -> bool {
        let ExprKind::Call { fun, .. } = &file.expr(id).kind else {
            return true;
        };
        match callee(self.prog, self.file_id, file, *fun) {
            Some(obj) if self.tables.entries.contains_key(&obj) => {
                self.found.push((id, obj));
                false
            }
            _ => true,
        }
    }
}

struct Decoder<'a, 'd> {
    prog: &'a Program,
    norm: Normalizer<'a>,
    tables: &'d DslTables,
    diagnostics: &'d mut Diagnostics,
}

impl Decoder<'_, '_> {
    fn warn(&mut self, warn: Diagnostic) {
        tracing::warn!(%warn, "option skipped");
        self.diagnostics.push(warn);
    }

    fn skip(&self, file: FileId, ast: &File, expr: ExprId, message: String) -> Failure {
        let pos = self.prog.position(file, ast.expr(expr).span);
        Failure::Skip(Diagnostic::warn(message).at(pos))
    }

    fn push_inject(
        &self,
        result: &mut DecodeResult,
        pkg: PkgId,
        file: FileId,
        pos: Position,
        plugin: &str,
        value: OptionValue,
    ) {
        let pkg = self.norm.package(pkg);
        let (path, external) = match &pkg.module {
            Some(m) => (m.path.clone(), m.external),
            None => (self.prog.main_module().path.clone(), false),
        };
        let base_path = self
            .prog
            .file(file)
            .path
            .parent()
            .map(Into::into)
            .unwrap_or_default();
        let module = result
            .modules
            .entry(path.clone())
            .or_insert_with(|| DecodedModule {
                path,
                external,
                injects: Vec::new(),
            });
        module.injects.push(Inject {
            pkg,
            base_path,
            pos,
            options: BTreeMap::from([(plugin.to_string(), value)]),
        });
    }

    /// DSL function called by `expr`, if `expr` is such a call.
    fn dsl_call(&self, file: FileId, ast: &File, expr: ExprId) -> Option<ObjId> {
        let ExprKind::Call { fun, .. } = &ast.expr(expr).kind else {
            return None;
        };
        callee(self.prog, file, ast, *fun).filter(|&obj| self.tables.is_dsl(self.prog, obj))
    }

    fn is_option_type(&self, ty: TypeId) -> bool {
        self.prog
            .pool()
            .named(ty)
            .is_some_and(|n| self.tables.is_dsl(self.prog, n.obj))
    }

    /// Decode the option call `call` of DSL function `func`.
    fn call(&mut self, file: FileId, ast: &File, call: ExprId, func: ObjId) -> Decoded<OptionValue> {
        let ExprKind::Call {
            args, has_ellipsis, ..
        } = &ast.expr(call).kind
        else {
            return Err(self.skip(file, ast, call, "expected a call".into()));
        };
        let object = self.prog.object(func);
        let Some(sig) = self.prog.pool().signature(object.ty) else {
            let pos = self.prog.position(file, ast.expr(call).span);
            let msg = format!("malformed option function {}", object.name);
            return Err(Failure::Fatal(Diagnostic::config(msg).at(pos)));
        };
        if *has_ellipsis {
            let msg = format!("{}: spread arguments are not supported", object.name);
            return Err(self.skip(file, ast, call, msg));
        }
        if sig.params.is_empty() {
            return Ok(OptionValue::Bool(true));
        }

        let mut value = OptionValue::Nested(OptionMap::new());
        let last = sig.params.len() - 1;
        for (i, param) in sig.params.iter().enumerate() {
            let name = match param.name.as_str() {
                "" | "_" => format!("p{}", i + 1),
                name => name.to_string(),
            };
            if sig.variadic && i == last {
                let elem = match self.prog.pool().get(param.ty) {
                    TypeData::Slice(elem) => *elem,
                    _ => param.ty,
                };
                let rest = args.get(i..).unwrap_or_default();
                if self.is_option_type(elem) {
                    for &arg in rest {
                        self.merge(file, ast, &mut value, arg)?;
                    }
                } else {
                    let items = rest
                        .iter()
                        .map(|&arg| self.arg(file, ast, arg))
                        .collect::<Result<Vec<_>, _>>()?;
                    value.insert(&name, OptionValue::Slice(items), false);
                }
                continue;
            }
            let Some(&arg) = args.get(i) else {
                let msg = format!("{}: missing argument {name}", object.name);
                return Err(self.skip(file, ast, call, msg));
            };
            if self.is_option_type(param.ty) {
                self.merge(file, ast, &mut value, arg)?;
            } else if sig.params.len() == 1 {
                return self.arg(file, ast, arg);
            } else {
                let v = self.arg(file, ast, arg)?;
                value.insert(&name, v, false);
            }
        }
        Ok(value)
    }

    /// Decode nested option call `arg` into `into` under its function name.
    ///
    /// A nested call that cannot be decoded is dropped with a warning.
    fn merge(
        &mut self,
        file: FileId,
        ast: &File,
        into: &mut OptionValue,
        arg: ExprId,
    ) -> Decoded<()> {
        let arg = ast.unparen(arg);
        let Some(func) = self.dsl_call(file, ast, arg) else {
            let warn = self.skip(file, ast, arg, "expected an option call".into());
            return self.recover(warn);
        };
        match self.call(file, ast, arg, func) {
            Ok(nested) => {
                let repeat = self.tables.repeat.contains(&func);
                into.insert(&self.prog.object(func).name, nested, repeat);
                Ok(())
            }
            Err(failure) => self.recover(failure),
        }
    }

    fn recover(&mut self, failure: Failure) -> Decoded<()> {
        match failure {
            Failure::Skip(warn) => {
                self.warn(warn);
                Ok(())
            }
            fatal @ Failure::Fatal(_) => Err(fatal),
        }
    }

    /// Decode a plain argument.
    fn arg(&mut self, file: FileId, ast: &File, expr: ExprId) -> Decoded<OptionValue> {
        let expr = ast.unparen(expr);
        let info = self.prog.expr_info(file, expr);
        if let Some(c) = info.and_then(|i| i.constant.as_ref()) {
            return Ok(scalar(c));
        }
        match &ast.expr(expr).kind {
            ExprKind::Unary {
                op: TokenKind::And,
                x,
            } => self.arg(file, ast, *x),
            ExprKind::CompositeLit { elts, .. } => {
                let ty = self.prog.type_of(file, expr);
                if self.prog.pool().is_named(ty) {
                    return Ok(OptionValue::Named(self.norm.normalize(ty)?));
                }
                if !matches!(self.prog.pool().get(ty), TypeData::Slice(_)) {
                    let msg = format!("unsupported literal of {}", self.prog.type_string(ty));
                    return Err(self.skip(file, ast, expr, msg));
                }
                let items = elts
                    .iter()
                    .map(|&e| self.arg(file, ast, e))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(OptionValue::Slice(items))
            }
            ExprKind::Call { fun, args, .. } => {
                // Conversion such as `(*Svc)(nil)`.
                let fun = ast.unparen(*fun);
                let conversion = self.prog.expr_info(file, fun).is_some_and(ExprInfo::is_type);
                if conversion && args.len() == 1 {
                    let ty = self.prog.type_of(file, expr);
                    let ty = self.prog.pool().deref(ty).unwrap_or(ty);
                    return Ok(OptionValue::Named(self.norm.normalize(ty)?));
                }
                match self.dsl_call(file, ast, expr) {
                    Some(func) => self.call(file, ast, expr, func),
                    None => Err(self.skip(file, ast, expr, "unsupported call argument".into())),
                }
            }
            ExprKind::Selector { x, sel }
                if self.prog.expr_info(file, *x).is_some_and(ExprInfo::is_type) =>
            {
                // Method expression such as `Svc.Create`.
                let owner = self.prog.type_of(file, *x);
                let owner = self.prog.pool().deref(owner).unwrap_or(owner);
                Ok(OptionValue::Func(FuncRef {
                    owner: self.norm.normalize(owner)?,
                    name: sel.name.clone(),
                }))
            }
            ExprKind::Ident(_) | ExprKind::Selector { .. } => self.object(file, ast, expr),
            _ => Err(self.skip(file, ast, expr, "unsupported argument".into())),
        }
    }

    fn object(&mut self, file: FileId, ast: &File, expr: ExprId) -> Decoded<OptionValue> {
        let Some(obj) = self.prog.object_of(file, expr) else {
            return Err(self.skip(file, ast, expr, "unresolved argument".into()));
        };
        let object = self.prog.object(obj);
        match object.kind {
            ObjKind::Nil => Ok(OptionValue::Null),
            ObjKind::TypeName { .. } | ObjKind::Var(_) => {
                Ok(OptionValue::Named(self.norm.normalize(object.ty)?))
            }
            _ => {
                let msg = format!("unsupported argument {}", object.name);
                Err(self.skip(file, ast, expr, msg))
            }
        }
    }
}

fn scalar(value: &ConstValue) -> OptionValue {
    match value {
        ConstValue::Bool(b) => OptionValue::Bool(*b),
        ConstValue::Int(i) => match i64::try_from(*i) {
            Ok(i) => OptionValue::Int(i),
            #[allow(clippy::cast_precision_loss)]
            Err(_) => OptionValue::Float(*i as f64),
        },
        ConstValue::Float(f) => OptionValue::Float(*f),
        ConstValue::String(s) => OptionValue::String(s.clone()),
    }
}
