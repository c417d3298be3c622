//! Declared entities and scopes.

use rustc_hash::FxHashMap;
use swipe_ir::Span;

use crate::program::{FileId, PkgId};
use crate::{ConstValue, TypeId};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct ObjId(u32);

impl ObjId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ObjId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    pub const UNIVERSE: ScopeId = ScopeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    Append,
    Cap,
    Clear,
    Close,
    Complex,
    Copy,
    Delete,
    Imag,
    Len,
    Make,
    Max,
    Min,
    New,
    Panic,
    Print,
    Println,
    Real,
    Recover,
}

impl Builtin {
    pub const ALL: [(&'static str, Builtin); 18] = [
        ("append", Builtin::Append),
        ("cap", Builtin::Cap),
        ("clear", Builtin::Clear),
        ("close", Builtin::Close),
        ("complex", Builtin::Complex),
        ("copy", Builtin::Copy),
        ("delete", Builtin::Delete),
        ("imag", Builtin::Imag),
        ("len", Builtin::Len),
        ("make", Builtin::Make),
        ("max", Builtin::Max),
        ("min", Builtin::Min),
        ("new", Builtin::New),
        ("panic", Builtin::Panic),
        ("print", Builtin::Print),
        ("println", Builtin::Println),
        ("real", Builtin::Real),
        ("recover", Builtin::Recover),
    ];
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarKind {
    Package,
    Local,
    Param,
    Result,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FuncKind {
    Plain,
    /// Method declared on a named type; `recv` is that named type.
    Method { recv: TypeId, pointer: bool },
    /// Method of an interface type.
    Interface { iface: TypeId },
}

#[derive(Clone, PartialEq, Debug)]
pub enum ObjKind {
    Const(Option<ConstValue>),
    TypeName { alias: bool },
    Var(VarKind),
    Func(FuncKind),
    PkgName(PkgId),
    Builtin(Builtin),
    Nil,
}

/// Where the syntax of a package-level object lives.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclRef {
    /// `file.decls[decl]` is a `FuncDecl`.
    Func { file: FileId, decl: usize },
    /// Name `name` of spec `spec` of the `GenDecl` at `file.decls[decl]`.
    Spec {
        file: FileId,
        decl: usize,
        spec: usize,
        name: usize,
    },
}

impl DeclRef {
    pub fn file(self) -> FileId {
        match self {
            DeclRef::Func { file, .. } | DeclRef::Spec { file, .. } => file,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum ResolveState {
    Unresolved,
    Resolving,
    Resolved,
}

#[derive(Clone, Debug)]
pub struct Object {
    pub name: String,
    pub kind: ObjKind,
    pub ty: TypeId,
    pub pkg: Option<PkgId>,
    pub decl: Option<DeclRef>,
    pub pos: Option<(FileId, Span)>,
    pub(crate) state: ResolveState,
}

impl Object {
    pub fn exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    pub fn is_type_name(&self) -> bool {
        matches!(self.kind, ObjKind::TypeName { .. })
    }

    pub fn is_func(&self) -> bool {
        matches!(self.kind, ObjKind::Func(_))
    }

    pub fn func_kind(&self) -> Option<FuncKind> {
        match self.kind {
            ObjKind::Func(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn const_value(&self) -> Option<&ConstValue> {
        match &self.kind {
            ObjKind::Const(value) => value.as_ref(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Scope {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) names: FxHashMap<String, ObjId>,
}
