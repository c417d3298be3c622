//! Arena-allocated Go syntax tree.
//!
//! Expressions and statements of one file live in flat vectors owned by
//! [`File`] and are referenced through [`ExprId`] / [`StmtId`]. Types are
//! expressions, as in `go/ast`: `*T`, `[]T`, `map[K]V`, `struct{...}` are
//! all [`ExprKind`] variants, which keeps conversions (`(*T)(nil)`) and
//! composite literals uniform.
//!
//! Comment groups are stored once in [`File::comments`] and referenced by
//! index from the nodes they document.

use swipe_ir::Span;

use crate::lexer::CommentGroup;
use crate::lines::LineIndex;
use crate::token::TokenKind;

mod visit;

pub use visit::{walk_expr, walk_file, walk_stmt, Visitor};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct StmtId(u32);

impl StmtId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Index into [`File::comments`].
pub type CommentId = u32;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

// ─── Expressions ────────────────────────────────────────────────────────

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Bad,
    Ident(Ident),
    /// Raw literal text, quotes included.
    BasicLit {
        kind: LitKind,
        value: String,
    },
    CompositeLit {
        ty: Option<ExprId>,
        elts: Vec<ExprId>,
    },
    KeyValue {
        key: ExprId,
        value: ExprId,
    },
    FuncLit {
        sig: FuncSig,
        body: StmtId,
    },
    Paren(ExprId),
    Selector {
        x: ExprId,
        sel: Ident,
    },
    /// `x[i]`, or a generic instantiation `x[T1, T2]`.
    Index {
        x: ExprId,
        indices: Vec<ExprId>,
    },
    Slice {
        x: ExprId,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
    },
    /// `x.(T)`; `ty` is `None` for `x.(type)`.
    TypeAssert {
        x: ExprId,
        ty: Option<ExprId>,
    },
    Call {
        fun: ExprId,
        args: Vec<ExprId>,
        has_ellipsis: bool,
    },
    /// `*x`: dereference or pointer type.
    Star(ExprId),
    Unary {
        op: TokenKind,
        x: ExprId,
    },
    Binary {
        op: TokenKind,
        x: ExprId,
        y: ExprId,
    },
    /// `...T` in a parameter list, or the `...` length of `[...]T`.
    Ellipsis(Option<ExprId>),
    /// `[N]T`, `[...]T`, or a slice type `[]T` when `len` is `None`.
    ArrayType {
        len: Option<ExprId>,
        elem: ExprId,
    },
    StructType {
        fields: Vec<Field>,
    },
    FuncType(FuncSig),
    /// Methods have one name and a `FuncType`; embedded elements have none.
    InterfaceType {
        elems: Vec<Field>,
    },
    MapType {
        key: ExprId,
        value: ExprId,
    },
    ChanType {
        dir: ChanDir,
        value: ExprId,
    },
}

/// A struct field, parameter, result, type parameter or interface element.
#[derive(Clone, Debug)]
pub struct Field {
    pub doc: Option<CommentId>,
    pub names: Vec<Ident>,
    pub ty: ExprId,
    /// Raw tag literal, quotes included.
    pub tag: Option<String>,
    pub comment: Option<CommentId>,
    pub span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct FuncSig {
    pub type_params: Vec<Field>,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub span: Span,
}

// ─── Statements ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Bad,
    Empty,
    Decl(GenDecl),
    Labeled {
        label: Ident,
        stmt: StmtId,
    },
    Expr(ExprId),
    Send {
        chan: ExprId,
        value: ExprId,
    },
    IncDec {
        x: ExprId,
        inc: bool,
    },
    Assign {
        lhs: Vec<ExprId>,
        op: TokenKind,
        rhs: Vec<ExprId>,
    },
    Go(ExprId),
    Defer(ExprId),
    Return(Vec<ExprId>),
    Branch {
        tok: TokenKind,
        label: Option<Ident>,
    },
    Block(Vec<StmtId>),
    If {
        init: Option<StmtId>,
        cond: ExprId,
        then: StmtId,
        els: Option<StmtId>,
    },
    /// `list` is `None` for `default:`.
    CaseClause {
        list: Option<Vec<ExprId>>,
        body: Vec<StmtId>,
    },
    Switch {
        init: Option<StmtId>,
        tag: Option<ExprId>,
        body: Vec<StmtId>,
    },
    /// `assign` is `x := y.(type)` or `y.(type)`.
    TypeSwitch {
        init: Option<StmtId>,
        assign: StmtId,
        body: Vec<StmtId>,
    },
    /// `comm` is `None` for `default:`.
    CommClause {
        comm: Option<StmtId>,
        body: Vec<StmtId>,
    },
    Select {
        body: Vec<StmtId>,
    },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: StmtId,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
        body: StmtId,
    },
}

// ─── Declarations ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ImportSpec {
    pub doc: Option<CommentId>,
    pub name: Option<Ident>,
    /// Unquoted import path.
    pub path: String,
    pub path_span: Span,
    pub comment: Option<CommentId>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ValueSpec {
    pub doc: Option<CommentId>,
    pub names: Vec<Ident>,
    pub ty: Option<ExprId>,
    pub values: Vec<ExprId>,
    pub comment: Option<CommentId>,
    /// Position of this spec inside its `const (...)` group.
    pub iota: u32,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TypeSpec {
    pub doc: Option<CommentId>,
    pub name: Ident,
    pub type_params: Vec<Field>,
    /// `type A = B`.
    pub alias: bool,
    pub ty: ExprId,
    pub comment: Option<CommentId>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Clone, Debug)]
pub struct GenDecl {
    /// `Import`, `Const`, `Type` or `Var`.
    pub tok: TokenKind,
    pub doc: Option<CommentId>,
    pub specs: Vec<Spec>,
    /// Declared with parentheses.
    pub grouped: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub doc: Option<CommentId>,
    pub recv: Option<Field>,
    pub name: Ident,
    pub sig: FuncSig,
    pub body: Option<StmtId>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
    Bad(Span),
}

// ─── File ───────────────────────────────────────────────────────────────

/// One parsed source file and the arenas backing its nodes.
#[derive(Clone, Debug, Default)]
pub struct File {
    pub package: Option<Ident>,
    pub doc: Option<CommentId>,
    pub decls: Vec<Decl>,
    pub comments: Vec<CommentGroup>,
    /// Expression of the `//go:build` line, if any.
    pub build_constraint: Option<String>,
    pub lines: LineIndex,
    pub(crate) exprs: Vec<Expr>,
    pub(crate) stmts: Vec<Stmt>,
}

impl File {
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub(crate) fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(Expr { kind, span });
        id
    }

    pub(crate) fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(u32::try_from(self.stmts.len()).unwrap_or(u32::MAX));
        self.stmts.push(Stmt { kind, span });
        id
    }

    pub fn package_name(&self) -> &str {
        self.package.as_ref().map_or("", |p| p.name.as_str())
    }

    pub fn comment(&self, id: CommentId) -> Option<&CommentGroup> {
        self.comments.get(id as usize)
    }

    /// Text lines of an optional comment group.
    pub fn comment_lines(&self, id: Option<CommentId>) -> Vec<String> {
        id.and_then(|id| self.comment(id))
            .map(CommentGroup::lines)
            .unwrap_or_default()
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .flat_map(|d| {
                let specs: &[Spec] = match d {
                    Decl::Gen(g) if g.tok == TokenKind::Import => &g.specs,
                    _ => &[],
                };
                specs
            })
            .filter_map(|s| match s {
                Spec::Import(i) => Some(i),
                _ => None,
            })
    }

    /// Peel parentheses.
    pub fn unparen(&self, mut id: ExprId) -> ExprId {
        while let ExprKind::Paren(inner) = self.expr(id).kind {
            id = inner;
        }
        id
    }
}
