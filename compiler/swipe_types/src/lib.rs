//! Package loading and Go type checking for Swipe.
//!
//! This crate plays the part `go/packages` and `go/types` play for the Go
//! implementation of a code generator: it lists packages, parses the files
//! the build context selects, and type-checks them into a [`Program`].
//!
//! # Type Interning
//!
//! Types live in a [`Pool`] and are addressed by [`TypeId`]. Structural
//! types (pointers, slices, maps, signatures, ...) are interned, so two
//! structurally equal types share an id; named types, interfaces and type
//! parameters are fresh on creation and compare by identity.
//!
//! # Laziness
//!
//! Dependencies, the standard library included, are parsed and resolved
//! only when a root package refers to them. A program that imports
//! `context` resolves `context.Context` and whatever its method signatures
//! mention, not the whole package.

mod check;
mod constant;
mod driver;
mod error;
mod object;
mod program;
mod types;

pub use constant::ConstValue;
pub use driver::{
    Driver, GoListDriver, ListError, ListedModule, ListedPackage, LoadOptions, MemoryDriver,
    SWIPE_TAG,
};
pub use error::LoadError;
pub use object::{Builtin, DeclRef, FuncKind, ObjId, ObjKind, Object, ScopeId, VarKind};
pub use program::{
    ExprInfo, ExprMode, FileId, Package, PackageError, PkgId, Program, Selection, SelectionKind,
    SourceFile,
};
pub use types::{
    BasicKind, ChanDir, IfaceMethod, InterfaceType, NamedType, Param, Pool, Signature,
    StructField, TypeData, TypeId,
};
