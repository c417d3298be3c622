//! Swipe IR - language-neutral data shared by every stage.
//!
//! This crate sits at the bottom of the workspace and contains:
//! - Spans and positions for source locations
//! - The normalized type model ([`IrType`]) stored in an [`IrArena`]
//! - Case-converted name variants used by generators
//! - Struct tag parsing ([`TagSet`])
//! - The untyped option tree produced by the option decoder ([`OptionValue`])
//! - Injects and the per-module decode result
//! - A cooperative [`CancellationToken`]
//! - [`ensure_sufficient_stack`] for deeply recursive stages
//!
//! # Design Philosophy
//!
//! - **One owner**: every IR node lives in the arena; nodes refer to each
//!   other through [`IrId`] indices, which makes cyclic types trivial.
//! - **Closed sums**: every IR kind and every option value is an enum, so
//!   consumers match exhaustively.
//! - **Immutable after normalization**: the arena only grows; once handed to
//!   generators it is shared by `&` reference.

mod cancel;
mod inject;
mod name;
mod option;
mod span;
mod stack;
mod tags;
mod types;

pub use cancel::CancellationToken;
pub use inject::{DecodeResult, DecodedModule, Inject};
pub use name::{to_lower_camel, to_snake, to_upper_camel, Name};
pub use option::{FuncRef, OptionMap, OptionValue};
pub use span::{Position, Span};
pub use stack::ensure_sufficient_stack;
pub use tags::{Tag, TagParseError, TagSet};
pub use types::{
    ArrayType, Basic, BasicKind, Field, Func, Iface, IrArena, IrId, IrType, MapType, Module,
    Named, Package, Sign, SliceType, Struct, Var,
};
