//! Diagnostics for every Swipe stage.
//!
//! A single value type, [`Diagnostic`], crosses crate boundaries. Stage-local
//! error enums convert into it with `From`. The [`Diagnostics`] collector
//! is the sink stages push into when they collect and continue.
//!
//! ```text
//! loader  ──► LoadError ──┐
//! decoder ──► Diagnostic ─┼──► Diagnostics ──► CLI (exit 1 if has_fatal)
//! plugins ──► Diagnostic ─┘
//! ```

mod diagnostic;
pub mod queue;

pub use diagnostic::{Diagnostic, ErrorKind};
pub use queue::Diagnostics;
