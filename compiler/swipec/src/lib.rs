//! The Swipe command line.
//!
//! ```text
//! swipe gen      sweep ─► load ─► decode ─► configure ─► generate ─► write ─► .gitattributes
//! swipe init     write each plugin's DSL stub package
//! swipe options  derive DSL stubs from annotated option structs
//! ```
//!
//! Everything the binary does lives here so it can be driven from tests
//! with an in-memory package driver and a temporary work directory.

pub mod cli;
pub mod commands;
pub mod gitattributes;
pub mod logging;
pub mod pkgs;
pub mod sweep;
pub mod write;

pub use cli::{Cli, Command};
