//! Code generation framework for Swipe.
//!
//! Plugins turn the option trees found by the decoder into files:
//!
//! ```text
//! DecodeResult ─► PluginRegistry::create ─► Plugin::configure ─► Plugin::generators
//!                                                                    │
//!            GeneratedFile ◄── frame + format ◄── Importer ◄── Generator::generate
//! ```
//!
//! - [`options`]: typed plugin configuration from an option tree
//! - [`path_template`]: REST path templates
//! - [`importer`]: per-file import names
//! - [`emit`]: Go source writing and type printing
//! - [`frame`]: headers, package clause, imports, formatting
//! - [`orchestrate`]: configuring plugins and running their generators

pub mod emit;
pub mod frame;
pub mod importer;
pub mod options;
pub mod orchestrate;
pub mod path_template;
pub mod plugin;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use frame::{Formatter, GoFmt, Passthrough};
pub use importer::Importer;
pub use options::{decode_options, Inherit, MethodRef, OptionsDecodeError, TypeRef};
pub use orchestrate::{configure_all, generate, ConfiguredPlugin, GeneratedFile, GENERATED_PREFIX};
pub use path_template::{parse_path_template, PathTemplate, PathTemplateError};
pub use plugin::{ConfigureContext, GenContext, Generator, GlobalConfig, Plugin};
pub use registry::PluginRegistry;

/// Version written into generated file headers.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
