//! The `Config` plugin: loading a struct from environment variables.
//!
//! ```go
//! config.Config(
//!     config.Environment(&Config{}),
//!     config.ConfigMarkdownDoc("./docs"),
//! )
//! ```
//!
//! Fields are read from the variable named by their `env` tag, or their
//! name in upper snake case. Tag options: `required`, `use_zero` (an empty
//! value counts as set), `use_flag` (a command line flag may override the
//! variable) and `desc:<text>`. Fields of nested structs are prefixed with
//! the name of the struct field.

mod loader;
mod markdown;

use std::path::PathBuf;

use bitflags::bitflags;
use serde::Deserialize;
use swipe_diagnostic::Diagnostic;
use swipe_gen::{decode_options, ConfigureContext, Generator, Plugin, TypeRef};
use swipe_ir::{to_snake, IrArena, IrId, IrType, OptionValue, Package, Tag};

pub use loader::LoaderGenerator;
pub use markdown::MarkdownGenerator;

pub const ID: &str = "Config";

pub const STUB: &str = r#"type Option string

// Config generates a function that loads a structure from environment
// variables and command line flags.
// @swipe:"Config"
func Config(opts ...Option) Option {
	return "implementation not generated, run swipe"
}

// Environment sets the structure to load, e.g. Environment(&Config{}).
func Environment(structure interface{}) Option {
	return "implementation not generated, run swipe"
}

// FuncName sets the name of the generated function. Default: LoadConfig.
func FuncName(name string) Option {
	return "implementation not generated, run swipe"
}

// ConfigMarkdownDoc generates a Markdown table of the variables into output.
func ConfigMarkdownDoc(output string) Option {
	return "implementation not generated, run swipe"
}
"#;

const DEFAULT_FUNC_NAME: &str = "LoadConfig";

#[derive(Debug, Deserialize)]
struct ConfigOptions {
    #[serde(rename = "Environment")]
    environment: TypeRef,
    #[serde(rename = "FuncName")]
    func_name: Option<String>,
    #[serde(rename = "ConfigMarkdownDoc")]
    markdown_doc: Option<String>,
}

/// Type of a leaf field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    Int { bits: u32 },
    Uint { bits: u32 },
    Float { bits: u32 },
    Duration,
    /// Comma separated list of the inner kind.
    Slice(Box<FieldKind>),
}

impl FieldKind {
    /// Name shown in the documentation.
    pub fn doc_name(&self) -> String {
        match self {
            FieldKind::String => "string".into(),
            FieldKind::Bool => "bool".into(),
            FieldKind::Int { .. } => "int".into(),
            FieldKind::Uint { .. } => "uint".into(),
            FieldKind::Float { .. } => "float".into(),
            FieldKind::Duration => "duration".into(),
            FieldKind::Slice(inner) => format!("[]{}", inner.doc_name()),
        }
    }
}

/// One environment variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvField {
    /// Variable name, prefix included.
    pub name: String,
    /// Go selector from the struct root: `DB.Host`.
    pub path: String,
    pub kind: FieldKind,
    /// Go type the parsed value is converted to.
    pub ty: IrId,
    pub flags: EnvFlags,
    pub desc: String,
}

bitflags! {
    /// `env` tag options of a field.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct EnvFlags: u8 {
        /// Missing variable is an error.
        const REQUIRED = 1 << 0;
        /// An empty value counts as set.
        const USE_ZERO = 1 << 1;
        /// A command line flag may override the variable.
        const USE_FLAG = 1 << 2;
    }
}

impl EnvFlags {
    pub fn from_tag(tag: Option<&Tag>) -> Self {
        let mut flags = EnvFlags::empty();
        let Some(tag) = tag else {
            return flags;
        };
        for (option, flag) in [
            ("required", EnvFlags::REQUIRED),
            ("use_zero", EnvFlags::USE_ZERO),
            ("use_flag", EnvFlags::USE_FLAG),
        ] {
            flags.set(flag, tag.has_option(option));
        }
        flags
    }
}

impl EnvField {
    pub fn required(&self) -> bool {
        self.flags.contains(EnvFlags::REQUIRED)
    }

    pub fn use_zero(&self) -> bool {
        self.flags.contains(EnvFlags::USE_ZERO)
    }

    pub fn use_flag(&self) -> bool {
        self.flags.contains(EnvFlags::USE_FLAG)
    }

    /// Command line flag name: `DB_HOST` → `db-host`.
    pub fn flag_name(&self) -> String {
        self.name.to_lowercase().replace('_', "-")
    }
}

/// Nested pointer structs that must be allocated before their fields are
/// assigned, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerInit {
    pub path: String,
    pub ty: IrId,
}

#[derive(Clone, Debug)]
pub struct ConfigModel {
    pub pkg: Package,
    pub func_name: String,
    /// The named struct being loaded.
    pub root: IrId,
    pub fields: Vec<EnvField>,
    pub inits: Vec<PointerInit>,
    pub markdown_output: Option<PathBuf>,
}

#[derive(Default)]
pub struct ConfigPlugin {
    model: Option<ConfigModel>,
}

impl ConfigPlugin {
    pub fn boxed() -> Box<dyn Plugin> {
        Box::new(ConfigPlugin::default())
    }

    pub fn model(&self) -> Option<&ConfigModel> {
        self.model.as_ref()
    }
}

impl Plugin for ConfigPlugin {
    fn id(&self) -> &'static str {
        ID
    }

    fn configure(
        &mut self,
        ctx: &ConfigureContext<'_>,
        options: &OptionValue,
    ) -> Result<(), Vec<Diagnostic>> {
        let opts: ConfigOptions = decode_options(options).map_err(|e| vec![e.into()])?;
        let arena = ctx.arena();
        let root = opts.environment.0;
        let Some(named) = arena.named(root) else {
            return Err(vec![Diagnostic::config(
                "Environment: expected a named struct type",
            )]);
        };
        if !matches!(arena.get(named.ty), IrType::Struct(_)) {
            return Err(vec![Diagnostic::config(format!(
                "Environment: {} is not a struct",
                named.name
            ))]);
        }
        let mut collector = Collector {
            arena,
            fields: Vec::new(),
            inits: Vec::new(),
            errors: Vec::new(),
        };
        collector.walk(named.ty, "", "", 0);
        if !collector.errors.is_empty() {
            return Err(collector.errors);
        }
        tracing::debug!(fields = collector.fields.len(), "config fields");
        self.model = Some(ConfigModel {
            pkg: ctx.inject.pkg.clone(),
            func_name: opts
                .func_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_FUNC_NAME.to_string()),
            root,
            fields: collector.fields,
            inits: collector.inits,
            markdown_output: opts.markdown_doc.map(PathBuf::from),
        });
        Ok(())
    }

    fn generators(&self) -> Vec<Box<dyn Generator + '_>> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        let mut gens: Vec<Box<dyn Generator + '_>> = vec![Box::new(LoaderGenerator::new(model))];
        if model.markdown_output.is_some() {
            gens.push(Box::new(MarkdownGenerator::new(model)));
        }
        gens
    }
}

/// Nesting deeper than this is treated as a recursive type.
const MAX_DEPTH: usize = 16;

struct Collector<'a> {
    arena: &'a IrArena,
    fields: Vec<EnvField>,
    inits: Vec<PointerInit>,
    errors: Vec<Diagnostic>,
}

impl Collector<'_> {
    fn walk(&mut self, strukt: IrId, prefix: &str, path: &str, depth: usize) {
        let arena = self.arena;
        let IrType::Struct(s) = arena.get(strukt) else {
            return;
        };
        if depth > MAX_DEPTH {
            self.errors
                .push(Diagnostic::config(format!("Environment: {path} nests too deeply")));
            return;
        }
        for field in &s.fields {
            let var = &field.var;
            if !var.exported {
                continue;
            }
            let tag = field.tags.get("env");
            if tag.is_some_and(|t| t.name == "-") {
                continue;
            }
            let own = tag
                .map(|t| t.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| to_snake(&var.name.origin).to_uppercase());
            let name = format!("{prefix}{own}");
            let field_path = if path.is_empty() {
                var.name.origin.clone()
            } else {
                format!("{path}.{}", var.name.origin)
            };

            if let Some(inner) = self.nested_struct(var.ty) {
                if arena.get(var.ty).is_pointer() {
                    self.inits.push(PointerInit {
                        path: field_path.clone(),
                        ty: var.ty,
                    });
                }
                let next_prefix = if var.embedded && tag.is_none() {
                    prefix.to_string()
                } else {
                    format!("{name}_")
                };
                self.walk(inner, &next_prefix, &field_path, depth + 1);
                continue;
            }

            let Some(kind) = field_kind(arena, var.ty) else {
                self.errors.push(Diagnostic::config(format!(
                    "Environment: field {field_path} has an unsupported type"
                )));
                continue;
            };
            self.fields.push(EnvField {
                name,
                path: field_path,
                kind,
                ty: var.ty,
                flags: EnvFlags::from_tag(tag),
                desc: tag
                    .and_then(|t| t.option_value("desc"))
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }

    /// Struct body of a (pointer to a) struct-typed field, excluding
    /// `time.Duration`-like scalars.
    fn nested_struct(&self, ty: IrId) -> Option<IrId> {
        match self.arena.get(ty) {
            IrType::Struct(_) => Some(ty),
            IrType::Named(n) => match self.arena.get(n.ty) {
                IrType::Struct(_) => Some(n.ty),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Leaf kind of `ty`, looking through named scalar types.
pub fn field_kind(arena: &IrArena, ty: IrId) -> Option<FieldKind> {
    if arena.get(ty).is_pointer() {
        return None;
    }
    match arena.get(ty) {
        IrType::Named(n) if n.obj_id == "time.Duration" => Some(FieldKind::Duration),
        IrType::Named(n) => field_kind(arena, n.ty),
        IrType::Basic(b) if b.is_string() => Some(FieldKind::String),
        IrType::Basic(b) if b.is_bool() => Some(FieldKind::Bool),
        IrType::Basic(b) if b.is_any_int() => Some(FieldKind::Int { bits: b.bit_size() }),
        IrType::Basic(b) if b.is_any_uint() => Some(FieldKind::Uint { bits: b.bit_size() }),
        IrType::Basic(b) if b.is_any_float() => Some(FieldKind::Float { bits: b.bit_size() }),
        IrType::Slice(s) => match field_kind(arena, s.value)? {
            FieldKind::Slice(_) => None,
            inner => Some(FieldKind::Slice(Box::new(inner))),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests;
