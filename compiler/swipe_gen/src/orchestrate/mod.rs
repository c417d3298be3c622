//! Plugin configuration and generator orchestration.
//!
//! ```text
//! DecodeResult ──► configure_all ──► [ConfiguredPlugin] ──► generate ──► [GeneratedFile]
//!                    (per inject,                              (grouped by output file,
//!                     per plugin ID)                            groups run in parallel)
//! ```
//!
//! Generators writing the same output file share one [`Importer`] and
//! their bodies are concatenated in declaration order. Nothing is written
//! to disk here.

use std::path::PathBuf;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use swipe_analysis::Analysis;
use swipe_diagnostic::{Diagnostic, Diagnostics};
use swipe_ir::{to_snake, CancellationToken, DecodeResult, IrArena, Position};

use crate::frame::{frame_and_format, Formatter, FrameError};
use crate::importer::Importer;
use crate::plugin::{ConfigureContext, GenContext, Generator, GlobalConfig, Plugin};
use crate::registry::PluginRegistry;

/// Prefix of every generated file name.
pub const GENERATED_PREFIX: &str = "swipe_gen_";

/// A plugin configured for one inject.
pub struct ConfiguredPlugin {
    pub plugin: Box<dyn Plugin>,
    pub module_path: String,
    /// Directory of the DSL call.
    pub base_path: PathBuf,
    pub pos: Position,
}

/// One output file.
#[derive(Debug)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub plugin_id: &'static str,
    pub content: Vec<u8>,
    /// Failures of the generators writing this file. When non-empty,
    /// `content` is whatever could be produced and must not be written.
    pub errors: Vec<Diagnostic>,
}

impl GeneratedFile {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// `swipe_gen_<plugin snake>_<filename>`
pub fn output_filename(plugin_id: &str, filename: &str) -> String {
    format!("{GENERATED_PREFIX}{}_{filename}", to_snake(plugin_id))
}

/// Configure every plugin of every inject.
///
/// A failing plugin reports into `diagnostics` and is left out; the others
/// are still configured.
#[tracing::instrument(level = "debug", skip_all, fields(injects = decoded.inject_count()))]
pub fn configure_all(
    registry: &PluginRegistry,
    global: &GlobalConfig,
    analysis: &Analysis,
    decoded: &DecodeResult,
    diagnostics: &mut Diagnostics,
) -> Vec<ConfiguredPlugin> {
    let mut configured = Vec::new();
    for (module, inject) in decoded.injects() {
        let ctx = ConfigureContext {
            global,
            analysis,
            module,
            inject,
        };
        for (id, options) in &inject.options {
            let Some(mut plugin) = registry.create(id) else {
                diagnostics.push(
                    Diagnostic::config(format!("unknown plugin {id:?}")).at(inject.pos.clone()),
                );
                continue;
            };
            match plugin.configure(&ctx, options) {
                Ok(()) => {
                    tracing::debug!(plugin = %id, pos = %inject.pos, "configured");
                    configured.push(ConfiguredPlugin {
                        plugin,
                        module_path: module.path.clone(),
                        base_path: inject.base_path.clone(),
                        pos: inject.pos.clone(),
                    });
                }
                Err(errors) => {
                    for err in errors {
                        let err = if err.pos.is_none() {
                            err.at(inject.pos.clone())
                        } else {
                            err
                        };
                        diagnostics.push(err);
                    }
                }
            }
        }
    }
    configured
}

struct Group<'g> {
    dir: PathBuf,
    filename: String,
    plugin_id: &'static str,
    members: Vec<&'g dyn Generator>,
}

/// Run every generator and frame the results.
///
/// Output order follows plugin order, then generator order. Files whose
/// generators all produced nothing are omitted.
#[tracing::instrument(level = "debug", skip_all, fields(plugins = plugins.len()))]
pub fn generate(
    global: &GlobalConfig,
    arena: &IrArena,
    plugins: &[ConfiguredPlugin],
    formatter: &dyn Formatter,
    cancel: &CancellationToken,
) -> Result<Vec<GeneratedFile>, Diagnostic> {
    let generators: Vec<_> = plugins
        .iter()
        .map(|p| (p, p.plugin.generators()))
        .collect();

    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut index: FxHashMap<(PathBuf, String), usize> = FxHashMap::default();
    for (configured, gens) in &generators {
        let plugin_id = configured.plugin.id();
        for generator in gens {
            let dir = match generator.output_path() {
                Some(path) if !path.as_os_str().is_empty() => global.resolve(path),
                _ => configured.base_path.clone(),
            };
            let filename = output_filename(plugin_id, generator.filename());
            let slot = *index
                .entry((dir.clone(), filename.clone()))
                .or_insert_with(|| {
                    groups.push(Group {
                        dir,
                        filename,
                        plugin_id,
                        members: Vec::new(),
                    });
                    groups.len() - 1
                });
            groups[slot].members.push(generator.as_ref());
        }
    }

    let results: Vec<Option<GeneratedFile>> = groups
        .par_iter()
        .map(|group| run_group(global, arena, group, formatter, cancel))
        .collect();
    if cancel.is_cancelled() {
        return Err(Diagnostic::cancelled());
    }
    Ok(results.into_iter().flatten().collect())
}

fn run_group(
    global: &GlobalConfig,
    arena: &IrArena,
    group: &Group<'_>,
    formatter: &dyn Formatter,
    cancel: &CancellationToken,
) -> Option<GeneratedFile> {
    let first = group.members.first()?;
    let pkg = first.package();
    let mut importer = Importer::new(pkg.path.as_str());
    let mut body = Vec::new();
    let mut errors = Vec::new();
    for generator in &group.members {
        if cancel.is_cancelled() {
            return None;
        }
        let mut ctx = GenContext {
            importer: &mut importer,
            arena,
            global,
        };
        match generator.generate(&mut ctx) {
            Ok(bytes) => body.extend_from_slice(&bytes),
            Err(err) => errors.push(err),
        }
    }
    let path = group.dir.join(&group.filename);
    if body.is_empty() && errors.is_empty() {
        tracing::debug!(path = %path.display(), "empty output skipped");
        return None;
    }
    let content = if errors.is_empty() {
        match frame_and_format(
            &group.filename,
            &pkg.name,
            &global.version,
            &importer,
            &body,
            formatter,
        ) {
            Ok(content) => content,
            Err(err) => {
                let FrameError::Format { unformatted, .. } = &err;
                let unformatted = unformatted.clone();
                errors.push(err.into());
                unformatted
            }
        }
    } else {
        body
    };
    tracing::debug!(path = %path.display(), bytes = content.len(), "generated");
    Some(GeneratedFile {
        path,
        plugin_id: group.plugin_id,
        content,
        errors,
    })
}
