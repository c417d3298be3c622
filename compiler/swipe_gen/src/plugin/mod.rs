//! The contracts between the pipeline and a plugin.
//!
//! A [`Plugin`] is created once per inject that names it, configured from
//! its option subtree, and then asked for its [`Generator`]s. Generators
//! only produce file bodies; imports, headers and formatting are added by
//! the orchestrator.

use std::path::{Path, PathBuf};

use swipe_analysis::Analysis;
use swipe_diagnostic::Diagnostic;
use swipe_ir::{DecodedModule, Inject, IrArena, OptionValue, Package};

use crate::importer::Importer;

/// Settings shared by every plugin of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalConfig {
    pub work_dir: PathBuf,
    /// Swipe version written into generated headers.
    pub version: String,
    pub verbose: bool,
}

impl GlobalConfig {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        GlobalConfig {
            work_dir: work_dir.into(),
            version: crate::VERSION.to_string(),
            verbose: false,
        }
    }

    /// `path` made absolute against the work directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}

/// What a plugin sees while configuring.
pub struct ConfigureContext<'a> {
    pub global: &'a GlobalConfig,
    pub analysis: &'a Analysis,
    pub module: &'a DecodedModule,
    pub inject: &'a Inject,
}

impl ConfigureContext<'_> {
    #[inline]
    pub fn arena(&self) -> &IrArena {
        self.analysis.arena()
    }
}

pub trait Plugin {
    /// Identifier used in `@swipe:"<ID>"` and in output file names.
    fn id(&self) -> &'static str;

    /// Decode `options` and prepare everything the generators need.
    ///
    /// Every problem found is returned, not just the first.
    fn configure(
        &mut self,
        ctx: &ConfigureContext<'_>,
        options: &OptionValue,
    ) -> Result<(), Vec<Diagnostic>>;

    /// Generators in output order.
    fn generators(&self) -> Vec<Box<dyn Generator + '_>>;
}

/// What a generator sees while producing its body.
pub struct GenContext<'a> {
    pub importer: &'a mut Importer,
    pub arena: &'a IrArena,
    pub global: &'a GlobalConfig,
}

pub trait Generator: Sync {
    /// Package of the generated file; names the package line and decides
    /// which imports are needed.
    fn package(&self) -> &Package;

    /// Output directory; `None` writes next to the DSL call.
    fn output_path(&self) -> Option<&Path> {
        None
    }

    /// File name without the `swipe_gen_<plugin>_` prefix.
    fn filename(&self) -> &str;

    /// File body without header, package line or imports. An empty body
    /// produces no file.
    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic>;
}
