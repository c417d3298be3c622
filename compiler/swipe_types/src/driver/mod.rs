//! Package listers.
//!
//! A [`Driver`] answers two questions: which packages do these patterns
//! denote (with their dependencies), and what is in this file. The
//! production driver asks `go list`; the in-memory driver serves sources
//! registered by the caller and is what the test-suites use.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::LoadError;

mod go_list;
mod memory;

pub use go_list::GoListDriver;
pub use memory::MemoryDriver;

/// The build tag every load enables.
pub const SWIPE_TAG: &str = "swipe";

/// Module record as reported by `go list -json`.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListedModule {
    pub path: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub dir: PathBuf,
    #[serde(default)]
    pub main: bool,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListError {
    #[serde(default)]
    pub pos: String,
    pub err: String,
}

/// One package of the `go list -json` stream.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListedPackage {
    pub import_path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dir: PathBuf,
    /// File names relative to `dir`, after build constraints.
    #[serde(default)]
    pub go_files: Vec<String>,
    #[serde(default)]
    pub cgo_files: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    /// Source import path to resolved path (vendoring).
    #[serde(default)]
    pub import_map: BTreeMap<String, String>,
    #[serde(default)]
    pub module: Option<ListedModule>,
    #[serde(default)]
    pub dep_only: bool,
    #[serde(default)]
    pub standard: bool,
    #[serde(default)]
    pub error: Option<ListError>,
}

impl ListedPackage {
    /// Absolute paths of every compiled Go file.
    pub fn source_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.go_files
            .iter()
            .chain(&self.cgo_files)
            .map(|name| self.dir.join(name))
    }
}

/// What to load.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub work_dir: PathBuf,
    /// Extra `KEY=VALUE` environment for the lister.
    pub env: Vec<(String, String)>,
    pub patterns: Vec<String>,
}

pub trait Driver: Sync {
    /// List `patterns` and their transitive dependencies, dependencies first.
    fn list(&self, opts: &LoadOptions) -> Result<Vec<ListedPackage>, LoadError>;

    fn read_file(&self, path: &Path) -> std::io::Result<String>;
}

#[cfg(test)]
mod tests;
