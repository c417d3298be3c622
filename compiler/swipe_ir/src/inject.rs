//! Injects: one per top-level DSL invocation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{OptionValue, Package, Position};

/// One invocation of a top-level DSL function, such as `Service(...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Inject {
    pub pkg: Package,
    /// Directory of the file holding the DSL call.
    pub base_path: PathBuf,
    pub pos: Position,
    /// Plugin ID to the decoded option tree of that call.
    pub options: BTreeMap<String, OptionValue>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedModule {
    pub path: String,
    pub external: bool,
    pub injects: Vec<Inject>,
}

/// Output of the option decoder, keyed by module path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeResult {
    pub modules: BTreeMap<String, DecodedModule>,
}

impl DecodeResult {
    pub fn is_empty(&self) -> bool {
        self.modules.values().all(|m| m.injects.is_empty())
    }

    pub fn inject_count(&self) -> usize {
        self.modules.values().map(|m| m.injects.len()).sum()
    }

    /// All injects in module order, then call order.
    pub fn injects(&self) -> impl Iterator<Item = (&DecodedModule, &Inject)> {
        self.modules
            .values()
            .flat_map(|m| m.injects.iter().map(move |i| (m, i)))
    }
}
