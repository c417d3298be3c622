//! Plugin registry: plugin ID to constructor and DSL stub.
//!
//! Filled once at startup and read-only afterwards. Iteration is ordered
//! by ID so runs are reproducible.

use std::collections::BTreeMap;

use crate::plugin::Plugin;

pub type PluginCtor = fn() -> Box<dyn Plugin>;

#[derive(Clone, Copy)]
pub struct PluginEntry {
    pub id: &'static str,
    /// Go source of the DSL package, without the package clause.
    pub stub: &'static str,
    ctor: PluginCtor,
}

impl PluginEntry {
    pub fn create(&self) -> Box<dyn Plugin> {
        (self.ctor)()
    }

    /// Package name the stub is written under (`service` for `Service`).
    pub fn package_name(&self) -> String {
        self.id.to_lowercase()
    }
}

#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<&'static str, PluginEntry>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin; a later registration of the same ID replaces the
    /// earlier one.
    pub fn register(&mut self, id: &'static str, stub: &'static str, ctor: PluginCtor) -> &mut Self {
        tracing::trace!(%id, "register plugin");
        self.plugins.insert(id, PluginEntry { id, stub, ctor });
        self
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.plugins.keys().copied().collect()
    }

    pub fn get(&self, id: &str) -> Option<&PluginEntry> {
        self.plugins.get(id)
    }

    pub fn create(&self, id: &str) -> Option<Box<dyn Plugin>> {
        self.get(id).map(PluginEntry::create)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginEntry> {
        self.plugins.values()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests;
