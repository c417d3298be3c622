//! `swipe init`: write the DSL packages user code imports.

use std::io;
use std::path::{Path, PathBuf};

use swipe_gen::PluginRegistry;

use crate::write::write_atomic;

/// Write `<work_dir>/<pkg>/swipe/<plugin>/swipe.go` for every plugin and
/// return the paths.
pub fn run(work_dir: &Path, pkg: &str, registry: &PluginRegistry) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(registry.len());
    for entry in registry.iter() {
        let name = entry.package_name();
        let path = work_dir.join(pkg).join("swipe").join(&name).join("swipe.go");
        write_atomic(&path, stub_source(&name, entry.stub).as_bytes())?;
        tracing::debug!(plugin = entry.id, path = %path.display(), "stub written");
        written.push(path);
    }
    Ok(written)
}

pub fn stub_source(package: &str, stub: &str) -> String {
    format!("package {package}\n\n{stub}")
}

#[cfg(test)]
mod tests;
