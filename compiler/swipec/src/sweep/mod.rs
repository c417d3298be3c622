//! Pre-run removal of previously generated files.

use std::path::{Path, PathBuf};

use swipe_diagnostic::Diagnostic;
use swipe_gen::GENERATED_PREFIX;
use walkdir::WalkDir;

/// Delete every file under `work_dir` whose name contains `swipe_gen_`,
/// leaving `vendor` directories alone. Returns the removed paths.
#[tracing::instrument(level = "debug", skip_all, fields(work_dir = %work_dir.display()))]
pub fn sweep(work_dir: &Path) -> Result<Vec<PathBuf>, Diagnostic> {
    let mut removed = Vec::new();
    let walker = WalkDir::new(work_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() > 0 && e.file_type().is_dir() && e.file_name() == "vendor"));
    for entry in walker {
        let entry = entry.map_err(|e| Diagnostic::io(format!("sweep: {e}")))?;
        if !entry.file_type().is_file()
            || !entry.file_name().to_string_lossy().contains(GENERATED_PREFIX)
        {
            continue;
        }
        std::fs::remove_file(entry.path())
            .map_err(|e| Diagnostic::io(format!("remove {}: {e}", entry.path().display())))?;
        tracing::debug!(path = %entry.path().display(), "removed");
        removed.push(entry.into_path());
    }
    Ok(removed)
}

#[cfg(test)]
mod tests;
