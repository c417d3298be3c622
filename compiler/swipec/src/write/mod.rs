//! Atomic output writes.
//!
//! Content goes to a temporary file in the destination directory, which is
//! then renamed over the target, so a failed run never leaves a truncated
//! file behind.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use swipe_diagnostic::{Diagnostic, Diagnostics};
use swipe_gen::GeneratedFile;
use tempfile::NamedTempFile;

pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write every file that generated without errors.
///
/// Generator errors and write failures go to `diagnostics`; the paths
/// actually written are returned in input order.
#[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
pub fn write_files(files: Vec<GeneratedFile>, diagnostics: &mut Diagnostics) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for file in files {
        if !file.is_ok() {
            tracing::debug!(path = %file.path.display(), "not written: generator errors");
            diagnostics.extend(file.errors);
            continue;
        }
        match write_atomic(&file.path, &file.content) {
            Ok(()) => written.push(file.path),
            Err(err) => {
                diagnostics.push(Diagnostic::io(format!("write {}: {err}", file.path.display())));
            }
        }
    }
    written
}

#[cfg(test)]
mod tests;
