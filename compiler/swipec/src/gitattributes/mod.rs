//! The generated-files section of `.gitattributes`.
//!
//! Generated paths are listed with `-diff` between two marker lines so
//! reviews collapse them:
//!
//! ```text
//!
//! # /swipe gen
//! svc/swipe_gen_service_endpoint.go -diff
//! # swipe gen/
//! ```
//!
//! A file without the section gets one appended. A file with only one of
//! the two markers was edited by hand and is left alone.

use std::io;
use std::path::{Path, PathBuf};

use swipe_diagnostic::Diagnostic;

use crate::write::write_atomic;

pub const FILENAME: &str = ".gitattributes";
pub const START: &str = "\n# /swipe gen\n";
pub const END: &str = "# swipe gen/\n";

#[derive(Debug, thiserror::Error)]
pub enum GitattributesError {
    #[error("{}: corrupted swipe section: found {found:?} without {missing:?}", path.display())]
    Corrupted {
        path: PathBuf,
        found: &'static str,
        missing: &'static str,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<GitattributesError> for Diagnostic {
    fn from(err: GitattributesError) -> Self {
        Diagnostic::io(err.to_string())
    }
}

/// `content` with the section replaced by `entries`, one `<path> -diff`
/// line each.
pub fn update(path: &Path, content: &str, entries: &[String]) -> Result<String, GitattributesError> {
    let section: String = entries.iter().map(|e| format!("{e} -diff\n")).collect();
    let start = content.find(START);
    let end = match start {
        Some(s) => content[s + START.len()..]
            .find(END)
            .map(|i| s + START.len() + i),
        None => content.find(END),
    };
    match (start, end) {
        (None, None) => Ok(format!("{content}{START}{section}{END}")),
        (Some(s), Some(e)) => Ok(format!(
            "{}{section}{}",
            &content[..s + START.len()],
            &content[e..]
        )),
        (Some(_), None) => Err(GitattributesError::Corrupted {
            path: path.to_path_buf(),
            found: START.trim(),
            missing: END.trim(),
        }),
        (None, Some(_)) => Err(GitattributesError::Corrupted {
            path: path.to_path_buf(),
            found: END.trim(),
            missing: START.trim(),
        }),
    }
}

/// Section entries for `written`: paths relative to `work_dir` with `/`
/// separators, sorted and deduplicated.
pub fn entries(work_dir: &Path, written: &[PathBuf]) -> Vec<String> {
    let mut out: Vec<String> = written
        .iter()
        .map(|p| {
            p.strip_prefix(work_dir)
                .unwrap_or(p)
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Rewrite `<work_dir>/.gitattributes` to list `written`.
#[tracing::instrument(level = "debug", skip_all, fields(files = written.len()))]
pub fn rewrite(work_dir: &Path, written: &[PathBuf]) -> Result<(), GitattributesError> {
    let path = work_dir.join(FILENAME);
    let io_err = |source| GitattributesError::Io {
        path: path.clone(),
        source,
    };
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(io_err(err)),
    };
    let updated = update(&path, &content, &entries(work_dir, written))?;
    if updated == content {
        return Ok(());
    }
    write_atomic(&path, updated.as_bytes()).map_err(io_err)
}

#[cfg(test)]
mod tests;
