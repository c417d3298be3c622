use std::path::PathBuf;

use swipe_diagnostic::Diagnostic;

/// Fatal loader failures. Per-package problems are not errors here; they
/// are collected on [`Package::errors`](crate::Package::errors).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("go list failed: {stderr}")]
    ListFailed { stderr: String },
    #[error("malformed package list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no packages matched {}", patterns.join(" "))]
    NoPackages { patterns: Vec<String> },
    #[error("no Go module found in {}", dir.display())]
    ModuleMissing { dir: PathBuf },
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("loading cancelled")]
    Cancelled,
}

impl From<LoadError> for Diagnostic {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Cancelled => Diagnostic::cancelled(),
            other => Diagnostic::load(other.to_string()),
        }
    }
}
