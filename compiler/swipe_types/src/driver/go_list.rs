use std::path::Path;
use std::process::Command;

use super::{Driver, ListedPackage, LoadOptions, SWIPE_TAG};
use crate::LoadError;

/// Lists packages with `go list -e -json -deps -tags swipe`.
///
/// The `go` binary is taken from `SWIPE_GO` when set.
#[derive(Clone, Debug)]
pub struct GoListDriver {
    go: String,
}

impl Default for GoListDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GoListDriver {
    pub fn new() -> Self {
        GoListDriver {
            go: std::env::var("SWIPE_GO").unwrap_or_else(|_| "go".to_string()),
        }
    }

    pub fn with_binary(go: impl Into<String>) -> Self {
        GoListDriver { go: go.into() }
    }
}

impl Driver for GoListDriver {
    #[tracing::instrument(level = "debug", skip_all, fields(patterns = ?opts.patterns))]
    fn list(&self, opts: &LoadOptions) -> Result<Vec<ListedPackage>, LoadError> {
        let output = Command::new(&self.go)
            .args(["list", "-e", "-json", "-deps", "-tags", SWIPE_TAG, "--"])
            .args(&opts.patterns)
            .current_dir(&opts.work_dir)
            .envs(opts.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|source| LoadError::Spawn {
                program: self.go.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(LoadError::ListFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let packages = decode_stream(&output.stdout)?;
        tracing::debug!(count = packages.len(), "listed packages");
        Ok(packages)
    }

    fn read_file(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Decode the concatenated JSON objects `go list -json` prints.
pub(crate) fn decode_stream(bytes: &[u8]) -> Result<Vec<ListedPackage>, LoadError> {
    serde_json::Deserializer::from_slice(bytes)
        .into_iter::<ListedPackage>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(LoadError::from)
}
