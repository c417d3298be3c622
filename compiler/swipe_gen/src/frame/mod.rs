//! Framing: turning a generator body into a complete file.
//!
//! Go files get the generated-code header, a build constraint that hides
//! them from Swipe's own loads, the package clause and the import block,
//! and are then run through the [`Formatter`]. JavaScript files get a
//! comment preamble. Anything else is written as produced.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use swipe_diagnostic::Diagnostic;

use crate::importer::Importer;

/// Build tag under which Swipe loads packages.
pub const BUILD_TAG: &str = "swipe";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FileKind {
    Go,
    Js,
    Raw,
}

impl FileKind {
    pub fn of(filename: &str) -> FileKind {
        if filename.ends_with(".go") {
            FileKind::Go
        } else if filename.ends_with(".js") {
            FileKind::Js
        } else {
            FileKind::Raw
        }
    }
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum FrameError {
    /// The formatter rejected the framed source.
    #[error("format {filename}: {message}")]
    Format {
        filename: String,
        message: String,
        unformatted: Vec<u8>,
    },
}

impl From<FrameError> for Diagnostic {
    fn from(err: FrameError) -> Self {
        match &err {
            FrameError::Format { unformatted, .. } => Diagnostic::format(format!(
                "{err}\n{}",
                String::from_utf8_lossy(unformatted)
            )),
        }
    }
}

/// Formats framed Go source.
pub trait Formatter: Sync {
    fn format(&self, src: &[u8]) -> Result<Vec<u8>, String>;
}

/// Returns the source unchanged.
pub struct Passthrough;

impl Formatter for Passthrough {
    fn format(&self, src: &[u8]) -> Result<Vec<u8>, String> {
        Ok(src.to_vec())
    }
}

/// Pipes the source through `gofmt`.
pub struct GoFmt {
    binary: PathBuf,
}

impl GoFmt {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        GoFmt {
            binary: binary.into(),
        }
    }

    /// `$SWIPE_GOFMT`, else `gofmt` from `PATH`.
    pub fn from_env() -> Self {
        GoFmt::new(std::env::var_os("SWIPE_GOFMT").unwrap_or_else(|| "gofmt".into()))
    }
}

impl Formatter for GoFmt {
    fn format(&self, src: &[u8]) -> Result<Vec<u8>, String> {
        let mut child = Command::new(&self.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("{}: {e}", self.binary.display()))?;
        // Write from a scoped thread so a large file cannot deadlock on a
        // full stdout pipe.
        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(src),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });
        let output = output.map_err(|e| e.to_string())?;
        stdin_result(written, output.status.success(), &output.stderr)
            .map(|()| output.stdout)
    }
}

/// Fold the outcome of feeding the formatter into its result: a failed
/// exit reports stderr, a failed write is reported either way.
fn stdin_result(written: io::Result<()>, success: bool, stderr: &[u8]) -> Result<(), String> {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    match written {
        Ok(()) if success => Ok(()),
        Ok(()) => Err(stderr),
        Err(e) if stderr.is_empty() => Err(format!("writing formatter input: {e}")),
        Err(e) => Err(format!("{stderr} (writing formatter input: {e})")),
    }
}

/// Header line of every generated file.
pub fn header(version: &str) -> String {
    format!("Code generated by Swipe v{version}. DO NOT EDIT.")
}

/// Assemble the complete file for `body`.
pub fn frame(
    filename: &str,
    pkg_name: &str,
    version: &str,
    importer: &Importer,
    body: &[u8],
) -> Vec<u8> {
    match FileKind::of(filename) {
        FileKind::Go => {
            let mut out = format!("// {}\n\n//go:build !{BUILD_TAG}\n", header(version));
            out.push_str("\npackage ");
            out.push_str(pkg_name);
            out.push_str("\n\n");
            let imports = importer.sorted_import_lines();
            if !imports.is_empty() {
                out.push_str("import (\n");
                for line in imports {
                    out.push('\t');
                    out.push_str(&line);
                    out.push('\n');
                }
                out.push_str(")\n\n");
            }
            let mut bytes = out.into_bytes();
            bytes.extend_from_slice(body);
            bytes
        }
        FileKind::Js => {
            let mut bytes = format!("// {}\n\n", header(version)).into_bytes();
            bytes.extend_from_slice(body);
            bytes
        }
        FileKind::Raw => body.to_vec(),
    }
}

/// Frame and, for Go files, format.
pub fn frame_and_format(
    filename: &str,
    pkg_name: &str,
    version: &str,
    importer: &Importer,
    body: &[u8],
    formatter: &dyn Formatter,
) -> Result<Vec<u8>, FrameError> {
    let framed = frame(filename, pkg_name, version, importer, body);
    if FileKind::of(filename) != FileKind::Go {
        return Ok(framed);
    }
    formatter
        .format(&framed)
        .map_err(|message| FrameError::Format {
            filename: filename.to_string(),
            message,
            unformatted: framed,
        })
}

#[cfg(test)]
mod tests;
