//! Package patterns from the command line and `<work_dir>/pkgs`.

use std::io;
use std::path::Path;

pub const PKGS_FILE: &str = "pkgs";
pub const DEFAULT_PATTERN: &str = "./...";

/// Patterns listed in a `pkgs` file: one per line, blank lines and `#`
/// comments skipped.
pub fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Contents of `<work_dir>/pkgs`; empty when the file does not exist.
pub fn read(work_dir: &Path) -> io::Result<Vec<String>> {
    match std::fs::read_to_string(work_dir.join(PKGS_FILE)) {
        Ok(content) => Ok(parse(&content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

/// Command line patterns followed by the file's, or `./...` if both are
/// empty.
pub fn patterns(mut cli: Vec<String>, file: Vec<String>) -> Vec<String> {
    cli.extend(file);
    if cli.is_empty() {
        cli.push(DEFAULT_PATTERN.to_string());
    }
    cli
}

#[cfg(test)]
mod tests;
