//! `swipe gen`: the full pipeline.
//!
//! Stages that can still produce useful output collect their errors and
//! continue (package errors, generator errors, individual writes); a
//! failed load or decode stops the run before anything is written.

use std::path::PathBuf;

use swipe_analysis::Analysis;
use swipe_diagnostic::{Diagnostic, Diagnostics};
use swipe_gen::{configure_all, generate, Formatter, GlobalConfig};
use swipe_ir::CancellationToken;
use swipe_types::{Driver, LoadOptions};

use crate::{gitattributes, pkgs, sweep, write};

#[derive(Clone, Debug)]
pub struct GenOptions {
    pub work_dir: PathBuf,
    pub verbose: bool,
    /// Patterns from the command line; `<work_dir>/pkgs` is appended.
    pub patterns: Vec<String>,
}

#[derive(Debug, Default)]
pub struct GenReport {
    /// Stale generated files removed before loading.
    pub removed: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

impl GenReport {
    pub fn is_ok(&self) -> bool {
        !self.diagnostics.has_fatal()
    }
}

/// Last line printed when a run collected a fatal diagnostic.
pub const FAILURE_SUMMARY: &str = "at least one generate failure";

/// User-facing lines for `diagnostics`: one `kind: message` line each, then
/// [`FAILURE_SUMMARY`] if any of them is fatal.
pub fn report_lines(diagnostics: &[Diagnostic]) -> Vec<String> {
    let mut lines: Vec<_> = diagnostics.iter().map(|d| format!("{}: {d}", d.kind)).collect();
    if diagnostics.iter().any(Diagnostic::is_fatal) {
        lines.push(FAILURE_SUMMARY.to_string());
    }
    lines
}

#[tracing::instrument(level = "debug", skip_all, fields(work_dir = %opts.work_dir.display()))]
pub fn run(
    opts: &GenOptions,
    driver: &dyn Driver,
    formatter: &dyn Formatter,
    cancel: &CancellationToken,
) -> GenReport {
    let mut report = GenReport::default();
    if let Err(err) = pipeline(opts, driver, formatter, cancel, &mut report) {
        report.diagnostics.push(err);
    }
    report
}

fn pipeline(
    opts: &GenOptions,
    driver: &dyn Driver,
    formatter: &dyn Formatter,
    cancel: &CancellationToken,
    report: &mut GenReport,
) -> Result<(), Diagnostic> {
    let extra = pkgs::read(&opts.work_dir).map_err(|e| {
        Diagnostic::io(format!("{}: {e}", opts.work_dir.join(pkgs::PKGS_FILE).display()))
    })?;
    let patterns = pkgs::patterns(opts.patterns.clone(), extra);
    tracing::debug!(?patterns, "patterns");

    report.removed = sweep::sweep(&opts.work_dir)?;

    let load_opts = LoadOptions {
        work_dir: opts.work_dir.clone(),
        env: Vec::new(),
        patterns,
    };
    let mut analysis = Analysis::load(driver, &load_opts, cancel)?;
    report.diagnostics.extend(analysis.package_diagnostics());

    let registry = swipe_plugins::registry();
    let decoded = analysis.decode(&registry.ids(), &mut report.diagnostics)?;
    if decoded.inject_count() == 0 {
        report
            .diagnostics
            .push(Diagnostic::warn("no swipe calls found in the loaded packages"));
    }

    let mut global = GlobalConfig::new(opts.work_dir.clone());
    global.verbose = opts.verbose;
    let plugins = configure_all(
        &registry,
        &global,
        &analysis,
        &decoded,
        &mut report.diagnostics,
    );
    let files = generate(&global, analysis.arena(), &plugins, formatter, cancel)?;
    if cancel.is_cancelled() {
        return Err(Diagnostic::cancelled());
    }

    report.written = write::write_files(files, &mut report.diagnostics);
    gitattributes::rewrite(&opts.work_dir, &report.written)?;
    tracing::info!(
        written = report.written.len(),
        removed = report.removed.len(),
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests;
