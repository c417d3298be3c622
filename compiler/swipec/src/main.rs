//! Swipe CLI

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use swipe_diagnostic::Diagnostic;
use swipe_gen::GoFmt;
use swipe_ir::CancellationToken;
use swipe_types::GoListDriver;
use swipec::commands::{gen, init, options};
use swipec::{logging, Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose());
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run one subcommand; `Ok(false)` when it reported a fatal diagnostic.
fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Command::Gen(args) => {
            let work_dir = args
                .work_dir
                .canonicalize()
                .with_context(|| format!("work dir {}", args.work_dir.display()))?;
            let opts = gen::GenOptions {
                work_dir,
                verbose: args.verbose,
                patterns: args.patterns,
            };
            let report = gen::run(
                &opts,
                &GoListDriver::new(),
                &GoFmt::from_env(),
                &CancellationToken::new(),
            );
            for path in &report.written {
                tracing::info!(path = %path.display(), "written");
            }
            Ok(report_diagnostics(report.diagnostics.into_sorted()))
        }
        Command::Init(args) => {
            let written = init::run(&args.work_dir, &args.pkg, &swipe_plugins::registry())
                .context("init")?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(true)
        }
        Command::Options(args) => {
            let report = options::run(&args.dir, &GoFmt::from_env());
            for path in &report.written {
                println!("{}", path.display());
            }
            Ok(report_diagnostics(report.diagnostics.into_sorted()))
        }
    }
}

/// Print every diagnostic; true when none was fatal.
fn report_diagnostics(diagnostics: Vec<Diagnostic>) -> bool {
    for line in gen::report_lines(&diagnostics) {
        eprintln!("{line}");
    }
    !diagnostics.iter().any(Diagnostic::is_fatal)
}
