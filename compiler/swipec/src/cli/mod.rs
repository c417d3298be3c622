//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "swipe", version)]
#[command(about = "Generate go-kit services and config loaders from a Go DSL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        matches!(&self.command, Command::Gen(args) if args.verbose)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the packages, decode the DSL calls and write the generated files
    Gen(GenArgs),
    /// Write the DSL package of every plugin
    Init(InitArgs),
    /// Generate `Options() []byte` methods for annotated option structs
    Options(OptionsArgs),
}

#[derive(Args, Debug)]
pub struct GenArgs {
    /// Module directory the patterns are resolved against
    #[arg(long, env = "SWIPE_WORK_DIR", default_value = ".")]
    pub work_dir: PathBuf,
    /// Debug logging with a span tree
    #[arg(short, long)]
    pub verbose: bool,
    /// Package patterns; `./...` when none are given here or in `<work-dir>/pkgs`
    pub patterns: Vec<String>,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[arg(long, env = "SWIPE_WORK_DIR", default_value = ".")]
    pub work_dir: PathBuf,
    /// Directory under the work dir that receives `swipe/<plugin>/swipe.go`
    #[arg(long, default_value = "pkg")]
    pub pkg: String,
}

#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Directory of the option structs
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests;
