use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;

use super::{Cli, Command};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn gen_takes_flags_and_patterns() {
    let cli = parse(&["swipe", "gen", "--work-dir", "/src/app", "-v", "./cmd/...", "./pkg"]);
    assert!(cli.verbose());
    let Command::Gen(args) = cli.command else {
        panic!("expected gen");
    };
    assert_eq!(args.work_dir, PathBuf::from("/src/app"));
    assert_eq!(args.patterns, vec!["./cmd/...".to_string(), "./pkg".to_string()]);
}

#[test]
fn init_defaults_to_pkg() {
    let cli = parse(&["swipe", "init"]);
    assert!(!cli.verbose());
    let Command::Init(args) = cli.command else {
        panic!("expected init");
    };
    assert_eq!(args.pkg, "pkg");
}

#[test]
fn options_requires_a_directory() {
    assert!(Cli::try_parse_from(["swipe", "options"]).is_err());
    let Command::Options(args) = parse(&["swipe", "options", "./opts"]).command else {
        panic!("expected options");
    };
    assert_eq!(args.dir, PathBuf::from("./opts"));
}

#[test]
fn unknown_subcommands_are_rejected() {
    assert!(Cli::try_parse_from(["swipe", "build"]).is_err());
}
