//! Tracing setup for the `swipe` binary.
//!
//! The filter comes from `SWIPE_LOG`, then `RUST_LOG`. Without either,
//! only warnings are shown, or everything down to `debug` with `--verbose`.
//! Verbose runs print a span tree instead of flat lines.

use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "SWIPE_LOG";

static INIT: Once = Once::new();

/// Filter directives for the given environment values.
pub fn directives(swipe_log: Option<String>, rust_log: Option<String>, verbose: bool) -> String {
    swipe_log
        .into_iter()
        .chain(rust_log)
        .find(|d| !d.trim().is_empty())
        .unwrap_or_else(|| (if verbose { "debug" } else { "warn" }).to_string())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::new(directives(
            std::env::var(LOG_ENV).ok(),
            std::env::var("RUST_LOG").ok(),
            verbose,
        ));
        let result = if verbose {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .try_init()
        };
        if let Err(err) = result {
            eprintln!("swipe: logging disabled: {err}");
        }
    });
}

#[cfg(test)]
mod tests;
