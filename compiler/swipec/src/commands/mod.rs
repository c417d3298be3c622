//! Subcommand implementations.
//!
//! Each returns what it did plus the diagnostics it collected; printing
//! and the exit code are left to the binary.

pub mod gen;
pub mod init;
pub mod options;
