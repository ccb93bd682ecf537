//! Command-line front end for the toolfetch downloaders
//!
//! Shared by the `download-jadx` and `download-jeb` binaries.

pub mod cli;
pub mod commands;
pub mod output;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with appropriate verbosity
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
