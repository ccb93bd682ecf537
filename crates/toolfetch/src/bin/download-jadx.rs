//! download-jadx - install the latest jadx release

use clap::Parser;
use std::process::ExitCode;
use toolfetch::cli::JadxArgs;
use toolfetch::{commands, init_tracing, output};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = JadxArgs::parse();
    init_tracing(args.common.verbose, args.common.quiet);

    match commands::jadx::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
