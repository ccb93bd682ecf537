//! download-jeb - fetch the newest JEB build from the mirror

use clap::Parser;
use std::process::ExitCode;
use toolfetch::cli::JebArgs;
use toolfetch::{commands, init_tracing, output};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = JebArgs::parse();
    init_tracing(args.common.verbose, args.common.quiet);

    match commands::jeb::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
