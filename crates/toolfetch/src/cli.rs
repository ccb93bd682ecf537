//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Options shared by both downloaders
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory holding runtime.yaml (default: ~/.toolfetch)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<Utf8PathBuf>,
}

/// Download and install the latest jadx release
#[derive(Parser, Debug)]
#[command(name = "download-jadx")]
#[command(author, version, about, long_about = None)]
pub struct JadxArgs {
    /// Installation directory
    #[arg(env = "JADX_HOME", value_name = "INSTALL_PATH")]
    pub install_path: Option<PathBuf>,

    /// GitHub token for API requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory for the downloaded archive (default: system temp dir)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Download the newest JEB build from the 52pojie mirror
#[derive(Parser, Debug)]
#[command(name = "download-jeb")]
#[command(author, version, about, long_about = None)]
pub struct JebArgs {
    /// Directory to save the file into
    #[arg(value_name = "TARGET_DIRECTORY")]
    pub target_directory: PathBuf,

    /// Path pattern; each `/`-separated segment is a regex
    #[arg(short, long)]
    pub pattern: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}
