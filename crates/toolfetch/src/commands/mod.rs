//! Command implementations

pub mod jadx;
pub mod jeb;

use anyhow::{Context, Result};
use toolfetch_core::{ConfigLoader, RuntimeConfig};
use toolfetch_update::{BarProgress, NoopProgress, ProgressObserver};
use tracing::debug;

use crate::cli::CommonArgs;

/// Load runtime configuration from `--config-dir` or the default location
pub(crate) fn load_runtime_config(common: &CommonArgs) -> Result<RuntimeConfig> {
    let loader = match &common.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir.clone()),
        None => ConfigLoader::new().context("Failed to create config loader")?,
    };
    debug!("Loading runtime config from {}", loader.config_dir());
    loader
        .load_runtime_config()
        .context("Failed to load runtime config")
}

/// Progress bar unless output is suppressed
pub(crate) fn progress_observer(common: &CommonArgs) -> Box<dyn ProgressObserver> {
    if common.quiet {
        Box::new(NoopProgress)
    } else {
        Box::new(BarProgress::new())
    }
}
