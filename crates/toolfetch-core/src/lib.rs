//! # toolfetch-core
//!
//! Core library for the toolfetch downloaders providing:
//! - Runtime configuration (embedded defaults, user file, environment overrides)
//! - The explicit per-invocation pipeline configuration
//! - Shared helpers

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use types::{PipelineConfig, RuntimeConfig};
pub use utils::{get_home_dir, human_readable_size};
