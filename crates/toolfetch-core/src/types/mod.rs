//! Type definitions shared by the toolfetch crates

mod pipeline_config;
mod runtime_config;

pub use pipeline_config::PipelineConfig;
pub use runtime_config::{MirrorConfig, NetworkConfig, ReleaseSourceConfig, RuntimeConfig};
