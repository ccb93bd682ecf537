//! Explicit per-invocation configuration handed to a pipeline

use std::path::PathBuf;

/// Everything a pipeline run needs from its environment.
///
/// Built once by the binaries from arguments and environment variables; the
/// pipeline itself never reads the environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Install root (release flow) or target directory (mirror flow)
    pub target_path: PathBuf,

    /// Token sent as a bearer authorization header to the release API
    pub auth_token: Option<String>,

    /// Path pattern for catalog lookups
    pub pattern: Option<String>,

    /// Directory holding downloads before they are installed
    pub temp_dir: PathBuf,
}

impl PipelineConfig {
    /// Create a config for `target_path` using the system temp directory
    pub fn new(target_path: impl Into<PathBuf>) -> Self {
        Self {
            target_path: target_path.into(),
            auth_token: None,
            pattern: None,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Set the auth token, ignoring empty values
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Set the catalog pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the download directory
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }
}
