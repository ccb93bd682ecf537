//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior like
//! network timeouts and where releases are looked up.

use serde::{Deserialize, Serialize};

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Release API source (jadx)
    #[serde(default)]
    pub release: ReleaseSourceConfig,

    /// Mirror catalog source (JEB)
    #[serde(default)]
    pub mirror: MirrorConfig,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for metadata requests in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout for a whole download in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Block size used when hashing downloaded files
    #[serde(default = "default_chunk_size")]
    pub download_chunk_size: usize,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            download_timeout_secs: default_download_timeout(),
            download_chunk_size: default_chunk_size(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    60
}
fn default_download_timeout() -> u64 {
    1800 // 30 minutes
}
fn default_chunk_size() -> usize {
    8192
}
fn default_user_agent() -> String {
    format!(
        "toolfetch/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// GitHub-style release API source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseSourceConfig {
    /// Base URL for the release API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repository owner
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Regex an asset name must match to be installed
    #[serde(default = "default_asset_pattern")]
    pub asset_pattern: String,

    /// Paths, relative to the install root, that get the executable bits
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,

    /// Directory name under the system temp dir used for downloads
    #[serde(default = "default_temp_dir_name")]
    pub temp_dir_name: String,
}

impl Default for ReleaseSourceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            asset_pattern: default_asset_pattern(),
            entry_points: default_entry_points(),
            temp_dir_name: default_temp_dir_name(),
        }
    }
}

impl ReleaseSourceConfig {
    /// URL of the "latest release" endpoint
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            self.repo_owner,
            self.repo_name
        )
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_repo_owner() -> String {
    "skylot".to_string()
}
fn default_repo_name() -> String {
    "jadx".to_string()
}
fn default_asset_pattern() -> String {
    r"^jadx-[\d.]+\.zip$".to_string()
}
fn default_entry_points() -> Vec<String> {
    vec!["bin/jadx".to_string(), "bin/jadx-gui".to_string()]
}
fn default_temp_dir_name() -> String {
    "jadx_download".to_string()
}

/// Download mirror publishing a JSONP file catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MirrorConfig {
    /// URL of the catalog script
    #[serde(default = "default_list_url")]
    pub list_url: String,

    /// Base URL file paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// JSONP callback wrapping the catalog
    #[serde(default = "default_callback")]
    pub callback: String,

    /// Referer sent with catalog requests
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Path pattern used when none is given on the command line
    #[serde(default = "default_mirror_pattern")]
    pub default_pattern: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
            base_url: default_base_url(),
            callback: default_callback(),
            referer: default_referer(),
            default_pattern: default_mirror_pattern(),
        }
    }
}

fn default_list_url() -> String {
    "https://down.52pojie.cn/list.js".to_string()
}
fn default_base_url() -> String {
    "https://down.52pojie.cn".to_string()
}
fn default_callback() -> String {
    "__jsonpCallbackDown52PojieCn".to_string()
}
fn default_referer() -> String {
    "https://down.52pojie.cn/Tools/Android_Tools/".to_string()
}
fn default_mirror_pattern() -> String {
    r"/Tools/Android_Tools/JEB_demo_([\d.]+)_by_CXV".to_string()
}
