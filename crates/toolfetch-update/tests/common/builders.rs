//! Builders for release API payloads and test configuration

use serde_json::{json, Value};
use toolfetch_core::{PipelineConfig, RuntimeConfig};

use super::constants::*;

/// Builder for the JSON body of a "latest release" response
#[derive(Debug, Clone)]
pub struct ReleaseJsonBuilder {
    tag_name: String,
    assets: Vec<Value>,
}

impl ReleaseJsonBuilder {
    /// Create a new builder tagged v1.5.0 with no assets
    pub fn new() -> Self {
        Self {
            tag_name: TAG_V1_5_0.to_string(),
            assets: Vec::new(),
        }
    }

    /// Set the tag name
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag_name = tag.to_string();
        self
    }

    /// Add an asset served by the mock server at `/download/{name}`
    pub fn asset(mut self, server_uri: &str, name: &str, size: u64, digest: Option<&str>) -> Self {
        let mut asset = json!({
            "name": name,
            "browser_download_url": download_url(server_uri, name),
            "size": size,
        });
        if let Some(digest) = digest {
            asset["digest"] = json!(digest);
        }
        self.assets.push(asset);
        self
    }

    /// Build the JSON value
    pub fn build(self) -> Value {
        json!({
            "tag_name": self.tag_name,
            "name": format!("Release {}", self.tag_name),
            "prerelease": false,
            "draft": false,
            "published_at": "2024-06-01T00:00:00Z",
            "assets": self.assets,
        })
    }
}

impl Default for ReleaseJsonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// URL the mock server serves `name` from
pub fn download_url(server_uri: &str, name: &str) -> String {
    format!("{}/download/{}", server_uri, name)
}

/// Runtime config pointing every remote at `server_uri`
pub fn runtime_for(server_uri: &str) -> RuntimeConfig {
    let mut runtime = RuntimeConfig::default();
    runtime.network.http_timeout_secs = 5;
    runtime.network.download_timeout_secs = 10;
    runtime.release.api_url = server_uri.to_string();
    runtime.mirror.list_url = format!("{}{}", server_uri, CATALOG_PATH);
    runtime.mirror.base_url = server_uri.to_string();
    runtime
}

/// Pipeline config installing into `target` with downloads under `temp`
pub fn pipeline_config(target: &std::path::Path, temp: &std::path::Path) -> PipelineConfig {
    PipelineConfig::new(target).with_temp_dir(temp)
}
