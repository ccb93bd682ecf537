//! GitHub releases lookup

use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use toolfetch_core::types::{NetworkConfig, ReleaseSourceConfig};
use tracing::{debug, info};

use crate::asset::RemoteAsset;
use crate::error::{Error, Result};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v1.5.0")
    pub tag_name: String,

    /// Release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Release asset
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,

    /// Asset size in bytes
    #[serde(default)]
    pub size: u64,

    /// Digest published by the API, e.g. "sha256:ab12..."
    #[serde(default)]
    pub digest: Option<String>,
}

impl From<&ReleaseAsset> for RemoteAsset {
    fn from(asset: &ReleaseAsset) -> Self {
        Self {
            name: asset.name.clone(),
            url: asset.browser_download_url.clone(),
            expected_size: asset.size,
            expected_hash: asset.digest.clone().filter(|d| !d.is_empty()),
            modified_time: None,
        }
    }
}

/// A release reduced to the assets matching the configured pattern
#[derive(Debug, Clone)]
pub struct LocatedRelease {
    /// Release identifier written to the version marker
    pub tag: String,

    /// Matching assets in release order
    pub assets: Vec<RemoteAsset>,
}

/// Looks up the latest release and filters its assets
pub struct ReleaseLocator {
    /// HTTP client
    client: reqwest::Client,

    /// Latest-release endpoint
    latest_url: String,

    /// Asset name filter
    asset_pattern: Regex,

    /// Optional API token
    auth_token: Option<String>,
}

impl ReleaseLocator {
    /// Create a new release locator
    pub fn new(
        network: &NetworkConfig,
        source: &ReleaseSourceConfig,
        auth_token: Option<String>,
    ) -> Result<Self> {
        let asset_pattern = Regex::new(&source.asset_pattern).map_err(|e| {
            Error::catalog_unavailable(format!(
                "invalid asset pattern {:?}: {}",
                source.asset_pattern, e
            ))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            latest_url: source.latest_release_url(),
            asset_pattern,
            auth_token,
        })
    }

    /// Headers sent with every request to the release API
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Accept".to_string(), GITHUB_ACCEPT.to_string())];
        headers.extend(self.auth_header());
        headers
    }

    /// Authorization header, when a token is configured
    pub fn auth_header(&self) -> Option<(String, String)> {
        self.auth_token
            .as_ref()
            .map(|token| ("Authorization".to_string(), format!("Bearer {}", token)))
    }

    /// Get latest release
    pub async fn get_latest(&self) -> Result<Release> {
        debug!("Fetching latest release from: {}", self.latest_url);
        if self.auth_token.is_some() {
            info!("Using GitHub token for API requests");
        }

        let mut request = self.client.get(&self.latest_url);
        for (key, value) in self.request_headers() {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::catalog_unavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::catalog_unavailable(format!(
                "failed to fetch release: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::catalog_unavailable(format!("failed to read response: {}", e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| Error::catalog_unavailable(format!("malformed release JSON: {}", e)))
    }

    /// Assets of `release` whose names match the configured pattern
    pub fn matching_assets(&self, release: &Release) -> Vec<RemoteAsset> {
        release
            .assets
            .iter()
            .filter(|a| self.asset_pattern.is_match(&a.name))
            .map(RemoteAsset::from)
            .collect()
    }

    /// Fetch the latest release and keep only matching assets
    pub async fn locate_latest(&self) -> Result<LocatedRelease> {
        let release = self.get_latest().await?;
        let assets = self.matching_assets(&release);

        debug!(
            "Release {} has {} asset(s), {} matching {}",
            release.tag_name,
            release.assets.len(),
            assets.len(),
            self.asset_pattern
        );

        Ok(LocatedRelease {
            tag: release.tag_name,
            assets,
        })
    }

    /// The first matching asset, or `NotFound`
    pub fn first_match(&self, located: &LocatedRelease) -> Result<RemoteAsset> {
        located.assets.first().cloned().ok_or_else(|| {
            Error::not_found(format!(
                "pattern {} in release {}",
                self.asset_pattern, located.tag
            ))
        })
    }
}
