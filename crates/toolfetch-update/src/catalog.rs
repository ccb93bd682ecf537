//! Mirror file-catalog lookup
//!
//! The mirror publishes its whole file tree as a JSONP script
//! (`callback({...});`), sometimes gzip-compressed regardless of what the
//! response headers say. Files are located by a `/`-separated path pattern
//! whose segments are regular expressions.

use flate2::read::GzDecoder;
use regex::Regex;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;
use toolfetch_core::types::{MirrorConfig, NetworkConfig};
use tracing::debug;

use crate::asset::RemoteAsset;
use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A node of the mirror's file tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CatalogNode {
    /// Any node carrying `children`
    Directory {
        #[serde(default)]
        name: String,
        children: Vec<CatalogNode>,
    },
    /// A downloadable file
    Leaf {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        size: u64,
        #[serde(default, deserialize_with = "null_as_default")]
        time: i64,
    },
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogNode {
    /// Node name (the root directory may have none)
    pub fn name(&self) -> &str {
        match self {
            CatalogNode::Directory { name, .. } | CatalogNode::Leaf { name, .. } => name,
        }
    }
}

/// A compiled `/dir/dir/file` pattern.
///
/// Each segment is a regex anchored at the start of the node name but not
/// at its end. All but the last segment select directories; the last
/// selects files.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    segments: Vec<Regex>,
}

impl PathPattern {
    /// Compile a pattern, ignoring a leading `/`
    pub fn parse(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(Error::not_found(format!("empty pattern {:?}", pattern)));
        }

        let segments = trimmed
            .split('/')
            .map(|segment| {
                Regex::new(&format!("^(?:{})", segment)).map_err(|e| {
                    Error::not_found(format!("invalid pattern segment {:?}: {}", segment, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of path segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

/// Decode a catalog response body: gunzip when it carries the gzip magic,
/// then strip the JSONP wrapper and parse the tree.
pub fn parse_catalog(raw: &[u8], callback: &str) -> Result<CatalogNode> {
    let text = decode_body(raw)?;
    let json = unwrap_jsonp(&text, callback)?;
    serde_json::from_str(json)
        .map_err(|e| Error::catalog_unavailable(format!("malformed catalog JSON: {}", e)))
}

fn decode_body(raw: &[u8]) -> Result<String> {
    if raw.starts_with(&GZIP_MAGIC) {
        debug!("Catalog body is gzip-compressed ({} bytes)", raw.len());
        let mut text = String::new();
        GzDecoder::new(raw)
            .read_to_string(&mut text)
            .map_err(|e| Error::catalog_unavailable(format!("invalid gzip payload: {}", e)))?;
        Ok(text)
    } else {
        String::from_utf8(raw.to_vec())
            .map_err(|_| Error::catalog_unavailable("catalog is not valid UTF-8"))
    }
}

/// Extract the argument of `callback(...)`, tolerating a trailing `;` and whitespace
pub fn unwrap_jsonp<'a>(content: &'a str, callback: &str) -> Result<&'a str> {
    let start = content.find(&format!("{}(", callback)).ok_or_else(|| {
        Error::catalog_unavailable(format!("expected a {}(...) wrapper", callback))
    })? + callback.len()
        + 1;

    let tail = content[start..].trim_end();
    let tail = tail.strip_suffix(';').unwrap_or(tail).trim_end();
    let inner = tail
        .strip_suffix(')')
        .ok_or_else(|| Error::catalog_unavailable("unterminated JSONP wrapper"))?;

    Ok(inner)
}

/// Find every leaf reachable through `pattern`.
///
/// Iterative depth-first walk; matches come back in catalog order.
pub fn find_matches(root: &CatalogNode, pattern: &PathPattern, base_url: &str) -> Vec<RemoteAsset> {
    let base_url = base_url.trim_end_matches('/');
    let last = pattern.depth() - 1;
    let mut matches = Vec::new();

    let CatalogNode::Directory { children, .. } = root else {
        return matches;
    };

    // (candidate node, segment it must match, path of its parent)
    let mut stack: Vec<(&CatalogNode, usize, String)> = children
        .iter()
        .rev()
        .map(|child| (child, 0, String::new()))
        .collect();

    while let Some((node, depth, parent)) = stack.pop() {
        if !pattern.segments[depth].is_match(node.name()) {
            continue;
        }
        let path = format!("{}/{}", parent, node.name());

        match node {
            CatalogNode::Directory { children, .. } if depth < last => {
                // Reversed so the first child is popped first
                for child in children.iter().rev() {
                    stack.push((child, depth + 1, path.clone()));
                }
            }
            CatalogNode::Leaf { name, size, time } if depth == last => {
                matches.push(RemoteAsset {
                    name: name.clone(),
                    url: format!("{}{}", base_url, path),
                    expected_size: *size,
                    expected_hash: None,
                    modified_time: Some(*time),
                });
            }
            _ => {}
        }
    }

    matches
}

/// Fetches the mirror catalog
pub struct MirrorCatalog {
    client: reqwest::Client,
    config: MirrorConfig,
}

impl MirrorCatalog {
    /// Create a catalog client
    pub fn new(network: &NetworkConfig, config: &MirrorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Download and parse the catalog
    pub async fn fetch(&self) -> Result<CatalogNode> {
        debug!("Fetching catalog from: {}", self.config.list_url);

        let response = self
            .client
            .get(&self.config.list_url)
            .header("Accept", "*/*")
            .header("Accept-Encoding", "gzip")
            .header("Cache-Control", "no-cache")
            .header("Referer", &self.config.referer)
            .send()
            .await
            .map_err(|e| Error::catalog_unavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::catalog_unavailable(format!(
                "failed to fetch catalog: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::catalog_unavailable(format!("failed to read response: {}", e)))?;

        parse_catalog(&body, &self.config.callback)
    }

    /// Fetch the catalog and return every file matching `pattern`
    pub async fn locate(&self, pattern: &PathPattern) -> Result<Vec<RemoteAsset>> {
        let root = self.fetch().await?;
        let matches = find_matches(&root, pattern, &self.config.base_url);
        debug!("{} file(s) match {}", matches.len(), pattern.as_str());
        Ok(matches)
    }
}
