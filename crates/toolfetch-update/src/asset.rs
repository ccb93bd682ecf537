//! Values passed between pipeline stages

use std::path::PathBuf;

/// A single downloadable file, as described by a release API or a mirror catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
    /// File name
    pub name: String,

    /// Download URL
    pub url: String,

    /// Size announced by the catalog, 0 when unknown
    pub expected_size: u64,

    /// Published digest, possibly prefixed with the algorithm (`sha256:...`)
    pub expected_hash: Option<String>,

    /// Modification time announced by the catalog
    pub modified_time: Option<i64>,
}

impl RemoteAsset {
    /// Create an asset with only a name and URL
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            expected_size: 0,
            expected_hash: None,
            modified_time: None,
        }
    }

    /// Set the announced size
    pub fn with_size(mut self, size: u64) -> Self {
        self.expected_size = size;
        self
    }

    /// Set the published digest
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.expected_hash = Some(hash.into());
        self
    }

    /// Set the modification time
    pub fn with_modified_time(mut self, time: i64) -> Self {
        self.modified_time = Some(time);
        self
    }
}

/// Result of a download operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    /// Path to the downloaded file
    pub local_path: PathBuf,

    /// Bytes written to disk
    pub bytes_written: u64,
}

/// Pick the asset with the greatest modification time.
///
/// Assets without a time sort before any timed asset; on a tie the earliest
/// asset in `assets` wins.
pub fn select_newest(assets: &[RemoteAsset]) -> Option<&RemoteAsset> {
    let mut newest: Option<&RemoteAsset> = None;
    for asset in assets {
        match newest {
            Some(current) if asset.modified_time <= current.modified_time => {}
            _ => newest = Some(asset),
        }
    }
    newest
}
