//! Integrity checks on downloaded files
//!
//! Checks run in a fixed order and stop at the first failure:
//! size, then SHA256 against the published digest, then the CRC of every
//! archive entry.

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::asset::RemoteAsset;
use crate::error::{Error, Result};

/// Strip an `algo:` prefix and lowercase a published digest
pub fn normalize_digest(digest: &str) -> String {
    let digest = digest.trim();
    let bare = match digest.split_once(':') {
        Some((_, hex)) => hex,
        None => digest,
    };
    bare.to_ascii_lowercase()
}

/// Calculate the SHA256 checksum of a file, reading `block_size` bytes at a time
pub fn sha256_file(path: &Path, block_size: usize) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verifies a downloaded file against what its catalog announced
#[derive(Debug, Clone)]
pub struct IntegrityVerifier {
    block_size: usize,
    check_archive: bool,
    check_declared_size: bool,
}

impl IntegrityVerifier {
    /// Verifier for zip release archives
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            check_archive: true,
            check_declared_size: true,
        }
    }

    /// Enable or disable the archive entry check
    pub fn with_archive_check(mut self, enabled: bool) -> Self {
        self.check_archive = enabled;
        self
    }

    /// Enable or disable comparing the file size with the announced size
    pub fn with_declared_size_check(mut self, enabled: bool) -> Self {
        self.check_declared_size = enabled;
        self
    }

    /// Run every enabled check on `path`
    pub fn verify(&self, asset: &RemoteAsset, path: &Path) -> Result<()> {
        info!("Verifying {}", asset.name);

        self.verify_size(asset, path)?;

        if let Some(expected) = &asset.expected_hash {
            self.verify_hash(&asset.name, path, expected)?;
        } else {
            debug!("No digest published for {}, skipping hash check", asset.name);
        }

        if self.check_archive {
            verify_archive(path)?;
        }

        Ok(())
    }

    fn verify_size(&self, asset: &RemoteAsset, path: &Path) -> Result<()> {
        let actual = fs::metadata(path)?.len();

        if actual == 0 {
            return Err(Error::Incomplete {
                name: asset.name.clone(),
                expected: asset.expected_size,
                actual,
            });
        }

        if self.check_declared_size && asset.expected_size > 0 && actual != asset.expected_size {
            return Err(Error::Incomplete {
                name: asset.name.clone(),
                expected: asset.expected_size,
                actual,
            });
        }

        Ok(())
    }

    fn verify_hash(&self, name: &str, path: &Path, expected: &str) -> Result<()> {
        let expected = normalize_digest(expected);
        let actual = sha256_file(path, self.block_size)?;

        if actual != expected {
            return Err(Error::HashMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }

        debug!("SHA256 verified: {}", actual);
        Ok(())
    }
}

/// Read every entry of the zip at `path` to the end so each CRC is checked
pub fn verify_archive(path: &Path) -> Result<()> {
    let corrupt = |entry: String| Error::CorruptArchive {
        archive: path.to_path_buf(),
        entry,
    };

    let file = File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|_| corrupt(path.display().to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|_| corrupt(format!("#{}", index)))?;
        let name = entry.name().to_string();
        io::copy(&mut entry, &mut io::sink()).map_err(|_| corrupt(name))?;
    }

    debug!("{} archive entries verified", archive.len());
    Ok(())
}
