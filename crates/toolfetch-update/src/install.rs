//! Unpacking a verified archive into the install root
//!
//! Installation always starts from an empty root: any previous install is
//! removed first, the archive is extracted, a lone wrapper directory is
//! flattened away, entry points get their executable bits and finally the
//! version marker is written.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Name of the file recording the installed release
pub const VERSION_MARKER: &str = ".version";

/// Per-file outcome of granting executable permission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionReport {
    /// Files whose mode was updated
    pub applied: Vec<String>,

    /// Listed files that do not exist
    pub missing: Vec<String>,

    /// Existing files whose mode could not be changed
    pub failed: Vec<String>,
}

impl PermissionReport {
    /// Whether every listed file exists and was updated
    pub fn all_succeeded(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Installs release archives into a fixed root
#[derive(Debug, Clone)]
pub struct Installer {
    /// Directory the release is unpacked into
    install_root: PathBuf,

    /// Paths relative to the root that must be executable
    entry_points: Vec<String>,
}

impl Installer {
    /// Create an installer for `install_root`
    pub fn new(install_root: impl Into<PathBuf>, entry_points: Vec<String>) -> Self {
        Self {
            install_root: install_root.into(),
            entry_points,
        }
    }

    /// Get the install root
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Release identifier recorded by the last successful install
    pub fn read_installed_version(&self) -> Option<String> {
        let marker = self.install_root.join(VERSION_MARKER);
        match fs::read_to_string(&marker) {
            Ok(content) => {
                let version = content.trim();
                (!version.is_empty()).then(|| version.to_string())
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!("Cannot read {}: {}", marker.display(), e);
                }
                None
            }
        }
    }

    /// Replace the installation with the contents of `archive`
    pub fn install(&self, archive: &Path, release_id: &str) -> Result<PermissionReport> {
        let root = &self.install_root;

        if root.exists() {
            info!("Removing existing installation at {}", root.display());
            fs::remove_dir_all(root).map_err(|source| Error::InstallRemoveFailed {
                path: root.clone(),
                source,
            })?;
        }
        fs::create_dir_all(root)?;

        info!("Extracting {} to {}", archive.display(), root.display());
        extract_zip(archive, root)?;

        if flatten_single_directory(root).map_err(|e| Error::extraction_failed(archive, e))? {
            debug!("Flattened single top-level directory");
        }

        let report = mark_executable(root, &self.entry_points);
        if !report.failed.is_empty() {
            return Err(Error::PermissionsFailed {
                paths: report.failed,
            });
        }

        fs::write(root.join(VERSION_MARKER), release_id)?;
        info!("Installed {} to {}", release_id, root.display());

        Ok(report)
    }
}

/// Extract every entry of `archive` below `dest`.
///
/// Entry names are sanitised; an entry that would land outside `dest` fails
/// the extraction.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| Error::extraction_failed(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| Error::extraction_failed(archive, e))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| Error::extraction_failed(archive, e))?;

        let relative = entry.enclosed_name().ok_or_else(|| {
            Error::extraction_failed(archive, format!("unsafe entry path {:?}", entry.name()))
        })?;
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| Error::extraction_failed(archive, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::extraction_failed(archive, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| Error::extraction_failed(archive, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| Error::extraction_failed(archive, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(|e| Error::extraction_failed(archive, e))?;
            }
        }
    }

    Ok(())
}

/// If `root` holds exactly one entry and it is a directory, move that
/// directory's contents up into `root` and remove it.
///
/// Returns whether anything was moved.
pub fn flatten_single_directory(root: &Path) -> io::Result<bool> {
    let entries = fs::read_dir(root)?.collect::<io::Result<Vec<_>>>()?;
    let [only] = entries.as_slice() else {
        return Ok(false);
    };
    if !only.file_type()?.is_dir() {
        return Ok(false);
    }

    // Move the wrapper aside first so a child sharing its name can take its place
    let staging = root.join(format!(".unwrap-{}", std::process::id()));
    fs::rename(only.path(), &staging)?;

    for child in fs::read_dir(&staging)? {
        let child = child?;
        fs::rename(child.path(), root.join(child.file_name()))?;
    }
    fs::remove_dir(&staging)?;

    Ok(true)
}

/// OR the execute bits into the mode of each `relative` path under `root`
pub fn mark_executable(root: &Path, relative: &[String]) -> PermissionReport {
    let mut report = PermissionReport::default();

    for rel in relative {
        let path = root.join(rel);
        if !path.exists() {
            warn!("Entry point not found: {}", path.display());
            report.missing.push(rel.clone());
            continue;
        }

        match add_execute_bits(&path) {
            Ok(()) => {
                debug!("Set executable permission on {}", path.display());
                report.applied.push(rel.clone());
            }
            Err(e) => {
                warn!("Failed to set permissions on {}: {}", path.display(), e);
                report.failed.push(rel.clone());
            }
        }
    }

    report
}

#[cfg(unix)]
fn add_execute_bits(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn add_execute_bits(_path: &Path) -> io::Result<()> {
    Ok(())
}
