//! Locate → download → verify → install
//!
//! Two flows share the stages:
//! - [`ReleasePipeline`] installs the latest release-API asset into an
//!   install root, skipping the download when the installed version is current
//! - [`MirrorPipeline`] downloads the newest catalog match into a directory
//!
//! Every stage error is terminal; nothing is retried.

use std::fmt;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use toolfetch_core::{PipelineConfig, RuntimeConfig};
use tracing::{debug, info, warn};

use crate::asset::select_newest;
use crate::catalog::{MirrorCatalog, PathPattern};
use crate::download::{interrupted, InterruptGuard, StreamingDownloader};
use crate::error::{Error, Result};
use crate::install::{Installer, PermissionReport};
use crate::progress::ProgressObserver;
use crate::releases::ReleaseLocator;
use crate::verify::IntegrityVerifier;

/// Stage a pipeline run is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Locating,
    Downloading,
    Verifying,
    Installing,
    Done,
    Failed,
}

impl PipelineState {
    /// `Done` and `Failed` are final
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Locating => "locating",
            PipelineState::Downloading => "downloading",
            PipelineState::Verifying => "verifying",
            PipelineState::Installing => "installing",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The installed version already matches the latest release
    AlreadyUpToDate { version: String },

    /// A release was installed
    Installed {
        version: String,
        install_root: PathBuf,
        permissions: PermissionReport,
    },

    /// A file was downloaded (no install stage)
    Downloaded { path: PathBuf, bytes: u64 },
}

fn transition(state: &mut PipelineState, next: PipelineState) {
    debug!("Pipeline: {} -> {}", state, next);
    *state = next;
}

fn require_target(config: &PipelineConfig, hint: &str) -> Result<PathBuf> {
    if config.target_path.as_os_str().is_empty() {
        return Err(Error::MissingConfiguration {
            hint: hint.to_string(),
        });
    }
    Ok(config.target_path.clone())
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

/// Installs the latest release from a release API
pub struct ReleasePipeline {
    runtime: RuntimeConfig,
    config: PipelineConfig,
    state: PipelineState,
    exit_on_interrupt: bool,
}

impl ReleasePipeline {
    /// Create a pipeline; nothing happens until [`run`](Self::run)
    pub fn new(runtime: RuntimeConfig, config: PipelineConfig) -> Self {
        Self {
            runtime,
            config,
            state: PipelineState::Idle,
            exit_on_interrupt: false,
        }
    }

    /// Current stage
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run to completion, aborting the download on Ctrl-C.
    ///
    /// A Ctrl-C after the download has finished exits the process.
    pub async fn run(&mut self, progress: &dyn ProgressObserver) -> Result<PipelineOutcome> {
        self.exit_on_interrupt = true;
        let result = self.run_with_shutdown(progress, interrupted()).await;
        self.exit_on_interrupt = false;
        result
    }

    /// Run to completion, aborting the download when `shutdown` completes
    pub async fn run_with_shutdown<F>(
        &mut self,
        progress: &dyn ProgressObserver,
        shutdown: F,
    ) -> Result<PipelineOutcome>
    where
        F: Future<Output = ()>,
    {
        let result = self.execute(progress, shutdown).await;
        if result.is_err() {
            transition(&mut self.state, PipelineState::Failed);
        }
        result
    }

    async fn execute<F>(
        &mut self,
        progress: &dyn ProgressObserver,
        shutdown: F,
    ) -> Result<PipelineOutcome>
    where
        F: Future<Output = ()>,
    {
        let install_root = require_target(&self.config, "pass INSTALL_PATH or set JADX_HOME")?;
        let network = &self.runtime.network;
        let source = &self.runtime.release;

        transition(&mut self.state, PipelineState::Locating);
        let locator = ReleaseLocator::new(network, source, self.config.auth_token.clone())?;
        let located = locator.locate_latest().await?;
        info!("Latest release: {}", located.tag);

        let installer = Installer::new(&install_root, source.entry_points.clone());
        if let Some(installed) = installer.read_installed_version() {
            if installed == located.tag {
                info!("{} is already installed", installed);
                transition(&mut self.state, PipelineState::Done);
                return Ok(PipelineOutcome::AlreadyUpToDate { version: installed });
            }
            info!("Replacing installed version {}", installed);
        }

        let asset = locator.first_match(&located)?;

        transition(&mut self.state, PipelineState::Downloading);
        let download_dir = self.config.temp_dir.join(&source.temp_dir_name);
        fs::create_dir_all(&download_dir)?;
        let archive = download_dir.join(&asset.name);

        let downloader =
            StreamingDownloader::new(network)?.with_headers(locator.auth_header().into_iter().collect());
        downloader
            .download_with_shutdown(&asset, &archive, progress, shutdown)
            .await?;
        let _interrupt = self.exit_on_interrupt.then(InterruptGuard::arm);

        transition(&mut self.state, PipelineState::Verifying);
        if let Err(e) = IntegrityVerifier::new(network.download_chunk_size).verify(&asset, &archive) {
            discard(&archive);
            return Err(e);
        }

        transition(&mut self.state, PipelineState::Installing);
        let installed = installer.install(&archive, &located.tag);
        discard(&archive);
        let permissions = installed?;

        transition(&mut self.state, PipelineState::Done);
        Ok(PipelineOutcome::Installed {
            version: located.tag,
            install_root,
            permissions,
        })
    }
}

/// Downloads the newest mirror file matching a path pattern
pub struct MirrorPipeline {
    runtime: RuntimeConfig,
    config: PipelineConfig,
    state: PipelineState,
    exit_on_interrupt: bool,
}

impl MirrorPipeline {
    /// Create a pipeline; nothing happens until [`run`](Self::run)
    pub fn new(runtime: RuntimeConfig, config: PipelineConfig) -> Self {
        Self {
            runtime,
            config,
            state: PipelineState::Idle,
            exit_on_interrupt: false,
        }
    }

    /// Current stage
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run to completion, aborting the download on Ctrl-C.
    ///
    /// A Ctrl-C after the download has finished exits the process.
    pub async fn run(&mut self, progress: &dyn ProgressObserver) -> Result<PipelineOutcome> {
        self.exit_on_interrupt = true;
        let result = self.run_with_shutdown(progress, interrupted()).await;
        self.exit_on_interrupt = false;
        result
    }

    /// Run to completion, aborting the download when `shutdown` completes
    pub async fn run_with_shutdown<F>(
        &mut self,
        progress: &dyn ProgressObserver,
        shutdown: F,
    ) -> Result<PipelineOutcome>
    where
        F: Future<Output = ()>,
    {
        let result = self.execute(progress, shutdown).await;
        if result.is_err() {
            transition(&mut self.state, PipelineState::Failed);
        }
        result
    }

    async fn execute<F>(
        &mut self,
        progress: &dyn ProgressObserver,
        shutdown: F,
    ) -> Result<PipelineOutcome>
    where
        F: Future<Output = ()>,
    {
        let target_dir = require_target(&self.config, "pass TARGET_DIRECTORY")?;
        let network = &self.runtime.network;
        let mirror = &self.runtime.mirror;
        let pattern_src = self
            .config
            .pattern
            .clone()
            .unwrap_or_else(|| mirror.default_pattern.clone());

        transition(&mut self.state, PipelineState::Locating);
        let pattern = PathPattern::parse(&pattern_src)?;
        let matches = MirrorCatalog::new(network, mirror)?.locate(&pattern).await?;
        let asset = select_newest(&matches)
            .cloned()
            .ok_or_else(|| Error::not_found(pattern_src.clone()))?;
        info!(
            "Found {} matching file(s), newest is {}",
            matches.len(),
            asset.name
        );

        transition(&mut self.state, PipelineState::Downloading);
        let dest = target_dir.join(&asset.name);
        let downloader = StreamingDownloader::new(network)?
            .with_headers(vec![("Referer".to_string(), mirror.referer.clone())]);
        let download = downloader
            .download_with_shutdown(&asset, &dest, progress, shutdown)
            .await?;
        let _interrupt = self.exit_on_interrupt.then(InterruptGuard::arm);

        transition(&mut self.state, PipelineState::Verifying);
        let verifier = IntegrityVerifier::new(network.download_chunk_size)
            .with_archive_check(false)
            .with_declared_size_check(false);
        if let Err(e) = verifier.verify(&asset, &dest) {
            discard(&dest);
            return Err(e);
        }

        transition(&mut self.state, PipelineState::Done);
        Ok(PipelineOutcome::Downloaded {
            path: download.local_path,
            bytes: download.bytes_written,
        })
    }
}
