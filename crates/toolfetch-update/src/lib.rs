//! Download pipeline for the toolfetch binaries
//!
//! Provides:
//! - Latest-release lookup against a GitHub-style release API
//! - Mirror catalog lookup (gzipped JSONP file tree, per-segment regex paths)
//! - Streaming downloads with progress reporting and interrupt handling
//! - SHA256 and zip entry verification
//! - Installation with layout flattening and a version marker

pub mod asset;
pub mod catalog;
pub mod download;
pub mod error;
pub mod install;
pub mod pipeline;
pub mod progress;
pub mod releases;
pub mod verify;

pub use asset::{select_newest, DownloadResult, RemoteAsset};
pub use catalog::{CatalogNode, MirrorCatalog, PathPattern};
pub use download::StreamingDownloader;
pub use error::{Error, Result};
pub use install::{Installer, PermissionReport, VERSION_MARKER};
pub use pipeline::{MirrorPipeline, PipelineOutcome, PipelineState, ReleasePipeline};
pub use progress::{BarProgress, NoopProgress, ProgressObserver};
pub use releases::{LocatedRelease, Release, ReleaseAsset, ReleaseLocator};
pub use verify::IntegrityVerifier;
