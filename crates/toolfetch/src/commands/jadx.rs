//! download-jadx

use anyhow::Result;
use toolfetch_core::PipelineConfig;
use toolfetch_update::{Error, PipelineOutcome, ReleasePipeline};

use crate::cli::JadxArgs;
use crate::output;

pub async fn run(args: JadxArgs) -> Result<()> {
    let install_path = args.install_path.ok_or_else(|| Error::MissingConfiguration {
        hint: "pass INSTALL_PATH or set JADX_HOME".to_string(),
    })?;

    let runtime = super::load_runtime_config(&args.common)?;
    let mut config = PipelineConfig::new(&install_path).with_auth_token(args.token);
    if let Some(temp_dir) = args.temp_dir {
        config = config.with_temp_dir(temp_dir);
    }

    let quiet = args.common.quiet;
    if !quiet {
        output::header("jadx");
        output::kv("Install path", &install_path.display().to_string());
        output::kv(
            "Source",
            &format!("{}/{}", runtime.release.repo_owner, runtime.release.repo_name),
        );
    }

    let progress = super::progress_observer(&args.common);
    let mut pipeline = ReleasePipeline::new(runtime, config);
    let outcome = pipeline.run(progress.as_ref()).await?;

    if quiet {
        return Ok(());
    }

    match outcome {
        PipelineOutcome::AlreadyUpToDate { version } => {
            output::success(&format!("jadx {} is already up to date", version));
        }
        PipelineOutcome::Installed {
            version,
            install_root,
            permissions,
        } => {
            for missing in &permissions.missing {
                output::warning(&format!("{} not found in the release", missing));
            }
            output::success(&format!(
                "Installed jadx {} to {}",
                version,
                install_root.display()
            ));
        }
        PipelineOutcome::Downloaded { path, .. } => {
            output::success(&format!("Downloaded {}", path.display()));
        }
    }

    Ok(())
}
