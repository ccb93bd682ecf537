//! download-jeb

use anyhow::Result;
use toolfetch_core::{human_readable_size, PipelineConfig};
use toolfetch_update::{MirrorPipeline, PipelineOutcome};

use crate::cli::JebArgs;
use crate::output;

pub async fn run(args: JebArgs) -> Result<()> {
    let runtime = super::load_runtime_config(&args.common)?;
    let pattern = args
        .pattern
        .unwrap_or_else(|| runtime.mirror.default_pattern.clone());

    let quiet = args.common.quiet;
    if !quiet {
        output::header("JEB");
        output::kv("Target", &args.target_directory.display().to_string());
        output::kv("Pattern", &pattern);
    }

    let config = PipelineConfig::new(&args.target_directory).with_pattern(pattern);
    let progress = super::progress_observer(&args.common);
    let mut pipeline = MirrorPipeline::new(runtime, config);
    let outcome = pipeline.run(progress.as_ref()).await?;

    if quiet {
        return Ok(());
    }

    if let PipelineOutcome::Downloaded { path, bytes } = outcome {
        output::success(&format!(
            "Downloaded {} ({})",
            path.display(),
            human_readable_size(bytes)
        ));
    }

    Ok(())
}
