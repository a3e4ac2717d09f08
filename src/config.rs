use anyhow::{Context, Result};
use tracing::debug;

use cruak_engine::{RunConfig, load_config};

use crate::cli::ConfigArgs;

/// Loads the run configuration and applies command-line overrides.
pub fn resolve(args: &ConfigArgs) -> Result<RunConfig> {
    let mut config = load_config(&args.config)
        .with_context(|| format!("failed to load config: {}", args.config.display()))?;

    if let Some(dir) = &args.data_dir {
        debug!(dir = %dir.display(), "data directory override");
        config = config.with_data_directory(dir);
    }
    if let Some(archive) = &args.archive {
        debug!(archive = %archive.display(), "archive override");
        config = config.with_archive_path(archive);
    }
    config.validate().context("invalid run configuration")?;
    Ok(config)
}
