use anyhow::{Context, Result};

use cruak_engine::{RunConfig, write_config};

use crate::cli::InitArgs;

/// Write the default run configuration, optionally pointing at a data directory.
pub fn run(args: InitArgs) -> Result<()> {
    let mut config = RunConfig::default();
    if let Some(dir) = args.data_dir {
        config = config.with_data_directory(dir);
    }
    write_config(&config, &args.output, args.overwrite)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("wrote {}", args.output.display());
    Ok(())
}
