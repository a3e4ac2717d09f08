use anyhow::{Context, Result};
use tracing::info;

use cruak_engine::TemperatureModel;

use crate::cli::InfoArgs;
use crate::config;

/// Print archive bounds, grid shape, and run dates for a configuration.
pub fn run(args: InfoArgs) -> Result<()> {
    let config = config::resolve(&args.config)?;
    let archive = config
        .resolve_archive_path()
        .context("cannot locate archive")?;
    info!(archive = %archive.display(), "opening archive");

    let model = TemperatureModel::initialize(config).context("failed to initialize model")?;
    let dims = model.archive().dims();
    let (rows, columns) = model.grid_shape();
    let lat = model.latitude();
    let lon = model.longitude();

    println!("archive        {}", archive.display());
    println!("archive dims   {} months x {} rows x {} columns", dims.nt, dims.ny, dims.nx);
    println!(
        "valid dates    {} .. {}",
        model.first_valid_date(),
        model.last_valid_date()
    );
    println!("grid           {rows} rows x {columns} columns ({})", model.config().grid_type());
    println!(
        "corners        ({:.2}, {:.2}) .. ({:.2}, {:.2})",
        lat[[0, 0]],
        lon[[0, 0]],
        lat[[rows - 1, columns - 1]],
        lon[[rows - 1, columns - 1]]
    );
    println!("run dates      {} .. {}", model.first_date(), model.last_date());
    println!("timestep 0     {}", model.date_at_timestep0());
    println!(
        "timesteps      {} .. {} ({} year step)",
        model.first_timestep(),
        model.last_timestep(),
        model.timestep_duration()
    );
    Ok(())
}
