use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CRU-NCEP Alaska monthly air temperature component.
#[derive(Parser)]
#[command(
    name = "cruak",
    version,
    about = "CRU-NCEP Alaska monthly air temperature served through a BMI surface"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print archive bounds, grid shape, and run dates.
    Info(InfoArgs),
    /// Step the component and report the published grids.
    Run(RunArgs),
    /// Write the default Alaska run configuration.
    Init(InitArgs),
}

/// Options shared by every subcommand that loads a run.
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Run configuration (`.cfg` legacy format or `.toml`).
    #[arg(short, long)]
    pub config: PathBuf,

    /// Directory holding the region archives.
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Explicit archive file; takes precedence over the region lookup.
    #[arg(long)]
    pub archive: Option<PathBuf>,
}

/// Arguments for the `info` subcommand.
#[derive(clap::Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Model time (years past timestep 0) to stop at. Defaults to the end time.
    #[arg(short, long)]
    pub until: Option<f64>,
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
pub struct InitArgs {
    /// Output path (TOML).
    #[arg(short, long, default_value = cruak_engine::DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Directory holding the region archives, recorded in the file.
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Replace an existing file.
    #[arg(long)]
    pub overwrite: bool,
}
