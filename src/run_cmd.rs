use anyhow::{Context, Result};
use tracing::info;

use cruak_bmi::{AlaskaTemperatureBmi, OutputVar};

use crate::cli::RunArgs;
use crate::config;

/// Step the component to `--until` (or its end time), logging a summary of
/// the published grids after every step.
pub fn run(args: RunArgs) -> Result<()> {
    let config = config::resolve(&args.config)?;
    let mut bmi = AlaskaTemperatureBmi::new();
    bmi.initialize_with_config(config)
        .context("failed to initialize component")?;

    let end = bmi.get_end_time()?;
    let target = args.until.map_or(end, |t| t.min(end));
    log_step(&bmi)?;

    loop {
        let now = bmi.get_current_time()?;
        if now >= target {
            break;
        }
        bmi.update_until((now + 1.0).min(target))?;
        if bmi.get_current_time()? <= now {
            break;
        }
        log_step(&bmi)?;
    }

    let model = bmi
        .model()
        .context("component released before reporting")?;
    println!("date           {}", model.current_date());
    println!("timestep       {}", model.get_current_timestep());
    for var in OutputVar::ALL.into_iter().filter(|v| v.output_grid().is_some()) {
        let mean = finite_mean(&bmi, var)?;
        println!(
            "{:<46} {}",
            var.name(),
            mean.map_or_else(|| "no data".to_string(), |m| format!("{m:.3} {}", var.units()))
        );
    }
    bmi.finalize();
    Ok(())
}

fn log_step(bmi: &AlaskaTemperatureBmi) -> Result<()> {
    let time = bmi.get_current_time()?;
    let t_air = finite_mean(bmi, OutputVar::AirTemperature)?;
    let prior_year = finite_mean(bmi, OutputVar::Year)?;
    info!(time, ?t_air, ?prior_year, "step");
    Ok(())
}

/// Mean over the finite cells of a variable, or `None` if every cell is NaN.
fn finite_mean(bmi: &AlaskaTemperatureBmi, var: OutputVar) -> Result<Option<f64>> {
    let view = bmi.value(var)?;
    let (sum, count) = view
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0_usize), |(s, n), &v| (s + f64::from(v), n + 1));
    Ok((count > 0).then(|| sum / count as f64))
}
