//! Engine binary for the tickgrid simulation.
//!
//! This is the main entry point that wires together configuration, the
//! world factory, the decision source, and the run loop.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tickgrid-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the world from the configured agents, objects, and doors
//! 4. Create the decision source (scripted if scripts are configured)
//! 5. Create run controls from the simulation bounds
//! 6. Run the simulation loop, stopping early on Ctrl-C
//! 7. Write the action log and log the result

mod error;
mod scripts;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use tickgrid_agents::ActionCatalog;
use tickgrid_core::config::{LogFormat, LoggingConfig};
use tickgrid_core::decision::DecisionSource;
use tickgrid_core::{
    runner, ActionLog, RunControl, SimulationConfig, StubDecisionSource, WorldFactory,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "tickgrid-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        width = config.world.shape.width,
        height = config.world.shape.height,
        tick_interval_ms = config.world.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Build the world.
    let mut factory = WorldFactory::from_config(&config).map_err(EngineError::from)?;
    let mut world = factory.build().map_err(EngineError::from)?;

    // 4. Decision source.
    let mut decision_source: Box<dyn DecisionSource> = if config.scripts.is_empty() {
        info!("No scripts configured, agents will pass every tick");
        Box::new(StubDecisionSource::new())
    } else {
        Box::new(scripts::scripted_source(&config.scripts, &world))
    };

    // 5. Run controls.
    let control = Arc::new(RunControl::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    spawn_stop_on_ctrl_c(Arc::clone(&control));

    // 6. Run the simulation.
    let catalog = ActionCatalog::new(config.actions.durations);
    let mut action_log = ActionLog::new();
    let result = runner::run_simulation(
        &mut world,
        decision_source.as_mut(),
        &catalog,
        &control,
        &mut action_log,
    )
    .await
    .map_err(EngineError::from)?;

    // 7. Write the action log and log results.
    if let Some(path) = &config.logging.action_log_path {
        write_action_log(&action_log, path)?;
        info!(path = %path, rows = action_log.rows().len(), "Action log written");
    }

    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "tickgrid-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration from `tickgrid-config.yaml`.
///
/// Looks for the config file relative to the current working directory and
/// falls back to defaults when it is missing.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        let mut config = SimulationConfig::default();
        config.apply_seed_override(std::env::var(tickgrid_core::config::SEED_ENV).ok().as_deref())?;
        Ok(config)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Request a clean stop when the process receives Ctrl-C.
fn spawn_stop_on_ctrl_c(control: Arc<RunControl>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                control.request_stop();
            }
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
        }
    });
}

fn write_action_log(log: &ActionLog, path: &str) -> Result<(), EngineError> {
    let to_engine_error = |source| EngineError::ActionLog {
        path: path.to_owned(),
        source,
    };
    let mut out = BufWriter::new(File::create(path).map_err(to_engine_error)?);
    log.write_csv(&mut out).map_err(to_engine_error)?;
    out.flush().map_err(to_engine_error)
}
