use anyhow::Result;
use clap::Parser;
use log::{debug, error, info};
use std::path::PathBuf;
use std::time::Instant;

use radial_search::output::{save_batch_csv, save_snapshots, save_trajectory_csv};
use radial_search::{run_batch, SearchSimulation};
use search_common::SearchConfig;

/// Command-line arguments for the search engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config.toml file (built-in reference parameters if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run independent searches against sampled targets instead of one traced run.
    /// Without a value, `batch.runs` from the config is used.
    #[arg(short, long, num_args = 0..=1, default_missing_value = "0")]
    batch: Option<u32>,

    /// Override the noise phase seed (single run) or the base seed (batch)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Radial Search Engine...");

    // --- Load Configuration ---
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)?,
        None => {
            info!("No config file given, using reference parameters.");
            SearchConfig::default()
        }
    };

    if let Some(runs) = args.batch {
        if let Some(seed) = args.seed {
            config.batch.base_seed = seed;
        }
        let runs = if runs == 0 { config.batch.runs } else { runs };
        return run_batch_mode(&config, runs);
    }

    if let Some(seed) = args.seed {
        // An explicit seed replaces any fixed phase vector.
        config.noise.phases = None;
        config.noise.phase_seed = seed;
    }
    run_single_mode(config)
}

fn run_single_mode(config: SearchConfig) -> Result<()> {
    // --- Initialize Search ---
    let mut sim = SearchSimulation::new(config)?;
    debug!("Search Parameters: {:#?}", sim.params());
    let max_steps = sim.params().max_simulation_steps;
    let record = sim.config.output.save_snapshots || sim.config.output.save_trajectory;

    info!("Starting search loop for up to {} steps...", max_steps);
    let start_time = Instant::now();

    // --- Main Loop (snapshot at step 0 and after every tick when recording) ---
    let reason = match sim.run_to_completion(record) {
        Ok(reason) => reason,
        Err(e) => {
            error!("Error during search step {}: {}", sim.step_count(), e);
            anyhow::bail!("Search step failed.");
        }
    };

    let total_duration = start_time.elapsed();
    let most_probable = sim.most_probable_radius()?;
    info!(
        "Search finished after {} steps in {:.3} ms: {}. Excursions: {}, most probable radius now {}.",
        sim.step_count(),
        total_duration.as_secs_f64() * 1000.0,
        reason,
        sim.excursion_number(),
        most_probable
    );

    // --- Save Recorded Data ---
    let output = sim.config.output.clone();
    if output.save_snapshots {
        save_snapshots(sim.recorded_snapshots(), &output)?;
    } else {
        info!("Skipping saving snapshots as per config (save_snapshots is false).");
    }
    if output.save_trajectory {
        save_trajectory_csv(sim.recorded_snapshots(), &output)?;
    } else {
        info!("Skipping saving trajectory as per config.");
    }

    info!("Search Complete.");
    Ok(())
}

fn run_batch_mode(config: &SearchConfig, runs: u32) -> Result<()> {
    let start_time = Instant::now();
    let (results, summary) = run_batch(config, runs)?;
    info!(
        "Batch finished in {:.3} seconds. Mean steps to find: {}",
        start_time.elapsed().as_secs_f64(),
        summary
            .mean_steps_to_find
            .map(|m| format!("{:.1}", m))
            .unwrap_or_else(|| "n/a".to_string())
    );
    save_batch_csv(&results, &config.output)?;
    Ok(())
}
