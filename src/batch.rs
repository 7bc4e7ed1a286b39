use crate::noise::NoiseSynthesizer;
use crate::simulation::SearchSimulation;
use crate::target::Target;
use anyhow::Result;
use log::{debug, info};
use rand::prelude::*;
use rayon::prelude::*;
use search_common::{RunStatus, SearchConfig, TerminationReason};
use serde::{Deserialize, Serialize};

/// How a single batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Found { step: u64 },
    Terminated(TerminationReason),
}

/// Result of one independent search against a sampled target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_index: u32,
    pub seed: u64,
    pub target_distance: f64,
    pub target_bin: usize,
    pub outcome: RunOutcome,
    pub steps: u64,
    pub excursions: u32,
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: u32,
    pub found: u32,
    pub detection_rate: f64,
    pub mean_steps_to_find: Option<f64>,
    pub radius_escapes: u32,
    pub budget_exhaustions: u32,
}

impl BatchSummary {
    pub fn from_results(results: &[RunResult]) -> Self {
        let runs = results.len() as u32;
        let found_steps: Vec<u64> = results
            .iter()
            .filter_map(|r| match r.outcome {
                RunOutcome::Found { step } => Some(step),
                RunOutcome::Terminated(_) => None,
            })
            .collect();
        let count_terminated = |reason: TerminationReason| {
            results
                .iter()
                .filter(|r| r.outcome == RunOutcome::Terminated(reason))
                .count() as u32
        };

        let found = found_steps.len() as u32;
        BatchSummary {
            runs,
            found,
            detection_rate: if runs > 0 { found as f64 / runs as f64 } else { 0.0 },
            mean_steps_to_find: if found > 0 {
                Some(found_steps.iter().sum::<u64>() as f64 / found as f64)
            } else {
                None
            },
            radius_escapes: count_terminated(TerminationReason::RadiusEscaped),
            budget_exhaustions: count_terminated(TerminationReason::StepBudgetExhausted),
        }
    }
}

/// Runs a single search with its own RNG, noise phases and belief cache.
pub fn run_single(config: &SearchConfig, run_index: u32) -> Result<RunResult> {
    let seed = config.batch.base_seed.wrapping_add(run_index as u64);
    let mut rng = StdRng::seed_from_u64(seed);
    let params = config.get_search_params();

    let noise = match (&config.noise.phases, config.batch.reseed_phases) {
        (Some(phases), false) => NoiseSynthesizer::with_phases(params.noise, phases.clone())?,
        _ => NoiseSynthesizer::from_rng(params.noise, &mut rng)?,
    };
    let target = Target::sample(&params, &mut rng)?;
    let mut sim = SearchSimulation::with_noise(config.clone(), noise)?;

    let outcome = loop {
        match sim.step()? {
            RunStatus::Running => {
                if target.try_detect(sim.previous_position(), sim.position(), &params, &mut rng) {
                    break RunOutcome::Found { step: sim.step_count() };
                }
            }
            RunStatus::Terminated(reason) => break RunOutcome::Terminated(reason),
        }
    };

    debug!("Run {} (seed {}): {:?} after {} steps", run_index, seed, outcome, sim.step_count());

    Ok(RunResult {
        run_index,
        seed,
        target_distance: target.position.length(),
        target_bin: target.radius_bin(&params),
        outcome,
        steps: sim.step_count(),
        excursions: sim.excursion_number(),
    })
}

/// Runs `runs` independent searches in parallel and summarizes them.
///
/// Results are ordered by run index and depend only on the configuration.
pub fn run_batch(config: &SearchConfig, runs: u32) -> Result<(Vec<RunResult>, BatchSummary)> {
    config.validate()?;
    info!("Running batch of {} searches on {} Rayon threads.", runs, rayon::current_num_threads());

    let results: Vec<RunResult> = (0..runs)
        .into_par_iter()
        .map(|run_index| run_single(config, run_index))
        .collect::<Result<Vec<_>>>()?;

    let summary = BatchSummary::from_results(&results);
    info!(
        "Batch complete: found {}/{} ({:.1}%), escapes {}, budget exhaustions {}",
        summary.found,
        summary.runs,
        summary.detection_rate * 100.0,
        summary.radius_escapes,
        summary.budget_exhaustions
    );
    Ok((results, summary))
}
