use crate::belief::{most_probable_radius, RadiusBeliefModel};
use crate::coverage::{record_extent, BinExtents};
use crate::noise::NoiseSynthesizer;
use crate::policy::NavigationPolicy;
use crate::search_state::SearchState;
use anyhow::Result;
use log::{debug, info, trace};
use search_common::{
    Decision, RunStatus, SearchConfig, SearchParams, Snapshot, TerminationReason, Vec2,
};

/// Drives one search run: turning noise, beliefs, decision and motion per step.
pub struct SearchSimulation {
    /// The configuration the run was built from.
    pub config: SearchConfig,
    /// Walk state, mutated only by `step`.
    state: SearchState,
    noise: NoiseSynthesizer,
    belief_model: RadiusBeliefModel,
    policy: NavigationPolicy,
    /// Snapshots collected by `record_snapshot`.
    recorded_snapshots: Vec<Snapshot>,
}

impl SearchSimulation {
    /// Validates the configuration and builds a run with the agent at the origin.
    ///
    /// Noise phases come from `noise.phases` when given, otherwise they are
    /// drawn from `noise.phase_seed`.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let params = config.get_search_params();
        let noise = match &config.noise.phases {
            Some(phases) => NoiseSynthesizer::with_phases(params.noise, phases.clone())?,
            None => NoiseSynthesizer::from_seed(params.noise, config.noise.phase_seed)?,
        };
        Self::with_noise(config, noise)
    }

    /// Builds a run around an existing turning signal.
    pub fn with_noise(config: SearchConfig, noise: NoiseSynthesizer) -> Result<Self> {
        config.validate()?;
        let params = config.get_search_params();
        let belief_model = RadiusBeliefModel::new(&params)?;
        let policy = NavigationPolicy::new(params.policy);

        debug!(
            "Initialized search: {} radii of {:.1}, step {:.1}, policy {:?}",
            params.num_radii, params.radius_size, params.step_size, params.policy
        );

        Ok(Self {
            config,
            state: SearchState::new(params),
            noise,
            belief_model,
            policy,
            recorded_snapshots: Vec::new(),
        })
    }

    /// Advances the walk by one tick.
    ///
    /// Returns the run status after the tick. Terminations are reported as
    /// `RunStatus::Terminated`; errors are consistency faults and end the run.
    pub fn step(&mut self) -> Result<RunStatus> {
        if let RunStatus::Terminated(reason) = self.state.status {
            return Ok(RunStatus::Terminated(reason));
        }
        if self.state.step > self.state.params.max_simulation_steps {
            return Ok(self.terminate(TerminationReason::StepBudgetExhausted));
        }

        self.state.step += 1;
        let step = self.state.step;
        let beliefs = self.belief_model.beliefs(step, &self.state.coverage)?.to_vec();

        let position = self.state.position;
        let distance = position.length();
        let current_radius = self.state.params.radius_bin(distance);
        if current_radius >= self.state.params.num_radii {
            // The tick is counted but the agent does not move.
            return Ok(self.terminate(TerminationReason::RadiusEscaped));
        }

        let params = &self.state.params;
        let outward = position.outward_unit();

        // --- Turning signal ---
        let noise_value = self.noise.sample(step)?;
        let mut turn_ratio = noise_value * params.scaling_parm;
        if params.adaptive_turning {
            turn_ratio *= (current_radius + 1) as f64
                / self.state.excursions.excursion_number() as f64;
        }
        let norm = (1.0 + turn_ratio * turn_ratio).sqrt();
        let radial_weight = 1.0 / norm;
        let tangential_weight = turn_ratio / norm;

        // --- Decision and motion ---
        let decision = self.policy.decide(&beliefs, current_radius);
        let moved = match decision {
            Decision::Stay => tangential_step(position, distance, params.step_size),
            Decision::Out | Decision::In => {
                let radial = outward.scale(radial_weight * decision.sign() as f64);
                let tangential = outward.perp().scale(tangential_weight);
                position.add(radial.add(tangential).scale(params.step_size))
            }
        };
        let next = moved.clamp_length(params.max_radius);

        trace!(
            "Step {}: bin {} noise {:.4} turn {:.3} {} -> ({:.2}, {:.2})",
            step, current_radius, noise_value, turn_ratio, decision, next.x, next.y
        );

        // --- Bookkeeping ---
        let previous_radius = self.state.previous_radius;
        record_extent(&mut self.state.extents, current_radius, next);
        self.state.coverage.credit(previous_radius, current_radius);
        if self.state.excursions.observe(previous_radius, current_radius) {
            debug!(
                "Step {}: excursion {} started",
                step,
                self.state.excursions.excursion_number()
            );
        }

        self.state.decision = if crossed_both_axes(position, next) {
            decision.flipped()
        } else {
            decision
        };
        self.state.previous_position = position;
        self.state.position = next;
        self.state.current_radius = current_radius;
        self.state.previous_radius = Some(current_radius);

        Ok(RunStatus::Running)
    }

    /// Steps until the run terminates, optionally recording a snapshot per step.
    pub fn run_to_completion(&mut self, record: bool) -> Result<TerminationReason> {
        if record && self.recorded_snapshots.is_empty() {
            self.record_snapshot()?;
        }
        loop {
            match self.step()? {
                RunStatus::Running => {
                    if record {
                        self.record_snapshot()?;
                    }
                }
                RunStatus::Terminated(reason) => {
                    // An escape consumes a tick; record the terminal state for it.
                    let last_step = self.recorded_snapshots.last().map(|s| s.step);
                    if record && last_step != Some(self.state.step) {
                        self.record_snapshot()?;
                    }
                    return Ok(reason);
                }
            }
        }
    }

    fn terminate(&mut self, reason: TerminationReason) -> RunStatus {
        info!(
            "Search terminated at step {} ({}), excursions: {}",
            self.state.step,
            reason,
            self.state.excursions.excursion_number()
        );
        self.state.status = RunStatus::Terminated(reason);
        self.state.status
    }

    /// Belief over radius bins at the current step.
    pub fn beliefs(&mut self) -> Result<Vec<f64>> {
        Ok(self.belief_model.beliefs(self.state.step, &self.state.coverage)?.to_vec())
    }

    /// Bin with the strictly highest belief, lowest index on ties.
    pub fn most_probable_radius(&mut self) -> Result<usize> {
        let beliefs = self.belief_model.beliefs(self.state.step, &self.state.coverage)?;
        Ok(most_probable_radius(beliefs))
    }

    /// Appends the current state to the recorded snapshots.
    pub fn record_snapshot(&mut self) -> Result<()> {
        let beliefs = self.beliefs()?;
        let snapshot = Snapshot {
            step: self.state.step,
            position: (self.state.position.x, self.state.position.y),
            current_radius: self.state.current_radius,
            decision: self.state.decision,
            excursion_number: self.state.excursions.excursion_number(),
            most_probable_radius: most_probable_radius(&beliefs),
            status: self.state.status,
            beliefs: if self.config.output.save_beliefs_in_snapshot { Some(beliefs) } else { None },
            dwell_times: self.state.coverage.dwell_times().to_vec(),
        };
        self.recorded_snapshots.push(snapshot);
        Ok(())
    }

    /// Provides access to the recorded snapshots.
    pub fn recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn previous_position(&self) -> Vec2 {
        self.state.previous_position
    }

    pub fn decision(&self) -> Decision {
        self.state.decision
    }

    pub fn current_radius(&self) -> usize {
        self.state.current_radius
    }

    pub fn previous_radius(&self) -> Option<usize> {
        self.state.previous_radius
    }

    pub fn excursion_number(&self) -> u32 {
        self.state.excursions.excursion_number()
    }

    pub fn dwell_times(&self) -> &[f64] {
        self.state.coverage.dwell_times()
    }

    pub fn bin_extents(&self) -> &[Option<BinExtents>] {
        &self.state.extents
    }

    pub fn step_count(&self) -> u64 {
        self.state.step
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    /// Provides access to the derived search parameters.
    pub fn params(&self) -> &SearchParams {
        &self.state.params
    }

    pub fn noise(&self) -> &NoiseSynthesizer {
        &self.noise
    }
}

/// Moves `step_size` along the circle of radius `distance`, holding the radius.
///
/// The chord of length `step_size` subtends `2 * asin(step_size / (2 * distance))`.
/// Inside `step_size / 2` of the origin no such chord exists and the agent
/// steps along the counter-clockwise tangent instead.
fn tangential_step(position: Vec2, distance: f64, step_size: f64) -> Vec2 {
    if distance > 0.0 && step_size <= 2.0 * distance {
        let theta = 2.0 * (step_size / (2.0 * distance)).asin();
        position.rotate(theta)
    } else {
        position.add(position.outward_unit().perp().scale(step_size))
    }
}

/// True if the coordinate changed sign strictly, or sat at exactly zero.
fn axis_flipped(old: f64, new: f64) -> bool {
    (old < 0.0 && new > 0.0) || (old > 0.0 && new < 0.0) || (old == 0.0 && new == 0.0)
}

/// Quadrant-crossing rule: both coordinates flipped across one step.
fn crossed_both_axes(old: Vec2, new: Vec2) -> bool {
    axis_flipped(old.x, new.x) && axis_flipped(old.y, new.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tangential_step_holds_radius() {
        let p = Vec2::new(30.0, 40.0);
        let next = tangential_step(p, p.length(), 10.0);
        assert!((next.length() - 50.0).abs() < 1e-9);
        assert!((next.distance(p) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn tangential_step_from_origin_uses_positive_y() {
        let next = tangential_step(Vec2::zero(), 0.0, 5.0);
        assert!(next.x.abs() < 1e-12);
        assert!((next.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_requires_both_axes() {
        assert!(crossed_both_axes(Vec2::new(1.0, 1.0), Vec2::new(-1.0, -1.0)));
        assert!(!crossed_both_axes(Vec2::new(1.0, 1.0), Vec2::new(-1.0, 1.0)));
        assert!(crossed_both_axes(Vec2::new(0.0, 2.0), Vec2::new(0.0, -3.0)));
        assert!(!crossed_both_axes(Vec2::new(0.0, 0.0), Vec2::new(0.0, 40.0)));
    }

    /// Reference run with an identically zero turning signal, placed at (30, 30) in bin 1.
    fn walker_in_bin_one(step_size: f64) -> SearchSimulation {
        let mut config = SearchConfig::default();
        config.search.step_size = step_size;
        config.noise.harmonics = 2;
        config.noise.frequency = 0.0;
        config.noise.angle_divisor = 1.0;
        config.noise.phases = Some(vec![0.0, 0.5]);
        let mut sim = SearchSimulation::new(config).unwrap();
        sim.state.position = Vec2::new(30.0, 30.0);
        sim
    }

    #[test]
    fn inward_step_through_origin_flips_stored_decision() {
        let mut sim = walker_in_bin_one(100.0);
        assert_eq!(sim.step().unwrap(), RunStatus::Running);

        // The policy chose IN; the step overshoots the origin into the opposite quadrant.
        assert_eq!(sim.current_radius(), 1);
        assert!(sim.position().x < 0.0 && sim.position().y < 0.0);
        assert_eq!(sim.decision(), Decision::Out);
    }

    #[test]
    fn inward_step_within_quadrant_keeps_decision() {
        let mut sim = walker_in_bin_one(20.0);
        assert_eq!(sim.step().unwrap(), RunStatus::Running);

        assert!(sim.position().x > 0.0 && sim.position().y > 0.0);
        assert_eq!(sim.decision(), Decision::In);
    }
}
