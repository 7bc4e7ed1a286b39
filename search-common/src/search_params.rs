use serde::{Deserialize, Serialize};
use crate::config::PolicyShape;

/// Harmonic settings of the turning signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub harmonics: usize,
    pub frequency: f64,
    pub angle_divisor: f64,
}

/// Search parameters derived from the configuration, used on every step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    // Search area
    pub num_radii: usize,
    pub radius_size: f64,
    pub max_radius: f64, // num_radii * radius_size

    // Agent
    pub p_discover: f64,
    pub step_size: f64,
    pub step_time_ms: u64,
    pub scaling_parm: f64,
    pub max_simulation_steps: u64,

    // Prior over bin indices
    pub prior_mean: f64,
    pub prior_sigma: f64,

    // Coverage discount
    pub coverage_lambda: f64, // ln(1 - p_discover), always negative
    pub coverage_scale: f64,

    // Decisions
    pub policy: PolicyShape,
    pub adaptive_turning: bool,
    pub excursion_cooldown_ticks: u32,

    pub noise: NoiseParams,

    // Batch target detection
    pub detection_radius: f64,
}

impl SearchParams {
    /// Bin index for a distance from the origin. May be `>= num_radii`.
    #[inline(always)]
    pub fn radius_bin(&self, distance: f64) -> usize {
        (distance / self.radius_size).floor() as usize
    }
}
