use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::search_params::{NoiseParams, SearchParams};
use std::path::Path;

/// Phase offsets of the reference run (Fig. 17b), in turns.
pub const REFERENCE_PHASES: [f64; 20] = [
    0.19, 0.91, 0.37, 0.82, 0.42, 0.31, 0.54, 0.53, 0.27, 0.73,
    0.27, 0.10, 0.59, 0.75, 0.65, 0.50, 0.78, 0.61, 0.46, 0.55,
];

// Core search-area and agent parameters
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SearchSection {
    pub num_radii: u32,
    pub radius_size: f64,
    pub p_discover: f64,
    pub step_size: f64,
    /// Wall-clock pacing hint for renderers; the model itself never sleeps.
    #[serde(default = "default_step_time_ms")]
    pub step_time_ms: u64,
    pub scaling_parm: f64,
    pub max_simulation_steps: u64,
}

// Turning-signal generator settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NoiseConfig {
    #[serde(default = "default_harmonics")]
    pub harmonics: u32,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// Divisor K applied to the harmonic term inside the sine (1.0 disables it).
    #[serde(default = "default_angle_divisor")]
    pub angle_divisor: f64,
    /// Fixed phase offsets in [0, 1). Drawn from `phase_seed` when absent.
    #[serde(default)]
    pub phases: Option<Vec<f64>>,
    #[serde(default)]
    pub phase_seed: u64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyShape {
    /// Compare the current bin with its inner and outer neighbours.
    NeighborComparison,
    /// Head for the globally most probable bin.
    ArgmaxTracking,
}

// Belief model and decision settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    /// Fraction of `step_size` counted as swept width when estimating coverage.
    #[serde(default = "default_coverage_scale")]
    pub coverage_scale: f64,
    #[serde(default = "default_policy")]
    pub policy: PolicyShape,
    /// Scale the turn ratio by (bin + 1) / excursion number.
    #[serde(default)]
    pub adaptive_turning: bool,
    #[serde(default = "default_excursion_cooldown")]
    pub excursion_cooldown_ticks: u32,
}

// Monte-Carlo batch settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BatchConfig {
    #[serde(default = "default_batch_runs")]
    pub runs: u32,
    #[serde(default)]
    pub base_seed: u64,
    /// Distance at which the agent may spot the target. Defaults to the swept half-width.
    #[serde(default)]
    pub detection_radius: Option<f64>,
    /// Draw fresh noise phases for every run instead of reusing `noise.phases`.
    #[serde(default = "default_true")]
    pub reseed_phases: bool,
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_snapshots: bool,
    #[serde(default = "default_true")]
    pub save_trajectory: bool,
    /// Include the full belief vector in each snapshot.
    #[serde(default = "default_true")]
    pub save_beliefs_in_snapshot: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

// Main search configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SearchConfig {
    pub search: SearchSection,
    #[serde(default)]
    pub noise: NoiseConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_step_time_ms() -> u64 { 100 }
fn default_harmonics() -> u32 { REFERENCE_PHASES.len() as u32 }
fn default_frequency() -> f64 { 1.0 }
fn default_angle_divisor() -> f64 { 500.0 }
fn default_coverage_scale() -> f64 { 0.5 }
fn default_policy() -> PolicyShape { PolicyShape::NeighborComparison }
fn default_excursion_cooldown() -> u32 { 10 }
fn default_batch_runs() -> u32 { 100 }
fn default_true() -> bool { true }

impl Default for SearchSection {
    fn default() -> Self {
        let num_radii = 10;
        let radius_size = 40.0;
        SearchSection {
            num_radii,
            radius_size,
            p_discover: 0.8,
            step_size: radius_size,
            step_time_ms: default_step_time_ms(),
            scaling_parm: 20.0,
            max_simulation_steps: 500,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            harmonics: default_harmonics(),
            frequency: default_frequency(),
            angle_divisor: default_angle_divisor(),
            phases: Some(REFERENCE_PHASES.to_vec()),
            phase_seed: 0,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            coverage_scale: default_coverage_scale(),
            policy: default_policy(),
            adaptive_turning: false,
            excursion_cooldown_ticks: default_excursion_cooldown(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            runs: default_batch_runs(),
            base_seed: 0,
            detection_radius: None,
            reseed_phases: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: "search".to_string(),
            save_snapshots: true,
            save_trajectory: true,
            save_beliefs_in_snapshot: true,
            format: Some("json".to_string()),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            search: SearchSection::default(),
            noise: NoiseConfig::default(),
            model: ModelConfig::default(),
            batch: BatchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Loads the search configuration from a TOML file and validates it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;
        log::debug!("Loaded search configuration from {}", path_ref.display());
        Ok(config)
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameter sets the model cannot run with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.search;
        if s.num_radii == 0 {
            anyhow::bail!("num_radii must be greater than 0.");
        }
        if !(s.radius_size.is_finite() && s.radius_size > 0.0) {
            anyhow::bail!("radius_size must be positive, got {}.", s.radius_size);
        }
        if !(s.p_discover > 0.0 && s.p_discover < 1.0) {
            anyhow::bail!("p_discover must lie strictly between 0 and 1, got {}.", s.p_discover);
        }
        if !(s.step_size.is_finite() && s.step_size > 0.0) {
            anyhow::bail!("step_size must be positive, got {}.", s.step_size);
        }
        if !s.scaling_parm.is_finite() {
            anyhow::bail!("scaling_parm must be finite.");
        }
        if s.max_simulation_steps == 0 {
            anyhow::bail!("max_simulation_steps must be greater than 0.");
        }

        let n = &self.noise;
        if n.harmonics == 0 {
            anyhow::bail!("noise.harmonics must be greater than 0.");
        }
        if !n.frequency.is_finite() {
            anyhow::bail!("noise.frequency must be finite.");
        }
        if !(n.angle_divisor.is_finite() && n.angle_divisor > 0.0) {
            anyhow::bail!("noise.angle_divisor must be positive, got {}.", n.angle_divisor);
        }
        if let Some(phases) = &n.phases {
            if phases.len() != n.harmonics as usize {
                anyhow::bail!(
                    "noise.phases has {} entries but noise.harmonics is {}.",
                    phases.len(),
                    n.harmonics
                );
            }
            if let Some(bad) = phases.iter().find(|p| !(**p >= 0.0 && **p < 1.0)) {
                anyhow::bail!("noise phase {} is outside [0, 1).", bad);
            }
        }

        if !(self.model.coverage_scale.is_finite() && self.model.coverage_scale > 0.0) {
            anyhow::bail!("model.coverage_scale must be positive, got {}.", self.model.coverage_scale);
        }
        if let Some(r) = self.batch.detection_radius {
            if !(r.is_finite() && r >= 0.0) {
                anyhow::bail!("batch.detection_radius must be non-negative, got {}.", r);
            }
        }
        Ok(())
    }

    /// Converts the configuration into the parameters used at runtime.
    pub fn get_search_params(&self) -> SearchParams {
        let num_radii = self.search.num_radii as usize;
        let radius_size = self.search.radius_size;

        SearchParams {
            num_radii,
            radius_size,
            max_radius: num_radii as f64 * radius_size,
            p_discover: self.search.p_discover,
            step_size: self.search.step_size,
            step_time_ms: self.search.step_time_ms,
            scaling_parm: self.search.scaling_parm,
            max_simulation_steps: self.search.max_simulation_steps,
            // Prior is N(0, sqrt(num_radii)) over bin indices
            prior_mean: 0.0,
            prior_sigma: (num_radii as f64).sqrt(),
            coverage_lambda: (1.0 - self.search.p_discover).ln(),
            coverage_scale: self.model.coverage_scale,
            policy: self.model.policy,
            adaptive_turning: self.model.adaptive_turning,
            excursion_cooldown_ticks: self.model.excursion_cooldown_ticks,
            noise: NoiseParams {
                harmonics: self.noise.harmonics as usize,
                frequency: self.noise.frequency,
                angle_divisor: self.noise.angle_divisor,
            },
            detection_radius: self
                .batch
                .detection_radius
                .unwrap_or(self.search.step_size * self.model.coverage_scale),
        }
    }
}
