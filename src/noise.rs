use crate::fault::ConsistencyFault;
use anyhow::Result;
use rand::distr::Uniform;
use rand::prelude::*;
use search_common::NoiseParams;
use std::f64::consts::PI;

/// Band-limited turning signal: the mean of `m` phase-shifted harmonics.
///
/// `noise(p) = (1/m) * sum_{i=1..m} sin(2*pi*(i*f*p/K + phi_i))`
///
/// Phases are expressed in turns, so each `phi_i` lies in [0, 1). `K` is the
/// configured angle divisor; with integer step indices and `K = 1` every
/// harmonic completes whole cycles and the signal is constant, which is why the
/// default divisor is 500.
#[derive(Debug, Clone)]
pub struct NoiseSynthesizer {
    params: NoiseParams,
    phases: Vec<f64>,
}

impl NoiseSynthesizer {
    /// Builds a synthesizer from a fixed phase vector.
    pub fn with_phases(params: NoiseParams, phases: Vec<f64>) -> Result<Self> {
        if phases.len() != params.harmonics {
            anyhow::bail!(
                "Expected {} noise phases, got {}.",
                params.harmonics,
                phases.len()
            );
        }
        Ok(Self { params, phases })
    }

    /// Draws a fresh phase vector, uniform in [0, 1).
    pub fn from_rng<R: Rng>(params: NoiseParams, rng: &mut R) -> Result<Self> {
        let phase_dist = Uniform::new(0.0f64, 1.0)?;
        let phases = (0..params.harmonics).map(|_| rng.sample(phase_dist)).collect();
        Self::with_phases(params, phases)
    }

    /// Draws phases from a dedicated `StdRng` seeded with `seed`.
    pub fn from_seed(params: NoiseParams, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_rng(params, &mut rng)
    }

    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Signal value for step index `p`. Fails if the result leaves [-1, 1].
    pub fn sample(&self, p: u64) -> Result<f64> {
        let m = self.params.harmonics as f64;
        let t = self.params.frequency * p as f64 / self.params.angle_divisor;
        let sum: f64 = self
            .phases
            .iter()
            .enumerate()
            .map(|(idx, phi)| {
                let i = (idx + 1) as f64;
                (2.0 * PI * (i * t + phi)).sin()
            })
            .sum();
        let value = sum / m;
        if !value.is_finite() || value.abs() > 1.0 + 1e-12 {
            return Err(ConsistencyFault::NoiseOutOfRange { step: p, value }.into());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(harmonics: usize) -> NoiseParams {
        NoiseParams { harmonics, frequency: 1.0, angle_divisor: 500.0 }
    }

    #[test]
    fn bounded_for_random_phase_vectors() {
        for seed in 0..20 {
            let noise = NoiseSynthesizer::from_seed(params(20), seed).unwrap();
            for p in 0..2000 {
                let v = noise.sample(p).unwrap();
                assert!((-1.0..=1.0).contains(&v), "noise({}) = {} out of range", p, v);
            }
        }
    }

    #[test]
    fn deterministic_in_step_index() {
        let noise = NoiseSynthesizer::from_seed(params(8), 7).unwrap();
        for p in [0, 1, 17, 499, 1000] {
            assert_eq!(noise.sample(p).unwrap(), noise.sample(p).unwrap());
        }
    }

    #[test]
    fn reseeding_changes_the_signal() {
        let a = NoiseSynthesizer::from_seed(params(8), 1).unwrap();
        let b = NoiseSynthesizer::from_seed(params(8), 2).unwrap();
        assert_ne!(a.phases(), b.phases());
        let differs = (0..50).any(|p| a.sample(p).unwrap() != b.sample(p).unwrap());
        assert!(differs);
    }

    #[test]
    fn single_harmonic_matches_closed_form() {
        let noise = NoiseSynthesizer::with_phases(params(1), vec![0.25]).unwrap();
        // sin(2*pi*(0 + 0.25)) = 1
        assert!((noise.sample(0).unwrap() - 1.0).abs() < 1e-12);
        // p = 125 adds a quarter turn: sin(pi) = 0
        assert!(noise.sample(125).unwrap().abs() < 1e-9);
    }

    #[test]
    fn opposed_phases_cancel_at_zero_frequency() {
        let flat = NoiseParams { harmonics: 2, frequency: 0.0, angle_divisor: 1.0 };
        let noise = NoiseSynthesizer::with_phases(flat, vec![0.0, 0.5]).unwrap();
        for p in 0..100 {
            assert!(noise.sample(p).unwrap().abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_mismatched_phase_count() {
        assert!(NoiseSynthesizer::with_phases(params(3), vec![0.1]).is_err());
    }
}
