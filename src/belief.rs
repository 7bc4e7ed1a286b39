use crate::coverage::CoverageTracker;
use crate::fault::{is_unit_mass, ConsistencyFault};
use anyhow::Result;
use log::trace;
use search_common::SearchParams;
use std::f64::consts::{PI, SQRT_2};

/// Error function, Abramowitz & Stegun 7.1.26 (absolute error below 1.5e-7).
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Cumulative distribution of N(mean, sigma) at `x`.
pub fn normal_cdf(x: f64, mean: f64, sigma: f64) -> f64 {
    0.5 * (1.0 + erf((x - mean) / (sigma * SQRT_2)))
}

/// Fraction of a bin already inspected, `1 - exp(lambda * x)` for `x >= 0`.
///
/// `lambda = ln(1 - p_discover)`, so one unit of normalized effort finds the
/// target with probability `p_discover` and further effort saturates towards 1.
pub fn coverage_fraction(lambda: f64, x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else {
        1.0 - (lambda * x).exp()
    }
}

/// Index of the strictly largest entry; ties go to the lowest index.
pub fn most_probable_radius(beliefs: &[f64]) -> usize {
    let mut best = 0;
    for (i, p) in beliefs.iter().enumerate().skip(1) {
        if *p > beliefs[best] {
            best = i;
        }
    }
    best
}

#[derive(Debug, Clone)]
struct BeliefCache {
    step: u64,
    coverage_revision: u64,
    beliefs: Vec<f64>,
}

/// Probability that the target lies in each radius bin, given the effort spent so far.
///
/// The prior is a zero-mean Gaussian over bin indices with standard deviation
/// `sqrt(num_radii)`, folded onto the non-negative half. Each bin is
/// discounted by its estimated inspected fraction and the removed mass is
/// handed back to all bins in proportion to what they still leave uninspected.
#[derive(Debug, Clone)]
pub struct RadiusBeliefModel {
    radius_size: f64,
    step_size: f64,
    coverage_scale: f64,
    coverage_lambda: f64,
    priors: Vec<f64>,
    cache: Option<BeliefCache>,
    evaluations: u64,
}

impl RadiusBeliefModel {
    /// Builds the model and checks that the folded prior carries unit mass.
    pub fn new(params: &SearchParams) -> Result<Self> {
        let priors: Vec<f64> = (0..params.num_radii)
            .map(|i| {
                let lo = normal_cdf(i as f64, params.prior_mean, params.prior_sigma);
                let hi = normal_cdf((i + 1) as f64, params.prior_mean, params.prior_sigma);
                // Only the non-negative tail is modelled, hence the factor 2
                2.0 * (hi - lo)
            })
            .collect();

        let total: f64 = priors.iter().sum();
        if !is_unit_mass(total) {
            return Err(ConsistencyFault::PriorMass { total }.into());
        }

        Ok(Self {
            radius_size: params.radius_size,
            step_size: params.step_size,
            coverage_scale: params.coverage_scale,
            coverage_lambda: params.coverage_lambda,
            priors,
            cache: None,
            evaluations: 0,
        })
    }

    pub fn priors(&self) -> &[f64] {
        &self.priors
    }

    pub fn num_radii(&self) -> usize {
        self.priors.len()
    }

    /// Number of times the distribution was actually computed (cache misses).
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Estimated inspected fraction of every bin.
    pub fn inspected_fractions(&self, coverage: &CoverageTracker) -> Vec<f64> {
        coverage
            .dwell_times()
            .iter()
            .enumerate()
            .map(|(i, dwell)| {
                let circumference = 2.0 * PI * (i + 1) as f64 * self.radius_size;
                let effort = dwell * self.step_size * self.coverage_scale / circumference;
                coverage_fraction(self.coverage_lambda, effort)
            })
            .collect()
    }

    /// Computes the discounted distribution without touching the cache.
    pub fn compute(&self, coverage: &CoverageTracker) -> Vec<f64> {
        debug_assert_eq!(coverage.num_radii(), self.priors.len());
        let inspected = self.inspected_fractions(coverage);

        let remaining: Vec<f64> = inspected.iter().map(|f| 1.0 - f).collect();
        let remaining_total: f64 = remaining.iter().sum();

        let discounted: Vec<f64> = self
            .priors
            .iter()
            .zip(&remaining)
            .map(|(prior, rem)| prior * rem)
            .collect();
        let discount_removed: f64 = self
            .priors
            .iter()
            .zip(&discounted)
            .map(|(prior, d)| prior - d)
            .sum();

        if remaining_total == 0.0 {
            // Nothing left uninspected to redistribute into.
            return discounted;
        }

        discounted
            .iter()
            .zip(&remaining)
            .map(|(d, rem)| d + (rem / remaining_total) * discount_removed)
            .collect()
    }

    /// Belief distribution for `step`, memoized until the step or coverage changes.
    pub fn beliefs(&mut self, step: u64, coverage: &CoverageTracker) -> Result<&[f64]> {
        let revision = coverage.revision();
        let fresh = matches!(&self.cache, Some(c) if c.step == step && c.coverage_revision == revision);
        if !fresh {
            let beliefs = self.compute(coverage);
            self.evaluations += 1;

            let total: f64 = beliefs.iter().sum();
            if !is_unit_mass(total) {
                return Err(ConsistencyFault::BeliefMass { step, total }.into());
            }
            trace!("Beliefs at step {}: {:?}", step, beliefs);
            self.cache = Some(BeliefCache { step, coverage_revision: revision, beliefs });
        }

        match &self.cache {
            Some(cache) => Ok(&cache.beliefs),
            None => anyhow::bail!("belief cache empty after evaluation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_common::SearchConfig;

    fn reference_params() -> SearchParams {
        SearchConfig::default().get_search_params()
    }

    #[test]
    fn normal_cdf_reference_values() {
        assert!((normal_cdf(0.0, 0.0, 1.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.0, 0.0, 1.0) - 0.841_344_7).abs() < 1e-6);
        assert!((normal_cdf(-1.96, 0.0, 1.0) - 0.024_997_9).abs() < 1e-6);
    }

    #[test]
    fn coverage_fraction_shape() {
        let lambda = (1.0f64 - 0.8).ln();
        assert_eq!(coverage_fraction(lambda, -3.0), 0.0);
        assert_eq!(coverage_fraction(lambda, 0.0), 0.0);
        assert!((coverage_fraction(lambda, 1.0) - 0.8).abs() < 1e-12);
        assert!(coverage_fraction(lambda, 50.0) <= 1.0);
    }

    #[test]
    fn priors_decrease_away_from_origin() {
        let model = RadiusBeliefModel::new(&reference_params()).unwrap();
        let priors = model.priors();
        assert_eq!(priors.len(), 10);
        assert!(priors.windows(2).all(|w| w[0] > w[1]));
        assert!(is_unit_mass(priors.iter().sum()));
    }

    #[test]
    fn too_few_radii_fail_the_prior_check() {
        let mut config = SearchConfig::default();
        config.search.num_radii = 2;
        let err = RadiusBeliefModel::new(&config.get_search_params()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConsistencyFault>(),
            Some(ConsistencyFault::PriorMass { .. })
        ));
    }

    #[test]
    fn beliefs_are_memoized_per_step() {
        let mut model = RadiusBeliefModel::new(&reference_params()).unwrap();
        let mut coverage = CoverageTracker::new(10);
        coverage.credit(None, 0);

        let first = model.beliefs(3, &coverage).unwrap().to_vec();
        let second = model.beliefs(3, &coverage).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(model.evaluations(), 1);

        model.beliefs(4, &coverage).unwrap();
        assert_eq!(model.evaluations(), 2);

        coverage.credit(Some(0), 0);
        let updated = model.beliefs(4, &coverage).unwrap().to_vec();
        assert_eq!(model.evaluations(), 3);
        assert!(updated[0] < first[0]);
    }

    #[test]
    fn most_probable_radius_prefers_lowest_index_on_ties() {
        assert_eq!(most_probable_radius(&[0.2, 0.3, 0.3, 0.2]), 1);
        assert_eq!(most_probable_radius(&[0.25, 0.25, 0.25, 0.25]), 0);
        assert_eq!(most_probable_radius(&[0.1, 0.2, 0.7]), 2);
    }

    #[test]
    fn saturated_coverage_returns_discounted_mass() {
        let model = RadiusBeliefModel::new(&reference_params()).unwrap();
        let coverage = CoverageTracker::from_dwell_times(vec![f64::INFINITY; 10]);
        let beliefs = model.compute(&coverage);
        assert!(beliefs.iter().all(|p| *p == 0.0));
    }
}
