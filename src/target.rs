use anyhow::Result;
use rand::distr::Uniform;
use rand::prelude::*;
use rand_distr::Normal;
use search_common::{angle_to_vec, SearchParams, Vec2};
use std::f64::consts::PI;

/// A hidden, stationary target placed according to the search prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Vec2,
}

impl Target {
    /// Samples a target: half-normal distance in bin units, uniform bearing.
    pub fn sample<R: Rng>(params: &SearchParams, rng: &mut R) -> Result<Self> {
        let normal = Normal::new(params.prior_mean, params.prior_sigma)
            .map_err(|e| anyhow::anyhow!("Invalid prior for target placement: {}", e))?;
        let bearing_dist = Uniform::new(0.0f64, 2.0 * PI)?;

        let bins = rng.sample(normal).abs();
        let bearing = rng.sample(bearing_dist);
        Ok(Self { position: angle_to_vec(bearing).scale(bins * params.radius_size) })
    }

    /// Radius bin holding the target. May lie outside the search area.
    pub fn radius_bin(&self, params: &SearchParams) -> usize {
        params.radius_bin(self.position.length())
    }

    /// One detection attempt for the agent's move from `from` to `to`.
    ///
    /// The target is only visible when it lies within `detection_radius` of the
    /// swept segment, and is then spotted with probability `p_discover`.
    pub fn try_detect<R: Rng>(&self, from: Vec2, to: Vec2, params: &SearchParams, rng: &mut R) -> bool {
        distance_to_segment(self.position, from, to) <= params.detection_radius
            && rng.random_bool(params.p_discover)
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b.sub(a);
    let len_sq = ab.length_squared();
    if len_sq < 1e-18 {
        return p.distance(a);
    }
    let ap = p.sub(a);
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a.add(ab.scale(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_common::SearchConfig;

    #[test]
    fn segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((distance_to_segment(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((distance_to_segment(Vec2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-12);
        assert!((distance_to_segment(Vec2::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn sampled_targets_concentrate_near_origin() {
        let params = SearchConfig::default().get_search_params();
        let mut rng = StdRng::seed_from_u64(11);
        let bins: Vec<usize> = (0..2000)
            .map(|_| Target::sample(&params, &mut rng).unwrap().radius_bin(&params))
            .collect();
        let inner = bins.iter().filter(|b| **b < 3).count();
        let outer = bins.iter().filter(|b| **b >= 7).count();
        assert!(inner > outer * 3, "inner {} outer {}", inner, outer);
    }

    #[test]
    fn distant_target_is_never_detected() {
        let params = SearchConfig::default().get_search_params();
        let mut rng = StdRng::seed_from_u64(3);
        let target = Target { position: Vec2::new(300.0, 0.0) };
        let hits = (0..100)
            .filter(|_| target.try_detect(Vec2::zero(), Vec2::new(0.0, 40.0), &params, &mut rng))
            .count();
        assert_eq!(hits, 0);
    }
}
