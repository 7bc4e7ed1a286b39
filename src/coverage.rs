use search_common::Vec2;
use serde::{Deserialize, Serialize};

/// Accumulated search effort per radius bin.
///
/// Dwell time is a fractional step count: a step that stays in one bin credits
/// that bin with 1, a step that spans `k` bins credits each of them with `1/k`.
/// Entries never decrease.
#[derive(Debug, Clone)]
pub struct CoverageTracker {
    dwell_time: Vec<f64>,
    revision: u64, // bumped on every credit so cached beliefs can be invalidated
}

impl CoverageTracker {
    pub fn new(num_radii: usize) -> Self {
        Self { dwell_time: vec![0.0; num_radii], revision: 0 }
    }

    /// Builds a tracker with preset dwell times, e.g. to evaluate beliefs offline.
    pub fn from_dwell_times(dwell_time: Vec<f64>) -> Self {
        debug_assert!(dwell_time.iter().all(|t| *t >= 0.0));
        Self { dwell_time, revision: 0 }
    }

    pub fn num_radii(&self) -> usize {
        self.dwell_time.len()
    }

    pub fn dwell_times(&self) -> &[f64] {
        &self.dwell_time
    }

    pub fn dwell_time(&self, radius: usize) -> f64 {
        self.dwell_time[radius]
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Credits the bins crossed by one step.
    ///
    /// With no previous bin only `current` is credited. Otherwise every bin
    /// between `previous` and `current` inclusive receives an equal share of
    /// one unit, whichever direction the agent moved.
    pub fn credit(&mut self, previous: Option<usize>, current: usize) {
        match previous {
            None => self.dwell_time[current] += 1.0,
            Some(prev) => {
                let (lo, hi) = if prev <= current { (prev, current) } else { (current, prev) };
                let share = 1.0 / ((hi - lo) + 1) as f64;
                for t in &mut self.dwell_time[lo..=hi] {
                    *t += share;
                }
            }
        }
        self.revision += 1;
    }
}

/// Bounding box of the positions recorded while the agent was in one bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinExtents {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BinExtents {
    fn at(pos: Vec2) -> Self {
        Self { min_x: pos.x, max_x: pos.x, min_y: pos.y, max_y: pos.y }
    }

    fn include(&mut self, pos: Vec2) {
        self.min_x = self.min_x.min(pos.x);
        self.max_x = self.max_x.max(pos.x);
        self.min_y = self.min_y.min(pos.y);
        self.max_y = self.max_y.max(pos.y);
    }
}

/// Grows the extents of `radius` to include `pos`.
pub fn record_extent(extents: &mut [Option<BinExtents>], radius: usize, pos: Vec2) {
    match &mut extents[radius] {
        Some(e) => e.include(pos),
        slot @ None => *slot = Some(BinExtents::at(pos)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_credits_only_current_bin() {
        let mut c = CoverageTracker::new(5);
        c.credit(None, 2);
        assert_eq!(c.dwell_times(), &[0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn same_bin_step_adds_exactly_one() {
        let mut c = CoverageTracker::new(3);
        c.credit(Some(1), 1);
        c.credit(Some(1), 1);
        assert_eq!(c.dwell_time(1), 2.0);
        assert_eq!(c.dwell_time(0), 0.0);
    }

    #[test]
    fn multi_bin_step_splits_credit_evenly() {
        let mut c = CoverageTracker::new(6);
        c.credit(Some(1), 4);
        for i in 1..=4 {
            assert!((c.dwell_time(i) - 0.25).abs() < 1e-12);
        }
        assert_eq!(c.dwell_time(0), 0.0);
        assert_eq!(c.dwell_time(5), 0.0);
    }

    #[test]
    fn inward_step_is_credited_like_outward() {
        let mut c = CoverageTracker::new(4);
        c.credit(Some(3), 1);
        let expected = 1.0 / 3.0;
        for i in 1..=3 {
            assert!((c.dwell_time(i) - expected).abs() < 1e-12);
        }
        assert_eq!(c.dwell_time(0), 0.0);
    }

    #[test]
    fn revision_tracks_every_credit() {
        let mut c = CoverageTracker::new(2);
        assert_eq!(c.revision(), 0);
        c.credit(None, 0);
        c.credit(Some(0), 1);
        assert_eq!(c.revision(), 2);
    }

    #[test]
    fn extents_grow_per_bin() {
        let mut extents = vec![None; 2];
        record_extent(&mut extents, 1, Vec2::new(3.0, -1.0));
        record_extent(&mut extents, 1, Vec2::new(-2.0, 4.0));
        let e = extents[1].unwrap();
        assert_eq!((e.min_x, e.max_x, e.min_y, e.max_y), (-2.0, 3.0, -1.0, 4.0));
        assert!(extents[0].is_none());
    }
}
