use crate::coverage::{BinExtents, CoverageTracker};
use crate::excursion::ExcursionCounter;
use search_common::{Decision, RunStatus, SearchParams, Vec2};

/// Mutable state of one search run. Owned exclusively by `SearchSimulation`.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub params: SearchParams,
    /// Accepted updates so far; 0 before the first step.
    pub step: u64,

    // --- Kinematics ---
    pub position: Vec2,
    /// Position before the latest update, used by the quadrant-crossing rule.
    pub previous_position: Vec2,
    /// Bin the agent occupied when the latest step began.
    pub current_radius: usize,
    /// `None` until the first step has been taken.
    pub previous_radius: Option<usize>,
    pub decision: Decision,

    // --- Search effort ---
    pub coverage: CoverageTracker,
    /// Position bounds seen per bin, for reporting only.
    pub extents: Vec<Option<BinExtents>>,
    pub excursions: ExcursionCounter,

    pub status: RunStatus,
}

impl SearchState {
    /// Fresh state with the agent at the origin and no coverage.
    pub fn new(params: SearchParams) -> Self {
        let num_radii = params.num_radii;
        let cooldown = params.excursion_cooldown_ticks;
        Self {
            params,
            step: 0,
            position: Vec2::zero(),
            previous_position: Vec2::zero(),
            current_radius: 0,
            previous_radius: None,
            decision: Decision::Out,
            coverage: CoverageTracker::new(num_radii),
            extents: vec![None; num_radii],
            excursions: ExcursionCounter::new(cooldown),
            status: RunStatus::Running,
        }
    }
}
