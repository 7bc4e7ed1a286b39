//! Belief-driven radial search: an agent walks concentric bins around an
//! origin, steering by a coverage-discounted prior over where the target lies.

pub mod batch;
pub mod belief;
pub mod coverage;
pub mod excursion;
pub mod fault;
pub mod noise;
pub mod output;
pub mod policy;
pub mod search_state;
pub mod simulation;
pub mod target;

pub use batch::{run_batch, BatchSummary, RunOutcome, RunResult};
pub use belief::RadiusBeliefModel;
pub use coverage::{BinExtents, CoverageTracker};
pub use fault::{ConsistencyFault, EPSILON};
pub use noise::NoiseSynthesizer;
pub use policy::NavigationPolicy;
pub use simulation::SearchSimulation;
pub use target::Target;
