pub mod config;
pub mod decision;
pub mod search_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{SearchConfig, SearchSection, NoiseConfig, ModelConfig, BatchConfig, OutputConfig, PolicyShape, REFERENCE_PHASES};
pub use decision::{Decision, RunStatus, TerminationReason};
pub use search_params::{NoiseParams, SearchParams};
pub use snapshot::Snapshot;
pub use vecmath::{Vec2, angle_to_vec};
