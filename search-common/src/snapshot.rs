use serde::{Serialize, Deserialize};
use crate::decision::{Decision, RunStatus};

/// State of one run after a step, as seen by renderers and analysis tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Step counter at the time the snapshot was taken.
    pub step: u64,
    /// Agent position relative to the origin.
    pub position: (f64, f64),
    /// Bin the agent occupied when the last step began.
    pub current_radius: usize,
    pub decision: Decision,
    pub excursion_number: u32,
    /// Bin with the highest belief at this step.
    pub most_probable_radius: usize,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")] // Don't write "beliefs": null
    pub beliefs: Option<Vec<f64>>,
    pub dwell_times: Vec<f64>,
}
