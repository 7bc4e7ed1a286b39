use serde::{Deserialize, Serialize};
use std::fmt;

/// Radial intent of the agent for the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Out,
    Stay,
    In,
}

impl Decision {
    /// Sign applied to the outward unit vector: +1 out, 0 stay, -1 in.
    pub fn sign(self) -> i8 {
        match self {
            Decision::Out => 1,
            Decision::Stay => 0,
            Decision::In => -1,
        }
    }

    /// Inverts the radial direction. `Stay` has no direction and is unchanged.
    pub fn flipped(self) -> Self {
        match self {
            Decision::Out => Decision::In,
            Decision::Stay => Decision::Stay,
            Decision::In => Decision::Out,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Out => "out",
            Decision::Stay => "stay",
            Decision::In => "in",
        };
        f.write_str(s)
    }
}

/// Why a run stopped. These are expected outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The step counter went past `max_simulation_steps`.
    StepBudgetExhausted,
    /// The agent's bin index reached `num_radii`.
    RadiusEscaped,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::StepBudgetExhausted => f.write_str("step budget exhausted"),
            TerminationReason::RadiusEscaped => f.write_str("radius escaped the search area"),
        }
    }
}

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Terminated(TerminationReason),
}

impl RunStatus {
    pub fn is_running(self) -> bool {
        matches!(self, RunStatus::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_inverts_sign() {
        for d in [Decision::Out, Decision::Stay, Decision::In] {
            assert_eq!(d.flipped().sign(), -d.sign());
        }
    }
}
