use std::fmt;

/// Tolerance used by every probability-mass check.
pub const EPSILON: f64 = 0.01;

/// A mathematical identity of the model failed to hold.
///
/// These indicate a parameter or arithmetic defect. They abort the run and are
/// never retried or clamped away. Callers receive them wrapped in
/// `anyhow::Error` and can recover the variant with `downcast_ref`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyFault {
    /// The folded Gaussian prior does not carry unit mass over the bins.
    PriorMass { total: f64 },
    /// The discounted belief vector does not sum to one.
    BeliefMass { step: u64, total: f64 },
    /// The turning signal left [-1, 1].
    NoiseOutOfRange { step: u64, value: f64 },
}

impl fmt::Display for ConsistencyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyFault::PriorMass { total } => write!(
                f,
                "prior mass over all radii is {:.6}, expected 1 within {}",
                total, EPSILON
            ),
            ConsistencyFault::BeliefMass { step, total } => write!(
                f,
                "belief distribution at step {} sums to {:.6}, expected 1 within {}",
                step, total, EPSILON
            ),
            ConsistencyFault::NoiseOutOfRange { step, value } => {
                write!(f, "turning noise at step {} is {}, outside [-1, 1]", step, value)
            }
        }
    }
}

impl std::error::Error for ConsistencyFault {}

/// Checks that `total` is within `EPSILON` of one.
#[inline]
pub fn is_unit_mass(total: f64) -> bool {
    (total - 1.0).abs() < EPSILON
}
