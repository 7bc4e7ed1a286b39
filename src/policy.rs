use crate::belief::most_probable_radius;
use search_common::{Decision, PolicyShape};

/// Chooses the radial direction of the next step from the current beliefs.
///
/// One shape is fixed per run by configuration; the two are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPolicy {
    shape: PolicyShape,
}

impl NavigationPolicy {
    pub fn new(shape: PolicyShape) -> Self {
        Self { shape }
    }

    pub fn decide(&self, beliefs: &[f64], current_radius: usize) -> Decision {
        match self.shape {
            PolicyShape::NeighborComparison => neighbor_comparison(beliefs, current_radius),
            PolicyShape::ArgmaxTracking => argmax_tracking(beliefs, current_radius),
        }
    }
}

/// Moves towards the more probable neighbouring bin; ties break outward.
fn neighbor_comparison(beliefs: &[f64], r: usize) -> Decision {
    let last = beliefs.len().saturating_sub(1);
    if last == 0 {
        return Decision::Stay;
    }

    if r == 0 {
        if beliefs[0] > beliefs[1] {
            Decision::Stay
        } else {
            Decision::Out
        }
    } else if r >= last {
        if beliefs[last] < beliefs[last - 1] {
            Decision::In
        } else {
            Decision::Stay
        }
    } else {
        let current = beliefs[r];
        let inner = beliefs[r - 1];
        let outer = beliefs[r + 1];
        if current > inner && current > outer {
            Decision::Stay
        } else if outer > current && outer > inner {
            Decision::Out
        } else if outer == current || outer == inner {
            Decision::Out
        } else {
            Decision::In
        }
    }
}

fn argmax_tracking(beliefs: &[f64], r: usize) -> Decision {
    let target = most_probable_radius(beliefs);
    if r < target {
        Decision::Out
    } else if r > target {
        Decision::In
    } else {
        Decision::Stay
    }
}
