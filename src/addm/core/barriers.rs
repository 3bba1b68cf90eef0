//! Barrier schedule — per-time-step decision thresholds.
//!
//! Precomputes the upper/lower barrier values for every time bin of a
//! trial. With `decay = 0` both sequences are constant at `±barrier`; a
//! positive decay collapses them symmetrically as
//! `barrier / (1 + decay·(t+1))`.

use ndarray::Array1;

/// Upper and lower barrier values, one per time step.
///
/// Invariants
/// ----------
/// - `up.len() == down.len() == n_steps`.
/// - `down[t] == -up[t]` for all `t` (symmetric collapse).
/// - `up` is non-increasing; with zero decay it is constant at `barrier`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarrierSchedule {
    /// Upper barrier value at each time step.
    pub up: Array1<f64>,
    /// Lower barrier value at each time step.
    pub down: Array1<f64>,
}

impl BarrierSchedule {
    /// Build the schedule for `n_steps` time bins.
    ///
    /// At step `t` (0-based) the magnitude is
    /// `barrier / (1 + decay·(t+1))`; the caller guarantees
    /// `barrier > 0` and `decay ≥ 0` via [`crate::addm::LikelihoodConfig`].
    pub fn new(barrier: f64, decay: f64, n_steps: usize) -> BarrierSchedule {
        let up = Array1::from_iter(
            (0..n_steps).map(|t| barrier / (1.0 + decay * ((t + 1) as f64))),
        );
        let down = up.mapv(|v| -v);
        BarrierSchedule { up, down }
    }
}
