//! Probability state grid — the discretized RDV axis and its belief vector.
//!
//! Purpose
//! -------
//! Own the dense per-trial state of the forward algorithm: the ordered RDV
//! states spanning `[-barrier, +barrier]`, the belief vector (one
//! probability per state), and a scratch buffer for the next step's
//! beliefs. The grid is allocated once per trial-likelihood call and reused
//! across all time steps; it never escapes the engine.
//!
//! Invariants & assumptions
//! ------------------------
//! - States are evenly spaced by `state_step`, ordered ascending.
//! - Exactly one state is pinned to exactly `0.0` (the one nearest zero),
//!   so the point-mass initial condition has a well-defined home and the
//!   grid stays left/right symmetric in the default configuration.
//! - The belief vector is non-negative; together with cumulative barrier
//!   absorption it sums to 1 at every step (the engine renormalizes).
//!
//! Conventions
//! -----------
//! - The caller guarantees `barrier > 0` and `0 < state_step ≤ barrier`
//!   via [`crate::addm::LikelihoodConfig`]; the grid does not re-validate.

use ndarray::Array1;

/// `StateGrid` — RDV states plus the belief vector and a scratch buffer.
///
/// Fields
/// ------
/// - `states`: ascending RDV values from `-barrier` to `+barrier`.
/// - `belief`: probability mass per state; initialized as a point mass on
///   the zero state.
/// - `scratch`: same length as `belief`; the engine writes the next step's
///   interior masses here and then swaps the two buffers, so no per-step
///   allocation occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct StateGrid {
    /// Ordered RDV states.
    pub states: Array1<f64>,
    /// Belief vector over the states.
    pub belief: Array1<f64>,
    /// Reusable buffer for the next step's beliefs.
    pub scratch: Array1<f64>,
    zero_index: usize,
}

impl StateGrid {
    /// Build the grid for a given barrier magnitude and state step, with
    /// the belief vector initialized as a point mass at zero.
    ///
    /// The state nearest zero is snapped to exactly `0.0`. At the default
    /// `state_step = 0.1` this reproduces the original `|s| < 0.01` snap;
    /// for other steps it preserves the actual invariant (one pinned zero
    /// state) instead of the literal threshold.
    pub fn new(barrier: f64, state_step: f64) -> StateGrid {
        let n = ((2.0 * barrier) / state_step).round() as usize + 1;
        let mut states =
            Array1::from_iter((0..n).map(|i| -barrier + (i as f64) * state_step));

        // Pin the nearest state to exactly zero.
        let mut zero_index = 0;
        let mut best = f64::INFINITY;
        for (i, &s) in states.iter().enumerate() {
            if s.abs() < best {
                best = s.abs();
                zero_index = i;
            }
        }
        states[zero_index] = 0.0;

        let mut belief = Array1::zeros(n);
        belief[zero_index] = 1.0;
        let scratch = Array1::zeros(n);

        StateGrid { states, belief, scratch, zero_index }
    }

    /// Number of discrete states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when the grid holds no states (never the case for validated
    /// configurations; present for completeness).
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Index of the pinned zero state.
    pub fn zero_index(&self) -> usize {
        self.zero_index
    }

    /// Total interior probability mass currently on the grid.
    pub fn total_mass(&self) -> f64 {
        self.belief.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Axis construction (span, spacing, length) at the default step.
    // - The pinned-zero-state invariant, including a step where the naive
    //   fixed snapping band would miss.
    // - The point-mass initial condition.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The default grid (barrier 1, step 0.1) has 21 states from -1 to 1
    // with the middle state exactly zero and carrying all initial mass.
    fn default_grid_has_pinned_zero_point_mass() {
        let grid = StateGrid::new(1.0, 0.1);

        assert_eq!(grid.len(), 21);
        assert_eq!(grid.states[0], -1.0);
        assert_eq!(grid.states[20], 1.0);
        assert_eq!(grid.zero_index(), 10);
        assert_eq!(grid.states[10], 0.0);
        assert_eq!(grid.belief[10], 1.0);
        assert_eq!(grid.total_mass(), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // With a step that puts no state strictly inside the original ±0.01
    // band (barrier 1, step 0.4 → nearest states at ±0.2), the nearest
    // state is still pinned to zero, preserving the real invariant.
    fn coarse_grid_still_pins_a_zero_state() {
        let grid = StateGrid::new(1.0, 0.4);

        let zeros = grid.states.iter().filter(|&&s| s == 0.0).count();
        assert_eq!(zeros, 1, "exactly one state must be pinned to zero");
        assert_eq!(grid.belief[grid.zero_index()], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Spacing between consecutive states equals the configured step
    // (away from the pinned state, which absorbs the rounding).
    fn states_are_evenly_spaced() {
        let grid = StateGrid::new(1.0, 0.1);
        for i in 1..grid.len() {
            let gap = grid.states[i] - grid.states[i - 1];
            assert!((gap - 0.1).abs() < 1e-9, "gap at {i} was {gap}");
        }
    }
}
