//! Engine configuration — discretization, barriers, and delays.
//!
//! Purpose
//! -------
//! Bundle the likelihood engine's knobs in one validated, reproducible
//! configuration object instead of a long argument list: time and state
//! discretization, barrier magnitude and decay, and the visual/motor
//! delays applied during fixation preprocessing.
//!
//! Conventions
//! -----------
//! - Defaults match the original model: `time_step = 10` ms,
//!   `state_step = 0.1`, `barrier = 1`, no delays, no decay.
//! - `visual_delay` splits a leading non-accumulating interval off every
//!   item fixation; `motor_delay` is removed from the final item fixation
//!   only. Both are plain data here; the engine applies them.

use crate::addm::errors::{ADDMError, ADDMResult};

/// `LikelihoodConfig` — validated engine configuration.
///
/// Fields
/// ------
/// - `time_step`: bin width for the time axis, in milliseconds (> 0).
/// - `state_step`: bin width for the RDV axis (finite, > 0, ≤ `barrier`).
/// - `barrier`: decision threshold magnitude (finite, > 0); the grid spans
///   `[-barrier, +barrier]`.
/// - `visual_delay`: leading non-accumulating portion of each item
///   fixation, in milliseconds.
/// - `motor_delay`: non-accumulating readout period removed from the final
///   item fixation, in milliseconds.
/// - `barrier_decay`: ≥ 0; at step `t` both barriers shrink to
///   `barrier / (1 + decay·(t+1))`. Zero keeps them constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodConfig {
    /// Time-axis bin width in milliseconds.
    pub time_step: u64,
    /// RDV-axis bin width.
    pub state_step: f64,
    /// Decision threshold magnitude.
    pub barrier: f64,
    /// Visual-onset delay in milliseconds.
    pub visual_delay: u64,
    /// Motor delay in milliseconds.
    pub motor_delay: u64,
    /// Symmetric barrier collapse rate.
    pub barrier_decay: f64,
}

impl Default for LikelihoodConfig {
    fn default() -> Self {
        LikelihoodConfig {
            time_step: 10,
            state_step: 0.1,
            barrier: 1.0,
            visual_delay: 0,
            motor_delay: 0,
            barrier_decay: 0.0,
        }
    }
}

impl LikelihoodConfig {
    /// Construct a validated configuration.
    ///
    /// Errors
    /// ------
    /// - `ADDMError::InvalidTimeStep` when `time_step == 0`.
    /// - `ADDMError::InvalidBarrier` when `barrier` is non-finite or ≤ 0.
    /// - `ADDMError::InvalidStateStep` when `state_step` is non-finite,
    ///   ≤ 0, or larger than `barrier` (the grid would hold no interior
    ///   states).
    /// - `ADDMError::InvalidBarrierDecay` when `barrier_decay` is
    ///   non-finite or negative.
    pub fn new(
        time_step: u64, state_step: f64, barrier: f64, visual_delay: u64, motor_delay: u64,
        barrier_decay: f64,
    ) -> ADDMResult<Self> {
        if time_step == 0 {
            return Err(ADDMError::InvalidTimeStep { value: time_step });
        }
        if !barrier.is_finite() || barrier <= 0.0 {
            return Err(ADDMError::InvalidBarrier { value: barrier });
        }
        if !state_step.is_finite() || state_step <= 0.0 || state_step > barrier {
            return Err(ADDMError::InvalidStateStep { value: state_step, barrier });
        }
        if !barrier_decay.is_finite() || barrier_decay < 0.0 {
            return Err(ADDMError::InvalidBarrierDecay { value: barrier_decay });
        }
        Ok(LikelihoodConfig {
            time_step,
            state_step,
            barrier,
            visual_delay,
            motor_delay,
            barrier_decay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the validating constructor and the documented
    // defaults. Engine behavior under the various knobs is tested with the
    // likelihood engine.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults match the original model's published configuration.
    fn default_matches_original_model() {
        let config = LikelihoodConfig::default();
        assert_eq!(config.time_step, 10);
        assert_eq!(config.state_step, 0.1);
        assert_eq!(config.barrier, 1.0);
        assert_eq!(config.visual_delay, 0);
        assert_eq!(config.motor_delay, 0);
        assert_eq!(config.barrier_decay, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The constructor accepts a non-default but well-formed configuration.
    fn new_accepts_valid_configuration() {
        let config = LikelihoodConfig::new(5, 0.05, 1.5, 100, 80, 0.0002)
            .expect("valid configuration should construct");
        assert_eq!(config.time_step, 5);
        assert_eq!(config.visual_delay, 100);
    }

    #[test]
    // Purpose
    // -------
    // Each invalid field is rejected with its dedicated variant.
    fn new_rejects_invalid_fields() {
        assert_eq!(
            LikelihoodConfig::new(0, 0.1, 1.0, 0, 0, 0.0).unwrap_err(),
            ADDMError::InvalidTimeStep { value: 0 }
        );
        assert_eq!(
            LikelihoodConfig::new(10, 0.1, -1.0, 0, 0, 0.0).unwrap_err(),
            ADDMError::InvalidBarrier { value: -1.0 }
        );
        assert_eq!(
            LikelihoodConfig::new(10, 2.0, 1.0, 0, 0, 0.0).unwrap_err(),
            ADDMError::InvalidStateStep { value: 2.0, barrier: 1.0 }
        );
        assert_eq!(
            LikelihoodConfig::new(10, 0.1, 1.0, 0, 0, -0.5).unwrap_err(),
            ADDMError::InvalidBarrierDecay { value: -0.5 }
        );
    }
}
