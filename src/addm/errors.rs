//! Errors for the aDDM core (trial validation, engine configuration, and
//! likelihood-kernel failures).
//!
//! This module defines [`ADDMError`] and the crate-wide [`ADDMResult`] alias
//! used by the trial container, the engine configuration, and the likelihood
//! engine itself.
//!
//! ## Conventions
//! - Durations are integer milliseconds; indices are 0-based.
//! - Degenerate *model* inputs (underdetermined noise, zero usable time
//!   bins) are **not** errors: the engine absorbs them by returning a zero
//!   likelihood so a parameter search survives bad grid points. Only
//!   structurally invalid inputs surface here.

/// Result alias for aDDM core operations that may produce [`ADDMError`].
pub type ADDMResult<T> = Result<T, ADDMError>;

/// Unified error type for the aDDM core.
///
/// Covers trial-container validation, engine-configuration validation, and
/// the internal transition-kernel construction path. Implements
/// `Display`/`Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ADDMError {
    // ---- Trial validation ----
    /// Fixation item and duration sequences have different lengths.
    FixationLengthMismatch { items: usize, durations: usize },

    /// Choice code must be −1 (left) or +1 (right).
    InvalidChoice { value: i8 },

    /// An item value is NaN/±inf.
    NonFiniteValue { side: &'static str, value: f64 },

    // ---- Configuration validation ----
    /// Time step must be a strictly positive number of milliseconds.
    InvalidTimeStep { value: u64 },

    /// State step must be finite, > 0, and no larger than the barrier.
    InvalidStateStep { value: f64, barrier: f64 },

    /// Barrier magnitude must be finite and > 0.
    InvalidBarrier { value: f64 },

    /// Barrier decay must be finite and ≥ 0.
    InvalidBarrierDecay { value: f64 },

    // ---- Estimation ----
    /// A pooled trial set must contain at least one trial.
    EmptyTrialSet,

    // ---- Internal kernel construction ----
    /// The Normal transition kernel could not be constructed.
    NoiseKernel { mean: f64, sigma: f64 },
}

impl std::error::Error for ADDMError {}

impl std::fmt::Display for ADDMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Trial validation ----
            ADDMError::FixationLengthMismatch { items, durations } => {
                write!(
                    f,
                    "Fixation sequences must have equal lengths: {items} items vs {durations} durations."
                )
            }
            ADDMError::InvalidChoice { value } => {
                write!(f, "Choice must be -1 (left) or +1 (right); got: {value}")
            }
            ADDMError::NonFiniteValue { side, value } => {
                write!(f, "Item value for {side} must be finite; got: {value}")
            }
            // ---- Configuration validation ----
            ADDMError::InvalidTimeStep { value } => {
                write!(f, "Time step must be > 0 ms; got: {value}")
            }
            ADDMError::InvalidStateStep { value, barrier } => {
                write!(
                    f,
                    "State step must be finite, > 0, and <= barrier ({barrier}); got: {value}"
                )
            }
            ADDMError::InvalidBarrier { value } => {
                write!(f, "Barrier must be finite and > 0; got: {value}")
            }
            ADDMError::InvalidBarrierDecay { value } => {
                write!(f, "Barrier decay must be finite and >= 0; got: {value}")
            }
            // ---- Estimation ----
            ADDMError::EmptyTrialSet => {
                write!(f, "Trial set is empty.")
            }
            // ---- Internal kernel construction ----
            ADDMError::NoiseKernel { mean, sigma } => {
                write!(
                    f,
                    "Failed to construct Normal transition kernel with mean {mean} and sigma {sigma}."
                )
            }
        }
    }
}
