//! Errors for tabulation, simulation, and distribution correction.
//!
//! This module defines [`SimError`] and the [`SimResult`] alias. Unlike the
//! likelihood engine — which absorbs degenerate parameter tuples with a
//! zero-likelihood sentinel — everything here is a configuration or data
//! error and is **fatal**: silently sampling from an empty or malformed
//! distribution would produce an invalid corpus. Each variant carries the
//! identity of the offending cell or value.

/// Result alias for simulation-side operations that may produce [`SimError`].
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for the simulation stack.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    // ---- Model configuration ----
    /// Noise parameter cannot be resolved (`sigma <= 0` and no positive `mu`).
    UnderdeterminedNoise { sigma: f64, mu: f64 },

    /// Simulation time step must be a positive number of milliseconds.
    InvalidTimeStep { value: u64 },

    /// Barrier magnitude must be finite and strictly positive.
    InvalidBarrier { value: f64 },

    // ---- Distribution construction ----
    /// `prob_left_fix_first` must lie in `[0, 1]`.
    InvalidProbLeftFixFirst { value: f64 },

    /// At least one fixation-distribution index is required.
    InvalidNumFixDists { value: usize },

    /// Binned distribution bins/probabilities are inconsistent.
    InvalidBinnedDistribution { reason: &'static str },

    /// Bin step must be a strictly positive number of milliseconds.
    InvalidBinStep { value: u64 },

    // ---- Sampling ----
    /// No latency observations to sample from.
    EmptyLatencyDistribution,

    /// No transition observations to sample from.
    EmptyTransitionDistribution,

    /// No fixation distribution exists for this cell.
    MissingFixationDistribution { fix_number: usize, value_diff: i64 },

    /// The fixation distribution for this cell holds no sampleable mass.
    EmptyFixationDistribution { fix_number: usize, value_diff: i64 },

    // ---- Tabulation ----
    /// No trial in the corpus had more than one item fixation.
    NoUsableTrials,
}

impl std::error::Error for SimError {}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Model configuration ----
            SimError::UnderdeterminedNoise { sigma, mu } => {
                write!(
                    f,
                    "Noise parameter is underdetermined: sigma = {sigma}, mu = {mu} (need sigma > 0 or mu > 0)."
                )
            }
            SimError::InvalidTimeStep { value } => {
                write!(f, "Time step must be > 0 ms; got: {value}")
            }
            SimError::InvalidBarrier { value } => {
                write!(f, "Barrier must be finite and > 0; got: {value}")
            }
            // ---- Distribution construction ----
            SimError::InvalidProbLeftFixFirst { value } => {
                write!(f, "probLeftFixFirst must lie in [0, 1]; got: {value}")
            }
            SimError::InvalidNumFixDists { value } => {
                write!(f, "numFixDists must be >= 1; got: {value}")
            }
            SimError::InvalidBinnedDistribution { reason } => {
                write!(f, "Invalid binned fixation distribution: {reason}")
            }
            SimError::InvalidBinStep { value } => {
                write!(f, "Bin step must be > 0 ms; got: {value}")
            }
            // ---- Sampling ----
            SimError::EmptyLatencyDistribution => {
                write!(f, "Latency distribution is empty.")
            }
            SimError::EmptyTransitionDistribution => {
                write!(f, "Transition distribution is empty.")
            }
            SimError::MissingFixationDistribution { fix_number, value_diff } => {
                write!(
                    f,
                    "No fixation distribution for fixation {fix_number}, value difference {value_diff}."
                )
            }
            SimError::EmptyFixationDistribution { fix_number, value_diff } => {
                write!(
                    f,
                    "Fixation distribution for fixation {fix_number}, value difference {value_diff} is empty."
                )
            }
            // ---- Tabulation ----
            SimError::NoUsableTrials => {
                write!(f, "No trial with more than one item fixation was found.")
            }
        }
    }
}
