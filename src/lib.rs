//! addm_toolbox — estimation and simulation of the attentional
//! drift-diffusion model (aDDM).
//!
//! Purpose
//! -------
//! Provide the two numerical engines at the heart of aDDM analyses of
//! two-alternative choice data:
//!
//! - a **trial-likelihood engine** that propagates a discretized belief
//!   distribution over the relative-decision-value (RDV) axis forward in
//!   time and returns the probability that a candidate parameter set
//!   `(d, θ, σ)` produces one observed trial's choice and reaction time, and
//! - a **stochastic trial simulator** that samples synthetic fixation-driven
//!   RDV trajectories from the same process, driven by empirical fixation
//!   distributions tabulated from real data.
//!
//! On top of these sit a fixed-point **true-distribution corrector** that
//! removes the last-fixation truncation bias from empirical fixation
//! distributions, and a pooled negative-log-likelihood objective suitable
//! for an external parameter-search driver.
//!
//! Key behaviors
//! -------------
//! - Validated data containers ([`addm::Trial`], [`addm::LikelihoodConfig`],
//!   [`simulation::EmpiricalDistributions`]) centralize input checks so the
//!   numeric kernels can assume well-formed inputs.
//! - Per-trial likelihood evaluation is a pure function of its inputs;
//!   [`estimation::TrialSet`] evaluates a pooled trial set in parallel.
//! - Degenerate parameter tuples (unresolvable noise, zero usable time
//!   bins) yield a defined zero-likelihood sentinel rather than an error,
//!   so one bad grid point cannot abort a parameter search.
//!
//! Invariants & assumptions
//! ------------------------
//! - Time is measured in integer milliseconds and discretized into
//!   `time_step`-sized bins; the RDV axis is discretized into `state_step`-
//!   sized states spanning `[-barrier, +barrier]` with exactly one state
//!   pinned to zero.
//! - At every propagation step, interior belief mass plus cumulative
//!   barrier-absorption mass is conserved (renormalized against quadrature
//!   drift).
//! - Item codes follow the original data convention: 1 = left, 2 = right,
//!   anything else = blank/transition; choices are −1 (left, upper barrier)
//!   and +1 (right, lower barrier).
//!
//! Conventions
//! -----------
//! - Numeric kernels operate on `ndarray` containers and `statrs`
//!   distributions; simulation uses the `rand` stack with caller-supplied
//!   RNGs for reproducibility.
//! - This crate performs no I/O and no logging; error conditions are
//!   reported through [`addm::errors::ADDMError`] and
//!   [`simulation::errors::SimError`].
//!
//! Downstream usage
//! ----------------
//! - Data loaders construct [`addm::Trial`] values at the boundary and pool
//!   them into an [`estimation::TrialSet`]; an external optimizer minimizes
//!   [`estimation::TrialSet::negative_log_likelihood`].
//! - Analysis code tabulates [`simulation::EmpiricalDistributions`] from
//!   observed trials, optionally runs
//!   [`simulation::true_fixation_distributions`] to de-bias them, and then
//!   generates synthetic corpora with [`simulation::simulate`].
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; the end-to-end properties
//!   (mass conservation, left/right symmetry, simulator termination, the
//!   corrector fixed-point sanity check) are exercised in
//!   `tests/integration_addm_pipeline.rs`.

pub mod addm;
pub mod estimation;
pub mod simulation;

pub use addm::{
    trial_likelihood, trial_likelihood_with_trace, ADDMParams, BarrierSchedule, FixatedItem,
    LikelihoodConfig, LikelihoodTrace, StateGrid, Trial,
};
pub use estimation::TrialSet;
pub use simulation::{
    simulate, true_fixation_distributions, CorrectorOptions, EmpiricalDistributions, FixationDist,
    FixationKey, SimulatedTrial, SimulatorConfig, TabulationOptions,
};
