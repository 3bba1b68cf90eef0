//! addm — core aDDM data types and the trial-likelihood engine.
//!
//! Purpose
//! -------
//! Collect the building blocks of the attentional drift-diffusion model:
//! parameter and trial containers, engine configuration, the discretized
//! RDV state grid with its barrier schedule, and the forward-propagation
//! likelihood engine built on top of them.
//!
//! Key behaviors
//! -------------
//! - Define the model parameter triple ([`ADDMParams`]) with the `σ = μ·d`
//!   fallback rule, the validated observed-trial container ([`Trial`]) and
//!   the fixation item code ([`FixatedItem`]).
//! - Bundle engine configuration in [`LikelihoodConfig`] (time/state
//!   discretization, barrier magnitude and decay, visual and motor delays).
//! - Implement the discretized Fokker–Planck forward pass in
//!   [`trial_likelihood`], with an instrumented variant
//!   ([`trial_likelihood_with_trace`]) exposing the belief matrix and the
//!   barrier-crossing curves for visualization.
//!
//! Invariants & assumptions
//! ------------------------
//! - The state grid spans `[-barrier, +barrier]` with fixed step
//!   `state_step` and exactly one state pinned to zero; the belief vector
//!   starts as a point mass on that state.
//! - Interior belief mass plus the two absorption increments is rescaled at
//!   every step so that total probability mass is conserved exactly.
//! - Underdetermined noise (`σ ≤ 0` with no positive `μ`) and trials whose
//!   fixations round to zero time bins produce a **zero likelihood**, not
//!   an error; structurally invalid inputs (length mismatches, bad config
//!   fields) are rejected with [`errors::ADDMError`].
//!
//! Conventions
//! -----------
//! - Durations are integer milliseconds; all binning uses truncating
//!   integer division by `time_step`.
//! - Choice codes are −1 (left item, upper barrier) and +1 (right item,
//!   lower barrier), matching the original data convention.
//! - This module performs no I/O and no logging.
//!
//! Downstream usage
//! ----------------
//! - `estimation` pools trials and evaluates the likelihood in parallel;
//!   `simulation` shares [`ADDMParams`] and the drift convention.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its validation and arithmetic;
//!   the propagation invariants (conservation, symmetry, monotone
//!   absorption) are covered in the integration suite.

pub mod core;
pub mod errors;
pub mod likelihood;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::barriers::BarrierSchedule;
pub use self::core::config::LikelihoodConfig;
pub use self::core::grid::StateGrid;
pub use self::core::params::ADDMParams;
pub use self::core::trial::{FixatedItem, Trial};
pub use self::likelihood::{trial_likelihood, trial_likelihood_with_trace, LikelihoodTrace};
