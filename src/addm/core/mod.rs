//! core — shared aDDM data containers, configuration, and grid primitives.
//!
//! Purpose
//! -------
//! Collect the low-level building blocks the likelihood engine and the
//! simulator share: the model parameter triple, the validated observed-trial
//! container, engine configuration, the barrier schedule, and the
//! discretized RDV state grid with its belief vector.
//!
//! Key behaviors
//! -------------
//! - [`params::ADDMParams`] owns `(d, θ, σ | μ)` and resolves the effective
//!   noise parameter.
//! - [`trial::Trial`] enforces basic data invariants (equal-length fixation
//!   sequences, a valid choice code, finite item values).
//! - [`config::LikelihoodConfig`] bundles the discretization and delay
//!   knobs with validated construction and original-model defaults.
//! - [`barriers::BarrierSchedule`] precomputes the per-step barrier pair,
//!   constant or collapsing.
//! - [`grid::StateGrid`] owns the state axis, the belief vector, and a
//!   scratch buffer reused across time steps (allocated once per trial).
//!
//! Conventions
//! -----------
//! - Durations are integer milliseconds; binning truncates.
//! - The RDV axis runs from `-barrier` (right decision) to `+barrier`
//!   (left decision); the state nearest zero is pinned to exactly zero.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover construction and validation; the
//!   propagation behavior built on these primitives is tested with the
//!   likelihood engine.

pub mod barriers;
pub mod config;
pub mod grid;
pub mod params;
pub mod trial;

pub use self::barriers::BarrierSchedule;
pub use self::config::LikelihoodConfig;
pub use self::grid::StateGrid;
pub use self::params::ADDMParams;
pub use self::trial::{FixatedItem, Trial};
