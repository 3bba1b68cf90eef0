//! Simulation stack — empirical distributions, trial generation, and
//! fixation-distribution correction.
//!
//! Purpose
//! -------
//! Everything needed to generate synthetic trials under the model:
//! [`distributions`] tabulates and samples the empirical fixation process,
//! [`simulator`] steps the relative decision value through sampled
//! fixations, and [`corrector`] de-biases the fixation distributions with
//! a simulate-and-reweight fixed-point iteration.
//!
//! Downstream usage
//! ----------------
//! Parameter-recovery studies pair this module with the likelihood engine
//! in [`crate::addm`]: simulate trials under known parameters, then check
//! that the pooled likelihood in [`crate::estimation`] recovers them.

pub mod corrector;
pub mod distributions;
pub mod errors;
pub mod simulator;

pub use corrector::{true_fixation_distributions, CorrectorOptions};
pub use distributions::{
    EmpiricalDistributions, FixationDist, FixationKey, TabulationOptions,
};
pub use errors::{SimError, SimResult};
pub use simulator::{simulate, SimulatedTrial, SimulatorConfig};
