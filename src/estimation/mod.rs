//! Estimation surface — the pooled likelihood objective.
//!
//! Wraps a validated trial pool ([`TrialSet`]) and exposes the parallel
//! negative-log-likelihood objective an external parameter-search driver
//! (grid search, Nelder–Mead, or a posterior sweep) minimizes.

pub mod objective;

pub use objective::TrialSet;
