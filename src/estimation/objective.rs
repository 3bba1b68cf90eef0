//! Pooled negative log-likelihood over a set of observed trials.
//!
//! Purpose
//! -------
//! Turn the per-trial likelihood into the scalar objective an external
//! parameter-search driver minimizes: the negative sum of log-likelihoods
//! over a validated, non-empty trial set, evaluated in parallel.
//!
//! Key behaviors
//! -------------
//! - Trials whose likelihood is zero (degenerate parameters, zero usable
//!   time bins, or vanished absorption mass) are skipped rather than
//!   mapped to `-inf`, so a single unexplainable trial cannot dominate
//!   the objective.
//! - When *no* trial contributes, the objective returns `f64::MAX` as a
//!   worst-possible sentinel, keeping grid and simplex searches totally
//!   ordered without NaN handling.
//!
//! Conventions
//! -----------
//! - Evaluation order across trials is unspecified (rayon work-stealing);
//!   the result is a sum, so the objective is deterministic up to
//!   floating-point association.

use crate::addm::core::config::LikelihoodConfig;
use crate::addm::core::params::ADDMParams;
use crate::addm::core::trial::Trial;
use crate::addm::errors::{ADDMError, ADDMResult};
use crate::addm::likelihood::trial_likelihood;
use rayon::prelude::*;

/// `TrialSet` — a validated, non-empty pool of observed trials.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSet {
    trials: Vec<Trial>,
}

impl TrialSet {
    /// Wrap a non-empty collection of trials.
    ///
    /// # Errors
    /// - `ADDMError::EmptyTrialSet` when `trials` is empty: the objective
    ///   would be undefined.
    pub fn new(trials: Vec<Trial>) -> ADDMResult<TrialSet> {
        if trials.is_empty() {
            return Err(ADDMError::EmptyTrialSet);
        }
        Ok(TrialSet { trials })
    }

    /// The pooled trials, in insertion order.
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Number of pooled trials.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Always false for a validated set; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Pooled negative log-likelihood of the parameter set over all trials.
    ///
    /// Per-trial likelihoods are evaluated in parallel. Zero likelihoods
    /// are skipped; if every trial yields zero, returns `f64::MAX`.
    ///
    /// # Errors
    /// Any structural error from [`trial_likelihood`] on any trial.
    pub fn negative_log_likelihood(
        &self, params: &ADDMParams, config: &LikelihoodConfig,
    ) -> ADDMResult<f64> {
        let likelihoods: Vec<f64> = self
            .trials
            .par_iter()
            .map(|trial| trial_likelihood(trial, params, config))
            .collect::<ADDMResult<Vec<f64>>>()?;

        let log_likelihood: f64 =
            likelihoods.iter().filter(|&&l| l > 0.0).map(|l| l.ln()).sum();
        if log_likelihood == 0.0 {
            return Ok(f64::MAX);
        }
        Ok(-log_likelihood)
    }
}
