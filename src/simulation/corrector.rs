//! True-distribution correction — de-biasing empirical fixation durations.
//!
//! Purpose
//! -------
//! The tabulated fixation distributions exclude each trial's last fixation,
//! whose duration was truncated by the decision. Long fixations are more
//! likely to be interrupted, so the empirical distributions are biased
//! toward short durations. This module approximates the un-truncated
//! ("true") distributions by a fixed-point iteration: simulate trials with
//! the current distributions, measure per time bin how often a fixation in
//! that bin ended the trial, and divide the empirical mass by the
//! probability of *not* being last.
//!
//! Key behaviors
//! -------------
//! - [`true_fixation_distributions`] bins the input distributions, then
//!   runs `iterations` rounds of simulate → count → correct → renormalize,
//!   feeding each round's output into the next.
//! - Non-last fixations are counted under their recorded duration; the
//!   last fixation of each trial is counted under its intended
//!   (uninterrupted) duration, and contributes to both the last-fixation
//!   and the total count.
//! - A bin with no observations keeps its empirical mass; a bin where
//!   every observed fixation was last (correction undefined) also keeps
//!   its empirical mass.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each corrected cell is renormalized, so its bin probabilities sum to
//!   1 after every round.
//! - When the simulated counts show no last fixations anywhere, the
//!   correction is the identity up to renormalization.

use crate::addm::core::params::ADDMParams;
use crate::addm::core::trial::FixatedItem;
use crate::simulation::distributions::{
    duration_bin, value_difference, EmpiricalDistributions, FixationDist, FixationKey,
};
use crate::simulation::errors::{SimError, SimResult};
use crate::simulation::simulator::{simulate, SimulatedTrial, SimulatorConfig};
use rand::Rng;
use std::collections::HashMap;

/// Options controlling [`true_fixation_distributions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectorOptions {
    /// Number of simulate → correct rounds.
    pub iterations: usize,
    /// Simulated trials per condition in each round.
    pub trials_per_condition: usize,
    /// Width of one duration bin in milliseconds.
    pub bin_step: u64,
    /// Upper edge of the last bin; longer durations clamp into it.
    pub max_duration: u64,
}

impl Default for CorrectorOptions {
    fn default() -> Self {
        CorrectorOptions {
            iterations: 2,
            trials_per_condition: 400,
            bin_step: 10,
            max_duration: 3000,
        }
    }
}

/// Per-cell last/total fixation counts, one slot per time bin.
struct CellCounts {
    last: Vec<u64>,
    total: Vec<u64>,
}

impl CellCounts {
    fn zeroed(n_bins: u64) -> CellCounts {
        CellCounts { last: vec![0; n_bins as usize], total: vec![0; n_bins as usize] }
    }
}

/// Approximate the un-truncated fixation-duration distributions.
///
/// The input distributions are first converted to binned form (sample
/// cells are normalized over `max_duration / bin_step` bins). Each round
/// then simulates `trials_per_condition` trials per condition with the
/// current distributions and divides every bin's mass by the measured
/// probability of a fixation in that bin not being the trial's last.
///
/// # Errors
/// - `SimError::InvalidBinStep` when `bin_step == 0` or no bin fits in
///   `max_duration`.
/// - Any error from binning ([`EmpiricalDistributions::to_binned`]) or
///   simulation ([`simulate`]).
pub fn true_fixation_distributions<R: Rng>(
    params: &ADDMParams, dists: &EmpiricalDistributions, conditions: &[(f64, f64)],
    config: &SimulatorConfig, opts: &CorrectorOptions, rng: &mut R,
) -> SimResult<EmpiricalDistributions> {
    if opts.bin_step == 0 || opts.max_duration < opts.bin_step {
        return Err(SimError::InvalidBinStep { value: opts.bin_step });
    }
    let n_bins = opts.max_duration / opts.bin_step;

    let mut current = dists.to_binned(opts.bin_step, opts.max_duration)?;
    for _ in 0..opts.iterations {
        let trials = simulate(
            params,
            &current,
            conditions,
            opts.trials_per_condition,
            config,
            rng,
        )?;
        let counts =
            tabulate_counts(&trials, opts.bin_step, n_bins, current.num_fix_dists);

        let mut corrected = HashMap::with_capacity(current.fixations.len());
        let no_counts = CellCounts::zeroed(n_bins);
        for (&key, dist) in &current.fixations {
            let (bins, probs) = match dist {
                FixationDist::Binned { bins, probs } => (bins, probs),
                // to_binned leaves no sample cells behind.
                FixationDist::Samples(_) => {
                    corrected.insert(key, dist.clone());
                    continue;
                }
            };
            let cell = counts.get(&key).unwrap_or(&no_counts);
            let new_probs = corrected_probabilities(probs, &cell.last, &cell.total);
            corrected.insert(
                key,
                FixationDist::Binned { bins: bins.clone(), probs: new_probs },
            );
        }
        current.fixations = corrected;
    }
    Ok(current)
}

/// Count, per `(fixation index, value difference, bin)`, how many simulated
/// fixations landed there and how many of those were the trial's last.
fn tabulate_counts(
    trials: &[SimulatedTrial], bin_step: u64, n_bins: u64, num_fix_dists: usize,
) -> HashMap<FixationKey, CellCounts> {
    let mut counts: HashMap<FixationKey, CellCounts> = HashMap::new();

    for trial in trials {
        let last_idx = match trial.fix_item.len().checked_sub(1) {
            Some(idx) => idx,
            None => continue,
        };
        let mut fix_number = 1usize;
        for i in 0..last_idx {
            let item = trial.fix_item[i];
            if !item.is_item() {
                continue;
            }
            let bin = duration_bin(trial.fix_time[i], bin_step, n_bins);
            let value_diff = value_difference(item, trial.value_left, trial.value_right);
            let cell = counts
                .entry(FixationKey::new(fix_number, value_diff))
                .or_insert_with(|| CellCounts::zeroed(n_bins));
            cell.total[(bin / bin_step - 1) as usize] += 1;
            if fix_number < num_fix_dists {
                fix_number += 1;
            }
        }
        // The last fixation is counted under its uninterrupted duration.
        let item = trial.fix_item[last_idx];
        let bin = duration_bin(trial.uninterrupted_last_fix_time, bin_step, n_bins);
        let value_diff = value_difference(item, trial.value_left, trial.value_right);
        let cell = counts
            .entry(FixationKey::new(fix_number, value_diff))
            .or_insert_with(|| CellCounts::zeroed(n_bins));
        let idx = (bin / bin_step - 1) as usize;
        cell.last[idx] += 1;
        cell.total[idx] += 1;
    }
    counts
}

/// Apply the per-bin correction and renormalize.
///
/// For each bin, `p_not_last = 1 − last/total` (1 when the bin has no
/// observations); the empirical mass is divided by `p_not_last` unless it
/// is zero, in which case the empirical mass is kept unchanged.
fn corrected_probabilities(probs: &[f64], last: &[u64], total: &[u64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(probs.len());
    for i in 0..probs.len() {
        let p_not_last = if total[i] > 0 {
            1.0 - (last[i] as f64 / total[i] as f64)
        } else {
            1.0
        };
        if p_not_last == 0.0 {
            out.push(probs[i]);
        } else {
            out.push(probs[i] / p_not_last);
        }
    }
    let sum: f64 = out.iter().sum();
    if sum > 0.0 {
        for p in &mut out {
            *p /= sum;
        }
    }
    out
}
