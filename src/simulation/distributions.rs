//! Empirical fixation distributions — tabulation, storage, and sampling.
//!
//! Purpose
//! -------
//! Hold the fixation-process statistics the simulator consumes: the
//! probability that the left item is fixated first, the observed latency
//! and transition durations, and per-(fixation-index, value-difference)
//! fixation-duration distributions. Distributions are built once per
//! analysis run and are read-only thereafter.
//!
//! Key behaviors
//! -------------
//! - [`EmpiricalDistributions::from_trials`] tabulates the statistics from
//!   an observed corpus, excluding each trial's last item fixation (whose
//!   duration was truncated by the decision) and anything after it.
//! - Fixation durations are keyed by a single composite [`FixationKey`]
//!   (1-based fixation index capped at `num_fix_dists`, integer value
//!   difference between the fixated and unfixated items) — a flat lookup
//!   table instead of nested maps.
//! - [`FixationDist`] carries either raw duration samples or a normalized
//!   per-time-bin probability table; both representations are sampleable
//!   and semantically equivalent. [`EmpiricalDistributions::to_binned`]
//!   converts the former into the latter for the correction procedure.
//!
//! Invariants & assumptions
//! ------------------------
//! - `prob_left_fix_first ∈ [0, 1]`, `num_fix_dists ≥ 1` (checked at
//!   construction).
//! - Binned distributions have equal-length bins/probabilities summing to
//!   1 (checked by [`FixationDist::binned`]).
//! - Emptiness of the latency/transition collections and of individual
//!   fixation cells is checked at sampling time and is fatal, with the
//!   offending cell identified.
//!
//! Conventions
//! -----------
//! - Durations are integer milliseconds. Bin `k` (1-based) covers
//!   durations in `((k−1)·bin_step, k·bin_step]`, with the final bin
//!   absorbing everything longer.

use crate::addm::core::trial::{FixatedItem, Trial};
use crate::simulation::errors::{SimError, SimResult};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use std::collections::HashMap;

/// Composite key for fixation-duration distributions: 1-based fixation
/// index (capped at `num_fix_dists`) and the integer value difference
/// `value_fixated − value_unfixated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixationKey {
    /// 1-based fixation index within the trial, capped at `num_fix_dists`.
    pub fix_number: usize,
    /// Value of the fixated item minus value of the unfixated item.
    pub value_diff: i64,
}

impl FixationKey {
    /// Construct a key. Capping against `num_fix_dists` is the caller's
    /// responsibility (the tabulator and simulator both cap their running
    /// fixation counter).
    pub fn new(fix_number: usize, value_diff: i64) -> FixationKey {
        FixationKey { fix_number, value_diff }
    }
}

/// Signed value difference seen from the fixated item's perspective.
pub(crate) fn value_difference(item: FixatedItem, value_left: f64, value_right: f64) -> i64 {
    match item {
        FixatedItem::Left => (value_left - value_right).round() as i64,
        FixatedItem::Right => (value_right - value_left).round() as i64,
        FixatedItem::Blank => 0,
    }
}

/// Map a duration to its (1-based) bin's representative value
/// `bin_step · min(duration/bin_step + 1, n_bins)`.
pub(crate) fn duration_bin(duration: u64, bin_step: u64, n_bins: u64) -> u64 {
    bin_step * (duration / bin_step + 1).min(n_bins)
}

/// One fixation-duration distribution: raw samples or binned probabilities.
#[derive(Debug, Clone, PartialEq)]
pub enum FixationDist {
    /// Raw observed durations in milliseconds; sampled uniformly.
    Samples(Vec<u64>),
    /// Normalized probability per time bin; sampled by weight.
    Binned {
        /// Representative duration of each bin (ascending).
        bins: Vec<u64>,
        /// Probability mass per bin; sums to 1.
        probs: Vec<f64>,
    },
}

impl FixationDist {
    /// Construct a validated binned distribution.
    ///
    /// Errors
    /// ------
    /// - `SimError::InvalidBinnedDistribution` when bins/probs differ in
    ///   length, are empty, contain non-finite or negative mass, or do not
    ///   sum to 1 (tolerance 1e-6).
    pub fn binned(bins: Vec<u64>, probs: Vec<f64>) -> SimResult<FixationDist> {
        if bins.is_empty() || bins.len() != probs.len() {
            return Err(SimError::InvalidBinnedDistribution {
                reason: "bins and probabilities must be non-empty and equal in length",
            });
        }
        let mut sum = 0.0;
        for &p in &probs {
            if !p.is_finite() || p < 0.0 {
                return Err(SimError::InvalidBinnedDistribution {
                    reason: "probabilities must be finite and non-negative",
                });
            }
            sum += p;
        }
        if (sum - 1.0).abs() > 1e-6 {
            return Err(SimError::InvalidBinnedDistribution {
                reason: "probabilities must sum to 1",
            });
        }
        Ok(FixationDist::Binned { bins, probs })
    }

    /// True when the distribution holds no sampleable mass.
    pub fn is_empty(&self) -> bool {
        match self {
            FixationDist::Samples(samples) => samples.is_empty(),
            FixationDist::Binned { probs, .. } => probs.iter().all(|&p| p <= 0.0),
        }
    }

    /// Draw one duration, or `None` when the distribution is empty or
    /// degenerate. Callers attach the cell identity to the `None` case.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<u64> {
        match self {
            FixationDist::Samples(samples) => {
                if samples.is_empty() {
                    return None;
                }
                Some(samples[rng.random_range(0..samples.len())])
            }
            FixationDist::Binned { bins, probs } => {
                let weights = WeightedIndex::new(probs.iter().copied()).ok()?;
                Some(bins[weights.sample(rng)])
            }
        }
    }
}

/// Options controlling [`EmpiricalDistributions::from_trials`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabulationOptions {
    /// Minimum duration (ms) for a fixation/transition to be tabulated.
    pub time_step: u64,
    /// Maximum duration (ms) for a fixation/transition to be tabulated.
    pub max_fix_time: u64,
    /// Number of distinct fixation-index distributions (index capped here).
    pub num_fix_dists: usize,
}

impl Default for TabulationOptions {
    fn default() -> Self {
        TabulationOptions { time_step: 10, max_fix_time: 3000, num_fix_dists: 3 }
    }
}

/// `EmpiricalDistributions` — read-only fixation-process statistics.
///
/// Fields
/// ------
/// - `prob_left_fix_first`: empirical probability that a trial's first
///   item fixation lands on the left item.
/// - `latencies`: observed pre-first-fixation delays (ms).
/// - `transitions`: observed inter-fixation blank durations (ms).
/// - `fixations`: duration distribution per [`FixationKey`].
/// - `num_fix_dists`: fixation-index cap; indices beyond it reuse the last
///   distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalDistributions {
    /// Probability that the first item fixation is on the left item.
    pub prob_left_fix_first: f64,
    /// Observed first-fixation latencies in milliseconds.
    pub latencies: Vec<u64>,
    /// Observed transition durations in milliseconds.
    pub transitions: Vec<u64>,
    /// Fixation-duration distribution per composite key.
    pub fixations: HashMap<FixationKey, FixationDist>,
    /// Fixation-index cap for the composite key.
    pub num_fix_dists: usize,
}

impl EmpiricalDistributions {
    /// Construct validated distributions from already-tabulated parts.
    ///
    /// Errors
    /// ------
    /// - `SimError::InvalidProbLeftFixFirst` when the probability is
    ///   non-finite or outside `[0, 1]`.
    /// - `SimError::InvalidNumFixDists` when `num_fix_dists == 0`.
    pub fn new(
        prob_left_fix_first: f64, latencies: Vec<u64>, transitions: Vec<u64>,
        fixations: HashMap<FixationKey, FixationDist>, num_fix_dists: usize,
    ) -> SimResult<Self> {
        if !prob_left_fix_first.is_finite()
            || !(0.0..=1.0).contains(&prob_left_fix_first)
        {
            return Err(SimError::InvalidProbLeftFixFirst { value: prob_left_fix_first });
        }
        if num_fix_dists == 0 {
            return Err(SimError::InvalidNumFixDists { value: num_fix_dists });
        }
        Ok(EmpiricalDistributions {
            prob_left_fix_first,
            latencies,
            transitions,
            fixations,
            num_fix_dists,
        })
    }

    /// Tabulate empirical distributions from an observed corpus.
    ///
    /// # Behavior
    /// - Trials with one or zero item fixations are discarded.
    /// - Each trial's last item fixation — and everything after it — is
    ///   excluded: its duration was truncated by the decision (the
    ///   correction procedure in [`crate::simulation::corrector`] exists
    ///   precisely to undo the bias this exclusion introduces).
    /// - Blank time before the first item fixation accumulates into one
    ///   latency observation; later blanks become transition observations
    ///   when their duration lies in `[time_step, max_fix_time]`.
    /// - Item fixations within the same bounds are recorded under
    ///   `(fix_number capped at num_fix_dists, value difference)`.
    ///
    /// # Errors
    /// - `SimError::InvalidNumFixDists` when `opts.num_fix_dists == 0`.
    /// - `SimError::NoUsableTrials` when no trial survives the
    ///   two-item-fixation requirement.
    pub fn from_trials(trials: &[Trial], opts: &TabulationOptions) -> SimResult<Self> {
        if opts.num_fix_dists == 0 {
            return Err(SimError::InvalidNumFixDists { value: opts.num_fix_dists });
        }

        let mut count_left_first = 0usize;
        let mut count_total = 0usize;
        let mut latencies = Vec::new();
        let mut transitions = Vec::new();
        let mut fixations: HashMap<FixationKey, Vec<u64>> = HashMap::new();

        for trial in trials {
            let item_fix_count = trial.fix_item.iter().filter(|i| i.is_item()).count();
            if item_fix_count <= 1 {
                continue;
            }
            let last_item_idx = match trial.fix_item.iter().rposition(|i| i.is_item()) {
                Some(idx) => idx,
                None => continue,
            };

            let mut latency = 0u64;
            let mut first_item_seen = false;
            let mut fix_number = 1usize;

            for i in 0..last_item_idx {
                let item = trial.fix_item[i];
                let dur = trial.fix_time[i];
                if !item.is_item() {
                    if !first_item_seen {
                        latency += dur;
                    } else if dur >= opts.time_step && dur <= opts.max_fix_time {
                        transitions.push(dur);
                    }
                    continue;
                }
                if !first_item_seen {
                    first_item_seen = true;
                    latencies.push(latency);
                }
                if fix_number == 1 {
                    count_total += 1;
                    if item == FixatedItem::Left {
                        count_left_first += 1;
                    }
                }
                if dur >= opts.time_step && dur <= opts.max_fix_time {
                    let key = FixationKey::new(
                        fix_number,
                        value_difference(item, trial.value_left, trial.value_right),
                    );
                    fixations.entry(key).or_default().push(dur);
                }
                if fix_number < opts.num_fix_dists {
                    fix_number += 1;
                }
            }
        }

        if count_total == 0 {
            return Err(SimError::NoUsableTrials);
        }

        let prob_left_fix_first = count_left_first as f64 / count_total as f64;
        let fixations = fixations
            .into_iter()
            .map(|(key, samples)| (key, FixationDist::Samples(samples)))
            .collect();
        EmpiricalDistributions::new(
            prob_left_fix_first,
            latencies,
            transitions,
            fixations,
            opts.num_fix_dists,
        )
    }

    /// Convert every sample-based fixation cell into a binned distribution
    /// over `max_duration / bin_step` bins; already-binned cells pass
    /// through unchanged.
    ///
    /// # Errors
    /// - `SimError::InvalidBinStep` when `bin_step == 0` or no bin fits in
    ///   `max_duration`.
    /// - `SimError::EmptyFixationDistribution` for a cell without samples
    ///   (it could never be normalized).
    pub fn to_binned(&self, bin_step: u64, max_duration: u64) -> SimResult<Self> {
        if bin_step == 0 || max_duration < bin_step {
            return Err(SimError::InvalidBinStep { value: bin_step });
        }
        let n_bins = max_duration / bin_step;
        let bins: Vec<u64> = (1..=n_bins).map(|k| k * bin_step).collect();

        let mut binned = HashMap::with_capacity(self.fixations.len());
        for (&key, dist) in &self.fixations {
            let converted = match dist {
                FixationDist::Binned { .. } => dist.clone(),
                FixationDist::Samples(samples) => {
                    if samples.is_empty() {
                        return Err(SimError::EmptyFixationDistribution {
                            fix_number: key.fix_number,
                            value_diff: key.value_diff,
                        });
                    }
                    let mut counts = vec![0u64; n_bins as usize];
                    for &dur in samples {
                        let bin = duration_bin(dur, bin_step, n_bins);
                        counts[(bin / bin_step - 1) as usize] += 1;
                    }
                    let total = samples.len() as f64;
                    let probs = counts.iter().map(|&c| c as f64 / total).collect();
                    FixationDist::binned(bins.clone(), probs)?
                }
            };
            binned.insert(key, converted);
        }

        EmpiricalDistributions::new(
            self.prob_left_fix_first,
            self.latencies.clone(),
            self.transitions.clone(),
            binned,
            self.num_fix_dists,
        )
    }

    /// Draw a latency. Empty collection is fatal.
    pub fn sample_latency<R: Rng>(&self, rng: &mut R) -> SimResult<u64> {
        if self.latencies.is_empty() {
            return Err(SimError::EmptyLatencyDistribution);
        }
        Ok(self.latencies[rng.random_range(0..self.latencies.len())])
    }

    /// Draw a transition duration. Empty collection is fatal.
    pub fn sample_transition<R: Rng>(&self, rng: &mut R) -> SimResult<u64> {
        if self.transitions.is_empty() {
            return Err(SimError::EmptyTransitionDistribution);
        }
        Ok(self.transitions[rng.random_range(0..self.transitions.len())])
    }

    /// Draw a fixation duration for `(fix_number, value_diff)`, capping the
    /// index at `num_fix_dists`. A missing or empty cell is fatal and
    /// reported with its identity.
    pub fn sample_fixation<R: Rng>(
        &self, fix_number: usize, value_diff: i64, rng: &mut R,
    ) -> SimResult<u64> {
        let fix_number = fix_number.min(self.num_fix_dists);
        let key = FixationKey::new(fix_number, value_diff);
        let dist = self
            .fixations
            .get(&key)
            .ok_or(SimError::MissingFixationDistribution { fix_number, value_diff })?;
        dist.sample(rng)
            .ok_or(SimError::EmptyFixationDistribution { fix_number, value_diff })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addm::core::trial::Trial;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tabulation semantics on a hand-built corpus (latency accumulation,
    //   transition bounds, last-fixation exclusion, first-fixation counting).
    // - Sample → binned conversion and bin mapping.
    // - Sampling error identities for missing/empty cells.
    // - Binned-distribution validation.
    // -------------------------------------------------------------------------

    fn corpus_trial() -> Trial {
        // blank 150 (latency) | left 300 | blank 100 (transition) |
        // right 400 | blank 50 (transition) | left 200 (last item fixation,
        // excluded together with everything after it)
        Trial::new(
            1200,
            -1,
            3.0,
            1.0,
            vec![
                FixatedItem::Blank,
                FixatedItem::Left,
                FixatedItem::Blank,
                FixatedItem::Right,
                FixatedItem::Blank,
                FixatedItem::Left,
            ],
            vec![150, 300, 100, 400, 50, 200],
        )
        .expect("corpus trial should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Verify the full tabulation pass over one usable trial.
    //
    // Given
    // -----
    // - The corpus trial above with values (3, 1) and default options.
    //
    // Expect
    // ------
    // - prob_left_fix_first = 1 (the single usable trial fixates left
    //   first); latency [150]; transitions [100, 50]; fixation cells
    //   (1, +2) = [300] and (2, −2) = [400]; the final left fixation is
    //   excluded.
    fn from_trials_tabulates_hand_built_corpus() {
        let dists =
            EmpiricalDistributions::from_trials(&[corpus_trial()], &TabulationOptions::default())
                .expect("tabulation should succeed");

        assert_eq!(dists.prob_left_fix_first, 1.0);
        assert_eq!(dists.latencies, vec![150]);
        assert_eq!(dists.transitions, vec![100, 50]);
        assert_eq!(dists.fixations.len(), 2);
        assert_eq!(
            dists.fixations.get(&FixationKey::new(1, 2)),
            Some(&FixationDist::Samples(vec![300]))
        );
        assert_eq!(
            dists.fixations.get(&FixationKey::new(2, -2)),
            Some(&FixationDist::Samples(vec![400]))
        );
    }

    #[test]
    // Purpose
    // -------
    // Trials with fewer than two item fixations never contribute; an
    // all-unusable corpus is a fatal data error.
    fn from_trials_rejects_corpus_without_usable_trials() {
        let short = Trial::new(300, 1, 1.0, 2.0, vec![FixatedItem::Left], vec![300]).unwrap();
        let err =
            EmpiricalDistributions::from_trials(&[short], &TabulationOptions::default())
                .expect_err("single-fixation corpus must be rejected");
        assert_eq!(err, SimError::NoUsableTrials);
    }

    #[test]
    // Purpose
    // -------
    // Sample cells convert to normalized bins using the shared bin map:
    // bin k covers ((k−1)·step, k·step], overflow clamps to the last bin.
    //
    // Given
    // -----
    // - Samples [300, 300, 450, 9999] with bin_step 100, max 500 (5 bins).
    //
    // Expect
    // ------
    // - 300 → bin 400, 450 → bin 500, 9999 clamps to bin 500; the
    //   probabilities sum to 1 and match the counts.
    fn to_binned_normalizes_sample_cells() {
        let mut fixations = HashMap::new();
        fixations.insert(
            FixationKey::new(1, 2),
            FixationDist::Samples(vec![300, 300, 450, 9999]),
        );
        let dists =
            EmpiricalDistributions::new(0.5, vec![100], vec![100], fixations, 3).unwrap();

        let binned = dists.to_binned(100, 500).expect("conversion should succeed");
        match binned.fixations.get(&FixationKey::new(1, 2)).unwrap() {
            FixationDist::Binned { bins, probs } => {
                assert_eq!(bins, &vec![100, 200, 300, 400, 500]);
                // 300 → 100·min(300/100+1, 5) = 400; 450 → 500; 9999 → 500.
                assert_eq!(probs[3], 0.5);
                assert_eq!(probs[4], 0.5);
                assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            }
            other => panic!("expected binned cell, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Sampling a missing cell reports the capped fixation index and the
    // value difference; an empty sample cell reports the same identity.
    fn sampling_reports_offending_cell() {
        let mut fixations = HashMap::new();
        fixations.insert(FixationKey::new(1, 2), FixationDist::Samples(vec![]));
        let dists =
            EmpiricalDistributions::new(0.5, vec![100], vec![100], fixations, 3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);

        assert_eq!(
            dists.sample_fixation(1, -4, &mut rng).unwrap_err(),
            SimError::MissingFixationDistribution { fix_number: 1, value_diff: -4 }
        );
        assert_eq!(
            dists.sample_fixation(1, 2, &mut rng).unwrap_err(),
            SimError::EmptyFixationDistribution { fix_number: 1, value_diff: 2 }
        );
    }

    #[test]
    // Purpose
    // -------
    // The fixation index is capped at num_fix_dists, so indices beyond the
    // cap reuse the last distribution.
    fn sample_fixation_caps_index() {
        let mut fixations = HashMap::new();
        fixations.insert(FixationKey::new(3, 2), FixationDist::Samples(vec![250]));
        let dists =
            EmpiricalDistributions::new(0.5, vec![100], vec![100], fixations, 3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);

        let dur = dists.sample_fixation(9, 2, &mut rng).expect("capped lookup should hit");
        assert_eq!(dur, 250);
    }

    #[test]
    // Purpose
    // -------
    // Binned-distribution validation rejects length mismatches, negative
    // mass, and probabilities that do not sum to 1.
    fn binned_validation_rejects_malformed_tables() {
        assert!(FixationDist::binned(vec![100], vec![0.5, 0.5]).is_err());
        assert!(FixationDist::binned(vec![100, 200], vec![-0.5, 1.5]).is_err());
        assert!(FixationDist::binned(vec![100, 200], vec![0.3, 0.3]).is_err());
        assert!(FixationDist::binned(vec![100, 200], vec![0.25, 0.75]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Constructor validation for the probability and the index cap.
    fn new_rejects_invalid_probability_and_cap() {
        let err =
            EmpiricalDistributions::new(1.5, vec![], vec![], HashMap::new(), 3).unwrap_err();
        assert_eq!(err, SimError::InvalidProbLeftFixFirst { value: 1.5 });

        let err =
            EmpiricalDistributions::new(0.5, vec![], vec![], HashMap::new(), 0).unwrap_err();
        assert_eq!(err, SimError::InvalidNumFixDists { value: 0 });
    }
}
