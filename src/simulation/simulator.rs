//! Trial simulator — Monte Carlo generation of synthetic trials.
//!
//! Purpose
//! -------
//! Generate complete synthetic trials (choice, reaction time, fixation
//! sequence, per-fixation RDV trace) by stepping the relative decision
//! value forward under the model parameters while drawing the fixation
//! process from [`EmpiricalDistributions`].
//!
//! Key behaviors
//! -------------
//! - One Gaussian increment per `time_step`: drift from the model during
//!   item fixations, zero drift during latency, transitions, and visual
//!   delay, always with noise `sigma`.
//! - A barrier crossing during an item fixation (or its visual-delay
//!   prefix) ends the trial; the sign of the RDV decides the choice
//!   (upper barrier → left, lower → right).
//! - A crossing during the latency restarts the latency with the RDV
//!   reset to zero; a crossing during a transition aborts and discards
//!   the whole trial. Either way, every finished trial ends on an item
//!   fixation.
//! - Recorded durations of uninterrupted fixations are floored to whole
//!   time steps, with the visual delay added back for item fixations;
//!   interrupted fixations record the elapsed steps plus the applicable
//!   delays, and the fixation's intended duration is kept separately as
//!   `uninterrupted_last_fix_time`.
//!
//! Conventions
//! -----------
//! - `choice` is `-1` for left (upper barrier) and `+1` for right (lower
//!   barrier), matching [`crate::addm::Trial`].
//! - Fixated items alternate after the first fixation; the fixation index
//!   used for duration sampling caps at the distributions' `num_fix_dists`.
//!
//! Testing notes
//! -------------
//! Tests drive the simulator with a seeded `Xoshiro256PlusPlus` and
//! single-sample distributions so every draw is deterministic in
//! distribution support, then assert structural invariants of the output
//! rather than exact RDV paths.

use crate::addm::core::params::ADDMParams;
use crate::addm::core::trial::FixatedItem;
use crate::simulation::distributions::{value_difference, EmpiricalDistributions};
use crate::simulation::errors::{SimError, SimResult};
use rand::Rng;
use rand_distr::StandardNormal;

/// Timing configuration for the simulator.
///
/// Obtain one via [`Default`] or the validating [`SimulatorConfig::new`];
/// the simulation loop assumes a validated configuration (in particular
/// `time_step > 0`, which every duration is divided by) the same way the
/// likelihood engine assumes a validated
/// [`crate::addm::LikelihoodConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Duration of one simulation step in milliseconds.
    pub time_step: u64,
    /// Barrier magnitude; the RDV starts at zero between `±barrier`.
    pub barrier: f64,
    /// Delay (ms) at the start of each item fixation with zero drift.
    pub visual_delay: u64,
    /// Delay (ms) appended to the final fixation's recorded duration.
    pub motor_delay: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig { time_step: 10, barrier: 1.0, visual_delay: 0, motor_delay: 0 }
    }
}

impl SimulatorConfig {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// - `SimError::InvalidTimeStep` when `time_step == 0`.
    /// - `SimError::InvalidBarrier` when `barrier` is non-finite or ≤ 0.
    pub fn new(
        time_step: u64, barrier: f64, visual_delay: u64, motor_delay: u64,
    ) -> SimResult<Self> {
        if time_step == 0 {
            return Err(SimError::InvalidTimeStep { value: time_step });
        }
        if !barrier.is_finite() || barrier <= 0.0 {
            return Err(SimError::InvalidBarrier { value: barrier });
        }
        Ok(SimulatorConfig { time_step, barrier, visual_delay, motor_delay })
    }
}

/// One synthetic trial.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedTrial {
    /// Total trial duration in milliseconds.
    pub reaction_time: u64,
    /// `-1` for left (upper barrier), `+1` for right (lower barrier).
    pub choice: i8,
    /// Value of the left item.
    pub value_left: f64,
    /// Value of the right item.
    pub value_right: f64,
    /// Fixated item per fixation, in chronological order.
    pub fix_item: Vec<FixatedItem>,
    /// Recorded duration (ms) per fixation.
    pub fix_time: Vec<u64>,
    /// RDV value at the end of each fixation.
    pub fix_rdv: Vec<f64>,
    /// Intended duration of the final fixation, before the barrier cut it
    /// short. Consumed by the distribution-correction procedure.
    pub uninterrupted_last_fix_time: u64,
}

/// Generate `trials_per_condition` synthetic trials for every
/// `(value_left, value_right)` condition.
///
/// Trials aborted by a transition-time barrier crossing are discarded and
/// retried, so the output always holds exactly
/// `conditions.len() * trials_per_condition` trials.
///
/// # Errors
/// - `SimError::UnderdeterminedNoise` when neither `sigma` nor `mu`
///   resolves to a positive noise level.
/// - `SimError::EmptyLatencyDistribution` /
///   `SimError::EmptyTransitionDistribution` when the respective
///   collection holds no observations.
/// - `SimError::MissingFixationDistribution` /
///   `SimError::EmptyFixationDistribution` when a needed fixation cell
///   cannot be sampled.
pub fn simulate<R: Rng>(
    params: &ADDMParams, dists: &EmpiricalDistributions, conditions: &[(f64, f64)],
    trials_per_condition: usize, config: &SimulatorConfig, rng: &mut R,
) -> SimResult<Vec<SimulatedTrial>> {
    let sigma = params
        .effective_sigma()
        .ok_or(SimError::UnderdeterminedNoise { sigma: params.sigma, mu: params.mu })?;
    if dists.latencies.is_empty() {
        return Err(SimError::EmptyLatencyDistribution);
    }
    if dists.transitions.is_empty() {
        return Err(SimError::EmptyTransitionDistribution);
    }

    let mut trials = Vec::with_capacity(conditions.len() * trials_per_condition);
    for &(value_left, value_right) in conditions {
        let mut completed = 0;
        while completed < trials_per_condition {
            if let Some(trial) =
                simulate_one(params, sigma, dists, value_left, value_right, config, rng)?
            {
                trials.push(trial);
                completed += 1;
            }
        }
    }
    Ok(trials)
}

/// Run one trial attempt. Returns `Ok(None)` when a transition-time
/// barrier crossing aborts the attempt.
fn simulate_one<R: Rng>(
    params: &ADDMParams, sigma: f64, dists: &EmpiricalDistributions, value_left: f64,
    value_right: f64, config: &SimulatorConfig, rng: &mut R,
) -> SimResult<Option<SimulatedTrial>> {
    let mut rdv = 0.0_f64;
    let mut trial_time = 0u64;
    let mut fix_item = Vec::new();
    let mut fix_time = Vec::new();
    let mut fix_rdv = Vec::new();

    // Latency: zero-drift steps before the first item fixation. A barrier
    // crossing here restarts the latency with the RDV reset, since a trial
    // must end on an item fixation.
    loop {
        let latency = dists.sample_latency(rng)?;
        let mut crossed = false;
        for _ in 0..(latency / config.time_step) {
            let noise: f64 = rng.sample(StandardNormal);
            rdv += sigma * noise;
            if rdv.abs() >= config.barrier {
                crossed = true;
                break;
            }
        }
        if crossed {
            rdv = 0.0;
            continue;
        }
        let floored = latency - (latency % config.time_step);
        fix_rdv.push(rdv);
        fix_item.push(FixatedItem::Blank);
        fix_time.push(floored);
        trial_time += floored;
        break;
    }

    // First item fixation.
    let mut curr_item = if rng.random_bool(dists.prob_left_fix_first) {
        FixatedItem::Left
    } else {
        FixatedItem::Right
    };
    let mut value_diff = value_difference(curr_item, value_left, value_right);
    let mut curr_fix_time = dists
        .sample_fixation(1, value_diff, rng)?
        .saturating_sub(config.visual_delay);

    let mut fix_number = 2usize;
    loop {
        // Visual delay: zero-drift steps at the start of the fixation. A
        // crossing here ends the trial without the delay in the recorded
        // duration (the drift phase never started).
        for t in 0..(config.visual_delay / config.time_step) {
            let noise: f64 = rng.sample(StandardNormal);
            rdv += sigma * noise;
            if rdv.abs() >= config.barrier {
                let elapsed = (t + 1) * config.time_step + config.motor_delay;
                fix_rdv.push(rdv);
                fix_item.push(curr_item);
                fix_time.push(elapsed);
                trial_time += elapsed;
                return Ok(Some(finish(
                    rdv,
                    trial_time,
                    value_left,
                    value_right,
                    fix_item,
                    fix_time,
                    fix_rdv,
                    curr_fix_time,
                )));
            }
        }

        // Drift phase of the fixation.
        let mean = params.drift(curr_item, value_left, value_right);
        let mut finished = false;
        for t in 0..(curr_fix_time / config.time_step) {
            let noise: f64 = rng.sample(StandardNormal);
            rdv += mean + sigma * noise;
            if rdv.abs() >= config.barrier {
                let elapsed =
                    (t + 1) * config.time_step + config.visual_delay + config.motor_delay;
                fix_rdv.push(rdv);
                fix_item.push(curr_item);
                fix_time.push(elapsed);
                trial_time += elapsed;
                finished = true;
                break;
            }
        }
        if finished {
            return Ok(Some(finish(
                rdv,
                trial_time,
                value_left,
                value_right,
                fix_item,
                fix_time,
                fix_rdv,
                curr_fix_time,
            )));
        }

        // Uninterrupted fixation: record the floored duration with the
        // visual delay added back.
        let recorded =
            curr_fix_time - (curr_fix_time % config.time_step) + config.visual_delay;
        fix_rdv.push(rdv);
        fix_item.push(curr_item);
        fix_time.push(recorded);
        trial_time += recorded;

        // Transition: zero-drift steps between fixations. A crossing here
        // aborts the whole attempt.
        let transition = dists.sample_transition(rng)?;
        for _ in 0..(transition / config.time_step) {
            let noise: f64 = rng.sample(StandardNormal);
            rdv += sigma * noise;
            if rdv.abs() >= config.barrier {
                return Ok(None);
            }
        }
        let floored = transition - (transition % config.time_step);
        fix_rdv.push(rdv);
        fix_item.push(FixatedItem::Blank);
        fix_time.push(floored);
        trial_time += floored;

        // Next fixation: alternate items, cap the index after sampling.
        curr_item = curr_item.other();
        value_diff = value_difference(curr_item, value_left, value_right);
        curr_fix_time = dists
            .sample_fixation(fix_number, value_diff, rng)?
            .saturating_sub(config.visual_delay);
        if fix_number < dists.num_fix_dists {
            fix_number += 1;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn finish(
    rdv: f64, reaction_time: u64, value_left: f64, value_right: f64,
    fix_item: Vec<FixatedItem>, fix_time: Vec<u64>, fix_rdv: Vec<f64>,
    uninterrupted_last_fix_time: u64,
) -> SimulatedTrial {
    let choice = if rdv > 0.0 { -1 } else { 1 };
    SimulatedTrial {
        reaction_time,
        choice,
        value_left,
        value_right,
        fix_item,
        fix_time,
        fix_rdv,
        uninterrupted_last_fix_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::distributions::{FixationDist, FixationKey};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::collections::HashMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Structural invariants of simulated trials (valid choice, consistent
    //   reaction time, trial ends on an item fixation).
    // - The trial count contract across conditions.
    // - Fail-fast configuration errors.
    // -------------------------------------------------------------------------

    fn test_dists() -> EmpiricalDistributions {
        let mut fixations = HashMap::new();
        for fix_number in 1..=3 {
            for value_diff in [-3, 3] {
                fixations.insert(
                    FixationKey::new(fix_number, value_diff),
                    FixationDist::Samples(vec![400]),
                );
            }
        }
        EmpiricalDistributions::new(1.0, vec![100], vec![100], fixations, 3)
            .expect("test distributions should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Every simulated trial satisfies the structural invariants: a valid
    // choice, reaction time equal to the sum of recorded fixation
    // durations, parallel fixation vectors, and a final fixation on an
    // item (never a blank).
    //
    // Given
    // -----
    // - d = 0.006, theta = 0.5, sigma = 0.06 on condition (3, 0), with
    //   single-sample latency/transition/fixation distributions.
    //
    // Expect
    // ------
    // - 20 structurally valid trials, first fixation on the left item
    //   (probLeftFixFirst = 1).
    fn simulated_trials_are_structurally_valid() {
        let params = ADDMParams::new(0.006, 0.5, 0.06);
        let dists = test_dists();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);

        let trials = simulate(
            &params,
            &dists,
            &[(3.0, 0.0)],
            20,
            &SimulatorConfig::default(),
            &mut rng,
        )
        .expect("simulation should succeed");

        assert_eq!(trials.len(), 20);
        for trial in &trials {
            assert!(trial.choice == -1 || trial.choice == 1);
            assert_eq!(trial.reaction_time, trial.fix_time.iter().sum::<u64>());
            assert_eq!(trial.fix_item.len(), trial.fix_time.len());
            assert_eq!(trial.fix_item.len(), trial.fix_rdv.len());
            assert_eq!(trial.fix_item[0], FixatedItem::Blank);
            let last = *trial.fix_item.last().unwrap();
            assert!(last.is_item(), "trial must end on an item fixation");
            let first_item =
                trial.fix_item.iter().copied().find(|i| i.is_item()).unwrap();
            assert_eq!(first_item, FixatedItem::Left);
            assert!(trial.uninterrupted_last_fix_time <= 400);
        }
    }

    #[test]
    // Purpose
    // -------
    // The output holds exactly trials_per_condition trials for every
    // condition, with the condition values copied into each trial.
    fn simulate_covers_all_conditions() {
        let params = ADDMParams::new(0.006, 0.5, 0.06);
        let dists = test_dists();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);

        let conditions = [(3.0, 0.0), (0.0, 3.0)];
        let trials = simulate(
            &params,
            &dists,
            &conditions,
            5,
            &SimulatorConfig::default(),
            &mut rng,
        )
        .expect("simulation should succeed");

        assert_eq!(trials.len(), 10);
        assert!(trials[..5].iter().all(|t| t.value_left == 3.0 && t.value_right == 0.0));
        assert!(trials[5..].iter().all(|t| t.value_left == 0.0 && t.value_right == 3.0));
    }

    #[test]
    // Purpose
    // -------
    // Underdetermined noise and empty latency/transition collections are
    // rejected before any trial is attempted.
    fn simulate_rejects_invalid_inputs() {
        let dists = test_dists();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let no_noise = ADDMParams::new(0.006, 0.5, 0.0);
        let err = simulate(
            &no_noise,
            &dists,
            &[(3.0, 0.0)],
            1,
            &SimulatorConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, SimError::UnderdeterminedNoise { sigma: 0.0, mu: 0.0 });

        let params = ADDMParams::new(0.006, 0.5, 0.06);
        let mut no_latency = test_dists();
        no_latency.latencies.clear();
        let err = simulate(
            &params,
            &no_latency,
            &[(3.0, 0.0)],
            1,
            &SimulatorConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, SimError::EmptyLatencyDistribution);
    }

    #[test]
    // Purpose
    // -------
    // A zero time step or a degenerate barrier never reaches the stepping
    // loops: the validating constructor rejects both with their dedicated
    // variants, and a well-formed configuration passes.
    fn config_validation_rejects_bad_fields() {
        assert_eq!(
            SimulatorConfig::new(0, 1.0, 0, 0).unwrap_err(),
            SimError::InvalidTimeStep { value: 0 }
        );
        assert_eq!(
            SimulatorConfig::new(10, -1.0, 0, 0).unwrap_err(),
            SimError::InvalidBarrier { value: -1.0 }
        );
        assert!(matches!(
            SimulatorConfig::new(10, f64::NAN, 0, 0),
            Err(SimError::InvalidBarrier { .. })
        ));

        let config = SimulatorConfig::new(5, 1.5, 100, 80)
            .expect("valid configuration should construct");
        assert_eq!(config.time_step, 5);
        assert_eq!(config.visual_delay, 100);
    }
}
