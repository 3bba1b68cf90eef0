//! Trial-likelihood engine: discretized forward propagation over the RDV axis.
//!
//! Implements the per-trial likelihood of an aDDM parameter set as an
//! explicit finite-difference discretization of the Fokker–Planck transition
//! kernel: a belief vector over discrete RDV states is pushed forward one
//! `time_step` at a time, with the drift set by the currently fixated item
//! and absorption mass accumulated at the two (possibly collapsing)
//! barriers.
//!
//! ## What this module does
//! - Applies the deterministic delay corrections (visual delay splits each
//!   item fixation; motor delay shortens the final item fixation).
//! - Runs the forward pass **in place** over a [`StateGrid`] allocated once
//!   per call (no per-step allocation; the grid's two buffers are swapped).
//! - Renormalizes interior mass plus the two absorption increments at every
//!   step, so total probability is conserved exactly despite quadrature
//!   error.
//! - Returns the final-step absorption *increment* on the side matching the
//!   observed choice: the probability density of deciding at exactly the
//!   trial's last time bin.
//!
//! ## Degenerate inputs (sentinel, not error)
//! - Unresolvable noise (`σ ≤ 0`, no positive `μ`) → likelihood 0.
//! - Zero usable time bins after delay corrections → likelihood 0.
//!
//! ## Instrumentation
//! [`trial_likelihood_with_trace`] additionally records the belief matrix
//! and both crossing-probability curves. Purely observational: the returned
//! likelihood is identical to [`trial_likelihood`].

use crate::addm::{
    core::{
        barriers::BarrierSchedule,
        config::LikelihoodConfig,
        grid::StateGrid,
        params::ADDMParams,
        trial::{FixatedItem, Trial},
    },
    errors::{ADDMError, ADDMResult},
};
use ndarray::{Array1, Array2};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Belief-trace instrumentation for one likelihood evaluation.
///
/// Fields
/// ------
/// - `states`: the RDV axis used for the evaluation.
/// - `beliefs`: `states.len() × n_steps` matrix; column `t` holds the
///   interior belief vector *after* step `t`.
/// - `prob_up`, `prob_down`: per-step absorption increments at the upper
///   (left-decision) and lower (right-decision) barriers.
///
/// All fields are empty for the degenerate zero-likelihood paths (no time
/// bins, underdetermined noise).
#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodTrace {
    /// RDV axis.
    pub states: Array1<f64>,
    /// Interior beliefs after each step (one column per time bin).
    pub beliefs: Array2<f64>,
    /// Upper-barrier absorption increment per step.
    pub prob_up: Array1<f64>,
    /// Lower-barrier absorption increment per step.
    pub prob_down: Array1<f64>,
}

impl LikelihoodTrace {
    fn empty() -> LikelihoodTrace {
        LikelihoodTrace {
            states: Array1::zeros(0),
            beliefs: Array2::zeros((0, 0)),
            prob_up: Array1::zeros(0),
            prob_down: Array1::zeros(0),
        }
    }

    /// Cumulative upper-barrier absorption by each time step. Non-decreasing.
    pub fn cumulative_up(&self) -> Array1<f64> {
        cumulative(&self.prob_up)
    }

    /// Cumulative lower-barrier absorption by each time step. Non-decreasing.
    pub fn cumulative_down(&self) -> Array1<f64> {
        cumulative(&self.prob_down)
    }
}

fn cumulative(increments: &Array1<f64>) -> Array1<f64> {
    let mut acc = 0.0;
    increments.mapv(|v| {
        acc += v;
        acc
    })
}

/// Likelihood of one observed trial under the given parameters.
///
/// # Behavior
/// - Preprocesses fixations (visual and motor delays), bins durations by
///   `config.time_step`, and propagates the belief vector for the resulting
///   number of steps.
/// - Returns the final-step absorption increment on the observed choice's
///   side (upper barrier for choice −1/left, lower for +1/right), floored
///   at 0.
///
/// # Returns
/// A value in `[0, 1]`; exactly 0 for the degenerate sentinel cases
/// (underdetermined noise, zero usable time bins, or no mass absorbed on
/// the chosen side at the final bin).
///
/// # Errors
/// - `ADDMError::NoiseKernel` if the Normal transition kernel cannot be
///   constructed (non-finite drift from pathological item values).
pub fn trial_likelihood(
    trial: &Trial, params: &ADDMParams, config: &LikelihoodConfig,
) -> ADDMResult<f64> {
    let (likelihood, _) = run(trial, params, config, false)?;
    Ok(likelihood)
}

/// Likelihood plus full belief/crossing instrumentation.
///
/// Identical propagation to [`trial_likelihood`]; additionally returns a
/// [`LikelihoodTrace`] with the belief matrix and both crossing curves.
/// The trace is empty on the degenerate zero-likelihood paths.
pub fn trial_likelihood_with_trace(
    trial: &Trial, params: &ADDMParams, config: &LikelihoodConfig,
) -> ADDMResult<(f64, LikelihoodTrace)> {
    let (likelihood, trace) = run(trial, params, config, true)?;
    Ok((likelihood, trace.unwrap_or_else(LikelihoodTrace::empty)))
}

fn run(
    trial: &Trial, params: &ADDMParams, config: &LikelihoodConfig, want_trace: bool,
) -> ADDMResult<(f64, Option<LikelihoodTrace>)> {
    let sigma = match params.effective_sigma() {
        Some(s) => s,
        // Underdetermined model: sentinel, not an error.
        None => return Ok((0.0, None)),
    };

    let fixations = corrected_fixations(trial, config);

    let total_steps: usize =
        fixations.iter().map(|&(_, dur)| (dur / config.time_step) as usize).sum();
    if total_steps == 0 {
        return Ok((0.0, None));
    }

    let schedule = BarrierSchedule::new(config.barrier, config.barrier_decay, total_steps);
    let mut grid = StateGrid::new(config.barrier, config.state_step);

    let mut prob_up = Array1::<f64>::zeros(total_steps);
    let mut prob_down = Array1::<f64>::zeros(total_steps);
    let mut beliefs = if want_trace {
        Some(Array2::<f64>::zeros((grid.len(), total_steps)))
    } else {
        None
    };

    let mut time = 0;
    for &(item, dur) in &fixations {
        let steps = (dur / config.time_step) as usize;
        if steps == 0 {
            continue;
        }
        let mean = params.drift(item, trial.value_left, trial.value_right);
        let kernel = Normal::new(mean, sigma)
            .map_err(|_| ADDMError::NoiseKernel { mean, sigma })?;

        for _ in 0..steps {
            let (up_inc, down_inc) =
                propagate_step(&mut grid, &kernel, schedule.up[time], schedule.down[time], config);
            prob_up[time] = up_inc;
            prob_down[time] = down_inc;
            if let Some(matrix) = beliefs.as_mut() {
                matrix.column_mut(time).assign(&grid.belief);
            }
            time += 1;
        }
    }

    // Density of deciding exactly at the final bin, on the observed side.
    let raw = if trial.choice == -1 { prob_up[total_steps - 1] } else { prob_down[total_steps - 1] };
    let likelihood = if raw > 0.0 { raw } else { 0.0 };

    let trace = beliefs.map(|matrix| LikelihoodTrace {
        states: grid.states.clone(),
        beliefs: matrix,
        prob_up,
        prob_down,
    });
    Ok((likelihood, trace))
}

/// Apply the visual- and motor-delay corrections to the fixation sequence.
///
/// Visual delay: each item fixation becomes a blank lead of
/// `min(delay, dur)` followed by the item remainder (evidence accumulation
/// starts only after the delay). Motor delay: subtracted, floored at zero,
/// from the **final** item fixation only.
fn corrected_fixations(trial: &Trial, config: &LikelihoodConfig) -> Vec<(FixatedItem, u64)> {
    let mut corrected = Vec::with_capacity(trial.fix_item.len() * 2);
    if config.visual_delay > 0 {
        for (&item, &dur) in trial.fix_item.iter().zip(trial.fix_time.iter()) {
            if item.is_item() {
                corrected.push((FixatedItem::Blank, config.visual_delay.min(dur)));
                corrected.push((item, dur.saturating_sub(config.visual_delay)));
            } else {
                corrected.push((item, dur));
            }
        }
    } else {
        corrected.extend(trial.fix_item.iter().copied().zip(trial.fix_time.iter().copied()));
    }

    if config.motor_delay > 0 {
        for entry in corrected.iter_mut().rev() {
            if entry.0.is_item() {
                entry.1 = entry.1.saturating_sub(config.motor_delay);
                break;
            }
        }
    }
    corrected
}

/// One forward step of the discretized transition kernel.
///
/// Interior states strictly inside the current barrier pair receive
/// `state_step · Σ_a belief[a] · φ(s − a)`; the absorption increments are
/// `Σ_a belief[a] · (1 − Φ(up − a))` and `Σ_a belief[a] · Φ(down − a)`.
/// All three are then rescaled so the step conserves the incoming mass
/// exactly, and the grid's buffers are swapped.
fn propagate_step(
    grid: &mut StateGrid, kernel: &Normal, up: f64, down: f64, config: &LikelihoodConfig,
) -> (f64, f64) {
    let n = grid.len();
    grid.scratch.fill(0.0);

    for s in 0..n {
        let target = grid.states[s];
        if target <= down || target >= up {
            continue;
        }
        let mut acc = 0.0;
        for a in 0..n {
            let mass = grid.belief[a];
            if mass == 0.0 {
                continue;
            }
            acc += mass * kernel.pdf(target - grid.states[a]);
        }
        grid.scratch[s] = config.state_step * acc;
    }

    let mut up_inc = 0.0;
    let mut down_inc = 0.0;
    for a in 0..n {
        let mass = grid.belief[a];
        if mass == 0.0 {
            continue;
        }
        up_inc += mass * (1.0 - kernel.cdf(up - grid.states[a]));
        down_inc += mass * kernel.cdf(down - grid.states[a]);
    }

    // Renormalize against quadrature drift: the step redistributes the
    // incoming mass, it must not create or destroy any.
    let sum_in = grid.belief.sum();
    let sum_current = grid.scratch.sum() + up_inc + down_inc;
    if sum_current > 0.0 {
        let scale = sum_in / sum_current;
        grid.scratch.mapv_inplace(|v| v * scale);
        up_inc *= scale;
        down_inc *= scale;
    }

    std::mem::swap(&mut grid.belief, &mut grid.scratch);
    (up_inc, down_inc)
}
