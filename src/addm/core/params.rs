//! aDDM parameter container — `(d, θ, σ | μ)`.
//!
//! Purpose
//! -------
//! Represent one immutable aDDM instance. The noise parameter may be given
//! directly as `σ`, or derived as `σ = μ·d` when only `μ` is supplied; when
//! neither resolves to a positive value the model is *underdetermined* and
//! every engine treats it as a degenerate case (zero likelihood in the
//! engine, a fatal configuration error in the simulator).
//!
//! Conventions
//! -----------
//! - `d > 0` controls integration speed, `θ ∈ [0, 1]` is the attentional
//!   discount on the unfixated item, `σ > 0` is the per-time-bin noise
//!   standard deviation.
//! - Construction does **not** hard-enforce the parameter ranges: a grid
//!   search is expected to probe arbitrary tuples, and the engines absorb
//!   bad ones through the zero-likelihood sentinel rather than failing the
//!   whole run.

use crate::addm::core::trial::FixatedItem;

/// One aDDM instance: integration speed `d`, attentional discount `theta`,
/// and noise given either directly (`sigma`) or via the multiplier `mu`.
///
/// Invariants
/// ----------
/// - The struct itself is a plain carrier; [`ADDMParams::effective_sigma`]
///   is the single source of truth for whether the noise parameter is
///   resolvable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ADDMParams {
    /// Speed-of-integration parameter.
    pub d: f64,
    /// Attentional discount applied to the unfixated item, in `[0, 1]`.
    pub theta: f64,
    /// Noise standard deviation; `<= 0` means "derive from `mu`".
    pub sigma: f64,
    /// Alternative noise specification: when `sigma <= 0` and `mu > 0`,
    /// the effective noise is `mu * d`.
    pub mu: f64,
}

impl ADDMParams {
    /// Construct a parameter triple with a directly specified `sigma`.
    pub fn new(d: f64, theta: f64, sigma: f64) -> ADDMParams {
        ADDMParams { d, theta, sigma, mu: 0.0 }
    }

    /// Construct a parameter triple whose noise is derived as `mu * d`.
    pub fn with_mu(d: f64, theta: f64, mu: f64) -> ADDMParams {
        ADDMParams { d, theta, sigma: 0.0, mu }
    }

    /// Resolve the effective noise standard deviation.
    ///
    /// Returns
    /// -------
    /// - `Some(sigma)` when `sigma` is finite and > 0.
    /// - `Some(mu * d)` when `sigma` does not resolve but `mu` is finite,
    ///   > 0, and the product is finite and > 0.
    /// - `None` when the model is underdetermined. Callers decide whether
    ///   that is a sentinel (likelihood engine) or fatal (simulator).
    pub fn effective_sigma(&self) -> Option<f64> {
        if self.sigma.is_finite() && self.sigma > 0.0 {
            return Some(self.sigma);
        }
        if self.mu.is_finite() && self.mu > 0.0 {
            let derived = self.mu * self.d;
            if derived.is_finite() && derived > 0.0 {
                return Some(derived);
            }
        }
        None
    }

    /// Mean RDV increment per time bin while fixating `item`.
    ///
    /// Looking left the unfixated (right) value is discounted by `theta`,
    /// and symmetrically for right; blanks contribute no drift:
    ///
    /// - left:  `d * (value_left − θ · value_right)`
    /// - right: `d * (−value_right + θ · value_left)`
    /// - blank: `0`
    pub fn drift(&self, item: FixatedItem, value_left: f64, value_right: f64) -> f64 {
        match item {
            FixatedItem::Left => self.d * (value_left - self.theta * value_right),
            FixatedItem::Right => self.d * (-value_right + self.theta * value_left),
            FixatedItem::Blank => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Noise resolution precedence in `effective_sigma` (sigma, then mu*d,
    //   then None).
    // - The drift formula for all three fixation items.
    //
    // They intentionally DO NOT cover:
    // - How the engines react to an unresolvable noise parameter (tested with
    //   the likelihood engine and the simulator).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A directly specified positive sigma wins even when mu is also set.
    //
    // Given
    // -----
    // - d = 0.005, theta = 0.5, sigma = 0.06, mu = 10.
    //
    // Expect
    // ------
    // - effective_sigma() == Some(0.06).
    fn effective_sigma_prefers_direct_sigma() {
        let params = ADDMParams { d: 0.005, theta: 0.5, sigma: 0.06, mu: 10.0 };
        assert_eq!(params.effective_sigma(), Some(0.06));
    }

    #[test]
    // Purpose
    // -------
    // With sigma unset, a positive mu derives the noise as mu * d.
    //
    // Given
    // -----
    // - d = 0.005, mu = 10, sigma = 0.
    //
    // Expect
    // ------
    // - effective_sigma() == Some(0.05).
    fn effective_sigma_derives_from_mu() {
        let params = ADDMParams::with_mu(0.005, 0.3, 10.0);
        let sigma = params.effective_sigma().expect("mu * d should resolve");
        assert!((sigma - 0.05).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Neither sigma nor mu positive means the model is underdetermined.
    //
    // Given
    // -----
    // - sigma = 0, mu = 0.
    //
    // Expect
    // ------
    // - effective_sigma() == None.
    fn effective_sigma_returns_none_when_underdetermined() {
        let params = ADDMParams::new(0.005, 0.5, 0.0);
        assert_eq!(params.effective_sigma(), None);
    }

    #[test]
    // Purpose
    // -------
    // Verify the attention-weighted drift for left, right, and blank
    // fixations against the closed-form expressions.
    //
    // Given
    // -----
    // - d = 0.01, theta = 0.5, value_left = 3, value_right = 1.
    //
    // Expect
    // ------
    // - left:  0.01 * (3 - 0.5 * 1) = 0.025
    // - right: 0.01 * (-1 + 0.5 * 3) = 0.005
    // - blank: 0.0
    fn drift_matches_closed_form() {
        let params = ADDMParams::new(0.01, 0.5, 0.1);
        let left = params.drift(FixatedItem::Left, 3.0, 1.0);
        let right = params.drift(FixatedItem::Right, 3.0, 1.0);
        let blank = params.drift(FixatedItem::Blank, 3.0, 1.0);

        assert!((left - 0.025).abs() < 1e-15);
        assert!((right - 0.005).abs() < 1e-15);
        assert_eq!(blank, 0.0);
    }
}
