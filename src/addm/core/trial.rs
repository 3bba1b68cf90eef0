//! Observed-trial container for aDDM analyses.
//!
//! Purpose
//! -------
//! Provide a small, validated container for one observed trial — reaction
//! time, choice, item values, and the chronological fixation sequence —
//! plus the fixation item code shared by the engine and the simulator.
//! Validation happens once at the boundary so the numeric kernels can
//! assume well-formed inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - `fix_item.len() == fix_time.len()`.
//! - `choice ∈ {-1, +1}` (−1 = left item, +1 = right item).
//! - Item values are finite.
//! - The sum of fixation durations is expected to approximate the reaction
//!   time after delay corrections; this is a property of well-collected
//!   data, not something the container enforces.
//!
//! Conventions
//! -----------
//! - Raw data encodes fixated items as integers: 1 = left, 2 = right, any
//!   other value = blank/transition. [`FixatedItem::from_code`] implements
//!   that mapping.

use crate::addm::errors::{ADDMError, ADDMResult};

/// Which item (if any) is fixated during one fixation interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixatedItem {
    /// The left item (raw code 1).
    Left,
    /// The right item (raw code 2).
    Right,
    /// A transition, latency, or other non-item interval (any other code).
    Blank,
}

impl FixatedItem {
    /// Decode the raw integer item code used in experimental data files.
    pub fn from_code(code: i64) -> FixatedItem {
        match code {
            1 => FixatedItem::Left,
            2 => FixatedItem::Right,
            _ => FixatedItem::Blank,
        }
    }

    /// True for `Left` and `Right`, false for `Blank`.
    pub fn is_item(&self) -> bool {
        matches!(self, FixatedItem::Left | FixatedItem::Right)
    }

    /// The opposite item. `Blank` maps to itself.
    pub fn other(&self) -> FixatedItem {
        match self {
            FixatedItem::Left => FixatedItem::Right,
            FixatedItem::Right => FixatedItem::Left,
            FixatedItem::Blank => FixatedItem::Blank,
        }
    }
}

/// `Trial` — one validated observed trial.
///
/// Fields
/// ------
/// - `reaction_time`: total trial duration in milliseconds.
/// - `choice`: −1 for the left item (upper barrier), +1 for the right item
///   (lower barrier).
/// - `value_left`, `value_right`: item values; finite.
/// - `fix_item`, `fix_time`: chronological fixation sequence; equal length.
///
/// Invariants
/// ----------
/// - Enforced by [`Trial::new`]: equal sequence lengths, valid choice code,
///   finite item values.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    /// Reaction time in milliseconds.
    pub reaction_time: u64,
    /// −1 = left item chosen, +1 = right item chosen.
    pub choice: i8,
    /// Value of the left item.
    pub value_left: f64,
    /// Value of the right item.
    pub value_right: f64,
    /// Fixated item per fixation interval, in chronological order.
    pub fix_item: Vec<FixatedItem>,
    /// Duration of each fixation interval in milliseconds.
    pub fix_time: Vec<u64>,
}

impl Trial {
    /// Construct a validated [`Trial`].
    ///
    /// Errors
    /// ------
    /// - `ADDMError::FixationLengthMismatch` when the item and duration
    ///   sequences differ in length.
    /// - `ADDMError::InvalidChoice` when `choice` is not −1 or +1.
    /// - `ADDMError::NonFiniteValue` when an item value is NaN/±inf.
    pub fn new(
        reaction_time: u64, choice: i8, value_left: f64, value_right: f64,
        fix_item: Vec<FixatedItem>, fix_time: Vec<u64>,
    ) -> ADDMResult<Self> {
        if fix_item.len() != fix_time.len() {
            return Err(ADDMError::FixationLengthMismatch {
                items: fix_item.len(),
                durations: fix_time.len(),
            });
        }
        if choice != -1 && choice != 1 {
            return Err(ADDMError::InvalidChoice { value: choice });
        }
        if !value_left.is_finite() {
            return Err(ADDMError::NonFiniteValue { side: "left", value: value_left });
        }
        if !value_right.is_finite() {
            return Err(ADDMError::NonFiniteValue { side: "right", value: value_right });
        }
        Ok(Trial { reaction_time, choice, value_left, value_right, fix_item, fix_time })
    }
}
