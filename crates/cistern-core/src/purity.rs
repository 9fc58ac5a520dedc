//! Fluid purity tiers and their consequences.
//!
//! A purity tier scales the base thirst/quench points of a drink and selects
//! a set of timed debuffs. Tiers are ordered worst to best; the default for
//! untagged fluid is [`Purity::Acceptable`], the second-highest tier.

use serde::{Deserialize, Serialize};

/// Host tick rate. Debuff durations are configured in seconds and converted
/// at application time through this single constant.
pub const TICKS_PER_SECOND: u32 = 20;

// ---------------------------------------------------------------------------
// Purity tier
// ---------------------------------------------------------------------------

/// Fluid quality, worst to best. The discriminants match the block-property
/// scale used by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Purity {
    Dirty = 0,
    SlightlyDirty = 1,
    Acceptable = 2,
    Purified = 3,
}

impl Purity {
    /// Tier used when neither the fluid nor the source block carries one.
    pub const DEFAULT: Purity = Purity::Acceptable;

    /// Map a raw block-property level to a tier. Out-of-range values are
    /// treated as "property absent".
    pub fn from_level(level: u8) -> Option<Purity> {
        match level {
            0 => Some(Purity::Dirty),
            1 => Some(Purity::SlightlyDirty),
            2 => Some(Purity::Acceptable),
            3 => Some(Purity::Purified),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Point scaling
// ---------------------------------------------------------------------------

/// Scale base thirst/quench points by purity.
///
/// - `Dirty`: half thirst (minimum 1), no quench.
/// - `SlightlyDirty`: full thirst, half quench.
/// - `Acceptable` / `Purified`: unchanged.
pub fn scale_points(purity: Purity, base_thirst: u32, base_quench: u32) -> (u32, u32) {
    match purity {
        Purity::Dirty => ((base_thirst / 2).max(1), 0),
        Purity::SlightlyDirty => (base_thirst, base_quench / 2),
        Purity::Acceptable | Purity::Purified => (base_thirst, base_quench),
    }
}

// ---------------------------------------------------------------------------
// Debuffs
// ---------------------------------------------------------------------------

/// A timed debuff kind applied after drinking low-purity fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Debuff {
    Nausea,
    Hunger,
}

/// A debuff together with its duration in host ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuffInstance {
    pub debuff: Debuff,
    pub duration_ticks: u32,
}

/// The debuffs a tier applies, with durations given in seconds.
///
/// A duration of 0 disables that debuff individually.
///
/// - `Dirty`: nausea and hunger.
/// - `SlightlyDirty`: nausea only.
/// - `Acceptable` / `Purified`: none.
pub fn debuffs_for(purity: Purity, nausea_seconds: u32, hunger_seconds: u32) -> Vec<DebuffInstance> {
    let mut out = Vec::new();
    let nausea = nausea_seconds * TICKS_PER_SECOND;
    let hunger = hunger_seconds * TICKS_PER_SECOND;
    match purity {
        Purity::Dirty => {
            if nausea > 0 {
                out.push(DebuffInstance {
                    debuff: Debuff::Nausea,
                    duration_ticks: nausea,
                });
            }
            if hunger > 0 {
                out.push(DebuffInstance {
                    debuff: Debuff::Hunger,
                    duration_ticks: hunger,
                });
            }
        }
        Purity::SlightlyDirty => {
            if nausea > 0 {
                out.push(DebuffInstance {
                    debuff: Debuff::Nausea,
                    duration_ticks: nausea,
                });
            }
        }
        Purity::Acceptable | Purity::Purified => {}
    }
    out
}

// ===========================================================================
// Tests
// ===========================================================================
