//! The vessel's energy store and charge-meter math.
//!
//! The store is a view over the persisted scalar: capacity comes from the
//! live config so a config change is reflected immediately. External code
//! may insert energy but never pull it back out; only the transaction
//! engine's settle step extracts.

use cistern_core::config::DrinkConfig;
use fixed::types::I32F32;

use crate::state::VesselState;

/// Q32.32 fixed-point for deterministic display ratios.
pub type Fixed64 = I32F32;

/// Charge-meter width when full, in display units.
pub const METER_FULL_WIDTH: u32 = 13;

// ---------------------------------------------------------------------------
// Energy store
// ---------------------------------------------------------------------------

/// Simulate/execute access to the vessel's stored energy.
pub struct EnergyStore<'a> {
    state: &'a mut VesselState,
    capacity: u64,
}

impl<'a> EnergyStore<'a> {
    pub fn new(state: &'a mut VesselState, config: &DrinkConfig) -> Self {
        Self {
            state,
            capacity: config.energy_capacity,
        }
    }

    pub fn stored(&self) -> u64 {
        self.state.energy
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Insert up to `max` energy, returning the accepted amount.
    pub fn receive(&mut self, max: u64, simulate: bool) -> u64 {
        let headroom = self.capacity.saturating_sub(self.state.energy);
        let accepted = max.min(headroom);
        if !simulate && accepted > 0 {
            self.state.energy += accepted;
        }
        accepted
    }

    /// Extract up to `max` energy, returning the extracted amount.
    pub fn extract(&mut self, max: u64, simulate: bool) -> u64 {
        let extracted = max.min(self.state.energy);
        if !simulate && extracted > 0 {
            self.state.energy -= extracted;
        }
        extracted
    }

    pub fn can_receive(&self) -> bool {
        true
    }

    /// External extraction is not offered; charge leaves only through the
    /// settle step of a drink transaction.
    pub fn can_extract(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Charge meter
// ---------------------------------------------------------------------------

/// Stored/capacity as a deterministic fixed-point ratio in [0, 1].
pub fn charge_ratio(stored: u64, capacity: u64) -> Fixed64 {
    if capacity == 0 {
        return Fixed64::ZERO;
    }
    let ratio = Fixed64::from_num(stored.min(capacity)) / Fixed64::from_num(capacity);
    ratio.min(Fixed64::ONE)
}

/// Meter width in display units, 0..=[`METER_FULL_WIDTH`].
pub fn meter_width(stored: u64, capacity: u64) -> u32 {
    let width = charge_ratio(stored, capacity) * Fixed64::from_num(METER_FULL_WIDTH);
    width.round().to_num::<u32>()
}

// ===========================================================================
// Tests
// ===========================================================================
