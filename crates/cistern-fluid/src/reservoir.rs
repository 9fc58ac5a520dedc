//! Layered reservoirs: fluid holders with discrete fill levels.
//!
//! A reservoir's fill is a small level count rather than a continuous
//! volume, and its block state can carry co-located properties (here: a
//! purity tag). Draining manipulates the level field *only* -- rebuilding
//! the state from defaults and re-setting the level would silently discard
//! those co-located properties, which is exactly the historical bug this
//! module exists to avoid.

use cistern_core::id::FluidKindId;
use cistern_core::purity::Purity;
use serde::{Deserialize, Serialize};

/// A level-stepped fluid holder (basin, cauldron).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservoir {
    /// The fluid this reservoir holds.
    pub fluid: FluidKindId,
    /// Current fill level, 0 (empty variant) to `max_level`.
    pub level: u8,
    /// The level count when full.
    pub max_level: u8,
    /// Total volume at `max_level`.
    pub total_volume: u32,
    /// Co-located quality property. Survives partial drains; the empty
    /// variant carries no properties.
    pub purity: Option<Purity>,
}

impl Reservoir {
    pub fn new(fluid: FluidKindId, level: u8, max_level: u8, total_volume: u32) -> Self {
        Self {
            fluid,
            level,
            max_level,
            total_volume,
            purity: None,
        }
    }

    pub fn with_purity(mut self, purity: Purity) -> Self {
        self.purity = Some(purity);
        self
    }

    /// Volume of a single level. 0 when the reservoir is misconfigured.
    pub fn level_volume(&self) -> u32 {
        if self.max_level == 0 {
            return 0;
        }
        self.total_volume / u32::from(self.max_level)
    }

    /// Currently stored volume.
    pub fn stored(&self) -> u32 {
        u32::from(self.level) * self.level_volume()
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    /// Remove one level. Sets only the level field; at level 0 the block
    /// becomes the empty variant and sheds its properties.
    pub fn drain_level(&mut self) {
        debug_assert!(self.level > 0);
        self.level -= 1;
        if self.level == 0 {
            self.purity = None;
        }
    }

    /// Restore one level, up to the maximum.
    pub fn fill_level(&mut self) {
        if self.level < self.max_level {
            self.level += 1;
        }
    }

    /// Fill to the brim in one go, keeping co-located properties intact
    /// (a bucket poured into a partially filled basin).
    pub fn fill_to_max(&mut self) {
        self.level = self.max_level;
    }

    /// Empty completely in one go (a bucket scooping the whole basin),
    /// transitioning to the empty variant.
    pub fn drain_all(&mut self) {
        self.level = 0;
        self.purity = None;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> FluidKindId {
        FluidKindId(0)
    }

    fn basin(level: u8) -> Reservoir {
        Reservoir::new(water(), level, 3, 999)
    }

    #[test]
    fn level_volume_divides_total() {
        assert_eq!(basin(3).level_volume(), 333);
        assert_eq!(basin(2).stored(), 666);
    }

    #[test]
    fn misconfigured_reservoir_has_zero_unit() {
        let r = Reservoir::new(water(), 1, 0, 999);
        assert_eq!(r.level_volume(), 0);
    }

    #[test]
    fn partial_drain_preserves_purity() {
        let mut r = basin(3).with_purity(Purity::Purified);
        r.drain_level();
        assert_eq!(r.level, 2);
        assert_eq!(r.purity, Some(Purity::Purified));
    }

    #[test]
    fn draining_to_empty_sheds_properties() {
        let mut r = basin(1).with_purity(Purity::Purified);
        r.drain_level();
        assert_eq!(r.level, 0);
        assert!(r.is_empty());
        assert_eq!(r.purity, None);
    }

    #[test]
    fn fill_to_max_preserves_purity() {
        let mut r = basin(1).with_purity(Purity::SlightlyDirty);
        r.fill_to_max();
        assert_eq!(r.level, 3);
        assert_eq!(r.purity, Some(Purity::SlightlyDirty));
    }

    #[test]
    fn drain_all_transitions_to_empty_variant() {
        let mut r = basin(3).with_purity(Purity::Dirty);
        r.drain_all();
        assert!(r.is_empty());
        assert_eq!(r.purity, None);
    }

    #[test]
    fn fill_level_caps_at_max() {
        let mut r = basin(3);
        r.fill_level();
        assert_eq!(r.level, 3);
    }
}
