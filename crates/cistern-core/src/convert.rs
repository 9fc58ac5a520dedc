//! Volume-to-points conversion and energy cost math.
//!
//! All arithmetic is integer-only: rounding is round-half-up computed in
//! `u64`, so two machines always agree on the granted points for a given
//! drained volume.

use crate::config::DrinkConfig;

/// The volume slice the point rates are quoted against (points per 250 units).
pub const RATION_VOLUME: u32 = 250;

/// Round-half-up of `volume * per_ration / RATION_VOLUME`, in integers.
fn rationed_points(volume: u32, per_ration: u32) -> u32 {
    let scaled = u64::from(volume) * u64::from(per_ration);
    ((scaled * 2 + u64::from(RATION_VOLUME)) / (u64::from(RATION_VOLUME) * 2)) as u32
}

/// Thirst points restored by drinking `volume` units.
///
/// Floors to 1 whenever any volume was drunk at a nonzero rate, so a sip
/// from a coarse source is never entirely wasted.
pub fn thirst_from_volume(volume: u32, per_ration: u32) -> u32 {
    if volume == 0 || per_ration == 0 {
        return 0;
    }
    rationed_points(volume, per_ration).max(1)
}

/// Quench points restored by drinking `volume` units. Floors to 0.
pub fn quench_from_volume(volume: u32, per_ration: u32) -> u32 {
    rationed_points(volume, per_ration)
}

/// Energy cost of `points` combined thirst+quench points.
///
/// A `cost_per_point` of 0 means the energy budget is disabled entirely.
pub fn energy_cost(points: u32, cost_per_point: u64) -> u64 {
    u64::from(points) * cost_per_point
}

/// The (thirst, quench) a full configured drink restores, before purity
/// scaling. These are the numbers a HUD preview displays.
pub fn drink_preview(config: &DrinkConfig) -> (u32, u32) {
    (
        thirst_from_volume(config.drink_volume, config.thirst_per_ration),
        quench_from_volume(config.drink_volume, config.quench_per_ration),
    )
}
