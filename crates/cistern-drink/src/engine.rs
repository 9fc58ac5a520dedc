//! The drain-and-pay transaction engine.
//!
//! One transaction walks `LOCATE -> SIMULATE_DRAIN -> CHECK_ENERGY` in the
//! pre-flight ([`begin_drink`]) and `LOCATE -> COMMIT_DRAIN -> SETTLE_ENERGY
//! -> DONE` in the commit ([`finish_drink`]), strictly sequentially and
//! without suspension. The commit re-resolves the real target instead of
//! trusting the earlier simulation: load state or contents may have changed
//! in between, and the safe answer is a clean failure.
//!
//! Settlement invariant: fluid leaves the source only if a matching energy
//! debit commits in the same call; otherwise the removed volume is refunded
//! exactly. Points are rationed quench-first when the reserve covers fewer
//! than the requested points; thirst is never reduced before quench.

use cistern_core::config::DrinkConfig;
use cistern_core::convert::{energy_cost, quench_from_volume, thirst_from_volume};
use cistern_core::error::DrinkError;
use cistern_core::id::{DrinkerId, FluidKindId};
use cistern_core::purity::{DebuffInstance, Purity, scale_points};
use cistern_fluid::handler::DrainMode;
use cistern_fluid::probe::{probe, refund, ProbeError};
use cistern_fluid::world::World;
use serde::{Deserialize, Serialize};

use crate::energy::EnergyStore;
use crate::purity::{apply_purity_effects, resolve_purity};
use crate::sink::{EffectSink, ThirstSink};
use crate::state::VesselState;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What the pre-flight promises: provisional points and their full cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkPreview {
    pub thirst: u32,
    pub quench: u32,
    /// Full cost of the provisional points. 0 when the budget is disabled.
    pub cost: u64,
}

/// The settled output of one committed transaction. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkOutcome {
    /// Granted thirst points, after rationing and purity scaling.
    pub thirst: u32,
    /// Granted quench points, after rationing and purity scaling.
    pub quench: u32,
    pub purity: Purity,
    /// Volume credited to the drinker.
    pub volume_granted: u32,
    /// Volume removed from the source (coarse sources can remove more than
    /// they grant).
    pub volume_removed: u32,
    pub energy_spent: u64,
    /// Debuffs applied by the purity resolver.
    pub debuffs: Vec<DebuffInstance>,
}

fn map_probe(err: ProbeError) -> DrinkError {
    match err {
        ProbeError::NoSource => DrinkError::NoSource,
        ProbeError::Empty => DrinkError::Empty,
    }
}

// ---------------------------------------------------------------------------
// Pre-flight
// ---------------------------------------------------------------------------

/// Authoritative pre-flight, run before any drinking feedback starts.
///
/// Locates the link, simulates the drain (no side effects at all), and
/// checks that at least one point is payable. A doomed request fails here,
/// before the optimistic animation ever plays.
pub fn begin_drink(
    world: &mut World,
    state: &VesselState,
    config: &DrinkConfig,
    drinkable: FluidKindId,
) -> Result<DrinkPreview, DrinkError> {
    let link = state.link.ok_or(DrinkError::NoSource)?;
    if !world.is_loaded(link.region) {
        return Err(DrinkError::Unreachable);
    }

    let sim = probe(world, link, drinkable, config.drink_volume, DrainMode::Simulate)
        .map_err(map_probe)?;

    let volume = sim.stack.volume.min(config.drink_volume);
    let thirst = thirst_from_volume(volume, config.thirst_per_ration);
    let quench = quench_from_volume(volume, config.quench_per_ration);

    let cost = if config.energy_gated() {
        if state.energy < config.energy_cost_per_point {
            return Err(DrinkError::NoEnergy);
        }
        energy_cost(thirst + quench, config.energy_cost_per_point)
    } else {
        0
    };

    Ok(DrinkPreview {
        thirst,
        quench,
        cost,
    })
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// Authoritative commit: drain for real, settle the energy, grant the
/// result, apply purity effects.
pub fn finish_drink<T: ThirstSink, E: EffectSink>(
    world: &mut World,
    state: &mut VesselState,
    config: &DrinkConfig,
    drinkable: FluidKindId,
    actor: DrinkerId,
    thirst_sink: &mut T,
    effects: &mut E,
) -> Result<DrinkOutcome, DrinkError> {
    let link = state.link.ok_or(DrinkError::NoSource)?;
    if !world.is_loaded(link.region) {
        return Err(DrinkError::Unreachable);
    }

    let drained = probe(world, link, drinkable, config.drink_volume, DrainMode::Execute)
        .map_err(map_probe)?;

    let volume = drained.stack.volume.min(config.drink_volume);
    let mut thirst = thirst_from_volume(volume, config.thirst_per_ration);
    let mut quench = quench_from_volume(volume, config.quench_per_ration);

    let mut spent = 0u64;
    if config.energy_gated() {
        let per_point = config.energy_cost_per_point;
        let full_cost = energy_cost(thirst + quench, per_point);
        let mut store = EnergyStore::new(state, config);

        let reserved = store.extract(full_cost, true);
        if reserved < per_point {
            // Not even one point is payable. The fluid side must not stay
            // debited: put back exactly what was removed.
            refund(
                world,
                drained.source,
                &drained.stack.with_volume(drained.removed),
            );
            return Err(DrinkError::NoEnergy);
        }

        let affordable = (reserved / per_point) as u32;
        if thirst + quench > affordable {
            // Ration: quench gives way first, thirst takes what is left.
            quench = quench.min(affordable);
            thirst = thirst.min(affordable - quench);
        }

        spent = energy_cost(thirst + quench, per_point);
        let committed = store.extract(spent, false);
        debug_assert_eq!(committed, spent);
    }

    let purity = resolve_purity(Some(&drained.stack), world, Some(link));
    let (thirst, quench) = scale_points(purity, thirst, quench);

    thirst_sink.grant(actor, thirst, quench, Some(&drained.stack), Some(link));
    let debuffs = apply_purity_effects(effects, actor, purity, config);

    Ok(DrinkOutcome {
        thirst,
        quench,
        purity,
        volume_granted: volume,
        volume_removed: drained.removed,
        energy_spent: spent,
        debuffs,
    })
}

// ===========================================================================
// Tests
// ===========================================================================
