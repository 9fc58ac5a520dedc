//! Integration test: the four canonical drink scenarios.
//!
//! Each scenario runs the full stack -- world, prober, engine, sinks -- and
//! asserts the settled outcome, the energy movement, and the fluid
//! conservation the transaction core guarantees.

use cistern_core::config::DrinkConfig;
use cistern_core::error::DrinkError;
use cistern_core::purity::{Debuff, Purity};
use cistern_drink::engine::finish_drink;
use cistern_drink::state::VesselState;
use cistern_drink::test_utils::{drinker, RecordingSink};
use cistern_fluid::handler::Tank;
use cistern_fluid::stack::FluidStack;
use cistern_fluid::test_utils::{open_tank, stored_at, water, world_with};
use cistern_fluid::world::FluidBlock;

fn config() -> DrinkConfig {
    DrinkConfig::default()
}

/// Scenario A: 500 units at 2/250 from a purified source restores (4, 4)
/// with no debuffs.
#[test]
fn scenario_a_purified_full_drink() {
    let (mut world, link) = world_with(FluidBlock::Tank(Tank::open(
        Some(FluidStack::tagged(water(), 2000, Purity::Purified)),
        4000,
    )));
    let mut state = VesselState::new();
    state.bind(&world, link).unwrap();
    state.energy = 100_000;

    let mut sink = RecordingSink::default();
    let mut effects = RecordingSink::default();
    let outcome = finish_drink(
        &mut world,
        &mut state,
        &config(),
        water(),
        drinker(),
        &mut sink,
        &mut effects,
    )
    .unwrap();

    assert_eq!(outcome.purity, Purity::Purified);
    assert_eq!((outcome.thirst, outcome.quench), (4, 4));
    assert!(outcome.debuffs.is_empty());
    assert!(effects.debuffs.is_empty());
    assert_eq!(sink.grants.len(), 1);
}

/// Scenario B: the same rates at the worst tier halve thirst to 2, zero
/// quench, and apply nausea + hunger at the configured durations.
#[test]
fn scenario_b_dirty_drink_scales_and_debuffs() {
    let (mut world, link) = world_with(FluidBlock::Tank(Tank::open(
        Some(FluidStack::tagged(water(), 2000, Purity::Dirty)),
        4000,
    )));
    let mut state = VesselState::new();
    state.bind(&world, link).unwrap();
    state.energy = 100_000;

    let mut sink = RecordingSink::default();
    let mut effects = RecordingSink::default();
    let outcome = finish_drink(
        &mut world,
        &mut state,
        &config(),
        water(),
        drinker(),
        &mut sink,
        &mut effects,
    )
    .unwrap();

    // Base thirst 4 halves to 2; quench drops to 0.
    assert_eq!(outcome.purity, Purity::Dirty);
    assert_eq!((outcome.thirst, outcome.quench), (2, 0));

    // Nausea 8s and hunger 13s at 20 ticks per second.
    assert_eq!(outcome.debuffs.len(), 2);
    assert_eq!(effects.debuffs[0].1.debuff, Debuff::Nausea);
    assert_eq!(effects.debuffs[0].1.duration_ticks, 160);
    assert_eq!(effects.debuffs[1].1.debuff, Debuff::Hunger);
    assert_eq!(effects.debuffs[1].1.duration_ticks, 260);

    // The grant passes the scaled values to the subsystem.
    assert_eq!((sink.grants[0].thirst, sink.grants[0].quench), (2, 0));
}

/// Scenario C: 900 stored at 1000 per point cannot pay for a single point;
/// the transaction fails NoEnergy and the fluid is refunded in full.
#[test]
fn scenario_c_reservation_failure_refunds() {
    let (mut world, link) = world_with(FluidBlock::Tank(open_tank(2000, 4000)));
    let mut state = VesselState::new();
    state.bind(&world, link).unwrap();
    state.energy = 900;

    let mut sink = RecordingSink::default();
    let mut effects = RecordingSink::default();
    let err = finish_drink(
        &mut world,
        &mut state,
        &config(),
        water(),
        drinker(),
        &mut sink,
        &mut effects,
    )
    .unwrap_err();

    assert_eq!(err, DrinkError::NoEnergy);
    assert_eq!(stored_at(&world, link), 2000);
    assert_eq!(state.energy, 900);
    assert!(sink.grants.is_empty());
    assert!(effects.debuffs.is_empty());
}

/// Scenario D: 5000 stored affords 5 of the 8 requested points. Quench
/// keeps its 4, thirst drops to 1, and exactly 5000 energy is spent.
#[test]
fn scenario_d_rationing_spends_exactly() {
    let (mut world, link) = world_with(FluidBlock::Tank(open_tank(2000, 4000)));
    let mut state = VesselState::new();
    state.bind(&world, link).unwrap();
    state.energy = 5_000;

    let mut sink = RecordingSink::default();
    let mut effects = RecordingSink::default();
    let outcome = finish_drink(
        &mut world,
        &mut state,
        &config(),
        water(),
        drinker(),
        &mut sink,
        &mut effects,
    )
    .unwrap();

    assert_eq!(outcome.quench, 4);
    assert_eq!(outcome.thirst, 1);
    assert_eq!(outcome.energy_spent, 5_000);
    assert_eq!(state.energy, 0);

    // Partial success is success: the fluid side stays committed.
    assert_eq!(stored_at(&world, link), 1500);
}

/// Rationing when no thirst is requested: quench still gives way to the
/// affordable count and thirst stays 0.
#[test]
fn rationing_with_zero_requested_thirst() {
    let cfg = DrinkConfig {
        thirst_per_ration: 0,
        ..config()
    };
    let (mut world, link) = world_with(FluidBlock::Tank(open_tank(2000, 4000)));
    let mut state = VesselState::new();
    state.bind(&world, link).unwrap();
    state.energy = 3_000;

    let mut sink = RecordingSink::default();
    let mut effects = RecordingSink::default();
    let outcome = finish_drink(
        &mut world,
        &mut state,
        &cfg,
        water(),
        drinker(),
        &mut sink,
        &mut effects,
    )
    .unwrap();

    // 4 quench requested, 3 affordable; thirst was 0 and stays 0.
    assert_eq!(outcome.thirst, 0);
    assert_eq!(outcome.quench, 3);
    assert_eq!(outcome.energy_spent, 3_000);
}
