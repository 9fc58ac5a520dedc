//! Locating and draining a fluid source behind a link.
//!
//! Resolution order at the linked position:
//!
//! 1. A relay delegates to its neighbors: the six directions are scanned in
//!    canonical order and the first capability-exposing neighbor wins. One
//!    level of delegation only -- neighboring relays are skipped.
//! 2. Any other block is queried directly, then through each of its six
//!    faces in the same canonical order.
//! 3. Nothing found is [`ProbeError::NoSource`].
//!
//! Draining special-cases layered reservoirs (one level per drink, level
//! field mutated in place) and falls back to a doubling-increment search for
//! coarse handlers. The result reports the granted volume (capped at the
//! request) and the removed volume separately, so a refund can restore the
//! source exactly.
//!
//! The simulate/commit split is not atomic. Under the single-threaded model
//! that is fine; a host that runs transactions against the same source
//! concurrently must serialize access per region (mutex or single-writer
//! actor) around the probe calls.

use cistern_core::id::FluidKindId;
use serde::{Deserialize, Serialize};

use crate::handler::{DrainMode, FluidHandler};
use crate::space::{Direction, GlobalPos};
use crate::stack::FluidStack;
use crate::world::{FluidBlock, World};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Why a probe found nothing to drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// No drain capability is reachable at the link.
    #[error("no fluid source at the link")]
    NoSource,
    /// A source is there but yields no drinkable fluid.
    #[error("the source has nothing drinkable")]
    Empty,
}

/// The outcome of a successful drain probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drained {
    /// What the drinker receives: capped at the requested volume.
    pub stack: FluidStack,
    /// What actually left the source. Coarse handlers can remove more than
    /// was granted; refunds must restore this amount.
    pub removed: u32,
    /// The resolved source position, for refunds.
    pub source: GlobalPos,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Find the drainable block behind a link, if any.
pub fn resolve_source(world: &World, link: GlobalPos) -> Option<GlobalPos> {
    match world.block(link)? {
        FluidBlock::Relay => {
            // One level of delegation only: neighboring relays are skipped.
            for dir in Direction::ALL {
                let neighbor = link.offset(dir);
                match world.block(neighbor) {
                    Some(FluidBlock::Reservoir(_)) => return Some(neighbor),
                    Some(FluidBlock::Tank(tank))
                        if tank.exposure.exposes(Some(dir.opposite())) =>
                    {
                        return Some(neighbor);
                    }
                    _ => {}
                }
            }
            None
        }
        FluidBlock::Reservoir(_) => Some(link),
        FluidBlock::Tank(tank) => {
            let exposed = tank.exposure.exposes(None)
                || Direction::ALL.iter().any(|d| tank.exposure.exposes(Some(*d)));
            exposed.then_some(link)
        }
    }
}

// ---------------------------------------------------------------------------
// Probing
// ---------------------------------------------------------------------------

/// Locate the source behind `link` and drain up to `request` units of
/// `drinkable` from it, per `mode`. Simulate never mutates.
pub fn probe(
    world: &mut World,
    link: GlobalPos,
    drinkable: FluidKindId,
    request: u32,
    mode: DrainMode,
) -> Result<Drained, ProbeError> {
    let source = resolve_source(world, link).ok_or(ProbeError::NoSource)?;
    match world.block_mut(source).ok_or(ProbeError::NoSource)? {
        FluidBlock::Reservoir(res) => {
            if res.fluid != drinkable || res.is_empty() {
                return Err(ProbeError::Empty);
            }
            let unit = res.level_volume();
            if unit == 0 {
                return Err(ProbeError::Empty);
            }
            if mode.is_execute() {
                res.drain_level();
            }
            Ok(Drained {
                stack: FluidStack::new(drinkable, unit.min(request)),
                removed: unit,
                source,
            })
        }
        FluidBlock::Tank(tank) => drain_handler(tank, drinkable, request, mode)
            .map(|(stack, removed)| Drained {
                stack,
                removed,
                source,
            })
            .ok_or(ProbeError::Empty),
        // resolve_source never answers with a relay position.
        FluidBlock::Relay => Err(ProbeError::NoSource),
    }
}

/// Drain from a handler: the exact request first, then the doubling search
/// for coarse handlers. Returns (granted stack, removed volume).
fn drain_handler<H: FluidHandler>(
    handler: &mut H,
    drinkable: FluidKindId,
    request: u32,
    mode: DrainMode,
) -> Option<(FluidStack, u32)> {
    for tank in 0..handler.tank_count() {
        let Some(content) = handler.fluid_in_tank(tank) else {
            continue;
        };
        if content.kind != drinkable {
            continue;
        }

        // Fine-grained handlers satisfy the request directly.
        if let Some(drained) = handler.drain(drinkable, request, mode) {
            let granted = drained.volume.min(request);
            return Some((drained.with_volume(granted), drained.volume));
        }

        // Coarse handler: find the minimal increment it will yield. Probe up
        // to 2x capacity so an increment equal to the capacity is not missed
        // (the probe jumps 512 -> 1024 while capacity is 1000).
        let bound = u64::from(handler.tank_capacity(tank)) * 2;
        let mut step = 1u64;
        let mut min_increment = 0u32;
        while step <= bound {
            let ask = step.min(u64::from(u32::MAX)) as u32;
            if let Some(sim) = handler.drain(drinkable, ask, DrainMode::Simulate) {
                min_increment = sim.volume;
                break;
            }
            step *= 2;
        }
        if min_increment == 0 {
            continue;
        }

        if let Some(drained) = handler.drain(drinkable, min_increment, mode) {
            let granted = drained.volume.min(request);
            return Some((drained.with_volume(granted), drained.volume));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Refunds
// ---------------------------------------------------------------------------

/// Return previously removed fluid to a resolved source position. Returns
/// the volume actually restored.
pub fn refund(world: &mut World, source: GlobalPos, stack: &FluidStack) -> u32 {
    match world.block_mut(source) {
        Some(FluidBlock::Tank(tank)) => tank.fill(stack, DrainMode::Execute),
        Some(FluidBlock::Reservoir(res)) => {
            let unit = res.level_volume();
            if unit == 0 || res.fluid != stack.kind {
                return 0;
            }
            let headroom = u32::from(res.max_level - res.level);
            let levels = (stack.volume / unit).min(headroom);
            for _ in 0..levels {
                res.fill_level();
            }
            levels * unit
        }
        _ => 0,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Exposure, Tank};
    use crate::reservoir::Reservoir;
    use crate::space::BlockPos;
    use cistern_core::id::RegionId;
    use cistern_core::purity::Purity;

    fn water() -> FluidKindId {
        FluidKindId(0)
    }

    fn sludge() -> FluidKindId {
        FluidKindId(1)
    }

    fn at(x: i32) -> GlobalPos {
        GlobalPos::new(RegionId(0), BlockPos::new(x, 64, 0))
    }

    fn tank_world(tank: Tank) -> (World, GlobalPos) {
        let mut world = World::new();
        let link = at(0);
        world.place(link, FluidBlock::Tank(tank));
        (world, link)
    }

    // -----------------------------------------------------------------------
    // Test 1: Direct resolution and a fine-grained drain
    // -----------------------------------------------------------------------
    #[test]
    fn direct_tank_drains_request() {
        let (mut world, link) = tank_world(Tank::open(Some(FluidStack::new(water(), 2000)), 4000));

        let drained = probe(&mut world, link, water(), 500, DrainMode::Execute).unwrap();
        assert_eq!(drained.stack.volume, 500);
        assert_eq!(drained.removed, 500);
        assert_eq!(drained.source, link);

        let (stored, _) = world.block(link).unwrap().contents(water());
        assert_eq!(stored, 1500);
    }

    // -----------------------------------------------------------------------
    // Test 2: Simulate never mutates and is idempotent
    // -----------------------------------------------------------------------
    #[test]
    fn simulate_is_pure_and_idempotent() {
        let (mut world, link) = tank_world(Tank::open(Some(FluidStack::new(water(), 2000)), 4000));
        let before = world.clone();

        let first = probe(&mut world, link, water(), 500, DrainMode::Simulate).unwrap();
        let second = probe(&mut world, link, water(), 500, DrainMode::Simulate).unwrap();

        assert_eq!(first, second);
        assert_eq!(world, before);
    }

    // -----------------------------------------------------------------------
    // Test 3: Sided tanks resolve through their exposed face
    // -----------------------------------------------------------------------
    #[test]
    fn sided_tank_resolves_through_face() {
        let sided = Tank::open(Some(FluidStack::new(water(), 1000)), 1000)
            .with_exposure(Exposure::Faces(vec![Direction::North]));
        let (world, link) = tank_world(sided);

        assert_eq!(resolve_source(&world, link), Some(link));
    }

    // -----------------------------------------------------------------------
    // Test 4: A sealed tank is NoSource
    // -----------------------------------------------------------------------
    #[test]
    fn sealed_tank_is_no_source() {
        let sealed = Tank::open(Some(FluidStack::new(water(), 1000)), 1000)
            .with_exposure(Exposure::Faces(Vec::new()));
        let (mut world, link) = tank_world(sealed);

        assert_eq!(resolve_source(&world, link), None);
        assert_eq!(
            probe(&mut world, link, water(), 500, DrainMode::Simulate),
            Err(ProbeError::NoSource)
        );
    }

    // -----------------------------------------------------------------------
    // Test 5: Nothing at the link is NoSource
    // -----------------------------------------------------------------------
    #[test]
    fn missing_block_is_no_source() {
        let mut world = World::new();
        world.add_region(RegionId(0));
        assert_eq!(
            probe(&mut world, at(0), water(), 500, DrainMode::Simulate),
            Err(ProbeError::NoSource)
        );
    }

    // -----------------------------------------------------------------------
    // Test 6: Wrong fluid kind is Empty, not NoSource
    // -----------------------------------------------------------------------
    #[test]
    fn wrong_kind_is_empty() {
        let (mut world, link) = tank_world(Tank::open(Some(FluidStack::new(sludge(), 2000)), 4000));
        assert_eq!(
            probe(&mut world, link, water(), 500, DrainMode::Simulate),
            Err(ProbeError::Empty)
        );
    }

    // -----------------------------------------------------------------------
    // Test 7: Relay delegates to the first exposing neighbor, in order
    // -----------------------------------------------------------------------
    #[test]
    fn relay_finds_first_neighbor_in_canonical_order() {
        let mut world = World::new();
        let link = at(0);
        world.place(link, FluidBlock::Relay);

        // Neighbors in the Up and East directions; Up precedes East in the
        // canonical order, so Up wins.
        world.place(
            link.offset(Direction::Up),
            FluidBlock::Tank(Tank::open(Some(FluidStack::new(water(), 800)), 1000)),
        );
        world.place(
            link.offset(Direction::East),
            FluidBlock::Tank(Tank::open(Some(FluidStack::new(water(), 900)), 1000)),
        );

        assert_eq!(resolve_source(&world, link), Some(link.offset(Direction::Up)));
    }

    // -----------------------------------------------------------------------
    // Test 8: Relay checks the face pointing back at it
    // -----------------------------------------------------------------------
    #[test]
    fn relay_respects_neighbor_facing() {
        let mut world = World::new();
        let link = at(0);
        world.place(link, FluidBlock::Relay);

        // The Up neighbor only exposes on its Up face; seen from the relay
        // (searching Up, arriving at the Down face) it is invisible.
        world.place(
            link.offset(Direction::Up),
            FluidBlock::Tank(
                Tank::open(Some(FluidStack::new(water(), 800)), 1000)
                    .with_exposure(Exposure::Faces(vec![Direction::Up])),
            ),
        );
        assert_eq!(resolve_source(&world, link), None);

        // Exposing the Down face makes it reachable.
        world.place(
            link.offset(Direction::Up),
            FluidBlock::Tank(
                Tank::open(Some(FluidStack::new(water(), 800)), 1000)
                    .with_exposure(Exposure::Faces(vec![Direction::Down])),
            ),
        );
        assert_eq!(resolve_source(&world, link), Some(link.offset(Direction::Up)));
    }

    // -----------------------------------------------------------------------
    // Test 9: Relays do not chain
    // -----------------------------------------------------------------------
    #[test]
    fn relay_delegation_is_single_level() {
        let mut world = World::new();
        let link = at(0);
        world.place(link, FluidBlock::Relay);
        world.place(link.offset(Direction::Up), FluidBlock::Relay);
        // A tank beyond the second relay would be reachable only by chaining.
        world.place(
            link.offset(Direction::Up).offset(Direction::Up),
            FluidBlock::Tank(Tank::open(Some(FluidStack::new(water(), 800)), 1000)),
        );

        assert_eq!(resolve_source(&world, link), None);
    }

    // -----------------------------------------------------------------------
    // Test 10: Reservoir drains one level and keeps its purity
    // -----------------------------------------------------------------------
    #[test]
    fn reservoir_drains_one_level_preserving_purity() {
        let mut world = World::new();
        let link = at(0);
        world.place(
            link,
            FluidBlock::Reservoir(
                Reservoir::new(water(), 3, 3, 999).with_purity(Purity::Purified),
            ),
        );

        let drained = probe(&mut world, link, water(), 500, DrainMode::Execute).unwrap();
        // One level is 333; the grant is below the request and exact.
        assert_eq!(drained.stack.volume, 333);
        assert_eq!(drained.removed, 333);

        match world.block(link).unwrap() {
            FluidBlock::Reservoir(res) => {
                assert_eq!(res.level, 2);
                assert_eq!(res.purity, Some(Purity::Purified));
            }
            other => panic!("expected reservoir, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Test 11: Reservoir grant caps at the request
    // -----------------------------------------------------------------------
    #[test]
    fn reservoir_grant_caps_at_request() {
        let mut world = World::new();
        let link = at(0);
        world.place(link, FluidBlock::Reservoir(Reservoir::new(water(), 3, 3, 999)));

        let drained = probe(&mut world, link, water(), 100, DrainMode::Execute).unwrap();
        assert_eq!(drained.stack.volume, 100);
        assert_eq!(drained.removed, 333);
    }

    // -----------------------------------------------------------------------
    // Test 12: Empty reservoir is Empty; last level sheds properties
    // -----------------------------------------------------------------------
    #[test]
    fn reservoir_empties_to_empty_variant() {
        let mut world = World::new();
        let link = at(0);
        world.place(
            link,
            FluidBlock::Reservoir(
                Reservoir::new(water(), 1, 3, 999).with_purity(Purity::Dirty),
            ),
        );

        probe(&mut world, link, water(), 500, DrainMode::Execute).unwrap();
        match world.block(link).unwrap() {
            FluidBlock::Reservoir(res) => {
                assert!(res.is_empty());
                assert_eq!(res.purity, None);
            }
            other => panic!("expected reservoir, got {other:?}"),
        }

        assert_eq!(
            probe(&mut world, link, water(), 500, DrainMode::Execute),
            Err(ProbeError::Empty)
        );
    }

    // -----------------------------------------------------------------------
    // Test 13: Doubling search finds the minimal coarse increment
    // -----------------------------------------------------------------------
    #[test]
    fn doubling_search_finds_minimal_increment() {
        for increment in [1u32, 7, 64, 1000] {
            let (mut world, link) = tank_world(
                Tank::open(Some(FluidStack::new(water(), 2000)), 2000).with_increment(increment),
            );

            // A request below the increment forces the doubling search.
            let request = 1;
            let drained = probe(&mut world, link, water(), request, DrainMode::Execute).unwrap();
            assert_eq!(drained.removed, increment, "increment {increment}");
            assert_eq!(drained.stack.volume, request.min(increment));

            let (stored, _) = world.block(link).unwrap().contents(water());
            assert_eq!(stored, 2000 - increment);
        }
    }

    // -----------------------------------------------------------------------
    // Test 14: Increment equal to capacity is still found
    // -----------------------------------------------------------------------
    #[test]
    fn increment_equal_to_capacity_is_found() {
        let (mut world, link) = tank_world(
            Tank::open(Some(FluidStack::new(water(), 1000)), 1000).with_increment(1000),
        );

        let drained = probe(&mut world, link, water(), 500, DrainMode::Simulate).unwrap();
        assert_eq!(drained.stack.volume, 500);
        assert_eq!(drained.removed, 1000);
    }

    // -----------------------------------------------------------------------
    // Test 15: A handler that accepts nothing fails cleanly
    // -----------------------------------------------------------------------
    #[test]
    fn unyielding_handler_is_empty() {
        // Increment beyond the 2x-capacity probe bound: no probe ever lands.
        let (mut world, link) = tank_world(
            Tank::open(Some(FluidStack::new(water(), 1000)), 1000).with_increment(4096),
        );
        let before = world.clone();

        assert_eq!(
            probe(&mut world, link, water(), 500, DrainMode::Execute),
            Err(ProbeError::Empty)
        );
        assert_eq!(world, before);
    }

    // -----------------------------------------------------------------------
    // Test 16: Tank refund restores the removed volume exactly
    // -----------------------------------------------------------------------
    #[test]
    fn tank_refund_is_exact() {
        let (mut world, link) = tank_world(
            Tank::open(Some(FluidStack::new(water(), 2000)), 2000).with_increment(1000),
        );

        let drained = probe(&mut world, link, water(), 500, DrainMode::Execute).unwrap();
        assert_eq!(drained.removed, 1000);

        let restored = refund(
            &mut world,
            drained.source,
            &drained.stack.with_volume(drained.removed),
        );
        assert_eq!(restored, 1000);

        let (stored, _) = world.block(link).unwrap().contents(water());
        assert_eq!(stored, 2000);
    }

    // -----------------------------------------------------------------------
    // Test 17: Reservoir refund restores the drained level
    // -----------------------------------------------------------------------
    #[test]
    fn reservoir_refund_restores_level() {
        let mut world = World::new();
        let link = at(0);
        world.place(link, FluidBlock::Reservoir(Reservoir::new(water(), 2, 3, 999)));

        let drained = probe(&mut world, link, water(), 500, DrainMode::Execute).unwrap();
        let restored = refund(
            &mut world,
            drained.source,
            &drained.stack.with_volume(drained.removed),
        );
        assert_eq!(restored, 333);

        match world.block(link).unwrap() {
            FluidBlock::Reservoir(res) => assert_eq!(res.level, 2),
            other => panic!("expected reservoir, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Test 18: Probe skips a non-drinkable compartment
    // -----------------------------------------------------------------------
    #[test]
    fn probe_skips_foreign_compartments() {
        use crate::handler::TankCell;

        let tank = Tank {
            cells: vec![
                TankCell::filled(FluidStack::new(sludge(), 1000), 1000),
                TankCell::filled(FluidStack::new(water(), 1000), 1000),
            ],
            increment: 1,
            exposure: Exposure::AllFaces,
        };
        let (mut world, link) = tank_world(tank);

        let drained = probe(&mut world, link, water(), 400, DrainMode::Execute).unwrap();
        assert_eq!(drained.stack.kind, water());
        assert_eq!(drained.stack.volume, 400);

        let (sludge_left, _) = world.block(link).unwrap().contents(sludge());
        assert_eq!(sludge_left, 1000);
    }
}
