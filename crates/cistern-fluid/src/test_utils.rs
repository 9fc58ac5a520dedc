//! Shared test helpers for integration tests and downstream crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available to unit tests here and, via the `test-utils` feature, to
//! the drink crate and the workspace integration tests.

use cistern_core::id::{FluidKindId, RegionId};
use cistern_core::purity::Purity;

use crate::handler::Tank;
use crate::reservoir::Reservoir;
use crate::space::{BlockPos, GlobalPos};
use crate::stack::FluidStack;
use crate::world::{FluidBlock, World};

// ===========================================================================
// Fluid kinds
// ===========================================================================

/// The drinkable kind used throughout the tests.
pub fn water() -> FluidKindId {
    FluidKindId(0)
}

/// A non-drinkable kind.
pub fn sludge() -> FluidKindId {
    FluidKindId(1)
}

// ===========================================================================
// Positions
// ===========================================================================

pub fn overworld() -> RegionId {
    RegionId(0)
}

pub fn link_at(x: i32) -> GlobalPos {
    GlobalPos::new(overworld(), BlockPos::new(x, 64, 0))
}

// ===========================================================================
// Block constructors
// ===========================================================================

/// A single-cell water tank with unit drain granularity.
pub fn open_tank(volume: u32, capacity: u32) -> Tank {
    let content = (volume > 0).then(|| FluidStack::new(water(), volume));
    Tank::open(content, capacity)
}

/// A water tank that drains only in multiples of `increment`.
pub fn coarse_tank(volume: u32, capacity: u32, increment: u32) -> Tank {
    open_tank(volume, capacity).with_increment(increment)
}

/// A three-level, 999-unit water basin at the given fill level.
pub fn basin(level: u8, purity: Option<Purity>) -> Reservoir {
    let mut res = Reservoir::new(water(), level, 3, 999);
    res.purity = purity;
    res
}

// ===========================================================================
// World constructors
// ===========================================================================

/// A world holding a single block, returning the link that reaches it.
pub fn world_with(block: FluidBlock) -> (World, GlobalPos) {
    let mut world = World::new();
    let link = link_at(0);
    world.place(link, block);
    (world, link)
}

/// Stored water volume at a position. 0 when nothing is there.
pub fn stored_at(world: &World, at: GlobalPos) -> u32 {
    world.block(at).map_or(0, |b| b.contents(water()).0)
}
