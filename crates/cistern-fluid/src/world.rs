//! A minimal in-memory world stand-in.
//!
//! The host world is an external collaborator; this module carries just
//! enough of it to exercise every probe and transaction path: regions with
//! a load flag, and fluid-relevant blocks at positions. Storage is BTreeMap
//! so iteration order is deterministic.

use std::collections::BTreeMap;

use cistern_core::id::{FluidKindId, RegionId};
use cistern_core::purity::Purity;
use serde::{Deserialize, Serialize};

use crate::handler::Tank;
use crate::reservoir::Reservoir;
use crate::space::{BlockPos, GlobalPos};

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// The kinds of block the prober can meet at or near a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluidBlock {
    /// Holds fluid and exposes a drain capability itself.
    Tank(Tank),
    /// A layered, level-stepped holder.
    Reservoir(Reservoir),
    /// Holds nothing; forwards drain requests to its neighbors.
    Relay,
}

impl FluidBlock {
    /// (stored volume of `kind`, total capacity) visible in this block.
    pub fn contents(&self, kind: FluidKindId) -> (u32, u32) {
        match self {
            FluidBlock::Tank(tank) => (
                tank.stored(kind),
                tank.cells.iter().map(|c| c.capacity).sum(),
            ),
            FluidBlock::Reservoir(res) => {
                let stored = if res.fluid == kind { res.stored() } else { 0 };
                (stored, res.total_volume)
            }
            FluidBlock::Relay => (0, 0),
        }
    }

    /// The quality property carried by this block's state, if any.
    pub fn purity(&self) -> Option<Purity> {
        match self {
            FluidBlock::Reservoir(res) => res.purity,
            FluidBlock::Tank(_) | FluidBlock::Relay => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Regions and the world
// ---------------------------------------------------------------------------

/// One world region: a load flag and its blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub loaded: bool,
    blocks: BTreeMap<BlockPos, FluidBlock>,
}

/// All regions, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    regions: BTreeMap<RegionId, Region>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region in the loaded state (no-op if it already exists).
    pub fn add_region(&mut self, region: RegionId) {
        self.regions.entry(region).or_insert(Region {
            loaded: true,
            blocks: BTreeMap::new(),
        });
    }

    /// Mark a region loaded or unloaded. Blocks persist across unloads.
    pub fn set_loaded(&mut self, region: RegionId, loaded: bool) {
        if let Some(r) = self.regions.get_mut(&region) {
            r.loaded = loaded;
        }
    }

    /// Whether the region exists and is currently loaded.
    pub fn is_loaded(&self, region: RegionId) -> bool {
        self.regions.get(&region).is_some_and(|r| r.loaded)
    }

    /// Put a block at a position, creating the region if needed.
    pub fn place(&mut self, at: GlobalPos, block: FluidBlock) {
        self.add_region(at.region);
        if let Some(region) = self.regions.get_mut(&at.region) {
            region.blocks.insert(at.pos, block);
        }
    }

    /// Remove and return the block at a position.
    pub fn remove(&mut self, at: GlobalPos) -> Option<FluidBlock> {
        self.regions.get_mut(&at.region)?.blocks.remove(&at.pos)
    }

    pub fn block(&self, at: GlobalPos) -> Option<&FluidBlock> {
        self.regions.get(&at.region)?.blocks.get(&at.pos)
    }

    pub fn block_mut(&mut self, at: GlobalPos) -> Option<&mut FluidBlock> {
        self.regions.get_mut(&at.region)?.blocks.get_mut(&at.pos)
    }

    /// The quality property of the block occupying `at`, if the region is
    /// loaded and the block carries one.
    pub fn block_purity(&self, at: GlobalPos) -> Option<Purity> {
        if !self.is_loaded(at.region) {
            return None;
        }
        self.block(at)?.purity()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
