//! Per-vessel persisted state: the link target and the stored energy.
//!
//! These are the only two scalars a vessel carries between transactions.
//! They are serde-derived and persist as a bitcode payload behind a
//! magic/version header, validated on decode.

use cistern_core::config::DrinkConfig;
use cistern_core::convert::{drink_preview, energy_cost};
use cistern_core::error::DrinkError;
use cistern_core::id::FluidKindId;
use cistern_core::purity::Purity;
use cistern_fluid::probe::resolve_source;
use cistern_fluid::space::GlobalPos;
use cistern_fluid::world::{FluidBlock, World};
use serde::{Deserialize, Serialize};

use crate::purity::resolve_purity;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a persisted vessel state.
pub const STATE_MAGIC: u32 = 0xC157_0001;

/// Current format version. Increment when breaking the wire format.
pub const STATE_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Vessel state
// ---------------------------------------------------------------------------

/// The persisted per-vessel scalars. Loaded before a transaction, stored
/// after; the engine takes this by mutable reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselState {
    /// Where this vessel drinks from. Overwritten by later binds; cleared
    /// only by external item destruction.
    pub link: Option<GlobalPos>,
    /// Stored energy. Mutated by the engine's settle step and by external
    /// insertion through the energy store.
    pub energy: u64,
}

impl VesselState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind this vessel to a position. Succeeds only when a drain capability
    /// is reachable there, and overwrites any previous link.
    pub fn bind(&mut self, world: &World, target: GlobalPos) -> Result<(), DrinkError> {
        if !world.is_loaded(target.region) {
            return Err(DrinkError::Unreachable);
        }
        if resolve_source(world, target).is_none() {
            return Err(DrinkError::NoSource);
        }
        self.link = Some(target);
        Ok(())
    }

    /// Inspection numbers for display. `None` when the vessel is unbound.
    pub fn inspect(
        &self,
        world: &World,
        config: &DrinkConfig,
        drinkable: FluidKindId,
    ) -> Option<LinkReport> {
        let link = self.link?;
        let reachable = world.is_loaded(link.region);

        let source = if reachable {
            resolve_source(world, link).and_then(|at| world.block(at)).map(|block| {
                let (stored, capacity) = block.contents(drinkable);
                let tagged = match block {
                    FluidBlock::Tank(tank) => tank
                        .cells
                        .iter()
                        .filter_map(|c| c.content.as_ref())
                        .find(|s| s.kind == drinkable && !s.is_empty())
                        .copied(),
                    _ => None,
                };
                let purity = (stored > 0)
                    .then(|| resolve_purity(tagged.as_ref(), world, Some(link)));
                SourceReport {
                    stored,
                    capacity,
                    purity,
                }
            })
        } else {
            None
        };

        let preview = drink_preview(config);
        let drink_cost = if config.energy_gated() {
            energy_cost(preview.0 + preview.1, config.energy_cost_per_point)
        } else {
            0
        };

        Some(LinkReport {
            link,
            reachable,
            source,
            preview,
            energy: self.energy,
            energy_capacity: config.energy_capacity,
            drink_cost,
        })
    }

    /// Encode for persistence: header plus bitcode payload.
    pub fn encode(&self) -> Result<Vec<u8>, StateCodecError> {
        let snapshot = VesselSnapshot {
            header: StateHeader::new(),
            state: self.clone(),
        };
        bitcode::serialize(&snapshot).map_err(|e| StateCodecError::Encode(e.to_string()))
    }

    /// Decode a persisted state, validating the header first.
    pub fn decode(data: &[u8]) -> Result<VesselState, StateCodecError> {
        let snapshot: VesselSnapshot =
            bitcode::deserialize(data).map_err(|e| StateCodecError::Decode(e.to_string()))?;
        snapshot.header.validate()?;
        Ok(snapshot.state)
    }
}

// ---------------------------------------------------------------------------
// Inspection report
// ---------------------------------------------------------------------------

/// What a linked source looks like right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceReport {
    /// Drinkable volume currently stored.
    pub stored: u32,
    /// Total capacity of the source.
    pub capacity: u32,
    /// Observed purity, present whenever drinkable fluid is.
    pub purity: Option<Purity>,
}

/// The numbers a tooltip or HUD would render for this vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkReport {
    pub link: GlobalPos,
    /// Whether the linked region is currently loaded.
    pub reachable: bool,
    /// Source contents, when reachable and resolvable.
    pub source: Option<SourceReport>,
    /// (thirst, quench) of a full drink before purity scaling.
    pub preview: (u32, u32),
    pub energy: u64,
    pub energy_capacity: u64,
    /// Energy a full drink costs. 0 when the budget is disabled.
    pub drink_cost: u64,
}

// ---------------------------------------------------------------------------
// Persistence plumbing
// ---------------------------------------------------------------------------

/// Header prepended to every persisted vessel state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateHeader {
    pub magic: u32,
    pub version: u32,
}

impl StateHeader {
    pub fn new() -> Self {
        Self {
            magic: STATE_MAGIC,
            version: STATE_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), StateCodecError> {
        if self.magic != STATE_MAGIC {
            return Err(StateCodecError::InvalidMagic(self.magic));
        }
        if self.version > STATE_VERSION {
            return Err(StateCodecError::FutureVersion(self.version));
        }
        if self.version < STATE_VERSION {
            return Err(StateCodecError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for StateHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VesselSnapshot {
    header: StateHeader,
    state: VesselState,
}

/// Errors that can occur while persisting or restoring vessel state.
#[derive(Debug, thiserror::Error)]
pub enum StateCodecError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", STATE_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("state from future version {0} (this build supports up to {STATE_VERSION})")]
    FutureVersion(u32),
    #[error("unsupported state version: expected {}, got {}", STATE_VERSION, .0)]
    UnsupportedVersion(u32),
}

// ===========================================================================
// Tests
// ===========================================================================
