//! Fluid stacks: a kind, a volume, and an optional purity tag.

use cistern_core::id::FluidKindId;
use cistern_core::purity::Purity;
use serde::{Deserialize, Serialize};

/// An ephemeral quantity of fluid. Produced by probing, consumed or refunded
/// within one transaction, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluidStack {
    /// What fluid this is.
    pub kind: FluidKindId,
    /// How much of it, in volume units.
    pub volume: u32,
    /// Quality tag, when the holding container preserved one.
    pub purity: Option<Purity>,
}

impl FluidStack {
    /// An untagged stack.
    pub fn new(kind: FluidKindId, volume: u32) -> Self {
        Self {
            kind,
            volume,
            purity: None,
        }
    }

    /// A stack carrying a purity tag.
    pub fn tagged(kind: FluidKindId, volume: u32, purity: Purity) -> Self {
        Self {
            kind,
            volume,
            purity: Some(purity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.volume == 0
    }

    /// The same fluid and tag at a different volume.
    pub fn with_volume(self, volume: u32) -> Self {
        Self { volume, ..self }
    }
}
