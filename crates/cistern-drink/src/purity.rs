//! Resolving a drink's purity tier and applying its consequences.
//!
//! Resolution priority:
//!
//! 1. an explicit tag on the drained fluid stack (containers that preserve
//!    quality tags);
//! 2. a quality property on the block at the source position, when it is
//!    known and loaded (layered reservoirs);
//! 3. the default tier for untagged fluid.

use cistern_core::config::DrinkConfig;
use cistern_core::id::DrinkerId;
use cistern_core::purity::{debuffs_for, DebuffInstance, Purity};
use cistern_fluid::space::GlobalPos;
use cistern_fluid::stack::FluidStack;
use cistern_fluid::world::World;

use crate::sink::EffectSink;

/// Determine the purity tier of a drink.
pub fn resolve_purity(
    fluid: Option<&FluidStack>,
    world: &World,
    source: Option<GlobalPos>,
) -> Purity {
    if let Some(stack) = fluid {
        if !stack.is_empty() {
            if let Some(purity) = stack.purity {
                return purity;
            }
        }
    }
    if let Some(at) = source {
        if let Some(purity) = world.block_purity(at) {
            return purity;
        }
    }
    Purity::DEFAULT
}

/// Apply the tier's timed debuffs to the actor and report what was applied.
pub fn apply_purity_effects<E: EffectSink>(
    effects: &mut E,
    actor: DrinkerId,
    purity: Purity,
    config: &DrinkConfig,
) -> Vec<DebuffInstance> {
    let applied = debuffs_for(purity, config.nausea_seconds, config.hunger_seconds);
    for debuff in &applied {
        effects.apply_debuff(actor, *debuff);
    }
    applied
}

// ===========================================================================
// Tests
// ===========================================================================
