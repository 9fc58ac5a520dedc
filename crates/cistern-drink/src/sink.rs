//! The resource-subsystem adapter.
//!
//! The thirst subsystem is an external collaborator: the engine hands it the
//! settled point deltas and nothing else. When no subsystem is installed the
//! no-op sink drops grants silently -- debuffs are NOT the sink's job, the
//! engine applies them through [`EffectSink`] uniformly, so they are never
//! double-applied and never lost.

use cistern_core::id::DrinkerId;
use cistern_core::purity::DebuffInstance;
use cistern_fluid::space::GlobalPos;
use cistern_fluid::stack::FluidStack;

// ---------------------------------------------------------------------------
// Thirst sink
// ---------------------------------------------------------------------------

/// Receives the settled thirst/quench deltas of a committed drink.
pub trait ThirstSink {
    /// Credit the actor with restored points. `fluid` and `source` give the
    /// subsystem context for its own bookkeeping (e.g. drink statistics).
    fn grant(
        &mut self,
        actor: DrinkerId,
        thirst: u32,
        quench: u32,
        fluid: Option<&FluidStack>,
        source: Option<GlobalPos>,
    );

    /// Whether the actor has room for more thirst. Only the no-op fallback
    /// is expected to answer unconditionally.
    fn wants_drink(&self, actor: DrinkerId) -> bool;
}

/// Fallback when no thirst subsystem is installed: grants are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpThirstSink;

impl ThirstSink for NoOpThirstSink {
    fn grant(
        &mut self,
        _actor: DrinkerId,
        _thirst: u32,
        _quench: u32,
        _fluid: Option<&FluidStack>,
        _source: Option<GlobalPos>,
    ) {
    }

    fn wants_drink(&self, _actor: DrinkerId) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Effect sink
// ---------------------------------------------------------------------------

/// Receives the timed debuffs of a committed drink. Owned by the core: the
/// engine calls this for every transaction regardless of which thirst sink
/// is installed.
pub trait EffectSink {
    fn apply_debuff(&mut self, actor: DrinkerId, debuff: DebuffInstance);
}

/// Fallback for hosts without a status-effect system.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEffectSink;

impl EffectSink for NoOpEffectSink {
    fn apply_debuff(&mut self, _actor: DrinkerId, _debuff: DebuffInstance) {}
}
