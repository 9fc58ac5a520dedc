//! Shared test helpers: actor handles and recording sinks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so unit tests
//! here and the workspace integration tests share the same doubles.

use cistern_core::id::DrinkerId;
use cistern_core::purity::DebuffInstance;
use cistern_fluid::space::GlobalPos;
use cistern_fluid::stack::FluidStack;
use slotmap::SlotMap;

use crate::sink::{EffectSink, ThirstSink};

/// A fresh actor handle.
pub fn drinker() -> DrinkerId {
    let mut sm = SlotMap::<DrinkerId, ()>::with_key();
    sm.insert(())
}

/// One recorded grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRecord {
    pub actor: DrinkerId,
    pub thirst: u32,
    pub quench: u32,
    pub fluid: Option<FluidStack>,
    pub source: Option<GlobalPos>,
}

/// A sink that records everything it receives. Implements both adapter
/// traits so one double serves a whole test.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub grants: Vec<GrantRecord>,
    pub debuffs: Vec<(DrinkerId, DebuffInstance)>,
    /// Answer for `wants_drink`.
    pub thirsty: bool,
}

impl RecordingSink {
    pub fn thirsty() -> Self {
        Self {
            thirsty: true,
            ..Self::default()
        }
    }

    /// Total points granted so far.
    pub fn granted_points(&self) -> u32 {
        self.grants.iter().map(|g| g.thirst + g.quench).sum()
    }
}

impl ThirstSink for RecordingSink {
    fn grant(
        &mut self,
        actor: DrinkerId,
        thirst: u32,
        quench: u32,
        fluid: Option<&FluidStack>,
        source: Option<GlobalPos>,
    ) {
        self.grants.push(GrantRecord {
            actor,
            thirst,
            quench,
            fluid: fluid.copied(),
            source,
        });
    }

    fn wants_drink(&self, _actor: DrinkerId) -> bool {
        self.thirsty
    }
}

impl EffectSink for RecordingSink {
    fn apply_debuff(&mut self, actor: DrinkerId, debuff: DebuffInstance) {
        self.debuffs.push((actor, debuff));
    }
}
