//! The capability adapter: what a drainable block exposes to the prober.
//!
//! [`FluidHandler`] is the seam between the probe algorithm and whatever is
//! actually holding fluid. [`Tank`] is the general implementation: one or
//! more cells, an optional drain granularity (coarse handlers yield only
//! multiples of their increment), and sided capability exposure.

use cistern_core::id::FluidKindId;
use serde::{Deserialize, Serialize};

use crate::space::Direction;
use crate::stack::FluidStack;

// ---------------------------------------------------------------------------
// Drain mode
// ---------------------------------------------------------------------------

/// Whether an operation is a dry run or the real thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrainMode {
    /// Report what would happen. Must not mutate anything.
    Simulate,
    /// Actually move the fluid.
    Execute,
}

impl DrainMode {
    pub fn is_execute(self) -> bool {
        matches!(self, DrainMode::Execute)
    }
}

// ---------------------------------------------------------------------------
// Capability exposure
// ---------------------------------------------------------------------------

/// Which queries can see a block's drain capability.
///
/// A direct query carries no face; a sided query carries the face it comes
/// through. Machines with plumbing on specific sides expose only those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exposure {
    /// Visible to direct queries and from every face.
    AllFaces,
    /// Visible only through the listed faces; hidden from direct queries.
    Faces(Vec<Direction>),
}

impl Exposure {
    pub fn exposes(&self, face: Option<Direction>) -> bool {
        match self {
            Exposure::AllFaces => true,
            Exposure::Faces(faces) => face.is_some_and(|f| faces.contains(&f)),
        }
    }
}

// ---------------------------------------------------------------------------
// FluidHandler trait
// ---------------------------------------------------------------------------

/// Per-compartment access to a fluid container, plus kind-filtered drain and
/// fill. This is the contract the prober is written against.
pub trait FluidHandler {
    /// Number of internal compartments.
    fn tank_count(&self) -> usize;

    /// Content of a compartment, or `None` when it is empty.
    fn fluid_in_tank(&self, tank: usize) -> Option<&FluidStack>;

    /// Capacity of a compartment.
    fn tank_capacity(&self, tank: usize) -> u32;

    /// Drain up to `max` units of `kind`. Coarse handlers yield only whole
    /// multiples of their internal increment; `None` means nothing was (or
    /// would be) moved.
    fn drain(&mut self, kind: FluidKindId, max: u32, mode: DrainMode) -> Option<FluidStack>;

    /// Insert a stack, returning the accepted volume. Filling is not
    /// increment-constrained: refunds must be able to restore exactly what a
    /// coarse drain removed.
    fn fill(&mut self, stack: &FluidStack, mode: DrainMode) -> u32;
}

// ---------------------------------------------------------------------------
// Tank
// ---------------------------------------------------------------------------

/// One compartment of a [`Tank`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankCell {
    pub content: Option<FluidStack>,
    pub capacity: u32,
}

impl TankCell {
    pub fn empty(capacity: u32) -> Self {
        Self {
            content: None,
            capacity,
        }
    }

    pub fn filled(stack: FluidStack, capacity: u32) -> Self {
        Self {
            content: Some(stack),
            capacity,
        }
    }
}

/// A general fluid container: cells, drain granularity, sided exposure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tank {
    pub cells: Vec<TankCell>,
    /// Drain granularity in volume units. 1 means any amount.
    pub increment: u32,
    pub exposure: Exposure,
}

impl Tank {
    /// A single-cell tank that drains at unit granularity and exposes its
    /// capability on every face.
    pub fn open(content: Option<FluidStack>, capacity: u32) -> Self {
        Self {
            cells: vec![TankCell { content, capacity }],
            increment: 1,
            exposure: Exposure::AllFaces,
        }
    }

    /// The same tank with a coarse drain granularity.
    pub fn with_increment(mut self, increment: u32) -> Self {
        self.increment = increment;
        self
    }

    /// The same tank exposed only through the given faces.
    pub fn with_exposure(mut self, exposure: Exposure) -> Self {
        self.exposure = exposure;
        self
    }

    /// Total stored volume of `kind` across all cells.
    pub fn stored(&self, kind: FluidKindId) -> u32 {
        self.cells
            .iter()
            .filter_map(|c| c.content.as_ref())
            .filter(|s| s.kind == kind)
            .map(|s| s.volume)
            .sum()
    }

    fn granularity(&self) -> u32 {
        self.increment.max(1)
    }
}

impl FluidHandler for Tank {
    fn tank_count(&self) -> usize {
        self.cells.len()
    }

    fn fluid_in_tank(&self, tank: usize) -> Option<&FluidStack> {
        self.cells.get(tank)?.content.as_ref()
    }

    fn tank_capacity(&self, tank: usize) -> u32 {
        self.cells.get(tank).map_or(0, |c| c.capacity)
    }

    fn drain(&mut self, kind: FluidKindId, max: u32, mode: DrainMode) -> Option<FluidStack> {
        let step = self.granularity();
        let cell = self
            .cells
            .iter_mut()
            .find(|c| c.content.as_ref().is_some_and(|s| s.kind == kind))?;
        let content = cell.content?;

        let available = max.min(content.volume);
        let granted = available - available % step;
        if granted == 0 {
            return None;
        }

        if mode.is_execute() {
            let remaining = content.volume - granted;
            cell.content = if remaining == 0 {
                None
            } else {
                Some(content.with_volume(remaining))
            };
        }
        Some(content.with_volume(granted))
    }

    fn fill(&mut self, stack: &FluidStack, mode: DrainMode) -> u32 {
        if stack.is_empty() {
            return 0;
        }

        // Prefer a cell already holding this kind, then any empty cell.
        let cell = match self
            .cells
            .iter_mut()
            .position(|c| c.content.as_ref().is_some_and(|s| s.kind == stack.kind))
        {
            Some(i) => &mut self.cells[i],
            None => match self.cells.iter_mut().find(|c| c.content.is_none()) {
                Some(c) => c,
                None => return 0,
            },
        };

        let existing = cell.content;
        let held = existing.map_or(0, |s| s.volume);
        let accepted = stack.volume.min(cell.capacity.saturating_sub(held));
        if accepted == 0 {
            return 0;
        }

        if mode.is_execute() {
            cell.content = Some(match existing {
                Some(existing) => existing.with_volume(held + accepted),
                None => stack.with_volume(accepted),
            });
        }
        accepted
    }
}

// ===========================================================================
// Tests
// ===========================================================================
