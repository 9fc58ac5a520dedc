//! The two-machine drink session: authoritative checks, optimistic feedback.
//!
//! The authoritative side runs every state-mutating step; the initiating
//! side only plays a drinking animation, started optimistically. When the
//! authoritative side rejects a request after the animation already began,
//! it fires a zero-payload [`StopDrinking`] signal. Delivery is best-effort:
//! the signal may arrive late or be dropped entirely, and stopping an
//! already-stopped animation is a no-op, so nothing depends on it for
//! correctness.

use cistern_core::config::DrinkConfig;
use cistern_core::error::DrinkError;
use cistern_core::id::{DrinkerId, FluidKindId};
use cistern_core::purity::Purity;
use cistern_fluid::world::World;

use crate::engine::{begin_drink, finish_drink, DrinkOutcome, DrinkPreview};
use crate::sink::{EffectSink, ThirstSink};
use crate::state::VesselState;

// ---------------------------------------------------------------------------
// Cancellation signal
// ---------------------------------------------------------------------------

/// "Stop the optimistic animation now." Zero payload, fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopDrinking;

/// At-most-one-recipient mailbox for [`StopDrinking`]. Repeated sends before
/// delivery collapse into one pending signal; an undelivered signal is
/// simply lost when the session ends, which the receiver tolerates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancelMailbox {
    pending: bool,
}

impl CancelMailbox {
    pub fn send(&mut self, _signal: StopDrinking) {
        self.pending = true;
    }

    pub fn take(&mut self) -> Option<StopDrinking> {
        self.pending.then(|| {
            self.pending = false;
            StopDrinking
        })
    }
}

// ---------------------------------------------------------------------------
// Optimistic animation
// ---------------------------------------------------------------------------

/// The initiating side's view: is a drinking animation playing?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Playing,
}

/// The optimistic use animation. `stop` is idempotent so a late or duplicate
/// cancellation is harmless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UseAnimation {
    state: AnimationState,
}

impl UseAnimation {
    pub fn start(&mut self) {
        self.state = AnimationState::Playing;
    }

    /// Stop the animation. A no-op when it is not playing.
    pub fn stop(&mut self) {
        self.state = AnimationState::Idle;
    }

    pub fn is_playing(&self) -> bool {
        self.state == AnimationState::Playing
    }
}

// ---------------------------------------------------------------------------
// Session events
// ---------------------------------------------------------------------------

/// Feedback emitted as a session progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrinkEvent {
    /// The pre-flight passed and the animation started.
    DrinkStarted { actor: DrinkerId },
    /// A transaction committed.
    Drank {
        actor: DrinkerId,
        thirst: u32,
        quench: u32,
        purity: Purity,
    },
    /// A request was rejected; the animation (if any) was told to stop.
    DrinkRejected {
        actor: DrinkerId,
        error: DrinkError,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One actor's drink flow across both machines.
///
/// The `begin`/`finish` calls are the authoritative side; `animation` and
/// [`DrinkSession::pump_local`] model the initiating side consuming the
/// cancellation mailbox. A host with a real network splits these; the
/// protocol between them is exactly the [`StopDrinking`] signal.
#[derive(Debug, Default)]
pub struct DrinkSession {
    pub animation: UseAnimation,
    cancel: CancelMailbox,
    events: Vec<DrinkEvent>,
}

impl DrinkSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authoritative pre-flight. On success the optimistic animation starts;
    /// on failure the cancellation signal fires (harmless if the animation
    /// never started).
    pub fn begin(
        &mut self,
        world: &mut World,
        state: &VesselState,
        config: &DrinkConfig,
        drinkable: FluidKindId,
        actor: DrinkerId,
    ) -> Result<DrinkPreview, DrinkError> {
        match begin_drink(world, state, config, drinkable) {
            Ok(preview) => {
                self.animation.start();
                self.events.push(DrinkEvent::DrinkStarted { actor });
                Ok(preview)
            }
            Err(error) => {
                self.cancel.send(StopDrinking);
                self.events.push(DrinkEvent::DrinkRejected { actor, error });
                Err(error)
            }
        }
    }

    /// Authoritative commit. Success ends the animation normally; failure
    /// fires the cancellation signal.
    pub fn finish<T: ThirstSink, E: EffectSink>(
        &mut self,
        world: &mut World,
        state: &mut VesselState,
        config: &DrinkConfig,
        drinkable: FluidKindId,
        actor: DrinkerId,
        thirst_sink: &mut T,
        effects: &mut E,
    ) -> Result<DrinkOutcome, DrinkError> {
        match finish_drink(world, state, config, drinkable, actor, thirst_sink, effects) {
            Ok(outcome) => {
                self.animation.stop();
                self.events.push(DrinkEvent::Drank {
                    actor,
                    thirst: outcome.thirst,
                    quench: outcome.quench,
                    purity: outcome.purity,
                });
                Ok(outcome)
            }
            Err(error) => {
                self.cancel.send(StopDrinking);
                self.events.push(DrinkEvent::DrinkRejected { actor, error });
                Err(error)
            }
        }
    }

    /// The initiating side polling its mailbox. Returns whether a signal was
    /// consumed. Stopping an idle animation is a no-op.
    pub fn pump_local(&mut self) -> bool {
        match self.cancel.take() {
            Some(StopDrinking) => {
                self.animation.stop();
                true
            }
            None => false,
        }
    }

    /// Drain the feedback emitted so far.
    pub fn drain_events(&mut self) -> Vec<DrinkEvent> {
        std::mem::take(&mut self.events)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
