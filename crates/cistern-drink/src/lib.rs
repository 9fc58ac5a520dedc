//! The drink transaction core.
//!
//! A vessel is bound to a remote fluid source and pays for every restored
//! thirst/quench point out of its stored energy. This crate owns the
//! per-vessel persisted state ([`state`]), the energy store ([`energy`]),
//! the transaction engine ([`engine`]), the purity resolver ([`purity`]),
//! the resource-subsystem adapter ([`sink`]), and the optimistic-animation
//! feedback channel ([`session`]).
//!
//! # Transaction shape
//!
//! `START -> LOCATE -> SIMULATE_DRAIN -> CHECK_ENERGY` is the authoritative
//! pre-flight ([`engine::begin_drink`]) run before the drinking animation
//! starts, so a doomed request is rejected before any feedback plays.
//! `COMMIT_DRAIN -> SETTLE_ENERGY -> DONE` is the commit
//! ([`engine::finish_drink`]), which re-resolves the real target, drains,
//! reserves energy, rations points when the budget falls short, and refunds
//! the fluid exactly when not even one point is payable. A failed or partial
//! transaction never leaves fluid unpaid for or energy spent without points.

pub mod energy;
pub mod engine;
pub mod purity;
pub mod session;
pub mod sink;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
