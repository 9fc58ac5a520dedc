//! Fluid sources and the probe that drains them.
//!
//! This crate carries everything between the vessel and its remote fluid:
//! spatial addressing ([`space`]), fluid stacks with optional purity tags
//! ([`stack`]), the capability adapter and its tank implementation
//! ([`handler`]), layered level-stepped reservoirs ([`reservoir`]), a
//! minimal in-memory world stand-in ([`world`]), and the source prober
//! ([`probe`]) that locates a handler behind a link and drains it without
//! over- or under-draining.
//!
//! # Design
//!
//! - A link resolves to at most one drainable block per probe call: direct
//!   capability, sided capability, or one level of relay delegation.
//! - Probing in [`handler::DrainMode::Simulate`] never mutates anything and
//!   is idempotent.
//! - Coarse handlers are handled by a doubling-increment search; the probe
//!   reports the granted and the removed volume separately so refunds can
//!   be exact.

pub mod handler;
pub mod probe;
pub mod reservoir;
pub mod space;
pub mod stack;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
