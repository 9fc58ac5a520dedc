//! Cistern Core -- shared leaf types for the remote-drinking vessel.
//!
//! This crate provides the identifiers, conversion math, purity tiers,
//! configuration surface, and error taxonomy that the rest of the Cistern
//! workspace depends on. Everything here is pure data and pure functions;
//! the world model lives in `cistern-fluid` and the transaction engine in
//! `cistern-drink`.
//!
//! # Key Types
//!
//! - [`id::DrinkerId`] -- handle for the actor receiving a drink.
//! - [`convert`] -- volume-to-points rounding and energy cost math.
//! - [`purity::Purity`] -- ordered fluid quality tiers driving point scaling
//!   and timed debuffs.
//! - [`config::DrinkConfig`] -- the eight configured scalars, with range
//!   validation and RON/TOML/JSON file loading.
//! - [`error::DrinkError`] -- the four expected, user-facing failure kinds.

pub mod config;
pub mod convert;
pub mod error;
pub mod id;
pub mod purity;
