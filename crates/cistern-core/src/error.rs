//! The expected, user-facing failure kinds of a drink transaction.
//!
//! None of these is fatal: the transaction aborts cleanly, any removed fluid
//! has already been refunded by the time the error is returned, and the
//! `Display` text is the message shown to the drinker.

/// Why a drink transaction was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DrinkError {
    /// Nothing drainable is reachable at the link (or the vessel is unbound).
    #[error("nothing drinkable is connected here")]
    NoSource,
    /// The linked region is not currently loaded.
    #[error("the linked source is out of range")]
    Unreachable,
    /// A source is present but has no drinkable content, or emptied between
    /// the simulated and the committed drain.
    #[error("the linked source is empty")]
    Empty,
    /// Stored energy is below the cost of even a single point.
    #[error("not enough charge to drink")]
    NoEnergy,
}
