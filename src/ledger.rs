//! Seam to the persistent player ledger.
//!
//! The core never reads a balance directly; every transactional operation
//! in the category modules is expressed through this interface so payment
//! and goods movement can be rolled back symmetrically.

pub trait Ledger {
    /// Whether the player could pay `amount` right now.
    fn can_afford(&self, player: &str, amount: i64) -> bool;

    /// Deduct `amount` from the player. Returns false (and changes nothing)
    /// when the funds are not there.
    fn charge(&mut self, player: &str, amount: i64) -> bool;

    /// Add `amount` to the player.
    fn credit(&mut self, player: &str, amount: i64) -> bool;

    /// Whether the player can receive `item_count` more items.
    fn has_capacity(&self, player: &str, item_count: u32) -> bool;

    /// Hand `count` items of `kind` to the player. Returns false (and
    /// changes nothing) when they cannot be received.
    fn grant_items(&mut self, player: &str, kind: &str, count: u32) -> bool;

    /// How many items of `kind` the player currently carries.
    fn count_items(&self, player: &str, kind: &str) -> u32;

    /// Remove `count` items of `kind` from the player. Returns false (and
    /// changes nothing) when they are not all there.
    fn take_items(&mut self, player: &str, kind: &str, count: u32) -> bool;
}
