//! Seams to the hosting world engine and player roster.
//!
//! The core never touches engine entities or player state directly; it goes
//! through these traits so the registry stays the single source of truth
//! for which live actors are service actors.

use crate::errors::KeeperError;
use crate::types::{ActorId, Location};

/// Snapshot of a live world entity as reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldActor {
    pub id: ActorId,
    pub display_name: String,
    pub location: Location,
    /// Legacy identification marker left on service actors by earlier
    /// releases. Only consulted by the explicit lookalike purge.
    pub service_marker: bool,
}

/// Mutating access to live actors in the world engine.
pub trait WorldGateway {
    /// Whether the named world is currently loaded.
    fn is_world_loaded(&self, world: &str) -> bool;

    /// Create a live actor; returns the engine-assigned identity.
    fn spawn_actor(&mut self, display_name: &str, location: &Location)
        -> Result<ActorId, KeeperError>;

    /// Destroy a live actor. Returns false if it was already gone.
    fn despawn_actor(&mut self, id: ActorId) -> bool;

    /// Update a live actor's display name. Returns false if it was gone.
    fn rename_actor(&mut self, id: ActorId, display_name: &str) -> bool;

    /// Enumerate every live actor the engine knows about, registered or
    /// not. Used only by the explicit lookalike purge; routine operation
    /// never scans the world.
    fn live_actors(&self) -> Vec<WorldActor>;
}

/// Read access to connected players.
pub trait PlayerRoster {
    fn is_online(&self, player: &str) -> bool;

    /// Current position, `None` when offline.
    fn location(&self, player: &str) -> Option<Location>;

    /// The player's client tag (profession), `None` for untagged players.
    fn client_tag(&self, player: &str) -> Option<String>;
}
