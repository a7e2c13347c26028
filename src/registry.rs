//! The actor registry: the single authoritative table of live service
//! actors.
//!
//! All creation and destruction of service actors flows through here. The
//! registry has no knowledge of configuration; binding config entries to
//! registered actors is reconciliation's job.

use std::collections::BTreeMap;
use std::collections::HashSet;

use log::{info, warn};

use crate::errors::KeeperError;
use crate::logutil::clean_log;
use crate::spatial::normalize_display_name;
use crate::types::{ActorId, ActorRecord, Category, Location};
use crate::world::WorldGateway;

/// In-memory table of live actors, keyed by engine identity.
///
/// BTreeMap keeps iteration deterministic, which keeps "first match wins"
/// reconciliation deterministic too.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    actors: BTreeMap<ActorId, ActorRecord>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a live actor and record it. Fails when the target world is not
    /// loaded; the engine assigns the identity.
    pub fn spawn(
        &mut self,
        world: &mut dyn WorldGateway,
        category: Category,
        display_name: &str,
        location: Location,
    ) -> Result<ActorRecord, KeeperError> {
        if !world.is_world_loaded(&location.world) {
            return Err(KeeperError::WorldNotLoaded(location.world));
        }
        let id = world.spawn_actor(display_name, &location)?;
        let record = ActorRecord::new(id, category, display_name, location);
        info!(
            "registry: spawned {} '{}' ({})",
            category,
            clean_log(display_name),
            id
        );
        self.actors.insert(id, record.clone());
        Ok(record)
    }

    /// Destroy a live actor and drop its record. Idempotent: removing an
    /// unknown id is a no-op returning false.
    pub fn remove(&mut self, world: &mut dyn WorldGateway, id: ActorId) -> bool {
        match self.actors.remove(&id) {
            Some(record) => {
                world.despawn_actor(id);
                info!(
                    "registry: removed {} '{}' ({})",
                    record.category,
                    clean_log(&record.display_name),
                    id
                );
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, id: ActorId) -> Option<&ActorRecord> {
        self.actors.get(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Snapshot of all registered actors of a category.
    pub fn list_by_category(&self, category: Category) -> Vec<ActorRecord> {
        self.actors
            .values()
            .filter(|a| a.category == category)
            .cloned()
            .collect()
    }

    /// Snapshot of every registered actor.
    pub fn list_all(&self) -> Vec<ActorRecord> {
        self.actors.values().cloned().collect()
    }

    /// Find a registered actor by normalized display name.
    pub fn find_by_name(&self, display_name: &str) -> Option<&ActorRecord> {
        let wanted = normalize_display_name(display_name);
        self.actors
            .values()
            .find(|a| normalize_display_name(&a.display_name) == wanted)
    }

    /// Rename a registered actor, in the engine and in the record.
    /// Returns false for unknown ids.
    pub fn rename(
        &mut self,
        world: &mut dyn WorldGateway,
        id: ActorId,
        display_name: &str,
    ) -> bool {
        match self.actors.get_mut(&id) {
            Some(record) => {
                world.rename_actor(id, display_name);
                record.display_name = display_name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Remove world actors that look like service actors but are absent
    /// from this table: they carry the legacy service marker, or their
    /// display name overlaps `known_display_names`.
    ///
    /// Actors can survive a process restart in the world while this table
    /// starts empty, so strays accumulate. Destructive and not reversible;
    /// run only on explicit administrative request. Returns the number of
    /// actors destroyed.
    pub fn purge_unregistered_lookalikes(
        &mut self,
        world: &mut dyn WorldGateway,
        known_display_names: &[String],
    ) -> usize {
        let known: HashSet<String> = known_display_names
            .iter()
            .map(|n| normalize_display_name(n))
            .collect();

        let mut removed = 0;
        for stray in world.live_actors() {
            if self.actors.contains_key(&stray.id) {
                continue;
            }
            let name_overlap = known.contains(&normalize_display_name(&stray.display_name));
            if stray.service_marker || name_overlap {
                if world.despawn_actor(stray.id) {
                    warn!(
                        "registry: purged unregistered lookalike '{}' ({}) at {}",
                        clean_log(&stray.display_name),
                        stray.id,
                        stray.location.describe()
                    );
                    removed += 1;
                }
            }
        }
        removed
    }
}
