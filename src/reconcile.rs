//! Reconciliation: aligning a service catalog with the configuration
//! entries and the live actor registry.
//!
//! Matching runs in three phases per entry — identity cache, spatial
//! fallback, name fallback — and an entry that matches nothing stays
//! unbound with a warning. Reconciliation never spawns actors (spawning is
//! an explicit operator action; auto-spawning here would mask config/world
//! mismatches and duplicate actors that are merely unloaded) and never
//! deletes them: leftover live actors are reported as orphans for a
//! separate explicit cleanup.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::catalog::{CatalogEntry, ConfigEntry, ServiceCatalog, ServicePayload};
use crate::logutil::clean_log;
use crate::metrics;
use crate::registry::ActorRegistry;
use crate::spatial::SpatialIndex;
use crate::types::{ActorId, Category};
use crate::world::WorldGateway;

/// How close (world units, same world) a live actor must stand to a config
/// entry's location for the spatial fallback to bind it. Absorbs engine
/// rounding of actor coordinates.
pub const BIND_DISTANCE: f64 = 3.0;

/// Live actors created more recently than this are not reported as
/// orphans; a just-spawned actor's config entry may not be saved yet.
pub const ORPHAN_GRACE_SECS: i64 = 120;

/// Outcome of one reconcile pass over one category, for operator summaries
/// and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub category: Category,
    /// Entries bound to a live actor after this pass.
    pub bound: usize,
    /// Config ids no live actor could be matched to.
    pub unresolved: Vec<String>,
    /// Live actors of this category bound to no entry.
    pub orphans: Vec<ActorId>,
    /// Live actors renamed to match their config entry.
    pub renamed: Vec<ActorId>,
    /// Catalog entries dropped because their config entry disappeared.
    pub removed_entries: Vec<String>,
}

impl ReconcileReport {
    fn new(category: Category) -> Self {
        Self {
            category,
            bound: 0,
            unresolved: Vec::new(),
            orphans: Vec::new(),
            renamed: Vec::new(),
            removed_entries: Vec::new(),
        }
    }

    /// One-line operator summary.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} bound, {} unresolved, {} orphan(s), {} renamed",
            self.category,
            self.bound,
            self.unresolved.len(),
            self.orphans.len(),
            self.renamed.len()
        )
    }
}

/// Align `catalog` with `config` against the live actors in `registry`.
///
/// Idempotent: a second pass with no intervening change reproduces the
/// same bindings and renames nothing.
pub fn reconcile<P: ServicePayload>(
    config: &[ConfigEntry<P>],
    registry: &mut ActorRegistry,
    world: &mut dyn WorldGateway,
    catalog: &mut ServiceCatalog<P>,
    now: DateTime<Utc>,
) -> ReconcileReport {
    let mut report = ReconcileReport::new(P::CATEGORY);

    // Entries whose config entry disappeared are deletion fallout of an
    // explicit config edit; drop them. Their live actor, if any, will show
    // up below as an orphan.
    let config_ids: HashSet<&str> = config.iter().map(|e| e.config_id.as_str()).collect();
    for stale in catalog.config_ids() {
        if !config_ids.contains(stale.as_str()) {
            catalog.remove(&stale);
            info!("reconcile[{}]: dropped stale entry '{}'", P::CATEGORY, stale);
            report.removed_entries.push(stale);
        }
    }

    let live = registry.list_by_category(P::CATEGORY);
    let index = SpatialIndex::new(&live);
    let mut taken: HashSet<ActorId> = HashSet::new();

    for entry in config {
        let cached = catalog
            .get(&entry.config_id)
            .and_then(|existing| existing.bound_actor);

        // Refresh the catalog entry from configuration before matching.
        match catalog.get_mut(&entry.config_id) {
            Some(existing) => {
                existing.display_name = entry.display_name.clone();
                existing.location = entry.location.clone();
                existing.payload.absorb(entry.payload.clone());
            }
            None => catalog.insert(CatalogEntry::unbound(entry)),
        }

        // Phase 1: identity cache. Valid if the actor still exists, is the
        // right category, and no earlier entry claimed it.
        let mut matched: Option<ActorId> = None;
        if let Some(id) = cached {
            if !taken.contains(&id)
                && registry
                    .lookup(id)
                    .is_some_and(|rec| rec.category == P::CATEGORY)
            {
                matched = Some(id);
            }
        }

        // Phase 2: spatial fallback, first match wins.
        if matched.is_none() {
            if let Some(rec) = index.first_within(&entry.location, BIND_DISTANCE, &taken) {
                debug!(
                    "reconcile[{}]: '{}' matched spatially to {}",
                    P::CATEGORY, entry.config_id, rec.id
                );
                matched = Some(rec.id);
            }
        }

        // Phase 3: normalized-name fallback.
        if matched.is_none() {
            if let Some(rec) = index.named(&entry.display_name, &taken) {
                debug!(
                    "reconcile[{}]: '{}' matched by name to {}",
                    P::CATEGORY, entry.config_id, rec.id
                );
                matched = Some(rec.id);
            }
        }

        match matched {
            Some(id) => {
                taken.insert(id);
                if let Some(existing) = catalog.get_mut(&entry.config_id) {
                    existing.bound_actor = Some(id);
                }
                report.bound += 1;

                // Configuration is authoritative for naming: correct the
                // live actor when its exact name drifted.
                let live_name = registry.lookup(id).map(|rec| rec.display_name.clone());
                if live_name.as_deref() != Some(entry.display_name.as_str()) {
                    registry.rename(world, id, &entry.display_name);
                    info!(
                        "reconcile[{}]: renamed {} to '{}'",
                        P::CATEGORY,
                        id,
                        clean_log(&entry.display_name)
                    );
                    report.renamed.push(id);
                }
            }
            None => {
                if let Some(existing) = catalog.get_mut(&entry.config_id) {
                    existing.bound_actor = None;
                }
                warn!(
                    "reconcile[{}]: no live actor for entry '{}' ('{}' at {})",
                    P::CATEGORY,
                    entry.config_id,
                    clean_log(&entry.display_name),
                    entry.location.describe()
                );
                report.unresolved.push(entry.config_id.clone());
            }
        }
    }

    // Leftover live actors of this category are orphans, reported only.
    let grace = Duration::seconds(ORPHAN_GRACE_SECS);
    for rec in &live {
        if !taken.contains(&rec.id) && now - rec.created_at > grace {
            report.orphans.push(rec.id);
        }
    }
    if !report.orphans.is_empty() {
        warn!(
            "reconcile[{}]: {} orphan actor(s) need operator attention",
            P::CATEGORY,
            report.orphans.len()
        );
    }

    metrics::record_reconcile(report.bound, report.unresolved.len(), report.orphans.len());
    report
}
