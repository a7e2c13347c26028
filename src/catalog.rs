//! Service catalogs: the "desired state → bound live identity" tables.
//!
//! Each category keeps one catalog. An entry pairs a stable configuration
//! identifier with the category's business payload and, once reconciliation
//! has matched it, the identity of the live actor currently serving it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::bank::BankDesk;
use crate::foodshop::FoodShop;
use crate::processor::ProcessingStation;
use crate::trader::TradingPost;
use crate::types::{ActorId, Category, Location};

pub const CATALOG_SCHEMA_VERSION: u8 = 1;

/// Category-specific business data carried by a catalog entry.
pub trait ServicePayload: Clone + Serialize + DeserializeOwned {
    const CATEGORY: Category;

    /// Fold a freshly loaded configuration payload into the live payload.
    /// The default replaces wholesale; categories with runtime counters
    /// override this to preserve them across reconcile passes.
    fn absorb(&mut self, incoming: Self) {
        *self = incoming;
    }
}

/// A configuration entry as read from the seed files. Desired state only;
/// no binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry<P> {
    pub config_id: String,
    pub display_name: String,
    pub location: Location,
    pub payload: P,
}

/// One configured service point and its current live binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry<P> {
    pub config_id: String,
    pub display_name: String,
    pub location: Location,
    pub bound_actor: Option<ActorId>,
    pub payload: P,
    pub schema_version: u8,
}

impl<P: ServicePayload> CatalogEntry<P> {
    /// Fresh, unbound entry for a configuration entry seen for the first
    /// time.
    pub fn unbound(config: &ConfigEntry<P>) -> Self {
        Self {
            config_id: config.config_id.clone(),
            display_name: config.display_name.clone(),
            location: config.location.clone(),
            bound_actor: None,
            payload: config.payload.clone(),
            schema_version: CATALOG_SCHEMA_VERSION,
        }
    }
}

/// The catalog for one category, keyed by configuration identifier.
#[derive(Debug, Clone)]
pub struct ServiceCatalog<P> {
    entries: BTreeMap<String, CatalogEntry<P>>,
}

impl<P: ServicePayload> Default for ServiceCatalog<P> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<P: ServicePayload> ServiceCatalog<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Category {
        P::CATEGORY
    }

    pub fn insert(&mut self, entry: CatalogEntry<P>) {
        self.entries.insert(entry.config_id.clone(), entry);
    }

    pub fn remove(&mut self, config_id: &str) -> Option<CatalogEntry<P>> {
        self.entries.remove(config_id)
    }

    pub fn get(&self, config_id: &str) -> Option<&CatalogEntry<P>> {
        self.entries.get(config_id)
    }

    pub fn get_mut(&mut self, config_id: &str) -> Option<&mut CatalogEntry<P>> {
        self.entries.get_mut(config_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry<P>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config_ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Every live actor id currently bound by this catalog.
    pub fn bound_ids(&self) -> HashSet<ActorId> {
        self.entries
            .values()
            .filter_map(|e| e.bound_actor)
            .collect()
    }

    /// Reverse lookup: the entry served by a given live actor.
    pub fn entry_for_actor(&self, id: ActorId) -> Option<&CatalogEntry<P>> {
        self.entries.values().find(|e| e.bound_actor == Some(id))
    }

    pub fn entry_for_actor_mut(&mut self, id: ActorId) -> Option<&mut CatalogEntry<P>> {
        self.entries
            .values_mut()
            .find(|e| e.bound_actor == Some(id))
    }

    /// Whether any entry uses this exact display name. Used to refuse
    /// spawns that would make name-fallback matching ambiguous.
    pub fn uses_display_name(&self, display_name: &str) -> bool {
        self.entries
            .values()
            .any(|e| e.display_name == display_name)
    }

    pub fn display_names(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|e| e.display_name.clone())
            .collect()
    }
}

/// All four category catalogs, owned together by the host.
#[derive(Debug, Default)]
pub struct Catalogs {
    pub banks: ServiceCatalog<BankDesk>,
    pub traders: ServiceCatalog<TradingPost>,
    pub processors: ServiceCatalog<ProcessingStation>,
    pub food_shops: ServiceCatalog<FoodShop>,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Which category, if any, a live actor is currently bound under.
    pub fn category_of_actor(&self, id: ActorId) -> Option<Category> {
        if self.banks.entry_for_actor(id).is_some() {
            Some(Category::Bank)
        } else if self.traders.entry_for_actor(id).is_some() {
            Some(Category::Trader)
        } else if self.processors.entry_for_actor(id).is_some() {
            Some(Category::Processor)
        } else if self.food_shops.entry_for_actor(id).is_some() {
            Some(Category::FoodVendor)
        } else {
            None
        }
    }

    /// Clear the binding that points at a (removed) live actor, wherever
    /// it is. Returns the category it was bound under, if any.
    pub fn unbind_actor(&mut self, id: ActorId) -> Option<Category> {
        if let Some(entry) = self.banks.entry_for_actor_mut(id) {
            entry.bound_actor = None;
            return Some(Category::Bank);
        }
        if let Some(entry) = self.traders.entry_for_actor_mut(id) {
            entry.bound_actor = None;
            return Some(Category::Trader);
        }
        if let Some(entry) = self.processors.entry_for_actor_mut(id) {
            entry.bound_actor = None;
            return Some(Category::Processor);
        }
        if let Some(entry) = self.food_shops.entry_for_actor_mut(id) {
            entry.bound_actor = None;
            return Some(Category::FoodVendor);
        }
        None
    }

    /// Whether any catalog entry, in any category, uses this exact display
    /// name.
    pub fn uses_display_name(&self, display_name: &str) -> bool {
        self.banks.uses_display_name(display_name)
            || self.traders.uses_display_name(display_name)
            || self.processors.uses_display_name(display_name)
            || self.food_shops.uses_display_name(display_name)
    }

    /// Display names of every configured service point, for lookalike
    /// purges.
    pub fn display_names(&self) -> Vec<String> {
        let mut names = self.banks.display_names();
        names.extend(self.traders.display_names());
        names.extend(self.processors.display_names());
        names.extend(self.food_shops.display_names());
        names
    }
}
