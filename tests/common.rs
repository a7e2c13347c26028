//! Test fixtures: an in-memory world engine, ledger, roster and presenter.
//! Tests own the mocks directly and pass them as `&mut dyn` seams.

use std::collections::{HashMap, HashSet};

use npckeeper::catalog::ConfigEntry;
use npckeeper::dispatch::MenuPresenter;
use npckeeper::errors::KeeperError;
use npckeeper::foodshop::{FoodItem, FoodShop};
use npckeeper::ledger::Ledger;
use npckeeper::processor::{Conversion, ProcessingStation};
use npckeeper::trader::{TagPrice, TradingPost};
use npckeeper::types::{ActorId, Category, Location};
use npckeeper::world::{PlayerRoster, WorldActor, WorldGateway};
use uuid::Uuid;

/// In-memory world engine: loaded worlds and live entities.
#[derive(Debug, Default)]
#[allow(dead_code)] // not every suite touches every mock
pub struct MockWorld {
    pub worlds: HashSet<String>,
    pub actors: HashMap<ActorId, WorldActor>,
}

#[allow(dead_code)]
impl MockWorld {
    pub fn with_worlds(worlds: &[&str]) -> Self {
        Self {
            worlds: worlds.iter().map(|w| w.to_string()).collect(),
            actors: HashMap::new(),
        }
    }

    /// Plant a live entity the registry does not know about, as survives
    /// a process restart.
    pub fn add_stray(&mut self, name: &str, location: Location, marker: bool) -> ActorId {
        let id = Uuid::new_v4();
        self.actors.insert(
            id,
            WorldActor {
                id,
                display_name: name.to_string(),
                location,
                service_marker: marker,
            },
        );
        id
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn name_of(&self, id: ActorId) -> Option<&str> {
        self.actors.get(&id).map(|a| a.display_name.as_str())
    }
}

impl WorldGateway for MockWorld {
    fn is_world_loaded(&self, world: &str) -> bool {
        self.worlds.contains(world)
    }

    fn spawn_actor(
        &mut self,
        display_name: &str,
        location: &Location,
    ) -> Result<ActorId, KeeperError> {
        if !self.worlds.contains(&location.world) {
            return Err(KeeperError::WorldNotLoaded(location.world.clone()));
        }
        let id = Uuid::new_v4();
        self.actors.insert(
            id,
            WorldActor {
                id,
                display_name: display_name.to_string(),
                location: location.clone(),
                service_marker: true,
            },
        );
        Ok(id)
    }

    fn despawn_actor(&mut self, id: ActorId) -> bool {
        self.actors.remove(&id).is_some()
    }

    fn rename_actor(&mut self, id: ActorId, display_name: &str) -> bool {
        match self.actors.get_mut(&id) {
            Some(actor) => {
                actor.display_name = display_name.to_string();
                true
            }
            None => false,
        }
    }

    fn live_actors(&self) -> Vec<WorldActor> {
        self.actors.values().cloned().collect()
    }
}

/// In-memory ledger with explicit failure knobs.
#[derive(Debug, Default)]
#[allow(dead_code)] // not every suite touches every mock
pub struct MockLedger {
    pub balances: HashMap<String, i64>,
    pub items: HashMap<(String, String), u32>,
    /// Per-player remaining carry slots; absent players have plenty.
    pub capacity: HashMap<String, u32>,
    /// Kinds whose `grant_items` fails even though `has_capacity` passed.
    pub fail_grant_kinds: HashSet<String>,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, player: &str, amount: i64) -> Self {
        self.balances.insert(player.to_string(), amount);
        self
    }

    pub fn with_items(mut self, player: &str, kind: &str, count: u32) -> Self {
        self.items
            .insert((player.to_string(), kind.to_string()), count);
        self
    }

    pub fn with_capacity(mut self, player: &str, slots: u32) -> Self {
        self.capacity.insert(player.to_string(), slots);
        self
    }

    /// Make hand-over of `kind` fail even though the capacity check passed.
    pub fn fail_granting(&mut self, kind: &str) {
        self.fail_grant_kinds.insert(kind.to_string());
    }

    pub fn balance(&self, player: &str) -> i64 {
        self.balances.get(player).copied().unwrap_or(0)
    }

    pub fn carried(&self, player: &str, kind: &str) -> u32 {
        self.items
            .get(&(player.to_string(), kind.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl Ledger for MockLedger {
    fn can_afford(&self, player: &str, amount: i64) -> bool {
        self.balance(player) >= amount
    }

    fn charge(&mut self, player: &str, amount: i64) -> bool {
        let balance = self.balance(player);
        if balance < amount {
            return false;
        }
        self.balances.insert(player.to_string(), balance - amount);
        true
    }

    fn credit(&mut self, player: &str, amount: i64) -> bool {
        let balance = self.balance(player);
        self.balances.insert(player.to_string(), balance + amount);
        true
    }

    fn has_capacity(&self, player: &str, item_count: u32) -> bool {
        self.capacity
            .get(player)
            .map_or(true, |slots| *slots >= item_count)
    }

    fn grant_items(&mut self, player: &str, kind: &str, count: u32) -> bool {
        if self.fail_grant_kinds.contains(kind) || !self.has_capacity(player, count) {
            return false;
        }
        if let Some(slots) = self.capacity.get_mut(player) {
            *slots -= count;
        }
        *self
            .items
            .entry((player.to_string(), kind.to_string()))
            .or_insert(0) += count;
        true
    }

    fn count_items(&self, player: &str, kind: &str) -> u32 {
        self.carried(player, kind)
    }

    fn take_items(&mut self, player: &str, kind: &str, count: u32) -> bool {
        let key = (player.to_string(), kind.to_string());
        match self.items.get_mut(&key) {
            Some(carried) if *carried >= count => {
                *carried -= count;
                if let Some(slots) = self.capacity.get_mut(player) {
                    *slots += count;
                }
                true
            }
            _ => false,
        }
    }
}

/// In-memory player roster.
#[derive(Debug, Default)]
#[allow(dead_code)] // not every suite touches every mock
pub struct MockRoster {
    pub online: HashSet<String>,
    pub locations: HashMap<String, Location>,
    pub tags: HashMap<String, String>,
}

#[allow(dead_code)]
impl MockRoster {
    pub fn with_player(mut self, player: &str, location: Location) -> Self {
        self.online.insert(player.to_string());
        self.locations.insert(player.to_string(), location);
        self
    }

    pub fn with_tag(mut self, player: &str, tag: &str) -> Self {
        self.tags.insert(player.to_string(), tag.to_string());
        self
    }

    pub fn disconnect(&mut self, player: &str) {
        self.online.remove(player);
        self.locations.remove(player);
    }
}

impl PlayerRoster for MockRoster {
    fn is_online(&self, player: &str) -> bool {
        self.online.contains(player)
    }

    fn location(&self, player: &str) -> Option<Location> {
        if !self.is_online(player) {
            return None;
        }
        self.locations.get(player).cloned()
    }

    fn client_tag(&self, player: &str) -> Option<String> {
        self.tags.get(player).cloned()
    }
}

/// Records every menu open for assertions.
#[derive(Debug, Default)]
#[allow(dead_code)] // not every suite touches every mock
pub struct MockPresenter {
    pub opened: Vec<(String, Category, String)>,
}

impl MenuPresenter for MockPresenter {
    fn open_menu(&mut self, player: &str, category: Category, config_id: &str) {
        self.opened
            .push((player.to_string(), category, config_id.to_string()));
    }
}

// ============================================================================
// Entry builders
// ============================================================================

#[allow(dead_code)]
pub fn trader_entry(
    config_id: &str,
    name: &str,
    location: Location,
    accepted_tags: &[&str],
    prices: &[(&str, &str, i64)],
) -> ConfigEntry<TradingPost> {
    let mut payload = TradingPost {
        accepted_tags: accepted_tags.iter().map(|t| t.to_string()).collect(),
        ..TradingPost::default()
    };
    for (kind, tag, price) in prices {
        payload
            .prices
            .entry(kind.to_string())
            .or_default()
            .push(TagPrice {
                tag: tag.to_string(),
                unit_price: *price,
            });
    }
    ConfigEntry {
        config_id: config_id.to_string(),
        display_name: name.to_string(),
        location,
        payload,
    }
}

#[allow(dead_code)]
pub fn food_entry(
    config_id: &str,
    name: &str,
    location: Location,
    menu: &[(&str, i64, u32, u32)],
) -> ConfigEntry<FoodShop> {
    let mut payload = FoodShop::default();
    for (kind, price, stock, limit) in menu {
        payload.menu.insert(
            kind.to_string(),
            FoodItem {
                unit_price: *price,
                daily_stock: *stock,
                per_player_daily_limit: *limit,
            },
        );
    }
    ConfigEntry {
        config_id: config_id.to_string(),
        display_name: name.to_string(),
        location,
        payload,
    }
}

#[allow(dead_code)]
pub fn processor_entry(
    config_id: &str,
    name: &str,
    location: Location,
    conversions: &[(&str, &str, u32)],
    fees: &[(&str, i64)],
) -> ConfigEntry<ProcessingStation> {
    let mut payload = ProcessingStation::default();
    for (raw, refined, yield_per_unit) in conversions {
        payload.conversions.insert(
            raw.to_string(),
            Conversion {
                refined_kind: refined.to_string(),
                yield_per_unit: *yield_per_unit,
            },
        );
    }
    for (tag, fee) in fees {
        payload.fees.insert(tag.to_string(), *fee);
    }
    ConfigEntry {
        config_id: config_id.to_string(),
        display_name: name.to_string(),
        location,
        payload,
    }
}

/// Standard overworld test location.
#[allow(dead_code)]
pub fn loc(x: f64, z: f64) -> Location {
    Location::new("overworld", x, 64.0, z)
}
