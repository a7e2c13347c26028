//! Seed loaders for the per-category configuration entry files.
//!
//! Each category reads a JSON array from its own file so operators can
//! edit service points without recompiling. Entries are deserialized one
//! by one: a malformed entry is skipped with a warning and the rest of the
//! file still loads. The only write-back the core ever performs is the
//! best-effort display-name correction after a rename.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::bank::BankDesk;
use crate::catalog::ConfigEntry;
use crate::errors::KeeperError;
use crate::foodshop::{FoodItem, FoodShop};
use crate::processor::{Conversion, ProcessingStation};
use crate::trader::{TagPrice, TradingPost};
use crate::types::Location;

fn read_seed_values(path: &Path) -> Result<Vec<serde_json::Value>, KeeperError> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        KeeperError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse {}: {}", path.display(), e),
        ))
    })
}

/// Parse each array element on its own, skipping (and logging) the broken
/// ones so a single bad entry cannot take the whole category down.
fn parse_each<S: serde::de::DeserializeOwned>(
    path: &Path,
    values: Vec<serde_json::Value>,
) -> Vec<S> {
    let mut seeds = Vec::new();
    for value in values {
        match serde_json::from_value::<S>(value) {
            Ok(seed) => seeds.push(seed),
            Err(e) => warn!("seeds: skipping malformed entry in {}: {}", path.display(), e),
        }
    }
    seeds
}

/// Location and identity fields shared by every seed entry.
trait SeedCommon {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn world(&self) -> &str;

    fn check(&self) -> Result<(), KeeperError> {
        let entry = if self.id().trim().is_empty() {
            self.name().to_string()
        } else {
            self.id().to_string()
        };
        if self.id().trim().is_empty() {
            return Err(KeeperError::ConfigurationIncomplete { entry, field: "id" });
        }
        if self.name().trim().is_empty() {
            return Err(KeeperError::ConfigurationIncomplete { entry, field: "name" });
        }
        if self.world().trim().is_empty() {
            return Err(KeeperError::ConfigurationIncomplete { entry, field: "world" });
        }
        Ok(())
    }
}

fn keep_valid<S: SeedCommon>(path: &Path, seeds: Vec<S>) -> Vec<S> {
    seeds
        .into_iter()
        .filter(|seed| match seed.check() {
            Ok(()) => true,
            Err(err) => {
                warn!("seeds: skipping entry in {}: {}", path.display(), err);
                false
            }
        })
        .collect()
}

// ============================================================================
// Seed data structures matching the JSON format
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct BankSeed {
    id: String,
    name: String,
    world: String,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    yaw: f32,
    #[serde(default)]
    pitch: f32,
    #[serde(default = "default_ceiling")]
    withdraw_ceiling: i64,
    #[serde(default = "default_ceiling")]
    deposit_ceiling: i64,
    #[serde(default)]
    greeting: String,
}

fn default_ceiling() -> i64 {
    10_000
}

#[derive(Debug, Serialize, Deserialize)]
struct TraderSeed {
    id: String,
    name: String,
    world: String,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    yaw: f32,
    #[serde(default)]
    pitch: f32,
    #[serde(default)]
    accepted_tags: Vec<String>,
    #[serde(default)]
    prices: BTreeMap<String, Vec<TagPrice>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProcessorSeed {
    id: String,
    name: String,
    world: String,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    yaw: f32,
    #[serde(default)]
    pitch: f32,
    #[serde(default)]
    conversions: BTreeMap<String, Conversion>,
    #[serde(default)]
    fees: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FoodSeed {
    id: String,
    name: String,
    world: String,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    yaw: f32,
    #[serde(default)]
    pitch: f32,
    #[serde(default)]
    menu: BTreeMap<String, FoodItem>,
}

macro_rules! impl_seed_common {
    ($seed:ty) => {
        impl SeedCommon for $seed {
            fn id(&self) -> &str {
                &self.id
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn world(&self) -> &str {
                &self.world
            }
        }
    };
}

impl_seed_common!(BankSeed);
impl_seed_common!(TraderSeed);
impl_seed_common!(ProcessorSeed);
impl_seed_common!(FoodSeed);

fn seed_location(world: &str, x: f64, y: f64, z: f64, yaw: f32, pitch: f32) -> Location {
    Location::new(world, x, y, z).with_facing(yaw, pitch)
}

// ============================================================================
// Loaders
// ============================================================================

/// Load bank desk entries from a JSON seed file.
pub fn load_bank_entries<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ConfigEntry<BankDesk>>, KeeperError> {
    let path = path.as_ref();
    let seeds: Vec<BankSeed> = keep_valid(path, parse_each(path, read_seed_values(path)?));
    Ok(seeds
        .into_iter()
        .map(|seed| ConfigEntry {
            config_id: seed.id,
            display_name: seed.name,
            location: seed_location(&seed.world, seed.x, seed.y, seed.z, seed.yaw, seed.pitch),
            payload: BankDesk {
                withdraw_ceiling: seed.withdraw_ceiling,
                deposit_ceiling: seed.deposit_ceiling,
                greeting: if seed.greeting.is_empty() {
                    BankDesk::default().greeting
                } else {
                    seed.greeting
                },
            },
        })
        .collect())
}

/// Load trading post entries from a JSON seed file.
pub fn load_trader_entries<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ConfigEntry<TradingPost>>, KeeperError> {
    let path = path.as_ref();
    let seeds: Vec<TraderSeed> = keep_valid(path, parse_each(path, read_seed_values(path)?));
    Ok(seeds
        .into_iter()
        .map(|seed| ConfigEntry {
            config_id: seed.id,
            display_name: seed.name,
            location: seed_location(&seed.world, seed.x, seed.y, seed.z, seed.yaw, seed.pitch),
            payload: TradingPost {
                accepted_tags: seed.accepted_tags,
                prices: seed.prices,
            },
        })
        .collect())
}

/// Load processing station entries from a JSON seed file.
pub fn load_processor_entries<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ConfigEntry<ProcessingStation>>, KeeperError> {
    let path = path.as_ref();
    let seeds: Vec<ProcessorSeed> = keep_valid(path, parse_each(path, read_seed_values(path)?));
    Ok(seeds
        .into_iter()
        .map(|seed| ConfigEntry {
            config_id: seed.id,
            display_name: seed.name,
            location: seed_location(&seed.world, seed.x, seed.y, seed.z, seed.yaw, seed.pitch),
            payload: ProcessingStation {
                conversions: seed.conversions,
                fees: seed.fees,
            },
        })
        .collect())
}

/// Load food shop entries from a JSON seed file.
pub fn load_food_entries<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ConfigEntry<FoodShop>>, KeeperError> {
    let path = path.as_ref();
    let seeds: Vec<FoodSeed> = keep_valid(path, parse_each(path, read_seed_values(path)?));
    Ok(seeds
        .into_iter()
        .map(|seed| ConfigEntry {
            config_id: seed.id,
            display_name: seed.name,
            location: seed_location(&seed.world, seed.x, seed.y, seed.z, seed.yaw, seed.pitch),
            payload: FoodShop {
                menu: seed.menu,
                ..FoodShop::default()
            },
        })
        .collect())
}

// ============================================================================
// Rename write-back
// ============================================================================

/// Rewrite the `name` field of the entry with `config_id` in a seed file.
pub fn persist_display_name<P: AsRef<Path>>(
    path: P,
    config_id: &str,
    display_name: &str,
) -> Result<(), KeeperError> {
    let path = path.as_ref();
    let mut values = read_seed_values(path)?;
    let mut changed = false;
    for value in values.iter_mut() {
        if value.get("id").and_then(|v| v.as_str()) == Some(config_id) {
            if let Some(object) = value.as_object_mut() {
                object.insert(
                    "name".to_string(),
                    serde_json::Value::String(display_name.to_string()),
                );
                changed = true;
            }
        }
    }
    if !changed {
        return Err(KeeperError::NotFound(config_id.to_string()));
    }
    let rendered = serde_json::to_string_pretty(&values)
        .map_err(|e| KeeperError::Internal(format!("render {}: {}", path.display(), e)))?;
    fs::write(path, rendered)?;
    Ok(())
}

/// Best-effort variant: a failed write-back is logged, never propagated.
pub fn persist_display_name_best_effort<P: AsRef<Path>>(
    path: P,
    config_id: &str,
    display_name: &str,
) {
    let path = path.as_ref();
    if let Err(err) = persist_display_name(path, config_id, display_name) {
        warn!(
            "seeds: could not persist rename of '{}' in {}: {}",
            config_id,
            path.display(),
            err
        );
    }
}
