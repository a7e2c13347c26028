//! Configuration management for the keeper.
//!
//! TOML-backed, with full defaults so an empty file is a valid
//! configuration. Sections:
//!
//! - `[general]` — session timeout, menu-open settle delay, interaction range
//! - `[hours]` — per-category business hours (wrap-around aware)
//! - `[data]` — seed file locations and the catalog database directory
//!
//! ```toml
//! [general]
//! session_timeout_secs = 90
//! menu_open_delay_ms = 600
//! interaction_range = 6.0
//!
//! [hours.trader]
//! start = 8
//! end = 22
//!
//! [data]
//! data_dir = "data"
//! ```

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{Category, OpenHours};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeeperConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub hours: HoursConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Seconds of inactivity before an interaction session expires.
    pub session_timeout_secs: u64,
    /// Settle delay before a menu opens after contact.
    pub menu_open_delay_ms: u64,
    /// How far a player may stand from an actor when the menu opens.
    pub interaction_range: f64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            session_timeout_secs: 90,
            menu_open_delay_ms: 600,
            interaction_range: 6.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HoursConfig {
    #[serde(default)]
    pub bank: OpenHours,
    #[serde(default)]
    pub trader: OpenHours,
    #[serde(default)]
    pub food_vendor: OpenHours,
    #[serde(default)]
    pub processor: OpenHours,
}

impl HoursConfig {
    pub fn for_category(&self, category: Category) -> OpenHours {
        match category {
            Category::Bank => self.bank,
            Category::Trader => self.trader,
            Category::FoodVendor => self.food_vendor,
            Category::Processor => self.processor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root directory for seed files and the catalog database.
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl DataConfig {
    pub fn catalog_db_path(&self) -> PathBuf {
        self.data_dir.join("catalogs")
    }

    pub fn seed_path(&self, category: Category) -> PathBuf {
        let file = match category {
            Category::Bank => "banks.json",
            Category::Trader => "traders.json",
            Category::FoodVendor => "foodshops.json",
            Category::Processor => "processors.json",
        };
        self.data_dir.join("seeds").join(file)
    }
}

impl KeeperConfig {
    /// Load and validate configuration from a TOML file.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: KeeperConfig =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let hours = self.hours.for_category(category);
            if hours.start > 23 || hours.end > 23 {
                return Err(anyhow!(
                    "hours for {} out of range: {}..{}",
                    category,
                    hours.start,
                    hours.end
                ));
            }
        }
        if self.general.interaction_range <= 0.0 {
            return Err(anyhow!("interaction_range must be positive"));
        }
        if self.general.session_timeout_secs == 0 {
            return Err(anyhow!("session_timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn session_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.general.session_timeout_secs as i64)
    }

    pub fn menu_open_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.general.menu_open_delay_ms)
    }
}
