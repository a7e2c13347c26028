//! Sled-backed persistence for catalog state.
//!
//! Bindings (the identity cache), price tables, stock and daily counters
//! survive process restarts here, while live actors survive in the world;
//! reconciliation stitches the two back together on startup. One tree per
//! category; values are bincode with a schema version checked on read.

use std::path::{Path, PathBuf};

use log::debug;

use crate::catalog::{CatalogEntry, ServiceCatalog, ServicePayload, CATALOG_SCHEMA_VERSION};
use crate::errors::KeeperError;
use crate::types::Category;

const TREE_BANKS: &str = "keeper_banks";
const TREE_TRADERS: &str = "keeper_traders";
const TREE_PROCESSORS: &str = "keeper_processors";
const TREE_FOOD: &str = "keeper_food";

/// Helper builder so tests can easily create throwaway stores with custom
/// paths.
pub struct CatalogStoreBuilder {
    path: PathBuf,
}

impl CatalogStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<CatalogStore, KeeperError> {
        CatalogStore::open(self.path)
    }
}

/// Durable home of the four service catalogs.
pub struct CatalogStore {
    _db: sled::Db,
    banks: sled::Tree,
    traders: sled::Tree,
    processors: sled::Tree,
    food: sled::Tree,
}

impl CatalogStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KeeperError> {
        let db = sled::open(path.as_ref())?;
        let banks = db.open_tree(TREE_BANKS)?;
        let traders = db.open_tree(TREE_TRADERS)?;
        let processors = db.open_tree(TREE_PROCESSORS)?;
        let food = db.open_tree(TREE_FOOD)?;
        Ok(Self {
            _db: db,
            banks,
            traders,
            processors,
            food,
        })
    }

    fn tree(&self, category: Category) -> &sled::Tree {
        match category {
            Category::Bank => &self.banks,
            Category::Trader => &self.traders,
            Category::Processor => &self.processors,
            Category::FoodVendor => &self.food,
        }
    }

    /// Persist one entry under its config id.
    pub fn save_entry<P: ServicePayload>(
        &self,
        entry: &CatalogEntry<P>,
    ) -> Result<(), KeeperError> {
        let bytes = bincode::serialize(entry)?;
        self.tree(P::CATEGORY)
            .insert(entry.config_id.as_bytes(), bytes)?;
        Ok(())
    }

    /// Remove one entry. Missing keys are a no-op.
    pub fn delete_entry(&self, category: Category, config_id: &str) -> Result<(), KeeperError> {
        self.tree(category).remove(config_id.as_bytes())?;
        Ok(())
    }

    /// Replace the persisted catalog of `P`'s category with `catalog`.
    pub fn save_catalog<P: ServicePayload>(
        &self,
        catalog: &ServiceCatalog<P>,
    ) -> Result<(), KeeperError> {
        let tree = self.tree(P::CATEGORY);
        tree.clear()?;
        for entry in catalog.iter() {
            tree.insert(entry.config_id.as_bytes(), bincode::serialize(entry)?)?;
        }
        tree.flush()?;
        debug!(
            "store: saved {} {} entr(ies)",
            catalog.len(),
            P::CATEGORY
        );
        Ok(())
    }

    /// Load the persisted catalog of `P`'s category.
    pub fn load_catalog<P: ServicePayload>(&self) -> Result<ServiceCatalog<P>, KeeperError> {
        let mut catalog = ServiceCatalog::new();
        for kv in self.tree(P::CATEGORY).iter() {
            let (_, value) = kv?;
            let entry: CatalogEntry<P> = bincode::deserialize(&value)?;
            if entry.schema_version != CATALOG_SCHEMA_VERSION {
                return Err(KeeperError::SchemaMismatch {
                    entity: "catalog entry",
                    expected: CATALOG_SCHEMA_VERSION,
                    found: entry.schema_version,
                });
            }
            catalog.insert(entry);
        }
        Ok(catalog)
    }

    pub fn flush(&self) -> Result<(), KeeperError> {
        self._db.flush()?;
        Ok(())
    }
}
