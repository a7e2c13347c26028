//! # Npckeeper - NPC Service Management for Persistent Game Worlds
//!
//! Npckeeper keeps a set of live, stateful world actors — bank desks,
//! trading posts, food shops, processing stations — consistent with a
//! declarative, file-backed configuration across process restarts, partial
//! edits, in-world tampering and runtime renames, without ever duplicating
//! actors or losing player-affecting state.
//!
//! ## Features
//!
//! - **Actor Registry**: the single authoritative table of live service
//!   actors; all creation and destruction flows through it.
//! - **Reconciliation**: one three-phase matcher (identity cache, spatial
//!   fallback, normalized-name fallback) shared by all four categories,
//!   with orphan reporting and rename correction. Never spawns, never
//!   deletes.
//! - **Interaction Dispatch**: business-hours, session-cooldown and
//!   eligibility gates in front of every category handler; deferred menu
//!   opens re-validate at wake-up instead of trusting captured state.
//! - **Transactional Services**: every sale, purchase, deposit and
//!   processing run either fully completes or leaves balances, stock and
//!   counters untouched.
//! - **Durable Catalogs**: sled-backed persistence of bindings, price
//!   tables and daily counters, stitched back to the surviving world
//!   actors on startup.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use npckeeper::commands::{handle_admin_command, AdminContext};
//! use npckeeper::config::KeeperConfig;
//!
//! # async fn run(world: &mut dyn npckeeper::world::WorldGateway,
//! #              caller: npckeeper::types::Location) -> anyhow::Result<()> {
//! let config = KeeperConfig::load("keeper.toml").await?;
//! let mut registry = npckeeper::registry::ActorRegistry::new();
//! let mut catalogs = npckeeper::catalog::Catalogs::new();
//!
//! let mut ctx = AdminContext {
//!     registry: &mut registry,
//!     catalogs: &mut catalogs,
//!     store: None,
//!     config: &config,
//! };
//! for line in handle_admin_command(&mut ctx, world, &caller, "reconcile", chrono::Utc::now()) {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`registry`] - Live actor table and lookalike purge
//! - [`catalog`] - Per-category service catalogs and bindings
//! - [`reconcile`] - The config/world reconciliation pass
//! - [`dispatch`] - Contact handling, gates and deferred menu opens
//! - [`session`] - Per-player interaction sessions and cooldowns
//! - [`bank`], [`trader`], [`processor`], [`foodshop`] - Category payloads
//!   and their transactional operations
//! - [`seeds`] - Configuration entry files
//! - [`storage`] - Sled-backed catalog persistence
//! - [`commands`] - Administrative command surface
//! - [`world`], [`ledger`] - Seams to the hosting engine and player ledger
//!
//! ## Concurrency
//!
//! The host's cooperative tick thread owns all registry, catalog and
//! session mutation; nothing here takes a lock. The only asynchrony is the
//! deferred menu scheduler in [`sched`], which hands inert wake-up values
//! back to the host for re-validation.

pub mod bank;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod foodshop;
pub mod ledger;
pub mod logutil;
pub mod metrics;
pub mod processor;
pub mod reconcile;
pub mod registry;
pub mod sched;
pub mod seeds;
pub mod session;
pub mod spatial;
pub mod storage;
pub mod trader;
pub mod types;
pub mod world;

pub use catalog::{CatalogEntry, Catalogs, ConfigEntry, ServiceCatalog, ServicePayload};
pub use dispatch::{DispatchOutcome, InteractionDispatcher, MenuPresenter, PendingMenu};
pub use errors::KeeperError;
pub use reconcile::{reconcile, ReconcileReport};
pub use registry::ActorRegistry;
pub use session::SessionTable;
pub use types::{ActorId, ActorRecord, Category, Location, OpenHours};
