//! Administrative command surface.
//!
//! Text commands in the host's console/chat idiom, producing reply lines:
//!
//! - `spawn <category> <display name>` — create an actor at the caller
//! - `remove <name or id>` — destroy one actor
//! - `list [category]` — enumerate registered actors with an index
//! - `reconcile [category]` — force a pass and report
//! - `purge <category> confirm` — destroy every actor of a category
//!
//! Spawning is the only way an actor comes into existence; reconcile never
//! does it on its own.

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::catalog::{Catalogs, ServiceCatalog, ServicePayload};
use crate::config::KeeperConfig;
use crate::errors::KeeperError;
use crate::reconcile::{reconcile, ReconcileReport};
use crate::registry::ActorRegistry;
use crate::seeds;
use crate::storage::CatalogStore;
use crate::types::{Category, Location};
use crate::world::WorldGateway;

/// Everything the command handlers operate on. Borrowed for the duration
/// of one command.
pub struct AdminContext<'a> {
    pub registry: &'a mut ActorRegistry,
    pub catalogs: &'a mut Catalogs,
    pub store: Option<&'a CatalogStore>,
    pub config: &'a KeeperConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    Spawn { category: Category, name: String },
    Remove { target: String },
    List { category: Option<Category> },
    Reconcile { category: Option<Category> },
    Purge { category: Category, confirmed: bool },
}

impl AdminCommand {
    /// Parse an operator command line.
    pub fn parse(input: &str) -> Result<AdminCommand, String> {
        let mut words = input.split_whitespace();
        let verb = words
            .next()
            .map(|w| w.to_ascii_lowercase())
            .ok_or_else(|| "empty command".to_string())?;
        match verb.as_str() {
            "spawn" => {
                let category = words
                    .next()
                    .and_then(Category::parse)
                    .ok_or_else(|| "usage: spawn <category> <display name>".to_string())?;
                let name = words.collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    return Err("usage: spawn <category> <display name>".to_string());
                }
                Ok(AdminCommand::Spawn { category, name })
            }
            "remove" => {
                let target = words.collect::<Vec<_>>().join(" ");
                if target.is_empty() {
                    return Err("usage: remove <name or id>".to_string());
                }
                Ok(AdminCommand::Remove { target })
            }
            "list" => Ok(AdminCommand::List {
                category: words.next().and_then(Category::parse),
            }),
            "reconcile" => Ok(AdminCommand::Reconcile {
                category: words.next().and_then(Category::parse),
            }),
            "purge" => {
                let category = words
                    .next()
                    .and_then(Category::parse)
                    .ok_or_else(|| "usage: purge <category> confirm".to_string())?;
                let confirmed = words.next().is_some_and(|w| w.eq_ignore_ascii_case("confirm"));
                Ok(AdminCommand::Purge {
                    category,
                    confirmed,
                })
            }
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// Execute one operator command and return the reply lines.
pub fn handle_admin_command(
    ctx: &mut AdminContext<'_>,
    world: &mut dyn WorldGateway,
    caller_location: &Location,
    input: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    let command = match AdminCommand::parse(input) {
        Ok(command) => command,
        Err(usage) => return vec![usage],
    };
    match command {
        AdminCommand::Spawn { category, name } => spawn(ctx, world, category, &name, caller_location),
        AdminCommand::Remove { target } => remove(ctx, world, &target),
        AdminCommand::List { category } => list(ctx, category),
        AdminCommand::Reconcile { category } => run_reconcile(ctx, world, category, now),
        AdminCommand::Purge {
            category,
            confirmed,
        } => purge(ctx, world, category, confirmed),
    }
}

fn spawn(
    ctx: &mut AdminContext<'_>,
    world: &mut dyn WorldGateway,
    category: Category,
    name: &str,
    location: &Location,
) -> Vec<String> {
    if ctx.catalogs.uses_display_name(name) {
        return vec![format!(
            "Refused: {}.",
            KeeperError::DuplicateName(name.to_string())
        )];
    }
    match ctx
        .registry
        .spawn(world, category, name, location.clone())
    {
        Ok(record) => vec![format!(
            "Spawned {} '{}' ({}) at {}.",
            category,
            record.display_name,
            record.id,
            record.location.describe()
        )],
        Err(KeeperError::WorldNotLoaded(w)) => {
            vec![format!("Cannot spawn: world '{}' is not loaded.", w)]
        }
        Err(err) => vec![format!("Spawn failed: {}", err)],
    }
}

fn remove(ctx: &mut AdminContext<'_>, world: &mut dyn WorldGateway, target: &str) -> Vec<String> {
    let id = match target.parse::<Uuid>() {
        Ok(id) => Some(id),
        Err(_) => ctx.registry.find_by_name(target).map(|rec| rec.id),
    };
    let Some(id) = id else {
        return vec![format!("No registered actor matches '{}'.", target)];
    };
    if ctx.registry.remove(world, id) {
        if let Some(category) = ctx.catalogs.unbind_actor(id) {
            info!("commands: unbound {} entry after removal of {}", category, id);
        }
        vec![format!("Removed actor {}.", id)]
    } else {
        vec![format!("Actor {} was not registered.", id)]
    }
}

fn list(ctx: &AdminContext<'_>, category: Option<Category>) -> Vec<String> {
    let actors = match category {
        Some(c) => ctx.registry.list_by_category(c),
        None => ctx.registry.list_all(),
    };
    if actors.is_empty() {
        return vec!["No registered actors.".to_string()];
    }
    let mut lines = Vec::with_capacity(actors.len());
    for (idx, actor) in actors.iter().enumerate() {
        let binding = match ctx.catalogs.category_of_actor(actor.id) {
            Some(_) => "bound",
            None => "unbound",
        };
        lines.push(format!(
            "{}. {} — {} @ {} [{}] ({})",
            idx + 1,
            actor.display_name,
            actor.category,
            actor.location.describe(),
            binding,
            actor.id
        ));
    }
    lines
}

fn run_reconcile(
    ctx: &mut AdminContext<'_>,
    world: &mut dyn WorldGateway,
    category: Option<Category>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let categories: Vec<Category> = match category {
        Some(c) => vec![c],
        None => Category::ALL.to_vec(),
    };
    let mut lines = Vec::new();
    for category in categories {
        match reconcile_category(ctx, world, category, now) {
            Ok(report) => lines.push(report.summary()),
            Err(err) => lines.push(format!("{}: reconcile failed: {}", category, err)),
        }
    }
    lines
}

/// Load one category's seed entries, reconcile, persist the catalog and
/// write corrected display names back to the seed file.
fn reconcile_category(
    ctx: &mut AdminContext<'_>,
    world: &mut dyn WorldGateway,
    category: Category,
    now: DateTime<Utc>,
) -> Result<ReconcileReport, KeeperError> {
    let seed_path = ctx.config.data.seed_path(category);
    match category {
        Category::Bank => {
            let entries = seeds::load_bank_entries(&seed_path)?;
            let report = reconcile(&entries, ctx.registry, world, &mut ctx.catalogs.banks, now);
            finish_pass(ctx.store, &ctx.catalogs.banks, &seed_path, ctx.registry, &report)?;
            Ok(report)
        }
        Category::Trader => {
            let entries = seeds::load_trader_entries(&seed_path)?;
            let report = reconcile(&entries, ctx.registry, world, &mut ctx.catalogs.traders, now);
            finish_pass(ctx.store, &ctx.catalogs.traders, &seed_path, ctx.registry, &report)?;
            Ok(report)
        }
        Category::Processor => {
            let entries = seeds::load_processor_entries(&seed_path)?;
            let report = reconcile(
                &entries,
                ctx.registry,
                world,
                &mut ctx.catalogs.processors,
                now,
            );
            finish_pass(
                ctx.store,
                &ctx.catalogs.processors,
                &seed_path,
                ctx.registry,
                &report,
            )?;
            Ok(report)
        }
        Category::FoodVendor => {
            let entries = seeds::load_food_entries(&seed_path)?;
            let report = reconcile(
                &entries,
                ctx.registry,
                world,
                &mut ctx.catalogs.food_shops,
                now,
            );
            finish_pass(
                ctx.store,
                &ctx.catalogs.food_shops,
                &seed_path,
                ctx.registry,
                &report,
            )?;
            Ok(report)
        }
    }
}

fn finish_pass<P: ServicePayload>(
    store: Option<&CatalogStore>,
    catalog: &ServiceCatalog<P>,
    seed_path: &std::path::Path,
    registry: &ActorRegistry,
    report: &ReconcileReport,
) -> Result<(), KeeperError> {
    if let Some(store) = store {
        store.save_catalog(catalog)?;
    }
    // Best-effort: keep the stored display names in step with what was
    // just deployed to the renamed actors.
    for id in &report.renamed {
        if let (Some(entry), Some(record)) = (catalog.entry_for_actor(*id), registry.lookup(*id)) {
            seeds::persist_display_name_best_effort(
                seed_path,
                &entry.config_id,
                &record.display_name,
            );
        }
    }
    Ok(())
}

fn purge(
    ctx: &mut AdminContext<'_>,
    world: &mut dyn WorldGateway,
    category: Category,
    confirmed: bool,
) -> Vec<String> {
    if !confirmed {
        return vec![format!(
            "This destroys every {} actor and cannot be undone. Repeat as 'purge {} confirm'.",
            category,
            match category {
                Category::Bank => "bank",
                Category::Trader => "trader",
                Category::FoodVendor => "food",
                Category::Processor => "processor",
            }
        )];
    }
    let mut destroyed = 0;
    for record in ctx.registry.list_by_category(category) {
        if ctx.registry.remove(world, record.id) {
            ctx.catalogs.unbind_actor(record.id);
            destroyed += 1;
        }
    }
    let known = ctx.catalogs.display_names();
    let strays = ctx.registry.purge_unregistered_lookalikes(world, &known);
    vec![format!(
        "Purged {} registered {} actor(s) and {} unregistered lookalike(s).",
        destroyed, category, strays
    )]
}
