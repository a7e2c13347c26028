//! Interaction dispatch: routing a player's contact with a live actor to
//! the bound service, under business-hours, session and eligibility gates.
//!
//! Opening a menu is deferred by a short delay so the contact event can
//! settle. The wake-up re-validates everything it captured — player still
//! online, still in range, hours still open — and aborts silently when the
//! world moved on, rather than presenting a stale menu.

use chrono::{DateTime, Duration, Timelike, Utc};
use log::{debug, error, warn};

use crate::catalog::Catalogs;
use crate::config::KeeperConfig;
use crate::errors::KeeperError;
use crate::ledger::Ledger;
use crate::logutil::clean_log;
use crate::metrics;
use crate::registry::ActorRegistry;
use crate::session::SessionTable;
use crate::trader::SaleReceipt;
use crate::types::{ActorId, Category, OpenHours};
use crate::world::PlayerRoster;

/// Presentation seam. Invoked only after every gate has passed and the
/// wake-up re-validation succeeded.
pub trait MenuPresenter {
    fn open_menu(&mut self, player: &str, category: Category, config_id: &str);
}

/// A menu open waiting for its settle delay. Carries identifiers only;
/// everything is re-resolved at wake-up.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMenu {
    pub player: String,
    pub actor: ActorId,
    pub category: Category,
    pub config_id: String,
    pub scheduled_at: DateTime<Utc>,
}

/// What a continuation contact did.
#[derive(Debug, Clone, PartialEq)]
pub enum ContinuationKind {
    /// Trading post: everything carried was sold in one pass.
    QuickSale { receipts: Vec<SaleReceipt>, total: i64 },
    /// Other categories resume their menu without the opening greeting.
    Resume,
}

/// Result of handling one contact event. The host renders messages and
/// hands `MenuScheduled` values to the menu scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Not a registered service actor; let default world behavior proceed.
    Ignored,
    /// Registered but unbound or erroring; service is degraded.
    Unavailable { message: String },
    /// Business-hours gate failed.
    Closed { message: String },
    /// Category eligibility gate failed; no session was created.
    NotEligible { message: String },
    /// A live session existed; the contact continued it.
    Continuation {
        category: Category,
        config_id: String,
        kind: ContinuationKind,
        message: String,
    },
    /// Fresh session created; the menu open is deferred.
    MenuScheduled(PendingMenu),
}

pub struct InteractionDispatcher {
    hours: [(Category, OpenHours); 4],
    session_timeout: Duration,
    interaction_range: f64,
}

impl InteractionDispatcher {
    pub fn new(config: &KeeperConfig) -> Self {
        Self {
            hours: [
                (Category::Bank, config.hours.bank),
                (Category::Trader, config.hours.trader),
                (Category::FoodVendor, config.hours.food_vendor),
                (Category::Processor, config.hours.processor),
            ],
            session_timeout: Duration::seconds(config.general.session_timeout_secs as i64),
            interaction_range: config.general.interaction_range,
        }
    }

    fn hours_for(&self, category: Category) -> OpenHours {
        self.hours
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, h)| *h)
            .unwrap_or(OpenHours::ALWAYS)
    }

    /// Business-hours gate, also usable by hosts that run category
    /// operations outside a contact event.
    pub fn ensure_open(&self, category: Category, now: DateTime<Utc>) -> Result<(), KeeperError> {
        if self.hours_for(category).contains(now.hour() as u8) {
            Ok(())
        } else {
            Err(KeeperError::OutsideBusinessHours)
        }
    }

    /// Handle a "player made contact with a live actor" event.
    pub fn handle_contact(
        &self,
        player: &str,
        actor: ActorId,
        registry: &ActorRegistry,
        catalogs: &Catalogs,
        sessions: &mut SessionTable,
        roster: &dyn PlayerRoster,
        ledger: &mut dyn Ledger,
        now: DateTime<Utc>,
    ) -> DispatchOutcome {
        let Some(record) = registry.lookup(actor) else {
            return DispatchOutcome::Ignored;
        };
        metrics::inc_contact();
        let category = record.category;

        // Resolve the bound catalog entry by reverse lookup. A registered
        // actor without a binding is a reconciliation gap.
        let Some(config_id) = Self::config_id_for(catalogs, category, actor) else {
            warn!(
                "dispatch: registered {} '{}' ({}) has no catalog binding",
                category,
                clean_log(&record.display_name),
                actor
            );
            return DispatchOutcome::Unavailable {
                message: format!("The {} is temporarily unavailable.", category),
            };
        };

        if self.ensure_open(category, now).is_err() {
            metrics::inc_gate_rejection();
            return DispatchOutcome::Closed {
                message: format!(
                    "The {} is closed ({}).",
                    category,
                    self.hours_for(category).describe()
                ),
            };
        }

        let tag = roster.client_tag(player);
        if sessions.is_live(player, category, actor, now, self.session_timeout) {
            sessions.touch(player, actor, category, now);
            return self.continue_session(player, tag.as_deref(), category, &config_id, catalogs, ledger);
        }

        // Eligibility gate, before any session exists.
        if category == Category::Trader {
            let accepted = catalogs
                .traders
                .get(&config_id)
                .map(|entry| entry.payload.accepts(tag.as_deref()))
                .unwrap_or(false);
            if !accepted {
                metrics::inc_gate_rejection();
                return DispatchOutcome::NotEligible {
                    message: match tag {
                        Some(t) => format!("This trading post does not serve the {} trade.", t),
                        None => "This trading post only serves tagged clients.".to_string(),
                    },
                };
            }
        }

        sessions.touch(player, actor, category, now);
        DispatchOutcome::MenuScheduled(PendingMenu {
            player: player.to_string(),
            actor,
            category,
            config_id,
            scheduled_at: now,
        })
    }

    fn config_id_for(catalogs: &Catalogs, category: Category, actor: ActorId) -> Option<String> {
        match category {
            Category::Bank => catalogs
                .banks
                .entry_for_actor(actor)
                .map(|e| e.config_id.clone()),
            Category::Trader => catalogs
                .traders
                .entry_for_actor(actor)
                .map(|e| e.config_id.clone()),
            Category::Processor => catalogs
                .processors
                .entry_for_actor(actor)
                .map(|e| e.config_id.clone()),
            Category::FoodVendor => catalogs
                .food_shops
                .entry_for_actor(actor)
                .map(|e| e.config_id.clone()),
        }
    }

    /// A live session existed: continue it instead of re-opening the
    /// initial menu. Handler failures never escape; they degrade into an
    /// unavailable message with full context in the log.
    fn continue_session(
        &self,
        player: &str,
        tag: Option<&str>,
        category: Category,
        config_id: &str,
        catalogs: &Catalogs,
        ledger: &mut dyn Ledger,
    ) -> DispatchOutcome {
        if category == Category::Trader {
            let Some(entry) = catalogs.traders.get(config_id) else {
                return DispatchOutcome::Unavailable {
                    message: format!("The {} is temporarily unavailable.", category),
                };
            };
            match entry.payload.quick_sell(player, tag, ledger) {
                Ok(receipts) => {
                    let total: i64 = receipts.iter().map(|r| r.total).sum();
                    let message = if receipts.is_empty() {
                        "Nothing to sell right now.".to_string()
                    } else {
                        let lines: Vec<String> = receipts
                            .iter()
                            .map(|r| format!("{}x{} for {}", r.count, r.kind, r.total))
                            .collect();
                        format!("Sold {} ({} total).", lines.join(", "), total)
                    };
                    DispatchOutcome::Continuation {
                        category,
                        config_id: config_id.to_string(),
                        kind: ContinuationKind::QuickSale { receipts, total },
                        message,
                    }
                }
                Err(KeeperError::NotAccepted) => DispatchOutcome::NotEligible {
                    message: "This trading post no longer serves you.".to_string(),
                },
                Err(err) => {
                    error!(
                        "dispatch: quick-sell failed for {} at {} '{}': {}",
                        player, category, config_id, err
                    );
                    DispatchOutcome::Unavailable {
                        message: format!("The {} is temporarily unavailable.", category),
                    }
                }
            }
        } else {
            DispatchOutcome::Continuation {
                category,
                config_id: config_id.to_string(),
                kind: ContinuationKind::Resume,
                message: String::new(),
            }
        }
    }

    /// Wake-up after the settle delay. Re-validates the captured state and
    /// opens the menu; any failed check aborts silently (logged).
    pub fn complete_open(
        &self,
        pending: &PendingMenu,
        registry: &ActorRegistry,
        roster: &dyn PlayerRoster,
        presenter: &mut dyn MenuPresenter,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(record) = registry.lookup(pending.actor) else {
            debug!("dispatch: wake-up aborted, actor {} gone", pending.actor);
            return false;
        };
        if record.category != pending.category {
            debug!("dispatch: wake-up aborted, actor {} changed category", pending.actor);
            return false;
        }
        if !roster.is_online(&pending.player) {
            debug!("dispatch: wake-up aborted, {} offline", pending.player);
            return false;
        }
        let in_range = roster
            .location(&pending.player)
            .and_then(|loc| loc.distance(&record.location))
            .is_some_and(|d| d <= self.interaction_range);
        if !in_range {
            debug!(
                "dispatch: wake-up aborted, {} out of range of {}",
                pending.player, pending.actor
            );
            return false;
        }
        if !self.hours_for(pending.category).contains(now.hour() as u8) {
            debug!(
                "dispatch: wake-up aborted, {} closed meanwhile",
                pending.category
            );
            return false;
        }
        presenter.open_menu(&pending.player, pending.category, &pending.config_id);
        metrics::inc_menu_opened();
        true
    }
}
