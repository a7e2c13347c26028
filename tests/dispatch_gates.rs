//! Dispatcher gate ordering and the deferred-open re-validation.

mod common;

use chrono::{TimeZone, Utc};
use common::{loc, trader_entry, MockLedger, MockPresenter, MockRoster, MockWorld};
use npckeeper::catalog::Catalogs;
use npckeeper::config::KeeperConfig;
use npckeeper::dispatch::{DispatchOutcome, InteractionDispatcher, PendingMenu};
use npckeeper::reconcile::reconcile;
use npckeeper::registry::ActorRegistry;
use npckeeper::session::SessionTable;
use npckeeper::types::{Category, OpenHours};
use uuid::Uuid;

fn noon() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
}

#[test]
fn unregistered_actor_is_ignored() {
    let registry = ActorRegistry::new();
    let catalogs = Catalogs::new();
    let mut sessions = SessionTable::new();
    let roster = MockRoster::default().with_player("ada", loc(0.0, 0.0));
    let mut ledger = MockLedger::new();
    let dispatcher = InteractionDispatcher::new(&KeeperConfig::default());

    let outcome = dispatcher.handle_contact(
        "ada",
        Uuid::new_v4(),
        &registry,
        &catalogs,
        &mut sessions,
        &roster,
        &mut ledger,
        noon(),
    );
    assert_eq!(outcome, DispatchOutcome::Ignored);
}

#[test]
fn registered_but_unbound_actor_is_unavailable() {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();
    let catalogs = Catalogs::new();
    let mut sessions = SessionTable::new();
    let roster = MockRoster::default().with_player("ada", loc(0.0, 0.0));
    let mut ledger = MockLedger::new();
    let dispatcher = InteractionDispatcher::new(&KeeperConfig::default());

    // Spawned but never reconciled against any config entry.
    let record = registry
        .spawn(&mut world, Category::Trader, "Market", loc(0.0, 0.0))
        .unwrap();

    let outcome = dispatcher.handle_contact(
        "ada",
        record.id,
        &registry,
        &catalogs,
        &mut sessions,
        &roster,
        &mut ledger,
        noon(),
    );
    assert!(matches!(outcome, DispatchOutcome::Unavailable { .. }));
    assert!(sessions.is_empty());
}

fn bound_trader(
    accepted_tags: &[&str],
    hours: OpenHours,
) -> (
    ActorRegistry,
    Catalogs,
    InteractionDispatcher,
    npckeeper::types::ActorId,
) {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();
    let mut catalogs = Catalogs::new();
    let entries = vec![trader_entry(
        "central",
        "Market",
        loc(10.0, 10.0),
        accepted_tags,
        &[("ore", "*", 10)],
    )];
    registry
        .spawn(&mut world, Category::Trader, "Market", loc(10.0, 10.0))
        .unwrap();
    reconcile(
        &entries,
        &mut registry,
        &mut world,
        &mut catalogs.traders,
        Utc::now(),
    );
    let actor = catalogs.traders.get("central").unwrap().bound_actor.unwrap();

    let mut config = KeeperConfig::default();
    config.hours.trader = hours;
    let dispatcher = InteractionDispatcher::new(&config);
    (registry, catalogs, dispatcher, actor)
}

#[test]
fn closed_hours_stop_the_contact() {
    // Overnight window spanning midnight: 22:00-08:00.
    let (registry, catalogs, dispatcher, actor) = bound_trader(&[], OpenHours::new(22, 8));
    let mut sessions = SessionTable::new();
    let roster = MockRoster::default().with_player("ada", loc(11.0, 10.0));
    let mut ledger = MockLedger::new();

    let at_noon = dispatcher.handle_contact(
        "ada",
        actor,
        &registry,
        &catalogs,
        &mut sessions,
        &roster,
        &mut ledger,
        noon(),
    );
    assert!(matches!(at_noon, DispatchOutcome::Closed { .. }));
    assert!(sessions.is_empty());

    let at_night = dispatcher.handle_contact(
        "ada",
        actor,
        &registry,
        &catalogs,
        &mut sessions,
        &roster,
        &mut ledger,
        Utc.with_ymd_and_hms(2024, 3, 4, 23, 30, 0).unwrap(),
    );
    assert!(matches!(at_night, DispatchOutcome::MenuScheduled(_)));
}

#[test]
fn ineligible_player_gets_no_session() {
    let (registry, catalogs, dispatcher, actor) = bound_trader(&["miner"], OpenHours::ALWAYS);
    let mut sessions = SessionTable::new();
    // Untagged player against a tag-restricted post.
    let roster = MockRoster::default().with_player("ada", loc(11.0, 10.0));
    let mut ledger = MockLedger::new();

    let outcome = dispatcher.handle_contact(
        "ada",
        actor,
        &registry,
        &catalogs,
        &mut sessions,
        &roster,
        &mut ledger,
        noon(),
    );
    assert!(matches!(outcome, DispatchOutcome::NotEligible { .. }));
    assert!(sessions.is_empty());

    // A properly tagged player passes the same gate.
    let tagged = MockRoster::default()
        .with_player("bob", loc(11.0, 10.0))
        .with_tag("bob", "miner");
    let outcome = dispatcher.handle_contact(
        "bob",
        actor,
        &registry,
        &catalogs,
        &mut sessions,
        &tagged,
        &mut ledger,
        noon(),
    );
    assert!(matches!(outcome, DispatchOutcome::MenuScheduled(_)));
    assert_eq!(sessions.len(), 1);
}

#[test]
fn wake_up_revalidates_before_presenting() {
    let (registry, catalogs, dispatcher, actor) = bound_trader(&[], OpenHours::new(8, 20));
    let mut sessions = SessionTable::new();
    let mut roster = MockRoster::default().with_player("ada", loc(11.0, 10.0));
    let mut ledger = MockLedger::new();
    let mut presenter = MockPresenter::default();

    let pending = match dispatcher.handle_contact(
        "ada",
        actor,
        &registry,
        &catalogs,
        &mut sessions,
        &roster,
        &mut ledger,
        noon(),
    ) {
        DispatchOutcome::MenuScheduled(pending) => pending,
        other => panic!("expected scheduled menu, got {:?}", other),
    };

    // Happy path: everything still valid at wake-up.
    assert!(dispatcher.complete_open(&pending, &registry, &roster, &mut presenter, noon()));
    assert_eq!(
        presenter.opened,
        vec![("ada".to_string(), Category::Trader, "central".to_string())]
    );

    // Player wandered out of interaction range meanwhile.
    roster.locations.insert("ada".to_string(), loc(200.0, 10.0));
    assert!(!dispatcher.complete_open(&pending, &registry, &roster, &mut presenter, noon()));

    // Player disconnected meanwhile.
    roster.disconnect("ada");
    assert!(!dispatcher.complete_open(&pending, &registry, &roster, &mut presenter, noon()));
    assert_eq!(presenter.opened.len(), 1);
}

#[test]
fn wake_up_aborts_when_hours_closed_meanwhile() {
    let (registry, catalogs, dispatcher, actor) = bound_trader(&[], OpenHours::new(8, 20));
    let mut sessions = SessionTable::new();
    let roster = MockRoster::default().with_player("ada", loc(11.0, 10.0));
    let mut ledger = MockLedger::new();
    let mut presenter = MockPresenter::default();

    let almost_closing = Utc.with_ymd_and_hms(2024, 3, 4, 19, 59, 59).unwrap();
    let pending = match dispatcher.handle_contact(
        "ada",
        actor,
        &registry,
        &catalogs,
        &mut sessions,
        &roster,
        &mut ledger,
        almost_closing,
    ) {
        DispatchOutcome::MenuScheduled(pending) => pending,
        other => panic!("expected scheduled menu, got {:?}", other),
    };

    let after_closing = Utc.with_ymd_and_hms(2024, 3, 4, 20, 0, 1).unwrap();
    assert!(!dispatcher.complete_open(&pending, &registry, &roster, &mut presenter, after_closing));
    assert!(presenter.opened.is_empty());
}

#[test]
fn wake_up_aborts_when_actor_was_removed() {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();
    let dispatcher = InteractionDispatcher::new(&KeeperConfig::default());
    let roster = MockRoster::default().with_player("ada", loc(11.0, 10.0));
    let mut presenter = MockPresenter::default();

    let record = registry
        .spawn(&mut world, Category::Trader, "Market", loc(10.0, 10.0))
        .unwrap();
    let pending = PendingMenu {
        player: "ada".to_string(),
        actor: record.id,
        category: Category::Trader,
        config_id: "central".to_string(),
        scheduled_at: noon(),
    };
    registry.remove(&mut world, record.id);

    assert!(!dispatcher.complete_open(&pending, &registry, &roster, &mut presenter, noon()));
    assert!(presenter.opened.is_empty());
}
