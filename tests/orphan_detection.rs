//! Orphan reporting and the explicit cleanup paths: reconcile never
//! destroys actors, the registry purge does, and only when asked.

mod common;

use chrono::{Duration, Utc};
use common::{loc, trader_entry, MockWorld};
use npckeeper::catalog::ServiceCatalog;
use npckeeper::reconcile::{reconcile, ORPHAN_GRACE_SECS};
use npckeeper::registry::ActorRegistry;
use npckeeper::trader::TradingPost;
use npckeeper::types::Category;

#[test]
fn unconfigured_actor_is_reported_never_deleted() {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();
    let mut catalog: ServiceCatalog<TradingPost> = ServiceCatalog::new();

    let orphan = registry
        .spawn(&mut world, Category::Trader, "Forgotten Stall", loc(80.0, 80.0))
        .unwrap();

    // Well past the creation grace window.
    let later = Utc::now() + Duration::seconds(ORPHAN_GRACE_SECS + 60);
    let report = reconcile(&[], &mut registry, &mut world, &mut catalog, later);

    assert_eq!(report.orphans, vec![orphan.id]);
    assert!(registry.contains(orphan.id), "reconcile must not remove actors");
    assert!(world.contains(orphan.id));
}

#[test]
fn recently_created_actor_is_not_flagged() {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();
    let mut catalog: ServiceCatalog<TradingPost> = ServiceCatalog::new();

    registry
        .spawn(&mut world, Category::Trader, "Fresh Stall", loc(80.0, 80.0))
        .unwrap();

    // Its config entry may simply not be saved yet.
    let report = reconcile(&[], &mut registry, &mut world, &mut catalog, Utc::now());
    assert!(report.orphans.is_empty());
}

#[test]
fn bound_actor_is_not_an_orphan() {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();
    let mut catalog: ServiceCatalog<TradingPost> = ServiceCatalog::new();
    let entries = vec![trader_entry("central", "Market", loc(10.0, 10.0), &[], &[])];
    registry
        .spawn(&mut world, Category::Trader, "Market", loc(10.0, 10.0))
        .unwrap();

    let later = Utc::now() + Duration::seconds(ORPHAN_GRACE_SECS + 60);
    let report = reconcile(&entries, &mut registry, &mut world, &mut catalog, later);

    assert_eq!(report.bound, 1);
    assert!(report.orphans.is_empty());
}

#[test]
fn purge_removes_marked_and_lookalike_strays_only() {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();

    // A registered actor, which the purge must not touch.
    let registered = registry
        .spawn(&mut world, Category::Trader, "Market", loc(0.0, 0.0))
        .unwrap();
    // Strays the registry never knew about: one with the legacy marker,
    // one overlapping a known name (markup aside), one unrelated.
    let marked = world.add_stray("Nameless Helper", loc(5.0, 0.0), true);
    let lookalike = world.add_stray("§6Market", loc(9.0, 0.0), false);
    let bystander = world.add_stray("Village Cat", loc(12.0, 0.0), false);

    let removed =
        registry.purge_unregistered_lookalikes(&mut world, &["Market".to_string()]);

    assert_eq!(removed, 2);
    assert!(world.contains(registered.id));
    assert!(!world.contains(marked));
    assert!(!world.contains(lookalike));
    assert!(world.contains(bystander));
}

#[test]
fn registry_remove_is_idempotent() {
    let mut world = MockWorld::with_worlds(&["overworld"]);
    let mut registry = ActorRegistry::new();
    let record = registry
        .spawn(&mut world, Category::Bank, "Teller", loc(0.0, 0.0))
        .unwrap();

    assert!(registry.remove(&mut world, record.id));
    assert!(!registry.remove(&mut world, record.id));
    assert!(!world.contains(record.id));
}
