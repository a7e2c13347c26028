//! Minimal metrics scaffolding: process-wide counters for operator
//! diagnostics. No exporter; hosts read snapshots.
use std::sync::atomic::{AtomicU64, Ordering};

static RECONCILE_PASSES: AtomicU64 = AtomicU64::new(0);
static ENTRIES_BOUND: AtomicU64 = AtomicU64::new(0);
static ENTRIES_UNRESOLVED: AtomicU64 = AtomicU64::new(0);
static ORPHANS_SEEN: AtomicU64 = AtomicU64::new(0);
static CONTACTS: AtomicU64 = AtomicU64::new(0);
static GATE_REJECTIONS: AtomicU64 = AtomicU64::new(0);
static MENUS_OPENED: AtomicU64 = AtomicU64::new(0);

pub fn record_reconcile(bound: usize, unresolved: usize, orphans: usize) {
    RECONCILE_PASSES.fetch_add(1, Ordering::Relaxed);
    ENTRIES_BOUND.fetch_add(bound as u64, Ordering::Relaxed);
    ENTRIES_UNRESOLVED.fetch_add(unresolved as u64, Ordering::Relaxed);
    ORPHANS_SEEN.fetch_add(orphans as u64, Ordering::Relaxed);
}

pub fn inc_contact() {
    CONTACTS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_gate_rejection() {
    GATE_REJECTIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_menu_opened() {
    MENUS_OPENED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reconcile_passes: u64,
    pub entries_bound: u64,
    pub entries_unresolved: u64,
    pub orphans_seen: u64,
    pub contacts: u64,
    pub gate_rejections: u64,
    pub menus_opened: u64,
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        reconcile_passes: RECONCILE_PASSES.load(Ordering::Relaxed),
        entries_bound: ENTRIES_BOUND.load(Ordering::Relaxed),
        entries_unresolved: ENTRIES_UNRESOLVED.load(Ordering::Relaxed),
        orphans_seen: ORPHANS_SEEN.load(Ordering::Relaxed),
        contacts: CONTACTS.load(Ordering::Relaxed),
        gate_rejections: GATE_REJECTIONS.load(Ordering::Relaxed),
        menus_opened: MENUS_OPENED.load(Ordering::Relaxed),
    }
}
