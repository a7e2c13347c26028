//! Food shop service points: fixed daily stock per item and a per-player
//! per-item daily purchase ceiling, both resetting once per calendar day.
//!
//! The reset is lazy: the first operation on a new (UTC) day clears the
//! counters, so no midnight timer is needed.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::ServicePayload;
use crate::errors::KeeperError;
use crate::ledger::Ledger;
use crate::types::Category;

/// Menu row: price and daily quotas for one item kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub unit_price: i64,
    /// Total units the shop sells per calendar day.
    pub daily_stock: u32,
    /// Units a single player may buy per calendar day.
    pub per_player_daily_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodShop {
    #[serde(default)]
    pub menu: BTreeMap<String, FoodItem>,
    /// Calendar day the counters below belong to.
    #[serde(default)]
    pub counter_date: NaiveDate,
    /// Remaining shop stock today; items absent are at full daily stock.
    #[serde(default)]
    pub remaining: BTreeMap<String, u32>,
    /// Units bought today, player → item → count.
    #[serde(default)]
    pub purchases: BTreeMap<String, BTreeMap<String, u32>>,
}

impl ServicePayload for FoodShop {
    const CATEGORY: Category = Category::FoodVendor;

    /// Configuration replaces the menu; the day's counters survive the
    /// reconcile pass.
    fn absorb(&mut self, incoming: Self) {
        self.menu = incoming.menu;
    }
}

/// Outcome of a completed purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub kind: String,
    pub count: u32,
    pub unit_price: i64,
    pub total: i64,
}

impl FoodShop {
    /// Reset stock and per-player counters when the calendar day changed.
    pub fn roll_day(&mut self, today: NaiveDate) {
        if today != self.counter_date {
            self.remaining.clear();
            self.purchases.clear();
            self.counter_date = today;
        }
    }

    /// Shop stock left for `kind` today.
    pub fn stock_remaining(&self, kind: &str) -> u32 {
        match self.menu.get(kind) {
            Some(item) => self
                .remaining
                .get(kind)
                .copied()
                .unwrap_or(item.daily_stock),
            None => 0,
        }
    }

    /// Units `player` has bought of `kind` today.
    pub fn bought_today(&self, player: &str, kind: &str) -> u32 {
        self.purchases
            .get(player)
            .and_then(|per_item| per_item.get(kind))
            .copied()
            .unwrap_or(0)
    }

    /// Buy `count` units of `kind`. Fully succeeds (payment deducted,
    /// stock and counters moved, goods granted) or changes nothing.
    pub fn purchase(
        &mut self,
        player: &str,
        kind: &str,
        count: u32,
        today: NaiveDate,
        ledger: &mut dyn Ledger,
    ) -> Result<PurchaseReceipt, KeeperError> {
        self.roll_day(today);

        let item = self
            .menu
            .get(kind)
            .ok_or_else(|| KeeperError::NotTraded(kind.to_string()))?
            .clone();
        if count == 0 {
            return Err(KeeperError::InvalidAmount(0));
        }
        if self.stock_remaining(kind) < count {
            return Err(KeeperError::OutOfStock);
        }
        if self.bought_today(player, kind) + count > item.per_player_daily_limit {
            return Err(KeeperError::DailyLimitExceeded);
        }
        let total = item
            .unit_price
            .checked_mul(count as i64)
            .ok_or_else(|| KeeperError::Internal("purchase total overflow".to_string()))?;
        if !ledger.can_afford(player, total) {
            return Err(KeeperError::InsufficientFunds);
        }
        if !ledger.has_capacity(player, count) {
            return Err(KeeperError::NoCapacity);
        }

        if !ledger.charge(player, total) {
            return Err(KeeperError::InsufficientFunds);
        }
        if !ledger.grant_items(player, kind, count) {
            // Delivery failed; refund before anything else moves.
            ledger.credit(player, total);
            return Err(KeeperError::NoCapacity);
        }

        let left = self.stock_remaining(kind) - count;
        self.remaining.insert(kind.to_string(), left);
        *self
            .purchases
            .entry(player.to_string())
            .or_default()
            .entry(kind.to_string())
            .or_insert(0) += count;

        debug!(
            "foodshop: {} bought {}x{} for {} ({} left today)",
            player, count, kind, total, left
        );
        Ok(PurchaseReceipt {
            kind: kind.to_string(),
            count,
            unit_price: item.unit_price,
            total,
        })
    }
}
