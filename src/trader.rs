//! Trading post service points.
//!
//! A trading post buys goods from players. Eligibility is governed by the
//! accepted client tags; an empty list or the `"*"` wildcard accepts every
//! player, including those with no tag at all. The effective unit price for
//! an item is the best (maximum) price among all offers applicable to the
//! player's tag.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::ServicePayload;
use crate::errors::KeeperError;
use crate::ledger::Ledger;
use crate::types::Category;

/// Accepted-tag entry that matches every client tag, tagged or not.
pub const WILDCARD_TAG: &str = "*";

/// One price offer: a unit price available to holders of `tag`
/// (or to everyone, when the tag is the wildcard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagPrice {
    pub tag: String,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingPost {
    /// Client tags served by this post. Empty, or containing the wildcard,
    /// means everyone is served.
    #[serde(default)]
    pub accepted_tags: Vec<String>,
    /// Offers per item kind.
    #[serde(default)]
    pub prices: BTreeMap<String, Vec<TagPrice>>,
}

impl ServicePayload for TradingPost {
    const CATEGORY: Category = Category::Trader;
}

/// Outcome of a completed sale, for player-facing receipts and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    pub kind: String,
    pub count: u32,
    pub unit_price: i64,
    pub total: i64,
}

impl TradingPost {
    /// Whether a player with the given client tag is served here.
    pub fn accepts(&self, tag: Option<&str>) -> bool {
        if self.accepted_tags.is_empty()
            || self.accepted_tags.iter().any(|t| t == WILDCARD_TAG)
        {
            return true;
        }
        match tag {
            Some(t) => self
                .accepted_tags
                .iter()
                .any(|a| a.eq_ignore_ascii_case(t)),
            None => false,
        }
    }

    /// Best unit price for `kind` available to the given tag, `None` when
    /// the post does not buy that kind (or no offer applies).
    pub fn effective_price(&self, kind: &str, tag: Option<&str>) -> Option<i64> {
        self.prices.get(kind)?.iter()
            .filter(|offer| {
                offer.tag == WILDCARD_TAG
                    || tag.is_some_and(|t| offer.tag.eq_ignore_ascii_case(t))
            })
            .map(|offer| offer.unit_price)
            .max()
    }

    /// Sell `count` carried items of `kind` to the post. Fully succeeds
    /// (goods removed, player credited) or changes nothing.
    pub fn sell(
        &self,
        player: &str,
        tag: Option<&str>,
        kind: &str,
        count: u32,
        ledger: &mut dyn Ledger,
    ) -> Result<SaleReceipt, KeeperError> {
        if !self.accepts(tag) {
            return Err(KeeperError::NotAccepted);
        }
        if count == 0 {
            return Err(KeeperError::InvalidAmount(0));
        }
        let unit_price = self
            .effective_price(kind, tag)
            .ok_or_else(|| KeeperError::NotTraded(kind.to_string()))?;
        if ledger.count_items(player, kind) < count {
            return Err(KeeperError::OutOfStock);
        }
        let total = unit_price
            .checked_mul(count as i64)
            .ok_or_else(|| KeeperError::Internal("sale total overflow".to_string()))?;

        if !ledger.take_items(player, kind, count) {
            return Err(KeeperError::OutOfStock);
        }
        if !ledger.credit(player, total) {
            // Credit refused; give the goods back.
            ledger.grant_items(player, kind, count);
            return Err(KeeperError::Internal(
                "ledger refused sale credit".to_string(),
            ));
        }
        debug!(
            "trader: {} sold {}x{} for {}",
            player, count, kind, total
        );
        Ok(SaleReceipt {
            kind: kind.to_string(),
            count,
            unit_price,
            total,
        })
    }

    /// Session continuation: sell every carried item kind the post buys,
    /// in one pass. Kinds the player does not carry are skipped; an empty
    /// receipt list means there was nothing to sell.
    pub fn quick_sell(
        &self,
        player: &str,
        tag: Option<&str>,
        ledger: &mut dyn Ledger,
    ) -> Result<Vec<SaleReceipt>, KeeperError> {
        if !self.accepts(tag) {
            return Err(KeeperError::NotAccepted);
        }
        let mut receipts = Vec::new();
        for kind in self.prices.keys() {
            // Skip kinds with no offer applicable to this tag.
            if self.effective_price(kind, tag).is_none() {
                continue;
            }
            let carried = ledger.count_items(player, kind);
            if carried == 0 {
                continue;
            }
            receipts.push(self.sell(player, tag, kind, carried, ledger)?);
        }
        Ok(receipts)
    }
}
