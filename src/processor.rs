//! Processing station service points: raw material in, refined material
//! out, for a per-unit fee that depends on the player's client tag.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::ServicePayload;
use crate::errors::KeeperError;
use crate::ledger::Ledger;
use crate::trader::WILDCARD_TAG;
use crate::types::Category;

/// One row of the conversion table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub refined_kind: String,
    /// Refined units produced per raw unit consumed.
    pub yield_per_unit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStation {
    /// Raw material kind → what it refines into.
    #[serde(default)]
    pub conversions: BTreeMap<String, Conversion>,
    /// Per-unit fee by client tag; the wildcard row is the default for
    /// tags (and untagged players) without their own row.
    #[serde(default)]
    pub fees: BTreeMap<String, i64>,
}

impl ServicePayload for ProcessingStation {
    const CATEGORY: Category = Category::Processor;
}

/// Outcome of a completed processing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReceipt {
    pub raw_kind: String,
    pub refined_kind: String,
    pub consumed: u32,
    pub produced: u32,
    pub fee: i64,
}

impl ProcessingStation {
    /// Per-unit fee for the given client tag.
    pub fn fee_for(&self, tag: Option<&str>) -> i64 {
        tag.and_then(|t| self.fees.get(t).copied())
            .or_else(|| self.fees.get(WILDCARD_TAG).copied())
            .unwrap_or(0)
    }

    /// Refine `count` units of `raw_kind`. Fully succeeds (raw consumed,
    /// fee charged, refined granted) or changes nothing.
    pub fn process(
        &self,
        player: &str,
        tag: Option<&str>,
        raw_kind: &str,
        count: u32,
        ledger: &mut dyn Ledger,
    ) -> Result<ProcessReceipt, KeeperError> {
        let conversion = self
            .conversions
            .get(raw_kind)
            .ok_or_else(|| KeeperError::NotTraded(raw_kind.to_string()))?;
        if count == 0 {
            return Err(KeeperError::InvalidAmount(0));
        }
        if ledger.count_items(player, raw_kind) < count {
            return Err(KeeperError::OutOfStock);
        }
        let fee = self.fee_for(tag).saturating_mul(count as i64);
        if fee > 0 && !ledger.can_afford(player, fee) {
            return Err(KeeperError::InsufficientFunds);
        }
        let produced = count.saturating_mul(conversion.yield_per_unit);
        if !ledger.has_capacity(player, produced) {
            return Err(KeeperError::NoCapacity);
        }

        if !ledger.take_items(player, raw_kind, count) {
            return Err(KeeperError::OutOfStock);
        }
        if fee > 0 && !ledger.charge(player, fee) {
            ledger.grant_items(player, raw_kind, count);
            return Err(KeeperError::InsufficientFunds);
        }
        if !ledger.grant_items(player, &conversion.refined_kind, produced) {
            // Delivery failed; unwind the fee and the raw material.
            if fee > 0 {
                ledger.credit(player, fee);
            }
            ledger.grant_items(player, raw_kind, count);
            return Err(KeeperError::NoCapacity);
        }
        debug!(
            "processor: {} refined {}x{} into {}x{} (fee {})",
            player, count, raw_kind, produced, conversion.refined_kind, fee
        );
        Ok(ProcessReceipt {
            raw_kind: raw_kind.to_string(),
            refined_kind: conversion.refined_kind.clone(),
            consumed: count,
            produced,
            fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_falls_back_to_wildcard_row() {
        let mut station = ProcessingStation::default();
        station.fees.insert("*".to_string(), 5);
        station.fees.insert("smith".to_string(), 2);

        assert_eq!(station.fee_for(Some("smith")), 2);
        assert_eq!(station.fee_for(Some("miner")), 5);
        assert_eq!(station.fee_for(None), 5);
    }

    #[test]
    fn test_fee_defaults_to_zero_without_rows() {
        let station = ProcessingStation::default();
        assert_eq!(station.fee_for(Some("smith")), 0);
        assert_eq!(station.fee_for(None), 0);
    }
}
