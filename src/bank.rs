//! Bank desk service points: converting carried currency into account
//! balance and back, under per-operation ceilings.
//!
//! The conversion arithmetic itself lives behind the [`Ledger`] seam; this
//! module only sequences the transaction so a failure at any step leaves
//! both the account and the carried currency untouched.

use serde::{Deserialize, Serialize};

use crate::catalog::ServicePayload;
use crate::errors::KeeperError;
use crate::ledger::Ledger;
use crate::types::Category;

/// Item kind representing physical currency in a player's carry.
pub const CURRENCY_ITEM: &str = "coin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDesk {
    /// Largest amount a single withdrawal may move.
    pub withdraw_ceiling: i64,
    /// Largest amount a single deposit may move.
    pub deposit_ceiling: i64,
    /// Greeting shown when the desk menu opens.
    pub greeting: String,
}

impl Default for BankDesk {
    fn default() -> Self {
        Self {
            withdraw_ceiling: 10_000,
            deposit_ceiling: 10_000,
            greeting: "Welcome to the bank.".to_string(),
        }
    }
}

impl ServicePayload for BankDesk {
    const CATEGORY: Category = Category::Bank;
}

impl BankDesk {
    /// Move `amount` from the player's account into carried currency.
    /// Fully succeeds or changes nothing.
    pub fn withdraw(
        &self,
        player: &str,
        amount: i64,
        ledger: &mut dyn Ledger,
    ) -> Result<(), KeeperError> {
        if amount <= 0 {
            return Err(KeeperError::InvalidAmount(amount));
        }
        if amount > self.withdraw_ceiling {
            return Err(KeeperError::CeilingExceeded {
                limit: self.withdraw_ceiling,
            });
        }
        if !ledger.can_afford(player, amount) {
            return Err(KeeperError::InsufficientFunds);
        }
        let units = amount as u32;
        if !ledger.has_capacity(player, units) {
            return Err(KeeperError::NoCapacity);
        }
        if !ledger.charge(player, amount) {
            return Err(KeeperError::InsufficientFunds);
        }
        if !ledger.grant_items(player, CURRENCY_ITEM, units) {
            // Could not hand the currency over; put the balance back.
            ledger.credit(player, amount);
            return Err(KeeperError::NoCapacity);
        }
        Ok(())
    }

    /// Move `amount` of carried currency into the player's account.
    /// Fully succeeds or changes nothing.
    pub fn deposit(
        &self,
        player: &str,
        amount: i64,
        ledger: &mut dyn Ledger,
    ) -> Result<(), KeeperError> {
        if amount <= 0 {
            return Err(KeeperError::InvalidAmount(amount));
        }
        if amount > self.deposit_ceiling {
            return Err(KeeperError::CeilingExceeded {
                limit: self.deposit_ceiling,
            });
        }
        let units = amount as u32;
        if !ledger.take_items(player, CURRENCY_ITEM, units) {
            return Err(KeeperError::InsufficientFunds);
        }
        if !ledger.credit(player, amount) {
            // Account refused the credit; hand the currency back.
            ledger.grant_items(player, CURRENCY_ITEM, units);
            return Err(KeeperError::Internal(
                "ledger refused deposit credit".to_string(),
            ));
        }
        Ok(())
    }
}
