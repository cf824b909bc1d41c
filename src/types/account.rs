//! Account-related types for the household ledger
//!
//! This module defines the Account structure tracked by the registry.
//! Accounts are created out-of-band (seeded in the external store) and are
//! never deleted by the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::movement::Currency;

/// A household account
///
/// The name is the natural key: movements reference accounts by name and
/// the registry enforces uniqueness at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account name (exact-match lookup key)
    pub name: String,

    /// Currency the balance is denominated in
    pub currency: Currency,

    /// Current balance
    ///
    /// Always the sum of the signed contributions applied through the
    /// registry; no other code path writes this field.
    pub balance: Decimal,

    /// Whether this account is a line of credit rather than liquid funds
    ///
    /// Expenses against a credit facility accrue (`OnCreditFacility`)
    /// instead of debiting the balance immediately.
    pub credit_facility: bool,
}

impl Account {
    /// Create a liquid account with a zero balance
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        Account {
            name: name.into(),
            currency,
            balance: Decimal::ZERO,
            credit_facility: false,
        }
    }

    /// Create a credit-facility account with a zero balance
    pub fn credit(name: impl Into<String>, currency: Currency) -> Self {
        Account {
            credit_facility: true,
            ..Account::new(name, currency)
        }
    }
}
