//! Card-statement types
//!
//! A statement arrives as already-extracted per-currency totals (how they
//! were extracted is out of scope). The importer turns them into `Pending`
//! bills and keeps the statement itself as a history record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::movement::{Currency, MovementId};

/// Statement status, tracked for record-keeping only
///
/// The engine never consumes this; the generated movements are the live
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    Pending,
    Settled,
}

/// Input for importing a card statement
#[derive(Debug, Clone, PartialEq)]
pub struct StatementInput {
    /// Name of the card (credit facility) account
    pub card_account: String,

    /// Closing date of the billing cycle
    pub closing_date: NaiveDate,

    /// Date the bill is due
    pub due_date: NaiveDate,

    /// Total owed per currency; zero entries produce no movement
    pub totals: BTreeMap<Currency, Decimal>,

    /// Minimum payment per currency, kept for the record
    pub minimums: BTreeMap<Currency, Decimal>,
}

/// A recorded card statement
///
/// Created by the importer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStatement {
    pub card_account: String,
    pub closing_date: NaiveDate,
    pub due_date: NaiveDate,
    pub totals: BTreeMap<Currency, Decimal>,
    pub minimums: BTreeMap<Currency, Decimal>,
    pub status: StatementStatus,
}

impl CardStatement {
    /// Build the history record for an imported statement
    pub fn from_input(input: &StatementInput) -> Self {
        CardStatement {
            card_account: input.card_account.clone(),
            closing_date: input.closing_date,
            due_date: input.due_date,
            totals: input.totals.clone(),
            minimums: input.minimums.clone(),
            status: StatementStatus::Pending,
        }
    }
}

/// Result of a successful statement import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReceipt {
    /// Ids of the `Pending` bills created, one per nonzero currency total
    pub created_movements: Vec<MovementId>,
}
