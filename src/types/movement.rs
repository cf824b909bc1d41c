//! Movement-related types for the household ledger
//!
//! This module defines movements (the recorded financial events), their
//! lifecycle states, and the input/receipt shapes used at the engine
//! boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LedgerError;

/// Movement identifier
///
/// Monotonically increasing, assigned by the ledger at creation.
pub type MovementId = u64;

/// Supported currencies
///
/// The system operates on a small closed set of currencies; amounts in
/// anything else are rejected at the boundary with `UnsupportedCurrency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "UYU")]
    Uyu,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// Canonical ISO-style code for this currency
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Uyu => "UYU",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UYU" => Ok(Currency::Uyu),
            "USD" => Ok(Currency::Usd),
            other => Err(LedgerError::unsupported_currency(other)),
        }
    }
}

/// Movement kinds supported by the ledger
///
/// The kind decides, together with the destination account, which lifecycle
/// state a new movement enters and whether it touches a balance at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Money leaving the household
    ///
    /// Debits a liquid account immediately, or accrues on a credit
    /// facility without any immediate cash effect.
    Expense,

    /// Money entering the household
    ///
    /// Credits the destination account immediately.
    Income,

    /// An obligation due at a later date (bill, card statement line)
    ///
    /// Never touches a balance at creation; becomes balance-affecting only
    /// when settled.
    FutureBill,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementKind::Expense => "expense",
            MovementKind::Income => "income",
            MovementKind::FutureBill => "future_bill",
        };
        f.write_str(label)
    }
}

/// Lifecycle states of a movement
///
/// The (kind, state) pair fully determines a movement's current balance
/// contribution; no code outside the engine may reinterpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementState {
    /// Recorded but not yet disbursed; the movement's date is its due date
    Pending,

    /// Charged to a credit facility, not yet billed
    ///
    /// Informational until a statement import turns the accrued charges
    /// into a `Pending` bill.
    OnCreditFacility,

    /// No further action owed against this movement id
    ///
    /// Note that for partially settled movements this means "closed", not
    /// "this exact amount was transferred".
    Paid,
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementState::Pending => "pending",
            MovementState::OnCreditFacility => "on_credit_facility",
            MovementState::Paid => "paid",
        };
        f.write_str(label)
    }
}

/// A recorded financial event with a lifecycle state
///
/// Movements reference their account by name (the natural key); a dangling
/// reference surfaces as `AccountNotFound` at operation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Unique movement id, assigned at creation
    pub id: MovementId,

    /// Event date; for `Pending` movements this is the due date
    pub date: NaiveDate,

    /// Free-text description
    pub description: String,

    /// Positive amount; retains its original value even after a partial
    /// settle (the residual lives under a separate id)
    pub amount: Decimal,

    /// Currency of the amount, always explicit
    pub currency: Currency,

    /// Free-text category
    pub category: String,

    /// Name of the referenced account
    pub account: String,

    /// What kind of event this is
    pub kind: MovementKind,

    /// Current lifecycle state
    pub state: MovementState,

    /// Date the movement became `Paid`, if it has
    pub paid_on: Option<NaiveDate>,
}

/// Validated input for creating a movement
///
/// The engine assigns the id and decides the lifecycle state; callers only
/// describe the event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub category: String,
    pub account: String,
    pub kind: MovementKind,
}

/// Named-field patch for editing a movement
///
/// Absent fields are left untouched. Neither the kind nor the lifecycle
/// state can be patched; an edit changes magnitude and attribution only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub category: Option<String>,
    pub account: Option<String>,
}

impl MovementPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Result of a successful `create`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateReceipt {
    /// Id assigned to the new movement
    pub id: MovementId,
    /// Lifecycle state the movement entered
    pub state: MovementState,
}

/// Result of a successful `settle`
///
/// The original movement is always `Paid` afterwards; `residual` is set
/// only when the payment was partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleReceipt {
    /// Id of the residual-debt movement, when `amount_paid` fell short
    pub residual: Option<MovementId>,
}
