//! # Household Ledger Reconciliation Engine
//!
//! Reconciles a household's financial movements against its accounts on
//! top of an external tabular store. Movements carry a lifecycle state
//! that, together with their kind, determines their balance contribution:
//!
//! - incomes are `Paid` at creation and credit their account
//! - expenses are `Paid` against liquid accounts (debit) and accrue as
//!   `OnCreditFacility` against credit cards (no balance effect)
//! - future bills start `Pending` and touch a balance only when settled
//!
//! Settling supports partial payments: the paid portion is debited, the
//! movement closes, and the difference becomes a new pending debt. Card
//! statements import as pending bills, one per currency.
//!
//! ## Architecture
//!
//! - [`core::LedgerEngine`]: lifecycle rules, validate-then-act ordering,
//!   and the storage-failure contract (`StorageUnavailable` vs
//!   `InconsistentState`)
//! - [`core::AccountRegistry`] / [`core::MovementLedger`]: in-memory state
//! - [`store::TabularStore`]: seam between the engine and the CSV-directory
//!   or in-memory backend
//! - [`io`]: amount-cell normalization and batch operation replay
//!
//! All amounts are exact decimals; balances only change through checked
//! arithmetic inside the registry.

pub mod cli;
pub mod core;
pub mod io;
pub mod store;
pub mod types;

pub use crate::core::{import, LedgerEngine};
pub use crate::store::{CsvStore, MemoryStore, StoreError, TabularStore};
pub use crate::types::{
    Account, CardStatement, CreateReceipt, Currency, ImportReceipt, LedgerError, Movement,
    MovementId, MovementKind, MovementPatch, MovementState, NewMovement, SettleReceipt,
    StatementInput, StatementStatus,
};
