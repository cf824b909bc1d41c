//! Types module
//!
//! Contains core data structures used throughout the crate.
//! This module organizes types into logical submodules:
//! - `account`: Account-related types
//! - `movement`: Movements, lifecycle states, and boundary shapes
//! - `statement`: Card-statement types
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod error;
pub mod movement;
pub mod statement;

pub use account::Account;
pub use error::LedgerError;
pub use movement::{
    CreateReceipt, Currency, Movement, MovementId, MovementKind, MovementPatch, MovementState,
    NewMovement, SettleReceipt,
};
pub use statement::{CardStatement, ImportReceipt, StatementInput, StatementStatus};
