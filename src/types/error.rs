//! Error types for the household ledger engine
//!
//! Caller errors (bad name, bad amount, wrong lifecycle state) are always
//! raised before any balance is touched; validation always precedes
//! mutation. Storage failures are split in two: `StorageUnavailable` when the
//! operation aborted cleanly, `InconsistentState` when a failure landed
//! between the reversal and re-apply steps of a multi-step operation and the
//! store now disagrees with the balances. The engine never retries on its
//! own; `InconsistentState` is the caller's cue for manual reconciliation.

use thiserror::Error;

use super::movement::{MovementId, MovementState};

/// Main error type for the ledger engine
///
/// Each variant carries enough context to diagnose the failure from a log
/// line alone.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Account name lookup failed
    ///
    /// Raised before any mutation; a dangling account reference is never a
    /// silent no-op.
    #[error("Account '{name}' not found")]
    AccountNotFound {
        /// The name that failed to resolve
        name: String,
    },

    /// Two accounts in the store share a name
    ///
    /// Names are the natural key; duplicates must fail loudly at load
    /// instead of resolving to whichever row came first.
    #[error("Duplicate account name '{name}' in store")]
    DuplicateAccount {
        /// The duplicated name
        name: String,
    },

    /// Movement id lookup failed
    #[error("Movement {id} not found")]
    MovementNotFound {
        /// The id that was not found
        id: MovementId,
    },

    /// Settle was attempted on a movement that is not `Pending`
    ///
    /// `OnCreditFacility` charges become payable only through statement
    /// import; `Paid` movements owe nothing further.
    #[error("Movement {id} is {state}, only pending movements can be settled")]
    MovementNotPending {
        /// The movement id
        id: MovementId,
        /// Its current state
        state: MovementState,
    },

    /// Amount was zero, negative, or non-numeric after normalization
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The offending value, as given
        amount: String,
    },

    /// Currency code outside the supported set
    #[error("Unsupported currency '{code}'")]
    UnsupportedCurrency {
        /// The rejected code
        code: String,
    },

    /// Checked decimal arithmetic failed
    ///
    /// The balance is left untouched when this is raised.
    #[error("Arithmetic overflow in {operation} on account '{account}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account whose balance was being updated
        account: String,
    },

    /// The external store call failed or timed out
    ///
    /// Raised only when the operation aborted with no partial effect.
    #[error("Storage unavailable during {operation}: {message}")]
    StorageUnavailable {
        /// Operation that was running
        operation: String,
        /// Underlying store error
        message: String,
    },

    /// A multi-step operation applied its balance step but could not
    /// persist the record step (or vice versa)
    ///
    /// Balances and records are now out of sync for this movement; the
    /// caller must reconcile manually.
    #[error("Inconsistent state for movement {movement}: {detail}")]
    InconsistentState {
        /// Movement the operation was acting on
        movement: MovementId,
        /// What was applied and what failed
        detail: String,
    },
}

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(name: &str) -> Self {
        LedgerError::AccountNotFound {
            name: name.to_string(),
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(name: &str) -> Self {
        LedgerError::DuplicateAccount {
            name: name.to_string(),
        }
    }

    /// Create a MovementNotFound error
    pub fn movement_not_found(id: MovementId) -> Self {
        LedgerError::MovementNotFound { id }
    }

    /// Create a MovementNotPending error
    pub fn movement_not_pending(id: MovementId, state: MovementState) -> Self {
        LedgerError::MovementNotPending { id, state }
    }

    /// Create an InvalidAmount error from any displayable value
    pub fn invalid_amount(amount: impl ToString) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an UnsupportedCurrency error
    pub fn unsupported_currency(code: &str) -> Self {
        LedgerError::UnsupportedCurrency {
            code: code.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create a StorageUnavailable error
    pub fn storage_unavailable(operation: &str, message: impl ToString) -> Self {
        LedgerError::StorageUnavailable {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an InconsistentState error
    pub fn inconsistent_state(movement: MovementId, detail: impl ToString) -> Self {
        LedgerError::InconsistentState {
            movement,
            detail: detail.to_string(),
        }
    }
}
