//! Storage collaborator for the ledger engine
//!
//! The engine never talks to a concrete backend directly: it goes through
//! the [`TabularStore`] trait, which exposes the get/put/find/append
//! semantics of an external tabular store (a spreadsheet-style backend).
//! The trait seam lets the CSV-directory backend and the in-memory test
//! backend be used interchangeably.
//!
//! Store calls are synchronous and may fail; the engine maps [`StoreError`]
//! into `LedgerError::StorageUnavailable` (or `InconsistentState` when the
//! failure lands mid-operation). The store performs no validation of its
//! own beyond row shape: lifecycle rules live in the engine.

pub mod csv_store;
pub mod memory;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Account, CardStatement, Movement, MovementId};

/// Errors surfaced by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (missing file, permissions, disk full)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A table could not be parsed
    #[error("malformed table '{table}': {message}")]
    Malformed {
        /// Table the row came from
        table: String,
        /// Description of the parse failure
        message: String,
    },

    /// A row addressed by key does not exist
    #[error("row '{key}' not found in table '{table}'")]
    RowNotFound {
        /// Table that was searched
        table: String,
        /// Key that failed to match
        key: String,
    },
}

impl StoreError {
    /// Create a Malformed error for a table
    pub fn malformed(table: &str, message: impl ToString) -> Self {
        StoreError::Malformed {
            table: table.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a RowNotFound error
    pub fn row_not_found(table: &str, key: impl ToString) -> Self {
        StoreError::RowNotFound {
            table: table.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<csv::Error> for StoreError {
    fn from(error: csv::Error) -> Self {
        StoreError::Malformed {
            table: String::new(),
            message: error.to_string(),
        }
    }
}

/// Abstraction over the authoritative tabular store
///
/// Three tables are involved: accounts (seeded out-of-band, balances
/// written back through [`TabularStore::write_balance`] only), movements
/// (the audit trail, mutated in place by edits and deletes), and card
/// statements (append-only history).
pub trait TabularStore {
    /// Load every account row
    fn load_accounts(&mut self) -> Result<Vec<Account>, StoreError>;

    /// Load every movement row
    fn load_movements(&mut self) -> Result<Vec<Movement>, StoreError>;

    /// Write back the balance of one account, addressed by exact name
    fn write_balance(&mut self, name: &str, balance: Decimal) -> Result<(), StoreError>;

    /// Append a new movement row
    fn append_movement(&mut self, movement: &Movement) -> Result<(), StoreError>;

    /// Replace the movement row with the same id
    fn update_movement(&mut self, movement: &Movement) -> Result<(), StoreError>;

    /// Remove the movement row with the given id
    fn delete_movement(&mut self, id: MovementId) -> Result<(), StoreError>;

    /// Append a statement to the history table
    fn append_statement(&mut self, statement: &CardStatement) -> Result<(), StoreError>;
}

pub use csv_store::CsvStore;
pub use memory::MemoryStore;
