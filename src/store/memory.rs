//! In-memory storage backend for tests
//!
//! Mirrors the CSV backend's semantics (row addressing, append-only
//! statements) without touching the filesystem. A write budget can be
//! armed with [`MemoryStore::fail_after`] to make a specific mutating
//! call fail, which is how the mid-operation failure paths are exercised.

use rust_decimal::Decimal;

use super::{StoreError, TabularStore};
use crate::types::{Account, CardStatement, Movement, MovementId};

/// Tabular store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Vec<Account>,
    movements: Vec<Movement>,
    statements: Vec<CardStatement>,
    fail_after: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Create a store seeded with account rows
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        MemoryStore {
            accounts,
            ..MemoryStore::default()
        }
    }

    /// Arm a write budget: the n-th mutating call (zero-based) and every
    /// one after it fail with an I/O error
    pub fn fail_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    /// Account rows as currently persisted
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Movement rows as currently persisted
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Statement history as currently persisted
    pub fn statements(&self) -> &[CardStatement] {
        &self.statements
    }

    fn charge_write(&mut self) -> Result<(), StoreError> {
        if let Some(budget) = self.fail_after {
            if self.writes >= budget {
                return Err(StoreError::Io(std::io::Error::other("injected failure")));
            }
        }
        self.writes += 1;
        Ok(())
    }
}

impl TabularStore for MemoryStore {
    fn load_accounts(&mut self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.clone())
    }

    fn load_movements(&mut self) -> Result<Vec<Movement>, StoreError> {
        Ok(self.movements.clone())
    }

    fn write_balance(&mut self, name: &str, balance: Decimal) -> Result<(), StoreError> {
        self.charge_write()?;
        let account = self
            .accounts
            .iter_mut()
            .find(|account| account.name == name)
            .ok_or_else(|| StoreError::row_not_found("accounts", name))?;
        account.balance = balance;
        Ok(())
    }

    fn append_movement(&mut self, movement: &Movement) -> Result<(), StoreError> {
        self.charge_write()?;
        self.movements.push(movement.clone());
        Ok(())
    }

    fn update_movement(&mut self, movement: &Movement) -> Result<(), StoreError> {
        self.charge_write()?;
        let row = self
            .movements
            .iter_mut()
            .find(|row| row.id == movement.id)
            .ok_or_else(|| StoreError::row_not_found("movements", movement.id))?;
        *row = movement.clone();
        Ok(())
    }

    fn delete_movement(&mut self, id: MovementId) -> Result<(), StoreError> {
        self.charge_write()?;
        let before = self.movements.len();
        self.movements.retain(|row| row.id != id);
        if self.movements.len() == before {
            return Err(StoreError::row_not_found("movements", id));
        }
        Ok(())
    }

    fn append_statement(&mut self, statement: &CardStatement) -> Result<(), StoreError> {
        self.charge_write()?;
        self.statements.push(statement.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;

    #[test]
    fn write_budget_fails_the_armed_call() {
        let mut store =
            MemoryStore::with_accounts(vec![Account::new("Efectivo", Currency::Uyu)]).fail_after(1);

        store.write_balance("Efectivo", Decimal::new(100, 0)).unwrap();
        let err = store
            .write_balance("Efectivo", Decimal::new(200, 0))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        // The first write stuck, the failed one did not.
        assert_eq!(store.accounts()[0].balance, Decimal::new(100, 0));
    }

    #[test]
    fn row_addressing_matches_the_csv_backend() {
        let mut store = MemoryStore::new();
        let err = store.write_balance("Santander", Decimal::ZERO).unwrap_err();
        assert!(matches!(err, StoreError::RowNotFound { .. }));
        let err = store.delete_movement(9).unwrap_err();
        assert!(matches!(err, StoreError::RowNotFound { .. }));
    }
}
