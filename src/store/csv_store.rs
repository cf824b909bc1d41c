//! CSV-directory storage backend
//!
//! Persists the three tables as CSV files inside one data directory:
//! `accounts.csv`, `movements.csv`, and `statements.csv`. Mutations follow
//! the spreadsheet model the store emulates: read the whole table, change
//! the addressed row, write the table back. Statements are append-only.
//!
//! Account balance cells are parsed leniently through the currency
//! normalizer (the sheet is maintained by hand); movement rows are written
//! exclusively by the engine and parsed strictly.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use super::{StoreError, TabularStore};
use crate::io::normalize::parse_money;
use crate::types::{
    Account, CardStatement, Currency, Movement, MovementId, StatementStatus,
};

const ACCOUNTS_TABLE: &str = "accounts.csv";
const MOVEMENTS_TABLE: &str = "movements.csv";
const STATEMENTS_TABLE: &str = "statements.csv";

/// Raw account row as stored in the sheet
///
/// The balance stays a string until normalization so that blank or
/// symbol-decorated cells survive the read.
#[derive(Debug, Deserialize)]
struct AccountRow {
    name: String,
    currency: String,
    #[serde(default)]
    balance: String,
    credit_facility: bool,
}

/// One statement history row; statements are flattened to one row per
/// currency so the table stays rectangular.
#[derive(Debug, Serialize, Deserialize)]
struct StatementRow {
    card_account: String,
    closing_date: chrono::NaiveDate,
    due_date: chrono::NaiveDate,
    currency: Currency,
    total: Decimal,
    minimum: Decimal,
    status: StatementStatus,
}

/// Storage backend over a directory of CSV tables
#[derive(Debug)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Open (creating if necessary) a data directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(CsvStore { dir })
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(table)
    }

    fn read_movements(&self, path: &Path) -> Result<Vec<Movement>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| StoreError::malformed(MOVEMENTS_TABLE, e))?;
        let mut movements = Vec::new();
        for row in reader.deserialize::<Movement>() {
            movements.push(row.map_err(|e| StoreError::malformed(MOVEMENTS_TABLE, e))?);
        }
        Ok(movements)
    }

    fn write_movements(&self, movements: &[Movement]) -> Result<(), StoreError> {
        let mut writer = WriterBuilder::new()
            .from_path(self.table_path(MOVEMENTS_TABLE))
            .map_err(|e| StoreError::malformed(MOVEMENTS_TABLE, e))?;
        for movement in movements {
            writer
                .serialize(movement)
                .map_err(|e| StoreError::malformed(MOVEMENTS_TABLE, e))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_accounts(&self, accounts: &[Account]) -> Result<(), StoreError> {
        let mut writer = WriterBuilder::new()
            .from_path(self.table_path(ACCOUNTS_TABLE))
            .map_err(|e| StoreError::malformed(ACCOUNTS_TABLE, e))?;
        for account in accounts {
            writer
                .serialize(account)
                .map_err(|e| StoreError::malformed(ACCOUNTS_TABLE, e))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl TabularStore for CsvStore {
    fn load_accounts(&mut self) -> Result<Vec<Account>, StoreError> {
        let path = self.table_path(ACCOUNTS_TABLE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&path)
            .map_err(|e| StoreError::malformed(ACCOUNTS_TABLE, e))?;
        let mut accounts = Vec::new();
        for row in reader.deserialize::<AccountRow>() {
            let row = row.map_err(|e| StoreError::malformed(ACCOUNTS_TABLE, e))?;
            let currency: Currency = row.currency.parse().map_err(|_| {
                StoreError::malformed(
                    ACCOUNTS_TABLE,
                    format!(
                        "unsupported currency '{}' for account '{}'",
                        row.currency, row.name
                    ),
                )
            })?;
            accounts.push(Account {
                name: row.name,
                currency,
                balance: parse_money(&row.balance),
                credit_facility: row.credit_facility,
            });
        }
        Ok(accounts)
    }

    fn load_movements(&mut self) -> Result<Vec<Movement>, StoreError> {
        self.read_movements(&self.table_path(MOVEMENTS_TABLE))
    }

    fn write_balance(&mut self, name: &str, balance: Decimal) -> Result<(), StoreError> {
        let mut accounts = self.load_accounts()?;
        let account = accounts
            .iter_mut()
            .find(|account| account.name == name)
            .ok_or_else(|| StoreError::row_not_found(ACCOUNTS_TABLE, name))?;
        account.balance = balance;
        self.write_accounts(&accounts)
    }

    fn append_movement(&mut self, movement: &Movement) -> Result<(), StoreError> {
        let mut movements = self.load_movements()?;
        movements.push(movement.clone());
        self.write_movements(&movements)
    }

    fn update_movement(&mut self, movement: &Movement) -> Result<(), StoreError> {
        let mut movements = self.load_movements()?;
        let row = movements
            .iter_mut()
            .find(|row| row.id == movement.id)
            .ok_or_else(|| StoreError::row_not_found(MOVEMENTS_TABLE, movement.id))?;
        *row = movement.clone();
        self.write_movements(&movements)
    }

    fn delete_movement(&mut self, id: MovementId) -> Result<(), StoreError> {
        let mut movements = self.load_movements()?;
        let before = movements.len();
        movements.retain(|row| row.id != id);
        if movements.len() == before {
            return Err(StoreError::row_not_found(MOVEMENTS_TABLE, id));
        }
        self.write_movements(&movements)
    }

    fn append_statement(&mut self, statement: &CardStatement) -> Result<(), StoreError> {
        let path = self.table_path(STATEMENTS_TABLE);
        let write_headers = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(write_headers)
            .from_writer(file);
        for (&currency, &total) in &statement.totals {
            let row = StatementRow {
                card_account: statement.card_account.clone(),
                closing_date: statement.closing_date,
                due_date: statement.due_date,
                currency,
                total,
                minimum: statement
                    .minimums
                    .get(&currency)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
                status: statement.status,
            };
            writer
                .serialize(row)
                .map_err(|e| StoreError::malformed(STATEMENTS_TABLE, e))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovementKind, MovementState};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    fn movement(id: MovementId) -> Movement {
        Movement {
            id,
            date: NaiveDate::from_ymd_opt(2025, 9, 11).unwrap(),
            description: "Supermercado Disco".to_string(),
            amount: Decimal::new(123456, 2),
            currency: Currency::Uyu,
            category: "Supermercado".to_string(),
            account: "Efectivo".to_string(),
            kind: MovementKind::Expense,
            state: MovementState::Paid,
            paid_on: Some(NaiveDate::from_ymd_opt(2025, 9, 11).unwrap()),
        }
    }

    #[test]
    fn missing_tables_load_as_empty() {
        let dir = tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        assert!(store.load_accounts().unwrap().is_empty());
        assert!(store.load_movements().unwrap().is_empty());
    }

    #[test]
    fn account_balances_are_normalized_on_load() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("accounts.csv"),
            "name,currency,balance,credit_facility\n\
             Efectivo,UYU,\"$ 1.234,56\",false\n\
             Visa Itau,UYU,,true\n",
        )
        .unwrap();

        let mut store = CsvStore::open(dir.path()).unwrap();
        let accounts = store.load_accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].balance, Decimal::new(123456, 2));
        assert!(!accounts[0].credit_facility);
        // Blank balance cell maps to zero instead of failing the load.
        assert_eq!(accounts[1].balance, Decimal::ZERO);
        assert!(accounts[1].credit_facility);
    }

    #[test]
    fn unsupported_currency_cell_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("accounts.csv"),
            "name,currency,balance,credit_facility\nEfectivo,EUR,0,false\n",
        )
        .unwrap();

        let mut store = CsvStore::open(dir.path()).unwrap();
        let err = store.load_accounts().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn write_balance_updates_the_addressed_row_only() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("accounts.csv"),
            "name,currency,balance,credit_facility\n\
             Efectivo,UYU,100,false\n\
             Santander,UYU,200,false\n",
        )
        .unwrap();

        let mut store = CsvStore::open(dir.path()).unwrap();
        store
            .write_balance("Santander", Decimal::new(5000, 1))
            .unwrap();

        let accounts = store.load_accounts().unwrap();
        assert_eq!(accounts[0].balance, Decimal::new(100, 0));
        assert_eq!(accounts[1].balance, Decimal::new(5000, 1));
    }

    #[test]
    fn write_balance_on_unknown_name_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("accounts.csv"),
            "name,currency,balance,credit_facility\nEfectivo,UYU,100,false\n",
        )
        .unwrap();

        let mut store = CsvStore::open(dir.path()).unwrap();
        let err = store.write_balance("efectivo", Decimal::ZERO).unwrap_err();
        assert!(matches!(err, StoreError::RowNotFound { .. }));
    }

    #[test]
    fn movement_rows_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();

        store.append_movement(&movement(1)).unwrap();
        let mut second = movement(2);
        second.state = MovementState::Pending;
        second.paid_on = None;
        store.append_movement(&second).unwrap();

        let loaded = store.load_movements().unwrap();
        assert_eq!(loaded, vec![movement(1), second]);
    }

    #[test]
    fn update_and_delete_address_rows_by_id() {
        let dir = tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        store.append_movement(&movement(1)).unwrap();
        store.append_movement(&movement(2)).unwrap();

        let mut edited = movement(1);
        edited.description = "Supermercado Tata".to_string();
        store.update_movement(&edited).unwrap();
        store.delete_movement(2).unwrap();

        let loaded = store.load_movements().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].description, "Supermercado Tata");

        let err = store.delete_movement(2).unwrap_err();
        assert!(matches!(err, StoreError::RowNotFound { .. }));
    }

    #[test]
    fn statements_append_one_row_per_currency() {
        let dir = tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();

        let mut totals = BTreeMap::new();
        totals.insert(Currency::Uyu, Decimal::new(38520, 0));
        totals.insert(Currency::Usd, Decimal::new(20700, 2));
        let mut minimums = BTreeMap::new();
        minimums.insert(Currency::Uyu, Decimal::new(1500, 0));

        let statement = CardStatement {
            card_account: "Visa Itau".to_string(),
            closing_date: NaiveDate::from_ymd_opt(2025, 8, 28).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 9, 11).unwrap(),
            totals,
            minimums,
            status: StatementStatus::Pending,
        };

        store.append_statement(&statement).unwrap();
        store.append_statement(&statement).unwrap();

        let text = fs::read_to_string(dir.path().join("statements.csv")).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        // One header plus two rows per appended statement.
        assert_eq!(rows.len(), 5);
        assert!(rows[0].starts_with("card_account,"));
        assert!(rows[1].contains("UYU"));
        assert!(rows[2].contains("USD"));
        // Missing minimum falls back to zero.
        assert!(rows[2].contains(",0,"));
    }
}
