//! Operation replay: CSV operations in, reconciled balances out
//!
//! The binary's batch mode reads an operations CSV (one row per `create`,
//! `settle`, or `delete`), replays it against a ledger loaded from a data
//! directory, and writes the resulting account balances as CSV.
//!
//! Row-level problems (malformed fields, unknown accounts, wrong lifecycle
//! states) are logged and skipped so one bad row cannot poison a batch.
//! Storage failures are fatal: once the store misbehaves the replay stops
//! rather than reconcile against a backend in an unknown state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::core::LedgerEngine;
use crate::store::CsvStore;
use crate::types::{Account, Currency, LedgerError, MovementId, MovementKind, NewMovement};

/// Raw operation row as read from the operations CSV
///
/// Columns are shared across operation types; which ones are required
/// depends on `op`. For `settle`, `account` names the paying account and
/// `amount` is the amount paid.
#[derive(Debug, Deserialize)]
pub struct OpRecord {
    pub op: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub movement: String,
}

/// A validated replay operation
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create(NewMovement),
    Settle {
        movement: MovementId,
        paying_account: String,
        amount: Decimal,
    },
    Delete {
        movement: MovementId,
    },
}

fn parse_kind(text: &str) -> Result<MovementKind, String> {
    match text {
        "expense" => Ok(MovementKind::Expense),
        "income" => Ok(MovementKind::Income),
        "future_bill" => Ok(MovementKind::FutureBill),
        other => Err(format!("unknown kind '{other}'")),
    }
}

/// Convert a raw row into an [`Operation`]
///
/// Replay input is machine-written, so amounts are parsed strictly here
/// rather than through the lenient cell normalizer.
pub fn convert_op_record(record: &OpRecord) -> Result<Operation, String> {
    match record.op.as_str() {
        "create" => {
            let kind = parse_kind(&record.kind)?;
            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .map_err(|e| format!("bad date '{}': {e}", record.date))?;
            let amount = Decimal::from_str(&record.amount)
                .map_err(|e| format!("bad amount '{}': {e}", record.amount))?;
            let currency = Currency::from_str(&record.currency).map_err(|e| e.to_string())?;
            Ok(Operation::Create(NewMovement {
                date,
                description: record.description.clone(),
                amount,
                currency,
                category: record.category.clone(),
                account: record.account.clone(),
                kind,
            }))
        }
        "settle" => {
            let movement = record
                .movement
                .parse::<MovementId>()
                .map_err(|e| format!("bad movement id '{}': {e}", record.movement))?;
            let amount = Decimal::from_str(&record.amount)
                .map_err(|e| format!("bad amount '{}': {e}", record.amount))?;
            Ok(Operation::Settle {
                movement,
                paying_account: record.account.clone(),
                amount,
            })
        }
        "delete" => {
            let movement = record
                .movement
                .parse::<MovementId>()
                .map_err(|e| format!("bad movement id '{}': {e}", record.movement))?;
            Ok(Operation::Delete { movement })
        }
        other => Err(format!("unknown op '{other}'")),
    }
}

/// Streaming reader over an operations CSV
pub struct OpsReader {
    records: csv::DeserializeRecordsIntoIter<std::fs::File, OpRecord>,
}

impl OpsReader {
    /// Open an operations file
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| LedgerError::storage_unavailable("open_ops", e))?;
        Ok(OpsReader {
            records: reader.into_deserialize(),
        })
    }
}

impl Iterator for OpsReader {
    type Item = Result<Operation, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(match record {
            Ok(record) => convert_op_record(&record),
            Err(e) => Err(e.to_string()),
        })
    }
}

/// Write account balances as CSV, sorted by name
pub fn write_balances_csv(
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);
    for account in accounts {
        writer
            .serialize(account)
            .map_err(|e| LedgerError::storage_unavailable("write_output", e))?;
    }
    writer
        .flush()
        .map_err(|e| LedgerError::storage_unavailable("write_output", e))?;
    Ok(())
}

/// Replay an operations file against a data directory
///
/// Loads the ledger from `data_dir`, applies each operation in file order,
/// and writes the final balances to `output`. Malformed and rejected rows
/// are logged and skipped; storage failures abort the replay.
pub fn process(
    data_dir: &Path,
    ops_path: &Path,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let store = CsvStore::open(data_dir)
        .map_err(|e| LedgerError::storage_unavailable("open_store", e))?;
    let mut engine = LedgerEngine::load(store)?;

    for (index, item) in OpsReader::open(ops_path)?.enumerate() {
        let row = index + 1;
        let operation = match item {
            Ok(operation) => operation,
            Err(message) => {
                tracing::warn!(row, message, "skipping malformed operation row");
                continue;
            }
        };
        let outcome = match operation {
            Operation::Create(input) => engine.create(input).map(|_| ()),
            Operation::Settle {
                movement,
                paying_account,
                amount,
            } => engine.settle(movement, &paying_account, amount).map(|_| ()),
            Operation::Delete { movement } => engine.delete(movement),
        };
        match outcome {
            Ok(()) => {}
            Err(
                error @ (LedgerError::StorageUnavailable { .. }
                | LedgerError::InconsistentState { .. }),
            ) => return Err(error),
            Err(error) => {
                tracing::warn!(row, %error, "operation rejected");
            }
        }
    }

    write_balances_csv(&engine.accounts(), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(op: &str) -> OpRecord {
        OpRecord {
            op: op.to_string(),
            kind: "expense".to_string(),
            date: "2025-08-15".to_string(),
            description: "Farmacia".to_string(),
            amount: "350.50".to_string(),
            currency: "UYU".to_string(),
            category: "Salud".to_string(),
            account: "Efectivo".to_string(),
            movement: "4".to_string(),
        }
    }

    #[test]
    fn create_row_converts_to_a_new_movement() {
        let operation = convert_op_record(&record("create")).unwrap();
        match operation {
            Operation::Create(input) => {
                assert_eq!(input.kind, MovementKind::Expense);
                assert_eq!(input.amount, Decimal::new(35050, 2));
                assert_eq!(input.currency, Currency::Uyu);
                assert_eq!(input.account, "Efectivo");
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn settle_row_reads_paying_account_and_amount() {
        let operation = convert_op_record(&record("settle")).unwrap();
        assert_eq!(
            operation,
            Operation::Settle {
                movement: 4,
                paying_account: "Efectivo".to_string(),
                amount: Decimal::new(35050, 2),
            }
        );
    }

    #[test]
    fn delete_row_needs_only_the_movement_id() {
        let operation = convert_op_record(&record("delete")).unwrap();
        assert_eq!(operation, Operation::Delete { movement: 4 });
    }

    #[rstest]
    #[case::unknown_op("transfer")]
    #[case::unknown_kind_via_create("create")]
    fn bad_rows_are_rejected_with_a_message(#[case] op: &str) {
        let mut row = record(op);
        if op == "create" {
            row.kind = "refund".to_string();
        }
        assert!(convert_op_record(&row).is_err());
    }

    #[test]
    fn create_amount_is_parsed_strictly() {
        let mut row = record("create");
        row.amount = "$ 1.234,56".to_string();
        let err = convert_op_record(&row).unwrap_err();
        assert!(err.contains("bad amount"));
    }
}
