//! Card-statement importer
//!
//! Turns an already-extracted statement (per-currency totals and minimums)
//! into `Pending` bills, one per nonzero currency, dated at the statement's
//! due date. The statement itself is appended to the history table for the
//! record.
//!
//! The importer does not touch the card's accrued `OnCreditFacility`
//! movements: those stay open under their own ids, and the imported bill
//! carries the full statement total independently. Reconciling the two is
//! the bookkeeper's job, not the engine's.

use rust_decimal::Decimal;

use super::engine::LedgerEngine;
use crate::store::TabularStore;
use crate::types::{
    CardStatement, ImportReceipt, LedgerError, MovementKind, NewMovement, StatementInput,
};

/// Category assigned to imported statement bills
const STATEMENT_CATEGORY: &str = "Tarjeta";

/// Import a card statement, creating one `Pending` bill per currency
///
/// Validation happens up front: the card account must exist and every total
/// must be non-negative before any bill is created. Zero totals are skipped
/// silently (a cycle with no charges in that currency).
///
/// # Errors
///
/// * `AccountNotFound` - the card account does not exist
/// * `InvalidAmount` - a total is negative
/// * `StorageUnavailable` / `InconsistentState` - store failures during
///   bill creation or the history append
pub fn import<S: TabularStore>(
    engine: &mut LedgerEngine<S>,
    input: StatementInput,
) -> Result<ImportReceipt, LedgerError> {
    let card = engine
        .account(&input.card_account)
        .ok_or_else(|| LedgerError::account_not_found(&input.card_account))?;

    for (&currency, &total) in &input.totals {
        if total < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(format!("{total} {currency}")));
        }
    }

    let mut created_movements = Vec::new();
    for (&currency, &total) in &input.totals {
        if total.is_zero() {
            continue;
        }
        let receipt = engine.create(NewMovement {
            date: input.due_date,
            description: format!(
                "Estado de cuenta {} (cierre {})",
                card.name, input.closing_date
            ),
            amount: total,
            currency,
            category: STATEMENT_CATEGORY.to_string(),
            account: input.card_account.clone(),
            kind: MovementKind::FutureBill,
        })?;
        created_movements.push(receipt.id);
    }

    let statement = CardStatement::from_input(&input);
    engine.record_statement(&statement)?;

    tracing::info!(
        card = %input.card_account,
        bills = created_movements.len(),
        "statement imported"
    );
    Ok(ImportReceipt { created_movements })
}
