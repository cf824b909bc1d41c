//! Ledger engine: lifecycle rules and balance reconciliation
//!
//! The engine owns every mutation of the ledger. It decides which lifecycle
//! state a new movement enters, what each (kind, state) pair contributes to
//! an account balance, and in what order validation, balance application,
//! and persistence happen.
//!
//! Every operation validates first and mutates second: caller errors (bad
//! amount, unknown account, wrong state) are raised before any balance or
//! store row changes. Once mutation starts, a store failure is reported as
//! `StorageUnavailable` when nothing stuck, or `InconsistentState` when the
//! balance step succeeded but the record step did not.

use chrono::{Duration, Local};
use rust_decimal::Decimal;

use super::account_registry::AccountRegistry;
use super::movement_ledger::MovementLedger;
use crate::store::TabularStore;
use crate::types::{
    Account, CardStatement, CreateReceipt, LedgerError, Movement, MovementId, MovementKind,
    MovementPatch, MovementState, NewMovement, SettleReceipt,
};

/// Category assigned to residual-debt movements created by partial settles
const RESIDUAL_CATEGORY: &str = "Deuda";

/// Grace period granted to the residual of a partial settle
const RESIDUAL_GRACE_DAYS: i64 = 30;

/// The reconciliation engine
///
/// Holds the account registry and movement ledger in memory and keeps them
/// in lock-step with the backing store.
#[derive(Debug)]
pub struct LedgerEngine<S: TabularStore> {
    accounts: AccountRegistry,
    movements: MovementLedger,
    store: S,
}

impl<S: TabularStore> LedgerEngine<S> {
    /// Load the engine from a store
    ///
    /// # Errors
    ///
    /// * `StorageUnavailable` - a table could not be read
    /// * `DuplicateAccount` - two account rows share a name
    pub fn load(mut store: S) -> Result<Self, LedgerError> {
        let accounts = store
            .load_accounts()
            .map_err(|e| LedgerError::storage_unavailable("load_accounts", e))?;
        let movements = store
            .load_movements()
            .map_err(|e| LedgerError::storage_unavailable("load_movements", e))?;
        Ok(LedgerEngine {
            accounts: AccountRegistry::load(accounts)?,
            movements: MovementLedger::load(movements),
            store,
        })
    }

    /// Look up one account by exact name
    pub fn account(&self, name: &str) -> Option<Account> {
        self.accounts.get(name)
    }

    /// Snapshot of every account, sorted by name
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.all()
    }

    /// Look up one movement by id
    pub fn movement(&self, id: MovementId) -> Option<Movement> {
        self.movements.get(id).cloned()
    }

    /// Snapshot of every movement, sorted by id
    pub fn movements(&self) -> Vec<Movement> {
        self.movements.all()
    }

    /// Borrow the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Signed balance contribution of a movement in a given state
    ///
    /// This table is the single source of truth for how lifecycle states
    /// touch balances:
    ///
    /// | kind        | state              | contribution |
    /// |-------------|--------------------|--------------|
    /// | income      | paid               | `+amount`    |
    /// | expense     | paid               | `-amount`    |
    /// | future bill | paid               | `-amount`    |
    /// | any         | pending            | zero         |
    /// | any         | on credit facility | zero         |
    fn contribution(kind: MovementKind, state: MovementState, amount: Decimal) -> Decimal {
        match (state, kind) {
            (MovementState::Paid, MovementKind::Income) => amount,
            (MovementState::Paid, _) => -amount,
            _ => Decimal::ZERO,
        }
    }

    /// Record a new movement
    ///
    /// The lifecycle state is decided here: incomes are `Paid` immediately,
    /// expenses are `Paid` against liquid accounts and `OnCreditFacility`
    /// against credit facilities, and future bills start `Pending`.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - amount is zero or negative
    /// * `AccountNotFound` - the named account does not exist
    /// * `StorageUnavailable` - the store failed before anything stuck
    /// * `InconsistentState` - the balance moved but the row was not persisted
    pub fn create(&mut self, input: NewMovement) -> Result<CreateReceipt, LedgerError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(input.amount));
        }
        let account = self.accounts.require(&input.account)?;

        let state = match input.kind {
            MovementKind::Income => MovementState::Paid,
            MovementKind::Expense if account.credit_facility => MovementState::OnCreditFacility,
            MovementKind::Expense => MovementState::Paid,
            MovementKind::FutureBill => MovementState::Pending,
        };

        let delta = Self::contribution(input.kind, state, input.amount);
        if !delta.is_zero() {
            self.accounts.apply(&input.account, delta, &mut self.store)?;
        }

        let id = self.movements.next_id();
        let movement = Movement {
            id,
            date: input.date,
            description: input.description,
            amount: input.amount,
            currency: input.currency,
            category: input.category,
            account: input.account,
            kind: input.kind,
            state,
            paid_on: (state == MovementState::Paid).then_some(input.date),
        };

        self.store.append_movement(&movement).map_err(|e| {
            if delta.is_zero() {
                LedgerError::storage_unavailable("append_movement", e)
            } else {
                LedgerError::inconsistent_state(id, "balance applied, movement row not persisted")
            }
        })?;
        self.movements.insert(movement);

        tracing::info!(id, %state, "movement created");
        Ok(CreateReceipt { id, state })
    }

    /// Settle a `Pending` movement, in full or in part
    ///
    /// Debits `amount_paid` from the paying account and closes the
    /// movement. When the payment falls short of the owed amount, a
    /// residual-debt movement is created for the difference: a `Pending`
    /// future bill against the original movement's account, due thirty days
    /// out, categorized under "Deuda".
    ///
    /// The original movement keeps its recorded amount after a partial
    /// settle; `Paid` means closed, and the outstanding difference lives
    /// under the residual's own id.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - `amount_paid` is zero or negative
    /// * `MovementNotFound` / `MovementNotPending` - bad target
    /// * `AccountNotFound` - paying or owed account does not exist
    /// * `StorageUnavailable` - failure before any mutation stuck
    /// * `InconsistentState` - the debit stuck but a record step failed
    pub fn settle(
        &mut self,
        id: MovementId,
        paying_account: &str,
        amount_paid: Decimal,
    ) -> Result<SettleReceipt, LedgerError> {
        if amount_paid <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount_paid));
        }
        let movement = self
            .movements
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::movement_not_found(id))?;
        if movement.state != MovementState::Pending {
            return Err(LedgerError::movement_not_pending(id, movement.state));
        }
        self.accounts.require(paying_account)?;
        self.accounts.require(&movement.account)?;

        self.accounts
            .apply(paying_account, -amount_paid, &mut self.store)?;

        let today = Local::now().date_naive();
        let mut paid = movement.clone();
        paid.state = MovementState::Paid;
        paid.paid_on = Some(today);

        self.store.update_movement(&paid).map_err(|_| {
            LedgerError::inconsistent_state(id, "payment debited, movement row not marked paid")
        })?;
        self.movements.insert(paid);

        let residual = if amount_paid < movement.amount {
            let residual_id = self.movements.next_id();
            let residual = Movement {
                id: residual_id,
                date: today + Duration::days(RESIDUAL_GRACE_DAYS),
                description: movement.description.clone(),
                amount: movement.amount - amount_paid,
                currency: movement.currency,
                category: RESIDUAL_CATEGORY.to_string(),
                account: movement.account.clone(),
                kind: MovementKind::FutureBill,
                state: MovementState::Pending,
                paid_on: None,
            };
            self.store.append_movement(&residual).map_err(|_| {
                LedgerError::inconsistent_state(
                    id,
                    "partial payment applied, residual row not persisted",
                )
            })?;
            self.movements.insert(residual);
            Some(residual_id)
        } else {
            None
        };

        tracing::info!(id, paying_account, %amount_paid, ?residual, "movement settled");
        Ok(SettleReceipt { residual })
    }

    /// Edit a movement's magnitude or attribution
    ///
    /// Neither the kind nor the lifecycle state can change through an edit.
    /// When the movement currently contributes to a balance, the old
    /// contribution is reversed and the new one applied, so moving a paid
    /// expense between accounts credits one and debits the other.
    ///
    /// # Errors
    ///
    /// * `MovementNotFound` - no movement under this id
    /// * `InvalidAmount` - patched amount is zero or negative
    /// * `AccountNotFound` - old or new account does not exist
    /// * `StorageUnavailable` - failure before any mutation stuck
    /// * `InconsistentState` - failure after the reversal was applied
    pub fn edit(&mut self, id: MovementId, patch: MovementPatch) -> Result<(), LedgerError> {
        if let Some(amount) = patch.amount {
            if amount <= Decimal::ZERO {
                return Err(LedgerError::invalid_amount(amount));
            }
        }
        let original = self
            .movements
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::movement_not_found(id))?;
        if patch.is_empty() {
            return Ok(());
        }

        let mut updated = original.clone();
        if let Some(date) = patch.date {
            updated.date = date;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(amount) = patch.amount {
            updated.amount = amount;
        }
        if let Some(currency) = patch.currency {
            updated.currency = currency;
        }
        if let Some(category) = patch.category {
            updated.category = category;
        }
        if let Some(account) = patch.account {
            updated.account = account;
        }

        self.accounts.require(&original.account)?;
        self.accounts.require(&updated.account)?;

        let old_delta = Self::contribution(original.kind, original.state, original.amount);
        let new_delta = Self::contribution(updated.kind, updated.state, updated.amount);

        if !old_delta.is_zero() {
            self.accounts
                .apply(&original.account, -old_delta, &mut self.store)?;
        }
        if !new_delta.is_zero() {
            self.accounts
                .apply(&updated.account, new_delta, &mut self.store)
                .map_err(|e| {
                    if old_delta.is_zero() {
                        e
                    } else {
                        LedgerError::inconsistent_state(
                            id,
                            "old contribution reversed, new one not applied",
                        )
                    }
                })?;
        }

        self.store.update_movement(&updated).map_err(|e| {
            if old_delta.is_zero() && new_delta.is_zero() {
                LedgerError::storage_unavailable("update_movement", e)
            } else {
                LedgerError::inconsistent_state(id, "balances moved, movement row not persisted")
            }
        })?;
        self.movements.insert(updated);

        tracing::info!(id, "movement edited");
        Ok(())
    }

    /// Delete a movement, reversing its balance contribution
    ///
    /// Deleting a paid income debits the amount back; deleting a paid
    /// expense or bill credits it back. `Pending` and `OnCreditFacility`
    /// movements contribute nothing, so their deletion only removes the row.
    ///
    /// # Errors
    ///
    /// * `MovementNotFound` - no movement under this id
    /// * `AccountNotFound` - the referenced account does not exist
    /// * `StorageUnavailable` - failure before any mutation stuck
    /// * `InconsistentState` - the reversal stuck but the row remains
    pub fn delete(&mut self, id: MovementId) -> Result<(), LedgerError> {
        let movement = self
            .movements
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::movement_not_found(id))?;

        let delta = Self::contribution(movement.kind, movement.state, movement.amount);
        if !delta.is_zero() {
            self.accounts.require(&movement.account)?;
            self.accounts
                .apply(&movement.account, -delta, &mut self.store)?;
        }

        self.store.delete_movement(id).map_err(|e| {
            if delta.is_zero() {
                LedgerError::storage_unavailable("delete_movement", e)
            } else {
                LedgerError::inconsistent_state(id, "contribution reversed, row not removed")
            }
        })?;
        self.movements.remove(id);

        tracing::info!(id, "movement deleted");
        Ok(())
    }

    /// Append a statement to the history table
    pub(crate) fn record_statement(
        &mut self,
        statement: &CardStatement,
    ) -> Result<(), LedgerError> {
        self.store
            .append_statement(statement)
            .map_err(|e| LedgerError::storage_unavailable("append_statement", e))
    }
}
