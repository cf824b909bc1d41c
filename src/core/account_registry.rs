//! Account registry with serialized balance mutation
//!
//! Holds the account rows loaded from the store and owns every balance
//! write. Mutation goes through [`AccountRegistry::apply`], which holds the
//! account's map entry for the whole read-add-persist-update sequence, so
//! two applies against the same account can never interleave. The store is
//! written before the in-memory balance changes; a store failure leaves the
//! balance exactly as it was.

use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::store::TabularStore;
use crate::types::{Account, LedgerError};

/// Registry of accounts keyed by exact name
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: DashMap<String, Account>,
}

impl AccountRegistry {
    /// Build the registry from loaded account rows
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` when two rows share a name; names are the
    /// natural key and a collision must fail the load.
    pub fn load(accounts: Vec<Account>) -> Result<Self, LedgerError> {
        let registry = AccountRegistry {
            accounts: DashMap::with_capacity(accounts.len()),
        };
        for account in accounts {
            let name = account.name.clone();
            if registry.accounts.insert(name.clone(), account).is_some() {
                return Err(LedgerError::duplicate_account(&name));
            }
        }
        Ok(registry)
    }

    /// Look up an account by exact name
    pub fn get(&self, name: &str) -> Option<Account> {
        self.accounts.get(name).map(|entry| entry.value().clone())
    }

    /// Look up an account, failing with `AccountNotFound`
    pub fn require(&self, name: &str) -> Result<Account, LedgerError> {
        self.get(name)
            .ok_or_else(|| LedgerError::account_not_found(name))
    }

    /// Snapshot of every account, sorted by name
    pub fn all(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        accounts
    }

    /// Apply a signed delta to an account balance and persist it
    ///
    /// The new balance is written to the store first and committed to
    /// memory only on success, so callers can treat a failure here as
    /// "nothing happened".
    ///
    /// # Returns
    ///
    /// The balance after the delta.
    ///
    /// # Errors
    ///
    /// * `AccountNotFound` - the name resolves to no account
    /// * `ArithmeticOverflow` - the checked addition failed; balance untouched
    /// * `StorageUnavailable` - the store rejected the write; balance untouched
    pub fn apply(
        &self,
        name: &str,
        delta: Decimal,
        store: &mut dyn TabularStore,
    ) -> Result<Decimal, LedgerError> {
        let mut entry = self
            .accounts
            .get_mut(name)
            .ok_or_else(|| LedgerError::account_not_found(name))?;

        let updated = entry
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::arithmetic_overflow("balance update", name))?;

        store
            .write_balance(name, updated)
            .map_err(|e| LedgerError::storage_unavailable("write_balance", e))?;

        entry.balance = updated;
        tracing::debug!(account = name, %delta, balance = %updated, "balance applied");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::Currency;

    fn seeded() -> (AccountRegistry, MemoryStore) {
        let accounts = vec![
            Account::new("Efectivo", Currency::Uyu),
            Account::credit("Visa Itau", Currency::Uyu),
        ];
        let store = MemoryStore::with_accounts(accounts.clone());
        (AccountRegistry::load(accounts).unwrap(), store)
    }

    #[test]
    fn duplicate_names_fail_the_load() {
        let accounts = vec![
            Account::new("Efectivo", Currency::Uyu),
            Account::new("Efectivo", Currency::Usd),
        ];
        let err = AccountRegistry::load(accounts).unwrap_err();
        assert_eq!(err, LedgerError::duplicate_account("Efectivo"));
    }

    #[test]
    fn lookup_is_exact_match() {
        let (registry, _) = seeded();
        assert!(registry.get("Efectivo").is_some());
        assert!(registry.get("efectivo").is_none());
        assert_eq!(
            registry.require("Brou").unwrap_err(),
            LedgerError::account_not_found("Brou")
        );
    }

    #[test]
    fn apply_persists_then_commits() {
        let (registry, mut store) = seeded();
        let balance = registry
            .apply("Efectivo", Decimal::new(-250, 0), &mut store)
            .unwrap();
        assert_eq!(balance, Decimal::new(-250, 0));
        assert_eq!(registry.get("Efectivo").unwrap().balance, balance);
        assert_eq!(store.accounts()[0].balance, balance);
    }

    #[test]
    fn store_failure_leaves_balance_untouched() {
        let (registry, _) = seeded();
        let mut store = MemoryStore::with_accounts(registry.all()).fail_after(0);
        let err = registry
            .apply("Efectivo", Decimal::new(100, 0), &mut store)
            .unwrap_err();
        assert!(matches!(err, LedgerError::StorageUnavailable { .. }));
        assert_eq!(registry.get("Efectivo").unwrap().balance, Decimal::ZERO);
    }
}
