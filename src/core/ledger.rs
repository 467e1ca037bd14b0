//! In-memory account ledger
//!
//! This module provides the `Ledger`, which implements [`AccountService`] on
//! top of the [`LockTable`]. The ledger decides which locks each operation
//! takes and in which order:
//!
//! | operation  | structural lock | account locks                  | event            |
//! |------------|-----------------|--------------------------------|------------------|
//! | `find`     | read            | the account, read              | `LOADED`         |
//! | `create`   | write           | none                           | `CREATED`        |
//! | `delete`   | write           | the account, write             | `DELETED`        |
//! | `transfer` | read            | both accounts, write, by id    | `UPDATED` (x2)   |
//! | `accounts` | read            | every account, read, by id     | none             |
//!
//! Observers fire before any lock is released. Every multi-step operation
//! validates before it mutates, so a failed call leaves no partial change. A
//! transfer only applies when both the debit and the credit are exact at
//! `Decimal` precision, so the sum of the two balances is always conserved.

use crate::core::lock_table::{LockMode, LockTable};
use crate::core::traits::{AccountService, LedgerObserver};
use crate::types::{Account, AccountId, LedgerError, LedgerEvent, NewAccount};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Thread-safe account ledger
///
/// Share it between threads behind an `Arc`; every method takes `&self`.
pub struct Ledger {
    locks: LockTable,
    observers: Vec<Arc<dyn LedgerObserver>>,
}

impl Ledger {
    /// Create an empty ledger with no observers
    ///
    /// # Examples
    ///
    /// ```
    /// use account_ledger::core::{AccountService, Ledger};
    /// use account_ledger::types::NewAccount;
    /// use rust_decimal::Decimal;
    ///
    /// let ledger = Ledger::new();
    /// let from = ledger.create(NewAccount::new("user1", Decimal::new(450, 1))).unwrap();
    /// let to = ledger.create(NewAccount::new("user2", Decimal::new(975, 1))).unwrap();
    ///
    /// ledger.transfer(from.id, to.id, Decimal::from(20)).unwrap();
    /// assert_eq!(ledger.find(to.id).unwrap().balance, Decimal::new(1175, 1));
    /// ```
    pub fn new() -> Self {
        Ledger {
            locks: LockTable::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer; observers fire in registration order
    ///
    /// # Arguments
    ///
    /// * `observer` - Called for every event while the event's locks are held
    ///
    /// # Returns
    ///
    /// The ledger, for chaining
    pub fn with_observer(mut self, observer: Arc<dyn LedgerObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of accounts currently in the ledger
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }

    fn notify(&self, event: LedgerEvent, account: &Account) {
        for observer in &self.observers {
            observer.on_event(event, account);
        }
    }

    fn transfer_locked(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::invalid_argument(format!(
                "The from and to account should not be the same [{}]",
                from
            )));
        }

        let structure = self.locks.read();
        for id in [from, to] {
            if !structure.contains(id) {
                return Err(LedgerError::not_found(id));
            }
        }

        let mut locks = structure.acquire(&[from, to], LockMode::Write)?;
        let (source, destination) = locks
            .pair_mut(from, to)
            .ok_or_else(|| LedgerError::invalid_argument("Transfer accounts are not write-locked"))?;

        // Credit is checked first; withdraw checks its own leg before mutating
        destination.check_deposit(amount)?;
        source.withdraw(amount)?;
        destination.deposit(amount)?;

        self.notify(LedgerEvent::Updated, source);
        self.notify(LedgerEvent::Updated, destination);
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("locks", &self.locks)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl AccountService for Ledger {
    fn find(&self, id: AccountId) -> Option<Account> {
        let structure = self.locks.read();
        let Ok(locks) = structure.acquire(&[id], LockMode::Read) else {
            debug!(%id, "account not found");
            return None;
        };

        let account = locks.get(id)?;
        self.notify(LedgerEvent::Loaded, account);
        Some(account.clone())
    }

    fn create(&self, request: NewAccount) -> Result<Account, LedgerError> {
        let mut structure = self.locks.write();

        if let Some(id) = request.id.filter(|id| id.get() != 0) {
            return Err(LedgerError::invalid_argument(format!(
                "Account already has an ID [{}] and cannot be created",
                id
            )));
        }
        if request.balance < Decimal::ZERO {
            return Err(LedgerError::invalid_argument(format!(
                "Opening balance [{}] cannot be negative",
                request.balance
            )));
        }

        let account = structure.insert(request.name, request.balance);
        self.notify(LedgerEvent::Created, &account);
        debug!(id = %account.id, balance = %account.balance, "account created");
        Ok(account)
    }

    fn delete(&self, id: AccountId) -> Result<Account, LedgerError> {
        let mut structure = self.locks.write();
        let removed = structure.remove(id)?;
        self.notify(LedgerEvent::Deleted, &removed);
        debug!(%id, "account deleted");
        Ok(removed.into_account())
    }

    fn transfer(&self, from: AccountId, to: AccountId, amount: Decimal) -> Result<(), LedgerError> {
        let result = self.transfer_locked(from, to, amount);
        match &result {
            Ok(()) => debug!(%from, %to, %amount, "transfer applied"),
            Err(error) => debug!(%from, %to, %amount, %error, "transfer rejected"),
        }
        result
    }

    fn accounts(&self) -> Vec<Account> {
        let structure = self.locks.read();
        let ids = structure.ids();
        structure
            .acquire(&ids, LockMode::Read)
            .map(|locks| locks.accounts().cloned().collect())
            .unwrap_or_default()
    }
}
