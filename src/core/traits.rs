//! Core traits for the account service and its observers
//!
//! `AccountService` is the seam the HTTP adapter talks to; `LedgerObserver`
//! is the hook the ledger fires while it still holds the locks relevant to
//! an event.

use crate::types::{Account, AccountId, LedgerError, LedgerEvent, NewAccount};
use rust_decimal::Decimal;

/// Operations exposed by an account ledger
///
/// Implementations must be safe to call from many threads at once.
pub trait AccountService: Send + Sync {
    /// Look up an account; `None` if the id does not exist
    fn find(&self, id: AccountId) -> Option<Account>;

    /// Create an account and assign it an identity
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the request carries a non-zero id or a
    /// negative opening balance.
    fn create(&self, request: NewAccount) -> Result<Account, LedgerError>;

    /// Remove an account, returning its final state
    ///
    /// Waits for every in-flight operation on the account to finish first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account exists for `id`.
    fn delete(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Atomically move `amount` from one account to another
    ///
    /// # Arguments
    ///
    /// * `from` - Account debited
    /// * `to` - Account credited
    /// * `amount` - Sum to move; must be positive
    ///
    /// # Errors
    ///
    /// Checked in this order, with no balance changed on failure:
    /// - `InvalidArgument` if `from == to`
    /// - `NotFound` for `from`, then for `to`
    /// - `BalanceOverflow` if the credit to `to` is not exact
    /// - `InsufficientFunds` if `amount` exceeds the balance of `from`
    /// - `BalanceOverflow` if the debit from `from` is not exact
    fn transfer(&self, from: AccountId, to: AccountId, amount: Decimal) -> Result<(), LedgerError>;

    /// Snapshot of every account, sorted by id
    fn accounts(&self) -> Vec<Account>;
}

/// Synchronous observer of ledger lifecycle events
///
/// Called in-line while the ledger holds the locks that protect `account`.
/// An implementation that blocks keeps those locks held, so anything slow
/// belongs on another thread.
pub trait LedgerObserver: Send + Sync {
    fn on_event(&self, event: LedgerEvent, account: &Account);
}
