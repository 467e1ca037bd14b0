//! Two-level lock table
//!
//! The table owns one structural lock and one lock per account:
//!
//! - The **structural lock** guards which ids exist (the id → account-lock
//!   map and the id sequence). Lookups hold it in read mode; create and
//!   delete hold it in write mode.
//! - Each **account lock** guards one account's balance. The account lock
//!   owns the `Account` itself, so an entry exists exactly for the ids in the
//!   map and is inserted and removed with it.
//!
//! # Lock Ordering
//!
//! The structural lock is always taken first. Account locks are only reachable
//! through a structural guard, and [`AccountLocks`] borrows that guard, so
//! account locks are always released before the structural lock.
//!
//! When several account locks are requested they are sorted by id and
//! de-duplicated before any is taken. Every caller therefore acquires
//! overlapping sets in the same relative order, which rules out a circular
//! wait. Guards are released in reverse acquisition order when dropped.

use crate::types::{Account, AccountId, LedgerError};
use parking_lot::lock_api::{ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::{RawRwLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;
use tracing::trace;

type AccountLock = Arc<RwLock<Account>>;

/// Mode in which account locks are acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Read,
    Write,
}

/// State guarded by the structural lock
#[derive(Debug, Default)]
struct Entries {
    accounts: HashMap<AccountId, AccountLock>,
    /// Last id handed out; ids are never reused after deletion
    last_id: u64,
}

/// Owner of the structural lock and every per-account lock
#[derive(Debug, Default)]
pub struct LockTable {
    structure: RwLock<Entries>,
}

impl LockTable {
    /// Create a table with no accounts
    ///
    /// # Returns
    ///
    /// An empty table whose first inserted account receives id 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the structural lock in read mode
    ///
    /// Blocks while a create or delete holds it in write mode.
    ///
    /// # Returns
    ///
    /// A guard through which account locks can be acquired. The structural
    /// lock is released when the guard is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use account_ledger::core::{LockMode, LockTable};
    /// use account_ledger::types::AccountId;
    /// use rust_decimal::Decimal;
    ///
    /// let table = LockTable::new();
    /// table.write().insert("user1".to_string(), Decimal::TEN);
    ///
    /// let structure = table.read();
    /// let locks = structure.acquire(&[AccountId::new(1)], LockMode::Read).unwrap();
    /// assert_eq!(locks.get(AccountId::new(1)).unwrap().balance, Decimal::TEN);
    /// ```
    pub fn read(&self) -> StructureRead<'_> {
        StructureRead {
            entries: self.structure.read(),
        }
    }

    /// Acquire the structural lock in write mode
    ///
    /// Blocks until every outstanding structural reader (and therefore every
    /// account lock taken through one) has been released.
    pub fn write(&self) -> StructureWrite<'_> {
        StructureWrite {
            entries: self.structure.write(),
        }
    }
}

/// Structural lock held in read mode
pub struct StructureRead<'t> {
    entries: RwLockReadGuard<'t, Entries>,
}

impl StructureRead<'_> {
    /// Whether an account exists for `id`
    pub fn contains(&self, id: AccountId) -> bool {
        self.entries.accounts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.accounts.is_empty()
    }

    /// All existing ids in ascending order
    pub fn ids(&self) -> Vec<AccountId> {
        sorted_ids(&self.entries)
    }

    /// Acquire the locks for `ids` in ascending id order
    ///
    /// # Arguments
    ///
    /// * `ids` - Accounts to lock, in any order; duplicates are ignored
    /// * `mode` - Whether the account locks are shared or exclusive
    ///
    /// # Returns
    ///
    /// The held locks, released in reverse order when dropped
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for the lowest missing id. Nothing is locked in
    /// that case.
    pub fn acquire(
        &self,
        ids: &[AccountId],
        mode: LockMode,
    ) -> Result<AccountLocks<'_>, LedgerError> {
        acquire_sorted(&self.entries, ids, mode)
    }
}

/// Structural lock held in write mode
pub struct StructureWrite<'t> {
    entries: RwLockWriteGuard<'t, Entries>,
}

impl StructureWrite<'_> {
    /// Insert a new account together with its lock under the next id
    ///
    /// # Arguments
    ///
    /// * `name` - Display name of the account holder
    /// * `balance` - Opening balance
    ///
    /// # Returns
    ///
    /// A snapshot of the inserted account, carrying its assigned id
    pub fn insert(&mut self, name: String, balance: Decimal) -> Account {
        self.entries.last_id += 1;
        let account = Account::new(AccountId::new(self.entries.last_id), name, balance);
        self.entries
            .accounts
            .insert(account.id, Arc::new(RwLock::new(account.clone())));
        account
    }

    /// Write-lock an account, then remove it and its lock from the table
    ///
    /// The returned guard keeps the removed account write-locked until it is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account exists for `id`.
    pub fn remove(&mut self, id: AccountId) -> Result<RemovedAccount, LedgerError> {
        let lock = self
            .entries
            .accounts
            .get(&id)
            .map(Arc::clone)
            .ok_or_else(|| LedgerError::not_found(id))?;
        let guard = lock.write_arc();
        self.entries.accounts.remove(&id);
        Ok(RemovedAccount { guard })
    }
}

/// An account that has been removed from the table, still write-locked
pub struct RemovedAccount {
    guard: ArcRwLockWriteGuard<RawRwLock, Account>,
}

impl RemovedAccount {
    /// Release the lock and return the account's final state
    pub fn into_account(self) -> Account {
        (*self.guard).clone()
    }
}

impl Deref for RemovedAccount {
    type Target = Account;

    fn deref(&self) -> &Account {
        &self.guard
    }
}

enum AccountGuard {
    Read(ArcRwLockReadGuard<RawRwLock, Account>),
    Write(ArcRwLockWriteGuard<RawRwLock, Account>),
}

impl AccountGuard {
    fn account(&self) -> &Account {
        match self {
            AccountGuard::Read(guard) => &**guard,
            AccountGuard::Write(guard) => &**guard,
        }
    }

    fn account_mut(&mut self) -> Option<&mut Account> {
        match self {
            AccountGuard::Read(_) => None,
            AccountGuard::Write(guard) => Some(&mut **guard),
        }
    }
}

/// A set of account locks held for the lifetime of a structural guard
///
/// Locks are held in ascending id order and released in reverse order on
/// drop, on every exit path.
pub struct AccountLocks<'s> {
    guards: Vec<(AccountId, AccountGuard)>,
    _structure: PhantomData<&'s ()>,
}

impl AccountLocks<'_> {
    /// Shared access to a locked account; `None` if `id` is not held
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.guards
            .iter()
            .find(|(held, _)| *held == id)
            .map(|(_, guard)| guard.account())
    }

    /// Mutable access to two distinct write-locked accounts at once
    ///
    /// # Returns
    ///
    /// The accounts in argument order, or `None` if the ids are equal, either
    /// is not held, or the locks were taken in read mode
    pub fn pair_mut(
        &mut self,
        first: AccountId,
        second: AccountId,
    ) -> Option<(&mut Account, &mut Account)> {
        if first == second {
            return None;
        }

        let mut first_account = None;
        let mut second_account = None;
        for (id, guard) in self.guards.iter_mut() {
            if *id == first {
                first_account = guard.account_mut();
            } else if *id == second {
                second_account = guard.account_mut();
            }
        }

        Some((first_account?, second_account?))
    }

    /// Locked accounts in ascending id order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.guards.iter().map(|(_, guard)| guard.account())
    }
}

impl Drop for AccountLocks<'_> {
    fn drop(&mut self) {
        while let Some((id, guard)) = self.guards.pop() {
            drop(guard);
            trace!(%id, "released account lock");
        }
    }
}

fn sorted_ids(entries: &Entries) -> Vec<AccountId> {
    let mut ids: Vec<AccountId> = entries.accounts.keys().copied().collect();
    ids.sort_unstable();
    ids
}

fn acquire_sorted<'s>(
    entries: &'s Entries,
    ids: &[AccountId],
    mode: LockMode,
) -> Result<AccountLocks<'s>, LedgerError> {
    let mut ordered = ids.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    // Resolve every id before locking anything so a miss leaves nothing held
    let locks = ordered
        .iter()
        .map(|id| {
            entries
                .accounts
                .get(id)
                .map(|lock| (*id, Arc::clone(lock)))
                .ok_or_else(|| LedgerError::not_found(*id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut guards = Vec::with_capacity(locks.len());
    for (id, lock) in locks {
        let guard = match mode {
            LockMode::Read => AccountGuard::Read(lock.read_arc()),
            LockMode::Write => AccountGuard::Write(lock.write_arc()),
        };
        trace!(%id, ?mode, "acquired account lock");
        guards.push((id, guard));
    }

    Ok(AccountLocks {
        guards,
        _structure: PhantomData,
    })
}
