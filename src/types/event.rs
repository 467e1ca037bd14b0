//! Lifecycle events fired by the ledger while it still holds locks

use std::fmt;

/// Kind of change an observer is notified about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerEvent {
    /// Account inserted; fired under the structural write lock
    Created,
    /// Balance changed by a transfer; fired under both account write locks
    Updated,
    /// Account removed; fired under the structural and account write locks
    Deleted,
    /// Account read; fired under the account read lock
    Loaded,
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LedgerEvent::Created => "CREATED",
            LedgerEvent::Updated => "UPDATED",
            LedgerEvent::Deleted => "DELETED",
            LedgerEvent::Loaded => "LOADED",
        };
        f.write_str(name)
    }
}
