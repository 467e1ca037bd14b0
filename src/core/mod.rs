//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - The account service and observer abstractions
//! - `lock_table` - Structural and per-account locks with ordered acquisition
//! - `ledger` - Lock orchestration for find, create, delete and transfer
//! - `observer` - Tracing, recording and blocking observers

pub mod ledger;
pub mod lock_table;
pub mod observer;
pub mod traits;

pub use ledger::Ledger;
pub use lock_table::{AccountLocks, LockMode, LockTable};
pub use observer::{BlockingObserver, Checkpoint, RecordingObserver, TracingObserver};
pub use traits::{AccountService, LedgerObserver};
