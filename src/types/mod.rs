//! Types module
//!
//! Contains core data structures used throughout the application:
//! - `account`: Account state, identifiers and balance arithmetic
//! - `event`: Lifecycle events delivered to observers
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod event;

pub use account::{Account, AccountId, NewAccount};
pub use error::{BalanceOperation, ErrorKind, LedgerError};
pub use event::LedgerEvent;
