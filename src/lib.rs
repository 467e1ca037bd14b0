//! Account Ledger Library
//! # Overview
//!
//! This library provides an in-memory account ledger that is safe under
//! heavy concurrent use, with a thin HTTP adapter on top.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, AccountId, LedgerError, LedgerEvent)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::lock_table`] - Structural lock plus one lock per account
//!   - [`core::ledger`] - Find, create, delete and transfer under the lock protocol
//!   - [`core::observer`] - Observers notified while locks are held
//! - [`io`] - Loading seed accounts from CSV
//! - [`http`] - JSON over HTTP adapter
//! - [`logging`] - Tracing subscriber setup
//!
//! # Lock Protocol
//!
//! Every operation takes the structural lock first: shared for operations
//! that keep the set of accounts fixed (find, transfer, listing), exclusive
//! for those that change it (create, delete). Account locks are then taken
//! in ascending id order and released before the structural lock, so two
//! callers can never wait on each other in a cycle.
//!
//! # Operations
//!
//! - **Find**: read-lock one account and return a snapshot
//! - **Create**: assign the next id and insert the account
//! - **Delete**: wait for in-flight work on the account, then remove it
//! - **Transfer**: debit and credit two accounts atomically

// Module declarations
pub mod cli;
pub mod core;
pub mod http;
pub mod io;
pub mod logging;
pub mod types;

pub use core::{AccountService, Ledger, LedgerObserver};
pub use io::seed_ledger;
pub use types::{Account, AccountId, ErrorKind, LedgerError, LedgerEvent, NewAccount};
