//! Error types for the account ledger
//!
//! Every failure the ledger reports is a normal business outcome: it is
//! detected synchronously, never retried, and always reported before any
//! balance has been mutated.
//!
//! # Error Categories
//!
//! - **NotFound**: unknown account id
//! - **InvalidArgument**: same-account transfer, id supplied on create, unparseable input
//! - **InsufficientFunds**: withdrawal exceeds balance
//! - **BalanceOverflow**: a deposit or withdrawal cannot be represented
//!   exactly (overflow, or a result rounded to 28 significant digits)

use super::account::AccountId;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No account exists for the id
    #[error("Account Id [{id}] not found")]
    NotFound {
        /// The id that was looked up
        id: AccountId,
    },

    /// The request itself is malformed
    #[error("{message}")]
    InvalidArgument {
        /// Description of what was wrong
        message: String,
    },

    /// Withdrawal exceeds the available balance
    #[error("Could not withdraw [{requested}]. Balance available is only [{balance}] for account [{id}]")]
    InsufficientFunds {
        id: AccountId,
        balance: Decimal,
        requested: Decimal,
    },

    /// Deposit or withdrawal would overflow or be lost to rounding
    #[error("Rounding error with balance [{balance}] for account [{id}] when {operation} [{amount}]")]
    BalanceOverflow {
        id: AccountId,
        balance: Decimal,
        amount: Decimal,
        operation: BalanceOperation,
    },
}

/// Balance change that failed a [`LedgerError::BalanceOverflow`] check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceOperation {
    Deposit,
    Withdrawal,
}

impl fmt::Display for BalanceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceOperation::Deposit => f.write_str("depositing"),
            BalanceOperation::Withdrawal => f.write_str("withdrawing"),
        }
    }
}

/// Stable name for each error variant
///
/// Carried as structured data so adapters can report the kind without
/// matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InsufficientFunds,
    BalanceOverflow,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::InsufficientFunds => "InsufficientFunds",
            ErrorKind::BalanceOverflow => "BalanceOverflow",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Helper functions for creating common errors

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::BalanceOverflow { .. } => ErrorKind::BalanceOverflow,
        }
    }

    /// Create a NotFound error
    pub fn not_found(id: AccountId) -> Self {
        LedgerError::NotFound { id }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            id,
            balance,
            requested,
        }
    }

    /// Create a BalanceOverflow error for a deposit
    pub fn balance_overflow(id: AccountId, balance: Decimal, amount: Decimal) -> Self {
        LedgerError::BalanceOverflow {
            id,
            balance,
            amount,
            operation: BalanceOperation::Deposit,
        }
    }

    /// Create a BalanceOverflow error for a withdrawal whose result rounds
    pub fn withdrawal_rounding(id: AccountId, balance: Decimal, amount: Decimal) -> Self {
        LedgerError::BalanceOverflow {
            id,
            balance,
            amount,
            operation: BalanceOperation::Withdrawal,
        }
    }
}
