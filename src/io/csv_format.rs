//! CSV format handling for seed accounts
//!
//! Seed files have the columns `name,balance`. This module converts a
//! deserialized row into a creation request; it does no I/O.

use crate::types::NewAccount;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// CSV record structure for deserialization
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SeedRecord {
    pub name: String,
    pub balance: String,
}

/// Convert a SeedRecord to a NewAccount
///
/// # Errors
///
/// Returns a message if the name is empty or the balance is not a decimal.
pub fn convert_seed_record(record: SeedRecord) -> Result<NewAccount, String> {
    let name = record.name.trim();
    if name.is_empty() {
        return Err("Account name must not be empty".to_string());
    }

    let balance = Decimal::from_str(record.balance.trim())
        .map_err(|_| format!("Invalid balance '{}' for account '{}'", record.balance, name))?;

    Ok(NewAccount::new(name, balance))
}
