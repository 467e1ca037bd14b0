//! Account-related types for the account ledger
//!
//! This module defines the Account structure, its identifier, and the guarded
//! balance arithmetic used by transfers.

use super::error::LedgerError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Account identifier
///
/// Identities are assigned by the ledger on creation and never change.
/// `0` is reserved to mean "no identity yet" on creation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(u64);

impl AccountId {
    pub const fn new(id: u64) -> Self {
        AccountId(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(AccountId)
            .map_err(|_| LedgerError::invalid_argument(format!("Invalid account id [{}]", s)))
    }
}

/// Account state
///
/// Balance mutation goes through [`Account::withdraw`] and
/// [`Account::deposit`]. Neither synchronizes on its own: the ledger only
/// hands out `&mut Account` while the account's write lock is held.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Ledger-assigned identity
    pub id: AccountId,

    /// Display name of the account holder
    pub name: String,

    /// Current balance
    ///
    /// Never negative once the account has been created through the ledger.
    pub balance: Decimal,
}

impl Account {
    pub fn new(id: AccountId, name: impl Into<String>, balance: Decimal) -> Self {
        Account {
            id,
            name: name.into(),
            balance,
        }
    }

    /// Withdraw funds from the account
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if `amount` exceeds the balance, or
    /// `BalanceOverflow` if the new balance cannot be represented exactly
    /// (see [`Account::check_withdraw`]). The balance is left untouched on
    /// failure.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self.check_withdraw(amount)?;
        Ok(())
    }

    /// Deposit funds into the account
    ///
    /// # Errors
    ///
    /// Returns `BalanceOverflow` if the deposit would not strictly increase
    /// the balance by exactly `amount` (see [`Account::check_deposit`]).
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self.check_deposit(amount)?;
        Ok(())
    }

    /// Validate a withdrawal without applying it
    ///
    /// # Returns
    ///
    /// The balance the withdrawal would leave behind.
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds` when `amount` exceeds the balance.
    /// - `BalanceOverflow` when the result is not strictly below the current
    ///   balance (zero or negative amounts), or when it differs from the
    ///   current balance by anything other than exactly `amount`. The latter
    ///   happens when `balance - amount` needs more significant digits than
    ///   a `Decimal` holds and is rounded.
    pub fn check_withdraw(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::insufficient_funds(self.id, self.balance, amount));
        }

        match self.balance.checked_sub(amount) {
            Some(new_balance)
                if new_balance < self.balance
                    && self.balance.checked_sub(new_balance) == Some(amount) =>
            {
                Ok(new_balance)
            }
            _ => Err(LedgerError::withdrawal_rounding(self.id, self.balance, amount)),
        }
    }

    /// Validate a deposit without applying it
    ///
    /// # Returns
    ///
    /// The balance the deposit would produce.
    ///
    /// # Errors
    ///
    /// `BalanceOverflow` when `balance + amount` overflows, when it is not
    /// strictly greater than the current balance (zero or negative amounts,
    /// or amounts lost to precision), or when it differs from the current
    /// balance by anything other than exactly `amount` (partial rounding).
    pub fn check_deposit(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        match self.balance.checked_add(amount) {
            Some(new_balance)
                if new_balance > self.balance
                    && new_balance.checked_sub(self.balance) == Some(amount) =>
            {
                Ok(new_balance)
            }
            _ => Err(LedgerError::balance_overflow(self.id, self.balance, amount)),
        }
    }
}

/// Request to create an account
///
/// `id` mirrors what a client may send; the ledger rejects any non-zero id
/// because identity is always assigned on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub id: Option<AccountId>,
    pub name: String,
    pub balance: Decimal,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, balance: Decimal) -> Self {
        NewAccount {
            id: None,
            name: name.into(),
            balance,
        }
    }

    pub fn with_id(mut self, id: AccountId) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(balance: Decimal) -> Account {
        Account::new(AccountId::new(1), "user1", balance)
    }

    #[test]
    fn test_withdraw_decreases_balance() {
        let mut account = account(Decimal::new(450, 1));

        account.withdraw(Decimal::new(200, 1)).unwrap();

        assert_eq!(account.balance, Decimal::new(250, 1));
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = account(Decimal::new(450, 1));

        account.withdraw(Decimal::new(450, 1)).unwrap();

        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_withdraw_with_insufficient_funds() {
        let mut account = account(Decimal::new(250, 1));

        let result = account.withdraw(Decimal::from(200_000));

        assert_eq!(
            result.unwrap_err(),
            LedgerError::insufficient_funds(AccountId::new(1), Decimal::new(250, 1), Decimal::from(200_000))
        );
        // Account should remain unchanged
        assert_eq!(account.balance, Decimal::new(250, 1));
    }

    #[test]
    fn test_deposit_increases_balance() {
        let mut account = account(Decimal::new(975, 1));

        account.deposit(Decimal::from(20)).unwrap();

        assert_eq!(account.balance, Decimal::new(1175, 1));
    }

    #[rstest]
    #[case::zero(Decimal::new(100, 1), Decimal::ZERO)]
    #[case::negative(Decimal::new(100, 1), Decimal::new(-5, 0))]
    #[case::overflow(Decimal::MAX, Decimal::ONE)]
    #[case::precision_collapse(Decimal::from_i128_with_scale(10_i128.pow(27), 0), Decimal::new(1, 2))]
    fn test_deposit_rejected_when_balance_does_not_grow(
        #[case] balance: Decimal,
        #[case] amount: Decimal,
    ) {
        let mut account = account(balance);

        let result = account.deposit(amount);

        assert!(matches!(result, Err(LedgerError::BalanceOverflow { .. })));
        assert_eq!(account.balance, balance);
    }

    #[test]
    fn test_deposit_rejected_when_partially_rounded() {
        // 10^28 + 1.5 does not fit and rounds to 10^28 + 2
        let balance = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        let mut account = account(balance);

        let result = account.deposit(Decimal::new(15, 1));

        assert!(matches!(result, Err(LedgerError::BalanceOverflow { .. })));
        assert_eq!(account.balance, balance);
    }

    #[rstest]
    #[case::below_precision(Decimal::new(450, 1), Decimal::new(1, 28))]
    #[case::partially_rounded(Decimal::from_i128_with_scale(10_i128.pow(28), 0), Decimal::new(15, 1))]
    #[case::zero(Decimal::new(450, 1), Decimal::ZERO)]
    #[case::negative(Decimal::new(450, 1), Decimal::new(-5, 0))]
    fn test_withdraw_rejected_when_not_exact(#[case] balance: Decimal, #[case] amount: Decimal) {
        let mut account = account(balance);

        let result = account.withdraw(amount);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::withdrawal_rounding(AccountId::new(1), balance, amount)
        );
        assert_eq!(account.balance, balance);
    }

    #[test]
    fn test_withdraw_smallest_unit_from_small_balance() {
        let mut account = account(Decimal::new(1, 27));

        account.withdraw(Decimal::new(1, 28)).unwrap();

        assert_eq!(account.balance, Decimal::new(9, 28));
    }

    #[test]
    fn test_check_withdraw_does_not_mutate() {
        let account = account(Decimal::from(10));

        let projected = account.check_withdraw(Decimal::from(4)).unwrap();

        assert_eq!(projected, Decimal::from(6));
        assert_eq!(account.balance, Decimal::from(10));
    }

    #[test]
    fn test_check_deposit_does_not_mutate() {
        let account = account(Decimal::from(10));

        let projected = account.check_deposit(Decimal::from(5)).unwrap();

        assert_eq!(projected, Decimal::from(15));
        assert_eq!(account.balance, Decimal::from(10));
    }

    #[rstest]
    #[case("1", Some(1))]
    #[case(" 42 ", Some(42))]
    #[case("abc", None)]
    #[case("-1", None)]
    #[case("", None)]
    fn test_account_id_parsing(#[case] input: &str, #[case] expected: Option<u64>) {
        let parsed = input.parse::<AccountId>().ok().map(AccountId::get);
        assert_eq!(parsed, expected);
    }
}
