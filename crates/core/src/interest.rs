//! # Interest Module
//!
//! Tính lãi cho tài khoản: `round(balance * percent / 100, 2)` half-up,
//! hoàn toàn bằng Decimal.

use crate::account::{Account, BalanceChange};
use crate::error::CoreResult;
use crate::money::round_money;
use rust_decimal::Decimal;

/// Tính tiền lãi cho một số dư và lãi suất (%)
///
/// # Examples
/// ```
/// use minibank_core::compute_interest;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(compute_interest(dec!(1000.00), dec!(5.00)), dec!(50.00));
/// assert_eq!(compute_interest(dec!(10.10), dec!(2.50)), dec!(0.25));
/// ```
pub fn compute_interest(balance: Decimal, percent: Decimal) -> Decimal {
    round_money(balance * percent / Decimal::ONE_HUNDRED)
}

impl Account {
    /// Tài khoản có được tính lãi không (balance > 0 và percent > 0)
    pub fn earns_interest(&self) -> bool {
        self.balance > Decimal::ZERO && self.percent > Decimal::ZERO
    }

    /// Tính kết quả cộng lãi. `None` nếu tài khoản không đủ điều kiện.
    pub fn accrue_interest(&self) -> CoreResult<Option<BalanceChange>> {
        if !self.earns_interest() {
            return Ok(None);
        }
        let interest = compute_interest(self.balance, self.percent);
        self.apply(interest).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::tests::account;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_interest() {
        let acc = account(dec!(1000.00), dec!(0), dec!(5.00));
        let change = acc.accrue_interest().unwrap().unwrap();
        assert_eq!(change.value, dec!(50.00));
        assert_eq!(change.balance, dec!(1050.00));
        assert_eq!(change.free_balance, dec!(1050.00));
    }

    #[test]
    fn test_interest_rounding_half_up() {
        // 333.30 * 1.5% = 4.9995 -> 5.00
        assert_eq!(compute_interest(dec!(333.30), dec!(1.50)), dec!(5.00));
        // 0.50 * 1% = 0.005 -> 0.01
        assert_eq!(compute_interest(dec!(0.50), dec!(1.00)), dec!(0.01));
        // 0.40 * 1% = 0.004 -> 0.00
        assert_eq!(compute_interest(dec!(0.40), dec!(1.00)), dec!(0.00));
    }

    #[test]
    fn test_interest_includes_debit_in_free_balance() {
        let acc = account(dec!(200), dec!(100), dec!(10));
        let change = acc.accrue_interest().unwrap().unwrap();
        assert_eq!(change.balance, dec!(220));
        assert_eq!(change.free_balance, dec!(320));
    }

    #[test]
    fn test_not_eligible() {
        assert!(account(dec!(0), dec!(0), dec!(5)).accrue_interest().unwrap().is_none());
        assert!(account(dec!(-10), dec!(50), dec!(5)).accrue_interest().unwrap().is_none());
        assert!(account(dec!(100), dec!(0), dec!(0)).accrue_interest().unwrap().is_none());
    }
}
