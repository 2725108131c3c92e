//! # Account Module
//!
//! Định nghĩa Account - tài khoản của khách hàng, và các quy tắc cập nhật
//! số dư (balance / free balance / debit).
//!
//! Bất biến: `free_balance == balance + debit` và `free_balance >= 0`.

use crate::error::{CoreError, CoreResult};
use crate::money;
use crate::operation::OperationRequest;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kiểm tra debit (hạn mức thấu chi) hợp lệ
fn check_debit(debit: Decimal) -> CoreResult<()> {
    if debit < Decimal::ZERO {
        return Err(CoreError::validation(
            "debit",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    money::check_money("debit", debit)
}

/// Dữ liệu form mở tài khoản mới.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Mã loại tài khoản
    pub account_type: String,
    /// Lãi suất; None thì lấy mặc định của loại tài khoản
    pub percent: Option<Decimal>,
    /// Hạn mức debit
    pub debit: Decimal,
}

impl NewAccount {
    /// Debit và percent về scale 2
    pub fn normalized(self) -> Self {
        Self {
            percent: self.percent.map(money::fixed_scale),
            debit: money::fixed_scale(self.debit),
            ..self
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_debit(self.debit)?;
        if let Some(percent) = self.percent {
            money::check_percent("percent", percent)?;
        }
        Ok(())
    }
}

/// Dữ liệu form sửa tài khoản: chỉ percent và debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub percent: Decimal,
    pub debit: Decimal,
}

impl AccountUpdate {
    /// Debit và percent về scale 2
    pub fn normalized(self) -> Self {
        Self {
            percent: money::fixed_scale(self.percent),
            debit: money::fixed_scale(self.debit),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_debit(self.debit)?;
        money::check_percent("percent", self.percent)
    }
}

/// Kết quả tính toán một lần thay đổi số dư (chưa ghi DB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    /// Giá trị có dấu ghi vào ledger
    pub value: Decimal,
    /// Balance mới
    pub balance: Decimal,
    /// Free balance mới = balance + debit
    pub free_balance: Decimal,
}

/// Tài khoản ngân hàng.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// ID tự tăng
    pub id: i64,
    /// Khách hàng sở hữu
    pub customer_id: i64,
    /// Mã loại tài khoản
    pub account_type: String,
    /// IBAN - None cho đến khi được sinh
    pub iban: Option<String>,
    /// Số dư
    pub balance: Decimal,
    /// Hạn mức debit (>= 0)
    pub debit: Decimal,
    /// Số dư khả dụng = balance + debit
    pub free_balance: Decimal,
    /// Lãi suất (%)
    pub percent: Decimal,
    /// Version cho optimistic locking
    pub version: i64,
    /// Thời gian tạo
    pub created_at: DateTime<Utc>,
    /// Nhân viên đã mở tài khoản
    pub created_employee: String,
}

impl Account {
    /// Tính kết quả khi cộng `value` (có dấu) vào balance.
    ///
    /// Trả về `InsufficientFunds` nếu free balance mới âm.
    pub fn apply(&self, value: Decimal) -> CoreResult<BalanceChange> {
        let balance = self.balance + value;
        let free_balance = balance + self.debit;

        if free_balance < Decimal::ZERO {
            return Err(CoreError::InsufficientFunds { free_balance });
        }
        money::check_money("value_operation", value)?;
        money::check_money("balance", balance)?;
        money::check_money("free_balance", free_balance)?;

        Ok(BalanceChange {
            value: money::fixed_scale(value),
            balance: money::fixed_scale(balance),
            free_balance: money::fixed_scale(free_balance),
        })
    }

    /// Tính kết quả posting một operation do giao dịch viên nhập
    pub fn post(&self, request: &OperationRequest) -> CoreResult<BalanceChange> {
        request.validate()?;
        self.apply(request.signed_value())
    }

    /// Free balance khi đổi debit (giữ nguyên balance)
    pub fn free_balance_with_debit(&self, debit: Decimal) -> CoreResult<Decimal> {
        check_debit(debit)?;
        let free_balance = self.balance + debit;
        if free_balance < Decimal::ZERO {
            return Err(CoreError::InsufficientFunds { free_balance });
        }
        money::check_money("free_balance", free_balance)?;
        Ok(money::fixed_scale(free_balance))
    }

    /// Kiểm tra bất biến free_balance == balance + debit
    pub fn is_consistent(&self) -> bool {
        self.free_balance == self.balance + self.debit && self.free_balance >= Decimal::ZERO
    }

    /// IBAN hoặc chuỗi rỗng nếu chưa sinh
    pub fn iban_or_empty(&self) -> &str {
        self.iban.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} (type: {}, balance: {}, debit: {}, free: {})",
            self.iban.as_deref().unwrap_or("<no IBAN>"),
            self.account_type,
            self.balance,
            self.debit,
            self.free_balance
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn account(balance: Decimal, debit: Decimal, percent: Decimal) -> Account {
        Account {
            id: 7,
            customer_id: 42,
            account_type: "A-00".to_string(),
            iban: None,
            balance,
            debit,
            free_balance: balance + debit,
            percent,
            version: 0,
            created_at: Utc::now(),
            created_employee: "teller".to_string(),
        }
    }

    #[test]
    fn test_deposit_and_withdrawal() {
        let acc = account(dec!(100.00), dec!(0), dec!(0));

        let change = acc.post(&OperationRequest::deposit(dec!(25.50))).unwrap();
        assert_eq!(change.balance, dec!(125.50));
        assert_eq!(change.free_balance, dec!(125.50));
        assert_eq!(change.value, dec!(25.50));

        let change = acc.post(&OperationRequest::withdrawal(dec!(40))).unwrap();
        assert_eq!(change.balance, dec!(60.00));
        assert_eq!(change.value, dec!(-40));
    }

    #[test]
    fn test_withdrawal_uses_debit_limit() {
        let acc = account(dec!(100), dec!(50), dec!(0));

        let change = acc.post(&OperationRequest::withdrawal(dec!(150))).unwrap();
        assert_eq!(change.balance, dec!(-50));
        assert_eq!(change.free_balance, dec!(0));

        let err = acc.post(&OperationRequest::withdrawal(dec!(150.01))).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientFunds {
                free_balance: dec!(-0.01)
            }
        );
    }

    #[test]
    fn test_change_is_stored_at_two_decimals() {
        let acc = account(dec!(0), dec!(0), dec!(0));

        let change = acc.post(&OperationRequest::deposit(dec!(1.5000))).unwrap();
        assert_eq!(change.value.to_string(), "1.50");
        assert_eq!(change.balance.to_string(), "1.50");

        let acc = account(change.balance, dec!(0), dec!(0));
        let change = acc.post(&OperationRequest::deposit(dec!(100))).unwrap();
        assert_eq!(change.value.to_string(), "100.00");
        assert_eq!(change.balance.to_string(), "101.50");
        assert_eq!(change.free_balance.to_string(), "101.50");
    }

    #[test]
    fn test_forms_normalized_to_two_decimals() {
        let form = NewAccount {
            account_type: "A-00".to_string(),
            percent: Some(dec!(2.5)),
            debit: dec!(500),
        }
        .normalized();
        assert_eq!(form.debit.to_string(), "500.00");
        assert_eq!(form.percent.map(|p| p.to_string()), Some("2.50".to_string()));

        let update = AccountUpdate { percent: dec!(3.000), debit: dec!(1.005) }.normalized();
        assert_eq!(update.percent.to_string(), "3.00");
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_free_balance_with_debit() {
        let acc = account(dec!(-30), dec!(50), dec!(0));
        assert_eq!(acc.free_balance_with_debit(dec!(40)).unwrap(), dec!(10));
        assert!(acc.free_balance_with_debit(dec!(20)).unwrap_err().is_insufficient_funds());
        assert!(acc.free_balance_with_debit(dec!(-1)).is_err());
    }

    #[test]
    fn test_consistency() {
        let mut acc = account(dec!(10), dec!(5), dec!(0));
        assert!(acc.is_consistent());
        acc.free_balance = dec!(14);
        assert!(!acc.is_consistent());
    }

    #[test]
    fn test_new_account_validation() {
        let form = NewAccount {
            account_type: "A-00".to_string(),
            percent: None,
            debit: dec!(500),
        };
        assert!(form.validate().is_ok());

        let form = NewAccount {
            debit: dec!(-1),
            ..form
        };
        assert!(form.validate().is_err());
    }
}
