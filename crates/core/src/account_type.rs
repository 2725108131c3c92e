//! # AccountType Module
//!
//! Danh mục loại tài khoản, khóa bởi mã ngắn dạng `A-00`.

use crate::error::CoreResult;
use crate::money;
use crate::validation;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại tài khoản.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountType {
    /// Mã loại, viết hoa (A-00, B-10, ...)
    pub code: String,
    /// Mô tả
    pub description: String,
    /// Subaccount - 6 chữ số, là một phần của IBAN
    pub subaccount: String,
    /// Lãi suất mặc định (%)
    pub percent: Decimal,
}

impl AccountType {
    /// Tạo AccountType mới, mã được chuẩn hóa viết hoa
    pub fn new(code: &str, description: &str, subaccount: &str, percent: Decimal) -> Self {
        Self {
            code: Self::normalize_code(code),
            description: description.trim().to_string(),
            subaccount: subaccount.trim().to_string(),
            percent: money::fixed_scale(percent),
        }
    }

    /// Chuẩn hóa mã loại tài khoản
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Kiểm tra toàn bộ field
    pub fn validate(&self) -> CoreResult<()> {
        validation::account_type_code(&self.code)?;
        validation::required("description", &self.description, 100)?;
        validation::subaccount(&self.subaccount)?;
        money::check_percent("percent", self.percent)?;
        Ok(())
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_code_uppercased() {
        let t = AccountType::new("a-00", "Savings", "000001", dec!(1.50));
        assert_eq!(t.code, "A-00");
        assert!(t.validate().is_ok());
        assert_eq!(t.to_string(), "A-00 - Savings");
        assert_eq!(t.percent.to_string(), "1.50");
    }

    #[test]
    fn test_validate() {
        assert!(AccountType::new("A-0", "Savings", "000001", dec!(0)).validate().is_err());
        assert!(AccountType::new("A-00", "Savings", "01", dec!(0)).validate().is_err());
        assert!(AccountType::new("A-00", "", "000001", dec!(0)).validate().is_err());
        assert!(AccountType::new("A-00", "Savings", "000001", dec!(-1)).validate().is_err());
    }
}
