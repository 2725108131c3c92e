//! # Parameter Module
//!
//! Bản ghi duy nhất chứa mã quốc gia và số ngân hàng, dùng để sinh IBAN.

use crate::error::CoreResult;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tham số hệ thống của ngân hàng (singleton).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Mã quốc gia ISO, luôn viết hoa (PL, DE, ...)
    pub country_code: String,
    /// Số ngân hàng, 8 chữ số
    pub bank_number: String,
}

impl Parameter {
    /// Tạo Parameter mới, country code được viết hoa
    pub fn new(country_code: &str, bank_number: &str) -> Self {
        Self {
            country_code: country_code.trim().to_uppercase(),
            bank_number: bank_number.trim().to_string(),
        }
    }

    /// Kiểm tra format trước khi lưu
    pub fn validate(&self) -> CoreResult<()> {
        validation::country_code(&self.country_code)?;
        validation::bank_number(&self.bank_number)?;
        Ok(())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.country_code, self.bank_number)
    }
}
