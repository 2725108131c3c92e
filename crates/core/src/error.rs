//! # Error Module
//!
//! Định nghĩa các domain errors cho Minibank sử dụng thiserror.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Các lỗi nghiệp vụ cốt lõi, không liên quan đến infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // === Money errors ===
    #[error("Value operation / Debit out of free balance limit (free balance would be {free_balance})")]
    InsufficientFunds { free_balance: Decimal },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // === Operation errors ===
    #[error("Unknown operation type: {0}")]
    UnknownOperationType(i64),

    #[error("Operation type {0} cannot be posted manually")]
    ManualPostingNotAllowed(String),

    // === IBAN errors ===
    #[error("IBAN number should have 28 characters! (got {0})")]
    IbanLength(usize),

    // === Validation errors ===
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Tạo Validation error cho một field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Kiểm tra có phải lỗi thiếu free balance không
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, CoreError::InsufficientFunds { .. })
    }

    /// Kiểm tra có phải lỗi validation (form) không
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation { .. } | CoreError::IbanLength(_) | CoreError::InvalidAmount(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = CoreError::InsufficientFunds {
            free_balance: dec!(-20.00),
        };
        assert!(err.to_string().contains("out of free balance limit"));
        assert!(err.to_string().contains("-20.00"));

        let err = CoreError::validation("pesel", "must have 11 digits");
        assert_eq!(err.to_string(), "pesel: must have 11 digits");

        assert_eq!(
            CoreError::IbanLength(30).to_string(),
            "IBAN number should have 28 characters! (got 30)"
        );
    }

    #[test]
    fn test_error_checks() {
        let err = CoreError::InsufficientFunds {
            free_balance: dec!(-1),
        };
        assert!(err.is_insufficient_funds());
        assert!(!err.is_validation());

        assert!(CoreError::IbanLength(27).is_validation());
        assert!(CoreError::validation("city", "required").is_validation());
    }
}
