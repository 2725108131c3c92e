//! # Operation Module
//!
//! Bút toán sổ cái (ledger entry) của một tài khoản: nạp, rút, lãi.
//! Operation là immutable - chỉ được tạo, không sửa, không xóa.

use crate::error::{CoreError, CoreResult};
use crate::money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại operation, lưu dạng số nguyên trong DB (1, 2, 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Nạp tiền - value dương
    Deposit,
    /// Rút tiền - value lưu dạng âm
    Withdrawal,
    /// Tiền lãi - value dương, chỉ do interest accrual tạo
    Interest,
}

impl OperationType {
    /// Mã số lưu trong DB
    pub fn code(&self) -> i64 {
        match self {
            OperationType::Deposit => 1,
            OperationType::Withdrawal => 2,
            OperationType::Interest => 3,
        }
    }

    /// Parse từ mã số
    pub fn from_code(code: i64) -> CoreResult<Self> {
        match code {
            1 => Ok(OperationType::Deposit),
            2 => Ok(OperationType::Withdrawal),
            3 => Ok(OperationType::Interest),
            other => Err(CoreError::UnknownOperationType(other)),
        }
    }

    /// Tên hiển thị (dùng cho báo cáo)
    pub fn label(&self) -> &'static str {
        match self {
            OperationType::Deposit => "Deposit",
            OperationType::Withdrawal => "Withdrawal",
            OperationType::Interest => "Interest",
        }
    }

    /// Parse từ tên (không phân biệt hoa thường)
    pub fn from_label(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(OperationType::Deposit),
            "withdrawal" => Some(OperationType::Withdrawal),
            "interest" => Some(OperationType::Interest),
            _ => None,
        }
    }

    /// Áp dấu cho giá trị: Withdrawal lưu âm, còn lại dương
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            OperationType::Withdrawal => -magnitude,
            OperationType::Deposit | OperationType::Interest => magnitude,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Yêu cầu posting do giao dịch viên nhập: loại và số tiền dương.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub kind: OperationType,
    /// Số tiền, luôn dương (dấu do `kind` quyết định)
    pub amount: Decimal,
}

impl OperationRequest {
    pub fn deposit(amount: Decimal) -> Self {
        Self {
            kind: OperationType::Deposit,
            amount: money::fixed_scale(amount),
        }
    }

    pub fn withdrawal(amount: Decimal) -> Self {
        Self {
            kind: OperationType::Withdrawal,
            amount: money::fixed_scale(amount),
        }
    }

    /// Kiểm tra trước khi đọc account
    pub fn validate(&self) -> CoreResult<()> {
        if self.kind == OperationType::Interest {
            return Err(CoreError::ManualPostingNotAllowed(self.kind.to_string()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "Value operation must be positive: {}",
                self.amount
            )));
        }
        money::check_money("value_operation", self.amount)
    }

    /// Giá trị có dấu sẽ ghi vào ledger
    pub fn signed_value(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Một dòng trong ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// ID tự tăng
    pub id: i64,
    /// Tài khoản
    pub account_id: i64,
    /// Loại operation
    pub kind: OperationType,
    /// Giá trị có dấu
    pub value: Decimal,
    /// Balance của account ngay sau operation
    pub balance_after: Decimal,
    /// Thời điểm ghi
    pub created_at: DateTime<Utc>,
    /// Nhân viên thực hiện
    pub employee: String,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} (balance {})",
            self.id, self.kind, self.value, self.balance_after
        )
    }
}
