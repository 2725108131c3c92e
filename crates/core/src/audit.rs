//! # Audit Module
//!
//! Bản ghi audit log cho mọi thao tác quản trị (append-only).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Độ dài tối đa của payload lưu trong log
pub const AUDIT_DATA_MAX_LEN: usize = 250;

/// Payload thay thế khi không được phép lưu dữ liệu
pub const DATA_RESTRICTED: &str = "Data restricted";

/// Kết quả của thao tác được audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    Success,
    Failed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "Success",
            AuditStatus::Failed => "Failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Success" => Some(AuditStatus::Success),
            "Failed" => Some(AuditStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Một dòng audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// ID tự tăng (0 khi chưa lưu)
    pub id: i64,
    /// Thời điểm ghi
    pub logged_at: DateTime<Utc>,
    /// Tên action (post_operation, delete_customer, ...)
    pub action: String,
    /// Mô tả function/route
    pub function: String,
    /// Thời gian thực thi (giây, 6 chữ số thập phân)
    pub duration: Decimal,
    /// Payload đã cắt ngắn
    pub data: String,
    /// Người gọi
    pub user: String,
    /// Kết quả
    pub status: AuditStatus,
}

/// Cắt payload về tối đa 250 ký tự (theo ký tự, không theo byte)
pub fn truncate_data(data: &str) -> String {
    data.chars().take(AUDIT_DATA_MAX_LEN).collect()
}
