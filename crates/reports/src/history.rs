//! Operation history report for one account
//!
//! Columns: `Id, Type, Value, Balance after operation, Date`. Dates are
//! rendered `DD.MM.YYYY HH:MM:SS` in the report's time zone offset (local
//! time unless overridden).

use chrono::{DateTime, FixedOffset, Local, Utc};
use minibank_core::{Account, Operation, OperationType};
use rust_decimal::Decimal;

use crate::exporters::ReportData;

/// Date format used in exported history
pub const HISTORY_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// One exported ledger line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: i64,
    pub kind: OperationType,
    pub value: Decimal,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Operation> for HistoryRow {
    fn from(op: &Operation) -> Self {
        Self {
            id: op.id,
            kind: op.kind,
            value: op.value,
            balance_after: op.balance_after,
            created_at: op.created_at,
        }
    }
}

/// History of one account, newest operation first
#[derive(Debug, Clone)]
pub struct OperationHistoryReport {
    pub title: String,
    pub account_id: i64,
    pub iban: String,
    pub balance: Decimal,
    pub free_balance: Decimal,
    pub rows: Vec<HistoryRow>,
    pub generated_at: DateTime<Utc>,
    offset: FixedOffset,
}

impl OperationHistoryReport {
    pub fn new(account: &Account, operations: &[Operation]) -> Self {
        Self {
            title: format!("Operation history - account {}", account.id),
            account_id: account.id,
            iban: account.iban_or_empty().to_string(),
            balance: account.balance,
            free_balance: account.free_balance,
            rows: operations.iter().map(HistoryRow::from).collect(),
            generated_at: Utc::now(),
            offset: *Local::now().offset(),
        }
    }

    /// Render dates in a fixed offset instead of the local one
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    fn format_date(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(HISTORY_DATE_FORMAT)
            .to_string()
    }

    /// Sum of values per operation type
    pub fn total(&self, kind: OperationType) -> Decimal {
        self.rows
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.value)
            .sum()
    }
}

impl ReportData for OperationHistoryReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("IBAN".to_string(), self.iban.clone()),
            ("Balance".to_string(), self.balance.to_string()),
            ("Free balance".to_string(), self.free_balance.to_string()),
            ("Operations".to_string(), self.rows.len().to_string()),
            ("Deposits".to_string(), self.total(OperationType::Deposit).to_string()),
            ("Withdrawals".to_string(), self.total(OperationType::Withdrawal).to_string()),
            ("Interest".to_string(), self.total(OperationType::Interest).to_string()),
            ("Generated at".to_string(), self.format_date(&self.generated_at)),
        ]
    }

    fn headers(&self) -> Vec<String> {
        vec![
            "Id".to_string(),
            "Type".to_string(),
            "Value".to_string(),
            "Balance after operation".to_string(),
            "Date".to_string(),
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.kind.label().to_string(),
                    r.value.to_string(),
                    r.balance_after.to_string(),
                    self.format_date(&r.created_at),
                ]
            })
            .collect()
    }
}
