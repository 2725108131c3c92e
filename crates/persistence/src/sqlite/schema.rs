//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables.
//! Schema được định nghĩa trong migrations/20241019000000_init.sql

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, NaiveDate, Utc};
use minibank_core::money::parse_money;
use minibank_core::{
    Account, AccountType, AuditEntry, AuditStatus, Customer, CustomerForm, Operation,
    OperationType, Parameter,
};
use serde::{Deserialize, Serialize};

/// Row type cho bảng `parameters`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ParameterRow {
    pub id: i64,
    pub country_code: String,
    pub bank_number: String,
}

/// Row type cho bảng `customers`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub house: String,
    pub apartment: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub pesel: String,
    pub birth_date: NaiveDate,
    pub birth_city: String,
    pub identification: String,
    pub created_at: DateTime<Utc>,
    pub created_employee: String,
}

/// Row type cho bảng `account_types`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountTypeRow {
    pub code: String,
    pub description: String,
    pub subaccount: String,
    pub percent: String, // Decimal stored as TEXT
}

/// Row type cho bảng `accounts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: i64,
    pub iban: Option<String>,
    pub balance: String,      // Decimal stored as TEXT
    pub debit: String,        // Decimal stored as TEXT
    pub free_balance: String, // Decimal stored as TEXT
    pub percent: String,      // Decimal stored as TEXT
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub created_employee: String,
    pub account_type: String,
    pub customer_id: i64,
}

/// Row type cho bảng `operations`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct OperationRow {
    pub id: i64,
    pub operation_type: i64,
    pub value: String,         // Decimal stored as TEXT
    pub balance_after: String, // Decimal stored as TEXT
    pub created_at: DateTime<Utc>,
    pub employee: String,
    pub account_id: i64,
}

/// Row type cho bảng `logs`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LogRow {
    pub id: i64,
    pub logged_at: DateTime<Utc>,
    pub action: String,
    pub function: String,
    pub duration: String, // Decimal stored as TEXT
    pub data: String,
    pub username: String,
    pub status: String,
}

// === Conversion implementations ===

impl From<ParameterRow> for Parameter {
    fn from(row: ParameterRow) -> Self {
        Parameter::new(&row.country_code, &row.bank_number)
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            details: CustomerForm {
                first_name: row.first_name,
                last_name: row.last_name,
                street: row.street,
                house: row.house,
                apartment: row.apartment,
                postal_code: row.postal_code,
                city: row.city,
                pesel: row.pesel,
                birth_date: row.birth_date,
                birth_city: row.birth_city,
                identification: row.identification,
            },
            created_at: row.created_at,
            created_employee: row.created_employee,
        }
    }
}

impl TryFrom<AccountTypeRow> for AccountType {
    type Error = PersistenceError;

    fn try_from(row: AccountTypeRow) -> PersistenceResult<Self> {
        Ok(AccountType {
            percent: parse_money("percent", &row.percent)?,
            code: row.code,
            description: row.description,
            subaccount: row.subaccount,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> PersistenceResult<Self> {
        Ok(Account {
            id: row.id,
            customer_id: row.customer_id,
            account_type: row.account_type,
            iban: row.iban.filter(|iban| !iban.is_empty()),
            balance: parse_money("balance", &row.balance)?,
            debit: parse_money("debit", &row.debit)?,
            free_balance: parse_money("free_balance", &row.free_balance)?,
            percent: parse_money("percent", &row.percent)?,
            version: row.version,
            created_at: row.created_at,
            created_employee: row.created_employee,
        })
    }
}

impl TryFrom<OperationRow> for Operation {
    type Error = PersistenceError;

    fn try_from(row: OperationRow) -> PersistenceResult<Self> {
        Ok(Operation {
            id: row.id,
            account_id: row.account_id,
            kind: OperationType::from_code(row.operation_type)?,
            value: parse_money("value", &row.value)?,
            balance_after: parse_money("balance_after", &row.balance_after)?,
            created_at: row.created_at,
            employee: row.employee,
        })
    }
}

impl TryFrom<LogRow> for AuditEntry {
    type Error = PersistenceError;

    fn try_from(row: LogRow) -> PersistenceResult<Self> {
        let status =
            AuditStatus::from_str(&row.status).ok_or_else(|| PersistenceError::InvalidEnumValue {
                field: "status".to_string(),
                value: row.status.clone(),
            })?;

        Ok(AuditEntry {
            id: row.id,
            logged_at: row.logged_at,
            action: row.action,
            function: row.function,
            duration: parse_money("duration", &row.duration)?,
            data: row.data,
            user: row.username,
            status,
        })
    }
}

/// Chuyển một danh sách rows sang domain types
pub fn convert_all<R, T>(rows: Vec<R>) -> PersistenceResult<Vec<T>>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account_row() -> AccountRow {
        AccountRow {
            id: 1,
            iban: Some(String::new()),
            balance: "100.50".to_string(),
            debit: "50".to_string(),
            free_balance: "150.50".to_string(),
            percent: "1.25".to_string(),
            version: 3,
            created_at: Utc::now(),
            created_employee: "teller".to_string(),
            account_type: "A-00".to_string(),
            customer_id: 9,
        }
    }

    #[test]
    fn test_account_row_conversion() {
        let account = Account::try_from(account_row()).unwrap();
        assert_eq!(account.balance, dec!(100.50));
        assert_eq!(account.free_balance, dec!(150.50));
        assert_eq!(account.iban, None);
        assert!(account.is_consistent());
    }

    #[test]
    fn test_bad_decimal_is_rejected() {
        let mut row = account_row();
        row.balance = "oops".to_string();
        assert!(matches!(
            Account::try_from(row),
            Err(PersistenceError::InvalidDecimal(_))
        ));
    }

    #[test]
    fn test_operation_row_conversion() {
        let row = OperationRow {
            id: 1,
            operation_type: 2,
            value: "-30.00".to_string(),
            balance_after: "70.00".to_string(),
            created_at: Utc::now(),
            employee: "teller".to_string(),
            account_id: 1,
        };
        let op = Operation::try_from(row.clone()).unwrap();
        assert_eq!(op.kind, OperationType::Withdrawal);
        assert_eq!(op.value, dec!(-30));

        let bad = OperationRow {
            operation_type: 7,
            ..row
        };
        assert!(matches!(
            Operation::try_from(bad),
            Err(PersistenceError::InvalidEnumValue { .. })
        ));
    }
}
