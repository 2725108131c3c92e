//! Repository implementations cho SQLite
//!
//! CRUD operations cho tất cả các tables. Mỗi hàm chạy đúng một câu SQL và
//! nhận bất kỳ `Executor` nào (`&SqlitePool` hoặc `&mut *tx`), để service
//! layer tự gom nhiều câu vào một transaction.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::page::Page;
use crate::sqlite::schema::*;
use chrono::{DateTime, Utc};
use minibank_core::{
    Account, AccountType, AuditEntry, Customer, CustomerForm, Operation, OperationType,
    Parameter,
};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

// ============================================================================
// Parameter Repository
// ============================================================================

/// Repository cho parameters table (singleton, id = 1)
pub struct ParameterRepo;

impl ParameterRepo {
    /// Lấy parameter của ngân hàng
    pub async fn get<'e, E>(executor: E) -> PersistenceResult<Parameter>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, ParameterRow>("SELECT * FROM parameters WHERE id = 1")
            .fetch_optional(executor)
            .await?
            .map(Parameter::from)
            .ok_or_else(|| PersistenceError::not_found("Parameter", 1))
    }

    /// Cập nhật (hoặc tạo) parameter
    pub async fn upsert<'e, E>(executor: E, parameter: &Parameter) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO parameters (id, country_code, bank_number) VALUES (1, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                country_code = excluded.country_code,
                bank_number = excluded.bank_number
            "#,
        )
        .bind(&parameter.country_code)
        .bind(&parameter.bank_number)
        .execute(executor)
        .await?;
        Ok(())
    }
}

// ============================================================================
// Customer Repository
// ============================================================================

/// Repository cho customers table
pub struct CustomerRepo;

impl CustomerRepo {
    /// Lấy customer theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<Customer>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .map(Customer::from)
            .ok_or_else(|| PersistenceError::not_found("Customer", id))
    }

    /// Thêm customer mới, trả về ID
    pub async fn insert<'e, E>(
        executor: E,
        form: &CustomerForm,
        employee: &str,
        created_at: DateTime<Utc>,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO customers (first_name, last_name, street, house, apartment, postal_code,
                                   city, pesel, birth_date, birth_city, identification,
                                   created_at, created_employee)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(&form.street)
        .bind(&form.house)
        .bind(&form.apartment)
        .bind(&form.postal_code)
        .bind(&form.city)
        .bind(&form.pesel)
        .bind(form.birth_date)
        .bind(&form.birth_city)
        .bind(&form.identification)
        .bind(created_at)
        .bind(employee)
        .execute(executor)
        .await
        .map_err(PersistenceError::from_constraint)?;

        Ok(result.last_insert_rowid())
    }

    /// Cập nhật customer
    pub async fn update<'e, E>(executor: E, id: i64, form: &CustomerForm) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE customers SET
                first_name = ?, last_name = ?, street = ?, house = ?, apartment = ?,
                postal_code = ?, city = ?, pesel = ?, birth_date = ?, birth_city = ?,
                identification = ?
            WHERE id = ?
            "#,
        )
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(&form.street)
        .bind(&form.house)
        .bind(&form.apartment)
        .bind(&form.postal_code)
        .bind(&form.city)
        .bind(&form.pesel)
        .bind(form.birth_date)
        .bind(&form.birth_city)
        .bind(&form.identification)
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Customer", id));
        }
        Ok(())
    }

    /// Xóa customer
    pub async fn delete<'e, E>(executor: E, id: i64) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await
            .map_err(PersistenceError::from_constraint)?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Customer", id));
        }
        Ok(())
    }

    /// Danh sách customers, mới nhất trước
    pub async fn list<'e, E>(executor: E, page: Page) -> PersistenceResult<Vec<Customer>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT * FROM customers ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Customers có PESEL bắt đầu bằng `prefix` (phân biệt hoa thường)
    pub async fn search_by_pesel<'e, E>(
        executor: E,
        prefix: &str,
        page: Page,
    ) -> PersistenceResult<Vec<Customer>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT * FROM customers
            WHERE substr(pesel, 1, length(?1)) = ?1
            ORDER BY id DESC LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(prefix)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Customers có identification bắt đầu bằng `prefix` (không phân biệt hoa thường)
    pub async fn search_by_identification<'e, E>(
        executor: E,
        prefix: &str,
        page: Page,
    ) -> PersistenceResult<Vec<Customer>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT * FROM customers
            WHERE upper(substr(identification, 1, length(?1))) = upper(?1)
            ORDER BY id DESC LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(prefix)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Đếm tất cả customers
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Đếm customers khớp PESEL prefix
    pub async fn count_by_pesel<'e, E>(executor: E, prefix: &str) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM customers WHERE substr(pesel, 1, length(?1)) = ?1",
        )
        .bind(prefix)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Đếm customers khớp identification prefix
    pub async fn count_by_identification<'e, E>(
        executor: E,
        prefix: &str,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM customers WHERE upper(substr(identification, 1, length(?1))) = upper(?1)",
        )
        .bind(prefix)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }
}

// ============================================================================
// AccountType Repository
// ============================================================================

/// Repository cho account_types table
pub struct AccountTypeRepo;

impl AccountTypeRepo {
    /// Lấy account type theo mã
    pub async fn get_by_code<'e, E>(executor: E, code: &str) -> PersistenceResult<AccountType>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountTypeRow>("SELECT * FROM account_types WHERE code = ?")
            .bind(code)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("AccountType", code))?
            .try_into()
    }

    /// Thêm account type mới
    pub async fn insert<'e, E>(executor: E, account_type: &AccountType) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO account_types (code, description, subaccount, percent) VALUES (?, ?, ?, ?)",
        )
        .bind(&account_type.code)
        .bind(&account_type.description)
        .bind(&account_type.subaccount)
        .bind(account_type.percent.to_string())
        .execute(executor)
        .await
        .map_err(PersistenceError::from_constraint)?;
        Ok(())
    }

    /// Cập nhật description, subaccount, percent (mã không đổi)
    pub async fn update<'e, E>(executor: E, account_type: &AccountType) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE account_types SET description = ?, subaccount = ?, percent = ? WHERE code = ?",
        )
        .bind(&account_type.description)
        .bind(&account_type.subaccount)
        .bind(account_type.percent.to_string())
        .bind(&account_type.code)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("AccountType", &account_type.code));
        }
        Ok(())
    }

    /// Xóa account type
    pub async fn delete<'e, E>(executor: E, code: &str) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM account_types WHERE code = ?")
            .bind(code)
            .execute(executor)
            .await
            .map_err(PersistenceError::from_constraint)?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("AccountType", code));
        }
        Ok(())
    }

    /// Lấy tất cả account types
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<AccountType>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountTypeRow>(
            "SELECT * FROM account_types ORDER BY code DESC",
        )
        .fetch_all(executor)
        .await?;
        convert_all(rows)
    }

    /// Account types có mã bắt đầu bằng `prefix` (không phân biệt hoa thường)
    pub async fn search_by_code<'e, E>(
        executor: E,
        prefix: &str,
    ) -> PersistenceResult<Vec<AccountType>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountTypeRow>(
            r#"
            SELECT * FROM account_types
            WHERE upper(substr(code, 1, length(?1))) = upper(?1)
            ORDER BY code DESC
            "#,
        )
        .bind(prefix)
        .fetch_all(executor)
        .await?;
        convert_all(rows)
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Tham số để insert một account mới (đã được service resolve)
#[derive(Debug, Clone)]
pub struct AccountInsert<'a> {
    pub customer_id: i64,
    pub account_type: &'a str,
    pub debit: Decimal,
    pub percent: Decimal,
    pub employee: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Repository cho accounts table
pub struct AccountRepo;

impl AccountRepo {
    /// Lấy account theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<Account>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", id))?
            .try_into()
    }

    /// Thêm account mới với balance = 0, free_balance = debit. Trả về ID.
    pub async fn insert<'e, E>(executor: E, new: &AccountInsert<'_>) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (iban, balance, debit, free_balance, percent, version,
                                  created_at, created_employee, account_type, customer_id)
            VALUES (NULL, '0.00', ?, ?, ?, 0, ?, ?, ?, ?)
            "#,
        )
        .bind(new.debit.to_string())
        .bind(new.debit.to_string())
        .bind(new.percent.to_string())
        .bind(new.created_at)
        .bind(new.employee)
        .bind(new.account_type)
        .bind(new.customer_id)
        .execute(executor)
        .await
        .map_err(PersistenceError::from_constraint)?;

        Ok(result.last_insert_rowid())
    }

    /// Lấy accounts của một customer, mới nhất trước
    pub async fn get_by_customer<'e, E>(
        executor: E,
        customer_id: i64,
    ) -> PersistenceResult<Vec<Account>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE customer_id = ? ORDER BY id DESC",
        )
        .bind(customer_id)
        .fetch_all(executor)
        .await?;
        convert_all(rows)
    }

    /// Lấy tất cả accounts
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<Account>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts ORDER BY id")
            .fetch_all(executor)
            .await?;
        convert_all(rows)
    }

    /// Ghi balance + free_balance nếu version chưa đổi (optimistic locking).
    ///
    /// Trả về `StaleRecord` nếu account đã bị sửa bởi request khác.
    pub async fn update_balances<'e, E>(
        executor: E,
        id: i64,
        balance: Decimal,
        free_balance: Decimal,
        expected_version: i64,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET balance = ?, free_balance = ?, version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(balance.to_string())
        .bind(free_balance.to_string())
        .bind(id)
        .bind(expected_version)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::stale("Account", id));
        }
        Ok(())
    }

    /// Ghi percent, debit và free_balance mới (optimistic locking)
    pub async fn update_terms<'e, E>(
        executor: E,
        id: i64,
        percent: Decimal,
        debit: Decimal,
        free_balance: Decimal,
        expected_version: i64,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET percent = ?, debit = ?, free_balance = ?, version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(percent.to_string())
        .bind(debit.to_string())
        .bind(free_balance.to_string())
        .bind(id)
        .bind(expected_version)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::stale("Account", id));
        }
        Ok(())
    }

    /// Lưu IBAN (ghi đè IBAN cũ nếu có)
    pub async fn set_iban<'e, E>(executor: E, id: i64, iban: &str) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE accounts SET iban = ? WHERE id = ?")
            .bind(iban)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", id));
        }
        Ok(())
    }

    /// Xóa account
    pub async fn delete<'e, E>(executor: E, id: i64) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await
            .map_err(PersistenceError::from_constraint)?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", id));
        }
        Ok(())
    }

    /// Đếm accounts
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Đếm accounts của một customer
    pub async fn count_by_customer<'e, E>(executor: E, customer_id: i64) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE customer_id = ?")
            .bind(customer_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Đếm accounts thuộc một account type
    pub async fn count_by_type<'e, E>(executor: E, code: &str) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE account_type = ?")
            .bind(code)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Operation Repository
// ============================================================================

/// Repository cho operations table (append-only)
pub struct OperationRepo;

impl OperationRepo {
    /// Thêm operation mới, trả về ID
    pub async fn insert<'e, E>(
        executor: E,
        account_id: i64,
        kind: OperationType,
        value: Decimal,
        balance_after: Decimal,
        employee: &str,
        created_at: DateTime<Utc>,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO operations (operation_type, value, balance_after, created_at, employee, account_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(kind.code())
        .bind(value.to_string())
        .bind(balance_after.to_string())
        .bind(created_at)
        .bind(employee)
        .bind(account_id)
        .execute(executor)
        .await
        .map_err(PersistenceError::from_constraint)?;

        Ok(result.last_insert_rowid())
    }

    /// Lấy operation theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<Operation>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, OperationRow>("SELECT * FROM operations WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Operation", id))?
            .try_into()
    }

    /// Lịch sử operations của account, mới nhất trước
    pub async fn get_by_account<'e, E>(
        executor: E,
        account_id: i64,
        page: Page,
    ) -> PersistenceResult<Vec<Operation>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, OperationRow>(
            r#"
            SELECT * FROM operations WHERE account_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(account_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        convert_all(rows)
    }

    /// Toàn bộ lịch sử operations của account (dùng cho export)
    pub async fn get_all_by_account<'e, E>(
        executor: E,
        account_id: i64,
    ) -> PersistenceResult<Vec<Operation>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, OperationRow>(
            "SELECT * FROM operations WHERE account_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(executor)
        .await?;
        convert_all(rows)
    }

    /// Đếm operations
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM operations")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Đếm operations của account
    pub async fn count_by_account<'e, E>(executor: E, account_id: i64) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM operations WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Log Repository
// ============================================================================

/// Repository cho logs table (audit trail, append-only)
pub struct LogRepo;

impl LogRepo {
    /// Ghi một dòng audit log, trả về ID
    pub async fn insert<'e, E>(executor: E, entry: &AuditEntry) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO logs (logged_at, action, function, duration, data, username, status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.logged_at)
        .bind(&entry.action)
        .bind(&entry.function)
        .bind(entry.duration.to_string())
        .bind(&entry.data)
        .bind(&entry.user)
        .bind(entry.status.as_str())
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Các dòng log gần nhất
    pub async fn recent<'e, E>(executor: E, limit: i64) -> PersistenceResult<Vec<AuditEntry>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, LogRow>("SELECT * FROM logs ORDER BY id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(executor)
            .await?;
        convert_all(rows)
    }

    /// Đếm log
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM logs")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Chạy migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Mở transaction ghi bằng `BEGIN IMMEDIATE`.
///
/// Khóa ghi được lấy ngay từ đầu nên các writer đồng thời xếp hàng theo
/// busy timeout và đọc lại trạng thái mới, thay vì lỗi SQLITE_BUSY khi
/// nâng cấp khóa giữa chừng.
pub async fn begin_write(pool: &SqlitePool) -> PersistenceResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Database in-memory với đúng một connection (dùng cho test)
pub async fn init_memory_database() -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn form(pesel: &str, identification: &str) -> CustomerForm {
        CustomerForm {
            first_name: "Anna".to_string(),
            last_name: "Nowak".to_string(),
            street: "Długa".to_string(),
            house: "5".to_string(),
            apartment: None,
            postal_code: "80-001".to_string(),
            city: "Gdańsk".to_string(),
            pesel: pesel.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            birth_city: "Gdynia".to_string(),
            identification: identification.to_string(),
        }
    }

    async fn seed_account(pool: &SqlitePool) -> (i64, i64) {
        let customer_id = CustomerRepo::insert(pool, &form("85061512345", "AAA111111"), "teller", Utc::now())
            .await
            .unwrap();
        AccountTypeRepo::insert(pool, &AccountType::new("A-00", "Savings", "000001", dec!(1)))
            .await
            .unwrap();
        let account_id = AccountRepo::insert(
            pool,
            &AccountInsert {
                customer_id,
                account_type: "A-00",
                debit: dec!(100),
                percent: dec!(2.5),
                employee: "teller",
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        (customer_id, account_id)
    }

    #[tokio::test]
    async fn test_parameter_seeded_and_updated() {
        let pool = init_memory_database().await.unwrap();

        let parameter = ParameterRepo::get(&pool).await.unwrap();
        assert_eq!(parameter.country_code, "PL");

        ParameterRepo::upsert(&pool, &Parameter::new("de", "87654321")).await.unwrap();
        let parameter = ParameterRepo::get(&pool).await.unwrap();
        assert_eq!(parameter, Parameter::new("DE", "87654321"));
    }

    #[tokio::test]
    async fn test_account_insert_and_read() {
        let pool = init_memory_database().await.unwrap();
        let (customer_id, account_id) = seed_account(&pool).await;

        let account = AccountRepo::get_by_id(&pool, account_id).await.unwrap();
        assert_eq!(account.customer_id, customer_id);
        assert_eq!(account.balance, dec!(0));
        assert_eq!(account.free_balance, dec!(100));
        assert_eq!(account.iban, None);
        assert_eq!(account.version, 0);
    }

    #[tokio::test]
    async fn test_update_balances_checks_version() {
        let pool = init_memory_database().await.unwrap();
        let (_, account_id) = seed_account(&pool).await;

        AccountRepo::update_balances(&pool, account_id, dec!(10), dec!(110), 0)
            .await
            .unwrap();

        let err = AccountRepo::update_balances(&pool, account_id, dec!(20), dec!(120), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::StaleRecord { .. }));

        let account = AccountRepo::get_by_id(&pool, account_id).await.unwrap();
        assert_eq!(account.balance, dec!(10));
        assert_eq!(account.version, 1);
    }

    #[tokio::test]
    async fn test_foreign_keys_restrict_delete() {
        let pool = init_memory_database().await.unwrap();
        let (customer_id, _) = seed_account(&pool).await;

        let err = CustomerRepo::delete(&pool, customer_id).await.unwrap_err();
        assert!(err.is_foreign_key_violation());

        let err = AccountTypeRepo::delete(&pool, "A-00").await.unwrap_err();
        assert!(err.is_foreign_key_violation());

        assert_eq!(CustomerRepo::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_customer_prefix_search() {
        let pool = init_memory_database().await.unwrap();
        CustomerRepo::insert(&pool, &form("85061512345", "ABC000001"), "teller", Utc::now())
            .await
            .unwrap();
        CustomerRepo::insert(&pool, &form("90010112345", "XYZ000002"), "teller", Utc::now())
            .await
            .unwrap();

        let found = CustomerRepo::search_by_pesel(&pool, "8506", Page::default()).await.unwrap();
        assert_eq!(found.len(), 1);

        let found = CustomerRepo::search_by_identification(&pool, "xyz", Page::default())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].details.pesel, "90010112345");

        // LIKE wildcards không có tác dụng
        assert_eq!(CustomerRepo::count_by_pesel(&pool, "%").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_operation_history_order() {
        let pool = init_memory_database().await.unwrap();
        let (_, account_id) = seed_account(&pool).await;

        let t0 = Utc::now();
        OperationRepo::insert(&pool, account_id, OperationType::Deposit, dec!(50), dec!(50), "teller", t0)
            .await
            .unwrap();
        OperationRepo::insert(
            &pool,
            account_id,
            OperationType::Withdrawal,
            dec!(-20),
            dec!(30),
            "teller",
            t0 + chrono::Duration::seconds(1),
        )
        .await
        .unwrap();

        let history = OperationRepo::get_by_account(&pool, account_id, Page::default())
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, OperationType::Withdrawal);
        assert_eq!(history[0].value, dec!(-20));
        assert_eq!(OperationRepo::count_by_account(&pool, account_id).await.unwrap(), 2);
    }
}
