//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping sqlx errors.

use thiserror::Error;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Record was modified concurrently: {entity} with id {id}")]
    StaleRecord { entity: String, id: String },

    // === Conversion errors ===
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("Invalid enum value: {field} = {value}")]
    InvalidEnumValue { field: String, value: String },

    // === Configuration errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Tạo StaleRecord error
    pub fn stale(entity: &str, id: impl ToString) -> Self {
        Self::StaleRecord {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Chuyển lỗi constraint của SQLite thành lỗi có nghĩa.
    ///
    /// Dùng với `map_err` sau các câu INSERT / DELETE.
    pub fn from_constraint(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation(db_err.message().to_string());
            }
            if db_err.is_unique_violation() {
                return Self::UniqueViolation(db_err.message().to_string());
            }
        }
        Self::Database(err)
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Kiểm tra có phải lỗi foreign key không
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation(_))
    }

    /// SQLite báo database đang bị khóa (SQLITE_BUSY / SQLITE_LOCKED và các
    /// extended code của chúng). Ghi đồng thời nên thử lại.
    pub fn is_busy(&self) -> bool {
        let Self::Database(sqlx::Error::Database(db_err)) = self else {
            return false;
        };
        db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
            .unwrap_or(false)
    }
}

impl From<minibank_core::CoreError> for PersistenceError {
    fn from(err: minibank_core::CoreError) -> Self {
        match err {
            minibank_core::CoreError::UnknownOperationType(code) => Self::InvalidEnumValue {
                field: "operation_type".to_string(),
                value: code.to_string(),
            },
            other => Self::InvalidDecimal(other.to_string()),
        }
    }
}
