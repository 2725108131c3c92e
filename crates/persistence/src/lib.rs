//! # Minibank Persistence
//!
//! Persistence layer cho Minibank - SQLite, migrations và repositories.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Database                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐ │
//! │  │   SQLite    │    │ Migrations  │    │     Repos       │ │
//! │  │  (state)    │    │  (schema)   │    │   (queries)     │ │
//! │  └─────────────┘    └─────────────┘    └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minibank_persistence::{begin_write, AccountRepo, Database, DatabaseConfig};
//!
//! // Initialize database
//! let db = Database::connect(&DatabaseConfig::new("data/minibank.db")).await?;
//!
//! // Query via repos
//! let accounts = AccountRepo::get_all(db.pool()).await?;
//!
//! // Nhiều câu trong một transaction ghi
//! let mut tx = begin_write(db.pool()).await?;
//! let account = AccountRepo::get_by_id(&mut *tx, 1).await?;
//! tx.commit().await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::{
    AccountRow, AccountTypeRow, CustomerRow, LogRow, OperationRow, ParameterRow,
};
pub use sqlite::{
    begin_write, init_memory_database, AccountInsert, AccountRepo, AccountTypeRepo, CustomerRepo,
    LogRepo, OperationRepo, Page, Paged, ParameterRepo, PAGE_SIZE,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

/// Cấu hình kết nối database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Đường dẫn file SQLite
    pub path: PathBuf,
    /// Số connection tối đa trong pool
    pub max_connections: u32,
    /// Tạo file nếu chưa tồn tại
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 5,
            create_if_missing: true,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Không tạo file mới (dùng cho các lệnh chỉ đọc)
    pub fn existing_only(mut self) -> Self {
        self.create_if_missing = false;
        self
    }

    fn connect_options(&self) -> PersistenceResult<SqliteConnectOptions> {
        if self.max_connections == 0 {
            return Err(PersistenceError::Configuration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(self.create_if_missing)
            .foreign_keys(true))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("data/minibank.db")
    }
}

/// Database facade - connection pool đã chạy migrations
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Mở database theo config và chạy migrations
    pub async fn connect(config: &DatabaseConfig) -> PersistenceResult<Self> {
        if config.create_if_missing {
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PersistenceError::Configuration(format!(
                        "cannot create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options()?)
            .await?;
        sqlite::run_migrations(&pool).await?;

        info!(path = %config.path.display(), "Database ready");
        Ok(Self { pool })
    }

    /// Database in-memory, một connection (dùng cho test)
    pub async fn in_memory() -> PersistenceResult<Self> {
        let pool = init_memory_database().await?;
        Ok(Self { pool })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Kiểm tra file database có tồn tại không
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Đóng pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
