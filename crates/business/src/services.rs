//! Service context and request context
//!
//! Every service borrows a `ServiceContext` (database access). Every mutating
//! call also takes a `RequestContext` naming the acting employee and role.

use crate::error::{BusinessError, BusinessResult};
use minibank_persistence::{begin_write, Database};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::fmt;

/// Context for business operations - contains database access
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pool: SqlitePool,
}

impl ServiceContext {
    /// Create new service context from database
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a write transaction holding the SQLite write lock from the first
    /// statement, so concurrent writers queue instead of failing midway
    pub(crate) async fn begin_write(&self) -> BusinessResult<Transaction<'static, Sqlite>> {
        Ok(begin_write(&self.pool).await?)
    }
}

/// Employee permission level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Role {
    /// CRUD, posting, history
    #[default]
    Standard,
    /// Standard + interest recount + IBAN generation
    Extended,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Extended => "extended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Some(Role::Standard),
            "extended" => Some(Role::Extended),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is making the request, and through which front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub employee: String,
    pub role: Role,
    /// Front end name, recorded in the audit log (e.g. "cli")
    pub origin: String,
}

impl RequestContext {
    pub fn new(employee: &str, role: Role) -> Self {
        Self {
            employee: employee.to_string(),
            role,
            origin: "cli".to_string(),
        }
    }

    pub fn standard(employee: &str) -> Self {
        Self::new(employee, Role::Standard)
    }

    pub fn extended(employee: &str) -> Self {
        Self::new(employee, Role::Extended)
    }

    /// Fails with `PermissionDenied` unless the caller holds the extended role
    pub fn require_extended(&self, operation: &str) -> BusinessResult<()> {
        if self.role < Role::Extended {
            return Err(BusinessError::permission_denied(&self.employee, operation));
        }
        Ok(())
    }
}
