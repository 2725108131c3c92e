//! Business layer errors
//!
//! Typed errors for every service outcome. Lower-layer errors are folded in
//! so callers can match on `NotFound` or `ConcurrentUpdate` without digging
//! into sqlx.

use minibank_core::CoreError;
use minibank_persistence::PersistenceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Ledger errors ===
    #[error(
        "Value operation / Debit out of free balance limit \
         (balance: {balance}, debit: {debit}, free balance: {free_balance})"
    )]
    InsufficientFunds {
        balance: Decimal,
        debit: Decimal,
        free_balance: Decimal,
    },

    #[error("Interest recount rolled back at account {account_id}: {reason}")]
    InterestRolledBack { account_id: i64, reason: String },

    #[error("{entity} {id} was modified by another request, please retry")]
    ConcurrentUpdate { entity: String, id: String },

    // === Permission errors ===
    #[error("Employee '{employee}' is not permitted to {operation} (extended role required)")]
    PermissionDenied { employee: String, operation: String },

    // === Integrity errors ===
    #[error("Cannot delete {entity} {id}: it is referenced by {dependents} {dependent_kind}")]
    Protected {
        entity: String,
        id: String,
        dependents: i64,
        dependent_kind: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: String, id: String },

    // === Wrapped errors ===
    #[error("{0}")]
    Validation(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Persistence(#[source] PersistenceError),
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    /// Create protected-delete error
    pub fn protected(entity: &str, id: impl ToString, dependents: i64, dependent_kind: &str) -> Self {
        Self::Protected {
            entity: entity.to_string(),
            id: id.to_string(),
            dependents,
            dependent_kind: dependent_kind.to_string(),
        }
    }

    /// Create permission denied error
    pub fn permission_denied(employee: &str, operation: &str) -> Self {
        Self::PermissionDenied {
            employee: employee.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Protected { .. })
    }

    /// Input error (bad form data) rather than a system failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub(crate) fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::Validation(err) if err.is_insufficient_funds())
            || matches!(self, Self::InsufficientFunds { .. })
    }
}

impl From<PersistenceError> for BusinessError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity, id } => Self::NotFound { entity, id },
            PersistenceError::StaleRecord { entity, id } => Self::ConcurrentUpdate { entity, id },
            other if other.is_busy() => Self::ConcurrentUpdate {
                entity: "Database".to_string(),
                id: "(write lock)".to_string(),
            },
            other => Self::Persistence(other),
        }
    }
}

impl From<sqlx::Error> for BusinessError {
    fn from(err: sqlx::Error) -> Self {
        PersistenceError::Database(err).into()
    }
}
