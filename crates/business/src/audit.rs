//! Activity monitor - audit log interceptor for mutating actions
//!
//! Wraps a service call, times it, and appends one row to the `logs` table
//! with the outcome. A failure to write the log never hides the result of
//! the action itself.

use crate::error::BusinessResult;
use crate::services::{RequestContext, ServiceContext};
use chrono::Utc;
use minibank_core::audit::{truncate_data, DATA_RESTRICTED};
use minibank_core::{AuditEntry, AuditStatus};
use minibank_persistence::LogRepo;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::warn;

/// Seconds with 6 decimal places
fn duration_seconds(elapsed: Duration) -> Decimal {
    Decimal::from_i128_with_scale(elapsed.as_micros() as i128, 6)
}

/// Records every wrapped action in the audit log
pub struct ActivityMonitor<'a> {
    ctx: &'a ServiceContext,
    show_data: bool,
}

impl<'a> ActivityMonitor<'a> {
    /// Monitor that stores the (truncated) request payload
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            show_data: true,
        }
    }

    /// Monitor that stores `Data restricted` instead of the payload
    pub fn restricted(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            show_data: false,
        }
    }

    /// Run `action`, then log its name, duration, payload and outcome.
    pub async fn record<T, F, Fut>(
        &self,
        request: &RequestContext,
        action: &str,
        data: &str,
        f: F,
    ) -> BusinessResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = BusinessResult<T>>,
    {
        let started = Instant::now();
        let result = f().await;

        let entry = AuditEntry {
            id: 0,
            logged_at: Utc::now(),
            action: action.to_string(),
            function: format!("{} - {}", request.origin, action),
            duration: duration_seconds(started.elapsed()),
            data: if self.show_data {
                truncate_data(data)
            } else {
                DATA_RESTRICTED.to_string()
            },
            user: request.employee.clone(),
            status: if result.is_ok() {
                AuditStatus::Success
            } else {
                AuditStatus::Failed
            },
        };

        if let Err(e) = LogRepo::insert(self.ctx.pool(), &entry).await {
            warn!(action, employee = %request.employee, error = %e, "Failed to write audit log");
        }

        result
    }

    /// Most recent audit entries, newest first
    pub async fn recent(&self, limit: i64) -> BusinessResult<Vec<AuditEntry>> {
        Ok(LogRepo::recent(self.ctx.pool(), limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BusinessError;
    use crate::testing::setup;

    #[test]
    fn test_duration_has_six_decimals() {
        let d = duration_seconds(Duration::from_micros(1_234_567));
        assert_eq!(d.to_string(), "1.234567");
    }

    #[tokio::test]
    async fn test_success_is_logged_with_payload() {
        let (ctx, request) = setup().await;
        let monitor = ActivityMonitor::new(&ctx);

        let value = monitor
            .record(&request, "create_customer", &"x".repeat(300), || async { Ok(42) })
            .await
            .unwrap();
        assert_eq!(value, 42);

        let entries = monitor.recent(10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "create_customer");
        assert_eq!(entries[0].function, "cli - create_customer");
        assert_eq!(entries[0].user, "teller");
        assert_eq!(entries[0].status, AuditStatus::Success);
        assert_eq!(entries[0].data.len(), 250);
    }

    #[tokio::test]
    async fn test_failure_is_logged_and_returned() {
        let (ctx, request) = setup().await;
        let monitor = ActivityMonitor::restricted(&ctx);

        let result: BusinessResult<()> = monitor
            .record(&request, "delete_customer", "id=1", || async {
                Err(BusinessError::protected("Customer", 1, 1, "account(s)"))
            })
            .await;
        assert!(result.unwrap_err().is_protected());

        let entries = monitor.recent(10).await.unwrap();
        assert_eq!(entries[0].status, AuditStatus::Failed);
        assert_eq!(entries[0].data, DATA_RESTRICTED);
    }
}
