//! Batch interest recount
//!
//! Every account with a positive balance and percent gets
//! `round(balance * percent / 100, 2)` added and an Interest row appended.
//! The whole batch is one transaction: one failing account rolls back all.

use crate::error::{BusinessError, BusinessResult};
use crate::services::{RequestContext, ServiceContext};
use chrono::Utc;
use minibank_core::OperationType;
use minibank_persistence::{AccountRepo, OperationRepo};
use rust_decimal::Decimal;
use sqlx::SqliteConnection;
use tracing::{info, warn};

/// Outcome of an interest recount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestReport {
    /// Number of accounts credited
    pub accounts: usize,
    /// Sum of all interest posted
    pub total_interest: Decimal,
}

impl InterestReport {
    pub fn message(&self) -> String {
        format!("Interest for {} account(s) has been recounted.", self.accounts)
    }
}

/// Interest Service - recounts interest for every eligible account
pub struct InterestService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InterestService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Credit interest to every account with balance > 0 and percent > 0.
    /// Requires the extended role.
    pub async fn recount(&self, request: &RequestContext) -> BusinessResult<InterestReport> {
        request.require_extended("recount interest")?;

        let mut tx = self.ctx.begin_write().await?;
        match recount_in_tx(&mut tx, request).await {
            Ok(report) => {
                tx.commit().await?;
                info!(
                    accounts = report.accounts,
                    total_interest = %report.total_interest,
                    employee = %request.employee,
                    "Interest recounted"
                );
                Ok(report)
            }
            Err(err) => {
                tx.rollback().await?;
                warn!(employee = %request.employee, error = %err, "Interest recount rolled back");
                Err(err)
            }
        }
    }
}

async fn recount_in_tx(
    conn: &mut SqliteConnection,
    request: &RequestContext,
) -> BusinessResult<InterestReport> {
    let accounts = AccountRepo::get_all(&mut *conn).await?;
    let now = Utc::now();

    let mut report = InterestReport {
        accounts: 0,
        total_interest: Decimal::ZERO,
    };

    for account in accounts.iter().filter(|a| a.earns_interest()) {
        let rolled_back = |reason: String| BusinessError::InterestRolledBack {
            account_id: account.id,
            reason,
        };

        let change = match account.accrue_interest() {
            Ok(Some(change)) => change,
            Ok(None) => continue,
            Err(e) => return Err(rolled_back(e.to_string())),
        };

        AccountRepo::update_balances(
            &mut *conn,
            account.id,
            change.balance,
            change.free_balance,
            account.version,
        )
        .await
        .map_err(|e| rolled_back(e.to_string()))?;

        OperationRepo::insert(
            &mut *conn,
            account.id,
            OperationType::Interest,
            change.value,
            change.balance,
            &request.employee,
            now,
        )
        .await
        .map_err(|e| rolled_back(e.to_string()))?;

        report.accounts += 1;
        report.total_interest += change.value;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_account, setup};
    use crate::{AccountService, OperationService};
    use minibank_core::{AccountUpdate, OperationRequest};
    use minibank_persistence::Page;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_recount_requires_extended_role() {
        let (ctx, request) = setup().await;
        let err = InterestService::new(&ctx).recount(&request).await.unwrap_err();
        assert!(matches!(err, BusinessError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn test_reference_interest() {
        let (ctx, request) = setup().await;
        let account = seed_account(&ctx, &request, dec!(0)).await;
        AccountService::new(&ctx)
            .update(&request, account.id, AccountUpdate { percent: dec!(5.00), debit: dec!(0) })
            .await
            .unwrap();
        OperationService::new(&ctx)
            .post(&request, account.id, OperationRequest::deposit(dec!(1000.00)))
            .await
            .unwrap();

        let boss = RequestContext::extended("boss");
        let report = InterestService::new(&ctx).recount(&boss).await.unwrap();
        assert_eq!(report.accounts, 1);
        assert_eq!(report.total_interest, dec!(50.00));
        assert_eq!(report.message(), "Interest for 1 account(s) has been recounted.");

        let history = OperationService::new(&ctx)
            .history(account.id, Page::default())
            .await
            .unwrap();
        let latest = &history.operations.items[0];
        assert_eq!(latest.kind, OperationType::Interest);
        assert_eq!(latest.value, dec!(50.00));
        assert_eq!(latest.balance_after, dec!(1050.00));
        assert_eq!(latest.employee, "boss");
        assert_eq!(history.account.balance, dec!(1050.00));
        assert_eq!(history.account.free_balance, dec!(1050.00));
    }

    #[tokio::test]
    async fn test_skips_non_positive_balances() {
        let (ctx, request) = setup().await;
        let overdrawn = seed_account(&ctx, &request, dec!(100)).await;
        let empty = seed_account(&ctx, &request, dec!(0)).await;
        OperationService::new(&ctx)
            .post(&request, overdrawn.id, OperationRequest::withdrawal(dec!(40)))
            .await
            .unwrap();

        let boss = RequestContext::extended("boss");
        let report = InterestService::new(&ctx).recount(&boss).await.unwrap();
        assert_eq!(report.accounts, 0);
        assert_eq!(report.message(), "Interest for 0 account(s) has been recounted.");

        let accounts = AccountService::new(&ctx);
        assert_eq!(accounts.get(overdrawn.id).await.unwrap().balance, dec!(-40));
        assert_eq!(accounts.get(empty.id).await.unwrap().balance, dec!(0));
    }

    #[tokio::test]
    async fn test_overflow_rolls_back_whole_batch() {
        let (ctx, request) = setup().await;
        let small = seed_account(&ctx, &request, dec!(0)).await;
        let huge = seed_account(&ctx, &request, dec!(0)).await;
        let accounts = AccountService::new(&ctx);
        let operations = OperationService::new(&ctx);

        for account in [&small, &huge] {
            accounts
                .update(&request, account.id, AccountUpdate { percent: dec!(10), debit: dec!(0) })
                .await
                .unwrap();
        }
        operations
            .post(&request, small.id, OperationRequest::deposit(dec!(100)))
            .await
            .unwrap();
        // 9_999_999_999.99 + 10% no longer fits 12 digits
        operations
            .post(&request, huge.id, OperationRequest::deposit(dec!(9999999999.99)))
            .await
            .unwrap();

        let boss = RequestContext::extended("boss");
        let err = InterestService::new(&ctx).recount(&boss).await.unwrap_err();
        assert!(matches!(err, BusinessError::InterestRolledBack { .. }));

        assert_eq!(accounts.get(small.id).await.unwrap().balance, dec!(100));
        let history = operations.history(small.id, Page::default()).await.unwrap();
        assert_eq!(history.operations.total, 1);
    }
}
