//! Operation posting and history
//!
//! Posting protocol, all inside one SQLite transaction:
//!
//! 1. read the account (balance, debit, version)
//! 2. compute `balance' = balance ± value`, `free' = balance' + debit`
//! 3. reject if `free' < 0` or a money field overflows
//! 4. write the account (only if `version` is unchanged) and the ledger row
//!
//! Any failure rolls both writes back.

use crate::error::{BusinessError, BusinessResult};
use crate::services::{RequestContext, ServiceContext};
use chrono::Utc;
use minibank_core::{Account, Operation, OperationRequest};
use minibank_persistence::{AccountRepo, OperationRepo, Page, Paged};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{info, warn};

/// Result of a committed posting
#[derive(Debug, Clone)]
pub struct PostingResult {
    pub operation: Operation,
    /// Account state right after the posting
    pub account: Account,
}

/// One page of an account's ledger, with the account header
#[derive(Debug, Clone, Serialize)]
pub struct AccountHistory {
    pub account: Account,
    pub operations: Paged<Operation>,
}

impl AccountHistory {
    /// IBAN shown in the history header (empty until generated)
    pub fn iban(&self) -> &str {
        self.account.iban_or_empty()
    }
}

/// Operation Service - posts deposits and withdrawals, reads history
pub struct OperationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OperationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a deposit or withdrawal on an account.
    ///
    /// On `InsufficientFunds` the error carries the balances re-read after
    /// rollback, not the in-memory copy.
    pub async fn post(
        &self,
        request: &RequestContext,
        account_id: i64,
        operation: OperationRequest,
    ) -> BusinessResult<PostingResult> {
        // Validate amount and type before touching the database
        operation.validate()?;

        let mut tx = self.ctx.begin_write().await?;
        match post_in_tx(&mut tx, request, account_id, &operation).await {
            Ok(result) => {
                tx.commit().await?;
                info!(
                    account_id,
                    operation_id = result.operation.id,
                    kind = %operation.kind,
                    value = %result.operation.value,
                    balance = %result.account.balance,
                    employee = %request.employee,
                    "Operation posted"
                );
                Ok(result)
            }
            Err(err) => {
                tx.rollback().await?;
                warn!(
                    account_id,
                    kind = %operation.kind,
                    amount = %operation.amount,
                    employee = %request.employee,
                    error = %err,
                    "Operation rejected"
                );

                if err.is_insufficient_funds() {
                    let account = AccountRepo::get_by_id(self.ctx.pool(), account_id).await?;
                    return Err(BusinessError::InsufficientFunds {
                        balance: account.balance,
                        debit: account.debit,
                        free_balance: account.free_balance,
                    });
                }
                Err(err)
            }
        }
    }

    /// One page of an account's operations, newest first
    pub async fn history(&self, account_id: i64, page: Page) -> BusinessResult<AccountHistory> {
        let pool = self.ctx.pool();
        let account = AccountRepo::get_by_id(pool, account_id).await?;
        let total = OperationRepo::count_by_account(pool, account_id).await?;
        let items = OperationRepo::get_by_account(pool, account_id, page).await?;

        Ok(AccountHistory {
            account,
            operations: Paged::new(items, page, total),
        })
    }

    /// Every operation of an account, newest first (used for export)
    pub async fn full_history(&self, account_id: i64) -> BusinessResult<(Account, Vec<Operation>)> {
        let pool = self.ctx.pool();
        let account = AccountRepo::get_by_id(pool, account_id).await?;
        let operations = OperationRepo::get_all_by_account(pool, account_id).await?;
        Ok((account, operations))
    }
}

async fn post_in_tx(
    conn: &mut SqliteConnection,
    request: &RequestContext,
    account_id: i64,
    operation: &OperationRequest,
) -> BusinessResult<PostingResult> {
    let account = AccountRepo::get_by_id(&mut *conn, account_id).await?;
    let change = account.post(operation)?;

    AccountRepo::update_balances(
        &mut *conn,
        account_id,
        change.balance,
        change.free_balance,
        account.version,
    )
    .await?;

    let operation_id = OperationRepo::insert(
        &mut *conn,
        account_id,
        operation.kind,
        change.value,
        change.balance,
        &request.employee,
        Utc::now(),
    )
    .await?;

    Ok(PostingResult {
        operation: OperationRepo::get_by_id(&mut *conn, operation_id).await?,
        account: AccountRepo::get_by_id(&mut *conn, account_id).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_account, setup};
    use minibank_core::{CoreError, OperationType};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_deposit_and_withdrawal() {
        let (ctx, request) = setup().await;
        let account = seed_account(&ctx, &request, dec!(0)).await;
        let service = OperationService::new(&ctx);

        let deposit = service
            .post(&request, account.id, OperationRequest::deposit(dec!(100.00)))
            .await
            .unwrap();
        assert_eq!(deposit.operation.value, dec!(100.00));
        assert_eq!(deposit.account.balance, dec!(100.00));

        let withdrawal = service
            .post(&request, account.id, OperationRequest::withdrawal(dec!(30.25)))
            .await
            .unwrap();
        assert_eq!(withdrawal.operation.kind, OperationType::Withdrawal);
        assert_eq!(withdrawal.operation.value, dec!(-30.25));
        assert_eq!(withdrawal.operation.balance_after, dec!(69.75));
        assert_eq!(withdrawal.account.balance, dec!(69.75));
        assert_eq!(withdrawal.account.free_balance, dec!(69.75));
        assert_eq!(withdrawal.account.version, 2);
        assert_eq!(withdrawal.operation.employee, "teller");
    }

    #[tokio::test]
    async fn test_withdrawal_within_debit() {
        let (ctx, request) = setup().await;
        let account = seed_account(&ctx, &request, dec!(100)).await;

        let result = OperationService::new(&ctx)
            .post(&request, account.id, OperationRequest::withdrawal(dec!(100)))
            .await
            .unwrap();
        assert_eq!(result.account.balance, dec!(-100));
        assert_eq!(result.account.free_balance, dec!(0));
        assert!(result.account.is_consistent());
    }

    #[tokio::test]
    async fn test_overdraft_rejected_and_state_unchanged() {
        let (ctx, request) = setup().await;
        let account = seed_account(&ctx, &request, dec!(50)).await;
        let service = OperationService::new(&ctx);
        service
            .post(&request, account.id, OperationRequest::deposit(dec!(20)))
            .await
            .unwrap();

        let err = service
            .post(&request, account.id, OperationRequest::withdrawal(dec!(70.01)))
            .await
            .unwrap_err();

        match err {
            BusinessError::InsufficientFunds {
                balance,
                debit,
                free_balance,
            } => {
                assert_eq!(balance, dec!(20));
                assert_eq!(debit, dec!(50));
                assert_eq!(free_balance, dec!(70));
            }
            other => panic!("unexpected error: {other}"),
        }

        let history = service.history(account.id, Page::default()).await.unwrap();
        assert_eq!(history.operations.total, 1);
        assert_eq!(history.account.balance, dec!(20));
        assert_eq!(history.account.version, 1);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let (ctx, request) = setup().await;
        let service = OperationService::new(&ctx);

        // Rejected before the account is read, so a missing account does not matter
        let err = service
            .post(&request, 999, OperationRequest::deposit(dec!(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, BusinessError::Validation(CoreError::InvalidAmount(_))));

        let err = service
            .post(
                &request,
                999,
                OperationRequest {
                    kind: OperationType::Interest,
                    amount: dec!(5),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BusinessError::Validation(CoreError::ManualPostingNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn test_post_to_missing_account() {
        let (ctx, request) = setup().await;
        let err = OperationService::new(&ctx)
            .post(&request, 999, OperationRequest::deposit(dec!(1)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_history_paginated_newest_first() {
        let (ctx, request) = setup().await;
        let account = seed_account(&ctx, &request, dec!(0)).await;
        let service = OperationService::new(&ctx);
        for i in 1..=12 {
            service
                .post(&request, account.id, OperationRequest::deposit(rust_decimal::Decimal::from(i)))
                .await
                .unwrap();
        }

        let first = service.history(account.id, Page::new(1)).await.unwrap();
        assert_eq!(first.operations.items.len(), 10);
        assert_eq!(first.operations.total, 12);
        assert_eq!(first.operations.items[0].value, dec!(12));
        assert_eq!(first.operations.items[0].balance_after, dec!(78));
        assert_eq!(first.iban(), "");

        let second = service.history(account.id, Page::new(2)).await.unwrap();
        assert_eq!(second.operations.items.len(), 2);
        assert_eq!(second.operations.items[1].value, dec!(1));

        let (_, all) = service.full_history(account.id).await.unwrap();
        assert_eq!(all.len(), 12);
    }

    #[tokio::test]
    async fn test_amounts_stored_with_two_decimals() {
        let (ctx, request) = setup().await;
        let account = seed_account(&ctx, &request, dec!(0)).await;
        let service = OperationService::new(&ctx);

        service
            .post(&request, account.id, OperationRequest::deposit(dec!(1.5000)))
            .await
            .unwrap();
        let result = service
            .post(&request, account.id, OperationRequest::deposit(dec!(100)))
            .await
            .unwrap();
        assert_eq!(result.operation.value.to_string(), "100.00");

        let stored = AccountRepo::get_by_id(ctx.pool(), account.id).await.unwrap();
        assert_eq!(stored.balance.to_string(), "101.50");
        assert_eq!(stored.free_balance.to_string(), "101.50");

        let operations = OperationRepo::get_all_by_account(ctx.pool(), account.id)
            .await
            .unwrap();
        let values: Vec<String> = operations.iter().map(|op| op.value.to_string()).collect();
        assert_eq!(values, vec!["100.00", "1.50"]);
        assert_eq!(operations[0].balance_after.to_string(), "101.50");
    }
}
