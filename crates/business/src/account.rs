//! Account management - open, update terms, generate IBAN, delete
//!
//! Balances are never written here; only operation posting and interest
//! recount move money.

use crate::error::{BusinessError, BusinessResult};
use crate::services::{RequestContext, ServiceContext};
use chrono::Utc;
use minibank_core::{generate_iban, Account, AccountType, AccountUpdate, NewAccount};
use minibank_persistence::{
    AccountInsert, AccountRepo, AccountTypeRepo, CustomerRepo, OperationRepo, ParameterRepo,
};
use tracing::info;

/// Account Service - opens and maintains customer accounts
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open an account for a customer.
    ///
    /// Balance starts at 0 and free balance equals the debit limit. Without
    /// an explicit percent the account type's default applies.
    pub async fn open(
        &self,
        request: &RequestContext,
        customer_id: i64,
        new: NewAccount,
    ) -> BusinessResult<Account> {
        let new = new.normalized();
        new.validate()?;

        let pool = self.ctx.pool();
        CustomerRepo::get_by_id(pool, customer_id).await?;
        let code = AccountType::normalize_code(&new.account_type);
        let account_type = AccountTypeRepo::get_by_code(pool, &code).await?;

        let percent = new.percent.unwrap_or(account_type.percent);
        let id = AccountRepo::insert(
            pool,
            &AccountInsert {
                customer_id,
                account_type: &account_type.code,
                debit: new.debit,
                percent,
                employee: &request.employee,
                created_at: Utc::now(),
            },
        )
        .await?;

        info!(
            account_id = id,
            customer_id,
            account_type = %account_type.code,
            employee = %request.employee,
            "Account opened"
        );
        Ok(AccountRepo::get_by_id(pool, id).await?)
    }

    /// Get account by ID
    pub async fn get(&self, id: i64) -> BusinessResult<Account> {
        Ok(AccountRepo::get_by_id(self.ctx.pool(), id).await?)
    }

    /// Accounts of a customer, newest first
    pub async fn list_for_customer(&self, customer_id: i64) -> BusinessResult<Vec<Account>> {
        CustomerRepo::get_by_id(self.ctx.pool(), customer_id).await?;
        Ok(AccountRepo::get_by_customer(self.ctx.pool(), customer_id).await?)
    }

    /// Change percent and debit. Free balance is recomputed from the stored
    /// balance and must stay non-negative.
    pub async fn update(
        &self,
        request: &RequestContext,
        id: i64,
        update: AccountUpdate,
    ) -> BusinessResult<Account> {
        let update = update.normalized();
        update.validate()?;

        let mut tx = self.ctx.begin_write().await?;
        let account = AccountRepo::get_by_id(&mut *tx, id).await?;
        let free_balance = match account.free_balance_with_debit(update.debit) {
            Err(err) if err.is_insufficient_funds() => {
                return Err(BusinessError::InsufficientFunds {
                    balance: account.balance,
                    debit: account.debit,
                    free_balance: account.free_balance,
                });
            }
            result => result?,
        };

        AccountRepo::update_terms(
            &mut *tx,
            id,
            update.percent,
            update.debit,
            free_balance,
            account.version,
        )
        .await?;
        let updated = AccountRepo::get_by_id(&mut *tx, id).await?;
        tx.commit().await?;

        info!(account_id = id, employee = %request.employee, "Account terms updated");
        Ok(updated)
    }

    /// Generate and store the account's IBAN, overwriting any previous one.
    /// Requires the extended role.
    pub async fn generate_iban(&self, request: &RequestContext, id: i64) -> BusinessResult<Account> {
        request.require_extended("generate IBAN")?;

        let mut tx = self.ctx.begin_write().await?;
        let account = AccountRepo::get_by_id(&mut *tx, id).await?;
        let parameter = ParameterRepo::get(&mut *tx).await?;
        let account_type = AccountTypeRepo::get_by_code(&mut *tx, &account.account_type).await?;

        let iban = generate_iban(&parameter, &account_type.subaccount, account.id, account.customer_id)?;
        AccountRepo::set_iban(&mut *tx, id, &iban).await?;
        let updated = AccountRepo::get_by_id(&mut *tx, id).await?;
        tx.commit().await?;

        info!(account_id = id, iban = %iban, employee = %request.employee, "IBAN generated");
        Ok(updated)
    }

    /// Delete an account that has no operations
    pub async fn delete(&self, request: &RequestContext, id: i64) -> BusinessResult<()> {
        let mut tx = self.ctx.begin_write().await?;

        AccountRepo::get_by_id(&mut *tx, id).await?;
        let operations = OperationRepo::count_by_account(&mut *tx, id).await?;
        if operations > 0 {
            return Err(BusinessError::protected("Account", id, operations, "operation(s)"));
        }

        AccountRepo::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(account_id = id, employee = %request.employee, "Account deleted");
        Ok(())
    }
}
