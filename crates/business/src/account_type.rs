//! Account type catalogue - create, list, update, delete

use crate::error::{BusinessError, BusinessResult};
use crate::services::{RequestContext, ServiceContext};
use minibank_core::AccountType;
use minibank_persistence::{AccountRepo, AccountTypeRepo, PersistenceError};
use rust_decimal::Decimal;
use tracing::info;

/// AccountType Service - manages the account type catalogue
pub struct AccountTypeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountTypeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account type. The code is uppercased and must be unique.
    pub async fn create(
        &self,
        request: &RequestContext,
        account_type: AccountType,
    ) -> BusinessResult<AccountType> {
        let account_type = AccountType::new(
            &account_type.code,
            &account_type.description,
            &account_type.subaccount,
            account_type.percent,
        );
        account_type.validate()?;

        AccountTypeRepo::insert(self.ctx.pool(), &account_type)
            .await
            .map_err(|e| match e {
                PersistenceError::UniqueViolation(_) => BusinessError::AlreadyExists {
                    entity: "AccountType".to_string(),
                    id: account_type.code.clone(),
                },
                other => other.into(),
            })?;

        info!(code = %account_type.code, employee = %request.employee, "Account type created");
        Ok(account_type)
    }

    /// Get account type by code (case-insensitive)
    pub async fn get(&self, code: &str) -> BusinessResult<AccountType> {
        let code = AccountType::normalize_code(code);
        Ok(AccountTypeRepo::get_by_code(self.ctx.pool(), &code).await?)
    }

    /// List account types, highest code first, optionally filtered by code prefix
    pub async fn list(&self, term: Option<&str>) -> BusinessResult<Vec<AccountType>> {
        let types = match term.map(str::trim) {
            Some(term) if !term.is_empty() => {
                AccountTypeRepo::search_by_code(self.ctx.pool(), term).await?
            }
            _ => AccountTypeRepo::get_all(self.ctx.pool()).await?,
        };
        Ok(types)
    }

    /// Update description, subaccount and default percent. The code never changes.
    pub async fn update(
        &self,
        request: &RequestContext,
        code: &str,
        description: &str,
        subaccount: &str,
        percent: Decimal,
    ) -> BusinessResult<AccountType> {
        let account_type = AccountType::new(code, description, subaccount, percent);
        account_type.validate()?;

        AccountTypeRepo::update(self.ctx.pool(), &account_type).await?;
        info!(code = %account_type.code, employee = %request.employee, "Account type updated");
        Ok(account_type)
    }

    /// Delete an account type no account refers to
    pub async fn delete(&self, request: &RequestContext, code: &str) -> BusinessResult<()> {
        let code = AccountType::normalize_code(code);
        let mut tx = self.ctx.begin_write().await?;

        AccountTypeRepo::get_by_code(&mut *tx, &code).await?;
        let accounts = AccountRepo::count_by_type(&mut *tx, &code).await?;
        if accounts > 0 {
            return Err(BusinessError::protected("AccountType", &code, accounts, "account(s)"));
        }

        AccountTypeRepo::delete(&mut *tx, &code).await?;
        tx.commit().await?;

        info!(code = %code, employee = %request.employee, "Account type deleted");
        Ok(())
    }
}
