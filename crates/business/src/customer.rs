//! Customer operations - create, read, update, delete, search
//!
//! CustomerService owns the customer register. Search follows the teller's
//! lookup rules: PESEL prefix first, identification prefix as a fallback.

use crate::error::{BusinessError, BusinessResult};
use crate::services::{RequestContext, ServiceContext};
use chrono::Utc;
use minibank_core::{Customer, CustomerForm};
use minibank_persistence::{AccountRepo, CustomerRepo, Page, Paged, PersistenceError};
use tracing::{debug, info};

/// Customer Service - handles the customer register
pub struct CustomerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CustomerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new customer, returns the stored record
    pub async fn create(
        &self,
        request: &RequestContext,
        form: CustomerForm,
    ) -> BusinessResult<Customer> {
        let form = form.normalized();
        form.validate()?;

        let id = CustomerRepo::insert(self.ctx.pool(), &form, &request.employee, Utc::now()).await?;
        info!(customer_id = id, employee = %request.employee, "Customer created");

        Ok(CustomerRepo::get_by_id(self.ctx.pool(), id).await?)
    }

    /// Get customer by ID
    pub async fn get(&self, id: i64) -> BusinessResult<Customer> {
        Ok(CustomerRepo::get_by_id(self.ctx.pool(), id).await?)
    }

    /// Replace the editable fields of a customer
    pub async fn update(
        &self,
        request: &RequestContext,
        id: i64,
        form: CustomerForm,
    ) -> BusinessResult<Customer> {
        let form = form.normalized();
        form.validate()?;

        CustomerRepo::update(self.ctx.pool(), id, &form).await?;
        info!(customer_id = id, employee = %request.employee, "Customer updated");

        Ok(CustomerRepo::get_by_id(self.ctx.pool(), id).await?)
    }

    /// Delete a customer that owns no accounts
    pub async fn delete(&self, request: &RequestContext, id: i64) -> BusinessResult<()> {
        let mut tx = self.ctx.begin_write().await?;

        CustomerRepo::get_by_id(&mut *tx, id).await?;
        let accounts = AccountRepo::count_by_customer(&mut *tx, id).await?;
        if accounts > 0 {
            return Err(BusinessError::protected("Customer", id, accounts, "account(s)"));
        }

        CustomerRepo::delete(&mut *tx, id)
            .await
            .map_err(|e| match e {
                PersistenceError::ForeignKeyViolation(_) => {
                    BusinessError::protected("Customer", id, accounts, "account(s)")
                }
                other => other.into(),
            })?;
        tx.commit().await?;

        info!(customer_id = id, employee = %request.employee, "Customer deleted");
        Ok(())
    }

    /// List customers, newest first.
    ///
    /// With a term: customers whose PESEL starts with it; if none, customers
    /// whose identification starts with it (case-insensitive); if none, an
    /// empty page. Without a term: every customer.
    pub async fn list(&self, term: Option<&str>, page: Page) -> BusinessResult<Paged<Customer>> {
        match term.map(str::trim) {
            Some(term) if !term.is_empty() => self.search(term, page).await,
            _ => {
                let total = CustomerRepo::count(self.ctx.pool()).await?;
                let items = CustomerRepo::list(self.ctx.pool(), page).await?;
                Ok(Paged::new(items, page, total))
            }
        }
    }

    /// Customer selector used before listing accounts, posting or viewing
    /// history. Same rules as `list`, but an empty term selects nobody.
    pub async fn select(&self, term: &str, page: Page) -> BusinessResult<Paged<Customer>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Paged::empty(page));
        }
        self.search(term, page).await
    }

    async fn search(&self, term: &str, page: Page) -> BusinessResult<Paged<Customer>> {
        let pool = self.ctx.pool();

        let total = CustomerRepo::count_by_pesel(pool, term).await?;
        if total > 0 {
            debug!(term, total, "Customer search matched PESEL");
            let items = CustomerRepo::search_by_pesel(pool, term, page).await?;
            return Ok(Paged::new(items, page, total));
        }

        let total = CustomerRepo::count_by_identification(pool, term).await?;
        if total > 0 {
            debug!(term, total, "Customer search matched identification");
            let items = CustomerRepo::search_by_identification(pool, term, page).await?;
            return Ok(Paged::new(items, page, total));
        }

        debug!(term, "Customer search matched nothing");
        Ok(Paged::empty(page))
    }
}
