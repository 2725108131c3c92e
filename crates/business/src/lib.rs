//! # Minibank Business
//!
//! Business logic layer - customers, account types, accounts, operation
//! posting, interest recount and the audit log.
//!
//! ```rust,ignore
//! use minibank_business::{OperationService, RequestContext, ServiceContext};
//! use minibank_core::OperationRequest;
//!
//! let ctx = ServiceContext::new(&db);
//! let teller = RequestContext::standard("teller");
//! OperationService::new(&ctx)
//!     .post(&teller, account_id, OperationRequest::deposit(dec!(100)))
//!     .await?;
//! ```

pub mod account;
pub mod account_type;
pub mod audit;
pub mod customer;
pub mod error;
pub mod interest;
pub mod operation;
pub mod parameter;
pub mod services;

pub use account::AccountService;
pub use account_type::AccountTypeService;
pub use audit::ActivityMonitor;
pub use customer::CustomerService;
pub use error::{BusinessError, BusinessResult};
pub use interest::{InterestReport, InterestService};
pub use operation::{AccountHistory, OperationService, PostingResult};
pub use parameter::ParameterService;
pub use services::{RequestContext, Role, ServiceContext};

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::NaiveDate;
    use minibank_core::{Account, AccountType, Customer, CustomerForm, NewAccount};
    use minibank_persistence::Database;
    use rust_decimal::Decimal;

    pub(crate) async fn setup() -> (ServiceContext, RequestContext) {
        let db = Database::in_memory().await.unwrap();
        (ServiceContext::new(&db), RequestContext::standard("teller"))
    }

    pub(crate) fn customer_form(pesel: &str, identification: &str) -> CustomerForm {
        CustomerForm {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            street: "Marszałkowska".to_string(),
            house: "10".to_string(),
            apartment: Some("4".to_string()),
            postal_code: "00-950".to_string(),
            city: "Warszawa".to_string(),
            pesel: pesel.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            birth_city: "Kraków".to_string(),
            identification: identification.to_string(),
        }
    }

    pub(crate) async fn seed_customer(ctx: &ServiceContext, request: &RequestContext) -> Customer {
        CustomerService::new(ctx)
            .create(request, customer_form("85061512345", "ABC123456"))
            .await
            .unwrap()
    }

    pub(crate) async fn seed_account_type(
        ctx: &ServiceContext,
        request: &RequestContext,
        code: &str,
        percent: Decimal,
    ) -> AccountType {
        AccountTypeService::new(ctx)
            .create(request, AccountType::new(code, "Savings", "000001", percent))
            .await
            .unwrap()
    }

    /// Fresh customer + account of type A-00 (0% interest) with the given debit
    pub(crate) async fn seed_account(
        ctx: &ServiceContext,
        request: &RequestContext,
        debit: Decimal,
    ) -> Account {
        let customer = seed_customer(ctx, request).await;
        if AccountTypeService::new(ctx).get("A-00").await.is_err() {
            seed_account_type(ctx, request, "A-00", Decimal::ZERO).await;
        }
        AccountService::new(ctx)
            .open(
                request,
                customer.id,
                NewAccount {
                    account_type: "A-00".to_string(),
                    percent: None,
                    debit,
                },
            )
            .await
            .unwrap()
    }
}
