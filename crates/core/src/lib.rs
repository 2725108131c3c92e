//! # Minibank Core
//!
//! Domain types cho Minibank - Customer, AccountType, Account, Operation,
//! Parameter, AuditEntry - cùng với các quy tắc ledger:
//!
//! - Posting: `balance' = balance ± value`, `free_balance' = balance' + debit >= 0`
//! - Interest: `round(balance * percent / 100, 2)` half-up
//! - IBAN: country(2) + bank(8) + subaccount(6) + account/zeros/customer(12)
//!
//! Crate này không phụ thuộc vào database; mọi hàm đều thuần túy.

pub mod account;
pub mod account_type;
pub mod audit;
pub mod customer;
pub mod error;
pub mod iban;
pub mod interest;
pub mod money;
pub mod operation;
pub mod parameter;
pub mod validation;

pub use account::{Account, AccountUpdate, BalanceChange, NewAccount};
pub use account_type::AccountType;
pub use audit::{AuditEntry, AuditStatus};
pub use customer::{birth_date_from_pesel, Customer, CustomerForm};
pub use error::{CoreError, CoreResult};
pub use iban::{generate_iban, IBAN_LENGTH};
pub use interest::compute_interest;
pub use operation::{Operation, OperationRequest, OperationType};
pub use parameter::Parameter;
