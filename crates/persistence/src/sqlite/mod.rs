//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod page;
pub mod repos;
pub mod schema;

pub use page::{Page, Paged, PAGE_SIZE};
pub use repos::{
    begin_write, init_memory_database, run_migrations, AccountInsert, AccountRepo,
    AccountTypeRepo, CustomerRepo, LogRepo, OperationRepo, ParameterRepo,
};
pub use schema::{AccountRow, AccountTypeRow, CustomerRow, LogRow, OperationRow, ParameterRow};
