//! Minibank CLI - teller operations from the command line
//!
//! Usage:
//! ```bash
//! minibank init
//! minibank parameter set PL 12345678
//! minibank account-type create A-00 "Savings" 000001 1.50
//! minibank customer create --first-name Jan --last-name Kowalski ...
//! minibank account open 1 --type A-00 --debit 500
//! minibank operation post 1 deposit 100.00
//! minibank --role extended iban 1
//! minibank --role extended interest
//! minibank history 1 --page 2
//! minibank export history 1 --format csv --output history.csv
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;
mod config;
mod db;

use commands::{account, account_type, customer, export, log, operation, parameter};
use config::AppConfig;

/// Minibank - core-banking ledger for tellers
#[derive(Parser)]
#[command(name = "minibank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, env = "MINIBANK_DB", default_value = "data/minibank.db", global = true)]
    pub db: PathBuf,

    /// Acting employee, recorded on every change
    #[arg(long, env = "MINIBANK_EMPLOYEE", default_value = "teller", global = true)]
    pub employee: String,

    /// Permission level of the acting employee
    #[arg(long, env = "MINIBANK_ROLE", default_value = "standard", global = true)]
    pub role: RoleArg,

    /// Log filter (e.g. info, debug, minibank_business=debug)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database with schema and seed data
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Bank parameter (country code, bank number)
    Parameter {
        #[command(subcommand)]
        action: ParameterAction,
    },

    /// Customer register
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Account type catalogue
    AccountType {
        #[command(subcommand)]
        action: AccountTypeAction,
    },

    /// Customer accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Post operations
    Operation {
        #[command(subcommand)]
        action: OperationAction,
    },

    /// Show an account's operation history
    History {
        /// Account ID
        account_id: i64,
        /// Page number (10 operations per page)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Export reports
    Export {
        #[command(subcommand)]
        action: ExportAction,
    },

    /// Recount interest for every eligible account (extended role)
    Interest,

    /// Generate the IBAN of an account (extended role)
    Iban {
        /// Account ID
        account_id: i64,
    },

    /// Show the audit log
    Log {
        /// Number of entries
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum ParameterAction {
    /// Show the current parameter
    Show,
    /// Update the parameter
    Set {
        /// Country code (2 letters)
        country_code: String,
        /// Bank number (8 digits)
        bank_number: String,
    },
}

/// Customer form fields, shared by create and update
#[derive(Args)]
pub struct CustomerArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub house: String,
    #[arg(long)]
    pub apartment: Option<String>,
    /// Postal code (NN-NNN)
    #[arg(long)]
    pub postal_code: String,
    #[arg(long)]
    pub city: String,
    /// PESEL (11 digits)
    #[arg(long)]
    pub pesel: String,
    /// Birth date (YYYY-MM-DD), derived from the PESEL when omitted
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,
    #[arg(long)]
    pub birth_city: String,
    /// ID document number
    #[arg(long)]
    pub identification: String,
}

#[derive(Subcommand)]
pub enum CustomerAction {
    /// Register a new customer
    Create(CustomerArgs),
    /// Show customer details
    Show {
        customer_id: i64,
    },
    /// List customers, optionally searching by PESEL or identification prefix
    List {
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Select customers by PESEL or identification prefix (empty term selects nobody)
    Select {
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Update a customer
    Update {
        customer_id: i64,
        #[command(flatten)]
        form: CustomerArgs,
    },
    /// Delete a customer without accounts
    Delete {
        customer_id: i64,
    },
}

#[derive(Subcommand)]
pub enum AccountTypeAction {
    /// Create an account type
    Create {
        /// Code (L-NN, e.g. A-00)
        code: String,
        description: String,
        /// Subaccount (6 digits)
        subaccount: String,
        /// Default interest percent
        percent: Decimal,
    },
    /// List account types
    List {
        /// Code prefix
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Update an account type (the code cannot change)
    Update {
        code: String,
        description: String,
        subaccount: String,
        percent: Decimal,
    },
    /// Delete an unused account type
    Delete {
        code: String,
    },
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Open an account for a customer
    Open {
        customer_id: i64,
        /// Account type code
        #[arg(long = "type", short = 't')]
        account_type: String,
        /// Interest percent (defaults to the account type's)
        #[arg(long)]
        percent: Option<Decimal>,
        /// Debit limit
        #[arg(long, default_value = "0")]
        debit: Decimal,
    },
    /// List a customer's accounts
    List {
        customer_id: i64,
    },
    /// Show account details
    Show {
        account_id: i64,
    },
    /// Update percent and debit limit
    Update {
        account_id: i64,
        #[arg(long)]
        percent: Decimal,
        #[arg(long)]
        debit: Decimal,
    },
    /// Delete an account without operations
    Delete {
        account_id: i64,
    },
}

#[derive(Subcommand)]
pub enum OperationAction {
    /// Post a deposit or withdrawal
    Post {
        account_id: i64,
        kind: OperationKindArg,
        /// Amount (positive, 2 decimals)
        amount: Decimal,
    },
}

#[derive(Subcommand)]
pub enum ExportAction {
    /// Full operation history of an account
    History {
        account_id: i64,
        #[arg(long, default_value = "csv")]
        format: ReportFormat,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Every account of a customer
    Accounts {
        customer_id: i64,
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Standard,
    Extended,
}

impl RoleArg {
    pub fn to_role(self) -> minibank_business::Role {
        match self {
            RoleArg::Standard => minibank_business::Role::Standard,
            RoleArg::Extended => minibank_business::Role::Extended,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OperationKindArg {
    Deposit,
    Withdrawal,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn to_export_format(self) -> minibank_reports::ExportFormat {
        match self {
            ReportFormat::Csv => minibank_reports::ExportFormat::Csv,
            ReportFormat::Json => minibank_reports::ExportFormat::Json,
            ReportFormat::Markdown => minibank_reports::ExportFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    config::init_tracing(&cli.log_level);

    let config = AppConfig::from_cli(&cli);

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&config, force).await?;
            println!("✅ Database initialized at {:?}", config.database.path);
        }

        Commands::Status => {
            db::show_status(&config).await?;
        }

        Commands::Parameter { action } => {
            parameter::handle(&config, action).await?;
        }

        Commands::Customer { action } => {
            customer::handle(&config, action).await?;
        }

        Commands::AccountType { action } => {
            account_type::handle(&config, action).await?;
        }

        Commands::Account { action } => {
            account::handle(&config, action).await?;
        }

        Commands::Operation { action } => match action {
            OperationAction::Post {
                account_id,
                kind,
                amount,
            } => {
                operation::post(&config, account_id, kind, amount).await?;
            }
        },

        Commands::History { account_id, page } => {
            operation::history(&config, account_id, page).await?;
        }

        Commands::Export { action } => {
            export::handle(&config, action).await?;
        }

        Commands::Interest => {
            operation::interest(&config).await?;
        }

        Commands::Iban { account_id } => {
            account::generate_iban(&config, account_id).await?;
        }

        Commands::Log { limit } => {
            log::show(&config, limit).await?;
        }
    }

    Ok(())
}
