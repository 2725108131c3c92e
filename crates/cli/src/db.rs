//! Database initialization and status

use anyhow::{Context, Result};
use minibank_business::ServiceContext;
use minibank_persistence::{
    AccountRepo, AccountTypeRepo, CustomerRepo, Database, LogRepo, OperationRepo, ParameterRepo,
};
use tracing::debug;

use crate::config::AppConfig;

/// Initialize the database with schema
pub async fn init_database(config: &AppConfig, force: bool) -> Result<()> {
    let path = &config.database.path;
    if force && path.exists() {
        std::fs::remove_file(path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    println!("📦 Applying migrations...");
    let db = Database::connect(&config.database)
        .await
        .context("Failed to initialize database")?;
    db.close().await;
    Ok(())
}

/// Show database status
pub async fn show_status(config: &AppConfig) -> Result<()> {
    let path = &config.database.path;
    if !Database::exists(path) {
        println!("❌ Database not found at {:?}", path);
        println!("   Run 'minibank init' to create the database");
        return Ok(());
    }

    let db = connect(config).await?;
    let pool = db.pool();

    let parameter = ParameterRepo::get(pool).await?;
    let account_types = AccountTypeRepo::get_all(pool).await?.len();

    println!("📊 Database Status");
    println!("   Path:          {:?}", path);
    println!("   Parameter:     {}", parameter);
    println!();
    println!("   Customers:     {}", CustomerRepo::count(pool).await?);
    println!("   Account types: {}", account_types);
    println!("   Accounts:      {}", AccountRepo::count(pool).await?);
    println!("   Operations:    {}", OperationRepo::count(pool).await?);
    println!("   Log entries:   {}", LogRepo::count(pool).await?);

    db.close().await;
    Ok(())
}

/// Open an existing database
pub async fn connect(config: &AppConfig) -> Result<Database> {
    debug!(path = ?config.database.path, employee = %config.request.employee, "Opening database");
    Database::connect(&config.database.clone().existing_only())
        .await
        .context("Failed to connect to database. Run 'minibank init' first.")
}

/// Open the database and build the service context
pub async fn services(config: &AppConfig) -> Result<(Database, ServiceContext)> {
    let db = connect(config).await?;
    let ctx = ServiceContext::new(&db);
    Ok((db, ctx))
}
