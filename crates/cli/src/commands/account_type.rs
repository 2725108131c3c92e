//! Account type catalogue commands

use anyhow::Result;
use minibank_business::{AccountTypeService, ActivityMonitor};
use minibank_core::AccountType;

use crate::config::AppConfig;
use crate::db;
use crate::AccountTypeAction;

/// Handle account-type subcommands
pub async fn handle(config: &AppConfig, action: AccountTypeAction) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let service = AccountTypeService::new(&ctx);
    let monitor = ActivityMonitor::new(&ctx);
    let request = &config.request;

    match action {
        AccountTypeAction::Create {
            code,
            description,
            subaccount,
            percent,
        } => {
            let data = format!("{} {} {} {}", code, description, subaccount, percent);
            let account_type = AccountType::new(&code, &description, &subaccount, percent);
            let created = monitor
                .record(request, "create_account_type", &data, || {
                    service.create(request, account_type)
                })
                .await?;
            println!("✅ Account type created: {} ({}%)", created, created.percent);
        }

        AccountTypeAction::List { search } => {
            let types = service.list(search.as_deref()).await?;
            if types.is_empty() {
                println!("No account types found.");
            } else {
                println!("{:<6} {:<30} {:<10} {:>8}", "Code", "Description", "Subacc.", "Percent");
                println!("{}", "-".repeat(57));
                for t in types {
                    println!(
                        "{:<6} {:<30} {:<10} {:>8}",
                        t.code, t.description, t.subaccount, t.percent
                    );
                }
            }
        }

        AccountTypeAction::Update {
            code,
            description,
            subaccount,
            percent,
        } => {
            let data = format!("{} {} {} {}", code, description, subaccount, percent);
            let updated = monitor
                .record(request, "update_account_type", &data, || {
                    service.update(request, &code, &description, &subaccount, percent)
                })
                .await?;
            println!("✅ Account type updated: {}", updated);
        }

        AccountTypeAction::Delete { code } => {
            monitor
                .record(request, "delete_account_type", &code, || service.delete(request, &code))
                .await?;
            println!("🗑️  Account type {} deleted", code.to_uppercase());
        }
    }

    db.close().await;
    Ok(())
}
