//! Account management commands

use anyhow::Result;
use minibank_business::{AccountService, ActivityMonitor};
use minibank_core::{Account, AccountUpdate, NewAccount};

use crate::config::AppConfig;
use crate::db;
use crate::AccountAction;

/// Handle account subcommands
pub async fn handle(config: &AppConfig, action: AccountAction) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let service = AccountService::new(&ctx);
    let monitor = ActivityMonitor::new(&ctx);
    let request = &config.request;

    match action {
        AccountAction::Open {
            customer_id,
            account_type,
            percent,
            debit,
        } => {
            let new = NewAccount {
                account_type,
                percent,
                debit,
            };
            let data = format!("customer={} {:?}", customer_id, new);
            let account = monitor
                .record(request, "create_account", &data, || {
                    service.open(request, customer_id, new)
                })
                .await?;

            println!("✅ Account opened:");
            print_account(&account);
        }

        AccountAction::List { customer_id } => {
            let accounts = service.list_for_customer(customer_id).await?;
            if accounts.is_empty() {
                println!("Customer #{} has no accounts.", customer_id);
            } else {
                println!(
                    "{:<6} {:<30} {:<6} {:>14} {:>12} {:>14} {:>7}",
                    "ID", "IBAN", "Type", "Balance", "Debit", "Free", "%"
                );
                println!("{}", "-".repeat(97));
                for a in accounts {
                    println!(
                        "{:<6} {:<30} {:<6} {:>14} {:>12} {:>14} {:>7}",
                        a.id,
                        a.iban_or_empty(),
                        a.account_type,
                        a.balance,
                        a.debit,
                        a.free_balance,
                        a.percent
                    );
                }
            }
        }

        AccountAction::Show { account_id } => {
            let account = service.get(account_id).await?;
            println!("🏦 Account #{}", account.id);
            print_account(&account);
            println!(
                "   Created:      {} by {}",
                account.created_at.format("%Y-%m-%d %H:%M:%S"),
                account.created_employee
            );
        }

        AccountAction::Update {
            account_id,
            percent,
            debit,
        } => {
            let update = AccountUpdate { percent, debit };
            let data = format!("account={} {:?}", account_id, update);
            let account = monitor
                .record(request, "update_account", &data, || {
                    service.update(request, account_id, update)
                })
                .await?;
            println!("✅ Account updated:");
            print_account(&account);
        }

        AccountAction::Delete { account_id } => {
            monitor
                .record(request, "delete_account", &account_id.to_string(), || {
                    service.delete(request, account_id)
                })
                .await?;
            println!("🗑️  Account #{} deleted", account_id);
        }
    }

    db.close().await;
    Ok(())
}

/// Generate (or regenerate) an account's IBAN
pub async fn generate_iban(config: &AppConfig, account_id: i64) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let request = &config.request;

    let service = AccountService::new(&ctx);
    let account = ActivityMonitor::new(&ctx)
        .record(request, "generate_iban", &account_id.to_string(), || {
            service.generate_iban(request, account_id)
        })
        .await?;

    println!("✅ IBAN generated for account #{}: {}", account.id, account.iban_or_empty());

    db.close().await;
    Ok(())
}

fn print_account(account: &Account) {
    println!("   ID:           {}", account.id);
    println!("   Customer:     #{}", account.customer_id);
    println!("   Type:         {}", account.account_type);
    println!("   IBAN:         {}", account.iban.as_deref().unwrap_or("(not generated)"));
    println!("   Balance:      {}", account.balance);
    println!("   Debit:        {}", account.debit);
    println!("   Free balance: {}", account.free_balance);
    println!("   Percent:      {}", account.percent);
}
