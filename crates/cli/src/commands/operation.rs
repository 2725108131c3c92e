//! Operation posting, history and interest recount commands

use anyhow::Result;
use minibank_business::{ActivityMonitor, InterestService, OperationService};
use minibank_core::OperationRequest;
use minibank_persistence::Page;
use rust_decimal::Decimal;

use crate::config::AppConfig;
use crate::db;
use crate::OperationKindArg;

/// Post a deposit or withdrawal
pub async fn post(
    config: &AppConfig,
    account_id: i64,
    kind: OperationKindArg,
    amount: Decimal,
) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let request = &config.request;

    let operation = match kind {
        OperationKindArg::Deposit => OperationRequest::deposit(amount),
        OperationKindArg::Withdrawal => OperationRequest::withdrawal(amount),
    };
    let data = format!("account={} {} {}", account_id, operation.kind, operation.amount);

    let service = OperationService::new(&ctx);
    let result = ActivityMonitor::new(&ctx)
        .record(request, "create_operation", &data, || {
            service.post(request, account_id, operation)
        })
        .await;

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            db.close().await;
            return Err(e.into());
        }
    };

    println!("✅ {} posted on account #{}", result.operation.kind, account_id);
    println!("   Operation ID: {}", result.operation.id);
    println!("   Value:        {}", result.operation.value);
    println!("   Balance:      {}", result.account.balance);
    println!("   Free balance: {}", result.account.free_balance);

    db.close().await;
    Ok(())
}

/// Show one page of an account's history
pub async fn history(config: &AppConfig, account_id: i64, page: u32) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let history = OperationService::new(&ctx)
        .history(account_id, Page::new(page))
        .await?;

    println!("📜 History of account #{}", account_id);
    println!("   IBAN: {}", history.iban());
    println!();

    if history.operations.is_empty() {
        println!("No operations.");
    } else {
        println!(
            "{:<8} {:<12} {:>14} {:>16} {:<20}",
            "ID", "Type", "Value", "Balance after", "Date"
        );
        println!("{}", "-".repeat(74));
        for op in &history.operations.items {
            println!(
                "{:<8} {:<12} {:>14} {:>16} {:<20}",
                op.id,
                op.kind,
                op.value,
                op.balance_after,
                op.created_at
                    .with_timezone(&chrono::Local)
                    .format(minibank_reports::HISTORY_DATE_FORMAT)
            );
        }
        println!();
        println!(
            "Page {} of {} ({} operation(s))",
            history.operations.page,
            history.operations.total_pages(),
            history.operations.total
        );
    }

    db.close().await;
    Ok(())
}

/// Recount interest for all accounts
pub async fn interest(config: &AppConfig) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let request = &config.request;

    let service = InterestService::new(&ctx);
    let result = ActivityMonitor::new(&ctx)
        .record(request, "recount_interest", "", || service.recount(request))
        .await;

    match result {
        Ok(report) => {
            println!("✅ {}", report.message());
            println!("   Total interest: {}", report.total_interest);
        }
        Err(e) => {
            println!("❌ Interest for 0 account(s) has been recounted.");
            db.close().await;
            return Err(e.into());
        }
    }

    db.close().await;
    Ok(())
}
