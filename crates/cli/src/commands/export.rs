//! Report export commands

use anyhow::{Context, Result};
use minibank_business::{AccountService, CustomerService, OperationService};
use minibank_reports::{AccountSummaryReport, OperationHistoryReport, ReportData};
use std::path::Path;

use crate::config::AppConfig;
use crate::db;
use crate::{ExportAction, ReportFormat};

/// Handle export subcommands
pub async fn handle(config: &AppConfig, action: ExportAction) -> Result<()> {
    let (db, ctx) = db::services(config).await?;

    match action {
        ExportAction::History {
            account_id,
            format,
            output,
        } => {
            let (account, operations) = OperationService::new(&ctx).full_history(account_id).await?;
            let report = OperationHistoryReport::new(&account, &operations);
            write_report(&report, format, output.as_deref())?;
        }
        ExportAction::Accounts {
            customer_id,
            format,
            output,
        } => {
            let customer = CustomerService::new(&ctx).get(customer_id).await?;
            let accounts = AccountService::new(&ctx).list_for_customer(customer_id).await?;
            let report = AccountSummaryReport::new(&customer, accounts);
            write_report(&report, format, output.as_deref())?;
        }
    }

    db.close().await;
    Ok(())
}

fn write_report(report: &dyn ReportData, format: ReportFormat, output: Option<&Path>) -> Result<()> {
    let exporter = format.to_export_format().exporter();
    let content = exporter.export(report);

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            println!("✅ Report written to {:?} ({})", path, exporter.extension());
        }
        None => print!("{}", content),
    }

    Ok(())
}
