//! Audit log command

use anyhow::Result;
use minibank_business::ActivityMonitor;

use crate::config::AppConfig;
use crate::db;

/// Print the most recent audit log entries
pub async fn show(config: &AppConfig, limit: i64) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let entries = ActivityMonitor::new(&ctx).recent(limit).await?;

    if entries.is_empty() {
        println!("Audit log is empty.");
    } else {
        println!(
            "{:<20} {:<22} {:<12} {:<8} {:>10}  {}",
            "Time", "Action", "User", "Status", "Seconds", "Data"
        );
        println!("{}", "-".repeat(100));
        for e in entries {
            println!(
                "{:<20} {:<22} {:<12} {:<8} {:>10}  {}",
                e.logged_at.format("%Y-%m-%d %H:%M:%S"),
                e.action,
                e.user,
                e.status,
                e.duration,
                e.data
            );
        }
    }

    db.close().await;
    Ok(())
}
