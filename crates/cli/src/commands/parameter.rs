//! Bank parameter commands

use anyhow::Result;
use minibank_business::{ActivityMonitor, ParameterService};

use crate::config::AppConfig;
use crate::db;
use crate::ParameterAction;

/// Handle parameter subcommands
pub async fn handle(config: &AppConfig, action: ParameterAction) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let service = ParameterService::new(&ctx);
    let request = &config.request;

    match action {
        ParameterAction::Show => {
            let parameter = service.get().await?;
            println!("⚙️  Parameter");
            println!("   Country code: {}", parameter.country_code);
            println!("   Bank number:  {}", parameter.bank_number);
        }
        ParameterAction::Set {
            country_code,
            bank_number,
        } => {
            let data = format!("{} {}", country_code, bank_number);
            let parameter = ActivityMonitor::new(&ctx)
                .record(request, "update_parameter", &data, || {
                    service.update(request, &country_code, &bank_number)
                })
                .await?;
            println!("✅ Parameter updated: {}", parameter);
        }
    }

    db.close().await;
    Ok(())
}
