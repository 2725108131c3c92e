//! Customer register commands

use anyhow::{anyhow, Result};
use minibank_business::{ActivityMonitor, CustomerService};
use minibank_core::{birth_date_from_pesel, CustomerForm};
use minibank_persistence::Page;

use crate::config::AppConfig;
use crate::db;
use crate::{CustomerAction, CustomerArgs};

impl TryFrom<CustomerArgs> for CustomerForm {
    type Error = anyhow::Error;

    fn try_from(args: CustomerArgs) -> Result<Self> {
        let birth_date = match args.birth_date {
            Some(date) => date,
            None => birth_date_from_pesel(&args.pesel).ok_or_else(|| {
                anyhow!(
                    "Cannot derive birth date from PESEL '{}', pass --birth-date",
                    args.pesel
                )
            })?,
        };

        Ok(CustomerForm {
            first_name: args.first_name,
            last_name: args.last_name,
            street: args.street,
            house: args.house,
            apartment: args.apartment,
            postal_code: args.postal_code,
            city: args.city,
            pesel: args.pesel,
            birth_date,
            birth_city: args.birth_city,
            identification: args.identification,
        })
    }
}

/// Handle customer subcommands
pub async fn handle(config: &AppConfig, action: CustomerAction) -> Result<()> {
    let (db, ctx) = db::services(config).await?;
    let service = CustomerService::new(&ctx);
    // Personal data (PESEL, ID document) never goes into the audit log
    let monitor = ActivityMonitor::restricted(&ctx);
    let request = &config.request;

    match action {
        CustomerAction::Create(args) => {
            let form = CustomerForm::try_from(args)?;
            let customer = monitor
                .record(request, "create_customer", "", || service.create(request, form))
                .await?;

            println!("✅ Customer created:");
            println!("   ID:             {}", customer.id);
            println!("   Name:           {}", customer.full_name());
            println!("   PESEL:          {}", customer.details.pesel);
            println!("   Identification: {}", customer.details.identification);
        }

        CustomerAction::Show { customer_id } => {
            let c = service.get(customer_id).await?;
            println!("👤 Customer #{}", c.id);
            println!("   Name:           {}", c.full_name());
            println!(
                "   Address:        {} {}{}, {} {}",
                c.details.street,
                c.details.house,
                c.details
                    .apartment
                    .as_deref()
                    .map(|a| format!("/{}", a))
                    .unwrap_or_default(),
                c.details.postal_code,
                c.details.city
            );
            println!("   PESEL:          {}", c.details.pesel);
            println!(
                "   Born:           {} in {}",
                c.details.birth_date, c.details.birth_city
            );
            println!("   Identification: {}", c.details.identification);
            println!(
                "   Created:        {} by {}",
                c.created_at.format("%Y-%m-%d %H:%M:%S"),
                c.created_employee
            );
        }

        CustomerAction::List { search, page } => {
            let customers = service.list(search.as_deref(), Page::new(page)).await?;
            super::print_customers(&customers);
        }

        CustomerAction::Select { term, page } => {
            let customers = service.select(&term, Page::new(page)).await?;
            super::print_customers(&customers);
        }

        CustomerAction::Update { customer_id, form } => {
            let form = CustomerForm::try_from(form)?;
            let customer = monitor
                .record(request, "update_customer", "", || {
                    service.update(request, customer_id, form)
                })
                .await?;
            println!("✅ Customer #{} updated ({})", customer.id, customer.full_name());
        }

        CustomerAction::Delete { customer_id } => {
            monitor
                .record(request, "delete_customer", &customer_id.to_string(), || {
                    service.delete(request, customer_id)
                })
                .await?;
            println!("🗑️  Customer #{} deleted", customer_id);
        }
    }

    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cli, Commands};
    use chrono::NaiveDate;
    use clap::Parser;

    fn parse_create(extra: &[&str]) -> CustomerArgs {
        let mut argv = vec![
            "minibank",
            "customer",
            "create",
            "--first-name",
            "Jan",
            "--last-name",
            "Kowalski",
            "--street",
            "Długa",
            "--house",
            "5",
            "--postal-code",
            "80-001",
            "--city",
            "Gdańsk",
            "--birth-city",
            "Gdynia",
            "--identification",
            "ABC123456",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Customer {
                action: CustomerAction::Create(args),
            } => args,
            _ => panic!("expected customer create"),
        }
    }

    #[test]
    fn test_birth_date_derived_from_pesel() {
        let form = CustomerForm::try_from(parse_create(&["--pesel", "85061512345"])).unwrap();
        assert_eq!(form.birth_date, NaiveDate::from_ymd_opt(1985, 6, 15).unwrap());

        let form = CustomerForm::try_from(parse_create(&["--pesel", "02270812345"])).unwrap();
        assert_eq!(form.birth_date, NaiveDate::from_ymd_opt(2002, 7, 8).unwrap());
    }

    #[test]
    fn test_explicit_birth_date_wins() {
        let args = parse_create(&["--pesel", "85061512345", "--birth-date", "1985-06-16"]);
        let form = CustomerForm::try_from(args).unwrap();
        assert_eq!(form.birth_date, NaiveDate::from_ymd_opt(1985, 6, 16).unwrap());
    }

    #[test]
    fn test_underivable_birth_date_is_an_error() {
        let args = parse_create(&["--pesel", "85133012345"]);
        assert!(CustomerForm::try_from(args).is_err());
    }
}
