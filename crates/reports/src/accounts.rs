//! Account summary report - every account of one customer

use chrono::{DateTime, Utc};
use minibank_core::{Account, Customer};
use rust_decimal::Decimal;

use crate::exporters::ReportData;

/// Accounts of a customer with their balances
#[derive(Debug, Clone)]
pub struct AccountSummaryReport {
    pub title: String,
    pub customer: String,
    pub accounts: Vec<Account>,
    pub generated_at: DateTime<Utc>,
}

impl AccountSummaryReport {
    pub fn new(customer: &Customer, accounts: Vec<Account>) -> Self {
        Self {
            title: format!("Accounts of {}", customer.full_name()),
            customer: customer.to_string(),
            accounts,
            generated_at: Utc::now(),
        }
    }

    pub fn total_balance(&self) -> Decimal {
        self.accounts.iter().map(|a| a.balance).sum()
    }
}

impl ReportData for AccountSummaryReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Customer".to_string(), self.customer.clone()),
            ("Accounts".to_string(), self.accounts.len().to_string()),
            ("Total balance".to_string(), self.total_balance().to_string()),
            ("Generated at".to_string(), self.generated_at.to_rfc3339()),
        ]
    }

    fn headers(&self) -> Vec<String> {
        ["Id", "IBAN", "Type", "Balance", "Debit", "Free balance", "Percent"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.accounts
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.iban_or_empty().to_string(),
                    a.account_type.clone(),
                    a.balance.to_string(),
                    a.debit.to_string(),
                    a.free_balance.to_string(),
                    a.percent.to_string(),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporters::{MarkdownExporter, ReportExporter};
    use chrono::NaiveDate;
    use minibank_core::CustomerForm;
    use rust_decimal_macros::dec;

    fn customer() -> Customer {
        Customer {
            id: 42,
            details: CustomerForm {
                first_name: "Jan".to_string(),
                last_name: "Kowalski".to_string(),
                street: "Długa".to_string(),
                house: "1".to_string(),
                apartment: None,
                postal_code: "00-001".to_string(),
                city: "Warszawa".to_string(),
                pesel: "90010112345".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                birth_city: "Warszawa".to_string(),
                identification: "ABC123456".to_string(),
            },
            created_at: Utc::now(),
            created_employee: "teller".to_string(),
        }
    }

    fn account(id: i64, balance: Decimal, iban: Option<&str>) -> Account {
        Account {
            id,
            customer_id: 42,
            account_type: "A-00".to_string(),
            iban: iban.map(str::to_string),
            balance,
            debit: dec!(100),
            free_balance: balance + dec!(100),
            percent: dec!(1.50),
            version: 0,
            created_at: Utc::now(),
            created_employee: "teller".to_string(),
        }
    }

    #[test]
    fn test_account_summary() {
        let report = AccountSummaryReport::new(
            &customer(),
            vec![
                account(2, dec!(-40.00), None),
                account(1, dec!(250.50), Some("PL12345678000001100000000042")),
            ],
        );

        assert_eq!(report.title(), "Accounts of Jan Kowalski");
        assert_eq!(report.total_balance(), dec!(210.50));
        assert_eq!(report.rows()[0][1], "");
        assert_eq!(report.rows()[1][5], "350.50");

        let output = MarkdownExporter::new().export(&report);
        assert!(output.contains("| Id | IBAN | Type | Balance | Debit | Free balance | Percent |"));
        assert!(output.contains("- **Accounts**: 2"));
    }
}
