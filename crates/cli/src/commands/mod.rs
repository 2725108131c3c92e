//! Subcommand handlers

pub mod account;
pub mod account_type;
pub mod customer;
pub mod export;
pub mod log;
pub mod operation;
pub mod parameter;

use minibank_core::Customer;
use minibank_persistence::Paged;

/// Print one page of customers as a table
pub(crate) fn print_customers(page: &Paged<Customer>) {
    if page.is_empty() {
        println!("No customers found.");
        return;
    }

    println!(
        "{:<6} {:<24} {:<12} {:<10} {:<20}",
        "ID", "Name", "PESEL", "ID doc", "City"
    );
    println!("{}", "-".repeat(76));
    for c in &page.items {
        println!(
            "{:<6} {:<24} {:<12} {:<10} {:<20}",
            c.id,
            c.full_name(),
            c.details.pesel,
            c.details.identification,
            c.details.city
        );
    }
    println!();
    println!(
        "Page {} of {} ({} customer(s))",
        page.page,
        page.total_pages(),
        page.total
    );
}
