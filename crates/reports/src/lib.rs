//! # Minibank Reports
//!
//! Report generation - CSV, JSON and Markdown exports of the ledger.
//!
//! ## Exporters
//!
//! - [`CsvExporter`] - CSV format with proper escaping
//! - [`JsonExporter`] - JSON format (pretty or compact)
//! - [`MarkdownExporter`] - Markdown tables
//!
//! ## Reports
//!
//! - [`OperationHistoryReport`] - one account's operations, newest first
//! - [`AccountSummaryReport`] - every account of one customer
//!
//! ## Example
//!
//! ```rust,ignore
//! use minibank_reports::{ExportFormat, OperationHistoryReport};
//!
//! let report = OperationHistoryReport::new(&account, &operations);
//! let csv = ExportFormat::Csv.exporter().export(&report);
//! ```

pub mod accounts;
pub mod exporters;
pub mod history;

// Re-export main types
pub use accounts::AccountSummaryReport;
pub use exporters::{
    CsvExporter, ExportFormat, JsonExporter, MarkdownExporter, ReportData, ReportExporter,
};
pub use history::{HistoryRow, OperationHistoryReport, HISTORY_DATE_FORMAT};
