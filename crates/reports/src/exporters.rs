//! Report exporters - CSV, JSON, Markdown
//!
//! Exporters only see a report through [`ReportData`]: a title, a header
//! block (key/value pairs such as the account IBAN), column names and rows
//! of already formatted cells.

use std::fmt;

/// Trait for exporting reports to different formats
pub trait ReportExporter {
    /// Export to the target format
    fn export(&self, report: &dyn ReportData) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}

/// Trait for data that can be exported
pub trait ReportData {
    /// Get the report title
    fn title(&self) -> &str;

    /// Key/value pairs printed above the table
    fn summary(&self) -> Vec<(String, String)>;

    /// Get column headers
    fn headers(&self) -> Vec<String>;

    /// Get data rows, one cell per header
    fn rows(&self) -> Vec<Vec<String>>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "markdown" | "md" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    /// Exporter with default settings for this format
    pub fn exporter(&self) -> Box<dyn ReportExporter> {
        match self {
            ExportFormat::Csv => Box::new(CsvExporter::new()),
            ExportFormat::Json => Box::new(JsonExporter::new()),
            ExportFormat::Markdown => Box::new(MarkdownExporter::new()),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CSV Exporter
// ============================================================================

/// CSV format exporter (RFC 4180 quoting)
pub struct CsvExporter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Semicolon-separated output opens directly in spreadsheets using a
    /// decimal comma
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    fn write_line(&self, output: &mut String, fields: &[String]) {
        let line: Vec<String> = fields.iter().map(|f| self.quote(f)).collect();
        output.push_str(&line.join(&self.delimiter.to_string()));
        output.push('\n');
    }

    fn quote(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();
        if self.include_header {
            self.write_line(&mut output, &report.headers());
        }
        for row in report.rows() {
            self.write_line(&mut output, &row);
        }
        output
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

// ============================================================================
// JSON Exporter
// ============================================================================

/// JSON format exporter: `{ "title", "summary": {..}, "rows": [{header: cell}] }`
pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl ReportExporter for JsonExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        use serde_json::{Map, Value};

        let headers = report.headers();
        let rows: Vec<Value> = report
            .rows()
            .into_iter()
            .map(|row| {
                let object: Map<String, Value> = headers
                    .iter()
                    .cloned()
                    .zip(row.into_iter().map(Value::String))
                    .collect();
                Value::Object(object)
            })
            .collect();

        let summary: Map<String, Value> = report
            .summary()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        let output = serde_json::json!({
            "title": report.title(),
            "summary": summary,
            "rows": rows,
        });

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        };
        rendered.unwrap_or_default()
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

// ============================================================================
// Markdown Exporter
// ============================================================================

/// Markdown format exporter
pub struct MarkdownExporter {
    include_summary: bool,
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self {
            include_summary: true,
        }
    }
}

impl MarkdownExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }

    fn table_row(cells: &[String]) -> String {
        let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
        format!("| {} |\n", escaped.join(" | "))
    }
}

impl ReportExporter for MarkdownExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_summary {
            for (key, value) in report.summary() {
                output.push_str(&format!("- **{}**: {}\n", key, value));
            }
            output.push('\n');
        }

        let headers = report.headers();
        output.push_str(&Self::table_row(&headers));
        output.push_str(&Self::table_row(&vec!["---".to_string(); headers.len()]));
        for row in report.rows() {
            output.push_str(&Self::table_row(&row));
        }

        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    impl ReportData for Sample {
        fn title(&self) -> &str {
            "Sample"
        }

        fn summary(&self) -> Vec<(String, String)> {
            vec![("IBAN".to_string(), "PL123".to_string())]
        }

        fn headers(&self) -> Vec<String> {
            vec!["Id".to_string(), "Note".to_string()]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            vec![
                vec!["1".to_string(), "plain".to_string()],
                vec!["2".to_string(), "a, \"quoted\" | note".to_string()],
            ]
        }
    }

    #[test]
    fn test_csv_quoting() {
        let output = CsvExporter::new().export(&Sample);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Id,Note");
        assert_eq!(lines[1], "1,plain");
        assert_eq!(lines[2], "2,\"a, \"\"quoted\"\" | note\"");
    }

    #[test]
    fn test_csv_semicolon_without_header() {
        let output = CsvExporter::new()
            .with_delimiter(';')
            .without_header()
            .export(&Sample);
        assert!(output.starts_with("1;plain\n"));
    }

    #[test]
    fn test_json_rows_keyed_by_header() {
        let output = JsonExporter::new().compact().export(&Sample);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "Sample");
        assert_eq!(value["summary"]["IBAN"], "PL123");
        assert_eq!(value["rows"][0]["Note"], "plain");
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_markdown_table() {
        let output = MarkdownExporter::new().export(&Sample);
        assert!(output.starts_with("# Sample\n"));
        assert!(output.contains("- **IBAN**: PL123"));
        assert!(output.contains("| Id | Note |\n| --- | --- |\n"));
        assert!(output.contains("a, \"quoted\" \\| note"));

        let bare = MarkdownExporter::new().without_summary().export(&Sample);
        assert!(!bare.contains("IBAN"));
    }

    #[test]
    fn test_format_lookup() {
        assert_eq!(ExportFormat::from_str("MD"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::from_str("xlsx"), None);
        assert_eq!(ExportFormat::Csv.exporter().extension(), "csv");
    }
}
