//! Output formatting.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rboard::{format_timestamp, Pagination};
use rust_i18n::t;
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table format
    Table,
    /// JSON format
    Json,
    /// Plain text format
    #[default]
    Plain,
}

impl OutputFormat {
    /// Whether decorations (headers, pagers, hints) should be printed.
    pub fn is_plain(self) -> bool {
        matches!(self, OutputFormat::Plain)
    }
}

/// Trait for plain text output.
pub trait PlainPrint {
    /// Print as plain text with formatting.
    fn plain_print(&self);
}

/// Trait for table row generation.
pub trait TableRow {
    /// Get table headers.
    fn headers() -> Vec<&'static str>;
    /// Get row data as strings.
    fn row(&self) -> Vec<String>;
}

/// Print items in plain text format.
pub fn print_plain<T: PlainPrint>(items: &[T]) {
    if items.is_empty() {
        println!("{}", t!("no_results"));
        return;
    }
    for item in items {
        item.plain_print();
    }
}

/// Format a board timestamp for display.
pub fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => format_timestamp(&at),
        None => "-".to_string(),
    }
}

/// Render the page-group pager, e.g. `<prev] 6 [7] 8 9 10 [next>`.
pub fn format_pager(pagination: &Pagination) -> String {
    let mut parts = Vec::new();
    if pagination.has_previous_group() {
        parts.push("<prev]".to_string());
    }
    for page in pagination.group_pages() {
        if page == pagination.page {
            parts.push(format!("[{}]", page));
        } else {
            parts.push(page.to_string());
        }
    }
    if pagination.has_next_group() {
        parts.push("[next>".to_string());
    }
    parts.join(" ")
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print a table of items with proper formatting for each output mode.
pub fn print_table<T: TableRow + Serialize + PlainPrint>(items: Vec<T>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&items),
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", t!("no_results"));
                return;
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(T::headers());
            for item in &items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        OutputFormat::Plain => {
            print_plain(&items);
        }
    }
}

/// Print body text indented, skipping blank lines.
pub fn print_indented(text: &str, indent: usize) {
    for line in text.lines() {
        if !line.trim().is_empty() {
            println!("{:indent$}{}", "", line, indent = indent);
        }
    }
}

/// Print a success line.
pub fn print_success(message: impl std::fmt::Display) {
    println!("{}", message.to_string().green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_pager() {
        assert_eq!(format_pager(&Pagination::new(3, 45)), "1 2 [3] 4 5");
        assert_eq!(
            format_pager(&Pagination::new(7, 230)),
            "<prev] 6 [7] 8 9 10 [next>"
        );
        assert_eq!(format_pager(&Pagination::new(1, 60)), "[1] 2 3 4 5 [next>");
        assert_eq!(format_pager(&Pagination::new(6, 60)), "<prev] [6]");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "-");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 30, 0).unwrap();
        assert_eq!(format_time(Some(at)), "2024. 05. 01. 09:30:00");
    }
}
