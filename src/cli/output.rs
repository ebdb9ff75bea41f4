//! Output formatting for one-shot commands.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// One labelled value in a summary table.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SummaryRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl SummaryRow {
    pub fn new(metric: &str, value: impl ToString) -> Self {
        Self {
            metric: metric.to_string(),
            value: value.to_string(),
        }
    }
}

/// Print a vec of Tabled + Serialize items in the chosen mode.
pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => {
            if items.is_empty() {
                println!("(no results)");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
    }
    Ok(())
}

/// Print `item` as JSON in JSON mode, or the summary rows as a table.
pub fn print_summary<T: Serialize>(
    item: &T,
    rows: &[SummaryRow],
    mode: OutputMode,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => print_items(rows, mode),
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(item)?);
            Ok(())
        }
    }
}

/// Format a ratio as a percentage with one decimal.
pub fn percent(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_selects_mode() {
        assert_eq!(OutputMode::from_json_flag(true), OutputMode::Json);
        assert_eq!(OutputMode::from_json_flag(false), OutputMode::Table);
    }

    #[test]
    fn summary_rows_render_as_table() {
        let rows = vec![SummaryRow::new("rows", 918), SummaryRow::new("accuracy", percent(0.875))];
        let table = Table::new(&rows).to_string();
        assert!(table.contains("Metric"));
        assert!(table.contains("918"));
        assert!(table.contains("87.5%"));
    }
}
