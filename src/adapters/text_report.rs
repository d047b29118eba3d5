//! Plain-text summary report implementing ReportPort.
//!
//! One block per strategy, one field per line, blocks separated by a blank line.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::error::RetrospectError;
use crate::domain::strategy::{StrategyRun, StrategySummary};
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_currency(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn format_percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub fn render_summary(summary: &StrategySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Method: {}", summary.method);
    let _ = writeln!(out, "Instrument: {}", summary.instrument);
    let _ = writeln!(out, "Start date: {}", summary.start);
    let _ = writeln!(out, "End date: {}", summary.end);
    let _ = writeln!(
        out,
        "Starting balance: {}",
        format_currency(summary.starting_balance)
    );
    let _ = writeln!(out, "Final balance: {}", format_currency(summary.final_balance));
    let _ = writeln!(out, "Profit: {}", format_currency(summary.profit));
    let _ = writeln!(
        out,
        "Profit percentage: {}",
        format_percentage(summary.profit_percentage)
    );
    out
}

pub fn render_report(runs: &[StrategyRun]) -> String {
    runs.iter()
        .map(|run| render_summary(&run.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ReportPort for TextReportAdapter {
    fn write(&self, runs: &[StrategyRun], output_path: &Path) -> Result<(), RetrospectError> {
        fs::write(output_path, render_report(runs))?;
        Ok(())
    }
}
