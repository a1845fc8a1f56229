//! Output formatting for diff results

use crate::align::DiffOp;
use crate::cell::Row;
use crate::engine::{RunConfig, RunReport};
use crate::error::Result;
use std::io::Write;

/// Width of each side in the paired layout
pub const PAIRED_WIDTH: usize = 80;
/// Width of the column-name cell in the stacked layout, marker included
pub const STACKED_NAME_WIDTH: usize = 30;
/// Width of each value cell in the stacked layout
pub const STACKED_VALUE_WIDTH: usize = 30;

const CELL_SEPARATOR: char = '|';

/// How differing rows are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// One line per difference, source and target side by side
    #[default]
    Paired,
    /// One block per difference, one line per column
    Stacked,
}

/// Marker printed between the two sides of a paired line
pub fn marker(op: &DiffOp) -> char {
    match op {
        DiffOp::LeftOnly { .. } => '<',
        DiffOp::RightOnly { .. } => '>',
        DiffOp::Differing { .. } | DiffOp::Kept { .. } => '|',
    }
}

/// Join a row's values with `|`, trimming separators from both ends
fn joined(row: Option<&Row>) -> String {
    match row {
        Some(row) => {
            let mut line = String::new();
            for value in row.values() {
                line.push_str(value);
                line.push(CELL_SEPARATOR);
            }
            line.trim_matches(|c| c == CELL_SEPARATOR || c == '\\').to_string()
        }
        None => String::new(),
    }
}

/// Format one diff operation as a paired line
pub fn paired_line(op: &DiffOp) -> String {
    format!(
        "{:<width$.width$} {} {:<width$.width$}",
        joined(op.left()),
        marker(op),
        joined(op.right()),
        width = PAIRED_WIDTH
    )
}

/// Horizontal rule framing stacked blocks
pub fn stacked_rule() -> String {
    format!(
        "{}+{}+{}+",
        "-".repeat(STACKED_NAME_WIDTH),
        "-".repeat(STACKED_VALUE_WIDTH),
        "-".repeat(STACKED_VALUE_WIDTH)
    )
}

/// Format one diff operation as a stacked block, one line per column,
/// followed by a rule
pub fn stacked_block(op: &DiffOp, column_names: &[&str]) -> Vec<String> {
    let width = column_names.len();
    let left = op.left().cloned().unwrap_or_else(|| Row::empty(width));
    let right = op.right().cloned().unwrap_or_else(|| Row::empty(width));

    let mut lines = Vec::with_capacity(width + 1);
    for (j, name) in column_names.iter().enumerate() {
        let l = left.get(j).unwrap_or("");
        let r = right.get(j).unwrap_or("");
        let changed = if l != r { '*' } else { ' ' };
        lines.push(format!(
            "{:<name_w$.name_w$}{}|{:<value_w$}|{:<value_w$}|",
            name,
            changed,
            l,
            r,
            name_w = STACKED_NAME_WIDTH - 1,
            value_w = STACKED_VALUE_WIDTH
        ));
    }
    lines.push(stacked_rule());
    lines
}

/// Text renderer for run reports
pub struct DiffRenderer<'a> {
    mode: DisplayMode,
    column_names: Vec<&'a str>,
}

impl<'a> DiffRenderer<'a> {
    pub fn new(mode: DisplayMode, config: &'a RunConfig) -> Self {
        Self {
            mode,
            column_names: config.column_names(),
        }
    }

    /// Write every visible difference in the report
    pub fn render<W: Write>(&self, out: &mut W, report: &RunReport) -> Result<()> {
        for batch in &report.differences {
            self.render_ops(out, batch.visible())?;
        }
        Ok(())
    }

    /// Write a sequence of diff operations, skipping kept rows
    pub fn render_ops<'o, W, I>(&self, out: &mut W, ops: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'o DiffOp>,
    {
        let mut ops = ops.into_iter().filter(|op| !op.is_kept()).peekable();
        match self.mode {
            DisplayMode::Paired => {
                for op in ops {
                    writeln!(out, "{}", paired_line(op))?;
                }
            }
            DisplayMode::Stacked => {
                if ops.peek().is_some() {
                    writeln!(out, "{}", stacked_rule())?;
                }
                for op in ops {
                    for line in stacked_block(op, &self.column_names) {
                        writeln!(out, "{}", line)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format a run report together with the column layout it was produced under
    pub fn format_report(config: &RunConfig, report: &RunReport) -> Result<String> {
        let json = serde_json::json!({
            "columns": config.columns,
            "batch_size": config.batch_size,
            "output_limit": config.output_limit,
            "scan_mode": config.scan_mode,
            "has_differences": report.has_differences(),
            "batches": report.batches,
            "source_rows": report.source_rows,
            "target_rows": report.target_rows,
            "parse_degradations": report.parse_degradations,
            "differences": report.differences,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
