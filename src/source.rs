//! Row sources: the in-memory source and the DuckDB-backed query cursor

use crate::cell::{Cell, Row};
use crate::error::{DiffstError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use duckdb::types::{TimeUnit, ValueRef};
use std::collections::VecDeque;

/// Yields rows on demand until the stream is exhausted
pub trait RowSource {
    /// Next row, or `None` at end of stream
    fn next_row(&mut self) -> Result<Option<Row>>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self) -> Result<Option<Row>> {
        (**self).next_row()
    }
}

/// Row source over rows already held in memory
#[derive(Debug, Clone, Default)]
pub struct VecRowSource {
    rows: VecDeque<Row>,
}

impl VecRowSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows: rows.into() }
    }

    /// Build from typed cells, converting each to its display string
    pub fn from_cells(rows: Vec<Vec<Cell>>) -> Self {
        Self::new(rows.into_iter().map(Row::from_cells).collect())
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for VecRowSource {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}

/// Streaming cursor over the result of a DuckDB query
pub struct DuckDbRowSource<'stmt> {
    rows: duckdb::Rows<'stmt>,
    column_count: usize,
    side: String,
}

impl<'stmt> DuckDbRowSource<'stmt> {
    pub fn new(rows: duckdb::Rows<'stmt>, column_count: usize, side: impl Into<String>) -> Self {
        Self {
            rows,
            column_count,
            side: side.into(),
        }
    }
}

impl RowSource for DuckDbRowSource<'_> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        let row = match self.rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(DiffstError::source_io(&self.side, e.to_string())),
        };

        let mut cells = Vec::with_capacity(self.column_count);
        for i in 0..self.column_count {
            let value = row
                .get_ref(i)
                .map_err(|e| DiffstError::source_io(&self.side, format!("column {}: {}", i, e)))?;
            cells.push(value_to_cell(value));
        }
        Ok(Some(Row::from_cells(cells)))
    }
}

/// Convert a DuckDB value into a cell
pub fn value_to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Boolean(b) => Cell::Boolean(b),
        ValueRef::TinyInt(i) => Cell::Integer(i.into()),
        ValueRef::SmallInt(i) => Cell::Integer(i.into()),
        ValueRef::Int(i) => Cell::Integer(i.into()),
        ValueRef::BigInt(i) => Cell::Integer(i),
        ValueRef::UTinyInt(i) => Cell::Integer(i.into()),
        ValueRef::USmallInt(i) => Cell::Integer(i.into()),
        ValueRef::UInt(i) => Cell::Integer(i.into()),
        ValueRef::UBigInt(i) => match i64::try_from(i) {
            Ok(v) => Cell::Integer(v),
            Err(_) => Cell::Text(i.to_string()),
        },
        ValueRef::HugeInt(i) => match i64::try_from(i) {
            Ok(v) => Cell::Integer(v),
            Err(_) => Cell::Text(i.to_string()),
        },
        ValueRef::Float(f) => Cell::Float(f.into()),
        ValueRef::Double(f) => Cell::Float(f),
        ValueRef::Decimal(d) => Cell::Text(d.to_string()),
        ValueRef::Text(s) => Cell::Text(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Cell::Bytes(b.to_vec()),
        ValueRef::Date32(days) => date_cell(days),
        ValueRef::Time64(unit, t) => time_cell(unit, t),
        ValueRef::Timestamp(unit, ts) => timestamp_cell(unit, ts),
        _ => {
            log::trace!("Unsupported column value, rendering as empty");
            Cell::Text(String::new())
        }
    }
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

// Days since 1970-01-01 -> days since 0001-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_cell(days: i32) -> Cell {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map(|d| Cell::Text(d.format("%Y-%m-%d").to_string()))
        .unwrap_or(Cell::Text(String::new()))
}

fn time_cell(unit: TimeUnit, value: i64) -> Cell {
    let micros = to_micros(unit, value);
    let secs = u32::try_from(micros.div_euclid(1_000_000)).ok();
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok();
    secs.zip(nanos)
        .and_then(|(s, n)| NaiveTime::from_num_seconds_from_midnight_opt(s, n))
        .map(|t| Cell::Text(t.format("%H:%M:%S%.f").to_string()))
        .unwrap_or(Cell::Text(String::new()))
}

fn timestamp_cell(unit: TimeUnit, value: i64) -> Cell {
    DateTime::<Utc>::from_timestamp_micros(to_micros(unit, value))
        .map(|ts| Cell::Text(ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string()))
        .unwrap_or(Cell::Text(String::new()))
}
