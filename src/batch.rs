//! Bounded batch fetching from a row source

use crate::cell::Row;
use crate::error::Result;
use crate::source::RowSource;
use std::ops::Index;

/// Up to `capacity` rows pulled from one source in one call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowBatch {
    rows: Vec<Row>,
}

impl RowBatch {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows actually filled
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl Index<usize> for RowBatch {
    type Output = Row;

    fn index(&self, index: usize) -> &Row {
        &self.rows[index]
    }
}

impl From<Vec<Row>> for RowBatch {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// Pulls fixed-size batches from a row source
#[derive(Debug, Clone, Copy)]
pub struct BatchFetcher {
    batch_size: usize,
}

impl BatchFetcher {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Pull up to `batch_size` rows. A batch shorter than `batch_size`
    /// means the source is exhausted.
    pub fn pull<S: RowSource + ?Sized>(&self, source: &mut S) -> Result<RowBatch> {
        let mut rows = Vec::with_capacity(self.batch_size);
        while rows.len() < self.batch_size {
            match source.next_row()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(RowBatch::new(rows))
    }

    /// Whether a batch of this length was the last one from its source
    pub fn is_final(&self, batch: &RowBatch) -> bool {
        batch.len() < self.batch_size
    }
}
