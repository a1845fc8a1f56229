//! Batch loop driving fetch, quick compare, LCS and alignment

use crate::align::{align, Alignment, DiffOp};
use crate::batch::{BatchFetcher, RowBatch};
use crate::cell::ColumnSpec;
use crate::compare::FuzzyComparator;
use crate::error::{DiffstError, Result};
use crate::lcs::lcs;
use crate::progress::ProgressReporter;
use crate::source::RowSource;
use crate::{DEFAULT_BATCH_SIZE, DEFAULT_OUTPUT_LIMIT};
use serde::Serialize;

/// What to do after the first batch that contains a difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Report the first differing batch and stop
    #[default]
    StopAtFirst,
    /// Keep comparing batch pairs until both sides are exhausted
    ScanToEnd,
}

/// Immutable settings for one comparison run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub columns: Vec<ColumnSpec>,
    pub batch_size: usize,
    pub output_limit: usize,
    pub scan_mode: ScanMode,
}

impl RunConfig {
    /// Build the run configuration from both sides' column names.
    ///
    /// Fails when the sides return a different number of columns. Fuzzy flags
    /// are taken from the target column names.
    pub fn new(
        source_columns: &[String],
        target_columns: &[String],
        fuzzy_columns: &[String],
    ) -> Result<Self> {
        if source_columns.len() != target_columns.len() {
            return Err(DiffstError::column_count_mismatch(
                source_columns.len(),
                target_columns.len(),
            ));
        }

        for name in fuzzy_columns {
            if !target_columns.contains(name) {
                log::warn!("Fuzzy column '{}' does not match any target column", name);
            }
        }

        let columns = target_columns
            .iter()
            .map(|name| ColumnSpec::new(name.clone(), fuzzy_columns.contains(name)))
            .collect();

        Ok(Self {
            columns,
            batch_size: DEFAULT_BATCH_SIZE,
            output_limit: DEFAULT_OUTPUT_LIMIT,
            scan_mode: ScanMode::default(),
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_output_limit(mut self, output_limit: usize) -> Self {
        self.output_limit = output_limit;
        self
    }

    pub fn with_scan_mode(mut self, scan_mode: ScanMode) -> Self {
        self.scan_mode = scan_mode;
        self
    }

    pub fn fuzzy_flags(&self) -> Vec<bool> {
        self.columns.iter().map(|c| c.fuzzy).collect()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DiffstError::config("Batch size must be greater than 0"));
        }
        if self.output_limit == 0 {
            return Err(DiffstError::config("Output limit must be greater than 0"));
        }
        Ok(())
    }
}

/// Differences found in one batch pair
#[derive(Debug, Clone, Serialize)]
pub struct BatchDiff {
    /// Zero-based batch number
    pub batch_index: usize,
    /// Row offset of the batch within the source stream
    pub source_offset: u64,
    /// Row offset of the batch within the target stream
    pub target_offset: u64,
    pub source_rows: usize,
    pub target_rows: usize,
    /// More differences existed than the output limit allowed
    pub truncated: bool,
    /// Rows matched through the LCS before the output limit was reached
    pub kept_rows: usize,
    /// Differences only; kept rows are counted, not retained
    pub ops: Vec<DiffOp>,
}

impl BatchDiff {
    fn new(batch_index: usize, source_offset: u64, target_offset: u64) -> Self {
        Self {
            batch_index,
            source_offset,
            target_offset,
            source_rows: 0,
            target_rows: 0,
            truncated: false,
            kept_rows: 0,
            ops: Vec::new(),
        }
    }

    /// Take the differences out of an alignment, dropping kept rows
    fn record(mut self, alignment: Alignment) -> Self {
        let mut ops = alignment.ops;
        self.kept_rows = ops.iter().filter(|op| op.is_kept()).count();
        ops.retain(|op| !op.is_kept());
        self.ops = ops;
        self.truncated = alignment.truncated;
        self
    }

    /// Operations shown to the user
    pub fn visible(&self) -> impl Iterator<Item = &DiffOp> {
        self.ops.iter()
    }
}

/// Outcome of a full run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub batches: usize,
    pub source_rows: u64,
    pub target_rows: u64,
    pub parse_degradations: u64,
    pub differences: Vec<BatchDiff>,
}

impl RunReport {
    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.differences.iter().map(|d| d.visible().count()).sum()
    }
}

/// Loop phase after a quick compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuickCompare {
    /// Both batches match row for row
    Clean,
    /// Counts differ or some positional pair differs
    Diverged,
}

/// Compares two row sources batch by batch
pub struct DiffEngine<'a> {
    config: &'a RunConfig,
    comparator: FuzzyComparator,
    fetcher: BatchFetcher,
}

impl<'a> DiffEngine<'a> {
    pub fn new(config: &'a RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            comparator: FuzzyComparator::new(config.fuzzy_flags()),
            fetcher: BatchFetcher::new(config.batch_size),
        })
    }

    /// Run the batch loop to completion and return everything that was found.
    /// Any source error aborts the run and no report is produced.
    pub fn run<L, R>(
        &self,
        source: &mut L,
        target: &mut R,
        progress: &mut ProgressReporter,
    ) -> Result<RunReport>
    where
        L: RowSource + ?Sized,
        R: RowSource + ?Sized,
    {
        let mut report = RunReport::default();

        loop {
            let left = self.fetcher.pull(source)?;
            let right = self.fetcher.pull(target)?;
            let batch_index = report.batches;
            let (source_offset, target_offset) = (report.source_rows, report.target_rows);

            report.batches += 1;
            report.source_rows += left.len() as u64;
            report.target_rows += right.len() as u64;
            progress.update_rows(report.source_rows, report.target_rows);
            log::trace!("batch {}: source {} rows, target {} rows", batch_index, left.len(), right.len());

            let exhausted = self.fetcher.is_final(&left) && self.fetcher.is_final(&right);

            if self.quick_compare(&left, &right) == QuickCompare::Clean {
                if exhausted {
                    break;
                }
                continue;
            }

            let alignment = self.diff_batch(&left, &right);
            if alignment.truncated {
                log::info!(
                    "Batch {} has more differences than the output limit of {}",
                    batch_index,
                    self.config.output_limit
                );
            }
            let diff = BatchDiff {
                source_rows: left.len(),
                target_rows: right.len(),
                ..BatchDiff::new(batch_index, source_offset, target_offset)
            };
            report.differences.push(diff.record(alignment));

            if exhausted || self.config.scan_mode == ScanMode::StopAtFirst {
                break;
            }
        }

        report.parse_degradations = self.comparator.parse_degradations();
        if report.parse_degradations > 0 {
            log::warn!(
                "{} fuzzy comparisons fell back to exact text matching",
                report.parse_degradations
            );
        }
        progress.finish_rows(&format!(
            "Compared {} source and {} target rows",
            report.source_rows, report.target_rows
        ));
        log::info!(
            "Compared {} batch(es): {} source rows, {} target rows, {} differing batch(es)",
            report.batches,
            report.source_rows,
            report.target_rows,
            report.differences.len()
        );

        Ok(report)
    }

    fn quick_compare(&self, left: &RowBatch, right: &RowBatch) -> QuickCompare {
        if left.len() != right.len() {
            return QuickCompare::Diverged;
        }
        let clean = left
            .iter()
            .zip(right.iter())
            .all(|(l, r)| self.comparator.equal(l, r));
        if clean {
            QuickCompare::Clean
        } else {
            QuickCompare::Diverged
        }
    }

    /// LCS plus alignment for one batch pair
    pub fn diff_batch(&self, left: &RowBatch, right: &RowBatch) -> Alignment {
        let common = lcs(left.rows(), right.rows(), &self.comparator);
        align(
            left.rows(),
            right.rows(),
            &common,
            &self.comparator,
            self.config.output_limit,
        )
    }
}
