//! # diffst
//!
//! Compares the rows produced by two SQL queries, a source and a target, and
//! reports where they differ. Rows are fetched in bounded batches, aligned
//! with a longest-common-subsequence pass, and shown side by side. Columns
//! marked fuzzy tolerate numeric drift below 1.0.

pub mod align;
pub mod batch;
pub mod cell;
pub mod cli;
pub mod commands;
pub mod compare;
pub mod engine;
pub mod error;
pub mod lcs;
pub mod output;
pub mod progress;
pub mod source;
pub mod sql;
pub mod testcase;

pub use align::DiffOp;
pub use cell::{Cell, ColumnSpec, Row};
pub use engine::{DiffEngine, RunConfig, RunReport, ScanMode};
pub use error::{DiffstError, Result};
pub use source::{RowSource, VecRowSource};

/// Default number of rows fetched per side per batch
pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// Default maximum number of differences shown per batch
pub const DEFAULT_OUTPUT_LIMIT: usize = 30;
