//! Command-line interface for diffst

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "diffst")]
#[command(about = "Compare the rows of two SQL queries and show where they differ")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the df<ID>.yml test case files
    #[arg(long, global = true, env = "_DIFFST_TC_DIR")]
    pub tc_dir: Option<PathBuf>,

    /// Run verbosely, producing helpful output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a test case and print the differences
    Run {
        /// Test case to run, e.g. for df0123.yml use 0123
        #[arg(short = 't', long = "test-case")]
        test_case: String,

        /// Stack columns vertically in output
        #[arg(short = 'c', long)]
        columns: bool,

        /// Print the run report as JSON
        #[arg(long, conflicts_with = "columns")]
        json: bool,

        /// Keep comparing batches after the first one with differences
        #[arg(long)]
        scan_to_end: bool,

        /// Rows fetched per side per batch (overrides the test case)
        #[arg(long, value_parser = validate_positive)]
        batch_size: Option<usize>,

        /// Maximum differences shown per batch (overrides the test case)
        #[arg(long, value_parser = validate_positive)]
        output_limit: Option<usize>,
    },

    /// Show a parsed test case
    Show {
        /// Test case ID
        test_case: String,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// List test cases in the test case directory
    List {
        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// Validate that a size option is greater than 0
fn validate_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("Invalid value: '{}'. Must be a positive integer.", s))?;

    if value == 0 {
        return Err("Value must be greater than 0".to_string());
    }

    Ok(value)
}
