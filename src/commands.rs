//! Command implementations for diffst CLI

use crate::cli::{Commands, OutputFormat};
use crate::engine::{DiffEngine, RunConfig, RunReport, ScanMode};
use crate::error::{DiffstError, Result};
use crate::output::{DiffRenderer, DisplayMode, JsonFormatter};
use crate::progress::ProgressReporter;
use crate::source::DuckDbRowSource;
use crate::sql::{resolve_database, SideConnection};
use crate::testcase::{TestCase, TestCaseDir};
use std::io::Write;
use std::path::Path;

/// Options for a single `run`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub display: DisplayMode,
    pub json: bool,
    pub scan_mode: ScanMode,
    pub batch_size: Option<usize>,
    pub output_limit: Option<usize>,
    pub show_progress: bool,
}

/// Execute a command
pub fn execute_command(command: Commands, tc_dir: Option<&Path>) -> Result<()> {
    match command {
        Commands::Run {
            test_case,
            columns,
            json,
            scan_to_end,
            batch_size,
            output_limit,
        } => {
            let options = RunOptions {
                display: if columns {
                    DisplayMode::Stacked
                } else {
                    DisplayMode::Paired
                },
                json,
                scan_mode: if scan_to_end {
                    ScanMode::ScanToEnd
                } else {
                    ScanMode::StopAtFirst
                },
                batch_size,
                output_limit,
                show_progress: !json,
            };
            run_command(tc_dir, &test_case, &options)
        }
        Commands::Show { test_case, format } => show_command(tc_dir, &test_case, &format),
        Commands::List { format } => list_command(tc_dir, &format),
    }
}

fn open_dir(tc_dir: Option<&Path>) -> Result<TestCaseDir> {
    let dir = tc_dir.ok_or_else(|| {
        DiffstError::config("_DIFFST_TC_DIR not found in environment and --tc-dir not given")
    })?;
    TestCaseDir::new(dir)
}

/// Run a test case and print its differences to stdout
fn run_command(tc_dir: Option<&Path>, id: &str, options: &RunOptions) -> Result<()> {
    let dir = open_dir(tc_dir)?;
    let case = dir.load(id)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_test_case(&case, options, &mut out)?;
    Ok(())
}

/// Connect both sides of a test case, compare them and write the result.
///
/// Output is only written once the whole comparison has succeeded.
pub fn run_test_case<W: Write>(
    case: &TestCase,
    options: &RunOptions,
    out: &mut W,
) -> Result<RunReport> {
    let mut progress = if options.show_progress {
        ProgressReporter::new_for_run()
    } else {
        ProgressReporter::new_minimal()
    };

    let source = SideConnection::open("Source", &case.source, &resolve_database(&case.source.db)?)?;
    let target = SideConnection::open("Target", &case.target, &resolve_database(&case.target.db)?)?;

    let source_columns = source.describe_columns()?;
    let target_columns = target.describe_columns()?;

    let config = RunConfig::new(&source_columns, &target_columns, &case.fuzzy)?
        .with_batch_size(options.batch_size.or(case.batch_size).unwrap_or(crate::DEFAULT_BATCH_SIZE))
        .with_output_limit(
            options
                .output_limit
                .or(case.output_limit)
                .unwrap_or(crate::DEFAULT_OUTPUT_LIMIT),
        )
        .with_scan_mode(options.scan_mode);
    log::debug!(
        "Comparing {} columns, fuzzy: {:?}",
        config.columns.len(),
        config.fuzzy_flags()
    );

    let mut source_stmt = source.prepare()?;
    let mut target_stmt = target.prepare()?;
    let mut source_rows = DuckDbRowSource::new(source_stmt.query([])?, source_columns.len(), "Source");
    let mut target_rows = DuckDbRowSource::new(target_stmt.query([])?, target_columns.len(), "Target");
    progress.finish_connect("Connected");

    let engine = DiffEngine::new(&config)?;
    let report = engine.run(&mut source_rows, &mut target_rows, &mut progress)?;
    drop(progress);

    write_report(&config, &report, options, out)?;
    Ok(report)
}

/// Write a finished report in the requested layout
pub fn write_report<W: Write>(
    config: &RunConfig,
    report: &RunReport,
    options: &RunOptions,
    out: &mut W,
) -> Result<()> {
    if options.json {
        writeln!(out, "{}", JsonFormatter::format_report(config, report)?)?;
    } else {
        DiffRenderer::new(options.display, config).render(out, report)?;
    }
    out.flush()?;
    Ok(())
}

/// Show a parsed test case
fn show_command(tc_dir: Option<&Path>, id: &str, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(DiffstError::invalid_input)?;
    let dir = open_dir(tc_dir)?;
    let case = dir.load(id)?;

    match format {
        OutputFormat::Json => println!("{}", JsonFormatter::format(&case)?),
        OutputFormat::Pretty => {
            println!("🧪 Test case: {}", id);
            println!("├─ File: {}", dir.path_for(id).display());
            println!("├─ Source DB: {}", case.source.db);
            println!("│  └─ SQL: {}", case.source.sql.trim());
            println!("├─ Target DB: {}", case.target.db);
            println!("│  └─ SQL: {}", case.target.sql.trim());
            if case.fuzzy.is_empty() {
                println!("└─ Fuzzy columns: none");
            } else {
                println!("└─ Fuzzy columns: {}", case.fuzzy.join(", "));
            }
        }
    }
    Ok(())
}

/// List the test cases in the directory
fn list_command(tc_dir: Option<&Path>, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(DiffstError::invalid_input)?;
    let dir = open_dir(tc_dir)?;
    let ids = dir.list()?;

    match format {
        OutputFormat::Json => println!("{}", JsonFormatter::format(&ids)?),
        OutputFormat::Pretty => {
            if ids.is_empty() {
                println!("No test cases found in {}.", dir.root.display());
                return Ok(());
            }
            println!("🧪 Available test cases:");
            for (i, id) in ids.iter().enumerate() {
                let prefix = if i == ids.len() - 1 { "└─" } else { "├─" };
                println!("{} {}", prefix, id);
            }
        }
    }
    Ok(())
}
