//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use diffst::cli::{Cli, Commands};

#[test]
fn test_cli_run_command_defaults() {
    let cli = Cli::try_parse_from(["diffst", "run", "-t", "0123"]).unwrap();
    match cli.command {
        Commands::Run {
            test_case,
            columns,
            json,
            scan_to_end,
            batch_size,
            output_limit,
        } => {
            assert_eq!(test_case, "0123");
            assert!(!columns);
            assert!(!json);
            assert!(!scan_to_end);
            assert!(batch_size.is_none());
            assert!(output_limit.is_none());
        }
        _ => panic!("Expected Run command"),
    }
    assert!(!cli.verbose);
}

#[test]
fn test_cli_run_command_with_options() {
    let cli = Cli::try_parse_from([
        "diffst",
        "-v",
        "--tc-dir",
        "/tmp/cases",
        "run",
        "--test-case",
        "7",
        "-c",
        "--scan-to-end",
        "--batch-size",
        "500",
        "--output-limit",
        "10",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.tc_dir.as_deref(), Some(std::path::Path::new("/tmp/cases")));
    match cli.command {
        Commands::Run {
            test_case,
            columns,
            scan_to_end,
            batch_size,
            output_limit,
            ..
        } => {
            assert_eq!(test_case, "7");
            assert!(columns);
            assert!(scan_to_end);
            assert_eq!(batch_size, Some(500));
            assert_eq!(output_limit, Some(10));
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn test_cli_run_requires_test_case() {
    assert!(Cli::try_parse_from(["diffst", "run"]).is_err());
}

#[test]
fn test_cli_rejects_zero_batch_size() {
    let result = Cli::try_parse_from(["diffst", "run", "-t", "1", "--batch-size", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_json_conflicts_with_columns() {
    let result = Cli::try_parse_from(["diffst", "run", "-t", "1", "--json", "-c"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_show_and_list() {
    let cli = Cli::try_parse_from(["diffst", "show", "0001", "--format", "json"]).unwrap();
    match cli.command {
        Commands::Show { test_case, format } => {
            assert_eq!(test_case, "0001");
            assert_eq!(format, "json");
        }
        _ => panic!("Expected Show command"),
    }

    let cli = Cli::try_parse_from(["diffst", "list"]).unwrap();
    match cli.command {
        Commands::List { format } => assert_eq!(format, "pretty"),
        _ => panic!("Expected List command"),
    }
}
