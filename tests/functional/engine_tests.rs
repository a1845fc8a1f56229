//! Functional tests for the batch loop and alignment

use crate::common::{config, numbered_rows, row, run_rows};
use diffst::{DiffOp, ScanMode};

#[test]
fn test_identical_sources_report_nothing() {
    let cfg = config(&["id", "name"], &[]);
    let rows = numbered_rows("r", 10);
    let report = run_rows(&cfg, rows.clone(), rows);

    assert!(!report.has_differences());
    assert_eq!(report.visible_count(), 0);
    assert_eq!(report.source_rows, 10);
    assert_eq!(report.target_rows, 10);
}

#[test]
fn test_appended_target_row_is_right_only() {
    let cfg = config(&["id", "name"], &[]);
    let left = numbered_rows("r", 5);
    let mut right = left.clone();
    right.push(row(&["extra", "99"]));

    let report = run_rows(&cfg, left, right);
    let visible: Vec<_> = report.differences[0].visible().cloned().collect();
    assert_eq!(
        visible,
        vec![DiffOp::RightOnly {
            row: row(&["extra", "99"])
        }]
    );
}

#[test]
fn test_changed_value_is_one_differing_pair() {
    let cfg = config(&["id", "amount"], &[]);
    let left = vec![row(&["1", "10"]), row(&["2", "20"]), row(&["3", "30"])];
    let right = vec![row(&["1", "10"]), row(&["2", "25"]), row(&["3", "30"])];

    let report = run_rows(&cfg, left, right);
    let visible: Vec<_> = report.differences[0].visible().cloned().collect();
    assert_eq!(
        visible,
        vec![DiffOp::Differing {
            left: row(&["2", "20"]),
            right: row(&["2", "25"])
        }]
    );
}

#[test]
fn test_fuzzy_drift_is_not_a_difference() {
    let cfg = config(&["id", "amount"], &["amount"]);
    let left = vec![row(&["1", "10.2"]), row(&["2", "5"])];
    let right = vec![row(&["1", "10.9"]), row(&["2", "5.99"])];

    let report = run_rows(&cfg, left, right);
    assert!(!report.has_differences());
}

#[test]
fn test_fuzzy_threshold_of_exactly_one_is_a_difference() {
    let cfg = config(&["id", "amount"], &["amount"]);
    let report = run_rows(&cfg, vec![row(&["1", "10.0"])], vec![row(&["1", "11.0"])]);

    assert!(report.has_differences());
    assert_eq!(report.visible_count(), 1);
}

#[test]
fn test_swapped_rows_keep_one_common_row() {
    let cfg = config(&["k"], &[]);
    let report = run_rows(&cfg, vec![row(&["A"]), row(&["B"])], vec![row(&["B"]), row(&["A"])]);

    let diff = &report.differences[0];
    assert_eq!(diff.kept_rows, 1);
    assert_eq!(
        diff.ops,
        vec![
            DiffOp::RightOnly { row: row(&["B"]) },
            DiffOp::LeftOnly { row: row(&["B"]) },
        ]
    );
}

#[test]
fn test_report_keeps_only_differences() {
    let cfg = config(&["id", "n"], &[]).with_scan_mode(ScanMode::ScanToEnd);
    let left = numbered_rows("r", 50);
    let mut right = left.clone();
    right[10] = row(&["r10", "changed"]);

    let report = run_rows(&cfg, left, right);
    let diff = &report.differences[0];
    assert_eq!(diff.ops.len(), 1);
    assert_eq!(diff.kept_rows, 49);
    assert!(diff.ops.iter().all(|op| !op.is_kept()));
}

#[test]
fn test_matching_rows_after_limit_do_not_truncate() {
    let cfg = config(&["id", "n"], &[]).with_output_limit(3);
    let mut left = numbered_rows("a", 3);
    let mut right = numbered_rows("b", 3);
    left.extend(numbered_rows("same", 5));
    right.extend(numbered_rows("same", 5));

    let report = run_rows(&cfg, left, right);
    let diff = &report.differences[0];
    assert_eq!(diff.visible().count(), 3);
    assert!(!diff.truncated);
}

#[test]
fn test_output_limit_caps_rendered_lines() {
    let cfg = config(&["id", "n"], &[]);
    let report = run_rows(&cfg, numbered_rows("left", 50), numbered_rows("right", 50));

    let batch = &report.differences[0];
    assert_eq!(batch.visible().count(), 30);
    assert!(batch.truncated);
}

#[test]
fn test_custom_output_limit() {
    let cfg = config(&["id", "n"], &[]).with_output_limit(5);
    let report = run_rows(&cfg, numbered_rows("left", 8), numbered_rows("right", 8));
    assert_eq!(report.visible_count(), 5);
}

fn with_changes(rows: &[diffst::Row], at: &[usize]) -> Vec<diffst::Row> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            if at.contains(&i) {
                row(&["changed", &i.to_string()])
            } else {
                r.clone()
            }
        })
        .collect()
}

#[test]
fn test_stop_at_first_differing_batch() {
    let cfg = config(&["id", "n"], &[]).with_batch_size(4);
    let left = numbered_rows("r", 12);
    let right = with_changes(&left, &[1, 9]);

    let report = run_rows(&cfg, left, right);
    assert_eq!(report.differences.len(), 1);
    assert_eq!(report.differences[0].batch_index, 0);
    assert_eq!(report.batches, 1);
}

#[test]
fn test_scan_to_end_reports_every_differing_batch() {
    let cfg = config(&["id", "n"], &[])
        .with_batch_size(4)
        .with_scan_mode(ScanMode::ScanToEnd);
    let left = numbered_rows("r", 12);
    let right = with_changes(&left, &[1, 9]);

    let report = run_rows(&cfg, left, right);
    let indexes: Vec<_> = report.differences.iter().map(|d| d.batch_index).collect();
    assert_eq!(indexes, vec![0, 2]);
    assert_eq!(report.differences[1].source_offset, 8);
    assert_eq!(report.differences[1].target_offset, 8);
    // 12 rows in batches of 4 leave a fourth, empty batch pair
    assert_eq!(report.batches, 4);
}

#[test]
fn test_clean_full_batches_continue_to_later_difference() {
    let cfg = config(&["id", "n"], &[]).with_batch_size(4);
    let left = numbered_rows("r", 10);
    let right = with_changes(&left, &[9]);

    let report = run_rows(&cfg, left, right);
    assert_eq!(report.differences.len(), 1);
    assert_eq!(report.differences[0].batch_index, 2);
    assert_eq!(report.differences[0].source_rows, 2);
}

#[test]
fn test_parse_degradations_are_counted() {
    let cfg = config(&["id", "amount"], &["amount"]);
    let left = vec![row(&["1", "n/a"]), row(&["2", "3.5"])];
    let right = vec![row(&["1", "n/a"]), row(&["2", "3.1"])];

    let report = run_rows(&cfg, left, right);
    assert!(!report.has_differences());
    assert_eq!(report.parse_degradations, 1);
}
