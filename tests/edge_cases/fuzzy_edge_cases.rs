//! Edge cases for numeric tolerance on fuzzy columns

use crate::common::{config, row, run_rows};
use diffst::compare::FuzzyComparator;
use diffst::{Cell, DiffOp, Row};

fn fuzzy_pair(a: &str, b: &str) -> (bool, u64) {
    let cmp = FuzzyComparator::new(vec![true]);
    let equal = cmp.equal(&row(&[a]), &row(&[b]));
    (equal, cmp.parse_degradations())
}

#[test]
fn test_tolerance_is_strict() {
    assert_eq!(fuzzy_pair("1.0", "1.999"), (true, 0));
    assert_eq!(fuzzy_pair("1.0", "2.0"), (false, 0));
    assert_eq!(fuzzy_pair("-0.5", "0.4"), (true, 0));
    assert_eq!(fuzzy_pair("100", "99.01"), (true, 0));
}

#[test]
fn test_non_numeric_values_fall_back_to_text() {
    assert_eq!(fuzzy_pair("n/a", "n/a"), (true, 1));
    assert_eq!(fuzzy_pair("n/a", "n/b"), (false, 1));
    assert_eq!(fuzzy_pair("", ""), (true, 1));
    assert_eq!(fuzzy_pair("1", "n/a"), (false, 1));
}

#[test]
fn test_whitespace_is_not_trimmed() {
    assert_eq!(fuzzy_pair(" 1", "1"), (false, 1));
}

#[test]
fn test_non_finite_values_are_stable() {
    assert_eq!(fuzzy_pair("NaN", "NaN"), (true, 0));
    assert_eq!(fuzzy_pair("+Inf", "+Inf"), (true, 0));
    assert_eq!(fuzzy_pair("-Inf", "+Inf"), (false, 0));
}

#[test]
fn test_identical_non_finite_rows_stay_clean() {
    let cfg = config(&["id", "amount"], &["amount"]);
    let rows = vec![
        Row::from_cells(vec![Cell::from(1i64), Cell::from(f64::NAN)]),
        Row::from_cells(vec![Cell::from(2i64), Cell::from(f64::INFINITY)]),
        Row::from_cells(vec![Cell::from(3i64), Cell::from(f64::NEG_INFINITY)]),
    ];
    assert_eq!(rows[0].get(1), Some("NaN"));
    assert_eq!(rows[1].get(1), Some("+Inf"));

    let report = run_rows(&cfg, rows.clone(), rows);
    assert!(!report.has_differences());
    assert_eq!(report.parse_degradations, 0);
}

#[test]
fn test_exact_columns_ignore_numeric_equivalence() {
    let cmp = FuzzyComparator::new(vec![false, true]);
    assert!(!cmp.equal(&row(&["1.0", "5"]), &row(&["1", "5"])));
    assert!(cmp.equal(&row(&["1", "5"]), &row(&["1", "5.5"])));
}

#[test]
fn test_run_counts_parse_degradations() {
    let cfg = config(&["id", "amount"], &["amount"]);
    let left = vec![row(&["1", "n/a"]), row(&["2", "7.5"])];
    let right = vec![row(&["1", "n/a"]), row(&["2", "8.1"])];

    let report = run_rows(&cfg, left, right);
    assert!(!report.has_differences());
    assert_eq!(report.parse_degradations, 1);
}

#[test]
fn test_fuzzy_difference_beyond_tolerance_is_reported() {
    let cfg = config(&["id", "amount"], &["amount"]);
    let left = vec![row(&["1", "10.0"]), row(&["2", "20.0"])];
    let right = vec![row(&["1", "10.5"]), row(&["2", "21.0"])];

    let report = run_rows(&cfg, left, right);
    let visible: Vec<_> = report.differences[0].visible().cloned().collect();
    assert_eq!(
        visible,
        vec![DiffOp::Differing {
            left: row(&["2", "20.0"]),
            right: row(&["2", "21.0"])
        }]
    );
}

#[test]
fn test_unknown_fuzzy_name_is_ignored() {
    let cfg = config(&["id", "amount"], &["price"]);
    assert_eq!(cfg.fuzzy_flags(), vec![false, false]);

    let report = run_rows(&cfg, vec![row(&["1", "10.0"])], vec![row(&["1", "10.5"])]);
    assert!(report.has_differences());
}
