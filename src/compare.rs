//! Row equality with tolerance for numeric drift in fuzzy columns

use crate::cell::Row;
use std::cell::Cell;

/// Maximum absolute difference (exclusive) for two fuzzy values to match
pub const FUZZY_TOLERANCE: f64 = 1.0;

/// Predicate deciding whether two rows of the same width match
pub trait RowEquality {
    fn rows_equal(&self, left: &Row, right: &Row) -> bool;
}

impl<F> RowEquality for F
where
    F: Fn(&Row, &Row) -> bool,
{
    fn rows_equal(&self, left: &Row, right: &Row) -> bool {
        self(left, right)
    }
}

/// Column-wise comparator driven by a fixed fuzzy-flag vector.
///
/// Fuzzy columns are compared numerically when both values parse as `f64`.
/// When either value does not parse, the column falls back to exact string
/// equality and the fallback is counted as a parse degradation.
#[derive(Debug)]
pub struct FuzzyComparator {
    fuzzy: Vec<bool>,
    degradations: Cell<u64>,
}

impl FuzzyComparator {
    pub fn new(fuzzy: Vec<bool>) -> Self {
        Self {
            fuzzy,
            degradations: Cell::new(0),
        }
    }

    /// Comparator with no fuzzy columns
    pub fn exact(width: usize) -> Self {
        Self::new(vec![false; width])
    }

    pub fn fuzzy_flags(&self) -> &[bool] {
        &self.fuzzy
    }

    /// Number of fuzzy comparisons that fell back to string equality so far
    pub fn parse_degradations(&self) -> u64 {
        self.degradations.get()
    }

    /// Compare two rows, stopping at the first unequal column
    pub fn equal(&self, left: &Row, right: &Row) -> bool {
        if left.len() != right.len() {
            return false;
        }
        (0..left.len()).all(|i| {
            let (a, b) = (&left.values()[i], &right.values()[i]);
            if self.fuzzy.get(i).copied().unwrap_or(false) {
                self.fuzzy_equal(i, a, b)
            } else {
                a == b
            }
        })
    }

    fn fuzzy_equal(&self, column: usize, a: &str, b: &str) -> bool {
        match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => within_tolerance(x, y),
            _ => {
                self.degradations.set(self.degradations.get() + 1);
                log::trace!(
                    "Column {} not numeric ({:?} vs {:?}), comparing as text",
                    column,
                    a,
                    b
                );
                a == b
            }
        }
    }
}

/// Values only mismatch when their distance is known to reach the tolerance.
/// A NaN distance (NaN operands, or infinities of the same sign) is a match.
fn within_tolerance(x: f64, y: f64) -> bool {
    let distance = (x - y).abs();
    distance.is_nan() || distance < FUZZY_TOLERANCE
}

impl RowEquality for FuzzyComparator {
    fn rows_equal(&self, left: &Row, right: &Row) -> bool {
        self.equal(left, right)
    }
}
