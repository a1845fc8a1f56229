//! Longest common subsequence of two row batches

use crate::cell::Row;
use crate::compare::RowEquality;

/// Dynamic-programming length table, stored row-major in one allocation
#[derive(Debug)]
pub struct LcsTable {
    rows: usize,
    cols: usize,
    lengths: Vec<u32>,
}

impl LcsTable {
    /// Fill the `(left.len()+1) x (right.len()+1)` table of prefix LCS lengths
    pub fn build<E: RowEquality + ?Sized>(left: &[Row], right: &[Row], eq: &E) -> Self {
        let rows = left.len() + 1;
        let cols = right.len() + 1;
        let mut lengths = vec![0u32; rows * cols];

        for (i, l) in left.iter().enumerate() {
            for (j, r) in right.iter().enumerate() {
                let value = if eq.rows_equal(l, r) {
                    lengths[i * cols + j] + 1
                } else {
                    lengths[(i + 1) * cols + j].max(lengths[i * cols + j + 1])
                };
                lengths[(i + 1) * cols + j + 1] = value;
            }
        }

        Self { rows, cols, lengths }
    }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.lengths[i * self.cols + j]
    }

    /// Length of the full LCS
    pub fn length(&self) -> usize {
        self.get(self.rows - 1, self.cols - 1) as usize
    }

    /// Walk back from the bottom-right corner and collect the matched left
    /// rows in their original order. Steps that can be attributed to the
    /// left side are taken before steps attributed to the right side.
    pub fn reconstruct<'a>(&self, left: &'a [Row]) -> Vec<&'a Row> {
        let mut lcs = Vec::with_capacity(self.length());
        let (mut x, mut y) = (self.rows - 1, self.cols - 1);
        while x != 0 && y != 0 {
            let here = self.get(x, y);
            if here == self.get(x - 1, y) {
                x -= 1;
            } else if here == self.get(x, y - 1) {
                y -= 1;
            } else {
                lcs.push(&left[x - 1]);
                x -= 1;
                y -= 1;
            }
        }
        lcs.reverse();
        lcs
    }
}

/// Longest common subsequence of `left` and `right` under `eq`
pub fn lcs<'a, E: RowEquality + ?Sized>(left: &'a [Row], right: &[Row], eq: &E) -> Vec<&'a Row> {
    let table = LcsTable::build(left, right, eq);
    let result = table.reconstruct(left);
    log::trace!(
        "LCS of {} x {} rows has length {}",
        left.len(),
        right.len(),
        result.len()
    );
    result
}
