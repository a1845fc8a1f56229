//! Turning an LCS into display-oriented diff operations

use crate::cell::Row;
use crate::compare::RowEquality;
use serde::{Deserialize, Serialize};

/// One unit of comparison result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DiffOp {
    /// Present on both sides, matched through the LCS
    Kept { row: Row },
    /// Only in the source batch
    LeftOnly { row: Row },
    /// Only in the target batch
    RightOnly { row: Row },
    /// Both sides diverged from the LCS at the same step
    Differing { left: Row, right: Row },
}

impl DiffOp {
    pub fn is_kept(&self) -> bool {
        matches!(self, DiffOp::Kept { .. })
    }

    pub fn left(&self) -> Option<&Row> {
        match self {
            DiffOp::Kept { row } | DiffOp::LeftOnly { row } => Some(row),
            DiffOp::Differing { left, .. } => Some(left),
            DiffOp::RightOnly { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&Row> {
        match self {
            DiffOp::Kept { row } | DiffOp::RightOnly { row } => Some(row),
            DiffOp::Differing { right, .. } => Some(right),
            DiffOp::LeftOnly { .. } => None,
        }
    }
}

/// Result of aligning one batch pair
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    pub ops: Vec<DiffOp>,
    /// A difference beyond the output limit was left out
    pub truncated: bool,
}

impl Alignment {
    /// Diff operations that are shown to the user
    pub fn visible(&self) -> impl Iterator<Item = &DiffOp> {
        self.ops.iter().filter(|op| !op.is_kept())
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }
}

/// Merge two batches and their LCS into diff operations.
///
/// Rows matching the current LCS anchor on both sides are kept. Otherwise each
/// side that diverges from the anchor contributes its current row, and when
/// both diverge in the same step the two rows form one `Differing` pair.
/// At most `output_limit` non-kept operations are produced. Past the limit the
/// merge keeps walking matching rows without output, and the alignment is
/// marked truncated only once another difference turns up.
pub fn align<E: RowEquality + ?Sized>(
    left: &[Row],
    right: &[Row],
    lcs: &[&Row],
    eq: &E,
    output_limit: usize,
) -> Alignment {
    let (mut sr, mut tr, mut lcs_idx) = (0usize, 0usize, 0usize);
    let mut ops = Vec::new();
    let mut shown = 0usize;
    let mut truncated = false;

    while sr < left.len() || tr < right.len() || lcs_idx < lcs.len() {
        let capped = shown >= output_limit;
        let anchor = lcs.get(lcs_idx).copied();
        let src_eq = match (left.get(sr), anchor) {
            (Some(row), Some(anchor)) => eq.rows_equal(row, anchor),
            _ => false,
        };
        let tgt_eq = match (right.get(tr), anchor) {
            (Some(row), Some(anchor)) => eq.rows_equal(row, anchor),
            _ => false,
        };
        log::trace!("align sr={} tr={} lcs={} src_eq={} tgt_eq={}", sr, tr, lcs_idx, src_eq, tgt_eq);

        if src_eq && tgt_eq {
            if !capped {
                ops.push(DiffOp::Kept {
                    row: left[sr].clone(),
                });
            }
            sr += 1;
            tr += 1;
            lcs_idx += 1;
            continue;
        }

        let take_left = !src_eq && sr < left.len();
        let take_right = !tgt_eq && tr < right.len();
        if !take_left && !take_right {
            // The anchor cannot be matched on either side any more
            log::debug!("Dropping unmatched LCS anchor at position {}", lcs_idx);
            lcs_idx += 1;
            continue;
        }
        if capped {
            truncated = true;
            break;
        }

        let op = match (take_left, take_right) {
            (true, true) => DiffOp::Differing {
                left: left[sr].clone(),
                right: right[tr].clone(),
            },
            (true, false) => DiffOp::LeftOnly {
                row: left[sr].clone(),
            },
            _ => DiffOp::RightOnly {
                row: right[tr].clone(),
            },
        };
        sr += usize::from(take_left);
        tr += usize::from(take_right);
        ops.push(op);
        shown += 1;
    }

    Alignment { ops, truncated }
}
