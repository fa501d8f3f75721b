use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use crate::error::MatchError;
use crate::sparse::{CscMatrix, CsrMatrix};

/// Per-thread accumulator for one query row.
/// Dense score slots plus a touched list, so resetting between rows costs
/// O(entries touched) instead of O(candidate rows).
struct Scratch {
    scores: Vec<f64>,
    hit: Vec<bool>,
    touched: Vec<u32>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        Self {
            scores: vec![0.0; n],
            hit: vec![false; n],
            touched: Vec::new(),
        }
    }
}

/// Sparse matrix product fused with per-row truncation.
///
/// For every row of `a`, accumulates dot products against the rows of `b`
/// (held column-major, so only candidates sharing at least one term are
/// touched), then keeps at most `top_n` entries with value strictly greater
/// than `threshold`. Peak memory is O(rows × top_n); the dense product is
/// never materialized.
///
/// Result rows are ordered by descending value; equal values go to the
/// lower candidate index, so the ranking is reproducible.
///
/// Rows are computed in parallel. Callers re-associate output by row index,
/// which `CsrMatrix` preserves regardless of scheduling.
pub fn topn_multiply(
    a: &CsrMatrix,
    b: &CscMatrix,
    top_n: usize,
    threshold: f64,
) -> Result<CsrMatrix, MatchError> {
    if a.n_cols != b.n_cols {
        return Err(MatchError::DimensionMismatch {
            left: a.n_cols,
            right: b.n_cols,
        });
    }
    debug!(
        rows = a.n_rows,
        candidates = b.n_rows,
        top_n,
        threshold,
        "computing top-n similarities"
    );
    let rows: Vec<Vec<(u32, f64)>> = (0..a.n_rows)
        .into_par_iter()
        .map_init(
            || Scratch::new(b.n_rows),
            |scratch, i| accumulate_row(a, b, i, top_n, threshold, scratch),
        )
        .collect();
    Ok(CsrMatrix::from_rows(b.n_rows, rows))
}

fn accumulate_row(
    a: &CsrMatrix,
    b: &CscMatrix,
    i: usize,
    top_n: usize,
    threshold: f64,
    scratch: &mut Scratch,
) -> Vec<(u32, f64)> {
    let (q_inds, q_vals) = a.row(i);
    for (&term, &qw) in q_inds.iter().zip(q_vals) {
        let (c_rows, c_vals) = b.col(term as usize);
        for (&j, &cw) in c_rows.iter().zip(c_vals) {
            let slot = j as usize;
            if !scratch.hit[slot] {
                scratch.hit[slot] = true;
                scratch.touched.push(j);
            }
            scratch.scores[slot] += qw * cw;
        }
    }

    // Strict comparison: threshold 0 still drops true zero products.
    let mut survivors: Vec<(u32, f64)> = scratch
        .touched
        .iter()
        .filter(|&&j| scratch.scores[j as usize] > threshold)
        .map(|&j| (j, scratch.scores[j as usize]))
        .collect();

    // Reset only the touched slots for the next row.
    for &j in &scratch.touched {
        scratch.scores[j as usize] = 0.0;
        scratch.hit[j as usize] = false;
    }
    scratch.touched.clear();

    if top_n == 0 {
        return Vec::new();
    }
    if survivors.len() > top_n {
        // `rank` is a total order, so the selected prefix is exactly the
        // top_n best even across score ties.
        survivors.select_nth_unstable_by(top_n - 1, rank);
        survivors.truncate(top_n);
    }
    survivors.sort_unstable_by(rank);
    survivors
}

/// Descending value; equal values go to the lower candidate index.
#[inline]
fn rank(x: &(u32, f64), y: &(u32, f64)) -> Ordering {
    y.1.total_cmp(&x.1).then_with(|| x.0.cmp(&y.0))
}
