pub mod topn;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Compressed sparse row matrix over a shared column space.
/// Rows are stored as `indptr`-delimited slices of `indices`/`data`.
/// Entry order within a row is producer-defined: vectorized rows are
/// ascending by column, matcher result rows are in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    pub n_rows: usize,
    pub n_cols: usize,
    /// Row boundaries: row i spans `indptr[i]..indptr[i + 1]`.
    pub indptr: Vec<usize>,
    /// Column index per stored entry.
    pub indices: Vec<u32>,
    /// Value per stored entry.
    pub data: Vec<f64>,
}

impl CsrMatrix {
    /// Build from per-row `(column, value)` entry lists, preserving each
    /// row's entry order.
    pub fn from_rows(n_cols: usize, rows: Vec<Vec<(u32, f64)>>) -> Self {
        let nnz = rows.iter().map(Vec::len).sum();
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        indptr.push(0);
        for row in &rows {
            for &(col, val) in row {
                debug_assert!((col as usize) < n_cols);
                indices.push(col);
                data.push(val);
            }
            indptr.push(indices.len());
        }
        Self {
            n_rows: rows.len(),
            n_cols,
            indptr,
            indices,
            data,
        }
    }

    /// Stored entries of row `i` as parallel (indices, values) slices.
    #[inline]
    pub fn row(&self, i: usize) -> (&[u32], &[f64]) {
        let range = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Transpose into column-major form (counting sort over columns).
    /// Row order within each column is preserved ascending.
    pub fn to_csc(&self) -> CscMatrix {
        let mut indptr = vec![0usize; self.n_cols + 1];
        for &col in &self.indices {
            indptr[col as usize + 1] += 1;
        }
        for c in 0..self.n_cols {
            indptr[c + 1] += indptr[c];
        }

        let mut indices = vec![0u32; self.nnz()];
        let mut data = vec![0f64; self.nnz()];
        let mut next = indptr.clone();
        for row in 0..self.n_rows {
            for k in self.indptr[row]..self.indptr[row + 1] {
                let col = self.indices[k] as usize;
                let pos = next[col];
                indices[pos] = row as u32;
                data[pos] = self.data[k];
                next[col] += 1;
            }
        }

        CscMatrix {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            indptr,
            indices,
            data,
        }
    }
}

/// Compressed sparse column matrix: the transposed access path.
/// `col(t)` answers "which rows carry term t" in time proportional to that
/// column's population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CscMatrix {
    pub n_rows: usize,
    pub n_cols: usize,
    /// Column boundaries: column j spans `indptr[j]..indptr[j + 1]`.
    pub indptr: Vec<usize>,
    /// Row index per stored entry.
    pub indices: Vec<u32>,
    /// Value per stored entry.
    pub data: Vec<f64>,
}

impl CscMatrix {
    /// Stored entries of column `j` as parallel (row indices, values) slices.
    #[inline]
    pub fn col(&self, j: usize) -> (&[u32], &[f64]) {
        let range = self.indptr[j]..self.indptr[j + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }
}

/// Dot product of two sparse vectors given as ascending (indices, values)
/// slices. Two-pointer merge over the shared index space.
pub fn sparse_dot(a_inds: &[u32], a_vals: &[f64], b_inds: &[u32], b_vals: &[f64]) -> f64 {
    let mut dot = 0f64;
    let mut ai = 0usize;
    let mut bi = 0usize;
    while ai < a_inds.len() && bi < b_inds.len() {
        match a_inds[ai].cmp(&b_inds[bi]) {
            Ordering::Equal => {
                dot += a_vals[ai] * b_vals[bi];
                ai += 1;
                bi += 1;
            }
            Ordering::Less => ai += 1,
            Ordering::Greater => bi += 1,
        }
    }
    dot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix {
        // [ 1.0  .   2.0 ]
        // [  .   .    .  ]
        // [ 3.0 4.0   .  ]
        CsrMatrix::from_rows(
            3,
            vec![
                vec![(0, 1.0), (2, 2.0)],
                vec![],
                vec![(0, 3.0), (1, 4.0)],
            ],
        )
    }

    #[test]
    fn from_rows_builds_indptr() {
        let m = sample();
        assert_eq!(m.n_rows, 3);
        assert_eq!(m.n_cols, 3);
        assert_eq!(m.indptr, vec![0, 2, 2, 4]);
        assert_eq!(m.indices, vec![0, 2, 0, 1]);
        assert_eq!(m.nnz(), 4);
    }

    #[test]
    fn row_access_handles_empty_rows() {
        let m = sample();
        let (inds, vals) = m.row(1);
        assert!(inds.is_empty());
        assert!(vals.is_empty());
        let (inds, vals) = m.row(2);
        assert_eq!(inds, &[0, 1]);
        assert_eq!(vals, &[3.0, 4.0]);
    }

    #[test]
    fn to_csc_transposes() {
        let csc = sample().to_csc();
        assert_eq!(csc.n_rows, 3);
        assert_eq!(csc.n_cols, 3);
        // column 0 holds rows 0 and 2
        let (rows, vals) = csc.col(0);
        assert_eq!(rows, &[0, 2]);
        assert_eq!(vals, &[1.0, 3.0]);
        // column 1 holds row 2 only
        let (rows, vals) = csc.col(1);
        assert_eq!(rows, &[2]);
        assert_eq!(vals, &[4.0]);
        // column 2 holds row 0 only
        let (rows, vals) = csc.col(2);
        assert_eq!(rows, &[0]);
        assert_eq!(vals, &[2.0]);
    }

    #[test]
    fn sparse_dot_merges_shared_indices() {
        let a_inds = [0u32, 2, 5];
        let a_vals = [1.0, 2.0, 3.0];
        let b_inds = [1u32, 2, 5];
        let b_vals = [10.0, 20.0, 30.0];
        let dot = sparse_dot(&a_inds, &a_vals, &b_inds, &b_vals);
        assert_eq!(dot, 2.0 * 20.0 + 3.0 * 30.0);
    }

    #[test]
    fn sparse_dot_disjoint_is_zero() {
        assert_eq!(sparse_dot(&[0, 1], &[1.0, 1.0], &[2, 3], &[1.0, 1.0]), 0.0);
        assert_eq!(sparse_dot(&[], &[], &[2, 3], &[1.0, 1.0]), 0.0);
    }
}
