//! Sparse matrix representation and solver interface.
//!
//! Provides a CSR (Compressed Sparse Row) matrix and a trait for sparse
//! direct solvers. The matrix carries a *frozen pattern* contract: once the
//! structural nonzero set is built, only coefficient values change. This is
//! what lets the direct solver run its symbolic analysis exactly once and
//! reuse it for every subsequent refactorization.

use serde::{Deserialize, Serialize};

/// Compressed Sparse Row (CSR) matrix.
///
/// Column indices within each row are kept sorted, so locating an entry
/// is a binary search over a short slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrMatrix {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row pointer array (length = rows + 1).
    /// `row_ptr[i]..row_ptr[i+1]` are the indices into `col_idx` and `values`
    /// for non-zeros in row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices of non-zero entries, sorted within each row.
    pub col_idx: Vec<usize>,
    /// Non-zero values.
    pub values: Vec<f32>,
}

impl CsrMatrix {
    /// Creates an empty CSR matrix with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Returns the number of structural non-zero entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Creates a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate (row, col) entries are summed into a single structural
    /// nonzero. Entries with a zero value still claim a slot in the
    /// pattern, which is exactly what a pattern-first setup wants.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f32)]) -> Self {
        let mut sorted: Vec<(usize, usize, f32)> = triplets.to_vec();
        sorted.sort_by_key(|&(r, c, _)| (r, c));

        let mut row_counts = vec![0usize; rows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<f32> = Vec::with_capacity(sorted.len());

        let mut prev: Option<(usize, usize)> = None;
        for &(r, c, v) in &sorted {
            if prev == Some((r, c)) {
                if let Some(last) = values.last_mut() {
                    *last += v;
                }
            } else {
                col_idx.push(c);
                values.push(v);
                row_counts[r + 1] += 1;
                prev = Some((r, c));
            }
        }

        // Prefix-sum the per-row counts into row pointers.
        let mut row_ptr = row_counts;
        for i in 0..rows {
            row_ptr[i + 1] += row_ptr[i];
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Zeroes every coefficient while leaving the structural pattern intact.
    pub fn zero_values(&mut self) {
        for v in &mut self.values {
            *v = 0.0;
        }
    }

    /// Returns the flat index of the structural nonzero at (row, col),
    /// or `None` if the position is outside the pattern.
    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_idx[start..end]
            .binary_search(&col)
            .ok()
            .map(|off| start + off)
    }

    /// Accumulates `v` into the structural nonzero at (row, col).
    ///
    /// Positions outside the frozen pattern are a hard error: the pattern
    /// is built once at setup and the solver's symbolic analysis depends
    /// on it never changing.
    pub fn add(&mut self, row: usize, col: usize, v: f32) -> Result<(), String> {
        match self.entry(row, col) {
            Some(idx) => {
                self.values[idx] += v;
                Ok(())
            }
            None => Err(format!("({row}, {col}) is not in the sparsity pattern")),
        }
    }

    /// Sparse matrix-vector product `y = A * x`.
    pub fn mul_vec(&self, x: &[f32], y: &mut [f32]) {
        debug_assert_eq!(x.len(), self.cols);
        debug_assert_eq!(y.len(), self.rows);
        for row in 0..self.rows {
            let mut acc = 0.0f32;
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                acc += self.values[idx] * x[self.col_idx[idx]];
            }
            y[row] = acc;
        }
    }
}

/// Trait for sparse direct solvers over a frozen-pattern matrix.
///
/// Implementations: [`LuSolver`](crate::lu::LuSolver).
pub trait SparseSolver {
    /// Refactorize the matrix. The first call performs symbolic analysis;
    /// subsequent calls must reuse it (the caller guarantees the pattern
    /// has not changed).
    fn factorize(&mut self, matrix: &CsrMatrix) -> Result<(), String>;

    /// Solve Ax = b using the current factorization.
    /// Returns x in the provided output buffer.
    fn solve(&self, rhs: &[f32], solution: &mut [f32]) -> Result<(), String>;

    /// Returns true if the solver holds a valid factorization.
    fn is_factorized(&self) -> bool;
}
