//! Sparse LU solver backed by `faer`.
//!
//! Implements the [`SparseSolver`] trait using faer's sparse LU
//! factorization. The solver operates in f64 internally for numerical
//! robustness but accepts and returns f32 at the interface boundary.
//!
//! ## Workflow
//! 1. First `factorize(matrix)` — converts CSR→CSC, runs symbolic analysis
//!    (ordering, fill-in prediction) and numeric factorization
//! 2. Later `factorize(matrix)` calls — reuse the cached symbolic analysis
//!    and only refactorize numerically (the pattern is frozen by contract)
//! 3. `solve(rhs, solution)` — forward/backward substitution

use faer::linalg::solvers::Solve;
use faer::sparse::linalg::solvers::{Lu, SymbolicLu};
use faer::sparse::{SparseColMat, Triplet};

use crate::sparse::{CsrMatrix, SparseSolver};

/// Sparse LU solver using `faer`.
///
/// The spring system refactorizes every implicit step (its coefficients
/// depend on the current configuration), but the structural pattern never
/// changes after setup — so the symbolic analysis is computed once and
/// cached here for the lifetime of the solver.
pub struct LuSolver {
    /// Symbolic analysis, computed on the first factorization.
    symbolic: Option<SymbolicLu<usize>>,
    /// Current numeric factorization.
    factorization: Option<Lu<usize, f64>>,
    /// Matrix dimension (N×N).
    dimension: usize,
}

impl LuSolver {
    /// Creates a new solver (unfactorized, no symbolic analysis).
    pub fn new() -> Self {
        Self {
            symbolic: None,
            factorization: None,
            dimension: 0,
        }
    }

    /// Convert our CSR matrix (f32) to faer's CSC matrix (f64).
    ///
    /// Builds from faer `Triplet`s, which faer assembles into CSC format.
    fn csr_to_csc_f64(matrix: &CsrMatrix) -> Result<SparseColMat<usize, f64>, String> {
        let mut triplets: Vec<Triplet<usize, usize, f64>> = Vec::with_capacity(matrix.values.len());
        for row in 0..matrix.rows {
            for idx in matrix.row_ptr[row]..matrix.row_ptr[row + 1] {
                let col = matrix.col_idx[idx];
                let val = matrix.values[idx] as f64;
                triplets.push(Triplet { row, col, val });
            }
        }

        SparseColMat::try_new_from_triplets(matrix.rows, matrix.cols, &triplets)
            .map_err(|e| format!("Failed to construct faer CSC matrix: {e:?}"))
    }
}

impl Default for LuSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseSolver for LuSolver {
    fn factorize(&mut self, matrix: &CsrMatrix) -> Result<(), String> {
        if matrix.rows != matrix.cols {
            return Err(format!(
                "Matrix must be square, got {}×{}",
                matrix.rows, matrix.cols
            ));
        }
        if matrix.rows == 0 {
            return Err("Cannot factorize empty matrix".into());
        }
        if self.symbolic.is_some() && matrix.rows != self.dimension {
            return Err(format!(
                "Pattern is frozen at dimension {}, got {}",
                self.dimension, matrix.rows
            ));
        }

        self.dimension = matrix.rows;

        // Convert CSR → faer CSC
        let csc = Self::csr_to_csc_f64(matrix)?;

        // Symbolic analysis runs once; every later factorization reuses it.
        if self.symbolic.is_none() {
            let symbolic = SymbolicLu::try_new(csc.symbolic().as_ref())
                .map_err(|e| format!("Symbolic analysis failed: {e:?}"))?;
            self.symbolic = Some(symbolic);
        }

        let symbolic = match &self.symbolic {
            Some(s) => s.clone(),
            None => return Err("Symbolic analysis missing".into()),
        };

        let lu = Lu::try_new_with_symbolic(symbolic, csc.as_ref())
            .map_err(|e| format!("LU factorization failed: {e:?}"))?;

        self.factorization = Some(lu);
        Ok(())
    }

    fn solve(&self, rhs: &[f32], solution: &mut [f32]) -> Result<(), String> {
        let lu = self
            .factorization
            .as_ref()
            .ok_or_else(|| "Solver not factorized. Call factorize() first.".to_string())?;

        if rhs.len() != self.dimension {
            return Err(format!(
                "RHS length ({}) != matrix dimension ({})",
                rhs.len(),
                self.dimension
            ));
        }
        if solution.len() != self.dimension {
            return Err(format!(
                "Solution length ({}) != matrix dimension ({})",
                solution.len(),
                self.dimension
            ));
        }

        // Convert RHS f32 → f64 dense column vector
        let rhs_f64: faer::Mat<f64> = faer::Mat::from_fn(self.dimension, 1, |i, _| rhs[i] as f64);

        let sol = lu.solve(&rhs_f64);

        // Copy result f64 → f32
        for i in 0..self.dimension {
            solution[i] = sol[(i, 0)] as f32;
        }

        Ok(())
    }

    fn is_factorized(&self) -> bool {
        self.factorization.is_some()
    }
}
