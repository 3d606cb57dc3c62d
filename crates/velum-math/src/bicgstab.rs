//! BiCGSTAB iterative solver.
//!
//! Unpreconditioned stabilized bi-conjugate gradients over the CSR matrix.
//! This is the fallback path for the implicit integrator: the system there
//! is nonsymmetric in general (damping cross terms), so plain CG does not
//! apply, and the matrix is strongly diagonally dominant at practical
//! timesteps, so no preconditioner is needed to converge in a handful of
//! iterations.
//!
//! All accumulation happens in f64; the f32 interface matches the rest of
//! the engine.

use crate::sparse::CsrMatrix;

/// Outcome of a BiCGSTAB run. The caller decides whether a non-converged
/// run is an error.
#[derive(Debug, Clone, Copy)]
pub struct BicgReport {
    /// Iterations actually performed.
    pub iterations: u32,
    /// Relative residual norm at exit.
    pub residual: f64,
    /// Whether the residual dropped below tolerance within the cap.
    pub converged: bool,
}

fn spmv_f64(matrix: &CsrMatrix, x: &[f64], y: &mut [f64]) {
    for row in 0..matrix.rows {
        let mut acc = 0.0f64;
        for idx in matrix.row_ptr[row]..matrix.row_ptr[row + 1] {
            acc += matrix.values[idx] as f64 * x[matrix.col_idx[idx]];
        }
        y[row] = acc;
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Solve `A x = b` with BiCGSTAB, starting from `x = 0`.
///
/// `tolerance` is relative to `‖b‖`. Returns a report; `solution` holds the
/// best iterate regardless of convergence.
pub fn solve(
    matrix: &CsrMatrix,
    rhs: &[f32],
    solution: &mut [f32],
    max_iterations: u32,
    tolerance: f64,
) -> Result<BicgReport, String> {
    if matrix.rows != matrix.cols {
        return Err(format!(
            "Matrix must be square, got {}×{}",
            matrix.rows, matrix.cols
        ));
    }
    let n = matrix.rows;
    if rhs.len() != n || solution.len() != n {
        return Err(format!(
            "Vector lengths ({}, {}) != matrix dimension ({})",
            rhs.len(),
            solution.len(),
            n
        ));
    }

    let b: Vec<f64> = rhs.iter().map(|&v| v as f64).collect();
    let b_norm = norm(&b);
    if b_norm == 0.0 {
        // Zero RHS: the solution is exactly zero.
        solution.fill(0.0);
        return Ok(BicgReport {
            iterations: 0,
            residual: 0.0,
            converged: true,
        });
    }

    let mut x = vec![0.0f64; n];
    // r = b - A x, and x = 0 here.
    let mut r = b.clone();
    let r_hat = r.clone();

    let mut rho = 1.0f64;
    let mut alpha = 1.0f64;
    let mut omega = 1.0f64;
    let mut v = vec![0.0f64; n];
    let mut p = vec![0.0f64; n];
    let mut s = vec![0.0f64; n];
    let mut t = vec![0.0f64; n];

    let mut residual = norm(&r) / b_norm;
    let mut iterations = 0u32;

    while iterations < max_iterations && residual > tolerance {
        iterations += 1;

        let rho_next = dot(&r_hat, &r);
        if rho_next.abs() < f64::MIN_POSITIVE {
            // Breakdown: the shadow residual has become orthogonal.
            break;
        }

        let beta = (rho_next / rho) * (alpha / omega);
        for i in 0..n {
            p[i] = r[i] + beta * (p[i] - omega * v[i]);
        }

        spmv_f64(matrix, &p, &mut v);
        let denom = dot(&r_hat, &v);
        if denom.abs() < f64::MIN_POSITIVE {
            break;
        }
        alpha = rho_next / denom;

        for i in 0..n {
            s[i] = r[i] - alpha * v[i];
        }

        if norm(&s) / b_norm <= tolerance {
            for i in 0..n {
                x[i] += alpha * p[i];
            }
            residual = norm(&s) / b_norm;
            break;
        }

        spmv_f64(matrix, &s, &mut t);
        let tt = dot(&t, &t);
        if tt.abs() < f64::MIN_POSITIVE {
            break;
        }
        omega = dot(&t, &s) / tt;

        for i in 0..n {
            x[i] += alpha * p[i] + omega * s[i];
            r[i] = s[i] - omega * t[i];
        }

        residual = norm(&r) / b_norm;
        rho = rho_next;
    }

    for i in 0..n {
        solution[i] = x[i] as f32;
    }

    Ok(BicgReport {
        iterations,
        residual,
        converged: residual <= tolerance,
    })
}
