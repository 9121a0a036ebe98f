//! Ordinary least squares with an intercept.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i - b0 - x_i^T β)^2
//! ```
//!
//! by centring every column and the target, solving the centred problem for β,
//! and recovering the intercept as `b0 = ȳ - x̄^T β`.
//!
//! Implementation choices:
//! - SVD solve, so tall and rank-deficient designs are fine. Singular values
//!   below a cutoff relative to the largest one are treated as zero, which
//!   yields the minimum-norm solution for collinear columns.
//! - A design with no variance at all (a single row, or identical rows) gives
//!   β = 0 and `b0 = ȳ`.

use nalgebra::{DMatrix, DVector};

/// Relative singular-value cutoffs, tried from strict to loose.
const RCOND: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Coefficients of a fitted linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearFit {
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    let max_sv = svd.singular_values.max();
    if max_sv <= 0.0 {
        return Some(DVector::zeros(x.ncols()));
    }

    for &rcond in &RCOND {
        if let Ok(beta) = svd.solve(y, rcond * max_sv) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y ≈ b0 + X β` on row-major feature rows.
///
/// Returns `None` for empty input, ragged rows, or a failed solve.
pub fn fit_with_intercept(rows: &[Vec<f64>], y: &[f64]) -> Option<LinearFit> {
    let n = rows.len();
    if n == 0 || n != y.len() {
        return None;
    }
    let p = rows[0].len();
    if rows.iter().any(|r| r.len() != p) {
        return None;
    }

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let mut x_mean = vec![0.0; p];
    for row in rows {
        for (m, v) in x_mean.iter_mut().zip(row) {
            *m += v;
        }
    }
    for m in &mut x_mean {
        *m /= n as f64;
    }

    if n == 1 || p == 0 {
        return Some(LinearFit {
            intercept: y_mean,
            coefficients: vec![0.0; p],
        });
    }

    let x = DMatrix::from_fn(n, p, |i, j| rows[i][j] - x_mean[j]);
    let yc = DVector::from_iterator(n, y.iter().map(|v| v - y_mean));

    let beta = solve_least_squares(&x, &yc)?;
    let intercept = y_mean - beta.iter().zip(&x_mean).map(|(b, m)| b * m).sum::<f64>();

    Some(LinearFit {
        intercept,
        coefficients: beta.iter().copied().collect(),
    })
}
