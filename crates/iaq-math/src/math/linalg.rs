//! Small dense symmetric linear algebra.
//!
//! The fitters only ever solve `A x = b` for symmetric positive-definite `A`
//! of order `features + 1`, so a full-storage matrix and a Cholesky
//! factorization cover every need without an external dependency.

use serde::{Deserialize, Serialize};

/// Square symmetric matrix in row-major full storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SymMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        m.add_diagonal(1.0, 0..n);
        m
    }

    /// Order of the matrix.
    pub fn order(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Add `v` at `(i, j)` and its mirror `(j, i)`.
    pub fn add_sym(&mut self, i: usize, j: usize, v: f64) {
        self.data[i * self.n + j] += v;
        if i != j {
            self.data[j * self.n + i] += v;
        }
    }

    /// Add `v` to the diagonal entries in `range`.
    pub fn add_diagonal(&mut self, v: f64, range: std::ops::Range<usize>) {
        for i in range {
            self.data[i * self.n + i] += v;
        }
    }

    /// Accumulate the weighted outer product `w * x xᵀ` (upper triangle mirrored).
    pub fn add_outer(&mut self, x: &[f64], w: f64) {
        debug_assert_eq!(x.len(), self.n);
        for i in 0..self.n {
            let wi = w * x[i];
            if wi == 0.0 {
                continue;
            }
            for j in i..self.n {
                self.add_sym(i, j, wi * x[j]);
            }
        }
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j) * v[j]).sum())
            .collect()
    }
}

/// Solve `A x = b` for symmetric positive-definite `A` via Cholesky.
///
/// Returns `None` when `A` is not numerically positive-definite or when the
/// dimensions disagree.
pub fn cholesky_solve(a: &SymMatrix, b: &[f64]) -> Option<Vec<f64>> {
    let n = a.order();
    if b.len() != n {
        return None;
    }

    // Lower-triangular factor L with A = L Lᵀ.
    let mut l = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a.get(i, j);
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i * n + i] = sum.sqrt();
            } else {
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }

    // Forward substitution: L y = b.
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[i * n + k] * y[k];
        }
        y[i] = sum / l[i * n + i];
    }

    // Back substitution: Lᵀ x = y.
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[k * n + i] * x[k];
        }
        x[i] = sum / l[i * n + i];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
