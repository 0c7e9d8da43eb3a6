//! Ridge regression via the regularized normal equations.

use iaq_common::{FeatureVector, N_FEATURES};
use iaq_math::{cholesky_solve, SymMatrix};
use tracing::debug;

use super::{check_lengths, FitError, LinearModel};

/// Minimize `‖y - Xβ - b‖² + alpha·‖β‖²` with an unpenalized intercept.
///
/// Columns and target are centered first, so the intercept falls out as
/// `ȳ - x̄ᵀβ` and only `(XcᵀXc + alpha·I) β = Xcᵀyc` needs solving.
pub fn fit_ridge(x: &[FeatureVector], y: &[f64], alpha: f64) -> Result<LinearModel, FitError> {
    check_lengths(x, y.len())?;
    let n = x.len() as f64;

    let mut x_mean = [0.0; N_FEATURES];
    for row in x {
        for (m, v) in x_mean.iter_mut().zip(row) {
            *m += v;
        }
    }
    for m in &mut x_mean {
        *m /= n;
    }
    let y_mean = y.iter().sum::<f64>() / n;

    let mut gram = SymMatrix::zeros(N_FEATURES);
    let mut rhs = vec![0.0; N_FEATURES];
    let mut centered = [0.0; N_FEATURES];
    for (row, &target) in x.iter().zip(y) {
        for j in 0..N_FEATURES {
            centered[j] = row[j] - x_mean[j];
        }
        gram.add_outer(&centered, 1.0);
        let yc = target - y_mean;
        for (r, c) in rhs.iter_mut().zip(&centered) {
            *r += c * yc;
        }
    }
    gram.add_diagonal(alpha, 0..N_FEATURES);

    let beta = cholesky_solve(&gram, &rhs).ok_or_else(|| FitError::Numerical {
        model: "ridge",
        detail: format!("normal equations are singular (alpha = {alpha})"),
    })?;

    let mut model = LinearModel::zeros();
    model.coef.copy_from_slice(&beta);
    model.intercept = y_mean - x_mean.iter().zip(&model.coef).map(|(m, c)| m * c).sum::<f64>();
    if !model.is_finite() {
        return Err(FitError::Numerical {
            model: "ridge",
            detail: "non-finite coefficients".into(),
        });
    }

    debug!(target: "core.fit", model = "ridge", rows = x.len(), alpha, intercept = model.intercept, "Fitted ridge regression");
    Ok(model)
}
