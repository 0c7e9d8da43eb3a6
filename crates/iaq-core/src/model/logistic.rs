//! L2-regularized logistic regression with optional balanced class weights.
//!
//! Objective over `θ = (w, b)`:
//!
//! ```text
//! f(θ) = ½‖w‖² + C · Σᵢ sᵢ · (softplus(zᵢ) − yᵢ·zᵢ),   zᵢ = w·xᵢ + b
//! ```
//!
//! The intercept is not penalized. With balanced weighting
//! `sᵢ = n / (2 · n_class(yᵢ))`, each class contributes equal total weight.
//! Minimized by damped Newton steps with Armijo backtracking, starting at
//! zero; the loop stops once `‖∇f‖∞ ≤ tol` or after `max_iter` steps.

use iaq_common::{FeatureVector, N_FEATURES};
use iaq_math::{cholesky_solve, logistic_loss, sigmoid, SymMatrix};
use tracing::{debug, warn};

use super::{check_lengths, FitError, LinearModel};

/// Parameter count: coefficients plus intercept.
const DIM: usize = N_FEATURES + 1;
const ARMIJO_C: f64 = 1e-4;
const MAX_HALVINGS: usize = 60;
const MAX_JITTER_TRIES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    /// Inverse regularization strength.
    pub c: f64,
    pub max_iter: usize,
    /// Gradient infinity-norm tolerance.
    pub tol: f64,
    pub balanced: bool,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 2000,
            tol: 1e-4,
            balanced: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticFit {
    pub model: LinearModel,
    pub iterations: usize,
    pub converged: bool,
    /// Per-class sample weights `[s(0), s(1)]`.
    pub class_weights: [f64; 2],
}

struct Problem<'a> {
    x: &'a [FeatureVector],
    y: &'a [bool],
    weights: [f64; 2],
    c: f64,
}

impl Problem<'_> {
    fn sample_weight(&self, label: bool) -> f64 {
        self.c * self.weights[usize::from(label)]
    }

    fn objective(&self, theta: &[f64; DIM]) -> f64 {
        let penalty = 0.5 * theta[..N_FEATURES].iter().map(|w| w * w).sum::<f64>();
        let loss: f64 = self
            .x
            .iter()
            .zip(self.y)
            .map(|(xi, &yi)| {
                let z = score(theta, xi);
                self.sample_weight(yi) * logistic_loss(z, f64::from(u8::from(yi)))
            })
            .sum();
        penalty + loss
    }

    /// Gradient and Hessian at `theta`.
    fn derivatives(&self, theta: &[f64; DIM]) -> ([f64; DIM], SymMatrix) {
        let mut grad = [0.0; DIM];
        grad[..N_FEATURES].copy_from_slice(&theta[..N_FEATURES]);
        let mut hess = SymMatrix::zeros(DIM);
        hess.add_diagonal(1.0, 0..N_FEATURES);

        let mut aug = [1.0; DIM];
        for (xi, &yi) in self.x.iter().zip(self.y) {
            aug[..N_FEATURES].copy_from_slice(xi);
            let p = sigmoid(score(theta, xi));
            let s = self.sample_weight(yi);
            let r = s * (p - f64::from(u8::from(yi)));
            for (g, a) in grad.iter_mut().zip(&aug) {
                *g += r * a;
            }
            hess.add_outer(&aug, s * p * (1.0 - p));
        }
        (grad, hess)
    }
}

fn score(theta: &[f64; DIM], x: &FeatureVector) -> f64 {
    theta[N_FEATURES] + theta[..N_FEATURES].iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
}

fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}

/// Solve `H d = -g`, adding diagonal jitter if the Hessian is numerically
/// singular (saturated probabilities).
fn newton_direction(hess: &SymMatrix, grad: &[f64; DIM]) -> Option<Vec<f64>> {
    let neg: Vec<f64> = grad.iter().map(|g| -g).collect();
    if let Some(d) = cholesky_solve(hess, &neg) {
        return Some(d);
    }
    let mut jitter = 1e-10;
    for _ in 0..MAX_JITTER_TRIES {
        let mut h = hess.clone();
        h.add_diagonal(jitter, 0..DIM);
        if let Some(d) = cholesky_solve(&h, &neg) {
            return Some(d);
        }
        jitter *= 100.0;
    }
    None
}

/// Fit on standardized features against hazard labels.
pub fn fit_logistic(
    x: &[FeatureVector],
    y: &[bool],
    params: &LogisticParams,
) -> Result<LogisticFit, FitError> {
    check_lengths(x, y.len())?;
    let total = y.len();
    let positives = y.iter().filter(|&&h| h).count();
    if positives == 0 || positives == total {
        return Err(FitError::SingleClass { positives, total });
    }

    let weights = if params.balanced {
        let n = total as f64;
        [
            n / (2.0 * (total - positives) as f64),
            n / (2.0 * positives as f64),
        ]
    } else {
        [1.0, 1.0]
    };
    let problem = Problem {
        x,
        y,
        weights,
        c: params.c,
    };

    let mut theta = [0.0; DIM];
    let mut f = problem.objective(&theta);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iter {
        let (grad, hess) = problem.derivatives(&theta);
        if inf_norm(&grad) <= params.tol {
            converged = true;
            break;
        }
        iterations += 1;

        let direction = newton_direction(&hess, &grad).ok_or_else(|| FitError::Numerical {
            model: "logistic",
            detail: "Hessian is not positive-definite".into(),
        })?;
        let slope: f64 = grad.iter().zip(&direction).map(|(g, d)| g * d).sum();

        let mut step = 1.0;
        let mut accepted = false;
        for _ in 0..MAX_HALVINGS {
            let mut trial = theta;
            for (t, d) in trial.iter_mut().zip(&direction) {
                *t += step * d;
            }
            let f_trial = problem.objective(&trial);
            if f_trial.is_finite() && f_trial <= f + ARMIJO_C * step * slope {
                theta = trial;
                f = f_trial;
                accepted = true;
                break;
            }
            step *= 0.5;
        }
        if !accepted {
            // No further decrease representable at this precision.
            let (grad, _) = problem.derivatives(&theta);
            converged = inf_norm(&grad) <= params.tol.max(1e-8 * f.abs());
            break;
        }
    }
    if iterations == params.max_iter && !converged {
        let (grad, _) = problem.derivatives(&theta);
        converged = inf_norm(&grad) <= params.tol;
    }

    let mut model = LinearModel::zeros();
    model.coef.copy_from_slice(&theta[..N_FEATURES]);
    model.intercept = theta[N_FEATURES];
    if !model.is_finite() || !f.is_finite() {
        return Err(FitError::Numerical {
            model: "logistic",
            detail: "non-finite coefficients".into(),
        });
    }

    if converged {
        debug!(target: "core.fit", model = "logistic", rows = total, positives, iterations, objective = f, "Fitted logistic regression");
    } else {
        warn!(target: "core.fit", model = "logistic", iterations, objective = f, "Logistic regression stopped before reaching tolerance");
    }
    Ok(LogisticFit {
        model,
        iterations,
        converged,
        class_weights: weights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ridge::tests::design;

    fn labels_from(x: &[FeatureVector], coef: &[f64], b: f64) -> Vec<bool> {
        x.iter()
            .map(|r| b + r.iter().zip(coef).map(|(a, c)| a * c).sum::<f64>() > 0.0)
            .collect()
    }

    #[test]
    fn gradient_vanishes_at_solution() {
        let x = design(200);
        let mut coef = [0.0; N_FEATURES];
        coef[0] = 2.0;
        coef[3] = -1.0;
        // Overlapping classes: flip every seventh label.
        let mut y = labels_from(&x, &coef, 0.3);
        for yi in y.iter_mut().step_by(7) {
            *yi = !*yi;
        }
        let params = LogisticParams::default();
        let fit = fit_logistic(&x, &y, &params).unwrap();
        assert!(fit.converged);
        assert!(fit.iterations < 50);

        let problem = Problem {
            x: &x,
            y: &y,
            weights: fit.class_weights,
            c: params.c,
        };
        let mut theta = [0.0; DIM];
        theta[..N_FEATURES].copy_from_slice(&fit.model.coef);
        theta[N_FEATURES] = fit.model.intercept;
        let (grad, _) = problem.derivatives(&theta);
        assert!(inf_norm(&grad) <= params.tol);
        assert!(fit.model.coef[0] > 0.0);
        assert!(fit.model.coef[3] < 0.0);
    }

    #[test]
    fn separable_data_stays_bounded() {
        let x = design(120);
        let mut coef = [0.0; N_FEATURES];
        coef[1] = 1.0;
        let y = labels_from(&x, &coef, 0.0);
        let fit = fit_logistic(&x, &y, &LogisticParams::default()).unwrap();
        assert!(fit.converged);
        assert!(fit.model.coef.iter().all(|c| c.abs() < 100.0));
        // The decision rule still separates the training data.
        let correct = x
            .iter()
            .zip(&y)
            .filter(|(r, &yi)| (fit.model.score(r) > 0.0) == yi)
            .count();
        assert!(correct as f64 / y.len() as f64 > 0.9);
    }

    #[test]
    fn balanced_weights_equalize_class_mass() {
        let x = design(100);
        let y: Vec<bool> = (0..100).map(|i| i % 10 == 0).collect();
        let fit = fit_logistic(&x, &y, &LogisticParams::default()).unwrap();
        let [w0, w1] = fit.class_weights;
        assert!((w0 * 90.0 - w1 * 10.0).abs() < 1e-9);
        assert!((w0 * 90.0 + w1 * 10.0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn balancing_moves_intercept_toward_minority() {
        let x = design(100);
        let y: Vec<bool> = (0..100).map(|i| i % 10 == 0).collect();
        let balanced = fit_logistic(&x, &y, &LogisticParams::default()).unwrap();
        let plain = fit_logistic(
            &x,
            &y,
            &LogisticParams {
                balanced: false,
                ..LogisticParams::default()
            },
        )
        .unwrap();
        assert!(balanced.model.intercept > plain.model.intercept);
    }

    #[test]
    fn single_class_is_rejected() {
        let x = design(10);
        let err = fit_logistic(&x, &[false; 10], &LogisticParams::default()).unwrap_err();
        assert!(matches!(err, FitError::SingleClass { positives: 0, total: 10 }));
        let err = fit_logistic(&x, &[true; 10], &LogisticParams::default()).unwrap_err();
        assert!(matches!(err, FitError::SingleClass { positives: 10, .. }));
    }

    #[test]
    fn deterministic() {
        let x = design(60);
        let y: Vec<bool> = x.iter().map(|r| r[0] + 0.5 * r[5] > 0.1).collect();
        let a = fit_logistic(&x, &y, &LogisticParams::default()).unwrap();
        let b = fit_logistic(&x, &y, &LogisticParams::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let x = design(200);
        let mut coef = [0.0; N_FEATURES];
        coef[0] = 2.0;
        coef[3] = -1.0;
        let mut y = labels_from(&x, &coef, 0.3);
        for yi in y.iter_mut().step_by(7) {
            *yi = !*yi;
        }
        let params = LogisticParams {
            max_iter: 1,
            ..LogisticParams::default()
        };
        let fit = fit_logistic(&x, &y, &params).unwrap();
        assert_eq!(fit.iterations, 1);
        assert!(!fit.converged);
        assert!(fit.model.is_finite());
    }
}
