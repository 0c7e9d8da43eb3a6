//! Numerically stable logistic helpers.
//!
//! The logistic classifier evaluates these for scores far outside the range
//! where the naive formulas are accurate, so every function here branches on
//! sign to avoid overflow in `exp`.

/// Logistic sigmoid `1 / (1 + e^-z)`.
pub fn sigmoid(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Softplus `ln(1 + e^z)`.
pub fn softplus(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Binary log-loss of a raw score against a {0,1} label.
///
/// Equals `-y ln σ(z) - (1-y) ln(1-σ(z))` without forming σ(z).
pub fn logistic_loss(z: f64, y: f64) -> f64 {
    softplus(z) - y * z
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn sigmoid_symmetry() {
        for z in [-30.0, -2.5, 0.0, 0.7, 12.0] {
            assert!(approx_eq(sigmoid(z) + sigmoid(-z), 1.0, 1e-12));
        }
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn sigmoid_handles_extremes() {
        assert!(approx_eq(sigmoid(1000.0), 1.0, 1e-15));
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(-1000.0) < 1e-300);
        assert!(sigmoid(f64::NAN).is_nan());
    }

    #[test]
    fn softplus_matches_naive_in_safe_range() {
        for z in [-5.0, -0.5, 0.0, 0.5, 5.0] {
            let naive = (1.0 + f64::exp(z)).ln();
            assert!(approx_eq(softplus(z), naive, 1e-12));
        }
        assert!(approx_eq(softplus(800.0), 800.0, 1e-9));
    }

    #[test]
    fn logistic_loss_matches_cross_entropy() {
        let z = 1.3;
        let p = sigmoid(z);
        assert!(approx_eq(logistic_loss(z, 1.0), -p.ln(), 1e-12));
        assert!(approx_eq(logistic_loss(z, 0.0), -(1.0 - p).ln(), 1e-12));
    }
}
