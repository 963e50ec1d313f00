//! Model selection statistics.

use crate::error::{FieldError, FieldResult};

/// Bayesian information criterion, `n ln(err_var) + k ln(n)`.
///
/// * `n` - Number of data points
/// * `k` - Number of model parameters
/// * `err_var` - Error variance of the fit
///
/// Lower is better when comparing fits of the same data.
pub fn bic(n: usize, k: usize, err_var: f64) -> FieldResult<f64> {
    if n == 0 {
        return Err(FieldError::invalid_params("n", "need at least one data point"));
    }
    if !err_var.is_finite() || err_var <= 0.0 {
        return Err(FieldError::invalid_params(
            "err_var",
            format!("expected a finite, positive variance, got {}", err_var),
        ));
    }

    let n = n as f64;
    Ok(n * err_var.ln() + k as f64 * n.ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_bic_value() {
        let value = bic(100, 3, 0.5).unwrap();
        assert!(approx_eq(value, 100.0 * 0.5f64.ln() + 3.0 * 100.0f64.ln()));
    }

    #[test]
    fn test_bic_penalises_parameters() {
        assert!(bic(50, 4, 0.1).unwrap() > bic(50, 2, 0.1).unwrap());
    }

    #[test]
    fn test_bic_invalid_input() {
        assert!(bic(0, 1, 1.0).is_err());
        assert!(bic(10, 1, 0.0).is_err());
        assert!(bic(10, 1, -1.0).is_err());
        assert!(bic(10, 1, f64::NAN).is_err());
    }
}
