//! Stationarity and invertibility constraints for lag polynomials.
//!
//! Unconstrained optimizer coordinates are mapped to partial autocorrelations
//! in (-1, 1) and then through the Durbin-Levinson recursion to polynomial
//! coefficients. Any real input vector produces a stationary AR polynomial
//! `1 - φ1 L - ... - φp L^p`, which lets an unconstrained minimizer search
//! only over admissible models.

use crate::{MathError, Result};

/// Map unconstrained reals to stationary AR coefficients `φ1..φp`.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let partials: Vec<f64> = unconstrained
        .iter()
        .map(|x| x / (1.0 + x * x).sqrt())
        .collect();

    let mut coefs: Vec<f64> = Vec::with_capacity(partials.len());
    for (k, &r) in partials.iter().enumerate() {
        let prev = coefs.clone();
        for j in 0..k {
            coefs[j] = prev[j] - r * prev[k - 1 - j];
        }
        coefs.push(r);
    }
    coefs
}

/// Inverse of [`constrain_stationary`].
///
/// Fails when the coefficients are not stationary (a partial
/// autocorrelation reaches magnitude 1).
pub fn unconstrain_stationary(coefs: &[f64]) -> Result<Vec<f64>> {
    let n = coefs.len();
    let mut current = coefs.to_vec();
    let mut partials = vec![0.0; n];

    for k in (0..n).rev() {
        let r = current[k];
        if r.abs() >= 1.0 || !r.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Coefficients are not stationary (partial autocorrelation {} at lag {})",
                r,
                k + 1
            )));
        }
        partials[k] = r;

        let denom = 1.0 - r * r;
        let prev: Vec<f64> = (0..k)
            .map(|j| (current[j] + r * current[k - 1 - j]) / denom)
            .collect();
        current = prev;
    }

    Ok(partials
        .into_iter()
        .map(|r| r / (1.0 - r * r).sqrt())
        .collect())
}

/// Map unconstrained reals to invertible MA coefficients `θ1..θq`
/// for `1 + θ1 L + ... + θq L^q`.
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|c| -c)
        .collect()
}

/// Inverse of [`constrain_invertible`].
pub fn unconstrain_invertible(coefs: &[f64]) -> Result<Vec<f64>> {
    let negated: Vec<f64> = coefs.iter().map(|c| -c).collect();
    unconstrain_stationary(&negated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_lag_maps_into_unit_interval() {
        for x in [-1e6, -3.0, 0.0, 0.5, 1e6] {
            let phi = constrain_stationary(&[x]);
            assert!(phi[0].abs() < 1.0 || (phi[0].abs() - 1.0).abs() < 1e-9);
        }
        assert_relative_eq!(constrain_stationary(&[0.0])[0], 0.0);
    }

    #[test]
    fn test_two_lags_satisfy_stationarity_triangle() {
        // AR(2) is stationary iff φ2 + φ1 < 1, φ2 - φ1 < 1 and |φ2| < 1.
        for (a, b) in [(2.0, -1.5), (-4.0, 3.0), (0.3, 0.9), (10.0, 10.0)] {
            let phi = constrain_stationary(&[a, b]);
            assert!(phi[0] + phi[1] < 1.0);
            assert!(phi[1] - phi[0] < 1.0);
            assert!(phi[1].abs() < 1.0);
        }
    }

    #[test]
    fn test_unconstrain_recovers_input() {
        let x = vec![0.4, -1.2, 0.7];
        let phi = constrain_stationary(&x);
        let back = unconstrain_stationary(&phi).unwrap();
        for (a, b) in x.iter().zip(&back) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_unconstrain_rejects_unit_root() {
        assert!(unconstrain_stationary(&[1.0]).is_err());
        assert!(unconstrain_invertible(&[-1.5]).is_err());
    }

    #[test]
    fn test_invertible_is_negated_stationary() {
        let theta = constrain_invertible(&[0.5]);
        assert_relative_eq!(theta[0], -0.5 / (1.25_f64).sqrt(), epsilon = 1e-12);
    }
}
