//! Descriptive statistics over plain `f64` slices

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Mean of an empty series is undefined".to_string(),
        ));
    }
    Ok(values.iter().mean())
}

/// Sample standard deviation (denominator `n - 1`)
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Sample standard deviation needs at least 2 values, have {}",
            values.len()
        )));
    }
    Ok(values.iter().std_dev())
}

/// Population variance (denominator `n`)
pub fn population_variance(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Variance of an empty series is undefined".to_string(),
        ));
    }
    Ok(values.iter().population_variance())
}

/// Mean of squared values, the zero-mean variance estimate
pub fn mean_square(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Mean square of an empty series is undefined".to_string(),
        ));
    }
    Ok(values.iter().map(|v| v * v).mean())
}

/// Order statistic at `floor(len * p)` of an ascending-sorted slice.
///
/// Returns 0.0 for an empty slice or when the index falls past the end.
pub fn floor_percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = (sorted.len() as f64 * p).floor();
    if idx < 0.0 {
        return 0.0;
    }
    sorted.get(idx as usize).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        assert_relative_eq!(population_variance(&values).unwrap(), 4.0);
        assert_relative_eq!(
            sample_std_dev(&values).unwrap(),
            (32.0_f64 / 7.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_inputs_are_errors() {
        assert!(mean(&[]).is_err());
        assert!(sample_std_dev(&[1.0]).is_err());
        assert!(population_variance(&[]).is_err());
        assert!(mean_square(&[]).is_err());
    }

    #[test]
    fn test_mean_square() {
        assert_relative_eq!(mean_square(&[1.0, -3.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_floor_percentile() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(floor_percentile(&sorted, 0.5), 6.0);
        assert_eq!(floor_percentile(&sorted, 0.1), 2.0);
        assert_eq!(floor_percentile(&sorted, 0.0), 1.0);
        assert_eq!(floor_percentile(&sorted, 1.0), 0.0);
        assert_eq!(floor_percentile(&[], 0.5), 0.0);
    }
}
