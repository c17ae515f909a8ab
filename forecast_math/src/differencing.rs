//! Differencing and its inverse for integrated (the "I" in ARIMA) series

/// Apply first differences `d` times. Each pass shortens the series by one.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut current = series.to_vec();
    for _ in 0..d {
        if current.len() < 2 {
            return Vec::new();
        }
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    current
}

/// Undo `d` rounds of differencing for values forecast past the end of `history`.
///
/// `forecast` is on the `d`-times differenced scale; the result is on the
/// scale of `history`, continuing from its last observation.
pub fn integrate(forecast: &[f64], history: &[f64], d: usize) -> Vec<f64> {
    let mut levels = Vec::with_capacity(d);
    let mut level = history.to_vec();
    for _ in 0..d {
        let next = difference(&level, 1);
        levels.push(level);
        level = next;
    }

    let mut current = forecast.to_vec();
    for level in levels.iter().rev() {
        let mut last = level.last().copied().unwrap_or(0.0);
        current = current
            .iter()
            .map(|v| {
                last += v;
                last
            })
            .collect();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, vec![1.0, 4.0, 9.0, 16.0])]
    #[case(1, vec![3.0, 5.0, 7.0])]
    #[case(2, vec![2.0, 2.0])]
    #[case(5, vec![])]
    fn test_difference(#[case] d: usize, #[case] expected: Vec<f64>) {
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], d), expected);
    }

    #[test]
    fn test_integrate_continues_quadratic() {
        // Second differences of squares are constant 2, so the next values are 25 and 36.
        let history = [1.0, 4.0, 9.0, 16.0];
        let restored = integrate(&[2.0, 2.0], &history, 2);
        assert_eq!(restored, vec![25.0, 36.0]);
    }

    #[test]
    fn test_integrate_without_differencing_is_identity() {
        assert_eq!(integrate(&[0.5], &[1.0, 2.0], 0), vec![0.5]);
    }
}
