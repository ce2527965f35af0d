//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the population standard deviation (n denominator).
///
/// Returns 0 for a single value and NaN for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Coefficient of variation `std / |mean|` using the population std.
///
/// A zero mean gives 0 when all values are zero and infinity otherwise.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let sd = population_std_dev(values);
    if m.abs() < 1e-12 {
        if sd < 1e-12 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        sd / m.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn population_std_dev_calculates_correctly() {
        assert_relative_eq!(
            population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]),
            2.0,
            epsilon = 1e-10
        );
        assert_relative_eq!(population_std_dev(&[3.0]), 0.0, epsilon = 1e-10);
        assert!(population_std_dev(&[]).is_nan());
    }

    #[test]
    fn coefficient_of_variation_edge_cases() {
        assert_relative_eq!(coefficient_of_variation(&[5.0, 5.0, 5.0]), 0.0, epsilon = 1e-10);
        assert_relative_eq!(coefficient_of_variation(&[0.0, 0.0]), 0.0, epsilon = 1e-10);
        assert!(coefficient_of_variation(&[-1.0, 1.0]).is_infinite());
        assert_relative_eq!(coefficient_of_variation(&[10.0, 20.0]), 5.0 / 15.0, epsilon = 1e-10);
    }
}
