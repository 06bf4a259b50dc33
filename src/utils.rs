//! Shared numerical helpers.

use ndarray::ArrayView2;

pub const EPSILON: f64 = 1e-10;

const LOG_2_PI: f64 = 1.8378770664093453;

/// Sigmoid function with numerical stability.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let exp_x = x.exp();
        exp_x / (1.0 + exp_x)
    }
}

/// Log density of a univariate Normal with the given mean and variance.
#[inline]
pub fn log_normal_density(x: f64, mean: f64, var: f64) -> f64 {
    if var <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let d = x - mean;
    -0.5 * ((2.0 * std::f64::consts::PI * var).ln() + d * d / var)
}

/// Log density of a bivariate Normal with mean zero and covariance `sigma`.
///
/// A non-positive-definite `sigma` yields `-inf` rather than an error.
pub fn log_bivariate_normal_density(x1: f64, x2: f64, sigma: &ArrayView2<f64>) -> f64 {
    let (s11, s12, s22) = (sigma[[0, 0]], sigma[[0, 1]], sigma[[1, 1]]);
    let det = s11 * s22 - s12 * s12;
    if det <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let maha = (s22 * x1 * x1 - 2.0 * s12 * x1 * x2 + s11 * x2 * x2) / det;
    -0.5 * (2.0 * LOG_2_PI + det.ln() + maha)
}

/// Most frequent value of a sorted slice.
///
/// Ties are broken by the first occurrence in ascending order: a later run
/// replaces the current mode only when it is strictly longer.
pub fn mode_sorted(sorted: &[u64]) -> u64 {
    let mut mode = sorted[0];
    let mut best = 0usize;
    let mut current = sorted[0];
    let mut count = 0usize;
    for &v in sorted {
        if v == current {
            count += 1;
        } else {
            current = v;
            count = 1;
        }
        if count > best {
            best = count;
            mode = current;
        }
    }
    mode
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn sigmoid_is_symmetric() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(3.0) + sigmoid(-3.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normal_density_matches_standard_normal() {
        // N(0,1) at 0 is 1/sqrt(2*pi)
        assert_relative_eq!(
            log_normal_density(0.0, 0.0, 1.0),
            -0.5 * (2.0 * std::f64::consts::PI).ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn bivariate_density_reduces_to_independent_product() {
        let sigma = array![[1.0, 0.0], [0.0, 1.0]];
        let joint = log_bivariate_normal_density(0.3, -0.7, &sigma.view());
        let sep = log_normal_density(0.3, 0.0, 1.0) + log_normal_density(-0.7, 0.0, 1.0);
        assert_relative_eq!(joint, sep, epsilon = 1e-12);
    }

    #[test]
    fn mode_prefers_majority_then_first_sorted() {
        assert_eq!(mode_sorted(&[5, 5, 7]), 5);
        assert_eq!(mode_sorted(&[5, 7]), 5);
        assert_eq!(mode_sorted(&[1, 2, 2, 9]), 2);
    }
}
