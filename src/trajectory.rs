//! Decoding of compact trajectory codes into attribute cubes.

use ndarray::{Array2, Array3};

use crate::bijection;
use crate::error::{Error, Result};
use crate::utils::mode_sorted;

/// Strategy for collapsing trajectory draws into a single estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    /// Pointwise marginal mean per (skill, time) coordinate, thresholded
    /// strictly at 0.5. Not a valid draw from the trajectory space in
    /// general.
    Eap,
    /// Most frequent full trajectory code; ties go to the first occurrence
    /// in ascending sorted order.
    Map,
}

/// Convert a sampler trajectory matrix (N x n_its, `f64` codes) into checked
/// integer codes. Fails on any non-integral or out-of-range code.
pub fn checked_codes(traject: &Array2<f64>, k: usize, t: usize) -> Result<Array2<u64>> {
    let len = k * t;
    let mut codes = Array2::zeros(traject.raw_dim());
    for ((i, tt), &x) in traject.indexed_iter() {
        codes[[i, tt]] = bijection::code_from_f64(x, len)?;
    }
    Ok(codes)
}

/// Decode one draw's trajectory codes into an N x K x T attribute cube.
///
/// `codes` must already be range-checked by [`checked_codes`].
pub fn decode_draw(codes: &Array2<u64>, draw: usize, k: usize, t: usize) -> Array3<f64> {
    let n = codes.nrows();
    let mut alphas = Array3::zeros((n, k, t));
    for i in 0..n {
        let bits = bijection::decode(codes[[i, draw]], k * t).expect("pre-checked code");
        for tt in 0..t {
            for kk in 0..k {
                alphas[[i, kk, tt]] = f64::from(bits[tt * k + kk]);
            }
        }
    }
    alphas
}

/// Collapse trajectory draws into an N x K x T point-estimate cube.
pub fn decode_trajectories(
    traject: &Array2<f64>,
    k: usize,
    t: usize,
    estimator: Estimator,
) -> Result<Array3<f64>> {
    let n_its = traject.ncols();
    if n_its == 0 {
        return Err(Error::EmptyDrawSet);
    }
    let codes = checked_codes(traject, k, t)?;
    let n = traject.nrows();
    let len = k * t;
    let mut alphas = Array3::zeros((n, k, t));

    match estimator {
        Estimator::Eap => {
            for i in 0..n {
                let mut bit_sums = vec![0.0f64; len];
                for tt in 0..n_its {
                    let bits = bijection::decode(codes[[i, tt]], len).expect("pre-checked code");
                    for (s, &b) in bit_sums.iter_mut().zip(bits.iter()) {
                        *s += f64::from(b);
                    }
                }
                for (idx, s) in bit_sums.iter().enumerate() {
                    if s / n_its as f64 > 0.5 {
                        let kk = idx % k;
                        let tt = idx / k;
                        alphas[[i, kk, tt]] = 1.0;
                    }
                }
            }
        }
        Estimator::Map => {
            for i in 0..n {
                let mut sorted: Vec<u64> = codes.row(i).to_vec();
                sorted.sort_unstable();
                let mode = mode_sorted(&sorted);
                let bits = bijection::decode(mode, len).expect("pre-checked code");
                for tt in 0..t {
                    for kk in 0..k {
                        alphas[[i, kk, tt]] = f64::from(bits[tt * k + kk]);
                    }
                }
            }
        }
    }
    Ok(alphas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn eap_thresholds_marginal_means() {
        // K=1, T=1: codes are single bits. Subject 0 sees {1,1,0}; subject 1
        // sees {1,0,0}.
        let traject = array![[1.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let alphas = decode_trajectories(&traject, 1, 1, Estimator::Eap).unwrap();
        assert_eq!(alphas[[0, 0, 0]], 1.0); // mean 0.667 > 0.5
        assert_eq!(alphas[[1, 0, 0]], 0.0); // mean 0.333
    }

    #[test]
    fn eap_boundary_mean_rounds_down() {
        let traject = array![[1.0, 0.0]];
        let alphas = decode_trajectories(&traject, 1, 1, Estimator::Eap).unwrap();
        assert_eq!(alphas[[0, 0, 0]], 0.0); // mean exactly 0.5 is not > 0.5
    }

    #[test]
    fn map_takes_the_majority_code() {
        // K=2, T=2: code 5 decodes to bits 0101.
        let traject = array![[5.0, 5.0, 7.0]];
        let alphas = decode_trajectories(&traject, 2, 2, Estimator::Map).unwrap();
        assert_eq!(alphas[[0, 0, 0]], 0.0);
        assert_eq!(alphas[[0, 1, 0]], 1.0);
        assert_eq!(alphas[[0, 0, 1]], 0.0);
        assert_eq!(alphas[[0, 1, 1]], 1.0);
    }

    #[test]
    fn map_tie_break_is_deterministic() {
        let traject = array![[7.0, 5.0]];
        for _ in 0..5 {
            let alphas = decode_trajectories(&traject, 2, 2, Estimator::Map).unwrap();
            // tie of one each: first value in sorted order (5) wins
            assert_eq!(alphas[[0, 0, 0]], 0.0);
            assert_eq!(alphas[[0, 1, 0]], 1.0);
        }
    }

    #[test]
    fn empty_draw_axis_is_an_error() {
        let traject = Array2::<f64>::zeros((2, 0));
        assert!(matches!(
            decode_trajectories(&traject, 2, 2, Estimator::Eap),
            Err(Error::EmptyDrawSet)
        ));
    }

    #[test]
    fn bad_codes_are_contract_errors() {
        let traject = array![[16.0]];
        assert!(matches!(
            decode_trajectories(&traject, 2, 2, Estimator::Map),
            Err(Error::Contract(_))
        ));
    }
}
