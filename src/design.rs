//! Test administration design and ideal-response (ETA) tables.

use ndarray::{Array2, Array3, ArrayView2};

use crate::bijection;
use crate::error::{Error, Result};

/// Which item block each subject sees at each time point.
///
/// `test_order` maps (test version, time) to a 1-based block id; each
/// subject is assigned a 1-based test version.
#[derive(Debug, Clone)]
pub struct TestDesign {
    test_order: Array2<usize>,
    test_versions: Vec<usize>,
}

impl TestDesign {
    /// Validates that every (version, time) cell is a valid 1-based block
    /// index and that every subject's version id is valid.
    pub fn new(test_order: Array2<usize>, test_versions: Vec<usize>) -> Result<Self> {
        let n_versions = test_order.nrows();
        let n_blocks = test_order.ncols();
        for ((v, t), &b) in test_order.indexed_iter() {
            if b < 1 || b > n_blocks {
                return Err(Error::DimensionMismatch(format!(
                    "test_order[{v},{t}] = {b} is not a valid 1-based block id (1..={n_blocks})"
                )));
            }
        }
        for (i, &v) in test_versions.iter().enumerate() {
            if v < 1 || v > n_versions {
                return Err(Error::DimensionMismatch(format!(
                    "test version {v} of subject {i} is not in 1..={n_versions}"
                )));
            }
        }
        Ok(Self {
            test_order,
            test_versions,
        })
    }

    pub fn n_subjects(&self) -> usize {
        self.test_versions.len()
    }

    pub fn n_times(&self) -> usize {
        self.test_order.ncols()
    }

    /// 0-based block administered to `subject` at time `t`.
    #[inline]
    pub fn block(&self, subject: usize, t: usize) -> usize {
        self.test_order[[self.test_versions[subject] - 1, t]] - 1
    }

    /// 0-based block sequence of one subject across all time points.
    pub fn blocks(&self, subject: usize) -> Vec<usize> {
        (0..self.n_times()).map(|t| self.block(subject, t)).collect()
    }
}

/// Ideal-response table for one block: entry (j, c) is 1 when skill pattern
/// c masters every skill item j requires.
pub fn eta_matrix(k: usize, q: ArrayView2<f64>) -> Array2<f64> {
    let jt = q.nrows();
    let n_classes = 1usize << k;
    let mut eta = Array2::zeros((jt, n_classes));
    for c in 0..n_classes {
        // decode cannot fail: c < 2^k and k was bounds-checked by the caller
        let pattern = bijection::decode(c as u64, k).expect("class index within 2^k");
        for j in 0..jt {
            let ideal = (0..k).all(|kk| q[[j, kk]] < 0.5 || pattern[kk] == 1);
            eta[[j, c]] = if ideal { 1.0 } else { 0.0 };
        }
    }
    eta
}

/// One ETA table per block, built once and shared across all draws.
pub fn eta_tables(k: usize, qs: &Array3<f64>) -> Vec<Array2<f64>> {
    (0..qs.dim().2)
        .map(|b| eta_matrix(k, qs.index_axis(ndarray::Axis(2), b)))
        .collect()
}

/// Number of items in each block requiring each skill (blocks x K), used by
/// the cumulative-practice covariate.
pub fn skill_incidence(qs: &Array3<f64>) -> Array2<f64> {
    let (jt, k, n_blocks) = qs.dim();
    let mut counts = Array2::zeros((n_blocks, k));
    for b in 0..n_blocks {
        for kk in 0..k {
            let mut c = 0.0;
            for j in 0..jt {
                if qs[[j, kk, b]] > 0.5 {
                    c += 1.0;
                }
            }
            counts[[b, kk]] = c;
        }
    }
    counts
}
