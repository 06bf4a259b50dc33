//! Log-Normal response-time model and the fluency covariate G.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};
use crate::utils::log_normal_density;

/// Version of the practice/fluency covariate feeding the latency mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GVersion {
    /// Dichotomous: whether all skills the current item requires are
    /// mastered (ideal-response lookup).
    One,
    /// Cumulative practice effect from previously administered items using
    /// mastered skills.
    Two,
    /// Deterministic time-block effect (t+1)/T, identical across subjects.
    Three,
}

impl GVersion {
    pub fn from_index(g: u8) -> Result<Self> {
        match g {
            1 => Ok(GVersion::One),
            2 => Ok(GVersion::Two),
            3 => Ok(GVersion::Three),
            _ => Err(Error::Contract(format!(
                "G_version must be 1, 2, or 3, got {g}"
            ))),
        }
    }
}

/// G version 1: the ideal-response column of the current block for the
/// subject's current class.
pub fn g1(eta_block: ArrayView2<f64>, class: usize) -> Array1<f64> {
    eta_block.column(class).to_owned()
}

/// G version 2: for each item of the current block, the number of items
/// administered at earlier time points that required a skill the item also
/// requires, counted only at time points where the subject had mastered that
/// skill.
///
/// `alphas_i` is the subject's K x T attribute history, `blocks` the
/// subject's 0-based block sequence, and `incidence` the per-block count of
/// items requiring each skill.
pub fn g2(
    q_current: ArrayView2<f64>,
    alphas_i: ArrayView2<f64>,
    blocks: &[usize],
    incidence: ArrayView2<f64>,
    t: usize,
) -> Array1<f64> {
    let (jt, k) = q_current.dim();
    // practice accumulated per skill over time points before t
    let mut practiced = vec![0.0f64; k];
    for (s, &block_s) in blocks.iter().enumerate().take(t) {
        for (kk, p) in practiced.iter_mut().enumerate() {
            if alphas_i[[kk, s]] > 0.5 {
                *p += incidence[[block_s, kk]];
            }
        }
    }
    let mut g = Array1::zeros(jt);
    for j in 0..jt {
        for (kk, p) in practiced.iter().enumerate() {
            if q_current[[j, kk]] > 0.5 {
                g[j] += p;
            }
        }
    }
    g
}

/// G version 3: every item gets the time-block effect (t+1)/T.
pub fn g3(jt: usize, t: usize, n_times: usize) -> Array1<f64> {
    Array1::from_elem(jt, (t as f64 + 1.0) / n_times as f64)
}

/// Log-likelihood of one subject's observed latencies for one block.
///
/// `log L_j ~ Normal(gamma_j - tau - phi * g_j, (1/a_j)^2)` where `a` is the
/// item time-discrimination and `gamma` the time intensity. NaN latencies
/// are treated as missing and skipped; non-positive latencies have zero
/// density.
pub fn latency_log_likelihood(
    g: ArrayView1<f64>,
    latencies: ArrayView1<f64>,
    rt_disc: ArrayView1<f64>,
    rt_intensity: ArrayView1<f64>,
    tau: f64,
    phi: f64,
) -> f64 {
    let mut ll = 0.0;
    for j in 0..latencies.len() {
        let lat = latencies[j];
        if lat.is_nan() {
            continue;
        }
        if lat <= 0.0 || rt_disc[j] <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let mean = rt_intensity[j] - tau - phi * g[j];
        let sd = 1.0 / rt_disc[j];
        // log-Normal density over the observed latency, Jacobian included
        ll += log_normal_density(lat.ln(), mean, sd * sd) - lat.ln();
    }
    ll
}

/// Simulate one subject's latencies for one block: log-latencies are drawn
/// from the model Normal and exponentiated.
pub fn simulate_latency_row<R: Rng>(
    g: ArrayView1<f64>,
    rt_disc: ArrayView1<f64>,
    rt_intensity: ArrayView1<f64>,
    tau: f64,
    phi: f64,
    rng: &mut R,
) -> Array1<f64> {
    Array1::from_iter((0..g.len()).map(|j| {
        let mean = rt_intensity[j] - tau - phi * g[j];
        let normal = Normal::new(mean, 1.0 / rt_disc[j]).unwrap();
        normal.sample(rng).exp()
    }))
}
