//! Item-response models: DINA, rRUM, and NIDA.
//!
//! All log-likelihoods return `-inf` when an implied probability is
//! non-positive; this propagates arithmetically as a modeling signal and is
//! never raised as an error.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Success probability of one DINA item given its ideal response.
#[inline]
fn dina_prob(ideal: f64, slip: f64, guess: f64) -> f64 {
    if ideal > 0.5 {
        1.0 - slip
    } else {
        guess
    }
}

/// Success probability of one rRUM item: the baseline probability penalized
/// once per required-but-unmastered skill.
#[inline]
fn rrum_prob(
    profile: ArrayView1<f64>,
    pi_star: f64,
    r_star_row: ArrayView1<f64>,
    q_row: ArrayView1<f64>,
) -> f64 {
    let mut p = pi_star;
    for k in 0..profile.len() {
        if q_row[k] > 0.5 && profile[k] < 0.5 {
            p *= r_star_row[k];
        }
    }
    p
}

/// Success probability of one NIDA item: skill-indexed slip/guess combined
/// multiplicatively over the item's required skills.
#[inline]
fn nida_prob(
    profile: ArrayView1<f64>,
    slip: ArrayView1<f64>,
    guess: ArrayView1<f64>,
    q_row: ArrayView1<f64>,
) -> f64 {
    let mut p = 1.0;
    for k in 0..profile.len() {
        if q_row[k] > 0.5 {
            p *= if profile[k] > 0.5 {
                1.0 - slip[k]
            } else {
                guess[k]
            };
        }
    }
    p
}

#[inline]
fn bernoulli_log_term(p: f64, y: f64) -> f64 {
    let term = if y > 0.5 { p } else { 1.0 - p };
    if term <= 0.0 {
        f64::NEG_INFINITY
    } else {
        term.ln()
    }
}

/// DINA log-likelihood of one subject's responses to one block.
///
/// `eta_col` is the block's ideal-response column for the subject's class;
/// `slip`/`guess` are the block's item parameters.
pub fn dina_log_likelihood(
    eta_col: ArrayView1<f64>,
    responses: ArrayView1<f64>,
    slip: ArrayView1<f64>,
    guess: ArrayView1<f64>,
) -> f64 {
    let mut ll = 0.0;
    for j in 0..responses.len() {
        let p = dina_prob(eta_col[j], slip[j], guess[j]);
        ll += bernoulli_log_term(p, responses[j]);
    }
    ll
}

/// rRUM log-likelihood of one subject's responses to one block.
pub fn rrum_log_likelihood(
    profile: ArrayView1<f64>,
    responses: ArrayView1<f64>,
    pi_star: ArrayView1<f64>,
    r_star: ArrayView2<f64>,
    q: ArrayView2<f64>,
) -> f64 {
    let mut ll = 0.0;
    for j in 0..responses.len() {
        let p = rrum_prob(profile, pi_star[j], r_star.row(j), q.row(j));
        ll += bernoulli_log_term(p, responses[j]);
    }
    ll
}

/// NIDA log-likelihood of one subject's responses to one block.
pub fn nida_log_likelihood(
    profile: ArrayView1<f64>,
    responses: ArrayView1<f64>,
    slip: ArrayView1<f64>,
    guess: ArrayView1<f64>,
    q: ArrayView2<f64>,
) -> f64 {
    let mut ll = 0.0;
    for j in 0..responses.len() {
        let p = nida_prob(profile, slip, guess, q.row(j));
        ll += bernoulli_log_term(p, responses[j]);
    }
    ll
}

/// Simulate one subject's DINA responses to one block.
pub fn simulate_dina_row<R: Rng>(
    eta_col: ArrayView1<f64>,
    slip: ArrayView1<f64>,
    guess: ArrayView1<f64>,
    rng: &mut R,
) -> Array1<f64> {
    let uniform = Uniform::new(0.0f64, 1.0).unwrap();
    Array1::from_iter((0..eta_col.len()).map(|j| {
        let p = dina_prob(eta_col[j], slip[j], guess[j]);
        f64::from(uniform.sample(rng) < p)
    }))
}

/// Simulate one subject's rRUM responses to one block.
pub fn simulate_rrum_row<R: Rng>(
    profile: ArrayView1<f64>,
    pi_star: ArrayView1<f64>,
    r_star: ArrayView2<f64>,
    q: ArrayView2<f64>,
    rng: &mut R,
) -> Array1<f64> {
    let uniform = Uniform::new(0.0f64, 1.0).unwrap();
    Array1::from_iter((0..pi_star.len()).map(|j| {
        let p = rrum_prob(profile, pi_star[j], r_star.row(j), q.row(j));
        f64::from(uniform.sample(rng) < p)
    }))
}

/// Simulate one subject's NIDA responses to one block.
pub fn simulate_nida_row<R: Rng>(
    profile: ArrayView1<f64>,
    slip: ArrayView1<f64>,
    guess: ArrayView1<f64>,
    q: ArrayView2<f64>,
    rng: &mut R,
) -> Array1<f64> {
    let uniform = Uniform::new(0.0f64, 1.0).unwrap();
    Array1::from_iter((0..q.nrows()).map(|j| {
        let p = nida_prob(profile, slip, guess, q.row(j));
        f64::from(uniform.sample(rng) < p)
    }))
}
