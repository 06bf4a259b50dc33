//! Transition models over skill-mastery profiles.
//!
//! All variants assume monotone learning: a mastered skill stays mastered,
//! and a transition that loses a skill has probability zero (`-inf` on the
//! log scale). No transition term exists at the final time point; callers
//! stop at t = T-2.

use ndarray::{ArrayView1, ArrayView2};

use crate::utils::sigmoid;

/// Higher-order transition log-probability between consecutive profiles.
///
/// Acquisition of a not-yet-mastered skill follows a logistic function of the
/// subject's learning ability `theta`, the number of already-mastered skills,
/// and the time index:
/// `p = sigmoid(lambda0 + lambda1*theta + lambda2*sum(prev) + lambda3*t)`.
/// A skill that no item administered up to and including time block t+1
/// requires (per the subject's `q_examinee` map, stacked in administered
/// order) cannot be acquired. Shared by the separate- and joint-speed
/// variants; they differ only in the joint-prior deviance term.
pub fn higher_order_log_likelihood(
    prev: ArrayView1<f64>,
    next: ArrayView1<f64>,
    lambdas: ArrayView1<f64>,
    theta: f64,
    q_examinee: ArrayView2<f64>,
    jt: usize,
    t: usize,
) -> f64 {
    let k = prev.len();
    let n_administered = ((t + 2) * jt).min(q_examinee.nrows());
    let sum_prev: f64 = prev.iter().sum();
    let mut ll = 0.0;
    for kk in 0..k {
        if prev[kk] > 0.5 {
            if next[kk] < 0.5 {
                return f64::NEG_INFINITY;
            }
            continue;
        }
        let required = (0..n_administered).any(|j| q_examinee[[j, kk]] > 0.5);
        let p = if required {
            sigmoid(lambdas[0] + lambdas[1] * theta + lambdas[2] * sum_prev + lambdas[3] * t as f64)
        } else {
            0.0
        };
        let term = if next[kk] > 0.5 { p } else { 1.0 - p };
        if term <= 0.0 {
            return f64::NEG_INFINITY;
        }
        ll += term.ln();
    }
    ll
}

/// Independent per-skill transition log-probability under a reachability
/// matrix.
///
/// Skill k may be acquired with probability `taus[k]` only when every
/// prerequisite of k (`reach[[k, kk]] == 1`, kk != k) is already mastered in
/// `prev`; otherwise acquisition is impossible.
pub fn independent_log_likelihood(
    prev: ArrayView1<f64>,
    next: ArrayView1<f64>,
    taus: ArrayView1<f64>,
    reach: ArrayView2<f64>,
) -> f64 {
    let k = prev.len();
    let mut ll = 0.0;
    for kk in 0..k {
        if prev[kk] > 0.5 {
            if next[kk] < 0.5 {
                return f64::NEG_INFINITY;
            }
            continue;
        }
        let reachable = (0..k).all(|pre| pre == kk || reach[[kk, pre]] < 0.5 || prev[pre] > 0.5);
        let p = if reachable { taus[kk] } else { 0.0 };
        let term = if next[kk] > 0.5 { p } else { 1.0 - p };
        if term <= 0.0 {
            return f64::NEG_INFINITY;
        }
        ll += term.ln();
    }
    ll
}

/// First-order hidden Markov transition log-probability: a direct lookup in
/// the draw's 2^K x 2^K class-transition matrix.
#[inline]
pub fn fohm_log_likelihood(prev_class: usize, next_class: usize, omega: ArrayView2<f64>) -> f64 {
    let p = omega[[prev_class, next_class]];
    if p <= 0.0 {
        f64::NEG_INFINITY
    } else {
        p.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn lambdas() -> ndarray::Array1<f64> {
        array![-1.0, 0.5, 0.2, 0.1]
    }

    #[test]
    fn higher_order_forbids_forgetting() {
        let q = Array2::ones((4, 2));
        let ll = higher_order_log_likelihood(
            array![1.0, 0.0].view(),
            array![0.0, 0.0].view(),
            lambdas().view(),
            0.3,
            q.view(),
            2,
            0,
        );
        assert_eq!(ll, f64::NEG_INFINITY);
    }

    #[test]
    fn higher_order_matches_logistic_form() {
        let q = Array2::ones((4, 2));
        let theta = 0.3;
        let t = 0usize;
        // prev = (1, 0): skill 1 transitions with p = sigmoid(l0 + l1*theta + l2*1 + l3*0)
        let p = sigmoid(-1.0 + 0.5 * theta + 0.2);
        let ll = higher_order_log_likelihood(
            array![1.0, 0.0].view(),
            array![1.0, 1.0].view(),
            lambdas().view(),
            theta,
            q.view(),
            2,
            t,
        );
        assert_relative_eq!(ll, p.ln(), epsilon = 1e-12);
        let ll_stay = higher_order_log_likelihood(
            array![1.0, 0.0].view(),
            array![1.0, 0.0].view(),
            lambdas().view(),
            theta,
            q.view(),
            2,
            t,
        );
        assert_relative_eq!(ll_stay, (1.0 - p).ln(), epsilon = 1e-12);
    }

    #[test]
    fn higher_order_blocks_unrequired_skills() {
        // no administered item requires skill 1
        let q = array![[1.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 0.0]];
        let acquire = higher_order_log_likelihood(
            array![0.0, 0.0].view(),
            array![0.0, 1.0].view(),
            lambdas().view(),
            0.0,
            q.view(),
            2,
            0,
        );
        assert_eq!(acquire, f64::NEG_INFINITY);
        // staying unmastered is certain for that skill
        let p0 = sigmoid(-1.0);
        let stay = higher_order_log_likelihood(
            array![0.0, 0.0].view(),
            array![1.0, 0.0].view(),
            lambdas().view(),
            0.0,
            q.view(),
            2,
            0,
        );
        assert_relative_eq!(stay, p0.ln(), epsilon = 1e-12);
    }

    #[test]
    fn independent_requires_prerequisites() {
        // skill 1 requires skill 0
        let reach = array![[0.0, 0.0], [1.0, 0.0]];
        let taus = array![0.4, 0.6];
        let blocked = independent_log_likelihood(
            array![0.0, 0.0].view(),
            array![0.0, 1.0].view(),
            taus.view(),
            reach.view(),
        );
        assert_eq!(blocked, f64::NEG_INFINITY);
        let open = independent_log_likelihood(
            array![1.0, 0.0].view(),
            array![1.0, 1.0].view(),
            taus.view(),
            reach.view(),
        );
        assert_relative_eq!(open, (0.6f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn fohm_is_a_matrix_lookup() {
        let omega = array![[0.7, 0.3], [0.0, 1.0]];
        assert_relative_eq!(fohm_log_likelihood(0, 1, omega.view()), (0.3f64).ln());
        assert_eq!(fohm_log_likelihood(1, 0, omega.view()), f64::NEG_INFINITY);
    }
}
