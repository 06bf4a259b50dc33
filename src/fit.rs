//! Model-fit statistics: DIC decomposition and posterior-predictive checks.
//!
//! The per-draw pass is embarrassingly parallel across draws and runs under
//! rayon; results are collected and reduced sequentially, so floating-point
//! summation order (and hence the last few bits of the totals) is not
//! guaranteed identical between parallel and serial execution. Simulation
//! randomness is reproducible for a fixed seed: each (draw, subject) pair
//! owns an independently seeded RNG stream.

use ndarray::{s, Array1, Array2, Array3, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::bijection::class_index;
use crate::design::{eta_tables, skill_incidence, TestDesign};
use crate::draws::{DrawSet, Model};
use crate::error::{Error, Result};
use crate::response;
use crate::response_time::{self, GVersion};
use crate::trajectory::{self, Estimator};
use crate::transition;
use crate::utils::{log_bivariate_normal_density, log_normal_density};

pub const DIC_ROW_LABELS: [&str; 3] = ["D_bar", "D_hat", "DIC"];
pub const DIC_COL_LABELS: [&str; 5] =
    ["Transition", "Response_Time", "Response", "Joint", "Total"];

/// Inputs shared by the DIC and posterior-predictive passes.
#[derive(Debug, Clone, Copy)]
pub struct FitData<'a> {
    /// Observed responses, N x Jt x T (by time point).
    pub responses: &'a Array3<f64>,
    /// Observed latencies, N x Jt x T; required by the response-time models.
    pub latencies: Option<&'a Array3<f64>>,
    /// Q-matrices, Jt x K x blocks (one slice per block).
    pub qs: &'a Array3<f64>,
    pub design: &'a TestDesign,
    /// Per-subject stacked Q-matrix in administered order, (Jt*T) x K;
    /// required by the higher-order transition models.
    pub q_examinee: Option<&'a [Array2<f64>]>,
    /// Fluency covariate version; required by the response-time models.
    pub g_version: Option<GVersion>,
    /// Skill reachability matrix, K x K; required by the independent
    /// transition models.
    pub reachability: Option<&'a Array2<f64>>,
}

/// The 3 x 5 deviance table. Rows are `D_bar` (mean deviance across draws),
/// `D_hat` (deviance at the point estimate), and `DIC = 2*D_bar - D_hat`;
/// columns decompose the deviance into transition, response-time, response,
/// and joint-prior components plus their total. The response-time column is
/// NaN for models without a latency sub-model.
#[derive(Debug, Clone)]
pub struct DicTable {
    pub values: Array2<f64>,
}

impl DicTable {
    /// Look up a cell by its row/column label.
    pub fn value(&self, row: &str, col: &str) -> Option<f64> {
        let r = DIC_ROW_LABELS.iter().position(|&l| l == row)?;
        let c = DIC_COL_LABELS.iter().position(|&l| l == col)?;
        Some(self.values[[r, c]])
    }
}

/// Posterior-predictive summaries in test-taker-observed item order.
#[derive(Debug, Clone)]
pub struct PosteriorPredictive {
    /// Simulated item means averaged over draws, length Jt*T.
    pub item_means: Array1<f64>,
    /// Item-pair odds ratios per draw, (Jt*T) x (Jt*T) x n_its, symmetric
    /// with a NaN diagonal.
    pub odds_ratios: Array3<f64>,
    /// Per-subject total scores per time point and draw, N x T x n_its.
    pub total_scores: Array3<f64>,
    /// Simulated latency item means averaged over draws (response-time
    /// models only).
    pub rt_item_means: Option<Array1<f64>>,
    /// Per-subject total response times, N x T x n_its (response-time
    /// models only).
    pub total_times: Option<Array3<f64>>,
}

/// Result of [`learning_fit`].
#[derive(Debug, Clone)]
pub struct LearningFit {
    pub dic: DicTable,
    pub posterior_predictive: PosteriorPredictive,
}

/// Item-pair odds ratios of a binary N x J matrix.
///
/// For each pair, `OR = (n00 * n11) / (n01 * n10)` from the 2x2 joint
/// response table. A zero cell yields `inf` (or NaN when the numerator is
/// also zero); these are reported as computed, never suppressed. The
/// diagonal is left NaN.
pub fn odds_ratio_matrix(y: &Array2<f64>) -> Array2<f64> {
    let (n, j) = y.dim();
    let mut or = Array2::from_elem((j, j), f64::NAN);
    for j1 in 0..j {
        for j2 in (j1 + 1)..j {
            let (mut n00, mut n01, mut n10, mut n11) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
            for i in 0..n {
                match (y[[i, j1]] > 0.5, y[[i, j2]] > 0.5) {
                    (false, false) => n00 += 1.0,
                    (false, true) => n01 += 1.0,
                    (true, false) => n10 += 1.0,
                    (true, true) => n11 += 1.0,
                }
            }
            let val = (n00 * n11) / (n01 * n10);
            or[[j1, j2]] = val;
            or[[j2, j1]] = val;
        }
    }
    or
}

#[derive(Debug, Clone, Copy)]
struct Dims {
    n: usize,
    jt: usize,
    k: usize,
    t: usize,
    n_its: usize,
}

/// Parameter bundle for one draw (or for the point estimate), dispatched by
/// variant once at extraction.
enum FamilyParams {
    /// Slip/guess per item, stacked by block (Jt*T).
    Dina { slip: Array1<f64>, guess: Array1<f64> },
    /// Baseline probability per item and penalty matrix, stacked by block.
    Rrum { pi_star: Array1<f64>, r_star: Array2<f64> },
    /// Skill-indexed slip/guess (length K).
    Nida { slip: Array1<f64>, guess: Array1<f64> },
}

enum TransParams {
    HigherOrder { lambdas: Array1<f64>, thetas: Array1<f64> },
    Independent { taus: Array1<f64> },
    Fohm { omega: Array2<f64> },
}

/// Latent-speed contribution to the joint-prior deviance term.
enum SpeedPrior {
    None,
    Separate { taus: Array1<f64>, tauvar: f64 },
    Joint { thetas: Array1<f64>, taus: Array1<f64>, sig: Array2<f64> },
}

struct RtParams {
    disc: Array1<f64>,
    intensity: Array1<f64>,
    taus: Array1<f64>,
    phi: f64,
}

struct DrawParams {
    pis: Array1<f64>,
    family: FamilyParams,
    transition: TransParams,
    speed: SpeedPrior,
    rt: Option<RtParams>,
}

#[derive(Debug, Clone, Copy)]
enum Sel {
    Draw(usize),
    Eap,
}

fn column(draws: &DrawSet, name: &str, sel: Sel) -> Result<Array1<f64>> {
    match sel {
        Sel::Draw(tt) => Ok(draws.matrix(name)?.column(tt).to_owned()),
        Sel::Eap => draws.eap_vector(name),
    }
}

fn scalar(draws: &DrawSet, name: &str, sel: Sel) -> Result<f64> {
    Ok(column(draws, name, sel)?[0])
}

fn matrix(draws: &DrawSet, name: &str, sel: Sel) -> Result<Array2<f64>> {
    match sel {
        Sel::Draw(tt) => Ok(draws.cube(name)?.index_axis(Axis(2), tt).to_owned()),
        Sel::Eap => draws.eap_matrix(name),
    }
}

fn extract(model: Model, draws: &DrawSet, sel: Sel) -> Result<DrawParams> {
    let pis = column(draws, "pis", sel)?;
    let family = match model {
        Model::RrumIndept => FamilyParams::Rrum {
            pi_star: column(draws, "pi_stars", sel)?,
            r_star: matrix(draws, "r_stars", sel)?,
        },
        Model::NidaIndept => FamilyParams::Nida {
            slip: column(draws, "ss", sel)?,
            guess: column(draws, "gs", sel)?,
        },
        _ => FamilyParams::Dina {
            slip: column(draws, "ss", sel)?,
            guess: column(draws, "gs", sel)?,
        },
    };
    let transition = if model.has_higher_order_transitions() {
        TransParams::HigherOrder {
            lambdas: column(draws, "lambdas", sel)?,
            thetas: column(draws, "thetas", sel)?,
        }
    } else if model.has_independent_transitions() {
        TransParams::Independent {
            taus: column(draws, "taus", sel)?,
        }
    } else {
        TransParams::Fohm {
            omega: matrix(draws, "omegas", sel)?,
        }
    };
    let speed = match model {
        Model::DinaHoRtSep => SpeedPrior::Separate {
            taus: column(draws, "taus", sel)?,
            tauvar: scalar(draws, "tauvar", sel)?,
        },
        Model::DinaHoRtJoint => SpeedPrior::Joint {
            thetas: column(draws, "thetas", sel)?,
            taus: column(draws, "taus", sel)?,
            sig: matrix(draws, "sigs", sel)?,
        },
        _ => SpeedPrior::None,
    };
    let rt = if model.has_response_time() {
        Some(RtParams {
            disc: column(draws, "as", sel)?,
            intensity: column(draws, "gammas", sel)?,
            taus: column(draws, "taus", sel)?,
            phi: scalar(draws, "phis", sel)?,
        })
    } else {
        None
    };
    Ok(DrawParams {
        pis,
        family,
        transition,
        speed,
        rt,
    })
}

fn check_matrix(draws: &DrawSet, name: &str, rows: usize, n_its: usize) -> Result<()> {
    let mat = draws.matrix(name)?;
    if mat.nrows() != rows || mat.ncols() != n_its {
        return Err(Error::DimensionMismatch(format!(
            "field '{name}' is {}x{}, expected {rows}x{n_its}",
            mat.nrows(),
            mat.ncols()
        )));
    }
    Ok(())
}

fn check_cube(draws: &DrawSet, name: &str, rows: usize, cols: usize, n_its: usize) -> Result<()> {
    let cube = draws.cube(name)?;
    if cube.dim() != (rows, cols, n_its) {
        return Err(Error::DimensionMismatch(format!(
            "field '{name}' is {:?}, expected ({rows}, {cols}, {n_its})",
            cube.dim()
        )));
    }
    Ok(())
}

/// Eager validation of every shape and per-model requirement, before any
/// per-draw work.
fn validate(model: Model, draws: &DrawSet, data: &FitData) -> Result<Dims> {
    let (jt, k, n_blocks) = data.qs.dim();
    let t = data.design.n_times();
    let n = data.design.n_subjects();
    if n_blocks != t {
        return Err(Error::DimensionMismatch(format!(
            "{n_blocks} Q-matrix blocks for {t} time points"
        )));
    }
    if data.responses.dim() != (n, jt, t) {
        return Err(Error::DimensionMismatch(format!(
            "responses are {:?}, expected ({n}, {jt}, {t})",
            data.responses.dim()
        )));
    }

    let traject = draws.trajectories()?;
    let n_its = traject.ncols();
    if n_its == 0 {
        return Err(Error::EmptyDrawSet);
    }
    if traject.nrows() != n {
        return Err(Error::DimensionMismatch(format!(
            "trajectories have {} rows for {n} subjects",
            traject.nrows()
        )));
    }
    let n_classes = 1usize << k;
    check_matrix(draws, "pis", n_classes, n_its)?;

    match model {
        Model::DinaHo => {
            check_matrix(draws, "ss", jt * t, n_its)?;
            check_matrix(draws, "gs", jt * t, n_its)?;
            check_matrix(draws, "thetas", n, n_its)?;
            check_matrix(draws, "lambdas", 4, n_its)?;
        }
        Model::DinaHoRtSep => {
            check_matrix(draws, "ss", jt * t, n_its)?;
            check_matrix(draws, "gs", jt * t, n_its)?;
            check_matrix(draws, "as", jt * t, n_its)?;
            check_matrix(draws, "gammas", jt * t, n_its)?;
            check_matrix(draws, "thetas", n, n_its)?;
            check_matrix(draws, "taus", n, n_its)?;
            check_matrix(draws, "lambdas", 4, n_its)?;
            check_matrix(draws, "phis", 1, n_its)?;
            check_matrix(draws, "tauvar", 1, n_its)?;
        }
        Model::DinaHoRtJoint => {
            check_matrix(draws, "ss", jt * t, n_its)?;
            check_matrix(draws, "gs", jt * t, n_its)?;
            check_matrix(draws, "as", jt * t, n_its)?;
            check_matrix(draws, "gammas", jt * t, n_its)?;
            check_matrix(draws, "thetas", n, n_its)?;
            check_matrix(draws, "taus", n, n_its)?;
            check_matrix(draws, "lambdas", 4, n_its)?;
            check_matrix(draws, "phis", 1, n_its)?;
            check_cube(draws, "sigs", 2, 2, n_its)?;
        }
        Model::RrumIndept => {
            check_matrix(draws, "pi_stars", jt * t, n_its)?;
            check_cube(draws, "r_stars", jt * t, k, n_its)?;
            check_matrix(draws, "taus", k, n_its)?;
        }
        Model::NidaIndept => {
            check_matrix(draws, "ss", k, n_its)?;
            check_matrix(draws, "gs", k, n_its)?;
            check_matrix(draws, "taus", k, n_its)?;
        }
        Model::DinaFohm => {
            check_matrix(draws, "ss", jt * t, n_its)?;
            check_matrix(draws, "gs", jt * t, n_its)?;
            check_cube(draws, "omegas", n_classes, n_classes, n_its)?;
        }
    }

    if model.has_higher_order_transitions() {
        let q_examinee = data.q_examinee.ok_or_else(|| Error::MissingParameter {
            name: "Q_examinee".to_string(),
        })?;
        if q_examinee.len() != n {
            return Err(Error::DimensionMismatch(format!(
                "Q_examinee has {} entries for {n} subjects",
                q_examinee.len()
            )));
        }
        for (i, q_i) in q_examinee.iter().enumerate() {
            if q_i.dim() != (jt * t, k) {
                return Err(Error::DimensionMismatch(format!(
                    "Q_examinee[{i}] is {:?}, expected ({}, {k})",
                    q_i.dim(),
                    jt * t
                )));
            }
        }
    }
    if model.has_independent_transitions() {
        let reach = data.reachability.ok_or_else(|| Error::MissingParameter {
            name: "R".to_string(),
        })?;
        if reach.dim() != (k, k) {
            return Err(Error::DimensionMismatch(format!(
                "reachability matrix is {:?}, expected ({k}, {k})",
                reach.dim()
            )));
        }
    }
    if model.has_response_time() {
        let latencies = data.latencies.ok_or_else(|| Error::MissingParameter {
            name: "Latency_list".to_string(),
        })?;
        if latencies.dim() != (n, jt, t) {
            return Err(Error::DimensionMismatch(format!(
                "latencies are {:?}, expected ({n}, {jt}, {t})",
                latencies.dim()
            )));
        }
        if data.g_version.is_none() {
            return Err(Error::MissingParameter {
                name: "G_version".to_string(),
            });
        }
    }

    Ok(Dims {
        n,
        jt,
        k,
        t,
        n_its,
    })
}

/// Fluency covariate for one subject, time point, and block.
#[allow(clippy::too_many_arguments)]
fn g_vector(
    version: GVersion,
    block: usize,
    class: usize,
    alphas_i: ArrayView2<f64>,
    blocks: &[usize],
    etas: &[Array2<f64>],
    qs: &Array3<f64>,
    incidence: &Array2<f64>,
    t: usize,
    n_times: usize,
) -> Array1<f64> {
    match version {
        GVersion::One => response_time::g1(etas[block].view(), class),
        GVersion::Two => response_time::g2(
            qs.slice(s![.., .., block]),
            alphas_i,
            blocks,
            incidence.view(),
            t,
        ),
        GVersion::Three => response_time::g3(etas[block].nrows(), t, n_times),
    }
}

struct Components {
    tran: f64,
    time: f64,
    resp: f64,
    joint: f64,
}

/// The four deviance components for one parameter set and decoded attribute
/// cube, against the observed data.
fn deviance_components(
    model: Model,
    params: &DrawParams,
    alphas: &Array3<f64>,
    data: &FitData,
    etas: &[Array2<f64>],
    incidence: &Array2<f64>,
    dims: &Dims,
) -> Components {
    let Dims { n, jt, t, .. } = *dims;
    let (mut tran, mut time, mut resp, mut joint) = (0.0, 0.0, 0.0, 0.0);
    for i in 0..n {
        let alphas_i = alphas.index_axis(Axis(0), i);
        let blocks = data.design.blocks(i);
        for tt in 0..t {
            let b = blocks[tt];
            let profile = alphas_i.column(tt);
            let class = class_index(profile);
            if tt + 1 < t {
                let next = alphas_i.column(tt + 1);
                tran += match &params.transition {
                    TransParams::HigherOrder { lambdas, thetas } => {
                        let q_i = &data.q_examinee.expect("validated")[i];
                        transition::higher_order_log_likelihood(
                            profile,
                            next,
                            lambdas.view(),
                            thetas[i],
                            q_i.view(),
                            jt,
                            tt,
                        )
                    }
                    TransParams::Independent { taus } => transition::independent_log_likelihood(
                        profile,
                        next,
                        taus.view(),
                        data.reachability.expect("validated").view(),
                    ),
                    TransParams::Fohm { omega } => {
                        transition::fohm_log_likelihood(class, class_index(next), omega.view())
                    }
                };
            }
            let y = data.responses.slice(s![i, .., tt]);
            resp += match &params.family {
                FamilyParams::Dina { slip, guess } => response::dina_log_likelihood(
                    etas[b].column(class),
                    y,
                    slip.slice(s![b * jt..(b + 1) * jt]),
                    guess.slice(s![b * jt..(b + 1) * jt]),
                ),
                FamilyParams::Rrum { pi_star, r_star } => response::rrum_log_likelihood(
                    profile,
                    y,
                    pi_star.slice(s![b * jt..(b + 1) * jt]),
                    r_star.slice(s![b * jt..(b + 1) * jt, ..]),
                    qs_block(data.qs, b),
                ),
                FamilyParams::Nida { slip, guess } => response::nida_log_likelihood(
                    profile,
                    y,
                    slip.view(),
                    guess.view(),
                    qs_block(data.qs, b),
                ),
            };
            if let Some(rt) = &params.rt {
                let latencies = data.latencies.expect("validated");
                let g = g_vector(
                    data.g_version.expect("validated"),
                    b,
                    class,
                    alphas_i,
                    &blocks,
                    etas,
                    data.qs,
                    incidence,
                    tt,
                    t,
                );
                time += response_time::latency_log_likelihood(
                    g.view(),
                    latencies.slice(s![i, .., tt]),
                    rt.disc.slice(s![b * jt..(b + 1) * jt]),
                    rt.intensity.slice(s![b * jt..(b + 1) * jt]),
                    rt.taus[i],
                    rt.phi,
                );
            }
        }
        let class0 = class_index(alphas_i.column(0));
        let p0 = params.pis[class0];
        joint += if p0 <= 0.0 { f64::NEG_INFINITY } else { p0.ln() };
        joint += match &params.speed {
            SpeedPrior::None => 0.0,
            SpeedPrior::Separate { taus, tauvar } => log_normal_density(taus[i], 0.0, *tauvar),
            SpeedPrior::Joint { thetas, taus, sig } => {
                log_bivariate_normal_density(thetas[i], taus[i], &sig.view())
            }
        };
    }
    if !model.has_response_time() {
        time = f64::NAN;
    }
    Components {
        tran,
        time,
        resp,
        joint,
    }
}

fn qs_block(qs: &Array3<f64>, b: usize) -> ArrayView2<f64> {
    qs.slice(s![.., .., b])
}

struct Simulated {
    y_collapsed: Array2<f64>,
    l_collapsed: Option<Array2<f64>>,
    scores: Array2<f64>,
    times: Option<Array2<f64>>,
}

/// Simulate one draw's synthetic responses (and latencies), collapsed into
/// test-taker-observed item order. RNG consumption order per subject and
/// time point is responses first, then latencies.
#[allow(clippy::too_many_arguments)]
fn simulate_draw(
    params: &DrawParams,
    alphas: &Array3<f64>,
    data: &FitData,
    etas: &[Array2<f64>],
    incidence: &Array2<f64>,
    dims: &Dims,
    seed: u64,
    draw: usize,
) -> Simulated {
    let Dims { n, jt, t, .. } = *dims;
    let mut y_collapsed = Array2::zeros((n, jt * t));
    let mut scores = Array2::zeros((n, t));
    let has_rt = params.rt.is_some();
    let mut l_collapsed = has_rt.then(|| Array2::zeros((n, jt * t)));
    let mut times = has_rt.then(|| Array2::zeros((n, t)));

    for i in 0..n {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add((draw * n + i) as u64));
        let alphas_i = alphas.index_axis(Axis(0), i);
        let blocks = data.design.blocks(i);
        for tt in 0..t {
            let b = blocks[tt];
            let profile = alphas_i.column(tt);
            let class = class_index(profile);
            let y_sim = match &params.family {
                FamilyParams::Dina { slip, guess } => response::simulate_dina_row(
                    etas[b].column(class),
                    slip.slice(s![b * jt..(b + 1) * jt]),
                    guess.slice(s![b * jt..(b + 1) * jt]),
                    &mut rng,
                ),
                FamilyParams::Rrum { pi_star, r_star } => response::simulate_rrum_row(
                    profile,
                    pi_star.slice(s![b * jt..(b + 1) * jt]),
                    r_star.slice(s![b * jt..(b + 1) * jt, ..]),
                    qs_block(data.qs, b),
                    &mut rng,
                ),
                FamilyParams::Nida { slip, guess } => response::simulate_nida_row(
                    profile,
                    slip.view(),
                    guess.view(),
                    qs_block(data.qs, b),
                    &mut rng,
                ),
            };
            scores[[i, tt]] = y_sim.sum();
            y_collapsed
                .slice_mut(s![i, b * jt..(b + 1) * jt])
                .assign(&y_sim);
            if let Some(rt) = &params.rt {
                let g = g_vector(
                    data.g_version.expect("validated"),
                    b,
                    class,
                    alphas_i,
                    &blocks,
                    etas,
                    data.qs,
                    incidence,
                    tt,
                    t,
                );
                let l_sim = response_time::simulate_latency_row(
                    g.view(),
                    rt.disc.slice(s![b * jt..(b + 1) * jt]),
                    rt.intensity.slice(s![b * jt..(b + 1) * jt]),
                    rt.taus[i],
                    rt.phi,
                    &mut rng,
                );
                times.as_mut().expect("rt cube")[[i, tt]] = l_sim.sum();
                l_collapsed
                    .as_mut()
                    .expect("rt cube")
                    .slice_mut(s![i, b * jt..(b + 1) * jt])
                    .assign(&l_sim);
            }
        }
    }
    Simulated {
        y_collapsed,
        l_collapsed,
        scores,
        times,
    }
}

struct DrawOutput {
    components: Components,
    item_mean: Array1<f64>,
    odds_ratio: Array2<f64>,
    scores: Array2<f64>,
    rt_item_mean: Option<Array1<f64>>,
    times: Option<Array2<f64>>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute the decomposed DIC table and posterior-predictive summaries for
/// one fitted model.
///
/// The point-estimate (`D_hat`) pass always uses the joint-mode (MAP)
/// trajectory decoding and recomputes the fluency covariate from the decoded
/// point-estimate trajectories.
pub fn learning_fit(
    draws: &DrawSet,
    model: Model,
    data: &FitData,
    seed: u64,
) -> Result<LearningFit> {
    let dims = validate(model, draws, data)?;
    let Dims { n, jt, k, t, n_its } = dims;

    let traject = draws.trajectories()?;
    let codes = trajectory::checked_codes(traject, k, t)?;
    let alphas_hat = trajectory::decode_trajectories(traject, k, t, Estimator::Map)?;
    let etas = eta_tables(k, data.qs);
    let incidence = skill_incidence(data.qs);

    let outputs: Vec<DrawOutput> = (0..n_its)
        .into_par_iter()
        .map(|tt| {
            let params = extract(model, draws, Sel::Draw(tt)).expect("validated draw set");
            let alphas = trajectory::decode_draw(&codes, tt, k, t);
            let components =
                deviance_components(model, &params, &alphas, data, &etas, &incidence, &dims);
            let sim = simulate_draw(&params, &alphas, data, &etas, &incidence, &dims, seed, tt);
            let item_mean = sim
                .y_collapsed
                .mean_axis(Axis(0))
                .expect("at least one subject");
            let odds_ratio = odds_ratio_matrix(&sim.y_collapsed);
            let rt_item_mean = sim
                .l_collapsed
                .as_ref()
                .map(|l| l.mean_axis(Axis(0)).expect("at least one subject"));
            DrawOutput {
                components,
                item_mean,
                odds_ratio,
                scores: sim.scores,
                rt_item_mean,
                times: sim.times,
            }
        })
        .collect();

    // assemble posterior-predictive cubes
    let has_rt = model.has_response_time();
    let mut item_means = Array1::zeros(jt * t);
    let mut rt_item_means = has_rt.then(|| Array1::zeros(jt * t));
    let mut odds_ratios = Array3::zeros((jt * t, jt * t, n_its));
    let mut total_scores = Array3::zeros((n, t, n_its));
    let mut total_times = has_rt.then(|| Array3::zeros((n, t, n_its)));
    let mut d_tran = Vec::with_capacity(n_its);
    let mut d_time = Vec::with_capacity(n_its);
    let mut d_resp = Vec::with_capacity(n_its);
    let mut d_joint = Vec::with_capacity(n_its);
    for (tt, out) in outputs.into_iter().enumerate() {
        d_tran.push(out.components.tran);
        d_time.push(out.components.time);
        d_resp.push(out.components.resp);
        d_joint.push(out.components.joint);
        item_means = item_means + &out.item_mean / n_its as f64;
        odds_ratios.index_axis_mut(Axis(2), tt).assign(&out.odds_ratio);
        total_scores.index_axis_mut(Axis(2), tt).assign(&out.scores);
        if let (Some(acc), Some(m)) = (rt_item_means.as_mut(), out.rt_item_mean) {
            *acc = &*acc + &m / n_its as f64;
        }
        if let (Some(cube), Some(m)) = (total_times.as_mut(), out.times) {
            cube.index_axis_mut(Axis(2), tt).assign(&m);
        }
    }

    // deviance at the point estimate
    let eap_params = extract(model, draws, Sel::Eap)?;
    let hat = deviance_components(model, &eap_params, &alphas_hat, data, &etas, &incidence, &dims);

    let mut values = Array2::from_elem((3, 5), f64::NAN);
    values[[0, 0]] = -2.0 * mean(&d_tran);
    values[[0, 1]] = -2.0 * mean(&d_time);
    values[[0, 2]] = -2.0 * mean(&d_resp);
    values[[0, 3]] = -2.0 * mean(&d_joint);
    values[[1, 0]] = -2.0 * hat.tran;
    values[[1, 1]] = -2.0 * hat.time;
    values[[1, 2]] = -2.0 * hat.resp;
    values[[1, 3]] = -2.0 * hat.joint;
    for row in 0..2 {
        let mut total = values[[row, 0]] + values[[row, 2]] + values[[row, 3]];
        if has_rt {
            total += values[[row, 1]];
        }
        values[[row, 4]] = total;
    }
    for col in 0..5 {
        values[[2, col]] = 2.0 * values[[0, col]] - values[[1, col]];
    }

    Ok(LearningFit {
        dic: DicTable { values },
        posterior_predictive: PosteriorPredictive {
            item_means,
            odds_ratios,
            total_scores,
            rt_item_means,
            total_times,
        },
    })
}
