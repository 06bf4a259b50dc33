//! Point estimates of latent trajectories and continuous parameters.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3};

use crate::draws::{DrawSet, Model};
use crate::error::{Error, Result};
use crate::trajectory::{decode_trajectories, Estimator};

/// Posterior mean of one continuous parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamEstimate {
    Scalar(f64),
    Vector(Array1<f64>),
    Matrix(Array2<f64>),
}

/// Point-estimate bundle for one fitted model.
#[derive(Debug, Clone)]
pub struct PointEstimates {
    /// Decoded attribute trajectory estimate, N x K x T.
    pub alphas: Array3<f64>,
    /// Posterior mean of the initial class probabilities, length 2^K.
    pub pis: Array1<f64>,
    /// Posterior means of the model-specific continuous parameters, keyed by
    /// draw-set field name.
    pub params: BTreeMap<String, ParamEstimate>,
}

/// Vector-, scalar-, and matrix-valued parameter fields averaged for each
/// model variant. The table is fixed; see the module tests.
fn parameter_fields(
    model: Model,
) -> (
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
) {
    match model {
        Model::DinaHo => (&["ss", "gs", "thetas", "lambdas"], &[], &[]),
        Model::DinaHoRtSep => (
            &["ss", "gs", "as", "gammas", "thetas", "taus", "lambdas"],
            &["phis", "tauvar"],
            &[],
        ),
        Model::DinaHoRtJoint => (
            &["ss", "gs", "as", "gammas", "thetas", "taus", "lambdas"],
            &["phis"],
            &["sigs"],
        ),
        Model::RrumIndept => (&["pi_stars", "taus"], &[], &["r_stars"]),
        Model::NidaIndept => (&["ss", "gs", "taus"], &[], &[]),
        Model::DinaFohm => (&["ss", "gs"], &[], &["omegas"]),
    }
}

/// Collapse a draw set into EAPs of all continuous parameters and an EAP or
/// MAP decoding of each subject's trajectory.
pub fn point_estimates(
    draws: &DrawSet,
    model: Model,
    k: usize,
    t: usize,
    alpha_eap: bool,
) -> Result<PointEstimates> {
    let traject = draws.trajectories()?;
    if traject.ncols() == 0 {
        return Err(Error::EmptyDrawSet);
    }
    let estimator = if alpha_eap { Estimator::Eap } else { Estimator::Map };
    let alphas = decode_trajectories(traject, k, t, estimator)?;
    let pis = draws.eap_vector("pis")?;

    let (vectors, scalars, matrices) = parameter_fields(model);
    let mut params = BTreeMap::new();
    for &name in vectors {
        params.insert(name.to_string(), ParamEstimate::Vector(draws.eap_vector(name)?));
    }
    for &name in scalars {
        params.insert(name.to_string(), ParamEstimate::Scalar(draws.eap_scalar(name)?));
    }
    for &name in matrices {
        params.insert(name.to_string(), ParamEstimate::Matrix(draws.eap_matrix(name)?));
    }

    Ok(PointEstimates { alphas, pis, params })
}
