//! Posterior draw container and the supported model variants.

use std::collections::BTreeMap;
use std::str::FromStr;

use ndarray::{Array1, Array2, Array3, Axis};

use crate::error::{Error, Result};

/// The six hidden Markov CDM variants the engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// Higher-order transitions, DINA responses.
    DinaHo,
    /// Higher-order transitions, DINA responses, log-Normal response times,
    /// separately modeled latent speed.
    DinaHoRtSep,
    /// Higher-order transitions, DINA responses, log-Normal response times,
    /// speed jointly modeled with learning ability.
    DinaHoRtJoint,
    /// Independent per-skill transitions with rRUM responses.
    RrumIndept,
    /// Independent per-skill transitions with NIDA responses.
    NidaIndept,
    /// First-order hidden Markov class transitions with DINA responses.
    DinaFohm,
}

impl Model {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "DINA_HO" => Ok(Model::DinaHo),
            "DINA_HO_RT_sep" => Ok(Model::DinaHoRtSep),
            "DINA_HO_RT_joint" => Ok(Model::DinaHoRtJoint),
            "rRUM_indept" => Ok(Model::RrumIndept),
            "NIDA_indept" => Ok(Model::NidaIndept),
            "DINA_FOHM" => Ok(Model::DinaFohm),
            _ => Err(Error::UnknownModel {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Model::DinaHo => "DINA_HO",
            Model::DinaHoRtSep => "DINA_HO_RT_sep",
            Model::DinaHoRtJoint => "DINA_HO_RT_joint",
            Model::RrumIndept => "rRUM_indept",
            Model::NidaIndept => "NIDA_indept",
            Model::DinaFohm => "DINA_FOHM",
        }
    }

    /// Whether the variant carries a latency sub-model.
    pub fn has_response_time(&self) -> bool {
        matches!(self, Model::DinaHoRtSep | Model::DinaHoRtJoint)
    }

    /// Whether transitions are driven by the higher-order logistic form and
    /// a per-subject required-skill map.
    pub fn has_higher_order_transitions(&self) -> bool {
        matches!(
            self,
            Model::DinaHo | Model::DinaHoRtSep | Model::DinaHoRtJoint
        )
    }

    /// Whether transitions are independent per skill under a reachability
    /// matrix.
    pub fn has_independent_transitions(&self) -> bool {
        matches!(self, Model::RrumIndept | Model::NidaIndept)
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Model::from_name(s)
    }
}

/// Read-only bundle of posterior draws for one fitted model.
///
/// Vector-valued parameters are stored as (parameter length x n_its)
/// matrices; scalar parameters as 1 x n_its matrices; matrix-valued
/// parameters (`r_stars`, `omegas`, `sigs`) as cubes with the draw axis
/// last. Every draw set carries `trajectories` (N x n_its) and `pis`
/// (2^K x n_its).
#[derive(Debug, Clone, Default)]
pub struct DrawSet {
    mats: BTreeMap<String, Array2<f64>>,
    cubes: BTreeMap<String, Array3<f64>>,
}

impl DrawSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_matrix(&mut self, name: impl Into<String>, values: Array2<f64>) {
        self.mats.insert(name.into(), values);
    }

    pub fn insert_cube(&mut self, name: impl Into<String>, values: Array3<f64>) {
        self.cubes.insert(name.into(), values);
    }

    pub fn matrix(&self, name: &str) -> Result<&Array2<f64>> {
        self.mats.get(name).ok_or_else(|| Error::MissingParameter {
            name: name.to_string(),
        })
    }

    pub fn cube(&self, name: &str) -> Result<&Array3<f64>> {
        self.cubes.get(name).ok_or_else(|| Error::MissingParameter {
            name: name.to_string(),
        })
    }

    pub fn trajectories(&self) -> Result<&Array2<f64>> {
        self.matrix("trajectories")
    }

    pub fn pis(&self) -> Result<&Array2<f64>> {
        self.matrix("pis")
    }

    /// Number of posterior draws, taken from the trajectory matrix.
    pub fn n_draws(&self) -> Result<usize> {
        Ok(self.trajectories()?.ncols())
    }

    /// Posterior mean of a vector-valued parameter across the draw axis.
    pub fn eap_vector(&self, name: &str) -> Result<Array1<f64>> {
        let mat = self.matrix(name)?;
        if mat.ncols() == 0 {
            return Err(Error::EmptyDrawSet);
        }
        Ok(mat.mean_axis(Axis(1)).expect("non-empty draw axis"))
    }

    /// Posterior mean of a scalar parameter stored as a 1 x n_its matrix.
    pub fn eap_scalar(&self, name: &str) -> Result<f64> {
        let v = self.eap_vector(name)?;
        Ok(v[0])
    }

    /// Posterior mean of a matrix-valued parameter across the draw axis.
    pub fn eap_matrix(&self, name: &str) -> Result<Array2<f64>> {
        let cube = self.cube(name)?;
        if cube.dim().2 == 0 {
            return Err(Error::EmptyDrawSet);
        }
        Ok(cube.mean_axis(Axis(2)).expect("non-empty draw axis"))
    }
}
