//! Posterior summarization and model evaluation for hidden Markov cognitive
//! diagnosis models.
//!
//! Works from the saved output of an MCMC sampler for six learning-model
//! variants and provides:
//! - Bijective encoding of binary skill trajectories as integer codes
//! - EAP and MAP decoding of trajectory draws into attribute cubes
//! - Point estimates (posterior means) of all continuous parameters
//! - DINA, rRUM, and NIDA item-response likelihoods and simulators
//! - Higher-order, independent per-skill, and first-order hidden Markov
//!   transition likelihoods
//! - A log-Normal response-time model with three fluency-covariate versions
//! - Decomposed DIC tables and posterior-predictive checks (item means,
//!   odds ratios, total scores and times)

pub mod bijection;
pub mod design;
pub mod draws;
pub mod error;
pub mod fit;
pub mod point_estimates;
pub mod response;
pub mod response_time;
pub mod trajectory;
pub mod transition;
pub mod utils;

pub use design::TestDesign;
pub use draws::{DrawSet, Model};
pub use error::{Error, Result};
pub use fit::{learning_fit, FitData, LearningFit};
pub use point_estimates::{point_estimates, PointEstimates};
pub use response_time::GVersion;
pub use trajectory::Estimator;
