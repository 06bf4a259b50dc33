//! Errors surfaced by the summarization and fit pipelines.

use thiserror::Error;

/// Errors detected before any per-draw work begins.
///
/// Degenerate probabilities encountered *inside* the per-draw loops are not
/// errors; they propagate arithmetically as `-inf` log-likelihoods.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The model identifier is not one of the six supported variants.
    #[error("unknown model '{name}'")]
    UnknownModel { name: String },
    /// The draw set lacks a field required by the selected model.
    #[error("draw set is missing required field '{name}'")]
    MissingParameter { name: String },
    /// An input array has a shape inconsistent with the declared N, Jt, K, T.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// The draw set contains zero posterior draws.
    #[error("draw set contains zero posterior draws")]
    EmptyDrawSet,
    /// A codec input or selector is outside its documented range.
    #[error("contract violation: {0}")]
    Contract(String),
}

pub type Result<T> = std::result::Result<T, Error>;
