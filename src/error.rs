//! Error types of the FastICA estimator
//!

use linfa_linalg::LinalgError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FastIcaError>;

/// An error when configuring or fitting the FastICA algorithm
///
/// Non-convergence of a component is not an error, see
/// [`ComponentReport`](crate::fast_ica::ComponentReport).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FastIcaError {
    /// The contrast function name is not one of `logcosh`, `exp` or `kurtosis`
    #[error("unsupported contrast function `{0}`")]
    UnsupportedContrastFunction(String),
    /// The distance metric name is unknown
    #[error("unsupported distance metric `{0}`")]
    UnsupportedMetric(String),
    /// The covariance of the centered mixtures cannot be inverted
    #[error("covariance matrix is singular (smallest eigenvalue {min_eigenvalue:e}), a mixture may be constant or linearly dependent")]
    SingularCovariance { min_eigenvalue: f64 },
    /// When there are no mixtures or no samples in the provided matrix
    #[error("mixture matrix must contain at least one mixture and one sample")]
    NotEnoughSamples,
    /// Whitening needs at least as many samples as mixtures
    #[error("{nsamples} samples are not enough to whiten {nmixtures} mixtures")]
    TooFewSamples { nsamples: usize, nmixtures: usize },
    #[error("mixture matrix contains NaN or infinite values")]
    NonFinite,
    #[error("max_iter must be at least one")]
    InvalidMaxIter,
    #[error("tolerance should be non-negative and finite but is {0}")]
    InvalidTolerance(f32),
    /// The tuning constant of [`ContrastFunction::Logcosh`](crate::ContrastFunction::Logcosh)
    #[error("alpha must be between 1 and 2 inclusive, got {0}")]
    InvalidAlpha(f64),
    /// New data does not have the layout the model was fitted on
    #[error("expected {expected} mixtures, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    /// Errors encountered during linear algebra operations
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}
