//! # Deflationary FastICA
//!
//! `fastica-deflation` estimates statistically independent sources from observed linear
//! mixtures with the fixed-point FastICA algorithm of Hyvärinen (1999). Components are
//! extracted one after another and every new estimate is decorrelated against the ones
//! already found (Gram-Schmidt deflation).
//!
//! Mixtures are passed as an `N x M` matrix: one row per observed mixture, one column per
//! sample. The result has the same layout, one estimated source per row. As for every ICA
//! method the order and the sign of the recovered rows are arbitrary.
//!
//! ## The Big Picture
//!
//! The estimator is made of four parts:
//!
//! - [`whitening`] centers the mixtures and gives them identity covariance,
//! - [`contrast`] provides the nonlinearity `g` and its derivative used in the update rule,
//! - [`distance`] provides the sign-invariant distances used to detect convergence,
//! - [`fast_ica`] runs the per-component fixed-point iteration.
//!
//! ```
//! use fastica_deflation::prelude::*;
//! use fastica_deflation::generate;
//! use ndarray::array;
//!
//! let sources = generate::stack(&[generate::sine(2000, 5.0), generate::sawtooth(2000, 7.0)]);
//! let mixtures = generate::mix(&sources, &array![[1., 1.], [0.5, 2.]]);
//!
//! let model = FastIca::params(1000).verbose(false).fit(&mixtures)?;
//! assert_eq!(model.sources().dim(), (2, 2000));
//! # Ok::<(), FastIcaError>(())
//! ```

pub mod benchmarks;
pub mod contrast;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod fast_ica;
pub mod generate;
mod hyperparams;
pub mod observer;
mod param_guard;
pub mod prelude;
pub mod traits;
pub mod whitening;

use ndarray::NdFloat;
use num_traits::{FromPrimitive, NumCast};
use rand::distributions::uniform::SampleUniform;
use std::iter::Sum;

pub use contrast::ContrastFunction;
pub use distance::{ConvergenceMetric, Distance};
pub use error::{FastIcaError, Result};
pub use fast_ica::{ica, ComponentReport, FastIca};
pub use hyperparams::{FastIcaParams, FastIcaValidParams};
pub use param_guard::ParamGuard;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points.
pub trait Float:
    NdFloat + FromPrimitive + Default + Sum + SampleUniform + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}
