//! Centering and whitening of the mixture matrix
//!
//! Whitening turns the `N x M` mixture matrix `X` into a matrix with zero-mean rows and
//! identity covariance. Rows are first standardized, `Z = D^(-1)·(X - mean)` with `D` the
//! diagonal of row standard deviations, and with the eigendecomposition `R = E·Λ·Eᵗ` of the
//! covariance of `Z` (the correlation matrix of `X`) the transform is
//!
//! ```text
//! X_white = E·Λ^(-1/2)·Eᵗ·Z
//! ```
//!
//! Working on standardized rows keeps the spectrum independent of the amplitude of each
//! mixture, so sensors recorded at very different scales are whitened just as well.
//!
//! The fixed-point update of FastICA relies on this property for its convergence guarantees,
//! so a constant row or a correlation matrix that cannot be inverted is reported as
//! [`FastIcaError::SingularCovariance`] instead of leaking `NaN` into the iteration.

use linfa_linalg::eigh::Eigh;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2};

use crate::error::{FastIcaError, Result};
use crate::Float;

/// Whitened mixtures together with the transform that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Whitened<F> {
    data: Array2<F>,
    matrix: Array2<F>,
    mean: Array1<F>,
}

impl<F: Float> Whitened<F> {
    /// The whitened `N x M` matrix
    pub fn data(&self) -> ArrayView2<F> {
        self.data.view()
    }

    /// The `N x N` whitening matrix `E·Λ^(-1/2)·Eᵗ·D^(-1)` acting on centered mixtures
    pub fn whitening_matrix(&self) -> ArrayView2<F> {
        self.matrix.view()
    }

    /// Per-row means removed before whitening
    pub fn mean(&self) -> ArrayView1<F> {
        self.mean.view()
    }

    pub fn into_parts(self) -> (Array2<F>, Array2<F>, Array1<F>) {
        (self.data, self.matrix, self.mean)
    }
}

/// Check the preconditions shared by whitening and fitting
pub(crate) fn check_mixtures<F: Float, D: Data<Elem = F>>(x: &ArrayBase<D, Ix2>) -> Result<()> {
    let (nmixtures, nsamples) = x.dim();
    if nmixtures == 0 || nsamples == 0 {
        return Err(FastIcaError::NotEnoughSamples);
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FastIcaError::NonFinite);
    }

    Ok(())
}

/// Subtract the mean of every row
///
/// Returns the centered matrix and the row means.
pub fn center<F: Float, D: Data<Elem = F>>(
    x: &ArrayBase<D, Ix2>,
) -> Result<(Array2<F>, Array1<F>)> {
    let mean = x.mean_axis(Axis(1)).ok_or(FastIcaError::NotEnoughSamples)?;
    let centered = x - &mean.view().insert_axis(Axis(1));

    Ok((centered, mean))
}

/// Covariance between the rows of an already centered matrix, normalized by the number of
/// samples
pub fn covariance<F: Float, D: Data<Elem = F>>(centered: &ArrayBase<D, Ix2>) -> Array2<F> {
    let nsamples = F::cast(centered.ncols());
    centered.dot(&centered.t()) / nsamples
}

/// Whiten an `N x M` mixture matrix
///
/// # Errors
///
/// - [`FastIcaError::NotEnoughSamples`] if the matrix has no rows or no columns
/// - [`FastIcaError::NonFinite`] if it contains `NaN` or infinite values
/// - [`FastIcaError::TooFewSamples`] if there are fewer samples than mixtures
/// - [`FastIcaError::SingularCovariance`] if a row is constant or rows are linearly dependent
pub fn whiten<F: Float, D: Data<Elem = F>>(x: &ArrayBase<D, Ix2>) -> Result<Whitened<F>> {
    check_mixtures(x)?;
    let (nmixtures, nsamples) = x.dim();
    if nsamples < nmixtures {
        return Err(FastIcaError::TooFewSamples {
            nsamples,
            nmixtures,
        });
    }

    let (centered, mean) = center(x)?;

    // A row whose spread is at rounding level of its magnitude carries no signal
    let std = centered.std_axis(Axis(1), F::zero());
    let magnitude = x.map_axis(Axis(1), |row| {
        row.fold(F::zero(), |acc, &v| acc.max(v.abs()))
    });
    let tiny = F::epsilon().sqrt();
    if let Some(row) = (0..nmixtures).find(|&i| std[i] <= magnitude[i] * tiny) {
        return Err(FastIcaError::SingularCovariance {
            min_eigenvalue: (std[row] * std[row]).to_f64().unwrap_or(f64::NAN),
        });
    }

    let standardized = &centered / &std.view().insert_axis(Axis(1));
    let corr = covariance(&standardized);

    let (eig_val, eig_vec) = corr.eigh()?;

    // The correlation spectrum sums to N, linearly dependent rows leave an eigenvalue at
    // rounding noise level
    let max_eig = eig_val.iter().fold(F::zero(), |acc, &v| acc.max(v));
    let min_eig = eig_val.iter().fold(F::infinity(), |acc, &v| acc.min(v));
    if !min_eig.is_finite() || min_eig <= max_eig * tiny {
        return Err(FastIcaError::SingularCovariance {
            min_eigenvalue: min_eig.to_f64().unwrap_or(f64::NAN),
        });
    }

    let inv_sqrt = eig_val.mapv(|v| v.sqrt().recip());
    let zca = (&eig_vec * &inv_sqrt.insert_axis(Axis(0))).dot(&eig_vec.t());
    let data = zca.dot(&standardized);
    let matrix = zca / &std.insert_axis(Axis(0));

    log::debug!(
        "whitened {} mixtures of {} samples, correlation spectrum [{}, {}]",
        nmixtures,
        nsamples,
        min_eig,
        max_eig
    );

    Ok(Whitened { data, matrix, mean })
}
