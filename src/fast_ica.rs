//! Deflationary FastICA
//!
//! Components are estimated one after another. For component `i` a random weight vector `w`
//! is refined with the fixed-point update of Hyvärinen (1999)
//!
//! ```text
//! w+ = E{x·g(wᵗx)} - E{g'(wᵗx)}·w
//! ```
//!
//! after which `w+` is decorrelated against the rows already found (Gram-Schmidt deflation)
//! and normalized. The loop stops when the distance between two successive estimates drops
//! below the tolerance, or when the iteration budget is spent. Running out of iterations is
//! not an error: the last estimate is kept and flagged in its [`ComponentReport`].
//!
//! Convergence is measured between vectors that were both deflated, so the distance only
//! reflects movement inside the subspace still available to the component.

use ndarray::{s, Array, Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::contrast::ContrastFunction;
use crate::distance::{ConvergenceMetric, Distance};
use crate::error::{FastIcaError, Result};
use crate::hyperparams::FastIcaValidParams;
use crate::observer::{IcaObserver, LogObserver};
use crate::traits::Fit;
use crate::whitening::{check_mixtures, whiten};
use crate::Float;

/// Outcome of the fixed-point loop of a single component
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentReport<F> {
    iterations: usize,
    distance: F,
    converged: bool,
}

impl<F: Float> ComponentReport<F> {
    /// Number of fixed-point updates performed
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Distance between the last two estimates
    pub fn distance(&self) -> F {
        self.distance
    }

    /// Whether the distance fell below the tolerance before the budget was spent
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Fitted FastICA model
///
/// Holds the estimated sources of the fitted mixtures and the transform producing them, so
/// further mixtures with the same layout can be unmixed with [`FastIca::transform`].
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct FastIca<F> {
    mean: Array1<F>,
    whitening: Array2<F>,
    unmixing: Array2<F>,
    sources: Array2<F>,
    reports: Vec<ComponentReport<F>>,
}

impl<F: Float> FastIca<F> {
    /// Estimated sources, one per row
    pub fn sources(&self) -> ArrayView2<F> {
        self.sources.view()
    }

    pub fn into_sources(self) -> Array2<F> {
        self.sources
    }

    /// The `N x N` unmixing matrix `W` acting on whitened data, rows have unit norm
    pub fn unmixing(&self) -> ArrayView2<F> {
        self.unmixing.view()
    }

    /// The whitening matrix, the identity when whitening was disabled
    pub fn whitening(&self) -> ArrayView2<F> {
        self.whitening.view()
    }

    /// Row means removed from the mixtures
    pub fn mean(&self) -> ArrayView1<F> {
        self.mean.view()
    }

    /// Unmixing matrix acting on centered raw mixtures, `W·K`
    pub fn components(&self) -> Array2<F> {
        self.unmixing.dot(&self.whitening)
    }

    pub fn reports(&self) -> &[ComponentReport<F>] {
        &self.reports
    }

    /// True if every component converged within its budget
    pub fn converged(&self) -> bool {
        self.reports.iter().all(ComponentReport::converged)
    }

    /// Unmix mixtures recorded with the same sensors as the fitted ones
    ///
    /// # Errors
    ///
    /// [`FastIcaError::ShapeMismatch`] if `x` does not have one row per fitted mixture
    pub fn transform<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array2<F>> {
        if x.nrows() != self.mean.len() {
            return Err(FastIcaError::ShapeMismatch {
                expected: self.mean.len(),
                actual: x.nrows(),
            });
        }
        let centered = x - &self.mean.view().insert_axis(Axis(1));

        Ok(self.components().dot(&centered))
    }
}

impl<F: Float, R: Rng + Clone, D: Data<Elem = F>> Fit<ArrayBase<D, Ix2>, FastIcaError>
    for FastIcaValidParams<F, R>
{
    type Object = FastIca<F>;

    /// Fit the model, reporting progress to the `log` facade if `verbose` is set
    ///
    /// # Errors
    ///
    /// If the mixtures are empty, non-finite or cannot be whitened, see
    /// [`whiten`](crate::whitening::whiten)
    fn fit(&self, x: &ArrayBase<D, Ix2>) -> Result<Self::Object> {
        if self.verbose() {
            self.fit_with_observer(x, &mut LogObserver)
        } else {
            self.fit_with_observer(x, &mut ())
        }
    }
}

impl<F: Float, R: Rng + Clone> FastIcaValidParams<F, R> {
    /// Fit the model, reporting progress to `observer`
    ///
    /// The random generator of the hyperparameters is cloned, fitting twice gives identical
    /// results.
    pub fn fit_with_observer<D, O>(
        &self,
        x: &ArrayBase<D, Ix2>,
        observer: &mut O,
    ) -> Result<FastIca<F>>
    where
        D: Data<Elem = F>,
        O: IcaObserver<F> + ?Sized,
    {
        check_mixtures(x)?;
        let (nmixtures, nsamples) = x.dim();

        let (xwhite, whitening, mean) = if self.whiten() {
            let parts = whiten(x)?.into_parts();
            observer.on_whitened(nmixtures, nsamples);
            parts
        } else {
            (x.to_owned(), Array2::eye(nmixtures), Array1::zeros(nmixtures))
        };

        let mut rng = self.rng().clone();
        let mut unmixing = Array2::zeros((nmixtures, nmixtures));
        let mut reports = Vec::with_capacity(nmixtures);

        for component in 0..nmixtures {
            let (w, report) = self.solve_component(
                &xwhite,
                unmixing.slice(s![..component, ..]),
                component,
                &mut rng,
                observer,
            );

            if !report.converged() {
                log::warn!(
                    "component {} did not converge after {} iterations (distance {:e}, tolerance {:e})",
                    component,
                    report.iterations(),
                    report.distance(),
                    self.tol()
                );
            }
            observer.on_component(component, &report);

            unmixing.row_mut(component).assign(&w);
            reports.push(report);
        }

        let sources = unmixing.dot(&xwhite);

        Ok(FastIca {
            mean,
            whitening,
            unmixing,
            sources,
            reports,
        })
    }

    // Fixed-point iteration of a single component
    fn solve_component<O: IcaObserver<F> + ?Sized>(
        &self,
        x: &Array2<F>,
        solved: ArrayView2<F>,
        component: usize,
        rng: &mut R,
        observer: &mut O,
    ) -> (Array1<F>, ComponentReport<F>) {
        let nsamples = F::cast(x.ncols());
        let mut w = random_direction(x.nrows(), &solved, rng);
        let mut report = ComponentReport {
            iterations: 0,
            distance: F::infinity(),
            converged: false,
        };

        for iteration in 0..self.max_iter() {
            let w_new = update(self.contrast(), x, &w, nsamples);
            let w_new = match orthonormalize(w_new, &solved) {
                Some(w_new) => w_new,
                None => {
                    log::debug!(
                        "component {}: update vanished at iteration {}, restarting",
                        component,
                        iteration
                    );
                    random_direction(x.nrows(), &solved, rng)
                }
            };

            let distance = self.metric().distance(w.view(), w_new.view());
            observer.on_iteration(component, iteration, distance);
            w = w_new;

            report.iterations = iteration + 1;
            report.distance = distance;
            if distance < self.tol() {
                report.converged = true;
                break;
            }
        }

        (w, report)
    }
}

/// `E{x·g(wᵗx)} - E{g'(wᵗx)}·w`
fn update<F: Float>(
    contrast: &ContrastFunction,
    x: &Array2<F>,
    w: &Array1<F>,
    nsamples: F,
) -> Array1<F> {
    let wtx = w.dot(x);
    let (gwtx, g_wtx) = contrast.eval(&wtx);
    let g_wtx_mean = g_wtx.sum() / nsamples;

    x.dot(&gwtx) / nsamples - &(w * g_wtx_mean)
}

/// Remove the projection on the rows of `solved` and scale to unit norm
///
/// Returns `None` if nothing but rounding noise is left.
fn orthonormalize<F: Float>(mut w: Array1<F>, solved: &ArrayView2<F>) -> Option<Array1<F>> {
    if solved.nrows() > 0 {
        let proj = solved.dot(&w);
        w -= &solved.t().dot(&proj);
    }

    let norm = w.dot(&w).sqrt();
    if !norm.is_finite() || norm <= F::epsilon() {
        return None;
    }

    Some(w / norm)
}

// Draw uniformly from the unit cube until the part orthogonal to `solved` is usable. As long
// as fewer than `n` rows are solved this almost surely succeeds on the first draw.
fn random_direction<F: Float, R: Rng>(n: usize, solved: &ArrayView2<F>, rng: &mut R) -> Array1<F> {
    loop {
        let w = Array::random_using(n, Uniform::new(F::zero(), F::one()), rng);
        if let Some(w) = orthonormalize(w, solved) {
            return w;
        }
    }
}

/// Estimate the independent sources of the `N x M` mixture matrix `x`
///
/// Strategies are selected by name: `contrast_function` is one of `logcosh`, `exp` or
/// `kurtosis`, `distance_metric` one of `cosine`, `manhattan`, `euclidean` or `chebyshev`.
/// Both are resolved before any iteration starts. Progress is always written to the `log`
/// facade, which stays silent unless a logger is installed. To fit without any logging, or
/// with a custom observer, use the builder: `FastIca::params(max_iter).verbose(false)` gives
/// the same sources as this function.
///
/// Returns the `N x M` matrix of estimated sources. Their order and sign are arbitrary.
///
/// # Errors
///
/// - [`FastIcaError::UnsupportedContrastFunction`] / [`FastIcaError::UnsupportedMetric`] for
///   unknown names
/// - [`FastIcaError::InvalidMaxIter`] / [`FastIcaError::InvalidTolerance`] for a zero budget or
///   a negative tolerance
/// - every error of [`whiten`](crate::whitening::whiten) when `do_whitening` is set
pub fn ica<F: Float, D: Data<Elem = F>>(
    x: &ArrayBase<D, Ix2>,
    max_iter: usize,
    tolerance: F,
    do_whitening: bool,
    contrast_function: &str,
    distance_metric: &str,
) -> Result<Array2<F>> {
    let contrast = ContrastFunction::from_name(contrast_function)?;
    let metric = ConvergenceMetric::from_name(distance_metric)?;

    let model = FastIca::params(max_iter)
        .tol(tolerance)
        .whiten(do_whitening)
        .contrast(contrast)
        .metric(metric)
        .fit(x)?;

    Ok(model.into_sources())
}
