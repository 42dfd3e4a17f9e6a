use crate::{
    contrast::ContrastFunction, distance::ConvergenceMetric, error::FastIcaError,
    fast_ica::FastIca, Float, ParamGuard,
};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

/// Checked hyperparameters of the deflationary FastICA estimator
///
/// Obtained from [`FastIcaParams`] through [`ParamGuard::check`], or implicitly when fitting
/// through the unchecked parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FastIcaValidParams<F: Float, R: Rng> {
    max_iter: usize,
    tol: F,
    whiten: bool,
    verbose: bool,
    contrast: ContrastFunction,
    metric: ConvergenceMetric,
    rng: R,
}

impl<F: Float, R: Rng> FastIcaValidParams<F, R> {
    /// Iteration budget of every component
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// A component has converged once the distance between two successive weight vectors
    /// falls below `tol`
    pub fn tol(&self) -> F {
        self.tol
    }

    pub fn whiten(&self) -> bool {
        self.whiten
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn contrast(&self) -> &ContrastFunction {
        &self.contrast
    }

    pub fn metric(&self) -> &ConvergenceMetric {
        &self.metric
    }

    /// Returns the random generator used to draw the initial weight vectors
    pub fn rng(&self) -> &R {
        &self.rng
    }
}

/// Builder for the FastICA hyperparameters
///
/// Defaults:
/// * `tol = 1e-5`
/// * `whiten = true`
/// * `verbose = true`
/// * `contrast = ContrastFunction::Exp`
/// * `metric = ConvergenceMetric::Cosine`
#[derive(Debug, Clone, PartialEq)]
pub struct FastIcaParams<F: Float, R: Rng>(FastIcaValidParams<F, R>);

impl<F: Float> FastIca<F> {
    /// Hyperparameters with a fixed-seed random generator, so repeated fits are identical
    pub fn params(max_iter: usize) -> FastIcaParams<F, Xoshiro256Plus> {
        FastIcaParams::new(max_iter, Xoshiro256Plus::seed_from_u64(42))
    }

    /// Hyperparameters drawing the initial weight vectors from `rng`
    pub fn params_with_rng<R: Rng>(max_iter: usize, rng: R) -> FastIcaParams<F, R> {
        FastIcaParams::new(max_iter, rng)
    }
}

impl<F: Float, R: Rng> FastIcaParams<F, R> {
    /// Create new FastICA hyperparameters running at most `max_iter` fixed-point updates per
    /// component
    pub fn new(max_iter: usize, rng: R) -> Self {
        Self(FastIcaValidParams {
            max_iter,
            tol: F::cast(1e-5),
            whiten: true,
            verbose: true,
            contrast: ContrastFunction::default(),
            metric: ConvergenceMetric::default(),
            rng,
        })
    }

    /// Set maximum number of iterations per component
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.0.max_iter = max_iter;
        self
    }

    /// Set tolerance of the convergence test
    pub fn tol(mut self, tol: F) -> Self {
        self.0.tol = tol;
        self
    }

    /// Whiten the mixtures before iterating. Disable only for data that is already white.
    pub fn whiten(mut self, whiten: bool) -> Self {
        self.0.whiten = whiten;
        self
    }

    /// Report progress through the `log` facade when fitting with [`Fit::fit`](crate::traits::Fit::fit)
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.0.verbose = verbose;
        self
    }

    /// G function used in the approximation to neg-entropy, refer [`ContrastFunction`]
    pub fn contrast(mut self, contrast: ContrastFunction) -> Self {
        self.0.contrast = contrast;
        self
    }

    /// Distance used to compare successive weight vectors, refer [`ConvergenceMetric`]
    pub fn metric(mut self, metric: ConvergenceMetric) -> Self {
        self.0.metric = metric;
        self
    }

    /// Replace the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> FastIcaParams<F, R2> {
        let p = self.0;
        FastIcaParams(FastIcaValidParams {
            max_iter: p.max_iter,
            tol: p.tol,
            whiten: p.whiten,
            verbose: p.verbose,
            contrast: p.contrast,
            metric: p.metric,
            rng,
        })
    }
}

impl<F: Float, R: Rng> ParamGuard for FastIcaParams<F, R> {
    type Checked = FastIcaValidParams<F, R>;
    type Error = FastIcaError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.max_iter == 0 {
            Err(FastIcaError::InvalidMaxIter)
        } else if self.0.tol < F::zero() || !self.0.tol.is_finite() {
            Err(FastIcaError::InvalidTolerance(
                self.0.tol.to_f32().unwrap_or(f32::NAN),
            ))
        } else {
            self.0.contrast.validate()?;
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<FastIcaParams<f64, Xoshiro256Plus>>();
        has_autotraits::<FastIcaValidParams<f64, Xoshiro256Plus>>();
    }

    #[test]
    fn defaults() {
        let params = FastIca::<f64>::params(100).check().unwrap();
        assert_eq!(params.max_iter(), 100);
        assert_eq!(params.tol(), 1e-5);
        assert!(params.whiten());
        assert!(params.verbose());
        assert_eq!(*params.contrast(), ContrastFunction::Exp);
        assert_eq!(*params.metric(), ConvergenceMetric::Cosine);
    }

    #[test]
    fn max_iter_cannot_be_zero() {
        let res = FastIca::<f32>::params(0).check();
        assert!(matches!(res, Err(FastIcaError::InvalidMaxIter)));
    }

    #[test]
    fn tolerance_cannot_be_negative() {
        let res = FastIca::params(10).tol(-1.).check();
        assert!(matches!(res, Err(FastIcaError::InvalidTolerance(t)) if t == -1.));
    }

    #[test]
    fn tolerance_must_be_finite() {
        let res = FastIca::params(10).tol(f64::NAN).check();
        assert!(matches!(res, Err(FastIcaError::InvalidTolerance(_))));
    }

    #[test]
    fn tolerance_can_be_zero() {
        assert!(FastIca::params(10).tol(0.).check().is_ok());
    }

    #[test]
    fn logcosh_alpha_is_checked() {
        let res = FastIca::<f64>::params(10)
            .contrast(ContrastFunction::Logcosh(2.5))
            .check();
        assert!(matches!(res, Err(FastIcaError::InvalidAlpha(_))));
    }

    #[test]
    fn rng_can_be_replaced() {
        let params = FastIca::<f64>::params(10)
            .tol(1e-3)
            .with_rng(SmallRng::seed_from_u64(3))
            .check()
            .unwrap();
        assert_eq!(params.tol(), 1e-3);
        assert_eq!(
            params.rng().clone().gen::<u64>(),
            SmallRng::seed_from_u64(3).gen::<u64>()
        );
    }
}
