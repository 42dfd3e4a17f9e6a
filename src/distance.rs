//! Sign-invariant distances between successive weight vectors
//!
//! A weight vector and its negation describe the same independent component, so every
//! distance in this module is invariant under a global sign flip of either argument. They are
//! only used to decide whether the fixed-point iteration has converged.
use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayView1, Zip};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{FastIcaError, Result};
use crate::Float;

/// Non-negative distance between two weight vectors
pub trait Distance<F: Float> {
    // Panics if a and b are not of equal dimension
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F;
}

/// `1 - |cos θ(a, b)|`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosineDist;
impl<F: Float> Distance<F> for CosineDist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        let norms = a.dot(&a).sqrt() * b.dot(&b).sqrt();
        if norms <= F::zero() {
            return F::one();
        }
        let cos = a.dot(&b) / norms;

        (F::one() - cos.abs()).max(F::zero())
    }
}

/// Sum of absolute differences of the elementwise absolute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManhattanDist;
impl<F: Float> Distance<F> for ManhattanDist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |acc, &a, &b| acc + (a.abs() - b.abs()).abs())
    }
}

/// `min(‖a - b‖, ‖a + b‖)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EuclideanDist;
impl<F: Float> Distance<F> for EuclideanDist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        let (diff, sum) = Zip::from(&a)
            .and(&b)
            .fold((F::zero(), F::zero()), |(diff, sum), &a, &b| {
                (diff + (a - b) * (a - b), sum + (a + b) * (a + b))
            });

        diff.min(sum).sqrt()
    }
}

/// Largest absolute difference of the elementwise absolute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChebyshevDist;
impl<F: Float> Distance<F> for ChebyshevDist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |acc, &a, &b| acc.max((a.abs() - b.abs()).abs()))
    }
}

/// Distance metric used to test convergence of the fixed-point iteration
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConvergenceMetric {
    /// One minus the absolute cosine similarity
    Cosine,
    /// Manhattan distance of the absolute values
    Manhattan,
    /// Euclidean distance to the closer of `b` and `-b`
    Euclidean,
    /// Chebyshev distance of the absolute values
    Chebyshev,
}

impl Default for ConvergenceMetric {
    fn default() -> Self {
        Self::Cosine
    }
}

impl ConvergenceMetric {
    /// Look up a metric by name: `cosine`, `manhattan`, `euclidean` or `chebyshev`
    ///
    /// # Errors
    ///
    /// [`FastIcaError::UnsupportedMetric`] for any other name
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "manhattan" => Ok(Self::Manhattan),
            "euclidean" => Ok(Self::Euclidean),
            "chebyshev" => Ok(Self::Chebyshev),
            _ => Err(FastIcaError::UnsupportedMetric(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
            Self::Chebyshev => "chebyshev",
        }
    }
}

impl<F: Float> Distance<F> for ConvergenceMetric {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        match self {
            Self::Cosine => CosineDist.distance(a, b),
            Self::Manhattan => ManhattanDist.distance(a, b),
            Self::Euclidean => EuclideanDist.distance(a, b),
            Self::Chebyshev => ChebyshevDist.distance(a, b),
        }
    }
}

impl FromStr for ConvergenceMetric {
    type Err = FastIcaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for ConvergenceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    use super::*;

    const ALL: [ConvergenceMetric; 4] = [
        ConvergenceMetric::Cosine,
        ConvergenceMetric::Manhattan,
        ConvergenceMetric::Euclidean,
        ConvergenceMetric::Chebyshev,
    ];

    fn dist_test(dist: ConvergenceMetric, result: f64) {
        let a = arr1(&[0.6, -0.8]);
        let b = arr1(&[0.0, 1.0]);
        let ab = dist.distance(a.view(), b.view());
        assert_abs_diff_eq!(ab, result, epsilon = 1e-9);

        // Identical vectors are at distance zero
        assert_abs_diff_eq!(dist.distance(a.view(), a.view()), 0.0, epsilon = 1e-12);

        // A global sign flip does not change the distance
        let neg_b = b.mapv(|x| -x);
        assert_abs_diff_eq!(dist.distance(a.view(), neg_b.view()), ab, epsilon = 1e-12);
        let neg_a = a.mapv(|x| -x);
        assert_abs_diff_eq!(dist.distance(neg_a.view(), a.view()), 0.0, epsilon = 1e-12);

        // Symmetry
        assert_abs_diff_eq!(dist.distance(b.view(), a.view()), ab, epsilon = 1e-12);
    }

    #[test]
    fn cosine_dist() {
        dist_test(ConvergenceMetric::Cosine, 0.2);
    }

    #[test]
    fn manhattan_dist() {
        dist_test(ConvergenceMetric::Manhattan, 0.8);
    }

    #[test]
    fn euclidean_dist() {
        // min(‖(0.6, -1.8)‖, ‖(0.6, 0.2)‖)
        dist_test(ConvergenceMetric::Euclidean, 0.4f64.sqrt());
    }

    #[test]
    fn chebyshev_dist() {
        dist_test(ConvergenceMetric::Chebyshev, 0.6);
    }

    #[test]
    fn distances_are_non_negative() {
        let a = arr1(&[0.3f32, 0.3, -0.9]);
        let b = arr1(&[0.3f32, 0.3, -0.9]).mapv(|x| x * 1.0000001);
        for metric in ALL {
            assert!(metric.distance(a.view(), b.view()) >= 0.0);
        }
    }

    #[test]
    fn cosine_of_zero_vector_is_maximal() {
        let a = arr1(&[0.0, 0.0]);
        let b = arr1(&[1.0, 0.0]);
        assert_abs_diff_eq!(CosineDist.distance(a.view(), b.view()), 1.0);
    }

    #[test]
    #[should_panic]
    fn unequal_lengths_panic() {
        let a = arr1(&[0.0, 1.0]);
        let b = arr1(&[1.0, 0.0, 0.0]);
        ManhattanDist.distance(a.view(), b.view());
    }

    #[test]
    fn lookup_by_name() {
        for metric in ALL {
            assert_eq!(ConvergenceMetric::from_name(metric.name()).unwrap(), metric);
            assert_eq!(
                metric.to_string().to_uppercase().parse::<ConvergenceMetric>().unwrap(),
                metric
            );
        }
        assert_eq!(ConvergenceMetric::default(), ConvergenceMetric::Cosine);
    }

    #[test]
    fn unknown_metric() {
        let res = ConvergenceMetric::from_name("hamming");
        assert!(matches!(res, Err(FastIcaError::UnsupportedMetric(ref n)) if n == "hamming"));
    }
}
