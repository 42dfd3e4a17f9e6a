//! Contrast functions approximating negentropy
//!
//! The fixed-point update needs a nonlinearity `g` and its derivative `g'`, both evaluated
//! elementwise at the projection `wᵗX`. Three standard choices are provided:
//!
//! - `logcosh`: `g(u) = tanh(a·u)`, a good general purpose contrast,
//! - `exp`: `g(u) = u·exp(-u²/2)`, more robust for super-Gaussian sources,
//! - `kurtosis`: `g(u) = u³`, suited for sub-Gaussian sources.
use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayBase, Data, Ix1, Zip};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{FastIcaError, Result};
use crate::Float;

/// Some standard non-linear functions
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum ContrastFunction {
    /// `g(u) = tanh(a·u)` with the tuning constant `a` in `[1, 2]`
    Logcosh(f64),
    /// `g(u) = u·exp(-u²/2)`
    Exp,
    /// `g(u) = u³`
    Kurtosis,
}

impl Default for ContrastFunction {
    fn default() -> Self {
        Self::Exp
    }
}

impl ContrastFunction {
    /// Look up a contrast function by name
    ///
    /// Accepts `logcosh`, `exp` and `kurtosis`. The tuning constant of `logcosh` can be
    /// given after a colon, e.g. `logcosh:1.5`, and defaults to 1.
    ///
    /// # Errors
    ///
    /// [`FastIcaError::UnsupportedContrastFunction`] for any other name and
    /// [`FastIcaError::InvalidAlpha`] when the `logcosh` constant is outside `[1, 2]`.
    pub fn from_name(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        let (base, param) = match normalized.split_once(':') {
            Some((base, param)) => (base, Some(param)),
            None => (normalized.as_str(), None),
        };

        let contrast = match (base, param) {
            ("logcosh", None) => Self::Logcosh(1.0),
            ("logcosh", Some(alpha)) => {
                let alpha = alpha
                    .parse::<f64>()
                    .map_err(|_| FastIcaError::UnsupportedContrastFunction(name.to_string()))?;
                Self::Logcosh(alpha)
            }
            ("exp", None) => Self::Exp,
            ("kurtosis", None) => Self::Kurtosis,
            _ => return Err(FastIcaError::UnsupportedContrastFunction(name.to_string())),
        };

        contrast.validate()?;
        Ok(contrast)
    }

    /// Canonical name, as accepted by [`ContrastFunction::from_name`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Logcosh(_) => "logcosh",
            Self::Exp => "exp",
            Self::Kurtosis => "kurtosis",
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Logcosh(alpha) if !(1.0..=2.0).contains(alpha) => {
                Err(FastIcaError::InvalidAlpha(*alpha))
            }
            _ => Ok(()),
        }
    }

    /// Evaluate `(g(u), g'(u))` elementwise
    ///
    /// Both outputs have the length of `u`. The evaluation is spread over the rayon thread
    /// pool since every element is independent.
    pub fn eval<F: Float, D: Data<Elem = F>>(
        &self,
        u: &ArrayBase<D, Ix1>,
    ) -> (Array1<F>, Array1<F>) {
        match self {
            Self::Logcosh(alpha) => Self::logcosh(u, F::cast(*alpha)),
            Self::Exp => Self::exp(u),
            Self::Kurtosis => Self::kurtosis(u),
        }
    }

    fn logcosh<F: Float, D: Data<Elem = F>>(
        u: &ArrayBase<D, Ix1>,
        alpha: F,
    ) -> (Array1<F>, Array1<F>) {
        let gu = Zip::from(u).par_map_collect(|&u| (u * alpha).tanh());
        let g_u = Zip::from(&gu).par_map_collect(|&t| alpha * (F::one() - t * t));

        (gu, g_u)
    }

    fn exp<F: Float, D: Data<Elem = F>>(u: &ArrayBase<D, Ix1>) -> (Array1<F>, Array1<F>) {
        let half = F::cast(0.5);
        let exp = Zip::from(u).par_map_collect(|&u| (-u * u * half).exp());
        let gu = Zip::from(u).and(&exp).par_map_collect(|&u, &e| u * e);
        let g_u = Zip::from(u)
            .and(&exp)
            .par_map_collect(|&u, &e| (F::one() - u * u) * e);

        (gu, g_u)
    }

    fn kurtosis<F: Float, D: Data<Elem = F>>(u: &ArrayBase<D, Ix1>) -> (Array1<F>, Array1<F>) {
        let three = F::cast(3.);
        let gu = Zip::from(u).par_map_collect(|&u| u * u * u);
        let g_u = Zip::from(u).par_map_collect(|&u| three * u * u);

        (gu, g_u)
    }
}

impl FromStr for ContrastFunction {
    type Err = FastIcaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for ContrastFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logcosh(alpha) => write!(f, "logcosh:{}", alpha),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<ContrastFunction>();
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(
            ContrastFunction::from_name("logcosh").unwrap(),
            ContrastFunction::Logcosh(1.0)
        );
        assert_eq!(
            ContrastFunction::from_name("logcosh:1.5").unwrap(),
            ContrastFunction::Logcosh(1.5)
        );
        assert_eq!(
            "exp".parse::<ContrastFunction>().unwrap(),
            ContrastFunction::Exp
        );
        assert_eq!(
            " Kurtosis ".parse::<ContrastFunction>().unwrap(),
            ContrastFunction::Kurtosis
        );
        assert_eq!(ContrastFunction::default(), ContrastFunction::Exp);
    }

    #[test]
    fn unknown_names_are_rejected() {
        for name in ["tanh", "", "cube", "logcosh:abc", "exp:2"] {
            let res = ContrastFunction::from_name(name);
            assert!(
                matches!(res, Err(FastIcaError::UnsupportedContrastFunction(ref n)) if n == name),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn logcosh_alpha_out_of_range() {
        let res = ContrastFunction::from_name("logcosh:10");
        assert!(matches!(res, Err(FastIcaError::InvalidAlpha(a)) if a == 10.));
        assert!(ContrastFunction::Logcosh(0.5).validate().is_err());
        assert!(ContrastFunction::Logcosh(2.0).validate().is_ok());
    }

    #[test]
    fn display_round_trips_through_from_name() {
        for contrast in [
            ContrastFunction::Logcosh(1.25),
            ContrastFunction::Exp,
            ContrastFunction::Kurtosis,
        ] {
            let parsed: ContrastFunction = contrast.to_string().parse().unwrap();
            assert_eq!(parsed, contrast);
        }
    }

    #[test]
    fn output_has_input_length() {
        let u = array![-2.0, -0.5, 0.0, 0.3, 1.7];
        for contrast in [
            ContrastFunction::Logcosh(1.0),
            ContrastFunction::Exp,
            ContrastFunction::Kurtosis,
        ] {
            let (g, g_der) = contrast.eval(&u);
            assert_eq!(g.len(), u.len());
            assert_eq!(g_der.len(), u.len());
        }
    }

    #[test]
    fn logcosh_values() {
        let u = array![-1.0f64, 0.0, 0.5];
        let (g, g_der) = ContrastFunction::Logcosh(2.0).eval(&u);
        assert_abs_diff_eq!(g, u.mapv(|u| (2. * u).tanh()), epsilon = 1e-12);
        assert_abs_diff_eq!(
            g_der,
            u.mapv(|u| 2. * (1. - (2. * u).tanh().powi(2))),
            epsilon = 1e-12
        );
    }

    #[test]
    fn exp_values() {
        let u = array![-1.5f64, 0.0, 2.0];
        let (g, g_der) = ContrastFunction::Exp.eval(&u);
        assert_abs_diff_eq!(g, u.mapv(|u| u * (-u * u / 2.).exp()), epsilon = 1e-12);
        assert_abs_diff_eq!(
            g_der,
            u.mapv(|u| (1. - u * u) * (-u * u / 2.).exp()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn kurtosis_values() {
        let u = array![-2.0f32, 1.0, 3.0];
        let (g, g_der) = ContrastFunction::Kurtosis.eval(&u);
        assert_abs_diff_eq!(g, array![-8.0, 1.0, 27.0]);
        assert_abs_diff_eq!(g_der, array![12.0, 3.0, 27.0]);
    }

    // g' should be the derivative of g, checked with central differences
    #[test]
    fn derivative_matches_finite_differences() {
        let h = 1e-6;
        let u = array![-1.2f64, -0.1, 0.4, 2.2];
        for contrast in [
            ContrastFunction::Logcosh(1.3),
            ContrastFunction::Exp,
            ContrastFunction::Kurtosis,
        ] {
            let (_, g_der) = contrast.eval(&u);
            let (g_plus, _) = contrast.eval(&u.mapv(|u| u + h));
            let (g_minus, _) = contrast.eval(&u.mapv(|u| u - h));
            let numeric = (g_plus - g_minus) / (2. * h);
            assert_abs_diff_eq!(g_der, numeric, epsilon = 1e-5);
        }
    }
}
