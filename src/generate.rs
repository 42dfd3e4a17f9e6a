//! Toy sources and mixtures
//!
//! Deterministic waveforms are sampled on `M` equally spaced points of `[0, 8]`. Signals are
//! rows, so [`stack`] and [`mix`] produce matrices in the `N x M` layout expected by the
//! estimator.
use ndarray::{Array, Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn time(nsamples: usize) -> Array1<f64> {
    Array::linspace(0., 8., nsamples)
}

/// `sin(omega t)`
pub fn sine(nsamples: usize, omega: f64) -> Array1<f64> {
    time(nsamples).mapv(|t| (omega * t).sin())
}

/// Sign of `sin(omega t)`
pub fn square(nsamples: usize, omega: f64) -> Array1<f64> {
    time(nsamples).mapv(|t| {
        if (omega * t).sin() > 0. {
            return 1.;
        }
        -1.
    })
}

/// Rising ramp in `[-1, 1)` with period `2π / omega`
pub fn sawtooth(nsamples: usize, omega: f64) -> Array1<f64> {
    time(nsamples).mapv(|t| {
        let phase = (omega * t / std::f64::consts::TAU).fract();
        2. * phase - 1.
    })
}

/// Independent draws from `U(-1, 1)`
pub fn uniform_noise<R: Rng>(nsamples: usize, rng: &mut R) -> Array1<f64> {
    Array::random_using(nsamples, Uniform::new(-1., 1.), rng)
}

/// Stack signals of equal length as the rows of a matrix
///
/// # Panics
///
/// If the signals differ in length
pub fn stack(signals: &[Array1<f64>]) -> Array2<f64> {
    let views: Vec<_> = signals.iter().map(|s| s.view().insert_axis(Axis(0))).collect();
    match ndarray::concatenate(Axis(0), &views) {
        Ok(stacked) => stacked,
        Err(_) if signals.is_empty() => Array2::zeros((0, 0)),
        Err(err) => panic!("signals must have the same length: {}", err),
    }
}

/// Observed mixtures `A S` of the sources `S` (one per row) with mixing matrix `A`
pub fn mix<D1, D2>(sources: &ArrayBase<D1, Ix2>, mixing: &ArrayBase<D2, Ix2>) -> Array2<f64>
where
    D1: Data<Elem = f64>,
    D2: Data<Elem = f64>,
{
    mixing.dot(sources)
}

/// Random `n x n` mixing matrix, diagonally dominant and therefore invertible
pub fn random_mixing<R: Rng>(n: usize, rng: &mut R) -> Array2<f64> {
    Array::random_using((n, n), Uniform::new(0., 1.), rng) + Array2::<f64>::eye(n) * n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn waveforms_have_expected_range() {
        let s = sine(1000, 3.);
        assert_eq!(s.len(), 1000);
        assert_abs_diff_eq!(s[0], 0.0);
        assert!(s.iter().all(|v| v.abs() <= 1.));

        assert!(square(1000, 3.).iter().all(|&v| v == 1. || v == -1.));
        assert!(sawtooth(1000, 3.).iter().all(|&v| (-1. ..1.).contains(&v)));
    }

    #[test]
    fn sawtooth_rises_within_a_period() {
        let saw = sawtooth(9, std::f64::consts::TAU / 8.);
        assert_abs_diff_eq!(saw, array![-1., -0.75, -0.5, -0.25, 0., 0.25, 0.5, 0.75, -1.], epsilon = 1e-12);
    }

    #[test]
    fn noise_is_seeded() {
        let a = uniform_noise(100, &mut Xoshiro256Plus::seed_from_u64(42));
        let b = uniform_noise(100, &mut Xoshiro256Plus::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (-1. ..1.).contains(v)));
    }

    #[test]
    fn stacked_signals_are_rows() {
        let x = stack(&[array![1., 2., 3.], array![4., 5., 6.]]);
        assert_eq!(x, array![[1., 2., 3.], [4., 5., 6.]]);
        assert_eq!(stack(&[]).dim(), (0, 0));
    }

    #[test]
    #[should_panic]
    fn stacking_unequal_lengths_panics() {
        stack(&[array![1., 2.], array![1.]]);
    }

    #[test]
    fn mixing_combines_rows() {
        let sources = array![[1., 0., 2.], [0., 1., 1.]];
        let mixtures = mix(&sources, &array![[1., 1.], [0.5, 2.]]);
        assert_eq!(mixtures, array![[1., 1., 3.], [0.5, 2., 3.]]);
    }

    #[test]
    fn random_mixing_is_diagonally_dominant() {
        let a = random_mixing(4, &mut Xoshiro256Plus::seed_from_u64(1));
        for (i, row) in a.rows().into_iter().enumerate() {
            let off: f64 = row.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, v)| v.abs()).sum();
            assert!(row[i] > off);
        }
    }
}
