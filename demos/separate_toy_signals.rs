use fastica_deflation::evaluation::{kurtosis, match_components};
use fastica_deflation::generate;
use fastica_deflation::prelude::*;
use ndarray::{Array2, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn main() -> Result<()> {
    // Run with RUST_LOG=debug (or trace) to follow the fixed-point iterations
    env_logger::init();

    // `sources` holds the original signals (we merely have it to measure the result)
    // `mixtures` are the observed signals that will be unmixed
    // Both have shape (3 x 2000), one signal per row
    let (sources, mixtures) = create_data();

    // Fitting the model
    // We use logcosh as the G function in the approximation of neg-entropy, with its
    // alpha value as 1
    let model = FastIca::params(1000)
        .contrast(ContrastFunction::Logcosh(1.0))
        .metric(ConvergenceMetric::Cosine)
        .fit(&mixtures)?;

    for (component, report) in model.reports().iter().enumerate() {
        println!(
            "component {}: {} iterations, converged: {}",
            component,
            report.iterations(),
            report.converged()
        );
    }

    // Order and sign of the estimates are arbitrary, match them to the originals
    for (est, truth, corr) in match_components(&model.sources(), &sources) {
        println!(
            "source {} (kurtosis {:.3}) recovered by row {} with |corr| = {:.4}",
            truth,
            kurtosis(&sources.index_axis(Axis(0), truth)),
            est,
            corr
        );
    }

    Ok(())
}

// Helper function to create three signals (sources) and mix them together
// as input for the ICA model
fn create_data() -> (Array2<f64>, Array2<f64>) {
    let nsamples = 2000;
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    let sources = generate::stack(&[
        generate::sine(nsamples, 2.),
        generate::sawtooth(nsamples, 5.),
        generate::uniform_noise(nsamples, &mut rng),
    ]);

    let mixing = generate::random_mixing(3, &mut rng);
    let mixtures = generate::mix(&sources, &mixing);

    (sources, mixtures)
}
