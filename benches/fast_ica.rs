use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fastica_deflation::benchmarks::config;
use fastica_deflation::generate;
use fastica_deflation::prelude::*;
use ndarray::{array, Array2};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn create_data(nsamples: usize) -> Array2<f64> {
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let sources = generate::stack(&[
        generate::sine(nsamples, 2.),
        generate::square(nsamples, 4.),
    ]) + generate::stack(&[
        generate::uniform_noise(nsamples, &mut rng),
        generate::uniform_noise(nsamples, &mut rng),
    ]) * 0.1;

    generate::mix(&sources, &array![[1., 1.], [0.5, 2.]])
}

fn bench_contrast(c: &mut Criterion, name: &str, contrast: ContrastFunction) {
    let mut group = c.benchmark_group("Fast ICA");
    config::set_default_benchmark_configs(&mut group);

    let params = FastIca::params(200).contrast(contrast).verbose(false);
    for size in [1_000, 10_000, 100_000].iter() {
        let mixtures = create_data(*size);
        group.bench_with_input(BenchmarkId::new(name, size), &mixtures, |b, x| {
            b.iter(|| params.fit(x))
        });
    }
    group.finish();
}

fn logcosh_bench(c: &mut Criterion) {
    bench_contrast(c, "Contrast_LogCosh", ContrastFunction::Logcosh(1.0));
}

fn exp_bench(c: &mut Criterion) {
    bench_contrast(c, "Contrast_Exp", ContrastFunction::Exp);
}

fn kurtosis_bench(c: &mut Criterion) {
    bench_contrast(c, "Contrast_Kurtosis", ContrastFunction::Kurtosis);
}

fn whitening_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Whitening");
    config::set_default_benchmark_configs(&mut group);

    for size in [1_000, 10_000, 100_000].iter() {
        let mixtures = create_data(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &mixtures, |b, x| {
            b.iter(|| fastica_deflation::whitening::whiten(x))
        });
    }
    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = config::get_default_profiling_configs();
    targets = logcosh_bench, exp_bench, kurtosis_bench, whitening_bench
}
#[cfg(target_os = "windows")]
criterion_group!(benches, logcosh_bench, exp_bench, kurtosis_bench, whitening_bench);

criterion_main!(benches);
