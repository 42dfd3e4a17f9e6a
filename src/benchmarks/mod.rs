//! Shared criterion settings for the FastICA benchmarks
#[cfg(feature = "benchmarks")]
pub mod config {
    use criterion::{measurement::WallTime, BenchmarkGroup, Criterion};
    #[cfg(not(target_os = "windows"))]
    use pprof::criterion::{Output, PProfProfiler};
    use std::time::Duration;

    /// Criterion with a flamegraph profiler attached
    #[cfg(not(target_os = "windows"))]
    pub fn get_default_profiling_configs() -> Criterion {
        Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
    }

    #[cfg(target_os = "windows")]
    pub fn get_default_profiling_configs() -> Criterion {
        Criterion::default()
    }

    /// A full fit runs one fixed-point loop per mixture, so fewer samples are drawn than
    /// criterion's default to keep the large sizes tractable.
    pub fn set_default_benchmark_configs(benchmark: &mut BenchmarkGroup<WallTime>) {
        let sample_size: usize = 20;
        let measurement_time: Duration = Duration::new(15, 0);
        let confidence_level: f64 = 0.95;
        let warm_up_time: Duration = Duration::new(3, 0);
        let noise_threshold: f64 = 0.05;

        benchmark
            .sample_size(sample_size)
            .measurement_time(measurement_time)
            .confidence_level(confidence_level)
            .warm_up_time(warm_up_time)
            .noise_threshold(noise_threshold);
    }
}
