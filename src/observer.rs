//! Progress observation for the fixed-point iteration
//!
//! The estimator never prints. Progress is reported to an [`IcaObserver`] instead: `()` ignores
//! everything, [`LogObserver`] forwards to the `log` facade (this is what the `verbose` flag
//! selects) and [`RecordingObserver`] keeps the events for later inspection.
use crate::fast_ica::ComponentReport;
use crate::Float;

/// Receives progress events while a model is fitted
///
/// Observation has no influence on the result of the fit.
pub trait IcaObserver<F: Float> {
    /// The mixtures were whitened
    fn on_whitened(&mut self, _nmixtures: usize, _nsamples: usize) {}

    /// One fixed-point update of `component` finished, `iteration` starts at zero
    fn on_iteration(&mut self, _component: usize, _iteration: usize, _distance: F) {}

    /// The weight vector of `component` is final
    fn on_component(&mut self, _component: usize, _report: &ComponentReport<F>) {}
}

impl<F: Float> IcaObserver<F> for () {}

impl<F: Float, O: IcaObserver<F> + ?Sized> IcaObserver<F> for &mut O {
    fn on_whitened(&mut self, nmixtures: usize, nsamples: usize) {
        (**self).on_whitened(nmixtures, nsamples)
    }

    fn on_iteration(&mut self, component: usize, iteration: usize, distance: F) {
        (**self).on_iteration(component, iteration, distance)
    }

    fn on_component(&mut self, component: usize, report: &ComponentReport<F>) {
        (**self).on_component(component, report)
    }
}

/// Writes progress to the `log` facade
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogObserver;

impl<F: Float> IcaObserver<F> for LogObserver {
    fn on_whitened(&mut self, nmixtures: usize, nsamples: usize) {
        log::info!(
            "whitening of {} mixtures ({} samples) was performed, looking for {} components",
            nmixtures,
            nsamples,
            nmixtures
        );
    }

    fn on_iteration(&mut self, component: usize, iteration: usize, distance: F) {
        log::trace!(
            "component {} iteration {}: distance {:e}",
            component,
            iteration,
            distance
        );
    }

    fn on_component(&mut self, component: usize, report: &ComponentReport<F>) {
        if report.converged() {
            log::info!(
                "w{} converges in {} steps",
                component,
                report.iterations()
            );
        }
    }
}

/// A single observed event
#[derive(Debug, Clone, PartialEq)]
pub enum IcaEvent<F> {
    Whitened {
        nmixtures: usize,
        nsamples: usize,
    },
    Iteration {
        component: usize,
        iteration: usize,
        distance: F,
    },
    Component {
        component: usize,
        report: ComponentReport<F>,
    },
}

/// Keeps every event in order of arrival
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingObserver<F> {
    events: Vec<IcaEvent<F>>,
}

impl<F> Default for RecordingObserver<F> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<F: Float> RecordingObserver<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[IcaEvent<F>] {
        &self.events
    }

    /// Convergence distances of `component`, in iteration order
    pub fn distances(&self, component: usize) -> Vec<F> {
        self.events
            .iter()
            .filter_map(|event| match event {
                IcaEvent::Iteration {
                    component: c,
                    distance,
                    ..
                } if *c == component => Some(*distance),
                _ => None,
            })
            .collect()
    }
}

impl<F: Float> IcaObserver<F> for RecordingObserver<F> {
    fn on_whitened(&mut self, nmixtures: usize, nsamples: usize) {
        self.events.push(IcaEvent::Whitened {
            nmixtures,
            nsamples,
        });
    }

    fn on_iteration(&mut self, component: usize, iteration: usize, distance: F) {
        self.events.push(IcaEvent::Iteration {
            component,
            iteration,
            distance,
        });
    }

    fn on_component(&mut self, component: usize, report: &ComponentReport<F>) {
        self.events.push(IcaEvent::Component {
            component,
            report: report.clone(),
        });
    }
}

/// Adapts a closure `(component, iteration, distance)` to an observer of iteration events
pub struct IterationCallback<C>(pub C);

impl<F: Float, C: FnMut(usize, usize, F)> IcaObserver<F> for IterationCallback<C> {
    fn on_iteration(&mut self, component: usize, iteration: usize, distance: F) {
        (self.0)(component, iteration, distance)
    }
}
