//! Attach counters and gauges to existing code without changing its behavior.

use std::{
    future::Future,
    sync::Arc,
    task::{Context, Poll},
};

use tower::{Layer, Service};

use crate::{registry::MetricRegistry, types::Name};

/// Wrap an async operation so that every invocation counts once toward `name`.
///
/// The count happens when the wrapped operation is called, before its future
/// is awaited, and regardless of how that future turns out. The operation's
/// output is returned untouched.
///
/// ```
/// # tokio_test::block_on(async {
/// use std::sync::Arc;
/// use gearmetrics::{instrument::counted, MetricRegistry};
///
/// let registry = Arc::new(MetricRegistry::new());
/// let submit = counted(registry.clone(), "jobs_submitted", |job: u32| async move { job * 2 });
///
/// assert_eq!(4, submit(2).await);
/// assert_eq!(Some(1.0), registry.counter_value("jobs_submitted"));
/// # });
/// ```
pub fn counted<TArgs, TOperation, TFuture>(
    registry: Arc<MetricRegistry>,
    name: impl Into<Name>,
    operation: TOperation,
) -> impl Fn(TArgs) -> TFuture
where
    TOperation: Fn(TArgs) -> TFuture,
    TFuture: Future,
{
    let name = name.into();
    move |args| {
        registry.increment(name.clone());
        operation(args)
    }
}

/// Register `probe` as the sampling function of gauge `name`, and hand it back
/// so it can still be called directly.
pub fn gauge<TProbe>(registry: &MetricRegistry, name: impl Into<Name>, probe: TProbe) -> TProbe
where
    TProbe: Fn() -> f64 + Clone + Send + Sync + 'static,
{
    registry.register_gauge(name, probe.clone());
    probe
}

/// Tower middleware counting every request that reaches the wrapped service.
#[derive(Debug, Clone)]
pub struct CountingLayer {
    registry: Arc<MetricRegistry>,
    name: Name,
}

impl CountingLayer {
    /// Count requests toward `name` in `registry`
    pub fn new(registry: Arc<MetricRegistry>, name: impl Into<Name>) -> Self {
        Self {
            registry,
            name: name.into(),
        }
    }
}

impl<S> Layer<S> for CountingLayer {
    type Service = CountingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CountingService {
            inner,
            registry: self.registry.clone(),
            name: self.name.clone(),
        }
    }
}

/// A service that counts each call, then delegates.
#[derive(Debug, Clone)]
pub struct CountingService<S> {
    inner: S,
    registry: Arc<MetricRegistry>,
    name: Name,
}

impl<S, Request> Service<Request> for CountingService<S>
where
    S: Service<Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.registry.increment(self.name.clone());
        self.inner.call(request)
    }
}
