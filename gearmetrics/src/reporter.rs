use std::{
    future::Future,
    pin::pin,
    sync::Arc,
    time::Duration,
};

use tokio::time::{Instant, MissedTickBehavior};

use crate::{
    downstream::{Downstream, WindowBatcher},
    error::{PushError, ReportError},
    registry::{MetricRegistry, ProbeFailurePolicy},
};

/// The smallest reporting period the backend accepts for custom metrics.
pub const MIN_GRANULARITY: Duration = Duration::from_secs(15);

/// What the reporting loop does when a push fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PushFailurePolicy {
    /// Keep the values and stop the loop with the error.
    #[default]
    Terminate,
    /// Keep the values for the next window, log, and keep reporting.
    Continue,
}

/// Configuration for a [`Reporter`]
#[derive(Debug, Clone)]
pub struct ReporterConfiguration {
    period: Duration,
    fine_granularity: bool,
    push_failure: PushFailurePolicy,
    probe_failure: ProbeFailurePolicy,
    push_timeout: Option<Duration>,
}

impl Default for ReporterConfiguration {
    fn default() -> Self {
        Self {
            period: MIN_GRANULARITY,
            fine_granularity: false,
            push_failure: PushFailurePolicy::default(),
            probe_failure: ProbeFailurePolicy::default(),
            push_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ReporterConfiguration {
    /// Set the reporting period (default 15s). Periods under 15s are raised to 15s
    /// unless fine granularity is allowed.
    pub fn period(&mut self, period: Duration) -> &mut Self {
        self.period = period;
        self
    }

    /// Allow periods under 15s. Useful for tests and for backends other than Cloud Monitoring.
    pub fn allow_fine_granularity(&mut self) -> &mut Self {
        self.fine_granularity = true;
        self
    }

    /// Set what happens when a push fails (default: terminate).
    pub fn push_failure(&mut self, push_failure: PushFailurePolicy) -> &mut Self {
        self.push_failure = push_failure;
        self
    }

    /// Set what happens when a gauge probe fails (default: propagate).
    pub fn probe_failure(&mut self, probe_failure: ProbeFailurePolicy) -> &mut Self {
        self.probe_failure = probe_failure;
        self
    }

    /// Bound each push (default 30s). `None` waits for as long as the backend takes.
    pub fn push_timeout(&mut self, push_timeout: Option<Duration>) -> &mut Self {
        self.push_timeout = push_timeout;
        self
    }

    /// The period the reporter will actually use.
    pub fn effective_period(&self) -> Duration {
        if self.fine_granularity {
            self.period
        } else {
            self.period.max(MIN_GRANULARITY)
        }
    }
}

/// What one reporting pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Nothing was recorded, so nothing was sent.
    Skipped,
    /// One push carrying this many series succeeded.
    Pushed {
        /// counters plus gauges in the push
        series: usize,
    },
}

/// Periodically samples gauges and pushes the registry's window downstream.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// use std::sync::Arc;
/// use gearmetrics::{
///     downstream::{CloudMonitoringDownstream, TimeSeriesBatcher},
///     MetricRegistry, Reporter, ReporterConfiguration, ResourceIdentity,
/// };
///
/// let registry = Arc::new(MetricRegistry::new());
/// let reporter = Reporter::new(
///     registry.clone(),
///     TimeSeriesBatcher::new(&ResourceIdentity::from_env()),
///     CloudMonitoringDownstream::connect(Some("access-token"))?,
///     ReporterConfiguration::default(),
/// );
/// reporter.report_forever(std::future::pending()).await?;
/// # Ok(())
/// # }
/// ```
pub struct Reporter<TBatcher, TDownstream> {
    registry: Arc<MetricRegistry>,
    batcher: TBatcher,
    downstream: TDownstream,
    configuration: ReporterConfiguration,
}

impl<TBatcher, TDownstream> Reporter<TBatcher, TDownstream>
where
    TBatcher: WindowBatcher,
    TDownstream: Downstream<TBatcher::TBatch>,
{
    /// Create a reporter for a registry.
    pub fn new(
        registry: Arc<MetricRegistry>,
        batcher: TBatcher,
        downstream: TDownstream,
        configuration: ReporterConfiguration,
    ) -> Self {
        Self {
            registry,
            batcher,
            downstream,
            configuration,
        }
    }

    /// The registry this reporter flushes.
    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    /// Run one sampling pass and, if anything was recorded, push it.
    ///
    /// On success the registry starts a fresh window. On failure the window is
    /// put back, merged with anything recorded meanwhile.
    pub async fn report_once(&mut self) -> Result<ReportOutcome, ReportError> {
        self.registry
            .sample_gauges_with(self.configuration.probe_failure)?;

        let (end, window) = self.registry.take_window();
        if window.is_empty() {
            log::debug!("nothing recorded this window");
            return Ok(ReportOutcome::Skipped);
        }

        let batch = self.batcher.batch_window(end, &window);
        let pushed = match self.configuration.push_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.downstream.send(batch))
                .await
                .unwrap_or(Err(PushError::TimedOut(timeout))),
            None => self.downstream.send(batch).await,
        };

        match pushed {
            Ok(()) => Ok(ReportOutcome::Pushed {
                series: window.len(),
            }),
            Err(error) => {
                self.registry.restore_window(window);
                Err(error.into())
            }
        }
    }

    /// Spawn this on a tokio runtime to report your metrics every period.
    ///
    /// The first report happens one full period after the call. `shutdown` is
    /// only watched between reports: once it resolves the loop returns `Ok`,
    /// after letting a report that is in progress finish.
    pub async fn report_forever(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ReportError> {
        let period = self.configuration.effective_period();
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown = pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("metrics reporter shutting down");
                    return Ok(());
                }
                _ = interval.tick() => {}
            }

            match self.report_once().await {
                Ok(ReportOutcome::Pushed { series }) => log::debug!("reported {series} series"),
                Ok(ReportOutcome::Skipped) => (),
                Err(ReportError::Push(error))
                    if self.configuration.push_failure == PushFailurePolicy::Continue =>
                {
                    log::error!("could not report metrics, keeping them for the next window: {error}");
                }
                Err(error) => {
                    log::error!("metrics reporting stopped: {error}");
                    return Err(error);
                }
            }
        }
    }
}
