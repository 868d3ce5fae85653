//! Windowed counters and sampled gauges for services, pushed to Cloud Monitoring
//! on a fixed cadence.
//!
//! [`gearmetrics`] keeps two kinds of metric in a [`MetricRegistry`]:
//! * **counters**, running totals that start over after every successful push, and
//! * **gauges**, a value sampled from a probe function right before each push.
//!
//! A [`Reporter`] wakes up every period (15 seconds by default), samples the
//! gauges, and writes everything recorded since the last push as one batch of
//! time series. Empty windows are not sent. A window that fails to push is kept
//! and merged into the next one.
//!
//! # Getting Started
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! use gearmetrics::{global, instrument, ReporterConfiguration};
//!
//! let registry = global::init();
//! instrument::gauge(registry, "queue_depth", || 5.0);
//! let submit = instrument::counted(registry.clone(), "jobs_submitted", |job: u64| async move {
//!     job
//! });
//! submit(1).await;
//!
//! let reporter =
//!     global::default_reporter(Some("access-token"), ReporterConfiguration::default())?;
//! reporter.report_forever(std::future::pending()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure handling
//!
//! By default a failed push or a failing gauge probe ends the reporting loop,
//! leaving the recorded values in place. See [`PushFailurePolicy`] and
//! [`ProbeFailurePolicy`] to keep reporting instead.

pub mod downstream;
pub mod error;
pub mod global;
pub mod instrument;
pub mod registry;
pub mod reporter;
pub mod resource;
pub mod types;

/// Wire types for the monitoring backend - ideally you shouldn't need to do much with them.
/// Nevertheless, they are exported in case you need them.
pub mod proto;

pub use error::{ProbeError, PushError, ReportError};
pub use registry::{MetricRegistry, MetricsWindow, ProbeFailurePolicy};
pub use reporter::{
    PushFailurePolicy, ReportOutcome, Reporter, ReporterConfiguration, MIN_GRANULARITY,
};
pub use resource::{ResourceIdentity, ResourceLabels};
pub use types::{CounterPoint, GaugePoint, Name};
