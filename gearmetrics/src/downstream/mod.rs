//! Types related to emitting metrics windows to the monitoring backend

use std::{future::Future, time::SystemTime};

use crate::{error::PushError, registry::MetricsWindow};

mod batcher;
mod channel_connection;
mod cloud_monitoring_downstream;

pub use batcher::{TimeSeriesBatcher, DEFAULT_METRIC_PREFIX};
pub use channel_connection::{get_client, ChannelType, TlsTrust};
pub use cloud_monitoring_downstream::{CloudMonitoringDownstream, CLOUD_MONITORING_ENDPOINT};

/// Maps a window of counters and gauges to whatever a downstream sends.
pub trait WindowBatcher {
    /// What the downstream accepts
    type TBatch;

    /// Build one batch covering every counter and gauge in the window.
    /// The window is borrowed so that it can be restored if the push fails.
    fn batch_window(&mut self, now: SystemTime, window: &MetricsWindow) -> Self::TBatch;
}

/// Somewhere to push batches.
pub trait Downstream<TBatch> {
    /// Send one batch. Resolves once the backend accepted or refused it.
    fn send(&mut self, batch: TBatch) -> impl Future<Output = Result<(), PushError>>;
}
