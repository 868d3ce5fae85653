//! Error types for sampling and pushing

use std::time::Duration;

use thiserror::Error;

use crate::types::Name;

pub(crate) type StdError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A gauge probe could not produce a value.
#[derive(Debug, Error)]
#[error("gauge probe `{name}` failed: {source}")]
pub struct ProbeError {
    /// The gauge whose probe failed
    pub name: Name,
    /// Whatever the probe reported
    #[source]
    pub source: StdError,
}

/// The monitoring backend did not accept a window of time series.
#[derive(Debug, Error)]
pub enum PushError {
    /// The backend answered with a non-ok grpc status
    #[error("monitoring backend rejected time series: {0}")]
    Rejected(Box<tonic::Status>),

    /// The push did not complete within the configured timeout
    #[error("push did not complete within {0:?}")]
    TimedOut(Duration),
}

impl From<tonic::Status> for PushError {
    fn from(status: tonic::Status) -> Self {
        Self::Rejected(Box::new(status))
    }
}

/// Why a reporting loop stopped.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A gauge probe failed while sampling
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// The window could not be pushed
    #[error(transparent)]
    Push(#[from] PushError),
}
