//! Wire types for the monitoring backend. These mirror the subset of
//! `google.monitoring.v3` that writing custom metrics needs.

// Field and variant names follow the upstream protos
#[allow(clippy::all)]
#[rustfmt::skip]
pub mod monitoring;
