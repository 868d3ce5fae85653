//! A process-wide registry for code that cannot easily be handed one.

use std::sync::{Arc, OnceLock};

use crate::{
    downstream::{ChannelType, CloudMonitoringDownstream, TimeSeriesBatcher},
    error::StdError,
    registry::MetricRegistry,
    reporter::{Reporter, ReporterConfiguration},
    resource::ResourceIdentity,
};

/// A reporter pushing the default registry to Cloud Monitoring.
pub type DefaultReporter = Reporter<TimeSeriesBatcher, CloudMonitoringDownstream<ChannelType>>;

static DEFAULT_REGISTRY: OnceLock<Arc<MetricRegistry>> = OnceLock::new();

/// The default registry. You should use this unless you construct and pass
/// your own registry around.
///
/// Only the first call creates it; every later call returns the same one.
/// Remember to run a reporter for it (see [`default_reporter`]).
pub fn init() -> &'static Arc<MetricRegistry> {
    DEFAULT_REGISTRY.get_or_init(|| {
        log::info!("initialized default metric registry");
        Arc::new(MetricRegistry::new())
    })
}

/// A reporter for the default registry, pushing to Cloud Monitoring as the
/// process identity found in the environment.
pub fn default_reporter(
    bearer_token: Option<&str>,
    configuration: ReporterConfiguration,
) -> Result<DefaultReporter, StdError> {
    let identity = ResourceIdentity::from_env();
    Ok(Reporter::new(
        init().clone(),
        TimeSeriesBatcher::new(&identity),
        CloudMonitoringDownstream::connect(bearer_token)?,
        configuration,
    ))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::init;

    #[test_log::test]
    fn init_is_idempotent() {
        let first = init();
        first.increment("global_init_test");
        let second = init();

        assert!(Arc::ptr_eq(first, second));
        assert!(second.counter_value("global_init_test").is_some());
    }
}
