use std::{collections::HashMap, time::SystemTime};

use crate::{
    proto::monitoring::{
        typed_value, CreateTimeSeriesRequest, Metric, MetricKind, MonitoredResource, Point,
        TimeInterval, TimeSeries, TypedValue, ValueType,
    },
    registry::MetricsWindow,
    resource::{ResourceIdentity, RESOURCE_TYPE},
    types::Name,
};

use super::WindowBatcher;

/// Custom metric types live under this prefix.
pub const DEFAULT_METRIC_PREFIX: &str = "custom.googleapis.com";

/// The mapping from a metrics window to one Cloud Monitoring write request.
///
/// Counters become CUMULATIVE series covering `[window_start, now]`, gauges
/// become GAUGE series at the time they were sampled. Every series carries the same monitored resource.
#[derive(Debug, Clone)]
pub struct TimeSeriesBatcher {
    project_path: String,
    metric_prefix: String,
    resource_labels: HashMap<String, String>,
}

impl TimeSeriesBatcher {
    /// Create a batcher writing into the identity's project, labeled with its resource labels.
    pub fn new(identity: &ResourceIdentity) -> Self {
        Self {
            project_path: identity.project_path(),
            metric_prefix: DEFAULT_METRIC_PREFIX.to_string(),
            resource_labels: identity.labels.to_label_map(),
        }
    }

    /// Use a different metric type prefix (default `custom.googleapis.com`).
    pub fn metric_prefix(&mut self, metric_prefix: impl Into<String>) {
        self.metric_prefix = metric_prefix.into()
    }

    fn time_series(
        &self,
        name: &Name,
        kind: MetricKind,
        value: f64,
        start: SystemTime,
        end: SystemTime,
    ) -> TimeSeries {
        TimeSeries {
            metric: Some(Metric {
                r#type: format!("{}/{name}", self.metric_prefix),
                labels: HashMap::new(),
            }),
            resource: Some(MonitoredResource {
                r#type: RESOURCE_TYPE.to_string(),
                labels: self.resource_labels.clone(),
            }),
            metric_kind: kind as i32,
            value_type: ValueType::Double as i32,
            points: vec![Point {
                interval: Some(TimeInterval {
                    start_time: Some(start.into()),
                    end_time: Some(end.into()),
                }),
                value: Some(TypedValue {
                    value: Some(typed_value::Value::DoubleValue(value)),
                }),
            }],
            unit: String::new(),
        }
    }
}

impl WindowBatcher for TimeSeriesBatcher {
    type TBatch = CreateTimeSeriesRequest;

    fn batch_window(&mut self, now: SystemTime, window: &MetricsWindow) -> Self::TBatch {
        let mut counters: Vec<_> = window.counters.iter().collect();
        counters.sort_by(|(a, _), (b, _)| a.cmp(b));
        let mut gauges: Vec<_> = window.gauges.iter().collect();
        gauges.sort_by(|(a, _), (b, _)| a.cmp(b));

        let counter_series = counters.into_iter().map(|(name, point)| {
            self.time_series(
                name,
                MetricKind::Cumulative,
                point.value,
                point.window_start.min(now),
                now,
            )
        });
        let gauge_series = gauges.into_iter().map(|(name, point)| {
            self.time_series(
                name,
                MetricKind::Gauge,
                point.value,
                point.sampled_at,
                point.sampled_at,
            )
        });

        CreateTimeSeriesRequest {
            name: self.project_path.clone(),
            time_series: counter_series.chain(gauge_series).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::{
        collections::HashMap,
        time::{Duration, SystemTime},
    };

    use prost_types::Timestamp;

    use crate::{
        downstream::WindowBatcher,
        proto::monitoring::{typed_value, MetricKind, TimeSeries, ValueType},
        registry::MetricsWindow,
        resource::ResourceIdentity,
        types::{CounterPoint, GaugePoint, Name},
    };

    use super::TimeSeriesBatcher;

    fn identity() -> ResourceIdentity {
        let environment = HashMap::from([
            ("HAIL_GCP_PROJECT", "hail-vdc"),
            ("HAIL_GCP_ZONE", "us-central1-a"),
            ("KUBERNETES_CONTAINER_NAME", "batch"),
            ("KUBERNETES_POD_NAME", "batch-0"),
        ]);
        ResourceIdentity::from_lookup(|key| environment.get(key).map(|v| v.to_string()))
    }

    fn value_of(series: &TimeSeries) -> Option<f64> {
        match series.points[0].value.as_ref()?.value.as_ref()? {
            typed_value::Value::DoubleValue(value) => Some(*value),
            _ => None,
        }
    }

    #[test_log::test]
    fn counters_and_gauges_become_series() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let window_start = now - Duration::from_secs(12);
        let sampled_at = now - Duration::from_millis(3);
        let window = MetricsWindow {
            counters: HashMap::from([(
                Name::from("jobs_submitted"),
                CounterPoint {
                    value: 3.0,
                    window_start,
                },
            )]),
            gauges: HashMap::from([(
                Name::from("queue_depth"),
                GaugePoint {
                    value: 5.0,
                    sampled_at,
                },
            )]),
        };

        let request = TimeSeriesBatcher::new(&identity()).batch_window(now, &window);

        assert_eq!("projects/hail-vdc", request.name);
        assert_eq!(2, request.time_series.len());

        let counter = &request.time_series[0];
        assert_eq!(
            "custom.googleapis.com/jobs_submitted",
            counter.metric.as_ref().map(|m| m.r#type.as_str()).unwrap_or_default()
        );
        assert_eq!(MetricKind::Cumulative as i32, counter.metric_kind);
        assert_eq!(ValueType::Double as i32, counter.value_type);
        assert_eq!(Some(3.0), value_of(counter));
        let interval = counter.points[0].interval.clone().unwrap_or_default();
        assert_eq!(Some(Timestamp::from(window_start)), interval.start_time);
        assert_eq!(Some(Timestamp::from(now)), interval.end_time);

        let gauge = &request.time_series[1];
        assert_eq!(
            "custom.googleapis.com/queue_depth",
            gauge.metric.as_ref().map(|m| m.r#type.as_str()).unwrap_or_default()
        );
        assert_eq!(MetricKind::Gauge as i32, gauge.metric_kind);
        assert_eq!(Some(5.0), value_of(gauge));
        let interval = gauge.points[0].interval.clone().unwrap_or_default();
        assert_eq!(Some(Timestamp::from(sampled_at)), interval.start_time);
        assert_eq!(Some(Timestamp::from(sampled_at)), interval.end_time);
        assert_eq!("", gauge.unit);
        assert_eq!("", counter.unit);

        let resource = gauge.resource.clone().unwrap_or_default();
        assert_eq!("k8s_container", resource.r#type);
        assert_eq!(Some(&"vdc".to_string()), resource.labels.get("cluster_name"));
        assert_eq!(Some(&"batch-0".to_string()), resource.labels.get("pod_name"));
        assert_eq!(Some(&"default".to_string()), resource.labels.get("namespace_name"));
    }

    #[test_log::test]
    fn custom_prefix() {
        let now = SystemTime::now();
        let mut batcher = TimeSeriesBatcher::new(&identity());
        batcher.metric_prefix("custom.googleapis.com/batch");
        let window = MetricsWindow {
            counters: HashMap::from([(Name::from("x"), CounterPoint::starting_at(now))]),
            gauges: HashMap::new(),
        };

        let request = batcher.batch_window(now, &window);
        assert_eq!(
            "custom.googleapis.com/batch/x",
            request.time_series[0]
                .metric
                .as_ref()
                .map(|m| m.r#type.as_str())
                .unwrap_or_default()
        );
    }
}
