use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, SystemTime},
};

use crate::{
    error::{ProbeError, StdError},
    types::{CounterPoint, GaugePoint, Name},
};

type Probe = Arc<dyn Fn() -> Result<f64, StdError> + Send + Sync>;

/// A restarted cumulative series must start at least this long after the
/// previous point's end.
const CUMULATIVE_RESTART_GAP: Duration = Duration::from_millis(1);

/// What to do when a gauge probe fails during a sampling pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailurePolicy {
    /// Stop the pass at the first failing probe and hand the error to the caller.
    /// Values sampled before the failure are kept.
    #[default]
    Propagate,
    /// Log the failing probe, leave its gauge unsampled, and keep going.
    Isolate,
}

/// Everything recorded since the last successful push.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MetricsWindow {
    /// Running totals, by counter name
    pub counters: HashMap<Name, CounterPoint>,
    /// Latest samples, by gauge name
    pub gauges: HashMap<Name, GaugePoint>,
}

impl MetricsWindow {
    /// True when there is nothing worth pushing.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.gauges.is_empty()
    }

    /// How many series this window turns into.
    pub fn len(&self) -> usize {
        self.counters.len() + self.gauges.len()
    }
}

/// The in-memory store behind counters and gauges.
///
/// Construct one per process and share it by `Arc` with the reporter and with
/// whatever records metrics. See [`crate::global::init`] if you want a
/// process-wide default instead.
///
/// All mutation goes through one lock around the current window, so an
/// increment lands either in the window being taken for a push or in the next
/// one; it is never dropped between the read and the reset.
#[derive(Default)]
pub struct MetricRegistry {
    window: Mutex<WindowState>,
    gauge_probes: Mutex<HashMap<Name, Probe>>,
}

#[derive(Debug, Default)]
struct WindowState {
    current: MetricsWindow,
    /// Counters created after a flush start no earlier than this
    next_window_start: Option<SystemTime>,
}

impl std::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("window", &self.lock_window().current)
            .field("gauge_probes", &self.lock_probes().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MetricRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add 1 to a counter. The first increment of a window stamps its start time,
    /// which is always at least 1ms after the end of the last taken window.
    ///
    /// This takes a short uncontended lock and never fails.
    pub fn increment(&self, name: impl Into<Name>) {
        let mut state = self.lock_window();
        let next_window_start = state.next_window_start;
        state
            .current
            .counters
            .entry(name.into())
            .or_insert_with(|| {
                let now = SystemTime::now();
                CounterPoint::starting_at(next_window_start.map_or(now, |start| start.max(now)))
            })
            .value += 1.0;
    }

    /// Register the sampling function for a gauge. The last registration for a name wins.
    pub fn register_gauge<TProbe>(&self, name: impl Into<Name>, probe: TProbe)
    where
        TProbe: Fn() -> f64 + Send + Sync + 'static,
    {
        self.insert_probe(
            name.into(),
            Arc::new(move || -> Result<f64, StdError> { Ok(probe()) }),
        );
    }

    /// Register a sampling function that may fail to produce a value.
    pub fn register_fallible_gauge<TProbe, TError>(&self, name: impl Into<Name>, probe: TProbe)
    where
        TProbe: Fn() -> Result<f64, TError> + Send + Sync + 'static,
        TError: Into<StdError>,
    {
        self.insert_probe(
            name.into(),
            Arc::new(move || -> Result<f64, StdError> { probe().map_err(Into::into) }),
        );
    }

    fn insert_probe(&self, name: Name, probe: Probe) {
        if self.lock_probes().insert(name.clone(), probe).is_some() {
            log::debug!("replaced gauge probe for {name}");
        }
    }

    /// Run every registered probe once, overwriting each gauge with its new value.
    ///
    /// A failing probe ends the pass and its error is returned.
    pub fn sample_gauges(&self) -> Result<(), ProbeError> {
        self.sample_gauges_with(ProbeFailurePolicy::Propagate)
    }

    /// Run every registered probe once under the given failure policy.
    pub fn sample_gauges_with(&self, policy: ProbeFailurePolicy) -> Result<(), ProbeError> {
        // Probes run without holding either lock, so they are free to record metrics themselves.
        let probes: Vec<(Name, Probe)> = self
            .lock_probes()
            .iter()
            .map(|(name, probe)| (name.clone(), probe.clone()))
            .collect();

        let mut samples = Vec::with_capacity(probes.len());
        let mut failure = None;
        for (name, probe) in probes {
            match probe() {
                Ok(value) => samples.push((name, value)),
                Err(source) => match policy {
                    ProbeFailurePolicy::Propagate => {
                        failure = Some(ProbeError { name, source });
                        break;
                    }
                    ProbeFailurePolicy::Isolate => {
                        log::error!("gauge probe {name} failed, skipping it this pass: {source}");
                    }
                },
            }
        }

        let sampled_at = SystemTime::now();
        let mut state = self.lock_window();
        for (name, value) in samples {
            state.current.gauges.insert(name, GaugePoint { value, sampled_at });
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// The current count for a counter, if it has been incremented this window.
    pub fn counter_value(&self, name: impl Into<Name>) -> Option<f64> {
        let name: Name = name.into();
        self.lock_window()
            .current
            .counters
            .get(&name)
            .map(|point| point.value)
    }

    /// The last sampled value of a gauge, if it has been sampled this window.
    pub fn gauge_value(&self, name: impl Into<Name>) -> Option<f64> {
        let name: Name = name.into();
        self.lock_window()
            .current
            .gauges
            .get(&name)
            .map(|point| point.value)
    }

    /// True when no counter has been incremented and no gauge sampled this window.
    pub fn is_empty(&self) -> bool {
        self.lock_window().current.is_empty()
    }

    /// Atomically swap out the current window, leaving an empty one behind.
    /// Gauge probes stay registered.
    ///
    /// Returns the end of the taken window along with it. The end is stamped
    /// under the lock and is strictly after every counter's start, so counters
    /// recorded from now on start at least 1ms after it.
    pub fn take_window(&self) -> (SystemTime, MetricsWindow) {
        let mut state = self.lock_window();
        let window = std::mem::take(&mut state.current);
        let end = window
            .counters
            .values()
            .map(|point| point.window_start + CUMULATIVE_RESTART_GAP)
            .fold(SystemTime::now(), SystemTime::max);
        state.next_window_start = Some(end + CUMULATIVE_RESTART_GAP);
        (end, window)
    }

    /// Put a window that could not be pushed back, merging it with whatever
    /// was recorded since it was taken.
    ///
    /// Counts add up and keep the earliest start. A gauge sampled since the
    /// window was taken is newer, so it is kept over the restored value.
    pub fn restore_window(&self, restored: MetricsWindow) {
        let mut state = self.lock_window();
        let window = &mut state.current;
        for (name, point) in restored.counters {
            window
                .counters
                .entry(name)
                .and_modify(|current| current.merge(point))
                .or_insert(point);
        }
        for (name, point) in restored.gauges {
            window.gauges.entry(name).or_insert(point);
        }
    }

    fn lock_window(&self) -> MutexGuard<'_, WindowState> {
        self.window
            .lock()
            .expect("local mutex should not be poisoned")
    }

    fn lock_probes(&self) -> MutexGuard<'_, HashMap<Name, Probe>> {
        self.gauge_probes
            .lock()
            .expect("local mutex should not be poisoned")
    }
}
