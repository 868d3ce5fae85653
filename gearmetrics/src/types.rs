use std::{
    cmp::Ordering,
    fmt::Display,
    hash::{Hash, Hasher},
    sync::Arc,
    time::SystemTime,
};

/// An identifier for a counter or a gauge.
///
/// Counters and gauges live in separate maps, so the same `Name` can be used
/// for one of each without colliding. Equality, ordering and hashing only look at
/// the text, so `Name::Str("x")` and `Name::String("x".into())` are the same metric.
#[derive(Debug, Clone)]
pub enum Name {
    /// A static string Name.
    Str(&'static str),
    /// A String name. Avoid these when you can, because clones can add up.
    String(String),
    /// If you have a rarely-changing identifier you could consider using shared memory
    /// instead of cloning repeatedly.
    Shared(Arc<String>),
}

impl Name {
    /// an &str view of the name
    pub fn as_str(&self) -> &str {
        match self {
            Name::Str(s) => s,
            Name::String(s) => s,
            Name::Shared(s) => s,
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        match name {
            Name::Str(s) => s.to_owned(),
            Name::String(s) => s,
            Name::Shared(s) => Arc::<String>::try_unwrap(s).unwrap_or_else(|this| this.to_string()),
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for Name {
    fn from(s: &'static str) -> Self {
        Self::Str(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Arc<String>> for Name {
    fn from(s: Arc<String>) -> Self {
        Self::Shared(s)
    }
}

/// The running total of a counter since the last successful push.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterPoint {
    /// Number of increments in this window
    pub value: f64,
    /// When the first increment of this window happened
    pub window_start: SystemTime,
}

impl CounterPoint {
    pub(crate) fn starting_at(window_start: SystemTime) -> Self {
        Self {
            value: 0.0,
            window_start,
        }
    }

    /// Fold another window's count for the same counter into this one.
    pub(crate) fn merge(&mut self, other: CounterPoint) {
        self.value += other.value;
        self.window_start = self.window_start.min(other.window_start);
    }
}

/// The most recent sample of a gauge probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugePoint {
    /// Whatever the probe last returned
    pub value: f64,
    /// When the probe was sampled
    pub sampled_at: SystemTime,
}

#[cfg(test)]
mod test {
    use std::{
        sync::Arc,
        time::{Duration, SystemTime},
    };

    use super::{CounterPoint, Name};

    #[test_log::test]
    fn names_compare_by_text() {
        assert_eq!(Name::from("jobs"), Name::String("jobs".to_string()));
        assert_eq!(
            Name::Str("jobs"),
            Name::Shared(Arc::new("jobs".to_string()))
        );
        assert_eq!("jobs", Name::from("jobs".to_string()).as_str());
        assert_eq!(
            "jobs",
            String::from(Name::from(Arc::new("jobs".to_string())))
        );
    }

    #[test_log::test]
    fn merge_keeps_earliest_window_start() {
        let earlier = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let later = SystemTime::UNIX_EPOCH + Duration::from_secs(20);

        let mut current = CounterPoint {
            value: 2.0,
            window_start: later,
        };
        current.merge(CounterPoint {
            value: 3.0,
            window_start: earlier,
        });

        assert_eq!(
            CounterPoint {
                value: 5.0,
                window_start: earlier,
            },
            current
        );
    }
}
