//! Core traits
//!
//! The statistics sink is the only state that outlives an event. Selection
//! components receive it explicitly and never look it up globally, so a
//! caller can hand every worker its own accumulator and merge afterwards.

/// Destination for named scalar observations.
///
/// Names are stable identifiers declared once at setup with fixed binning;
/// implementations decide how to treat names they do not know.
pub trait StatisticsSink {
    /// Record one sample of the 1D distribution `name`.
    fn fill(&mut self, name: &str, value: f64);

    /// Record one `(x, y)` sample of the profile `name`.
    fn fill_profile(&mut self, name: &str, x: f64, y: f64);
}

impl<S: StatisticsSink + ?Sized> StatisticsSink for &mut S {
    fn fill(&mut self, name: &str, value: f64) {
        (**self).fill(name, value);
    }

    fn fill_profile(&mut self, name: &str, x: f64, y: f64) {
        (**self).fill_profile(name, x, y);
    }
}

/// One raw observation captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// A 1D sample.
    Value {
        /// Distribution name
        name: String,
        /// Sample value
        value: f64,
    },
    /// A profile sample.
    Profile {
        /// Profile name
        name: String,
        /// Abscissa
        x: f64,
        /// Ordinate
        y: f64,
    },
}

impl Observation {
    /// Name of the distribution this observation targets.
    pub fn name(&self) -> &str {
        match self {
            Observation::Value { name, .. } | Observation::Profile { name, .. } => name,
        }
    }
}

/// Sink that keeps every observation in arrival order, without binning.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Observations in the order they were pushed.
    pub observations: Vec<Observation>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All 1D values pushed to `name`, in order.
    pub fn values(&self, name: &str) -> Vec<f64> {
        self.observations
            .iter()
            .filter_map(|o| match o {
                Observation::Value { name: n, value } if n == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// All profile samples pushed to `name`, in order.
    pub fn profile_points(&self, name: &str) -> Vec<(f64, f64)> {
        self.observations
            .iter()
            .filter_map(|o| match o {
                Observation::Profile { name: n, x, y } if n == name => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Number of observations of any kind pushed to `name`.
    pub fn count(&self, name: &str) -> usize {
        self.observations.iter().filter(|o| o.name() == name).count()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl StatisticsSink for RecordingSink {
    fn fill(&mut self, name: &str, value: f64) {
        self.observations.push(Observation::Value { name: name.to_string(), value });
    }

    fn fill_profile(&mut self, name: &str, x: f64, y: f64) {
        self.observations.push(Observation::Profile { name: name.to_string(), x, y });
    }
}
