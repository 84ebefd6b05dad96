//! Health reports as handed over by the health-check engine.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::failure::FailureCause;
use crate::status::HealthStatus;

/// Rendering of a `null` diagnostic value.
pub const NULL_PLACEHOLDER: &str = "<null>";

/// Result of a single named probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReportEntry {
    pub status: HealthStatus,
    pub duration: Duration,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub failure: Option<FailureCause>,
    #[serde(default)]
    pub data: IndexMap<String, Value>,
}

impl HealthReportEntry {
    pub fn new(status: HealthStatus, duration: Duration) -> Self {
        Self {
            status,
            duration,
            description: None,
            failure: None,
            data: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_failure(mut self, failure: FailureCause) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Description, or an empty string when the probe gave none.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Outcome of one health-check cycle.
///
/// Entries are keyed by check name and iterate in the order the engine
/// registered the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub total_duration: Duration,
    #[serde(default)]
    pub entries: IndexMap<String, HealthReportEntry>,
}

impl HealthReport {
    /// Build a report whose overall status is the worst entry status.
    /// An empty report is `Healthy`.
    pub fn new(entries: IndexMap<String, HealthReportEntry>, total_duration: Duration) -> Self {
        let status = entries
            .values()
            .map(|entry| entry.status)
            .min()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            total_duration,
            entries,
        }
    }

    /// Build a report with an explicit overall status.
    pub fn with_status(
        status: HealthStatus,
        total_duration: Duration,
        entries: IndexMap<String, HealthReportEntry>,
    ) -> Self {
        Self {
            status,
            total_duration,
            entries,
        }
    }

    pub fn entries_with_failure(&self) -> impl Iterator<Item = (&String, &HealthReportEntry)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.failure.is_some())
    }
}

/// Stringify a diagnostic value: strings verbatim, `null` as
/// [`NULL_PLACEHOLDER`], anything else as JSON text.
pub fn render_data_value(value: &Value) -> String {
    match value {
        Value::Null => NULL_PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
