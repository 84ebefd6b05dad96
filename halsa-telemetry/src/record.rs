//! Records understood by the telemetry backend.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use halsa_core::FailureCause;
use serde::Serialize;

pub type Properties = BTreeMap<String, String>;
pub type Metrics = BTreeMap<String, f64>;

/// Result of an availability test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityTelemetry {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub duration: Duration,
    pub run_location: String,
    pub success: bool,
    pub message: Option<String>,
    pub properties: Properties,
    pub metrics: Metrics,
}

/// Named custom event with metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTelemetry {
    pub name: String,
    pub properties: Properties,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionTelemetry {
    pub failure: FailureCause,
    pub properties: Properties,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryRecord {
    Availability(AvailabilityTelemetry),
    Event(EventTelemetry),
    Exception(ExceptionTelemetry),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Availability,
    Event,
    Exception,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Availability => "availability",
            RecordKind::Event => "event",
            RecordKind::Exception => "exception",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TelemetryRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            TelemetryRecord::Availability(_) => RecordKind::Availability,
            TelemetryRecord::Event(_) => RecordKind::Event,
            TelemetryRecord::Exception(_) => RecordKind::Exception,
        }
    }

    pub fn properties(&self) -> &Properties {
        match self {
            TelemetryRecord::Availability(r) => &r.properties,
            TelemetryRecord::Event(r) => &r.properties,
            TelemetryRecord::Exception(r) => &r.properties,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        match self {
            TelemetryRecord::Availability(r) => &r.metrics,
            TelemetryRecord::Event(r) => &r.metrics,
            TelemetryRecord::Exception(r) => &r.metrics,
        }
    }

    pub fn as_availability(&self) -> Option<&AvailabilityTelemetry> {
        match self {
            TelemetryRecord::Availability(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&EventTelemetry> {
        match self {
            TelemetryRecord::Event(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_exception(&self) -> Option<&ExceptionTelemetry> {
        match self {
            TelemetryRecord::Exception(r) => Some(r),
            _ => None,
        }
    }
}

impl From<AvailabilityTelemetry> for TelemetryRecord {
    fn from(record: AvailabilityTelemetry) -> Self {
        TelemetryRecord::Availability(record)
    }
}

impl From<EventTelemetry> for TelemetryRecord {
    fn from(record: EventTelemetry) -> Self {
        TelemetryRecord::Event(record)
    }
}

impl From<ExceptionTelemetry> for TelemetryRecord {
    fn from(record: ExceptionTelemetry) -> Self {
        TelemetryRecord::Exception(record)
    }
}
