//! Report to record mapping.
//!
//! Pure functions of the report, the options and the capture timestamp. No
//! telemetry is sent from here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use halsa_config::PublisherOptions;
use halsa_core::{render_data_value, FailureCause, HealthReport, HealthReportEntry};
use halsa_telemetry::{
    AvailabilityTelemetry, EventTelemetry, ExceptionTelemetry, Metrics, Properties,
    TelemetryRecord,
};

use crate::host::HostInfo;
use crate::mode::{is_success, status_metric, EmissionMode};

pub const CHECK_NAME_PROPERTY: &str = "HealthCheckName";
pub const STATUS_METRIC: &str = "HealthCheckStatus";
pub const DURATION_METRIC: &str = "HealthCheckDuration";

pub const STATUS_PREFIX: &str = "HealthCheck-Status-";
pub const DURATION_PREFIX: &str = "HealthCheck-Duration-";
pub const DESCRIPTION_PREFIX: &str = "HealthCheck-Description-";
pub const DATA_PREFIX: &str = "HealthCheck-Data-";

pub struct RecordMapper<'a> {
    mode: EmissionMode,
    options: &'a PublisherOptions,
    host: &'a HostInfo,
    timestamp: DateTime<Utc>,
}

impl<'a> RecordMapper<'a> {
    pub fn new(
        mode: EmissionMode,
        options: &'a PublisherOptions,
        host: &'a HostInfo,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            mode,
            options,
            host,
            timestamp,
        }
    }

    /// All records for `report`, in dispatch order.
    ///
    /// Detailed modes emit the per-check pass first, then one extra record per
    /// check carrying a failure. Aggregate modes never emit exception records.
    pub fn map(&self, report: &HealthReport) -> Vec<TelemetryRecord> {
        match self.mode {
            EmissionMode::AggregateEvent => vec![self.aggregate_event(report).into()],
            EmissionMode::AggregateAvailability { full_report } => {
                vec![self.aggregate_availability(report, full_report).into()]
            }
            EmissionMode::DetailedEvent | EmissionMode::DetailedAvailability { .. } => {
                self.detailed(report)
            }
        }
    }

    fn detailed(&self, report: &HealthReport) -> Vec<TelemetryRecord> {
        let exclude_healthy = self.options.exclude_healthy_reports;

        let per_check = report
            .entries
            .iter()
            .filter(|(_, entry)| !(exclude_healthy && entry.status.is_healthy()))
            .map(|(name, entry)| self.check_record(name, entry));

        let failures = report.entries_with_failure().filter_map(|(name, entry)| {
            entry
                .failure
                .as_ref()
                .map(|failure| self.failure_record(name, entry, failure))
        });

        per_check.chain(failures).collect()
    }

    /// `<test>-<check>` for full reports, `<test>:<check>` otherwise.
    fn check_name(&self, name: &str) -> String {
        match self.mode {
            EmissionMode::DetailedAvailability { full_report: true } => {
                format!("{}-{}", self.options.test_name, name)
            }
            _ => format!("{}:{}", self.options.test_name, name),
        }
    }

    fn check_record(&self, name: &str, entry: &HealthReportEntry) -> TelemetryRecord {
        match self.mode {
            EmissionMode::DetailedAvailability { full_report } => {
                let message = if full_report {
                    entry.description.clone()
                } else {
                    None
                };
                self.check_availability(name, entry, message, full_report)
                    .into()
            }
            _ => EventTelemetry {
                name: self.check_name(name),
                properties: self.check_properties(name),
                metrics: check_metrics(entry),
            }
            .into(),
        }
    }

    fn failure_record(
        &self,
        name: &str,
        entry: &HealthReportEntry,
        failure: &FailureCause,
    ) -> TelemetryRecord {
        match self.mode {
            EmissionMode::DetailedAvailability { full_report } => self
                .check_availability(name, entry, Some(failure.to_string()), full_report)
                .into(),
            _ => ExceptionTelemetry {
                failure: failure.clone(),
                properties: self.check_properties(name),
                metrics: check_metrics(entry),
            }
            .into(),
        }
    }

    fn check_availability(
        &self,
        name: &str,
        entry: &HealthReportEntry,
        message: Option<String>,
        full_report: bool,
    ) -> AvailabilityTelemetry {
        let mut record = self.availability(self.check_name(name), entry, message);
        if full_report {
            record.properties.extend(data_properties(entry));
        }
        record
    }

    fn availability(
        &self,
        name: String,
        entry: &HealthReportEntry,
        message: Option<String>,
    ) -> AvailabilityTelemetry {
        AvailabilityTelemetry {
            name,
            timestamp: self.timestamp,
            duration: entry.duration,
            run_location: self.options.run_location.clone(),
            success: is_success(entry.status, self.options.treat_degraded_as_success),
            message,
            properties: self.host.properties(),
            metrics: Metrics::new(),
        }
    }

    fn aggregate_event(&self, report: &HealthReport) -> EventTelemetry {
        let mut metrics = Metrics::new();
        metrics.insert(STATUS_METRIC.to_string(), status_metric(report.status));
        metrics.insert(DURATION_METRIC.to_string(), millis(report.total_duration));

        EventTelemetry {
            name: self.options.test_name.clone(),
            properties: self.host.properties(),
            metrics,
        }
    }

    fn aggregate_availability(
        &self,
        report: &HealthReport,
        full_report: bool,
    ) -> AvailabilityTelemetry {
        let mut record = AvailabilityTelemetry {
            name: self.options.test_name.clone(),
            timestamp: self.timestamp,
            duration: report.total_duration,
            run_location: self.options.run_location.clone(),
            success: is_success(report.status, self.options.treat_degraded_as_success),
            message: None,
            properties: self.host.properties(),
            metrics: Metrics::new(),
        };

        if full_report {
            for (name, entry) in &report.entries {
                record
                    .properties
                    .insert(format!("{STATUS_PREFIX}{name}"), entry.status.to_string());
                record.properties.insert(
                    format!("{DESCRIPTION_PREFIX}{name}"),
                    entry.description_or_empty().to_string(),
                );
                record
                    .metrics
                    .insert(format!("{DURATION_PREFIX}{name}"), millis(entry.duration));
            }
        }

        record
    }

    fn check_properties(&self, name: &str) -> Properties {
        let mut properties = self.host.properties();
        properties.insert(CHECK_NAME_PROPERTY.to_string(), name.to_string());
        properties
    }
}

fn check_metrics(entry: &HealthReportEntry) -> Metrics {
    let mut metrics = Metrics::new();
    metrics.insert(STATUS_METRIC.to_string(), status_metric(entry.status));
    metrics.insert(DURATION_METRIC.to_string(), millis(entry.duration));
    metrics
}

fn data_properties(entry: &HealthReportEntry) -> impl Iterator<Item = (String, String)> + '_ {
    entry
        .data
        .iter()
        .map(|(key, value)| (format!("{DATA_PREFIX}{key}"), render_data_value(value)))
}

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}
