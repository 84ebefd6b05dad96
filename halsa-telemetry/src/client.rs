//! The seam towards the telemetry backend.
//!
//! Publishers only see [`TelemetryClient`]. Sending is synchronous and any
//! error is returned to the caller untouched.

use std::sync::Arc;

use opentelemetry::KeyValue;
use parking_lot::Mutex;

use crate::configuration::TelemetryConfiguration;
use crate::error::TelemetryError;
use crate::record::{
    AvailabilityTelemetry, EventTelemetry, ExceptionTelemetry, Metrics, Properties,
    TelemetryRecord,
};

pub trait TelemetryClient: Send + Sync {
    fn configuration(&self) -> &TelemetryConfiguration;

    fn track_availability(&self, record: &AvailabilityTelemetry) -> Result<(), TelemetryError>;

    fn track_event(&self, record: &EventTelemetry) -> Result<(), TelemetryError>;

    fn track_exception(&self, record: &ExceptionTelemetry) -> Result<(), TelemetryError>;

    fn track(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        match record {
            TelemetryRecord::Availability(r) => self.track_availability(r),
            TelemetryRecord::Event(r) => self.track_event(r),
            TelemetryRecord::Exception(r) => self.track_exception(r),
        }
    }

    fn flush(&self) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Builds the process-wide client from the resolved configuration.
pub trait ClientFactory: Send + Sync {
    fn create(
        &self,
        configuration: TelemetryConfiguration,
    ) -> Result<Arc<dyn TelemetryClient>, TelemetryError>;
}

impl<F> ClientFactory for F
where
    F: Fn(TelemetryConfiguration) -> Result<Arc<dyn TelemetryClient>, TelemetryError>
        + Send
        + Sync,
{
    fn create(
        &self,
        configuration: TelemetryConfiguration,
    ) -> Result<Arc<dyn TelemetryClient>, TelemetryError> {
        self(configuration)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingClientFactory;

impl ClientFactory for TracingClientFactory {
    fn create(
        &self,
        configuration: TelemetryConfiguration,
    ) -> Result<Arc<dyn TelemetryClient>, TelemetryError> {
        Ok(Arc::new(TracingClient::new(configuration)))
    }
}

/// Writes every record as a structured `tracing` event.
#[derive(Debug, Clone)]
pub struct TracingClient {
    configuration: TelemetryConfiguration,
}

impl TracingClient {
    pub fn new(configuration: TelemetryConfiguration) -> Self {
        Self { configuration }
    }

    fn emit(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let attributes = attributes(record.properties(), record.metrics());
        let payload = serde_json::to_string(record)?;
        tracing::info!(
            kind = %record.kind(),
            endpoint = %self.configuration.ingestion_endpoint,
            attributes = ?attributes,
            "Telemetry recorded"
        );
        tracing::debug!(payload = %payload, "Telemetry payload");
        Ok(())
    }
}

impl TelemetryClient for TracingClient {
    fn configuration(&self) -> &TelemetryConfiguration {
        &self.configuration
    }

    fn track_availability(&self, record: &AvailabilityTelemetry) -> Result<(), TelemetryError> {
        self.emit(&TelemetryRecord::Availability(record.clone()))
    }

    fn track_event(&self, record: &EventTelemetry) -> Result<(), TelemetryError> {
        self.emit(&TelemetryRecord::Event(record.clone()))
    }

    fn track_exception(&self, record: &ExceptionTelemetry) -> Result<(), TelemetryError> {
        self.emit(&TelemetryRecord::Exception(record.clone()))
    }

    fn track(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        self.emit(record)
    }
}

fn attributes(properties: &Properties, metrics: &Metrics) -> Vec<KeyValue> {
    properties
        .iter()
        .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
        .chain(metrics.iter().map(|(k, v)| KeyValue::new(k.clone(), *v)))
        .collect()
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct InMemoryClient {
    configuration: TelemetryConfiguration,
    records: Mutex<Vec<TelemetryRecord>>,
    fail_next: Mutex<Option<String>>,
}

impl InMemoryClient {
    pub fn new(configuration: TelemetryConfiguration) -> Self {
        Self {
            configuration,
            records: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Make the next `track*` call fail with `reason` without recording.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.lock() = Some(reason.into());
    }

    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.records.lock().clone()
    }

    pub fn take(&self) -> Vec<TelemetryRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn push(&self, record: TelemetryRecord) -> Result<(), TelemetryError> {
        if let Some(reason) = self.fail_next.lock().take() {
            return Err(TelemetryError::Rejected(reason));
        }
        self.records.lock().push(record);
        Ok(())
    }
}

impl TelemetryClient for InMemoryClient {
    fn configuration(&self) -> &TelemetryConfiguration {
        &self.configuration
    }

    fn track_availability(&self, record: &AvailabilityTelemetry) -> Result<(), TelemetryError> {
        self.push(record.clone().into())
    }

    fn track_event(&self, record: &EventTelemetry) -> Result<(), TelemetryError> {
        self.push(record.clone().into())
    }

    fn track_exception(&self, record: &ExceptionTelemetry) -> Result<(), TelemetryError> {
        self.push(record.clone().into())
    }
}
