//! # Halsa Telemetry
//!
//! Telemetry record shapes, the client seam towards the telemetry backend,
//! logging and self-metrics.

pub mod client;
pub mod configuration;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod record;

pub use client::{
    ClientFactory, InMemoryClient, TelemetryClient, TracingClient, TracingClientFactory,
};
pub use configuration::{TelemetryConfiguration, DEFAULT_INGESTION_ENDPOINT};
pub use error::TelemetryError;
pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
pub use record::{
    AvailabilityTelemetry, EventTelemetry, ExceptionTelemetry, Metrics, Properties,
    RecordKind, TelemetryRecord,
};
