//! Health report publisher.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use halsa_config::{ConfigError, HalsaConfig, PublisherOptions};
use halsa_core::HealthReport;
use halsa_telemetry::{
    ClientFactory, EventLogger, MetricsRecorder, TelemetryClient, TelemetryConfiguration,
    TelemetryRecord, TracingClientFactory,
};
use opentelemetry::KeyValue;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn};
use validator::Validate;

use crate::client::{ClientSlot, ClientSource};
use crate::error::PublishError;
use crate::host::HostInfo;
use crate::mapping::RecordMapper;
use crate::mode::EmissionMode;

/// Receives a health report once per check cycle.
#[async_trait]
pub trait HealthCheckPublisher: Send + Sync {
    async fn publish(
        &self,
        report: &HealthReport,
        cancel: &CancellationToken,
    ) -> Result<(), PublishError>;
}

/// Translates health reports into availability, event and exception
/// telemetry.
pub struct ReportPublisher {
    options: PublisherOptions,
    mode: EmissionMode,
    source: ClientSource,
    factory: Arc<dyn ClientFactory>,
    slot: Arc<ClientSlot>,
    host: HostInfo,
    metrics: Option<MetricsRecorder>,
}

impl ReportPublisher {
    pub fn builder(options: PublisherOptions) -> ReportPublisherBuilder {
        ReportPublisherBuilder::new(options)
    }

    /// Build a publisher from loaded configuration, using the process-wide
    /// client slot.
    pub fn from_config(config: &HalsaConfig) -> Result<Self, PublishError> {
        config.validate().map_err(ConfigError::from)?;
        let source = ClientSource::from_connection(&config.connection);

        let mut builder = Self::builder(config.publisher.clone());
        builder.source = source;
        Ok(builder.build())
    }

    pub fn mode(&self) -> EmissionMode {
        self.mode
    }

    pub fn options(&self) -> &PublisherOptions {
        &self.options
    }

    /// The records `publish` would send for `report` at `timestamp`.
    pub fn records(&self, report: &HealthReport, timestamp: DateTime<Utc>) -> Vec<TelemetryRecord> {
        RecordMapper::new(self.mode, &self.options, &self.host, timestamp).map(report)
    }

    /// Synchronous publish path. The first client error aborts the call and
    /// is returned as is.
    pub fn publish_now(&self, report: &HealthReport) -> Result<(), PublishError> {
        if self.options.exclude_healthy_reports && report.status.is_healthy() {
            debug!("Skipping healthy report");
            if let Some(metrics) = &self.metrics {
                metrics.inc_skipped();
            }
            return Ok(());
        }

        let span = info_span!(
            "health_report_publish",
            mode = %self.mode,
            status = %report.status
        );
        let _entered = span.enter();

        let client = self.client()?;
        let records = self.records(report, Utc::now());

        for record in &records {
            if let Err(err) = client.track(record) {
                warn!(kind = %record.kind(), error = %err, "Telemetry client failed to send record");
                if let Some(metrics) = &self.metrics {
                    metrics.inc_failures();
                }
                return Err(err.into());
            }
            debug!(kind = %record.kind(), "Record dispatched");
            if let Some(metrics) = &self.metrics {
                metrics.inc_records(record.kind());
            }
        }

        Ok(())
    }

    fn client(&self) -> Result<Arc<dyn TelemetryClient>, PublishError> {
        self.slot
            .get_or_try_init(|| {
                let configuration = self.source.resolve()?;
                EventLogger::log_event(
                    "client_created",
                    &[KeyValue::new(
                        "endpoint",
                        configuration.ingestion_endpoint.clone(),
                    )],
                );
                self.factory.create(configuration)
            })
            .map_err(PublishError::from)
    }
}

#[async_trait]
impl HealthCheckPublisher for ReportPublisher {
    /// The cancellation token is accepted but not checked: emission is
    /// synchronous and short.
    async fn publish(
        &self,
        report: &HealthReport,
        _cancel: &CancellationToken,
    ) -> Result<(), PublishError> {
        self.publish_now(report)
    }
}

pub struct ReportPublisherBuilder {
    options: PublisherOptions,
    source: ClientSource,
    factory: Arc<dyn ClientFactory>,
    slot: Option<Arc<ClientSlot>>,
    host: Option<HostInfo>,
    metrics: Option<MetricsRecorder>,
}

impl ReportPublisherBuilder {
    fn new(options: PublisherOptions) -> Self {
        Self {
            options,
            source: ClientSource::default(),
            factory: Arc::new(TracingClientFactory),
            slot: None,
            host: None,
            metrics: None,
        }
    }

    pub fn connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.source.connection_string = Some(connection_string.into());
        self
    }

    pub fn instrumentation_key(mut self, key: impl Into<String>) -> Self {
        self.source.instrumentation_key = Some(key.into());
        self
    }

    pub fn telemetry_configuration(mut self, configuration: TelemetryConfiguration) -> Self {
        self.source.configuration = Some(configuration);
        self
    }

    pub fn client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Use `slot` instead of the process-wide one.
    pub fn client_slot(mut self, slot: Arc<ClientSlot>) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn host_info(mut self, host: HostInfo) -> Self {
        self.host = Some(host);
        self
    }

    pub fn metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> ReportPublisher {
        ReportPublisher {
            mode: EmissionMode::resolve(&self.options),
            options: self.options,
            source: self.source,
            factory: self.factory,
            slot: self.slot.unwrap_or_else(ClientSlot::process),
            host: self.host.unwrap_or_else(HostInfo::current),
            metrics: self.metrics,
        }
    }
}
