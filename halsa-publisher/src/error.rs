use halsa_config::ConfigError;
use halsa_telemetry::TelemetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
