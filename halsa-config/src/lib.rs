//! # Halsa Configuration System
//!
//! Layered configuration for the health report publisher.
//!
//! ## Features
//! - **Connection settings**: connection string or instrumentation key for the telemetry backend
//! - **Publisher options**: detail level, event representation and status rules
//! - **Validation**: runtime validation of labels and credentials

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod connection;
mod error;
mod publisher;
mod validation;

pub use connection::ConnectionConfig;
pub use error::ConfigError;
pub use publisher::PublisherOptions;

const BASE_FILE: &str = "config/halsa.yaml";
const ENV_PREFIX: &str = "HALSA_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct HalsaConfig {
    /// Telemetry backend credentials.
    #[validate(nested)]
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Publishing behaviour.
    #[validate(nested)]
    #[serde(default)]
    pub publisher: PublisherOptions,
}

impl HalsaConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/halsa.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - Environment‑specific overrides.
    /// 4. `HALSA_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(HalsaConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            tracing::debug!("{} not found, using default configuration", BASE_FILE);
        }

        let env = std::env::var("HALSA_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let yaml = std::fs::read_to_string(path)?;
        Self::extract(
            Figment::from(Serialized::defaults(HalsaConfig::default()))
                .merge(Yaml::string(&yaml))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Parse a YAML document directly, without consulting the environment.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::from(Serialized::defaults(HalsaConfig::default())).merge(Yaml::string(yaml)),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn full_config_validation() {
        let config = HalsaConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn environment_override() {
        std::env::set_var("HALSA_PUBLISHER__RUN_LOCATION", "eu-north");
        let config = HalsaConfig::load().unwrap();
        assert_eq!(config.publisher.run_location, "eu-north");
        std::env::remove_var("HALSA_PUBLISHER__RUN_LOCATION");
    }

    #[test]
    fn yaml_overrides_defaults() {
        let config = HalsaConfig::from_yaml_str(
            "publisher:\n  save_detailed_report: true\n  treat_degraded_as_success: true\n",
        )
        .unwrap();
        assert!(config.publisher.save_detailed_report);
        assert!(config.publisher.treat_degraded_as_success);
        assert_eq!(config.publisher.test_name, "HealthCheck");
        assert!(config.connection.connection_string.is_none());
    }

    #[test]
    fn rejects_invalid_instrumentation_key() {
        let err = HalsaConfig::from_yaml_str("connection:\n  instrumentation_key: not-a-guid\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("instrumentation_key"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = HalsaConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = HalsaConfig::load_from_path(std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("halsa-config-{}.yaml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "publisher:\n  test_name: checkout-api\n  exclude_healthy_reports: true").unwrap();

        let config = HalsaConfig::load_from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.publisher.test_name, "checkout-api");
        assert!(config.publisher.exclude_healthy_reports);
    }
}
