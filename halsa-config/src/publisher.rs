//! Publisher behaviour.
//!
//! Controls how a health report is turned into telemetry:
//! - one aggregate record or one record per check
//! - availability records or generic events with metrics
//! - whether `Degraded` counts as a successful availability test

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Options for a health report publisher.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct PublisherOptions {
    /// Name of the aggregate record and prefix of per-check records.
    #[validate(custom(function = validation::validate_label))]
    #[serde(default = "default_test_name")]
    pub test_name: String,

    /// Run location reported on availability records.
    #[validate(custom(function = validation::validate_label))]
    #[serde(default = "default_run_location")]
    pub run_location: String,

    /// Report `Degraded` checks as successful.
    #[serde(default)]
    pub treat_degraded_as_success: bool,

    /// Emit one record per check instead of one per report.
    #[serde(default)]
    pub save_detailed_report: bool,

    /// Skip healthy reports, and healthy checks in detailed mode.
    #[serde(default)]
    pub exclude_healthy_reports: bool,

    /// Emit availability records instead of generic events.
    #[serde(default)]
    pub publish_availability_event: bool,

    /// Attach every check's status, duration, description and data to the
    /// availability records. Implies `publish_availability_event`.
    #[serde(default)]
    pub full_report: bool,
}

fn default_test_name() -> String {
    "HealthCheck".into()
}

fn default_run_location() -> String {
    "Application".into()
}

impl Default for PublisherOptions {
    fn default() -> Self {
        Self {
            test_name: default_test_name(),
            run_location: default_run_location(),
            treat_degraded_as_success: false,
            save_detailed_report: false,
            exclude_healthy_reports: false,
            publish_availability_event: false,
            full_report: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn valid_default_publisher_options() {
        let options = PublisherOptions::default();
        options.validate().expect("Default options should be valid");
        assert_eq!(options.test_name, "HealthCheck");
        assert_eq!(options.run_location, "Application");
    }

    #[test]
    fn empty_test_name_is_invalid() {
        let options = PublisherOptions {
            test_name: String::new(),
            ..PublisherOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn oversized_run_location_is_invalid() {
        let options = PublisherOptions {
            run_location: "x".repeat(257),
            ..PublisherOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
