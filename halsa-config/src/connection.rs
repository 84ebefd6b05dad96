//! Telemetry backend credentials.
//!
//! Either a full connection string or a bare instrumentation key. When both
//! are set the connection string wins.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Connection settings for the telemetry backend.
#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// `InstrumentationKey=...;IngestionEndpoint=...` style connection string.
    #[validate(length(max = 4096))]
    #[serde(default)]
    pub connection_string: Option<String>,

    /// Legacy instrumentation key (a GUID).
    #[validate(custom(function = validation::validate_instrumentation_key))]
    #[serde(default)]
    pub instrumentation_key: Option<String>,
}

impl ConnectionConfig {
    /// Connection string, ignoring blank values.
    pub fn connection_string(&self) -> Option<&str> {
        non_blank(self.connection_string.as_deref())
    }

    /// Instrumentation key, ignoring blank values.
    pub fn instrumentation_key(&self) -> Option<&str> {
        non_blank(self.instrumentation_key.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
