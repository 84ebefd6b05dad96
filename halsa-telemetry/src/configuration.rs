//! Telemetry backend configuration and connection string parsing.

use std::collections::HashMap;

use crate::error::TelemetryError;

pub const DEFAULT_INGESTION_ENDPOINT: &str = "https://dc.services.visualstudio.com/";

const MAX_CONNECTION_STRING_LEN: usize = 4096;

/// Where and as whom telemetry is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfiguration {
    pub instrumentation_key: Option<String>,
    pub ingestion_endpoint: String,
    pub connection_string: Option<String>,
}

impl Default for TelemetryConfiguration {
    fn default() -> Self {
        Self {
            instrumentation_key: None,
            ingestion_endpoint: DEFAULT_INGESTION_ENDPOINT.to_string(),
            connection_string: None,
        }
    }
}

impl TelemetryConfiguration {
    pub fn from_instrumentation_key(key: impl Into<String>) -> Self {
        Self {
            instrumentation_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Parse `Key=Value` segments separated by `;`.
    ///
    /// Keys are case-insensitive. `IngestionEndpoint` takes precedence over an
    /// endpoint derived from `EndpointSuffix` (and optional `Location`).
    pub fn from_connection_string(raw: &str) -> Result<Self, TelemetryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("connection string is empty"));
        }
        if trimmed.len() > MAX_CONNECTION_STRING_LEN {
            return Err(invalid(format!(
                "connection string exceeds {} characters",
                MAX_CONNECTION_STRING_LEN
            )));
        }

        let mut values: HashMap<String, String> = HashMap::new();
        for segment in trimmed.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| invalid(format!("segment '{}' has no '='", segment)))?;
            let key = key.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(invalid(format!("segment '{}' has an empty key", segment)));
            }
            if values.insert(key.clone(), value.trim().to_string()).is_some() {
                return Err(invalid(format!("duplicate key '{}'", key)));
            }
        }

        let instrumentation_key = values
            .remove("instrumentationkey")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| invalid("InstrumentationKey is missing"))?;

        let ingestion_endpoint = match values.remove("ingestionendpoint") {
            Some(endpoint) if !endpoint.is_empty() => with_trailing_slash(endpoint),
            _ => match values.remove("endpointsuffix").filter(|s| !s.is_empty()) {
                Some(suffix) => {
                    let suffix = suffix.trim_matches('.');
                    match values.remove("location").filter(|l| !l.is_empty()) {
                        Some(location) => format!("https://{}.dc.{}/", location, suffix),
                        None => format!("https://dc.{}/", suffix),
                    }
                }
                None => DEFAULT_INGESTION_ENDPOINT.to_string(),
            },
        };

        Ok(Self {
            instrumentation_key: Some(instrumentation_key),
            ingestion_endpoint,
            connection_string: Some(trimmed.to_string()),
        })
    }
}

fn with_trailing_slash(mut endpoint: String) -> String {
    if !endpoint.ends_with('/') {
        endpoint.push('/');
    }
    endpoint
}

fn invalid(reason: impl Into<String>) -> TelemetryError {
    TelemetryError::InvalidConnectionString(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "11111111-2222-3333-4444-555555555555";

    #[test]
    fn parses_key_and_endpoint() {
        let config = TelemetryConfiguration::from_connection_string(&format!(
            "InstrumentationKey={KEY};IngestionEndpoint=https://westeurope-1.in.example.com"
        ))
        .unwrap();

        assert_eq!(config.instrumentation_key.as_deref(), Some(KEY));
        assert_eq!(config.ingestion_endpoint, "https://westeurope-1.in.example.com/");
        assert!(config.connection_string.is_some());
    }

    #[test]
    fn keys_are_case_insensitive_and_default_endpoint_applies() {
        let config =
            TelemetryConfiguration::from_connection_string(&format!("instrumentationkey={KEY};"))
                .unwrap();
        assert_eq!(config.instrumentation_key.as_deref(), Some(KEY));
        assert_eq!(config.ingestion_endpoint, DEFAULT_INGESTION_ENDPOINT);
    }

    #[test]
    fn derives_endpoint_from_suffix_and_location() {
        let config = TelemetryConfiguration::from_connection_string(&format!(
            "InstrumentationKey={KEY};EndpointSuffix=applicationinsights.example.net;Location=northeurope"
        ))
        .unwrap();
        assert_eq!(
            config.ingestion_endpoint,
            "https://northeurope.dc.applicationinsights.example.net/"
        );
    }

    #[test]
    fn rejects_malformed_strings() {
        for raw in [
            "",
            "   ",
            "InstrumentationKey",
            "IngestionEndpoint=https://x",
            "InstrumentationKey=a;instrumentationkey=b",
            "=value;InstrumentationKey=a",
        ] {
            assert!(
                matches!(
                    TelemetryConfiguration::from_connection_string(raw),
                    Err(TelemetryError::InvalidConnectionString(_))
                ),
                "expected '{}' to be rejected",
                raw
            );
        }
    }

    #[test]
    fn rejects_oversized_string() {
        let raw = format!("InstrumentationKey={}", "k".repeat(MAX_CONNECTION_STRING_LEN));
        assert!(TelemetryConfiguration::from_connection_string(&raw).is_err());
    }

    #[test]
    fn instrumentation_key_keeps_default_endpoint() {
        let config = TelemetryConfiguration::from_instrumentation_key(KEY);
        assert_eq!(config.ingestion_endpoint, DEFAULT_INGESTION_ENDPOINT);
        assert!(config.connection_string.is_none());
    }
}
