//! Health status levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatusParseError;

/// Outcome of a single probe or of a whole report.
///
/// Ordered from worst to best so that the overall status of a report is the
/// minimum of its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Unhealthy,
    Degraded,
    Healthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Unhealthy => "Unhealthy",
            HealthStatus::Degraded => "Degraded",
            HealthStatus::Healthy => "Healthy",
        }
    }

    #[inline]
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "healthy" => Ok(HealthStatus::Healthy),
            "degraded" => Ok(HealthStatus::Degraded),
            "unhealthy" => Ok(HealthStatus::Unhealthy),
            other => Err(StatusParseError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_worst_first() {
        assert!(HealthStatus::Unhealthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Healthy);
    }

    #[test]
    fn displays_variant_name() {
        assert_eq!(HealthStatus::Degraded.to_string(), "Degraded");
        assert_eq!(HealthStatus::Unhealthy.to_string(), "Unhealthy");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HEALTHY".parse::<HealthStatus>(), Ok(HealthStatus::Healthy));
        assert_eq!(" degraded ".parse::<HealthStatus>(), Ok(HealthStatus::Degraded));
        assert_eq!(
            "broken".parse::<HealthStatus>(),
            Err(StatusParseError::Unknown("broken".into()))
        );
    }
}
