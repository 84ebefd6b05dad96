//! Custom validation functions for configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static GUID: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new("^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$").ok()
});

/// Validate that an instrumentation key is a GUID. Blank keys are treated
/// as unset.
pub fn validate_instrumentation_key(key: &str) -> Result<(), ValidationError> {
    let key = key.trim();
    if key.is_empty() {
        return Ok(());
    }

    let re = GUID
        .as_ref()
        .ok_or_else(|| ValidationError::new("invalid_regex"))?;
    if re.is_match(key) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_instrumentation_key"))
    }
}

/// Validate a telemetry label (test name, run location).
pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    let len = label.chars().count();
    if (1..=256).contains(&len) && !label.trim().is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_label"))
    }
}
