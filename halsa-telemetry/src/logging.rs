//! ## halsa-telemetry::logging
//! Structured logging with tracing and OpenTelemetry attributes.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Install the global fmt subscriber. `RUST_LOG` overrides the default
    /// `info` filter. Returns `false` when a subscriber was already set.
    pub fn init() -> bool {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .is_ok()
    }

    /// Log a publisher lifecycle event with its attributes.
    #[inline]
    pub fn log_event(event_type: &str, metadata: &[KeyValue]) {
        let span = info_span!("publisher_event", event_type = event_type, otel.kind = "INTERNAL");
        let _entered = span.enter();
        tracing::info!(metadata = ?metadata, "Publisher event occurred");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        EventLogger::log_event("report_skipped", &[KeyValue::new("status", "Healthy")]);
        assert!(logs_contain("Publisher event occurred"));
        assert!(logs_contain("report_skipped"));
    }
}
