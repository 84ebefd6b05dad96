//! ## halsa-telemetry::metrics
//! Prometheus counters describing the publisher itself.

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::record::RecordKind;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub records_emitted: IntCounterVec,
    pub reports_skipped: IntCounter,
    pub publish_failures: IntCounter,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let records_emitted = IntCounterVec::new(
            Opts::new("halsa_records_total", "Telemetry records sent, by kind"),
            &["kind"],
        )?;
        let reports_skipped = IntCounter::new(
            "halsa_reports_skipped_total",
            "Healthy reports skipped by exclusion",
        )?;
        let publish_failures = IntCounter::new(
            "halsa_publish_failures_total",
            "Publish calls aborted by a telemetry client error",
        )?;

        registry.register(Box::new(records_emitted.clone()))?;
        registry.register(Box::new(reports_skipped.clone()))?;
        registry.register(Box::new(publish_failures.clone()))?;

        Ok(Self {
            registry,
            records_emitted,
            reports_skipped,
            publish_failures,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn inc_records(&self, kind: RecordKind) {
        self.records_emitted.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn records(&self, kind: RecordKind) -> u64 {
        self.records_emitted.with_label_values(&[kind.as_str()]).get()
    }

    pub fn inc_skipped(&self) {
        self.reports_skipped.inc();
    }

    pub fn inc_failures(&self) {
        self.publish_failures.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_records_by_kind() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.inc_records(RecordKind::Event);
        metrics.inc_records(RecordKind::Event);
        metrics.inc_records(RecordKind::Exception);

        assert_eq!(metrics.records(RecordKind::Event), 2);
        assert_eq!(metrics.records(RecordKind::Exception), 1);
        assert_eq!(metrics.records(RecordKind::Availability), 0);
    }

    #[test]
    fn exposes_text_format() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.inc_skipped();
        metrics.inc_records(RecordKind::Availability);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("halsa_reports_skipped_total 1"));
        assert!(text.contains("halsa_records_total{kind=\"availability\"} 1"));
    }
}
