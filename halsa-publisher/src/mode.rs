//! Emission modes.
//!
//! The detail level and the record representation are resolved once from
//! [`PublisherOptions`] instead of being re-checked on every publish.

use std::fmt;

use halsa_config::PublisherOptions;
use halsa_core::HealthStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionMode {
    /// One generic event for the whole report.
    AggregateEvent,
    /// One availability record for the whole report.
    AggregateAvailability { full_report: bool },
    /// One generic event per check, one exception per failing check.
    DetailedEvent,
    /// One availability record per check, a second one per failing check.
    DetailedAvailability { full_report: bool },
}

impl EmissionMode {
    pub fn resolve(options: &PublisherOptions) -> Self {
        let full_report = options.full_report;
        let availability = options.publish_availability_event || full_report;

        match (options.save_detailed_report, availability) {
            (false, false) => EmissionMode::AggregateEvent,
            (false, true) => EmissionMode::AggregateAvailability { full_report },
            (true, false) => EmissionMode::DetailedEvent,
            (true, true) => EmissionMode::DetailedAvailability { full_report },
        }
    }

    pub fn is_detailed(&self) -> bool {
        matches!(
            self,
            EmissionMode::DetailedEvent | EmissionMode::DetailedAvailability { .. }
        )
    }

    pub fn is_availability(&self) -> bool {
        matches!(
            self,
            EmissionMode::AggregateAvailability { .. } | EmissionMode::DetailedAvailability { .. }
        )
    }
}

impl fmt::Display for EmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmissionMode::AggregateEvent => "aggregate-event",
            EmissionMode::AggregateAvailability { full_report: false } => "aggregate-availability",
            EmissionMode::AggregateAvailability { full_report: true } => "aggregate-full-report",
            EmissionMode::DetailedEvent => "detailed-event",
            EmissionMode::DetailedAvailability { full_report: false } => "detailed-availability",
            EmissionMode::DetailedAvailability { full_report: true } => "detailed-full-report",
        };
        f.write_str(name)
    }
}

/// `Healthy`, or `Degraded` when degraded counts as success.
#[inline]
pub fn is_success(status: HealthStatus, treat_degraded_as_success: bool) -> bool {
    status == HealthStatus::Healthy
        || (treat_degraded_as_success && status == HealthStatus::Degraded)
}

/// Status metric: 1.0 for `Healthy`, 0.0 otherwise.
#[inline]
pub fn status_metric(status: HealthStatus) -> f64 {
    if status.is_healthy() {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn options(detailed: bool, availability: bool, full_report: bool) -> PublisherOptions {
        PublisherOptions {
            save_detailed_report: detailed,
            publish_availability_event: availability,
            full_report,
            ..PublisherOptions::default()
        }
    }

    fn status_strategy() -> impl Strategy<Value = HealthStatus> {
        prop_oneof![
            Just(HealthStatus::Healthy),
            Just(HealthStatus::Degraded),
            Just(HealthStatus::Unhealthy),
        ]
    }

    #[test]
    fn resolves_all_four_modes() {
        assert_eq!(
            EmissionMode::resolve(&options(false, false, false)),
            EmissionMode::AggregateEvent
        );
        assert_eq!(
            EmissionMode::resolve(&options(false, true, false)),
            EmissionMode::AggregateAvailability { full_report: false }
        );
        assert_eq!(
            EmissionMode::resolve(&options(true, false, false)),
            EmissionMode::DetailedEvent
        );
        assert_eq!(
            EmissionMode::resolve(&options(true, true, false)),
            EmissionMode::DetailedAvailability { full_report: false }
        );
    }

    #[test]
    fn full_report_implies_availability() {
        let mode = EmissionMode::resolve(&options(false, false, true));
        assert_eq!(mode, EmissionMode::AggregateAvailability { full_report: true });
        assert!(mode.is_availability());
        assert!(!mode.is_detailed());
        assert_eq!(mode.to_string(), "aggregate-full-report");
    }

    #[test]
    fn degraded_success_depends_on_option() {
        assert!(!is_success(HealthStatus::Degraded, false));
        assert!(is_success(HealthStatus::Degraded, true));
        assert!(!is_success(HealthStatus::Unhealthy, true));
    }

    proptest! {
        #[test]
        fn success_rule(status in status_strategy(), treat in any::<bool>()) {
            let expected = status == HealthStatus::Healthy
                || (status == HealthStatus::Degraded && treat);
            prop_assert_eq!(is_success(status, treat), expected);
        }

        #[test]
        fn status_metric_is_binary(status in status_strategy()) {
            let metric = status_metric(status);
            prop_assert_eq!(metric == 1.0, status == HealthStatus::Healthy);
            prop_assert!(metric == 0.0 || metric == 1.0);
        }
    }
}
