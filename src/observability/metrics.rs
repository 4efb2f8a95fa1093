use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::domain::Action;

/// Metrics registry for the application.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Total decision requests processed
    pub decisions_total: AtomicU64,

    /// Decision requests by action
    pub decisions_allow: AtomicU64,
    pub decisions_monitor: AtomicU64,
    pub decisions_flag: AtomicU64,
    pub decisions_block: AtomicU64,

    /// SAR triggers emitted
    pub sars_total: AtomicU64,

    /// Decision latency buckets (microseconds)
    pub latency_under_1ms: AtomicU64,
    pub latency_1_5ms: AtomicU64,
    pub latency_5_10ms: AtomicU64,
    pub latency_10_50ms: AtomicU64,
    pub latency_50_100ms: AtomicU64,
    pub latency_over_100ms: AtomicU64,

    /// Rule evaluation counts
    pub rules_evaluated_total: AtomicU64,
    pub rules_triggered_total: AtomicU64,
    pub rules_failed_total: AtomicU64,

    /// Sanctions screenings
    pub screenings_total: AtomicU64,
    pub screening_hits_total: AtomicU64,
    pub screening_degraded_total: AtomicU64,

    /// Policy reloads
    pub policy_reloads_total: AtomicU64,
    pub policy_reload_errors: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Record a decision outcome.
    pub fn record_decision(&self, action: &Action) {
        self.decisions_total.fetch_add(1, Ordering::Relaxed);

        match action {
            Action::Allow => {
                self.decisions_allow.fetch_add(1, Ordering::Relaxed);
            }
            Action::Monitor => {
                self.decisions_monitor.fetch_add(1, Ordering::Relaxed);
            }
            Action::Flag => {
                self.decisions_flag.fetch_add(1, Ordering::Relaxed);
            }
            Action::Block => {
                self.decisions_block.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Record a SAR trigger.
    pub fn record_sar(&self) {
        self.sars_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record decision latency.
    pub fn record_latency(&self, start: Instant) {
        let micros = start.elapsed().as_micros() as u64;

        if micros < 1000 {
            self.latency_under_1ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 5000 {
            self.latency_1_5ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 10000 {
            self.latency_5_10ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 50000 {
            self.latency_10_50ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 100000 {
            self.latency_50_100ms.fetch_add(1, Ordering::Relaxed);
        } else {
            self.latency_over_100ms.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one full pass over the rule library.
    pub fn record_rules(&self, evaluated: usize, triggered: usize, failed: usize) {
        self.rules_evaluated_total
            .fetch_add(evaluated as u64, Ordering::Relaxed);
        self.rules_triggered_total
            .fetch_add(triggered as u64, Ordering::Relaxed);
        self.rules_failed_total
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    /// Record a sanctions screening.
    pub fn record_screening(&self, hit: bool, degraded_lists: usize) {
        self.screenings_total.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.screening_hits_total.fetch_add(1, Ordering::Relaxed);
        }
        self.screening_degraded_total
            .fetch_add(degraded_lists as u64, Ordering::Relaxed);
    }

    /// Record a policy reload.
    pub fn record_policy_reload(&self, success: bool) {
        self.policy_reloads_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.policy_reload_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        format!(
            r#"# HELP fraudr_decisions_total Total number of decision requests
# TYPE fraudr_decisions_total counter
fraudr_decisions_total {}

# HELP fraudr_decisions Decision requests by action
# TYPE fraudr_decisions counter
fraudr_decisions{{action="allow"}} {}
fraudr_decisions{{action="monitor"}} {}
fraudr_decisions{{action="flag"}} {}
fraudr_decisions{{action="block"}} {}

# HELP fraudr_sars_total Suspicious activity report triggers
# TYPE fraudr_sars_total counter
fraudr_sars_total {}

# HELP fraudr_decision_latency_bucket Decision latency histogram
# TYPE fraudr_decision_latency_bucket counter
fraudr_decision_latency_bucket{{le="0.001"}} {}
fraudr_decision_latency_bucket{{le="0.005"}} {}
fraudr_decision_latency_bucket{{le="0.01"}} {}
fraudr_decision_latency_bucket{{le="0.05"}} {}
fraudr_decision_latency_bucket{{le="0.1"}} {}
fraudr_decision_latency_bucket{{le="+Inf"}} {}

# HELP fraudr_rules_evaluated_total Total rule evaluations
# TYPE fraudr_rules_evaluated_total counter
fraudr_rules_evaluated_total {}

# HELP fraudr_rules_triggered_total Total rules that produced a violation
# TYPE fraudr_rules_triggered_total counter
fraudr_rules_triggered_total {}

# HELP fraudr_rules_failed_total Rule evaluations that errored
# TYPE fraudr_rules_failed_total counter
fraudr_rules_failed_total {}

# HELP fraudr_screenings_total Sanctions screenings performed
# TYPE fraudr_screenings_total counter
fraudr_screenings_total {}

# HELP fraudr_screening_hits_total Screenings with at least one list match
# TYPE fraudr_screening_hits_total counter
fraudr_screening_hits_total {}

# HELP fraudr_screening_degraded_total List checks that failed or timed out
# TYPE fraudr_screening_degraded_total counter
fraudr_screening_degraded_total {}

# HELP fraudr_policy_reloads_total Policy reload operations
# TYPE fraudr_policy_reloads_total counter
fraudr_policy_reloads_total {}

# HELP fraudr_policy_reload_errors_total Policy reload errors
# TYPE fraudr_policy_reload_errors_total counter
fraudr_policy_reload_errors_total {}
"#,
            self.decisions_total.load(Ordering::Relaxed),
            self.decisions_allow.load(Ordering::Relaxed),
            self.decisions_monitor.load(Ordering::Relaxed),
            self.decisions_flag.load(Ordering::Relaxed),
            self.decisions_block.load(Ordering::Relaxed),
            self.sars_total.load(Ordering::Relaxed),
            self.latency_under_1ms.load(Ordering::Relaxed),
            self.latency_1_5ms.load(Ordering::Relaxed),
            self.latency_5_10ms.load(Ordering::Relaxed),
            self.latency_10_50ms.load(Ordering::Relaxed),
            self.latency_50_100ms.load(Ordering::Relaxed),
            self.latency_over_100ms.load(Ordering::Relaxed),
            self.rules_evaluated_total.load(Ordering::Relaxed),
            self.rules_triggered_total.load(Ordering::Relaxed),
            self.rules_failed_total.load(Ordering::Relaxed),
            self.screenings_total.load(Ordering::Relaxed),
            self.screening_hits_total.load(Ordering::Relaxed),
            self.screening_degraded_total.load(Ordering::Relaxed),
            self.policy_reloads_total.load(Ordering::Relaxed),
            self.policy_reload_errors.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_decision() {
        let metrics = MetricsRegistry::new();

        metrics.record_decision(&Action::Allow);
        metrics.record_decision(&Action::Allow);
        metrics.record_decision(&Action::Block);

        assert_eq!(metrics.decisions_total.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.decisions_allow.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.decisions_block.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_record_latency() {
        let metrics = MetricsRegistry::new();

        let start = Instant::now();
        // Very fast operation
        metrics.record_latency(start);

        assert!(metrics.latency_under_1ms.load(Ordering::Relaxed) >= 1);
    }

    #[test]
    fn test_record_screening() {
        let metrics = MetricsRegistry::new();

        metrics.record_screening(true, 0);
        metrics.record_screening(false, 2);

        assert_eq!(metrics.screenings_total.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.screening_hits_total.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.screening_degraded_total.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_prometheus_format() {
        let metrics = MetricsRegistry::new();
        metrics.record_decision(&Action::Allow);
        metrics.record_sar();

        let output = metrics.to_prometheus();

        assert!(output.contains("fraudr_decisions_total 1"));
        assert!(output.contains("fraudr_decisions{action=\"allow\"} 1"));
        assert!(output.contains("fraudr_sars_total 1"));
    }
}
