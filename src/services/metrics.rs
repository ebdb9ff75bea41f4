use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::inference::RiskOutcome;

/// Request counters for the screening service
pub struct Metrics {
    /// Screenings answered
    pub predictions: AtomicU64,
    /// Screenings that returned the risk outcome
    pub risk_predictions: AtomicU64,
    /// Submissions refused by validation
    pub rejected_inputs: AtomicU64,
    /// Requests that failed inside the pipeline
    pub failures: AtomicU64,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions: u64,
    pub risk_predictions: u64,
    pub rejected_inputs: u64,
    pub failures: u64,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            risk_predictions: AtomicU64::new(0),
            rejected_inputs: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    pub fn record_prediction(&self, outcome: RiskOutcome) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        if outcome.is_risk() {
            self.risk_predictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn inc_rejected(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions: self.predictions.load(Ordering::Relaxed),
            risk_predictions: self.risk_predictions.load(Ordering::Relaxed),
            rejected_inputs: self.rejected_inputs.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            uptime_seconds: self.uptime_seconds(),
        }
    }

    /// Export metrics in Prometheus format
    pub fn prometheus(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"# HELP heartguard_predictions_total Screenings answered
# TYPE heartguard_predictions_total counter
heartguard_predictions_total {}

# HELP heartguard_risk_predictions_total Screenings with the risk outcome
# TYPE heartguard_risk_predictions_total counter
heartguard_risk_predictions_total {}

# HELP heartguard_rejected_inputs_total Submissions refused by validation
# TYPE heartguard_rejected_inputs_total counter
heartguard_rejected_inputs_total {}

# HELP heartguard_failures_total Requests that failed in the pipeline
# TYPE heartguard_failures_total counter
heartguard_failures_total {}

# HELP heartguard_uptime_seconds Seconds since the service started
# TYPE heartguard_uptime_seconds gauge
heartguard_uptime_seconds {}
"#,
            s.predictions, s.risk_predictions, s.rejected_inputs, s.failures, s.uptime_seconds,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_outcomes() {
        let m = Metrics::new();
        m.record_prediction(RiskOutcome::RiskIndicators);
        m.record_prediction(RiskOutcome::NoRiskIndicators);
        m.inc_rejected();

        let s = m.snapshot();
        assert_eq!(s.predictions, 2);
        assert_eq!(s.risk_predictions, 1);
        assert_eq!(s.rejected_inputs, 1);
        assert_eq!(s.failures, 0);
        assert!(m.prometheus().contains("heartguard_predictions_total 2"));
    }
}
