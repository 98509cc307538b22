//! Prometheus metrics for contract invocations

use std::time::Duration;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

use crate::error::Result;

/// Invocation counters and latency histogram
#[derive(Clone)]
pub struct InvocationMetrics {
    invocations: IntCounterVec,
    duration: HistogramVec,
}

impl InvocationMetrics {
    /// Create metrics and register them on `registry`
    pub fn new(registry: &Registry) -> Result<Self> {
        let invocations = IntCounterVec::new(
            Opts::new(
                "auction_agent_invocations_total",
                "Total number of contract invocations",
            ),
            &["method", "outcome"],
        )?;

        let duration = HistogramVec::new(
            HistogramOpts::new(
                "auction_agent_invocation_duration_seconds",
                "Time from submission to settlement in seconds",
            ),
            &["method"],
        )?;

        registry.register(Box::new(invocations.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            invocations,
            duration,
        })
    }

    /// Record one finished invocation under its method label
    pub fn record(&self, method: &str, succeeded: bool, elapsed: Duration) {
        self.invocations
            .with_label_values(&[method, outcome_label(succeeded)])
            .inc();
        self.duration
            .with_label_values(&[method])
            .observe(elapsed.as_secs_f64());
    }

    /// Invocations recorded so far for a method and outcome
    pub fn invocation_count(&self, method: &str, succeeded: bool) -> u64 {
        self.invocations
            .with_label_values(&[method, outcome_label(succeeded)])
            .get()
    }
}

fn outcome_label(succeeded: bool) -> &'static str {
    if succeeded {
        "settled"
    } else {
        "failed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_by_outcome() -> Result<()> {
        let registry = Registry::new();
        let metrics = InvocationMetrics::new(&registry)?;

        metrics.record("bid", true, Duration::from_millis(20));
        metrics.record("bid", false, Duration::from_millis(5));
        metrics.record("bid", true, Duration::from_millis(7));

        assert_eq!(metrics.invocation_count("bid", true), 2);
        assert_eq!(metrics.invocation_count("bid", false), 1);
        assert_eq!(metrics.invocation_count("finalizeAuction", true), 0);
        assert!(InvocationMetrics::new(&registry).is_err());
        Ok(())
    }
}
