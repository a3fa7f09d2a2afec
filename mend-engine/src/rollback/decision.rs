//! Threshold-driven rollback decisions.

use std::sync::Arc;

use mend_core::config::RollbackConfig;
use mend_core::events::types::HealthEvaluatedEvent;
use mend_core::events::{EventDispatcher, MendEventHandler};
use mend_core::types::time::epoch_secs;
use mend_core::types::DeploymentHealthSnapshot;

use crate::exec::call_with_timeout;
use crate::rollback::monitor::HealthMonitor;

/// Outcome of one health evaluation.
#[derive(Debug, Clone)]
pub struct RollbackDecision {
    pub should_rollback: bool,
    /// First breached threshold, phrased for the audit trail.
    pub reason: Option<String>,
    /// The snapshot the decision was made from.
    pub snapshot: DeploymentHealthSnapshot,
}

/// Decides whether a deployment needs an automatic rollback.
///
/// Each threshold is independently sufficient cause. The engine never
/// returns an error: an unreachable or hung health source reads as the
/// sentinel snapshot, whose numbers breach the thresholds on their own.
pub struct RollbackDecisionEngine {
    monitor: Arc<dyn HealthMonitor>,
    events: Arc<EventDispatcher>,
    config: RollbackConfig,
}

impl RollbackDecisionEngine {
    pub fn new(monitor: Arc<dyn HealthMonitor>) -> Self {
        Self {
            monitor,
            events: Arc::new(EventDispatcher::new()),
            config: RollbackConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RollbackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Fetches health under the probe timeout. A fetch error and a timeout
    /// both read as the sentinel snapshot.
    pub fn fetch_health(&self, deployment_id: &str) -> DeploymentHealthSnapshot {
        let timeout_ms = self.config.effective_health_timeout_ms();
        let monitor = Arc::clone(&self.monitor);
        let id = deployment_id.to_string();
        match call_with_timeout(timeout_ms, move || monitor.fetch(&id)) {
            Some(Ok(snapshot)) => snapshot,
            Some(Err(err)) => {
                tracing::warn!(
                    deployment_id,
                    error = %err,
                    "health probe failed, using sentinel snapshot"
                );
                DeploymentHealthSnapshot::sentinel(deployment_id, epoch_secs())
            }
            None => {
                tracing::warn!(
                    deployment_id,
                    health_probe_time = timeout_ms,
                    "health probe timed out, using sentinel snapshot"
                );
                DeploymentHealthSnapshot::sentinel(deployment_id, epoch_secs())
            }
        }
    }

    /// Evaluates the threshold rules against a fresh health snapshot.
    pub fn should_auto_rollback(&self, deployment_id: &str) -> RollbackDecision {
        let snapshot = self.fetch_health(deployment_id);
        let reason = self.breach_reason(&snapshot);
        let should_rollback = reason.is_some();

        if should_rollback {
            tracing::warn!(
                deployment_id,
                error_rate = snapshot.error_rate_per_minute,
                recent_errors = snapshot.recent_errors,
                reason = reason.as_deref().unwrap_or_default(),
                "rollback threshold breached"
            );
        } else if !snapshot.healthy {
            tracing::warn!(
                deployment_id,
                "deployment reports unhealthy but no threshold is breached"
            );
        }
        self.events.on_health_evaluated(&HealthEvaluatedEvent {
            deployment_id: deployment_id.to_string(),
            healthy: snapshot.healthy,
            error_rate_per_minute: snapshot.error_rate_per_minute,
            should_rollback,
        });

        RollbackDecision {
            should_rollback,
            reason,
            snapshot,
        }
    }

    fn breach_reason(&self, snapshot: &DeploymentHealthSnapshot) -> Option<String> {
        if snapshot.error_rate_per_minute > self.config.effective_error_rate_threshold() {
            return Some(format!(
                "High error rate: {:.2} errors/minute",
                snapshot.error_rate_per_minute
            ));
        }
        if snapshot.recent_errors > self.config.effective_recent_errors_threshold() {
            return Some(format!(
                "Too many recent errors: {} in last 5 minutes",
                snapshot.recent_errors
            ));
        }
        if snapshot.database_connections > self.config.effective_db_connections_threshold() {
            return Some(format!(
                "Database connection exhaustion: {} connections",
                snapshot.database_connections
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    use mend_core::errors::RollbackError;

    struct StaticMonitor {
        snapshot: DeploymentHealthSnapshot,
    }

    impl HealthMonitor for StaticMonitor {
        fn fetch(&self, _deployment_id: &str) -> Result<DeploymentHealthSnapshot, RollbackError> {
            Ok(self.snapshot.clone())
        }
    }

    struct FailingMonitor;

    impl HealthMonitor for FailingMonitor {
        fn fetch(&self, _deployment_id: &str) -> Result<DeploymentHealthSnapshot, RollbackError> {
            Err(RollbackError::HealthUnavailable {
                message: "connection refused".to_string(),
            })
        }
    }

    struct HungMonitor;

    impl HealthMonitor for HungMonitor {
        fn fetch(&self, deployment_id: &str) -> Result<DeploymentHealthSnapshot, RollbackError> {
            thread::sleep(Duration::from_millis(500));
            Ok(snapshot(deployment_id, 0.5, 2, 30))
        }
    }

    fn snapshot(
        deployment_id: &str,
        error_rate: f64,
        recent_errors: u64,
        connections: u64,
    ) -> DeploymentHealthSnapshot {
        DeploymentHealthSnapshot {
            deployment_id: deployment_id.to_string(),
            healthy: true,
            error_rate_per_minute: error_rate,
            recent_errors,
            database_connections: connections,
            active_queries: 4,
            checked_at: 1_700_000_000,
        }
    }

    fn engine_for(snapshot: DeploymentHealthSnapshot) -> RollbackDecisionEngine {
        RollbackDecisionEngine::new(Arc::new(StaticMonitor { snapshot }))
    }

    #[test]
    fn high_error_rate_triggers_rollback() {
        let decision = engine_for(snapshot("d1", 8.5, 2, 30)).should_auto_rollback("d1");
        assert!(decision.should_rollback);
        assert_eq!(
            decision.reason.as_deref(),
            Some("High error rate: 8.50 errors/minute")
        );
    }

    #[test]
    fn too_many_recent_errors_triggers_rollback() {
        let decision = engine_for(snapshot("d1", 0.5, 55, 30)).should_auto_rollback("d1");
        assert!(decision.should_rollback);
        assert_eq!(
            decision.reason.as_deref(),
            Some("Too many recent errors: 55 in last 5 minutes")
        );
    }

    #[test]
    fn connection_exhaustion_triggers_rollback() {
        let decision = engine_for(snapshot("d1", 0.5, 2, 95)).should_auto_rollback("d1");
        assert!(decision.should_rollback);
        assert_eq!(
            decision.reason.as_deref(),
            Some("Database connection exhaustion: 95 connections")
        );
    }

    #[test]
    fn nominal_health_does_not_trigger() {
        let decision = engine_for(snapshot("d1", 0.5, 2, 30)).should_auto_rollback("d1");
        assert!(!decision.should_rollback);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn unhealthy_flag_alone_does_not_trigger() {
        let mut reading = snapshot("d1", 0.5, 2, 30);
        reading.healthy = false;
        let decision = engine_for(reading).should_auto_rollback("d1");
        assert!(!decision.should_rollback);
    }

    #[test]
    fn first_breached_threshold_wins() {
        let decision = engine_for(snapshot("d1", 8.5, 55, 95)).should_auto_rollback("d1");
        assert!(decision.reason.as_deref().unwrap().starts_with("High error rate"));
    }

    #[test]
    fn failed_probe_reads_as_sentinel_and_triggers() {
        let engine = RollbackDecisionEngine::new(Arc::new(FailingMonitor));
        let decision = engine.should_auto_rollback("d1");
        assert!(decision.should_rollback);
        assert!(!decision.snapshot.healthy);
        assert_eq!(
            decision.reason.as_deref(),
            Some("High error rate: 999.00 errors/minute")
        );
    }

    #[test]
    fn hung_probe_reads_as_sentinel_and_triggers() {
        let config = RollbackConfig {
            health_timeout_ms: Some(20),
            ..RollbackConfig::default()
        };
        let engine = RollbackDecisionEngine::new(Arc::new(HungMonitor)).with_config(config);
        let decision = engine.should_auto_rollback("d1");
        assert!(decision.should_rollback);
        assert_eq!(decision.snapshot.error_rate_per_minute, 999.0);
    }
}
