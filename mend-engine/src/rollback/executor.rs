//! The audited rollback state machine.

use std::sync::Arc;
use std::time::Instant;

use mend_core::config::RollbackConfig;
use mend_core::errors::RollbackError;
use mend_core::events::types::{ErrorEvent, RollbackCompletedEvent, RollbackStartedEvent};
use mend_core::events::{EventDispatcher, MendEventHandler};
use mend_core::store::DeploymentStore;
use mend_core::types::time::epoch_secs;
use mend_core::types::{
    Deployment, RollbackEvent, RollbackStatus, RollbackStep, RollbackTrigger, SnapshotKind,
};
use uuid::Uuid;

use crate::compliance::{ActionDescriptor, ComplianceGate, GateContext};
use crate::exec::call_with_timeout;
use crate::rollback::decision::RollbackDecisionEngine;
use crate::rollback::monitor::HealthMonitor;

/// Applies a rollback to the deployment infrastructure.
///
/// Implementations trigger whatever actually moves traffic (a CI/CD
/// workflow, an orchestrator API). The executor bounds every call with
/// the apply timeout and treats a timeout as a failed apply.
pub trait RollbackRunner: Send + Sync {
    fn apply(&self, current: &Deployment, target: &Deployment) -> Result<(), RollbackError>;
}

/// Result of one rollback execution.
#[derive(Debug, Clone)]
pub struct RollbackOutcome {
    /// The finalized audit event; always in a terminal status.
    pub event: RollbackEvent,
    /// The deployment that was restored, when one was resolved and applied.
    pub target_deployment: Option<Deployment>,
}

impl RollbackOutcome {
    pub fn succeeded(&self) -> bool {
        self.event.succeeded()
    }
}

/// Drives `PENDING -> SNAPSHOTTING -> APPLYING -> SUCCESS | FAILED`.
///
/// The event is persisted on every transition, and every exit path
/// finalizes it to a terminal status; a rollback is never left pending,
/// whatever fails mid-flight. Retried calls re-resolve the target fresh
/// rather than reusing a selection from an earlier attempt.
pub struct RollbackExecutor {
    deployments: Arc<dyn DeploymentStore>,
    runner: Arc<dyn RollbackRunner>,
    decision: RollbackDecisionEngine,
    events: Arc<EventDispatcher>,
    config: RollbackConfig,
}

impl RollbackExecutor {
    pub fn new(
        deployments: Arc<dyn DeploymentStore>,
        monitor: Arc<dyn HealthMonitor>,
        runner: Arc<dyn RollbackRunner>,
    ) -> Self {
        Self {
            deployments,
            runner,
            decision: RollbackDecisionEngine::new(monitor),
            events: Arc::new(EventDispatcher::new()),
            config: RollbackConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RollbackConfig) -> Self {
        self.decision = self.decision.with_config(config.clone());
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.decision = self.decision.with_events(Arc::clone(&events));
        self.events = events;
        self
    }

    /// Evaluates the thresholds and rolls back when one is breached.
    /// Returns `None` when the deployment is left alone.
    pub fn evaluate_and_rollback(&self, deployment_id: &str) -> Option<RollbackOutcome> {
        let decision = self.decision.should_auto_rollback(deployment_id);
        if !decision.should_rollback {
            return None;
        }
        let reason = decision
            .reason
            .unwrap_or_else(|| "Deployment unhealthy".to_string());
        Some(self.execute_rollback(deployment_id, &reason, None))
    }

    /// Runs the rollback state machine end to end.
    ///
    /// Never returns an error: store failures, a denied gate, a missing
    /// target, and a hung runner all finalize and persist a failed event
    /// with the detail attached.
    pub fn execute_rollback(
        &self,
        deployment_id: &str,
        reason: &str,
        initiated_by: Option<&str>,
    ) -> RollbackOutcome {
        let started = Instant::now();
        let trigger = if initiated_by.is_some() {
            RollbackTrigger::Manual
        } else {
            RollbackTrigger::Automatic
        };
        let mut event = RollbackEvent {
            id: Uuid::new_v4().to_string(),
            deployment_id: deployment_id.to_string(),
            target_deployment_id: None,
            trigger,
            reason: reason.to_string(),
            status: RollbackStatus::Pending,
            steps: Vec::new(),
            pre_snapshot_id: None,
            post_snapshot_id: None,
            error: None,
            initiated_by: initiated_by.map(str::to_string),
            initiated_at: epoch_secs(),
            completed_at: None,
        };

        if let Err(err) = self.deployments.create_rollback_event(&event) {
            event.status = RollbackStatus::Failed;
            event.error = Some(err.to_string());
            event.completed_at = Some(epoch_secs());
            tracing::error!(deployment_id, error = %err, "could not persist rollback event");
            self.events.on_error(&ErrorEvent {
                source: "rollback".to_string(),
                message: err.to_string(),
            });
            return RollbackOutcome {
                event,
                target_deployment: None,
            };
        }
        tracing::info!(
            rollback_id = %event.id,
            deployment_id,
            trigger = trigger.as_str(),
            reason,
            "rollback started"
        );
        self.events.on_rollback_started(&RollbackStartedEvent {
            rollback_id: event.id.clone(),
            deployment_id: deployment_id.to_string(),
            trigger,
            reason: reason.to_string(),
        });

        let target = match self.run(&mut event) {
            Ok(target) => {
                event.status = RollbackStatus::Success;
                Some(target)
            }
            Err(err) => {
                event.status = RollbackStatus::Failed;
                event.error = Some(err.to_string());
                None
            }
        };
        event.completed_at = Some(epoch_secs());
        if let Err(err) = self.deployments.update_rollback_event(&event) {
            tracing::error!(rollback_id = %event.id, error = %err, "could not persist final rollback status");
            self.events.on_error(&ErrorEvent {
                source: "rollback".to_string(),
                message: err.to_string(),
            });
        }

        tracing::info!(
            rollback_id = %event.id,
            status = event.status.as_str(),
            rollback_duration = started.elapsed().as_millis() as u64,
            "rollback finished"
        );
        self.events.on_rollback_completed(&RollbackCompletedEvent {
            rollback_id: event.id.clone(),
            deployment_id: event.deployment_id.clone(),
            target_deployment_id: event.target_deployment_id.clone(),
            status: event.status,
        });

        RollbackOutcome {
            event,
            target_deployment: target,
        }
    }

    fn run(&self, event: &mut RollbackEvent) -> Result<Deployment, RollbackError> {
        let now = epoch_secs;

        let current = match self.deployments.deployment(&event.deployment_id) {
            Ok(Some(current)) => current,
            Ok(None) => {
                let err = RollbackError::DeploymentNotFound {
                    deployment_id: event.deployment_id.clone(),
                };
                event
                    .steps
                    .push(RollbackStep::failed("load deployment", err.to_string(), now()));
                return Err(err);
            }
            Err(err) => {
                event
                    .steps
                    .push(RollbackStep::failed("load deployment", err.to_string(), now()));
                return Err(err.into());
            }
        };
        event.steps.push(RollbackStep::completed(
            "load deployment",
            Some(format!("version {} in {}", current.version, current.environment)),
            now(),
        ));

        // audit step: record what health looked like when we acted; the
        // rollback proceeds on the caller's reason even if the numbers
        // have recovered in the meantime
        let snapshot = self.decision.fetch_health(&event.deployment_id);
        event.steps.push(RollbackStep::completed(
            "confirm deployment health",
            Some(format!(
                "healthy={} error_rate={:.2} recent_errors={}",
                snapshot.healthy, snapshot.error_rate_per_minute, snapshot.recent_errors
            )),
            now(),
        ));

        let action = ActionDescriptor::rollback(&event.reason);
        let decision = ComplianceGate::evaluate(
            &action,
            &GateContext::from_error_rate(snapshot.error_rate_per_minute),
        );
        if !decision.allowed {
            let reason = decision
                .denial_reason()
                .unwrap_or_else(|| "policy denied".to_string());
            event
                .steps
                .push(RollbackStep::failed("policy gate", reason.clone(), now()));
            return Err(RollbackError::PolicyDenied { reason });
        }
        event.steps.push(RollbackStep::completed(
            "policy gate",
            decision.matched_profile.clone(),
            now(),
        ));

        // always re-resolved fresh; a retry never reuses a stale target
        let target = match self.deployments.rollback_target(&current) {
            Ok(Some(target)) => target,
            Ok(None) => {
                event.steps.push(RollbackStep::failed(
                    "identify rollback target",
                    "No valid rollback target".to_string(),
                    now(),
                ));
                return Err(RollbackError::NoValidTarget);
            }
            Err(err) => {
                event.steps.push(RollbackStep::failed(
                    "identify rollback target",
                    err.to_string(),
                    now(),
                ));
                return Err(err.into());
            }
        };
        event.target_deployment_id = Some(target.id.clone());
        event.steps.push(RollbackStep::completed(
            "identify rollback target",
            Some(format!(
                "version {} deployed at {}",
                target.version, target.deployed_at
            )),
            now(),
        ));

        self.transition(event, RollbackStatus::Snapshotting)?;
        match self
            .deployments
            .create_snapshot(&event.deployment_id, SnapshotKind::PreRollback)
        {
            Ok(snapshot) => {
                event.pre_snapshot_id = Some(snapshot.id.clone());
                event.steps.push(RollbackStep::completed(
                    "create pre-rollback snapshot",
                    Some(snapshot.id),
                    now(),
                ));
            }
            Err(err) => {
                event.steps.push(RollbackStep::failed(
                    "create pre-rollback snapshot",
                    err.to_string(),
                    now(),
                ));
                return Err(err.into());
            }
        }

        self.transition(event, RollbackStatus::Applying)?;
        let timeout_ms = self.config.effective_apply_timeout_ms();
        let runner = Arc::clone(&self.runner);
        let apply_current = current.clone();
        let apply_target = target.clone();
        let applied = call_with_timeout(timeout_ms, move || {
            runner.apply(&apply_current, &apply_target)
        });
        match applied {
            Some(Ok(())) => {
                event.steps.push(RollbackStep::completed(
                    "apply rollback",
                    Some(format!("restored version {}", target.version)),
                    now(),
                ));
            }
            Some(Err(err)) => {
                event
                    .steps
                    .push(RollbackStep::failed("apply rollback", err.to_string(), now()));
                return Err(err);
            }
            None => {
                let err = RollbackError::ApplyTimeout { timeout_ms };
                event
                    .steps
                    .push(RollbackStep::failed("apply rollback", err.to_string(), now()));
                return Err(err);
            }
        }

        match self.deployments.mark_rolled_back(&event.deployment_id, now()) {
            Ok(()) => {
                event.steps.push(RollbackStep::completed(
                    "mark deployment rolled back",
                    None,
                    now(),
                ));
            }
            Err(err) => {
                event.steps.push(RollbackStep::failed(
                    "mark deployment rolled back",
                    err.to_string(),
                    now(),
                ));
                return Err(err.into());
            }
        }

        // the restore itself completed; a missing post snapshot is an
        // audit gap, not a failed rollback
        match self
            .deployments
            .create_snapshot(&event.deployment_id, SnapshotKind::PostRollback)
        {
            Ok(snapshot) => {
                event.post_snapshot_id = Some(snapshot.id.clone());
                event.steps.push(RollbackStep::completed(
                    "create post-rollback snapshot",
                    Some(snapshot.id),
                    now(),
                ));
            }
            Err(err) => {
                tracing::warn!(rollback_id = %event.id, error = %err, "post-rollback snapshot failed");
                event.steps.push(RollbackStep::failed(
                    "create post-rollback snapshot",
                    err.to_string(),
                    now(),
                ));
            }
        }

        Ok(target)
    }

    fn transition(
        &self,
        event: &mut RollbackEvent,
        status: RollbackStatus,
    ) -> Result<(), RollbackError> {
        event.status = status;
        self.deployments.update_rollback_event(event)?;
        Ok(())
    }
}
