//! Synchronous fan-out dispatcher for pipeline events.

use std::sync::Arc;

use super::handler::MendEventHandler;
use super::types::*;

/// Forwards every event to each registered handler, in registration order.
///
/// The dispatcher itself implements [`MendEventHandler`], so subsystems
/// hold one `Arc<EventDispatcher>` and emit through the trait methods.
/// With no handlers registered every emit is a no-op.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn MendEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. Order of registration is dispatch order.
    pub fn register(&mut self, handler: Arc<dyn MendEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl MendEventHandler for EventDispatcher {
    fn on_pattern_learned(&self, event: &PatternLearnedEvent) {
        for handler in &self.handlers {
            handler.on_pattern_learned(event);
        }
    }

    fn on_pattern_approved(&self, event: &PatternApprovedEvent) {
        for handler in &self.handlers {
            handler.on_pattern_approved(event);
        }
    }

    fn on_fix_applied(&self, event: &FixAppliedEvent) {
        for handler in &self.handlers {
            handler.on_fix_applied(event);
        }
    }

    fn on_fix_denied(&self, event: &FixDeniedEvent) {
        for handler in &self.handlers {
            handler.on_fix_denied(event);
        }
    }

    fn on_clusters_rebuilt(&self, event: &ClustersRebuiltEvent) {
        for handler in &self.handlers {
            handler.on_clusters_rebuilt(event);
        }
    }

    fn on_health_evaluated(&self, event: &HealthEvaluatedEvent) {
        for handler in &self.handlers {
            handler.on_health_evaluated(event);
        }
    }

    fn on_rollback_started(&self, event: &RollbackStartedEvent) {
        for handler in &self.handlers {
            handler.on_rollback_started(event);
        }
    }

    fn on_rollback_completed(&self, event: &RollbackCompletedEvent) {
        for handler in &self.handlers {
            handler.on_rollback_completed(event);
        }
    }

    fn on_error(&self, event: &ErrorEvent) {
        for handler in &self.handlers {
            handler.on_error(event);
        }
    }
}
