//! Telemetry input type.

use mend_core::types::Severity;
use serde::{Deserialize, Serialize};

/// One error event handed in by the external logging pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    /// Component that emitted the error. Part of pattern identity.
    pub source: String,
    pub severity: Severity,
    pub incident_id: Option<String>,
}

impl ErrorReport {
    pub fn new(
        message: impl Into<String>,
        source: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            message: message.into(),
            source: source.into(),
            severity,
            incident_id: None,
        }
    }

    pub fn with_incident(mut self, incident_id: impl Into<String>) -> Self {
        self.incident_id = Some(incident_id.into());
        self
    }
}
