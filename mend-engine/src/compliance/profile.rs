//! Action descriptors and the approved-profile whitelist.
//!
//! Every automated action the pipeline can take is described by a fixed
//! structural profile. The gate admits an action only when its structural
//! parameters exactly match a whitelisted profile; there is no freeform
//! path to automated execution.

use mend_core::constants::{
    PROFILE_MATCH_EPSILON, PROFILE_STRUCTURAL_RATIO, PROFILE_TARGET_FREQUENCY_HZ,
    REMEDIATION_ENTROPY_DELTA, ROLLBACK_ENTROPY_DELTA,
};
use serde::{Deserialize, Serialize};

/// Method class of a proposed automated action.
///
/// Only `Corrective` (apply a vetted fix script) and `Restorative` (return
/// to a previously verified state) appear in the whitelist. The other two
/// exist so unvetted proposals have something honest to call themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMethod {
    Corrective,
    Restorative,
    Experimental,
    Forced,
}

impl ActionMethod {
    /// Stable string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Corrective => "corrective",
            Self::Restorative => "restorative",
            Self::Experimental => "experimental",
            Self::Forced => "forced",
        }
    }
}

/// A proposed automated action, as submitted to the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub method_type: ActionMethod,
    /// Must be exactly zero for automated execution.
    pub risk_to_life: f64,
    /// Claimed change in system disorder; negative means the action heals.
    pub entropy_increase: f64,
    pub structural_ratio: f64,
    pub target_frequency: f64,
    pub description: String,
}

impl ActionDescriptor {
    /// The fixed profile submitted for every auto-fix application.
    pub fn remediation(signature: &str) -> Self {
        Self {
            method_type: ActionMethod::Corrective,
            risk_to_life: 0.0,
            entropy_increase: REMEDIATION_ENTROPY_DELTA,
            structural_ratio: PROFILE_STRUCTURAL_RATIO,
            target_frequency: PROFILE_TARGET_FREQUENCY_HZ,
            description: format!("auto-fix pattern {signature}"),
        }
    }

    /// The fixed profile submitted for every automatic rollback.
    pub fn rollback(reason: &str) -> Self {
        Self {
            method_type: ActionMethod::Restorative,
            risk_to_life: 0.0,
            entropy_increase: ROLLBACK_ENTROPY_DELTA,
            structural_ratio: PROFILE_STRUCTURAL_RATIO,
            target_frequency: PROFILE_TARGET_FREQUENCY_HZ,
            description: format!("rollback to last healthy deployment: {reason}"),
        }
    }
}

/// One whitelisted structural profile.
#[derive(Debug, Clone, Copy)]
pub struct ApprovedProfile {
    pub name: &'static str,
    pub method_type: ActionMethod,
    pub structural_ratio: f64,
    pub target_frequency: f64,
}

impl ApprovedProfile {
    /// Exact structural match, with floats compared inside
    /// [`PROFILE_MATCH_EPSILON`].
    pub fn matches(&self, action: &ActionDescriptor) -> bool {
        self.method_type == action.method_type
            && (self.structural_ratio - action.structural_ratio).abs() <= PROFILE_MATCH_EPSILON
            && (self.target_frequency - action.target_frequency).abs() <= PROFILE_MATCH_EPSILON
    }
}

const APPROVED_PROFILES: &[ApprovedProfile] = &[
    ApprovedProfile {
        name: "auto-remediation",
        method_type: ActionMethod::Corrective,
        structural_ratio: PROFILE_STRUCTURAL_RATIO,
        target_frequency: PROFILE_TARGET_FREQUENCY_HZ,
    },
    ApprovedProfile {
        name: "auto-rollback",
        method_type: ActionMethod::Restorative,
        structural_ratio: PROFILE_STRUCTURAL_RATIO,
        target_frequency: PROFILE_TARGET_FREQUENCY_HZ,
    },
];

/// The fixed whitelist of profiles approved for automated execution.
pub fn approved_profiles() -> &'static [ApprovedProfile] {
    APPROVED_PROFILES
}
