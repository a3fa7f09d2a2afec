//! Policy gate for automated actions.

pub mod gate;
pub mod profile;

pub use gate::{ComplianceGate, GateContext};
pub use profile::{approved_profiles, ActionDescriptor, ActionMethod, ApprovedProfile};
