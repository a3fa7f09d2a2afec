//! Deterministic pattern signatures.
//!
//! The signature is the sole dedup and lookup key for learned patterns.

pub mod hasher;
pub mod normalizer;

pub use hasher::signature_for;
pub use normalizer::normalize_message;
