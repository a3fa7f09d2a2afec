//! Core types, traits, errors, config, events, tracing, and constants for
//! the Mend self-healing pipeline.
//!
//! Everything here is I/O-free except the in-memory store implementations,
//! which exist so the engine crates can be tested without a database.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod store;
pub mod tracing;
pub mod types;
