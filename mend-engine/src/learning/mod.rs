//! Pattern learning from telemetry.

pub mod classifier;
pub mod engine;
pub mod matcher;

pub use classifier::classify_pattern_type;
pub use engine::{LearnOutcome, LearningEngine};
pub use matcher::{compile_matcher, synthesize_matcher};
