//! Lexical feature extraction.

mod extractor;

pub use extractor::{extract_features, ErrorFeatures};
