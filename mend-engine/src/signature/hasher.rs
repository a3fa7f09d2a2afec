//! Stable signature hashing.
//!
//! xxh3 over the normalized message keyed by source. Platform and run
//! independent: no pointer identity, no map iteration order, no locale.

use xxhash_rust::xxh3::xxh3_64;

use super::normalizer::normalize_message;

/// Computes the pattern signature for an error message and its source.
///
/// The source component is part of pattern identity: the same message
/// text from two different sources yields two different signatures.
pub fn signature_for(message: &str, source: &str) -> String {
    let normalized = normalize_message(message);
    let keyed = format!("{normalized}|{source}");
    format!("pattern_{:016x}", xxh3_64(keyed.as_bytes()))
}
