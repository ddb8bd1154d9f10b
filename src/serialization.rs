//! Opaque binary form for a [`Solution`], sufficient to reconstruct the
//! Problem, Allocation, and SolvingStats it carries (spec's serialized
//! solution interface). Forward/backward compatibility across versions is
//! explicitly not required: a version byte mismatch on read is a
//! deserialization failure, not a migration.
//!
//! Mirrors the `bincode::serialize`/`deserialize` usage pattern seen in the
//! pack's replicated state machine snapshotting.

use crate::error::{CoreError, CoreResult};
use crate::model::Solution;

const FORMAT_VERSION: u8 = 1;

/// Encodes `solution` as `[FORMAT_VERSION byte][bincode payload]`.
pub fn encode(solution: &Solution) -> CoreResult<Vec<u8>> {
    let payload = bincode::serialize(solution).map_err(|e| CoreError::Serialization(e.to_string()))?;
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(FORMAT_VERSION);
    out.extend(payload);
    Ok(out)
}

/// Decodes a buffer produced by [`encode`]. Fails with
/// [`CoreError::Serialization`] on an unrecognized version byte or a
/// malformed payload.
pub fn decode(bytes: &[u8]) -> CoreResult<Solution> {
    let (version, payload) = bytes
        .split_first()
        .ok_or_else(|| CoreError::Serialization("empty input".to_string()))?;
    if *version != FORMAT_VERSION {
        return Err(CoreError::Serialization(format!(
            "unsupported format version {version} (expected {FORMAT_VERSION})"
        )));
    }
    bincode::deserialize(payload).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Reads and decodes a serialized Solution from `path`.
pub fn load(path: &std::path::Path) -> CoreResult<Solution> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Encodes and writes `solution` to `path`.
pub fn save(path: &std::path::Path, solution: &Solution) -> CoreResult<()> {
    let bytes = encode(solution)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
