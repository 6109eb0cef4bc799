//! Image codec capability.
//!
//! Descrambling and container re-encoding are provided by the embedding
//! application; this crate only decides when each is invoked.

/// Pixel-level image operations.
pub trait ImageCodec: Send + Sync {
    /// Restores the original block order of a scrambled image.
    fn descramble(&self, scramble_id: u64, source: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Re-encodes `source` into the container named by `target_suffix` (e.g. `.png`).
    fn reencode(&self, source: &[u8], target_suffix: &str) -> anyhow::Result<Vec<u8>>;
}
