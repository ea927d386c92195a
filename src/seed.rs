//! Deterministic seeds for reproducible fallback imagery.
//!
//! Seeds are derived from a SHA-256 digest so a repeated prompt maps to the
//! same fallback images across process restarts and platforms.

use sha2::{Digest, Sha256};

/// Upper bound (exclusive) for seeds sent to the free generation service.
pub const GENERATION_SEED_BOUND: u64 = 1_000_000;

/// Upper bound (exclusive) for the stock-photo `sig` parameter.
pub const STOCK_SIG_BOUND: u64 = 1_000;

/// Upper bound (exclusive) for last-resort placeholder seeds.
pub const PLACEHOLDER_SEED_BOUND: u64 = 1_000_000;

/// Map `(text, index)` to an integer in `[0, bound)`.
///
/// The digest input is `text` followed by the decimal `index`, and the first
/// eight digest bytes are read big-endian before the modulus is applied.
pub fn seed(text: &str, index: usize, bound: u64) -> u64 {
    debug_assert!(bound > 0, "seed bound must be positive");

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(index.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % bound.max(1)
}
