//! Deterministic RNG streams.
//!
//! Environments and vector environments own a [`RngStream`]; seeding with the
//! same value always reproduces the same stream.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The RNG stream used across the crate.
pub type RngStream = ChaCha8Rng;

/// Default seed for streams created before anyone calls `seed`.
pub const DEFAULT_SEED: u64 = 1_234_567;

/// Create a new RNG stream from a seed.
pub fn rng_from_seed(seed: u64) -> RngStream {
    RngStream::seed_from_u64(seed)
}
