//! Entropy-backed draw oracle.

use economy_core::RngOracle;
use rand::RngCore;

/// [`RngOracle`] over the thread-local OS-seeded generator.
///
/// Production draws must be unpredictable, so the seed is folded in but the
/// output is dominated by real entropy. Deterministic tests use
/// [`economy_core::PcgRng`] instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntropyRng;

impl RngOracle for EntropyRng {
    fn next_u32(&self, seed: u64) -> u32 {
        rand::thread_rng().next_u32() ^ (seed as u32)
    }
}
