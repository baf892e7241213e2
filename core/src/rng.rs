//! Deterministic random number generation.
//!
//! RULE: Nothing in the core may call a platform RNG. The only randomness
//! in this crate is the bot's fallback-reply pick, and it flows through a
//! ReplyRng seeded once at process start. Same seed, same reply sequence —
//! which is what makes the bot's behavior reproducible in tests.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A seeded PCG stream for fallback-reply selection.
pub struct ReplyRng {
    inner: Pcg64Mcg,
}

impl ReplyRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Pick an element of `items` uniformly. Panics on an empty slice —
    /// the fallback table is validated non-empty at config load.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.next_u64_below(items.len() as u64) as usize;
        &items[idx]
    }
}
