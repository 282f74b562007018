//! Random source for draws.
//!
//! A process run owns exactly one [`DrawRng`], seeded once from the clock
//! mixed with OS entropy, and passes it by `&mut` into every shuffle. The
//! initial seed is kept so a run can be reproduced with [`DrawRng::from_seed`].
//!
//! Repeated independent trials (simulation) use [`SeedHierarchy`], which
//! derives per-trial sub-seeds via BLAKE3 hashing, independently of thread
//! scheduling order.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{Error, RngCore, SeedableRng};

/// Number of OS entropy words mixed into a fresh seed.
const ENTROPY_WORDS: usize = 3;

/// Build a seed from the high-resolution clock plus three OS entropy draws.
///
/// Two processes started in the same clock tick still diverge because the
/// entropy words differ.
pub fn entropy_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&nanos.to_le_bytes());
    for _ in 0..ENTROPY_WORDS {
        hasher.update(&OsRng.next_u64().to_le_bytes());
    }
    digest_to_u64(hasher.finalize())
}

fn digest_to_u64(hash: blake3::Hash) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// The shared generator for one run.
///
/// Wraps a `StdRng` and remembers the seed it was built from. Implements
/// `RngCore`, so it can be handed to anything that takes `R: Rng`.
#[derive(Debug, Clone)]
pub struct DrawRng {
    seed: u64,
    inner: StdRng,
}

impl DrawRng {
    /// Seed from the clock and OS entropy. Call once per process run.
    pub fn from_entropy() -> Self {
        Self::from_seed(entropy_seed())
    }

    /// Deterministic generator for tests and replaying a recorded run.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for DrawRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Deterministic sub-seed derivation for repeated trials.
///
/// Because derivation is hash-based (not order-dependent), the same master
/// seed produces identical sub-seeds no matter which thread evaluates which
/// trial first.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for `(label, iteration)`.
    pub fn sub_seed(&self, label: &str, iteration: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&iteration.to_le_bytes());
        digest_to_u64(hasher.finalize())
    }

    /// A fresh generator for `(label, iteration)`.
    pub fn rng_for(&self, label: &str, iteration: u64) -> DrawRng {
        DrawRng::from_seed(self.sub_seed(label, iteration))
    }
}
