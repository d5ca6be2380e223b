//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through a SantaRng seeded from a caller-supplied
//! Seed. Same seed + same call sequence = bit-identical draws.
//!
//! Numeric seeds are rendered to hexadecimal text before seeding, so a
//! number and its hex string select the same stream, and distinct numbers
//! always select distinct seed strings.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use std::fmt;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A seed for the engine's PRNG, either numeric or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(i64),
    Text(String),
}

impl Seed {
    /// The stable string form the generator is actually seeded from.
    pub fn as_seed_string(&self) -> String {
        match self {
            Self::Number(n) if *n < 0 => format!("-{:x}", n.unsigned_abs()),
            Self::Number(n) => format!("{n:x}"),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for Seed {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Seed {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        // Values above i64::MAX keep their bit pattern.
        Self::Number(n as i64)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// The engine's deterministic RNG.
pub struct SantaRng {
    inner: Pcg64Mcg,
}

impl SantaRng {
    pub fn new(seed: impl Into<Seed>) -> Self {
        let seed = seed.into();
        let folded = fold_seed_string(&seed.as_seed_string());
        Self {
            inner: Pcg64Mcg::seed_from_u64(folded),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a signed 32-bit integer (full range).
    pub fn next_i32(&mut self) -> i32 {
        (self.inner.next_u64() >> 32) as u32 as i32
    }

    /// Uniform index in [0, n), drawn from one float roll.
    pub fn next_index_below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        let index = (self.next_f64() * n as f64) as usize;
        index.min(n - 1)
    }
}

/// FNV-1a over the seed's bytes. Fixed forever: changing it changes every
/// stream ever produced.
fn fold_seed_string(seed: &str) -> u64 {
    seed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
