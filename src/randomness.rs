//! CSPRNG subsystem (C9): a thin, trait-based entropy source with an
//! optional hybrid XOR combiner.
//!
//! ## Design
//! - [`CsRng`] is the single entropy abstraction the rest of the crate draws
//!   on — commitments (C2), challenges (C4), and the signing backend all go
//!   through it rather than touching `rand`/`OsRng` directly. This mirrors
//!   the teacher's convention of centralizing cryptographic primitives
//!   behind a small trait (cf. `pcs::Basis`, `stream::Restreamer`).
//! - [`OsRngSource`] wraps the operating system CSPRNG (`rand::rngs::OsRng`),
//!   the teacher's RNG of choice (see `pcs.rs`'s `StdRng`/`rand` usage).
//! - [`HybridRng`] XORs the OS stream with a BLAKE3-XOF-seeded keystream,
//!   the same extendable-output construction `transcript.rs` uses for
//!   challenge derivation (`finalize_xof`). This is an entropy-pooling
//!   measure, not a security upgrade over the OS source — see spec's
//!   Open Questions: the OS CSPRNG is the assumed trust root either way.
//!
//! All sources serialize interior mutability behind a `Mutex`, per the
//! concurrency model: "the CSPRNG handle is per-thread or guarded by a
//! mutex."

#![forbid(unsafe_code)]

use std::sync::Mutex;

use blake3::Hasher;
use rand::{rngs::OsRng, RngCore};

/// Errors surfaced by a [`CsRng`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum RandomnessError {
    /// The OS entropy source failed to produce bytes.
    #[error("OS entropy source failure: {0}")]
    Source(String),
}

/// A cryptographically secure source of random bytes.
///
/// Implementations MUST be safe to share across threads (`Send + Sync`);
/// internal mutability is the implementor's responsibility.
pub trait CsRng: Send + Sync {
    /// Fill `buf` with random bytes, or report a source failure.
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<(), RandomnessError>;

    /// Convenience: allocate and fill an `N`-byte array.
    fn bytes<const N: usize>(&self) -> Result<[u8; N], RandomnessError> {
        let mut out = [0u8; N];
        self.fill_bytes(&mut out)?;
        Ok(out)
    }

    /// Sample a `u32` uniformly via rejection-free modulo reduction over a
    /// wide (8-byte) draw — negligible bias for any `bound <= 2^32`.
    fn uniform_u32(&self, bound: u32) -> Result<u32, RandomnessError> {
        assert!(bound > 0, "uniform_u32 requires a positive bound");
        let raw = self.bytes::<8>()?;
        let wide = u64::from_le_bytes(raw);
        Ok((wide % bound as u64) as u32)
    }
}

/// The operating system's CSPRNG (`rand::rngs::OsRng`).
#[derive(Debug)]
pub struct OsRngSource {
    inner: Mutex<OsRng>,
}

impl OsRngSource {
    /// Construct a new OS-backed randomness source.
    pub fn new() -> Self {
        Self { inner: Mutex::new(OsRng) }
    }
}

impl CsRng for OsRngSource {
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<(), RandomnessError> {
        let mut guard = self.inner.lock().expect("OsRngSource mutex poisoned");
        guard.try_fill_bytes(buf).map_err(|e| RandomnessError::Source(e.to_string()))
    }
}

/// Entropy-pooling combiner: XORs the OS CSPRNG with a reseedable BLAKE3-XOF
/// keystream.
///
/// This is resilience against a single source's local failure, not a
/// cryptographic strengthening of the OS source — the OS CSPRNG remains the
/// trust root. See spec §9, "Randomness composition."
pub struct HybridRng {
    os: OsRngSource,
    xof_seed: Mutex<Hasher>,
    ctr: Mutex<u64>,
}

impl HybridRng {
    /// Build a hybrid source seeded from the OS CSPRNG once at construction.
    pub fn new() -> Result<Self, RandomnessError> {
        let os = OsRngSource::new();
        let seed = os.bytes::<32>()?;
        let mut h = Hasher::new();
        h.update(b"qsvzkp.hybrid_rng.v1");
        h.update(&seed);
        Ok(Self { os, xof_seed: Mutex::new(h), ctr: Mutex::new(0) })
    }

    fn xof_bytes(&self, len: usize) -> Vec<u8> {
        let base = self.xof_seed.lock().expect("HybridRng xof mutex poisoned").clone();
        let mut ctr_guard = self.ctr.lock().expect("HybridRng ctr mutex poisoned");
        let mut h = base;
        h.update(b":draw:");
        h.update(&ctr_guard.to_be_bytes());
        *ctr_guard = ctr_guard.wrapping_add(1);
        drop(ctr_guard);

        let mut xof = h.finalize_xof();
        let mut out = vec![0u8; len];
        std::io::Read::read_exact(&mut xof, &mut out).expect("XOF read cannot fail");
        out
    }
}

impl CsRng for HybridRng {
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<(), RandomnessError> {
        self.os.fill_bytes(buf)?;
        let stream = self.xof_bytes(buf.len());
        for (b, s) in buf.iter_mut().zip(stream.iter()) {
            *b ^= s;
        }
        Ok(())
    }
}
