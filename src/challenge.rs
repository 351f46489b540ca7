//! Challenge generator (C4): uniform sampling of (index, basis, nonce)
//! triples.
//!
//! Challenges are prover-chosen CSPRNG draws, not Fiat-Shamir-bound to a
//! transcript — this mirrors the protocol's documented design rather than
//! silently tightening it into an interactive-soundness argument.

#![forbid(unsafe_code)]

use crate::randomness::{CsRng, RandomnessError};

/// Errors raised while generating a challenge set.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    /// `k` (soundness parameter) was zero.
    #[error("soundness parameter k must be positive")]
    ZeroSoundness,
    /// `d` (dimension) was zero.
    #[error("dimension d must be positive")]
    ZeroDimension,
    /// The randomness source failed.
    #[error(transparent)]
    Randomness(#[from] RandomnessError),
}

/// Indexes a single slot in a proof's challenge array.
///
/// Follows the small-newtype-per-index convention used throughout this
/// crate (`ChallengeIdx`, as distinct from a raw `u32`, so a challenge
/// slot can never be confused with a vector index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChallengeIdx(pub u32);

/// The measurement basis a challenge selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Basis {
    /// Read ψ directly.
    Z,
    /// Read `hadamard(ψ)`.
    X,
}

impl Basis {
    /// A single byte uniquely identifying this basis, used in canonical
    /// encodings and hash pre-images.
    pub fn tag(&self) -> u8 {
        match self {
            Basis::Z => 0,
            Basis::X => 1,
        }
    }
}

/// A single challenge: which vector index to measure, in which basis, tied
/// together with a short per-proof nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    /// This challenge's position in the proof's challenge array.
    pub slot: ChallengeIdx,
    /// The vector index to measure, in `[0, d)`.
    pub index: u32,
    /// The measurement basis.
    pub basis: Basis,
    /// 4 opaque nonce bytes; uniqueness within a proof, not long-term
    /// unpredictability, is the only property relied on.
    pub nonce: [u8; 4],
}

/// Sample `k` independent challenges over a dimension-`d` vector.
pub fn generate_challenges(k: u32, d: u32, rng: &dyn CsRng) -> Result<Vec<Challenge>, ChallengeError> {
    if k == 0 {
        return Err(ChallengeError::ZeroSoundness);
    }
    if d == 0 {
        return Err(ChallengeError::ZeroDimension);
    }

    let mut out = Vec::with_capacity(k as usize);
    for slot in 0..k {
        let index = rng.uniform_u32(d)?;
        let basis = if rng.uniform_u32(2)? == 0 { Basis::Z } else { Basis::X };
        let nonce_wide: [u8; 8] = rng.bytes()?;
        let mut nonce = [0u8; 4];
        nonce.copy_from_slice(&nonce_wide[..4]);
        out.push(Challenge { slot: ChallengeIdx(slot), index, basis, nonce });
    }
    Ok(out)
}
