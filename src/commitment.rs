//! Commitment engine (C2): keyed hash commitment to a [`StateVector`] with
//! a random nonce.
//!
//! `commit(psi, identifier, key)` binds the prover to a specific ψ without
//! revealing it: the digest is a keyed BLAKE3 hash over a canonical binary
//! encoding of every amplitude, the identifier, the key, and a fresh
//! 32-byte nonce. Only the first 16 bytes of the digest are ever published;
//! the nonce itself is never published.

#![forbid(unsafe_code)]

use zeroize::Zeroize;

use crate::randomness::{CsRng, RandomnessError};
use crate::vector::StateVector;

/// Errors raised while computing a commitment.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The authentication key was shorter than the enforced minimum.
    #[error("key must be at least {min} bytes, got {got}")]
    KeyTooShort {
        /// Minimum required key length.
        min: usize,
        /// Length actually supplied.
        got: usize,
    },
    /// The nonce could not be drawn from the randomness source.
    #[error(transparent)]
    Randomness(#[from] RandomnessError),
}

/// Minimum symmetric authentication key length, in bytes.
pub const MIN_KEY_LEN: usize = 32;

/// Canonical little-endian byte encoding of ψ: 16 bytes per amplitude
/// (`re` then `im`, each a full-precision `f64`). This path is never
/// replayed at verification time, so a binary encoding is used rather than
/// the decimal rendering C5 uses for hash pre-images.
pub fn encode(psi: &StateVector) -> Vec<u8> {
    let mut out = Vec::with_capacity(psi.dim() * 16);
    for amp in psi.amplitudes() {
        out.extend_from_slice(&amp.re.to_le_bytes());
        out.extend_from_slice(&amp.im.to_le_bytes());
    }
    out
}

/// A commitment to a [`StateVector`]: a 32-byte digest plus the nonce that
/// produced it.
///
/// The nonce is secret and zeroized on drop; only [`Commitment::published_prefix`]
/// (the first 16 bytes of the digest) is meant to leave this process.
pub struct Commitment {
    digest: [u8; 32],
    nonce: [u8; 32],
}

impl std::fmt::Debug for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commitment")
            .field("published_prefix", &hex::encode(self.published_prefix()))
            .field("nonce", &"<redacted>")
            .finish()
    }
}

impl Commitment {
    /// The full 32-byte digest. Not published in a proof; exposed for
    /// tests and for callers building their own binding schemes on top.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// The first 16 bytes of the digest — the only part ever published in
    /// a [`crate::SecureProof`].
    pub fn published_prefix(&self) -> &[u8] {
        &self.digest[..16]
    }
}

impl Drop for Commitment {
    fn drop(&mut self) {
        self.nonce.zeroize();
    }
}

/// Compute a keyed commitment to `psi` under `identifier` and `key`.
///
/// `digest = BLAKE3(encode(psi) || identifier || key || nonce)`, where
/// `nonce` is 32 fresh bytes drawn from `rng`.
pub fn commit(
    psi: &StateVector,
    identifier: &str,
    key: &[u8],
    rng: &dyn CsRng,
) -> Result<Commitment, CommitError> {
    if key.len() < MIN_KEY_LEN {
        return Err(CommitError::KeyTooShort { min: MIN_KEY_LEN, got: key.len() });
    }
    let nonce: [u8; 32] = rng.bytes()?;

    let mut h = blake3::Hasher::new();
    h.update(&encode(psi));
    h.update(identifier.as_bytes());
    h.update(key);
    h.update(&nonce);
    let digest = *h.finalize().as_bytes();

    Ok(Commitment { digest, nonce })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomness::OsRngSource;

    fn psi() -> StateVector {
        StateVector::from_bytes(b"commitment test vector", 8).unwrap()
    }

    #[test]
    fn commit_rejects_short_key() {
        let rng = OsRngSource::new();
        let err = commit(&psi(), "id", &[0u8; 16], &rng).unwrap_err();
        assert!(matches!(err, CommitError::KeyTooShort { .. }));
    }

    #[test]
    fn commit_is_keyed_and_nonce_randomized() {
        let rng = OsRngSource::new();
        let key = [0x11u8; 32];
        let a = commit(&psi(), "id", &key, &rng).unwrap();
        let b = commit(&psi(), "id", &key, &rng).unwrap();
        assert_ne!(a.digest(), b.digest(), "fresh nonces must change the digest");
    }

    #[test]
    fn commit_differs_across_keys() {
        let rng = OsRngSource::new();
        let a = commit(&psi(), "id", &[0x11u8; 32], &rng).unwrap();
        let b = commit(&psi(), "id", &[0x22u8; 32], &rng).unwrap();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn published_prefix_is_first_16_bytes() {
        let rng = OsRngSource::new();
        let c = commit(&psi(), "id", &[0x11u8; 32], &rng).unwrap();
        assert_eq!(c.published_prefix(), &c.digest()[..16]);
    }
}
