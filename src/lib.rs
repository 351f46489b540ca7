//! Crate root: public surface, core data model, and protocol-wide
//! invariants.
//!
//! This module is the single canonical entry point for downstream users.
//! It defines [`SecureProof`] and its constituents, the crate-wide
//! [`QzkpError`], and re-exports the submodules that implement each
//! component of the protocol.
//!
//! ## Invariants
//!
//! - A [`StateVector`] is always unit-norm and immutable after
//!   construction (`vector` module).
//! - A [`SecureProof`]'s canonical byte encoding ([`SecureProof::canonical_bytes`])
//!   is the one and only signature/MAC scope; it is never replaced by a
//!   `serde` backend's own framing.
//! - `Verifier::verify` never surfaces an error kind — only a boolean — so
//!   a caller cannot distinguish which sub-check failed from the return
//!   type alone (see `scheduler` module docs).

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Keyed hash commitment engine (C2).
pub mod commitment;
/// Challenge generator (C4).
pub mod challenge;
/// Post-quantum signing key lifecycle (C7 support).
pub mod keys;
/// Binary Merkle aggregator (C6).
pub mod merkle;
/// Measurement oracle (C3).
pub mod oracle;
/// CSPRNG subsystem (C9).
pub mod randomness;
/// Per-challenge response engine (C5).
pub mod response;
/// Proof assembler and verifier (C8).
pub mod scheduler;
/// Post-quantum sign/verify operation surface (C7).
pub mod signature;
/// Complex vector codec and Hadamard transform (C1).
pub mod vector;

/// Ergonomic builder-style entry points.
pub mod api;

pub use challenge::{Basis, Challenge, ChallengeError, ChallengeIdx};
pub use commitment::{CommitError, Commitment};
pub use keys::{KeyError, SignatureScheme};
pub use merkle::{MerkleError, MerkleProof, MerkleTree};
pub use oracle::{Measurement, OracleError};
pub use randomness::{CsRng, HybridRng, OsRngSource, RandomnessError};
pub use response::{ChallengeResponse, ResponseError};
pub use scheduler::{ProveError, Prover, Verifier};
pub use vector::{Complex64, StateVector, VectorError};

/// Theoretical upper bounds on ψ, never exact values derived from the
/// secret vector: only `dimension`, `entropy_upper_bound = log2(d)`,
/// `coherence_upper_bound = d`, a timestamp, and the security level are
/// carried.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecureMetadata {
    /// ψ's dimension, `d`.
    pub dimension: u32,
    /// `log2(d)` — an upper bound on the entropy a measurement could leak.
    pub entropy_upper_bound: f64,
    /// `d` — an upper bound on ψ's coherence.
    pub coherence_upper_bound: u32,
    /// RFC3339 nanosecond-precision timestamp of proof construction.
    pub timestamp: String,
    /// Nominal security level in bits (NIST Level 5 signature ⇒ 256-ish,
    /// recorded here as the protocol-wide constant below).
    pub security_level: u32,
}

/// Nominal security level recorded in every proof's metadata, consistent
/// with the Dilithium5 / ML-DSA-87 (NIST Level 5) signature this crate
/// signs with.
pub const SECURITY_LEVEL: u32 = 256;

impl SecureMetadata {
    /// Build metadata for a dimension-`d` proof, stamped with the current
    /// time.
    pub fn new(dimension: u32) -> Self {
        Self {
            dimension,
            entropy_upper_bound: (dimension as f64).log2(),
            coherence_upper_bound: dimension,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
            security_level: SECURITY_LEVEL,
        }
    }
}

/// The aggregate non-interactive proof: commitment prefix, per-challenge
/// responses, Merkle root, metadata, identifier, signature, and the
/// symmetric-key-binding MAC.
///
/// [`SecureProof::canonical_bytes`] is the one frozen byte encoding used
/// both as the post-quantum signature's message and as the keyed MAC's
/// message (each with its own field blanked in turn) — never `serde_json`
/// or any other serde backend's own framing, so field order and number
/// formatting stay fixed independent of which serde format a caller later
/// chooses for storage or transport.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecureProof {
    /// ψ's dimension.
    pub quantum_dimensions: u32,
    /// First 16 bytes of the C2 commitment digest, lowercase hex.
    pub commitment_hash_prefix: String,
    /// One response per challenge, in challenge order.
    pub challenge_responses: Vec<ChallengeResponse>,
    /// The Merkle root over `challenge_responses`, lowercase hex.
    pub merkle_root: String,
    /// Theoretical upper bounds and protocol metadata.
    pub metadata: SecureMetadata,
    /// Application-assigned prover identifier.
    pub identifier: String,
    /// Post-quantum signature over [`SecureProof::canonical_bytes`] with
    /// this field blanked, lowercase hex.
    pub signature: String,
    /// BLAKE3 keyed-MAC over the canonical bytes with this field blanked,
    /// keyed by the symmetric authentication key — restores the
    /// symmetric-key binding `verify` would otherwise lack (see
    /// `scheduler` module docs and `DESIGN.md`).
    pub key_binding_mac: String,
    /// RFC3339 nanosecond-precision timestamp, duplicated from
    /// `metadata.timestamp` at the top level for convenient access.
    pub timestamp: String,
}

impl SecureProof {
    /// The canonical, length-delimited byte encoding used as the
    /// signature and MAC scope. Field order and number formatting are
    /// frozen: this is not `serde_json`, so a `serde`-derived
    /// `Deserialize` impl on this struct can never silently change what
    /// gets signed.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_u32(&mut out, self.quantum_dimensions);
        write_str(&mut out, &self.commitment_hash_prefix);
        write_u32(&mut out, self.challenge_responses.len() as u32);
        for r in &self.challenge_responses {
            write_u32(&mut out, r.challenge_index);
            out.push(r.basis.tag());
            write_str(&mut out, &r.response_hash);
            write_str(&mut out, &r.commitment_hash);
            write_str(&mut out, &r.proof_hash);
        }
        write_str(&mut out, &self.merkle_root);
        write_u32(&mut out, self.metadata.dimension);
        write_f64(&mut out, self.metadata.entropy_upper_bound);
        write_u32(&mut out, self.metadata.coherence_upper_bound);
        write_str(&mut out, &self.metadata.timestamp);
        write_u32(&mut out, self.metadata.security_level);
        write_str(&mut out, &self.identifier);
        write_str(&mut out, &self.signature);
        write_str(&mut out, &self.key_binding_mac);
        write_str(&mut out, &self.timestamp);
        out
    }
}

fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn write_f64(out: &mut Vec<u8>, v: f64) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

/// Aggregate error type composing every module-local error, matching the
/// way `scheduler::ProveError` itself composes its upstream errors via
/// `#[from]`.
#[derive(Debug, thiserror::Error)]
pub enum QzkpError {
    /// Vector construction or transform failure.
    #[error(transparent)]
    Vector(#[from] VectorError),
    /// Commitment failure.
    #[error(transparent)]
    Commit(#[from] CommitError),
    /// Challenge generation failure.
    #[error(transparent)]
    Challenge(#[from] ChallengeError),
    /// Response computation failure.
    #[error(transparent)]
    Response(#[from] ResponseError),
    /// Merkle aggregation failure.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// Key generation or signing failure.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Randomness source failure.
    #[error(transparent)]
    Randomness(#[from] RandomnessError),
    /// End-to-end prove failure (already composes the above).
    #[error(transparent)]
    Prove(#[from] ProveError),
}
