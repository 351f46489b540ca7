//! Proof assembler & verifier (C8): end-to-end `Prover`/`Verifier`
//! orchestration.
//!
//! `Prover::prove` wires C1–C7 together in the order bytes/vector → commit
//! → challenges → per-challenge responses → Merkle root → canonical encode
//! → sign. `Verifier::verify` inverts the Merkle/signature/keyed-MAC checks
//! and structurally validates each response and the metadata bounds,
//! without ever recomputing a measurement (the verifier does not know ψ).
//!
//! Verification is total: every sub-check runs regardless of earlier
//! failures, so a caller watching timing cannot distinguish "signature
//! failed" from "signature OK, Merkle failed" from the latency alone. Each
//! sub-check's outcome is logged at `debug` level; only the aggregate
//! boolean crosses the public API boundary.

#![forbid(unsafe_code)]

use tracing::debug;

use crate::challenge::{self, Basis, ChallengeError};
use crate::commitment::{self, CommitError};
use crate::keys::{KeyError, SignatureScheme};
use crate::merkle::{self, MerkleError};
use crate::randomness::{CsRng, RandomnessError};
use crate::response::{self, ChallengeResponse, ResponseError};
use crate::signature;
use crate::vector::{StateVector, VectorError};
use crate::{SecureMetadata, SecureProof};

/// Minimum admissible soundness parameter (`k`).
pub const MIN_SOUNDNESS: u32 = 32;
/// Maximum admissible soundness parameter (`k`).
pub const MAX_SOUNDNESS: u32 = 256;
/// Maximum admissible vector dimension enforced by the verifier.
pub const MAX_DIMENSION: u32 = 1024;

/// Errors raised while constructing a proof.
#[derive(Debug, thiserror::Error)]
pub enum ProveError {
    /// ψ failed to construct or normalize.
    #[error(transparent)]
    Vector(#[from] VectorError),
    /// The commitment step failed (short key, randomness failure).
    #[error(transparent)]
    Commit(#[from] CommitError),
    /// `soundness_bits` was outside `[32, 256]`.
    #[error("soundness_bits {0} outside admissible range [{MIN_SOUNDNESS}, {MAX_SOUNDNESS}]")]
    SoundnessOutOfRange(u32),
    /// Challenge generation failed.
    #[error(transparent)]
    Challenge(#[from] ChallengeError),
    /// Response computation failed for some challenge.
    #[error(transparent)]
    Response(#[from] ResponseError),
    /// Merkle aggregation failed (empty challenge set — unreachable given
    /// the soundness-range check, but propagated rather than unwrapped).
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// Key generation or signing failed.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// The randomness source failed.
    #[error(transparent)]
    Randomness(#[from] RandomnessError),
}

/// Build a proof for `psi`, binding it to `identifier` under `key` and
/// `signer`, with `soundness_bits` independent challenges.
///
/// `key` is the symmetric authentication key folded into every commitment
/// and response hash, and into the proof's keyed-MAC binding field; `signer`
/// provides the post-quantum signature over the canonical proof bytes.
pub struct Prover<'a> {
    signer: &'a SignatureScheme,
    rng: &'a dyn CsRng,
}

impl<'a> Prover<'a> {
    /// Build a prover bound to a signing key and randomness source.
    pub fn new(signer: &'a SignatureScheme, rng: &'a dyn CsRng) -> Self {
        Self { signer, rng }
    }

    /// Prove knowledge of `psi` under `identifier` and `key`, with
    /// `soundness_bits` independent challenges.
    pub fn prove(
        &self,
        psi: &StateVector,
        identifier: &str,
        key: &[u8],
        soundness_bits: u32,
    ) -> Result<SecureProof, ProveError> {
        if !(MIN_SOUNDNESS..=MAX_SOUNDNESS).contains(&soundness_bits) {
            return Err(ProveError::SoundnessOutOfRange(soundness_bits));
        }
        debug!(dimension = psi.dim(), soundness_bits, "prove: start");

        let commitment = commitment::commit(psi, identifier, key, self.rng)?;
        let challenges = challenge::generate_challenges(soundness_bits, psi.dim() as u32, self.rng)?;
        let responses = response::respond_many(psi, &challenges, key)?;
        let root = merkle::merkle_root(&responses)?;

        let dimension = psi.dim() as u32;
        let metadata = SecureMetadata::new(dimension);
        let timestamp = metadata.timestamp.clone();

        let mut proof = SecureProof {
            quantum_dimensions: dimension,
            commitment_hash_prefix: hex::encode(commitment.published_prefix()),
            challenge_responses: responses,
            merkle_root: hex::encode(root),
            metadata,
            identifier: identifier.to_string(),
            signature: String::new(),
            key_binding_mac: String::new(),
            timestamp,
        };

        let mac = keyed_mac(key, &proof.canonical_bytes());
        proof.key_binding_mac = hex::encode(mac);

        let signing_bytes = proof.canonical_bytes();
        let signature = signature::sign(self.signer, &signing_bytes);
        proof.signature = hex::encode(signature);

        debug!(identifier, "prove: done");
        Ok(proof)
    }
}

/// Outcome of verifying a proof: always a plain boolean at the public
/// boundary, but internally tracked per sub-check for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VerifyOutcome {
    signature_ok: bool,
    merkle_ok: bool,
    responses_well_formed: bool,
    metadata_ok: bool,
    mac_ok: bool,
}

impl VerifyOutcome {
    fn all_pass(&self) -> bool {
        self.signature_ok && self.merkle_ok && self.responses_well_formed && self.metadata_ok && self.mac_ok
    }
}

/// Verifies proofs against a known public key and context.
pub struct Verifier<'a> {
    public_key: &'a [u8],
    context: &'a [u8],
}

impl<'a> Verifier<'a> {
    /// Build a verifier bound to a prover's public key and signing context.
    pub fn new(public_key: &'a [u8], context: &'a [u8]) -> Self {
        Self { public_key, context }
    }

    /// Verify `proof` under the symmetric `key`.
    ///
    /// Returns `true` iff the signature verifies, the Merkle root matches,
    /// every response is structurally well-formed, the metadata bounds are
    /// sane, and the keyed MAC matches `key`. Every sub-check always runs;
    /// no error kind is surfaced, by design (see module docs).
    pub fn verify(&self, proof: &SecureProof, key: &[u8]) -> bool {
        let mut signing_bytes = proof.clone();
        signing_bytes.signature = String::new();
        let canonical = signing_bytes.canonical_bytes();

        let signature_ok = hex::decode(&proof.signature)
            .map(|sig| signature::verify(self.public_key, self.context, &canonical, &sig))
            .unwrap_or(false);

        let merkle_ok = merkle::merkle_root(&proof.challenge_responses)
            .map(|root| hex::encode(root) == proof.merkle_root)
            .unwrap_or(false);

        let responses_well_formed = proof
            .challenge_responses
            .iter()
            .all(response_well_formed);

        let metadata_ok = metadata_in_bounds(&proof.metadata);

        let mut mac_signing_bytes = proof.clone();
        mac_signing_bytes.signature = String::new();
        mac_signing_bytes.key_binding_mac = String::new();
        let mac_preimage = mac_signing_bytes.canonical_bytes();
        let expected_mac = keyed_mac(key, &mac_preimage);
        let mac_ok = hex::decode(&proof.key_binding_mac)
            .map(|mac| mac.as_slice() == expected_mac.as_slice())
            .unwrap_or(false);

        let outcome = VerifyOutcome { signature_ok, merkle_ok, responses_well_formed, metadata_ok, mac_ok };
        debug!(
            signature_ok,
            merkle_ok, responses_well_formed, metadata_ok, mac_ok, "verify: sub-check results"
        );
        outcome.all_pass()
    }
}

fn response_well_formed(r: &ChallengeResponse) -> bool {
    matches!(r.basis, Basis::Z | Basis::X)
        && hex::decode(&r.response_hash).map(|b| b.len() >= 4).unwrap_or(false)
        && hex::decode(&r.commitment_hash).map(|b| b.len() >= 4).unwrap_or(false)
        && hex::decode(&r.proof_hash).map(|b| b.len() >= 4).unwrap_or(false)
}

fn metadata_in_bounds(m: &SecureMetadata) -> bool {
    let dim_ok = (1..=MAX_DIMENSION).contains(&m.dimension);
    let entropy_cap = (m.dimension as f64).log2();
    let entropy_ok = m.entropy_upper_bound >= 0.0 && m.entropy_upper_bound <= entropy_cap + 1e-9;
    let coherence_ok = m.coherence_upper_bound <= m.dimension;
    let security_ok = (64..=512).contains(&m.security_level);
    dim_ok && entropy_ok && coherence_ok && security_ok
}

/// BLAKE3 keyed hash binding `key` to `message`, restoring symmetric-key
/// binding at `verify` time (the signature alone only binds to a public
/// key, which a verifier may hold for a prover whose `key` it does not
/// actually share — see crate-level design notes on this deliberate
/// addition).
fn keyed_mac(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut key32 = [0u8; 32];
    let digest = blake3::hash(key);
    key32.copy_from_slice(digest.as_bytes());
    *blake3::keyed_hash(&key32, message).as_bytes()
}
