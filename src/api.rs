//! Ergonomic builder-style entry points over `scheduler::{Prover,
//! Verifier}`, in the spirit of the teacher's own `ProverBuilder`/
//! `VerifierBuilder` wrappers: construct once, call `prove`/`verify` many
//! times, with no file-path or config-surface parameters anywhere (those
//! collaborators are out of scope here — see crate docs).

#![forbid(unsafe_code)]

use crate::keys::{KeyError, SignatureScheme};
use crate::randomness::{CsRng, HybridRng, RandomnessError};
use crate::scheduler::{ProveError, Prover, Verifier};
use crate::vector::StateVector;
use crate::SecureProof;

/// Builds a [`Prover`] bound to a generated signing key and a randomness
/// source, hiding the wiring between C7 and C9.
pub struct ProverBuilder {
    signer: SignatureScheme,
    rng: Box<dyn CsRng>,
}

impl ProverBuilder {
    /// Start building a prover bound to `context` (folded into every
    /// signature). Generates a fresh keypair and a [`HybridRng`] randomness
    /// source.
    pub fn new(context: impl Into<Vec<u8>>) -> Result<Self, BuildError> {
        let signer = SignatureScheme::generate(context)?;
        let rng = HybridRng::new()?;
        Ok(Self { signer, rng: Box::new(rng) })
    }

    /// Use an explicit randomness source instead of the default
    /// [`HybridRng`].
    pub fn with_rng(mut self, rng: Box<dyn CsRng>) -> Self {
        self.rng = rng;
        self
    }

    /// This prover's public key, for distribution to verifiers.
    pub fn public_key(&self) -> &[u8] {
        self.signer.public_key()
    }

    /// This prover's signing context.
    pub fn context(&self) -> &[u8] {
        self.signer.context()
    }

    /// Finish building. Borrows the builder for the lifetime of the
    /// returned [`Prover`], matching the teacher's `build()` convention.
    pub fn build(&self) -> Prover<'_> {
        Prover::new(&self.signer, self.rng.as_ref())
    }
}

/// Builds a [`Verifier`] bound to a known public key and context.
pub struct VerifierBuilder<'a> {
    public_key: &'a [u8],
    context: &'a [u8],
}

impl<'a> VerifierBuilder<'a> {
    /// Start building a verifier for proofs signed under `public_key` and
    /// `context`.
    pub fn new(public_key: &'a [u8], context: &'a [u8]) -> Self {
        Self { public_key, context }
    }

    /// Finish building.
    pub fn build(&self) -> Verifier<'a> {
        Verifier::new(self.public_key, self.context)
    }
}

/// Errors raised while assembling a [`ProverBuilder`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Key generation failed.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Randomness-source initialization failed.
    #[error(transparent)]
    Randomness(#[from] RandomnessError),
}

/// One-shot helper: prove knowledge of bytes derived into a dimension-`d`
/// state vector, without constructing a [`ProverBuilder`] separately.
/// Returns the proof alongside the public key and context a verifier will
/// need.
pub fn prove_from_bytes(
    data: &[u8],
    d: usize,
    identifier: &str,
    key: &[u8],
    soundness_bits: u32,
    context: impl Into<Vec<u8>>,
) -> Result<(SecureProof, Vec<u8>, Vec<u8>), OneShotError> {
    let psi = StateVector::from_bytes(data, d)?;
    let builder = ProverBuilder::new(context)?;
    let public_key = builder.public_key().to_vec();
    let ctx = builder.context().to_vec();
    let proof = builder.build().prove(&psi, identifier, key, soundness_bits)?;
    Ok((proof, public_key, ctx))
}

/// One-shot helper mirroring [`prove_from_bytes`] for an already-normalized
/// [`StateVector`].
pub fn prove_from_vector(
    psi: &StateVector,
    identifier: &str,
    key: &[u8],
    soundness_bits: u32,
    context: impl Into<Vec<u8>>,
) -> Result<(SecureProof, Vec<u8>, Vec<u8>), OneShotError> {
    let builder = ProverBuilder::new(context)?;
    let public_key = builder.public_key().to_vec();
    let ctx = builder.context().to_vec();
    let proof = builder.build().prove(psi, identifier, key, soundness_bits)?;
    Ok((proof, public_key, ctx))
}

/// One-shot verification helper.
pub fn verify(proof: &SecureProof, key: &[u8], public_key: &[u8], context: &[u8]) -> bool {
    VerifierBuilder::new(public_key, context).build().verify(proof, key)
}

/// Errors raised by the one-shot convenience functions above.
#[derive(Debug, thiserror::Error)]
pub enum OneShotError {
    /// Vector construction failed.
    #[error(transparent)]
    Vector(#[from] crate::vector::VectorError),
    /// Builder assembly failed.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Proving failed.
    #[error(transparent)]
    Prove(#[from] ProveError),
}

/// Introspection helper estimating a proof's peak transient memory, in
/// the spirit of the teacher's `Tuning::estimate_peak_memory`: a small
/// multiple of `k` challenge responses plus one `O(d)` Hadamard
/// intermediate.
pub struct Tuning {
    /// Vector dimension.
    pub dimension: u32,
    /// Soundness parameter (challenge count).
    pub soundness_bits: u32,
}

impl Tuning {
    /// Construct a tuning estimator for a given dimension and soundness.
    pub fn new(dimension: u32, soundness_bits: u32) -> Self {
        Self { dimension, soundness_bits }
    }

    /// Rough upper bound, in bytes, on transient memory during `prove`:
    /// one `O(d)` complex Hadamard image (16 bytes/amplitude) plus `k`
    /// challenge responses (~96 bytes each: three 8-byte hex hashes plus
    /// overhead).
    pub fn estimate_peak_memory(&self) -> usize {
        let hadamard_bytes = self.dimension as usize * 16;
        let responses_bytes = self.soundness_bits as usize * 96;
        hadamard_bytes + responses_bytes
    }
}
