//! Post-quantum signing key lifecycle (supports C7).
//!
//! Wraps a `pqc_dilithium` (ML-DSA-87 / Dilithium5, NIST security level 5)
//! keypair. Never touches the filesystem — callers that need persistence
//! own that concern themselves; this module only ever hands back owned
//! byte buffers.

#![forbid(unsafe_code)]

use pqc_dilithium::Keypair;
use zeroize::Zeroize;

/// Errors raised while generating or handling a signing key.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The supplied context string exceeded the binding budget.
    #[error("signing context must be at most {max} bytes, got {got}")]
    ContextTooLong {
        /// Maximum allowed context length.
        max: usize,
        /// Length actually supplied.
        got: usize,
    },
}

/// Longest context string we'll fold into a signature pre-image. `pqc_dilithium`
/// has no native context-string support, so binding happens by hashing the
/// context alongside the message rather than truncation; this cap just keeps
/// callers from passing unbounded data here by accident.
pub const MAX_CONTEXT_LEN: usize = 256;

/// An ML-DSA-87 (Dilithium5) signing key pair, bound to a fixed context.
///
/// `pqc_dilithium::Keypair`'s secret material is private to the crate that
/// defines it and is never copied out of this wrapper; the only way to use
/// it is through [`SignatureScheme::sign`]. The context string is folded
/// into every signed pre-image so that signatures produced under one
/// identifier/session cannot be replayed as if produced under another.
pub struct SignatureScheme {
    keypair: Keypair,
    context: Vec<u8>,
}

impl std::fmt::Debug for SignatureScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureScheme")
            .field("public_key", &hex::encode(self.keypair.public))
            .field("context", &String::from_utf8_lossy(&self.context))
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl SignatureScheme {
    /// Generate a fresh keypair bound to `context`.
    pub fn generate(context: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let context = context.into();
        if context.len() > MAX_CONTEXT_LEN {
            return Err(KeyError::ContextTooLong { max: MAX_CONTEXT_LEN, got: context.len() });
        }
        let keypair = Keypair::generate();
        Ok(Self { keypair, context })
    }

    /// The public key, in `pqc_dilithium`'s wire encoding.
    pub fn public_key(&self) -> &[u8] {
        &self.keypair.public
    }

    /// The context this key is bound to.
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    /// Sign `message`, folding the bound context into the pre-image first:
    /// `sig = Dilithium5.sign(BLAKE3(context || message))`.
    ///
    /// Hashing first rather than signing `context || message` directly
    /// keeps the signed pre-image a fixed 32 bytes regardless of message
    /// size, independent of any length properties of the underlying scheme.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let digest = bind_context(&self.context, message);
        self.keypair.sign(&digest).to_vec()
    }
}

/// Verify a signature produced by [`SignatureScheme::sign`] against a raw
/// public key and the same context.
pub fn verify(public_key: &[u8], context: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let digest = bind_context(context, message);
    pqc_dilithium::verify(signature, &digest, public_key).is_ok()
}

fn bind_context(context: &[u8], message: &[u8]) -> [u8; 32] {
    let mut h = blake3::Hasher::new();
    h.update(b"qsvzkp.signature.context.v1");
    h.update(&(context.len() as u64).to_le_bytes());
    h.update(context);
    h.update(message);
    *h.finalize().as_bytes()
}

impl Drop for SignatureScheme {
    fn drop(&mut self) {
        self.context.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_roundtrips() {
        let scheme = SignatureScheme::generate(b"qsvzkp-test".to_vec()).unwrap();
        let msg = b"proof pre-image bytes";
        let sig = scheme.sign(msg);
        assert!(verify(scheme.public_key(), scheme.context(), msg, &sig));
    }

    #[test]
    fn verify_rejects_wrong_context() {
        let scheme = SignatureScheme::generate(b"context-a".to_vec()).unwrap();
        let msg = b"hello";
        let sig = scheme.sign(msg);
        assert!(!verify(scheme.public_key(), b"context-b", msg, &sig));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let scheme = SignatureScheme::generate(b"ctx".to_vec()).unwrap();
        let sig = scheme.sign(b"original");
        assert!(!verify(scheme.public_key(), scheme.context(), b"tampered", &sig));
    }

    #[test]
    fn generate_rejects_oversized_context() {
        let huge = vec![0u8; MAX_CONTEXT_LEN + 1];
        assert!(matches!(SignatureScheme::generate(huge), Err(KeyError::ContextTooLong { .. })));
    }
}
