//! Signature wrapper (C7): the crate's sign/verify surface over a
//! [`crate::keys::SignatureScheme`].
//!
//! Key generation, context binding, and zeroization all live in
//! `keys.rs`, since they are the signing key's lifecycle rather than the
//! per-message sign/verify operation; this module is the thin operation
//! surface `scheduler.rs` calls into, kept separate so the two concerns
//! (key lifecycle vs. signing operation) stay independently testable.

#![forbid(unsafe_code)]

use crate::keys::SignatureScheme;

/// Sign `message` under `scheme`'s bound context.
pub fn sign(scheme: &SignatureScheme, message: &[u8]) -> Vec<u8> {
    scheme.sign(message)
}

/// Verify a signature produced by [`sign`].
pub fn verify(public_key: &[u8], context: &[u8], message: &[u8], signature: &[u8]) -> bool {
    crate::keys::verify(public_key, context, message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let scheme = SignatureScheme::generate(b"signature-wrapper-test".to_vec()).unwrap();
        let msg = b"wrapper round trip";
        let sig = sign(&scheme, msg);
        assert!(verify(scheme.public_key(), scheme.context(), msg, &sig));
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let scheme = SignatureScheme::generate(b"signature-wrapper-test-2".to_vec()).unwrap();
        let msg = b"tamper me";
        let mut sig = sign(&scheme, msg);
        let last = sig.len() - 1;
        sig[last] ^= 0xFF;
        assert!(!verify(scheme.public_key(), scheme.context(), msg, &sig));
    }
}
