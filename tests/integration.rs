//! Crate-level integration suite covering the protocol's end-to-end
//! invariants and the concrete prove/verify scenarios.

use qsvzkp::api::{prove_from_bytes, prove_from_vector, verify, ProverBuilder, VerifierBuilder};
use qsvzkp::vector::{Complex64, StateVector, VectorError};
use qsvzkp::{ChallengeResponse, SecureProof};

fn norm_sqr_total(v: &[Complex64]) -> f64 {
    v.iter().map(Complex64::norm_sqr).sum()
}

// Invariant 1: bytes_to_state is deterministic and unit-norm.
#[test]
fn invariant_bytes_to_state_deterministic_and_unit_norm() {
    for d in [2usize, 4, 8, 16, 32] {
        for data in [&b"alpha"[..], &b"a longer secret string"[..]] {
            let a = StateVector::from_bytes(data, d).unwrap();
            let b = StateVector::from_bytes(data, d).unwrap();
            assert_eq!(a, b);
            assert!((norm_sqr_total(a.amplitudes()) - 1.0).abs() < 1e-10);
        }
    }
}

// Invariant 2: hadamard preserves unit norm.
#[test]
fn invariant_hadamard_preserves_unit_norm() {
    for d in [2usize, 4, 8, 16, 32, 64] {
        let psi = StateVector::from_bytes(b"hadamard invariant", d).unwrap();
        let transformed = psi.hadamard().unwrap();
        assert!((norm_sqr_total(transformed.amplitudes()) - 1.0).abs() < 1e-10);
    }
}

// Invariant 3: verify(prove(psi, id, key, k), key) == true for valid inputs.
#[test]
fn invariant_valid_proof_verifies() {
    let key = [0x11u8; 32];
    let (proof, pk, ctx) =
        prove_from_bytes(b"invariant three", 8, "prover-a", &key, 64, b"ctx".to_vec()).unwrap();
    assert!(verify(&proof, &key, &pk, &ctx));
}

// Invariant 4: flipping any single byte of commitment_hash_prefix,
// merkle_root, a challenge_response field, or the signature flips the
// verdict to false.
#[test]
fn invariant_single_byte_tamper_is_detected() {
    let key = [0x22u8; 32];
    let (proof, pk, ctx) =
        prove_from_bytes(b"invariant four", 8, "prover-b", &key, 64, b"ctx".to_vec()).unwrap();
    assert!(verify(&proof, &key, &pk, &ctx));

    let mut p1 = proof.clone();
    p1.commitment_hash_prefix = flip_last_hex_byte(&p1.commitment_hash_prefix);
    assert!(!verify(&p1, &key, &pk, &ctx));

    let mut p2 = proof.clone();
    p2.merkle_root = flip_last_hex_byte(&p2.merkle_root);
    assert!(!verify(&p2, &key, &pk, &ctx));

    let mut p3 = proof.clone();
    p3.challenge_responses[0].response_hash = flip_last_hex_byte(&p3.challenge_responses[0].response_hash);
    assert!(!verify(&p3, &key, &pk, &ctx));

    let mut p4 = proof.clone();
    p4.signature = flip_last_hex_byte(&p4.signature);
    assert!(!verify(&p4, &key, &pk, &ctx));
}

fn flip_last_hex_byte(hex_str: &str) -> String {
    let mut bytes = hex::decode(hex_str).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    hex::encode(bytes)
}

// Invariant 5: a proof produced under key k1 must not verify under a
// different symmetric key k2.
#[test]
fn invariant_wrong_symmetric_key_rejected() {
    let (proof, pk, ctx) =
        prove_from_bytes(b"invariant five", 8, "prover-c", &[0x33u8; 32], 64, b"ctx".to_vec()).unwrap();
    assert!(!verify(&proof, &[0x44u8; 32], &pk, &ctx));
}

// Invariant 6: commitment_hash_prefix is injective over distinct (psi,
// nonce) pairs with overwhelming probability.
#[test]
fn invariant_commitment_prefix_has_no_collisions_over_many_trials() {
    let key = [0x55u8; 32];
    let mut seen = std::collections::HashSet::new();
    for i in 0..2000u32 {
        let data = format!("trial-{i}");
        let (proof, _, _) =
            prove_from_bytes(data.as_bytes(), 8, "prover-d", &key, 32, b"ctx".to_vec()).unwrap();
        assert!(seen.insert(proof.commitment_hash_prefix), "collision at trial {i}");
    }
}

// Invariant 7: challenge-response array length equals the soundness
// parameter.
#[test]
fn invariant_response_count_matches_soundness() {
    for k in [32u32, 80, 150, 256] {
        let (proof, _, _) =
            prove_from_bytes(b"invariant seven", 8, "prover-e", &[0x66u8; 32], k, b"ctx".to_vec()).unwrap();
        assert_eq!(proof.challenge_responses.len(), k as usize);
    }
}

// Zero-knowledge empirical test: decimal renderings of amplitudes with >=3
// significant digits never appear verbatim in the serialized proof.
#[test]
fn zero_knowledge_empirical_amplitudes_not_leaked() {
    let key = [0x77u8; 32];
    let psi = StateVector::from_bytes(b"zk empirical test vector", 8).unwrap();

    let decimal_needles: Vec<String> = psi
        .amplitudes()
        .iter()
        .flat_map(|c| vec![format!("{:.3}", c.re), format!("{:.3}", c.im)])
        .filter(|s| s.trim_start_matches('-').len() >= 4) // at least 3 sig digits + '.'
        .collect();

    for trial in 0..200 {
        let id = format!("zk-trial-{trial}");
        let (proof, _, _) = prove_from_vector(&psi, &id, &key, 32, b"ctx".to_vec()).unwrap();
        let serialized = serde_json::to_string(&proof).unwrap();
        for needle in &decimal_needles {
            assert!(!serialized.contains(needle.as_str()), "leaked {needle} in trial {trial}");
        }
    }
}

// Round-trip: serialize -> deserialize -> serialize is byte-identical.
#[test]
fn round_trip_serialize_deserialize_is_stable() {
    let key = [0x88u8; 32];
    let (proof, _, _) =
        prove_from_bytes(b"round trip test", 8, "prover-f", &key, 32, b"ctx".to_vec()).unwrap();

    let once = serde_json::to_string(&proof).unwrap();
    let back: SecureProof = serde_json::from_str(&once).unwrap();
    let twice = serde_json::to_string(&back).unwrap();
    assert_eq!(once, twice);

    assert_eq!(proof.canonical_bytes(), back.canonical_bytes());
}

// S1 — Smallest valid proof.
#[test]
fn scenario_s1_smallest_valid_proof() {
    let psi = StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0), Complex64::ZERO]).unwrap();
    let key = [0x11u8; 32];
    let (proof, pk, ctx) = prove_from_vector(&psi, "s1", &key, 32, b"s1-ctx".to_vec()).unwrap();

    assert!(verify(&proof, &key, &pk, &ctx));
    assert_eq!(proof.challenge_responses.len(), 32);
    assert_eq!(proof.metadata.dimension, 2);
    assert!((proof.metadata.entropy_upper_bound - 1.0).abs() < 1e-12);
}

// S2 — Byte-derived vector: two independent proofs differ in commitment
// prefix (fresh nonces) but both verify.
#[test]
fn scenario_s2_byte_derived_vector_independent_nonces() {
    let key = [0x22u8; 32];
    let (p1, pk1, ctx1) =
        prove_from_bytes(b"hello", 8, "s2", &key, 80, b"s2-ctx".to_vec()).unwrap();
    let (p2, pk2, ctx2) =
        prove_from_bytes(b"hello", 8, "s2", &key, 80, b"s2-ctx".to_vec()).unwrap();

    assert_ne!(p1.commitment_hash_prefix, p2.commitment_hash_prefix);
    assert!(verify(&p1, &key, &pk1, &ctx1));
    assert!(verify(&p2, &key, &pk2, &ctx2));
}

// S3 — Tamper detection: flip the last byte of merkle_root.
#[test]
fn scenario_s3_tamper_detection() {
    let key = [0x33u8; 32];
    let (mut proof, pk, ctx) =
        prove_from_bytes(b"tamper scenario", 8, "s3", &key, 32, b"s3-ctx".to_vec()).unwrap();
    proof.merkle_root = flip_last_hex_byte(&proof.merkle_root);
    assert!(!verify(&proof, &key, &pk, &ctx));
}

// S4 — Wrong key rejection.
#[test]
fn scenario_s4_wrong_key_rejection() {
    let (proof, pk, ctx) =
        prove_from_bytes(b"wrong key scenario", 8, "s4", &[0x33u8; 32], 32, b"s4-ctx".to_vec()).unwrap();
    assert!(!verify(&proof, &[0x44u8; 32], &pk, &ctx));
}

// S5 — Empty input rejection.
#[test]
fn scenario_s5_empty_input_rejection() {
    let err = StateVector::from_bytes(b"", 8).unwrap_err();
    assert!(matches!(err, VectorError::EmptyBytes));

    let result = prove_from_bytes(b"", 8, "s5", &[0u8; 32], 80, b"s5-ctx".to_vec());
    assert!(result.is_err());
}

// S6 — Soundness bounds.
#[test]
fn scenario_s6_soundness_bounds() {
    let key = [0x55u8; 32];
    assert!(prove_from_bytes(b"soundness", 8, "s6", &key, 16, b"s6-ctx".to_vec()).is_err());
    assert!(prove_from_bytes(b"soundness", 8, "s6", &key, 512, b"s6-ctx".to_vec()).is_err());

    let (proof, _, _) =
        prove_from_bytes(b"soundness", 8, "s6", &key, 256, b"s6-ctx".to_vec()).unwrap();
    assert_eq!(proof.challenge_responses.len(), 256);
}

// Builder-style API wiring, exercised end to end.
#[test]
fn builder_api_round_trips() {
    let builder = ProverBuilder::new(b"builder-ctx".to_vec()).unwrap();
    let psi = StateVector::from_bytes(b"builder test", 8).unwrap();
    let key = [0x99u8; 32];

    let proof: SecureProof = builder.build().prove(&psi, "builder-id", &key, 32).unwrap();
    let verifier = VerifierBuilder::new(builder.public_key(), builder.context()).build();
    assert!(verifier.verify(&proof, &key));
}

// Every response carries a recognized basis and well-formed hex fields.
#[test]
fn every_response_is_well_formed() {
    let (proof, _, _) =
        prove_from_bytes(b"well formed check", 16, "wf", &[0xAAu8; 32], 64, b"ctx".to_vec()).unwrap();
    for r in &proof.challenge_responses {
        check_well_formed(r);
    }
}

fn check_well_formed(r: &ChallengeResponse) {
    assert!(hex::decode(&r.response_hash).unwrap().len() >= 4);
    assert!(hex::decode(&r.commitment_hash).unwrap().len() >= 4);
    assert!(hex::decode(&r.proof_hash).unwrap().len() >= 4);
}
