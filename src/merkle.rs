//! Merkle aggregator (C6): binary Merkle tree over per-challenge
//! responses.
//!
//! Leaves are BLAKE3 hashes of a length-delimited canonical encoding of
//! each [`ChallengeResponse`], mirroring the length-prefixed absorb
//! discipline this crate's transcript-style hashing uses elsewhere. Odd
//! levels duplicate the last node rather than padding with zeros, so an
//! attacker cannot grow the response set with free zero-leaves.

#![forbid(unsafe_code)]

use crate::response::ChallengeResponse;

/// Errors raised while aggregating responses into a Merkle tree.
#[derive(Debug, thiserror::Error)]
pub enum MerkleError {
    /// The response set was empty; a root requires at least one leaf.
    #[error("cannot build a Merkle tree over zero responses")]
    Empty,
}

/// Length-delimited canonical encoding of a single response, used as the
/// leaf pre-image: `index (BE u32) || basis tag || len-prefixed hex
/// fields`.
fn canonical_leaf_preimage(response: &ChallengeResponse) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&response.challenge_index.to_be_bytes());
    out.push(response.basis.tag());
    for field in [&response.response_hash, &response.commitment_hash, &response.proof_hash] {
        let bytes = field.as_bytes();
        out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        out.extend_from_slice(bytes);
    }
    out
}

fn leaf_hash(response: &ChallengeResponse) -> [u8; 32] {
    *blake3::hash(&canonical_leaf_preimage(response)).as_bytes()
}

fn parent_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut h = blake3::Hasher::new();
    h.update(left);
    h.update(right);
    *h.finalize().as_bytes()
}

/// A Merkle tree built over a proof's challenge responses, retaining every
/// level so inclusion proofs can be served without recomputation.
pub struct MerkleTree {
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build a tree over `responses`, in array order. The order is
    /// authoritative: reordering responses changes the root.
    pub fn build(responses: &[ChallengeResponse]) -> Result<Self, MerkleError> {
        if responses.is_empty() {
            return Err(MerkleError::Empty);
        }
        let mut level: Vec<[u8; 32]> = responses.iter().map(leaf_hash).collect();
        let mut levels = vec![level.clone()];

        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            for pair in level.chunks(2) {
                let parent = if pair.len() == 2 {
                    parent_hash(&pair[0], &pair[1])
                } else {
                    parent_hash(&pair[0], &pair[0])
                };
                next.push(parent);
            }
            levels.push(next.clone());
            level = next;
        }

        Ok(Self { levels })
    }

    /// The 32-byte root.
    pub fn root(&self) -> [u8; 32] {
        self.levels.last().expect("at least one level always present")[0]
    }

    /// An inclusion proof for the leaf at `index`: sibling hashes from leaf
    /// to root, plus which side each sibling sits on. Not required by the
    /// verifier, but cheap to provide since the tree already exists.
    pub fn proof_for(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.levels[0].len() {
            return None;
        }
        let mut siblings = Vec::new();
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_idx = if idx % 2 == 0 {
                (idx + 1).min(level.len() - 1)
            } else {
                idx - 1
            };
            let is_right = idx % 2 == 0;
            siblings.push((level[sibling_idx], is_right));
            idx /= 2;
        }
        Some(MerkleProof { leaf_index: index, siblings })
    }
}

/// An inclusion proof: the path of sibling hashes from a leaf to the root.
#[derive(Debug, Clone)]
pub struct MerkleProof {
    leaf_index: usize,
    /// `(sibling_hash, sibling_is_on_the_right)` pairs, leaf to root.
    siblings: Vec<([u8; 32], bool)>,
}

impl MerkleProof {
    /// Recompute the root implied by this proof starting from `leaf`.
    pub fn recompute_root(&self, leaf: [u8; 32]) -> [u8; 32] {
        let mut acc = leaf;
        for (sibling, is_right) in &self.siblings {
            acc = if *is_right { parent_hash(&acc, sibling) } else { parent_hash(sibling, &acc) };
        }
        acc
    }

    /// The leaf index this proof was built for.
    pub fn leaf_index(&self) -> usize {
        self.leaf_index
    }
}

/// Convenience: build a tree over `responses` and return just the root.
pub fn merkle_root(responses: &[ChallengeResponse]) -> Result<[u8; 32], MerkleError> {
    Ok(MerkleTree::build(responses)?.root())
}
