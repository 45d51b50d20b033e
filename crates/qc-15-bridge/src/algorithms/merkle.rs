//! # Merkle Proof Verification
//!
//! Sorted-pair Merkle proofs: each step hashes `min(current, sibling)`
//! followed by `max(current, sibling)`, comparing digests as big-endian
//! integers. Paths therefore carry no left/right metadata.

use crate::domain::Hash;
use sha2::{Digest, Sha256};

/// Hash two nodes in canonical (sorted) order.
pub fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(low);
    hasher.update(high);
    hasher.finalize().into()
}

/// Fold a sibling path into a root, starting at `leaf`.
pub fn fold_path(leaf: &Hash, sibling_path: &[Hash]) -> Hash {
    sibling_path
        .iter()
        .fold(*leaf, |current, sibling| hash_sorted_pair(&current, sibling))
}

/// Verify that `leaf` is included under `root`.
///
/// An empty path verifies only if `leaf == root`. Pure; safe to call
/// concurrently and repeatedly.
///
/// # Time Complexity: O(path length)
pub fn verify_merkle_proof(leaf: &Hash, sibling_path: &[Hash], root: &Hash) -> bool {
    fold_path(leaf, sibling_path) == *root
}

/// Build a sorted-pair Merkle root. The last node of an odd level is paired
/// with itself.
pub fn compute_merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut level: Vec<Hash> = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Sibling path for `leaves[index]`, or `None` if out of range.
pub fn build_merkle_proof(leaves: &[Hash], index: usize) -> Option<Vec<Hash>> {
    if index >= leaves.len() {
        return None;
    }

    let mut proof = Vec::new();
    let mut level: Vec<Hash> = leaves.to_vec();
    let mut index = index;

    while level.len() > 1 {
        let sibling_index = index ^ 1;
        let sibling = level.get(sibling_index).unwrap_or(&level[index]);
        proof.push(*sibling);

        level = next_level(&level);
        index /= 2;
    }

    Some(proof)
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|chunk| {
            let left = &chunk[0];
            let right = chunk.get(1).unwrap_or(left);
            hash_sorted_pair(left, right)
        })
        .collect()
}
