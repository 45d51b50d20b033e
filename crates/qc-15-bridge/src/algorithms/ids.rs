//! # Deterministic Identifiers
//!
//! Record ids are SHA-256 over their creation inputs plus an explicit
//! monotonic nonce. The nonce is a parameter, so ids are reproducible.
//! Each derivation is domain-separated by a tag.

use crate::domain::{Address, Amount, AssetId, ChainId, Hash};
use sha2::{Digest, Sha256};

const LOCK_TAG: &[u8] = b"qc15/lock";
const BURN_TAG: &[u8] = b"qc15/burn";
const HTLC_TAG: &[u8] = b"qc15/htlc";
const PROOF_TAG: &[u8] = b"qc15/proof";
const RELEASE_TAG: &[u8] = b"qc15/release";

/// Lock id from sender, amount, target chain, timestamp and nonce.
pub fn derive_lock_id(
    sender: &Address,
    amount: Amount,
    target_chain: ChainId,
    timestamp: u64,
    nonce: u64,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(LOCK_TAG);
    hasher.update(sender);
    hasher.update(amount.to_be_bytes());
    hasher.update(target_chain.to_be_bytes());
    hasher.update(timestamp.to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.finalize().into()
}

/// Burn id, same inputs as a lock id under a different tag.
pub fn derive_burn_id(
    sender: &Address,
    amount: Amount,
    target_chain: ChainId,
    timestamp: u64,
    nonce: u64,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(BURN_TAG);
    hasher.update(sender);
    hasher.update(amount.to_be_bytes());
    hasher.update(target_chain.to_be_bytes());
    hasher.update(timestamp.to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.finalize().into()
}

/// HTLC id from sender, recipient, hash lock, timestamp and nonce.
pub fn derive_htlc_id(
    sender: &Address,
    recipient: &Address,
    hash_lock: &Hash,
    timestamp: u64,
    nonce: u64,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(HTLC_TAG);
    hasher.update(sender);
    hasher.update(recipient);
    hasher.update(hash_lock);
    hasher.update(timestamp.to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.finalize().into()
}

/// Replay identifier of a bridge proof.
///
/// Covers only where the event happened. The payload is bound by the
/// light client through [`release_commitment`].
pub fn proof_hash(
    source_chain: ChainId,
    lock_id: &Hash,
    tx_hash: &Hash,
    block_hash: &Hash,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(PROOF_TAG);
    hasher.update(source_chain.to_be_bytes());
    hasher.update(lock_id);
    hasher.update(tx_hash);
    hasher.update(block_hash);
    hasher.finalize().into()
}

/// Commitment to what a proof claims to release.
///
/// A source-chain receipt emitted by a lock or burn commits to this value;
/// the receipt check fails for any other lock id, amount, recipient, asset
/// or route.
pub fn release_commitment(
    source_chain: ChainId,
    target_chain: ChainId,
    lock_id: &Hash,
    amount: Amount,
    recipient: &Address,
    asset: &AssetId,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(RELEASE_TAG);
    hasher.update(source_chain.to_be_bytes());
    hasher.update(target_chain.to_be_bytes());
    hasher.update(lock_id);
    hasher.update(amount.to_be_bytes());
    hasher.update(recipient);
    hasher.update(asset);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_id_reproducible() {
        let a = derive_lock_id(&[1u8; 20], 100, ChainId(2), 1000, 0);
        let b = derive_lock_id(&[1u8; 20], 100, ChainId(2), 1000, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonce_separates_identical_locks() {
        let a = derive_lock_id(&[1u8; 20], 100, ChainId(2), 1000, 0);
        let b = derive_lock_id(&[1u8; 20], 100, ChainId(2), 1000, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_lock_and_burn_ids_differ() {
        let lock = derive_lock_id(&[1u8; 20], 100, ChainId(2), 1000, 0);
        let burn = derive_burn_id(&[1u8; 20], 100, ChainId(2), 1000, 0);
        assert_ne!(lock, burn);
    }

    #[test]
    fn test_htlc_id_depends_on_hash_lock() {
        let a = derive_htlc_id(&[1u8; 20], &[2u8; 20], &[3u8; 32], 1000, 0);
        let b = derive_htlc_id(&[1u8; 20], &[2u8; 20], &[4u8; 32], 1000, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_proof_hash_depends_on_source_chain() {
        let a = proof_hash(ChainId(1), &[1u8; 32], &[2u8; 32], &[3u8; 32]);
        let b = proof_hash(ChainId(2), &[1u8; 32], &[2u8; 32], &[3u8; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_release_commitment_binds_payload() {
        let commit = |amount: Amount, recipient: Address, asset: AssetId| {
            release_commitment(ChainId(2), ChainId(1), &[1u8; 32], amount, &recipient, &asset)
        };
        let honest = commit(100, [5u8; 20], [6u8; 20]);
        assert_eq!(honest, commit(100, [5u8; 20], [6u8; 20]));
        assert_ne!(honest, commit(101, [5u8; 20], [6u8; 20]));
        assert_ne!(honest, commit(100, [7u8; 20], [6u8; 20]));
        assert_ne!(honest, commit(100, [5u8; 20], [8u8; 20]));
        assert_ne!(
            honest,
            release_commitment(ChainId(2), ChainId(3), &[1u8; 32], 100, &[5u8; 20], &[6u8; 20])
        );
    }
}
