//! # Replay Guard
//!
//! Consumed proof hashes, foreign lock keys, revealed hash locks and
//! authorization hashes. Nothing is ever pruned: forgetting a consumed proof
//! would let it release value again.

use super::errors::{BridgeError, BridgeResult};
use super::value_objects::{ChainId, Hash};
use std::collections::HashSet;

/// Replay protection state.
#[derive(Clone, Debug, Default)]
pub struct ReplayGuard {
    proofs: HashSet<Hash>,
    lock_keys: HashSet<(ChainId, Hash)>,
    hash_locks: HashSet<Hash>,
    authorizations: HashSet<Hash>,
}

impl ReplayGuard {
    /// Empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a proof hash was consumed.
    pub fn is_proof_used(&self, proof_hash: &Hash) -> bool {
        self.proofs.contains(proof_hash)
    }

    /// Whether a foreign lock was already released.
    pub fn is_lock_released(&self, chain: ChainId, lock_id: &Hash) -> bool {
        self.lock_keys.contains(&(chain, *lock_id))
    }

    /// Consume a proof and the foreign lock it releases, both or neither.
    pub fn consume_proof(
        &mut self,
        proof_hash: Hash,
        chain: ChainId,
        lock_id: Hash,
    ) -> BridgeResult<()> {
        if self.proofs.contains(&proof_hash) {
            return Err(BridgeError::ProofAlreadyUsed(proof_hash));
        }
        if self.lock_keys.contains(&(chain, lock_id)) {
            return Err(BridgeError::LockAlreadyReleased { chain, lock_id });
        }
        self.proofs.insert(proof_hash);
        self.lock_keys.insert((chain, lock_id));
        Ok(())
    }

    /// Roll back [`consume_proof`](Self::consume_proof) after a failed payout.
    pub(crate) fn release_proof(&mut self, proof_hash: &Hash, chain: ChainId, lock_id: &Hash) {
        self.proofs.remove(proof_hash);
        self.lock_keys.remove(&(chain, *lock_id));
    }

    /// Whether the preimage of `hash_lock` has been revealed.
    pub fn is_preimage_used(&self, hash_lock: &Hash) -> bool {
        self.hash_locks.contains(hash_lock)
    }

    /// Record a revealed preimage by its hash lock. Returns `true` on the
    /// first reveal.
    ///
    /// A reveal never blocks HTLCs opened before it; it only stops new ones
    /// from being created under a known preimage.
    pub fn reveal_preimage(&mut self, hash_lock: Hash) -> bool {
        self.hash_locks.insert(hash_lock)
    }

    /// Reject a hash lock whose preimage is already public.
    pub fn ensure_preimage_unrevealed(&self, hash_lock: &Hash) -> BridgeResult<()> {
        if self.hash_locks.contains(hash_lock) {
            return Err(BridgeError::PreimageAlreadyUsed(*hash_lock));
        }
        Ok(())
    }

    pub(crate) fn release_preimage(&mut self, hash_lock: &Hash) {
        self.hash_locks.remove(hash_lock);
    }

    /// Whether an authorization hash was consumed.
    pub fn is_authorization_used(&self, auth_hash: &Hash) -> bool {
        self.authorizations.contains(auth_hash)
    }

    /// Consume a payment authorization hash.
    pub fn consume_authorization(&mut self, auth_hash: Hash) -> BridgeResult<()> {
        if !self.authorizations.insert(auth_hash) {
            return Err(BridgeError::AuthorizationAlreadyUsed(auth_hash));
        }
        Ok(())
    }

    /// Number of consumed proofs.
    pub fn consumed_proof_count(&self) -> usize {
        self.proofs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_proof_once() {
        let mut guard = ReplayGuard::new();
        guard.consume_proof([1u8; 32], ChainId(1), [2u8; 32]).unwrap();
        assert!(guard.is_proof_used(&[1u8; 32]));
        assert!(guard.is_lock_released(ChainId(1), &[2u8; 32]));
        assert!(matches!(
            guard.consume_proof([1u8; 32], ChainId(1), [3u8; 32]),
            Err(BridgeError::ProofAlreadyUsed(_))
        ));
    }

    #[test]
    fn test_second_proof_for_same_lock_rejected() {
        let mut guard = ReplayGuard::new();
        guard.consume_proof([1u8; 32], ChainId(1), [2u8; 32]).unwrap();
        let err = guard
            .consume_proof([9u8; 32], ChainId(1), [2u8; 32])
            .unwrap_err();
        assert!(matches!(err, BridgeError::LockAlreadyReleased { .. }));
        // Failed consumption leaves no trace.
        assert!(!guard.is_proof_used(&[9u8; 32]));
    }

    #[test]
    fn test_same_lock_id_on_other_chain_is_distinct() {
        let mut guard = ReplayGuard::new();
        guard.consume_proof([1u8; 32], ChainId(1), [2u8; 32]).unwrap();
        assert!(guard.consume_proof([3u8; 32], ChainId(2), [2u8; 32]).is_ok());
        assert_eq!(guard.consumed_proof_count(), 2);
    }

    #[test]
    fn test_release_proof_rolls_back() {
        let mut guard = ReplayGuard::new();
        guard.consume_proof([1u8; 32], ChainId(1), [2u8; 32]).unwrap();
        guard.release_proof(&[1u8; 32], ChainId(1), &[2u8; 32]);
        assert!(!guard.is_proof_used(&[1u8; 32]));
        assert!(guard.consume_proof([1u8; 32], ChainId(1), [2u8; 32]).is_ok());
    }

    #[test]
    fn test_preimage_and_authorization() {
        let mut guard = ReplayGuard::new();
        assert!(guard.ensure_preimage_unrevealed(&[4u8; 32]).is_ok());
        assert!(guard.reveal_preimage([4u8; 32]));
        assert!(guard.is_preimage_used(&[4u8; 32]));
        assert!(!guard.reveal_preimage([4u8; 32]));
        assert!(matches!(
            guard.ensure_preimage_unrevealed(&[4u8; 32]),
            Err(BridgeError::PreimageAlreadyUsed(_))
        ));

        guard.consume_authorization([5u8; 32]).unwrap();
        assert!(guard.is_authorization_used(&[5u8; 32]));
        assert!(matches!(
            guard.consume_authorization([5u8; 32]),
            Err(BridgeError::AuthorizationAlreadyUsed(_))
        ));
    }
}
