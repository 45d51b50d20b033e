//! # Preimage Generation and Verification
//!
//! SHA-256 hash locks for HTLC swaps.

use crate::domain::{Hash, Secret, SecureSecret};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a random preimage for a new swap.
pub fn generate_preimage() -> SecureSecret {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    SecureSecret::new(bytes)
}

/// Hash lock committing to `preimage`.
pub fn create_hash_lock(preimage: &Secret) -> Hash {
    Sha256::digest(preimage).into()
}

/// Check that `preimage` opens `hash_lock`.
pub fn verify_preimage(preimage: &Secret, hash_lock: &Hash) -> bool {
    create_hash_lock(preimage) == *hash_lock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_preimage_unique() {
        let a = generate_preimage();
        let b = generate_preimage();
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn test_hash_lock_deterministic() {
        let preimage = [0xABu8; 32];
        assert_eq!(create_hash_lock(&preimage), create_hash_lock(&preimage));
        assert_ne!(create_hash_lock(&preimage), create_hash_lock(&[0xCDu8; 32]));
    }

    #[test]
    fn test_verify_preimage() {
        let preimage = generate_preimage();
        let hash_lock = create_hash_lock(preimage.as_bytes());
        assert!(verify_preimage(preimage.as_bytes(), &hash_lock));
        assert!(!verify_preimage(&[0u8; 32], &hash_lock));
    }
}
