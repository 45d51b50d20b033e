//! # Algorithms Module
//!
//! Pure functions: Merkle verification, id derivation, fees, hash locks.

pub mod fees;
pub mod ids;
pub mod merkle;
pub mod secret;

pub use fees::{calculate_fee, split_fee};
pub use ids::{derive_burn_id, derive_htlc_id, derive_lock_id, proof_hash, release_commitment};
pub use merkle::{
    build_merkle_proof, compute_merkle_root, fold_path, hash_sorted_pair, verify_merkle_proof,
};
pub use secret::{create_hash_lock, generate_preimage, verify_preimage};
