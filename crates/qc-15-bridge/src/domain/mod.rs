//! # Domain Module
//!
//! Core domain types for the cross-chain bridge.

pub mod chain_registry;
pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod replay_guard;
pub mod secure_secret;
pub mod store;
pub mod value_objects;

pub use chain_registry::ChainRegistry;
pub use entities::*;
pub use errors::*;
pub use events::BridgeEvent;
pub use invariants::*;
pub use replay_guard::ReplayGuard;
pub use secure_secret::SecureSecret;
pub use store::BridgeStore;
pub use value_objects::*;
