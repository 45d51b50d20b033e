//! # QC-15 Cross-Chain Bridge
//!
//! Trustless cross-chain transfers verified by light clients, plus HTLC
//! atomic swaps.
//!
//! **Subsystem ID:** 15
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Move value between this chain and its counterparts without validators:
//! - Lock -> mint: escrow here, release on the counterpart against a proof
//! - Burn -> unlock: record a burn there, release local custody against a proof
//! - HTLC create -> claim/refund: hash- and time-locked escrow for swaps
//!
//! Every release is gated by a proof (receipt root attested by the source
//! chain's light client + Merkle inclusion) or a preimage, and each proof or
//! preimage is accepted exactly once.
//!
//! ## Security Features
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Replay guard | Proof hash and (chain, lock id) consumed before payout |
//! | Payload binding | Light client checks the receipt commits to amount, recipient and asset |
//! | Exact escrow | Custody must grow by exactly the locked amount |
//! | Free reserve | Mints never spend custody owed to locks, HTLCs or fees |
//! | Disjoint windows | Claim `< time_lock`, refund `>= time_lock` |
//! | Bounded fee | At most 1000 bps |
//! | Pause | Halts new value movement, never in-flight HTLCs |
//!
//! ## Module Structure
//!
//! ```text
//! qc-15-bridge/
//! ├── domain/          # Records, errors, events, replay guard, store
//! ├── algorithms/      # Merkle verification, ids, fees, hash locks
//! ├── ports/           # BridgeApi, AssetLedger, LightClient, Clock
//! ├── adapters/        # In-memory ledger, light client, clocks, event log
//! ├── application/     # BridgeEngine
//! └── config.rs        # BridgeConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{
    HeaderLightClient, InMemoryAssetLedger, InMemoryEventLog, ManualClock, StaticAdmins,
    SystemClock, TracingEventSink,
};
pub use algorithms::{
    build_merkle_proof, calculate_fee, compute_merkle_root, create_hash_lock, generate_preimage,
    split_fee, verify_merkle_proof, verify_preimage,
};
pub use application::BridgeEngine;
pub use config::BridgeConfig;
pub use domain::{
    Address, Amount, AssetId, BridgeError, BridgeEvent, BridgeProof, BridgeResult, BridgeStore,
    BurnRecord, BurnRequest, ChainId, ErrorKind, ForeignAddress, Hash, HtlcRecord, HtlcRequest,
    HtlcState, LockRecord, LockRequest, LockStatus, Secret, SecureSecret, MAX_FEE_BPS,
};
pub use ports::{AdminAuthority, AssetLedger, BridgeApi, Clock, EventSink, LightClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
