//! # Bridge Events
//!
//! Audit surface consumed by off-chain indexers. Every event carries the
//! identifying fields of the record it concerns plus the causing actor.

use super::value_objects::{Address, Amount, AssetId, ChainId, ForeignAddress, Hash, Secret};
use serde::{Deserialize, Serialize};

/// Events emitted by the bridge engine.
///
/// Fields carry the names of the record fields they copy.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BridgeEvent {
    /// Funds locked for transfer to `target_chain`.
    Locked {
        lock_id: Hash,
        sender: Address,
        asset: AssetId,
        amount: Amount,
        target_chain: ChainId,
        recipient: ForeignAddress,
        timestamp: u64,
        block_height: u64,
    },
    /// Value released for a foreign lock.
    Minted {
        proof_hash: Hash,
        source_chain: ChainId,
        lock_id: Hash,
        recipient: Address,
        asset: AssetId,
        amount: Amount,
        fee: Amount,
        actor: Address,
    },
    /// Burn intent recorded.
    Burned {
        burn_id: Hash,
        sender: Address,
        asset: AssetId,
        amount: Amount,
        target_chain: ChainId,
        recipient: ForeignAddress,
        redeems_lock_id: Hash,
        timestamp: u64,
        block_height: u64,
    },
    /// Local custody released for a proven counterpart burn.
    Unlocked {
        proof_hash: Hash,
        source_chain: ChainId,
        lock_id: Hash,
        recipient: Address,
        asset: AssetId,
        amount: Amount,
        fee: Amount,
        actor: Address,
    },
    /// HTLC escrow created.
    HtlcCreated {
        htlc_id: Hash,
        sender: Address,
        recipient: Address,
        asset: AssetId,
        amount: Amount,
        hash_lock: Hash,
        time_lock: u64,
    },
    /// HTLC claimed; the preimage is now public.
    HtlcClaimed {
        htlc_id: Hash,
        recipient: Address,
        preimage: Secret,
        actor: Address,
    },
    /// HTLC refunded to its sender.
    HtlcRefunded {
        htlc_id: Hash,
        sender: Address,
        actor: Address,
    },
    /// Chain registered or its light client replaced.
    ChainAdded { chain_id: ChainId, actor: Address },
    /// Chain enabled or disabled.
    ChainStatusChanged {
        chain_id: ChainId,
        supported: bool,
        actor: Address,
    },
    /// Bridge fee changed.
    FeeUpdated {
        old_bps: u64,
        new_bps: u64,
        actor: Address,
    },
    /// Accumulated fees paid out.
    FeesWithdrawn {
        asset: AssetId,
        to: Address,
        amount: Amount,
        actor: Address,
    },
    /// Value-moving operations halted.
    Paused { actor: Address },
    /// Value-moving operations resumed.
    Unpaused { actor: Address },
}

impl BridgeEvent {
    /// Short event name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Locked { .. } => "Locked",
            Self::Minted { .. } => "Minted",
            Self::Burned { .. } => "Burned",
            Self::Unlocked { .. } => "Unlocked",
            Self::HtlcCreated { .. } => "HTLCCreated",
            Self::HtlcClaimed { .. } => "HTLCClaimed",
            Self::HtlcRefunded { .. } => "HTLCRefunded",
            Self::ChainAdded { .. } => "ChainAdded",
            Self::ChainStatusChanged { .. } => "ChainStatusChanged",
            Self::FeeUpdated { .. } => "FeeUpdated",
            Self::FeesWithdrawn { .. } => "FeesWithdrawn",
            Self::Paused { .. } => "Paused",
            Self::Unpaused { .. } => "Unpaused",
        }
    }
}
