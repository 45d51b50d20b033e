//! # Domain Entities
//!
//! Records kept by the bridge ledgers and the proof value object.
//!
//! Records are never deleted: a settled lock or HTLC stays in the store as
//! audit trail.

use super::errors::{BridgeError, BridgeResult};
use super::value_objects::{
    Address, Amount, AssetId, ChainId, ForeignAddress, Hash, HtlcState, LockStatus, Secret,
};
use crate::algorithms::ids;
use serde::{Deserialize, Serialize};

/// Funds locked on this chain awaiting release on the counterpart chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Unique identifier (see [`ids::derive_lock_id`]).
    pub lock_id: Hash,
    /// Account the funds were escrowed from.
    pub sender: Address,
    /// Locked amount. Immutable after creation.
    pub amount: Amount,
    /// Locked asset.
    pub asset: AssetId,
    /// Chain the value is bridged to.
    pub target_chain: ChainId,
    /// Recipient on the target chain.
    pub recipient: ForeignAddress,
    /// Creation timestamp.
    pub created_at: u64,
    /// Creation block height.
    pub block_height: u64,
    /// Settlement status.
    pub status: LockStatus,
}

impl LockRecord {
    /// Released to a third party.
    pub fn is_claimed(&self) -> bool {
        self.status == LockStatus::Claimed
    }

    /// Released back to the sender.
    pub fn is_refunded(&self) -> bool {
        self.status == LockStatus::Refunded
    }

    /// Still holding custody.
    pub fn is_pending(&self) -> bool {
        self.status == LockStatus::Pending
    }

    /// Settle the record. Only `Pending` records can be settled, once.
    pub fn settle(&mut self, status: LockStatus) -> BridgeResult<()> {
        if !self.status.can_transition_to(status) {
            return Err(BridgeError::LockSettled(self.lock_id));
        }
        self.status = status;
        Ok(())
    }

    /// Undo a settlement whose payout failed.
    pub(crate) fn reopen(&mut self) {
        self.status = LockStatus::Pending;
    }
}

/// Burn intent recorded for the reverse direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnRecord {
    /// Unique identifier (see [`ids::derive_burn_id`]).
    pub burn_id: Hash,
    /// Account that burned.
    pub sender: Address,
    /// Burned amount.
    pub amount: Amount,
    /// Burned asset.
    pub asset: AssetId,
    /// Chain the value returns to.
    pub target_chain: ChainId,
    /// Recipient on the target chain.
    pub recipient: ForeignAddress,
    /// Lock on `target_chain` whose custody this burn redeems.
    pub redeems_lock_id: Hash,
    /// Creation timestamp.
    pub created_at: u64,
    /// Creation block height.
    pub block_height: u64,
}

/// Hash time-locked escrow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtlcRecord {
    /// Unique identifier (see [`ids::derive_htlc_id`]).
    pub htlc_id: Hash,
    /// Account the funds were escrowed from; refund target.
    pub sender: Address,
    /// Claim target.
    pub recipient: Address,
    /// Escrowed amount.
    pub amount: Amount,
    /// Escrowed asset.
    pub asset: AssetId,
    /// SHA-256 of the preimage.
    pub hash_lock: Hash,
    /// Absolute expiry timestamp.
    pub time_lock: u64,
    /// Current state.
    pub state: HtlcState,
    /// Revealed preimage (set on claim).
    pub preimage: Option<Secret>,
    /// Creation timestamp.
    pub created_at: u64,
}

impl HtlcRecord {
    /// Check if HTLC has expired.
    pub fn is_expired(&self, current_time: u64) -> bool {
        current_time >= self.time_lock
    }

    /// Claimed with a preimage.
    pub fn is_claimed(&self) -> bool {
        self.state == HtlcState::Claimed
    }

    /// Refunded to the sender.
    pub fn is_refunded(&self) -> bool {
        self.state == HtlcState::Refunded
    }

    fn ensure_open(&self) -> BridgeResult<()> {
        match self.state {
            HtlcState::Claimed => Err(BridgeError::AlreadyClaimed),
            HtlcState::Refunded => Err(BridgeError::AlreadyRefunded),
            HtlcState::Created => Ok(()),
        }
    }

    /// Claim with a preimage already checked against the hash lock.
    pub fn claim(&mut self, preimage: Secret, current_time: u64) -> BridgeResult<()> {
        self.ensure_open()?;
        if !self
            .state
            .can_transition_to(HtlcState::Claimed, current_time, self.time_lock)
        {
            return Err(BridgeError::HtlcExpired);
        }
        self.preimage = Some(preimage);
        self.state = HtlcState::Claimed;
        Ok(())
    }

    /// Refund to sender.
    pub fn refund(&mut self, current_time: u64) -> BridgeResult<()> {
        self.ensure_open()?;
        if !self
            .state
            .can_transition_to(HtlcState::Refunded, current_time, self.time_lock)
        {
            return Err(BridgeError::HtlcNotExpired);
        }
        self.state = HtlcState::Refunded;
        Ok(())
    }

    /// Undo a claim or refund whose payout failed.
    pub(crate) fn reopen(&mut self) {
        self.state = HtlcState::Created;
        self.preimage = None;
    }
}

/// Evidence that a lock or burn happened on `source_chain`.
///
/// Not stored; only its [`proof_hash`](BridgeProof::proof_hash) is kept.
/// The payload fields are trusted only through
/// [`payload_commitment`](BridgeProof::payload_commitment), which the source
/// chain's light client checks against the attested receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeProof {
    /// Chain where the lock/burn happened.
    pub source_chain: ChainId,
    /// Chain where value is released.
    pub target_chain: ChainId,
    /// Lock (or burn) identifier on the source chain.
    pub lock_id: Hash,
    /// Amount to release before fees.
    pub amount: Amount,
    /// Release recipient.
    pub recipient: Address,
    /// Asset to release.
    pub asset: AssetId,
    /// Source block number.
    pub block_number: u64,
    /// Source block hash.
    pub block_hash: Hash,
    /// Source transaction hash; the Merkle leaf.
    pub tx_hash: Hash,
    /// Receipt root the leaf is proven against.
    pub receipt_root: Hash,
    /// Sibling path from `tx_hash` to `receipt_root`.
    pub merkle_path: Vec<Hash>,
    /// Opaque receipt-inclusion proof checked by the light client.
    pub receipt_proof: Vec<u8>,
}

impl BridgeProof {
    /// Replay-detection identifier.
    pub fn proof_hash(&self) -> Hash {
        ids::proof_hash(
            self.source_chain,
            &self.lock_id,
            &self.tx_hash,
            &self.block_hash,
        )
    }

    /// Commitment to the claimed release; the receipt must carry it.
    pub fn payload_commitment(&self) -> Hash {
        ids::release_commitment(
            self.source_chain,
            self.target_chain,
            &self.lock_id,
            self.amount,
            &self.recipient,
            &self.asset,
        )
    }
}

/// Parameters for `lock`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockRequest {
    /// Funds owner.
    pub sender: Address,
    /// Asset to lock.
    pub asset: AssetId,
    /// Amount to lock.
    pub amount: Amount,
    /// Destination chain.
    pub target_chain: ChainId,
    /// Recipient on the destination chain.
    pub recipient: ForeignAddress,
}

/// Parameters for `burn`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnRequest {
    /// Burner.
    pub sender: Address,
    /// Burned asset.
    pub asset: AssetId,
    /// Burned amount.
    pub amount: Amount,
    /// Destination chain.
    pub target_chain: ChainId,
    /// Recipient on the destination chain.
    pub recipient: ForeignAddress,
    /// Lock on the destination chain being redeemed.
    pub redeems_lock_id: Hash,
}

/// Parameters for `create_htlc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtlcRequest {
    /// Funds owner; refund target.
    pub sender: Address,
    /// Claim target.
    pub recipient: Address,
    /// Escrowed asset.
    pub asset: AssetId,
    /// Escrowed amount.
    pub amount: Amount,
    /// SHA-256 of the preimage.
    pub hash_lock: Hash,
    /// Absolute expiry timestamp.
    pub time_lock: u64,
}
