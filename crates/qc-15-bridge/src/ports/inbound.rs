//! # Inbound Ports
//!
//! API trait defining what the bridge engine can do.
//!
//! Value-moving and admin operations are `async` because they may wait on
//! the asset ledger or a light client. Queries are synchronous and return
//! snapshots.

use crate::domain::{
    Address, Amount, AssetId, BridgeProof, BridgeResult, BurnRecord, BurnRequest, ChainId, Hash,
    HtlcRecord, HtlcRequest, LockRecord, LockRequest, Secret,
};
use crate::ports::outbound::LightClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Bridge API - inbound port.
#[async_trait]
pub trait BridgeApi: Send + Sync {
    // ---- lock -> mint ----

    /// Escrow `request.amount` into custody and record a lock.
    async fn lock(&self, request: LockRequest) -> BridgeResult<Hash>;

    /// Release value for a proven foreign lock. Returns the net amount paid.
    async fn mint(&self, caller: Address, proof: BridgeProof) -> BridgeResult<Amount>;

    // ---- burn -> unlock ----

    /// Record a burn intent for the reverse direction.
    async fn burn(&self, request: BurnRequest) -> BridgeResult<Hash>;

    /// Release local custody for a proven foreign burn. Returns the net amount paid.
    async fn unlock(&self, caller: Address, proof: BridgeProof) -> BridgeResult<Amount>;

    // ---- htlc ----

    /// Escrow funds behind a hash lock and a time lock.
    async fn create_htlc(&self, request: HtlcRequest) -> BridgeResult<Hash>;

    /// Claim before expiry by revealing the preimage.
    ///
    /// The reveal is recorded by hash lock: HTLCs created afterwards under the
    /// same hash lock are rejected, while HTLCs already open under it (the
    /// other leg of a swap) remain claimable until they expire.
    async fn claim_htlc(&self, caller: Address, htlc_id: Hash, preimage: Secret)
        -> BridgeResult<()>;

    /// Refund to the sender at or after expiry.
    async fn refund_htlc(&self, caller: Address, htlc_id: Hash) -> BridgeResult<()>;

    // ---- admin ----

    /// Register a chain or replace its light client.
    async fn add_supported_chain(
        &self,
        caller: Address,
        chain_id: ChainId,
        light_client: Arc<dyn LightClient>,
    ) -> BridgeResult<()>;

    /// Enable or disable a registered chain.
    async fn set_chain_supported(
        &self,
        caller: Address,
        chain_id: ChainId,
        supported: bool,
    ) -> BridgeResult<()>;

    /// Halt value-moving operations.
    async fn pause(&self, caller: Address) -> BridgeResult<()>;

    /// Resume value-moving operations.
    async fn unpause(&self, caller: Address) -> BridgeResult<()>;

    /// Change the bridge fee.
    async fn set_bridge_fee(&self, caller: Address, fee_bps: u64) -> BridgeResult<()>;

    /// Pay accumulated fees out of the pool.
    async fn withdraw_fees(
        &self,
        caller: Address,
        asset: AssetId,
        to: Address,
        amount: Amount,
    ) -> BridgeResult<()>;

    /// Consume a payment authorization hash.
    async fn consume_authorization(&self, caller: Address, auth_hash: Hash) -> BridgeResult<()>;

    // ---- queries ----

    /// Lock record by id.
    fn get_lock_details(&self, lock_id: &Hash) -> Option<LockRecord>;

    /// Burn record by id.
    fn get_burn_details(&self, burn_id: &Hash) -> Option<BurnRecord>;

    /// HTLC record by id.
    fn get_htlc_details(&self, htlc_id: &Hash) -> Option<HtlcRecord>;

    /// Aggregate lock custody of `asset`.
    fn get_bridge_balance(&self, asset: &AssetId) -> Amount;

    /// Value escrowed in open HTLCs.
    fn get_htlc_escrow(&self, asset: &AssetId) -> Amount;

    /// Fee pool of `asset`.
    fn get_collected_fees(&self, asset: &AssetId) -> Amount;

    /// Whether a proof hash was consumed.
    fn is_proof_used(&self, proof_hash: &Hash) -> bool;

    /// Whether the preimage of `hash_lock` was revealed.
    fn is_preimage_used(&self, hash_lock: &Hash) -> bool;

    /// Whether an authorization hash was consumed.
    fn is_authorization_used(&self, auth_hash: &Hash) -> bool;

    /// Pause flag.
    fn is_paused(&self) -> bool;

    /// Current fee.
    fn bridge_fee_bps(&self) -> u64;

    /// Whether `chain_id` is registered and enabled.
    fn is_chain_supported(&self, chain_id: ChainId) -> bool;

    /// Enabled chains, ascending.
    fn supported_chains(&self) -> Vec<ChainId>;

    /// Number of consumed proofs.
    fn consumed_proof_count(&self) -> usize;
}
