//! # Outbound Ports
//!
//! Capabilities the bridge consumes: the asset ledger, per-chain light
//! clients, time, event delivery and admin authorization.

use crate::domain::{Address, Amount, AssetId, BridgeEvent, Hash};
use async_trait::async_trait;

/// Fungible-token ledger - outbound port.
///
/// Bound to the bridge's custody account: `transfer` pays out of custody and
/// `transfer_from` is executed with custody as spender. A `false` return
/// aborts the enclosing bridge operation.
#[async_trait]
pub trait AssetLedger: Send + Sync {
    /// Move `amount` of `asset` from custody to `to`.
    async fn transfer(&self, asset: &AssetId, to: &Address, amount: Amount) -> bool;

    /// Move `amount` of `asset` from `from` to `to` using custody's allowance.
    async fn transfer_from(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> bool;

    /// Balance of `owner`.
    async fn balance_of(&self, asset: &AssetId, owner: &Address) -> Amount;
}

/// Light client of one foreign chain - outbound port.
///
/// The bridge never fetches foreign data itself; it only asks whether a
/// root is attested and whether an opaque receipt proof holds.
#[async_trait]
pub trait LightClient: Send + Sync {
    /// Whether `root` is the attested receipt root of block `block_number` / `block_hash`.
    async fn is_root_attested(&self, block_number: u64, block_hash: &Hash, root: &Hash) -> bool;

    /// Black-box receipt inclusion check of `tx_hash` under `root`.
    ///
    /// `payload` is the claimed release commitment
    /// ([`BridgeProof::payload_commitment`](crate::domain::BridgeProof::payload_commitment)).
    /// The check must fail unless the included receipt commits to exactly
    /// that payload.
    async fn verify_receipt(
        &self,
        root: &Hash,
        tx_hash: &Hash,
        payload: &Hash,
        receipt_proof: &[u8],
    ) -> bool;
}

/// Time source.
pub trait Clock: Send + Sync {
    /// Current unix timestamp in seconds.
    fn now(&self) -> u64;

    /// Current local block height.
    fn block_height(&self) -> u64;
}

/// Event delivery.
pub trait EventSink: Send + Sync {
    /// Deliver one event. Must not fail.
    fn emit(&self, event: BridgeEvent);
}

/// Admin capability check provided by the host.
pub trait AdminAuthority: Send + Sync {
    /// Whether `caller` may run admin operations.
    fn is_admin(&self, caller: &Address) -> bool;
}
