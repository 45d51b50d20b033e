//! Header Light Client Adapter
//!
//! Implements the `LightClient` port from a locally fed set of attested
//! headers, as a header-sync service would after verifying them.

use crate::domain::Hash;
use crate::ports::outbound::LightClient;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Attested header of the foreign chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestedHeader {
    /// Block hash.
    pub block_hash: Hash,
    /// Receipt root committed by the block.
    pub receipt_root: Hash,
}

/// In-memory light client for one foreign chain.
pub struct HeaderLightClient {
    /// Attested headers by block number.
    headers: RwLock<HashMap<u64, AttestedHeader>>,
    /// Receipts known to be included: (root, tx_hash, payload commitment).
    receipts: RwLock<HashSet<(Hash, Hash, Hash)>>,
    /// Foreign chain tip.
    tip: RwLock<u64>,
    /// Confirmations required before a header counts as attested.
    required_confirmations: u64,
}

impl HeaderLightClient {
    /// Create a client requiring `required_confirmations` on top of a header.
    pub fn new(required_confirmations: u64) -> Self {
        Self {
            headers: RwLock::new(HashMap::new()),
            receipts: RwLock::new(HashSet::new()),
            tip: RwLock::new(0),
            required_confirmations,
        }
    }

    /// Record a verified header; the tip moves up to it if needed.
    pub fn attest_header(&self, block_number: u64, block_hash: Hash, receipt_root: Hash) {
        self.headers.write().insert(
            block_number,
            AttestedHeader {
                block_hash,
                receipt_root,
            },
        );
        let mut tip = self.tip.write();
        *tip = (*tip).max(block_number);
    }

    /// Record a receipt proven under `root` and the release it commits to.
    pub fn record_receipt(&self, root: Hash, tx_hash: Hash, payload: Hash) {
        self.receipts.write().insert((root, tx_hash, payload));
    }

    /// Advance the foreign chain tip.
    pub fn set_tip(&self, height: u64) {
        *self.tip.write() = height;
    }

    /// Foreign chain tip.
    pub fn tip(&self) -> u64 {
        *self.tip.read()
    }
}

impl Default for HeaderLightClient {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl LightClient for HeaderLightClient {
    async fn is_root_attested(&self, block_number: u64, block_hash: &Hash, root: &Hash) -> bool {
        let confirmations = self.tip().saturating_sub(block_number);
        if confirmations < self.required_confirmations {
            debug!(
                "[qc-15] Block {} has {}/{} confirmations",
                block_number, confirmations, self.required_confirmations
            );
            return false;
        }

        self.headers
            .read()
            .get(&block_number)
            .map(|header| header.block_hash == *block_hash && header.receipt_root == *root)
            .unwrap_or(false)
    }

    async fn verify_receipt(
        &self,
        root: &Hash,
        tx_hash: &Hash,
        payload: &Hash,
        _receipt_proof: &[u8],
    ) -> bool {
        let included = self.receipts.read().contains(&(*root, *tx_hash, *payload));
        if !included {
            debug!(
                "[qc-15] No receipt for tx {} with payload {}",
                hex::encode(&tx_hash[..4]),
                hex::encode(&payload[..4])
            );
        }
        included
    }
}
