//! In-Memory Asset Ledger Adapter
//!
//! Implements the `AssetLedger` port over in-memory balances and
//! allowances. Supports a per-asset transfer fee to model fee-on-transfer
//! tokens, and a failure switch.

use crate::domain::{Address, Amount, AssetId};
use crate::ports::outbound::AssetLedger;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

#[derive(Default)]
struct LedgerState {
    balances: HashMap<(AssetId, Address), Amount>,
    /// (asset, owner, spender) -> remaining allowance.
    allowances: HashMap<(AssetId, Address, Address), Amount>,
    /// Basis points burned on every transfer of the asset.
    transfer_fee_bps: HashMap<AssetId, u64>,
}

impl LedgerState {
    fn balance(&self, asset: &AssetId, owner: &Address) -> Amount {
        self.balances.get(&(*asset, *owner)).copied().unwrap_or(0)
    }

    fn move_funds(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> bool {
        let available = self.balance(asset, from);
        if available < amount {
            return false;
        }
        let fee_bps = self.transfer_fee_bps.get(asset).copied().unwrap_or(0) as u128;
        let burned = amount * fee_bps / 10_000;

        self.balances.insert((*asset, *from), available - amount);
        let credited = self.balance(asset, to) + (amount - burned);
        self.balances.insert((*asset, *to), credited);
        true
    }
}

/// In-memory asset ledger bound to the bridge custody account.
pub struct InMemoryAssetLedger {
    custody: Address,
    state: RwLock<LedgerState>,
    failing: AtomicBool,
}

impl InMemoryAssetLedger {
    /// Create a ledger where `custody` is the bridge account.
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            state: RwLock::new(LedgerState::default()),
            failing: AtomicBool::new(false),
        }
    }

    /// Credit `amount` to `owner` out of thin air.
    pub fn mint_to(&self, asset: AssetId, owner: Address, amount: Amount) {
        let mut state = self.state.write();
        let balance = state.balance(&asset, &owner) + amount;
        state.balances.insert((asset, owner), balance);
    }

    /// Let custody pull up to `amount` from `owner`.
    pub fn approve(&self, asset: AssetId, owner: Address, amount: Amount) {
        self.state
            .write()
            .allowances
            .insert((asset, owner, self.custody), amount);
    }

    /// Make every transfer of `asset` lose `bps` basis points in flight.
    pub fn set_transfer_fee(&self, asset: AssetId, bps: u64) {
        self.state.write().transfer_fee_bps.insert(asset, bps);
    }

    /// Make every transfer return `false`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Synchronous balance lookup.
    pub fn balance(&self, asset: &AssetId, owner: &Address) -> Amount {
        self.state.read().balance(asset, owner)
    }
}

#[async_trait]
impl AssetLedger for InMemoryAssetLedger {
    async fn transfer(&self, asset: &AssetId, to: &Address, amount: Amount) -> bool {
        if self.failing.load(Ordering::SeqCst) {
            return false;
        }
        debug!("[qc-15] ledger transfer {} to {}", amount, hex::encode(&to[..4]));
        self.state.write().move_funds(asset, &self.custody, to, amount)
    }

    async fn transfer_from(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> bool {
        if self.failing.load(Ordering::SeqCst) {
            return false;
        }
        let mut state = self.state.write();
        let key = (*asset, *from, self.custody);
        let allowance = state.allowances.get(&key).copied().unwrap_or(0);
        if allowance < amount {
            debug!("[qc-15] ledger allowance {} < {}", allowance, amount);
            return false;
        }
        if !state.move_funds(asset, from, to, amount) {
            return false;
        }
        state.allowances.insert(key, allowance - amount);
        true
    }

    async fn balance_of(&self, asset: &AssetId, owner: &Address) -> Amount {
        self.balance(asset, owner)
    }
}
