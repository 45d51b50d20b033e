//! # Bridge Store
//!
//! Owned arena of every record the engine keeps, keyed by identifier hash,
//! plus aggregate balances and the replay guard. The engine is the only
//! writer; persistence is left to the host.

use super::entities::{BurnRecord, HtlcRecord, LockRecord};
use super::errors::{BridgeError, BridgeResult};
use super::invariants::invariant_custody_release;
use super::replay_guard::ReplayGuard;
use super::value_objects::{Amount, AssetId, ChainId, Hash, LockStatus, Secret};
use crate::algorithms::verify_preimage;
use std::collections::HashMap;

/// Ledger state owned by the bridge engine.
#[derive(Clone, Debug, Default)]
pub struct BridgeStore {
    locks: HashMap<Hash, LockRecord>,
    burns: HashMap<Hash, BurnRecord>,
    htlcs: HashMap<Hash, HtlcRecord>,
    custody: HashMap<AssetId, Amount>,
    htlc_escrow: HashMap<AssetId, Amount>,
    fees: HashMap<AssetId, Amount>,
    replay: ReplayGuard,
    nonce: u64,
    paused: bool,
    fee_bps: u64,
}

impl BridgeStore {
    /// Empty store with the given initial fee.
    pub fn new(fee_bps: u64) -> Self {
        Self {
            fee_bps,
            ..Self::default()
        }
    }

    /// Return the current nonce and advance it.
    pub fn next_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce += 1;
        nonce
    }

    /// Next nonce without advancing.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    // ---- control flags ----

    /// Paused flag.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Set paused flag; returns the previous value.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        std::mem::replace(&mut self.paused, paused)
    }

    /// Current fee.
    pub fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    /// Set fee; returns the previous value. Bounds are checked by the caller.
    pub fn set_fee_bps(&mut self, bps: u64) -> u64 {
        std::mem::replace(&mut self.fee_bps, bps)
    }

    // ---- lock ledger ----

    /// Insert a new lock and credit custody.
    pub fn insert_lock(&mut self, record: LockRecord) -> BridgeResult<()> {
        credit(&mut self.custody, record.asset, record.amount)?;
        self.locks.insert(record.lock_id, record);
        Ok(())
    }

    /// Lock by id.
    pub fn lock(&self, lock_id: &Hash) -> Option<&LockRecord> {
        self.locks.get(lock_id)
    }

    /// All locks, unordered.
    pub fn locks(&self) -> impl Iterator<Item = &LockRecord> {
        self.locks.values()
    }

    /// Aggregate lock custody for an asset.
    pub fn custody(&self, asset: &AssetId) -> Amount {
        self.custody.get(asset).copied().unwrap_or(0)
    }

    // ---- burn ledger ----

    /// Insert a burn intent.
    pub fn insert_burn(&mut self, record: BurnRecord) {
        self.burns.insert(record.burn_id, record);
    }

    /// Burn by id.
    pub fn burn(&self, burn_id: &Hash) -> Option<&BurnRecord> {
        self.burns.get(burn_id)
    }

    // ---- htlc ledger ----

    /// Insert a new HTLC and credit escrow.
    pub fn insert_htlc(&mut self, record: HtlcRecord) -> BridgeResult<()> {
        credit(&mut self.htlc_escrow, record.asset, record.amount)?;
        self.htlcs.insert(record.htlc_id, record);
        Ok(())
    }

    /// HTLC by id.
    pub fn htlc(&self, htlc_id: &Hash) -> Option<&HtlcRecord> {
        self.htlcs.get(htlc_id)
    }

    /// Value escrowed in open HTLCs for an asset.
    pub fn htlc_escrow(&self, asset: &AssetId) -> Amount {
        self.htlc_escrow.get(asset).copied().unwrap_or(0)
    }

    // ---- fee pool ----

    /// Accumulated fees for an asset.
    pub fn fees(&self, asset: &AssetId) -> Amount {
        self.fees.get(asset).copied().unwrap_or(0)
    }

    /// Add to the fee pool.
    pub fn credit_fees(&mut self, asset: AssetId, amount: Amount) -> BridgeResult<()> {
        credit(&mut self.fees, asset, amount)
    }

    /// Take from the fee pool.
    pub fn debit_fees(&mut self, asset: AssetId, amount: Amount) -> BridgeResult<()> {
        let available = self.fees(&asset);
        if available < amount {
            return Err(BridgeError::InsufficientFees {
                asset,
                available,
                requested: amount,
            });
        }
        debit(&mut self.fees, asset, amount)
    }

    /// Custody owed for an asset: pending locks, open HTLCs and the fee pool.
    ///
    /// Anything the custody account holds beyond this is free reserve.
    pub fn committed(&self, asset: &AssetId) -> Amount {
        self.custody(asset)
            .saturating_add(self.htlc_escrow(asset))
            .saturating_add(self.fees(asset))
    }

    // ---- release transitions ----
    //
    // Each `record_*` either applies every bookkeeping change of a release or
    // none of them. The matching `revert_*` undoes it when the ledger payout
    // fails; the caller holds the write gate in between.

    /// Consume a mint proof and book its fee.
    pub fn record_mint(
        &mut self,
        proof_hash: Hash,
        source_chain: ChainId,
        lock_id: Hash,
        asset: AssetId,
        fee: Amount,
    ) -> BridgeResult<()> {
        let fees_after = self
            .fees(&asset)
            .checked_add(fee)
            .ok_or(BridgeError::AmountOverflow)?;
        self.replay.consume_proof(proof_hash, source_chain, lock_id)?;
        self.fees.insert(asset, fees_after);
        Ok(())
    }

    pub(crate) fn revert_mint(
        &mut self,
        proof_hash: &Hash,
        source_chain: ChainId,
        lock_id: &Hash,
        asset: AssetId,
        fee: Amount,
    ) {
        self.replay.release_proof(proof_hash, source_chain, lock_id);
        let fees = self.fees(&asset).saturating_sub(fee);
        self.fees.insert(asset, fees);
    }

    /// Consume an unlock proof, settle the local lock, release its custody
    /// and book the fee.
    pub fn record_unlock(
        &mut self,
        proof_hash: Hash,
        source_chain: ChainId,
        lock_id: Hash,
        status: LockStatus,
        fee: Amount,
    ) -> BridgeResult<()> {
        let lock = self
            .locks
            .get(&lock_id)
            .ok_or(BridgeError::LockNotFound(lock_id))?;
        if !lock.status.can_transition_to(status) {
            return Err(BridgeError::LockSettled(lock_id));
        }
        let (asset, amount) = (lock.asset, lock.amount);
        let custody_after = invariant_custody_release(asset, self.custody(&asset), amount)?;
        let fees_after = self
            .fees(&asset)
            .checked_add(fee)
            .ok_or(BridgeError::AmountOverflow)?;

        self.replay.consume_proof(proof_hash, source_chain, lock_id)?;
        if let Some(lock) = self.locks.get_mut(&lock_id) {
            lock.settle(status)?;
        }
        self.custody.insert(asset, custody_after);
        self.fees.insert(asset, fees_after);
        Ok(())
    }

    pub(crate) fn revert_unlock(
        &mut self,
        proof_hash: &Hash,
        source_chain: ChainId,
        lock_id: &Hash,
        fee: Amount,
    ) {
        self.replay.release_proof(proof_hash, source_chain, lock_id);
        let Some(lock) = self.locks.get_mut(lock_id) else {
            return;
        };
        lock.reopen();
        let (asset, amount) = (lock.asset, lock.amount);
        let custody = self.custody(&asset).saturating_add(amount);
        self.custody.insert(asset, custody);
        let fees = self.fees(&asset).saturating_sub(fee);
        self.fees.insert(asset, fees);
    }

    /// Claim an HTLC: state and expiry, then preimage, then escrow.
    ///
    /// Marks the hash lock revealed. HTLCs opened under the same hash lock
    /// before this reveal stay claimable, so both legs of a same-engine swap
    /// settle. Returns the settled record.
    pub fn record_htlc_claim(
        &mut self,
        htlc_id: &Hash,
        preimage: Secret,
        now: u64,
    ) -> BridgeResult<HtlcRecord> {
        let mut settled = self
            .htlcs
            .get(htlc_id)
            .cloned()
            .ok_or(BridgeError::HtlcNotFound(*htlc_id))?;
        settled.claim(preimage, now)?;
        if !verify_preimage(&preimage, &settled.hash_lock) {
            return Err(BridgeError::InvalidPreimage);
        }
        let escrow_after = invariant_custody_release(
            settled.asset,
            self.htlc_escrow(&settled.asset),
            settled.amount,
        )?;

        self.replay.reveal_preimage(settled.hash_lock);
        self.htlc_escrow.insert(settled.asset, escrow_after);
        self.htlcs.insert(*htlc_id, settled.clone());
        Ok(settled)
    }

    pub(crate) fn revert_htlc_claim(&mut self, htlc_id: &Hash) {
        let Some(htlc) = self.htlcs.get_mut(htlc_id) else {
            return;
        };
        htlc.reopen();
        let (asset, amount, hash_lock) = (htlc.asset, htlc.amount, htlc.hash_lock);
        let revealed_elsewhere = self
            .htlcs
            .values()
            .any(|other| other.hash_lock == hash_lock && other.is_claimed());
        if !revealed_elsewhere {
            self.replay.release_preimage(&hash_lock);
        }
        let escrow = self.htlc_escrow(&asset).saturating_add(amount);
        self.htlc_escrow.insert(asset, escrow);
    }

    /// Refund an expired HTLC. Returns the settled record.
    pub fn record_htlc_refund(&mut self, htlc_id: &Hash, now: u64) -> BridgeResult<HtlcRecord> {
        let mut settled = self
            .htlcs
            .get(htlc_id)
            .cloned()
            .ok_or(BridgeError::HtlcNotFound(*htlc_id))?;
        settled.refund(now)?;
        let escrow_after = invariant_custody_release(
            settled.asset,
            self.htlc_escrow(&settled.asset),
            settled.amount,
        )?;

        self.htlc_escrow.insert(settled.asset, escrow_after);
        self.htlcs.insert(*htlc_id, settled.clone());
        Ok(settled)
    }

    pub(crate) fn revert_htlc_refund(&mut self, htlc_id: &Hash) {
        let Some(htlc) = self.htlcs.get_mut(htlc_id) else {
            return;
        };
        htlc.reopen();
        let (asset, amount) = (htlc.asset, htlc.amount);
        let escrow = self.htlc_escrow(&asset).saturating_add(amount);
        self.htlc_escrow.insert(asset, escrow);
    }

    // ---- replay ----

    /// Replay guard.
    pub fn replay(&self) -> &ReplayGuard {
        &self.replay
    }

    /// Mutable replay guard.
    pub fn replay_mut(&mut self) -> &mut ReplayGuard {
        &mut self.replay
    }
}

fn credit(
    balances: &mut HashMap<AssetId, Amount>,
    asset: AssetId,
    amount: Amount,
) -> BridgeResult<()> {
    let entry = balances.entry(asset).or_insert(0);
    *entry = entry.checked_add(amount).ok_or(BridgeError::AmountOverflow)?;
    Ok(())
}

fn debit(
    balances: &mut HashMap<AssetId, Amount>,
    asset: AssetId,
    amount: Amount,
) -> BridgeResult<()> {
    let available = balances.get(&asset).copied().unwrap_or(0);
    let remaining = invariant_custody_release(asset, available, amount)?;
    balances.insert(asset, remaining);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::create_hash_lock;
    use crate::domain::{ForeignAddress, HtlcState};

    const ASSET: AssetId = [7u8; 20];

    fn lock(id: u8, amount: Amount) -> LockRecord {
        LockRecord {
            lock_id: [id; 32],
            sender: [1u8; 20],
            amount,
            asset: ASSET,
            target_chain: ChainId(2),
            recipient: ForeignAddress::new(vec![1]),
            created_at: 0,
            block_height: 0,
            status: LockStatus::Pending,
        }
    }

    #[test]
    fn test_nonce_is_monotonic() {
        let mut store = BridgeStore::new(10);
        assert_eq!(store.next_nonce(), 0);
        assert_eq!(store.next_nonce(), 1);
        assert_eq!(store.nonce(), 2);
    }

    #[test]
    fn test_insert_lock_credits_custody() {
        let mut store = BridgeStore::new(10);
        store.insert_lock(lock(1, 100)).unwrap();
        store.insert_lock(lock(2, 50)).unwrap();
        assert_eq!(store.custody(&ASSET), 150);
        assert!(store.lock(&[1u8; 32]).is_some());
    }

    #[test]
    fn test_unlock_cannot_underflow_custody() {
        let mut store = BridgeStore::new(10);
        store.insert_lock(lock(1, 100)).unwrap();
        store.custody.insert(ASSET, 60);
        assert!(matches!(
            store.record_unlock([0xEEu8; 32], ChainId(2), [1u8; 32], LockStatus::Claimed, 0),
            Err(BridgeError::CustodyUnderflow { available: 60, requested: 100, .. })
        ));
        assert!(store.lock(&[1u8; 32]).unwrap().is_pending());
        assert!(!store.replay().is_proof_used(&[0xEEu8; 32]));
    }

    #[test]
    fn test_fee_pool() {
        let mut store = BridgeStore::new(10);
        store.credit_fees(ASSET, 5).unwrap();
        assert!(matches!(
            store.debit_fees(ASSET, 6),
            Err(BridgeError::InsufficientFees { .. })
        ));
        store.debit_fees(ASSET, 5).unwrap();
        assert_eq!(store.fees(&ASSET), 0);
    }

    #[test]
    fn test_htlc_escrow() {
        let mut store = BridgeStore::new(10);
        store
            .insert_htlc(HtlcRecord {
                htlc_id: [1u8; 32],
                sender: [1u8; 20],
                recipient: [2u8; 20],
                amount: 40,
                asset: ASSET,
                hash_lock: [3u8; 32],
                time_lock: 100,
                state: HtlcState::Created,
                preimage: None,
                created_at: 0,
            })
            .unwrap();
        assert_eq!(store.htlc_escrow(&ASSET), 40);
        assert!(matches!(
            store.record_htlc_refund(&[9u8; 32], 200),
            Err(BridgeError::HtlcNotFound(_))
        ));
    }

    #[test]
    fn test_committed_sums_every_obligation() {
        let mut store = BridgeStore::new(10);
        store.insert_lock(lock(1, 100)).unwrap();
        store.insert_htlc(htlc(&[4u8; 32], 100)).unwrap();
        store.credit_fees(ASSET, 5).unwrap();
        assert_eq!(store.committed(&ASSET), 100 + 40 + 5);
        assert_eq!(store.committed(&[8u8; 20]), 0);
    }

    #[test]
    fn test_control_flags() {
        let mut store = BridgeStore::new(10);
        assert!(!store.set_paused(true));
        assert!(store.is_paused());
        assert_eq!(store.set_fee_bps(25), 10);
        assert_eq!(store.fee_bps(), 25);
    }

    fn htlc(preimage: &Secret, time_lock: u64) -> HtlcRecord {
        HtlcRecord {
            htlc_id: [5u8; 32],
            sender: [1u8; 20],
            recipient: [2u8; 20],
            amount: 40,
            asset: ASSET,
            hash_lock: create_hash_lock(preimage),
            time_lock,
            state: HtlcState::Created,
            preimage: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_record_unlock_and_revert() {
        let mut store = BridgeStore::new(10);
        store.insert_lock(lock(1, 100)).unwrap();
        store
            .record_unlock([0xEEu8; 32], ChainId(2), [1u8; 32], LockStatus::Claimed, 1)
            .unwrap();
        assert_eq!(store.custody(&ASSET), 0);
        assert_eq!(store.fees(&ASSET), 1);
        assert!(store.lock(&[1u8; 32]).unwrap().is_claimed());

        store.revert_unlock(&[0xEEu8; 32], ChainId(2), &[1u8; 32], 1);
        assert_eq!(store.custody(&ASSET), 100);
        assert_eq!(store.fees(&ASSET), 0);
        assert!(store.lock(&[1u8; 32]).unwrap().is_pending());
        assert!(!store.replay().is_proof_used(&[0xEEu8; 32]));
    }

    #[test]
    fn test_record_unlock_settled_lock_leaves_replay_untouched() {
        let mut store = BridgeStore::new(10);
        store.insert_lock(lock(1, 100)).unwrap();
        store
            .record_unlock([0xEEu8; 32], ChainId(2), [1u8; 32], LockStatus::Refunded, 0)
            .unwrap();
        let err = store
            .record_unlock([0xEFu8; 32], ChainId(3), [1u8; 32], LockStatus::Claimed, 0)
            .unwrap_err();
        assert!(matches!(err, BridgeError::LockSettled(_)));
        assert!(!store.replay().is_proof_used(&[0xEFu8; 32]));
    }

    #[test]
    fn test_record_mint_is_all_or_nothing() {
        let mut store = BridgeStore::new(10);
        store
            .record_mint([1u8; 32], ChainId(2), [2u8; 32], ASSET, 7)
            .unwrap();
        let err = store
            .record_mint([1u8; 32], ChainId(2), [3u8; 32], ASSET, 7)
            .unwrap_err();
        assert!(matches!(err, BridgeError::ProofAlreadyUsed(_)));
        assert_eq!(store.fees(&ASSET), 7);
    }

    #[test]
    fn test_htlc_claim_checks_preimage_and_reveals() {
        let preimage = [9u8; 32];
        let mut store = BridgeStore::new(10);
        store.insert_htlc(htlc(&preimage, 100)).unwrap();

        assert!(matches!(
            store.record_htlc_claim(&[5u8; 32], [8u8; 32], 50),
            Err(BridgeError::InvalidPreimage)
        ));
        let settled = store.record_htlc_claim(&[5u8; 32], preimage, 50).unwrap();
        assert!(settled.is_claimed());
        assert_eq!(store.htlc_escrow(&ASSET), 0);
        assert!(store.replay().is_preimage_used(&settled.hash_lock));

        store.revert_htlc_claim(&[5u8; 32]);
        assert_eq!(store.htlc_escrow(&ASSET), 40);
        assert!(!store.replay().is_preimage_used(&settled.hash_lock));
    }

    #[test]
    fn test_shared_hash_lock_legs_both_claim() {
        let preimage = [9u8; 32];
        let mut store = BridgeStore::new(10);
        store.insert_htlc(htlc(&preimage, 100)).unwrap();
        store
            .insert_htlc(HtlcRecord {
                htlc_id: [6u8; 32],
                ..htlc(&preimage, 100)
            })
            .unwrap();

        store.record_htlc_claim(&[5u8; 32], preimage, 50).unwrap();
        store.record_htlc_claim(&[6u8; 32], preimage, 60).unwrap();
        assert_eq!(store.htlc_escrow(&ASSET), 0);

        // One leg reopening leaves the preimage public through the other.
        store.revert_htlc_claim(&[6u8; 32]);
        assert!(store.replay().is_preimage_used(&create_hash_lock(&preimage)));
        assert_eq!(store.htlc_escrow(&ASSET), 40);
    }

    #[test]
    fn test_htlc_refund_window() {
        let mut store = BridgeStore::new(10);
        store.insert_htlc(htlc(&[9u8; 32], 100)).unwrap();
        assert!(matches!(
            store.record_htlc_refund(&[5u8; 32], 99),
            Err(BridgeError::HtlcNotExpired)
        ));
        assert!(store.record_htlc_refund(&[5u8; 32], 100).unwrap().is_refunded());
        assert!(matches!(
            store.record_htlc_claim(&[5u8; 32], [9u8; 32], 50),
            Err(BridgeError::AlreadyRefunded)
        ));
    }
}
