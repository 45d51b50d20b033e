//! # Bridge Engine
//!
//! Application service orchestrating the lock/mint, burn/unlock and HTLC
//! flows over the domain store and the outbound ports.
//!
//! ## Write discipline
//!
//! Every mutating operation holds `write_gate` for its whole duration,
//! including awaits on the asset ledger and light clients. Store mutations
//! happen under the `parking_lot` write lock, which is never held across an
//! `.await`. Releases consume their proof or preimage before the payout and
//! revert that bookkeeping if the payout fails.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::algorithms::{
    derive_burn_id, derive_htlc_id, derive_lock_id, split_fee, verify_merkle_proof,
};
use crate::config::BridgeConfig;
use crate::domain::{
    invariant_exact_credit, invariant_fee_bound, invariant_positive_amount,
    invariant_time_lock_in_future, Address, Amount, AssetId, BridgeError, BridgeEvent,
    BridgeProof, BridgeResult, BridgeStore, BurnRecord, BurnRequest, ChainId, ChainRegistry, Hash,
    HtlcRecord, HtlcRequest, HtlcState, LockRecord, LockRequest, LockStatus, Secret,
};
use crate::ports::{AdminAuthority, AssetLedger, BridgeApi, Clock, EventSink, LightClient};

type Chains = ChainRegistry<Arc<dyn LightClient>>;

/// Bridge engine - implements [`BridgeApi`].
pub struct BridgeEngine<A: AssetLedger, C: Clock> {
    /// Configuration.
    config: BridgeConfig,
    /// Records, balances and replay state.
    state: RwLock<BridgeStore>,
    /// Counterpart chains.
    chains: RwLock<Chains>,
    /// Serializes mutating operations.
    write_gate: Mutex<()>,
    ledger: Arc<A>,
    clock: Arc<C>,
    events: Arc<dyn EventSink>,
    admin: Arc<dyn AdminAuthority>,
}

impl<A: AssetLedger, C: Clock> BridgeEngine<A, C> {
    /// Create an engine over an empty store.
    pub fn new(
        config: BridgeConfig,
        ledger: Arc<A>,
        clock: Arc<C>,
        events: Arc<dyn EventSink>,
        admin: Arc<dyn AdminAuthority>,
    ) -> BridgeResult<Self> {
        let store = BridgeStore::new(config.fee_bps);
        Self::with_store(config, store, ledger, clock, events, admin)
    }

    /// Create an engine over a store restored by the host.
    pub fn with_store(
        config: BridgeConfig,
        store: BridgeStore,
        ledger: Arc<A>,
        clock: Arc<C>,
        events: Arc<dyn EventSink>,
        admin: Arc<dyn AdminAuthority>,
    ) -> BridgeResult<Self> {
        config.validate()?;
        invariant_fee_bound(store.fee_bps(), config.max_fee_bps)?;
        info!(
            "[qc-15] Bridge engine on {} (fee {} bps, nonce {})",
            config.local_chain,
            store.fee_bps(),
            store.nonce()
        );
        Ok(Self {
            config,
            state: RwLock::new(store),
            chains: RwLock::new(ChainRegistry::new()),
            write_gate: Mutex::new(()),
            ledger,
            clock,
            events,
            admin,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Copy of the store, for host persistence.
    pub fn snapshot(&self) -> BridgeStore {
        self.state.read().clone()
    }

    fn ensure_admin(&self, caller: &Address) -> BridgeResult<()> {
        if !self.admin.is_admin(caller) {
            warn!("[qc-15] Rejected admin call from {}", short(caller));
            return Err(BridgeError::Unauthorized(*caller));
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> BridgeResult<()> {
        if self.state.read().is_paused() {
            debug!("[qc-15] Rejected: bridge paused");
            return Err(BridgeError::Paused);
        }
        Ok(())
    }

    /// Pull `amount` into custody and check custody grew by exactly that.
    ///
    /// On a short credit whatever did arrive is sent back to `from`.
    async fn escrow(&self, asset: &AssetId, from: &Address, amount: Amount) -> BridgeResult<()> {
        let custody = self.config.custody_account;
        let before = self.ledger.balance_of(asset, &custody).await;
        if !self.ledger.transfer_from(asset, from, &custody, amount).await {
            warn!(
                "[qc-15] Ledger refused escrow of {} from {}",
                amount,
                short(from)
            );
            return Err(BridgeError::TransferFailed {
                operation: "transfer_from",
            });
        }
        let after = self.ledger.balance_of(asset, &custody).await;
        if let Err(err) = invariant_exact_credit(before, after, amount) {
            let received = after.saturating_sub(before);
            warn!(
                "[qc-15] Escrow credited {} of {}, returning to {}",
                received,
                amount,
                short(from)
            );
            self.return_escrow(asset, from, received).await;
            return Err(err);
        }
        Ok(())
    }

    fn restore_fees(&self, asset: AssetId, amount: Amount) {
        if let Err(err) = self.state.write().credit_fees(asset, amount) {
            error!("[qc-15] Could not restore fee pool: {}", err);
        }
    }

    async fn return_escrow(&self, asset: &AssetId, to: &Address, amount: Amount) {
        if amount > 0 && !self.ledger.transfer(asset, to, amount).await {
            error!(
                "[qc-15] Failed to return {} of escrow to {}",
                amount,
                short(to)
            );
        }
    }

    /// Check custody holds `payout` on top of everything it owes.
    ///
    /// Pending locks, open HTLCs and the fee pool are never spent by a mint
    /// or fee withdrawal.
    async fn ensure_free_reserve(&self, asset: &AssetId, payout: Amount) -> BridgeResult<()> {
        let held = self
            .ledger
            .balance_of(asset, &self.config.custody_account)
            .await;
        let owed = self.state.read().committed(asset);
        let available = held.saturating_sub(owed);
        if available < payout {
            warn!(
                "[qc-15] Free reserve {} of {} cannot cover {} (owed {})",
                available,
                short(asset),
                payout,
                owed
            );
            return Err(BridgeError::InsufficientReserve {
                asset: *asset,
                available,
                required: payout,
            });
        }
        Ok(())
    }

    /// Check a mint/unlock proof. Returns its proof hash.
    ///
    /// Amount, recipient and asset are only as trustworthy as the receipt
    /// check, which binds them through the payload commitment.
    async fn verify_release(&self, proof: &BridgeProof) -> BridgeResult<Hash> {
        invariant_positive_amount(proof.amount)?;

        let proof_hash = proof.proof_hash();
        {
            let state = self.state.read();
            if state.replay().is_proof_used(&proof_hash) {
                warn!("[qc-15] Replayed proof {}", short(&proof_hash));
                return Err(BridgeError::ProofAlreadyUsed(proof_hash));
            }
            if state
                .replay()
                .is_lock_released(proof.source_chain, &proof.lock_id)
            {
                warn!(
                    "[qc-15] Lock {} from {} already released",
                    short(&proof.lock_id),
                    proof.source_chain
                );
                return Err(BridgeError::LockAlreadyReleased {
                    chain: proof.source_chain,
                    lock_id: proof.lock_id,
                });
            }
        }

        if proof.target_chain != self.config.local_chain {
            return Err(BridgeError::WrongTargetChain {
                expected: self.config.local_chain,
                got: proof.target_chain,
            });
        }

        let light_client = self
            .chains
            .read()
            .light_client_for(proof.source_chain)
            .ok_or(BridgeError::ChainNotSupported(proof.source_chain))?;

        if !light_client
            .is_root_attested(proof.block_number, &proof.block_hash, &proof.receipt_root)
            .await
        {
            warn!(
                "[qc-15] Root {} not attested on {} at block {}",
                short(&proof.receipt_root),
                proof.source_chain,
                proof.block_number
            );
            return Err(BridgeError::RootNotAttested {
                chain: proof.source_chain,
                block_number: proof.block_number,
            });
        }
        let payload = proof.payload_commitment();
        if !light_client
            .verify_receipt(
                &proof.receipt_root,
                &proof.tx_hash,
                &payload,
                &proof.receipt_proof,
            )
            .await
        {
            warn!(
                "[qc-15] Receipt for tx {} does not commit to payload {}",
                short(&proof.tx_hash),
                short(&payload)
            );
            return Err(BridgeError::InvalidProof);
        }
        if !verify_merkle_proof(&proof.tx_hash, &proof.merkle_path, &proof.receipt_root) {
            warn!("[qc-15] Merkle proof failed for tx {}", short(&proof.tx_hash));
            return Err(BridgeError::InvalidProof);
        }

        debug!("[qc-15] Proof {} verified", short(&proof_hash));
        Ok(proof_hash)
    }
}

#[async_trait]
impl<A, C> BridgeApi for BridgeEngine<A, C>
where
    A: AssetLedger + 'static,
    C: Clock + 'static,
{
    async fn lock(&self, request: LockRequest) -> BridgeResult<Hash> {
        let _gate = self.write_gate.lock().await;
        self.ensure_not_paused()?;
        invariant_positive_amount(request.amount)?;
        self.chains.read().ensure_supported(request.target_chain)?;

        self.escrow(&request.asset, &request.sender, request.amount)
            .await?;

        let timestamp = self.clock.now();
        let block_height = self.clock.block_height();
        let inserted = {
            let mut state = self.state.write();
            let nonce = state.next_nonce();
            let record = LockRecord {
                lock_id: derive_lock_id(
                    &request.sender,
                    request.amount,
                    request.target_chain,
                    timestamp,
                    nonce,
                ),
                sender: request.sender,
                amount: request.amount,
                asset: request.asset,
                target_chain: request.target_chain,
                recipient: request.recipient,
                created_at: timestamp,
                block_height,
                status: LockStatus::Pending,
            };
            state.insert_lock(record.clone()).map(|()| record)
        };
        let record = match inserted {
            Ok(record) => record,
            Err(err) => {
                self.return_escrow(&request.asset, &request.sender, request.amount)
                    .await;
                return Err(err);
            }
        };

        info!(
            "[qc-15] Locked {} as {} for {} (sender {})",
            record.amount,
            short(&record.lock_id),
            record.target_chain,
            short(&record.sender)
        );
        self.events.emit(BridgeEvent::Locked {
            lock_id: record.lock_id,
            sender: record.sender,
            asset: record.asset,
            amount: record.amount,
            target_chain: record.target_chain,
            recipient: record.recipient,
            timestamp,
            block_height,
        });
        Ok(record.lock_id)
    }

    async fn mint(&self, caller: Address, proof: BridgeProof) -> BridgeResult<Amount> {
        let _gate = self.write_gate.lock().await;
        self.ensure_not_paused()?;
        let proof_hash = self.verify_release(&proof).await?;

        let fee_bps = self.state.read().fee_bps();
        let (net, fee) = split_fee(proof.amount, fee_bps)?;
        // The fee stays in custody and becomes owed to the pool.
        self.ensure_free_reserve(&proof.asset, proof.amount).await?;

        self.state.write().record_mint(
            proof_hash,
            proof.source_chain,
            proof.lock_id,
            proof.asset,
            fee,
        )?;

        if !self
            .ledger
            .transfer(&proof.asset, &proof.recipient, net)
            .await
        {
            self.state.write().revert_mint(
                &proof_hash,
                proof.source_chain,
                &proof.lock_id,
                proof.asset,
                fee,
            );
            warn!(
                "[qc-15] Mint payout failed, proof {} released",
                short(&proof_hash)
            );
            return Err(BridgeError::TransferFailed { operation: "mint" });
        }

        info!(
            "[qc-15] Minted {} (fee {}) to {} for lock {} from {}",
            net,
            fee,
            short(&proof.recipient),
            short(&proof.lock_id),
            proof.source_chain
        );
        self.events.emit(BridgeEvent::Minted {
            proof_hash,
            source_chain: proof.source_chain,
            lock_id: proof.lock_id,
            recipient: proof.recipient,
            asset: proof.asset,
            amount: net,
            fee,
            actor: caller,
        });
        Ok(net)
    }

    async fn burn(&self, request: BurnRequest) -> BridgeResult<Hash> {
        let _gate = self.write_gate.lock().await;
        self.ensure_not_paused()?;
        invariant_positive_amount(request.amount)?;
        self.chains.read().ensure_supported(request.target_chain)?;

        let timestamp = self.clock.now();
        let block_height = self.clock.block_height();
        let record = {
            let mut state = self.state.write();
            let nonce = state.next_nonce();
            let record = BurnRecord {
                burn_id: derive_burn_id(
                    &request.sender,
                    request.amount,
                    request.target_chain,
                    timestamp,
                    nonce,
                ),
                sender: request.sender,
                amount: request.amount,
                asset: request.asset,
                target_chain: request.target_chain,
                recipient: request.recipient,
                redeems_lock_id: request.redeems_lock_id,
                created_at: timestamp,
                block_height,
            };
            state.insert_burn(record.clone());
            record
        };

        info!(
            "[qc-15] Burned {} as {} toward {} (redeems {})",
            record.amount,
            short(&record.burn_id),
            record.target_chain,
            short(&record.redeems_lock_id)
        );
        self.events.emit(BridgeEvent::Burned {
            burn_id: record.burn_id,
            sender: record.sender,
            asset: record.asset,
            amount: record.amount,
            target_chain: record.target_chain,
            recipient: record.recipient,
            redeems_lock_id: record.redeems_lock_id,
            timestamp,
            block_height,
        });
        Ok(record.burn_id)
    }

    async fn unlock(&self, caller: Address, proof: BridgeProof) -> BridgeResult<Amount> {
        let _gate = self.write_gate.lock().await;
        self.ensure_not_paused()?;
        let proof_hash = self.verify_release(&proof).await?;

        let lock = self
            .state
            .read()
            .lock(&proof.lock_id)
            .cloned()
            .ok_or(BridgeError::LockNotFound(proof.lock_id))?;
        ensure_proof_matches_lock(&lock, &proof)?;

        let status = if proof.recipient == lock.sender {
            LockStatus::Refunded
        } else {
            LockStatus::Claimed
        };
        let fee_bps = self.state.read().fee_bps();
        let (net, fee) = split_fee(lock.amount, fee_bps)?;

        self.state.write().record_unlock(
            proof_hash,
            proof.source_chain,
            proof.lock_id,
            status,
            fee,
        )?;

        if !self
            .ledger
            .transfer(&lock.asset, &proof.recipient, net)
            .await
        {
            self.state.write().revert_unlock(
                &proof_hash,
                proof.source_chain,
                &proof.lock_id,
                fee,
            );
            warn!(
                "[qc-15] Unlock payout failed, lock {} reopened",
                short(&proof.lock_id)
            );
            return Err(BridgeError::TransferFailed {
                operation: "unlock",
            });
        }

        info!(
            "[qc-15] Unlocked {} (fee {}) from lock {} to {} ({:?})",
            net,
            fee,
            short(&proof.lock_id),
            short(&proof.recipient),
            status
        );
        self.events.emit(BridgeEvent::Unlocked {
            proof_hash,
            source_chain: proof.source_chain,
            lock_id: proof.lock_id,
            recipient: proof.recipient,
            asset: lock.asset,
            amount: net,
            fee,
            actor: caller,
        });
        Ok(net)
    }

    async fn create_htlc(&self, request: HtlcRequest) -> BridgeResult<Hash> {
        let _gate = self.write_gate.lock().await;
        self.ensure_not_paused()?;
        invariant_positive_amount(request.amount)?;

        let now = self.clock.now();
        invariant_time_lock_in_future(
            request.time_lock,
            now,
            self.config.min_htlc_duration_secs,
        )?;
        let unrevealed = self
            .state
            .read()
            .replay()
            .ensure_preimage_unrevealed(&request.hash_lock);
        if let Err(err) = unrevealed {
            warn!(
                "[qc-15] Hash lock {} already revealed",
                short(&request.hash_lock)
            );
            return Err(err);
        }

        self.escrow(&request.asset, &request.sender, request.amount)
            .await?;

        let inserted = {
            let mut state = self.state.write();
            let nonce = state.next_nonce();
            let record = HtlcRecord {
                htlc_id: derive_htlc_id(
                    &request.sender,
                    &request.recipient,
                    &request.hash_lock,
                    now,
                    nonce,
                ),
                sender: request.sender,
                recipient: request.recipient,
                amount: request.amount,
                asset: request.asset,
                hash_lock: request.hash_lock,
                time_lock: request.time_lock,
                state: HtlcState::Created,
                preimage: None,
                created_at: now,
            };
            state.insert_htlc(record.clone()).map(|()| record)
        };
        let record = match inserted {
            Ok(record) => record,
            Err(err) => {
                self.return_escrow(&request.asset, &request.sender, request.amount)
                    .await;
                return Err(err);
            }
        };

        info!(
            "[qc-15] Created HTLC {}: {} to {}, expires {}",
            short(&record.htlc_id),
            record.amount,
            short(&record.recipient),
            record.time_lock
        );
        self.events.emit(BridgeEvent::HtlcCreated {
            htlc_id: record.htlc_id,
            sender: record.sender,
            recipient: record.recipient,
            asset: record.asset,
            amount: record.amount,
            hash_lock: record.hash_lock,
            time_lock: record.time_lock,
        });
        Ok(record.htlc_id)
    }

    async fn claim_htlc(
        &self,
        caller: Address,
        htlc_id: Hash,
        preimage: Secret,
    ) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        let now = self.clock.now();

        let claimed = self.state.write().record_htlc_claim(&htlc_id, preimage, now);
        let settled = claimed.map_err(|err| {
            warn!("[qc-15] Claim of HTLC {} rejected: {}", short(&htlc_id), err);
            err
        })?;

        if !self
            .ledger
            .transfer(&settled.asset, &settled.recipient, settled.amount)
            .await
        {
            self.state.write().revert_htlc_claim(&htlc_id);
            warn!("[qc-15] Claim payout failed, HTLC {} reopened", short(&htlc_id));
            return Err(BridgeError::TransferFailed {
                operation: "claim_htlc",
            });
        }

        info!(
            "[qc-15] Claimed HTLC {}: {} to {}",
            short(&htlc_id),
            settled.amount,
            short(&settled.recipient)
        );
        self.events.emit(BridgeEvent::HtlcClaimed {
            htlc_id,
            recipient: settled.recipient,
            preimage,
            actor: caller,
        });
        Ok(())
    }

    async fn refund_htlc(&self, caller: Address, htlc_id: Hash) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        let now = self.clock.now();

        let refunded = self.state.write().record_htlc_refund(&htlc_id, now);
        let settled = refunded.map_err(|err| {
            warn!("[qc-15] Refund of HTLC {} rejected: {}", short(&htlc_id), err);
            err
        })?;

        if !self
            .ledger
            .transfer(&settled.asset, &settled.sender, settled.amount)
            .await
        {
            self.state.write().revert_htlc_refund(&htlc_id);
            warn!("[qc-15] Refund payout failed, HTLC {} reopened", short(&htlc_id));
            return Err(BridgeError::TransferFailed {
                operation: "refund_htlc",
            });
        }

        info!(
            "[qc-15] Refunded HTLC {}: {} to {}",
            short(&htlc_id),
            settled.amount,
            short(&settled.sender)
        );
        self.events.emit(BridgeEvent::HtlcRefunded {
            htlc_id,
            sender: settled.sender,
            actor: caller,
        });
        Ok(())
    }

    async fn add_supported_chain(
        &self,
        caller: Address,
        chain_id: ChainId,
        light_client: Arc<dyn LightClient>,
    ) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        self.ensure_admin(&caller)?;

        let is_new = self.chains.write().add_chain(chain_id, light_client);
        if is_new {
            info!("[qc-15] Added {}", chain_id);
        } else {
            info!("[qc-15] Replaced light client of {}", chain_id);
        }
        self.events.emit(BridgeEvent::ChainAdded {
            chain_id,
            actor: caller,
        });
        Ok(())
    }

    async fn set_chain_supported(
        &self,
        caller: Address,
        chain_id: ChainId,
        supported: bool,
    ) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        self.ensure_admin(&caller)?;

        self.chains.write().set_supported(chain_id, supported)?;
        info!("[qc-15] {} supported: {}", chain_id, supported);
        self.events.emit(BridgeEvent::ChainStatusChanged {
            chain_id,
            supported,
            actor: caller,
        });
        Ok(())
    }

    async fn pause(&self, caller: Address) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        self.ensure_admin(&caller)?;

        let was_paused = self.state.write().set_paused(true);
        info!("[qc-15] Paused by {} (was paused: {})", short(&caller), was_paused);
        self.events.emit(BridgeEvent::Paused { actor: caller });
        Ok(())
    }

    async fn unpause(&self, caller: Address) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        self.ensure_admin(&caller)?;

        let was_paused = self.state.write().set_paused(false);
        info!("[qc-15] Unpaused by {} (was paused: {})", short(&caller), was_paused);
        self.events.emit(BridgeEvent::Unpaused { actor: caller });
        Ok(())
    }

    async fn set_bridge_fee(&self, caller: Address, fee_bps: u64) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        self.ensure_admin(&caller)?;
        invariant_fee_bound(fee_bps, self.config.max_fee_bps)?;

        let old_bps = self.state.write().set_fee_bps(fee_bps);
        info!("[qc-15] Fee {} -> {} bps", old_bps, fee_bps);
        self.events.emit(BridgeEvent::FeeUpdated {
            old_bps,
            new_bps: fee_bps,
            actor: caller,
        });
        Ok(())
    }

    async fn withdraw_fees(
        &self,
        caller: Address,
        asset: AssetId,
        to: Address,
        amount: Amount,
    ) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        self.ensure_admin(&caller)?;
        invariant_positive_amount(amount)?;

        self.state.write().debit_fees(asset, amount)?;
        let paid = match self.ensure_free_reserve(&asset, amount).await {
            Ok(()) => self.ledger.transfer(&asset, &to, amount).await,
            Err(err) => {
                self.restore_fees(asset, amount);
                return Err(err);
            }
        };
        if !paid {
            self.restore_fees(asset, amount);
            return Err(BridgeError::TransferFailed {
                operation: "withdraw_fees",
            });
        }

        info!("[qc-15] Withdrew {} fees to {}", amount, short(&to));
        self.events.emit(BridgeEvent::FeesWithdrawn {
            asset,
            to,
            amount,
            actor: caller,
        });
        Ok(())
    }

    async fn consume_authorization(&self, caller: Address, auth_hash: Hash) -> BridgeResult<()> {
        let _gate = self.write_gate.lock().await;
        self.ensure_admin(&caller)?;

        self.state
            .write()
            .replay_mut()
            .consume_authorization(auth_hash)?;
        debug!("[qc-15] Authorization {} consumed", short(&auth_hash));
        Ok(())
    }

    fn get_lock_details(&self, lock_id: &Hash) -> Option<LockRecord> {
        self.state.read().lock(lock_id).cloned()
    }

    fn get_burn_details(&self, burn_id: &Hash) -> Option<BurnRecord> {
        self.state.read().burn(burn_id).cloned()
    }

    fn get_htlc_details(&self, htlc_id: &Hash) -> Option<HtlcRecord> {
        self.state.read().htlc(htlc_id).cloned()
    }

    fn get_bridge_balance(&self, asset: &AssetId) -> Amount {
        self.state.read().custody(asset)
    }

    fn get_htlc_escrow(&self, asset: &AssetId) -> Amount {
        self.state.read().htlc_escrow(asset)
    }

    fn get_collected_fees(&self, asset: &AssetId) -> Amount {
        self.state.read().fees(asset)
    }

    fn is_proof_used(&self, proof_hash: &Hash) -> bool {
        self.state.read().replay().is_proof_used(proof_hash)
    }

    fn is_preimage_used(&self, hash_lock: &Hash) -> bool {
        self.state.read().replay().is_preimage_used(hash_lock)
    }

    fn is_authorization_used(&self, auth_hash: &Hash) -> bool {
        self.state.read().replay().is_authorization_used(auth_hash)
    }

    fn is_paused(&self) -> bool {
        self.state.read().is_paused()
    }

    fn bridge_fee_bps(&self) -> u64 {
        self.state.read().fee_bps()
    }

    fn is_chain_supported(&self, chain_id: ChainId) -> bool {
        self.chains.read().is_supported(chain_id)
    }

    fn supported_chains(&self) -> Vec<ChainId> {
        self.chains.read().supported_chains()
    }

    fn consumed_proof_count(&self) -> usize {
        self.state.read().replay().consumed_proof_count()
    }
}

/// An unlock proof must describe the local lock it releases.
fn ensure_proof_matches_lock(lock: &LockRecord, proof: &BridgeProof) -> BridgeResult<()> {
    let reason = if lock.asset != proof.asset {
        "asset differs".to_string()
    } else if lock.amount != proof.amount {
        format!("amount {} != locked {}", proof.amount, lock.amount)
    } else if lock.target_chain != proof.source_chain {
        format!(
            "proof from {}, lock targets {}",
            proof.source_chain, lock.target_chain
        )
    } else {
        return Ok(());
    };
    Err(BridgeError::ProofMismatch {
        lock_id: lock.lock_id,
        reason,
    })
}

/// First four bytes as hex, for logs.
fn short(bytes: &[u8]) -> String {
    hex::encode(&bytes[..bytes.len().min(4)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        HeaderLightClient, InMemoryAssetLedger, InMemoryEventLog, ManualClock, StaticAdmins,
    };
    use crate::domain::ForeignAddress;

    const ADMIN: Address = [0xADu8; 20];
    const ALICE: Address = [0xA1u8; 20];
    const ASSET: AssetId = [0x11u8; 20];

    type Engine = BridgeEngine<InMemoryAssetLedger, ManualClock>;

    fn setup() -> (Engine, Arc<InMemoryAssetLedger>, Arc<InMemoryEventLog>) {
        let config = BridgeConfig::for_testing(ChainId(1));
        let ledger = Arc::new(InMemoryAssetLedger::new(config.custody_account));
        let events = Arc::new(InMemoryEventLog::new());
        let engine = BridgeEngine::new(
            config,
            ledger.clone(),
            Arc::new(ManualClock::new(1_000)),
            events.clone(),
            Arc::new(StaticAdmins::single(ADMIN)),
        )
        .unwrap();
        (engine, ledger, events)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = BridgeConfig {
            fee_bps: 2000,
            ..BridgeConfig::default()
        };
        let result = BridgeEngine::new(
            config.clone(),
            Arc::new(InMemoryAssetLedger::new(config.custody_account)),
            Arc::new(ManualClock::default()),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(StaticAdmins::single(ADMIN)),
        );
        assert!(matches!(result, Err(BridgeError::FeeTooHigh { .. })));
    }

    #[test]
    fn test_with_store_restores_state() {
        let mut store = BridgeStore::new(25);
        store.next_nonce();
        store.set_paused(true);
        let config = BridgeConfig::default();
        let engine = BridgeEngine::with_store(
            config.clone(),
            store,
            Arc::new(InMemoryAssetLedger::new(config.custody_account)),
            Arc::new(ManualClock::default()),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(StaticAdmins::single(ADMIN)),
        )
        .unwrap();
        assert!(engine.is_paused());
        assert_eq!(engine.bridge_fee_bps(), 25);
        assert_eq!(engine.snapshot().nonce(), 1);
    }

    #[tokio::test]
    async fn test_withdraw_fees_needs_backing_reserve() {
        let mut store = BridgeStore::new(10);
        store.credit_fees(ASSET, 50).unwrap();
        let config = BridgeConfig::for_testing(ChainId(1));
        let custody = config.custody_account;
        let ledger = Arc::new(InMemoryAssetLedger::new(custody));
        let engine = BridgeEngine::with_store(
            config,
            store,
            ledger.clone(),
            Arc::new(ManualClock::default()),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(StaticAdmins::single(ADMIN)),
        )
        .unwrap();

        let err = engine
            .withdraw_fees(ADMIN, ASSET, ALICE, 50)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InsufficientReserve {
                available: 0,
                required: 50,
                ..
            }
        ));
        assert_eq!(engine.get_collected_fees(&ASSET), 50);

        ledger.mint_to(ASSET, custody, 50);
        engine.withdraw_fees(ADMIN, ASSET, ALICE, 50).await.unwrap();
        assert_eq!(ledger.balance(&ASSET, &ALICE), 50);
        assert_eq!(engine.get_collected_fees(&ASSET), 0);
    }

    #[tokio::test]
    async fn test_admin_ops_require_admin() {
        let (engine, _, events) = setup();
        assert!(matches!(
            engine.pause(ALICE).await,
            Err(BridgeError::Unauthorized(_))
        ));
        assert!(matches!(
            engine
                .add_supported_chain(ALICE, ChainId(2), Arc::new(HeaderLightClient::default()))
                .await,
            Err(BridgeError::Unauthorized(_))
        ));
        assert!(events.is_empty());

        engine.pause(ADMIN).await.unwrap();
        assert!(engine.is_paused());
        assert_eq!(events.named("Paused").len(), 1);
    }

    #[tokio::test]
    async fn test_fee_bounded() {
        let (engine, _, _) = setup();
        engine.set_bridge_fee(ADMIN, 1000).await.unwrap();
        assert!(matches!(
            engine.set_bridge_fee(ADMIN, 1001).await,
            Err(BridgeError::FeeTooHigh { bps: 1001, max: 1000 })
        ));
        assert_eq!(engine.bridge_fee_bps(), 1000);
    }

    #[tokio::test]
    async fn test_lock_rejects_unsupported_chain_before_escrow() {
        let (engine, ledger, _) = setup();
        ledger.mint_to(ASSET, ALICE, 100);
        ledger.approve(ASSET, ALICE, 100);

        let result = engine
            .lock(LockRequest {
                sender: ALICE,
                asset: ASSET,
                amount: 100,
                target_chain: ChainId(9),
                recipient: ForeignAddress::new(vec![1, 2, 3]),
            })
            .await;
        assert!(matches!(result, Err(BridgeError::ChainNotSupported(ChainId(9)))));
        assert_eq!(ledger.balance(&ASSET, &ALICE), 100);
    }

    #[tokio::test]
    async fn test_disabled_chain_keeps_light_client() {
        let (engine, _, events) = setup();
        engine
            .add_supported_chain(ADMIN, ChainId(2), Arc::new(HeaderLightClient::default()))
            .await
            .unwrap();
        engine
            .set_chain_supported(ADMIN, ChainId(2), false)
            .await
            .unwrap();
        assert!(!engine.is_chain_supported(ChainId(2)));
        engine
            .set_chain_supported(ADMIN, ChainId(2), true)
            .await
            .unwrap();
        assert_eq!(engine.supported_chains(), vec![ChainId(2)]);
        assert_eq!(events.named("ChainStatusChanged").len(), 2);
    }

    #[tokio::test]
    async fn test_authorization_consumed_once() {
        let (engine, _, _) = setup();
        engine.consume_authorization(ADMIN, [3u8; 32]).await.unwrap();
        assert!(engine.is_authorization_used(&[3u8; 32]));
        assert!(matches!(
            engine.consume_authorization(ADMIN, [3u8; 32]).await,
            Err(BridgeError::AuthorizationAlreadyUsed(_))
        ));
    }

    #[test]
    fn test_proof_must_match_lock() {
        let lock = LockRecord {
            lock_id: [1u8; 32],
            sender: ALICE,
            amount: 100,
            asset: ASSET,
            target_chain: ChainId(2),
            recipient: ForeignAddress::new(vec![7]),
            created_at: 0,
            block_height: 0,
            status: LockStatus::Pending,
        };
        let mut proof = BridgeProof {
            source_chain: ChainId(2),
            target_chain: ChainId(1),
            lock_id: [1u8; 32],
            amount: 100,
            recipient: ALICE,
            asset: ASSET,
            block_number: 1,
            block_hash: [0u8; 32],
            tx_hash: [0u8; 32],
            receipt_root: [0u8; 32],
            merkle_path: vec![],
            receipt_proof: vec![],
        };
        assert!(ensure_proof_matches_lock(&lock, &proof).is_ok());
        proof.amount = 99;
        assert!(matches!(
            ensure_proof_matches_lock(&lock, &proof),
            Err(BridgeError::ProofMismatch { .. })
        ));
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(short(&[0xABu8; 32]), "abababab");
    }
}
