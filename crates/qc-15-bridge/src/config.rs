//! # Bridge Configuration
//!
//! Static parameters of one bridge engine instance.

use crate::domain::{invariant_fee_bound, Address, BridgeError, BridgeResult, ChainId, MAX_FEE_BPS};
use serde::{Deserialize, Serialize};

/// Bridge configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Chain this engine runs on. Mint/unlock proofs must target it.
    pub local_chain: ChainId,

    /// Custody account in the asset ledger.
    pub custody_account: Address,

    /// Initial bridge fee in basis points.
    pub fee_bps: u64,

    /// Upper bound for `set_bridge_fee`; at most [`MAX_FEE_BPS`].
    pub max_fee_bps: u64,

    /// Minimum HTLC lifetime; `time_lock` must be at least `now + this`.
    pub min_htlc_duration_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            local_chain: ChainId(1),
            custody_account: [0xB1u8; 20],
            fee_bps: 10,
            max_fee_bps: MAX_FEE_BPS,
            min_htlc_duration_secs: 1,
        }
    }
}

impl BridgeConfig {
    /// Create a config for testing.
    pub fn for_testing(local_chain: ChainId) -> Self {
        Self {
            local_chain,
            ..Self::default()
        }
    }

    /// Reject inconsistent fee bounds.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.max_fee_bps > MAX_FEE_BPS {
            return Err(BridgeError::InvalidConfig(format!(
                "max_fee_bps {} above hard cap {}",
                self.max_fee_bps, MAX_FEE_BPS
            )));
        }
        invariant_fee_bound(self.fee_bps, self.max_fee_bps)
    }
}
