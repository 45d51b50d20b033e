//! # Domain Errors
//!
//! Error types for the cross-chain bridge.
//!
//! Every variant belongs to exactly one [`ErrorKind`]; callers branch on the
//! kind to decide whether a retry makes sense.

use super::value_objects::{Address, Amount, AssetId, ChainId, Hash};
use thiserror::Error;

/// Error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before any state change. Retry with corrected input.
    Validation,
    /// Proof or preimage already consumed. Permanent for that identifier.
    Replay,
    /// Asset ledger refused or misbehaved. Retry once the ledger is fixed.
    ExternalLedger,
    /// Caller lacks the admin capability. Permanent.
    Authorization,
    /// Record already settled, or bridge paused. Permanent for that call.
    State,
}

/// Bridge error types.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Amount must be strictly positive.
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Chain is not registered or disabled.
    #[error("Chain not supported: {0}")]
    ChainNotSupported(ChainId),

    /// Time lock is not far enough in the future.
    #[error("Time lock {time_lock} must be after {earliest}")]
    TimeLockNotInFuture {
        /// Requested expiry.
        time_lock: u64,
        /// Earliest acceptable expiry (exclusive).
        earliest: u64,
    },

    /// Proof targets another chain.
    #[error("Proof targets {got}, this bridge runs on {expected}")]
    WrongTargetChain {
        /// Local chain.
        expected: ChainId,
        /// Chain named in the proof.
        got: ChainId,
    },

    /// Root not attested by the source chain's light client.
    #[error("Root not attested on {chain} at block {block_number}")]
    RootNotAttested {
        /// Source chain.
        chain: ChainId,
        /// Block the root was claimed for.
        block_number: u64,
    },

    /// Merkle or receipt proof failed.
    #[error("Invalid proof")]
    InvalidProof,

    /// Fee above the configured cap.
    #[error("Fee {bps} bps exceeds maximum {max} bps")]
    FeeTooHigh {
        /// Requested fee.
        bps: u64,
        /// Allowed maximum.
        max: u64,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Lock record unknown.
    #[error("Lock not found: {0:?}")]
    LockNotFound(Hash),

    /// HTLC record unknown.
    #[error("HTLC not found: {0:?}")]
    HtlcNotFound(Hash),

    /// Proof does not match the record it settles.
    #[error("Proof does not match lock {lock_id:?}: {reason}")]
    ProofMismatch {
        /// Local lock.
        lock_id: Hash,
        /// What differed.
        reason: String,
    },

    /// Preimage does not hash to the hash lock.
    #[error("Invalid preimage")]
    InvalidPreimage,

    /// Fee pool too small for the withdrawal.
    #[error("Insufficient fees for {asset:?}: available {available}, requested {requested}")]
    InsufficientFees {
        /// Asset.
        asset: AssetId,
        /// Pool balance.
        available: Amount,
        /// Requested withdrawal.
        requested: Amount,
    },

    /// Amount arithmetic overflowed.
    #[error("Amount overflow")]
    AmountOverflow,

    /// Proof already consumed.
    #[error("Proof already used: {0:?}")]
    ProofAlreadyUsed(Hash),

    /// Foreign lock already released by another proof.
    #[error("Lock {lock_id:?} from {chain} already released")]
    LockAlreadyReleased {
        /// Source chain.
        chain: ChainId,
        /// Foreign lock id.
        lock_id: Hash,
    },

    /// Preimage for this hash lock was already revealed.
    #[error("Preimage already revealed for hash lock {0:?}")]
    PreimageAlreadyUsed(Hash),

    /// Authorization hash already consumed.
    #[error("Authorization already used: {0:?}")]
    AuthorizationAlreadyUsed(Hash),

    /// Asset ledger transfer returned false.
    #[error("Asset ledger rejected {operation}")]
    TransferFailed {
        /// Ledger call that failed.
        operation: &'static str,
    },

    /// Custody balance did not move by the expected amount.
    #[error("Custody balance mismatch: expected +{expected}, observed +{observed}")]
    BalanceMismatch {
        /// Requested amount.
        expected: Amount,
        /// Observed delta.
        observed: Amount,
    },

    /// Release would drive custody below zero.
    #[error("Insufficient custody for {asset:?}: available {available}, requested {requested}")]
    CustodyUnderflow {
        /// Asset.
        asset: AssetId,
        /// Recorded custody.
        available: Amount,
        /// Requested release.
        requested: Amount,
    },

    /// Custody does not hold enough beyond what locks, HTLCs and fees are owed.
    #[error("Insufficient free reserve for {asset:?}: available {available}, required {required}")]
    InsufficientReserve {
        /// Asset.
        asset: AssetId,
        /// Custody balance not owed to records or the fee pool.
        available: Amount,
        /// Payout that was requested.
        required: Amount,
    },

    /// Caller is not an admin.
    #[error("Unauthorized caller: {0:?}")]
    Unauthorized(Address),

    /// Bridge is paused.
    #[error("Bridge is paused")]
    Paused,

    /// Lock record already settled.
    #[error("Lock already settled: {0:?}")]
    LockSettled(Hash),

    /// HTLC already claimed.
    #[error("HTLC already claimed")]
    AlreadyClaimed,

    /// HTLC already refunded.
    #[error("HTLC already refunded")]
    AlreadyRefunded,

    /// Claim attempted at or after expiry.
    #[error("HTLC expired")]
    HtlcExpired,

    /// Refund attempted before expiry.
    #[error("HTLC not expired (cannot refund)")]
    HtlcNotExpired,
}

impl BridgeError {
    /// Taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        use BridgeError::*;
        match self {
            ZeroAmount
            | ChainNotSupported(_)
            | TimeLockNotInFuture { .. }
            | WrongTargetChain { .. }
            | RootNotAttested { .. }
            | InvalidProof
            | FeeTooHigh { .. }
            | InvalidConfig(_)
            | LockNotFound(_)
            | HtlcNotFound(_)
            | ProofMismatch { .. }
            | InvalidPreimage
            | InsufficientFees { .. }
            | AmountOverflow => ErrorKind::Validation,
            ProofAlreadyUsed(_)
            | LockAlreadyReleased { .. }
            | PreimageAlreadyUsed(_)
            | AuthorizationAlreadyUsed(_) => ErrorKind::Replay,
            TransferFailed { .. }
            | BalanceMismatch { .. }
            | CustodyUnderflow { .. }
            | InsufficientReserve { .. } => ErrorKind::ExternalLedger,
            Unauthorized(_) => ErrorKind::Authorization,
            Paused | LockSettled(_) | AlreadyClaimed | AlreadyRefunded | HtlcExpired
            | HtlcNotExpired => ErrorKind::State,
        }
    }

    /// Whether the caller may retry the same operation later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::ExternalLedger
        )
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_not_supported_error() {
        let err = BridgeError::ChainNotSupported(ChainId(137));
        assert!(err.to_string().contains("chain-137"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_replay_errors_not_retryable() {
        let err = BridgeError::ProofAlreadyUsed([1u8; 32]);
        assert_eq!(err.kind(), ErrorKind::Replay);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_ledger_errors_retryable() {
        let err = BridgeError::TransferFailed {
            operation: "transfer_from",
        };
        assert_eq!(err.kind(), ErrorKind::ExternalLedger);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_fee_too_high_message() {
        let err = BridgeError::FeeTooHigh { bps: 1500, max: 1000 };
        assert!(err.to_string().contains("1500"));
    }

    #[test]
    fn test_state_and_auth_kinds() {
        assert_eq!(BridgeError::Paused.kind(), ErrorKind::State);
        assert_eq!(BridgeError::HtlcExpired.kind(), ErrorKind::State);
        assert_eq!(
            BridgeError::Unauthorized([0u8; 20]).kind(),
            ErrorKind::Authorization
        );
    }
}
