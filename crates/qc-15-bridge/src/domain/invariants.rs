//! # Domain Invariants
//!
//! Business rules checked before any state changes.

use super::errors::{BridgeError, BridgeResult};
use super::value_objects::{Amount, AssetId};

/// Hard cap on the bridge fee (10%).
pub const MAX_FEE_BPS: u64 = 1000;

/// Basis points denominator (10000 = 100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Invariant: value-moving amounts are strictly positive.
pub fn invariant_positive_amount(amount: Amount) -> BridgeResult<()> {
    if amount == 0 {
        return Err(BridgeError::ZeroAmount);
    }
    Ok(())
}

/// Invariant: fee within the configured cap.
pub fn invariant_fee_bound(bps: u64, max_bps: u64) -> BridgeResult<()> {
    if bps > max_bps {
        return Err(BridgeError::FeeTooHigh { bps, max: max_bps });
    }
    Ok(())
}

/// Invariant: HTLC expiry at or after `now + min_duration`, and strictly
/// after `now` even when `min_duration` is zero.
pub fn invariant_time_lock_in_future(
    time_lock: u64,
    now: u64,
    min_duration_secs: u64,
) -> BridgeResult<()> {
    let earliest = now.saturating_add(min_duration_secs.saturating_sub(1));
    if time_lock <= earliest {
        return Err(BridgeError::TimeLockNotInFuture { time_lock, earliest });
    }
    Ok(())
}

/// Invariant: escrow credited exactly the requested amount.
///
/// Fee-on-transfer and rebasing assets fail here.
pub fn invariant_exact_credit(
    balance_before: Amount,
    balance_after: Amount,
    expected: Amount,
) -> BridgeResult<()> {
    let observed = balance_after.saturating_sub(balance_before);
    if observed != expected {
        return Err(BridgeError::BalanceMismatch { expected, observed });
    }
    Ok(())
}

/// Invariant: custody never goes negative.
pub fn invariant_custody_release(
    asset: AssetId,
    available: Amount,
    requested: Amount,
) -> BridgeResult<Amount> {
    available
        .checked_sub(requested)
        .ok_or(BridgeError::CustodyUnderflow {
            asset,
            available,
            requested,
        })
}
