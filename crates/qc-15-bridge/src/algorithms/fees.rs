//! # Bridge Fees
//!
//! Fees are `floor(amount * bps / 10000)` and stay in the fee pool.

use crate::domain::{Amount, BridgeError, BridgeResult, BPS_DENOMINATOR};

/// Fee for `amount` at `fee_bps`, rounded down.
pub fn calculate_fee(amount: Amount, fee_bps: u64) -> BridgeResult<Amount> {
    amount
        .checked_mul(fee_bps as u128)
        .map(|scaled| scaled / BPS_DENOMINATOR)
        .ok_or(BridgeError::AmountOverflow)
}

/// `(net, fee)` split of `amount`.
pub fn split_fee(amount: Amount, fee_bps: u64) -> BridgeResult<(Amount, Amount)> {
    let fee = calculate_fee(amount, fee_bps)?;
    let net = amount.checked_sub(fee).ok_or(BridgeError::AmountOverflow)?;
    Ok((net, fee))
}
