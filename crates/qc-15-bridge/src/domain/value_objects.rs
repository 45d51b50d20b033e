//! # Domain Value Objects
//!
//! Immutable value types shared by the bridge ledgers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Local account address (20-byte).
pub type Address = [u8; 20];

/// Handle of a bridged asset in the external asset ledger.
pub type AssetId = Address;

/// HTLC preimage (32-byte).
pub type Secret = [u8; 32];

/// Token amount. Never negative; arithmetic is checked.
pub type Amount = u128;

/// Numeric chain identifier.
///
/// Chains are registered at runtime, so unlike a closed enum any id may
/// appear here; whether it is usable is decided by the chain registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Big-endian bytes, used when hashing identifiers.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain-{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Recipient on a foreign chain.
///
/// Opaque: its format depends on the target chain and is never validated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignAddress(pub Vec<u8>);

impl ForeignAddress {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Interpret as a local address, if it has the local width.
    pub fn to_local(&self) -> Option<Address> {
        <Address>::try_from(self.0.as_slice()).ok()
    }
}

impl From<Address> for ForeignAddress {
    fn from(addr: Address) -> Self {
        Self(addr.to_vec())
    }
}

/// Settlement status of a lock record.
///
/// `Pending` is also a valid terminal state: a lock whose counterpart
/// proof never arrives stays pending forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStatus {
    /// Locked, custody held.
    #[default]
    Pending,
    /// Released to a third party by a proof-gated unlock.
    Claimed,
    /// Released back to the original sender by a proof-gated unlock.
    Refunded,
}

impl LockStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: LockStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Claimed) | (Self::Pending, Self::Refunded)
        )
    }

    /// Check if terminal (settled) state.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Claimed | Self::Refunded)
    }
}

/// HTLC state machine: `Created -> Claimed` or `Created -> Refunded`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtlcState {
    /// Funds escrowed, awaiting claim or expiry.
    #[default]
    Created,
    /// Preimage revealed before expiry, funds sent to recipient.
    Claimed,
    /// Expired, funds returned to sender.
    Refunded,
}

impl HtlcState {
    /// Check if transition is valid at `current_time` for an HTLC expiring at `time_lock`.
    ///
    /// Claim window is `[.., time_lock)`, refund window is `[time_lock, ..)`.
    pub fn can_transition_to(&self, next: HtlcState, current_time: u64, time_lock: u64) -> bool {
        match (self, next) {
            (Self::Created, Self::Claimed) => current_time < time_lock,
            (Self::Created, Self::Refunded) => current_time >= time_lock,
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed | Self::Refunded)
    }
}
