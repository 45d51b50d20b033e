//! # Secure Preimage
//!
//! An HTLC preimage held by the swap initiator before it is revealed.
//! Zeroized on drop and never printed.

use super::value_objects::{Hash, Secret};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Unrevealed preimage.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: Secret,
}

impl SecureSecret {
    /// Wrap preimage bytes.
    pub fn new(bytes: Secret) -> Self {
        Self { inner: bytes }
    }

    /// Copy from a slice; `None` unless exactly 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let inner = Secret::try_from(slice).ok()?;
        Some(Self { inner })
    }

    /// Borrow the bytes. Keep the borrow short.
    pub fn as_bytes(&self) -> &Secret {
        &self.inner
    }

    /// Copy out the bytes, e.g. to reveal them in a claim.
    pub fn expose(&self) -> Secret {
        self.inner
    }

    /// SHA-256 hash lock committing to this preimage.
    pub fn hash_lock(&self) -> Hash {
        crate::algorithms::create_hash_lock(&self.inner)
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureSecret(***)")
    }
}

impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.inner))
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_slice(&bytes).ok_or_else(|| serde::de::Error::custom("invalid preimage length"))
    }
}
