//! # Chain Registry
//!
//! Supported counterpart chains and their light-client handles.
//!
//! Generic over the handle type so the registry can be exercised without a
//! real light client.

use super::errors::{BridgeError, BridgeResult};
use super::value_objects::ChainId;
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct ChainEntry<H> {
    light_client: H,
    supported: bool,
}

/// Chain id -> light-client handle plus supported flag.
#[derive(Clone, Debug)]
pub struct ChainRegistry<H> {
    chains: HashMap<ChainId, ChainEntry<H>>,
}

impl<H> Default for ChainRegistry<H> {
    fn default() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }
}

impl<H: Clone> ChainRegistry<H> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chain, or replace its light client. The chain is marked supported.
    ///
    /// Returns `true` if the chain was not registered before.
    pub fn add_chain(&mut self, chain_id: ChainId, light_client: H) -> bool {
        self.chains
            .insert(
                chain_id,
                ChainEntry {
                    light_client,
                    supported: true,
                },
            )
            .is_none()
    }

    /// Enable or disable a registered chain, keeping its handle.
    pub fn set_supported(&mut self, chain_id: ChainId, supported: bool) -> BridgeResult<()> {
        let entry = self
            .chains
            .get_mut(&chain_id)
            .ok_or(BridgeError::ChainNotSupported(chain_id))?;
        entry.supported = supported;
        Ok(())
    }

    /// Registered and enabled.
    pub fn is_supported(&self, chain_id: ChainId) -> bool {
        self.chains
            .get(&chain_id)
            .map(|entry| entry.supported)
            .unwrap_or(false)
    }

    /// Light client of a supported chain.
    pub fn light_client_for(&self, chain_id: ChainId) -> Option<H> {
        self.chains
            .get(&chain_id)
            .filter(|entry| entry.supported)
            .map(|entry| entry.light_client.clone())
    }

    /// Fail fast with `ChainNotSupported`.
    pub fn ensure_supported(&self, chain_id: ChainId) -> BridgeResult<()> {
        if !self.is_supported(chain_id) {
            return Err(BridgeError::ChainNotSupported(chain_id));
        }
        Ok(())
    }

    /// Supported chain ids, sorted.
    pub fn supported_chains(&self) -> Vec<ChainId> {
        let mut chains: Vec<ChainId> = self
            .chains
            .iter()
            .filter(|(_, entry)| entry.supported)
            .map(|(id, _)| *id)
            .collect();
        chains.sort();
        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_chain_unsupported() {
        let registry: ChainRegistry<u32> = ChainRegistry::new();
        assert!(!registry.is_supported(ChainId(1)));
        assert!(registry.light_client_for(ChainId(1)).is_none());
        assert!(matches!(
            registry.ensure_supported(ChainId(1)),
            Err(BridgeError::ChainNotSupported(ChainId(1)))
        ));
    }

    #[test]
    fn test_add_chain_overwrites_handle() {
        let mut registry = ChainRegistry::new();
        assert!(registry.add_chain(ChainId(1), 10u32));
        assert!(!registry.add_chain(ChainId(1), 20u32));
        assert_eq!(registry.light_client_for(ChainId(1)), Some(20));
    }

    #[test]
    fn test_disable_and_reenable() {
        let mut registry = ChainRegistry::new();
        registry.add_chain(ChainId(1), 10u32);
        registry.set_supported(ChainId(1), false).unwrap();
        assert!(!registry.is_supported(ChainId(1)));
        assert!(registry.light_client_for(ChainId(1)).is_none());

        registry.set_supported(ChainId(1), true).unwrap();
        assert_eq!(registry.light_client_for(ChainId(1)), Some(10));
    }

    #[test]
    fn test_set_supported_unknown_chain() {
        let mut registry: ChainRegistry<u32> = ChainRegistry::new();
        assert!(registry.set_supported(ChainId(7), true).is_err());
    }

    #[test]
    fn test_supported_chains_sorted() {
        let mut registry = ChainRegistry::new();
        registry.add_chain(ChainId(3), 0u32);
        registry.add_chain(ChainId(1), 0u32);
        registry.add_chain(ChainId(2), 0u32);
        registry.set_supported(ChainId(2), false).unwrap();
        assert_eq!(registry.supported_chains(), vec![ChainId(1), ChainId(3)]);
    }
}
