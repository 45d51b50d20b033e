//! Clock Adapters
//!
//! `SystemClock` for deployments, `ManualClock` for tests.

use crate::ports::outbound::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock. Block height is derived from a fixed block time.
pub struct SystemClock {
    genesis_time: u64,
    block_time_secs: u64,
}

impl SystemClock {
    /// Create a clock for a chain started at `genesis_time`.
    pub fn new(genesis_time: u64, block_time_secs: u64) -> Self {
        Self {
            genesis_time,
            block_time_secs: block_time_secs.max(1),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn block_height(&self) -> u64 {
        self.now().saturating_sub(self.genesis_time) / self.block_time_secs
    }
}

/// Manually driven clock.
pub struct ManualClock {
    time: AtomicU64,
    height: AtomicU64,
}

impl ManualClock {
    /// Start at `time`, height 0.
    pub fn new(time: u64) -> Self {
        Self {
            time: AtomicU64::new(time),
            height: AtomicU64::new(0),
        }
    }

    /// Set current time.
    pub fn set_time(&self, time: u64) {
        self.time.store(time, Ordering::SeqCst);
    }

    /// Advance time and mine one block.
    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
        self.height.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.time.load(Ordering::SeqCst)
    }

    fn block_height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }
}
