//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory and system implementations of the outbound ports.

mod asset_ledger;
mod authority;
mod clock;
mod event_log;
mod light_client;

pub use asset_ledger::InMemoryAssetLedger;
pub use authority::StaticAdmins;
pub use clock::{ManualClock, SystemClock};
pub use event_log::{InMemoryEventLog, TracingEventSink};
pub use light_client::{AttestedHeader, HeaderLightClient};
