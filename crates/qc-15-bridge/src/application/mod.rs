//! # Application Layer
//!
//! The bridge engine service.

pub mod service;

pub use service::BridgeEngine;
