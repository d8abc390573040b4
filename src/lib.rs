//! # Vitals Hub - Biometric Kiosk Core
//!
//! A clean, minimalist Rust crate for the core of a biometric access + vitals
//! kiosk: it pulls raw measurements from remote sensor boards over an
//! unreliable datagram link, aggregates them, and classifies each metric into a
//! discrete status bucket for the display layer to consume.
//!
//! ## Features
//!
//! - **Peer data exchange**: request/response snapshot pulls plus asynchronous
//!   board pushes over UDP, with a tagged wire envelope and a legacy
//!   length-dispatched fallback
//! - **Status classification**: fixed threshold tables for height, weight, BMI,
//!   temperatures, heart rate and SpO2, with a NIL sentinel for invalid input
//! - **Aggregation stream**: periodic classified snapshots with per-source
//!   staleness flags, broadcast to any number of consumers
//! - **Library + Binary**: use as a crate or standalone application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vitals_hub::{
//!     link::{start_link, LinkConfig},
//!     AggregatorConfig, SampleStore, VitalsAggregator, VitalsProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SampleStore::new();
//!     let link = start_link(&LinkConfig::default(), store.clone()).await?;
//!     link.request_snapshot().await?;
//!
//!     let mut aggregator = VitalsAggregator::new(store, AggregatorConfig::default());
//!     let snapshot = aggregator.collect_snapshot().await?;
//!     println!("weight status: {}", snapshot.weight.status);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod link;
pub mod vitals;

// Re-export public API
pub use error::{HubError, Result};
pub use link::{LinkConfig, PeerLink};
pub use vitals::{
    aggregator::{AggregatorConfig, VitalsAggregator},
    bus::VitalsBus,
    data::{BoardId, BoardSample, PulseSample, Reading, RemoteSnapshot, VitalsSnapshot},
    store::SampleStore,
    traits::{VitalsMonitor, VitalsProvider},
};

/// The default aggregation interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// The default bounded wait for a snapshot response in milliseconds
pub const DEFAULT_RESPONSE_WAIT_MS: u64 = 500;

/// The default overhead reference distance the ranging sensors measure from, in meters
pub const DEFAULT_HEIGHT_REF_M: f64 = 2.05;

/// The default staleness window in milliseconds
pub const DEFAULT_STALE_AFTER_MS: u64 = 5_000;

/// The default local link bind address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:47700";

/// The default remote measurement board address
pub const DEFAULT_PEER_ADDR: &str = "127.0.0.1:47701";

/// The default broadcast bus capacity
pub const DEFAULT_BUS_CAPACITY: usize = 100;
