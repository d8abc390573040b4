//! Vitals aggregation and status classification.
//!
//! This module owns the shared raw-sample store, the threshold tables that turn
//! numeric measurements into status labels, and the aggregator that recomputes a
//! complete classified snapshot from the latest samples.

pub mod aggregator;
pub mod bus;
pub mod data;
pub mod status;
pub mod store;
pub mod traits;

// Re-export commonly used items
pub use aggregator::{AggregatorConfig, VitalsAggregator};
pub use bus::VitalsBus;
pub use data::{BoardId, BoardSample, PulseSample, Reading, RemoteSnapshot, VitalsSnapshot};
pub use store::SampleStore;
pub use traits::{VitalsMonitor, VitalsProvider};
