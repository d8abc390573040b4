//! Peer data exchange over an unreliable, connectionless UDP link.
//!
//! This module moves raw measurements between boards: a request/response pull of
//! measurement snapshots from the fixed peer, plus asynchronous pushes of legacy
//! board triplets. Decoded data lands in the shared sample store for the
//! aggregator to classify.

pub mod codec;
pub mod config;
pub mod peer;

// Re-export commonly used items
pub use codec::Frame;
pub use config::LinkConfig;
pub use peer::{start_link, PeerLink, SnapshotSource};
