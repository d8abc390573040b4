//! Broadcast fan-out of classified snapshots to downstream consumers.

use crate::vitals::data::VitalsSnapshot;
use tokio::sync::broadcast;
use tracing::debug;

/// Fan-out channel carrying each aggregation pass to any number of consumers
/// (display layer, loggers). Slow consumers miss snapshots rather than applying
/// backpressure to the aggregation loop.
#[derive(Debug, Clone)]
pub struct VitalsBus {
    tx: broadcast::Sender<VitalsSnapshot>,
}

impl VitalsBus {
    /// Create a bus retaining up to `capacity` undelivered snapshots per consumer.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe a new consumer.
    pub fn subscribe(&self) -> broadcast::Receiver<VitalsSnapshot> {
        self.tx.subscribe()
    }

    /// Publish a snapshot to all current consumers; returns how many received it.
    pub fn publish(&self, snapshot: VitalsSnapshot) -> usize {
        if self.tx.receiver_count() == 0 {
            return 0;
        }
        match self.tx.send(snapshot) {
            Ok(receivers) => {
                debug!("Broadcasted vitals snapshot to {} consumers", receivers);
                receivers
            }
            Err(_) => 0,
        }
    }

    /// Number of currently subscribed consumers.
    pub fn consumer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for VitalsBus {
    fn default() -> Self {
        Self::new(crate::DEFAULT_BUS_CAPACITY)
    }
}
