//! Shared store for raw sensor input.
//!
//! The store sits between the link receive task (writer) and the aggregation pass
//! (reader). Every write replaces a whole slot under the lock, so a reader can
//! never observe a torn sample.

use crate::vitals::data::{BoardId, BoardSample, PulseSample, RemoteSnapshot, BOARD_COUNT};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
struct Timed<T> {
    value: T,
    at: Instant,
}

impl<T> Timed<T> {
    fn now(value: T) -> Self {
        Self {
            value,
            at: Instant::now(),
        }
    }
}

#[derive(Debug)]
struct StoreInner {
    boards: [Option<Timed<BoardSample>>; BOARD_COUNT],
    remote: Option<Timed<RemoteSnapshot>>,
    pulse: Option<Timed<PulseSample>>,
    /// Bumped on every remote snapshot so a requester can tell a fresh response
    /// from stale data.
    remote_revision: u64,
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            boards: [None; BOARD_COUNT],
            remote: None,
            pulse: None,
            remote_revision: 0,
        }
    }
}

/// A stored value together with how long ago it arrived.
#[derive(Debug, Clone, Copy)]
pub struct SourceReading<T> {
    pub value: T,
    pub age: Duration,
}

/// Everything the aggregation pass needs, captured under a single read lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreInputs {
    boards: [Option<SourceReading<BoardSample>>; BOARD_COUNT],
    pub remote: Option<SourceReading<RemoteSnapshot>>,
    pub pulse: Option<SourceReading<PulseSample>>,
}

impl StoreInputs {
    /// The latest sample from one board slot, if any.
    pub fn board(&self, id: BoardId) -> Option<&SourceReading<BoardSample>> {
        self.boards[id.slot()].as_ref()
    }
}

/// Cloneable handle to the shared raw-sample store.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the sending board's slot with a fresh triplet.
    pub async fn apply_board_sample(&self, sample: BoardSample) {
        let mut inner = self.inner.write().await;
        inner.boards[sample.board.slot()] = Some(Timed::now(sample));
    }

    /// Store a measurement snapshot from the remote board.
    pub async fn apply_remote_snapshot(&self, snapshot: RemoteSnapshot) {
        let mut inner = self.inner.write().await;
        inner.remote = Some(Timed::now(snapshot));
        inner.remote_revision += 1;
    }

    /// Record a reading from the local pulse-oximeter feed.
    pub async fn record_pulse(&self, pulse: PulseSample) {
        let mut inner = self.inner.write().await;
        inner.pulse = Some(Timed::now(pulse));
    }

    /// Revision counter for the remote snapshot slot.
    pub async fn remote_revision(&self) -> u64 {
        self.inner.read().await.remote_revision
    }

    /// Capture a consistent view of all inputs for one aggregation pass.
    pub async fn inputs(&self) -> StoreInputs {
        let inner = self.inner.read().await;
        let now = Instant::now();
        let age_of = |timed: &Timed<BoardSample>| SourceReading {
            value: timed.value,
            age: now.saturating_duration_since(timed.at),
        };

        let mut boards = [None; BOARD_COUNT];
        for (slot, timed) in inner.boards.iter().enumerate() {
            boards[slot] = timed.as_ref().map(age_of);
        }

        StoreInputs {
            boards,
            remote: inner.remote.as_ref().map(|t| SourceReading {
                value: t.value,
                age: now.saturating_duration_since(t.at),
            }),
            pulse: inner.pulse.as_ref().map(|t| SourceReading {
                value: t.value,
                age: now.saturating_duration_since(t.at),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(board: BoardId, a: f64, b: f64, c: f64) -> BoardSample {
        BoardSample { board, a, b, c }
    }

    #[tokio::test]
    async fn test_board_slots_overwrite_in_place() {
        let store = SampleStore::new();
        store
            .apply_board_sample(sample(BoardId::Scale, 60.0, 0.0, 0.0))
            .await;
        store
            .apply_board_sample(sample(BoardId::Scale, 72.5, 0.0, 0.0))
            .await;

        let inputs = store.inputs().await;
        let scale = inputs.board(BoardId::Scale).expect("scale slot populated");
        assert_eq!(scale.value.a, 72.5);
        assert!(inputs.board(BoardId::Thermal).is_none());
        assert!(inputs.board(BoardId::Ranging).is_none());
    }

    #[tokio::test]
    async fn test_remote_revision_increments() {
        let store = SampleStore::new();
        assert_eq!(store.remote_revision().await, 0);

        let snapshot = RemoteSnapshot {
            weight_kg: 70.0,
            height_cm: 175.0,
            bmi: 22.9,
            timestamp: 1,
        };
        store.apply_remote_snapshot(snapshot).await;
        assert_eq!(store.remote_revision().await, 1);
        store.apply_remote_snapshot(snapshot).await;
        assert_eq!(store.remote_revision().await, 2);
    }

    #[tokio::test]
    async fn test_ages_grow_over_time() {
        let store = SampleStore::new();
        store
            .record_pulse(PulseSample {
                heart_rate_bpm: 72.0,
                spo2_percent: 98.0,
            })
            .await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        let inputs = store.inputs().await;
        let pulse = inputs.pulse.expect("pulse recorded");
        assert!(pulse.age >= Duration::from_millis(20));
        assert_eq!(pulse.value.heart_rate_bpm, 72.0);
    }
}
