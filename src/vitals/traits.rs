//! Traits for vitals collection.

use crate::error::Result;
use crate::vitals::data::VitalsSnapshot;
use futures_util::stream::BoxStream;

/// Trait for producing classified vitals snapshots.
///
/// Implementations read whatever raw state they own, derive computed values and
/// classify every metric in a single pass.
pub trait VitalsProvider {
    /// Run one aggregation pass and return the classified snapshot.
    fn collect_snapshot(
        &mut self,
    ) -> impl std::future::Future<Output = Result<VitalsSnapshot>> + Send;

    /// Start continuous aggregation.
    ///
    /// Returns a stream of snapshots recomputed at the specified interval.
    fn start_stream(
        &mut self,
        interval_ms: u64,
    ) -> impl std::future::Future<Output = Result<BoxStream<'static, VitalsSnapshot>>> + Send;
}

/// High-level trait for running a vitals monitor.
pub trait VitalsMonitor {
    /// Create a new monitor instance with its own store and default tuning.
    fn new() -> Result<Self>
    where
        Self: Sized;

    /// Start aggregating with the default interval.
    fn start_collecting(
        &mut self,
    ) -> impl std::future::Future<Output = Result<BoxStream<'static, VitalsSnapshot>>> + Send;

    /// Start aggregating with a custom interval.
    fn start_collecting_with_interval(
        &mut self,
        interval_ms: u64,
    ) -> impl std::future::Future<Output = Result<BoxStream<'static, VitalsSnapshot>>> + Send;

    /// Get a single snapshot.
    fn get_snapshot(&mut self) -> impl std::future::Future<Output = Result<VitalsSnapshot>> + Send;
}
