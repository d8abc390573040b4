//! Vitals aggregation: derive computed values from raw samples and classify them.

use crate::error::Result;
use crate::vitals::data::{
    BoardId, Reading, SourceFreshness, SourceHealth, VitalsSnapshot,
};
use crate::vitals::status::{
    AmbientTempStatus, BmiStatus, BodyTempStatus, HeartRateStatus, HeightStatus, Spo2Status,
    WeightStatus,
};
use crate::vitals::store::{SampleStore, SourceReading};
use crate::vitals::traits::{VitalsMonitor, VitalsProvider};
use futures_util::stream::{self, BoxStream};
use std::time::Duration;
use tokio::time;

/// Subject height derived from a fixed overhead reference distance minus the
/// measured distance down to the subject.
pub fn height_from_distance(height_ref_m: f64, distance_m: f64) -> f64 {
    height_ref_m - distance_m
}

/// Standard BMI. A non-finite or non-positive height cannot produce a valid
/// index, so the result degrades to NaN and classifies as NIL downstream.
pub fn body_mass_index(weight_kg: f64, height_m: f64) -> f64 {
    if !height_m.is_finite() || height_m <= 0.0 {
        return f64::NAN;
    }
    weight_kg / (height_m * height_m)
}

/// Tuning for the aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorConfig {
    /// Overhead reference distance in meters that the ranging sensors measure from
    pub height_ref_m: f64,
    /// How old a source's data may get before its stale flag trips, in milliseconds
    pub stale_after_ms: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            height_ref_m: crate::DEFAULT_HEIGHT_REF_M,
            stale_after_ms: crate::DEFAULT_STALE_AFTER_MS,
        }
    }
}

impl AggregatorConfig {
    /// Set the overhead reference distance.
    pub fn with_height_ref_m(mut self, height_ref_m: f64) -> Self {
        self.height_ref_m = height_ref_m;
        self
    }

    /// Set the staleness window.
    pub fn with_stale_after_ms(mut self, stale_after_ms: u64) -> Self {
        self.stale_after_ms = stale_after_ms;
        self
    }
}

/// Owns the shared sample store and turns its raw contents into classified
/// [`VitalsSnapshot`]s. Pure read-and-classify: each pass recomputes every field
/// from the latest raw samples.
#[derive(Debug, Clone)]
pub struct VitalsAggregator {
    store: SampleStore,
    config: AggregatorConfig,
}

impl VitalsAggregator {
    /// Create an aggregator over an existing store.
    pub fn new(store: SampleStore, config: AggregatorConfig) -> Self {
        Self { store, config }
    }

    /// Handle to the underlying store, for wiring up the link and local feeds.
    pub fn store(&self) -> SampleStore {
        self.store.clone()
    }

    /// Run one aggregation pass over the current store contents.
    pub async fn aggregate(&self) -> VitalsSnapshot {
        let inputs = self.store.inputs().await;
        let scale = inputs.board(BoardId::Scale);
        let thermal = inputs.board(BoardId::Thermal);
        let ranging = inputs.board(BoardId::Ranging);
        let remote = inputs.remote.as_ref();

        // The remote snapshot and the board triplets feed the same weight/laser
        // fields; whichever arrived more recently wins.
        let weight_kg = match (remote, scale) {
            (Some(r), Some(s)) if r.age < s.age => f64::from(r.value.weight_kg),
            (Some(r), None) => f64::from(r.value.weight_kg),
            (_, Some(s)) => s.value.a,
            (None, None) => f64::NAN,
        };
        let remote_wins_laser = match (remote, ranging) {
            (Some(r), Some(g)) => r.age < g.age,
            (Some(_), None) => true,
            _ => false,
        };
        let height_laser_m = if remote_wins_laser {
            remote.map_or(f64::NAN, |r| f64::from(r.value.height_cm) / 100.0)
        } else {
            ranging.map_or(f64::NAN, |g| {
                height_from_distance(self.config.height_ref_m, g.value.b)
            })
        };
        let bmi_laser = if remote_wins_laser {
            remote.map_or(f64::NAN, |r| f64::from(r.value.bmi))
        } else {
            body_mass_index(weight_kg, height_laser_m)
        };

        let height_sonar_m = ranging.map_or(f64::NAN, |g| {
            height_from_distance(self.config.height_ref_m, g.value.a)
        });
        let bmi_sonar = body_mass_index(weight_kg, height_sonar_m);
        let lift_height_m = ranging.map_or(f64::NAN, |g| g.value.c);

        let body_temp_c = thermal.map_or(f64::NAN, |t| t.value.a);
        let ambient_temp_c = thermal.map_or(f64::NAN, |t| t.value.b);

        let (heart_rate_bpm, spo2_percent) = inputs
            .pulse
            .map_or((f64::NAN, f64::NAN), |p| {
                (p.value.heart_rate_bpm, p.value.spo2_percent)
            });

        VitalsSnapshot {
            weight: Reading::new(weight_kg, WeightStatus::classify(weight_kg)),
            body_temp: Reading::new(body_temp_c, BodyTempStatus::classify(body_temp_c)),
            ambient_temp: Reading::new(
                ambient_temp_c,
                AmbientTempStatus::classify(ambient_temp_c),
            ),
            height_sonar: Reading::new(height_sonar_m, HeightStatus::classify(height_sonar_m)),
            height_laser: Reading::new(height_laser_m, HeightStatus::classify(height_laser_m)),
            bmi_sonar: Reading::new(bmi_sonar, BmiStatus::classify(bmi_sonar)),
            bmi_laser: Reading::new(bmi_laser, BmiStatus::classify(bmi_laser)),
            heart_rate: Reading::new(heart_rate_bpm, HeartRateStatus::classify(heart_rate_bpm)),
            spo2: Reading::new(spo2_percent, Spo2Status::classify(spo2_percent)),
            lift_height_m,
            sources: self.freshness(&inputs),
            ..VitalsSnapshot::new()
        }
    }

    fn freshness(&self, inputs: &crate::vitals::store::StoreInputs) -> SourceFreshness {
        let window = self.config.stale_after_ms;
        let health = |reading: Option<Duration>| {
            SourceHealth::from_age_ms(reading.map(|age| age.as_millis() as u64), window)
        };
        let board_age = |id: BoardId| inputs.board(id).map(|r| r.age);

        SourceFreshness {
            scale: health(board_age(BoardId::Scale)),
            thermal: health(board_age(BoardId::Thermal)),
            ranging: health(board_age(BoardId::Ranging)),
            remote: health(inputs.remote.as_ref().map(|r: &SourceReading<_>| r.age)),
            pulse: health(inputs.pulse.as_ref().map(|p| p.age)),
        }
    }
}

impl VitalsProvider for VitalsAggregator {
    async fn collect_snapshot(&mut self) -> Result<VitalsSnapshot> {
        Ok(self.aggregate().await)
    }

    async fn start_stream(&mut self, interval_ms: u64) -> Result<BoxStream<'static, VitalsSnapshot>> {
        let interval = Duration::from_millis(interval_ms);
        let aggregator = self.clone();

        let stream = stream::unfold(
            (aggregator, time::interval(interval)),
            |(aggregator, mut interval)| async move {
                interval.tick().await;
                let snapshot = aggregator.aggregate().await;
                Some((snapshot, (aggregator, interval)))
            },
        );

        Ok(Box::pin(stream))
    }
}

impl VitalsMonitor for VitalsAggregator {
    fn new() -> Result<Self> {
        Ok(VitalsAggregator::new(
            SampleStore::new(),
            AggregatorConfig::default(),
        ))
    }

    async fn start_collecting(&mut self) -> Result<BoxStream<'static, VitalsSnapshot>> {
        self.start_stream(crate::DEFAULT_INTERVAL_MS).await
    }

    async fn start_collecting_with_interval(
        &mut self,
        interval_ms: u64,
    ) -> Result<BoxStream<'static, VitalsSnapshot>> {
        self.start_stream(interval_ms).await
    }

    async fn get_snapshot(&mut self) -> Result<VitalsSnapshot> {
        self.collect_snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::data::{BoardSample, PulseSample, RemoteSnapshot};
    use futures_util::StreamExt;

    fn aggregator_with_store() -> (VitalsAggregator, SampleStore) {
        let store = SampleStore::new();
        let aggregator = VitalsAggregator::new(store.clone(), AggregatorConfig::default());
        (aggregator, store)
    }

    #[test]
    fn test_height_from_reference_offset() {
        assert!((height_from_distance(2.05, 0.30) - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_guards_degenerate_heights() {
        assert!(body_mass_index(70.0, 0.0).is_nan());
        assert!(body_mass_index(70.0, -1.2).is_nan());
        assert!(body_mass_index(70.0, f64::NAN).is_nan());
        assert!(body_mass_index(70.0, f64::INFINITY).is_nan());
        assert!((body_mass_index(70.0, 1.75) - 22.857142857142858).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_store_aggregates_to_nil() {
        let (aggregator, _store) = aggregator_with_store();
        let snapshot = aggregator.aggregate().await;

        assert_eq!(snapshot.weight.status, WeightStatus::Nil);
        assert_eq!(snapshot.height_sonar.status, HeightStatus::Nil);
        assert_eq!(snapshot.bmi_laser.status, BmiStatus::Nil);
        assert_eq!(snapshot.heart_rate.status, HeartRateStatus::Nil);
        assert!(snapshot.sources.scale.stale);
        assert!(snapshot.sources.remote.stale);
    }

    #[tokio::test]
    async fn test_sonar_scenario_from_reference_distance() {
        // Sonar distance 0.30 m under a 2.05 m reference puts the subject at
        // 1.75 m, just inside the AVG bucket.
        let (aggregator, store) = aggregator_with_store();
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Scale,
                a: 70.0,
                b: 0.0,
                c: 0.0,
            })
            .await;
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Ranging,
                a: 0.30,
                b: 0.30,
                c: 0.42,
            })
            .await;

        let snapshot = aggregator.aggregate().await;
        assert!((snapshot.height_sonar.value - 1.75).abs() < 1e-9);
        assert_eq!(snapshot.height_sonar.status, HeightStatus::Avg);
        assert!((snapshot.bmi_laser.value - 22.857142857142858).abs() < 1e-9);
        assert_eq!(snapshot.bmi_laser.status, BmiStatus::Norm);
        assert_eq!(snapshot.weight.status, WeightStatus::Over);
        assert!((snapshot.lift_height_m - 0.42).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_thermal_and_pulse_classification() {
        let (aggregator, store) = aggregator_with_store();
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Thermal,
                a: 36.6,
                b: 24.0,
                c: 0.0,
            })
            .await;
        store
            .record_pulse(PulseSample {
                heart_rate_bpm: 72.0,
                spo2_percent: 98.0,
            })
            .await;

        let snapshot = aggregator.aggregate().await;
        assert_eq!(snapshot.body_temp.status, BodyTempStatus::Norm);
        assert_eq!(snapshot.ambient_temp.status, AmbientTempStatus::Low);
        assert_eq!(snapshot.heart_rate.status, HeartRateStatus::Norm);
        assert_eq!(snapshot.spo2.status, Spo2Status::Norm);
        assert!(!snapshot.sources.thermal.stale);
        assert!(!snapshot.sources.pulse.stale);
        assert!(snapshot.sources.scale.stale);
    }

    #[tokio::test]
    async fn test_fresher_remote_snapshot_wins_laser_path() {
        let (aggregator, store) = aggregator_with_store();
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Ranging,
                a: 0.30,
                b: 0.60,
                c: 0.0,
            })
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        store
            .apply_remote_snapshot(RemoteSnapshot {
                weight_kg: 70.0,
                height_cm: 175.0,
                bmi: 22.86,
                timestamp: 99,
            })
            .await;

        let snapshot = aggregator.aggregate().await;
        // Remote path: 175 cm, on-device BMI carried through unchanged.
        assert!((snapshot.height_laser.value - 1.75).abs() < 1e-9);
        assert_eq!(snapshot.height_laser.status, HeightStatus::Avg);
        assert!((snapshot.bmi_laser.value - 22.86).abs() < 1e-3);
        assert_eq!(snapshot.weight.status, WeightStatus::Over);
        // Sonar path still derives from the board triplet.
        assert!((snapshot.height_sonar.value - 1.75).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_zero_distance_sonar_yields_giga_not_nil() {
        // A ranging distance of 0 leaves height == height_ref, a valid (if
        // implausible) reading; only degenerate heights produce NIL BMI.
        let (aggregator, store) = aggregator_with_store();
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Ranging,
                a: 2.05,
                b: 2.05,
                c: 0.0,
            })
            .await;
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Scale,
                a: 70.0,
                b: 0.0,
                c: 0.0,
            })
            .await;

        let snapshot = aggregator.aggregate().await;
        // Distance equal to the reference collapses height to zero.
        assert_eq!(snapshot.bmi_sonar.status, BmiStatus::Nil);
        assert!(snapshot.bmi_sonar.value.is_nan());
    }

    #[tokio::test]
    async fn test_stream_emits_snapshots() {
        let (mut aggregator, store) = aggregator_with_store();
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Scale,
                a: 55.0,
                b: 0.0,
                c: 0.0,
            })
            .await;

        let mut stream = aggregator.start_stream(10).await.unwrap();
        let snapshot = stream.next().await.expect("stream yields");
        assert_eq!(snapshot.weight.status, WeightStatus::Norm);
    }

    #[tokio::test]
    async fn test_stale_flag_trips_after_window() {
        let store = SampleStore::new();
        let aggregator = VitalsAggregator::new(
            store.clone(),
            AggregatorConfig::default().with_stale_after_ms(5),
        );
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Scale,
                a: 70.0,
                b: 0.0,
                c: 0.0,
            })
            .await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        let snapshot = aggregator.aggregate().await;
        assert!(snapshot.sources.scale.stale);
        // The value itself still reads out; staleness is advisory.
        assert_eq!(snapshot.weight.status, WeightStatus::Over);
    }
}
