//! Data structures for raw sensor input and aggregated vitals.

use crate::error::HubError;
use crate::vitals::status::{
    AmbientTempStatus, BmiStatus, BodyTempStatus, HeartRateStatus, HeightStatus, Spo2Status,
    WeightStatus,
};
use serde::{Deserialize, Serialize};

/// The three fixed sensor boards, addressed on the wire by ids 1 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardId {
    /// Load-cell scale board (id 1): `a` = weight in kg
    Scale,
    /// Thermal board (id 2): `a` = body temperature, `b` = ambient temperature, in °C
    Thermal,
    /// Ranging board (id 3): `a` = sonar distance, `b` = laser distance, `c` = lift
    /// motor height, in meters
    Ranging,
}

/// Number of board slots tracked by the store.
pub const BOARD_COUNT: usize = 3;

impl BoardId {
    /// The id this board uses on the wire.
    pub fn wire_id(self) -> u32 {
        match self {
            Self::Scale => 1,
            Self::Thermal => 2,
            Self::Ranging => 3,
        }
    }

    /// Zero-based slot index in the sample store.
    pub fn slot(self) -> usize {
        (self.wire_id() - 1) as usize
    }
}

impl TryFrom<u32> for BoardId {
    type Error = HubError;

    /// Validate a wire id. Anything outside 1-3 is rejected rather than indexed.
    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Scale),
            2 => Ok(Self::Thermal),
            3 => Ok(Self::Ranging),
            other => Err(HubError::InvalidBoardId(other)),
        }
    }
}

/// One board's triplet of raw values, overwritten in place on each receipt.
///
/// The meaning of `a`/`b`/`c` depends on the sending board; see [`BoardId`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardSample {
    /// Which board produced this sample
    pub board: BoardId,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// The measurement payload returned by the remote height/weight board in response
/// to a snapshot request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    /// Measured weight in kilograms
    pub weight_kg: f32,
    /// Measured height in centimeters
    pub height_cm: f32,
    /// BMI as computed on the measuring board
    pub bmi: f32,
    /// Board-local timestamp of the measurement
    pub timestamp: u32,
}

/// A reading from the local pulse-oximeter feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseSample {
    /// Heart rate in beats per minute
    pub heart_rate_bpm: f64,
    /// Blood oxygen saturation in percent
    pub spo2_percent: f64,
}

/// A raw or derived value paired with its classified status label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading<S> {
    /// The numeric value (NaN when no valid input exists)
    pub value: f64,
    /// The status bucket the value falls into
    pub status: S,
}

impl<S> Reading<S> {
    pub fn new(value: f64, status: S) -> Self {
        Self { value, status }
    }
}

/// Freshness of a single input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHealth {
    /// Milliseconds since the source last delivered data, if it ever has
    pub age_ms: Option<u64>,
    /// True when the source has never reported or its data is older than the
    /// configured staleness window
    pub stale: bool,
}

impl SourceHealth {
    /// Build from an optional age against a staleness window in milliseconds.
    pub fn from_age_ms(age_ms: Option<u64>, stale_after_ms: u64) -> Self {
        let stale = match age_ms {
            Some(age) => age > stale_after_ms,
            None => true,
        };
        Self { age_ms, stale }
    }
}

impl Default for SourceHealth {
    fn default() -> Self {
        Self {
            age_ms: None,
            stale: true,
        }
    }
}

/// Per-source freshness for everything feeding the aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFreshness {
    /// Scale board (weight)
    pub scale: SourceHealth,
    /// Thermal board (body/ambient temperature)
    pub thermal: SourceHealth,
    /// Ranging board (distances, lift motor)
    pub ranging: SourceHealth,
    /// Remote measurement board snapshot
    pub remote: SourceHealth,
    /// Local pulse-oximeter feed
    pub pulse: SourceHealth,
}

/// A complete set of classified vitals at a point in time.
///
/// Recomputed wholesale on every aggregation pass from the latest raw samples;
/// never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    /// Timestamp when this snapshot was taken (Unix timestamp in milliseconds)
    pub timestamp: u64,
    /// Weight in kilograms
    pub weight: Reading<WeightStatus>,
    /// Body temperature in °C
    pub body_temp: Reading<BodyTempStatus>,
    /// Ambient temperature in °C
    pub ambient_temp: Reading<AmbientTempStatus>,
    /// Height derived from the sonar distance, in meters
    pub height_sonar: Reading<HeightStatus>,
    /// Height derived from the laser distance or the remote snapshot, in meters
    pub height_laser: Reading<HeightStatus>,
    /// BMI from the sonar height path
    pub bmi_sonar: Reading<BmiStatus>,
    /// BMI from the laser height path
    pub bmi_laser: Reading<BmiStatus>,
    /// Heart rate in beats per minute
    pub heart_rate: Reading<HeartRateStatus>,
    /// Blood oxygen saturation in percent
    pub spo2: Reading<Spo2Status>,
    /// Lift motor height in meters (reported as-is, no status bucket)
    pub lift_height_m: f64,
    /// Freshness of each input source
    pub sources: SourceFreshness,
}

impl VitalsSnapshot {
    /// Create an empty snapshot with the current timestamp; every reading starts
    /// at NaN/NIL.
    pub fn new() -> Self {
        Self {
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            weight: Reading::new(f64::NAN, WeightStatus::Nil),
            body_temp: Reading::new(f64::NAN, BodyTempStatus::Nil),
            ambient_temp: Reading::new(f64::NAN, AmbientTempStatus::Nil),
            height_sonar: Reading::new(f64::NAN, HeightStatus::Nil),
            height_laser: Reading::new(f64::NAN, HeightStatus::Nil),
            bmi_sonar: Reading::new(f64::NAN, BmiStatus::Nil),
            bmi_laser: Reading::new(f64::NAN, BmiStatus::Nil),
            heart_rate: Reading::new(f64::NAN, HeartRateStatus::Nil),
            spo2: Reading::new(f64::NAN, Spo2Status::Nil),
            lift_height_m: f64::NAN,
            sources: SourceFreshness::default(),
        }
    }
}

impl Default for VitalsSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
