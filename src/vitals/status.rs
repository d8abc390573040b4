//! Threshold-based status classification for each vitals metric.
//!
//! Every metric maps to a small enumeration of status labels through a fixed,
//! ordered threshold table. Ascending tables take the first bucket whose upper
//! bound exceeds the value (upper-bound exclusive, so 1.45 m is `SHORT`, not
//! `DWARF`). SpO2 is the one descending table and compares strict-greater, so a
//! reading of exactly 95 % is `MILD`, not `NORM`. NaN input classifies to the
//! `NIL` sentinel before any threshold is consulted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Height bucket, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeightStatus {
    Dwarf,
    Short,
    Avg,
    Tall,
    Giga,
    Nil,
}

impl HeightStatus {
    pub fn classify(meters: f64) -> Self {
        if meters.is_nan() {
            return Self::Nil;
        }
        if meters < 1.45 {
            Self::Dwarf
        } else if meters < 1.65 {
            Self::Short
        } else if meters < 1.78 {
            Self::Avg
        } else if meters < 2.00 {
            Self::Tall
        } else {
            Self::Giga
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dwarf => "DWARF",
            Self::Short => "SHORT",
            Self::Avg => "AVG",
            Self::Tall => "TALL",
            Self::Giga => "GIGA",
            Self::Nil => "NIL",
        }
    }
}

/// Weight bucket, in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightStatus {
    Under,
    Norm,
    Over,
    Obes1,
    Obes2,
    Nil,
}

impl WeightStatus {
    pub fn classify(kg: f64) -> Self {
        if kg.is_nan() {
            return Self::Nil;
        }
        if kg < 50.0 {
            Self::Under
        } else if kg < 70.0 {
            Self::Norm
        } else if kg < 85.0 {
            Self::Over
        } else if kg < 120.0 {
            Self::Obes1
        } else {
            Self::Obes2
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under => "UNDER",
            Self::Norm => "NORM",
            Self::Over => "OVER",
            Self::Obes1 => "OBES1",
            Self::Obes2 => "OBES2",
            Self::Nil => "NIL",
        }
    }
}

/// BMI bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BmiStatus {
    Under,
    Norm,
    Over,
    Obes1,
    Obes2,
    Obes3,
    Nil,
}

impl BmiStatus {
    pub fn classify(bmi: f64) -> Self {
        if bmi.is_nan() {
            return Self::Nil;
        }
        if bmi < 18.5 {
            Self::Under
        } else if bmi < 24.9 {
            Self::Norm
        } else if bmi < 30.0 {
            Self::Over
        } else if bmi < 34.9 {
            Self::Obes1
        } else if bmi < 39.9 {
            Self::Obes2
        } else {
            Self::Obes3
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under => "UNDER",
            Self::Norm => "NORM",
            Self::Over => "OVER",
            Self::Obes1 => "OBES1",
            Self::Obes2 => "OBES2",
            Self::Obes3 => "OBES3",
            Self::Nil => "NIL",
        }
    }
}

/// Ambient temperature bucket, in °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AmbientTempStatus {
    Low,
    Room,
    Norm,
    High,
    Extr,
    Nil,
}

impl AmbientTempStatus {
    pub fn classify(celsius: f64) -> Self {
        if celsius.is_nan() {
            return Self::Nil;
        }
        if celsius < 25.0 {
            Self::Low
        } else if celsius < 30.0 {
            Self::Room
        } else if celsius < 37.5 {
            Self::Norm
        } else if celsius < 40.0 {
            Self::High
        } else {
            Self::Extr
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Room => "ROOM",
            Self::Norm => "NORM",
            Self::High => "HIGH",
            Self::Extr => "EXTR",
            Self::Nil => "NIL",
        }
    }
}

/// Body temperature bucket, in °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BodyTempStatus {
    /// Severe hypothermia
    Lhyp,
    Low,
    Norm,
    High,
    /// Severe hyperthermia
    Hhyp,
    Nil,
}

impl BodyTempStatus {
    pub fn classify(celsius: f64) -> Self {
        if celsius.is_nan() {
            return Self::Nil;
        }
        if celsius < 28.0 {
            Self::Lhyp
        } else if celsius < 32.0 {
            Self::Low
        } else if celsius < 37.5 {
            Self::Norm
        } else if celsius < 40.0 {
            Self::High
        } else {
            Self::Hhyp
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lhyp => "LHYP",
            Self::Low => "LOW",
            Self::Norm => "NORM",
            Self::High => "HIGH",
            Self::Hhyp => "HHYP",
            Self::Nil => "NIL",
        }
    }
}

/// Heart rate bucket, in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeartRateStatus {
    Slow,
    Norm,
    Fast,
    Extr,
    Nil,
}

impl HeartRateStatus {
    pub fn classify(bpm: f64) -> Self {
        if bpm.is_nan() {
            return Self::Nil;
        }
        if bpm < 60.0 {
            Self::Slow
        } else if bpm < 100.0 {
            Self::Norm
        } else if bpm < 160.0 {
            Self::Fast
        } else {
            Self::Extr
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "SLOW",
            Self::Norm => "NORM",
            Self::Fast => "FAST",
            Self::Extr => "EXTR",
            Self::Nil => "NIL",
        }
    }
}

/// Blood oxygen saturation bucket, in percent.
///
/// The only descending scan: comparisons are strict-greater, so each boundary
/// value lands in the next-worse bucket (95 → MILD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Spo2Status {
    Norm,
    /// Mild hypoxemia
    Mild,
    /// Moderate hypoxemia
    Mhyp,
    /// Severe hypoxemia
    Shyp,
    Nil,
}

impl Spo2Status {
    pub fn classify(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::Nil;
        }
        if percent > 95.0 {
            Self::Norm
        } else if percent > 90.0 {
            Self::Mild
        } else if percent > 85.0 {
            Self::Mhyp
        } else {
            Self::Shyp
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Norm => "NORM",
            Self::Mild => "MILD",
            Self::Mhyp => "MHYP",
            Self::Shyp => "SHYP",
            Self::Nil => "NIL",
        }
    }
}

macro_rules! impl_display {
    ($($status:ty),+) => {
        $(impl fmt::Display for $status {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

impl_display!(
    HeightStatus,
    WeightStatus,
    BmiStatus,
    AmbientTempStatus,
    BodyTempStatus,
    HeartRateStatus,
    Spo2Status
);
