//! Context classification: raw sensor readings to discrete categories.
//!
//! `classify` is a pure function: the same readings and the same wall-clock
//! time always produce the same [`Context`]. Missing or noisy readings degrade
//! to defaults instead of failing.
//!
//! The thresholds (60/100/110 bpm, 100 kcal) and the primary-tag priority
//! order are fixed for behavioral compatibility.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Heart rate above which stress is `High`.
pub const HIGH_HEART_RATE: f64 = 110.0;
/// Heart rate above which stress is `Elevated`.
pub const ELEVATED_HEART_RATE: f64 = 100.0;
/// Heart rate below which stress is `Low`.
pub const LOW_HEART_RATE: f64 = 60.0;
/// Active energy above which the user counts as active.
pub const ACTIVE_ENERGY_THRESHOLD: f64 = 100.0;

/// Raw readings supplied by the upstream sensor collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSignals {
    /// Beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_variability: Option<f64>,

    /// Active energy burned (kcal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_energy: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_count: Option<u32>,
}

impl RawSignals {
    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    pub fn with_heart_rate_variability(mut self, hrv: f64) -> Self {
        self.heart_rate_variability = Some(hrv);
        self
    }

    pub fn with_active_energy(mut self, kcal: f64) -> Self {
        self.active_energy = Some(kcal);
        self
    }

    pub fn with_step_count(mut self, steps: u32) -> Self {
        self.step_count = Some(steps);
        self
    }
}

/// Part of the day, derived from the wall-clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Half-open ranges: `[5,12)` morning, `[12,17)` afternoon, `[17,21)` evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

/// Discrete stress category derived from heart rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Normal,
    Elevated,
    High,
}

impl StressLevel {
    /// First match wins: `> 110` high, `> 100` elevated, `< 60` low.
    pub fn from_heart_rate(heart_rate: Option<f64>) -> Self {
        match heart_rate {
            Some(hr) if hr > HIGH_HEART_RATE => Self::High,
            Some(hr) if hr > ELEVATED_HEART_RATE => Self::Elevated,
            Some(hr) if hr < LOW_HEART_RATE => Self::Low,
            _ => Self::Normal,
        }
    }

    /// Elevated or high.
    pub fn is_stressed(&self) -> bool {
        matches!(self, Self::Elevated | Self::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Elevated => "elevated",
            Self::High => "high",
        }
    }
}

/// The single label summarizing the dominant signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryTag {
    Stress,
    Morning,
    Evening,
    Active,
    General,
}

impl PrimaryTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stress => "stress",
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::Active => "active",
            Self::General => "general",
        }
    }
}

macro_rules! impl_label {
    ($ty:ty, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                $(
                    if lower == Self::$variant.as_str() {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("unknown {}: {s}", stringify!($ty)))
            }
        }
    };
}

impl_label!(TimeOfDay, [Morning, Afternoon, Evening, Night]);
impl_label!(StressLevel, [Low, Normal, Elevated, High]);
impl_label!(PrimaryTag, [Stress, Morning, Evening, Active, General]);

/// The discrete summary of the user's state for one selection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_variability: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_energy: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_count: Option<u32>,

    pub time_of_day: TimeOfDay,
    pub stress_level: StressLevel,
    pub is_active: bool,
    pub primary_tag: PrimaryTag,
}

/// Build a [`Context`] from raw readings and the current time.
pub fn classify<T: Timelike>(signals: &RawSignals, now: &T) -> Context {
    let heart_rate = signals.heart_rate.filter(|hr| hr.is_finite() && *hr > 0.0);
    let heart_rate_variability = signals
        .heart_rate_variability
        .filter(|v| v.is_finite() && *v >= 0.0);
    let active_energy = signals.active_energy.filter(|e| e.is_finite());

    let time_of_day = TimeOfDay::from_hour(now.hour());
    let stress_level = StressLevel::from_heart_rate(heart_rate);
    let is_active = active_energy.is_some_and(|e| e > ACTIVE_ENERGY_THRESHOLD);
    let primary_tag = primary_tag(stress_level, time_of_day, is_active);

    Context {
        heart_rate,
        heart_rate_variability,
        active_energy,
        step_count: signals.step_count,
        time_of_day,
        stress_level,
        is_active,
        primary_tag,
    }
}

fn primary_tag(stress: StressLevel, time_of_day: TimeOfDay, is_active: bool) -> PrimaryTag {
    if stress.is_stressed() {
        PrimaryTag::Stress
    } else if time_of_day == TimeOfDay::Morning {
        PrimaryTag::Morning
    } else if matches!(time_of_day, TimeOfDay::Evening | TimeOfDay::Night) {
        PrimaryTag::Evening
    } else if is_active {
        PrimaryTag::Active
    } else {
        PrimaryTag::General
    }
}
