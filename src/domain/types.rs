/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like Frequency, HabitStatus and the
/// ID type that are used by Habit, the engine and the storage layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass an arbitrary string where a habit ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }

    /// First eight characters, enough to tell habits apart in listings
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a habit should be performed
///
/// The frequency decides what a "period" is: one calendar day, or one ISO week
/// (Monday to Sunday). Streaks and percentages are counted in periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Once per calendar day
    Daily,
    /// Once per ISO week
    Weekly,
}

impl Frequency {
    /// Stable code used by storage and tool parameters
    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }

    /// Unit name for a number of periods, e.g. "1 day" / "3 weeks"
    pub fn period_label(&self, count: u32) -> String {
        let unit = match self {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
        };
        if count == 1 {
            format!("{} {}", count, unit)
        } else {
            format!("{} {}s", count, unit)
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(DomainError::UnsupportedFrequency(other.to_string())),
        }
    }
}

/// Lifecycle state of a habit
///
/// A finished habit no longer admits executions. There is no way back to active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    Active,
    Finished,
}

impl HabitStatus {
    pub fn code(&self) -> &'static str {
        match self {
            HabitStatus::Active => "active",
            HabitStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HabitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(HabitStatus::Active),
            "finished" => Ok(HabitStatus::Finished),
            other => Err(DomainError::Validation {
                message: format!("Invalid status '{}'. Valid options: active, finished", other),
            }),
        }
    }
}

/// How long a habit is tracked after its start date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingPeriod {
    Month,
    Year,
}

impl TrackingPeriod {
    pub fn code(&self) -> &'static str {
        match self {
            TrackingPeriod::Month => "month",
            TrackingPeriod::Year => "year",
        }
    }

    /// Length of the tracking period in calendar months
    pub fn months(&self) -> u32 {
        match self {
            TrackingPeriod::Month => 1,
            TrackingPeriod::Year => 12,
        }
    }
}

impl fmt::Display for TrackingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TrackingPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(TrackingPeriod::Month),
            "year" => Ok(TrackingPeriod::Year),
            other => Err(DomainError::Validation {
                message: format!("Invalid tracking period '{}'. Valid options: month, year", other),
            }),
        }
    }
}
