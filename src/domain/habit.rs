/// Habit entity and related functionality
///
/// This module defines the core Habit struct: what the user tracks, how often,
/// over which date range, and the cached statistics derived from its executions.

use std::collections::BTreeSet;

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, HabitId, HabitStatus, StreakRecord, TrackingPeriod};

/// A habit the user wants to perform daily or weekly
///
/// `current_streak` and `execution_percentage` are caches maintained by the
/// engine; `executions` is the source of truth they are derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// How long the habit is tracked after `start_date`
    pub tracking_period: TrackingPeriod,
    /// Whether executions are still admitted
    pub status: HabitStatus,
    /// First day executions are admitted for
    pub start_date: NaiveDate,
    /// `start_date` plus the tracking period
    pub end_date: NaiveDate,
    /// Consecutive completed periods ending at the latest execution
    pub current_streak: u32,
    /// Last computed completion percentage (0-100)
    pub execution_percentage: u8,
    /// Dates the habit was executed on, at most one per period
    pub executions: BTreeSet<NaiveDate>,
    /// Closed streak runs, oldest first
    pub streak_history: Vec<StreakRecord>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new active habit with validation
    ///
    /// The end date is derived from the start date and tracking period.
    pub fn new(
        name: String,
        description: Option<String>,
        frequency: Frequency,
        tracking_period: TrackingPeriod,
        start_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;
        let end_date = Self::end_date_for(start_date, tracking_period)?;

        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            description,
            frequency,
            tracking_period,
            status: HabitStatus::Active,
            start_date,
            end_date,
            current_streak: 0,
            execution_percentage: 0,
            executions: BTreeSet::new(),
            streak_history: Vec::new(),
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        frequency: Frequency,
        tracking_period: TrackingPeriod,
        status: HabitStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
        current_streak: u32,
        execution_percentage: u8,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            frequency,
            tracking_period,
            status,
            start_date,
            end_date,
            current_streak,
            execution_percentage,
            executions: BTreeSet::new(),
            streak_history: Vec::new(),
            created_at,
        }
    }

    /// End of the tracking range for a given start date
    pub fn end_date_for(
        start_date: NaiveDate,
        tracking_period: TrackingPeriod,
    ) -> Result<NaiveDate, DomainError> {
        start_date
            .checked_add_months(Months::new(tracking_period.months()))
            .ok_or_else(|| {
                DomainError::InvalidDate(format!(
                    "{} plus one {} is out of range",
                    start_date, tracking_period
                ))
            })
    }

    /// The inclusive [start_date, end_date] window the habit is measured in
    pub fn tracking_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start_date, self.end_date)
    }

    pub fn is_finished(&self) -> bool {
        self.status == HabitStatus::Finished
    }

    /// Stop admitting executions. Finishing twice is a no-op.
    pub fn finish(&mut self) {
        self.status = HabitStatus::Finished;
    }

    /// Most recent execution date
    pub fn last_execution(&self) -> Option<NaiveDate> {
        self.executions.iter().next_back().copied()
    }

    /// Best run ever: the longest closed run or the current one
    pub fn longest_streak(&self) -> u32 {
        self.streak_history
            .iter()
            .map(|record| record.length)
            .max()
            .unwrap_or(0)
            .max(self.current_streak)
    }

    /// Rename or re-describe the habit
    ///
    /// Schedule fields (frequency, start date, tracking period) go through the
    /// engine instead, because changing them invalidates cached statistics.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }

        if let Some(new_name) = name {
            self.name = new_name.trim().to_string();
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        Ok(())
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate optional description
    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}
