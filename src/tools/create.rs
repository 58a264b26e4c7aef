/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit, TrackingPeriod};
use crate::storage::HabitStorage;
use crate::tools::{parse_date_or_today, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// How often: daily or weekly
    pub frequency: String,
    /// How long to track: month or year (defaults to month)
    pub tracking_period: Option<String>,
    /// First tracked day, YYYY-MM-DD (defaults to today)
    pub start_date: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: Option<String>,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let frequency: Frequency = params.frequency.parse()?;
    let tracking_period: TrackingPeriod = match params.tracking_period.as_deref() {
        Some(raw) => raw.parse()?,
        None => TrackingPeriod::Month,
    };
    let start_date = parse_date_or_today(params.start_date.as_deref())?;

    let habit = Habit::new(
        params.name,
        params.description,
        frequency,
        tracking_period,
        start_date,
    )?;

    storage.create_habit(&habit)?;

    Ok(CreateHabitResponse {
        success: true,
        habit_id: Some(habit.id.to_string()),
        message: format!(
            "✅ Created {} habit '{}', tracked from {} to {}",
            habit.frequency, habit.name, habit.start_date, habit.end_date
        ),
    })
}
