/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool to modify
/// existing habit properties like name, frequency or start date.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, TrackingPeriod};
use crate::engine::{ScheduleChange, StatisticsEngine};
use crate::storage::HabitStorage;
use crate::tools::{parse_date, parse_habit_id, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New frequency: daily or weekly (resets recorded executions)
    pub frequency: Option<String>,
    /// New start date, YYYY-MM-DD (resets recorded executions)
    pub start_date: Option<String>,
    /// New tracking period: month or year
    pub tracking_period: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub statistics_reset: bool,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    engine: &StatisticsEngine,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    // Parse everything before touching the habit
    let change = ScheduleChange {
        frequency: params
            .frequency
            .as_deref()
            .map(str::parse::<Frequency>)
            .transpose()?,
        start_date: params.start_date.as_deref().map(parse_date).transpose()?,
        tracking_period: params
            .tracking_period
            .as_deref()
            .map(str::parse::<TrackingPeriod>)
            .transpose()?,
    };

    let mut habit = storage.get_habit(&habit_id)?;

    // Apply everything in memory first so a failure leaves storage untouched
    let details_changed = params.name.is_some() || params.description.is_some();
    habit.update_details(params.name, params.description.map(Some))?;

    let mut statistics_reset = false;
    if change != ScheduleChange::default() {
        let outcome = engine.reschedule(&mut habit, change)?;
        storage.save_schedule(&habit)?;
        statistics_reset = outcome.statistics_reset;
    } else if details_changed {
        storage.update_habit(&habit)?;
    }

    let message = if statistics_reset {
        format!(
            "✅ Updated habit '{}'. Schedule changed, executions and streak were reset",
            habit.name
        )
    } else {
        format!("✅ Updated habit '{}'", habit.name)
    };

    Ok(UpdateHabitResponse {
        success: true,
        statistics_reset,
        message,
    })
}
