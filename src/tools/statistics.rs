/// Tool for completion statistics over a date window
///
/// This module implements the habit_statistics MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::StatisticsEngine;
use crate::storage::HabitStorage;
use crate::tools::{parse_date, parse_habit_id, ToolError};

/// Parameters for computing completion statistics
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatisticsParams {
    /// ID of the habit
    pub habit_id: String,
    /// Window start, YYYY-MM-DD (defaults to the habit's start date)
    pub start_date: Option<String>,
    /// Window end, YYYY-MM-DD (defaults to the habit's end date)
    pub end_date: Option<String>,
}

/// Response with the refreshed completion percentage
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub habit_id: String,
    pub window_start: String,
    pub window_end: String,
    pub execution_percentage: u8,
    pub current_streak: u32,
    pub message: String,
}

/// Refresh and persist a habit's completion percentage over a window
pub fn get_habit_statistics<S: HabitStorage>(
    storage: &S,
    engine: &StatisticsEngine,
    params: StatisticsParams,
) -> Result<StatisticsResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let window_start = match params.start_date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => habit.start_date,
    };
    let window_end = match params.end_date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => habit.end_date,
    };

    let previous = habit.execution_percentage;
    let percentage = engine.completion_percentage(&mut habit, window_start, window_end)?;
    if percentage != previous {
        storage.save_percentage(&habit_id, percentage)?;
    }

    Ok(StatisticsResponse {
        habit_id: habit_id.to_string(),
        window_start: window_start.to_string(),
        window_end: window_end.to_string(),
        execution_percentage: percentage,
        current_streak: habit.current_streak,
        message: format!(
            "📈 '{}' from {} to {}: {}% complete, current streak {}",
            habit.name,
            window_start,
            window_end,
            percentage,
            habit.frequency.period_label(habit.current_streak)
        ),
    })
}
