/// Tool for finishing a habit
///
/// This module implements the habit_finish MCP tool. A finished habit keeps
/// its statistics but no longer accepts executions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for finishing a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FinishHabitParams {
    /// ID of the habit to finish
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct FinishHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Move a habit from active to finished
pub fn finish_habit<S: HabitStorage>(
    storage: &S,
    params: FinishHabitParams,
) -> Result<FinishHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    if habit.is_finished() {
        return Ok(FinishHabitResponse {
            success: true,
            message: format!("Habit '{}' was already finished", habit.name),
        });
    }

    habit.finish();
    storage.update_habit(&habit)?;

    Ok(FinishHabitResponse {
        success: true,
        message: format!(
            "🏁 Finished habit '{}' with a best streak of {} and {}% completion",
            habit.name,
            habit.frequency.period_label(habit.longest_streak()),
            habit.execution_percentage
        ),
    })
}
