/// Tool for deleting a habit
///
/// This module implements the habit_delete MCP tool. Executions and streak
/// history are removed by the storage cascade.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
}

pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;
    storage.delete_habit(&habit_id)?;

    Ok(DeleteHabitResponse {
        success: true,
        message: format!(
            "🗑️ Deleted habit '{}' with {} executions",
            habit.name,
            habit.executions.len()
        ),
    })
}
