/// Tool for marking habit executions
///
/// This module implements the habit_mark MCP tool: admission check, streak
/// update and percentage refresh, persisted as one unit.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::{MarkOutcome, StatisticsEngine};
use crate::storage::HabitStorage;
use crate::tools::{parse_date_or_today, parse_habit_id, ToolError};

/// Parameters for marking a habit as executed
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MarkHabitParams {
    /// ID of the habit to mark
    pub habit_id: String,
    /// Date executed, YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
}

/// Response from marking a habit
///
/// A rejected execution is a successful call with `admitted == false`.
#[derive(Debug, Serialize)]
pub struct MarkHabitResponse {
    pub admitted: bool,
    pub rejection: Option<String>,
    pub current_streak: u32,
    pub execution_percentage: u8,
    pub closed_run: Option<String>,
    pub message: String,
}

/// Mark a habit as executed on a date
pub fn mark_habit<S: HabitStorage>(
    storage: &S,
    engine: &StatisticsEngine,
    params: MarkHabitParams,
) -> Result<MarkHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_date_or_today(params.date.as_deref())?;

    let mut habit = storage.get_habit(&habit_id)?;

    match engine.mark_execution(&mut habit, date)? {
        MarkOutcome::Rejected(reason) => Ok(MarkHabitResponse {
            admitted: false,
            rejection: Some(reason.code().to_string()),
            current_streak: habit.current_streak,
            execution_percentage: habit.execution_percentage,
            closed_run: None,
            message: format!("⛔ {} ({})", reason, date),
        }),
        MarkOutcome::Recorded(update) => {
            storage.record_execution(&habit_id, &update)?;

            let mut message = format!(
                "🔥 Marked '{}' for {}! Current streak: {} | Completion: {}%",
                habit.name,
                date,
                habit.frequency.period_label(update.current_streak),
                update.execution_percentage
            );
            if let Some(ref run) = update.closed_run {
                message.push_str(&format!("\n   Previous streak closed: {}", run));
            }

            Ok(MarkHabitResponse {
                admitted: true,
                rejection: None,
                current_streak: update.current_streak,
                execution_percentage: update.execution_percentage,
                closed_run: update.closed_run.map(|run| run.to_string()),
                message,
            })
        }
    }
}
