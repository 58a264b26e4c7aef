/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::HabitStatus;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for listing habits
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Filter by status: active, finished or all (default: active)
    pub status: Option<String>,
    /// Sort by: name, streak or percentage (default: name)
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub frequency: String,
    pub status: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub execution_percentage: u8,
    pub total_executions: usize,
}

/// Summary statistics for all listed habits
#[derive(Debug, Serialize)]
pub struct HabitListSummary {
    pub total_habits: usize,
    pub active_habits: usize,
    pub avg_execution_percentage: f64,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub summary: HabitListSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Name,
    Streak,
    Percentage,
}

fn parse_sort_key(raw: Option<&str>) -> Result<SortKey, ToolError> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("name") => Ok(SortKey::Name),
        Some("streak") => Ok(SortKey::Streak),
        Some("percentage") => Ok(SortKey::Percentage),
        Some(other) => Err(ToolError::InvalidParams(format!(
            "Invalid sort_by '{}'. Valid options: name, streak, percentage",
            other
        ))),
    }
}

/// List habits using the provided storage
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let status_filter = match params.status.as_deref().map(str::trim) {
        None => Some(HabitStatus::Active),
        Some(raw) if raw.eq_ignore_ascii_case("all") => None,
        Some(raw) => Some(raw.parse::<HabitStatus>()?),
    };
    let sort_key = parse_sort_key(params.sort_by.as_deref())?;

    let habits = storage.list_habits(status_filter)?;

    let mut summaries: Vec<HabitSummary> = habits
        .iter()
        .map(|habit| HabitSummary {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            frequency: habit.frequency.to_string(),
            status: habit.status.to_string(),
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak(),
            execution_percentage: habit.execution_percentage,
            total_executions: habit.executions.len(),
        })
        .collect();

    match sort_key {
        SortKey::Name => summaries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortKey::Streak => summaries.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
        SortKey::Percentage => {
            summaries.sort_by(|a, b| b.execution_percentage.cmp(&a.execution_percentage))
        }
    }

    let total_habits = summaries.len();
    let active_habits = summaries
        .iter()
        .filter(|h| h.status == HabitStatus::Active.code())
        .count();
    let avg_execution_percentage = if summaries.is_empty() {
        0.0
    } else {
        summaries
            .iter()
            .map(|h| f64::from(h.execution_percentage))
            .sum::<f64>()
            / summaries.len() as f64
    };

    Ok(ListHabitsResponse {
        habits: summaries,
        summary: HabitListSummary {
            total_habits,
            active_habits,
            avg_execution_percentage,
        },
    })
}
