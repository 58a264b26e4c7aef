/// Tool for checking habit status and streaks
///
/// This module implements the habit_status MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitStatus};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for checking habit status
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// ID of a specific habit (shows all if omitted)
    pub habit_id: Option<String>,
    /// Include closed streak runs
    pub include_history: Option<bool>,
}

/// Information about a single habit's status
#[derive(Debug, Serialize)]
pub struct HabitStatusInfo {
    pub habit_id: String,
    pub name: String,
    pub frequency: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub execution_percentage: u8,
    pub total_executions: usize,
    pub last_execution: Option<String>,
    pub streak_history: Vec<String>,
}

impl HabitStatusInfo {
    fn from_habit(habit: &Habit, include_history: bool) -> Self {
        Self {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            frequency: habit.frequency.to_string(),
            status: habit.status.to_string(),
            start_date: habit.start_date.to_string(),
            end_date: habit.end_date.to_string(),
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak(),
            execution_percentage: habit.execution_percentage,
            total_executions: habit.executions.len(),
            last_execution: habit.last_execution().map(|d| d.to_string()),
            streak_history: if include_history {
                habit.streak_history.iter().map(|r| r.to_string()).collect()
            } else {
                Vec::new()
            },
        }
    }
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStatusInfo>,
    pub summary: String,
    pub message: String,
}

/// Get status for habits using the provided storage
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let include_history = params.include_history.unwrap_or(false);

    let habits = match params.habit_id {
        Some(raw) => vec![storage.get_habit(&parse_habit_id(&raw)?)?],
        None => storage.list_habits(Some(HabitStatus::Active))?,
    };

    let infos: Vec<HabitStatusInfo> = habits
        .iter()
        .map(|habit| HabitStatusInfo::from_habit(habit, include_history))
        .collect();

    let summary = if infos.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let on_streak = infos.iter().filter(|h| h.current_streak > 0).count();
        format!("📊 Status: {} of {} habits on a streak", on_streak, infos.len())
    };

    let message = format!(
        "{}\n\n{}",
        summary,
        habits
            .iter()
            .zip(&infos)
            .map(|(habit, info)| render(habit, info))
            .collect::<Vec<_>>()
            .join("\n\n")
    );

    Ok(StatusResponse {
        habits: infos,
        summary,
        message,
    })
}

fn render(habit: &Habit, info: &HabitStatusInfo) -> String {
    let mut text = format!(
        "🎯 {} ({}...) [{}, {}]\n   Current streak: {} | Best: {} | Completion: {}%\n   Tracked {} → {}",
        info.name,
        habit.id.short(),
        info.frequency,
        info.status,
        habit.frequency.period_label(info.current_streak),
        habit.frequency.period_label(info.longest_streak),
        info.execution_percentage,
        info.start_date,
        info.end_date,
    );
    if let Some(last) = &info.last_execution {
        text.push_str(&format!("\n   Last executed: {}", last));
    }
    for run in &info.streak_history {
        text.push_str(&format!("\n   • {}", run));
    }
    text
}
