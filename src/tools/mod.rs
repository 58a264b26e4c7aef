/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker. Each tool loads a habit snapshot from
/// storage, runs the statistics engine on it and persists the result.

pub mod create;
pub mod delete;
pub mod finish;
pub mod list;
pub mod mark;
pub mod statistics;
pub mod status;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use finish::*;
pub use list::*;
pub use mark::*;
pub use statistics::*;
pub use status::*;
pub use update::*;

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

use crate::domain::{DomainError, HabitId};
use crate::storage::StorageError;

/// Errors a tool call can fail with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Parse a habit ID parameter
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidParams("Habit ID cannot be empty".to_string()));
    }
    HabitId::from_string(raw)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid habit ID format: '{}'", raw)))
}

/// Parse a YYYY-MM-DD date parameter
///
/// Only four-digit years are accepted.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ToolError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ToolError::InvalidParams(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))?;

    if !(1..=9999).contains(&date.year()) {
        return Err(ToolError::InvalidParams(format!(
            "Date '{}' is out of range, years 0001 to 9999 are supported",
            raw
        )));
    }
    Ok(date)
}

/// Parse an optional date parameter, defaulting to today's local date
pub(crate) fn parse_date_or_today(raw: Option<&str>) -> Result<NaiveDate, ToolError> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(Local::now().date_naive()),
    }
}
