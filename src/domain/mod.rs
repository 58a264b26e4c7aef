/// Domain module containing core business data types
///
/// This module defines the core entities (Habit, StreakRecord) and their
/// validation rules. The engine module computes statistics over them.

pub mod habit;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use streak::*;
pub use types::*;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
