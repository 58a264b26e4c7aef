/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits, their executions and
/// their streak history.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::domain::{Habit, HabitId, HabitStatus};
use crate::engine::ExecutionUpdate;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Duplicate execution: habit {habit_id} already executed on {date}")]
    DuplicateExecution { habit_id: String, date: String },

    #[error("Corrupt value in column {column}: {value}")]
    Corrupt { column: String, value: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// The engine works on a loaded `Habit` snapshot; these operations load the
/// snapshot and persist what the engine changed.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID, with its executions and streak history
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Update name, description and status of an existing habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit together with its executions and streak history
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits, optionally only those with the given status
    fn list_habits(&self, status: Option<HabitStatus>) -> Result<Vec<Habit>, StorageError>;

    /// Persist an admitted execution and the statistics it produced, atomically
    fn record_execution(
        &self,
        habit_id: &HabitId,
        update: &ExecutionUpdate,
    ) -> Result<(), StorageError>;

    /// Persist a rescheduled habit: name, description, schedule fields, cached
    /// statistics, executions and streak history are all replaced atomically
    fn save_schedule(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Persist a refreshed completion percentage
    fn save_percentage(&self, habit_id: &HabitId, percentage: u8) -> Result<(), StorageError>;
}
