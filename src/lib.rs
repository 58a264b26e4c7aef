/// Public library interface for the Habit Streaks MCP server
///
/// This module exports the statistics engine, the storage layer and the MCP
/// server so they can be used by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

pub mod domain;
pub mod engine;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use domain::*;
pub use engine::{
    Admission, ExecutionUpdate, MarkOutcome, PercentagePolicy, RejectionReason,
    RescheduleOutcome, ScheduleChange, ScheduleChangePolicy, StatisticsEngine, StatisticsPolicy,
};
pub use storage::{HabitStorage, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main habit streak server
///
/// Owns the SQLite storage and the statistics engine configured with the
/// policies chosen at startup.
pub struct HabitStreaksServer {
    storage: SqliteStorage,
    engine: StatisticsEngine,
}

impl HabitStreaksServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf, policy: StatisticsPolicy) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Streaks server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        let engine = StatisticsEngine::with_policy(policy);

        tracing::debug!(
            "Statistics policy: percentage={:?}, schedule_change={:?}",
            policy.percentage,
            policy.schedule_change
        );

        Ok(Self { storage, engine })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits(None)?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the statistics engine
    pub fn engine(&self) -> &StatisticsEngine {
        &self.engine
    }
}
