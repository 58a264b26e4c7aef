/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls using the habit streak engine
/// 3. Sends JSON-RPC responses to stdout

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitStreaksServer, ServerError};

/// MCP server wrapping the habit streak server
pub struct McpServer {
    /// The underlying habit server
    habit_tracker: HabitStreaksServer,
    /// Whether the client confirmed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_tracker: HabitStreaksServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if !request.has_supported_version() {
            warn!("Rejecting request with jsonrpc version '{}'", request.jsonrpc);
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version '{}'", request.jsonrpc),
                None,
            ));
        }

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        Some(self.handle_request(request))
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habit Streaks MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, id: Value) -> JsonRpcResponse {
        match tool_definitions() {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(e) => {
                error!("Failed to build tool schemas: {}", e);
                JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None)
            }
        }
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        if !self.initialized {
            warn!("tools/call received before initialization completed");
        }

        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = self.call_tool(&tool_params.name, tool_params.arguments);
        to_response(id, &result)
    }

    /// Dispatch a tool call and render its outcome as text
    fn call_tool(&self, name: &str, args: Map<String, Value>) -> ToolCallResult {
        let storage = self.habit_tracker.storage();
        let engine = self.habit_tracker.engine();

        let outcome: Result<String, ToolError> = match name {
            "habit_create" => parse_args(args)
                .and_then(|p| tools::create_habit(storage, p))
                .map(|r| match r.habit_id {
                    Some(habit_id) => format!("{}\nHabit ID: {}", r.message, habit_id),
                    None => r.message,
                }),
            "habit_mark" => parse_args(args)
                .and_then(|p| tools::mark_habit(storage, engine, p))
                .map(|r| r.message),
            "habit_status" => parse_args(args)
                .and_then(|p| tools::get_habit_status(storage, p))
                .map(|r| r.message),
            "habit_statistics" => parse_args(args)
                .and_then(|p| tools::get_habit_statistics(storage, engine, p))
                .map(|r| r.message),
            "habit_update" => parse_args(args)
                .and_then(|p| tools::update_habit(storage, engine, p))
                .map(|r| r.message),
            "habit_finish" => parse_args(args)
                .and_then(|p| tools::finish_habit(storage, p))
                .map(|r| r.message),
            "habit_delete" => parse_args(args)
                .and_then(|p| tools::delete_habit(storage, p))
                .map(|r| r.message),
            "habit_list" => parse_args(args)
                .and_then(|p| tools::list_habits(storage, p))
                .map(|r| render_list(&r)),
            _ => return ToolCallResult::error(format!("Unknown tool: {}", name)),
        };

        match outcome {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!("Tool '{}' failed: {}", name, e);
                ToolCallResult::error(e.to_string())
            }
        }
    }
}

/// Deserialize tool arguments into a tool's parameter struct
fn parse_args<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

fn to_response<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
    }
}

fn tool<T: schemars::JsonSchema>(
    name: &str,
    description: &str,
) -> Result<ToolDefinition, serde_json::Error> {
    Ok(ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schemars::schema_for!(T))?,
    })
}

/// All tools this server exposes, with generated input schemas
fn tool_definitions() -> Result<Vec<ToolDefinition>, serde_json::Error> {
    Ok(vec![
        tool::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new daily or weekly habit tracked for a month or a year",
        )?,
        tool::<tools::MarkHabitParams>(
            "habit_mark",
            "Mark a habit as executed for today or a specific date",
        )?,
        tool::<tools::StatusParams>(
            "habit_status",
            "Check current streak, best streak, completion percentage and streak history",
        )?,
        tool::<tools::StatisticsParams>(
            "habit_statistics",
            "Compute the completion percentage of a habit over a date window",
        )?,
        tool::<tools::UpdateHabitParams>(
            "habit_update",
            "Rename a habit or change its frequency, start date or tracking period",
        )?,
        tool::<tools::FinishHabitParams>(
            "habit_finish",
            "Finish a habit so it no longer accepts executions",
        )?,
        tool::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit with all its executions and streak history",
        )?,
        tool::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with streaks and completion percentages",
        )?,
    ])
}

fn render_list(response: &tools::ListHabitsResponse) -> String {
    if response.habits.is_empty() {
        return "No habits found. Create your first habit to get started!".to_string();
    }

    let header = format!("📋 **Habit Summary** ({} habits)\n\n", response.summary.total_habits);

    let detailed_list = response
        .habits
        .iter()
        .map(|h| {
            format!(
                "🎯 **{}** ({})\n   📅 Frequency: {} | 🔥 Streak: {} | 🏆 Best: {} | 📊 {}% | ✅ Total: {}",
                h.name, h.status, h.frequency, h.current_streak, h.longest_streak,
                h.execution_percentage, h.total_executions
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let overall = format!(
        "\n\n📊 **Overall Stats**\n- Active habits: {}\n- Average completion: {:.1}%",
        response.summary.active_habits, response.summary.avg_execution_percentage
    );

    format!("{}{}{}", header, detailed_list, overall)
}
