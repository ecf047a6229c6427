/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls against the habit store
/// 3. Sends JSON-RPC responses to stdout

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitQuestServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying habit server
    habit_quest: HabitQuestServer,
    /// Whether the client has confirmed initialization; only used for logging,
    /// tool calls are served either way
    initialized: bool,
    /// Pinned calendar date; the local date is used when unset
    fixed_today: Option<NaiveDate>,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_quest: HabitQuestServer) -> Self {
        Self {
            habit_quest,
            initialized: false,
            fixed_today: None,
        }
    }

    /// Answer every tool call as if today were `today`
    pub fn with_fixed_date(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn habit_quest(&self) -> &HabitQuestServer {
        &self.habit_quest
    }

    /// "Now" for one tool call, resolved once at the boundary
    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Local::now().date_naive())
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
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        // Write response + newline
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
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
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
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        Some(self.handle_request(request).await)
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
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params).await,
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
                name: "HabitQuest MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, &result)
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
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

        if !self.initialized {
            debug!("Tool '{}' called before initialization finished", tool_params.name);
        }

        let result = self.call_tool(&tool_params.name, tool_params.arguments);
        to_response(id, &result)
    }

    /// Route a tool call to its adapter
    fn call_tool(&mut self, name: &str, args: Value) -> ToolCallResult {
        let today = self.today();
        let server = &self.habit_quest;
        let storage = server.storage();

        let outcome: Result<String, ToolError> = match name {
            "habit_create" => parse(args)
                .and_then(|p| tools::create_habit(storage, p))
                .map(|r| format!("{}\nHabit ID: {}", r.message, r.habit_id)),
            "habit_update" => parse(args).and_then(|p| tools::update_habit(storage, p)).map(|r| r.message),
            "habit_delete" => parse(args).and_then(|p| tools::delete_habit(storage, p)).map(|r| r.message),
            "habit_move" => parse(args).and_then(|p| tools::move_habit(storage, p)).map(|r| r.message),
            "habit_toggle" => parse(args)
                .and_then(|p| tools::toggle_habit(storage, server.sink(), today, p))
                .map(|r| r.message),
            "habit_set_status" => parse(args)
                .and_then(|p| tools::set_habit_status(storage, server.sink(), today, p))
                .map(|r| r.message),
            "habit_status" => parse(args)
                .and_then(|p| tools::get_habit_status(storage, today, p))
                .map(|r| r.message),
            "habit_list" => parse(args)
                .and_then(|p| tools::list_habits(storage, today, p))
                .map(|r| r.message),
            "habit_analysis" => parse(args)
                .and_then(|p| tools::analyze_habits(storage, server.analytics(), today, p))
                .map(|r| r.message),
            "habit_rate" => parse(args)
                .and_then(|p| tools::habit_rate(storage, server.analytics(), p))
                .map(|r| r.message),
            "habit_import" => parse(args).and_then(|p| tools::import_habits(storage, p)).map(|r| r.message),
            "tag_list" => parse(args).and_then(|p| tools::list_tags(storage, p)).map(|r| r.message),
            "tag_add" => parse(args).and_then(|p| tools::add_tag(storage, p)).map(|r| r.message),
            "tag_remove" => parse(args).and_then(|p| tools::remove_tag(storage, p)).map(|r| r.message),
            "sync_configure" => return self.call_sync_configure(args),
            _ => return ToolCallResult::error(format!("Unknown tool: {}", name)),
        };

        match outcome {
            Ok(message) => ToolCallResult::success(message),
            Err(e) => {
                debug!("Tool '{}' failed: {}", name, e);
                ToolCallResult::error(e.to_string())
            }
        }
    }

    /// Persist the webhook URL and swap the notification sink
    fn call_sync_configure(&mut self, args: Value) -> ToolCallResult {
        let response = match parse(args).and_then(|p| tools::configure_sync(self.habit_quest.storage(), p)) {
            Ok(response) => response,
            Err(e) => return ToolCallResult::error(e.to_string()),
        };

        let mut message = response.message;
        match self.habit_quest.reload_sink() {
            Ok(()) => {
                if self.habit_quest.sync_url_overridden() {
                    message.push_str("\nNote: a URL given on the command line takes precedence until restart.");
                }
            }
            Err(e) => {
                warn!("Failed to reload sync sink: {}", e);
                return ToolCallResult::error(e.to_string());
            }
        }
        ToolCallResult::success(message)
    }
}

/// Deserialize tool arguments into a parameter struct
fn parse<P: DeserializeOwned>(args: Value) -> Result<P, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

fn to_response<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to encode result: {}", e),
            None,
        ),
    }
}

/// Every tool the server offers, with schemas generated from the parameter types
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::for_params::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new daily, weekly or monthly habit to track",
        ),
        ToolDefinition::for_params::<tools::UpdateHabitParams>(
            "habit_update",
            "Rename a habit or change its tag, type or frequency (records are kept)",
        ),
        ToolDefinition::for_params::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit together with all of its records",
        ),
        ToolDefinition::for_params::<tools::MoveHabitParams>(
            "habit_move",
            "Move a habit one position up or down in the list",
        ),
        ToolDefinition::for_params::<tools::ToggleParams>(
            "habit_toggle",
            "Cycle the period containing a date: unmarked -> success -> failure -> unmarked",
        ),
        ToolDefinition::for_params::<tools::SetStatusParams>(
            "habit_set_status",
            "Set success, failure or neutral for the period containing a date",
        ),
        ToolDefinition::for_params::<tools::StatusParams>(
            "habit_status",
            "Show the status of the current (or given) period and streaks",
        ),
        ToolDefinition::for_params::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with tags, streaks and 90-day success rates",
        ),
        ToolDefinition::for_params::<tools::AnalysisParams>(
            "habit_analysis",
            "Week and month comparisons, 90-day and year rates, history grid and insights",
        ),
        ToolDefinition::for_params::<tools::RateParams>(
            "habit_rate",
            "Success rate of a habit between two dates, counted per day, week or month",
        ),
        ToolDefinition::for_params::<tools::ImportParams>(
            "habit_import",
            "Import habits from the older completedDates JSON export",
        ),
        ToolDefinition::for_params::<tools::ListTagsParams>("tag_list", "List tags"),
        ToolDefinition::for_params::<tools::TagParams>("tag_add", "Add a tag"),
        ToolDefinition::for_params::<tools::TagParams>(
            "tag_remove",
            "Remove a tag (the last tag cannot be removed)",
        ),
        ToolDefinition::for_params::<tools::SyncConfigureParams>(
            "sync_configure",
            "Set or clear the webhook URL that receives every recorded change",
        ),
    ]
}
