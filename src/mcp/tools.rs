//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use super::handlers::{
    GetEventParticipantsHandler, GetEventStatisticsHandler, GetEventsHandler,
    GetParticipantsBySalesmanHandler, GetSalesmanStatisticsHandler, ShortenLinksHandler,
    ToolError,
};
use crate::api::{GoOutApi, UrlShortener};
use crate::config::Defaults;
use crate::models::ParticipantStatus;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "get_events")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, ToolError>;
}

/// Wrap a tool outcome in the response envelope.
///
/// Successful results already carry `success: true`; errors become
/// `{"success": false, "error": "<message>"}`.
pub fn envelope(result: Result<Value, ToolError>) -> Value {
    match result {
        Ok(value) => value,
        Err(e) => json!({ "success": false, "error": e.to_string() }),
    }
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with every Go-Out tool wired to `api` and `shortener`
    pub fn with_api(
        api: Arc<dyn GoOutApi>,
        shortener: Arc<dyn UrlShortener>,
        defaults: Defaults,
    ) -> Self {
        let mut registry = Self::new();
        registry.register_go_out_tools(api, shortener, defaults);
        registry
    }

    fn register_go_out_tools(
        &mut self,
        api: Arc<dyn GoOutApi>,
        shortener: Arc<dyn UrlShortener>,
        defaults: Defaults,
    ) {
        let statuses = ParticipantStatus::VALUES;

        // 1. get_events
        self.register(Tool {
            name: "get_events".to_string(),
            description: "Get a list of events from Go-Out with their statistics. Supports pagination for large datasets.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "isActive": {
                        "type": "boolean",
                        "description": "true = active events, false = past events",
                        "default": true
                    },
                    "search": {
                        "type": "string",
                        "description": "Search filter for event titles"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum events to return",
                        "default": defaults.events_limit
                    },
                    "skip": {
                        "type": "number",
                        "description": "Pagination offset - number of events to skip",
                        "default": 0
                    }
                }
            }),
            handler: Arc::new(GetEventsHandler {
                api: api.clone(),
                defaults: defaults.clone(),
            }),
        });

        // 2. get_event_participants
        self.register(Tool {
            name: "get_event_participants".to_string(),
            description: "Get participants for a specific event. Returns a flattened list where each participant (including companions) is a separate entry. By default returns all participants including hidden ones.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "eventId": {
                        "type": "string",
                        "description": "Event ID"
                    },
                    "status": {
                        "type": "string",
                        "enum": statuses,
                        "description": "Filter by status. \"All\" includes hidden participants unless includeHidden is false.",
                        "default": "All"
                    },
                    "includeHidden": {
                        "type": "boolean",
                        "description": "When status is \"All\", also fetch hidden participants",
                        "default": true
                    },
                    "limit": {
                        "type": "number",
                        "description": "Max orders per status",
                        "default": defaults.participants_limit
                    },
                    "skip": {
                        "type": "number",
                        "description": "Pagination offset",
                        "default": 0
                    }
                },
                "required": ["eventId"]
            }),
            handler: Arc::new(GetEventParticipantsHandler {
                api: api.clone(),
                defaults: defaults.clone(),
            }),
        });

        // 3. get_event_statistics
        self.register(Tool {
            name: "get_event_statistics".to_string(),
            description: "Get ticket statistics for an event.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "eventId": {
                        "type": "string",
                        "description": "Event ID"
                    }
                },
                "required": ["eventId"]
            }),
            handler: Arc::new(GetEventStatisticsHandler { api: api.clone() }),
        });

        // 4. get_salesman_statistics
        self.register(Tool {
            name: "get_salesman_statistics".to_string(),
            description: "Get statistics for the salesmen and tracking links of an event: views, free and paid registrations, and revenue, with a summary and the top performer.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "eventId": {
                        "type": "string",
                        "description": "Event ID"
                    },
                    "search": {
                        "type": "string",
                        "description": "Search filter for salesman names"
                    },
                    "skipNum": {
                        "type": "number",
                        "description": "Pagination offset",
                        "default": 0
                    }
                },
                "required": ["eventId"]
            }),
            handler: Arc::new(GetSalesmanStatisticsHandler { api: api.clone() }),
        });

        // 5. get_participants_by_salesman
        self.register(Tool {
            name: "get_participants_by_salesman".to_string(),
            description: "Get participants referred by a specific salesman, matched by phone number. Returns a flattened list with totals, accepted, hidden and the hidden percentage relative to accepted.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "eventId": {
                        "type": "string",
                        "description": "Event ID"
                    },
                    "salesmanId": {
                        "type": "string",
                        "description": "Salesman phone number"
                    },
                    "status": {
                        "type": "string",
                        "enum": statuses,
                        "description": "Filter by status. \"All\" includes hidden participants unless includeHidden is false.",
                        "default": "All"
                    },
                    "includeHidden": {
                        "type": "boolean",
                        "description": "When status is \"All\", also fetch hidden participants",
                        "default": true
                    },
                    "limit": {
                        "type": "number",
                        "description": "Max participants to return",
                        "default": defaults.participants_limit
                    },
                    "skip": {
                        "type": "number",
                        "description": "Pagination offset over participants",
                        "default": 0
                    }
                },
                "required": ["eventId", "salesmanId"]
            }),
            handler: Arc::new(GetParticipantsBySalesmanHandler {
                api,
                defaults,
            }),
        });

        // 6. shorten_links
        self.register(Tool {
            name: "shorten_links".to_string(),
            description: "Shorten one or more URLs using the is.gd service. Accepts a single URL string or an array of URLs.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "oneOf": [
                            { "type": "string", "description": "A single URL to shorten" },
                            { "type": "array", "items": { "type": "string" }, "description": "URLs to shorten" }
                        ],
                        "description": "URL or URLs to shorten"
                    }
                },
                "required": ["urls"]
            }),
            handler: Arc::new(ShortenLinksHandler { shortener }),
        });
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools, sorted by name
    pub fn all(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tracing::debug!(tool = name, "Executing tool");
        tool.handler.execute(args).await
    }

    /// Execute a tool and wrap the outcome in the response envelope
    pub async fn call(&self, name: &str, args: Value) -> Value {
        let result = self.execute(name, args).await;
        if let Err(e) = &result {
            tracing::warn!(tool = name, error = %e, "Tool failed");
        }
        envelope(result)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
