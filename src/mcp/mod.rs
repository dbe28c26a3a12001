//! MCP (Model Context Protocol) implementation.

mod handlers;
pub mod server;
mod tools;

pub use handlers::{
    GetEventParticipantsHandler, GetEventStatisticsHandler, GetEventsHandler,
    GetParticipantsBySalesmanHandler, GetSalesmanStatisticsHandler, ShortenLinksHandler,
    ToolError,
};
pub use server::{McpServer, SERVER_NAME};
pub use tools::{envelope, Tool, ToolHandler, ToolRegistry};
