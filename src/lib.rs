//! # Go-Out MCP
//!
//! A Model Context Protocol (MCP) server exposing the Go-Out event platform:
//! events, participants, ticket and salesman statistics, and link shortening.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Upstream records, request bodies and cleaned-up output shapes
//! - [`api`]: The [`GoOutApi`] capability, its HTTP client and a mock
//! - [`utils`]: Flattening, pagination, the hidden-status merge and statistics
//! - [`mcp`]: Tool registry, handlers and the MCP server
//! - [`config`]: Configuration management

pub mod api;
pub mod config;
pub mod mcp;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use api::{GoOutApi, GoOutClient};
pub use mcp::{McpServer, ToolRegistry};
pub use models::{Participant, RawOrder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
