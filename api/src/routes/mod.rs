//! API route definitions.
//!
//! This module organizes all HTTP routes for the Logscope API server.

mod health;
mod mcp;
mod tools;

pub use health::health_routes;
pub use mcp::{mcp_routes, PROTOCOL_VERSION};
pub use tools::tool_routes;
