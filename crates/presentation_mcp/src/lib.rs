//! MCP tool-protocol presentation layer
//!
//! Exposes the transit service operations as agent-callable tools over
//! a line-oriented JSON-RPC 2.0 (MCP) connection on stdin/stdout. Each
//! tool call is independent and stateless; the same service type backs
//! the REST façade, so payloads are identical for identical inputs.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
