//! Line-oriented MCP server loop
//!
//! Reads one JSON-RPC frame per line from the reader and writes one
//! response per request to the writer. Notifications produce no
//! output. The loop holds no per-request state.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};
use transit::TransitService;

use crate::protocol::{
    INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, Request, Response,
};
use crate::tools;

/// Stateless MCP server over a shared transit service
#[derive(Debug, Clone)]
pub struct McpServer {
    service: Arc<TransitService>,
}

impl McpServer {
    /// Create a server over a service instance
    #[must_use]
    pub fn new(service: Arc<TransitService>) -> Self {
        Self { service }
    }

    /// Serve frames from `reader` until EOF, writing responses to
    /// `writer`
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the underlying streams
    /// fails.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: tokio::io::AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle one frame; returns the serialized response, or None for
    /// notifications
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Unparsable frame");
                let response = Response::error(Value::Null, PARSE_ERROR, format!("Parse error: {e}"));
                return serialize(&response);
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Ignoring notification");
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = self.handle_request(id, &request).await;
        serialize(&response)
    }

    async fn handle_request(&self, id: Value, request: &Request) -> Response {
        debug!(method = %request.method, "Handling request");

        match request.method.as_str() {
            "initialize" => Response::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "fahrplan-mcp",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => Response::success(id, json!({})),
            "tools/list" => Response::success(id, json!({ "tools": tools::definitions() })),
            "tools/call" => self.handle_tool_call(id, request.params.clone()).await,
            other => Response::error(id, METHOD_NOT_FOUND, format!("Unknown method: {other}")),
        }
    }

    async fn handle_tool_call(&self, id: Value, params: Option<Value>) -> Response {
        let params = params.unwrap_or_else(|| json!({}));
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Response::error(id, INVALID_PARAMS, "tool name is required");
        };
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        match tools::call_tool(&self.service, name, arguments).await {
            Ok(result) => Response::success(id, result.into_json()),
            Err(e) => Response::error(id, INVALID_PARAMS, e.to_string()),
        }
    }
}

fn serialize(response: &Response) -> Option<String> {
    match serde_json::to_string(response) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!(error = %e, "Failed to serialize response");
            None
        }
    }
}
