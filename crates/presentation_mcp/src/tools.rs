//! Tool registry and dispatch
//!
//! Declares the callable tools with their JSON schemas and maps tool
//! invocations onto the shared transit service. Service failures become
//! `isError` tool results with a readable message, never protocol
//! errors.

use presentation_http::handlers::common::parse_time_param;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use transit::TransitService;

/// Route options returned by `get_route`
const ROUTE_LIMIT: usize = 5;

/// A tool definition as advertised by `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Errors that are the caller's protocol mistake, reported as JSON-RPC
/// errors rather than tool results
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Outcome of a tool call
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub text: String,
    pub is_error: bool,
}

impl ToolResult {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error: {message}"),
            is_error: true,
        }
    }

    /// Render as an MCP `tools/call` result
    #[must_use]
    pub fn into_json(self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

/// All tools advertised by this server
#[must_use]
pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_stations",
            description: "Find stations within a radius of a coordinate pair. \
                          Returns stations with id, name, and distance, nearest first.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "lat": { "type": "number", "description": "Latitude" },
                    "lon": { "type": "number", "description": "Longitude" },
                    "radius": { "type": "integer", "description": "Radius in meters", "default": 1000 },
                    "limit": { "type": "integer", "description": "Maximum number of results", "default": 20 }
                },
                "required": ["lat", "lon"]
            }),
        },
        ToolDef {
            name: "search_stations",
            description: "Search stations by name (e.g. 'Freiburg Hbf'). \
                          Returns matching stations.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search term" },
                    "limit": { "type": "integer", "description": "Maximum number of results", "default": 10 }
                },
                "required": ["query"]
            }),
        },
        ToolDef {
            name: "get_nearest_station",
            description: "Find the single station closest to a coordinate pair.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "lat": { "type": "number", "description": "Latitude" },
                    "lon": { "type": "number", "description": "Longitude" }
                },
                "required": ["lat", "lon"]
            }),
        },
        ToolDef {
            name: "get_departures",
            description: "Departures for a station id (e.g. '8000107'), \
                          ascending by scheduled time.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "station_id": { "type": "string", "description": "Station id" },
                    "time_iso": { "type": "string", "description": "ISO-8601 start time, defaults to now" },
                    "limit": { "type": "integer", "description": "Maximum number of results", "default": 10 }
                },
                "required": ["station_id"]
            }),
        },
        ToolDef {
            name: "get_route",
            description: "Plan a route between two station ids.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "origin_id": { "type": "string", "description": "Origin station id" },
                    "destination_id": { "type": "string", "description": "Destination station id" },
                    "time_iso": { "type": "string", "description": "ISO-8601 departure time, defaults to now" }
                },
                "required": ["origin_id", "destination_id"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct GetStationsArgs {
    lat: f64,
    lon: f64,
    #[serde(default = "default_radius")]
    radius: u32,
    #[serde(default = "default_stations_limit")]
    limit: usize,
}

const fn default_radius() -> u32 {
    1000
}

const fn default_stations_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
struct SearchStationsArgs {
    query: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
}

const fn default_search_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
struct NearestStationArgs {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct GetDeparturesArgs {
    station_id: String,
    #[serde(default)]
    time_iso: Option<String>,
    #[serde(default = "default_departures_limit")]
    limit: usize,
}

const fn default_departures_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
struct GetRouteArgs {
    origin_id: String,
    destination_id: String,
    #[serde(default)]
    time_iso: Option<String>,
}

/// Dispatch a tool call onto the service
///
/// # Errors
///
/// Returns `ToolError` for unknown tools or arguments that do not
/// match the declared schema.
pub async fn call_tool(
    service: &TransitService,
    name: &str,
    arguments: Value,
) -> Result<ToolResult, ToolError> {
    match name {
        "get_stations" => {
            let args: GetStationsArgs = parse_args(arguments)?;
            let result = service
                .find_stations(args.lat, args.lon, args.radius, args.limit)
                .await;
            Ok(to_tool_result(result))
        }
        "search_stations" => {
            let args: SearchStationsArgs = parse_args(arguments)?;
            let result = service.search_stations(&args.query, args.limit).await;
            Ok(to_tool_result(result))
        }
        "get_nearest_station" => {
            let args: NearestStationArgs = parse_args(arguments)?;
            let result = service.nearest_station(args.lat, args.lon).await;
            Ok(to_tool_result(result))
        }
        "get_departures" => {
            let args: GetDeparturesArgs = parse_args(arguments)?;
            let when = match parse_time_param(args.time_iso.as_deref()) {
                Ok(when) => when,
                Err(e) => return Ok(ToolResult::error(e)),
            };
            let result = service
                .departures(&args.station_id, when, args.limit, 60)
                .await;
            Ok(to_tool_result(result))
        }
        "get_route" => {
            let args: GetRouteArgs = parse_args(arguments)?;
            let when = match parse_time_param(args.time_iso.as_deref()) {
                Ok(when) => when,
                Err(e) => return Ok(ToolResult::error(e)),
            };
            let result = service
                .plan_route(&args.origin_id, &args.destination_id, when, ROUTE_LIMIT)
                .await;
            Ok(to_tool_result(result))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

fn to_tool_result<T: Serialize>(result: Result<T, transit::TransitError>) -> ToolResult {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(text) => ToolResult::ok(text),
            Err(e) => ToolResult::error(e),
        },
        Err(e) => ToolResult::error(e),
    }
}
