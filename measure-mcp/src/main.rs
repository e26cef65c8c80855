//! Measure MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio.
//!
//! Tools:
//! - convert: Convert a value between two units of a category
//! - convert_to_system: Convert a value into another unit system
//! - best_unit: Re-express a value in its most readable unit
//! - list_categories: List measure categories
//! - list_units: List the units of a category
//! - unit_info: Describe one unit
//! - help: Get documentation for functions
//! - list_functions: List available functions

mod config;

use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use measure_core::Value;
use measure_plugin::{EvalContext, PluginRegistry};
use measure_units::{load_units_library, CategoryRegistry};

use crate::config::Config;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "measure";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn parse_error(details: impl std::fmt::Display) -> Self {
        McpError { code: -32700, message: format!("Parse error: {}", details), data: None }
    }

    fn method_not_found(method: &str) -> Self {
        McpError { code: -32601, message: format!("Method not found: {}", method), data: None }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: -32602, message: message.into(), data: None }
    }
}

/// Everything a request handler needs; read-only after startup
struct Server {
    functions: PluginRegistry,
    units: Arc<CategoryRegistry>,
    ctx: EvalContext,
}

impl Server {
    fn new(units: Arc<CategoryRegistry>, precision: Option<u32>) -> Self {
        Server {
            functions: load_units_library(PluginRegistry::new(), units.clone()),
            units,
            ctx: EvalContext::new().with_precision(precision),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_logging();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("invalid configuration: {}", e);
            process::exit(2);
        }
    };

    let units = match config.build_registry() {
        Ok(r) => Arc::new(r),
        Err(e) => {
            error!(code = e.code(), "catalogue rejected: {}", e);
            process::exit(1);
        }
    };

    let server = Server::new(units, config.precision);

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Measure MCP server started");
    info!(
        categories = server.units.len(),
        units = server.units.unit_count(),
        functions = server.functions.function_count(),
        precision = ?config.precision,
        "registry ready"
    );

    // Use BufReader for stdin (line-based protocol)
    let stdin = io::stdin();
    let reader = io::BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("error reading input: {}", e);
                break;
            }
        };

        let Some(response) = handle_line(&server, &line) else { continue };

        let response_json = match serde_json::to_string(&response) {
            Ok(s) => s,
            Err(e) => {
                error!("error serializing response: {}", e);
                continue;
            }
        };
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", response_json).and_then(|_| stdout.flush()) {
            error!("error writing response: {}", e);
            break;
        }
    }

    info!("client disconnected, shutting down");
}

/// Handle one input line; `None` when nothing must be written back
fn handle_line(server: &Server, line: &str) -> Option<McpResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!("error parsing request: {}", e);
            return Some(McpResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(McpError::parse_error(e)),
            });
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(server, &request);

    // Notifications (no id) should NOT receive a response
    if request.id.is_none() {
        debug!(method = %request.method, "notification processed");
        return None;
    }
    Some(response)
}

fn handle_request(server: &Server, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(server, &request.params),

        _ => Err(McpError::method_not_found(&request.method)),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion across metric and imperial measure categories"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Measure converts values between units of a measure category (density, torque, fuel-efficiency, ...). Call 'list_categories' first, then 'list_units' for the symbols a category accepts. Unit symbols are matched exactly (e.g. \"kg/m³\", \"L/100km\")."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value from one unit to another within a measure category. Crosses METRIC/IMPERIAL when the category states a ratio.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "description": "Measure category key, e.g. \"density\"" },
                        "from": { "type": "string", "description": "Source unit symbol, e.g. \"kg/m³\"" },
                        "to": { "type": "string", "description": "Target unit symbol, e.g. \"lb/ft³\"" },
                        "value": { "type": "number", "description": "Value in the source unit" },
                        "precision": { "type": "integer", "description": "Decimals to round the result to" }
                    },
                    "required": ["category", "from", "to", "value"]
                }
            },
            {
                "name": "convert_to_system",
                "description": "Convert a value into the anchor unit of another unit system (METRIC or IMPERIAL).",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "description": "Measure category key" },
                        "from": { "type": "string", "description": "Source unit symbol" },
                        "system": { "type": "string", "enum": ["METRIC", "IMPERIAL"] },
                        "value": { "type": "number", "description": "Value in the source unit" },
                        "precision": { "type": "integer", "description": "Decimals to round the result to" }
                    },
                    "required": ["category", "from", "system", "value"]
                }
            },
            {
                "name": "best_unit",
                "description": "Re-express a value in the most readable unit of the same system (e.g. 25000 m -> 25 km).",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "description": "Measure category key" },
                        "from": { "type": "string", "description": "Unit the value is in" },
                        "value": { "type": "number", "description": "Value to re-express" },
                        "precision": { "type": "integer", "description": "Decimals to round the result to" }
                    },
                    "required": ["category", "from", "value"]
                }
            },
            {
                "name": "list_categories",
                "description": "List registered measure categories with their unit systems.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "list_units",
                "description": "List the units of a measure category, optionally restricted to one system.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "description": "Measure category key" },
                        "system": { "type": "string", "enum": ["METRIC", "IMPERIAL"] }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "unit_info",
                "description": "Describe one unit: system, anchor factor, transform and cross-system ratio.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "description": "Measure category key" },
                        "unit": { "type": "string", "description": "Unit symbol" }
                    },
                    "required": ["category", "unit"]
                }
            },
            {
                "name": "help",
                "description": "Get documentation for a function, or general help.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Function name. Omit for general help." }
                    }
                }
            },
            {
                "name": "list_functions",
                "description": "List all available functions, optionally by category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "description": "Filter, e.g. \"units\"" }
                    }
                }
            }
        ]
    }))
}

fn handle_tool_call(server: &Server, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));
    debug!(tool = name, "tool call");

    match name {
        "convert" => tool_convert(server, &args),
        "convert_to_system" => tool_convert_to_system(server, &args),
        "best_unit" => tool_best_unit(server, &args),
        "list_categories" => tool_list_categories(server),
        "list_units" => tool_list_units(server, &args),
        "unit_info" => tool_unit_info(server, &args),
        "help" => tool_help(server, &args),
        "list_functions" => tool_list_functions(server, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_convert(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = required_str(args, "category")?;
    let from = required_str(args, "from")?;
    let to = required_str(args, "to")?;
    let value = required_number(args, "value")?;
    let ctx = context_for(server, args)?;

    let result = server.functions.call_function("convert", &[
        Value::Number(value), Value::from(category), Value::from(from), Value::from(to),
    ], &ctx);

    let text = match &result {
        Value::Number(n) => format!("{} {} = {} {}", value, from, n, to),
        _ => String::new(),
    };
    Ok(tool_result(&result, text))
}

fn tool_convert_to_system(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = required_str(args, "category")?;
    let from = required_str(args, "from")?;
    let system = required_str(args, "system")?;
    let value = required_number(args, "value")?;
    let ctx = context_for(server, args)?;

    let result = server.functions.call_function("convert_to_system", &[
        Value::Number(value), Value::from(category), Value::from(from), Value::from(system),
    ], &ctx);

    let text = format!("{} {} = {}", value, from, quantity_text(&result));
    Ok(tool_result(&result, text))
}

fn tool_best_unit(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = required_str(args, "category")?;
    let from = required_str(args, "from")?;
    let value = required_number(args, "value")?;
    let ctx = context_for(server, args)?;

    let result = server.functions.call_function("best_unit", &[
        Value::Number(value), Value::from(category), Value::from(from),
    ], &ctx);

    let text = format!("{} {} = {}", value, from, quantity_text(&result));
    Ok(tool_result(&result, text))
}

fn tool_list_categories(server: &Server) -> Result<JsonValue, McpError> {
    let result = server.functions.call_function("list_categories", &[], &server.ctx);
    let text = format!("{} categories: {}", server.units.len(), server.units.categories().join(", "));
    Ok(tool_result(&result, text))
}

fn tool_list_units(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = required_str(args, "category")?;
    let mut call_args = vec![Value::from(category)];
    if let Some(system) = args.get("system").and_then(|v| v.as_str()) {
        call_args.push(Value::from(system));
    }

    let result = server.functions.call_function("list_units", &call_args, &server.ctx);
    let text = match &result {
        Value::List(units) => {
            let symbols: Vec<String> = units.iter().map(|u| u.get("symbol").to_string()).collect();
            format!("{}: {}", category, symbols.join(", "))
        }
        _ => String::new(),
    };
    Ok(tool_result(&result, text))
}

fn tool_unit_info(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = required_str(args, "category")?;
    let unit = required_str(args, "unit")?;

    let result = server.functions.call_function("unit_info", &[Value::from(category), Value::from(unit)], &server.ctx);
    let text = format!("{} ({}): {}", unit, result.get("system"), result.get("name"));
    Ok(tool_result(&result, text))
}

fn tool_help(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let name = args.get("name").and_then(|v| v.as_str());
    let help = server.functions.help(name);
    Ok(tool_result(&help, format_help(&help)))
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::List(examples)) = map.get("examples") {
                for e in examples {
                    out.push_str(&format!("- `{}`\n", e));
                }
            }
            if let Some(Value::Object(by_category)) = map.get("functions") {
                for (category, names) in by_category {
                    out.push_str(&format!("**{}:** {}\n", category, names));
                }
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        other => other.to_string(),
    }
}

fn tool_list_functions(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = args.get("category").and_then(|v| v.as_str());
    let functions = server.functions.list_functions(category);
    let count = functions.as_list().map_or(0, |l| l.len());
    Ok(tool_result(&functions, format!("{} functions listed", count)))
}

/// Successful MCP result; conversion failures are reported with `isError`
fn tool_result(value: &Value, text: String) -> JsonValue {
    match value {
        Value::Error(e) => json!({
            "content": [{ "type": "text", "text": format!("Error: {}", e) }],
            "error": e,
            "isError": true
        }),
        _ => json!({
            "content": [{ "type": "text", "text": text }],
            "data": value.to_json(),
            "isError": false
        }),
    }
}

fn quantity_text(result: &Value) -> String {
    format!("{} {}", result.get("value"), result.get("unit"))
}

fn required_str<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, McpError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {}", key)))
}

/// Numbers may also arrive as numeric strings
fn required_number(args: &JsonValue, key: &str) -> Result<f64, McpError> {
    match args.get(key) {
        Some(JsonValue::Number(n)) => n.as_f64()
            .ok_or_else(|| McpError::invalid_params(format!("{} is not a finite number", key))),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>()
            .map_err(|_| McpError::invalid_params(format!("{} is not a number: {}", key, s))),
        Some(_) => Err(McpError::invalid_params(format!("{} must be a number", key))),
        None => Err(McpError::invalid_params(format!("Missing {}", key))),
    }
}

/// Per-call precision overrides the configured default
fn context_for(server: &Server, args: &JsonValue) -> Result<EvalContext, McpError> {
    match args.get("precision") {
        None | Some(JsonValue::Null) => Ok(server.ctx.clone()),
        Some(p) => p.as_u64()
            .map(|p| server.ctx.clone().with_precision(Some(p.min(u32::MAX as u64) as u32)))
            .ok_or_else(|| McpError::invalid_params("precision must be a non-negative integer")),
    }
}
