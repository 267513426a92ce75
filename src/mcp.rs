//! MCP (Model Context Protocol) handling module
//!
//! JSON-RPC 2.0 over stdio, one request per line. The server owns a single
//! browsing session: the catalog is loaded on first use and kept for the
//! life of the process, so `load_more` continues where `search_tours` left
//! off.

use crate::catalog::{CatalogSource, CatalogStore};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::search::{FilterEngine, Session, SynonymTable};
use crate::tools::search::rng_for;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{debug, error, info, warn};

/// Server state shared by every tool call
pub struct ServerContext {
    pub client_info: Option<ClientInfo>,
    config: AppConfig,
    engine: FilterEngine,
    session: Option<Session>,
    catalog_error: Option<String>,
}

impl ServerContext {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let engine = config.filter_engine()?;
        Ok(Self {
            client_info: None,
            config,
            engine,
            session: None,
            catalog_error: None,
        })
    }

    /// Context with an already loaded catalog
    pub fn with_catalog(config: AppConfig, catalog: CatalogStore) -> Result<Self, AppError> {
        let mut context = Self::new(config)?;
        context.start_session(catalog);
        Ok(context)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn synonyms(&self) -> &SynonymTable {
        self.engine.matcher().synonyms()
    }

    /// Why the catalog is empty, when loading failed
    pub fn catalog_error(&self) -> Option<&str> {
        self.catalog_error.as_deref()
    }

    pub fn get_client_name(&self) -> String {
        self.client_info
            .as_ref()
            .and_then(|info| info.name.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Client".to_string())
    }

    /// (Re)load the catalog and start a fresh session on it. Load failures
    /// leave an empty catalog behind instead of failing the call.
    pub async fn load_catalog(&mut self, source: CatalogSource) -> Result<(), AppError> {
        let (catalog, load_error) =
            CatalogStore::load_or_empty(&source, self.config.http_timeout()).await;
        self.catalog_error = load_error.map(|e| e.to_string());
        self.start_session(catalog);
        Ok(())
    }

    /// The session, loading the configured catalog on first use
    pub async fn session(&mut self) -> Result<&mut Session, AppError> {
        if self.session.is_none() {
            let source = self.config.catalog_source();
            self.load_catalog(source).await?;
        }
        self.session
            .as_mut()
            .ok_or_else(|| AppError::Internal("Session not initialized".to_string()))
    }

    fn start_session(&mut self, catalog: CatalogStore) {
        let mut rng = rng_for(None);
        self.session = Some(Session::new(
            catalog,
            self.engine.clone(),
            self.config.session_options(),
            &mut rng,
        ));
    }
}

/// MCP JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    /// Always "2.0"; read for completeness only
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Initialize request parameters
#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information
#[derive(Debug, Deserialize, Clone)]
pub struct ClientInfo {
    pub name: Option<String>,
    #[allow(dead_code)]
    pub version: Option<String>,
}

/// MCP JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP Error structure
#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: String,
    pub message: String,
}

/// MCP Tool call arguments
#[derive(Debug, Deserialize)]
pub struct ToolCallArgs {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// MCP Content item
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub r#type: String,
    pub text: String,
}

/// MCP Tool result
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

impl McpResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: &str, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }

    /// Wrap a tool outcome, mapping errors to their stable codes
    pub fn from_tool_result(id: Option<Value>, result: Result<ToolResult, AppError>) -> Self {
        match result {
            Ok(content) => match serde_json::to_value(content) {
                Ok(value) => Self::success(id, value),
                Err(e) => Self::error(id, "internal_error", &format!("Failed to serialize result: {}", e)),
            },
            Err(e) => Self::error(id, e.error_code(), &e.message()),
        }
    }
}

impl ToolResult {
    /// Create a text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(content)],
        }
    }

    /// Put a notice in front of the existing content
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.content.insert(0, ContentItem::text(notice));
        self
    }
}

impl ContentItem {
    /// Helper to create plain text content
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            r#type: "text".to_string(),
            text: content.into(),
        }
    }
}

/// Parse MCP request from JSON string
pub fn parse_request(json: &str) -> Result<McpRequest> {
    let request: McpRequest = serde_json::from_str(json)?;
    Ok(request)
}

/// Serialize MCP response to JSON string
pub fn serialize_response(response: &McpResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Handle stdio MCP communication
pub async fn handle_stdio(config: AppConfig) -> Result<()> {
    info!("Starting wanderhawaii MCP server on stdio");

    let stdin = tokio::io::stdin();
    let mut reader = AsyncBufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    let mut context = ServerContext::new(config)?;

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received request: {}", line);

        let response = match parse_request(&line) {
            Ok(request) => handle_request(request, &mut context).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                McpResponse::error(None, "parse_error", &format!("Invalid JSON: {}", e))
            }
        };

        let response_json = serialize_response(&response)?;
        debug!("Sending response: {}", response_json);

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Handle a single MCP request
pub async fn handle_request(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    match request.method.as_str() {
        "initialize" => handle_initialize(request, context),
        "tools/call" => handle_tool_call(request, context).await,
        "tools/list" => handle_tools_list(request),
        _ => McpResponse::error(
            request.id,
            "method_not_found",
            &format!("Method '{}' not found", request.method),
        ),
    }
}

/// Handle tools/call method
async fn handle_tool_call(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    let args: ToolCallArgs = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(
                request.id.clone(),
                "invalid_params",
                &format!("Invalid parameters: {}", e),
            )
        }
    };

    // Tools that take no arguments may be called with `null`
    let arguments = match args.arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    use crate::tools::{search, suggest};
    match args.name.as_str() {
        "search_tours" => search::handle_search(request.id, arguments, context).await,
        "load_more" => search::handle_load_more(request.id, arguments, context).await,
        "shuffle_tours" => search::handle_shuffle(request.id, arguments, context).await,
        "clear_filters" => search::handle_clear_filters(request.id, arguments, context).await,
        "suggest_terms" => suggest::handle_suggest(request.id, arguments, context).await,
        _ => {
            warn!("Unknown tool requested: {}", args.name);
            McpResponse::error(
                request.id,
                "tool_not_found",
                &format!("Tool '{}' not found", args.name),
            )
        }
    }
}

/// Handle tools/list method
fn handle_tools_list(request: McpRequest) -> McpResponse {
    let tools = build_tools_array();

    McpResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle initialize method
fn handle_initialize(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    if let Some(params) = request.params {
        if let Ok(init_params) = serde_json::from_value::<InitializeParams>(params) {
            context.client_info = init_params.client_info;
            info!("Client connected: {}", context.get_client_name());
        }
    }

    let tools = build_tools_array();
    let result = serde_json::json!({
        "serverInfo": {
            "name": "wanderhawaii",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "capabilities": {
            "tools": { "list": true, "call": true }
        },
        "tools": tools
    });
    McpResponse::success(request.id, result)
}

/// Build the tools array returned from tools/list and initialize
fn build_tools_array() -> Value {
    use crate::cli::{ClearFiltersArgs, LoadMoreArgs, SearchArgs, ShuffleArgs, SuggestArgs};
    use schemars::schema_for;

    // Generate JSON schemas from the CLI argument structs
    let search_schema = schema_for!(SearchArgs);
    let load_more_schema = schema_for!(LoadMoreArgs);
    let shuffle_schema = schema_for!(ShuffleArgs);
    let clear_schema = schema_for!(ClearFiltersArgs);
    let suggest_schema = schema_for!(SuggestArgs);

    serde_json::json!([
        {
            "name": "search_tours",
            "description": "Filter tours by island, activity, price and free text, sort them and show the first page",
            "inputSchema": search_schema
        },
        {
            "name": "load_more",
            "description": "Show the next page of the current results",
            "inputSchema": load_more_schema
        },
        {
            "name": "shuffle_tours",
            "description": "Shuffle the current results; the next search or sort restores ordering",
            "inputSchema": shuffle_schema
        },
        {
            "name": "clear_filters",
            "description": "Reset all filters, optionally searching for one term afterwards",
            "inputSchema": clear_schema
        },
        {
            "name": "suggest_terms",
            "description": "Suggest search keywords related to a partial term",
            "inputSchema": suggest_schema
        }
    ])
}
