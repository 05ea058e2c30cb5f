//! MCP server over newline-delimited JSON-RPC.
//!
//! One request is read, handled and answered before the next line is read.
//! stdout carries protocol traffic only; everything else is logged to stderr.

pub mod protocol;


use crate::error::{ToolError, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::http::UpstreamClient;
use crate::tools::{Arguments, Catalog};
use crate::vendor::Vendor;
use protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerInfo, DEFAULT_PROTOCOL_VERSION,
};
use serde_json::{json, Value};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Catalog plus upstream client for one vendor.
#[derive(Debug, Clone)]
pub struct ToolServer {
    vendor: Vendor,
    catalog: Catalog,
    client: UpstreamClient,
}

impl ToolServer {
    pub fn new(client: UpstreamClient) -> Self {
        let vendor = client.vendor();
        Self {
            vendor,
            catalog: vendor.catalog(),
            client,
        }
    }

    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.catalog.descriptors(),
        }
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<CallToolResult, ToolError> {
        let args = Arguments::from_value(arguments)?;
        let req = self.catalog.resolve(name, &args)?;
        tracing::info!(vendor = %self.vendor, tool = name, endpoint = %req.endpoint, "calling tool");
        let data = self.client.get(&req).await?;
        CallToolResult::json(&data)
    }

    /// Answer one request. Notifications get `None`.
    pub async fn handle(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = req.id else {
            tracing::debug!(method = %req.method, "notification");
            return None;
        };

        let response = match req.method.as_str() {
            "initialize" => {
                let params: InitializeParams = req
                    .params
                    .and_then(|p| serde_json::from_value(p).ok())
                    .unwrap_or_default();
                let result = InitializeResult {
                    protocol_version: params
                        .protocol_version
                        .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
                    capabilities: json!({ "tools": {} }),
                    server_info: ServerInfo {
                        name: self.vendor.server_name().to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                };
                to_response(id, &result)
            }
            "ping" => JsonRpcResponse::ok(id, json!({})),
            "tools/list" => to_response(id, &self.list_tools()),
            "tools/call" => {
                let params: CallToolParams =
                    match serde_json::from_value(req.params.unwrap_or(Value::Null)) {
                        Ok(p) => p,
                        Err(e) => {
                            return Some(JsonRpcResponse::err(
                                id,
                                INVALID_PARAMS,
                                format!("Invalid tools/call params: {e}"),
                            ))
                        }
                    };
                match self.call_tool(&params.name, params.arguments).await {
                    Ok(result) => to_response(id, &result),
                    Err(err) => {
                        tracing::warn!(tool = %params.name, error = %err, "tool call failed");
                        JsonRpcResponse::tool_error(id, &err)
                    }
                }
            }
            other => JsonRpcResponse::err(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        };
        Some(response)
    }
}

fn to_response<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse::ok(id, v),
        Err(e) => JsonRpcResponse::tool_error(id, &ToolError::Other(e.into())),
    }
}

/// Serve requests from `reader` until EOF, writing one response line each.
pub async fn serve<R, W>(server: &ToolServer, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                Some(JsonRpcResponse::err(Value::Null, PARSE_ERROR, format!("Parse error: {e}")))
            }
            Ok(msg) => {
                let id = msg.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(msg) {
                    Ok(req) => server.handle(req).await,
                    Err(e) => {
                        tracing::warn!(error = %e, "invalid request");
                        Some(JsonRpcResponse::err(
                            id,
                            INVALID_REQUEST,
                            format!("Invalid Request: {e}"),
                        ))
                    }
                }
            }
        };

        if let Some(resp) = response {
            let mut out = serde_json::to_vec(&resp)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
    }
    Ok(())
}

/// Why [`serve_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    Eof,
    Interrupted,
}

/// Run [`serve`] until the input ends or `shutdown` resolves, whichever
/// comes first.
pub async fn serve_until<R, W, S>(
    server: &ToolServer,
    reader: R,
    writer: W,
    shutdown: S,
) -> std::io::Result<Stopped>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        res = serve(server, reader, writer) => res.map(|()| Stopped::Eof),
        res = shutdown => res.map(|()| Stopped::Interrupted),
    }
}
