use crate::config::{self, Config};
use crate::http::UpstreamClient;
use crate::mcp::{self, ToolServer};
use crate::vendor::Vendor;
use anyhow::Context;

pub fn build_server(vendor: Vendor, cfg: Option<&Config>) -> anyhow::Result<ToolServer> {
    let client_cfg = config::client_config(vendor, cfg, |k| std::env::var(k).ok())?;
    tracing::debug!(?client_cfg, "resolved upstream config");
    let client = UpstreamClient::new(&client_cfg)?;
    Ok(ToolServer::new(client))
}

/// Serve MCP on stdio until EOF or Ctrl-C.
pub async fn cmd_serve(vendor: Vendor, cfg: Option<&Config>) -> anyhow::Result<()> {
    let server = build_server(vendor, cfg)?;
    tracing::info!("{} MCP server running on stdio", vendor.server_name());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let stopped = mcp::serve_until(&server, stdin, stdout, tokio::signal::ctrl_c())
        .await
        .context("stdio transport failed")?;
    match stopped {
        mcp::Stopped::Eof => {
            tracing::info!("stdin closed, shutting down");
            Ok(())
        }
        mcp::Stopped::Interrupted => {
            tracing::info!("interrupted, shutting down");
            // A pending stdin read blocks runtime shutdown; leave directly.
            // Responses are flushed as they are written.
            std::process::exit(0)
        }
    }
}

/// Print the catalog. Needs no credentials.
pub fn cmd_tools(vendor: Vendor) -> anyhow::Result<()> {
    let tools = vendor.catalog().descriptors();
    let out = serde_json::to_string_pretty(&tools).context("failed to encode catalog")?;
    println!("{out}");
    Ok(())
}

pub async fn cmd_call(
    vendor: Vendor,
    cfg: Option<&Config>,
    tool: &str,
    args: Option<&str>,
) -> anyhow::Result<()> {
    let arguments = args
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("--args is not valid JSON")?;

    let server = build_server(vendor, cfg)?;
    let result = server
        .call_tool(tool, arguments)
        .await
        .with_context(|| format!("{tool} failed"))?;
    println!("{}", result.text());
    Ok(())
}
