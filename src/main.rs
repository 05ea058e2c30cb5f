mod app;
mod cli;
mod config;
mod error;
mod http;
mod mcp;
mod paths;
mod tools;
mod vendor;

use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is the MCP channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Args::parse();

    let cfg = match &args.config {
        Some(p) => Some(
            config::Config::load_optional(p)?
                .with_context(|| format!("config file not found: {}", p.display()))?,
        ),
        None => config::Config::load_optional(paths::default_config_path()?)?,
    };
    tracing::debug!(loaded = cfg.is_some(), "resolved config");

    match args.cmd {
        cli::Command::Serve { vendor } => app::cmd_serve(vendor, cfg.as_ref()).await,
        cli::Command::Tools { vendor } => app::cmd_tools(vendor),
        cli::Command::Call { vendor, tool, args } => {
            app::cmd_call(vendor, cfg.as_ref(), &tool, args.as_deref()).await
        }
    }
}
