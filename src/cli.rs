use crate::vendor::Vendor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MCP servers for FortiGate and Meraki network APIs
#[derive(Debug, Parser)]
#[command(name = "netmcp")]
#[command(version)]
#[command(about = "MCP servers for FortiGate and Meraki network APIs", long_about = None)]
pub struct Args {
    /// Config file (default: <config dir>/config.toml)
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the MCP server on stdin/stdout
    Serve {
        #[arg(value_enum)]
        vendor: Vendor,
    },

    /// Print the tool catalog as JSON
    Tools {
        #[arg(value_enum)]
        vendor: Vendor,
    },

    /// Invoke one tool and print its output
    Call {
        #[arg(value_enum)]
        vendor: Vendor,

        /// Tool name (see `netmcp tools <vendor>`)
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long = "args", value_name = "JSON")]
        args: Option<String>,
    },
}
