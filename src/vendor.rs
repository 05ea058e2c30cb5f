use crate::tools::{fortigate, meraki, Catalog};
use serde_json::Value;
use std::fmt;

/// The two upstream APIs this binary can front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Vendor {
    Fortigate,
    Meraki,
}

impl Vendor {
    pub fn catalog(self) -> Catalog {
        match self {
            Vendor::Fortigate => fortigate::CATALOG,
            Vendor::Meraki => meraki::CATALOG,
        }
    }

    /// Name reported in the MCP `initialize` handshake.
    pub fn server_name(self) -> &'static str {
        match self {
            Vendor::Fortigate => "fortinet-server",
            Vendor::Meraki => "meraki-server",
        }
    }

    /// Prefix for upstream error messages.
    pub fn api_label(self) -> &'static str {
        match self {
            Vendor::Fortigate => "FortiGate",
            Vendor::Meraki => "Meraki",
        }
    }

    /// Best error text in an upstream error body.
    ///
    /// Meraki reports `{"errors": ["..."]}`, falling back to `message`;
    /// FortiGate only ever uses `message`.
    pub fn error_detail(self, body: &Value) -> Option<String> {
        let first_error = match self {
            Vendor::Meraki => body
                .get("errors")
                .and_then(|e| e.get(0))
                .and_then(non_empty_text),
            Vendor::Fortigate => None,
        };
        first_error.or_else(|| body.get("message").and_then(non_empty_text))
    }
}

fn non_empty_text(v: &Value) -> Option<String> {
    match v {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Vendor::Fortigate => "fortigate",
            Vendor::Meraki => "meraki",
        })
    }
}
