use crate::http::{CaBundle, ClientConfig, Credential, TlsTrust};
use crate::vendor::Vendor;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FORTIGATE_HOST: &str = "192.168.0.254";
pub const DEFAULT_FORTIGATE_PORT: u16 = 10443;
pub const DEFAULT_MERAKI_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Env vars checked, in order, for an extra CA certificate.
const CA_PATH_VARS: [&str; 2] = ["NETMCP_CA_PATH", "ZSCALER_CA_PATH"];

/// Optional `config.toml`. Environment variables take precedence over it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fortigate: FortigateConfig,

    #[serde(default)]
    pub meraki: MerakiConfig,

    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FortigateConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_token: Option<String>,
    pub verify_ssl: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MerakiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TlsConfig {
    /// PEM file with an extra trusted CA (e.g. a TLS-inspecting proxy).
    pub ca_path: Option<PathBuf>,
}

impl Config {
    /// Load config if the file exists, otherwise return Ok(None).
    pub fn load_optional(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e))
                    .with_context(|| format!("failed to read config: {}", path.display()))
            }
        };

        let s = String::from_utf8(bytes).context("config is not valid UTF-8")?;
        let cfg: Config = toml::from_str(&s)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        Ok(Some(cfg))
    }
}

/// Resolve the upstream client settings for `vendor`.
///
/// `env` looks up an environment variable; empty values count as unset.
pub fn client_config(
    vendor: Vendor,
    cfg: Option<&Config>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientConfig> {
    let var = |name: &str| env(name).filter(|v| !v.is_empty());

    let (base_url, credential, accept_invalid_certs) = match vendor {
        Vendor::Fortigate => {
            let section = cfg.map(|c| &c.fortigate);
            let token = var("FORTIGATE_API_TOKEN")
                .or_else(|| section.and_then(|s| s.api_token.clone()))
                .context("FORTIGATE_API_TOKEN environment variable is required")?;
            let host = var("FORTIGATE_HOST")
                .or_else(|| section.and_then(|s| s.host.clone()))
                .unwrap_or_else(|| DEFAULT_FORTIGATE_HOST.to_string());
            let port = match var("FORTIGATE_PORT") {
                Some(p) => p
                    .parse::<u16>()
                    .with_context(|| format!("FORTIGATE_PORT is not a valid port: {p}"))?,
                None => section
                    .and_then(|s| s.port)
                    .unwrap_or(DEFAULT_FORTIGATE_PORT),
            };
            let verify = match var("FORTIGATE_VERIFY_SSL") {
                Some(v) => !v.eq_ignore_ascii_case("false"),
                None => section.and_then(|s| s.verify_ssl).unwrap_or(true),
            };
            (
                format!("https://{host}:{port}/api/v2"),
                Credential::BearerToken(token),
                !verify,
            )
        }
        Vendor::Meraki => {
            let section = cfg.map(|c| &c.meraki);
            let key = var("MERAKI_API_KEY")
                .or_else(|| section.and_then(|s| s.api_key.clone()))
                .context("MERAKI_API_KEY environment variable is required")?;
            let base_url = var("MERAKI_BASE_URL")
                .or_else(|| section.and_then(|s| s.base_url.clone()))
                .unwrap_or_else(|| DEFAULT_MERAKI_BASE_URL.to_string());
            (base_url, Credential::ApiKey(key), false)
        }
    };

    let ca_path = CA_PATH_VARS
        .iter()
        .find_map(|&name| var(name))
        .map(PathBuf::from)
        .or_else(|| cfg.and_then(|c| c.tls.ca_path.clone()));

    Ok(ClientConfig {
        vendor,
        base_url,
        credential,
        tls: TlsTrust {
            accept_invalid_certs,
            extra_ca: ca_path.and_then(|p| load_ca(&p)),
        },
    })
}

/// Missing or unreadable CA files are logged and skipped.
fn load_ca(path: &Path) -> Option<CaBundle> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "custom CA file not found, ignoring");
        return None;
    }
    match std::fs::read(path) {
        Ok(pem) => Some(CaBundle {
            path: path.to_path_buf(),
            pem,
        }),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read custom CA");
            None
        }
    }
}
