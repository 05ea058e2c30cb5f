//! Upstream HTTP client: one GET per tool call, failures folded into
//! [`ToolError::Internal`].

use crate::error::ToolError;
use crate::tools::UpstreamRequest;
use crate::vendor::Vendor;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

const MERAKI_KEY_HEADER: &str = "x-cisco-meraki-api-key";

#[derive(Clone)]
pub enum Credential {
    /// `Authorization: Bearer <token>` (FortiGate REST API admin token).
    BearerToken(String),
    /// `X-Cisco-Meraki-API-Key: <key>`.
    ApiKey(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
            Credential::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

/// Extra trust anchor loaded from a PEM file at startup.
#[derive(Debug, Clone)]
pub struct CaBundle {
    pub path: PathBuf,
    pub pem: Vec<u8>,
}

/// TLS settings for the outbound client. Applied to this client only.
#[derive(Debug, Clone, Default)]
pub struct TlsTrust {
    pub accept_invalid_certs: bool,
    pub extra_ca: Option<CaBundle>,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub vendor: Vendor,
    pub base_url: String,
    pub credential: Credential,
    pub tls: TlsTrust,
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    vendor: Vendor,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        match &config.credential {
            Credential::BearerToken(tok) => {
                let mut v = HeaderValue::from_str(&format!("Bearer {tok}"))
                    .context("API token is not a valid header value")?;
                v.set_sensitive(true);
                headers.insert(AUTHORIZATION, v);
            }
            Credential::ApiKey(key) => {
                let mut v =
                    HeaderValue::from_str(key).context("API key is not a valid header value")?;
                v.set_sensitive(true);
                headers.insert(HeaderName::from_static(MERAKI_KEY_HEADER), v);
            }
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if config.tls.accept_invalid_certs {
            tracing::warn!(vendor = %config.vendor, "TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(ca) = &config.tls.extra_ca {
            match reqwest::Certificate::from_pem(&ca.pem) {
                Ok(cert) => {
                    tracing::info!(path = %ca.path.display(), "using custom CA");
                    builder = builder.add_root_certificate(cert);
                }
                Err(e) => {
                    tracing::error!(path = %ca.path.display(), error = %e, "failed to load custom CA");
                }
            }
        }

        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self {
            http,
            vendor: config.vendor,
            base_url: config.base_url.clone(),
        })
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Base URL and endpoint joined by exactly one slash. The endpoint is
    /// always treated as relative, even when it looks like a full URL.
    pub fn url_for(&self, endpoint: &str) -> Result<Url, ToolError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Url::parse(&joined)
            .with_context(|| format!("invalid upstream URL: {joined}"))
            .map_err(ToolError::Other)
    }

    pub async fn get(&self, req: &UpstreamRequest) -> Result<Value, ToolError> {
        let url = self.url_for(&req.endpoint)?;
        tracing::debug!(vendor = %self.vendor, %url, "upstream GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.failure(e.status(), &error_chain(&e)))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| self.failure(Some(status), &error_chain(&e)))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| self.vendor.error_detail(&v))
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            return Err(self.failure(Some(status), &detail));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body)
            .map_err(|e| self.failure(Some(status), &format!("malformed response body: {e}")))
    }

    fn failure(&self, status: Option<StatusCode>, detail: &str) -> ToolError {
        let label = self.vendor.api_label();
        let msg = match status {
            Some(s) => format!("{label} API error: {} - {detail}", s.as_u16()),
            None => format!("{label} API error: {detail}"),
        };
        tracing::warn!(vendor = %self.vendor, "{msg}");
        ToolError::Internal(msg)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client(vendor: Vendor, base_url: String) -> UpstreamClient {
        let credential = match vendor {
            Vendor::Fortigate => Credential::BearerToken("tok".to_string()),
            Vendor::Meraki => Credential::ApiKey("key".to_string()),
        };
        UpstreamClient::new(&ClientConfig {
            vendor,
            base_url,
            credential,
            tls: TlsTrust::default(),
        })
        .expect("client should build")
    }

    #[test]
    fn url_join_uses_single_slash() {
        let c = client(Vendor::Meraki, "https://api.meraki.com/api/v1/".to_string());
        assert_eq!(
            c.url_for("/organizations").unwrap().as_str(),
            "https://api.meraki.com/api/v1/organizations"
        );
        assert_eq!(
            c.url_for("organizations").unwrap().as_str(),
            "https://api.meraki.com/api/v1/organizations"
        );
    }

    #[test]
    fn absolute_endpoint_stays_under_base() {
        let c = client(Vendor::Meraki, "https://api.meraki.com/api/v1".to_string());
        let url = c.url_for("https://evil.example/steal").unwrap();
        assert_eq!(url.host_str(), Some("api.meraki.com"));
    }

    #[test]
    fn bad_base_url_is_not_an_upstream_error() {
        let c = client(Vendor::Meraki, "not a url".to_string());
        let err = c.url_for("/organizations").unwrap_err();
        assert!(matches!(err, ToolError::Other(_)));
        assert!(err.to_string().contains("invalid upstream URL"));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let dbg = format!("{:?}", Credential::ApiKey("secret".to_string()));
        assert!(!dbg.contains("secret"));
    }

    #[tokio::test]
    async fn sends_bearer_token_and_accept_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/monitor/system/status")
                .header("authorization", "Bearer tok")
                .header("accept", "application/json");
            then.status(200).json_body(json!({"status": "success", "results": {}}));
        });

        let c = client(Vendor::Fortigate, server.url("/api/v2"));
        let body = c
            .get(&UpstreamRequest::new("/monitor/system/status"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn sends_meraki_api_key_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/organizations")
                .header("x-cisco-meraki-api-key", "key");
            then.status(200).json_body(json!([{"id": "1", "name": "Org"}]));
        });

        let c = client(Vendor::Meraki, server.url("/api/v1"));
        let body = c.get(&UpstreamRequest::new("/organizations")).await.unwrap();

        mock.assert();
        assert_eq!(body, json!([{"id": "1", "name": "Org"}]));
    }

    #[tokio::test]
    async fn forbidden_carries_status_and_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/monitor/system/status");
            then.status(403).json_body(json!({"message": "forbidden"}));
        });

        let c = client(Vendor::Fortigate, server.base_url());
        let err = c
            .get(&UpstreamRequest::new("/monitor/system/status"))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Internal(_)));
        assert_eq!(err.to_string(), "FortiGate API error: 403 - forbidden");
    }

    #[tokio::test]
    async fn meraki_errors_list_wins() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/organizations");
            then.status(401)
                .json_body(json!({"errors": ["Invalid API key"], "message": "ignored"}));
        });

        let c = client(Vendor::Meraki, server.base_url());
        let err = c.get(&UpstreamRequest::new("/organizations")).await.unwrap_err();
        assert_eq!(err.to_string(), "Meraki API error: 401 - Invalid API key");
    }

    #[tokio::test]
    async fn non_json_error_body_uses_status_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/organizations");
            then.status(502).body("<html>bad gateway</html>");
        });

        let c = client(Vendor::Meraki, server.base_url());
        let err = c.get(&UpstreamRequest::new("/organizations")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Meraki API error: 502 - Request failed with status code 502"
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_internal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/organizations");
            then.status(200).body("not json");
        });

        let c = client(Vendor::Meraki, server.base_url());
        let err = c.get(&UpstreamRequest::new("/organizations")).await.unwrap_err();
        assert!(matches!(err, ToolError::Internal(_)));
        assert!(err.to_string().starts_with("Meraki API error: 200 - malformed response body"));
    }

    #[tokio::test]
    async fn connection_failure_has_no_status() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let c = client(Vendor::Fortigate, format!("http://127.0.0.1:{port}/api/v2"));
        let err = c
            .get(&UpstreamRequest::new("/monitor/system/status"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Internal(_)));
        assert!(err.to_string().starts_with("FortiGate API error: "));
        assert!(!err.to_string().contains(" - "), "unexpected status in {err}");
    }
}
