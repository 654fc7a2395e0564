//! X API client.
//!
//! Thin, non-retrying wrapper over `reqwest` that signs each request with
//! OAuth 1.0a and hands back the JSON body untouched. Domain operations live
//! in [`endpoints`] and [`media`].

pub mod endpoints;
pub mod media;
pub(crate) mod oauth;
pub mod self_id;

pub use endpoints::Page;
pub use media::MediaFetcher;
pub use self_id::SelfUserId;

use crate::config::{ApiConfig, Credentials};
use crate::error::{Result, XError};
use oauth::{percent_encode, OAuthSigner};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub(crate) type Query = Vec<(String, String)>;

/// Rate-limit window reported by the API on each response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// Unix seconds at which the window resets.
    pub reset: u64,
}

impl RateLimit {
    /// Read `x-rate-limit-*` headers; all three must be present.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        };

        Some(Self {
            limit: read("x-rate-limit-limit")?,
            remaining: read("x-rate-limit-remaining")?,
            reset: read("x-rate-limit-reset")?,
        })
    }
}

/// Parsed response body plus rate-limit headers.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub body: Value,
    pub rate_limit: Option<RateLimit>,
}

pub(crate) enum RequestBody {
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// Which configured host a request goes to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Host {
    Api,
    Upload,
}

#[derive(Debug)]
pub struct XClient {
    http: Client,
    api_url: String,
    upload_url: String,
    signer: OAuthSigner,
}

impl XClient {
    /// Create a client. Fails only if the HTTP client cannot be built.
    pub fn new(api: &ApiConfig, credentials: &Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(api.timeout())
            .user_agent(format!("x-mcp-server/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: api.api_url.trim_end_matches('/').to_string(),
            upload_url: api.upload_url.trim_end_matches('/').to_string(),
            signer: OAuthSigner::new(credentials),
        })
    }

    pub(crate) async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.send(Method::GET, Host::Api, path, query, RequestBody::Empty)
            .await
            .map(|r| r.body)
    }

    pub(crate) async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.send(Method::POST, Host::Api, path, &[], RequestBody::Json(body))
            .await
            .map(|r| r.body)
    }

    pub(crate) async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.send(Method::PUT, Host::Api, path, &[], RequestBody::Json(body))
            .await
            .map(|r| r.body)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, Host::Api, path, &[], RequestBody::Empty)
            .await
            .map(|r| r.body)
    }

    /// Sign and send one request. Query parameters are signed; bodies are not.
    pub(crate) async fn send(
        &self,
        method: Method,
        host: Host,
        path: &str,
        query: &[(String, String)],
        body: RequestBody,
    ) -> Result<ApiResponse> {
        let base = match host {
            Host::Api => &self.api_url,
            Host::Upload => &self.upload_url,
        };
        let url = format!("{}{}", base, path);
        let auth_header = self.signer.sign(method.as_str(), &url, query)?;

        let full_url = if query.is_empty() {
            url
        } else {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{}?{}", url, encoded)
        };

        debug!(method = %method, path, "Sending X API request");

        let mut request = self
            .http
            .request(method, &full_url)
            .header(reqwest::header::AUTHORIZATION, auth_header);
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await?;
        let status = response.status();
        let rate_limit = RateLimit::from_headers(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(XError::Api {
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(ApiResponse { body, rate_limit })
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(bytes: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(bytes).ok();
    let from_json = parsed.as_ref().and_then(|body| {
        ["detail", "title"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .or_else(|| {
                body.get("errors")
                    .and_then(|e| e.get(0))
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
    });

    from_json.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(bytes).trim().to_string();
        if text.is_empty() {
            "Unknown error".to_string()
        } else {
            text
        }
    })
}

/// Encode one user-supplied path segment. `.` and `..` are refused so an ID
/// can never walk the request onto another endpoint.
pub(crate) fn segment(value: &str) -> Result<String> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(XError::invalid_arguments(format!(
            "invalid identifier '{}'",
            value
        )));
    }
    Ok(percent_encode(value))
}
