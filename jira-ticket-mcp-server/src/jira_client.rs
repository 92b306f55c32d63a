//! JIRA REST client
//!
//! Authenticated GET requests against the JIRA Cloud REST API v3. Every
//! failure comes back as [`JiraMcpError::Api`] with a user-facing message;
//! the raw transport error is kept only as the error source.

use crate::config::JiraConfig;
use crate::error::{JiraMcpError, JiraMcpResult};
use crate::issue::{Issue, ServerInfo};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const ISSUE_ENDPOINT: &str = "/rest/api/3/issue/";
pub const SERVER_INFO_ENDPOINT: &str = "/rest/api/3/serverInfo";

const AUTHENTICATION_FAILED: &str =
    "Authentication failed. Check the JIRA email and API token.";
const ACCESS_DENIED: &str =
    "Access denied. The JIRA account does not have permission to view this resource.";
const NOT_FOUND: &str =
    "The requested JIRA resource was not found. Check the issue key and project access.";
const RATE_LIMITED: &str = "JIRA rate limit exceeded. Wait a moment and try again.";
const SERVICE_UNAVAILABLE: &str = "JIRA service is temporarily unavailable. Try again later.";
const CONNECTION_FAILED: &str =
    "Unable to connect to JIRA. Check the base URL and network connectivity.";

/// A field to request from the issue endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    Named(String),

    /// Every custom field; JIRA has no prefix filter so this asks for `*all`
    AllCustomFields,
}

impl FieldSelector {
    pub fn named(name: impl Into<String>) -> Self {
        FieldSelector::Named(name.into())
    }

    fn as_query_token(&self) -> &str {
        match self {
            FieldSelector::Named(name) => name,
            FieldSelector::AllCustomFields => "*all",
        }
    }
}

/// Error body returned by JIRA on failures
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

/// JIRA client holding only immutable connection settings
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
}

impl JiraClient {
    /// Create a new JIRA client with the given configuration
    #[instrument(skip_all)]
    pub fn new(config: &JiraConfig) -> JiraMcpResult<Self> {
        let base_url = config.jira_url.trim_end_matches('/').to_string();
        info!("Initializing JIRA client for URL: {}", base_url);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| JiraMcpError::config(format!("Failed to build HTTP client: {}", e)))?;

        let credentials = BASE64.encode(format!("{}:{}", config.email, config.api_token));

        Ok(Self {
            http,
            base_url,
            auth_header: format!("Basic {}", credentials),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one issue, optionally restricted to `fields` and with `expand`
    #[instrument(skip(self))]
    pub async fn fetch_issue(
        &self,
        issue_key: &str,
        fields: &[FieldSelector],
        expand: &[&str],
    ) -> JiraMcpResult<Issue> {
        let mut query = Vec::new();
        if !fields.is_empty() {
            let tokens: Vec<&str> = fields.iter().map(FieldSelector::as_query_token).collect();
            query.push(("fields", tokens.join(",")));
        }
        if !expand.is_empty() {
            query.push(("expand", expand.join(",")));
        }

        let endpoint = format!("{}{}", ISSUE_ENDPOINT, issue_key);
        self.get_json(&endpoint, &query).await
    }

    /// Check credentials and base URL against the server info endpoint
    ///
    /// Errors are returned exactly as the request produced them.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> JiraMcpResult<ServerInfo> {
        debug!("Testing JIRA connection");
        let info: ServerInfo = self.get_json(SERVER_INFO_ENDPOINT, &[]).await?;
        info!(
            "Connection test successful ({})",
            info.version.as_deref().unwrap_or("unknown version")
        );
        Ok(info)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> JiraMcpResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(?query, "GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(timeout = e.is_timeout(), "Request to JIRA failed: {}", e);
                JiraMcpError::connectivity(CONNECTION_FAILED, e)
            })?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await.map_err(|e| {
                warn!("Failed to read JIRA response body: {}", e);
                JiraMcpError::connectivity(CONNECTION_FAILED, e)
            })?;
            return serde_json::from_str(&body).map_err(|e| {
                JiraMcpError::internal(format!("Failed to parse JIRA response: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let extracted = extract_error_message(status, &body);
        warn!(status = status.as_u16(), "JIRA request failed: {}", extracted);

        Err(JiraMcpError::api(
            user_facing_message(status.as_u16(), extracted),
            status.as_u16(),
        ))
    }
}

/// Best description of a failed response
///
/// JIRA's `errorMessages`/`errors` body first, then the HTTP status text,
/// then a generic message. Never fails.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error_messages.is_empty() {
            return parsed.error_messages.join("; ");
        }
        if !parsed.errors.is_empty() {
            return parsed
                .errors
                .iter()
                .map(|(field, message)| format!("{}: {}", field, message))
                .collect::<Vec<_>>()
                .join("; ");
        }
    }

    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("Request failed with status {}", status.as_u16()),
    }
}

/// Fixed message for well-known status codes, `extracted` otherwise
pub fn user_facing_message(status: u16, extracted: String) -> String {
    match status {
        401 => AUTHENTICATION_FAILED.to_string(),
        403 => ACCESS_DENIED.to_string(),
        404 => NOT_FOUND.to_string(),
        429 => RATE_LIMITED.to_string(),
        500 | 502 | 503 => SERVICE_UNAVAILABLE.to_string(),
        _ => extracted,
    }
}
