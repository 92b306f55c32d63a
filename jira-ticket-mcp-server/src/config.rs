//! Configuration management for the JIRA ticket MCP server
//!
//! Handles loading configuration from environment variables, TOML files,
//! and provides sensible defaults for all optional settings.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Main configuration structure for the JIRA ticket MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// JIRA instance URL (required)
    pub jira_url: String,

    /// Account email used for Basic authentication (required)
    pub email: String,

    /// API token paired with `email` (required)
    pub api_token: String,

    /// Project key used when callers omit one
    pub default_project_key: Option<String>,

    /// Log filter used when RUST_LOG is not set (default: "info")
    pub log_level: String,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    /// chrono format string for rendered timestamps
    pub date_format: String,

    /// How custom fields are rendered in reports
    pub custom_fields: CustomFieldSettings,
}

/// Custom field rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldSettings {
    pub strategy: CustomFieldStrategy,

    /// Known fields and their display labels, in report order
    pub allow_list: Vec<CustomFieldMapping>,
}

/// Which custom fields make it into a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldStrategy {
    /// Only the configured allow-list, shown under friendly labels
    #[default]
    AllowList,

    /// Every `customfield_*` with a displayable value, keyed by field id
    Generic,
}

/// A known custom field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldMapping {
    pub field_id: String,
    pub label: String,
    #[serde(default)]
    pub kind: CustomFieldKind,
}

/// Extractor used for a known custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldKind {
    /// Scalar, named option or multi-select
    #[default]
    Value,

    /// The development panel summary string
    Development,
}

impl CustomFieldMapping {
    pub fn new(field_id: &str, label: &str, kind: CustomFieldKind) -> Self {
        Self {
            field_id: field_id.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

impl Default for CustomFieldSettings {
    fn default() -> Self {
        Self {
            strategy: CustomFieldStrategy::AllowList,
            allow_list: default_allow_list(),
        }
    }
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            jira_url: String::new(),
            email: String::new(),
            api_token: String::new(),
            default_project_key: None,
            log_level: "info".to_string(),
            request_timeout_seconds: 30,
            date_format: "%d/%m/%Y %H:%M".to_string(),
            custom_fields: CustomFieldSettings::default(),
        }
    }
}

impl JiraConfig {
    /// Load configuration from environment variables, TOML file, and defaults
    /// Priority: env vars > TOML file > defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(file_config) = Self::load_from_file("config/jira-ticket-mcp.toml") {
            info!("Loaded configuration from TOML file");
            config = file_config;
        } else if let Ok(file_config) = Self::load_from_file("jira-ticket-mcp.toml") {
            info!("Loaded configuration from TOML file in current directory");
            config = file_config;
        } else {
            debug!("No TOML configuration file found, using defaults and environment variables");
        }

        config.load_from_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from environment variables
    fn load_from_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("JIRA_BASE_URL") {
            self.jira_url = url;
            debug!("Loaded JIRA_BASE_URL from environment");
        }

        if let Ok(email) = env::var("JIRA_EMAIL") {
            self.email = email;
            debug!("Loaded JIRA_EMAIL from environment");
        }

        if let Ok(token) = env::var("JIRA_API_TOKEN") {
            self.api_token = token;
            debug!("Loaded JIRA_API_TOKEN from environment");
        }

        if let Ok(project) = env::var("JIRA_PROJECT_KEY") {
            if !project.trim().is_empty() {
                self.default_project_key = Some(project.trim().to_uppercase());
            }
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.log_level = level;
        }

        if let Ok(timeout) = env::var("JIRA_REQUEST_TIMEOUT") {
            let timeout_seconds = timeout
                .parse::<u64>()
                .with_context(|| format!("JIRA_REQUEST_TIMEOUT must be a number, got '{timeout}'"))?;
            self.request_timeout_seconds = timeout_seconds;
            debug!(
                "Set request timeout to {} seconds from environment",
                timeout_seconds
            );
        }

        if let Ok(strategy) = env::var("JIRA_CUSTOM_FIELD_STRATEGY") {
            self.custom_fields.strategy = match strategy.to_lowercase().as_str() {
                "allow_list" | "allowlist" => CustomFieldStrategy::AllowList,
                "generic" => CustomFieldStrategy::Generic,
                other => {
                    return Err(anyhow::anyhow!(
                        "JIRA_CUSTOM_FIELD_STRATEGY must be 'allow_list' or 'generic', got '{}'",
                        other
                    ))
                }
            };
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.jira_url.is_empty() {
            return Err(anyhow::anyhow!(
                "JIRA URL is required. Set JIRA_BASE_URL environment variable or configure in TOML file."
            ));
        }

        let url = reqwest::Url::parse(&self.jira_url)
            .with_context(|| format!("JIRA URL is not a valid URL: {}", self.jira_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!(
                "JIRA URL must start with http:// or https://. Got: {}",
                self.jira_url
            ));
        }

        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(anyhow::anyhow!(
                "JIRA email is missing or invalid. Set JIRA_EMAIL to the account's email address."
            ));
        }

        if self.api_token.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "JIRA API token cannot be empty. Set JIRA_API_TOKEN."
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("request_timeout_seconds must be greater than 0"));
        }

        info!("Configuration validation successful");
        Ok(())
    }
}

/// Default allow-list of known custom fields
fn default_allow_list() -> Vec<CustomFieldMapping> {
    vec![
        CustomFieldMapping::new("customfield_10253", "Equipe Pix", CustomFieldKind::Value),
        CustomFieldMapping::new("customfield_10254", "Aplicação Pix", CustomFieldKind::Value),
        CustomFieldMapping::new(
            "customfield_10000",
            "Desenvolvimento",
            CustomFieldKind::Development,
        ),
        CustomFieldMapping::new(
            "customfield_10255",
            "Período de Resolução",
            CustomFieldKind::Value,
        ),
    ]
}
