//! Issue report tool
//!
//! Fetches one issue and renders it as a markdown report.

use super::{normalize_issue_key, requested_fields};
use crate::config::JiraConfig;
use crate::error::JiraMcpResult;
use crate::formatting::{format_issue_summary, FormatOptions, IssueFormatter};
use crate::jira_client::JiraClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Standard fields shown in the report
const REPORT_FIELDS: &[&str] = &[
    "summary",
    "status",
    "assignee",
    "reporter",
    "priority",
    "labels",
    "fixVersions",
    "issuetype",
    "project",
    "parent",
    "issuelinks",
    "description",
    "created",
    "updated",
];

/// Parameters for the get_issue tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetIssueParams {
    /// JIRA issue key (required)
    /// Examples: "PROJ-123", "PIX-4567"
    #[serde(alias = "issue_key")]
    pub issue_key: String,

    /// Include the latest comments in the report (optional, default: true)
    #[serde(default, alias = "include_comments")]
    pub include_comments: Option<bool>,
}

/// Implementation of the get_issue tool
pub struct GetIssueTool {
    jira_client: Arc<JiraClient>,
    config: Arc<JiraConfig>,
    formatter: Arc<IssueFormatter>,
}

impl GetIssueTool {
    pub fn new(
        jira_client: Arc<JiraClient>,
        config: Arc<JiraConfig>,
        formatter: Arc<IssueFormatter>,
    ) -> Self {
        Self {
            jira_client,
            config,
            formatter,
        }
    }

    /// Execute the get_issue tool
    #[instrument(skip(self), fields(issue_key = %params.issue_key))]
    pub async fn execute(&self, params: GetIssueParams) -> JiraMcpResult<String> {
        let issue_key = normalize_issue_key(&params.issue_key)?;
        let include_comments = params.include_comments.unwrap_or(true);

        let mut standard: Vec<&str> = REPORT_FIELDS.to_vec();
        if include_comments {
            standard.push("comment");
        }
        let fields = requested_fields(&standard, &self.config.custom_fields);

        let issue = self
            .jira_client
            .fetch_issue(&issue_key, &fields, &[])
            .await?;

        info!("Retrieved {}", format_issue_summary(&issue));

        Ok(self
            .formatter
            .format_issue(&issue, FormatOptions { include_comments }))
    }
}
