//! Ticket analysis tool
//!
//! Fetches an issue and wraps it in the analysis prompt.

use super::{normalize_issue_key, requested_fields};
use crate::config::JiraConfig;
use crate::error::JiraMcpResult;
use crate::formatting::{build_analysis_prompt, IssueFormatter};
use crate::jira_client::JiraClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Fields the analysis prompt reads
const ANALYSIS_FIELDS: &[&str] = &[
    "summary",
    "status",
    "priority",
    "issuetype",
    "description",
    "parent",
    "labels",
    "issuelinks",
];

/// Parameters for the analyze_ticket tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTicketParams {
    /// JIRA issue key to analyze (e.g., "PROJ-123")
    #[serde(alias = "issue_key")]
    pub issue_key: String,
}

/// Implementation of the analyze_ticket tool
pub struct AnalyzeTicketTool {
    jira_client: Arc<JiraClient>,
    config: Arc<JiraConfig>,
    formatter: Arc<IssueFormatter>,
}

impl AnalyzeTicketTool {
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

    /// Execute the analyze_ticket tool
    #[instrument(skip(self), fields(issue_key = %params.issue_key))]
    pub async fn execute(&self, params: AnalyzeTicketParams) -> JiraMcpResult<String> {
        let issue_key = normalize_issue_key(&params.issue_key)?;
        let fields = requested_fields(ANALYSIS_FIELDS, &self.config.custom_fields);

        let issue = self
            .jira_client
            .fetch_issue(&issue_key, &fields, &[])
            .await?;

        info!("Building analysis prompt for {}", issue.key);
        Ok(build_analysis_prompt(&issue, &self.formatter))
    }
}
