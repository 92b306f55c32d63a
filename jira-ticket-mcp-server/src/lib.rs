//! JIRA Ticket MCP Server Library
//!
//! Exposes single JIRA issues to MCP clients as readable text.
//!
//! ## Features
//!
//! - **Issue reports**: a markdown report with people, links, custom fields,
//!   the latest comments and a browse link
//! - **Ticket analysis**: an analysis prompt built from the issue data
//! - **Custom fields**: a configured allow-list with friendly labels, or every
//!   `customfield_*` value the issue carries
//! - **Error Handling**: every JIRA failure surfaces as one readable message

use crate::config::JiraConfig;
use crate::error::{JiraMcpError, JiraMcpResult};
use crate::formatting::IssueFormatter;
use crate::jira_client::JiraClient;
use crate::tools::{
    tool_error_text, AnalyzeTicketParams, AnalyzeTicketTool, GetIssueParams, GetIssueTool,
};

use pulseengine_mcp_macros::{mcp_server, mcp_tools};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub mod config;
pub mod error;
pub mod formatting;
pub mod issue;
pub mod jira_client;
pub mod logging;
pub mod tools;

/// JIRA Ticket MCP Server
///
/// Uses the #[mcp_server] macro for the MCP infrastructure; the methods in
/// the `#[mcp_tools]` block below are the tools.
#[mcp_server(
    name = "JIRA Ticket MCP Server",
    version = "0.1.0",
    description = "Retrieves JIRA issues as formatted reports and ticket analysis prompts",
    auth = "disabled"
)]
#[derive(Clone)]
pub struct JiraTicketMcpServer {
    jira_client: Arc<JiraClient>,
    config: Arc<JiraConfig>,
    get_issue_tool: Arc<GetIssueTool>,
    analyze_ticket_tool: Arc<AnalyzeTicketTool>,
}

impl Default for JiraTicketMcpServer {
    fn default() -> Self {
        // required by the macro; real servers come from with_config()
        panic!("JiraTicketMcpServer cannot be created with default(). Use JiraTicketMcpServer::with_config() instead.")
    }
}

impl JiraTicketMcpServer {
    /// Build the server from an already validated configuration
    ///
    /// Checks connectivity once; a failure is logged and the server still
    /// starts so the MCP client can see the error through the tools.
    #[instrument(skip(config))]
    pub async fn with_config(config: JiraConfig) -> JiraMcpResult<Self> {
        let server = Self::build(config)?;

        match server.jira_client.test_connection().await {
            Ok(_) => info!("Connected to JIRA at {}", server.config.jira_url),
            Err(e) => warn!(
                category = e.category(),
                "JIRA connection check failed, continuing: {}", e
            ),
        }

        Ok(server)
    }

    /// Wire the client, formatter and tools without touching the network
    pub fn build(config: JiraConfig) -> JiraMcpResult<Self> {
        config
            .validate()
            .map_err(|e| JiraMcpError::config(format!("{:#}", e)))?;

        let config = Arc::new(config);
        let jira_client = Arc::new(JiraClient::new(&config)?);
        let formatter = Arc::new(IssueFormatter::from_config(&config));

        let get_issue_tool = Arc::new(GetIssueTool::new(
            Arc::clone(&jira_client),
            Arc::clone(&config),
            Arc::clone(&formatter),
        ));
        let analyze_ticket_tool = Arc::new(AnalyzeTicketTool::new(
            Arc::clone(&jira_client),
            Arc::clone(&config),
            formatter,
        ));

        Ok(Self {
            jira_client,
            config,
            get_issue_tool,
            analyze_ticket_tool,
        })
    }
}

/// All public methods in this impl block become MCP tools
#[mcp_tools]
impl JiraTicketMcpServer {
    /// Get a JIRA issue as a formatted markdown report
    ///
    /// The report covers status, people, parent, description, labels, fix
    /// versions, related issues, custom fields, the latest comments, the
    /// timeline and a browse link.
    ///
    /// # Examples
    /// - Full report: `{"issueKey": "PROJ-123"}`
    /// - Without comments: `{"issueKey": "PROJ-123", "includeComments": false}`
    #[instrument(skip(self))]
    pub async fn get_issue(&self, params: GetIssueParams) -> anyhow::Result<String> {
        self.get_issue_tool.execute(params).await.map_err(|e| {
            error!(
                category = e.category(),
                code = e.error_code(),
                retryable = e.is_retryable(),
                data = ?e.error_data(),
                "get_issue failed: {}",
                e
            );
            anyhow::anyhow!(tool_error_text("retrieve issue", &e))
        })
    }

    /// Build a ticket analysis prompt for a JIRA issue
    ///
    /// Returns instructions for assessing complexity, risks, dependencies and
    /// an implementation approach, followed by the ticket data.
    ///
    /// # Examples
    /// - `{"issueKey": "PROJ-123"}`
    #[instrument(skip(self))]
    pub async fn analyze_ticket(&self, params: AnalyzeTicketParams) -> anyhow::Result<String> {
        self.analyze_ticket_tool.execute(params).await.map_err(|e| {
            error!(
                category = e.category(),
                code = e.error_code(),
                retryable = e.is_retryable(),
                data = ?e.error_data(),
                "analyze_ticket failed: {}",
                e
            );
            anyhow::anyhow!(tool_error_text("analyze ticket", &e))
        })
    }

    /// Test the JIRA connection and credentials
    ///
    /// Always answers with a text report; failures are described rather than
    /// raised.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> anyhow::Result<String> {
        info!("Testing JIRA connection");

        match self.jira_client.test_connection().await {
            Ok(server_info) => Ok(format!(
                "Connection successful\n\
                 JIRA URL: {}\n\
                 Server: {}\n\
                 Version: {}\n\
                 Deployment: {}\n\
                 Default project: {}",
                self.jira_client.base_url(),
                server_info.server_title.as_deref().unwrap_or("JIRA"),
                server_info.version.as_deref().unwrap_or("unknown"),
                server_info.deployment_type.as_deref().unwrap_or("unknown"),
                self.config.default_project_key.as_deref().unwrap_or("none"),
            )),
            Err(e) => {
                error!("Connection test failed: {}", e);
                Ok(format!(
                    "Connection failed\n\
                     JIRA URL: {}\n\
                     Error: {}\n\
                     \n\
                     Please check:\n\
                     - JIRA_BASE_URL is correct and reachable\n\
                     - JIRA_EMAIL and JIRA_API_TOKEN are valid",
                    self.jira_client.base_url(),
                    e
                ))
            }
        }
    }
}
