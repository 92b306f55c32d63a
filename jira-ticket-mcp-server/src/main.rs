//! JIRA Ticket MCP Server - JIRA issue reports and ticket analysis via MCP

use jira_ticket_mcp_server::config::JiraConfig;
use jira_ticket_mcp_server::logging::init_tracing;
use jira_ticket_mcp_server::JiraTicketMcpServer;
use pulseengine_mcp_server::McpServerBuilder;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match JiraConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to start JIRA Ticket MCP Server: {:#}", e);
            eprintln!("\nPlease check:");
            eprintln!("  - JIRA_BASE_URL is set to the JIRA site URL");
            eprintln!("  - JIRA_EMAIL and JIRA_API_TOKEN are set");
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);
    info!("Starting JIRA Ticket MCP Server...");

    let jira_server = match JiraTicketMcpServer::with_config(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create JIRA Ticket MCP Server: {}", e);
            eprintln!("Failed to start JIRA Ticket MCP Server: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting MCP server with STDIO transport...");
    let mut server = jira_server.serve_stdio().await?;

    info!("JIRA Ticket MCP Server is running and ready to serve requests");
    server.run().await?;

    Ok(())
}
