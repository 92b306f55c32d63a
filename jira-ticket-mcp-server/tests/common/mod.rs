/// Common utilities for JIRA Ticket MCP Server integration tests
use jira_ticket_mcp_server::config::{CustomFieldStrategy, JiraConfig};
use jira_ticket_mcp_server::JiraTicketMcpServer;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock JIRA site plus a server wired to it
#[allow(dead_code)]
pub struct TestJira {
    pub mock: MockServer,
    pub server: JiraTicketMcpServer,
}

#[allow(dead_code)]
impl TestJira {
    /// Start a mock JIRA that answers the startup connection check
    pub async fn start() -> Self {
        Self::start_with_strategy(CustomFieldStrategy::AllowList).await
    }

    pub async fn start_with_strategy(strategy: CustomFieldStrategy) -> Self {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/serverInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "baseUrl": mock.uri(),
                "version": "1001.0.0",
                "deploymentType": "Cloud",
                "serverTitle": "Pix JIRA"
            })))
            .mount(&mock)
            .await;

        let mut config = test_config(&mock.uri());
        config.custom_fields.strategy = strategy;
        let server = JiraTicketMcpServer::with_config(config)
            .await
            .expect("Failed to create server");

        Self { mock, server }
    }

    /// Serve `issue` for GET /rest/api/3/issue/{key}
    pub async fn mount_issue(&self, key: &str, issue: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/rest/api/3/issue/{key}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue))
            .mount(&self.mock)
            .await;
    }

    /// Answer every issue request with `status` and `body`
    pub async fn mount_issue_error(&self, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(wiremock::matchers::path_regex(r"^/rest/api/3/issue/.+$"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock)
            .await;
    }

    /// Query strings of the issue requests received so far
    pub async fn issue_queries(&self) -> Vec<String> {
        self.mock
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().starts_with("/rest/api/3/issue/"))
            .map(|r| r.url.query().unwrap_or_default().to_string())
            .collect()
    }
}

pub fn test_config(base_url: &str) -> JiraConfig {
    JiraConfig {
        jira_url: base_url.to_string(),
        email: "dev@example.com".to_string(),
        api_token: "token".to_string(),
        ..Default::default()
    }
}

/// A story carrying every section the report knows about
#[allow(dead_code)]
pub fn full_issue(base_url: &str) -> Value {
    json!({
        "key": "PIX-101",
        "self": format!("{base_url}/rest/api/3/issue/10101"),
        "fields": {
            "summary": "Refund flow for Pix payments",
            "status": {"name": "In Progress", "statusCategory": {"name": "In Progress"}},
            "issuetype": {"name": "Story"},
            "priority": {"name": "High"},
            "project": {"key": "PIX", "name": "Pix Platform"},
            "assignee": {"displayName": "Ana Souza"},
            "reporter": {"displayName": "Bruno Lima"},
            "parent": {"key": "PIX-100", "fields": {"summary": "Refunds epic", "issuetype": {"name": "Epic"}}},
            "description": {"type": "doc", "version": 1, "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Support "},
                    {"type": "text", "text": "partial refunds."}
                ]},
                {"type": "paragraph", "content": [{"type": "text", "text": "Keep the audit trail."}]}
            ]},
            "labels": ["payments", "refund"],
            "fixVersions": [{"name": "2024.3", "released": false}],
            "issuelinks": [{
                "type": {"name": "Blocks", "inward": "is blocked by", "outward": "blocks"},
                "outwardIssue": {"key": "PIX-102", "fields": {"summary": "Refund notifications"}}
            }],
            "customfield_10253": {"value": "Pagamentos"},
            "customfield_10254": [{"value": "Checkout"}, {"value": "Backoffice"}],
            "customfield_10000": "{repository={count=2, dataType=repository}, json={\"cachedValue\":{\"errors\":[],\"summary\":{\"repository\":{\"overall\":{\"count\":2,\"lastUpdated\":\"2024-01-15T10:30:00.000-0300\"}}}},\"isStale\":true}}",
            "customfield_10255": null,
            "comment": {"total": 4, "comments": [
                {"author": {"displayName": "C1"}, "body": "first", "created": "2024-01-10T09:00:00.000-0300"},
                {"author": {"displayName": "C2"}, "body": "second", "created": "2024-01-11T09:00:00.000-0300"},
                {"author": {"displayName": "C3"}, "body": "third", "created": "2024-01-12T09:00:00.000-0300"},
                {"author": {"displayName": "C4"}, "body": {"type": "doc", "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "fourth"}]}
                ]}, "created": "2024-01-13T09:00:00.000-0300"}
            ]},
            "created": "2024-01-02T08:00:00.000-0300",
            "updated": "2024-01-13T09:30:00.000-0300"
        }
    })
}
