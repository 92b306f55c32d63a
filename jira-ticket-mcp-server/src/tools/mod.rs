//! Tools module for the JIRA ticket MCP server
//!
//! Each tool validates its parameters, fetches the issue through the shared
//! client and renders text for the MCP client.

pub mod analyze_ticket;
pub mod get_issue;

pub use analyze_ticket::*;
pub use get_issue::*;

use crate::config::{CustomFieldSettings, CustomFieldStrategy};
use crate::error::{JiraMcpError, JiraMcpResult};
use crate::jira_client::FieldSelector;
use once_cell::sync::Lazy;
use regex::Regex;

static ISSUE_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+-[0-9]+$").expect("valid issue key regex"));

/// Trim and uppercase an issue key, then check it looks like `PROJ-123`
pub fn normalize_issue_key(raw: &str) -> JiraMcpResult<String> {
    let key = raw.trim().to_uppercase();
    if key.is_empty() {
        return Err(JiraMcpError::invalid_param(
            "issueKey",
            "Issue key is required",
        ));
    }
    if !ISSUE_KEY_PATTERN.is_match(&key) {
        return Err(JiraMcpError::invalid_param(
            "issueKey",
            format!(
                "'{}' is not a valid issue key. Expected a format like PROJ-123",
                raw.trim()
            ),
        ));
    }
    Ok(key)
}

/// Standard fields plus whatever the custom field strategy needs
pub fn requested_fields(standard: &[&str], settings: &CustomFieldSettings) -> Vec<FieldSelector> {
    let mut fields: Vec<FieldSelector> = standard.iter().map(|&f| FieldSelector::named(f)).collect();
    match settings.strategy {
        CustomFieldStrategy::AllowList => fields.extend(
            settings
                .allow_list
                .iter()
                .map(|mapping| FieldSelector::named(mapping.field_id.as_str())),
        ),
        CustomFieldStrategy::Generic => fields.push(FieldSelector::AllCustomFields),
    }
    fields
}

/// Text shown to the MCP client when a tool fails
///
/// API errors already carry a user-facing message and parameter errors say
/// which argument was wrong. Anything else is prefixed with the operation.
pub fn tool_error_text(operation: &str, error: &JiraMcpError) -> String {
    match error {
        JiraMcpError::Api { message, .. } => message.clone(),
        JiraMcpError::InvalidParameter { .. } => error.to_string(),
        other => format!("Failed to {}: {}", operation, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomFieldKind, CustomFieldMapping};
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_issue_key() {
        assert_eq!(normalize_issue_key(" proj-123 ").unwrap(), "PROJ-123");
        assert_eq!(normalize_issue_key("PIX-1").unwrap(), "PIX-1");

        for bad in [
            "",
            "   ",
            "invalid",
            "PROJ-",
            "-12",
            "PROJ 12",
            "PR0J-12",
            "PROJ-12a",
            "PROJ-١٢",
            "proj-１",
        ] {
            assert_matches!(
                normalize_issue_key(bad),
                Err(JiraMcpError::InvalidParameter { ref parameter, .. }) if parameter == "issueKey",
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_requested_fields_allow_list() {
        let settings = CustomFieldSettings {
            strategy: CustomFieldStrategy::AllowList,
            allow_list: vec![CustomFieldMapping::new("customfield_1", "Team", CustomFieldKind::Value)],
        };
        assert_eq!(
            requested_fields(&["summary"], &settings),
            vec![
                FieldSelector::named("summary"),
                FieldSelector::named("customfield_1")
            ]
        );
    }

    #[test]
    fn test_requested_fields_generic() {
        let settings = CustomFieldSettings {
            strategy: CustomFieldStrategy::Generic,
            allow_list: vec![CustomFieldMapping::new("customfield_1", "Team", CustomFieldKind::Value)],
        };
        assert_eq!(
            requested_fields(&["summary"], &settings),
            vec![FieldSelector::named("summary"), FieldSelector::AllCustomFields]
        );
    }

    #[test]
    fn test_tool_error_text() {
        let api = JiraMcpError::api("Authentication failed. Check the JIRA email and API token.", 401);
        assert_eq!(
            tool_error_text("retrieve issue", &api),
            "Authentication failed. Check the JIRA email and API token."
        );

        let internal = JiraMcpError::internal("boom");
        assert_eq!(
            tool_error_text("retrieve issue", &internal),
            "Failed to retrieve issue: Internal error: boom"
        );
    }

    proptest! {
        #[test]
        fn normalized_keys_are_uppercase_and_trimmed(
            project in "[a-zA-Z]{1,8}",
            number in 1u32..100_000,
            pad in " {0,3}",
        ) {
            let raw = format!("{pad}{project}-{number}{pad}");
            let key = normalize_issue_key(&raw).unwrap();
            prop_assert_eq!(key, format!("{}-{}", project.to_uppercase(), number));
        }
    }
}
