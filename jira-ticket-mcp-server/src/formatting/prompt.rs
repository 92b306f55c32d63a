//! Ticket analysis prompt
//!
//! A fixed set of instructions for the model followed by a condensed dump of
//! the issue. Reuses the report helpers so both outputs read fields the same
//! way.

use super::report::{browse_url, description_text, related_issue_lines, IssueFormatter};
use crate::issue::Issue;

const ANALYSIS_INSTRUCTIONS: &str = "\
# Ticket Analysis Request

Analyze the JIRA ticket below and answer with the following sections:

1. **Complexity Assessment**: estimate the effort (low, medium, high) and explain what drives it.
2. **Risk Identification**: technical, product and operational risks, with possible mitigations.
3. **Dependency Analysis**: other tickets, teams, services or data this work depends on or affects.
4. **Recommended Approach**: a step-by-step implementation plan, including how to test and roll out the change.

Base the analysis only on the ticket data. Call out missing information instead of guessing.";

/// Build the analysis prompt for an already fetched issue
pub fn build_analysis_prompt(issue: &Issue, formatter: &IssueFormatter) -> String {
    format!(
        "{}\n\n---\n\n{}",
        ANALYSIS_INSTRUCTIONS,
        ticket_dump(issue, formatter)
    )
}

fn ticket_dump(issue: &Issue, formatter: &IssueFormatter) -> String {
    let f = &issue.fields;
    let mut lines = vec![
        "## Ticket Data".to_string(),
        format!("**Key**: {}", issue.key),
        format!("**Type**: {}", f.issue_type_name()),
        format!("**Status**: {}", f.status_name()),
        format!("**Priority**: {}", f.priority_name()),
        format!("**Summary**: {}", f.summary),
    ];

    lines.push(String::new());
    lines.push("**Description**:".to_string());
    lines.push(description_text(f).unwrap_or_else(|| "No description provided".to_string()));
    lines.push(String::new());

    if let Some(parent) = &f.parent {
        lines.push(format!("**Parent**: {} - {}", parent.key, parent.fields.summary));
    }

    if !f.labels.is_empty() {
        lines.push(format!("**Labels**: {}", f.labels.join(", ")));
    }

    let related = related_issue_lines(f);
    if !related.is_empty() {
        lines.push("**Related Issues**:".to_string());
        lines.extend(related);
    }

    let custom = formatter.custom_field_entries(f);
    if !custom.is_empty() {
        lines.push("**Custom Fields**:".to_string());
        lines.extend(
            custom
                .into_iter()
                .map(|(label, value)| format!("- {}: {}", label, value)),
        );
    }

    if let Some(url) = browse_url(issue) {
        lines.push(format!("**Link**: {}", url));
    }

    lines.join("\n")
}
