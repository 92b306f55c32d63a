//! Markdown report for a single issue
//!
//! The report is a fixed sequence of sections. Each section is computed on
//! its own from the issue; sections without data render as an empty string
//! and are dropped before the non-empty ones are joined with a blank line.
//! The closing link section starts with a horizontal rule.

use super::extract::{
    extract_development_summary, extract_value, format_timestamp, rich_text_to_string,
};
use crate::config::{CustomFieldKind, CustomFieldSettings, CustomFieldStrategy, JiraConfig};
use crate::issue::{FieldValue, Issue, IssueFields, RichText};

/// Number of trailing comments shown in a report
pub const MAX_COMMENTS: usize = 3;

/// Shown when a rich description yields no text
pub const COMPLEX_CONTENT_PLACEHOLDER: &str = "[complex content, view in JIRA]";

const REST_API_PATH: &str = "/rest/api/";
const BROWSE_PATH: &str = "/browse/";

/// Per-call rendering switches
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    pub include_comments: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_comments: true,
        }
    }
}

/// Renders issues as markdown text
#[derive(Debug, Clone)]
pub struct IssueFormatter {
    custom_fields: CustomFieldSettings,
    date_format: String,
}

impl IssueFormatter {
    pub fn new(custom_fields: CustomFieldSettings, date_format: impl Into<String>) -> Self {
        Self {
            custom_fields,
            date_format: date_format.into(),
        }
    }

    pub fn from_config(config: &JiraConfig) -> Self {
        Self::new(config.custom_fields.clone(), config.date_format.clone())
    }

    /// Full report for `issue`
    pub fn format_issue(&self, issue: &Issue, options: FormatOptions) -> String {
        let f = &issue.fields;
        let sections = [
            format!("# {}: {}", issue.key, f.summary),
            self.basic_info_section(f),
            self.people_section(f),
            self.parent_section(f),
            self.description_section(f),
            self.labels_section(f),
            self.fix_versions_section(f),
            self.related_issues_section(f),
            self.custom_fields_section(f),
            if options.include_comments {
                self.comments_section(f)
            } else {
                String::new()
            },
            self.timeline_section(f),
            self.link_section(issue),
        ];

        sections
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn basic_info_section(&self, f: &IssueFields) -> String {
        let status = match f
            .status
            .as_ref()
            .and_then(|s| s.status_category.as_ref())
        {
            Some(category) => format!("{} ({})", f.status_name(), category.name),
            None => f.status_name().to_string(),
        };
        let project = match &f.project {
            Some(p) => format!("{} ({})", p.name, p.key),
            None => "Unknown".to_string(),
        };

        format!(
            "## Basic Information\n\
             - **Status**: {}\n\
             - **Type**: {}\n\
             - **Priority**: {}\n\
             - **Project**: {}",
            status,
            f.issue_type_name(),
            f.priority_name(),
            project
        )
    }

    fn people_section(&self, f: &IssueFields) -> String {
        format!(
            "## People\n- **Assignee**: {}\n- **Reporter**: {}",
            f.assignee_name(),
            f.reporter_name()
        )
    }

    fn parent_section(&self, f: &IssueFields) -> String {
        let Some(parent) = &f.parent else {
            return String::new();
        };
        let parent_type = parent
            .fields
            .issuetype
            .as_ref()
            .map_or("Unknown", |t| t.name.as_str());

        format!(
            "## Parent Issue\n- **Key**: {} - {}\n- **Type**: {}",
            parent.key, parent.fields.summary, parent_type
        )
    }

    fn description_section(&self, f: &IssueFields) -> String {
        match description_text(f) {
            Some(text) => format!("## Description\n{}", text),
            None => String::new(),
        }
    }

    fn labels_section(&self, f: &IssueFields) -> String {
        if f.labels.is_empty() {
            return String::new();
        }
        let lines: Vec<String> = f.labels.iter().map(|l| format!("- {}", l)).collect();
        format!("## Labels\n{}", lines.join("\n"))
    }

    fn fix_versions_section(&self, f: &IssueFields) -> String {
        if f.fix_versions.is_empty() {
            return String::new();
        }
        let lines: Vec<String> = f
            .fix_versions
            .iter()
            .map(|v| {
                let state = if v.released { "Released" } else { "Unreleased" };
                match &v.release_date {
                    Some(date) => format!("- {} - {} ({})", v.name, state, date),
                    None => format!("- {} - {}", v.name, state),
                }
            })
            .collect();
        format!("## Fix Versions\n{}", lines.join("\n"))
    }

    fn related_issues_section(&self, f: &IssueFields) -> String {
        let lines = related_issue_lines(f);
        if lines.is_empty() {
            return String::new();
        }
        format!("## Related Issues\n{}", lines.join("\n"))
    }

    fn custom_fields_section(&self, f: &IssueFields) -> String {
        let entries = self.custom_field_entries(f);
        if entries.is_empty() {
            return String::new();
        }
        let lines: Vec<String> = entries
            .iter()
            .map(|(label, value)| format!("- **{}**: {}", label, value))
            .collect();
        format!("## Custom Fields\n{}", lines.join("\n"))
    }

    /// Label/value pairs for every custom field that has something to show
    pub fn custom_field_entries(&self, f: &IssueFields) -> Vec<(String, String)> {
        match self.custom_fields.strategy {
            CustomFieldStrategy::AllowList => self
                .custom_fields
                .allow_list
                .iter()
                .filter_map(|mapping| {
                    let value = f.custom_field(&mapping.field_id);
                    let display = match mapping.kind {
                        CustomFieldKind::Value => extract_value(value),
                        CustomFieldKind::Development => match value {
                            FieldValue::Scalar(raw) => {
                                extract_development_summary(raw, &self.date_format)
                            }
                            other => extract_value(other),
                        },
                    }?;
                    Some((mapping.label.clone(), display))
                })
                .collect(),
            CustomFieldStrategy::Generic => f
                .custom_fields()
                .filter_map(|(id, value)| Some((id.to_string(), extract_value(value)?)))
                .collect(),
        }
    }

    fn comments_section(&self, f: &IssueFields) -> String {
        let Some(page) = &f.comment else {
            return String::new();
        };
        let total = page.total();
        if total == 0 {
            return String::new();
        }

        let shown = &page.comments[page.comments.len().saturating_sub(MAX_COMMENTS)..];
        let mut out = format!("## Comments ({})", total);
        if shown.len() < total {
            out.push_str(&format!("\n_Showing the last {} of {}_", shown.len(), total));
        }

        for comment in shown {
            let author = comment
                .author
                .as_ref()
                .map_or("Unknown", |a| a.display_name.as_str());
            let date = comment
                .created
                .as_deref()
                .map(|c| format_timestamp(c, &self.date_format))
                .unwrap_or_default();
            let body = comment
                .body
                .as_ref()
                .map(rich_text_to_string)
                .unwrap_or_default();
            out.push_str(&format!("\n\n### {} - {}\n{}", author, date, body));
        }
        out
    }

    fn timeline_section(&self, f: &IssueFields) -> String {
        let render = |ts: &Option<String>| {
            ts.as_deref()
                .map(|t| format_timestamp(t, &self.date_format))
                .unwrap_or_else(|| "Unknown".to_string())
        };
        format!(
            "## Timeline\n- **Created**: {}\n- **Updated**: {}",
            render(&f.created),
            render(&f.updated)
        )
    }

    fn link_section(&self, issue: &Issue) -> String {
        match browse_url(issue) {
            Some(url) => format!("---\n**View in JIRA**: {}", url),
            None => String::new(),
        }
    }
}

/// Description as display text, `None` when the issue has none
pub(crate) fn description_text(f: &IssueFields) -> Option<String> {
    match f.description.as_ref()? {
        RichText::Plain(s) if s.trim().is_empty() => None,
        RichText::Plain(s) => Some(s.clone()),
        doc @ RichText::Document(_) => {
            let text = rich_text_to_string(doc);
            if text.trim().is_empty() {
                Some(COMPLEX_CONTENT_PLACEHOLDER.to_string())
            } else {
                Some(text)
            }
        }
    }
}

/// One line per link direction present
pub(crate) fn related_issue_lines(f: &IssueFields) -> Vec<String> {
    let mut lines = Vec::new();
    for link in &f.issuelinks {
        if let Some(outward) = &link.outward_issue {
            lines.push(format!(
                "- {} {}: {}",
                link.link_type.outward, outward.key, outward.fields.summary
            ));
        }
        if let Some(inward) = &link.inward_issue {
            lines.push(format!(
                "- {} {}: {}",
                link.link_type.inward, inward.key, inward.fields.summary
            ));
        }
    }
    lines
}

/// Browsable URL derived from the issue's API link
pub fn browse_url(issue: &Issue) -> Option<String> {
    let self_link = issue.self_link.as_deref()?;
    // `self` ends in the numeric id, so the browse path takes the key
    let (base, _) = self_link.split_once(REST_API_PATH)?;
    Some(format!("{}{}{}", base, BROWSE_PATH, issue.key))
}

/// One-line summary: `KEY: summary [status] - assignee`
pub fn format_issue_summary(issue: &Issue) -> String {
    format!(
        "{}: {} [{}] - {}",
        issue.key,
        issue.fields.summary,
        issue.fields.status_name(),
        issue.fields.assignee_name()
    )
}
