//! Text rendering of JIRA issues
//!
//! `extract` turns individual field values into display strings, `report`
//! builds the full issue report and `prompt` the ticket analysis prompt.

pub mod extract;
pub mod prompt;
pub mod report;

pub use prompt::build_analysis_prompt;
pub use report::{browse_url, format_issue_summary, FormatOptions, IssueFormatter};
